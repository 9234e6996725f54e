//! Recipe endpoints.
//!
//! ```text
//! GET    /api/recipes/?author=3&tags=lunch&tags=dinner&is_favorited=1
//! POST   /api/recipes/
//! GET    /api/recipes/{id}/
//! PATCH  /api/recipes/{id}/
//! DELETE /api/recipes/{id}/
//! GET    /api/recipes/{id}/get-link/
//! GET    /api/recipes/download_shopping_cart/
//! ```

use actix_web::http::header::ContentDisposition;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, IngredientId, RecipeDraft, RecipeId, RecipeListFilter, SHOPPING_LIST_FILENAME, TagId,
    TagSlug, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AuthenticatedUser, MaybeUser};
use crate::inbound::http::paging::{QueryParams, into_page};
use crate::inbound::http::schemas::{RecipeBody, RecipePageSchema};
use crate::inbound::http::state::HttpState;

/// Ingredient reference in a recipe write.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmountRequest {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = 200)]
    pub amount: i64,
}

/// Recipe create and update body.
///
/// Absent fields deserialise as empty so validation names them. On update
/// `image` may be omitted to keep the stored image.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RecipeRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    #[schema(example = json!([1, 2]))]
    pub tags: Vec<i64>,
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub image: Option<String>,
    #[schema(example = "Pancakes")]
    pub name: String,
    pub text: String,
    #[schema(example = 20)]
    pub cooking_time: i64,
}

impl From<RecipeRequest> for RecipeDraft {
    fn from(value: RecipeRequest) -> Self {
        Self {
            name: value.name,
            text: value.text,
            cooking_time: value.cooking_time,
            tags: value.tags.into_iter().map(TagId::new).collect(),
            ingredients: value
                .ingredients
                .into_iter()
                .map(|line| (IngredientId::new(line.id), line.amount))
                .collect(),
            image: value.image,
        }
    }
}

/// Shareable short link.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    #[schema(example = "https://foodgram.example/s/3d/")]
    pub short_link: String,
}

fn parse_flag(params: &QueryParams, field: &str) -> Result<Option<bool>, Error> {
    params
        .get(field)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(Error::invalid_field(
                field,
                "invalid",
                format!("{field} must be one of 1, 0, true or false"),
            )),
        })
        .transpose()
}

fn parse_filter(params: &QueryParams) -> Result<RecipeListFilter, Error> {
    let author = params
        .get("author")
        .map(|raw| {
            raw.trim().parse::<i64>().map(UserId::new).map_err(|_| {
                Error::invalid_field("author", "invalid", "author must be a user id")
            })
        })
        .transpose()?;
    let tags = params
        .all("tags")
        .map(|raw| {
            TagSlug::new(raw).map_err(|err| Error::invalid_field("tags", "invalid", err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RecipeListFilter {
        author,
        tags,
        is_favorited: parse_flag(params, "is_favorited")?,
        is_in_shopping_cart: parse_flag(params, "is_in_shopping_cart")?,
    })
}

/// List recipes, newest first.
///
/// Relation filters only apply when the caller is authenticated.
#[utoipa::path(
    get,
    path = "/api/recipes/",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, 1 to 100"),
        ("author" = Option<i64>, Query, description = "Author id"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs; any match"),
        ("is_favorited" = Option<String>, Query, description = "1/0/true/false"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "1/0/true/false")
    ),
    responses(
        (status = 200, description = "Recipes", body = RecipePageSchema),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 404, description = "Page out of range", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes/")]
pub async fn list_recipes(
    req: HttpRequest,
    state: web::Data<HttpState>,
    viewer: MaybeUser,
) -> ApiResult<web::Json<Page<RecipeBody>>> {
    let params = QueryParams::from_request(&req);
    let page = params.page_request()?;
    let filter = parse_filter(&params)?.for_viewer(viewer.id());
    let listing = state.recipes_query.list(viewer.id(), filter, page).await?;
    into_page(&req, page, listing, RecipeBody::from).map(web::Json)
}

/// Publish a recipe.
#[utoipa::path(
    post,
    path = "/api/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let recipe = state
        .recipes
        .create(user.id(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RecipeBody::from(recipe)))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeBody),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    viewer: MaybeUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeBody>> {
    let recipe = state
        .recipes_query
        .get(viewer.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(recipe.into()))
}

/// Replace a recipe's fields, tags and ingredients.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}/")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeBody>> {
    let recipe = state
        .recipes
        .update(
            user.id(),
            RecipeId::new(path.into_inner()),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(recipe.into()))
}

/// Delete a recipe.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipes
        .delete(user.id(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Shareable short link for a recipe.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkResponse),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipeLink",
    security([])
)]
#[get("/recipes/{id}/get-link/")]
pub async fn get_link(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let link = state
        .recipes_query
        .short_link(RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ShortLinkResponse {
        short_link: state.urls.short_link_url(&link),
    }))
}

/// Download the caller's aggregated shopping list as plain text.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    responses(
        (status = 200, description = "Shopping list attachment", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart/")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let report = state.shopping_list.download_shopping_cart(user.id()).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition::attachment(SHOPPING_LIST_FILENAME))
        .body(report.render()))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
