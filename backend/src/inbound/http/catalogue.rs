//! Read-only tag and ingredient catalogue.
//!
//! ```text
//! GET /api/tags/
//! GET /api/tags/{id}/
//! GET /api/ingredients/?name=fl
//! GET /api/ingredients/{id}/
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, IngredientId, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{IngredientBody, TagBody};
use crate::inbound::http::state::HttpState;

/// Ingredient search parameters.
#[derive(Debug, Deserialize, IntoParams)]
pub struct IngredientSearch {
    /// Case-insensitive fragment of the ingredient name.
    pub name: Option<String>,
}

/// List every tag.
#[utoipa::path(
    get,
    path = "/api/tags/",
    responses(
        (status = 200, description = "Tags", body = [TagBody]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags/")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagBody>>> {
    let tags = state.catalogue.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagBody::from).collect()))
}

/// Fetch one tag.
#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagBody),
        (status = 404, description = "Unknown tag", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}/")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TagBody>> {
    let tag = state.catalogue.get_tag(TagId::new(path.into_inner())).await?;
    Ok(web::Json(tag.into()))
}

/// List ingredients, optionally narrowed to names containing `name`.
#[utoipa::path(
    get,
    path = "/api/ingredients/",
    params(IngredientSearch),
    responses(
        (status = 200, description = "Ingredients", body = [IngredientBody]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearch>,
) -> ApiResult<web::Json<Vec<IngredientBody>>> {
    let name = query.into_inner().name.filter(|name| !name.trim().is_empty());
    let ingredients = state.catalogue.list_ingredients(name).await?;
    Ok(web::Json(
        ingredients.into_iter().map(IngredientBody::from).collect(),
    ))
}

/// Fetch one ingredient.
#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientBody),
        (status = 404, description = "Unknown ingredient", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}/")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IngredientBody>> {
    let ingredient = state
        .catalogue
        .get_ingredient(IngredientId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ingredient.into()))
}
