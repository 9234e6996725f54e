//! Favorite and shopping cart toggles.
//!
//! ```text
//! POST   /api/recipes/{id}/favorite/
//! DELETE /api/recipes/{id}/favorite/
//! POST   /api/recipes/{id}/shopping_cart/
//! DELETE /api/recipes/{id}/shopping_cart/
//! ```

use actix_web::{HttpResponse, delete, post, web};

use crate::domain::{Error, RecipeId, RecipeRelation};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::RecipeCardBody;
use crate::inbound::http::state::HttpState;

async fn add(
    state: &HttpState,
    user: AuthenticatedUser,
    recipe: i64,
    relation: RecipeRelation,
) -> ApiResult<HttpResponse> {
    let card = state
        .relations
        .add(user.id(), RecipeId::new(recipe), relation)
        .await?;
    Ok(HttpResponse::Created().json(RecipeCardBody::from(card)))
}

async fn remove(
    state: &HttpState,
    user: AuthenticatedUser,
    recipe: i64,
    relation: RecipeRelation,
) -> ApiResult<HttpResponse> {
    state
        .relations
        .remove(user.id(), RecipeId::new(recipe), relation)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a recipe to the caller's favorites.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeCardBody),
        (status = 400, description = "Already a favorite", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite/")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add(&state, user, path.into_inner(), RecipeRelation::Favorite).await
}

/// Remove a recipe from the caller's favorites.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not a favorite", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite/")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove(&state, user, path.into_inner(), RecipeRelation::Favorite).await
}

/// Put a recipe in the caller's shopping cart.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeCardBody),
        (status = 400, description = "Already in the cart", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id}/shopping_cart/")]
pub async fn add_to_shopping_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add(&state, user, path.into_inner(), RecipeRelation::ShoppingCart).await
}

/// Take a recipe out of the caller's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not in the cart", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown recipe", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id}/shopping_cart/")]
pub async fn remove_from_shopping_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove(&state, user, path.into_inner(), RecipeRelation::ShoppingCart).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, fixtures};
    use crate::inbound::http::test_utils::{MockPorts, auth_header, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("favorite", RecipeRelation::Favorite)]
    #[case("shopping_cart", RecipeRelation::ShoppingCart)]
    #[actix_web::test]
    async fn adding_returns_the_recipe_card(#[case] segment: &str, #[case] relation: RecipeRelation) {
        let mut ports = MockPorts::default().with_token(UserId::new(2));
        ports
            .relations
            .expect_add()
            .with(eq(UserId::new(2)), eq(RecipeId::new(11)), eq(relation))
            .times(1)
            .return_once(|_, _, _| Ok(fixtures::sample_card(11)));
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::post()
            .uri(&format!("/api/recipes/11/{segment}/"))
            .insert_header(auth_header())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        let mut keys: Vec<String> = body
            .as_object()
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort_unstable();
        assert_eq!(keys, ["cooking_time", "id", "image", "name"]);
        assert_eq!(body["id"], json!(11));
    }

    #[rstest]
    #[case("favorite", RecipeRelation::Favorite)]
    #[case("shopping_cart", RecipeRelation::ShoppingCart)]
    #[actix_web::test]
    async fn removing_returns_no_content(#[case] segment: &str, #[case] relation: RecipeRelation) {
        let mut ports = MockPorts::default().with_token(UserId::new(2));
        ports
            .relations
            .expect_remove()
            .with(eq(UserId::new(2)), eq(RecipeId::new(11)), eq(relation))
            .times(1)
            .return_once(|_, _, _| Ok(()));
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/recipes/11/{segment}/"))
            .insert_header(auth_header())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn duplicate_favorite_is_a_bad_request() {
        let mut ports = MockPorts::default().with_token(UserId::new(2));
        ports
            .relations
            .expect_add()
            .return_once(|_, _, _| Err(Error::invalid_request("recipe 11 is already in favorites")));
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/recipes/11/favorite/")
            .insert_header(auth_header())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn removing_from_unknown_recipe_is_not_found() {
        let mut ports = MockPorts::default().with_token(UserId::new(2));
        ports
            .relations
            .expect_remove()
            .return_once(|_, _, _| Err(Error::not_found("recipe 99 not found")));
        let app = actix_test::init_service(test_app(ports)).await;

        let req = actix_test::TestRequest::delete()
            .uri("/api/recipes/99/shopping_cart/")
            .insert_header(auth_header())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
