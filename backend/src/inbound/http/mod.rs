//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod auth_tokens;
pub mod catalogue;
pub mod error;
pub mod health;
pub mod paging;
pub mod recipe_relations;
pub mod recipes;
pub mod schemas;
pub mod short_links;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use actix_web::web;

/// Register the `/api` scope and the short link redirect.
///
/// Literal segments (`/users/me/`, `/recipes/download_shopping_cart/`) are
/// registered before the `{id}` routes that would otherwise capture them.
/// Handlers expect `web::Data<HttpState>` to be registered on the app.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let api = web::scope("/api")
        .service(auth_tokens::login)
        .service(auth_tokens::logout)
        .service(users::register)
        .service(users::list_users)
        .service(users::current_user)
        .service(users::set_password)
        .service(users::set_avatar)
        .service(users::remove_avatar)
        .service(subscriptions::list_subscriptions)
        .service(users::get_user)
        .service(subscriptions::subscribe)
        .service(subscriptions::unsubscribe)
        .service(catalogue::list_tags)
        .service(catalogue::get_tag)
        .service(catalogue::list_ingredients)
        .service(catalogue::get_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::download_shopping_cart)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::get_link)
        .service(recipe_relations::add_favorite)
        .service(recipe_relations::remove_favorite)
        .service(recipe_relations::add_to_shopping_cart)
        .service(recipe_relations::remove_from_shopping_cart);

    cfg.configure(error::register_extractor_errors)
        .service(api)
        .service(short_links::follow_short_link);
}
