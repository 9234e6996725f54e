//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint of the inbound layer together with
//! the response bodies it emits. Authenticated endpoints use the
//! `Authorization: Token <key>` header issued by `POST /api/auth/token/login/`;
//! anonymous endpoints opt out with an empty security list.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth_tokens::{LoginRequest, TokenResponse};
use crate::inbound::http::recipes::{IngredientAmountRequest, RecipeRequest, ShortLinkResponse};
use crate::inbound::http::schemas::{
    IngredientBody, RecipeBody, RecipeCardBody, RecipeIngredientBody, RecipePageSchema,
    SubscriptionBody, SubscriptionPageSchema, TagBody, UserBody, UserPageSchema,
    UserProfileBody,
};
use crate::inbound::http::users::{
    AvatarRequest, AvatarResponse, RegisterRequest, SetPasswordRequest,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the token security scheme in the generated document.
pub const TOKEN_SECURITY_SCHEME: &str = "TokenAuth";

/// Enrich the generated document with the token header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` where the key is issued by POST /api/auth/token/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram API",
        description = "Recipes, favourites, shopping lists and author subscriptions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::auth_tokens::login,
        crate::inbound::http::auth_tokens::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::set_password,
        crate::inbound::http::users::set_avatar,
        crate::inbound::http::users::remove_avatar,
        crate::inbound::http::subscriptions::list_subscriptions,
        crate::inbound::http::subscriptions::subscribe,
        crate::inbound::http::subscriptions::unsubscribe,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::get_link,
        crate::inbound::http::recipes::download_shopping_cart,
        crate::inbound::http::recipe_relations::add_favorite,
        crate::inbound::http::recipe_relations::remove_favorite,
        crate::inbound::http::recipe_relations::add_to_shopping_cart,
        crate::inbound::http::recipe_relations::remove_from_shopping_cart,
        crate::inbound::http::short_links::follow_short_link,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        TokenResponse,
        RegisterRequest,
        SetPasswordRequest,
        AvatarRequest,
        AvatarResponse,
        UserBody,
        UserProfileBody,
        UserPageSchema,
        TagBody,
        IngredientBody,
        IngredientAmountRequest,
        RecipeRequest,
        RecipeBody,
        RecipeCardBody,
        RecipeIngredientBody,
        RecipePageSchema,
        ShortLinkResponse,
        SubscriptionBody,
        SubscriptionPageSchema,
    )),
    tags(
        (name = "auth", description = "Token login and logout"),
        (name = "users", description = "Accounts, profiles and avatars"),
        (name = "subscriptions", description = "Following recipe authors"),
        (name = "catalogue", description = "Tags and ingredients"),
        (name = "recipes", description = "Recipe publishing and browsing"),
        (name = "favorites", description = "Favourite recipes"),
        (name = "shopping cart", description = "Shopping cart and list download"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema<'a>(doc: &'a utoipa::openapi::OpenApi, name: &str) -> &'a RefOr<Schema> {
        doc.components
            .as_ref()
            .expect("components")
            .schemas
            .get(name)
            .unwrap_or_else(|| panic!("{name} schema should be registered"))
    }

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message"])]
    #[case("UserBody", &["id", "email", "username", "first_name", "last_name"])]
    #[case("RecipeBody", &["id", "author", "tags", "ingredients", "is_favorited", "is_in_shopping_cart", "cooking_time"])]
    #[case("RecipeCardBody", &["id", "name", "image", "cooking_time"])]
    #[case("TagBody", &["id", "name", "slug"])]
    #[case("RecipePageSchema", &["count", "next", "previous", "results"])]
    fn schemas_expose_expected_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schema = schema(&doc, name);
        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[rstest]
    #[case("/api/auth/token/login/")]
    #[case("/api/users/")]
    #[case("/api/users/me/avatar/")]
    #[case("/api/users/subscriptions/")]
    #[case("/api/users/{id}/subscribe/")]
    #[case("/api/tags/{id}/")]
    #[case("/api/ingredients/")]
    #[case("/api/recipes/")]
    #[case("/api/recipes/{id}/get-link/")]
    #[case("/api/recipes/{id}/favorite/")]
    #[case("/api/recipes/download_shopping_cart/")]
    #[case("/s/{slug}/")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths.paths.contains_key(path),
            "{path} should be documented"
        );
    }

    #[test]
    fn token_security_scheme_is_a_header() {
        let doc = ApiDoc::openapi();
        let scheme = doc
            .components
            .as_ref()
            .and_then(|components| components.security_schemes.get(TOKEN_SECURITY_SCHEME))
            .expect("token scheme");
        assert!(matches!(
            scheme,
            SecurityScheme::ApiKey(ApiKey::Header(_))
        ));
    }
}
