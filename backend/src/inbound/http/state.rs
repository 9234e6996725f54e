//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{
    CatalogueQuery, LoginService, RecipeCommand, RecipeQuery, RecipeRelationCommand,
    ShoppingListQuery, SubscriptionCommand, SubscriptionQuery, UserAccountCommand, UsersQuery,
};
use crate::domain::{RecipeId, ShortLink};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub accounts: Arc<dyn UserAccountCommand>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub relations: Arc<dyn RecipeRelationCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionQuery>,
}

/// Absolute base URLs used when building links for clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrls {
    /// Base of the public API host; short links are served beneath it.
    pub public_url: Url,
    /// Base of the frontend; short links redirect to recipe pages there.
    pub site_url: Url,
}

impl PublicUrls {
    /// Bundle the two bases.
    pub fn new(public_url: Url, site_url: Url) -> Self {
        Self {
            public_url,
            site_url,
        }
    }

    /// Shareable URL for a short link: `<public_url>/s/<slug>/`.
    pub fn short_link_url(&self, link: &ShortLink) -> String {
        format!("{}/s/{link}/", trimmed(&self.public_url))
    }

    /// Frontend page for a recipe: `<site_url>/recipes/<id>/`.
    pub fn recipe_page_url(&self, id: RecipeId) -> String {
        format!("{}/recipes/{id}/", trimmed(&self.site_url))
    }
}

fn trimmed(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub accounts: Arc<dyn UserAccountCommand>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub relations: Arc<dyn RecipeRelationCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionQuery>,
    pub urls: PublicUrls,
}

impl HttpState {
    /// Construct state from the ports bundle and link bases.
    pub fn new(ports: HttpStatePorts, urls: PublicUrls) -> Self {
        let HttpStatePorts {
            login,
            users,
            accounts,
            catalogue,
            recipes,
            recipes_query,
            relations,
            shopping_list,
            subscriptions,
            subscriptions_query,
        } = ports;
        Self {
            login,
            users,
            accounts,
            catalogue,
            recipes,
            recipes_query,
            relations,
            shopping_list,
            subscriptions,
            subscriptions_query,
            urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn urls(public_url: &str, site_url: &str) -> PublicUrls {
        PublicUrls::new(
            Url::parse(public_url).expect("public url"),
            Url::parse(site_url).expect("site url"),
        )
    }

    #[rstest]
    #[case("https://foodgram.example")]
    #[case("https://foodgram.example/")]
    fn short_link_url_has_single_separator(#[case] base: &str) {
        let link = ShortLink::for_recipe(RecipeId::new(61)).expect("positive id");
        let url = urls(base, "https://app.example").short_link_url(&link);
        assert_eq!(url, format!("https://foodgram.example/s/{link}/"));
    }

    #[rstest]
    fn recipe_page_url_keeps_site_path_prefix() {
        let url = urls("https://api.example", "https://app.example/cook/")
            .recipe_page_url(RecipeId::new(7));
        assert_eq!(url, "https://app.example/cook/recipes/7/");
    }
}
