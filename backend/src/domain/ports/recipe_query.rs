//! Driving port for recipe reads and short-link resolution.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Recipe, RecipeId, RecipeListFilter, ShortLink, UserId};

use super::Listing;

/// Domain use-case port for browsing recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Filtered page of recipes, newest first.
    async fn list(
        &self,
        viewer: Option<UserId>,
        filter: RecipeListFilter,
        page: PageRequest,
    ) -> Result<Listing<Recipe>, Error>;

    /// One recipe as seen by `viewer`.
    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<Recipe, Error>;

    /// Short link assigned to a recipe.
    async fn short_link(&self, id: RecipeId) -> Result<ShortLink, Error>;

    /// Recipe a short link points at; not found for unknown or malformed slugs.
    async fn resolve_short_link(&self, slug: String) -> Result<RecipeId, Error>;
}
