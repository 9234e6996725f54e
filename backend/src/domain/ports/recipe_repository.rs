//! Driven port for recipe persistence.
//!
//! Adapters own the multi-row writes: a recipe, its tag links and its
//! ingredient amounts are written in one transaction, and the short link is
//! assigned inside that same transaction once the id is known.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    NewRecipe, Recipe, RecipeCard, RecipeId, RecipeListFilter, RecipeOwnership, RecipeUpdate,
    ShortLink, UserId,
};

use super::{Listing, define_port_error};

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "recipe repository query failed: {message}",
        /// A referenced tag does not exist.
        UnknownTag { message: String } => "unknown tag: {message}",
        /// A referenced ingredient does not exist.
        UnknownIngredient { message: String } => "unknown ingredient: {message}",
    }
}

/// Port for reading and writing recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its tags and ingredients and assign its short link.
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError>;

    /// Replace the recipe fields together with its full tag and ingredient set.
    async fn update(&self, id: RecipeId, update: &RecipeUpdate)
    -> Result<(), RecipeRepositoryError>;

    /// Delete a recipe; dependent rows cascade. Returns whether a row existed.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Author of a recipe, used for authorisation.
    async fn find_ownership(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeOwnership>, RecipeRepositoryError>;

    /// Full recipe as seen by `viewer`.
    async fn find(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Filtered page of recipes, newest first, as seen by `viewer`.
    async fn list(
        &self,
        filter: &RecipeListFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<Recipe>, RecipeRepositoryError>;

    /// Compact card for a recipe.
    async fn find_card(&self, id: RecipeId) -> Result<Option<RecipeCard>, RecipeRepositoryError>;

    /// Stored short link of a recipe.
    async fn find_short_link(
        &self,
        id: RecipeId,
    ) -> Result<Option<ShortLink>, RecipeRepositoryError>;

    /// Recipe whose stored short link equals `link`.
    async fn resolve_short_link(
        &self,
        link: &ShortLink,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError>;
}
