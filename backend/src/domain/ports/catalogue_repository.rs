//! Driven port for ingredient and tag catalogue storage.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, IngredientSeed, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "catalogue repository query failed: {message}",
    }
}

/// Port for reading and seeding the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// All tags ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    /// Fetch a tag by identifier.
    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError>;

    /// Ingredients ordered by name, optionally restricted to names
    /// containing `name_part`, ignoring case.
    async fn list_ingredients(
        &self,
        name_part: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    /// Fetch an ingredient by identifier.
    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    /// Insert ingredients, skipping `(name, unit)` pairs already present.
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_ingredients(
        &self,
        seeds: &[IngredientSeed],
    ) -> Result<u64, CatalogueRepositoryError>;
}
