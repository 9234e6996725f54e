//! Driving port for catalogue reads.
//!
//! Inbound adapters list and fetch tags and ingredients through this port
//! without importing persistence details.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Domain use-case port for the read-only catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Every tag.
    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    /// One tag; not found when missing.
    async fn get_tag(&self, id: TagId) -> Result<Tag, Error>;

    /// Ingredients whose name starts with `name` (case-insensitive).
    async fn list_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error>;

    /// One ingredient; not found when missing.
    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}
