//! Driving port for recipe mutations.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeDraft, RecipeId, UserId};

/// Domain use-case port for creating, editing and deleting recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Publish a recipe authored by `author`. The image is required.
    async fn create(&self, author: UserId, draft: RecipeDraft) -> Result<Recipe, Error>;

    /// Replace a recipe's content. Only its author may do this.
    async fn update(&self, actor: UserId, id: RecipeId, draft: RecipeDraft)
    -> Result<Recipe, Error>;

    /// Delete a recipe. Only its author may do this.
    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error>;
}
