//! Driven port for favorites and the shopping cart.

use async_trait::async_trait;

use crate::domain::{IngredientOccurrence, RecipeId, RecipeRelation, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe relation adapters.
    pub enum RecipeRelationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "relation repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "relation repository query failed: {message}",
        /// The `(user, recipe)` pair is already present.
        Duplicate => "relation already exists",
        /// The target recipe does not exist.
        MissingRecipe => "recipe does not exist",
    }
}

/// Port for toggling user-to-recipe relations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRelationRepository: Send + Sync {
    /// Insert the relation.
    ///
    /// Unique violations, including ones raised by a concurrent insert, map to
    /// [`RecipeRelationRepositoryError::Duplicate`].
    async fn add(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<(), RecipeRelationRepositoryError>;

    /// Delete the relation. Returns whether a row was removed.
    async fn remove(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<bool, RecipeRelationRepositoryError>;

    /// Ingredient amounts across every recipe in the user's shopping cart.
    ///
    /// Adapters may pre-group by `(name, unit)`.
    async fn shopping_cart_ingredients(
        &self,
        user: UserId,
    ) -> Result<Vec<IngredientOccurrence>, RecipeRelationRepositoryError>;
}
