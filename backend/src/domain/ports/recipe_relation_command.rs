//! Driving ports for favorites and the shopping cart.

use async_trait::async_trait;

use crate::domain::{Error, RecipeCard, RecipeId, RecipeRelation, ShoppingListReport, UserId};

/// Domain use-case port toggling a user's relation to a recipe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRelationCommand: Send + Sync {
    /// Add the recipe to the user's collection and return its card.
    async fn add(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<RecipeCard, Error>;

    /// Remove the recipe from the user's collection.
    async fn remove(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<(), Error>;
}

/// Domain use-case port exporting the shopping list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    /// Aggregated ingredients of every recipe in the user's cart.
    async fn download_shopping_cart(&self, user: UserId) -> Result<ShoppingListReport, Error>;
}
