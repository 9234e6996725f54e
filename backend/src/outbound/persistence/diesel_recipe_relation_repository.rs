//! PostgreSQL-backed `RecipeRelationRepository` implementation using Diesel ORM.
//!
//! Favorites and the shopping cart live in two tables of identical shape.
//! Inserts rely on the primary key for uniqueness and on the recipe foreign
//! key for existence, so each toggle is a single statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecipeRelationRepository, RecipeRelationRepositoryError};
use crate::domain::{IngredientOccurrence, RecipeId, RecipeRelation, UserId};

use super::diesel_basic_error_mapping::{
    ViolationKind, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
    warn_unmapped_violation,
};
use super::models::{FavoriteRow, ShoppingCartRow};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, ingredients, recipe_ingredients, shopping_carts};

const RECIPE_FKEYS: [&str; 2] = ["favorites_recipe_id_fkey", "shopping_carts_recipe_id_fkey"];

/// Diesel-backed implementation of the `RecipeRelationRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRelationRepository {
    pool: DbPool,
}

impl DieselRecipeRelationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRelationRepositoryError {
    map_basic_pool_error(error, RecipeRelationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRelationRepositoryError {
    if let Some(violation) = constraint_violation(&error) {
        match violation.kind {
            ViolationKind::Unique => return RecipeRelationRepositoryError::duplicate(),
            ViolationKind::ForeignKey
                if RECIPE_FKEYS
                    .iter()
                    .any(|name| violation.is(ViolationKind::ForeignKey, name)) =>
            {
                return RecipeRelationRepositoryError::missing_recipe();
            }
            _ => warn_unmapped_violation(&violation),
        }
    }
    map_basic_diesel_error(
        error,
        RecipeRelationRepositoryError::query,
        RecipeRelationRepositoryError::connection,
    )
}

#[async_trait]
impl RecipeRelationRepository for DieselRecipeRelationRepository {
    async fn add(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<(), RecipeRelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (user_id, recipe_id) = (user.get(), recipe.get());
        let inserted = match relation {
            RecipeRelation::Favorite => {
                diesel::insert_into(favorites::table)
                    .values(&FavoriteRow { user_id, recipe_id })
                    .execute(&mut conn)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                diesel::insert_into(shopping_carts::table)
                    .values(&ShoppingCartRow { user_id, recipe_id })
                    .execute(&mut conn)
                    .await
            }
        };
        inserted.map(|_| ()).map_err(map_diesel_error)
    }

    async fn remove(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<bool, RecipeRelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = (user.get(), recipe.get());
        let deleted = match relation {
            RecipeRelation::Favorite => {
                diesel::delete(favorites::table.find(key))
                    .execute(&mut conn)
                    .await
            }
            RecipeRelation::ShoppingCart => {
                diesel::delete(shopping_carts::table.find(key))
                    .execute(&mut conn)
                    .await
            }
        };
        deleted.map(|rows| rows > 0).map_err(map_diesel_error)
    }

    async fn shopping_cart_ingredients(
        &self,
        user: UserId,
    ) -> Result<Vec<IngredientOccurrence>, RecipeRelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, String, Option<i64>)> = shopping_carts::table
            .inner_join(
                recipe_ingredients::table
                    .on(recipe_ingredients::recipe_id.eq(shopping_carts::recipe_id)),
            )
            .inner_join(
                ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)),
            )
            .filter(shopping_carts::user_id.eq(user.get()))
            .group_by((ingredients::name, ingredients::measurement_unit))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                diesel::dsl::sum(recipe_ingredients::amount),
            ))
            .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(name, unit, total)| {
                let amount = total.and_then(|sum| u64::try_from(sum).ok()).unwrap_or_default();
                IngredientOccurrence::new(name, unit, amount)
            })
            .collect())
    }
}
