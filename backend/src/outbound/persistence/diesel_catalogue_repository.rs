//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel ORM.
//!
//! Serves the read-only tag and ingredient dictionaries and the bulk
//! ingredient loader used by the `load-ingredients` binary.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Ingredient, IngredientId, IngredientSeed, Tag, TagId};

use super::diesel_basic_error_mapping::{
    escape_like, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_read_models::{row_to_ingredient, row_to_tag};
use super::models::{IngredientRow, NewIngredientRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

diesel::define_sql_function!(fn lower(value: Text) -> Text);

/// Rows per `INSERT` statement when bulk loading ingredients.
const INSERT_CHUNK: usize = 1_000;

/// Diesel-backed implementation of the `CatalogueRepository` port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order(tags::id.asc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_tag))
    }

    async fn list_ingredients(
        &self,
        name_part: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .into_boxed();
        if let Some(part) = name_part {
            let pattern = format!("%{}%", escape_like(&part.to_lowercase()));
            query = query.filter(lower(ingredients::name).like(pattern));
        }
        let rows: Vec<IngredientRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_ingredient))
    }

    async fn insert_ingredients(
        &self,
        seeds: &[IngredientSeed],
    ) -> Result<u64, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut inserted = 0_u64;
        for chunk in seeds.chunks(INSERT_CHUNK) {
            let rows: Vec<NewIngredientRow<'_>> = chunk
                .iter()
                .map(|seed| NewIngredientRow {
                    name: seed.name(),
                    measurement_unit: seed.measurement_unit(),
                })
                .collect();
            let count = diesel::insert_into(ingredients::table)
                .values(&rows)
                .on_conflict((ingredients::name, ingredients::measurement_unit))
                .do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            inserted += u64::try_from(count).unwrap_or_default();
        }
        Ok(inserted)
    }
}
