//! Catalogue read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

fn map_repository_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<R> {
    catalogue_repo: Arc<R>,
}

impl<R> CatalogueService<R> {
    /// Create a new service with the catalogue repository.
    pub fn new(catalogue_repo: Arc<R>) -> Self {
        Self { catalogue_repo }
    }
}

#[async_trait]
impl<R> CatalogueQuery for CatalogueService<R>
where
    R: CatalogueRepository,
{
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        self.catalogue_repo
            .list_tags()
            .await
            .map_err(map_repository_error)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, Error> {
        self.catalogue_repo
            .find_tag(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn list_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let part = name
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self.catalogue_repo
            .list_ingredients(part)
            .await
            .map_err(map_repository_error)
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.catalogue_repo
            .find_ingredient(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
