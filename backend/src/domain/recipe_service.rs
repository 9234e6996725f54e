//! Recipe domain service.
//!
//! Implements the recipe command and query driving ports: validates drafts,
//! stores images, enforces authorship and resolves short links.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{
    Listing, MediaFolder, MediaStore, MediaStoreError, RecipeCommand, RecipeQuery,
    RecipeRepository, RecipeRepositoryError,
};
use crate::domain::{
    Error, NewRecipe, Recipe, RecipeDraft, RecipeId, RecipeListFilter, RecipeOwnership,
    RecipeUpdate, ShortLink, UserId,
};

fn map_repository_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipeRepositoryError::UnknownTag { message } => Error::invalid_field(
            "tags",
            "does_not_exist",
            format!("unknown tag: {message}"),
        ),
        RecipeRepositoryError::UnknownIngredient { message } => Error::invalid_field(
            "ingredients",
            "does_not_exist",
            format!("unknown ingredient: {message}"),
        ),
    }
}

pub(crate) fn map_media_error(error: MediaStoreError) -> Error {
    match error {
        MediaStoreError::Io { message } => {
            Error::internal(format!("failed to store image: {message}"))
        }
    }
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

/// Recipe service implementing [`RecipeCommand`] and [`RecipeQuery`].
#[derive(Clone)]
pub struct RecipeService<R, M> {
    recipe_repo: Arc<R>,
    media_store: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<R, M> RecipeService<R, M> {
    /// Create a new service.
    ///
    /// `clock` stamps the publication date of new recipes.
    pub fn new(recipe_repo: Arc<R>, media_store: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            recipe_repo,
            media_store,
            clock,
        }
    }
}

impl<R, M> RecipeService<R, M>
where
    R: RecipeRepository,
    M: MediaStore,
{
    async fn load(&self, id: RecipeId, viewer: Option<UserId>) -> Result<Recipe, Error> {
        self.recipe_repo
            .find(id, viewer)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn authorise(&self, actor: UserId, id: RecipeId) -> Result<RecipeOwnership, Error> {
        let ownership = self
            .recipe_repo
            .find_ownership(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        if ownership.author != actor {
            return Err(Error::forbidden("only the author may modify this recipe"));
        }
        Ok(ownership)
    }
}

#[async_trait]
impl<R, M> RecipeCommand for RecipeService<R, M>
where
    R: RecipeRepository,
    M: MediaStore,
{
    async fn create(&self, author: UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        let (content, image) = draft.validate(true)?;
        let image = image
            .ok_or_else(|| Error::invalid_field("image", "required", "recipe image is required"))?;
        let image_url = self
            .media_store
            .save(MediaFolder::RecipeImages, &image)
            .await
            .map_err(map_media_error)?;

        let id = self
            .recipe_repo
            .create(&NewRecipe {
                author,
                content,
                image: image_url,
                pub_date: self.clock.utc(),
            })
            .await
            .map_err(map_repository_error)?;
        debug!(recipe_id = %id, author = %author, "recipe created");

        self.load(id, Some(author)).await
    }

    async fn update(
        &self,
        actor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<Recipe, Error> {
        let (content, image) = draft.validate(false)?;
        self.authorise(actor, id).await?;

        let image = match image {
            Some(upload) => Some(
                self.media_store
                    .save(MediaFolder::RecipeImages, &upload)
                    .await
                    .map_err(map_media_error)?,
            ),
            None => None,
        };
        self.recipe_repo
            .update(id, &RecipeUpdate { content, image })
            .await
            .map_err(map_repository_error)?;

        self.load(id, Some(actor)).await
    }

    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error> {
        self.authorise(actor, id).await?;
        let deleted = self
            .recipe_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(recipe_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl<R, M> RecipeQuery for RecipeService<R, M>
where
    R: RecipeRepository,
    M: MediaStore,
{
    async fn list(
        &self,
        viewer: Option<UserId>,
        filter: RecipeListFilter,
        page: PageRequest,
    ) -> Result<Listing<Recipe>, Error> {
        let filter = filter.for_viewer(viewer);
        self.recipe_repo
            .list(&filter, viewer, page)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<Recipe, Error> {
        self.load(id, viewer).await
    }

    async fn short_link(&self, id: RecipeId) -> Result<ShortLink, Error> {
        self.recipe_repo
            .find_short_link(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn resolve_short_link(&self, slug: String) -> Result<RecipeId, Error> {
        let link = ShortLink::parse(slug)
            .map_err(|err| Error::not_found(format!("short link not found: {err}")))?;
        self.recipe_repo
            .resolve_short_link(&link)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("short link {link} not found")))
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
