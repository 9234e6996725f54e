//! Favorites, shopping cart and shopping-list export.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    RecipeRelationCommand, RecipeRelationRepository, RecipeRelationRepositoryError,
    RecipeRepository, RecipeRepositoryError, ShoppingListQuery,
};
use crate::domain::{
    Error, RecipeCard, RecipeId, RecipeRelation, ShoppingListReport, UserId,
};

fn map_relation_error(error: RecipeRelationRepositoryError) -> Error {
    match error {
        RecipeRelationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("relation repository unavailable: {message}"))
        }
        RecipeRelationRepositoryError::Query { message } => {
            Error::internal(format!("relation repository error: {message}"))
        }
        // Callers translate these with the relation in hand.
        RecipeRelationRepositoryError::Duplicate => {
            Error::invalid_request("relation already exists")
        }
        RecipeRelationRepositoryError::MissingRecipe => Error::not_found("recipe not found"),
    }
}

fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        other => Error::internal(format!("recipe repository error: {other}")),
    }
}

/// Service implementing [`RecipeRelationCommand`] and [`ShoppingListQuery`].
#[derive(Clone)]
pub struct RecipeRelationService<R, Q> {
    relation_repo: Arc<R>,
    recipe_repo: Arc<Q>,
}

impl<R, Q> RecipeRelationService<R, Q> {
    /// Create a new service.
    pub fn new(relation_repo: Arc<R>, recipe_repo: Arc<Q>) -> Self {
        Self {
            relation_repo,
            recipe_repo,
        }
    }
}

impl<R, Q> RecipeRelationService<R, Q>
where
    R: RecipeRelationRepository,
    Q: RecipeRepository,
{
    async fn card(&self, recipe: RecipeId) -> Result<Option<RecipeCard>, Error> {
        self.recipe_repo
            .find_card(recipe)
            .await
            .map_err(map_recipe_error)
    }
}

#[async_trait]
impl<R, Q> RecipeRelationCommand for RecipeRelationService<R, Q>
where
    R: RecipeRelationRepository,
    Q: RecipeRepository,
{
    async fn add(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<RecipeCard, Error> {
        self.relation_repo
            .add(user, recipe, relation)
            .await
            .map_err(|err| match err {
                RecipeRelationRepositoryError::Duplicate => Error::invalid_request(format!(
                    "recipe {recipe} is already in {}",
                    relation.collection()
                )),
                RecipeRelationRepositoryError::MissingRecipe => {
                    Error::not_found(format!("recipe {recipe} not found"))
                }
                other => map_relation_error(other),
            })?;
        debug!(user = %user, recipe = %recipe, %relation, "relation added");

        self.card(recipe)
            .await?
            .ok_or_else(|| Error::not_found(format!("recipe {recipe} not found")))
    }

    async fn remove(
        &self,
        user: UserId,
        recipe: RecipeId,
        relation: RecipeRelation,
    ) -> Result<(), Error> {
        let removed = self
            .relation_repo
            .remove(user, recipe, relation)
            .await
            .map_err(map_relation_error)?;
        if removed {
            return Ok(());
        }
        if self.card(recipe).await?.is_none() {
            return Err(Error::not_found(format!("recipe {recipe} not found")));
        }
        Err(Error::invalid_request(format!(
            "recipe {recipe} is not in {}",
            relation.collection()
        )))
    }
}

#[async_trait]
impl<R, Q> ShoppingListQuery for RecipeRelationService<R, Q>
where
    R: RecipeRelationRepository,
    Q: RecipeRepository,
{
    async fn download_shopping_cart(&self, user: UserId) -> Result<ShoppingListReport, Error> {
        let occurrences = self
            .relation_repo
            .shopping_cart_ingredients(user)
            .await
            .map_err(map_relation_error)?;
        Ok(ShoppingListReport::aggregate(occurrences))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::sample_card;
    use crate::domain::ports::{MockRecipeRelationRepository, MockRecipeRepository};
    use crate::domain::{ErrorCode, IngredientOccurrence};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn service(
        relations: MockRecipeRelationRepository,
        recipes: MockRecipeRepository,
    ) -> RecipeRelationService<MockRecipeRelationRepository, MockRecipeRepository> {
        RecipeRelationService::new(Arc::new(relations), Arc::new(recipes))
    }

    #[rstest]
    #[case(RecipeRelation::Favorite)]
    #[case(RecipeRelation::ShoppingCart)]
    #[tokio::test]
    async fn add_returns_recipe_card(#[case] relation: RecipeRelation) {
        let mut relations = MockRecipeRelationRepository::new();
        relations
            .expect_add()
            .with(eq(UserId::new(1)), eq(RecipeId::new(4)), eq(relation))
            .times(1)
            .return_once(|_, _, _| Ok(()));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_card()
            .return_once(|_| Ok(Some(sample_card(4))));

        let card = service(relations, recipes)
            .add(UserId::new(1), RecipeId::new(4), relation)
            .await
            .expect("add succeeds");
        assert_eq!(card.id, RecipeId::new(4));
    }

    #[tokio::test]
    async fn duplicate_add_is_invalid_request() {
        let mut relations = MockRecipeRelationRepository::new();
        relations
            .expect_add()
            .return_once(|_, _, _| Err(RecipeRelationRepositoryError::duplicate()));

        let error = service(relations, MockRecipeRepository::new())
            .add(UserId::new(1), RecipeId::new(4), RecipeRelation::Favorite)
            .await
            .expect_err("duplicate");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert!(error.message().contains("favorites"));
    }

    #[tokio::test]
    async fn add_for_missing_recipe_is_not_found() {
        let mut relations = MockRecipeRelationRepository::new();
        relations
            .expect_add()
            .return_once(|_, _, _| Err(RecipeRelationRepositoryError::missing_recipe()));

        let error = service(relations, MockRecipeRepository::new())
            .add(UserId::new(1), RecipeId::new(4), RecipeRelation::ShoppingCart)
            .await
            .expect_err("missing recipe");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn removing_absent_relation_is_invalid_request() {
        let mut relations = MockRecipeRelationRepository::new();
        relations.expect_remove().return_once(|_, _, _| Ok(false));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_card()
            .return_once(|_| Ok(Some(sample_card(4))));

        let error = service(relations, recipes)
            .remove(UserId::new(1), RecipeId::new(4), RecipeRelation::ShoppingCart)
            .await
            .expect_err("absent relation");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn removing_from_missing_recipe_is_not_found() {
        let mut relations = MockRecipeRelationRepository::new();
        relations.expect_remove().return_once(|_, _, _| Ok(false));
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_find_card().return_once(|_| Ok(None));

        let error = service(relations, recipes)
            .remove(UserId::new(1), RecipeId::new(4), RecipeRelation::Favorite)
            .await
            .expect_err("missing recipe");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn successful_remove_skips_recipe_lookup() {
        let mut relations = MockRecipeRelationRepository::new();
        relations.expect_remove().return_once(|_, _, _| Ok(true));
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_find_card().times(0);

        service(relations, recipes)
            .remove(UserId::new(1), RecipeId::new(4), RecipeRelation::Favorite)
            .await
            .expect("remove succeeds");
    }

    #[tokio::test]
    async fn shopping_cart_is_aggregated() {
        let mut relations = MockRecipeRelationRepository::new();
        relations
            .expect_shopping_cart_ingredients()
            .with(eq(UserId::new(2)))
            .return_once(|_| {
                Ok(vec![
                    IngredientOccurrence::new("sugar", "g", 100),
                    IngredientOccurrence::new("eggs", "pcs", 2),
                    IngredientOccurrence::new("sugar", "g", 50),
                ])
            });

        let report = service(relations, MockRecipeRepository::new())
            .download_shopping_cart(UserId::new(2))
            .await
            .expect("download succeeds");
        assert_eq!(report.render(), "eggs - 2 pcs\nsugar - 150 g\n");
    }
}
