//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Writes touch `recipes`, `recipe_tags` and `recipe_ingredients` inside one
//! transaction. Reads load a page of recipe rows and hydrate authors, tags,
//! ingredients and the viewer's relation flags with one query per concern.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{Listing, RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    IngredientId, NewRecipe, Recipe, RecipeCard, RecipeContent, RecipeId, RecipeIngredient,
    RecipeListFilter, RecipeOwnership, RecipeUpdate, ShortLink, UserId,
};

use super::diesel_basic_error_mapping::{
    ViolationKind, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
    warn_unmapped_violation,
};
use super::diesel_read_models::{
    count_to_u64, invalid_row, load_profiles, row_to_card, row_to_tag, to_sql_bound,
};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeCardRow, RecipeChangeset, RecipeIngredientRow, RecipeRow,
    RecipeTagRow, TagRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts, tags,
};

const TAG_FKEY: &str = "recipe_tags_tag_id_fkey";
const INGREDIENT_FKEY: &str = "recipe_ingredients_ingredient_id_fkey";

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> RecipeRepositoryError {
    if let Some(violation) = constraint_violation(&error) {
        if violation.is(ViolationKind::ForeignKey, TAG_FKEY) {
            return RecipeRepositoryError::unknown_tag(TAG_FKEY);
        }
        if violation.is(ViolationKind::ForeignKey, INGREDIENT_FKEY) {
            return RecipeRepositoryError::unknown_ingredient(INGREDIENT_FKEY);
        }
        warn_unmapped_violation(&violation);
    }
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

/// Recipes matching `filter`, unordered and unpaged.
fn filtered<'a>(
    filter: &'a RecipeListFilter,
    viewer: Option<UserId>,
) -> recipes::BoxedQuery<'a, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author.get()));
    }

    if !filter.tags.is_empty() {
        let slugs: Vec<&str> = filter.tags.iter().map(AsRef::as_ref).collect();
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(slugs))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    let Some(viewer) = viewer else {
        return query;
    };

    if let Some(wanted) = filter.is_favorited {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(viewer.get()))
            .select(favorites::recipe_id);
        query = if wanted {
            query.filter(recipes::id.eq_any(favorited))
        } else {
            query.filter(diesel::dsl::not(recipes::id.eq_any(favorited)))
        };
    }

    if let Some(wanted) = filter.is_in_shopping_cart {
        let in_cart = shopping_carts::table
            .filter(shopping_carts::user_id.eq(viewer.get()))
            .select(shopping_carts::recipe_id);
        query = if wanted {
            query.filter(recipes::id.eq_any(in_cart))
        } else {
            query.filter(diesel::dsl::not(recipes::id.eq_any(in_cart)))
        };
    }

    query
}

/// Recipe ids among `ids` present in the viewer's favorites or cart.
async fn viewer_relations(
    conn: &mut AsyncPgConnection,
    viewer: Option<UserId>,
    ids: &[i64],
) -> Result<(HashSet<i64>, HashSet<i64>), DieselError> {
    let Some(viewer) = viewer else {
        return Ok((HashSet::new(), HashSet::new()));
    };
    let favorited: Vec<i64> = favorites::table
        .filter(favorites::user_id.eq(viewer.get()))
        .filter(favorites::recipe_id.eq_any(ids))
        .select(favorites::recipe_id)
        .load(conn)
        .await?;
    let in_cart: Vec<i64> = shopping_carts::table
        .filter(shopping_carts::user_id.eq(viewer.get()))
        .filter(shopping_carts::recipe_id.eq_any(ids))
        .select(shopping_carts::recipe_id)
        .load(conn)
        .await?;
    Ok((
        favorited.into_iter().collect(),
        in_cart.into_iter().collect(),
    ))
}

/// Build full recipes from rows, preserving row order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
    viewer: Option<UserId>,
) -> Result<Vec<Recipe>, DieselError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut author_ids: Vec<i64> = rows.iter().map(|row| row.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors = load_profiles(conn, &author_ids, viewer).await?;

    let tag_rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;
    let mut tags_by_recipe: HashMap<i64, Vec<_>> = HashMap::new();
    for (recipe_id, row) in tag_rows {
        tags_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(row_to_tag(row));
    }

    let ingredient_rows: Vec<(i64, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await?;
    let mut ingredients_by_recipe: HashMap<i64, Vec<_>> = HashMap::new();
    for (recipe_id, amount, row) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredient {
                id: IngredientId::new(row.id),
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount,
            });
    }

    let (favorited, in_cart) = viewer_relations(conn, viewer, &ids).await?;

    rows.into_iter()
        .map(|row| {
            let author = match authors.get(&row.author_id) {
                Some(profile) => profile.clone(),
                None => return Err(invalid_row("recipe", row.id, "author is missing")),
            };
            let Some(short_link) = row.short_link else {
                return Err(invalid_row("recipe", row.id, "short link is missing"));
            };
            Ok(Recipe {
                id: RecipeId::new(row.id),
                author,
                name: row.name,
                image: row.image,
                text: row.text,
                cooking_time: row.cooking_time,
                pub_date: row.pub_date,
                short_link,
                tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                ingredients: ingredients_by_recipe.remove(&row.id).unwrap_or_default(),
                is_favorited: favorited.contains(&row.id),
                is_in_shopping_cart: in_cart.contains(&row.id),
            })
        })
        .collect()
}

/// Store the base62 slug of a freshly inserted recipe.
async fn assign_short_link(conn: &mut AsyncPgConnection, id: i64) -> Result<(), DieselError> {
    let link = ShortLink::for_recipe(RecipeId::new(id))
        .map_err(|err| DieselError::SerializationError(Box::new(err)))?;
    diesel::update(recipes::table.find(id))
        .set(recipes::short_link.eq(link.as_ref()))
        .execute(conn)
        .await?;
    Ok(())
}

/// Insert the tag and ingredient links of `content` for `recipe_id`.
async fn insert_links(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    content: &RecipeContent,
) -> Result<(), DieselError> {
    let tag_rows: Vec<RecipeTagRow> = content
        .tag_ids
        .iter()
        .map(|tag| RecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
        })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&tag_rows)
        .execute(conn)
        .await?;

    let ingredient_rows: Vec<RecipeIngredientRow> = content
        .ingredients
        .iter()
        .map(|item| RecipeIngredientRow {
            recipe_id,
            ingredient_id: item.ingredient_id.get(),
            amount: item.amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&ingredient_rows)
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRecipeRow {
            author_id: recipe.author.get(),
            name: &recipe.content.name,
            image: &recipe.image,
            text: &recipe.content.text,
            cooking_time: recipe.content.cooking_time,
            pub_date: recipe.pub_date,
        };
        let content = &recipe.content;

        let id = conn
            .transaction(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    assign_short_link(conn, id).await?;
                    insert_links(conn, id, content).await?;
                    Ok::<_, DieselError>(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(RecipeId::new(id))
    }

    async fn update(
        &self,
        id: RecipeId,
        update: &RecipeUpdate,
    ) -> Result<(), RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = RecipeChangeset {
            name: &update.content.name,
            text: &update.content.text,
            cooking_time: update.content.cooking_time,
            image: update.image.as_deref(),
        };
        let content = &update.content;
        let recipe_id = id.get();

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(recipes::table.find(recipe_id))
                    .set(&changeset)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(DieselError::NotFound);
                }
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                )
                .execute(conn)
                .await?;
                insert_links(conn, recipe_id, content).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_ownership(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeOwnership>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let author: Option<i64> = recipes::table
            .find(id.get())
            .select(recipes::author_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(author.map(|author| RecipeOwnership {
            id,
            author: UserId::new(author),
        }))
    }

    async fn find(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut hydrated = hydrate(&mut conn, vec![row], viewer)
            .await
            .map_err(map_diesel_error)?;
        Ok(hydrated.pop())
    }

    async fn list(
        &self,
        filter: &RecipeListFilter,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(filter, viewer)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<RecipeRow> = filtered(filter, viewer)
            .order((recipes::pub_date.desc(), recipes::id.desc()))
            .offset(to_sql_bound(page.offset()))
            .limit(to_sql_bound(u64::from(page.limit())))
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = hydrate(&mut conn, rows, viewer)
            .await
            .map_err(map_diesel_error)?;
        Ok(Listing::new(items, count_to_u64(total)))
    }

    async fn find_card(&self, id: RecipeId) -> Result<Option<RecipeCard>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeCardRow> = recipes::table
            .find(id.get())
            .select(RecipeCardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_card))
    }

    async fn find_short_link(
        &self,
        id: RecipeId,
    ) -> Result<Option<ShortLink>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<Option<String>> = recipes::table
            .find(id.get())
            .select(recipes::short_link)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(stored) = stored else {
            return Ok(None);
        };
        let raw = stored.ok_or_else(|| {
            RecipeRepositoryError::query(format!("recipe {id} has no short link"))
        })?;
        ShortLink::parse(raw)
            .map(Some)
            .map_err(|err| RecipeRepositoryError::query(err.to_string()))
    }

    async fn resolve_short_link(
        &self,
        link: &ShortLink,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: Option<i64> = recipes::table
            .filter(recipes::short_link.eq(link.as_ref()))
            .select(recipes::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(id.map(RecipeId::new))
    }
}
