//! PostgreSQL-backed `SubscriptionRepository` implementation using Diesel ORM.
//!
//! Subscription views embed a preview of the author's newest recipes. The
//! previews for a whole page are fetched in one query and truncated in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{Listing, SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{RecipesLimit, SubscribedAuthor, UserId, UserProfile};

use super::diesel_basic_error_mapping::{
    ViolationKind, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
    warn_unmapped_violation,
};
use super::diesel_read_models::{count_to_u64, row_to_card, row_to_user, to_sql_bound};
use super::models::{RecipeCardRow, SubscriptionRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{recipes, subscriptions, users};

const AUTHOR_FKEY: &str = "subscriptions_author_id_fkey";
const NO_SELF_CHECK: &str = "subscriptions_no_self_subscription";

/// Diesel-backed implementation of the `SubscriptionRepository` port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    map_basic_pool_error(error, SubscriptionRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> SubscriptionRepositoryError {
    if let Some(violation) = constraint_violation(&error) {
        if violation.kind == ViolationKind::Unique {
            return SubscriptionRepositoryError::duplicate();
        }
        if violation.is(ViolationKind::ForeignKey, AUTHOR_FKEY) {
            return SubscriptionRepositoryError::missing_author();
        }
        if violation.is(ViolationKind::Check, NO_SELF_CHECK) {
            return SubscriptionRepositoryError::self_subscription();
        }
        warn_unmapped_violation(&violation);
    }
    map_basic_diesel_error(
        error,
        SubscriptionRepositoryError::query,
        SubscriptionRepositoryError::connection,
    )
}

/// Build subscription views for `rows`, preserving row order.
async fn subscribed_authors(
    conn: &mut AsyncPgConnection,
    rows: Vec<UserRow>,
    recipes_limit: RecipesLimit,
) -> Result<Vec<SubscribedAuthor>, DieselError> {
    let author_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let cards: Vec<RecipeCardRow> = recipes::table
        .filter(recipes::author_id.eq_any(&author_ids))
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .select(RecipeCardRow::as_select())
        .load(conn)
        .await?;

    let mut by_author: HashMap<i64, Vec<RecipeCardRow>> = HashMap::new();
    for card in cards {
        by_author.entry(card.author_id).or_default().push(card);
    }

    rows.into_iter()
        .map(|row| {
            let mut cards = by_author.remove(&row.id).unwrap_or_default();
            let recipes_count = u64::try_from(cards.len()).unwrap_or(u64::MAX);
            if let Some(limit) = recipes_limit.get() {
                cards.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            }
            let user = row_to_user(row)?;
            Ok(SubscribedAuthor {
                profile: UserProfile {
                    user,
                    is_subscribed: true,
                },
                recipes: cards.into_iter().map(row_to_card).collect(),
                recipes_count,
            })
        })
        .collect()
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn add(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subscriptions::table)
            .values(&SubscriptionRow {
                user_id: follower.get(),
                author_id: author.get(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(subscriptions::table.find((follower.get(), author.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list(
        &self,
        follower: UserId,
        page: PageRequest,
        recipes_limit: RecipesLimit,
    ) -> Result<Listing<SubscribedAuthor>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let followed = subscriptions::table
            .filter(subscriptions::user_id.eq(follower.get()))
            .select(subscriptions::author_id);

        let total: i64 = subscriptions::table
            .filter(subscriptions::user_id.eq(follower.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(followed))
            .order((users::username.asc(), users::id.asc()))
            .offset(to_sql_bound(page.offset()))
            .limit(to_sql_bound(u64::from(page.limit())))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = subscribed_authors(&mut conn, rows, recipes_limit)
            .await
            .map_err(map_diesel_error)?;
        Ok(Listing::new(items, count_to_u64(total)))
    }

    async fn find_author(
        &self,
        follower: UserId,
        author: UserId,
        recipes_limit: RecipesLimit,
    ) -> Result<Option<SubscribedAuthor>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let followed = subscriptions::table
            .filter(subscriptions::user_id.eq(follower.get()))
            .filter(subscriptions::author_id.eq(author.get()))
            .select(subscriptions::author_id);
        let row: Option<UserRow> = users::table
            .filter(users::id.eq_any(followed))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut views = subscribed_authors(&mut conn, vec![row], recipes_limit)
            .await
            .map_err(map_diesel_error)?;
        Ok(views.pop())
    }
}
