//! Row-to-domain conversion and read helpers shared by the repositories.
//!
//! Stored rows are re-validated through the domain constructors. A row that
//! fails validation surfaces as a Diesel deserialisation error, which the
//! adapters report as a query failure.

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{
    EmailAddress, Ingredient, IngredientId, PersonName, RecipeCard, RecipeId, Tag, TagId, User,
    UserId, UserProfile, Username,
};

use super::models::{IngredientRow, RecipeCardRow, TagRow, UserRow};
use super::schema::{subscriptions, users};

#[derive(Debug, thiserror::Error)]
#[error("stored {entity} {id} is invalid: {reason}")]
struct InvalidStoredRow {
    entity: &'static str,
    id: i64,
    reason: String,
}

/// Wrap a validation failure of a stored row as a Diesel error.
pub(crate) fn invalid_row(entity: &'static str, id: i64, reason: impl ToString) -> DieselError {
    DieselError::DeserializationError(Box::new(InvalidStoredRow {
        entity,
        id,
        reason: reason.to_string(),
    }))
}

pub(crate) fn row_to_user(row: UserRow) -> Result<User, DieselError> {
    let id = row.id;
    let invalid = |err: crate::domain::UserValidationError| invalid_row("user", id, err);
    Ok(User {
        id: UserId::new(row.id),
        email: EmailAddress::new(&row.email).map_err(invalid)?,
        username: Username::new(row.username).map_err(invalid)?,
        first_name: PersonName::new("first_name", row.first_name).map_err(invalid)?,
        last_name: PersonName::new("last_name", row.last_name).map_err(invalid)?,
        avatar: row.avatar,
    })
}

pub(crate) fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: TagId::new(row.id),
        name: row.name,
        slug: row.slug,
    }
}

pub(crate) fn row_to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: IngredientId::new(row.id),
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

pub(crate) fn row_to_card(row: RecipeCardRow) -> RecipeCard {
    RecipeCard {
        id: RecipeId::new(row.id),
        name: row.name,
        image: row.image,
        cooking_time: row.cooking_time,
    }
}

/// Authors among `author_ids` that `viewer` follows.
pub(crate) async fn followed_authors(
    conn: &mut AsyncPgConnection,
    viewer: Option<UserId>,
    author_ids: &[i64],
) -> Result<HashSet<i64>, DieselError> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    let followed: Vec<i64> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer.get()))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load(conn)
        .await?;
    Ok(followed.into_iter().collect())
}

/// Attach the viewer's subscription flag to loaded user rows.
pub(crate) async fn rows_to_profiles(
    conn: &mut AsyncPgConnection,
    rows: Vec<UserRow>,
    viewer: Option<UserId>,
) -> Result<Vec<UserProfile>, DieselError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let followed = followed_authors(conn, viewer, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let is_subscribed = followed.contains(&row.id);
            row_to_user(row).map(|user| UserProfile {
                user,
                is_subscribed,
            })
        })
        .collect()
}

/// Profiles for `ids` as seen by `viewer`, keyed by user id.
pub(crate) async fn load_profiles(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
    viewer: Option<UserId>,
) -> Result<HashMap<i64, UserProfile>, DieselError> {
    let rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(ids))
        .select(UserRow::as_select())
        .load(conn)
        .await?;
    let profiles = rows_to_profiles(conn, rows, viewer).await?;
    Ok(profiles
        .into_iter()
        .map(|profile| (profile.user.id.get(), profile))
        .collect())
}

/// Convert a non-negative `COUNT(*)` result.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Convert a page offset or limit into a SQL bind value.
pub(crate) fn to_sql_bound(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
