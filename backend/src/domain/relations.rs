//! User-to-recipe and user-to-author relations.
//!
//! Favorites, the shopping cart and subscriptions are toggled by their owning
//! user. Adding an existing relation and removing an absent one are both
//! client errors, never silent no-ops.

use std::fmt;

use crate::domain::{RecipeCard, UserProfile};

/// Relation a user can hold towards a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeRelation {
    /// Recipe bookmarked as a favorite.
    Favorite,
    /// Recipe queued in the shopping cart.
    ShoppingCart,
}

impl RecipeRelation {
    /// Human-readable collection name used in error messages.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl fmt::Display for RecipeRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Cap on the recipes embedded in a subscription view.
///
/// Only non-negative integers limit the list; anything else is ignored.
///
/// # Examples
/// ```
/// use backend::domain::RecipesLimit;
///
/// assert_eq!(RecipesLimit::parse(Some(" 3 ")).get(), Some(3));
/// assert_eq!(RecipesLimit::parse(Some("-1")).get(), None);
/// assert_eq!(RecipesLimit::parse(None).get(), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipesLimit(Option<u32>);

impl RecipesLimit {
    /// Interpret the raw `recipes_limit` query value.
    pub fn parse(raw: Option<&str>) -> Self {
        let limit = raw
            .map(str::trim)
            .filter(|value| !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()))
            .and_then(|value| value.parse::<u32>().ok());
        Self(limit)
    }

    /// Explicit limit.
    pub fn of(limit: u32) -> Self {
        Self(Some(limit))
    }

    /// Limit value, when one applies.
    pub fn get(self) -> Option<u32> {
        self.0
    }
}

/// An author together with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribedAuthor {
    pub profile: UserProfile,
    /// Newest first, truncated by [`RecipesLimit`].
    pub recipes: Vec<RecipeCard>,
    /// Total number of recipes by the author, regardless of the limit.
    pub recipes_count: u64,
}
