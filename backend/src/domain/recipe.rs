//! Recipe aggregate.
//!
//! A recipe is owned by its author and carries a full set of tags and
//! ingredient amounts. Writes always supply the complete set; updates replace
//! it wholesale rather than diffing.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::catalogue::numeric_id;
use crate::domain::{
    Error, ImageUpload, ImageUploadError, IngredientId, Tag, TagId, TagSlug, UserId, UserProfile,
};

/// Maximum length of a recipe name.
pub const RECIPE_NAME_MAX: usize = 50;
/// Smallest accepted cooking time and ingredient amount.
pub const QUANTITY_MIN: i64 = 1;
/// Largest accepted cooking time and ingredient amount.
pub const QUANTITY_MAX: i64 = 32_000;

numeric_id! {
    /// Recipe identifier.
    RecipeId
}

/// Validation failures for recipe writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("recipe name must not be empty")]
    EmptyName,
    #[error("recipe name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("recipe text must not be empty")]
    EmptyText,
    #[error("cooking time must be between {min} and {max} minutes")]
    CookingTimeOutOfRange { min: i64, max: i64 },
    #[error("at least one tag is required")]
    NoTags,
    #[error("tags must be unique")]
    DuplicateTags,
    #[error("at least one ingredient is required")]
    NoIngredients,
    #[error("ingredients must be unique")]
    DuplicateIngredients,
    #[error("ingredient amount must be between {min} and {max}")]
    AmountOutOfRange { min: i64, max: i64 },
    #[error("recipe image is required")]
    ImageRequired,
    #[error(transparent)]
    Image(#[from] ImageUploadError),
}

impl RecipeValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyText => "text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::NoTags | Self::DuplicateTags => "tags",
            Self::NoIngredients | Self::DuplicateIngredients | Self::AmountOutOfRange { .. } => {
                "ingredients"
            }
            Self::ImageRequired | Self::Image(_) => "image",
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyText => "blank",
            Self::NameTooLong { .. } => "max_length",
            Self::CookingTimeOutOfRange { .. } | Self::AmountOutOfRange { .. } => "out_of_range",
            Self::NoTags | Self::NoIngredients | Self::ImageRequired => "required",
            Self::DuplicateTags | Self::DuplicateIngredients => "duplicate",
            Self::Image(_) => "invalid",
        }
    }
}

impl From<RecipeValidationError> for Error {
    fn from(value: RecipeValidationError) -> Self {
        Error::invalid_field(value.field(), value.reason(), value.to_string())
    }
}

/// Ingredient reference with its amount, as supplied by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: i32,
}

/// Unvalidated recipe write payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<(IngredientId, i64)>,
    /// Base64 data URI; optional on update to keep the stored image.
    pub image: Option<String>,
}

/// Validated recipe fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeContent {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub tag_ids: Vec<TagId>,
    pub ingredients: Vec<IngredientAmount>,
}

fn quantity(value: i64) -> Option<i32> {
    (QUANTITY_MIN..=QUANTITY_MAX)
        .contains(&value)
        .then(|| i32::try_from(value).ok())
        .flatten()
}

impl RecipeDraft {
    /// Validate the draft, decoding the image when present.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{IngredientId, RecipeDraft, TagId};
    ///
    /// let draft = RecipeDraft {
    ///     name: "Porridge".into(),
    ///     text: "Boil oats.".into(),
    ///     cooking_time: 10,
    ///     tags: vec![TagId::new(1)],
    ///     ingredients: vec![(IngredientId::new(3), 200)],
    ///     image: None,
    /// };
    /// let (content, image) = draft.validate(false).unwrap();
    /// assert_eq!(content.cooking_time, 10);
    /// assert!(image.is_none());
    /// ```
    pub fn validate(
        self,
        require_image: bool,
    ) -> Result<(RecipeContent, Option<ImageUpload>), RecipeValidationError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        if self.text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        let cooking_time =
            quantity(self.cooking_time).ok_or(RecipeValidationError::CookingTimeOutOfRange {
                min: QUANTITY_MIN,
                max: QUANTITY_MAX,
            })?;

        if self.tags.is_empty() {
            return Err(RecipeValidationError::NoTags);
        }
        let distinct_tags: HashSet<TagId> = self.tags.iter().copied().collect();
        if distinct_tags.len() != self.tags.len() {
            return Err(RecipeValidationError::DuplicateTags);
        }

        if self.ingredients.is_empty() {
            return Err(RecipeValidationError::NoIngredients);
        }
        let distinct_ingredients: HashSet<IngredientId> =
            self.ingredients.iter().map(|(id, _)| *id).collect();
        if distinct_ingredients.len() != self.ingredients.len() {
            return Err(RecipeValidationError::DuplicateIngredients);
        }
        let ingredients = self
            .ingredients
            .iter()
            .map(|(ingredient_id, amount)| {
                quantity(*amount)
                    .map(|amount| IngredientAmount {
                        ingredient_id: *ingredient_id,
                        amount,
                    })
                    .ok_or(RecipeValidationError::AmountOutOfRange {
                        min: QUANTITY_MIN,
                        max: QUANTITY_MAX,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let image = match self.image.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(ImageUpload::from_data_uri(raw)?),
            _ if require_image => return Err(RecipeValidationError::ImageRequired),
            _ => None,
        };

        Ok((
            RecipeContent {
                name,
                text: self.text,
                cooking_time,
                tag_ids: self.tags,
                ingredients,
            },
            image,
        ))
    }
}

/// Recipe row data handed to the repository on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub author: UserId,
    pub content: RecipeContent,
    /// Public URL of the stored image.
    pub image: String,
    pub pub_date: DateTime<Utc>,
}

/// Replacement data for an existing recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeUpdate {
    pub content: RecipeContent,
    /// New image URL, or `None` to keep the stored one.
    pub image: Option<String>,
}

/// Ingredient line of a stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Recipe as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: UserProfile,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
    pub short_link: String,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Compact recipe summary used by relation responses and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeCard {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Minimal ownership information used for authorisation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeOwnership {
    pub id: RecipeId,
    pub author: UserId,
}

/// Listing filters. Relation flags only apply to authenticated viewers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListFilter {
    pub author: Option<UserId>,
    /// Any-of match on tag slugs; empty means no tag filter.
    pub tags: Vec<TagSlug>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeListFilter {
    /// Drop viewer-relative flags when there is no viewer.
    #[must_use]
    pub fn for_viewer(mut self, viewer: Option<UserId>) -> Self {
        if viewer.is_none() {
            self.is_favorited = None;
            self.is_in_shopping_cart = None;
        }
        self
    }
}
