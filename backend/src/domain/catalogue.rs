//! Ingredient and tag catalogue.
//!
//! Both collections are read-only to API clients. Ingredients are bulk
//! loaded by operators; tags are curated out of band.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum length of an ingredient name.
pub const INGREDIENT_NAME_MAX: usize = 128;
/// Maximum length of a measurement unit.
pub const MEASUREMENT_UNIT_MAX: usize = 64;
/// Maximum length of tag names and slugs.
pub const TAG_FIELD_MAX: usize = 32;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a database identifier.
            #[rustfmt::skip]
            pub const fn new(id: i64) -> Self { Self(id) }

            /// Raw identifier value.
            #[rustfmt::skip]
            pub const fn get(self) -> i64 { self.0 }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use numeric_id;

numeric_id! {
    /// Ingredient identifier.
    IngredientId
}

numeric_id! {
    /// Tag identifier.
    TagId
}

/// Catalogue entry describing something a recipe can use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Label used to categorise recipes (breakfast, dinner, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

/// Validation errors for catalogue entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    #[error("ingredient name must not be empty")]
    EmptyIngredientName,
    #[error("ingredient name must be at most {max} characters")]
    IngredientNameTooLong { max: usize },
    #[error("measurement unit must not be empty")]
    EmptyMeasurementUnit,
    #[error("measurement unit must be at most {max} characters")]
    MeasurementUnitTooLong { max: usize },
    #[error("tag slug must match ^[-a-zA-Z0-9_]+$ and be at most {max} characters")]
    InvalidTagSlug { max: usize },
}

/// Ingredient waiting to be inserted into the catalogue.
///
/// # Examples
/// ```
/// use backend::domain::IngredientSeed;
///
/// let seed = IngredientSeed::new(" flour ", "g").unwrap();
/// assert_eq!(seed.name(), "flour");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientSeed {
    name: String,
    measurement_unit: String,
}

impl IngredientSeed {
    /// Validate a name/unit pair; surrounding whitespace is dropped.
    pub fn new(name: &str, measurement_unit: &str) -> Result<Self, CatalogueValidationError> {
        let name = name.trim();
        let unit = measurement_unit.trim();
        if name.is_empty() {
            return Err(CatalogueValidationError::EmptyIngredientName);
        }
        if name.chars().count() > INGREDIENT_NAME_MAX {
            return Err(CatalogueValidationError::IngredientNameTooLong {
                max: INGREDIENT_NAME_MAX,
            });
        }
        if unit.is_empty() {
            return Err(CatalogueValidationError::EmptyMeasurementUnit);
        }
        if unit.chars().count() > MEASUREMENT_UNIT_MAX {
            return Err(CatalogueValidationError::MeasurementUnitTooLong {
                max: MEASUREMENT_UNIT_MAX,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
    }

    /// Ingredient name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit the ingredient is measured in.
    pub fn measurement_unit(&self) -> &str {
        &self.measurement_unit
    }
}

fn slug_regex() -> &'static Regex {
    static SLUG_RE: OnceLock<Regex> = OnceLock::new();
    SLUG_RE.get_or_init(|| {
        Regex::new("^[-a-zA-Z0-9_]+$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

/// URL-safe tag identifier used in recipe filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagSlug(String);

impl TagSlug {
    /// Validate a slug.
    pub fn new(raw: impl Into<String>) -> Result<Self, CatalogueValidationError> {
        let value = raw.into();
        if value.chars().count() > TAG_FIELD_MAX || !slug_regex().is_match(&value) {
            return Err(CatalogueValidationError::InvalidTagSlug { max: TAG_FIELD_MAX });
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for TagSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
