//! Recipe short links.
//!
//! A short link is the base62 rendering (`0-9A-Za-z`) of the recipe id. It is
//! assigned once, in the transaction that creates the recipe, and resolved by
//! exact match against the stored value.

use std::fmt;

use crate::domain::RecipeId;

/// Longest slug a positive `i64` can produce.
pub const SHORT_LINK_MAX: usize = 11;

/// Failures building or decoding a short link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortLinkError {
    #[error("recipe id must be positive to receive a short link")]
    NonPositiveId,
    #[error("short link must be 1 to {max} base62 characters")]
    Malformed { max: usize },
    #[error("short link does not decode to a recipe id")]
    OutOfRange,
}

/// Base62 slug identifying a recipe.
///
/// # Examples
/// ```
/// use backend::domain::{RecipeId, ShortLink};
///
/// let link = ShortLink::for_recipe(RecipeId::new(125)).unwrap();
/// assert_eq!(link.as_ref(), "21");
/// assert_eq!(link.decode().unwrap(), RecipeId::new(125));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortLink(String);

impl ShortLink {
    /// Encode a recipe id.
    pub fn for_recipe(id: RecipeId) -> Result<Self, ShortLinkError> {
        let raw = u64::try_from(id.get())
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ShortLinkError::NonPositiveId)?;
        Ok(Self(base62::encode(raw)))
    }

    /// Validate a slug received from a client or loaded from storage.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ShortLinkError> {
        let value = raw.into();
        let well_formed = !value.is_empty()
            && value.len() <= SHORT_LINK_MAX
            && value.chars().all(|c| c.is_ascii_alphanumeric());
        if !well_formed {
            return Err(ShortLinkError::Malformed {
                max: SHORT_LINK_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Recover the recipe id the slug encodes.
    pub fn decode(&self) -> Result<RecipeId, ShortLinkError> {
        let raw = base62::decode(self.0.as_bytes()).map_err(|_| ShortLinkError::OutOfRange)?;
        i64::try_from(raw)
            .ok()
            .filter(|value| *value > 0)
            .map(RecipeId::new)
            .ok_or(ShortLinkError::OutOfRange)
    }
}

impl AsRef<str> for ShortLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ShortLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "1")]
    #[case(61, "z")]
    #[case(62, "10")]
    #[case(i64::MAX, "AzL8n0Y58m7")]
    fn encodes_ids(#[case] id: i64, #[case] expected: &str) {
        let link = ShortLink::for_recipe(RecipeId::new(id)).expect("positive id");
        assert_eq!(link.as_ref(), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(3_844)]
    #[case(987_654_321)]
    #[case(i64::MAX)]
    fn decode_inverts_encode(#[case] id: i64) {
        let link = ShortLink::for_recipe(RecipeId::new(id)).expect("positive id");
        assert_eq!(link.decode(), Ok(RecipeId::new(id)));
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn rejects_non_positive_ids(#[case] id: i64) {
        assert_eq!(
            ShortLink::for_recipe(RecipeId::new(id)),
            Err(ShortLinkError::NonPositiveId)
        );
    }

    #[rstest]
    #[case("")]
    #[case("ab-c")]
    #[case("zzzzzzzzzzzz")]
    fn parse_rejects_malformed_slugs(#[case] raw: &str) {
        assert!(matches!(
            ShortLink::parse(raw),
            Err(ShortLinkError::Malformed { .. })
        ));
    }

    #[rstest]
    fn decode_rejects_values_beyond_i64() {
        let link = ShortLink::parse("zzzzzzzzzzz").expect("well formed");
        assert_eq!(link.decode(), Err(ShortLinkError::OutOfRange));
    }
}
