//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, and the services implementing the driving ports. Types validate
//! their invariants on construction; adapters map their own payloads into
//! them.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - Users and authentication: `User`, `UserProfile`, `LoginCredentials`,
//!   `AuthToken`.
//! - Catalogue: `Ingredient`, `Tag`.
//! - Recipes: `Recipe`, `RecipeDraft`, `RecipeCard`, `ShortLink`.
//! - Relations: `RecipeRelation`, `SubscribedAuthor`, `ShoppingListReport`.

pub mod auth;
pub mod catalogue;
pub mod catalogue_service;
pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod image;
pub mod login_service;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod relation_service;
pub mod relations;
pub mod shopping_list;
pub mod short_link;
pub mod subscription_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{AuthToken, LoginCredentials, LoginValidationError, TokenDigest};
pub use self::catalogue::{
    CatalogueValidationError, Ingredient, IngredientId, IngredientSeed, Tag, TagId, TagSlug,
};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::image::{ImageUpload, ImageUploadError};
pub use self::login_service::TokenLoginService;
pub use self::recipe::{
    IngredientAmount, NewRecipe, Recipe, RecipeCard, RecipeContent, RecipeDraft, RecipeId,
    RecipeIngredient, RecipeListFilter, RecipeOwnership, RecipeUpdate, RecipeValidationError,
};
pub use self::recipe_service::RecipeService;
pub use self::relation_service::RecipeRelationService;
pub use self::relations::{RecipeRelation, RecipesLimit, SubscribedAuthor};
pub use self::shopping_list::{
    IngredientOccurrence, SHOPPING_LIST_FILENAME, ShoppingListLine, ShoppingListReport,
};
pub use self::short_link::{ShortLink, ShortLinkError};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, Password, PersonName, User, UserCredentials, UserId, UserProfile,
    UserRegistration, UserValidationError, Username,
};
pub use self::user_service::{UserAccountService, UsersQueryService};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use backend::domain::{DomainResult, Error};
///
/// fn guard() -> DomainResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(guard().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
