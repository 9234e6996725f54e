//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`MediaStore`]) describe
//! what the domain needs from infrastructure; each returns a port-specific
//! error enum. Driving ports (`*Command`, `*Query`, [`LoginService`]) are what
//! inbound adapters call; they return the transport-agnostic domain
//! [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod auth_token_repository;
mod catalogue_query;
mod catalogue_repository;
mod login_service;
mod media_store;
mod password_hasher;
mod recipe_command;
mod recipe_query;
mod recipe_relation_command;
mod recipe_relation_repository;
mod recipe_repository;
mod subscription_command;
mod subscription_repository;
mod user_account_command;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaFolder, MediaStore, MediaStoreError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::RecipeCommand;
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::RecipeQuery;
#[cfg(test)]
pub use recipe_relation_command::{MockRecipeRelationCommand, MockShoppingListQuery};
pub use recipe_relation_command::{RecipeRelationCommand, ShoppingListQuery};
#[cfg(test)]
pub use recipe_relation_repository::MockRecipeRelationRepository;
pub use recipe_relation_repository::{RecipeRelationRepository, RecipeRelationRepositoryError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use subscription_command::{MockSubscriptionCommand, MockSubscriptionQuery};
pub use subscription_command::{SubscriptionCommand, SubscriptionQuery};
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use user_account_command::MockUserAccountCommand;
pub use user_account_command::UserAccountCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

/// One page of items plus the size of the whole filtered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Listing<T> {
    /// Build a listing.
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Listing with no items.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}
