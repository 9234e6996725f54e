//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{NewUser, User, UserCredentials, UserId, UserProfile};

use super::{Listing, define_port_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail => "email is already registered",
        /// Another account already uses this username.
        DuplicateUsername => "username is already taken",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user profile as seen by `viewer`.
    async fn find_profile(
        &self,
        id: UserId,
        viewer: Option<UserId>,
    ) -> Result<Option<UserProfile>, UserPersistenceError>;

    /// Page of user profiles ordered by username.
    async fn list_profiles(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<UserProfile>, UserPersistenceError>;

    /// Stored credentials for the account registered under `email`.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// Stored password hash for a user.
    async fn find_password_hash(&self, id: UserId) -> Result<Option<String>, UserPersistenceError>;

    /// Replace the stored password hash.
    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), UserPersistenceError>;

    /// Set or clear the avatar URL.
    async fn set_avatar(
        &self,
        id: UserId,
        avatar: Option<String>,
    ) -> Result<(), UserPersistenceError>;
}
