//! Driving port for account management.

use async_trait::async_trait;

use crate::domain::{Error, Password, User, UserId, UserRegistration};

/// Domain use-case port for sign-up, password changes and avatars.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountCommand: Send + Sync {
    /// Create an account. Email and username must be unused.
    async fn register(&self, registration: UserRegistration) -> Result<User, Error>;

    /// Change the password after checking the current one.
    async fn set_password(
        &self,
        user: UserId,
        current: Password,
        new_password: Password,
    ) -> Result<(), Error>;

    /// Store a new avatar from a data URI and return its URL.
    async fn set_avatar(&self, user: UserId, data_uri: String) -> Result<String, Error>;

    /// Clear the avatar.
    async fn remove_avatar(&self, user: UserId) -> Result<(), Error>;
}
