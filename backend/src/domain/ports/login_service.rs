//! Driving port for token authentication use-cases.
//!
//! Inbound adapters call it to exchange credentials for a token and to
//! resolve presented tokens, without knowing the backing infrastructure.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a fresh token, revoking the previous one.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthToken, Error>;

    /// Revoke the user's token.
    async fn logout(&self, user: UserId) -> Result<(), Error>;

    /// Resolve a presented token to its owner; unauthorized when unknown.
    async fn authenticate(&self, token: AuthToken) -> Result<UserId, Error>;
}
