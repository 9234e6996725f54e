//! Driven port storing API token digests.

use async_trait::async_trait;

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token storage adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

/// Port for issuing, resolving and revoking tokens. One token per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Store `digest` as the user's only token, replacing any previous one.
    async fn replace(&self, user: UserId, digest: &TokenDigest)
    -> Result<(), AuthTokenRepositoryError>;

    /// Owner of the token with this digest.
    async fn find_user(&self, digest: &TokenDigest)
    -> Result<Option<UserId>, AuthTokenRepositoryError>;

    /// Delete the user's token.
    async fn revoke(&self, user: UserId) -> Result<(), AuthTokenRepositoryError>;
}
