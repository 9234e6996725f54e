//! Driving port for user-facing profile queries.
//!
//! Inbound adapters use this port to fetch user-visible data without
//! importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, UserId, UserProfile};

use super::Listing;

/// Domain use-case port for reading user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Page of profiles ordered by username.
    async fn list_users(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<UserProfile>, Error>;

    /// One profile; not found when missing.
    async fn get_user(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error>;
}
