//! Driven port for author subscriptions.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{RecipesLimit, SubscribedAuthor, UserId};

use super::{Listing, define_port_error};

define_port_error! {
    /// Errors raised by subscription adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "subscription repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "subscription repository query failed: {message}",
        /// The follower already subscribes to the author.
        Duplicate => "subscription already exists",
        /// The author does not exist.
        MissingAuthor => "author does not exist",
        /// The database refused a self-subscription.
        SelfSubscription => "users cannot subscribe to themselves",
    }
}

/// Port for follower-to-author relations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a subscription.
    async fn add(&self, follower: UserId, author: UserId)
    -> Result<(), SubscriptionRepositoryError>;

    /// Delete a subscription. Returns whether a row was removed.
    async fn remove(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Authors followed by `follower`, ordered by username.
    async fn list(
        &self,
        follower: UserId,
        page: PageRequest,
        recipes_limit: RecipesLimit,
    ) -> Result<Listing<SubscribedAuthor>, SubscriptionRepositoryError>;

    /// Subscription view of one author as seen by `follower`.
    async fn find_author(
        &self,
        follower: UserId,
        author: UserId,
        recipes_limit: RecipesLimit,
    ) -> Result<Option<SubscribedAuthor>, SubscriptionRepositoryError>;
}
