//! Driving ports for author subscriptions.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, RecipesLimit, SubscribedAuthor, UserId};

use super::Listing;

/// Domain use-case port for following and unfollowing authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionCommand: Send + Sync {
    /// Follow `author` and return their subscription view.
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
        recipes_limit: RecipesLimit,
    ) -> Result<SubscribedAuthor, Error>;

    /// Stop following `author`.
    async fn unsubscribe(&self, follower: UserId, author: UserId) -> Result<(), Error>;
}

/// Domain use-case port listing followed authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionQuery: Send + Sync {
    /// Page of authors followed by `follower`.
    async fn list_subscriptions(
        &self,
        follower: UserId,
        page: PageRequest,
        recipes_limit: RecipesLimit,
    ) -> Result<Listing<SubscribedAuthor>, Error>;
}
