//! Author subscription service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{
    Listing, SubscriptionCommand, SubscriptionQuery, SubscriptionRepository,
    SubscriptionRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, RecipesLimit, SubscribedAuthor, UserId};

fn map_subscription_error(error: SubscriptionRepositoryError, author: UserId) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        SubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("subscription repository error: {message}"))
        }
        SubscriptionRepositoryError::Duplicate => {
            Error::invalid_request(format!("already subscribed to user {author}"))
        }
        SubscriptionRepositoryError::MissingAuthor => author_not_found(author),
        SubscriptionRepositoryError::SelfSubscription => self_subscription(),
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

fn author_not_found(author: UserId) -> Error {
    Error::not_found(format!("user {author} not found"))
}

fn self_subscription() -> Error {
    Error::invalid_request("users cannot subscribe to themselves")
}

/// Service implementing [`SubscriptionCommand`] and [`SubscriptionQuery`].
#[derive(Clone)]
pub struct SubscriptionService<S, U> {
    subscription_repo: Arc<S>,
    user_repo: Arc<U>,
}

impl<S, U> SubscriptionService<S, U> {
    /// Create a new service.
    ///
    /// `user_repo` distinguishes unknown authors from absent subscriptions.
    pub fn new(subscription_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            subscription_repo,
            user_repo,
        }
    }
}

#[async_trait]
impl<S, U> SubscriptionCommand for SubscriptionService<S, U>
where
    S: SubscriptionRepository,
    U: UserRepository,
{
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
        recipes_limit: RecipesLimit,
    ) -> Result<SubscribedAuthor, Error> {
        if follower == author {
            return Err(self_subscription());
        }
        self.subscription_repo
            .add(follower, author)
            .await
            .map_err(|err| map_subscription_error(err, author))?;
        debug!(follower = %follower, author = %author, "subscription added");

        self.subscription_repo
            .find_author(follower, author, recipes_limit)
            .await
            .map_err(|err| map_subscription_error(err, author))?
            .ok_or_else(|| author_not_found(author))
    }

    async fn unsubscribe(&self, follower: UserId, author: UserId) -> Result<(), Error> {
        let removed = self
            .subscription_repo
            .remove(follower, author)
            .await
            .map_err(|err| map_subscription_error(err, author))?;
        if removed {
            return Ok(());
        }
        let exists = self
            .user_repo
            .find_profile(author, None)
            .await
            .map_err(map_user_error)?
            .is_some();
        if !exists {
            return Err(author_not_found(author));
        }
        Err(Error::invalid_request(format!(
            "not subscribed to user {author}"
        )))
    }
}

#[async_trait]
impl<S, U> SubscriptionQuery for SubscriptionService<S, U>
where
    S: SubscriptionRepository,
    U: UserRepository,
{
    async fn list_subscriptions(
        &self,
        follower: UserId,
        page: PageRequest,
        recipes_limit: RecipesLimit,
    ) -> Result<Listing<SubscribedAuthor>, Error> {
        self.subscription_repo
            .list(follower, page, recipes_limit)
            .await
            .map_err(|err| map_subscription_error(err, follower))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::fixtures::{sample_profile, sample_subscribed_author};
    use crate::domain::ports::{MockSubscriptionRepository, MockUserRepository};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn service(
        subscriptions: MockSubscriptionRepository,
        users: MockUserRepository,
    ) -> SubscriptionService<MockSubscriptionRepository, MockUserRepository> {
        SubscriptionService::new(Arc::new(subscriptions), Arc::new(users))
    }

    #[tokio::test]
    async fn subscribe_returns_author_view() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_add()
            .with(eq(UserId::new(1)), eq(UserId::new(2)))
            .times(1)
            .return_once(|_, _| Ok(()));
        subscriptions
            .expect_find_author()
            .with(eq(UserId::new(1)), eq(UserId::new(2)), eq(RecipesLimit::of(1)))
            .return_once(|_, _, _| Ok(Some(sample_subscribed_author(2, "author"))));

        let view = service(subscriptions, MockUserRepository::new())
            .subscribe(UserId::new(1), UserId::new(2), RecipesLimit::of(1))
            .await
            .expect("subscribe succeeds");
        assert!(view.profile.is_subscribed);
    }

    #[tokio::test]
    async fn self_subscription_never_reaches_repository() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_add().times(0);

        let error = service(subscriptions, MockUserRepository::new())
            .subscribe(UserId::new(3), UserId::new(3), RecipesLimit::default())
            .await
            .expect_err("self subscription");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(SubscriptionRepositoryError::duplicate(), ErrorCode::InvalidRequest)]
    #[case(SubscriptionRepositoryError::self_subscription(), ErrorCode::InvalidRequest)]
    #[case(SubscriptionRepositoryError::missing_author(), ErrorCode::NotFound)]
    #[case(SubscriptionRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[tokio::test]
    async fn repository_failures_map_to_domain_errors(
        #[case] failure: SubscriptionRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_add()
            .return_once(move |_, _| Err(failure));

        let error = service(subscriptions, MockUserRepository::new())
            .subscribe(UserId::new(1), UserId::new(2), RecipesLimit::default())
            .await
            .expect_err("repository failure");
        assert_eq!(error.code(), expected);
    }

    #[tokio::test]
    async fn unsubscribe_without_subscription_is_invalid_request() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_remove().return_once(|_, _| Ok(false));
        let mut users = MockUserRepository::new();
        users
            .expect_find_profile()
            .with(eq(UserId::new(2)), eq(None))
            .return_once(|_, _| Ok(Some(sample_profile(2, "author"))));

        let error = service(subscriptions, users)
            .unsubscribe(UserId::new(1), UserId::new(2))
            .await
            .expect_err("not subscribed");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn unsubscribe_from_unknown_author_is_not_found() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_remove().return_once(|_, _| Ok(false));
        let mut users = MockUserRepository::new();
        users.expect_find_profile().return_once(|_, _| Ok(None));

        let error = service(subscriptions, users)
            .unsubscribe(UserId::new(1), UserId::new(99))
            .await
            .expect_err("unknown author");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn unsubscribe_removes_existing_subscription() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_remove().return_once(|_, _| Ok(true));
        let mut users = MockUserRepository::new();
        users.expect_find_profile().times(0);

        service(subscriptions, users)
            .unsubscribe(UserId::new(1), UserId::new(2))
            .await
            .expect("unsubscribe succeeds");
    }

    #[tokio::test]
    async fn listing_passes_limit_through() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_list()
            .withf(|follower, page, limit| {
                *follower == UserId::new(1) && page.page() == 2 && limit.get() == Some(3)
            })
            .return_once(|_, _, _| {
                Ok(Listing::new(vec![sample_subscribed_author(2, "author")], 7))
            });

        let page = PageRequest::new(Some(2), None).expect("valid page");
        let listing = service(subscriptions, MockUserRepository::new())
            .list_subscriptions(UserId::new(1), page, RecipesLimit::of(3))
            .await
            .expect("list succeeds");
        assert_eq!(listing.total, 7);
        assert_eq!(listing.items.len(), 1);
    }
}
