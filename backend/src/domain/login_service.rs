//! Token-based login service.
//!
//! Tokens are random, shown to the client once, and persisted only as their
//! SHA-256 digest. Logging in again rotates the token.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, LoginService, PasswordHasher, UserRepository,
};
use crate::domain::user_service::{map_user_error, run_hasher};
use crate::domain::{AuthToken, Error, LoginCredentials, UserId};

const INVALID_CREDENTIALS: &str = "unable to log in with provided credentials";

fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

/// Login service implementing [`LoginService`] with opaque API tokens.
#[derive(Clone)]
pub struct TokenLoginService<U, T, H> {
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    hasher: Arc<H>,
}

impl<U, T, H> TokenLoginService<U, T, H> {
    /// Create a new service.
    pub fn new(user_repo: Arc<U>, token_repo: Arc<T>, hasher: Arc<H>) -> Self {
        Self {
            user_repo,
            token_repo,
            hasher,
        }
    }
}

#[async_trait]
impl<U, T, H> LoginService for TokenLoginService<U, T, H>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher + 'static,
{
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthToken, Error> {
        let Some(stored) = self
            .user_repo
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login rejected: unknown email");
            return Err(Error::invalid_request(INVALID_CREDENTIALS));
        };

        let password = credentials.password().clone();
        let hash = stored.password_hash;
        let matches = run_hasher(&self.hasher, move |h| h.verify(&password, &hash)).await?;
        if !matches {
            debug!(user_id = %stored.id, "login rejected: password mismatch");
            return Err(Error::invalid_request(INVALID_CREDENTIALS));
        }

        let token = AuthToken::generate();
        self.token_repo
            .replace(stored.id, &token.digest())
            .await
            .map_err(map_token_error)?;
        info!(user_id = %stored.id, "token issued");
        Ok(token)
    }

    async fn logout(&self, user: UserId) -> Result<(), Error> {
        self.token_repo.revoke(user).await.map_err(map_token_error)?;
        info!(user_id = %user, "token revoked");
        Ok(())
    }

    async fn authenticate(&self, token: AuthToken) -> Result<UserId, Error> {
        self.token_repo
            .find_user(&token.digest())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("invalid token"))
    }
}

#[cfg(test)]
mod tests {
    //! Login flow coverage with mocked repositories.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockAuthTokenRepository, MockPasswordHasher, MockUserRepository};
    use crate::domain::{TokenDigest, UserCredentials};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    type Service = TokenLoginService<MockUserRepository, MockAuthTokenRepository, MockPasswordHasher>;

    fn service(
        users: MockUserRepository,
        tokens: MockAuthTokenRepository,
        hasher: MockPasswordHasher,
    ) -> Service {
        TokenLoginService::new(Arc::new(users), Arc::new(tokens), Arc::new(hasher))
    }

    #[fixture]
    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("cook@example.com", "s3cret-pass")
            .expect("valid credentials")
    }

    fn known_user() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .withf(|email| email == "cook@example.com")
            .return_once(|_| {
                Ok(Some(UserCredentials {
                    id: UserId::new(5),
                    password_hash: "stored".into(),
                }))
            });
        users
    }

    #[rstest]
    #[tokio::test]
    async fn login_persists_digest_of_issued_token(credentials: LoginCredentials) {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(true));
        let mut tokens = MockAuthTokenRepository::new();
        let (sender, receiver) = std::sync::mpsc::channel::<TokenDigest>();
        tokens
            .expect_replace()
            .withf(|user, _| *user == UserId::new(5))
            .times(1)
            .return_once(move |_, digest| {
                sender.send(digest.clone()).expect("capture digest");
                Ok(())
            });

        let token = service(known_user(), tokens, hasher)
            .login(credentials)
            .await
            .expect("login succeeds");
        let stored = receiver.recv().expect("digest captured");
        assert_eq!(stored, token.digest());
        assert_ne!(stored.as_ref(), token.expose());
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_is_invalid_request(credentials: LoginCredentials) {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_once(|_, _| Ok(false));
        let mut tokens = MockAuthTokenRepository::new();
        tokens.expect_replace().times(0);

        let error = service(known_user(), tokens, hasher)
            .login(credentials)
            .await
            .expect_err("bad password");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_matches_wrong_password_error(credentials: LoginCredentials) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .return_once(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(0);

        let error = service(users, MockAuthTokenRepository::new(), hasher)
            .login(credentials)
            .await
            .expect_err("unknown email");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let mut tokens = MockAuthTokenRepository::new();
        tokens.expect_find_user().return_once(|_| Ok(None));

        let error = service(MockUserRepository::new(), tokens, MockPasswordHasher::new())
            .authenticate(AuthToken::from_presented("deadbeef"))
            .await
            .expect_err("unknown token");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn known_token_resolves_owner() {
        let token = AuthToken::from_presented("cafebabe");
        let digest = token.digest();
        let mut tokens = MockAuthTokenRepository::new();
        tokens
            .expect_find_user()
            .with(eq(digest))
            .return_once(|_| Ok(Some(UserId::new(8))));

        let user = service(MockUserRepository::new(), tokens, MockPasswordHasher::new())
            .authenticate(token)
            .await
            .expect("token resolves");
        assert_eq!(user, UserId::new(8));
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let mut tokens = MockAuthTokenRepository::new();
        tokens
            .expect_revoke()
            .with(eq(UserId::new(3)))
            .times(1)
            .return_once(|_| Ok(()));

        service(MockUserRepository::new(), tokens, MockPasswordHasher::new())
            .logout(UserId::new(3))
            .await
            .expect("logout succeeds");
    }
}
