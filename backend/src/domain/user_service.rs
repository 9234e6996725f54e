//! User directory and account services.
//!
//! [`UsersQueryService`] serves profile reads. [`UserAccountService`] owns
//! sign-up, password changes and avatars; password hashing runs on the
//! blocking pool because Argon2 is deliberately slow.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use tracing::{debug, info};

use crate::domain::ports::{
    Listing, MediaFolder, MediaStore, PasswordHashError, PasswordHasher, UserAccountCommand,
    UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::recipe_service::map_media_error;
use crate::domain::{
    Error, ImageUpload, NewUser, Password, User, UserId, UserProfile, UserRegistration,
};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => Error::invalid_field(
            "email",
            "unique",
            "a user with this email already exists",
        ),
        UserPersistenceError::DuplicateUsername => Error::invalid_field(
            "username",
            "unique",
            "a user with this username already exists",
        ),
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Run a password hasher call on the blocking pool.
pub(crate) async fn run_hasher<H, T, F>(hasher: &Arc<H>, op: F) -> Result<T, Error>
where
    H: PasswordHasher + 'static,
    T: Send + 'static,
    F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || op(hasher.as_ref()))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(map_hash_error)
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// Read-only user directory implementing [`UsersQuery`].
#[derive(Clone)]
pub struct UsersQueryService<U> {
    user_repo: Arc<U>,
}

impl<U> UsersQueryService<U> {
    /// Create a new service.
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<U> UsersQuery for UsersQueryService<U>
where
    U: UserRepository,
{
    async fn list_users(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<UserProfile>, Error> {
        self.user_repo
            .list_profiles(viewer, page)
            .await
            .map_err(map_user_error)
    }

    async fn get_user(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error> {
        self.user_repo
            .find_profile(id, viewer)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

/// Account management implementing [`UserAccountCommand`].
#[derive(Clone)]
pub struct UserAccountService<U, H, M> {
    user_repo: Arc<U>,
    hasher: Arc<H>,
    media_store: Arc<M>,
}

impl<U, H, M> UserAccountService<U, H, M> {
    /// Create a new service.
    pub fn new(user_repo: Arc<U>, hasher: Arc<H>, media_store: Arc<M>) -> Self {
        Self {
            user_repo,
            hasher,
            media_store,
        }
    }
}

#[async_trait]
impl<U, H, M> UserAccountCommand for UserAccountService<U, H, M>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    M: MediaStore,
{
    async fn register(&self, registration: UserRegistration) -> Result<User, Error> {
        let UserRegistration {
            email,
            username,
            first_name,
            last_name,
            password,
        } = registration;
        let password_hash = run_hasher(&self.hasher, move |h| h.hash(&password)).await?;

        let user = self
            .user_repo
            .create(&NewUser {
                email,
                username,
                first_name,
                last_name,
                password_hash,
            })
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn set_password(
        &self,
        user: UserId,
        current: Password,
        new_password: Password,
    ) -> Result<(), Error> {
        let stored = self
            .user_repo
            .find_password_hash(user)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(user))?;

        let matches = run_hasher(&self.hasher, move |h| h.verify(&current, &stored)).await?;
        if !matches {
            return Err(Error::invalid_field(
                "current_password",
                "invalid",
                "current password is incorrect",
            ));
        }

        let password_hash = run_hasher(&self.hasher, move |h| h.hash(&new_password)).await?;
        self.user_repo
            .update_password_hash(user, &password_hash)
            .await
            .map_err(map_user_error)?;
        debug!(user_id = %user, "password changed");
        Ok(())
    }

    async fn set_avatar(&self, user: UserId, data_uri: String) -> Result<String, Error> {
        let upload = ImageUpload::from_data_uri(&data_uri)
            .map_err(|err| Error::invalid_field("avatar", "invalid", err.to_string()))?;
        let url = self
            .media_store
            .save(MediaFolder::Avatars, &upload)
            .await
            .map_err(map_media_error)?;
        self.user_repo
            .set_avatar(user, Some(url.clone()))
            .await
            .map_err(map_user_error)?;
        Ok(url)
    }

    async fn remove_avatar(&self, user: UserId) -> Result<(), Error> {
        self.user_repo
            .set_avatar(user, None)
            .await
            .map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
