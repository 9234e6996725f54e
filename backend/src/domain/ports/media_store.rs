//! Driven port writing uploaded images to media storage.

use async_trait::async_trait;

use crate::domain::ImageUpload;

use super::define_port_error;

define_port_error! {
    /// Errors raised by media storage adapters.
    pub enum MediaStoreError {
        /// The backing storage could not be written.
        Io { message: String } => "media storage failed: {message}",
    }
}

/// Folder an uploaded image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    /// Recipe pictures, stored under `recipes/images/`.
    RecipeImages,
    /// User avatars, stored under `users/`.
    Avatars,
}

impl MediaFolder {
    /// Relative directory inside the media root.
    pub fn path(self) -> &'static str {
        match self {
            Self::RecipeImages => "recipes/images",
            Self::Avatars => "users",
        }
    }
}

/// Port for persisting uploaded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the image under a fresh name and return its public URL.
    async fn save(&self, folder: MediaFolder, image: &ImageUpload)
    -> Result<String, MediaStoreError>;
}
