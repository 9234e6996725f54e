//! Media storage adapters for uploaded images.

mod filesystem_media_store;

pub use filesystem_media_store::{FilesystemMediaStore, MediaStoreSetupError};
