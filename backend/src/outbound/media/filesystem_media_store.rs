//! `MediaStore` adapter writing uploads beneath a capability-scoped directory.
//!
//! The media root is opened once with `cap-std`; every write goes through
//! that [`Dir`] handle, so relative paths cannot escape it. Files are named
//! `<uuid>.<ext>` inside the folder's subdirectory and exposed under
//! `<media_url>/<folder>/<file>`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ImageUpload;
use crate::domain::ports::{MediaFolder, MediaStore, MediaStoreError};

/// Failure opening the media root at start-up.
#[derive(Debug, thiserror::Error)]
#[error("failed to open media root {path}: {source}")]
pub struct MediaStoreSetupError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

/// Filesystem-backed media store.
#[derive(Clone)]
pub struct FilesystemMediaStore {
    root: Arc<Dir>,
    media_url: String,
}

impl FilesystemMediaStore {
    /// Open (creating if needed) `root` and serve files under `media_url`.
    ///
    /// # Errors
    /// Returns [`MediaStoreSetupError`] when the directory cannot be created
    /// or opened.
    pub fn open(root: &Path, media_url: impl Into<String>) -> Result<Self, MediaStoreSetupError> {
        let setup_error = |source| MediaStoreSetupError {
            path: root.to_path_buf(),
            source,
        };
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(setup_error)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(setup_error)?;
        Ok(Self {
            root: Arc::new(dir),
            media_url: media_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn write(&self, relative: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = relative.parent() {
            self.root.create_dir_all(parent)?;
        }
        self.root.write(relative, bytes)
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn save(
        &self,
        folder: MediaFolder,
        image: &ImageUpload,
    ) -> Result<String, MediaStoreError> {
        let file_name = format!("{}.{}", Uuid::new_v4().simple(), image.extension());
        let relative = Path::new(folder.path()).join(&file_name);

        let store = self.clone();
        let bytes = image.bytes().to_vec();
        let target = relative.clone();
        tokio::task::spawn_blocking(move || store.write(&target, &bytes))
            .await
            .map_err(|err| MediaStoreError::io(format!("media write task failed: {err}")))?
            .map_err(|err| MediaStoreError::io(format!("{}: {err}", relative.display())))?;

        debug!(path = %relative.display(), "stored uploaded image");
        Ok(format!("{}/{}/{}", self.media_url, folder.path(), file_name))
    }
}
