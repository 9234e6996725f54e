//! Uploaded images carried inline as base64 data URIs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Image file extensions accepted from clients.
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Failures decoding an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageUploadError {
    #[error("image must be a data URI of the form data:image/<type>;base64,<payload>")]
    NotDataUri,
    #[error("image type {0} is not supported")]
    UnsupportedType(String),
    #[error("image payload is not valid base64")]
    InvalidBase64,
    #[error("image payload is empty")]
    Empty,
}

/// Decoded image ready to be written to media storage.
///
/// # Examples
/// ```
/// use backend::domain::ImageUpload;
///
/// let image = ImageUpload::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
/// assert_eq!(image.extension(), "png");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    extension: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Parse `data:image/<ext>;base64,<payload>`.
    pub fn from_data_uri(raw: &str) -> Result<Self, ImageUploadError> {
        let (header, payload) = raw
            .trim()
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .ok_or(ImageUploadError::NotDataUri)?;
        let subtype = header
            .strip_prefix("image/")
            .ok_or(ImageUploadError::NotDataUri)?
            .to_ascii_lowercase();
        if !ACCEPTED_EXTENSIONS.contains(&subtype.as_str()) {
            return Err(ImageUploadError::UnsupportedType(subtype));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| ImageUploadError::InvalidBase64)?;
        if bytes.is_empty() {
            return Err(ImageUploadError::Empty);
        }
        Ok(Self {
            extension: subtype,
            bytes,
        })
    }

    /// File extension derived from the MIME subtype.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Decoded file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("extension", &self.extension)
            .field("len", &self.bytes.len())
            .finish()
    }
}
