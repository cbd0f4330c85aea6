//! Image upload value object and the constraints enforced at every upload
//! boundary.

use crate::error::DomainError;

/// Upload size ceiling per image, matching the object-store bucket policy.
pub const MAX_IMAGE_BYTES: usize = 6 * 1024 * 1024;

/// Maximum images accepted by the completion and publication operations.
pub const MAX_ORDER_IMAGES: usize = 5;

/// An image file received from a caller, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original filename as submitted; used as the path suffix.
    pub filename: String,
    /// MIME type reported by the caller.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Creates an image file from its parts.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Returns the file size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Checks the MIME type and size ceiling.
    ///
    /// `label` names the file's role in error messages ("source image",
    /// "reference image 2", ...).
    pub fn validate(&self, label: &str) -> Result<(), DomainError> {
        if !self.content_type.starts_with("image/") {
            return Err(DomainError::NotAnImage {
                label: label.to_string(),
                content_type: self.content_type.clone(),
            });
        }
        if self.size() > MAX_IMAGE_BYTES {
            return Err(DomainError::ImageTooLarge {
                label: label.to_string(),
                size: self.size(),
                max_bytes: MAX_IMAGE_BYTES,
            });
        }
        Ok(())
    }
}

/// Validates a count-bounded batch of images before any upload.
///
/// Count is checked first so an empty or oversized batch fails without
/// touching the individual files.
pub fn validate_image_batch(
    images: &[ImageFile],
    label: &str,
    min: usize,
    max: usize,
) -> Result<(), DomainError> {
    if images.len() < min || images.len() > max {
        return Err(DomainError::ImageCountOutOfRange {
            min,
            max,
            actual: images.len(),
        });
    }
    for (i, image) in images.iter().enumerate() {
        image.validate(&format!("{} {}", label, i + 1))?;
    }
    Ok(())
}
