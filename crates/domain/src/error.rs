//! Typed validation errors.

use common::CategoryId;
use thiserror::Error;

/// Errors produced while validating caller input.
///
/// Every variant is raised before any external effect is performed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Order description is shorter than the required minimum after trimming.
    #[error("description must be at least {min} characters")]
    DescriptionTooShort { min: usize },

    /// Size preference was empty after trimming.
    #[error("size preference must not be empty")]
    SizePreferenceRequired,

    /// Product name was empty after trimming.
    #[error("product name must not be empty")]
    ProductNameRequired,

    /// Product description was empty after trimming.
    #[error("product description must not be empty")]
    ProductDescriptionRequired,

    /// Base price must be strictly positive.
    #[error("base price must be greater than zero")]
    BasePriceNotPositive,

    /// Painting price must not be negative.
    #[error("painting price must not be negative")]
    PaintingPriceNegative,

    /// Quoted price must be strictly positive.
    #[error("quoted price must be greater than zero")]
    QuoteNotPositive,

    /// The referenced category does not exist.
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The file's MIME type does not indicate an image.
    #[error("{label} must be an image, got '{content_type}'")]
    NotAnImage { label: String, content_type: String },

    /// The file exceeds the upload size ceiling.
    #[error("{label} is {size} bytes, exceeding the {max_bytes} byte limit")]
    ImageTooLarge {
        label: String,
        size: usize,
        max_bytes: usize,
    },

    /// The number of images is outside the accepted range.
    #[error("expected between {min} and {max} images, got {actual}")]
    ImageCountOutOfRange {
        min: usize,
        max: usize,
        actual: usize,
    },

    /// A status string did not name a member of the status enumeration.
    #[error("unknown order status: '{0}'")]
    UnknownStatus(String),

    /// A category name string did not name a known category.
    #[error("unknown category name: '{0}'")]
    UnknownCategoryName(String),
}
