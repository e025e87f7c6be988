//! Storage-layer error type.

use rust_decimal::Decimal;
use thiserror::Error;

use quality_core::QualityError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate attribute {0:?}")]
    DuplicateAttribute(String),

    #[error("duplicate placeholder {0:?}")]
    DuplicatePlaceholder(String),

    #[error("duplicate entry for attribute {attribute:?} on material {material:?}")]
    DuplicateEntry { attribute: String, material: String },

    #[error("duplicate recycler {0:?}")]
    DuplicateRecycler(String),

    #[error("duplicate quality {title:?} for recycler {recycler:?}")]
    DuplicateQuality { title: String, recycler: String },

    #[error("option {option:?} is not valid for attribute {attribute:?}")]
    InvalidChoice { option: String, attribute: String },

    #[error("percentage {0} outside [0, 100]")]
    PercentageOutOfRange(Decimal),

    #[error("attribute {attribute:?} holds a {actual} value, not a {expected} one")]
    WrongValueKind {
        attribute: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Engine failures surfaced through judge/listing calls.
    #[error(transparent)]
    Quality(#[from] QualityError),
}
