//! Error types exposed by the review feed.

use thiserror::Error;

/// Errors surfaced while loading pages or resolving images.
///
/// Page-level failures (`SourceUnavailable`, `DecodeFailed` on page data)
/// are retryable: the cursor is left untouched and a later load re-issues
/// the same offset. Per-image failures (`InvalidUrl`, `TransferFailed`, and
/// `DecodeFailed` on image bytes) are absorbed locally; the affected item
/// simply renders with fewer images.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// The review source could not be reached or read.
    #[error("review source unavailable: {message}")]
    SourceUnavailable {
        /// Detail from the underlying source.
        message: String,
    },

    /// A payload could not be decoded into its expected shape.
    #[error("decode failed: {message}")]
    DecodeFailed {
        /// Description of the malformed payload.
        message: String,
    },

    /// An image URL failed validation before any transfer was attempted.
    #[error("image URL is invalid: {0}")]
    InvalidUrl(String),

    /// An image transfer failed or exceeded its per-fetch budget.
    #[error("image transfer failed: {message}")]
    TransferFailed {
        /// Transport-level error detail.
        message: String,
    },
}
