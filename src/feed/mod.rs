//! Incremental review feed loading.
//!
//! This module provides the pagination state machine and bounded concurrent
//! image acquisition behind the review list. The [`PageLoader`] requests one
//! page at a time from a [`ReviewSource`], fans out per-URL image fetches
//! through an [`ImageFetcher`], and merges the results into a [`ListState`]
//! snapshot delivered to observers. Traits are mockable so callers can test
//! against scripted collaborators.

pub mod cursor;
pub mod error;
pub mod images;
pub mod loader;
pub mod models;
pub mod source;
pub mod state;

pub use cursor::PageCursor;
pub use error::FeedError;
pub use images::{HttpImageFetcher, Image, ImageCache, ImageFetcher, InMemoryImageCache};
pub use loader::{LoadOutcome, PageLoader, SkipReason};
pub use models::{RawReview, ReviewId, ReviewItem, ReviewPage};
pub use source::{JsonFixtureSource, ReviewSource};
pub use state::{ListState, NoopStateObserver, StateObserver};

#[cfg(test)]
pub use images::MockImageFetcher;
#[cfg(test)]
pub use source::MockReviewSource;
