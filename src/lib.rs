//! Reviewfeed library crate providing incremental review list loading.
//!
//! The library loads a paginated list of user reviews from a pluggable
//! source, resolves each review's avatar and photo images concurrently, and
//! merges the results into a single [`ListState`] snapshot that a rendering
//! layer consumes. A deterministic [`LayoutEngine`] computes variable-height
//! row geometry from review text and fixed-size image placeholders.

pub mod config;
pub mod feed;
pub mod layout;

pub use config::LoaderConfig;
pub use feed::{
    FeedError, HttpImageFetcher, ImageCache, ImageFetcher, InMemoryImageCache, ListState,
    LoadOutcome, PageCursor, PageLoader, RawReview, ReviewId, ReviewItem, ReviewSource,
    SkipReason, StateObserver,
};
pub use layout::{LayoutConfig, LayoutEngine, RowLayout};
