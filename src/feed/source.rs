//! Review sources: the page-fetch capability and a fixture-backed variant.

use std::path::PathBuf;

use async_trait::async_trait;

use super::error::FeedError;
use super::models::{RawReview, ReviewPage};

/// Capability for fetching one page of raw reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetches the reviews in `[offset, offset + limit)` together with the
    /// source's total count.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SourceUnavailable`] when the source cannot be
    /// reached and [`FeedError::DecodeFailed`] when its payload is
    /// malformed.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<ReviewPage, FeedError>;
}

/// Review source backed by a JSON fixture on disk.
///
/// The fixture is the full review set in one envelope (`items` plus
/// `count`); each request re-reads the file and serves the requested slice.
#[derive(Debug, Clone)]
pub struct JsonFixtureSource {
    path: PathBuf,
}

impl JsonFixtureSource {
    /// Creates a source serving pages from the fixture at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReviewSource for JsonFixtureSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<ReviewPage, FeedError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|error| FeedError::SourceUnavailable {
                message: format!("{}: {error}", self.path.display()),
            })?;

        let envelope: ReviewPage =
            serde_json::from_slice(&bytes).map_err(|error| FeedError::DecodeFailed {
                message: format!("review fixture: {error}"),
            })?;

        let end = offset.saturating_add(limit).min(envelope.items.len());
        let items = envelope
            .items
            .get(offset..end)
            .map(<[RawReview]>::to_vec)
            .unwrap_or_default();

        Ok(ReviewPage {
            items,
            count: envelope.count,
        })
    }
}
