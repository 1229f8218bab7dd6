//! Data models for raw review records and assembled display items.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use super::images::Image;

/// Default line cap applied to freshly built review items.
pub const DEFAULT_MAX_LINES: u32 = 3;

/// A raw review record as produced by a review source. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawReview {
    /// Reviewer first name.
    pub first_name: String,
    /// Reviewer last name.
    pub last_name: String,
    /// Star rating in `0..=5`.
    pub rating: u8,
    /// URL of the reviewer's avatar image.
    pub avatar_url: String,
    /// URLs of the review's photos, in display order.
    pub photo_urls: Vec<String>,
    /// Review body text.
    pub text: String,
    /// Creation time as a pre-rendered display string.
    pub created: String,
}

/// One page of raw reviews together with the source's total count.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewPage {
    /// Reviews in this slice, in source order.
    pub items: Vec<RawReview>,
    /// Total number of reviews the source holds.
    pub count: usize,
}

/// Stable identity of a review item, unique for the item's lifetime.
///
/// Used to address items for later mutation (text expansion) without
/// depending on list positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A display-ready review assembled from a raw record and resolved images.
///
/// Owned exclusively by the list state. All fields except `max_lines` are
/// fixed at construction; `max_lines` drops to zero (unbounded) exactly once
/// when the item's "show more" action fires.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    /// Stable item identity.
    pub id: ReviewId,
    /// Reviewer first and last name joined with a single space.
    pub full_name: String,
    /// Star rating in `0..=5`.
    pub rating: u8,
    /// Review body text.
    pub review_text: String,
    /// Creation time display string.
    pub created_text: String,
    /// Resolved avatar image, present only once the fetch succeeded.
    pub avatar: Option<Arc<Image>>,
    /// Resolved photos; failed fetches are omitted, order is otherwise
    /// preserved relative to the requested URLs.
    pub photos: Vec<Arc<Image>>,
    /// Line cap for the body text; zero means unbounded.
    pub max_lines: u32,
}

impl ReviewItem {
    /// Builds a display item from a raw record and its resolved images.
    #[must_use]
    pub fn from_raw(raw: &RawReview, avatar: Option<Arc<Image>>, photos: Vec<Arc<Image>>) -> Self {
        Self {
            id: ReviewId::generate(),
            full_name: format!("{} {}", raw.first_name, raw.last_name),
            rating: raw.rating,
            review_text: raw.text.clone(),
            created_text: raw.created.clone(),
            avatar,
            photos,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    /// Returns true once the line cap has been lifted.
    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.max_lines == 0
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    //! Builders for review fixtures used across the test suites.

    use super::RawReview;

    /// Builds a raw review with the given name and text and no photos.
    #[must_use]
    pub fn raw_review(first_name: &str, text: &str) -> RawReview {
        RawReview {
            first_name: first_name.to_owned(),
            last_name: "Reviewer".to_owned(),
            rating: 4,
            avatar_url: format!("https://img.example.test/{first_name}/avatar.png"),
            photo_urls: Vec::new(),
            text: text.to_owned(),
            created: "2 days ago".to_owned(),
        }
    }

    /// Builds a raw review carrying the given photo URLs.
    #[must_use]
    pub fn raw_review_with_photos(first_name: &str, photo_urls: &[&str]) -> RawReview {
        RawReview {
            photo_urls: photo_urls.iter().map(|url| (*url).to_owned()).collect(),
            ..raw_review(first_name, "Pictures attached.")
        }
    }
}
