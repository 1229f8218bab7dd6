//! Image acquisition: fetcher and cache capabilities plus byte decoding.
//!
//! The loader consumes images through the [`ImageFetcher`] and [`ImageCache`]
//! traits. The trait-based design enables mocking in tests while
//! [`HttpImageFetcher`] handles real transfers. Decoding fetched bytes into
//! an [`Image`] is the loader's responsibility, so the fetcher only ever
//! reports transfer-level failures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use super::error::FeedError;

/// Recognised image container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
    /// GIF 87a or 89a.
    Gif,
    /// RIFF-contained WebP.
    WebP,
}

/// A decoded image: sniffed format plus the raw encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl Image {
    /// Decodes fetched bytes, sniffing the container format from the
    /// leading magic numbers.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::DecodeFailed`] for empty payloads or
    /// unrecognised formats.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, FeedError> {
        let Some(format) = sniff_format(&bytes) else {
            return Err(FeedError::DecodeFailed {
                message: format!("unrecognised image data ({} bytes)", bytes.len()),
            });
        };
        Ok(Self { format, bytes })
    }

    /// Returns the sniffed container format.
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the encoded byte length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true when no bytes are present (never the case for a
    /// successfully decoded image).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        Some(ImageFormat::WebP)
    } else {
        None
    }
}

/// Capability for transferring raw image bytes from a URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetches the raw bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidUrl`] for malformed URLs and
    /// [`FeedError::TransferFailed`] for transport failures.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError>;
}

/// Keyed image store shared across loads. No eviction policy is imposed.
pub trait ImageCache: Send + Sync {
    /// Looks up a previously stored image.
    fn get(&self, key: &str) -> Option<Arc<Image>>;

    /// Stores an image under `key`, replacing any previous entry.
    fn put(&self, key: &str, image: Arc<Image>);
}

/// Process-local image cache backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryImageCache {
    entries: Mutex<HashMap<String, Arc<Image>>>,
}

impl InMemoryImageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageCache for InMemoryImageCache {
    fn get(&self, key: &str) -> Option<Arc<Image>> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, image: Arc<Image>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_owned(), image);
        }
    }
}

/// Image fetcher backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let parsed = Url::parse(url).map_err(|error| FeedError::InvalidUrl(error.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|error| FeedError::TransferFailed {
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::TransferFailed {
                message: format!("unexpected status {status} for {url}"),
            });
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|error| FeedError::TransferFailed {
                message: error.to_string(),
            })
    }
}

/// Minimal valid PNG header bytes for use in fixtures.
#[cfg(any(test, feature = "test-support"))]
#[must_use]
pub fn test_png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00]
}

/// A decoded PNG image for use in fixtures.
#[cfg(any(test, feature = "test-support"))]
#[must_use]
pub fn test_png_image() -> Arc<Image> {
    Arc::new(Image {
        format: ImageFormat::Png,
        bytes: test_png_bytes(),
    })
}
