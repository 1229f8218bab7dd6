//! Page orchestration: fetch, fan-out image resolution, merge, notify.
//!
//! [`PageLoader`] drives the pagination state machine. One logical load runs
//! at a time, guarded by an in-flight flag rather than a queue: calls made
//! while a load is running are dropped. Within a load, image resolution for
//! the batch fans out into one task per URL and fans back in through a
//! structured join, so the batch only merges once every fetch has settled.
//! Dropping the load future aborts all outstanding fetches and publishes
//! nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::LoaderConfig;

use super::cursor::PageCursor;
use super::error::FeedError;
use super::images::{Image, ImageCache, ImageFetcher};
use super::models::{RawReview, ReviewId, ReviewItem};
use super::source::ReviewSource;
use super::state::{ListState, StateObserver};

/// Result of a [`PageLoader::load_next_page`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and merged.
    Loaded {
        /// Number of items appended to the list.
        added: usize,
    },
    /// The call was dropped without touching the source.
    Skipped(SkipReason),
}

/// Why a load call was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another load is already in flight.
    AlreadyLoading,
    /// The cursor reports no further pages.
    Exhausted,
}

/// Where a fetched image belongs within its review.
#[derive(Debug, Clone, Copy)]
enum ImageSlot {
    Avatar,
    Photo(usize),
}

/// Images resolved for one review, photo slots in request order.
#[derive(Debug, Default)]
struct ResolvedImages {
    avatar: Option<Arc<Image>>,
    photos: Vec<Option<Arc<Image>>>,
}

impl ResolvedImages {
    fn with_photo_slots(count: usize) -> Self {
        Self {
            avatar: None,
            photos: vec![None; count],
        }
    }

    fn place(&mut self, slot: ImageSlot, image: Arc<Image>) {
        match slot {
            ImageSlot::Avatar => self.avatar = Some(image),
            ImageSlot::Photo(index) => {
                if let Some(entry) = self.photos.get_mut(index) {
                    *entry = Some(image);
                }
            }
        }
    }
}

/// Clears the in-flight flag and any published loading indicator when the
/// load path unwinds or is cancelled, so a dropped load never leaves the
/// state claiming a load is still in progress.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    state: &'a Mutex<ListState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_loading(false);
        self.flag.store(false, Ordering::Release);
    }
}

/// Orchestrates page loading and image resolution for the review list.
///
/// All [`ListState`] mutations flow through this type under a single-writer
/// discipline; observers receive cloned snapshots after the state lock is
/// released, so they may inspect but must not assume re-entrancy.
pub struct PageLoader<S, F>
where
    S: ReviewSource,
    F: ImageFetcher + 'static,
{
    source: S,
    fetcher: Arc<F>,
    cache: Arc<dyn ImageCache>,
    observer: Arc<dyn StateObserver>,
    state: Mutex<ListState>,
    in_flight: AtomicBool,
    config: LoaderConfig,
}

impl<S, F> PageLoader<S, F>
where
    S: ReviewSource,
    F: ImageFetcher + 'static,
{
    /// Creates a loader over the given collaborators with an empty list.
    #[must_use]
    pub fn new(
        source: S,
        fetcher: F,
        cache: Arc<dyn ImageCache>,
        observer: Arc<dyn StateObserver>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            source,
            fetcher: Arc::new(fetcher),
            cache,
            observer,
            state: Mutex::new(ListState::new(PageCursor::new(config.page_limit.max(1)))),
            in_flight: AtomicBool::new(false),
            config,
        }
    }

    /// Returns a snapshot of the current list state.
    #[must_use]
    pub fn snapshot(&self) -> ListState {
        self.lock_state().clone()
    }

    /// Loads the next page and merges it into the list.
    ///
    /// A no-op returning [`LoadOutcome::Skipped`] when a load is already in
    /// flight or the cursor is exhausted. On a page-level failure the cursor
    /// is left untouched so a later call safely retries the same offset.
    ///
    /// # Errors
    ///
    /// Propagates [`FeedError::SourceUnavailable`] and
    /// [`FeedError::DecodeFailed`] from the review source. Per-image
    /// failures are absorbed and never surface here.
    pub async fn load_next_page(&self) -> Result<LoadOutcome, FeedError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(LoadOutcome::Skipped(SkipReason::AlreadyLoading));
        }
        let _guard = InFlightGuard {
            flag: &self.in_flight,
            state: &self.state,
        };

        let (offset, limit, loading_snapshot) = {
            let mut state = self.lock_state();
            if !state.cursor().has_more() {
                return Ok(LoadOutcome::Skipped(SkipReason::Exhausted));
            }
            // Only the very first page shows a loading indicator; later
            // pages merge silently at the end of the list.
            let snapshot = state.is_empty().then(|| {
                state.set_loading(true);
                state.clone()
            });
            (state.cursor().offset(), state.cursor().limit(), snapshot)
        };
        if let Some(snapshot) = loading_snapshot {
            self.observer.state_changed(&snapshot);
        }

        debug!(offset, limit, "requesting review page");
        let page = match self.source.fetch_page(offset, limit).await {
            Ok(page) => page,
            Err(error) => {
                let snapshot = {
                    let mut state = self.lock_state();
                    state.set_loading(false);
                    state.clone()
                };
                self.observer.state_changed(&snapshot);
                return Err(error);
            }
        };

        let resolved = self.resolve_batch_images(&page.items).await;
        let items = assemble_items(&page.items, resolved);
        let added = items.len();

        let snapshot = {
            let mut state = self.lock_state();
            state.append(items);
            state.cursor_mut().advance(added, page.count);
            state.set_loading(false);
            state.clone()
        };
        debug!(added, total = page.count, "merged review page");
        self.observer.state_changed(&snapshot);
        Ok(LoadOutcome::Loaded { added })
    }

    /// Lifts the line cap of the identified item and notifies observers.
    ///
    /// Idempotent; unknown ids are ignored.
    pub fn expand_text(&self, id: ReviewId) {
        let snapshot = {
            let mut state = self.lock_state();
            state.expand_text(id).then(|| state.clone())
        };
        if let Some(snapshot) = snapshot {
            self.observer.state_changed(&snapshot);
        }
    }

    /// Resolves every image URL in the batch concurrently and waits for all
    /// of them to settle. Individual failures are logged and dropped.
    async fn resolve_batch_images(&self, reviews: &[RawReview]) -> Vec<ResolvedImages> {
        let mut resolved: Vec<ResolvedImages> = reviews
            .iter()
            .map(|review| ResolvedImages::with_photo_slots(review.photo_urls.len()))
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_fetches.max(1)));
        let mut tasks = JoinSet::new();

        for (index, review) in reviews.iter().enumerate() {
            self.spawn_fetch(
                &mut tasks,
                &semaphore,
                index,
                ImageSlot::Avatar,
                review.avatar_url.clone(),
            );
            for (photo_index, url) in review.photo_urls.iter().enumerate() {
                self.spawn_fetch(
                    &mut tasks,
                    &semaphore,
                    index,
                    ImageSlot::Photo(photo_index),
                    url.clone(),
                );
            }
        }

        while let Some(joined) = tasks.join_next().await {
            let Ok((index, slot, result)) = joined else {
                continue;
            };
            match result {
                Ok(image) => {
                    if let Some(images) = resolved.get_mut(index) {
                        images.place(slot, image);
                    }
                }
                Err(error) => warn!(%error, "image resolution failed; dropping the image"),
            }
        }

        resolved
    }

    fn spawn_fetch(
        &self,
        tasks: &mut JoinSet<(usize, ImageSlot, Result<Arc<Image>, FeedError>)>,
        semaphore: &Arc<Semaphore>,
        index: usize,
        slot: ImageSlot,
        url: String,
    ) {
        let fetcher = Arc::clone(&self.fetcher);
        let cache = Arc::clone(&self.cache);
        let semaphore = Arc::clone(semaphore);
        let budget = self.config.fetch_timeout();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let result = resolve_one(fetcher.as_ref(), cache.as_ref(), &url, budget).await;
            (index, slot, result)
        });
    }

    fn lock_state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resolves a single URL: cache lookup, budgeted fetch, decode, cache fill.
async fn resolve_one<F>(
    fetcher: &F,
    cache: &dyn ImageCache,
    url: &str,
    budget: Duration,
) -> Result<Arc<Image>, FeedError>
where
    F: ImageFetcher + ?Sized,
{
    if let Some(image) = cache.get(url) {
        return Ok(image);
    }

    let bytes = match timeout(budget, fetcher.fetch(url)).await {
        Ok(fetched) => fetched?,
        Err(_elapsed) => {
            return Err(FeedError::TransferFailed {
                message: format!("image fetch exceeded {budget:?}"),
            });
        }
    };

    let image = Arc::new(Image::decode(bytes)?);
    cache.put(url, Arc::clone(&image));
    Ok(image)
}

/// Builds display items in source order from the batch and its images.
fn assemble_items(reviews: &[RawReview], resolved: Vec<ResolvedImages>) -> Vec<ReviewItem> {
    reviews
        .iter()
        .zip(resolved)
        .map(|(raw, images)| {
            let photos = images.photos.into_iter().flatten().collect();
            ReviewItem::from_raw(raw, images.avatar, photos)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::feed::images::test_png_bytes;
    use crate::feed::models::ReviewPage;
    use crate::feed::models::test_support::{raw_review, raw_review_with_photos};
    use crate::feed::{InMemoryImageCache, MockImageFetcher, MockReviewSource, ReviewSource};

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingObserver {
        states: Mutex<Vec<ListState>>,
    }

    impl RecordingObserver {
        fn take(&self) -> Vec<ListState> {
            self.states
                .lock()
                .expect("states mutex should be available")
                .drain(..)
                .collect()
        }
    }

    impl StateObserver for RecordingObserver {
        fn state_changed(&self, state: &ListState) {
            self.states
                .lock()
                .expect("states mutex should be available")
                .push(state.clone());
        }
    }

    /// Fetcher returning a PNG payload tagged with the URL, with optional
    /// scripted failures and delays keyed by URL substring.
    struct ScriptedFetcher {
        fail_marker: Option<&'static str>,
        junk_marker: Option<&'static str>,
        slow_marker: Option<&'static str>,
        slow_for: Duration,
    }

    impl Default for ScriptedFetcher {
        fn default() -> Self {
            Self {
                fail_marker: None,
                junk_marker: None,
                slow_marker: None,
                slow_for: Duration::ZERO,
            }
        }
    }

    fn tagged_png(url: &str) -> Vec<u8> {
        let mut bytes = test_png_bytes();
        bytes.extend_from_slice(url.as_bytes());
        bytes
    }

    #[async_trait]
    impl ImageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError> {
            if let Some(marker) = self.slow_marker {
                if url.contains(marker) {
                    tokio::time::sleep(self.slow_for).await;
                }
            }
            if let Some(marker) = self.fail_marker {
                if url.contains(marker) {
                    return Err(FeedError::TransferFailed {
                        message: format!("scripted failure for {url}"),
                    });
                }
            }
            if let Some(marker) = self.junk_marker {
                if url.contains(marker) {
                    return Ok(b"not an image".to_vec());
                }
            }
            Ok(tagged_png(url))
        }
    }

    /// Source serving a fixed review set with a scripted response delay.
    struct ScriptedSource {
        reviews: Vec<RawReview>,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(reviews: Vec<RawReview>) -> Self {
            Self {
                reviews,
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ReviewSource for ScriptedSource {
        async fn fetch_page(&self, offset: usize, limit: usize) -> Result<ReviewPage, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            let end = offset.saturating_add(limit).min(self.reviews.len());
            let items = self.reviews.get(offset..end).map(<[RawReview]>::to_vec);
            Ok(ReviewPage {
                items: items.unwrap_or_default(),
                count: self.reviews.len(),
            })
        }
    }

    fn build_loader<S, F>(
        source: S,
        fetcher: F,
        page_limit: usize,
    ) -> (
        PageLoader<S, F>,
        Arc<RecordingObserver>,
        Arc<InMemoryImageCache>,
    )
    where
        S: ReviewSource,
        F: ImageFetcher + 'static,
    {
        let observer = Arc::new(RecordingObserver::default());
        let cache = Arc::new(InMemoryImageCache::new());
        let config = LoaderConfig {
            page_limit,
            ..LoaderConfig::default()
        };
        let loader = PageLoader::new(
            source,
            fetcher,
            Arc::clone(&cache) as Arc<dyn ImageCache>,
            Arc::clone(&observer) as Arc<dyn StateObserver>,
            config,
        );
        (loader, observer, cache)
    }

    fn ten_reviews() -> Vec<RawReview> {
        (0..10)
            .map(|index| raw_review(&format!("Reviewer{index}"), "All good."))
            .collect()
    }

    #[tokio::test]
    async fn walks_ten_reviews_in_two_pages_then_goes_idle() {
        let mut source = MockReviewSource::new();
        source
            .expect_fetch_page()
            .times(2)
            .returning(|offset, limit| {
                assert_eq!(limit, 5);
                let items = (offset..offset + limit)
                    .map(|index| raw_review(&format!("Reviewer{index}"), "All good."))
                    .collect();
                Ok(ReviewPage { items, count: 10 })
            });
        let (loader, observer, _cache) = build_loader(source, ScriptedFetcher::default(), 5);

        let first = loader.load_next_page().await.expect("first page loads");
        assert_eq!(first, LoadOutcome::Loaded { added: 5 });
        let state = loader.snapshot();
        assert_eq!(state.cursor().offset(), 5);
        assert!(state.cursor().has_more());

        let second = loader.load_next_page().await.expect("second page loads");
        assert_eq!(second, LoadOutcome::Loaded { added: 5 });
        let state = loader.snapshot();
        assert_eq!(state.len(), 10);
        assert_eq!(state.cursor().offset(), 10);
        assert!(!state.cursor().has_more());

        // Third call: no fetch is issued (times(2) above) and no state
        // change is published.
        let emissions_before = observer.take().len();
        let third = loader.load_next_page().await.expect("no-op succeeds");
        assert_eq!(third, LoadOutcome::Skipped(SkipReason::Exhausted));
        assert_eq!(observer.take().len(), 0);
        assert!(emissions_before > 0);
    }

    #[tokio::test]
    async fn first_page_shows_a_loading_state_before_data_arrives() {
        let source = ScriptedSource::new(ten_reviews());
        let (loader, observer, _cache) = build_loader(source, ScriptedFetcher::default(), 5);

        loader.load_next_page().await.expect("page loads");

        let emissions = observer.take();
        assert_eq!(emissions.len(), 2);
        let loading = emissions.first().expect("loading emission");
        assert!(loading.is_loading());
        assert!(loading.is_empty());
        let merged = emissions.get(1).expect("merge emission");
        assert!(!merged.is_loading());
        assert_eq!(merged.len(), 5);

        // Later pages merge without a loading indicator.
        loader.load_next_page().await.expect("second page loads");
        assert_eq!(observer.take().len(), 1);
    }

    #[tokio::test]
    async fn page_failure_keeps_the_cursor_retryable() {
        let mut source = MockReviewSource::new();
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_offset, _limit| {
                Err(FeedError::SourceUnavailable {
                    message: "connection refused".to_owned(),
                })
            });
        source
            .expect_fetch_page()
            .times(1)
            .returning(|offset, limit| {
                assert_eq!(offset, 0, "retry re-issues the same offset");
                let items = (0..limit)
                    .map(|index| raw_review(&format!("Reviewer{index}"), "All good."))
                    .collect();
                Ok(ReviewPage { items, count: 10 })
            });
        let (loader, observer, _cache) = build_loader(source, ScriptedFetcher::default(), 5);

        let error = loader
            .load_next_page()
            .await
            .expect_err("first load reports the source failure");
        assert!(matches!(error, FeedError::SourceUnavailable { .. }));

        let state = loader.snapshot();
        assert!(state.is_empty());
        assert!(!state.is_loading());
        assert!(state.cursor().has_more());
        assert_eq!(state.cursor().offset(), 0);

        let emissions = observer.take();
        assert_eq!(emissions.len(), 2, "loading start plus failure settle");

        let retried = loader.load_next_page().await.expect("retry succeeds");
        assert_eq!(retried, LoadOutcome::Loaded { added: 5 });
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_calls_load_exactly_one_page() {
        let mut source = ScriptedSource::new(ten_reviews());
        source.delay = Duration::from_millis(50);
        let calls = Arc::clone(&source.calls);
        let (loader, _observer, _cache) = build_loader(source, ScriptedFetcher::default(), 5);

        let (first, second) = tokio::join!(loader.load_next_page(), loader.load_next_page());
        let outcomes = [
            first.expect("call should not fail"),
            second.expect("call should not fail"),
        ];

        assert!(outcomes.contains(&LoadOutcome::Loaded { added: 5 }));
        assert!(outcomes.contains(&LoadOutcome::Skipped(SkipReason::AlreadyLoading)));
        assert_eq!(loader.snapshot().len(), 5, "no duplicate items appended");
        assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one fetch issued");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_first_load_publishes_nothing_and_stays_retryable() {
        let mut source = ScriptedSource::new(ten_reviews());
        source.delay = Duration::from_secs(60);
        let (loader, observer, _cache) = build_loader(source, ScriptedFetcher::default(), 5);
        let loader = Arc::new(loader);

        let load = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.load_next_page().await }
        });

        // Let the load reach the slow source after its loading emission.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let emissions = observer.take();
        assert_eq!(emissions.len(), 1);
        assert!(emissions.first().is_some_and(ListState::is_loading));

        load.abort();
        assert!(load.await.is_err(), "the load was cancelled");

        let state = loader.snapshot();
        assert!(!state.is_loading(), "cancellation clears the indicator");
        assert!(state.is_empty(), "nothing was published");
        assert!(state.cursor().has_more());
        assert_eq!(state.cursor().offset(), 0);
        assert!(observer.take().is_empty(), "no emission after the cancel");

        let retried = loader.load_next_page().await.expect("retry proceeds");
        assert_eq!(retried, LoadOutcome::Loaded { added: 5 });
        assert_eq!(loader.snapshot().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn output_order_is_independent_of_fetch_completion_order() {
        let reviews = vec![
            raw_review("Alpha", "First."),
            raw_review("Beta", "Second."),
            raw_review("Gamma", "Third."),
        ];
        let fetcher = ScriptedFetcher {
            slow_marker: Some("Alpha"),
            slow_for: Duration::from_secs(2),
            ..ScriptedFetcher::default()
        };
        let (loader, _observer, _cache) = build_loader(ScriptedSource::new(reviews), fetcher, 5);

        loader.load_next_page().await.expect("page loads");

        let state = loader.snapshot();
        let names: Vec<&str> = state
            .items()
            .iter()
            .map(|item| item.full_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Alpha Reviewer", "Beta Reviewer", "Gamma Reviewer"]
        );
        for item in state.items() {
            let avatar = item.avatar.as_ref().expect("every avatar resolves");
            let payload = String::from_utf8_lossy(avatar.bytes()).into_owned();
            let first_name = item.full_name.split(' ').next().unwrap_or_default();
            assert!(
                payload.contains(first_name),
                "avatar bytes belong to {first_name}"
            );
        }
    }

    #[tokio::test]
    async fn failed_photo_is_omitted_and_order_preserved() {
        let reviews = vec![raw_review_with_photos(
            "Pic",
            &[
                "https://img.example.test/p1.png",
                "https://img.example.test/p2.png",
                "https://img.example.test/p3.png",
            ],
        )];
        let fetcher = ScriptedFetcher {
            fail_marker: Some("p2"),
            ..ScriptedFetcher::default()
        };
        let (loader, _observer, _cache) = build_loader(ScriptedSource::new(reviews), fetcher, 5);

        let outcome = loader.load_next_page().await.expect("page loads");
        assert_eq!(outcome, LoadOutcome::Loaded { added: 1 });

        let state = loader.snapshot();
        let item = state.items().first().expect("one item merged");
        assert_eq!(item.photos.len(), 2);
        let survivors: Vec<&[u8]> = item.photos.iter().map(|photo| photo.bytes()).collect();
        assert!(survivors.first().is_some_and(|bytes| bytes.ends_with(b"p1.png")));
        assert!(survivors.get(1).is_some_and(|bytes| bytes.ends_with(b"p3.png")));
    }

    #[tokio::test]
    async fn undecodable_image_bytes_are_absorbed() {
        let reviews = vec![raw_review("Junk", "Body.")];
        let fetcher = ScriptedFetcher {
            junk_marker: Some("Junk"),
            ..ScriptedFetcher::default()
        };
        let (loader, _observer, _cache) = build_loader(ScriptedSource::new(reviews), fetcher, 5);

        let outcome = loader.load_next_page().await.expect("junk bytes never fail the page");
        assert_eq!(outcome, LoadOutcome::Loaded { added: 1 });
        let state = loader.snapshot();
        assert!(state.items().first().is_some_and(|item| item.avatar.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn overrunning_fetch_fails_only_that_url() {
        let mut review = raw_review("Slow", "Body.");
        review.photo_urls = vec!["https://img.example.test/fast.png".to_owned()];
        let fetcher = ScriptedFetcher {
            slow_marker: Some("Slow"),
            slow_for: Duration::from_secs(3600),
            ..ScriptedFetcher::default()
        };
        let (loader, _observer, _cache) = build_loader(ScriptedSource::new(vec![review]), fetcher, 5);

        let outcome = loader.load_next_page().await.expect("timeout never fails the page");
        assert_eq!(outcome, LoadOutcome::Loaded { added: 1 });

        let state = loader.snapshot();
        let item = state.items().first().expect("one item merged");
        assert!(item.avatar.is_none(), "the slow avatar timed out");
        assert_eq!(item.photos.len(), 1, "the fast photo survived");
    }

    #[tokio::test]
    async fn cached_images_skip_the_fetcher() {
        let review = raw_review("Cached", "Body.");
        let avatar_url = review.avatar_url.clone();

        let mut fetcher = MockImageFetcher::new();
        fetcher.expect_fetch().never();

        let observer = Arc::new(RecordingObserver::default());
        let cache = Arc::new(InMemoryImageCache::new());
        let cached_image = crate::feed::images::test_png_image();
        cache.put(&avatar_url, Arc::clone(&cached_image));

        let loader = PageLoader::new(
            ScriptedSource::new(vec![review]),
            fetcher,
            Arc::clone(&cache) as Arc<dyn ImageCache>,
            observer as Arc<dyn StateObserver>,
            LoaderConfig {
                page_limit: 5,
                ..LoaderConfig::default()
            },
        );

        loader.load_next_page().await.expect("page loads");
        let state = loader.snapshot();
        let avatar = state
            .items()
            .first()
            .and_then(|item| item.avatar.clone())
            .expect("avatar comes from the cache");
        assert!(Arc::ptr_eq(&avatar, &cached_image));
    }

    #[tokio::test]
    async fn successful_fetches_populate_the_cache() {
        let review = raw_review("Warm", "Body.");
        let avatar_url = review.avatar_url.clone();
        let (loader, _observer, cache) =
            build_loader(ScriptedSource::new(vec![review]), ScriptedFetcher::default(), 5);

        loader.load_next_page().await.expect("page loads");
        assert!(cache.get(&avatar_url).is_some());
    }

    #[tokio::test]
    async fn expand_text_emits_once_per_item() {
        let (loader, observer, _cache) =
            build_loader(ScriptedSource::new(ten_reviews()), ScriptedFetcher::default(), 5);
        loader.load_next_page().await.expect("page loads");
        let id = loader
            .snapshot()
            .items()
            .first()
            .map(|item| item.id)
            .expect("one item merged");
        observer.take();

        loader.expand_text(id);
        let emissions = observer.take();
        assert_eq!(emissions.len(), 1);
        assert!(
            emissions
                .first()
                .and_then(|state| state.item(id))
                .is_some_and(ReviewItem::is_expanded)
        );

        loader.expand_text(id);
        assert_eq!(observer.take().len(), 0, "repeat expansion stays silent");

        loader.expand_text(ReviewId::generate());
        assert_eq!(observer.take().len(), 0, "unknown ids stay silent");
    }
}
