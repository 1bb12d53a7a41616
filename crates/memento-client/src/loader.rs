//! Paginated collection loader.
//!
//! A [`PageLoader`] accumulates a page-based collection one page at a time.
//! `load_more` is safe to call repeatedly from a scroll listener: it refuses
//! to overlap fetches for the same instance, fetches pages in strictly
//! increasing order with no gaps, and becomes a no-op once the collection is
//! exhausted. A failed fetch leaves the cursor where it was, so the same
//! page is retried on the next call.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::events::{EventBus, UiEvent};

/// One fetched page: its items in server order and the last valid page
/// index as currently reported by the server.
#[derive(Debug, Clone)]
pub struct FetchedPage<T> {
    /// Items of this page.
    pub items: Vec<T>,
    /// Last valid page index, inclusive. The server is authoritative and
    /// may raise or lower this between calls.
    pub max_page: u32,
}

/// Domain-specific page fetcher injected into a [`PageLoader`].
#[async_trait]
pub trait FetchPage<T>: Send + Sync {
    /// Fetch the given page.
    async fn fetch(&self, page: u32) -> ClientResult<FetchedPage<T>>;
}

#[derive(Debug)]
struct LoaderState<T> {
    items: Vec<T>,
    next_page: u32,
    max_page: u32,
    loading: bool,
}

impl<T> Default for LoaderState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_page: 0,
            max_page: 0,
            loading: false,
        }
    }
}

/// Incrementally loaded, append-only collection with a monotonic page
/// cursor. Each instance owns its collection exclusively.
pub struct PageLoader<T> {
    fetch: Arc<dyn FetchPage<T>>,
    events: EventBus,
    state: Mutex<LoaderState<T>>,
}

impl<T: Clone + Send> PageLoader<T> {
    /// Loader over the given fetcher. Failures are published to `events` as
    /// toasts in addition to being logged.
    pub fn new(fetch: Arc<dyn FetchPage<T>>, events: EventBus) -> Self {
        Self {
            fetch,
            events,
            state: Mutex::new(LoaderState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState<T>> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Fetch the next page and append it, if a fetch is due.
    ///
    /// Returns `false` without side effects when a fetch is already in
    /// flight or the collection is exhausted. On fetch failure the cursor
    /// stays put so the same page is retried next time.
    pub async fn load_more(&self) -> bool {
        let page = {
            let mut state = self.lock();
            if state.loading || state.next_page > state.max_page {
                return false;
            }
            state.loading = true;
            state.next_page
        };

        let outcome = self.fetch.fetch(page).await;

        let mut state = self.lock();
        state.loading = false;
        match outcome {
            Ok(fetched) => {
                state.max_page = fetched.max_page;
                state.items.extend(fetched.items);
                state.next_page = page + 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, page, "failed to load page");
                self.events.emit(UiEvent::Toast {
                    message: err.to_string(),
                });
            }
        }
        true
    }

    /// Remove the first item equal to `item`. Ordering of the rest and the
    /// page cursor are unaffected; absent items are a no-op.
    pub fn delete_item(&self, item: &T)
    where
        T: PartialEq,
    {
        let mut state = self.lock();
        if let Some(index) = state.items.iter().position(|held| held == item) {
            state.items.remove(index);
        }
    }

    /// Snapshot of the accumulated items in arrival order.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    /// Number of accumulated items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether no items have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Whether a fetch is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Whether every known page has been fetched.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        let state = self.lock();
        state.next_page > state.max_page
    }

    /// Next page index the loader will fetch.
    #[must_use]
    pub fn next_page(&self) -> u32 {
        self.lock().next_page
    }

    /// Last valid page index as most recently reported by the server.
    #[must_use]
    pub fn max_page(&self) -> u32 {
        self.lock().max_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio_stream::StreamExt as _;

    /// Scripted fetcher: records requested pages and replays canned
    /// outcomes per page index.
    struct Script {
        pages: Vec<ClientResult<FetchedPage<&'static str>>>,
        calls: Mutex<Vec<u32>>,
    }

    impl Script {
        fn new(pages: Vec<ClientResult<FetchedPage<&'static str>>>) -> Arc<Self> {
            Arc::new(Self {
                pages,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().expect("not poisoned").clone()
        }
    }

    #[async_trait]
    impl FetchPage<&'static str> for Script {
        async fn fetch(&self, page: u32) -> ClientResult<FetchedPage<&'static str>> {
            self.calls.lock().expect("not poisoned").push(page);
            match &self.pages[page as usize] {
                Ok(fetched) => Ok(fetched.clone()),
                Err(_) => Err(ClientError::Http { status: 500 }),
            }
        }
    }

    fn page(items: Vec<&'static str>, max_page: u32) -> ClientResult<FetchedPage<&'static str>> {
        Ok(FetchedPage { items, max_page })
    }

    #[tokio::test]
    async fn accumulates_pages_in_order_until_exhausted() {
        let script = Script::new(vec![
            page(vec!["a", "b"], 1),
            page(vec!["c"], 1),
        ]);
        let loader = PageLoader::new(script.clone(), EventBus::new());

        assert!(loader.load_more().await);
        assert!(loader.load_more().await);
        assert_eq!(loader.items(), vec!["a", "b", "c"]);
        assert!(loader.is_exhausted());

        // Exhaustion is idempotent: no further network calls, no changes.
        assert!(!loader.load_more().await);
        assert!(!loader.load_more().await);
        assert_eq!(script.calls(), vec![0, 1]);
        assert_eq!(loader.items(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn failed_page_is_retried_not_skipped() {
        let script = Script::new(vec![
            page(vec!["a"], 2),
            Err(ClientError::Http { status: 500 }),
            page(vec!["c"], 2),
        ]);
        let loader = PageLoader::new(script.clone(), EventBus::new());
        let mut toasts = loader.events.subscribe();

        assert!(loader.load_more().await);
        assert!(loader.load_more().await); // page 1 fails
        assert_eq!(loader.next_page(), 1);
        assert_eq!(loader.items(), vec!["a"]);

        let toast = toasts.next().await.expect("toast").expect("not lagged");
        assert!(matches!(toast, UiEvent::Toast { .. }));

        assert!(loader.load_more().await); // page 1 again, now from the script's Err slot
        assert_eq!(script.calls(), vec![0, 1, 1]);
    }

    #[tokio::test]
    async fn server_may_grow_the_collection_between_calls() {
        let script = Script::new(vec![
            page(vec!["a"], 0),
            page(vec!["b"], 2),
            page(vec!["c"], 2),
        ]);
        let loader = PageLoader::new(script.clone(), EventBus::new());

        assert!(loader.load_more().await);
        assert!(loader.is_exhausted());
        assert!(!loader.load_more().await);

        // New content appears server-side; the next reported max_page is
        // trusted as-is once a fetch is permitted again.
        {
            let mut state = loader.lock();
            state.max_page = 1;
        }
        assert!(loader.load_more().await);
        assert_eq!(loader.max_page(), 2);
        assert!(loader.load_more().await);
        assert_eq!(loader.items(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn overlapping_calls_issue_a_single_fetch() {
        struct Slow {
            calls: AtomicU32,
        }

        #[async_trait]
        impl FetchPage<&'static str> for Slow {
            async fn fetch(&self, _page: u32) -> ClientResult<FetchedPage<&'static str>> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                Ok(FetchedPage {
                    items: vec!["a"],
                    max_page: 0,
                })
            }
        }

        let fetch = Arc::new(Slow {
            calls: AtomicU32::new(0),
        });
        let loader = Arc::new(PageLoader::new(
            fetch.clone() as Arc<dyn FetchPage<&'static str>>,
            EventBus::new(),
        ));

        let first = {
            let loader = loader.clone();
            tokio::spawn(async move { loader.load_more().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        // Second call observes the in-flight guard and returns immediately.
        assert!(!loader.load_more().await);
        assert!(first.await.expect("task completes"));
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.items(), vec!["a"]);
    }

    #[tokio::test]
    async fn delete_item_removes_first_match_and_keeps_order() {
        let script = Script::new(vec![page(vec!["a", "b", "a", "c"], 0)]);
        let loader = PageLoader::new(script, EventBus::new());
        assert!(loader.load_more().await);

        loader.delete_item(&"a");
        assert_eq!(loader.items(), vec!["b", "a", "c"]);

        // Absent items are a no-op; the cursor is untouched either way.
        loader.delete_item(&"zzz");
        assert_eq!(loader.items(), vec!["b", "a", "c"]);
        assert_eq!(loader.next_page(), 1);
        assert_eq!(loader.max_page(), 0);
    }
}
