//! Response cache shared by every search in the page session.
//!
//! Each endpoint URL maps to one shared future. The first request for a URL
//! starts the fetch; every later request, whether the fetch is still in
//! flight or already finished, gets a clone of the same future and so sees
//! the same value or the same failure. The table is owned by whoever
//! constructs the cache (the app at mount, or a test) rather than living in
//! a global.

use std::cell::{Cell, RefCell};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, warn};
use serde_json::Value;

use crate::FetchError;

/// Decoded body of an endpoint, or the failure that replaced it.
pub type Response = Result<Rc<Value>, FetchError>;

/// A fetch that may still be running. Clone it freely; all clones resolve
/// to the same [`Response`].
pub type SharedResponse = Shared<LocalBoxFuture<'static, Response>>;

/// Source of JSON documents. Implemented over HTTP by
/// [`HttpFetcher`](crate::HttpFetcher) and by fakes in tests.
pub trait Fetch {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, FetchError>>;
}

/// What happens to an entry whose fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Drop the entry once the failure is known, so the next request retries.
    #[default]
    Evict,
    /// Keep the failure for the rest of the session.
    Remember,
}

struct CacheEntry {
    id: u64,
    response: SharedResponse,
}

type Entries = Rc<RefCell<HashMap<String, CacheEntry>>>;

pub struct ResponseCache<F> {
    fetcher: F,
    entries: Entries,
    next_id: Cell<u64>,
    policy: FailurePolicy,
}

impl<F: Fetch> ResponseCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_policy(fetcher, FailurePolicy::default())
    }

    pub fn with_policy(fetcher: F, policy: FailurePolicy) -> Self {
        Self {
            fetcher,
            entries: Rc::new(RefCell::new(HashMap::new())),
            next_id: Cell::new(0),
            policy,
        }
    }

    /// Return the shared response for `endpoint`, starting a fetch only if
    /// no entry exists yet.
    pub fn get_data(&self, endpoint: &str) -> SharedResponse {
        let mut entries = self.entries.borrow_mut();
        match entries.entry(endpoint.to_owned()) {
            Entry::Occupied(hit) => hit.get().response.clone(),
            Entry::Vacant(slot) => {
                debug!("Cache miss for {}, fetching", endpoint);
                let id = self.next_id.get();
                self.next_id.set(id.wrapping_add(1));
                let response = self.start_fetch(endpoint, id);
                slot.insert(CacheEntry {
                    id,
                    response: response.clone(),
                });
                response
            }
        }
    }

    fn start_fetch(&self, endpoint: &str, id: u64) -> SharedResponse {
        let request = self.fetcher.fetch(endpoint);
        let evict_from: Option<Weak<RefCell<HashMap<String, CacheEntry>>>> = match self.policy {
            FailurePolicy::Evict => Some(Rc::downgrade(&self.entries)),
            FailurePolicy::Remember => None,
        };
        let url = endpoint.to_owned();

        async move {
            let result = request.await.map(Rc::new);
            if let Err(err) = &result {
                warn!("{}", err);
                if let Some(entries) = evict_from.and_then(|weak| weak.upgrade()) {
                    let mut entries = entries.borrow_mut();
                    // A clear() may have let a newer fetch take the slot.
                    if entries.get(&url).map(|e| e.id) == Some(id) {
                        entries.remove(&url);
                        debug!("Evicted failed entry for {}", url);
                    }
                }
            }
            result
        }
        .boxed_local()
        .shared()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn contains(&self, endpoint: &str) -> bool {
        self.entries.borrow().contains_key(endpoint)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Forget every entry. Fetches already handed out keep running and
    /// still resolve for their holders.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future;
    use serde_json::json;

    /// Serves canned bodies and counts how often each URL is requested.
    /// URLs without a canned body fail with HTTP 404.
    #[derive(Clone, Default)]
    pub(crate) struct FakeFetcher {
        bodies: Rc<RefCell<HashMap<String, Value>>>,
        calls: Rc<RefCell<HashMap<String, usize>>>,
    }

    impl FakeFetcher {
        pub(crate) fn with(self, url: &str, body: Value) -> Self {
            self.bodies.borrow_mut().insert(url.to_string(), body);
            self
        }

        pub(crate) fn calls(&self, url: &str) -> usize {
            self.calls.borrow().get(url).copied().unwrap_or(0)
        }

        pub(crate) fn total_calls(&self) -> usize {
            self.calls.borrow().values().sum()
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, FetchError>> {
            *self.calls.borrow_mut().entry(url.to_string()).or_insert(0) += 1;
            let result = match self.bodies.borrow().get(url) {
                Some(body) => Ok(body.clone()),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            };
            future::ready(result).boxed_local()
        }
    }

    #[test]
    fn repeated_requests_fetch_once() {
        let fetcher = FakeFetcher::default().with("u1", json!({"id": 1}));
        let cache = ResponseCache::new(fetcher.clone());

        for _ in 0..5 {
            let body = block_on(cache.get_data("u1")).unwrap();
            assert_eq!(*body, json!({"id": 1}));
        }
        assert_eq!(fetcher.calls("u1"), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_requests_share_one_flight() {
        let fetcher = FakeFetcher::default().with("u1", json!([1, 2, 3]));
        let cache = ResponseCache::new(fetcher.clone());

        let first = cache.get_data("u1");
        let second = cache.get_data("u1");
        assert!(first.ptr_eq(&second));

        let (a, b) = block_on(future::join(first, second));
        assert!(Rc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(fetcher.calls("u1"), 1);
    }

    #[test]
    fn distinct_urls_get_distinct_entries() {
        let fetcher = FakeFetcher::default()
            .with("u1", json!(1))
            .with("u2", json!(2));
        let cache = ResponseCache::new(fetcher.clone());

        assert_eq!(*block_on(cache.get_data("u1")).unwrap(), json!(1));
        assert_eq!(*block_on(cache.get_data("u2")).unwrap(), json!(2));
        assert_eq!(fetcher.total_calls(), 2);
        assert!(cache.contains("u1") && cache.contains("u2"));
    }

    #[test]
    fn evict_policy_retries_after_failure() {
        let fetcher = FakeFetcher::default();
        let cache = ResponseCache::new(fetcher.clone());
        assert_eq!(cache.policy(), FailurePolicy::Evict);

        let first = cache.get_data("missing");
        let second = cache.get_data("missing");
        let (a, b) = block_on(future::join(first, second));
        assert_eq!(a.unwrap_err(), b.unwrap_err());
        assert_eq!(fetcher.calls("missing"), 1);
        assert!(!cache.contains("missing"));

        let _ = block_on(cache.get_data("missing"));
        assert_eq!(fetcher.calls("missing"), 2);
    }

    #[test]
    fn remember_policy_keeps_failure() {
        let fetcher = FakeFetcher::default();
        let cache = ResponseCache::with_policy(fetcher.clone(), FailurePolicy::Remember);

        let err = block_on(cache.get_data("missing")).unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                url: "missing".to_string(),
                status: 404
            }
        );
        assert!(cache.contains("missing"));

        let again = block_on(cache.get_data("missing")).unwrap_err();
        assert_eq!(again, err);
        assert_eq!(fetcher.calls("missing"), 1);
    }

    #[test]
    fn clear_forgets_entries() {
        let fetcher = FakeFetcher::default().with("u1", json!(1));
        let cache = ResponseCache::new(fetcher.clone());

        block_on(cache.get_data("u1")).unwrap();
        cache.clear();
        assert!(cache.is_empty());

        block_on(cache.get_data("u1")).unwrap();
        assert_eq!(fetcher.calls("u1"), 2);
    }

    #[test]
    fn stale_failure_does_not_evict_newer_entry() {
        let fetcher = FakeFetcher::default();
        let cache = ResponseCache::new(fetcher.clone());

        let stale = cache.get_data("missing");
        cache.clear();
        let fresh = cache.get_data("missing");
        assert!(!stale.ptr_eq(&fresh));

        let _ = block_on(stale);
        assert!(cache.contains("missing"));
        let _ = block_on(fresh);
        assert!(!cache.contains("missing"));
    }
}
