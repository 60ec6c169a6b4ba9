//! Async fetch engine with per-key caching.
//!
//! `QueryCache<T>` executes fetches on the tokio runtime and delivers
//! results over a channel polled from the UI tick, so views never block.
//! Results are cached in memory under a request key:
//!
//! - a fetch for the key already in flight is a no-op (deduplication),
//! - a cached entry is shown immediately; if older than the freshness
//!   window a background re-fetch starts while the old data stays visible,
//! - fetching a different key drops the previous in-flight receiver, so a
//!   superseded response is ignored rather than cancelled mid-request.
//!
//! The cache is ephemeral. Nothing is persisted; a restarted session
//! rebuilds its state from the route it was opened with.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use sha2::{Digest, Sha256};
use tokio::sync::mpsc;

/// Freshness window after which a cached entry is revalidated.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Build the request key for an entity page: entity name plus the full
/// request payload, hashed for a stable fixed-length key.
pub fn request_key(entity: &str, payload: &serde_json::Map<String, serde_json::Value>) -> String {
  let body = serde_json::Value::Object(payload.clone()).to_string();
  let mut hasher = Sha256::new();
  hasher.update(entity.as_bytes());
  hasher.update(b":");
  hasher.update(body.as_bytes());
  hex::encode(hasher.finalize())
}

/// The state of the current query.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// No fetch has been requested yet
  Idle,
  /// Fetching with no cached data to show
  Loading,
  /// Data available (possibly stale while a revalidation runs)
  Success(T),
  /// Fetch failed
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

struct CacheEntry<T> {
  data: T,
  fetched_at: Instant,
}

struct Inflight<T> {
  key: String,
  rx: mpsc::UnboundedReceiver<Result<T, String>>,
}

/// In-memory fetch cache keyed by request key.
pub struct QueryCache<T> {
  state: QueryState<T>,
  entries: HashMap<String, CacheEntry<T>>,
  inflight: Option<Inflight<T>>,
  stale_time: Duration,
}

impl<T: Clone + Send + 'static> QueryCache<T> {
  pub fn new() -> Self {
    Self {
      state: QueryState::Idle,
      entries: HashMap::new(),
      inflight: None,
      stale_time: DEFAULT_STALE_TIME,
    }
  }

  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  /// True only when fetching with nothing to show.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// True whenever a request is in flight, including background revalidation.
  pub fn is_fetching(&self) -> bool {
    self.inflight.is_some()
  }

  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Make `key` the current query, fetching it if needed.
  ///
  /// Cached data for the key is surfaced immediately. A network request is
  /// spawned only when the key is uncached or its entry has outlived the
  /// freshness window. A request already in flight for the same key is
  /// reused; one for a different key is superseded.
  pub fn fetch<F, Fut>(&mut self, key: &str, fetcher: F)
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    if self.inflight.as_ref().is_some_and(|f| f.key == key) {
      return;
    }

    if let Some(entry) = self.entries.get(key) {
      self.state = QueryState::Success(entry.data.clone());
      if entry.fetched_at.elapsed() <= self.stale_time {
        // Fresh hit; also drops any superseded in-flight request.
        self.inflight = None;
        return;
      }
      // Stale: revalidate in the background while the old data stays up.
    } else {
      self.state = QueryState::Loading;
    }

    self.spawn(key.to_string(), Box::pin(fetcher()));
  }

  /// Drop all cached entries. The next `fetch` goes to the network.
  pub fn invalidate(&mut self) {
    self.entries.clear();
  }

  /// Poll for a completed fetch. Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let inflight = match &mut self.inflight {
      Some(f) => f,
      None => return false,
    };

    match inflight.rx.try_recv() {
      Ok(Ok(data)) => {
        let key = inflight.key.clone();
        self.entries.insert(
          key,
          CacheEntry {
            data: data.clone(),
            fetched_at: Instant::now(),
          },
        );
        self.state = QueryState::Success(data);
        self.inflight = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.inflight = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        self.state = QueryState::Error("request was dropped".to_string());
        self.inflight = None;
        true
      }
    }
  }

  fn spawn(&mut self, key: String, future: BoxFuture<'static, Result<T, String>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.inflight = Some(Inflight { key, rx });

    tokio::spawn(async move {
      let result = future.await;
      // Send fails when this request was superseded; the result is discarded.
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for QueryCache<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueryCache")
      .field("state", &self.state)
      .field("cached_keys", &self.entries.len())
      .field("stale_time", &self.stale_time)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;

  async fn settle<T: Clone + Send + 'static>(cache: &mut QueryCache<T>) {
    for _ in 0..50 {
      tokio::time::sleep(Duration::from_millis(5)).await;
      if cache.poll() {
        return;
      }
    }
  }

  #[tokio::test]
  async fn test_fetch_success() {
    let mut cache = QueryCache::new();
    cache.fetch("a", || async { Ok::<_, String>(vec![1, 2, 3]) });
    assert!(cache.is_loading());

    settle(&mut cache).await;
    assert_eq!(cache.data(), Some(&vec![1, 2, 3]));
    assert!(!cache.is_fetching());
  }

  #[tokio::test]
  async fn test_fetch_error() {
    let mut cache: QueryCache<i32> = QueryCache::new();
    cache.fetch("a", || async { Err("boom".to_string()) });

    settle(&mut cache).await;
    assert!(cache.is_error());
    assert_eq!(cache.error(), Some("boom"));
    assert_eq!(cache.data(), None);
  }

  #[tokio::test]
  async fn test_inflight_dedup() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut cache = QueryCache::new();

    for _ in 0..3 {
      let calls = calls.clone();
      cache.fetch("a", move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, String>(7)
      });
    }

    settle(&mut cache).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.data(), Some(&7));
  }

  #[tokio::test]
  async fn test_new_key_supersedes_inflight() {
    let mut cache = QueryCache::new();
    cache.fetch("slow", || async {
      tokio::time::sleep(Duration::from_millis(50)).await;
      Ok::<_, String>("slow".to_string())
    });
    cache.fetch("fast", || async { Ok::<_, String>("fast".to_string()) });

    settle(&mut cache).await;
    assert_eq!(cache.data(), Some(&"fast".to_string()));

    // The slow response never lands, even after it would have completed.
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(!cache.poll());
    assert_eq!(cache.data(), Some(&"fast".to_string()));
  }

  #[tokio::test]
  async fn test_fresh_hit_skips_network() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut cache = QueryCache::new();

    let c = calls.clone();
    cache.fetch("a", move || async move {
      c.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>(1)
    });
    settle(&mut cache).await;

    let c = calls.clone();
    cache.fetch("a", move || async move {
      c.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>(2)
    });
    assert!(!cache.is_fetching());
    assert_eq!(cache.data(), Some(&1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_stale_entry_revalidates_in_background() {
    let mut cache = QueryCache::new().with_stale_time(Duration::ZERO);
    cache.fetch("a", || async { Ok::<_, String>(1) });
    settle(&mut cache).await;

    cache.fetch("a", || async { Ok::<_, String>(2) });
    // Old data stays visible while the revalidation runs.
    assert_eq!(cache.data(), Some(&1));
    assert!(cache.is_fetching());

    settle(&mut cache).await;
    assert_eq!(cache.data(), Some(&2));
  }

  #[tokio::test]
  async fn test_invalidate_forces_refetch() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut cache = QueryCache::new();

    let c = calls.clone();
    cache.fetch("a", move || async move {
      c.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>(1)
    });
    settle(&mut cache).await;

    cache.invalidate();
    let c = calls.clone();
    cache.fetch("a", move || async move {
      c.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>(2)
    });
    assert!(cache.is_loading());

    settle(&mut cache).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.data(), Some(&2));
  }

  #[test]
  fn test_request_key_is_payload_sensitive() {
    let mut a = serde_json::Map::new();
    a.insert("page".to_string(), serde_json::json!(1));
    let mut b = a.clone();
    b.insert("query".to_string(), serde_json::json!("widget"));

    assert_eq!(request_key("products", &a), request_key("products", &a));
    assert_ne!(request_key("products", &a), request_key("products", &b));
    assert_ne!(request_key("products", &a), request_key("purchases", &a));
  }
}
