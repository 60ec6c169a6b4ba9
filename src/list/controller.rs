//! The list-query controller.
//!
//! Owns the query state for one list view, turns user intent into request
//! payloads, and hands fetch execution to the [`QueryCache`]. The renderer
//! always gets defined rows and a defined total: a fetch failure surfaces
//! as an error flag with an empty page, never as a missing result.
//!
//! Search text is special-cased: the raw input updates immediately for
//! display, but only becomes effective after the debounce window so a
//! request is not fired per keystroke. Every other change (filter, sort,
//! extra filters, page) commits synchronously; a page change re-fetches
//! through the same state-driven path as everything else.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::query::{request_key, QueryCache};
use crate::route::Route;

use super::params::{build_payload, ListOptions, Payload, SortDirection};
use super::resource::{Page, Resource};
use super::state::ListQueryState;

pub struct ListController<R: Resource> {
  resource: Arc<R>,
  options: ListOptions,
  state: ListQueryState,
  /// Raw search input, shown while the debounce window is open
  search_input: String,
  search_deadline: Option<Instant>,
  cache: QueryCache<Page<R::Item>>,
}

impl<R: Resource> ListController<R> {
  /// Build a controller seeded from a route query string and start the
  /// initial fetch.
  pub fn new(resource: Arc<R>, options: ListOptions, query: &str) -> Self {
    let state = ListQueryState::from_query(query, &options);
    let mut controller = Self {
      resource,
      search_input: state.search.clone(),
      state,
      options,
      search_deadline: None,
      cache: QueryCache::new(),
    };
    controller.fetch();
    controller
  }

  /// The request payload for the current committed state.
  pub fn payload(&self) -> Payload {
    build_payload(&self.state, &self.options)
  }

  /// The committed state encoded for the route, defaults omitted.
  pub fn query_string(&self) -> String {
    self.state.to_query(&self.options)
  }

  fn fetch(&mut self) {
    let payload = self.payload();
    let key = request_key(self.resource.entity_name(), &payload);
    debug!(
      entity = self.resource.entity_name(),
      page = self.state.page,
      "list fetch"
    );

    let resource = Arc::clone(&self.resource);
    self
      .cache
      .fetch(&key, move || async move { resource.fetch_page(payload).await });
  }

  /// Record typed search text and (re)open the debounce window.
  pub fn on_search_input(&mut self, text: &str) {
    self.search_input = text.trim().to_string();
    self.search_deadline = Some(Instant::now() + self.options.debounce);
  }

  /// Commit pending search text immediately (e.g. on Enter).
  pub fn flush_search(&mut self) {
    if self.search_deadline.take().is_some() && self.state.set_search(self.search_input.clone()) {
      self.fetch();
    }
  }

  pub fn set_filter(&mut self, filter: &str) {
    if self.state.set_filter(filter.to_string()) {
      self.fetch();
    }
  }

  pub fn set_sort_field(&mut self, field: &str) {
    if self.state.set_sort_field(field.to_string()) {
      self.fetch();
    }
  }

  pub fn set_sort_direction(&mut self, direction: SortDirection) {
    if self.state.set_sort_direction(direction) {
      self.fetch();
    }
  }

  pub fn toggle_sort_direction(&mut self) {
    self.set_sort_direction(self.state.sort_direction.toggled());
  }

  pub fn set_extra(&mut self, key: &str, value: Option<&str>) {
    if self.state.set_extra(key, value) {
      self.fetch();
    }
  }

  pub fn set_page(&mut self, page: u64) {
    if self.state.set_page(page) {
      self.fetch();
    }
  }

  pub fn next_page(&mut self) {
    if self.state.page < self.page_count() {
      self.set_page(self.state.page + 1);
    }
  }

  pub fn prev_page(&mut self) {
    self.set_page(self.state.page.saturating_sub(1));
  }

  /// Invalidate every cached page for this entity and re-fetch.
  pub fn refresh(&mut self) {
    self.cache.invalidate();
    self.fetch();
  }

  /// Advance time-driven work: commit due search text, poll the fetch.
  /// Returns `true` when something changed and a re-render is due.
  pub fn tick(&mut self) -> bool {
    let mut changed = false;
    if let Some(deadline) = self.search_deadline {
      if Instant::now() >= deadline {
        self.search_deadline = None;
        if self.state.set_search(self.search_input.clone()) {
          self.fetch();
        }
        changed = true;
      }
    }
    self.cache.poll() || changed
  }

  // Renderer-facing accessors. Rows and total are always defined.

  pub fn rows(&self) -> &[R::Item] {
    self.cache.data().map(|p| p.items.as_slice()).unwrap_or(&[])
  }

  pub fn total(&self) -> u64 {
    self.cache.data().map(|p| p.total).unwrap_or(0)
  }

  pub fn page(&self) -> u64 {
    self.state.page
  }

  pub fn page_count(&self) -> u64 {
    self.total().div_ceil(self.options.page_size).max(1)
  }

  pub fn is_loading(&self) -> bool {
    self.cache.is_loading()
  }

  pub fn is_fetching(&self) -> bool {
    self.cache.is_fetching()
  }

  pub fn is_error(&self) -> bool {
    self.cache.is_error()
  }

  pub fn error(&self) -> Option<&str> {
    self.cache.error()
  }

  pub fn search_input(&self) -> &str {
    &self.search_input
  }

  pub fn filter(&self) -> &str {
    &self.state.filter
  }

  pub fn sort_field(&self) -> &str {
    &self.state.sort_field
  }

  pub fn sort_direction(&self) -> SortDirection {
    self.state.sort_direction
  }

  pub fn extra(&self, key: &str) -> Option<&str> {
    self.state.extra.get(key).map(String::as_str)
  }

  /// Route to the detail view of the row at `index`; `None` when the
  /// resource has no detail resolver (row clicks are then a no-op).
  pub fn detail_route(&self, index: usize) -> Option<Route> {
    let item = self.rows().get(index)?;
    self.resource.detail_link(item)
  }

  pub fn create_route(&self) -> Option<Route> {
    self.resource.create_link()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::list::params::PaginationMode;
  use serde_json::json;
  use std::sync::Mutex;
  use std::time::Duration;

  /// Resource that records every payload it is asked to fetch.
  struct RecordingResource {
    calls: Arc<Mutex<Vec<Payload>>>,
    fail: bool,
    creatable: bool,
  }

  impl RecordingResource {
    fn new() -> Self {
      Self {
        calls: Arc::new(Mutex::new(Vec::new())),
        fail: false,
        creatable: false,
      }
    }

    fn failing() -> Self {
      Self {
        fail: true,
        ..Self::new()
      }
    }

    fn creatable() -> Self {
      Self {
        creatable: true,
        ..Self::new()
      }
    }

    fn calls(&self) -> Vec<Payload> {
      self.calls.lock().unwrap().clone()
    }
  }

  impl Resource for RecordingResource {
    type Item = u64;

    fn entity_name(&self) -> &str {
      "records"
    }

    fn fetch_page(
      &self,
      payload: Payload,
    ) -> impl std::future::Future<Output = Result<Page<u64>, String>> + Send + 'static {
      let calls = self.calls.clone();
      let fail = self.fail;
      async move {
        calls.lock().unwrap().push(payload);
        if fail {
          Err("connection refused".to_string())
        } else {
          Ok(Page::new(vec![1, 2, 3], 42))
        }
      }
    }

    fn detail_link(&self, item: &u64) -> Option<Route> {
      Some(Route::new(format!("record/{item}")))
    }

    fn create_link(&self) -> Option<Route> {
      self.creatable.then(|| Route::new("record/new"))
    }
  }

  fn options() -> ListOptions {
    ListOptions::default().with_debounce(Duration::from_millis(30))
  }

  async fn settle<R: Resource>(controller: &mut ListController<R>) {
    for _ in 0..50 {
      tokio::time::sleep(Duration::from_millis(5)).await;
      if controller.tick() {
        return;
      }
    }
  }

  #[tokio::test]
  async fn test_initial_fetch_uses_route_state() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "page=2&search=bolt");
    settle(&mut controller).await;

    let calls = resource.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["offset"], json!(20));
    assert_eq!(calls[0]["query"], json!("bolt"));
    assert_eq!(controller.rows(), &[1, 2, 3]);
    assert_eq!(controller.total(), 42);
  }

  #[tokio::test]
  async fn test_fetch_failure_leaves_defined_empty_result() {
    let resource = Arc::new(RecordingResource::failing());
    let mut controller = ListController::new(resource, options(), "");
    settle(&mut controller).await;

    assert!(controller.is_error());
    assert_eq!(controller.error(), Some("connection refused"));
    assert!(controller.rows().is_empty());
    assert_eq!(controller.total(), 0);
  }

  #[tokio::test]
  async fn test_debounce_commits_once_with_last_value() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "");
    settle(&mut controller).await;

    controller.on_search_input("w");
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!controller.tick());
    controller.on_search_input("wi");
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.tick();
    controller.on_search_input("widget");

    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.tick();
    settle(&mut controller).await;

    let searches: Vec<_> = resource
      .calls()
      .iter()
      .filter_map(|p| p.get("query").cloned())
      .collect();
    assert_eq!(searches, vec![json!("widget")]);
  }

  #[tokio::test]
  async fn test_search_commit_resets_page() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "page=4");
    settle(&mut controller).await;
    assert_eq!(controller.page(), 4);

    controller.on_search_input("widget");
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.tick();
    settle(&mut controller).await;

    assert_eq!(controller.page(), 1);
    let last = resource.calls().into_iter().last().unwrap();
    assert_eq!(last["query"], json!("widget"));
    assert_eq!(last["offset"], json!(0));
  }

  #[tokio::test]
  async fn test_page_change_refetches_through_state() {
    let resource = Arc::new(RecordingResource::new());
    let options = options().with_pagination_mode(PaginationMode::PagePerPage);
    let mut controller = ListController::new(resource.clone(), options, "");
    settle(&mut controller).await;

    controller.set_page(3);
    settle(&mut controller).await;

    let calls = resource.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1]["page"], json!(3));
    assert_eq!(calls[1]["per_page"], json!(20));
  }

  #[tokio::test]
  async fn test_filter_change_resets_page_and_refetches() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "page=3");
    settle(&mut controller).await;

    controller.set_filter("active");
    settle(&mut controller).await;

    assert_eq!(controller.page(), 1);
    let last = resource.calls().into_iter().last().unwrap();
    assert_eq!(last["state"], json!("active"));
    assert_eq!(last["offset"], json!(0));
  }

  #[tokio::test]
  async fn test_refresh_bypasses_fresh_cache() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "");
    settle(&mut controller).await;
    assert_eq!(resource.calls().len(), 1);

    // Same state, fresh cache: a plain page "change" to page 1 is a no-op.
    controller.set_page(1);
    assert_eq!(resource.calls().len(), 1);

    controller.refresh();
    settle(&mut controller).await;
    assert_eq!(resource.calls().len(), 2);
  }

  #[tokio::test]
  async fn test_returning_to_cached_page_serves_cache() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "");
    settle(&mut controller).await;

    controller.set_page(2);
    settle(&mut controller).await;
    assert_eq!(resource.calls().len(), 2);

    controller.set_page(1);
    assert_eq!(controller.rows(), &[1, 2, 3]);
    assert_eq!(resource.calls().len(), 2);
  }

  #[tokio::test]
  async fn test_query_string_mirrors_committed_state() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "");
    settle(&mut controller).await;
    assert_eq!(controller.query_string(), "");

    controller.set_filter("active");
    controller.set_page(2);
    assert_eq!(controller.query_string(), "page=2&state=active");

    // Typed-but-uncommitted search is not in the query string yet.
    controller.on_search_input("widget");
    assert!(!controller.query_string().contains("widget"));
  }

  #[tokio::test]
  async fn test_detail_route_resolution() {
    let resource = Arc::new(RecordingResource::new());
    let mut controller = ListController::new(resource.clone(), options(), "");
    settle(&mut controller).await;

    assert_eq!(controller.detail_route(0), Some(Route::new("record/1")));
    assert_eq!(controller.detail_route(99), None);
    // No create resolver configured: create navigation is a no-op.
    assert_eq!(controller.create_route(), None);
  }

  #[tokio::test]
  async fn test_create_route_follows_resource_resolver() {
    let resource = Arc::new(RecordingResource::creatable());
    let controller = ListController::new(resource, options(), "");
    assert_eq!(controller.create_route(), Some(Route::new("record/new")));
  }
}
