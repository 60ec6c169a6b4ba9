//! Request payload construction for list queries.
//!
//! Parameter names and the pagination vocabulary vary per backend entity,
//! so both are configured per list instance. The payload is a flat JSON
//! map sent as URL query parameters by the resource client.

use std::time::Duration;

use serde_json::json;

use super::state::ListQueryState;

/// Flat request payload, serialized to query parameters.
pub type Payload = serde_json::Map<String, serde_json::Value>;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const DEFAULT_SORT_FIELD: &str = "id";

pub const SEARCH_PARAM: &str = "search";
pub const PAGE_PARAM: &str = "page";
pub const QUERY_KEY: &str = "query";
pub const DEFAULT_FILTER_PARAM: &str = "state";
pub const DEFAULT_SORT_FIELD_PARAM: &str = "sortField";
pub const DEFAULT_SORT_DIRECTION_PARAM: &str = "sortDirection";

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Which pagination vocabulary the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationMode {
  /// Payload carries `{limit, offset}`
  #[default]
  LimitOffset,
  /// Payload carries `{page, per_page}`
  PagePerPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

impl SortDirection {
  pub fn as_str(self) -> &'static str {
    match self {
      SortDirection::Asc => "asc",
      SortDirection::Desc => "desc",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "asc" => Some(SortDirection::Asc),
      "desc" => Some(SortDirection::Desc),
      _ => None,
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      SortDirection::Asc => SortDirection::Desc,
      SortDirection::Desc => SortDirection::Asc,
    }
  }
}

/// Parameter names used for the sort fields, both in payloads and in
/// route query strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParams {
  pub field: String,
  pub direction: String,
}

impl Default for SortParams {
  fn default() -> Self {
    Self {
      field: DEFAULT_SORT_FIELD_PARAM.to_string(),
      direction: DEFAULT_SORT_DIRECTION_PARAM.to_string(),
    }
  }
}

/// Per-instance configuration of a list query.
#[derive(Debug, Clone)]
pub struct ListOptions {
  pub pagination_mode: PaginationMode,
  pub page_size: u64,
  pub sort_params: SortParams,
  pub filter_param: String,
  pub default_sort_field: String,
  pub default_sort_direction: SortDirection,
  /// Fixed payload merged under everything else (never user-controlled)
  pub fixed_payload: Payload,
  /// Delay before typed search text becomes effective
  pub debounce: Duration,
}

impl Default for ListOptions {
  fn default() -> Self {
    Self {
      pagination_mode: PaginationMode::default(),
      page_size: DEFAULT_PAGE_SIZE,
      sort_params: SortParams::default(),
      filter_param: DEFAULT_FILTER_PARAM.to_string(),
      default_sort_field: DEFAULT_SORT_FIELD.to_string(),
      default_sort_direction: SortDirection::default(),
      fixed_payload: Payload::new(),
      debounce: DEFAULT_DEBOUNCE,
    }
  }
}

impl ListOptions {
  pub fn with_pagination_mode(mut self, mode: PaginationMode) -> Self {
    self.pagination_mode = mode;
    self
  }

  pub fn with_page_size(mut self, page_size: u64) -> Self {
    self.page_size = page_size.max(1);
    self
  }

  pub fn with_filter_param(mut self, name: impl Into<String>) -> Self {
    self.filter_param = name.into();
    self
  }

  pub fn with_sort_params(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
    self.sort_params = SortParams {
      field: field.into(),
      direction: direction.into(),
    };
    self
  }

  pub fn with_default_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
    self.default_sort_field = field.into();
    self.default_sort_direction = direction;
    self
  }

  pub fn with_fixed_payload(mut self, payload: Payload) -> Self {
    self.fixed_payload = payload;
    self
  }

  pub fn with_debounce(mut self, debounce: Duration) -> Self {
    self.debounce = debounce;
    self
  }
}

/// Build the request payload for the current query state.
///
/// Merge order (later entries win on key collision): fixed payload, extra
/// filters, pagination fields, sort fields, search text under `query` when
/// non-empty, filter value under the configured name when non-empty.
pub fn build_payload(state: &ListQueryState, options: &ListOptions) -> Payload {
  let mut payload = options.fixed_payload.clone();

  for (key, value) in &state.extra {
    payload.insert(key.clone(), json!(value));
  }

  match options.pagination_mode {
    PaginationMode::LimitOffset => {
      let offset = (state.page.saturating_sub(1)) * options.page_size;
      payload.insert("limit".to_string(), json!(options.page_size));
      payload.insert("offset".to_string(), json!(offset));
    }
    PaginationMode::PagePerPage => {
      payload.insert("page".to_string(), json!(state.page));
      payload.insert("per_page".to_string(), json!(options.page_size));
    }
  }

  payload.insert(options.sort_params.field.clone(), json!(state.sort_field));
  payload.insert(
    options.sort_params.direction.clone(),
    json!(state.sort_direction.as_str()),
  );

  if !state.search.is_empty() {
    payload.insert(QUERY_KEY.to_string(), json!(state.search));
  }
  if !state.filter.is_empty() {
    payload.insert(options.filter_param.clone(), json!(state.filter));
  }

  payload
}
