//! User-controlled query state for a list view.
//!
//! The state round-trips through a route query string so any list view is
//! shareable: it is decoded once when the view is opened and re-encoded
//! after every committed change. Values still at their defaults are left
//! out of the query string, so the default state encodes to nothing.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::route;

use super::params::{ListOptions, SortDirection, DEFAULT_PAGE, PAGE_PARAM, SEARCH_PARAM};

/// Everything the user controls about what page of data is requested.
///
/// The page-reset invariant lives in the mutators: any change to search,
/// filter, sort, or extra filters puts the user back on page 1. Mutators
/// return whether the state actually changed so callers can skip
/// re-fetching on no-op updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryState {
  pub page: u64,
  pub search: String,
  pub filter: String,
  pub sort_field: String,
  pub sort_direction: SortDirection,
  /// Extra filter key/values (e.g. `warehouse_id`), carried verbatim
  pub extra: BTreeMap<String, String>,
}

impl ListQueryState {
  pub fn new(options: &ListOptions) -> Self {
    Self {
      page: DEFAULT_PAGE,
      search: String::new(),
      filter: String::new(),
      sort_field: options.default_sort_field.clone(),
      sort_direction: options.default_sort_direction,
      extra: BTreeMap::new(),
    }
  }

  /// Decode a query string, falling back to defaults for anything absent
  /// or malformed (a non-numeric page is treated as page 1, not an error).
  pub fn from_query(query: &str, options: &ListOptions) -> Self {
    let mut state = Self::new(options);

    for (key, value) in route::parse_query(query) {
      if key == PAGE_PARAM {
        state.page = value.parse().unwrap_or(DEFAULT_PAGE).max(1);
      } else if key == SEARCH_PARAM {
        state.search = value;
      } else if key == options.filter_param {
        state.filter = value;
      } else if key == options.sort_params.field {
        state.sort_field = value;
      } else if key == options.sort_params.direction {
        state.sort_direction =
          SortDirection::parse(&value).unwrap_or(options.default_sort_direction);
      } else {
        state.extra.insert(key, value);
      }
    }

    state
  }

  /// Encode to a query string, omitting values at their defaults.
  pub fn to_query(&self, options: &ListOptions) -> String {
    let mut pairs: Vec<(&str, Cow<'_, str>)> = Vec::new();

    if self.page != DEFAULT_PAGE {
      pairs.push((PAGE_PARAM, Cow::Owned(self.page.to_string())));
    }
    if !self.search.is_empty() {
      pairs.push((SEARCH_PARAM, Cow::Borrowed(self.search.as_str())));
    }
    if !self.filter.is_empty() {
      pairs.push((&options.filter_param, Cow::Borrowed(self.filter.as_str())));
    }
    if self.sort_field != options.default_sort_field {
      pairs.push((&options.sort_params.field, Cow::Borrowed(&self.sort_field)));
    }
    if self.sort_direction != options.default_sort_direction {
      pairs.push((
        &options.sort_params.direction,
        Cow::Borrowed(self.sort_direction.as_str()),
      ));
    }
    for (key, value) in &self.extra {
      pairs.push((key, Cow::Borrowed(value)));
    }

    route::encode_query(pairs)
  }

  pub fn set_page(&mut self, page: u64) -> bool {
    let page = page.max(1);
    if self.page == page {
      return false;
    }
    self.page = page;
    true
  }

  pub fn set_search(&mut self, search: String) -> bool {
    if self.search == search {
      return false;
    }
    self.search = search;
    self.page = DEFAULT_PAGE;
    true
  }

  pub fn set_filter(&mut self, filter: String) -> bool {
    if self.filter == filter {
      return false;
    }
    self.filter = filter;
    self.page = DEFAULT_PAGE;
    true
  }

  pub fn set_sort_field(&mut self, field: String) -> bool {
    if self.sort_field == field {
      return false;
    }
    self.sort_field = field;
    self.page = DEFAULT_PAGE;
    true
  }

  pub fn set_sort_direction(&mut self, direction: SortDirection) -> bool {
    if self.sort_direction == direction {
      return false;
    }
    self.sort_direction = direction;
    self.page = DEFAULT_PAGE;
    true
  }

  /// Set or clear (`None`) an extra filter.
  pub fn set_extra(&mut self, key: &str, value: Option<&str>) -> bool {
    let changed = match value {
      Some(v) => self.extra.get(key).map(String::as_str) != Some(v) && {
        self.extra.insert(key.to_string(), v.to_string());
        true
      },
      None => self.extra.remove(key).is_some(),
    };
    if changed {
      self.page = DEFAULT_PAGE;
    }
    changed
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn options() -> ListOptions {
    ListOptions::default()
  }

  #[test]
  fn test_page_resets_on_every_intent_change() {
    let options = options();
    let mut state = ListQueryState::new(&options);

    state.set_page(5);
    assert!(state.set_search("widget".to_string()));
    assert_eq!(state.page, 1);

    state.set_page(5);
    assert!(state.set_filter("active".to_string()));
    assert_eq!(state.page, 1);

    state.set_page(5);
    assert!(state.set_sort_field("name".to_string()));
    assert_eq!(state.page, 1);

    state.set_page(5);
    assert!(state.set_sort_direction(SortDirection::Asc));
    assert_eq!(state.page, 1);

    state.set_page(5);
    assert!(state.set_extra("warehouse_id", Some("2")));
    assert_eq!(state.page, 1);

    state.set_page(5);
    assert!(state.set_extra("warehouse_id", None));
    assert_eq!(state.page, 1);
  }

  #[test]
  fn test_noop_change_keeps_page() {
    let options = options();
    let mut state = ListQueryState::new(&options);
    state.set_search("widget".to_string());
    state.set_page(4);

    assert!(!state.set_search("widget".to_string()));
    assert!(!state.set_filter(String::new()));
    assert!(!state.set_extra("missing", None));
    assert_eq!(state.page, 4);
  }

  #[test]
  fn test_default_state_encodes_to_empty_query() {
    let options = options();
    let state = ListQueryState::new(&options);
    assert_eq!(state.to_query(&options), "");
  }

  #[test]
  fn test_query_round_trip() {
    let options = options();
    let mut state = ListQueryState::new(&options);
    state.set_filter("low_stock".to_string());
    state.set_search("پیچ گوشتی".to_string());
    state.set_sort_field("name".to_string());
    state.set_sort_direction(SortDirection::Asc);
    state.set_extra("warehouse_id", Some("2"));
    state.set_page(3);

    let query = state.to_query(&options);
    let decoded = ListQueryState::from_query(&query, &options);
    assert_eq!(decoded, state);
  }

  #[test]
  fn test_defaults_omitted_from_query() {
    let options = options();
    let mut state = ListQueryState::new(&options);
    state.set_page(2);

    let query = state.to_query(&options);
    assert_eq!(query, "page=2");
  }

  #[test]
  fn test_malformed_page_falls_back_to_default() {
    let options = options();
    let state = ListQueryState::from_query("page=abc&search=x", &options);
    assert_eq!(state.page, 1);
    assert_eq!(state.search, "x");

    let state = ListQueryState::from_query("page=0", &options);
    assert_eq!(state.page, 1);
  }

  #[test]
  fn test_unknown_params_survive_as_extra_filters() {
    let options = options();
    let state = ListQueryState::from_query("warehouse_id=2&channel=web", &options);
    assert_eq!(state.extra.get("warehouse_id").map(String::as_str), Some("2"));
    assert_eq!(state.extra.get("channel").map(String::as_str), Some("web"));

    let query = state.to_query(&options);
    let decoded = ListQueryState::from_query(&query, &options);
    assert_eq!(decoded, state);
  }

  #[test]
  fn test_configured_param_names_in_query() {
    let options = ListOptions::default()
      .with_filter_param("status")
      .with_sort_params("sort", "order");
    let mut state = ListQueryState::new(&options);
    state.set_filter("done".to_string());
    state.set_sort_field("updated".to_string());

    let query = state.to_query(&options);
    assert!(query.contains("status=done"));
    assert!(query.contains("sort=updated"));
    assert_eq!(ListQueryState::from_query(&query, &options), state);
  }
}
