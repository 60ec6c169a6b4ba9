//! Routes and query-string helpers.
//!
//! A route is a `path?query` pair, the b9s equivalent of a dashboard URL:
//! commands (`:purchases?page=3`) and link resolvers produce routes, the
//! footer displays the current one, and any list view can be reconstructed
//! from it. Query strings use standard form-urlencoding via the `url` crate.

use std::borrow::Cow;

/// A navigable target: a view path plus an optional query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
  pub path: String,
  pub query: String,
}

impl Route {
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      query: String::new(),
    }
  }

  pub fn with_query(path: impl Into<String>, query: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      query: query.into(),
    }
  }

  /// Split a raw route string on the first `?`.
  pub fn parse(raw: &str) -> Self {
    match raw.split_once('?') {
      Some((path, query)) => Self::with_query(path.trim(), query),
      None => Self::new(raw.trim()),
    }
  }
}

impl std::fmt::Display for Route {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.query.is_empty() {
      write!(f, "{}", self.path)
    } else {
      write!(f, "{}?{}", self.path, self.query)
    }
  }
}

/// Decode a query string into key/value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
  url::form_urlencoded::parse(query.as_bytes())
    .map(|(k, v)| (k.into_owned(), v.into_owned()))
    .collect()
}

/// Encode key/value pairs into a query string.
pub fn encode_query<'a, I>(pairs: I) -> String
where
  I: IntoIterator<Item = (&'a str, Cow<'a, str>)>,
{
  let mut serializer = url::form_urlencoded::Serializer::new(String::new());
  for (key, value) in pairs {
    serializer.append_pair(key, &value);
  }
  serializer.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_plain_path() {
    let route = Route::parse("products");
    assert_eq!(route.path, "products");
    assert!(route.query.is_empty());
  }

  #[test]
  fn test_parse_with_query() {
    let route = Route::parse("purchases?page=3&warehouse_id=2");
    assert_eq!(route.path, "purchases");
    assert_eq!(route.query, "page=3&warehouse_id=2");
  }

  #[test]
  fn test_display_round_trip() {
    let route = Route::parse("products?search=widget");
    assert_eq!(route.to_string(), "products?search=widget");
    assert_eq!(Route::new("products").to_string(), "products");
  }

  #[test]
  fn test_query_encoding_escapes() {
    let encoded = encode_query(vec![("search", Cow::Borrowed("a b&c"))]);
    let decoded = parse_query(&encoded);
    assert_eq!(decoded, vec![("search".to_string(), "a b&c".to_string())]);
  }
}
