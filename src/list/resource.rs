//! The resource contract a list view fetches through.
//!
//! A resource adapts one backend entity to the fixed `{items, total}` page
//! contract. Implementations own their wire-format details; controllers
//! and views only ever see `Page<Item>`. Resources are injected into the
//! controller at construction, never reached through globals.

use std::future::Future;

use crate::route::Route;

use super::params::Payload;

/// One page of entities plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total: u64) -> Self {
    Self { items, total }
  }

  pub fn empty() -> Self {
    Self {
      items: Vec::new(),
      total: 0,
    }
  }
}

impl<T> Default for Page<T> {
  fn default() -> Self {
    Self::empty()
  }
}

/// Fetches pages of one entity for given request parameters.
///
/// `fetch_page` implementations should clone what they need and return a
/// `'static` future; errors come back as display strings since the only
/// consumer is the error state of a view.
pub trait Resource: Send + Sync + 'static {
  type Item: Clone + Send + Sync + 'static;

  /// Entity name, also the first component of request cache keys.
  fn entity_name(&self) -> &str;

  fn fetch_page(
    &self,
    payload: Payload,
  ) -> impl Future<Output = Result<Page<Self::Item>, String>> + Send + 'static;

  /// Route to the detail view for a record, if the entity has one.
  fn detail_link(&self, _item: &Self::Item) -> Option<Route> {
    None
  }

  /// Route to the create view, if the entity has one.
  fn create_link(&self) -> Option<Route> {
    None
  }
}
