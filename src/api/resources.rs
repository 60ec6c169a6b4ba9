//! `Resource` implementations binding the list controller to API entities.

use std::future::Future;

use crate::list::{Page, Payload, Resource};
use crate::route::Route;

use super::client::ApiClient;
use super::types::{Product, PurchaseOrder};
use super::wire::{self, WireProduct, WirePurchase};

/// Product inventories, paginated with `page`/`per_page`.
#[derive(Clone)]
pub struct ProductResource {
  client: ApiClient,
}

impl ProductResource {
  pub fn new(client: ApiClient) -> Self {
    Self { client }
  }
}

impl Resource for ProductResource {
  type Item = Product;

  fn entity_name(&self) -> &str {
    "product-inventories"
  }

  fn fetch_page(
    &self,
    payload: Payload,
  ) -> impl Future<Output = Result<Page<Self::Item>, String>> + Send + 'static {
    let client = self.client.clone();
    async move {
      let envelope = client
        .get_list::<WireProduct>("product-inventories", &payload)
        .await
        .map_err(|e| e.to_string())?;
      Ok(wire::adapt_products(envelope))
    }
  }

  fn detail_link(&self, item: &Self::Item) -> Option<Route> {
    Some(Route::new(format!("product/{}", item.id)))
  }
}

/// Purchase inventories, paginated with `page`/`per_page`.
#[derive(Clone)]
pub struct PurchaseResource {
  client: ApiClient,
}

impl PurchaseResource {
  pub fn new(client: ApiClient) -> Self {
    Self { client }
  }
}

impl Resource for PurchaseResource {
  type Item = PurchaseOrder;

  fn entity_name(&self) -> &str {
    "purchase-inventories"
  }

  fn fetch_page(
    &self,
    payload: Payload,
  ) -> impl Future<Output = Result<Page<Self::Item>, String>> + Send + 'static {
    let client = self.client.clone();
    async move {
      let envelope = client
        .get_list::<WirePurchase>("purchase-inventories", &payload)
        .await
        .map_err(|e| e.to_string())?;
      Ok(wire::adapt_purchases(envelope))
    }
  }

  fn detail_link(&self, item: &Self::Item) -> Option<Route> {
    Some(Route::new(format!("purchase/{}", item.id)))
  }
}
