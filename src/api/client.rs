//! HTTP client for the backoffice API.
//!
//! One client instance is shared read-only across all resources; requests
//! carry the session bearer token and the payload as query parameters.

use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::list::Payload;

use super::types::{Product, PurchaseOrder, Warehouse};
use super::wire::{
  self, ItemEnvelope, ListEnvelope, WarehousesEnvelope, WireProduct, WirePurchase,
};

#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: Url,
  token: String,
}

impl ApiClient {
  pub fn new(base_url: &str, token: String) -> Result<Self> {
    // A trailing slash keeps Url::join from eating the last path segment.
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{base_url}/")
    };
    let base_url =
      Url::parse(&normalized).map_err(|e| eyre!("invalid API url {normalized}: {e}"))?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| eyre!("failed to build HTTP client: {e}"))?;

    Ok(Self {
      http,
      base_url,
      token,
    })
  }

  /// Host of the API endpoint, for the header bar.
  pub fn domain(&self) -> &str {
    self.base_url.host_str().unwrap_or("api")
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, payload: Option<&Payload>) -> Result<T> {
    let url = self
      .base_url
      .join(path)
      .map_err(|e| eyre!("invalid entity path {path}: {e}"))?;

    debug!(%url, "GET");
    let mut request = self.http.get(url).bearer_auth(&self.token);
    if let Some(payload) = payload {
      request = request.query(payload);
    }

    let response = request
      .send()
      .await
      .map_err(|e| eyre!("request to {path} failed: {e}"))?
      .error_for_status()
      .map_err(|e| eyre!("{path} returned an error: {e}"))?;

    response
      .json::<T>()
      .await
      .map_err(|e| eyre!("failed to parse {path} response: {e}"))
  }

  /// Fetch one page of a list entity.
  pub async fn get_list<T: DeserializeOwned>(
    &self,
    entity_path: &str,
    payload: &Payload,
  ) -> Result<ListEnvelope<T>> {
    let envelope: ListEnvelope<T> = self.get_json(entity_path, Some(payload)).await?;
    if !envelope.success {
      warn!(entity = entity_path, "API reported an unsuccessful list response");
    }
    Ok(envelope)
  }

  /// Fetch a single product with its allocations.
  pub async fn get_product(&self, id: u64) -> Result<Product> {
    let envelope: ItemEnvelope<WireProduct> = self
      .get_json(&format!("product-inventories/{id}"), None)
      .await?;
    Ok(wire::adapt_product(envelope))
  }

  /// Fetch a single purchase order with its allocations.
  pub async fn get_purchase(&self, id: u64) -> Result<PurchaseOrder> {
    let envelope: ItemEnvelope<WirePurchase> = self
      .get_json(&format!("purchase-inventories/{id}"), None)
      .await?;
    Ok(wire::adapt_purchase(envelope))
  }

  /// Fetch the warehouses available for scoping purchase views.
  pub async fn get_warehouses(&self) -> Result<Vec<Warehouse>> {
    let envelope: WarehousesEnvelope = self.get_json("warehouses", None).await?;
    Ok(wire::adapt_warehouses(envelope))
  }
}

impl std::fmt::Debug for ApiClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ApiClient")
      .field("base_url", &self.base_url.as_str())
      .finish_non_exhaustive()
  }
}
