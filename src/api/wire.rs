//! Wire types for the backoffice API and the adapters that shape them.
//!
//! List endpoints share one envelope: `{success, data, meta, inventory_sources}`
//! with laravel-style pagination metadata. Each entity gets an explicit
//! adapter producing the fixed `{items, total}` page contract, so response
//! shaping stays here and never leaks into the controller or the views.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::list::Page;

use super::types::{Allocation, Product, PurchaseOrder, Warehouse};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMeta {
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub current_page: u64,
  #[serde(default)]
  pub per_page: u64,
  #[serde(default)]
  pub from: Option<u64>,
}

/// Common list response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
  #[serde(default)]
  pub success: bool,
  #[serde(default = "Vec::new")]
  pub data: Vec<T>,
  #[serde(default)]
  pub meta: Option<ListMeta>,
  /// Warehouse-level source definitions, joined into row allocations
  #[serde(default)]
  pub inventory_sources: Vec<WireInventorySource>,
}

/// Single-record response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEnvelope<T> {
  pub data: T,
  #[serde(default)]
  pub inventory_sources: Vec<WireInventorySource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireInventorySource {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub rule: Option<WireRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireRule {
  #[serde(default)]
  pub percent: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireProduct {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub sku: String,
  #[serde(default)]
  pub inventory_sources: Vec<WireProductSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireProductSource {
  pub id: u64,
  #[serde(default)]
  pub physical_qty: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePurchase {
  pub purchase_id: u64,
  #[serde(default)]
  pub supplier_name: String,
  #[serde(default)]
  pub purchase_date: String,
  #[serde(default)]
  pub inventory_sources: Vec<WirePurchaseSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePurchaseSource {
  pub id: u64,
  #[serde(default)]
  pub qty: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireWarehouse {
  pub id: u64,
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarehousesEnvelope {
  #[serde(default)]
  pub data: Vec<WireWarehouse>,
}

/// Join a row's per-source quantities with the envelope-level source
/// definitions (names, rule percentages). Sources missing from the row
/// appear with quantity 0, matching how the dashboard displays them.
fn join_allocations<Q>(
  sources: &[WireInventorySource],
  row_sources: &[Q],
  id_of: impl Fn(&Q) -> u64,
  qty_of: impl Fn(&Q) -> i64,
) -> Vec<Allocation> {
  sources
    .iter()
    .map(|source| {
      let qty = row_sources
        .iter()
        .find(|rs| id_of(rs) == source.id)
        .map(&qty_of)
        .unwrap_or(0);
      Allocation {
        source_id: source.id,
        source_name: source.name.clone(),
        qty,
        percent: source.rule.as_ref().and_then(|r| r.percent),
      }
    })
    .collect()
}

/// Parse a wire date that may carry a time component, leniently.
fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
  let date_part = raw.get(..10).unwrap_or(raw);
  NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn adapt_products(envelope: ListEnvelope<WireProduct>) -> Page<Product> {
  let meta = envelope.meta.clone().unwrap_or_default();
  // Position of the first row in the overall result set.
  let first_position = meta
    .from
    .unwrap_or_else(|| meta.current_page.saturating_sub(1) * meta.per_page + 1);

  let items = envelope
    .data
    .iter()
    .enumerate()
    .map(|(index, row)| {
      let total_qty = row.inventory_sources.iter().map(|s| s.physical_qty).sum();
      Product {
        id: row.id,
        position: first_position + index as u64,
        name: row.name.clone(),
        sku: row.sku.clone(),
        total_qty,
        allocations: join_allocations(
          &envelope.inventory_sources,
          &row.inventory_sources,
          |s| s.id,
          |s| s.physical_qty,
        ),
      }
    })
    .collect();

  Page::new(items, meta.total)
}

pub fn adapt_purchases(envelope: ListEnvelope<WirePurchase>) -> Page<PurchaseOrder> {
  let total = envelope.meta.as_ref().map(|m| m.total).unwrap_or(0);

  let items = envelope
    .data
    .iter()
    .map(|row| {
      let allocated_qty = row.inventory_sources.iter().map(|s| s.qty).sum();
      PurchaseOrder {
        id: row.purchase_id,
        supplier: row.supplier_name.clone(),
        purchase_date: parse_wire_date(&row.purchase_date),
        allocated_qty,
        allocations: join_allocations(
          &envelope.inventory_sources,
          &row.inventory_sources,
          |s| s.id,
          |s| s.qty,
        ),
      }
    })
    .collect();

  Page::new(items, total)
}

pub fn adapt_product(envelope: ItemEnvelope<WireProduct>) -> Product {
  let row = &envelope.data;
  let total_qty = row.inventory_sources.iter().map(|s| s.physical_qty).sum();
  Product {
    id: row.id,
    position: 0,
    name: row.name.clone(),
    sku: row.sku.clone(),
    total_qty,
    allocations: join_allocations(
      &envelope.inventory_sources,
      &row.inventory_sources,
      |s| s.id,
      |s| s.physical_qty,
    ),
  }
}

pub fn adapt_purchase(envelope: ItemEnvelope<WirePurchase>) -> PurchaseOrder {
  let row = &envelope.data;
  let allocated_qty = row.inventory_sources.iter().map(|s| s.qty).sum();
  PurchaseOrder {
    id: row.purchase_id,
    supplier: row.supplier_name.clone(),
    purchase_date: parse_wire_date(&row.purchase_date),
    allocated_qty,
    allocations: join_allocations(
      &envelope.inventory_sources,
      &row.inventory_sources,
      |s| s.id,
      |s| s.qty,
    ),
  }
}

pub fn adapt_warehouses(envelope: WarehousesEnvelope) -> Vec<Warehouse> {
  envelope
    .data
    .into_iter()
    .map(|w| Warehouse {
      id: w.id,
      name: w.name,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const PRODUCTS_JSON: &str = r#"{
    "success": true,
    "data": [
      {
        "id": 11,
        "name": "پیچ گوشتی",
        "sku": "SKU-11",
        "inventory_sources": [
          {"id": 1, "physical_qty": 12},
          {"id": 2, "physical_qty": 3}
        ]
      },
      {
        "id": 12,
        "name": "Widget",
        "sku": "SKU-12",
        "inventory_sources": [
          {"id": 1, "physical_qty": 5}
        ]
      }
    ],
    "meta": {"total": 57, "count": 2, "current_page": 3, "per_page": 20, "last_page": 3, "from": 41, "to": 42},
    "inventory_sources": [
      {"id": 1, "name": "Main", "channels": [], "rule": {"percent": 20}},
      {"id": 2, "name": "Outlet", "channels": [], "rule": null}
    ]
  }"#;

  #[test]
  fn test_adapt_products() {
    let envelope: ListEnvelope<WireProduct> = serde_json::from_str(PRODUCTS_JSON).unwrap();
    let page = adapt_products(envelope);

    assert_eq!(page.total, 57);
    assert_eq!(page.items.len(), 2);

    let first = &page.items[0];
    assert_eq!(first.id, 11);
    assert_eq!(first.position, 41);
    assert_eq!(first.total_qty, 15);
    assert_eq!(first.allocations.len(), 2);
    assert_eq!(first.allocations[0].source_name, "Main");
    assert_eq!(first.allocations[0].qty, 12);
    assert_eq!(first.allocations[0].percent, Some(20.0));
    assert_eq!(first.allocations[1].percent, None);

    let second = &page.items[1];
    assert_eq!(second.position, 42);
    // Source 2 not present on the row: rendered as zero, not dropped.
    assert_eq!(second.allocations[1].qty, 0);
  }

  #[test]
  fn test_adapt_products_position_without_from() {
    let envelope = ListEnvelope::<WireProduct> {
      success: true,
      data: vec![],
      meta: Some(ListMeta {
        total: 5,
        current_page: 2,
        per_page: 20,
        from: None,
      }),
      inventory_sources: vec![],
    };
    let page = adapt_products(envelope);
    assert_eq!(page.total, 5);
  }

  #[test]
  fn test_adapt_products_missing_meta_is_empty_total() {
    let envelope: ListEnvelope<WireProduct> =
      serde_json::from_str(r#"{"success": false, "data": []}"#).unwrap();
    let page = adapt_products(envelope);
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
  }

  #[test]
  fn test_adapt_purchases() {
    let json = r#"{
      "success": true,
      "data": [
        {
          "purchase_id": 900,
          "supplier_name": "Acme",
          "purchase_date": "2026-08-20 14:02:11",
          "inventory_sources": [{"id": 1, "qty": 8}, {"id": 2, "qty": 2}]
        }
      ],
      "meta": {"total": 1, "current_page": 1, "per_page": 20},
      "inventory_sources": [{"id": 1, "name": "Main", "rule": {"percent": 60}}]
    }"#;
    let envelope: ListEnvelope<WirePurchase> = serde_json::from_str(json).unwrap();
    let page = adapt_purchases(envelope);

    let order = &page.items[0];
    assert_eq!(order.id, 900);
    assert_eq!(order.supplier, "Acme");
    assert_eq!(
      order.purchase_date,
      NaiveDate::from_ymd_opt(2026, 8, 20)
    );
    assert_eq!(order.allocated_qty, 10);
    assert_eq!(order.allocations.len(), 1);
    assert_eq!(order.allocations[0].qty, 8);
  }

  #[test]
  fn test_bad_purchase_date_is_none() {
    assert_eq!(parse_wire_date("not a date"), None);
    assert_eq!(parse_wire_date(""), None);
    assert_eq!(
      parse_wire_date("2026-01-05"),
      NaiveDate::from_ymd_opt(2026, 1, 5)
    );
  }

  #[test]
  fn test_adapt_warehouses() {
    let envelope: WarehousesEnvelope =
      serde_json::from_str(r#"{"data": [{"id": 1, "name": "Tehran"}]}"#).unwrap();
    let warehouses = adapt_warehouses(envelope);
    assert_eq!(
      warehouses,
      vec![Warehouse {
        id: 1,
        name: "Tehran".to_string()
      }]
    );
  }
}
