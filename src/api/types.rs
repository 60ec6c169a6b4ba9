//! Domain types for the backoffice entities.

use chrono::NaiveDate;

/// Per-source stock allocation for a product or purchase line.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
  pub source_id: u64,
  pub source_name: String,
  pub qty: i64,
  /// Allocation rule percentage, when the source has one configured
  pub percent: Option<f64>,
}

/// A product row in the inventory list.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
  pub id: u64,
  /// 1-based position within the full result set
  pub position: u64,
  pub name: String,
  pub sku: String,
  /// Sum of physical quantities across all sources
  pub total_qty: i64,
  pub allocations: Vec<Allocation>,
}

/// A purchase order row.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOrder {
  pub id: u64,
  pub supplier: String,
  pub purchase_date: Option<NaiveDate>,
  /// Sum of quantities allocated from this purchase
  pub allocated_qty: i64,
  pub allocations: Vec<Allocation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warehouse {
  pub id: u64,
  pub name: String,
}
