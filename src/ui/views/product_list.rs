use std::sync::Arc;

use ratatui::layout::Constraint;
use ratatui::prelude::*;
use ratatui::widgets::Cell;

use crate::api::{ApiClient, ProductResource};
use crate::list::{ListOptions, PaginationMode};
use crate::ui::components::SelectItem;
use crate::ui::renderfns::{format_allocations, qty_color, truncate};

use super::entity_list::{Column, EntityListView, SortFieldSpec};

const SORT_FIELDS: &[SortFieldSpec] = &[
  SortFieldSpec {
    key: "id",
    label: "id",
  },
  SortFieldSpec {
    key: "name",
    label: "name",
  },
  SortFieldSpec {
    key: "qty",
    label: "qty",
  },
];

fn state_filter_items() -> Vec<SelectItem> {
  vec![
    SelectItem::new("", "All"),
    SelectItem::new("active", "Active"),
    SelectItem::new("inactive", "Inactive"),
  ]
}

/// Product inventory list: page/per_page pagination, state filter.
pub fn product_list(
  client: ApiClient,
  page_size: u64,
  query: &str,
) -> EntityListView<ProductResource> {
  let options = ListOptions::default()
    .with_pagination_mode(PaginationMode::PagePerPage)
    .with_page_size(page_size);

  let columns: Vec<Column<crate::api::Product>> = vec![
    Column::new("#", Constraint::Length(5), |p: &crate::api::Product| {
      Cell::from(p.position.to_string()).style(Style::default().fg(Color::DarkGray))
    }),
    Column::new("NAME", Constraint::Min(24), |p: &crate::api::Product| {
      Cell::from(truncate(&p.name, 40))
    }),
    Column::new("SKU", Constraint::Length(14), |p: &crate::api::Product| {
      Cell::from(p.sku.clone()).style(Style::default().fg(Color::Cyan))
    }),
    Column::new("QTY", Constraint::Length(7), |p: &crate::api::Product| {
      Cell::from(p.total_qty.to_string()).style(Style::default().fg(qty_color(p.total_qty)))
    }),
    Column::new("ALLOCATIONS", Constraint::Min(24), |p: &crate::api::Product| {
      Cell::from(truncate(&format_allocations(&p.allocations), 60))
        .style(Style::default().fg(Color::DarkGray))
    }),
  ];

  EntityListView::new(
    Arc::new(ProductResource::new(client)),
    options,
    query,
    "Products",
    "products",
    columns,
    SORT_FIELDS.to_vec(),
    "State",
    state_filter_items(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn test_products_paginate_by_page() {
    let client = ApiClient::new("http://localhost/", String::new()).unwrap();
    let view = product_list(client, 20, "page=3");

    let payload = view.controller().payload();
    assert_eq!(payload["page"], json!(3));
    assert_eq!(payload["per_page"], json!(20));
    assert!(!payload.contains_key("limit"));
    assert!(!payload.contains_key("offset"));
  }
}
