use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Constraint;
use ratatui::prelude::*;
use ratatui::widgets::Cell;

use crate::api::{ApiClient, PurchaseResource, Warehouse};
use crate::list::{ListOptions, PaginationMode, SortDirection};
use crate::query::QueryCache;
use crate::route::Route;
use crate::ui::components::{SelectEvent, SelectItem};
use crate::ui::renderfns::{format_allocations, format_date, truncate, AgeBucket};
use crate::ui::view::{View, ViewAction};

use super::entity_list::{Column, EntityListView, SortFieldSpec};

const WAREHOUSE_PARAM: &str = "warehouse_id";

const SORT_FIELDS: &[SortFieldSpec] = &[
  SortFieldSpec {
    key: "purchase_date",
    label: "date",
  },
  SortFieldSpec {
    key: "id",
    label: "id",
  },
  SortFieldSpec {
    key: "supplier_name",
    label: "supplier",
  },
];

/// Purchase order list: page/per_page pagination, warehouse scoping via
/// the `w` picker, rows colored by age bucket.
pub struct PurchaseListView {
  inner: EntityListView<PurchaseResource>,
  warehouses: QueryCache<Vec<Warehouse>>,
  /// Whether the open overlay is the warehouse picker (vs the filter)
  warehouse_overlay: bool,
  /// Set once a warehouse has been pinned (route, config, or fallback)
  warehouse_pinned: bool,
}

impl PurchaseListView {
  pub fn new(
    client: ApiClient,
    page_size: u64,
    default_warehouse: Option<u64>,
    query: &str,
  ) -> Self {
    let options = ListOptions::default()
      .with_pagination_mode(PaginationMode::PagePerPage)
      .with_page_size(page_size)
      .with_default_sort("purchase_date", SortDirection::Desc);

    // A configured default warehouse applies only when the route does not
    // already pin one.
    let mut query = query.to_string();
    if let Some(id) = default_warehouse {
      if !crate::route::parse_query(&query)
        .iter()
        .any(|(k, _)| k == WAREHOUSE_PARAM)
      {
        if !query.is_empty() {
          query.push('&');
        }
        query.push_str(&format!("{WAREHOUSE_PARAM}={id}"));
      }
    }

    let today = chrono::Local::now().date_naive();
    let columns: Vec<Column<crate::api::PurchaseOrder>> = vec![
      Column::new("ID", Constraint::Length(8), |p: &crate::api::PurchaseOrder| {
        Cell::from(p.id.to_string()).style(Style::default().fg(Color::DarkGray))
      }),
      Column::new("SUPPLIER", Constraint::Min(20), |p: &crate::api::PurchaseOrder| {
        Cell::from(truncate(&p.supplier, 30))
      }),
      Column::new("DATE", Constraint::Length(12), |p: &crate::api::PurchaseOrder| {
        Cell::from(format_date(p.purchase_date))
      }),
      Column::new("AGE", Constraint::Length(9), move |p: &crate::api::PurchaseOrder| match p.purchase_date {
        Some(date) => {
          let bucket = AgeBucket::of(date, today);
          Cell::from(bucket.label()).style(Style::default().fg(bucket.color()))
        }
        None => Cell::from("-").style(Style::default().fg(Color::DarkGray)),
      }),
      Column::new("QTY", Constraint::Length(7), |p: &crate::api::PurchaseOrder| {
        Cell::from(p.allocated_qty.to_string())
      }),
      Column::new("ALLOCATIONS", Constraint::Min(24), |p: &crate::api::PurchaseOrder| {
        Cell::from(truncate(&format_allocations(&p.allocations), 60))
          .style(Style::default().fg(Color::DarkGray))
      }),
    ];

    let inner = EntityListView::new(
      Arc::new(PurchaseResource::new(client.clone())),
      options,
      &query,
      "Purchases",
      "purchases",
      columns,
      SORT_FIELDS.to_vec(),
      "",
      Vec::new(),
    );

    let mut warehouses = QueryCache::new();
    warehouses.fetch("warehouses", move || {
      let client = client.clone();
      async move { client.get_warehouses().await.map_err(|e| e.to_string()) }
    });

    let warehouse_pinned = inner.controller().extra(WAREHOUSE_PARAM).is_some();
    Self {
      inner,
      warehouses,
      warehouse_overlay: false,
      warehouse_pinned,
    }
  }

  fn open_warehouse_picker(&mut self) {
    let Some(warehouses) = self.warehouses.data() else {
      return;
    };

    let mut items = vec![SelectItem::new("", "All warehouses")];
    items.extend(
      warehouses
        .iter()
        .map(|w| SelectItem::new(w.id.to_string(), w.name.clone())),
    );
    let current = self
      .inner
      .controller()
      .extra(WAREHOUSE_PARAM)
      .unwrap_or("")
      .to_string();
    self.inner.show_overlay("Warehouse".to_string(), items, &current);
    self.warehouse_overlay = true;
  }
}

impl View for PurchaseListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if !self.inner.is_capturing_input() && key.code == KeyCode::Char('w') {
      self.open_warehouse_picker();
      return ViewAction::None;
    }

    let (action, overlay_event) = self.inner.handle_common_key(key);
    if let Some(event) = overlay_event {
      if self.warehouse_overlay {
        self.warehouse_overlay = false;
        if let SelectEvent::Selected(value) = event {
          self.warehouse_pinned = true;
          let value = if value.is_empty() {
            None
          } else {
            Some(value.as_str())
          };
          self.inner.controller_mut().set_extra(WAREHOUSE_PARAM, value);
        }
      } else {
        self.inner.apply_filter_selection(event);
      }
    }
    action
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.inner.render_view(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.inner.breadcrumb()
  }

  fn route(&self) -> Option<Route> {
    Some(self.inner.current_route())
  }

  fn tick(&mut self) -> bool {
    let warehouses_changed = self.warehouses.poll();

    // No warehouse from the route or config: pin the first one once the
    // list arrives.
    if warehouses_changed && !self.warehouse_pinned {
      if let Some(first) = self.warehouses.data().and_then(|w| w.first()) {
        let id = first.id.to_string();
        self.inner.controller_mut().set_extra(WAREHOUSE_PARAM, Some(&id));
        self.warehouse_pinned = true;
      }
    }

    self.inner.poll() || warehouses_changed
  }
}
