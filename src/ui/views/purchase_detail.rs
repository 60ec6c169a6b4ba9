use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::{ApiClient, PurchaseOrder};
use crate::query::QueryCache;
use crate::route::Route;
use crate::ui::renderfns::{format_date, qty_color, AgeBucket};
use crate::ui::view::{View, ViewAction};

/// Detail view for a single purchase order
pub struct PurchaseDetailView {
  id: u64,
  client: ApiClient,
  query: QueryCache<PurchaseOrder>,
}

impl PurchaseDetailView {
  pub fn new(client: ApiClient, id: u64) -> Self {
    let mut view = Self {
      id,
      client,
      query: QueryCache::new(),
    };
    view.fetch();
    view
  }

  fn fetch(&mut self) {
    let client = self.client.clone();
    let id = self.id;
    self.query.fetch(&format!("purchase/{id}"), move || async move {
      client.get_purchase(id).await.map_err(|e| e.to_string())
    });
  }

  fn body_lines(&self, order: &PurchaseOrder) -> Vec<Line<'static>> {
    let age_span = match order.purchase_date {
      Some(date) => {
        let bucket = AgeBucket::of(date, chrono::Local::now().date_naive());
        Span::styled(
          format!("  ({})", bucket.label()),
          Style::default().fg(bucket.color()),
        )
      }
      None => Span::raw(""),
    };

    let mut lines = vec![
      Line::from(vec![
        Span::styled("Supplier  ", Style::default().fg(Color::DarkGray)),
        Span::raw(order.supplier.clone()),
      ]),
      Line::from(vec![
        Span::styled("Date      ", Style::default().fg(Color::DarkGray)),
        Span::raw(format_date(order.purchase_date)),
        age_span,
      ]),
      Line::from(vec![
        Span::styled("Allocated ", Style::default().fg(Color::DarkGray)),
        Span::styled(
          order.allocated_qty.to_string(),
          Style::default().fg(qty_color(order.allocated_qty)),
        ),
      ]),
      Line::raw(""),
      Line::styled("Allocations", Style::default().fg(Color::Cyan).bold()),
    ];

    if order.allocations.is_empty() {
      lines.push(Line::styled(
        "  (no sources)",
        Style::default().fg(Color::DarkGray),
      ));
    }
    for allocation in &order.allocations {
      let rule = match allocation.percent {
        Some(percent) => format!("  rule {:.0}%", percent),
        None => String::new(),
      };
      lines.push(Line::from(vec![
        Span::raw(format!("  {:<20}", allocation.source_name)),
        Span::styled(
          format!("{:>6}", allocation.qty),
          Style::default().fg(qty_color(allocation.qty)),
        ),
        Span::styled(rule, Style::default().fg(Color::DarkGray)),
      ]));
    }

    lines
  }
}

impl View for PurchaseDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      KeyCode::Char('r') => {
        self.query.invalidate();
        self.fetch();
        ViewAction::None
      }
      _ => ViewAction::NotHandled,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let title = format!(" Purchase {} ", self.id);
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = match self.query.data() {
      Some(order) => Paragraph::new(self.body_lines(order)).block(block),
      None if self.query.is_error() => Paragraph::new(format!(
        "Failed to load: {}. Press 'r' to retry.",
        self.query.error().unwrap_or("unknown")
      ))
      .block(block)
      .style(Style::default().fg(Color::Red)),
      None => Paragraph::new("Loading...")
        .block(block)
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    format!("Purchase {}", self.id)
  }

  fn route(&self) -> Option<Route> {
    Some(Route::new(format!("purchase/{}", self.id)))
  }

  fn tick(&mut self) -> bool {
    self.query.poll()
  }
}
