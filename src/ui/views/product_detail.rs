use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::{ApiClient, Product};
use crate::query::QueryCache;
use crate::route::Route;
use crate::ui::renderfns::qty_color;
use crate::ui::view::{View, ViewAction};

/// Detail view for a single product and its per-source allocations
pub struct ProductDetailView {
  id: u64,
  client: ApiClient,
  query: QueryCache<Product>,
}

impl ProductDetailView {
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
    self.query.fetch(&format!("product/{id}"), move || async move {
      client.get_product(id).await.map_err(|e| e.to_string())
    });
  }

  fn body_lines(&self, product: &Product) -> Vec<Line<'static>> {
    let mut lines = vec![
      Line::from(vec![
        Span::styled("Name    ", Style::default().fg(Color::DarkGray)),
        Span::raw(product.name.clone()),
      ]),
      Line::from(vec![
        Span::styled("SKU     ", Style::default().fg(Color::DarkGray)),
        Span::styled(product.sku.clone(), Style::default().fg(Color::Cyan)),
      ]),
      Line::from(vec![
        Span::styled("Stock   ", Style::default().fg(Color::DarkGray)),
        Span::styled(
          product.total_qty.to_string(),
          Style::default().fg(qty_color(product.total_qty)),
        ),
      ]),
      Line::raw(""),
      Line::styled("Allocations", Style::default().fg(Color::Cyan).bold()),
    ];

    if product.allocations.is_empty() {
      lines.push(Line::styled(
        "  (no sources)",
        Style::default().fg(Color::DarkGray),
      ));
    }
    for allocation in &product.allocations {
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

impl View for ProductDetailView {
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
    let title = format!(" Product {} ", self.id);
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = match self.query.data() {
      Some(product) => Paragraph::new(self.body_lines(product)).block(block),
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
    format!("Product {}", self.id)
  }

  fn route(&self) -> Option<Route> {
    Some(Route::new(format!("product/{}", self.id)))
  }

  fn tick(&mut self) -> bool {
    self.query.poll()
  }
}
