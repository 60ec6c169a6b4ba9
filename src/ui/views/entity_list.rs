use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::list::{ListController, ListOptions, Resource, SortDirection};
use crate::route::Route;
use crate::ui::components::{
  KeyResult, SearchEvent, SearchInput, SelectEvent, SelectItem, SelectOverlay,
};
use crate::ui::ensure_valid_selection;
use crate::ui::view::{View, ViewAction};

/// One table column: header, width, and a cell renderer for a row
pub struct Column<T> {
  pub header: &'static str,
  pub width: Constraint,
  pub cell: Box<dyn Fn(&T) -> Cell<'static>>,
}

impl<T> Column<T> {
  pub fn new(
    header: &'static str,
    width: Constraint,
    cell: impl Fn(&T) -> Cell<'static> + 'static,
  ) -> Self {
    Self {
      header,
      width,
      cell: Box::new(cell),
    }
  }
}

/// A sortable field, cycled with the `s` key
#[derive(Debug, Clone, Copy)]
pub struct SortFieldSpec {
  pub key: &'static str,
  pub label: &'static str,
}

/// Generic table view over a paginated resource.
///
/// Entity views (products, purchases) wrap this with their column set,
/// sortable fields, and filter entries; everything route- and
/// pagination-shaped lives in the controller.
pub struct EntityListView<R: Resource> {
  controller: ListController<R>,
  title: &'static str,
  path: &'static str,
  columns: Vec<Column<R::Item>>,
  sort_fields: Vec<SortFieldSpec>,
  filter_title: &'static str,
  filter_items: Vec<SelectItem>,
  table_state: TableState,
  search: SearchInput,
  overlay: SelectOverlay,
}

impl<R: Resource> EntityListView<R> {
  pub fn new(
    resource: std::sync::Arc<R>,
    options: ListOptions,
    query: &str,
    title: &'static str,
    path: &'static str,
    columns: Vec<Column<R::Item>>,
    sort_fields: Vec<SortFieldSpec>,
    filter_title: &'static str,
    filter_items: Vec<SelectItem>,
  ) -> Self {
    Self {
      controller: ListController::new(resource, options, query),
      title,
      path,
      columns,
      sort_fields,
      filter_title,
      filter_items,
      table_state: TableState::default(),
      search: SearchInput::new(),
      overlay: SelectOverlay::new(),
    }
  }

  pub fn controller(&self) -> &ListController<R> {
    &self.controller
  }

  pub fn controller_mut(&mut self) -> &mut ListController<R> {
    &mut self.controller
  }

  /// Show an extra picker overlay (used by wrappers, e.g. warehouses)
  pub fn show_overlay(&mut self, title: String, items: Vec<SelectItem>, current: &str) {
    self.overlay.show(title, items, current);
  }

  /// True while the search input or an overlay owns the keyboard
  pub fn is_capturing_input(&self) -> bool {
    self.search.is_active() || self.overlay.is_active()
  }

  fn cycle_sort_field(&mut self) {
    if self.sort_fields.is_empty() {
      return;
    }
    let current = self.controller.sort_field().to_string();
    let index = self
      .sort_fields
      .iter()
      .position(|f| f.key == current)
      .map(|i| (i + 1) % self.sort_fields.len())
      .unwrap_or(0);
    self.controller.set_sort_field(self.sort_fields[index].key);
  }

  fn title_line(&self) -> String {
    if self.controller.is_error() {
      format!(
        " {} (error: {}) ",
        self.title,
        self.controller.error().unwrap_or("unknown")
      )
    } else if self.controller.is_loading() {
      format!(" {} (loading...) ", self.title)
    } else if self.controller.is_fetching() {
      format!(" {} ({}) ~ ", self.title, self.controller.total())
    } else {
      format!(" {} ({}) ", self.title, self.controller.total())
    }
  }

  fn status_line(&self) -> String {
    let sort_label = self
      .sort_fields
      .iter()
      .find(|f| f.key == self.controller.sort_field())
      .map(|f| f.label)
      .unwrap_or(self.controller.sort_field());
    let direction = match self.controller.sort_direction() {
      SortDirection::Asc => "↑",
      SortDirection::Desc => "↓",
    };

    let mut parts = vec![
      format!("page {}/{}", self.controller.page(), self.controller.page_count()),
      format!("sort {} {}", sort_label, direction),
    ];
    if !self.controller.search_input().is_empty() {
      parts.push(format!("search \"{}\"", self.controller.search_input()));
    }
    if !self.controller.filter().is_empty() {
      parts.push(format!("filter {}", self.controller.filter()));
    }
    format!(" {} ", parts.join("  "))
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.controller.rows().len();
    ensure_valid_selection(&mut self.table_state, len);

    let block = Block::default()
      .title(self.title_line())
      .title_alignment(Alignment::Center)
      .title_bottom(Line::from(self.status_line()).right_aligned())
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let content = if self.controller.is_error() {
        "Failed to load. Press 'r' to retry."
      } else if self.controller.is_loading() {
        "Loading..."
      } else {
        "No results."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let header = Row::new(
      self
        .columns
        .iter()
        .map(|c| Cell::from(c.header))
        .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(Color::Cyan).bold());

    let rows: Vec<Row> = self
      .controller
      .rows()
      .iter()
      .map(|item| Row::new(self.columns.iter().map(|c| (c.cell)(item)).collect::<Vec<_>>()))
      .collect();

    let widths: Vec<Constraint> = self.columns.iter().map(|c| c.width).collect();

    let table = Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }

  /// Key handling shared by all entity lists. Wrappers call this after
  /// their own keys; overlay events are returned for them to interpret.
  pub fn handle_common_key(&mut self, key: KeyEvent) -> (ViewAction, Option<SelectEvent>) {
    if self.overlay.is_active() {
      return match self.overlay.handle_key(key) {
        KeyResult::Event(event) => (ViewAction::None, Some(event)),
        _ => (ViewAction::None, None),
      };
    }

    match self.search.handle_key(key, self.controller.search_input()) {
      KeyResult::Handled => return (ViewAction::None, None),
      KeyResult::Event(SearchEvent::Changed(text)) => {
        self.controller.on_search_input(&text);
        return (ViewAction::None, None);
      }
      KeyResult::Event(SearchEvent::Submitted) => {
        self.controller.flush_search();
        return (ViewAction::None, None);
      }
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('g') => self.table_state.select_first(),
      KeyCode::Char('G') => self.table_state.select_last(),
      KeyCode::Char('h') | KeyCode::Left => self.controller.prev_page(),
      KeyCode::Char('l') | KeyCode::Right => self.controller.next_page(),
      KeyCode::Char('s') => self.cycle_sort_field(),
      KeyCode::Char('S') => self.controller.toggle_sort_direction(),
      KeyCode::Char('r') => self.controller.refresh(),
      KeyCode::Char('f') => {
        if !self.filter_items.is_empty() {
          self.overlay.show(
            self.filter_title.to_string(),
            self.filter_items.clone(),
            self.controller.filter(),
          );
        }
      }
      KeyCode::Char('c') => {
        if let Some(route) = self.controller.create_route() {
          return (ViewAction::Navigate(route), None);
        }
      }
      KeyCode::Enter => {
        if let Some(index) = self.table_state.selected() {
          if let Some(route) = self.controller.detail_route(index) {
            return (ViewAction::Navigate(route), None);
          }
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return (ViewAction::Pop, None),
      _ => return (ViewAction::NotHandled, None),
    }
    (ViewAction::None, None)
  }

  /// Apply a filter-overlay selection (the common interpretation)
  pub fn apply_filter_selection(&mut self, event: SelectEvent) {
    if let SelectEvent::Selected(value) = event {
      self.controller.set_filter(&value);
    }
  }

  pub fn render_view(&mut self, frame: &mut Frame, area: Rect) {
    self.render_table(frame, area);
    self.search.render_overlay(frame, area);
    self.overlay.render_overlay(frame, area);
  }

  pub fn breadcrumb(&self) -> String {
    self.title.to_string()
  }

  pub fn current_route(&self) -> Route {
    Route::with_query(self.path, self.controller.query_string())
  }

  pub fn poll(&mut self) -> bool {
    self.controller.tick()
  }
}

impl<R: Resource> View for EntityListView<R> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    let (action, overlay_event) = self.handle_common_key(key);
    if let Some(event) = overlay_event {
      self.apply_filter_selection(event);
    }
    action
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_view(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.breadcrumb()
  }

  fn route(&self) -> Option<Route> {
    Some(self.current_route())
  }

  fn tick(&mut self) -> bool {
    self.poll()
  }
}
