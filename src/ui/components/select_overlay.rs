use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// One selectable entry, keyed by the value that ends up in the route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
  pub key: String,
  pub label: String,
}

impl SelectItem {
  pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      label: label.into(),
    }
  }
}

/// Events emitted by the select overlay that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
  /// Entry selected (returns its key)
  Selected(String),
  /// Overlay cancelled
  Cancelled,
}

/// Centered picker overlay for filters and warehouse selection
#[derive(Debug, Clone, Default)]
pub struct SelectOverlay {
  active: bool,
  items: Vec<SelectItem>,
  selected: usize,
  title: String,
}

impl SelectOverlay {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if the overlay is currently active
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Show the overlay, preselecting the entry matching `current`
  pub fn show(&mut self, title: String, items: Vec<SelectItem>, current: &str) {
    self.selected = items
      .iter()
      .position(|item| item.key == current)
      .unwrap_or(0);
    self.active = true;
    self.items = items;
    self.title = title;
  }

  /// Hide the overlay
  pub fn hide(&mut self) {
    self.active = false;
    self.items.clear();
    self.selected = 0;
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SelectEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(SelectEvent::Cancelled)
      }
      KeyCode::Enter => {
        if let Some(item) = self.items.get(self.selected) {
          let selected = item.key.clone();
          self.hide();
          KeyResult::Event(SelectEvent::Selected(selected))
        } else {
          self.hide();
          KeyResult::Event(SelectEvent::Cancelled)
        }
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.items.is_empty() {
          self.selected = (self.selected + 1) % self.items.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.items.is_empty() {
          self.selected = if self.selected == 0 {
            self.items.len() - 1
          } else {
            self.selected - 1
          };
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  /// Render the overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active || self.items.is_empty() {
      return;
    }

    // Calculate overlay dimensions
    let max_label_len = self
      .items
      .iter()
      .map(|item| item.label.chars().count())
      .max()
      .unwrap_or(10);
    let width = (max_label_len as u16 + 6)
      .min(area.width.saturating_sub(4))
      .max(20);
    let height = (self.items.len() as u16 + 2)
      .min(area.height.saturating_sub(4))
      .max(3);

    // Center the overlay
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    let overlay_area = Rect::new(x, y, width, height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    // Draw the border/block
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = self
      .items
      .iter()
      .map(|item| {
        let line = Line::from(vec![Span::styled(
          item.label.clone(),
          Style::default().fg(Color::Cyan),
        )]);
        ListItem::new(line)
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn items() -> Vec<SelectItem> {
    vec![
      SelectItem::new("", "All"),
      SelectItem::new("active", "Active"),
      SelectItem::new("inactive", "Inactive"),
    ]
  }

  #[test]
  fn test_preselects_current_entry() {
    let mut overlay = SelectOverlay::new();
    overlay.show("State".to_string(), items(), "inactive");

    let result = overlay.handle_key(key(KeyCode::Enter));
    assert_eq!(
      result,
      KeyResult::Event(SelectEvent::Selected("inactive".to_string()))
    );
    assert!(!overlay.is_active());
  }

  #[test]
  fn test_navigation_wraps() {
    let mut overlay = SelectOverlay::new();
    overlay.show("State".to_string(), items(), "");

    overlay.handle_key(key(KeyCode::Char('k')));
    let result = overlay.handle_key(key(KeyCode::Enter));
    assert_eq!(
      result,
      KeyResult::Event(SelectEvent::Selected("inactive".to_string()))
    );
  }

  #[test]
  fn test_escape_cancels() {
    let mut overlay = SelectOverlay::new();
    overlay.show("State".to_string(), items(), "active");

    let result = overlay.handle_key(key(KeyCode::Esc));
    assert_eq!(result, KeyResult::Event(SelectEvent::Cancelled));
    assert!(!overlay.is_active());
  }

  #[test]
  fn test_inactive_passes_keys_through() {
    let mut overlay = SelectOverlay::new();
    assert_eq!(overlay.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
  }
}
