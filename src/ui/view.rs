use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::route::Route;

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// Key was consumed, no action needed
  None,
  /// Key was not consumed; the App may apply global bindings
  NotHandled,
  /// Pop current view from stack (go back)
  Pop,
  /// Navigate to a route; the App resolves it into a view
  Navigate(Route),
}

/// Trait for view behavior
///
/// Views handle their own input modes (search, pickers, etc.) and return
/// actions for the App to execute. This creates a clean delegation chain:
/// App → View → Components
///
/// Views that load data asynchronously should use QueryCache internally and
/// poll it in the tick() method.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Current route including committed query parameters, for the footer.
  /// Re-entering this exact route reproduces the view's state.
  fn route(&self) -> Option<Route> {
    None
  }

  /// Called on each tick to allow views to poll async queries.
  /// Returns true when state changed and a redraw is worthwhile.
  fn tick(&mut self) -> bool {
    false
  }
}
