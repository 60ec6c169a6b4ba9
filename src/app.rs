use crate::api::{ApiClient, AuthClient};
use crate::commands;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::list::params::DEFAULT_PAGE_SIZE;
use crate::route::Route;
use crate::ui::components::draw_command_overlay;
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{product_list, ProductDetailView, PurchaseDetailView, PurchaseListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info};

const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  views: Vec<Box<dyn View>>,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Selected autocomplete suggestion index
  selected_suggestion: usize,

  /// Application configuration
  config: Config,

  /// Backoffice API client
  client: ApiClient,

  /// Auth endpoint client, kept for logout
  auth: AuthClient,
  token: String,
  logging_out: bool,

  /// Transient footer message
  notice: Option<(String, Instant)>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, client: ApiClient, auth: AuthClient, token: String) -> Self {
    let (tx, _rx) = mpsc::unbounded_channel();

    let mut app = Self {
      views: Vec::new(),
      mode: Mode::Normal,
      command_input: String::new(),
      selected_suggestion: 0,
      config,
      client,
      auth,
      token,
      logging_out: false,
      notice: None,
      event_tx: tx,
      should_quit: false,
    };
    let root = app
      .resolve_route(&Route::new("products"))
      .unwrap_or_else(|| app.make_product_list(""));
    app.views.push(root);
    app
  }

  fn page_size(&self) -> u64 {
    self.config.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
  }

  fn make_product_list(&self, query: &str) -> Box<dyn View> {
    Box::new(product_list(self.client.clone(), self.page_size(), query))
  }

  fn make_purchase_list(&self, query: &str) -> Box<dyn View> {
    Box::new(PurchaseListView::new(
      self.client.clone(),
      self.page_size(),
      self.config.default_warehouse,
      query,
    ))
  }

  /// Resolve a route into a view. List paths rebuild their full state
  /// from the query string.
  fn resolve_route(&self, route: &Route) -> Option<Box<dyn View>> {
    match route.path.as_str() {
      "products" => Some(self.make_product_list(&route.query)),
      "purchases" => Some(self.make_purchase_list(&route.query)),
      path => {
        if let Some(id) = path.strip_prefix("product/").and_then(|s| s.parse().ok()) {
          return Some(Box::new(ProductDetailView::new(self.client.clone(), id)));
        }
        if let Some(id) = path.strip_prefix("purchase/").and_then(|s| s.parse().ok()) {
          return Some(Box::new(PurchaseDetailView::new(self.client.clone(), id)));
        }
        None
      }
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler; the tick also drives search debounce
    let mut events = EventHandler::new(Duration::from_millis(100));
    self.event_tx = events.sender();

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| self.draw(frame))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let title = self.config.title.clone().unwrap_or_else(|| "backoffice".to_string());
    let domain = self.client.domain().to_string();
    draw_header(frame, chunks[0], &title, &domain);

    if let Some(view) = self.views.last_mut() {
      view.render(frame, chunks[1]);
    }

    if self.mode == Mode::Command {
      let suggestions = commands::get_suggestions(&self.command_input);
      draw_command_overlay(
        frame,
        chunks[1],
        &self.command_input,
        &suggestions,
        self.selected_suggestion,
      );
    }

    let breadcrumb: Vec<String> = self.views.iter().map(|v| v.breadcrumb_label()).collect();
    let route = self
      .views
      .last()
      .and_then(|v| v.route())
      .map(|r| r.to_string());
    let notice = self
      .notice
      .as_ref()
      .filter(|(_, at)| at.elapsed() < NOTICE_TTL)
      .map(|(msg, _)| msg.clone());
    draw_footer(
      frame,
      chunks[2],
      &breadcrumb,
      route.as_deref(),
      notice.as_deref(),
    );
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        if let Some(view) = self.views.last_mut() {
          view.tick();
        }
        if let Some((_, at)) = &self.notice {
          if at.elapsed() >= NOTICE_TTL {
            self.notice = None;
          }
        }
      }
      Event::LoggedOut(Ok(())) => {
        info!("session revoked, exiting");
        self.should_quit = true;
      }
      Event::LoggedOut(Err(e)) => {
        // Token is still valid, so the session keeps running.
        error!(error = %e, "logout failed");
        self.logging_out = false;
        self.notice = Some((format!("logout failed: {}", e), Instant::now()));
      }
    }
  }

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    // The view gets the key first so active inputs can consume ':'
    let action = match self.views.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::NotHandled,
    };

    match action {
      ViewAction::None => {}
      ViewAction::NotHandled => {
        if key.code == KeyCode::Char(':') {
          self.mode = Mode::Command;
          self.command_input.clear();
          self.selected_suggestion = 0;
        }
      }
      ViewAction::Pop => {
        if self.views.len() > 1 {
          self.views.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Navigate(route) => self.navigate(route),
    }
  }

  fn handle_command_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
        self.selected_suggestion = 0;
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
        self.selected_suggestion = 0;
      }
      KeyCode::Tab | KeyCode::Down => {
        // Navigate autocomplete suggestions
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        // Navigate autocomplete suggestions backwards
        let suggestions = commands::get_suggestions(&self.command_input);
        if !suggestions.is_empty() {
          self.selected_suggestion = if self.selected_suggestion == 0 {
            suggestions.len() - 1
          } else {
            self.selected_suggestion - 1
          };
        }
      }
      KeyCode::Backspace => {
        self.command_input.pop();
        self.selected_suggestion = 0; // Reset selection on input change
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
        self.selected_suggestion = 0; // Reset selection on input change
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    let raw = Route::parse(self.command_input.trim());

    // Resolve the typed path through autocomplete, keeping the query part
    let suggestions = commands::get_suggestions(&raw.path);
    let path = if !suggestions.is_empty() && self.selected_suggestion < suggestions.len() {
      suggestions[self.selected_suggestion].name.to_string()
    } else {
      raw.path.to_lowercase()
    };

    match path.as_str() {
      "quit" => self.should_quit = true,
      "logout" => self.start_logout(),
      _ => self.navigate(Route::with_query(path, raw.query)),
    }
    self.command_input.clear();
  }

  /// Resolve a route and place its view: list roots replace the stack,
  /// detail routes stack on top.
  fn navigate(&mut self, route: Route) {
    match self.resolve_route(&route) {
      Some(view) => {
        if matches!(route.path.as_str(), "products" | "purchases") {
          self.views.clear();
          self.views.push(view);
        } else {
          self.views.push(view);
        }
      }
      None => {
        self.notice = Some((format!("unknown route: {}", route), Instant::now()));
      }
    }
  }

  fn start_logout(&mut self) {
    if self.logging_out {
      return;
    }
    self.logging_out = true;

    let auth = self.auth.clone();
    let token = self.token.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let result = auth.logout(&token).await.map_err(|e| e.to_string());
      let _ = tx.send(Event::LoggedOut(result));
    });
  }
}
