mod api;
mod app;
mod commands;
mod config;
mod event;
mod list;
mod logging;
mod query;
mod route;
mod ui;

use api::{ApiClient, AuthClient};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "b9s")]
#[command(about = "A terminal UI for the backoffice dashboard, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/b9s/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Warehouse id to scope purchase views to
  #[arg(short, long)]
  warehouse: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override default warehouse if specified on command line
  let config = if let Some(warehouse) = args.warehouse {
    config::Config {
      default_warehouse: Some(warehouse),
      ..config
    }
  } else {
    config
  };

  let _log_guard = logging::init()?;

  // A token from the environment skips the login round-trip
  let auth = AuthClient::new(&config.auth.url)?;
  let token = match config::Config::get_api_token() {
    Some(token) => token,
    None => {
      let password = config::Config::get_password()?;
      let device_name = config.auth.device_name.as_deref().unwrap_or("b9s");
      auth
        .login(&config.auth.email, &password, device_name)
        .await?
    }
  };
  info!("session established");

  let client = ApiClient::new(&config.api.url, token.clone())?;

  // Initialize and run the app
  let mut app = app::App::new(config, client, auth, token);
  app.run().await?;

  Ok(())
}
