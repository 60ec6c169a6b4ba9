use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  pub auth: AuthConfig,
  /// Warehouse id preselected in purchase views
  pub default_warehouse: Option<u64>,
  /// Custom title for header (defaults to API domain if not set)
  pub title: Option<String>,
  /// Rows requested per page (defaults to 20)
  pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
  pub url: String,
  pub email: String,
  /// Device name sent with the login request (defaults to "b9s")
  pub device_name: Option<String>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./b9s.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/b9s/config.yaml
  /// 4. ~/.config/b9s/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/b9s/config.yaml\n\
                 See config.example.yaml for the format."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("b9s.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("b9s").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get a prearranged API token from the environment, skipping login.
  pub fn get_api_token() -> Option<String> {
    std::env::var("B9S_API_TOKEN").ok()
  }

  /// Get the account password from environment variables.
  pub fn get_password() -> Result<String> {
    std::env::var("B9S_PASSWORD")
      .map_err(|_| eyre!("Account password not found. Set B9S_PASSWORD environment variable."))
  }
}
