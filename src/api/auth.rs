//! Token acquisition against the backoffice auth endpoint.

use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

#[derive(Serialize)]
struct LoginRequest<'a> {
  email: &'a str,
  password: &'a str,
  device_name: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
  token: String,
}

/// Client for the auth endpoint. Login happens once at startup, logout on
/// request; the API itself only ever sees the resulting bearer token.
#[derive(Clone)]
pub struct AuthClient {
  http: reqwest::Client,
  base_url: Url,
}

impl AuthClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{base_url}/")
    };
    let base_url =
      Url::parse(&normalized).map_err(|e| eyre!("invalid auth url {normalized}: {e}"))?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| eyre!("failed to build HTTP client: {e}"))?;

    Ok(Self { http, base_url })
  }

  /// Exchange credentials for a bearer token.
  pub async fn login(&self, email: &str, password: &str, device_name: &str) -> Result<String> {
    let url = self
      .base_url
      .join("login")
      .map_err(|e| eyre!("invalid auth url: {e}"))?;

    debug!(%url, email, "logging in");
    let response = self
      .http
      .post(url)
      .json(&LoginRequest {
        email,
        password,
        device_name,
      })
      .send()
      .await
      .map_err(|e| eyre!("login request failed: {e}"))?
      .error_for_status()
      .map_err(|e| eyre!("login rejected: {e}"))?;

    let body: LoginResponse = response
      .json()
      .await
      .map_err(|e| eyre!("failed to parse login response: {e}"))?;
    Ok(body.token)
  }

  /// Revoke the session token. Errors are surfaced to the caller so the
  /// session can keep running when revocation fails.
  pub async fn logout(&self, token: &str) -> Result<()> {
    let url = self
      .base_url
      .join("logout")
      .map_err(|e| eyre!("invalid auth url: {e}"))?;

    debug!(%url, "logging out");
    self
      .http
      .post(url)
      .bearer_auth(token)
      .send()
      .await
      .map_err(|e| eyre!("logout request failed: {e}"))?
      .error_for_status()
      .map_err(|e| eyre!("logout rejected: {e}"))?;
    Ok(())
  }
}
