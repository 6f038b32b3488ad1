// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Base URL including the API prefix, e.g. `http://localhost:8080/api`.
  pub api_url: String,
  pub token: Option<String>,
  pub request_timeout: Duration,
  pub workflow: WorkflowSettings,
}

/// Knobs that change how the selection workflow talks to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
  /// Maximum in-flight requests during select-all / deselect-all.
  pub fan_out_limit: usize,
  /// Also delete the mirrored selected item when a cart line is removed.
  pub purge_selection_on_remove: bool,
}

impl Default for WorkflowSettings {
  fn default() -> Self {
    Self {
      fan_out_limit: 4,
      purge_selection_on_remove: false,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let api_url = lookup("STOREFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = normalize_base_url(&api_url)?;

    let token = lookup("STOREFRONT_TOKEN").filter(|t| !t.trim().is_empty());

    let timeout_secs = lookup("STOREFRONT_TIMEOUT_SECS")
      .unwrap_or_else(|| "10".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid STOREFRONT_TIMEOUT_SECS: {}", e)))?;

    let fan_out_limit = lookup("STOREFRONT_FAN_OUT")
      .unwrap_or_else(|| "4".to_string())
      .parse::<usize>()
      .map_err(|e| AppError::Config(format!("Invalid STOREFRONT_FAN_OUT: {}", e)))?;
    if fan_out_limit == 0 {
      return Err(AppError::Config("STOREFRONT_FAN_OUT must be at least 1".to_string()));
    }

    let purge_selection_on_remove = lookup("STOREFRONT_PURGE_SELECTION_ON_REMOVE")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid STOREFRONT_PURGE_SELECTION_ON_REMOVE: {}", e)))?;

    tracing::debug!(%api_url, timeout_secs, fan_out_limit, purge_selection_on_remove, "Configuration loaded.");

    Ok(Self {
      api_url,
      token,
      request_timeout: Duration::from_secs(timeout_secs),
      workflow: WorkflowSettings {
        fan_out_limit,
        purge_selection_on_remove,
      },
    })
  }
}

/// Strips trailing slashes and checks the scheme.
pub fn normalize_base_url(raw: &str) -> Result<String> {
  let trimmed = raw.trim().trim_end_matches('/');
  if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
    return Err(AppError::Config(format!(
      "STOREFRONT_API_URL must start with http:// or https://, got '{}'",
      raw
    )));
  }
  Ok(trimmed.to_string())
}
