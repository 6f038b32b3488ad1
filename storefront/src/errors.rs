// storefront/src/errors.rs

use cartflow::FlowError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Not authenticated: log in before {0}")]
  Unauthenticated(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("No items selected for checkout")]
  EmptySelection,

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Transport Error calling {endpoint}: {source}")]
  Transport {
    endpoint: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Server answered {status} for {endpoint}: {body}")]
  Status {
    endpoint: String,
    status: StatusCode,
    body: String,
  },

  #[error("Could not decode response from {endpoint}: {message}")]
  Decode { endpoint: String, message: String },

  #[error("Flow Error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl AppError {
  /// True for a 404 answer. The storefront reports an absent cart or
  /// selection this way, and callers read it as "empty".
  pub fn is_not_found(&self) -> bool {
    match self {
      AppError::Status { status, .. } => *status == StatusCode::NOT_FOUND,
      AppError::NotFound(_) => true,
      _ => false,
    }
  }

  pub fn status(&self) -> Option<StatusCode> {
    match self {
      AppError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<AppError>() {
      Ok(app_err) => app_err,
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn anyhow_round_trips_app_errors_and_wraps_others() {
    let wrapped = anyhow::Error::new(AppError::NotFound("p1".to_string()));
    assert!(matches!(AppError::from(wrapped), AppError::NotFound(ref id) if id == "p1"));

    let other = AppError::from(anyhow::anyhow!("disk on fire"));
    assert!(matches!(other, AppError::Internal(ref m) if m == "disk on fire"));
  }

  #[test]
  fn only_404_statuses_count_as_not_found() {
    let missing = AppError::Status {
      endpoint: "GET /cart".to_string(),
      status: StatusCode::NOT_FOUND,
      body: "Cart not found".to_string(),
    };
    let denied = AppError::Status {
      endpoint: "GET /cart".to_string(),
      status: StatusCode::UNAUTHORIZED,
      body: String::new(),
    };
    assert!(missing.is_not_found());
    assert!(!denied.is_not_found());
    assert!(!AppError::EmptySelection.is_not_found());
  }

  #[test]
  fn flow_errors_convert() {
    let err: AppError = FlowError::NotRegistered {
      type_name: "CheckoutCtxData".to_string(),
    }
    .into();
    assert!(matches!(err, AppError::Flow { .. }));
  }
}
