// storefront/src/notice.rs

//! The user-facing result line of a primary action.

use crate::errors::AppError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Success,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub severity: Severity,
  pub message: String,
}

impl Notice {
  pub fn success(message: impl Into<String>) -> Self {
    Notice {
      severity: Severity::Success,
      message: message.into(),
    }
  }

  pub fn warning(message: impl Into<String>) -> Self {
    Notice {
      severity: Severity::Warning,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Notice {
      severity: Severity::Error,
      message: message.into(),
    }
  }
}

impl From<&AppError> for Notice {
  fn from(err: &AppError) -> Self {
    match err {
      AppError::EmptySelection => Notice::warning(err.to_string()),
      _ => Notice::error(err.to_string()),
    }
  }
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let tag = match self.severity {
      Severity::Success => "ok",
      Severity::Warning => "warning",
      Severity::Error => "error",
    };
    write!(f, "[{}] {}", tag, self.message)
  }
}
