// storefront/src/session.rs

use crate::errors::{AppError, Result};
use crate::models::{LoginResponse, UserProfile};
use std::fmt;

/// Credentials for one logged-in user, handed to the workflow explicitly.
#[derive(Clone, Default)]
pub struct Session {
  token: Option<String>,
  profile: Option<UserProfile>,
}

impl Session {
  pub fn anonymous() -> Self {
    Self::default()
  }

  pub fn with_token(token: impl Into<String>) -> Self {
    Session {
      token: Some(token.into()),
      profile: None,
    }
  }

  pub fn from_login(resp: &LoginResponse) -> Self {
    Session {
      token: Some(resp.token.clone()),
      profile: Some(UserProfile::from(resp)),
    }
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  pub fn profile(&self) -> Option<&UserProfile> {
    self.profile.as_ref()
  }

  pub fn is_authenticated(&self) -> bool {
    self.token.is_some()
  }

  /// The bearer token, or `Unauthenticated` naming the attempted action.
  pub fn require_token(&self, action: &str) -> Result<&str> {
    self
      .token
      .as_deref()
      .ok_or_else(|| AppError::Unauthenticated(action.to_string()))
  }
}

impl fmt::Debug for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("token", &self.token.as_ref().map(|_| "<redacted>"))
      .field("profile", &self.profile)
      .finish()
  }
}
