// storefront/src/models/auth.rs

use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
  pub email: String,
  pub password: String,
}

impl std::fmt::Debug for LoginRequest {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoginRequest")
      .field("email", &self.email)
      .field("password", &"<redacted>")
      .finish()
  }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
  pub token: String,
  #[serde(default)]
  pub firstname: String,
  #[serde(default)]
  pub lastname: String,
  #[serde(default)]
  pub role: String,
}

impl std::fmt::Debug for LoginResponse {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoginResponse")
      .field("token", &"<redacted>")
      .field("firstname", &self.firstname)
      .field("lastname", &self.lastname)
      .field("role", &self.role)
      .finish()
  }
}

/// Who is logged in, as reported at login.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
  pub firstname: String,
  pub lastname: String,
  pub role: String,
}

impl UserProfile {
  pub fn display_name(&self) -> String {
    format!("{} {}", self.firstname, self.lastname).trim().to_string()
  }
}

impl From<&LoginResponse> for UserProfile {
  fn from(resp: &LoginResponse) -> Self {
    UserProfile {
      firstname: resp.firstname.clone(),
      lastname: resp.lastname.clone(),
      role: resp.role.clone(),
    }
  }
}
