// storefront/src/pipelines/common_steps.rs

use crate::errors::Result as AppResult;
use crate::pipelines::contexts::SessionBound;
use cartflow::{ContextData, FlowControl};
use tracing::{debug, instrument, warn};

/// Copies the session's bearer token into the context, or fails before any request is made.
#[instrument(name = "common_step::authorize", skip(ctx_data), fields(action = T::ACTION), err(Display))]
pub async fn authorize<T: SessionBound>(ctx_data: ContextData<T>) -> AppResult<FlowControl> {
  let token = {
    let guard = ctx_data.read();
    guard.app_state().session.require_token(T::ACTION).map(str::to_owned)
  };
  match token {
    Ok(token) => {
      ctx_data.write().set_token(token);
      Ok(FlowControl::Continue)
    }
    Err(e) => {
      warn!("Refusing to proceed without a session token.");
      Err(e)
    }
  }
}

/// The server answers 404 when a user has no cart or selection document yet.
pub fn empty_if_missing<T>(result: AppResult<Vec<T>>, what: &str) -> AppResult<Vec<T>> {
  match result {
    Err(e) if e.is_not_found() => {
      debug!("No {} on the server; treating it as empty.", what);
      Ok(Vec::new())
    }
    other => other,
  }
}

/// Logs a failed follow-up call and reports whether it succeeded.
pub fn secondary_succeeded(result: AppResult<()>, what: &str) -> bool {
  match result {
    Ok(()) => true,
    Err(e) => {
      warn!(error = %e, "Follow-up call failed: {}.", what);
      false
    }
  }
}
