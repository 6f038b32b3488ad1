// tests/common/mod.rs
#![allow(dead_code)]

use cartflow::{ContextData, FlowControl, FlowError};
use once_cell::sync::Lazy;
use tracing::Level;

/// Context used across the engine tests: a running total plus a log of
/// which handlers ran.
#[derive(Clone, Debug, Default)]
pub struct TallyContext {
  pub total: u64,
  pub trail: String,
  pub executed: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("engine error: {0}")]
  Flow(String),

  #[error("handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(err: FlowError) -> Self {
    TestError::Flow(format!("{:?}", err))
  }
}

/// Adds `amount` to the total and records `label`.
pub fn adding_handler(label: &'static str, amount: u64) -> cartflow::Handler<TallyContext, TestError> {
  Box::new(move |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.total += amount;
      guard.trail.push_str(label);
      guard.trail.push(';');
      guard.executed.push(label.to_string());
      tracing::debug!(target: "test_handlers", label, total = guard.total, "handler ran");
      if guard.stop_at.as_deref() == Some(label) {
        return Ok(FlowControl::Stop);
      }
      Ok(FlowControl::Continue)
    })
  })
}

pub fn failing_handler(label: &'static str, message: &'static str) -> cartflow::Handler<TallyContext, TestError> {
  Box::new(move |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      ctx.write().executed.push(label.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
