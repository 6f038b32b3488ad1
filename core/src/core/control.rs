// cartflow/src/core/control.rs

//! Signals returned by handlers and the outcome of a whole flow run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Keep going with the remaining handlers and steps.
  Continue,
  /// Halt the flow now. Later handlers and steps do not run.
  Stop,
}

/// Outcome of [`Flow::run`](crate::Flow::run) when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
  Completed,
  Stopped,
}
