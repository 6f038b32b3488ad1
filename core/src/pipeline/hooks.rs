// cartflow/src/pipeline/hooks.rs

//! Registration of `before`, `on` and `after` handlers.

use crate::core::{ContextData, FlowControl, Handler};
use crate::error::FlowError;
use crate::pipeline::definition::Flow;
use std::future::Future;
use tracing::{event, Level};

#[derive(Clone, Copy, Debug)]
enum Phase {
  Before,
  On,
  After,
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Boxes a user handler, converting its error into the flow's `E`.
  fn wrap<F, HandlerErr>(handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static) -> Handler<T, E>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<E> + Send + Sync + 'static,
  {
    Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    })
  }

  fn push(&mut self, phase: Phase, step_name: &str, handler: Handler<T, E>) -> Result<&mut Self, FlowError> {
    self.position(step_name)?;
    let map = match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    };
    map.entry(step_name.to_string()).or_default().push(handler);
    event!(Level::TRACE, %step_name, ?phase, "Handler registered.");
    Ok(self)
  }

  /// Runs ahead of the step's `on` handlers. Typical use: preconditions.
  pub fn before_step<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<E> + Send + Sync + 'static,
  {
    self.push(Phase::Before, step_name, Self::wrap(handler_fn))
  }

  pub fn on_step<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<E> + Send + Sync + 'static,
  {
    self.push(Phase::On, step_name, Self::wrap(handler_fn))
  }

  pub fn after_step<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static,
  ) -> Result<&mut Self, FlowError>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<E> + Send + Sync + 'static,
  {
    self.push(Phase::After, step_name, Self::wrap(handler_fn))
  }
}
