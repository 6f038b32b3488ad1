// cartflow/src/pipeline/execution.rs

//! `Flow::run`: walks the steps in order and drives each phase's handlers.

use crate::core::{ContextData, FlowControl, FlowResult, Handler};
use crate::error::FlowError;
use crate::pipeline::definition::Flow;
use tracing::{event, info_span, instrument, Instrument, Level};

/// What a phase asked the runner to do next.
enum PhaseOutcome {
  Proceed,
  Halt,
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// A step whose `skip_if` returns true is passed over. A step without any
  /// handler is skipped when optional and fails with
  /// [`FlowError::HandlerMissing`] otherwise. The first handler error is
  /// returned as-is; the first `FlowControl::Stop` ends the run with
  /// `FlowResult::Stopped`.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(context_type = %std::any::type_name::<T>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<T>) -> Result<FlowResult, E> {
    event!(Level::DEBUG, "Flow starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = info_span!("flow_step", step_name, step_index = step_idx, optional = step_def.optional);

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(parent: &step_span, Level::DEBUG, "Step skipped by condition.");
          continue;
        }
      }

      let phases = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];

      if phases.iter().all(|(_, handlers)| handlers.map_or(true, |h| h.is_empty())) {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(E::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase, handlers) in phases {
        let Some(handlers) = handlers else { continue };
        let outcome = run_phase(phase, handlers, &ctx_data).instrument(step_span.clone()).await?;
        if let PhaseOutcome::Halt = outcome {
          event!(parent: &step_span, Level::INFO, phase, "Flow stopped by handler.");
          return Ok(FlowResult::Stopped);
        }
      }
    }

    event!(Level::DEBUG, "Flow completed.");
    Ok(FlowResult::Completed)
  }
}

async fn run_phase<T, E>(phase: &'static str, handlers: &[Handler<T, E>], ctx_data: &ContextData<T>) -> Result<PhaseOutcome, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    match handler_fn(ctx_data.clone()).await {
      Ok(FlowControl::Continue) => {}
      Ok(FlowControl::Stop) => return Ok(PhaseOutcome::Halt),
      Err(e) => {
        event!(Level::WARN, phase, handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PhaseOutcome::Proceed)
}
