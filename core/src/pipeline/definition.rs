// cartflow/src/pipeline/definition.rs

//! The `Flow<T, E>` struct and the methods that shape its step list.

use crate::core::step::{SkipCondition, StepDef};
use crate::core::Handler;
use crate::error::FlowError;
use std::collections::HashMap;

/// An ordered list of named steps run against a shared `ContextData<T>`.
///
/// `E` is the error type handlers return. It must absorb engine failures
/// (`From<FlowError>`) so that `run` can report a missing handler through
/// the same channel as a failing one.
pub struct Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<T>>,
  pub(crate) before: HashMap<String, Vec<Handler<T, E>>>,
  pub(crate) on: HashMap<String, Vec<Handler<T, E>>>,
  pub(crate) after: HashMap<String, Vec<Handler<T, E>>>,
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a flow from `(name, optional, skip_if)` triples.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<T>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef::new(*name, *optional, skip_if.clone()))
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub(crate) fn position(&self, step_name: &str) -> Result<usize, FlowError> {
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }

  fn ensure_absent(&self, step_name: &str) -> Result<(), FlowError> {
    if self.steps.iter().any(|s| s.name == step_name) {
      return Err(FlowError::DuplicateStep {
        step_name: step_name.to_string(),
      });
    }
    Ok(())
  }

  pub fn insert_before(
    &mut self,
    existing: &str,
    new_step: impl Into<String>,
    optional: bool,
    skip_if: Option<SkipCondition<T>>,
  ) -> Result<&mut Self, FlowError> {
    let idx = self.position(existing)?;
    let name = new_step.into();
    self.ensure_absent(&name)?;
    self.steps.insert(idx, StepDef::new(name, optional, skip_if));
    Ok(self)
  }

  pub fn insert_after(
    &mut self,
    existing: &str,
    new_step: impl Into<String>,
    optional: bool,
    skip_if: Option<SkipCondition<T>>,
  ) -> Result<&mut Self, FlowError> {
    let idx = self.position(existing)?;
    let name = new_step.into();
    self.ensure_absent(&name)?;
    self.steps.insert(idx + 1, StepDef::new(name, optional, skip_if));
    Ok(self)
  }

  /// Removes a step and every handler registered for it. Unknown names are ignored.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Ok(idx) = self.position(step_name) {
      self.steps.remove(idx);
      self.before.remove(step_name);
      self.on.remove(step_name);
      self.after.remove(step_name);
    }
  }
}
