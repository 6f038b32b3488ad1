// cartflow/src/registry.rs

//! `FlowRegistry<E>`: one flow per context type, dispatched by `TypeId`.

use crate::core::{ContextData, FlowResult};
use crate::error::FlowError;
use crate::pipeline::Flow;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Object-safe runner so flows over different context types share one map.
#[async_trait]
trait ErasedFlow<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowResult, AppErr>;
}

struct TypedFlow<T, HandlerErr, AppErr>
where
  T: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flow: Arc<Flow<T, HandlerErr>>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<T, HandlerErr, AppErr> ErasedFlow<AppErr> for TypedFlow<T, HandlerErr, AppErr>
where
  T: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowResult, AppErr> {
    let ctx_data = ctx.downcast::<ContextData<T>>().map_err(|_| {
      AppErr::from(FlowError::TypeMismatch {
        expected_type: std::any::type_name::<ContextData<T>>().to_string(),
      })
    })?;
    self.flow.run(*ctx_data).await.map_err(AppErr::from)
  }
}

/// Holds the flow registered for each context type.
///
/// `AppErr` is what [`FlowRegistry::run`] reports; it must absorb both the
/// engine's [`FlowError`] and every registered flow's handler error.
pub struct FlowRegistry<AppErr = FlowError>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flows: RwLock<HashMap<TypeId, Arc<dyn ErasedFlow<AppErr>>>>,
}

impl<AppErr> Default for FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      flows: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `flow` for context type `T`, replacing any previous one.
  pub fn register<T, HandlerErr>(&self, flow: Flow<T, HandlerErr>)
  where
    T: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(Level::DEBUG, context_type = %std::any::type_name::<T>(), steps = ?flow.step_names(), "Registering flow.");
    let typed = TypedFlow::<T, HandlerErr, AppErr> {
      flow: Arc::new(flow),
      _app_err: PhantomData,
    };
    self.flows.write().insert(TypeId::of::<T>(), Arc::new(typed));
  }

  pub fn contains<T: 'static + Send + Sync>(&self) -> bool {
    self.flows.read().contains_key(&TypeId::of::<T>())
  }

  pub fn len(&self) -> usize {
    self.flows.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.flows.read().is_empty()
  }

  /// Runs the flow registered for `T`.
  #[instrument(name = "FlowRegistry::run", skip_all, fields(context_type = %std::any::type_name::<T>()))]
  pub async fn run<T>(&self, ctx_data: ContextData<T>) -> Result<FlowResult, AppErr>
  where
    T: 'static + Send + Sync,
  {
    let runner = self.flows.read().get(&TypeId::of::<T>()).cloned();
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<T>();
      event!(Level::ERROR, "No flow registered for {}.", type_name);
      AppErr::from(FlowError::NotRegistered {
        type_name: type_name.to_string(),
      })
    })?;
    runner.run_erased(Box::new(ctx_data)).await
  }
}
