pub mod context_data;
pub mod control;
pub mod step;

use std::future::Future;
use std::pin::Pin;

pub use context_data::ContextData;
pub use control::{FlowControl, FlowResult};
pub use step::{SkipCondition, StepDef};

/// A boxed asynchronous step handler.
///
/// Handlers receive a clone of the run's `ContextData<T>` and must release
/// any lock guard before awaiting.
pub type Handler<T, E> =
  Box<dyn Fn(ContextData<T>) -> Pin<Box<dyn Future<Output = Result<FlowControl, E>> + Send>> + Send + Sync>;
