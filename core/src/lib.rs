// cartflow/src/lib.rs

//! cartflow: a small asynchronous step pipeline engine.
//!
//! A [`Flow`] is an ordered list of named steps. Each step may carry
//! `before`, `on` and `after` handlers that receive a clone of the run's
//! [`ContextData`]. Handlers return [`FlowControl::Continue`] or
//! [`FlowControl::Stop`]; the first error aborts the run.
//!
//! The storefront client builds one flow per cart operation and keeps them
//! in a [`FlowRegistry`], which dispatches on the context type:
//!
//! ```ignore
//! let registry = FlowRegistry::<AppError>::new();
//! registry.register(checkout_flow()?);
//! registry.run(ContextData::new(CheckoutCtxData::new(..))).await?;
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{FlowControl, FlowResult};
pub use crate::core::step::{SkipCondition, StepDef};
pub use crate::core::Handler;

pub use crate::pipeline::Flow;

pub use crate::error::{FlowError, FlowOutcome};

pub use crate::registry::FlowRegistry;
