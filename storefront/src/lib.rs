// storefront/src/lib.rs

//! Client for a small storefront REST API, centred on keeping the server's
//! cart, selected-items and orders collections in step from the client side.
//!
//! ```ignore
//! let api = Arc::new(HttpStorefrontApi::from_config(&config)?);
//! let workflow = SelectionWorkflow::new(api, Session::with_token(token), config.workflow.clone())?;
//! workflow.reload().await?;
//! workflow.toggle_select(&"65f0c2...".into()).await?;
//! println!("{}", workflow.total_price_display());
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod money;
pub mod notice;
pub mod outcome;
pub mod pipelines;
pub mod session;
pub mod state;
pub mod workflow;

pub use api::{Endpoint, HttpStorefrontApi, MockStorefrontApi, RecordedCall, StorefrontApi};
pub use config::{AppConfig, WorkflowSettings};
pub use errors::{AppError, Result};
pub use models::{CartItem, Order, ProductId, SelectedItem};
pub use notice::{Notice, Severity};
pub use outcome::{BulkAction, BulkOutcome, CheckoutOutcome, Mirror, QuantityChange};
pub use session::Session;
pub use state::CartState;
pub use workflow::SelectionWorkflow;
