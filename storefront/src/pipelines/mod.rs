// storefront/src/pipelines/mod.rs

//! One cartflow flow per workflow operation, keyed by its context type.

use crate::errors::AppError;
use cartflow::{FlowError, FlowRegistry};

pub mod common_steps;
pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod quantity_pipeline;
pub mod selection_pipeline;

/// Registers every flow. Called once when a workflow is built.
pub fn register_all_flows(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  tracing::debug!("Registering storefront flows...");

  cart_pipeline::register_load_cart_flow(registry)?;
  cart_pipeline::register_load_selection_flow(registry)?;
  cart_pipeline::register_add_to_cart_flow(registry)?;
  cart_pipeline::register_remove_item_flow(registry)?;
  cart_pipeline::register_orders_flow(registry)?;
  quantity_pipeline::register_quantity_flow(registry)?;
  selection_pipeline::register_toggle_select_flow(registry)?;
  selection_pipeline::register_bulk_select_flow(registry)?;
  checkout_pipeline::register_checkout_flow(registry)?;

  tracing::debug!(flows = registry.len(), "Storefront flows registered.");
  Ok(())
}
