// storefront/src/pipelines/checkout_pipeline.rs
use crate::errors::{AppError, Result as AppResult};
use crate::models::{OrderItem, OrderRequest};
use crate::outcome::CheckoutOutcome;
use crate::pipelines::common_steps::{authorize, empty_if_missing, secondary_succeeded};
use crate::pipelines::contexts::CheckoutCtxData;
use cartflow::{ContextData, Flow, FlowControl, FlowError, FlowRegistry};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub fn register_checkout_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<CheckoutCtxData, AppError>::new(&[
    ("authorize", false, None),
    ("fetch_server_selection", false, None),
    ("guard_empty_selection", false, None),
    ("place_order", false, None),
    ("clear_selection", false, None),
    ("finish_checkout", false, None),
  ]);

  p.on_step("authorize", authorize::<CheckoutCtxData>)?;

  // The order is built from what the server holds, not from local state.
  p.on_step("fetch_server_selection", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (api, token) = {
        let guard = ctx_data.read();
        (Arc::clone(&guard.app_state.api), guard.token.clone())
      };
      let selection = empty_if_missing(api.get_selection(&token).await, "selection")?;
      info!(items = selection.len(), "Checkout: fetched server selection.");
      ctx_data.write().selection = selection;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  p.on_step("guard_empty_selection", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      if guard.selection.is_empty() {
        warn!("Checkout: nothing selected; no order posted.");
        guard.outcome = Some(CheckoutOutcome::EmptySelection);
        return Ok::<_, AppError>(FlowControl::Stop);
      }
      Ok(FlowControl::Continue)
    })
  })?;

  p.on_step("place_order", place_order)?;

  p.on_step("clear_selection", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (api, token) = {
        let guard = ctx_data.read();
        (Arc::clone(&guard.app_state.api), guard.token.clone())
      };
      let cleared = secondary_succeeded(api.clear_selection(&token).await, "clear selection after order");
      if !cleared {
        warn!("Checkout: order placed but the selection is still on the server; a retry would order it again.");
      }
      ctx_data.write().selection_cleared = cleared;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  p.on_step("finish_checkout", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let order = guard
        .order
        .take()
        .ok_or_else(|| AppError::Internal("checkout finished without an order".to_string()))?;
      let selection_cleared = guard.selection_cleared;
      if selection_cleared {
        guard.app_state.local.write().selected.clear();
      }
      guard.outcome = Some(CheckoutOutcome::Placed {
        order,
        selection_cleared,
      });
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  registry.register(p);
  Ok(())
}

#[instrument(name = "checkout_flow::place_order", skip(ctx_data), err(Display))]
async fn place_order(ctx_data: ContextData<CheckoutCtxData>) -> AppResult<FlowControl> {
  let (api, token, request) = {
    let guard = ctx_data.read();
    let items: Vec<OrderItem> = guard.selection.iter().cloned().map(OrderItem::from).collect();
    (Arc::clone(&guard.app_state.api), guard.token.clone(), OrderRequest { items })
  };
  let order = api.place_order(&token, &request).await?;
  info!(items = request.items.len(), "Checkout: order placed.");
  ctx_data.write().order = Some(order);
  Ok(FlowControl::Continue)
}
