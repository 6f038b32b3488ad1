// storefront/src/pipelines/cart_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::{ProductRef, QuantityUpdate};
use crate::money::{MAX_QUANTITY, MIN_QUANTITY};
use crate::pipelines::common_steps::{authorize, empty_if_missing, secondary_succeeded};
use crate::pipelines::contexts::{
  AddToCartCtxData, LoadCartCtxData, LoadSelectionCtxData, OrdersCtxData, RemoveItemCtxData,
};
use cartflow::{ContextData, Flow, FlowControl, FlowError, FlowRegistry};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub fn register_load_cart_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<LoadCartCtxData, AppError>::new(&[
    ("authorize", false, None),
    ("fetch_cart", false, None),
    ("apply_cart", false, None),
  ]);
  p.on_step("authorize", authorize::<LoadCartCtxData>)?;
  p.on_step("fetch_cart", fetch_cart)?;
  p.on_step("apply_cart", |ctx_data: ContextData<LoadCartCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let count = guard.items.len();
      guard.app_state.local.write().replace_items(guard.items.clone());
      info!(lines = count, "Local cart replaced.");
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;
  registry.register(p);
  Ok(())
}

#[instrument(name = "cart_flow::fetch_cart", skip(ctx_data), err(Display))]
async fn fetch_cart(ctx_data: ContextData<LoadCartCtxData>) -> AppResult<FlowControl> {
  let (api, token) = {
    let guard = ctx_data.read();
    (Arc::clone(&guard.app_state.api), guard.token.clone())
  };
  let items = empty_if_missing(api.get_cart(&token).await, "cart")?;
  ctx_data.write().items = items;
  Ok(FlowControl::Continue)
}

pub fn register_load_selection_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<LoadSelectionCtxData, AppError>::new(&[
    ("authorize", false, None),
    ("fetch_selection", false, None),
    ("apply_selection", false, None),
  ]);
  p.on_step("authorize", authorize::<LoadSelectionCtxData>)?;
  p.on_step("fetch_selection", |ctx_data: ContextData<LoadSelectionCtxData>| {
    Box::pin(async move {
      let (api, token) = {
        let guard = ctx_data.read();
        (Arc::clone(&guard.app_state.api), guard.token.clone())
      };
      let items = empty_if_missing(api.get_selection(&token).await, "selection")?;
      ctx_data.write().items = items;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;
  p.on_step("apply_selection", |ctx_data: ContextData<LoadSelectionCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      guard.app_state.local.write().replace_selection(&guard.items);
      info!(selected = guard.items.len(), "Local selection replaced.");
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;
  registry.register(p);
  Ok(())
}

pub fn register_add_to_cart_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("authorize", false, None),
    ("post_cart_add", false, None),
    ("refresh_cart", false, None),
  ]);

  p.on_step("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let quantity = ctx_data.read().quantity;
      if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        warn!(quantity, "Add to cart rejected: quantity out of range.");
        return Err(AppError::Validation(format!(
          "Quantity must be between {} and {}.",
          MIN_QUANTITY, MAX_QUANTITY
        )));
      }
      Ok(FlowControl::Continue)
    })
  })?;
  p.on_step("authorize", authorize::<AddToCartCtxData>)?;
  p.on_step("post_cart_add", post_cart_add)?;
  p.on_step("refresh_cart", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (api, token) = {
        let guard = ctx_data.read();
        (Arc::clone(&guard.app_state.api), guard.token.clone())
      };
      let items = empty_if_missing(api.get_cart(&token).await, "cart")?;
      let guard = ctx_data.read();
      guard.app_state.local.write().replace_items(items.clone());
      drop(guard);
      ctx_data.write().items = items;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  registry.register(p);
  Ok(())
}

#[instrument(name = "cart_flow::post_cart_add", skip(ctx_data), err(Display))]
async fn post_cart_add(ctx_data: ContextData<AddToCartCtxData>) -> AppResult<FlowControl> {
  let (api, token, line) = {
    let guard = ctx_data.read();
    (
      Arc::clone(&guard.app_state.api),
      guard.token.clone(),
      QuantityUpdate {
        product_id: guard.product_id.clone(),
        quantity: guard.quantity,
      },
    )
  };
  api.add_to_cart(&token, &line).await?;
  info!(product_id = %line.product_id, quantity = line.quantity, "Added to cart.");
  Ok(FlowControl::Continue)
}

pub fn register_remove_item_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<RemoveItemCtxData, AppError>::new(&[
    ("authorize", false, None),
    ("delete_cart_line", false, None),
    (
      "purge_selection",
      true,
      Some(Arc::new(|ctx: ContextData<RemoveItemCtxData>| !ctx.read().wants_purge())),
    ),
    ("apply_removal", false, None),
  ]);

  p.before_step("authorize", |ctx_data: ContextData<RemoveItemCtxData>| {
    Box::pin(async move {
      let was_selected = {
        let guard = ctx_data.read();
        let local = guard.app_state.local.read();
        local.is_selected(&guard.product_id)
      };
      ctx_data.write().was_selected = was_selected;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;
  p.on_step("authorize", authorize::<RemoveItemCtxData>)?;
  p.on_step("delete_cart_line", delete_cart_line)?;
  p.on_step("purge_selection", |ctx_data: ContextData<RemoveItemCtxData>| {
    Box::pin(async move {
      let (api, token, line) = {
        let guard = ctx_data.read();
        (
          Arc::clone(&guard.app_state.api),
          guard.token.clone(),
          ProductRef {
            product_id: guard.product_id.clone(),
          },
        )
      };
      let purged = secondary_succeeded(api.remove_selected(&token, &line).await, "purge removed line from selection");
      ctx_data.write().selection_purged = purged;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;
  p.on_step("apply_removal", |ctx_data: ContextData<RemoveItemCtxData>| {
    Box::pin(async move {
      let removed = {
        let guard = ctx_data.read();
        let mut local = guard.app_state.local.write();
        if guard.selection_purged {
          local.selected.remove(&guard.product_id);
        }
        let removed = local.remove_line(&guard.product_id);
        info!(product_id = %guard.product_id, badge = local.badge_count(), "Cart line removed locally.");
        removed
      };
      ctx_data.write().removed = removed;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  registry.register(p);
  Ok(())
}

#[instrument(name = "cart_flow::delete_cart_line", skip(ctx_data), err(Display))]
async fn delete_cart_line(ctx_data: ContextData<RemoveItemCtxData>) -> AppResult<FlowControl> {
  let (api, token, line) = {
    let guard = ctx_data.read();
    (
      Arc::clone(&guard.app_state.api),
      guard.token.clone(),
      ProductRef {
        product_id: guard.product_id.clone(),
      },
    )
  };
  api.remove_from_cart(&token, &line).await?;
  Ok(FlowControl::Continue)
}

pub fn register_orders_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<OrdersCtxData, AppError>::new(&[("authorize", false, None), ("fetch_orders", false, None)]);
  p.on_step("authorize", authorize::<OrdersCtxData>)?;
  p.on_step("fetch_orders", |ctx_data: ContextData<OrdersCtxData>| {
    Box::pin(async move {
      let (api, token) = {
        let guard = ctx_data.read();
        (Arc::clone(&guard.app_state.api), guard.token.clone())
      };
      let orders = api.orders(&token).await?;
      ctx_data.write().orders = orders;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;
  registry.register(p);
  Ok(())
}
