// storefront/src/pipelines/quantity_pipeline.rs

//! Quantity edits. Writes to one line are serialized and tagged with a
//! revision; only the newest revision is applied to local state.

use crate::api::StorefrontApi;
use crate::errors::{AppError, Result as AppResult};
use crate::models::QuantityUpdate;
use crate::money::{MAX_QUANTITY, MIN_QUANTITY};
use crate::outcome::{Mirror, QuantityChange};
use crate::pipelines::common_steps::{authorize, secondary_succeeded};
use crate::pipelines::contexts::QuantityCtxData;
use cartflow::{ContextData, Flow, FlowControl, FlowError, FlowRegistry};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub fn register_quantity_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<QuantityCtxData, AppError>::new(&[
    ("validate_quantity", false, None),
    ("authorize", false, None),
    ("sequence_write", false, None),
    ("update_cart_line", false, None),
    (
      "mirror_selection",
      true,
      Some(Arc::new(|ctx: ContextData<QuantityCtxData>| !ctx.read().was_selected)),
    ),
    ("apply_quantity", false, None),
  ]);

  p.on_step("validate_quantity", validate_quantity)?;
  p.on_step("authorize", authorize::<QuantityCtxData>)?;
  p.on_step("sequence_write", sequence_write)?;
  p.on_step("update_cart_line", update_cart_line)?;
  p.on_step("mirror_selection", mirror_selection)?;
  p.on_step("apply_quantity", |ctx_data: ContextData<QuantityCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let (product_id, quantity, revision, mirror) =
        (guard.product_id.clone(), guard.quantity, guard.revision, guard.mirror);
      let outcome = {
        let mut local = guard.app_state.local.write();
        if local.is_latest_revision(&product_id, revision) {
          local.set_quantity(&product_id, quantity);
          QuantityChange::Applied { quantity, mirror }
        } else {
          debug!(%product_id, revision, "Newer quantity write pending; not applying locally.");
          QuantityChange::Superseded { quantity }
        }
      };
      info!(%product_id, quantity, ?outcome, "Quantity change finished.");
      guard.outcome = Some(outcome);
      guard.line_guard = None;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  registry.register(p);
  Ok(())
}

/// Below the minimum is a no-op; above the maximum is clamped.
async fn validate_quantity(ctx_data: ContextData<QuantityCtxData>) -> AppResult<FlowControl> {
  let mut guard = ctx_data.write();
  if guard.requested < i64::from(MIN_QUANTITY) {
    debug!(requested = guard.requested, "Quantity below minimum; ignoring.");
    guard.outcome = Some(QuantityChange::Ignored);
    return Ok(FlowControl::Stop);
  }

  let product_id = guard.product_id.clone();
  let (present, selected) = {
    let local = guard.app_state.local.read();
    (local.contains(&product_id), local.is_selected(&product_id))
  };
  if !present {
    return Err(AppError::NotFound(format!("Product {} is not in the cart.", product_id)));
  }

  guard.quantity = guard.requested.min(i64::from(MAX_QUANTITY)) as u32;
  guard.was_selected = selected;
  if i64::from(guard.quantity) != guard.requested {
    debug!(requested = guard.requested, clamped = guard.quantity, "Quantity clamped.");
  }
  Ok(FlowControl::Continue)
}

/// Takes the next revision, then waits behind earlier writes to the same line.
async fn sequence_write(ctx_data: ContextData<QuantityCtxData>) -> AppResult<FlowControl> {
  let (lock, revision) = {
    let mut guard = ctx_data.write();
    let product_id = guard.product_id.clone();
    let revision = guard.app_state.local.write().bump_revision(&product_id);
    guard.revision = revision;
    (guard.app_state.line_lock(&product_id), revision)
  };
  let line_guard = lock.lock_owned().await;
  debug!(revision, "Acquired line write slot.");
  ctx_data.write().line_guard = Some(line_guard);
  Ok(FlowControl::Continue)
}

#[instrument(name = "quantity_flow::update_cart_line", skip(ctx_data), err(Display))]
async fn update_cart_line(ctx_data: ContextData<QuantityCtxData>) -> AppResult<FlowControl> {
  let (api, token, line) = request_parts(&ctx_data);
  api.update_cart(&token, &line).await?;
  Ok(FlowControl::Continue)
}

/// The staged copy is best effort; a failure is logged and reported, never raised.
#[instrument(name = "quantity_flow::mirror_selection", skip(ctx_data))]
async fn mirror_selection(ctx_data: ContextData<QuantityCtxData>) -> AppResult<FlowControl> {
  let (api, token, line) = request_parts(&ctx_data);
  let ok = secondary_succeeded(api.update_selected(&token, &line).await, "mirror quantity to selection");
  if !ok {
    warn!(product_id = %line.product_id, "Selected copy keeps its old quantity until the next reload.");
  }
  ctx_data.write().mirror = if ok { Mirror::Updated } else { Mirror::Failed };
  Ok(FlowControl::Continue)
}

fn request_parts(ctx_data: &ContextData<QuantityCtxData>) -> (Arc<dyn StorefrontApi>, String, QuantityUpdate) {
  let guard = ctx_data.read();
  (
    Arc::clone(&guard.app_state.api),
    guard.token.clone(),
    QuantityUpdate {
      product_id: guard.product_id.clone(),
      quantity: guard.quantity,
    },
  )
}
