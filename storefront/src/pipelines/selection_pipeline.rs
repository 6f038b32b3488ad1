// storefront/src/pipelines/selection_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::{CartItem, ProductId, ProductRef, SelectedItem};
use crate::outcome::BulkAction;
use crate::pipelines::common_steps::authorize;
use crate::pipelines::contexts::{BulkSelectCtxData, ToggleSelectCtxData};
use cartflow::{ContextData, Flow, FlowControl, FlowError, FlowRegistry};
use futures_util::{stream, StreamExt};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub fn register_toggle_select_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<ToggleSelectCtxData, AppError>::new(&[
    ("resolve_line", false, None),
    ("authorize", false, None),
    (
      "stage_line",
      false,
      Some(Arc::new(|ctx: ContextData<ToggleSelectCtxData>| ctx.read().was_selected)),
    ),
    (
      "unstage_line",
      false,
      Some(Arc::new(|ctx: ContextData<ToggleSelectCtxData>| !ctx.read().was_selected)),
    ),
    ("apply_toggle", false, None),
  ]);

  p.on_step("resolve_line", |ctx_data: ContextData<ToggleSelectCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let (line, was_selected) = {
        let local = guard.app_state.local.read();
        (local.line(&guard.product_id).cloned(), local.is_selected(&guard.product_id))
      };
      match line {
        Some(line) => {
          guard.line = Some(line);
          guard.was_selected = was_selected;
          Ok(FlowControl::Continue)
        }
        None => Err(AppError::NotFound(format!(
          "Product {} is not in the cart.",
          guard.product_id
        ))),
      }
    })
  })?;
  p.on_step("authorize", authorize::<ToggleSelectCtxData>)?;
  p.on_step("stage_line", stage_line)?;
  p.on_step("unstage_line", unstage_line)?;
  p.on_step("apply_toggle", |ctx_data: ContextData<ToggleSelectCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let mut local = guard.app_state.local.write();
      if guard.was_selected {
        local.selected.remove(&guard.product_id);
      } else {
        local.selected.insert(guard.product_id.clone());
      }
      info!(product_id = %guard.product_id, selected = !guard.was_selected, "Selection toggled.");
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  registry.register(p);
  Ok(())
}

/// Copies quantity, price, name and image from the cart line.
#[instrument(name = "selection_flow::stage_line", skip(ctx_data), err(Display))]
async fn stage_line(ctx_data: ContextData<ToggleSelectCtxData>) -> AppResult<FlowControl> {
  let (api, token, item) = {
    let guard = ctx_data.read();
    let line = guard
      .line
      .as_ref()
      .ok_or_else(|| AppError::Internal("toggle flow reached staging without a cart line".to_string()))?;
    (Arc::clone(&guard.app_state.api), guard.token.clone(), SelectedItem::from(line))
  };
  api.add_selected(&token, &item).await?;
  Ok(FlowControl::Continue)
}

#[instrument(name = "selection_flow::unstage_line", skip(ctx_data), err(Display))]
async fn unstage_line(ctx_data: ContextData<ToggleSelectCtxData>) -> AppResult<FlowControl> {
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
  api.remove_selected(&token, &line).await?;
  Ok(FlowControl::Continue)
}

pub fn register_bulk_select_flow(registry: &FlowRegistry<AppError>) -> Result<(), FlowError> {
  let mut p = Flow::<BulkSelectCtxData, AppError>::new(&[
    ("authorize", false, None),
    ("plan_targets", false, None),
    ("fan_out", false, None),
    ("apply_bulk", false, None),
  ]);

  p.on_step("authorize", authorize::<BulkSelectCtxData>)?;
  p.on_step("plan_targets", |ctx_data: ContextData<BulkSelectCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let (targets, orphans) = {
        let local = guard.app_state.local.read();
        let targets: Vec<CartItem> = match guard.outcome.action {
          // The add endpoint increments quantity on duplicates, so skip staged lines.
          BulkAction::Select => local
            .items
            .iter()
            .filter(|i| !local.is_selected(&i.product_id))
            .cloned()
            .collect(),
          BulkAction::Deselect => local
            .items
            .iter()
            .filter(|i| local.is_selected(&i.product_id))
            .cloned()
            .collect(),
        };
        let orphans: Vec<ProductId> = local.selected.iter().filter(|id| !local.contains(id)).cloned().collect();
        (targets, orphans)
      };
      info!(
        action = ?guard.outcome.action,
        targets = targets.len(),
        orphans = orphans.len(),
        "Bulk selection planned."
      );
      let nothing_to_do = targets.is_empty() && orphans.is_empty();
      guard.targets = targets;
      guard.orphans = orphans;
      Ok::<_, AppError>(if nothing_to_do {
        FlowControl::Stop
      } else {
        FlowControl::Continue
      })
    })
  })?;
  p.on_step("fan_out", fan_out)?;
  p.on_step("apply_bulk", |ctx_data: ContextData<BulkSelectCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let mut local = guard.app_state.local.write();
      for product_id in &guard.outcome.succeeded {
        match guard.outcome.action {
          BulkAction::Select => {
            local.selected.insert(product_id.clone());
          }
          BulkAction::Deselect => {
            local.selected.remove(product_id);
          }
        }
      }
      for product_id in &guard.outcome.pruned {
        local.selected.remove(product_id);
      }
      if !guard.outcome.failed.is_empty() {
        warn!(
          succeeded = guard.outcome.succeeded.len(),
          failed = guard.outcome.failed.len(),
          "Bulk selection partially failed; successes kept."
        );
      }
      Ok::<_, AppError>(FlowControl::Continue)
    })
  })?;

  registry.register(p);
  Ok(())
}

enum BulkCall {
  Stage(CartItem),
  Unstage(ProductId),
  Prune(ProductId),
}

/// At most `fan_out_limit` requests in flight; every line reports its own result.
#[instrument(name = "selection_flow::fan_out", skip(ctx_data))]
async fn fan_out(ctx_data: ContextData<BulkSelectCtxData>) -> AppResult<FlowControl> {
  let (api, token, limit, calls) = {
    let mut guard = ctx_data.write();
    let action = guard.outcome.action;
    let targets = std::mem::take(&mut guard.targets);
    let orphans = std::mem::take(&mut guard.orphans);
    let calls: Vec<BulkCall> = targets
      .into_iter()
      .map(|line| match action {
        BulkAction::Select => BulkCall::Stage(line),
        BulkAction::Deselect => BulkCall::Unstage(line.product_id),
      })
      .chain(orphans.into_iter().map(BulkCall::Prune))
      .collect();
    (
      Arc::clone(&guard.app_state.api),
      guard.token.clone(),
      guard.app_state.settings.fan_out_limit.max(1),
      calls,
    )
  };

  let results: Vec<_> = stream::iter(calls)
    .map(|call| {
      let api = Arc::clone(&api);
      let token = token.clone();
      async move {
        match call {
          BulkCall::Stage(line) => {
            let result = api.add_selected(&token, &SelectedItem::from(&line)).await;
            (line.product_id, false, result)
          }
          BulkCall::Unstage(product_id) => {
            let body = ProductRef {
              product_id: product_id.clone(),
            };
            let result = api.remove_selected(&token, &body).await;
            (product_id, false, result)
          }
          BulkCall::Prune(product_id) => {
            let body = ProductRef {
              product_id: product_id.clone(),
            };
            // Nothing staged on the server means nothing left to prune.
            let result = match api.remove_selected(&token, &body).await {
              Err(e) if e.is_not_found() => Ok(()),
              other => other,
            };
            (product_id, true, result)
          }
        }
      }
    })
    .buffer_unordered(limit)
    .collect()
    .await;

  let mut guard = ctx_data.write();
  for (product_id, pruning, result) in results {
    match result {
      Ok(()) if pruning => guard.outcome.pruned.push(product_id),
      Ok(()) => guard.outcome.succeeded.push(product_id),
      Err(e) => {
        warn!(%product_id, error = %e, "Bulk selection call failed.");
        guard.outcome.failed.push((product_id, e));
      }
    }
  }
  Ok(FlowControl::Continue)
}
