// storefront/src/workflow.rs

//! `SelectionWorkflow`: the cart / selection / order operations a storefront
//! page performs, each run as a registered flow.
//!
//! The three server collections are updated by independent requests. When a
//! call in the middle of an operation fails, the collections can disagree
//! until the next [`SelectionWorkflow::reload`].

use crate::api::StorefrontApi;
use crate::config::WorkflowSettings;
use crate::errors::{AppError, Result};
use crate::models::{CartItem, Order, ProductId};
use crate::money::format_vnd;
use crate::outcome::{BulkAction, BulkOutcome, CheckoutOutcome, QuantityChange};
use crate::pipelines::contexts::{
  AddToCartCtxData, BulkSelectCtxData, CheckoutCtxData, LoadCartCtxData, LoadSelectionCtxData, OrdersCtxData,
  QuantityCtxData, RemoveItemCtxData, ToggleSelectCtxData,
};
use crate::pipelines::register_all_flows;
use crate::session::Session;
use crate::state::{AppState, CartState};
use cartflow::{ContextData, FlowRegistry, FlowResult};
use std::sync::Arc;
use tracing::instrument;

pub struct SelectionWorkflow {
  state: AppState,
  registry: Arc<FlowRegistry<AppError>>,
}

impl SelectionWorkflow {
  pub fn new(api: Arc<dyn StorefrontApi>, session: Session, settings: WorkflowSettings) -> Result<Self> {
    let registry = FlowRegistry::<AppError>::new();
    register_all_flows(&registry)?;
    Ok(Self {
      state: AppState::new(api, session, settings),
      registry: Arc::new(registry),
    })
  }

  pub fn session(&self) -> &Session {
    &self.state.session
  }

  pub fn settings(&self) -> &WorkflowSettings {
    &self.state.settings
  }

  /// Replaces the local cart with the server's. No cart on the server means empty.
  #[instrument(name = "workflow::load_cart", skip(self), err(Display))]
  pub async fn load_cart(&self) -> Result<Vec<CartItem>> {
    let ctx = ContextData::new(LoadCartCtxData::new(self.state.clone()));
    self.registry.run(ctx.clone()).await?;
    let items = ctx.read().items.clone();
    Ok(items)
  }

  #[instrument(name = "workflow::load_selection", skip(self), err(Display))]
  pub async fn load_selection(&self) -> Result<Vec<ProductId>> {
    let ctx = ContextData::new(LoadSelectionCtxData::new(self.state.clone()));
    self.registry.run(ctx.clone()).await?;
    let ids = ctx.read().items.iter().map(|i| i.product_id.clone()).collect();
    Ok(ids)
  }

  /// Re-fetches both collections; the way to recover from a partial failure.
  pub async fn reload(&self) -> Result<()> {
    self.load_cart().await?;
    self.load_selection().await?;
    Ok(())
  }

  /// Sets a line's quantity. Below 1 sends nothing; above 10 sends 10.
  /// A selected line's staged copy is updated too, best effort.
  #[instrument(name = "workflow::set_quantity", skip(self), fields(product_id = %product_id), err(Display))]
  pub async fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> Result<QuantityChange> {
    let ctx = ContextData::new(QuantityCtxData::new(self.state.clone(), product_id.clone(), quantity));
    let result = self.registry.run(ctx.clone()).await?;
    let outcome = ctx.write().outcome.take();
    match (result, outcome) {
      (_, Some(outcome)) => Ok(outcome),
      (FlowResult::Stopped, None) => Ok(QuantityChange::Ignored),
      (FlowResult::Completed, None) => Err(AppError::Internal("quantity flow finished without an outcome".to_string())),
    }
  }

  /// Deletes the cart line. The staged copy stays on the server unless
  /// `purge_selection_on_remove` is set.
  #[instrument(name = "workflow::remove_item", skip(self), fields(product_id = %product_id), err(Display))]
  pub async fn remove_item(&self, product_id: &ProductId) -> Result<()> {
    let ctx = ContextData::new(RemoveItemCtxData::new(self.state.clone(), product_id.clone()));
    self.registry.run(ctx).await?;
    Ok(())
  }

  /// Flips one line between selected and unselected. Returns the new state.
  #[instrument(name = "workflow::toggle_select", skip(self), fields(product_id = %product_id), err(Display))]
  pub async fn toggle_select(&self, product_id: &ProductId) -> Result<bool> {
    let ctx = ContextData::new(ToggleSelectCtxData::new(self.state.clone(), product_id.clone()));
    self.registry.run(ctx.clone()).await?;
    let now_selected = !ctx.read().was_selected;
    Ok(now_selected)
  }

  pub fn all_selected(&self) -> bool {
    self.state.local.read().all_selected()
  }

  pub async fn select_all(&self) -> Result<BulkOutcome> {
    self.bulk(BulkAction::Select).await
  }

  pub async fn deselect_all(&self) -> Result<BulkOutcome> {
    self.bulk(BulkAction::Deselect).await
  }

  /// The single "select all / deselect all" control.
  pub async fn toggle_all(&self) -> Result<BulkOutcome> {
    if self.all_selected() {
      self.deselect_all().await
    } else {
      self.select_all().await
    }
  }

  #[instrument(name = "workflow::bulk", skip(self), err(Display))]
  async fn bulk(&self, action: BulkAction) -> Result<BulkOutcome> {
    let ctx = ContextData::new(BulkSelectCtxData::new(self.state.clone(), action));
    self.registry.run(ctx.clone()).await?;
    let outcome = std::mem::replace(&mut ctx.write().outcome, BulkOutcome::new(action));
    Ok(outcome)
  }

  /// Orders whatever the server currently holds as selected, then clears it.
  /// There is no idempotency key: retrying after a failed clear orders again.
  #[instrument(name = "workflow::checkout", skip(self), err(Display))]
  pub async fn checkout(&self) -> Result<CheckoutOutcome> {
    let ctx = ContextData::new(CheckoutCtxData::new(self.state.clone()));
    self.registry.run(ctx.clone()).await?;
    let outcome = ctx.write().outcome.take();
    outcome.ok_or_else(|| AppError::Internal("checkout flow finished without an outcome".to_string()))
  }

  pub fn total_price(&self) -> u64 {
    self.state.local.read().total_price()
  }

  pub fn total_price_display(&self) -> String {
    format_vnd(self.total_price())
  }

  #[instrument(name = "workflow::add_to_cart", skip(self), fields(product_id = %product_id), err(Display))]
  pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> Result<Vec<CartItem>> {
    let ctx = ContextData::new(AddToCartCtxData::new(self.state.clone(), product_id.clone(), quantity));
    self.registry.run(ctx.clone()).await?;
    let items = ctx.read().items.clone();
    Ok(items)
  }

  #[instrument(name = "workflow::orders", skip(self), err(Display))]
  pub async fn orders(&self) -> Result<Vec<Order>> {
    let ctx = ContextData::new(OrdersCtxData::new(self.state.clone()));
    self.registry.run(ctx.clone()).await?;
    let orders = std::mem::take(&mut ctx.write().orders);
    Ok(orders)
  }

  /// A copy of the local cart and selection for rendering.
  pub fn snapshot(&self) -> CartState {
    self.state.local.snapshot()
  }

  pub fn badge_count(&self) -> usize {
    self.state.local.read().badge_count()
  }
}
