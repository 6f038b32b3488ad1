// storefront/src/pipelines/contexts.rs

//! Data carried through each flow. Handlers receive these wrapped in
//! `cartflow::ContextData`.

use crate::models::{CartItem, Order, ProductId, SelectedItem};
use crate::outcome::{BulkAction, BulkOutcome, CheckoutOutcome, Mirror, QuantityChange};
use crate::state::AppState;
use tokio::sync::OwnedMutexGuard;

/// Contexts whose flow needs the session's bearer token.
pub trait SessionBound: Send + Sync + 'static {
  /// Names the operation in `Unauthenticated` errors.
  const ACTION: &'static str;

  fn app_state(&self) -> &AppState;
  fn set_token(&mut self, token: String);
}

macro_rules! session_bound {
  ($($ctx:ty => $action:literal),+ $(,)?) => {
    $(
      impl SessionBound for $ctx {
        const ACTION: &'static str = $action;

        fn app_state(&self) -> &AppState {
          &self.app_state
        }

        fn set_token(&mut self, token: String) {
          self.token = token;
        }
      }
    )+
  };
}

session_bound! {
  LoadCartCtxData => "loading the cart",
  LoadSelectionCtxData => "loading the selection",
  AddToCartCtxData => "adding to the cart",
  RemoveItemCtxData => "removing a cart item",
  QuantityCtxData => "changing a quantity",
  ToggleSelectCtxData => "selecting an item",
  BulkSelectCtxData => "selecting all items",
  CheckoutCtxData => "checking out",
  OrdersCtxData => "listing orders",
}

#[derive(Clone)]
pub struct LoadCartCtxData {
  pub app_state: AppState,
  pub token: String,
  pub items: Vec<CartItem>,
}

impl LoadCartCtxData {
  pub fn new(app_state: AppState) -> Self {
    Self {
      app_state,
      token: String::new(),
      items: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct LoadSelectionCtxData {
  pub app_state: AppState,
  pub token: String,
  pub items: Vec<SelectedItem>,
}

impl LoadSelectionCtxData {
  pub fn new(app_state: AppState) -> Self {
    Self {
      app_state,
      token: String::new(),
      items: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub token: String,
  pub product_id: ProductId,
  pub quantity: u32,
  pub items: Vec<CartItem>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, product_id: ProductId, quantity: u32) -> Self {
    Self {
      app_state,
      token: String::new(),
      product_id,
      quantity,
      items: Vec::new(),
    }
  }
}

#[derive(Clone)]
pub struct RemoveItemCtxData {
  pub app_state: AppState,
  pub token: String,
  pub product_id: ProductId,
  pub was_selected: bool,
  pub selection_purged: bool,
  pub removed: Option<CartItem>,
}

impl RemoveItemCtxData {
  pub fn new(app_state: AppState, product_id: ProductId) -> Self {
    Self {
      app_state,
      token: String::new(),
      product_id,
      was_selected: false,
      selection_purged: false,
      removed: None,
    }
  }

  pub fn wants_purge(&self) -> bool {
    self.app_state.settings.purge_selection_on_remove && self.was_selected
  }
}

/// Holds the line's write lock from `sequence_write` until the flow finishes.
pub struct QuantityCtxData {
  pub app_state: AppState,
  pub token: String,
  pub product_id: ProductId,
  pub requested: i64,
  pub quantity: u32,
  pub revision: u64,
  pub was_selected: bool,
  pub mirror: Mirror,
  pub line_guard: Option<OwnedMutexGuard<()>>,
  pub outcome: Option<QuantityChange>,
}

impl QuantityCtxData {
  pub fn new(app_state: AppState, product_id: ProductId, requested: i64) -> Self {
    Self {
      app_state,
      token: String::new(),
      product_id,
      requested,
      quantity: 0,
      revision: 0,
      was_selected: false,
      mirror: Mirror::NotSelected,
      line_guard: None,
      outcome: None,
    }
  }
}

#[derive(Clone)]
pub struct ToggleSelectCtxData {
  pub app_state: AppState,
  pub token: String,
  pub product_id: ProductId,
  pub line: Option<CartItem>,
  pub was_selected: bool,
}

impl ToggleSelectCtxData {
  pub fn new(app_state: AppState, product_id: ProductId) -> Self {
    Self {
      app_state,
      token: String::new(),
      product_id,
      line: None,
      was_selected: false,
    }
  }
}

pub struct BulkSelectCtxData {
  pub app_state: AppState,
  pub token: String,
  pub targets: Vec<CartItem>,
  /// Selected ids whose cart line is gone.
  pub orphans: Vec<ProductId>,
  pub outcome: BulkOutcome,
}

impl BulkSelectCtxData {
  pub fn new(app_state: AppState, action: BulkAction) -> Self {
    Self {
      app_state,
      token: String::new(),
      targets: Vec::new(),
      orphans: Vec::new(),
      outcome: BulkOutcome::new(action),
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub token: String,
  pub selection: Vec<SelectedItem>,
  pub order: Option<Order>,
  pub selection_cleared: bool,
  pub outcome: Option<CheckoutOutcome>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState) -> Self {
    Self {
      app_state,
      token: String::new(),
      selection: Vec::new(),
      order: None,
      selection_cleared: false,
      outcome: None,
    }
  }
}

#[derive(Clone)]
pub struct OrdersCtxData {
  pub app_state: AppState,
  pub token: String,
  pub orders: Vec<Order>,
}

impl OrdersCtxData {
  pub fn new(app_state: AppState) -> Self {
    Self {
      app_state,
      token: String::new(),
      orders: Vec::new(),
    }
  }
}
