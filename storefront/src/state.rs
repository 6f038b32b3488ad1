// storefront/src/state.rs

use crate::api::StorefrontApi;
use crate::config::WorkflowSettings;
use crate::models::{CartItem, ProductId, SelectedItem};
use crate::money;
use crate::session::Session;
use cartflow::ContextData;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Handles shared by every flow run. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
  pub api: Arc<dyn StorefrontApi>,
  pub session: Session,
  pub settings: WorkflowSettings,
  pub local: ContextData<CartState>,
  line_locks: Arc<Mutex<HashMap<ProductId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl AppState {
  pub fn new(api: Arc<dyn StorefrontApi>, session: Session, settings: WorkflowSettings) -> Self {
    Self {
      api,
      session,
      settings,
      local: ContextData::new(CartState::default()),
      line_locks: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  /// The async lock that serializes quantity writes for one line.
  pub fn line_lock(&self, product_id: &ProductId) -> Arc<tokio::sync::Mutex<()>> {
    self
      .line_locks
      .lock()
      .entry(product_id.clone())
      .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
      .clone()
  }
}

/// The client's copy of the cart and of which lines are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
  pub items: Vec<CartItem>,
  pub selected: HashSet<ProductId>,
  revisions: HashMap<ProductId, u64>,
}

impl CartState {
  pub fn line(&self, product_id: &ProductId) -> Option<&CartItem> {
    self.items.iter().find(|i| &i.product_id == product_id)
  }

  pub fn contains(&self, product_id: &ProductId) -> bool {
    self.line(product_id).is_some()
  }

  pub fn is_selected(&self, product_id: &ProductId) -> bool {
    self.selected.contains(product_id)
  }

  /// Distinct products in the cart, not the sum of quantities.
  pub fn badge_count(&self) -> usize {
    self.items.len()
  }

  /// Selected ids and cart ids are the same set, and the cart is not empty.
  pub fn all_selected(&self) -> bool {
    if self.items.is_empty() || self.selected.len() != self.items.len() {
      return false;
    }
    self.items.iter().all(|i| self.selected.contains(&i.product_id))
  }

  pub fn total_price(&self) -> u64 {
    money::total_price(&self.items, &self.selected)
  }

  pub fn replace_items(&mut self, items: Vec<CartItem>) {
    self.items = items;
  }

  pub fn replace_selection(&mut self, items: &[SelectedItem]) {
    self.selected = items.iter().map(|i| i.product_id.clone()).collect();
  }

  pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
    match self.items.iter_mut().find(|i| &i.product_id == product_id) {
      Some(line) => {
        line.quantity = quantity;
        true
      }
      None => false,
    }
  }

  /// Drops the cart line. The selection keeps the id unless the cart is now empty.
  pub fn remove_line(&mut self, product_id: &ProductId) -> Option<CartItem> {
    let idx = self.items.iter().position(|i| &i.product_id == product_id)?;
    let removed = self.items.remove(idx);
    if self.items.is_empty() {
      self.selected.clear();
    }
    Some(removed)
  }

  /// Issues the next write revision for a line.
  pub fn bump_revision(&mut self, product_id: &ProductId) -> u64 {
    let rev = self.revisions.entry(product_id.clone()).or_insert(0);
    *rev += 1;
    *rev
  }

  pub fn is_latest_revision(&self, product_id: &ProductId, revision: u64) -> bool {
    self.revisions.get(product_id).copied().unwrap_or(0) == revision
  }
}
