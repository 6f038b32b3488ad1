// storefront/src/outcome.rs

//! What each workflow operation reports back to its caller.

use crate::errors::AppError;
use crate::models::{Order, ProductId};
use crate::money::format_vnd;
use crate::notice::Notice;

/// Whether a selected line's staged copy followed a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
  NotSelected,
  Updated,
  Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
  /// Quantity below 1; nothing was sent.
  Ignored,
  Applied { quantity: u32, mirror: Mirror },
  /// The server accepted the write but a newer one for the same line was issued meanwhile.
  Superseded { quantity: u32 },
}

impl QuantityChange {
  /// False only when the line was selected and the staged copy could not be updated.
  pub fn mirrored(&self) -> bool {
    !matches!(self, QuantityChange::Applied { mirror: Mirror::Failed, .. })
  }

  pub fn notice(&self) -> Notice {
    match self {
      QuantityChange::Ignored => Notice::warning("Quantity must be at least 1; nothing changed."),
      QuantityChange::Applied { quantity, .. } => Notice::success(format!("Quantity set to {}.", quantity)),
      QuantityChange::Superseded { quantity } => {
        Notice::success(format!("Quantity {} sent; a newer change is pending.", quantity))
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
  Select,
  Deselect,
}

/// Per-line results of select-all / deselect-all. Successes are never rolled back.
#[derive(Debug)]
pub struct BulkOutcome {
  pub action: BulkAction,
  pub succeeded: Vec<ProductId>,
  /// Staged ids with no cart line left, unstaged on the server.
  pub pruned: Vec<ProductId>,
  pub failed: Vec<(ProductId, AppError)>,
}

impl BulkOutcome {
  pub fn new(action: BulkAction) -> Self {
    BulkOutcome {
      action,
      succeeded: Vec::new(),
      pruned: Vec::new(),
      failed: Vec::new(),
    }
  }

  pub fn is_complete(&self) -> bool {
    self.failed.is_empty()
  }

  pub fn notice(&self) -> Notice {
    let verb = match self.action {
      BulkAction::Select => "Selected",
      BulkAction::Deselect => "Deselected",
    };
    if self.is_complete() {
      Notice::success(format!("{} {} item(s).", verb, self.succeeded.len()))
    } else {
      Notice::error(format!(
        "{} {} item(s); {} failed.",
        verb,
        self.succeeded.len(),
        self.failed.len()
      ))
    }
  }
}

#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
  /// The server held no selected items; no order was posted.
  EmptySelection,
  Placed { order: Order, selection_cleared: bool },
}

impl CheckoutOutcome {
  pub fn notice(&self) -> Notice {
    match self {
      CheckoutOutcome::EmptySelection => Notice::from(&AppError::EmptySelection),
      CheckoutOutcome::Placed { order, selection_cleared: true } => {
        Notice::success(format!("Order placed: {} đ.", format_vnd(order.items_total())))
      }
      CheckoutOutcome::Placed { order, selection_cleared: false } => Notice::warning(format!(
        "Order placed: {} đ, but the selection could not be cleared.",
        format_vnd(order.items_total())
      )),
    }
  }
}
