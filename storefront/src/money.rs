// storefront/src/money.rs

//! Whole-đồng arithmetic and display.

use crate::models::{CartItem, ProductId};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

/// Sum of `price * quantity` over the cart lines whose id is selected.
pub fn total_price(items: &[CartItem], selected: &HashSet<ProductId>) -> u64 {
  items
    .iter()
    .filter(|item| selected.contains(&item.product_id))
    .map(CartItem::line_total)
    .sum()
}

/// Formats an amount with `.` as the thousands separator: `250000` -> `"250.000"`.
pub fn format_vnd(amount: u64) -> String {
  let digits = amount.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push('.');
    }
    out.push(ch);
  }
  out
}

/// Accepts integer or float JSON numbers and rounds to the nearest đồng.
pub fn de_vnd<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = f64::deserialize(deserializer)?;
  if !raw.is_finite() || raw < 0.0 {
    return Err(D::Error::custom(format!("invalid price: {}", raw)));
  }
  Ok(raw.round() as u64)
}
