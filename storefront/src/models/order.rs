// storefront/src/models/order.rs

use super::cart_item::{ProductId, SelectedItem};
use crate::money::de_vnd;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
  pub product_id: ProductId,
  pub quantity: u32,
  #[serde(default, deserialize_with = "de_vnd")]
  pub price: u64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub imageurl: String,
}

impl From<SelectedItem> for OrderItem {
  fn from(item: SelectedItem) -> Self {
    OrderItem {
      product_id: item.product_id,
      quantity: item.quantity,
      price: item.price,
      name: item.name,
      imageurl: item.imageurl,
    }
  }
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
  pub items: Vec<OrderItem>,
}

/// A placed order. Status is owned by the server and kept as sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
  #[serde(default)]
  pub user_id: Option<String>,
  #[serde(default)]
  pub items: Vec<OrderItem>,
  #[serde(default)]
  pub total_price: Option<f64>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
  pub fn items_total(&self) -> u64 {
    self
      .items
      .iter()
      .map(|i| i.price.saturating_mul(u64::from(i.quantity)))
      .sum()
  }
}
