// storefront/src/models/cart_item.rs

use crate::money::de_vnd;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-assigned product id (a hex ObjectID on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
  pub fn new(id: impl Into<String>) -> Self {
    ProductId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ProductId {
  fn from(id: &str) -> Self {
    ProductId::new(id)
  }
}

impl From<String> for ProductId {
  fn from(id: String) -> Self {
    ProductId(id)
  }
}

/// One line of the server-held cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub product_id: ProductId,
  #[serde(default)]
  pub name: String,
  #[serde(default, deserialize_with = "de_vnd")]
  pub price: u64,
  pub quantity: u32,
  #[serde(default)]
  pub imageurl: String,
}

impl CartItem {
  pub fn line_total(&self) -> u64 {
    self.price.saturating_mul(u64::from(self.quantity))
  }
}

/// A cart line staged for checkout. Lives in its own server collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
  pub product_id: ProductId,
  #[serde(default)]
  pub name: String,
  #[serde(default, deserialize_with = "de_vnd")]
  pub price: u64,
  pub quantity: u32,
  #[serde(default)]
  pub imageurl: String,
}

impl From<&CartItem> for SelectedItem {
  fn from(item: &CartItem) -> Self {
    SelectedItem {
      product_id: item.product_id.clone(),
      name: item.name.clone(),
      price: item.price,
      quantity: item.quantity,
      imageurl: item.imageurl.clone(),
    }
  }
}

/// `{ user_id, items, created_at, updated_at }`, shared by cart and selection.
/// The server sends `items: null` for an empty collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsEnvelope<T> {
  pub user_id: Option<String>,
  pub items: Option<Vec<T>>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl<T> ItemsEnvelope<T> {
  pub fn with_items(items: Vec<T>) -> Self {
    ItemsEnvelope {
      user_id: None,
      items: Some(items),
      created_at: None,
      updated_at: None,
    }
  }

  pub fn into_items(self) -> Vec<T> {
    self.items.unwrap_or_default()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdate {
  pub product_id: ProductId,
  pub quantity: u32,
}

/// Body of the remove endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
  pub product_id: ProductId,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn cart_envelope_accepts_float_prices_and_null_items() {
    let body = json!({
      "user_id": "u1",
      "items": [
        { "product_id": "p1", "name": "Cà phê", "price": 100000.0, "quantity": 2, "imageurl": "a.png" },
        { "product_id": "p2", "price": 49999.6, "quantity": 1 }
      ],
      "created_at": "2024-05-01T10:00:00.123456789+07:00"
    });
    let env: ItemsEnvelope<CartItem> = serde_json::from_value(body).unwrap();
    assert!(env.created_at.is_some());
    let items = env.into_items();
    assert_eq!(items[0].price, 100_000);
    assert_eq!(items[0].line_total(), 200_000);
    assert_eq!(items[1].price, 50_000);
    assert_eq!(items[1].name, "");

    let empty: ItemsEnvelope<SelectedItem> = serde_json::from_value(json!({ "items": null })).unwrap();
    assert!(empty.into_items().is_empty());
  }

  #[test]
  fn envelope_without_fields_is_an_empty_collection() {
    let cart: ItemsEnvelope<CartItem> = serde_json::from_value(json!({})).unwrap();
    assert!(cart.user_id.is_none());
    assert!(cart.into_items().is_empty());

    let selection: ItemsEnvelope<SelectedItem> = serde_json::from_str(r#"{"user_id":"u1"}"#).unwrap();
    assert!(selection.into_items().is_empty());
  }

  #[test]
  fn negative_price_is_rejected() {
    let res: Result<CartItem, _> =
      serde_json::from_value(json!({ "product_id": "p1", "price": -5, "quantity": 1 }));
    assert!(res.is_err());
  }

  #[test]
  fn selected_item_copies_the_cart_line() {
    let line = CartItem {
      product_id: "p9".into(),
      name: "Trà".to_string(),
      price: 30_000,
      quantity: 3,
      imageurl: "t.png".to_string(),
    };
    let sel = SelectedItem::from(&line);
    assert_eq!(sel.product_id, line.product_id);
    assert_eq!(sel.quantity, 3);
    assert_eq!(serde_json::to_value(&sel).unwrap()["product_id"], "p9");
  }
}
