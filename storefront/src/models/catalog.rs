// storefront/src/models/catalog.rs

//! Read-only catalog records. The cart flow refers to them only by id.

use super::cart_item::ProductId;
use crate::money::de_vnd;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  #[serde(default, deserialize_with = "de_vnd")]
  pub price: u64,
  #[serde(default)]
  pub stock: i64,
  #[serde(default, rename = "productcategory")]
  pub category_id: Option<String>,
  #[serde(default)]
  pub imageurl: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
  pub id: String,
  pub name: String,
  #[serde(default, deserialize_with = "de_vnd")]
  pub price: u64,
  #[serde(default)]
  pub description: String,
  #[serde(default, rename = "servicecategory")]
  pub category_id: Option<String>,
  #[serde(default)]
  pub imageurl: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
}
