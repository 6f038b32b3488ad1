// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::Arc;
use storefront_client::models::Product;
use storefront_client::{CartItem, MockStorefrontApi, SelectedItem, SelectionWorkflow, Session, WorkflowSettings};

pub const TOKEN: &str = "test-token";

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING);
}

pub fn line(id: &str, price: u64, quantity: u32) -> CartItem {
  CartItem {
    product_id: id.into(),
    name: format!("Item {}", id),
    price,
    quantity,
    imageurl: format!("/img/{}.png", id),
  }
}

pub fn staged(id: &str, price: u64, quantity: u32) -> SelectedItem {
  SelectedItem::from(&line(id, price, quantity))
}

pub fn product(id: &str, price: u64) -> Product {
  Product {
    id: id.into(),
    name: format!("Product {}", id),
    price,
    stock: 50,
    category_id: None,
    imageurl: format!("/img/{}.png", id),
  }
}

pub fn workflow(api: &Arc<MockStorefrontApi>) -> SelectionWorkflow {
  workflow_with(api, WorkflowSettings::default())
}

pub fn workflow_with(api: &Arc<MockStorefrontApi>, settings: WorkflowSettings) -> SelectionWorkflow {
  setup_tracing();
  SelectionWorkflow::new(api.clone(), Session::with_token(TOKEN), settings).expect("flows register")
}

/// A mock holding `cart` and `selection`, and a workflow that has loaded both.
pub async fn loaded(cart: Vec<CartItem>, selection: Vec<SelectedItem>) -> (Arc<MockStorefrontApi>, SelectionWorkflow) {
  loaded_with(cart, selection, WorkflowSettings::default()).await
}

pub async fn loaded_with(
  cart: Vec<CartItem>,
  selection: Vec<SelectedItem>,
  settings: WorkflowSettings,
) -> (Arc<MockStorefrontApi>, SelectionWorkflow) {
  let mut mock = MockStorefrontApi::new();
  if !cart.is_empty() {
    mock = mock.with_cart(cart);
  }
  if !selection.is_empty() {
    mock = mock.with_selection(selection);
  }
  let api = Arc::new(mock);
  let wf = workflow_with(&api, settings);
  wf.reload().await.expect("initial reload");
  api.clear_calls();
  (api, wf)
}
