// storefront/src/api/mock.rs

//! In-memory storefront with the server's collection semantics, for tests
//! and offline demos.

use super::{Endpoint, StorefrontApi};
use crate::errors::{AppError, Result};
use crate::models::{
  CartItem, Category, LoginResponse, Order, OrderItem, OrderRequest, Product, ProductId, ProductRef, QuantityUpdate,
  SelectedItem, Service,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// One request as the mock saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
  pub endpoint: Endpoint,
  pub body: Option<serde_json::Value>,
}

#[derive(Default)]
struct MockStore {
  // `None` mirrors "no document": the server answers 404.
  cart: Option<Vec<CartItem>>,
  selection: Option<Vec<SelectedItem>>,
  orders: Vec<Order>,
  products: Vec<Product>,
  services: Vec<Service>,
  categories: Vec<Category>,
  accounts: HashMap<String, (String, LoginResponse)>,
  calls: Vec<RecordedCall>,
  failures: HashMap<Endpoint, VecDeque<(StatusCode, String)>>,
}

#[derive(Default)]
pub struct MockStorefrontApi {
  store: Mutex<MockStore>,
  latency: Mutex<Option<Duration>>,
  in_flight: AtomicUsize,
  max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::SeqCst);
  }
}

impl MockStorefrontApi {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_cart(self, items: Vec<CartItem>) -> Self {
    self.store.lock().cart = Some(items);
    self
  }

  pub fn with_selection(self, items: Vec<SelectedItem>) -> Self {
    self.store.lock().selection = Some(items);
    self
  }

  pub fn with_products(self, products: Vec<Product>) -> Self {
    self.store.lock().products = products;
    self
  }

  pub fn with_catalog(self, services: Vec<Service>, categories: Vec<Category>) -> Self {
    {
      let mut store = self.store.lock();
      store.services = services;
      store.categories = categories;
    }
    self
  }

  pub fn with_account(self, email: &str, password: &str, login: LoginResponse) -> Self {
    self
      .store
      .lock()
      .accounts
      .insert(email.to_string(), (password.to_string(), login));
    self
  }

  /// Delay applied to every call, so concurrent callers overlap.
  pub fn set_latency(&self, latency: Duration) {
    *self.latency.lock() = Some(latency);
  }

  /// The next call to `endpoint` answers `status` instead of doing its work.
  pub fn fail_next(&self, endpoint: Endpoint, status: StatusCode, body: &str) {
    self
      .store
      .lock()
      .failures
      .entry(endpoint)
      .or_default()
      .push_back((status, body.to_string()));
  }

  pub fn calls(&self) -> Vec<RecordedCall> {
    self.store.lock().calls.clone()
  }

  pub fn calls_to(&self, endpoint: Endpoint) -> Vec<RecordedCall> {
    self
      .store
      .lock()
      .calls
      .iter()
      .filter(|c| c.endpoint == endpoint)
      .cloned()
      .collect()
  }

  pub fn clear_calls(&self) {
    self.store.lock().calls.clear();
  }

  pub fn max_in_flight(&self) -> usize {
    self.max_in_flight.load(Ordering::SeqCst)
  }

  pub fn cart(&self) -> Option<Vec<CartItem>> {
    self.store.lock().cart.clone()
  }

  pub fn selection(&self) -> Option<Vec<SelectedItem>> {
    self.store.lock().selection.clone()
  }

  pub fn selection_ids(&self) -> Vec<ProductId> {
    self
      .store
      .lock()
      .selection
      .as_ref()
      .map(|items| items.iter().map(|i| i.product_id.clone()).collect())
      .unwrap_or_default()
  }

  pub fn placed_orders(&self) -> Vec<Order> {
    self.store.lock().orders.clone()
  }

  /// Records the call, waits out the latency and pops any injected failure.
  async fn enter(&self, endpoint: Endpoint, body: Option<serde_json::Value>) -> Result<()> {
    let injected = {
      let mut store = self.store.lock();
      store.calls.push(RecordedCall { endpoint, body });
      store.failures.get_mut(&endpoint).and_then(VecDeque::pop_front)
    };

    let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let _in_flight = InFlight(&self.in_flight);

    let latency = *self.latency.lock();
    if let Some(latency) = latency {
      tokio::time::sleep(latency).await;
    }

    match injected {
      Some((status, body)) => {
        debug!(%endpoint, %status, "Mock storefront failing on request.");
        Err(status_error(endpoint, status, &body))
      }
      None => Ok(()),
    }
  }
}

fn status_error(endpoint: Endpoint, status: StatusCode, body: &str) -> AppError {
  AppError::Status {
    endpoint: endpoint.to_string(),
    status,
    body: body.to_string(),
  }
}

fn body_of<B: serde::Serialize>(body: &B) -> Option<serde_json::Value> {
  serde_json::to_value(body).ok()
}

#[async_trait]
impl StorefrontApi for MockStorefrontApi {
  async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
    self
      .enter(Endpoint::Login, Some(serde_json::json!({ "email": email })))
      .await?;
    let store = self.store.lock();
    match store.accounts.get(email) {
      Some((expected, resp)) if expected == password => Ok(resp.clone()),
      _ => Err(status_error(Endpoint::Login, StatusCode::UNAUTHORIZED, "Invalid credentials")),
    }
  }

  async fn products(&self) -> Result<Vec<Product>> {
    self.enter(Endpoint::Products, None).await?;
    Ok(self.store.lock().products.clone())
  }

  async fn services(&self) -> Result<Vec<Service>> {
    self.enter(Endpoint::Services, None).await?;
    Ok(self.store.lock().services.clone())
  }

  async fn product_categories(&self) -> Result<Vec<Category>> {
    self.enter(Endpoint::ProductCategories, None).await?;
    Ok(self.store.lock().categories.clone())
  }

  async fn get_cart(&self, _token: &str) -> Result<Vec<CartItem>> {
    self.enter(Endpoint::GetCart, None).await?;
    self
      .store
      .lock()
      .cart
      .clone()
      .ok_or_else(|| status_error(Endpoint::GetCart, StatusCode::NOT_FOUND, "Cart not found"))
  }

  async fn add_to_cart(&self, _token: &str, line: &QuantityUpdate) -> Result<Vec<CartItem>> {
    self.enter(Endpoint::AddToCart, body_of(line)).await?;
    let mut store = self.store.lock();
    let product = store.products.iter().find(|p| p.id == line.product_id).cloned();
    let cart = store.cart.get_or_insert_with(Vec::new);
    match cart.iter_mut().find(|i| i.product_id == line.product_id) {
      Some(existing) => existing.quantity += line.quantity,
      None => cart.push(CartItem {
        product_id: line.product_id.clone(),
        name: product.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
        price: product.as_ref().map(|p| p.price).unwrap_or_default(),
        quantity: line.quantity,
        imageurl: product.as_ref().map(|p| p.imageurl.clone()).unwrap_or_default(),
      }),
    }
    Ok(cart.clone())
  }

  async fn update_cart(&self, _token: &str, line: &QuantityUpdate) -> Result<()> {
    self.enter(Endpoint::UpdateCart, body_of(line)).await?;
    let mut store = self.store.lock();
    let cart = store
      .cart
      .as_mut()
      .ok_or_else(|| status_error(Endpoint::UpdateCart, StatusCode::NOT_FOUND, "Cart not found"))?;
    if let Some(existing) = cart.iter_mut().find(|i| i.product_id == line.product_id) {
      existing.quantity = line.quantity;
    }
    Ok(())
  }

  async fn remove_from_cart(&self, _token: &str, line: &ProductRef) -> Result<()> {
    self.enter(Endpoint::RemoveFromCart, body_of(line)).await?;
    let mut store = self.store.lock();
    let cart = store
      .cart
      .as_mut()
      .ok_or_else(|| status_error(Endpoint::RemoveFromCart, StatusCode::NOT_FOUND, "Cart not found"))?;
    let before = cart.len();
    cart.retain(|i| i.product_id != line.product_id);
    if cart.len() == before {
      return Err(status_error(
        Endpoint::RemoveFromCart,
        StatusCode::BAD_REQUEST,
        "Product not found in cart",
      ));
    }
    if cart.is_empty() {
      store.cart = None;
    }
    Ok(())
  }

  async fn get_selection(&self, _token: &str) -> Result<Vec<SelectedItem>> {
    self.enter(Endpoint::GetSelection, None).await?;
    self
      .store
      .lock()
      .selection
      .clone()
      .ok_or_else(|| status_error(Endpoint::GetSelection, StatusCode::NOT_FOUND, "Selected items not found"))
  }

  async fn add_selected(&self, _token: &str, item: &SelectedItem) -> Result<()> {
    self.enter(Endpoint::AddSelected, body_of(item)).await?;
    let mut store = self.store.lock();
    let selection = store.selection.get_or_insert_with(Vec::new);
    match selection.iter_mut().find(|i| i.product_id == item.product_id) {
      Some(existing) => existing.quantity += item.quantity,
      None => selection.push(item.clone()),
    }
    Ok(())
  }

  async fn update_selected(&self, _token: &str, line: &QuantityUpdate) -> Result<()> {
    self.enter(Endpoint::UpdateSelected, body_of(line)).await?;
    let mut store = self.store.lock();
    let selection = store.selection.as_mut().ok_or_else(|| {
      status_error(Endpoint::UpdateSelected, StatusCode::NOT_FOUND, "Selected items not found")
    })?;
    if let Some(existing) = selection.iter_mut().find(|i| i.product_id == line.product_id) {
      existing.quantity = line.quantity;
    }
    Ok(())
  }

  async fn remove_selected(&self, _token: &str, line: &ProductRef) -> Result<()> {
    self.enter(Endpoint::RemoveSelected, body_of(line)).await?;
    let mut store = self.store.lock();
    let selection = store.selection.as_mut().ok_or_else(|| {
      status_error(Endpoint::RemoveSelected, StatusCode::NOT_FOUND, "Selected items not found")
    })?;
    selection.retain(|i| i.product_id != line.product_id);
    if selection.is_empty() {
      store.selection = None;
    }
    Ok(())
  }

  async fn clear_selection(&self, _token: &str) -> Result<()> {
    self.enter(Endpoint::ClearSelection, None).await?;
    self.store.lock().selection = None;
    Ok(())
  }

  async fn place_order(&self, _token: &str, order: &OrderRequest) -> Result<Order> {
    self.enter(Endpoint::PlaceOrder, body_of(order)).await?;
    let now = Utc::now();
    let placed = Order {
      user_id: None,
      items: order.items.clone(),
      total_price: Some(order.items.iter().map(line_total).sum::<u64>() as f64),
      status: Some("pending".to_string()),
      created_at: Some(now),
      updated_at: Some(now),
    };
    self.store.lock().orders.push(placed.clone());
    Ok(placed)
  }

  async fn orders(&self, _token: &str) -> Result<Vec<Order>> {
    self.enter(Endpoint::Orders, None).await?;
    Ok(self.store.lock().orders.clone())
  }
}

fn line_total(item: &OrderItem) -> u64 {
  item.price.saturating_mul(u64::from(item.quantity))
}
