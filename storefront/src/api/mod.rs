// storefront/src/api/mod.rs

//! The seam between the workflow and the storefront server.

pub mod http;
pub mod mock;

pub use http::HttpStorefrontApi;
pub use mock::{MockStorefrontApi, RecordedCall};

use crate::errors::Result;
use crate::models::{
  CartItem, Category, LoginResponse, Order, OrderRequest, Product, ProductRef, QuantityUpdate, SelectedItem, Service,
};
use async_trait::async_trait;
use reqwest::Method;
use std::fmt;

/// Every REST operation the client knows, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
  Login,
  Products,
  Services,
  ProductCategories,
  GetCart,
  AddToCart,
  UpdateCart,
  RemoveFromCart,
  GetSelection,
  AddSelected,
  UpdateSelected,
  RemoveSelected,
  ClearSelection,
  PlaceOrder,
  Orders,
}

impl Endpoint {
  pub fn method(self) -> Method {
    match self {
      Endpoint::Login
      | Endpoint::AddToCart
      | Endpoint::UpdateCart
      | Endpoint::AddSelected
      | Endpoint::UpdateSelected
      | Endpoint::PlaceOrder => Method::POST,
      Endpoint::RemoveFromCart | Endpoint::RemoveSelected | Endpoint::ClearSelection => Method::DELETE,
      Endpoint::Products
      | Endpoint::Services
      | Endpoint::ProductCategories
      | Endpoint::GetCart
      | Endpoint::GetSelection
      | Endpoint::Orders => Method::GET,
    }
  }

  pub fn path(self) -> &'static str {
    match self {
      Endpoint::Login => "/login",
      Endpoint::Products => "/products",
      Endpoint::Services => "/services",
      Endpoint::ProductCategories => "/productcategories",
      Endpoint::GetCart => "/cart",
      Endpoint::AddToCart => "/cart/add",
      Endpoint::UpdateCart => "/cart/update",
      Endpoint::RemoveFromCart => "/cart/remove",
      Endpoint::GetSelection => "/selecteditems",
      Endpoint::AddSelected => "/selecteditems/add",
      Endpoint::UpdateSelected => "/selecteditems/update",
      Endpoint::RemoveSelected => "/selecteditems/remove",
      Endpoint::ClearSelection => "/selecteditems/clear",
      Endpoint::PlaceOrder => "/order",
      Endpoint::Orders => "/orders",
    }
  }

  pub fn requires_auth(self) -> bool {
    !matches!(
      self,
      Endpoint::Login | Endpoint::Products | Endpoint::Services | Endpoint::ProductCategories
    )
  }
}

impl fmt::Display for Endpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.method(), self.path())
  }
}

/// One method per storefront endpoint. Authenticated calls take the bearer token.
///
/// A missing cart or selection comes back as a 404 `AppError::Status`;
/// deciding that this means "empty" is left to the caller.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
  async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;
  async fn products(&self) -> Result<Vec<Product>>;
  async fn services(&self) -> Result<Vec<Service>>;
  async fn product_categories(&self) -> Result<Vec<Category>>;

  async fn get_cart(&self, token: &str) -> Result<Vec<CartItem>>;
  async fn add_to_cart(&self, token: &str, line: &QuantityUpdate) -> Result<Vec<CartItem>>;
  async fn update_cart(&self, token: &str, line: &QuantityUpdate) -> Result<()>;
  async fn remove_from_cart(&self, token: &str, line: &ProductRef) -> Result<()>;

  async fn get_selection(&self, token: &str) -> Result<Vec<SelectedItem>>;
  async fn add_selected(&self, token: &str, item: &SelectedItem) -> Result<()>;
  async fn update_selected(&self, token: &str, line: &QuantityUpdate) -> Result<()>;
  async fn remove_selected(&self, token: &str, line: &ProductRef) -> Result<()>;
  async fn clear_selection(&self, token: &str) -> Result<()>;

  async fn place_order(&self, token: &str, order: &OrderRequest) -> Result<Order>;
  async fn orders(&self, token: &str) -> Result<Vec<Order>>;
}
