// storefront/src/api/http.rs

use super::{Endpoint, StorefrontApi};
use crate::config::{normalize_base_url, AppConfig};
use crate::errors::{AppError, Result};
use crate::models::{
  CartItem, Category, ItemsEnvelope, LoginRequest, LoginResponse, Order, OrderRequest, Product, ProductRef,
  QuantityUpdate, SelectedItem, Service,
};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// `StorefrontApi` over HTTP/JSON. The base URL already carries any API prefix.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
  client: reqwest::Client,
  base_url: String,
}

impl HttpStorefrontApi {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;
    Ok(Self {
      client,
      base_url: normalize_base_url(base_url)?,
    })
  }

  pub fn from_config(config: &AppConfig) -> Result<Self> {
    Self::new(&config.api_url, config.request_timeout)
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, endpoint: Endpoint) -> String {
    format!("{}{}", self.base_url, endpoint.path())
  }

  /// Sends one request and returns the body of a 2xx answer.
  #[instrument(
    name = "storefront.http",
    skip(self, token, body),
    fields(method = %endpoint.method(), path = endpoint.path(), request_id = tracing::field::Empty, status = tracing::field::Empty)
  )]
  async fn execute(&self, endpoint: Endpoint, token: Option<&str>, body: Option<serde_json::Value>) -> Result<String> {
    let request_id = Uuid::new_v4();
    Span::current().record("request_id", tracing::field::display(request_id));

    let mut request = self
      .client
      .request(endpoint.method(), self.url(endpoint))
      .header(REQUEST_ID_HEADER, request_id.to_string());
    if let Some(token) = token {
      request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(body) = body {
      request = request.json(&body);
    }

    let response = request.send().await.map_err(|source| AppError::Transport {
      endpoint: endpoint.to_string(),
      source,
    })?;
    let status = response.status();
    Span::current().record("status", status.as_u16());

    let text = response.text().await.map_err(|source| AppError::Transport {
      endpoint: endpoint.to_string(),
      source,
    })?;

    if !status.is_success() {
      warn!(%status, "Storefront answered with an error status.");
      return Err(AppError::Status {
        endpoint: endpoint.to_string(),
        status,
        body: text.trim().to_string(),
      });
    }
    debug!(bytes = text.len(), "Storefront call succeeded.");
    Ok(text)
  }

  async fn call<B: Serialize>(&self, endpoint: Endpoint, token: Option<&str>, body: Option<&B>) -> Result<String> {
    let payload = body
      .map(serde_json::to_value)
      .transpose()
      .map_err(|e| AppError::Internal(format!("Failed to encode body for {}: {}", endpoint, e)))?;
    self.execute(endpoint, token, payload).await
  }

  async fn call_json<B: Serialize, R: DeserializeOwned>(
    &self,
    endpoint: Endpoint,
    token: Option<&str>,
    body: Option<&B>,
  ) -> Result<R> {
    let text = self.call(endpoint, token, body).await?;
    decode(endpoint, &text)
  }
}

fn decode<R: DeserializeOwned>(endpoint: Endpoint, text: &str) -> Result<R> {
  serde_json::from_str(text).map_err(|e| AppError::Decode {
    endpoint: endpoint.to_string(),
    message: e.to_string(),
  })
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
  async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
    let body = LoginRequest {
      email: email.to_string(),
      password: password.to_string(),
    };
    self.call_json(Endpoint::Login, None, Some(&body)).await
  }

  async fn products(&self) -> Result<Vec<Product>> {
    let list: Option<Vec<Product>> = self.call_json(Endpoint::Products, None, NO_BODY).await?;
    Ok(list.unwrap_or_default())
  }

  async fn services(&self) -> Result<Vec<Service>> {
    let list: Option<Vec<Service>> = self.call_json(Endpoint::Services, None, NO_BODY).await?;
    Ok(list.unwrap_or_default())
  }

  async fn product_categories(&self) -> Result<Vec<Category>> {
    let list: Option<Vec<Category>> = self.call_json(Endpoint::ProductCategories, None, NO_BODY).await?;
    Ok(list.unwrap_or_default())
  }

  async fn get_cart(&self, token: &str) -> Result<Vec<CartItem>> {
    let env: ItemsEnvelope<CartItem> = self.call_json(Endpoint::GetCart, Some(token), NO_BODY).await?;
    Ok(env.into_items())
  }

  async fn add_to_cart(&self, token: &str, line: &QuantityUpdate) -> Result<Vec<CartItem>> {
    let env: ItemsEnvelope<CartItem> = self.call_json(Endpoint::AddToCart, Some(token), Some(line)).await?;
    Ok(env.into_items())
  }

  async fn update_cart(&self, token: &str, line: &QuantityUpdate) -> Result<()> {
    self.call(Endpoint::UpdateCart, Some(token), Some(line)).await.map(|_| ())
  }

  async fn remove_from_cart(&self, token: &str, line: &ProductRef) -> Result<()> {
    self.call(Endpoint::RemoveFromCart, Some(token), Some(line)).await.map(|_| ())
  }

  async fn get_selection(&self, token: &str) -> Result<Vec<SelectedItem>> {
    let env: ItemsEnvelope<SelectedItem> = self.call_json(Endpoint::GetSelection, Some(token), NO_BODY).await?;
    Ok(env.into_items())
  }

  async fn add_selected(&self, token: &str, item: &SelectedItem) -> Result<()> {
    self.call(Endpoint::AddSelected, Some(token), Some(item)).await.map(|_| ())
  }

  async fn update_selected(&self, token: &str, line: &QuantityUpdate) -> Result<()> {
    self.call(Endpoint::UpdateSelected, Some(token), Some(line)).await.map(|_| ())
  }

  async fn remove_selected(&self, token: &str, line: &ProductRef) -> Result<()> {
    self.call(Endpoint::RemoveSelected, Some(token), Some(line)).await.map(|_| ())
  }

  async fn clear_selection(&self, token: &str) -> Result<()> {
    self.call(Endpoint::ClearSelection, Some(token), NO_BODY).await.map(|_| ())
  }

  async fn place_order(&self, token: &str, order: &OrderRequest) -> Result<Order> {
    self.call_json(Endpoint::PlaceOrder, Some(token), Some(order)).await
  }

  async fn orders(&self, token: &str) -> Result<Vec<Order>> {
    let list: Option<Vec<Order>> = self.call_json(Endpoint::Orders, Some(token), NO_BODY).await?;
    Ok(list.unwrap_or_default())
  }
}
