// storefront/src/models/mod.rs

//! Wire types exchanged with the storefront REST API.

pub mod auth;
pub mod cart_item;
pub mod catalog;
pub mod order;

pub use auth::{LoginRequest, LoginResponse, UserProfile};
pub use cart_item::{CartItem, ItemsEnvelope, ProductId, ProductRef, QuantityUpdate, SelectedItem};
pub use catalog::{Category, Product, Service};
pub use order::{Order, OrderItem, OrderRequest};
