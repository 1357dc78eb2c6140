//! Business logic services for the inventory API.
//!
//! # Services
//!
//! - `stores` - Store upsert, update, lookup and delete
//! - `products` - Product upsert, update, lookup and delete
//! - `stock` - Stock updates and stock listings
//! - `auth` - API user credentials and bearer tokens
//!
//! Services validate their input before any statement is issued and map
//! repository failures onto [`InventoryError`] or [`auth::AuthError`].

pub mod auth;
mod error;
pub mod products;
pub mod stock;
pub mod stores;

pub use error::InventoryError;
pub use products::ProductService;
pub use stock::StockService;
pub use stores::StoreService;
