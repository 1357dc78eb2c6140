//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use store_inventory_core::{Dimensions, Price, ProductId, Sku, StoreCode, StoreId};

/// A product stocked by one store (domain type).
///
/// The same SKU in two stores is two products.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub sku: Sku,
    pub store_id: StoreId,
    pub store_code: StoreCode,
    pub store_name: String,
    /// UNSPSC classification code.
    pub unspc: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<i32>,
    pub parent_category_id: Option<i32>,
    pub unit_of_measure: Option<String>,
    pub stock: i32,
    pub name: String,
    pub title: Option<String>,
    pub long_description: Option<String>,
    /// Photo URL.
    pub photo: Option<String>,
    pub price: Price,
    pub status: String,
    pub published: bool,
    pub manage_stock: bool,
    pub dimensions: Dimensions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating or rewriting a product.
///
/// Every mutable column is overwritten; `None` clears the column.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub sku: Sku,
    pub store_code: StoreCode,
    pub unspc: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<i32>,
    pub parent_category_id: Option<i32>,
    pub unit_of_measure: Option<String>,
    pub stock: i32,
    pub name: String,
    pub title: Option<String>,
    pub long_description: Option<String>,
    pub photo: Option<String>,
    pub price: Price,
    pub status: String,
    pub published: bool,
    pub manage_stock: bool,
    pub dimensions: Dimensions,
}

/// Product fields as submitted by clients, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub product_sku: String,
    pub product_store_code: String,
    pub product_unspc: Option<String>,
    pub product_brand: Option<String>,
    pub category_id: Option<i32>,
    pub parent_category_id: Option<i32>,
    pub unit_of_measure: Option<String>,
    #[serde(default)]
    pub product_stock: i32,
    pub product_name: String,
    pub product_title: Option<String>,
    pub product_long_description: Option<String>,
    pub product_photo: Option<String>,
    pub product_price: Decimal,
    #[serde(default)]
    pub product_tax: Decimal,
    pub product_currency: String,
    pub product_status: String,
    #[serde(default)]
    pub product_published: bool,
    #[serde(default = "default_manage_stock")]
    pub product_manage_stock: bool,
    pub product_length: Option<Decimal>,
    pub product_width: Option<Decimal>,
    pub product_height: Option<Decimal>,
    pub product_weight: Option<Decimal>,
}

const fn default_manage_stock() -> bool {
    true
}
