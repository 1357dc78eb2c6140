//! Stock domain types.

use chrono::{DateTime, Utc};

use store_inventory_core::{Sku, StockLevel, StoreCode};

/// Stock of one SKU in one store.
#[derive(Debug, Clone)]
pub struct StockEntry {
    pub store_code: StoreCode,
    pub store_name: String,
    pub sku: Sku,
    pub level: StockLevel,
}

/// Result of overwriting a product's stock.
#[derive(Debug, Clone)]
pub struct StockUpdate {
    pub store_code: StoreCode,
    pub sku: Sku,
    pub stock: i32,
    pub updated_at: DateTime<Utc>,
}
