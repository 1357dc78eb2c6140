//! Store domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use store_inventory_core::{StoreAddress, StoreCode, StoreId};

/// A physical store (domain type).
#[derive(Debug, Clone)]
pub struct Store {
    /// Generated store ID.
    pub id: StoreId,
    /// Unique `LETTER-DD` code.
    pub code: StoreCode,
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: StoreAddress,
    /// Minimum stock every product of this store should keep.
    pub min_inventory: i32,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last written.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating or rewriting a store.
#[derive(Debug, Clone)]
pub struct StoreDraft {
    pub code: StoreCode,
    pub name: String,
    pub address: StoreAddress,
    pub min_inventory: i32,
}

/// Store fields as submitted by clients, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreInput {
    pub store_code: String,
    pub store_name: String,
    pub street_address: String,
    pub external_number_address: String,
    pub suburb_address: String,
    pub city_address: String,
    pub country_address: String,
    pub zip_postal_code_address: String,
    #[serde(default)]
    pub minimum_inventory: i32,
}
