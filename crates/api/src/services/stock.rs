//! Stock service.

use sqlx::PgPool;

use store_inventory_core::{Sku, StoreCode};

use super::InventoryError;
use crate::db::StockRepository;
use crate::models::{StockEntry, StockUpdate};

const ITEM: &str = "stock";

/// Stock service.
pub struct StockService<'a> {
    stock: StockRepository<'a>,
}

impl<'a> StockService<'a> {
    /// Create a new stock service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            stock: StockRepository::new(pool),
        }
    }

    /// Overwrite the stock of `sku` in the store with `store_code`.
    ///
    /// The store code and SKU are validated before any statement is issued.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotStored` for a malformed code or SKU,
    /// `InventoryError::StoreNotFound` if the store does not exist,
    /// `InventoryError::ProductNotFound` if the store does not carry the SKU.
    pub async fn update_stock(
        &self,
        store_code: &str,
        sku: &str,
        quantity: i32,
    ) -> Result<StockUpdate, InventoryError> {
        let store_code =
            StoreCode::parse(store_code).map_err(|e| InventoryError::not_stored(ITEM, e))?;
        let sku = Sku::parse(sku).map_err(|e| InventoryError::not_stored(ITEM, e))?;

        self.stock
            .set_stock(&store_code, &sku, quantity)
            .await
            .map_err(|e| InventoryError::from_repository(e, store_code.as_str(), sku.as_str()))
    }

    /// Stock of `sku` in one store.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidInput` for a malformed code or SKU,
    /// `InventoryError::ProductNotFound` if the store does not carry the SKU.
    pub async fn stock_in_store(
        &self,
        store_code: &str,
        sku: &str,
    ) -> Result<StockEntry, InventoryError> {
        let store_code =
            StoreCode::parse(store_code).map_err(|e| InventoryError::InvalidInput(e.to_string()))?;
        let sku = Sku::parse(sku).map_err(|e| InventoryError::InvalidInput(e.to_string()))?;

        self.stock
            .in_store(&store_code, &sku)
            .await?
            .ok_or_else(|| InventoryError::ProductNotFound {
                sku: sku.to_string(),
                store_code: store_code.to_string(),
            })
    }

    /// Stock of `sku` in every store carrying it. Empty if none does.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidInput` for a malformed SKU.
    pub async fn stock_across_stores(&self, sku: &str) -> Result<Vec<StockEntry>, InventoryError> {
        let sku = Sku::parse(sku).map_err(|e| InventoryError::InvalidInput(e.to_string()))?;
        Ok(self.stock.across_stores(&sku).await?)
    }
}
