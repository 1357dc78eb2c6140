//! Stock queries and updates on `inventory.product`.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use store_inventory_core::{Sku, StockLevel, StoreCode};

use super::existence::{ExistenceKey, exists};
use super::{RepositoryError, finish};
use crate::models::{StockEntry, StockUpdate};

const TABLE: &str = "product";

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    store_code: String,
    store_name: String,
    product_sku: String,
    product_stock: i32,
    store_min_inventory: i32,
}

impl TryFrom<StockRow> for StockEntry {
    type Error = RepositoryError;

    fn try_from(row: StockRow) -> Result<Self, Self::Error> {
        Ok(Self {
            store_code: StoreCode::parse(&row.store_code).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid store code in database: {e}"))
            })?,
            store_name: row.store_name,
            sku: Sku::parse(&row.product_sku).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid SKU in database: {e}"))
            })?,
            level: StockLevel::new(row.product_stock, row.store_min_inventory),
        })
    }
}

/// Repository for stock reads and writes.
pub struct StockRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StockRepository<'a> {
    /// Create a new stock repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Stock of `sku` in the store with `store_code`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is corrupt.
    pub async fn in_store(
        &self,
        store_code: &StoreCode,
        sku: &Sku,
    ) -> Result<Option<StockEntry>, RepositoryError> {
        let row = sqlx::query_as::<_, StockRow>(
            r"
            SELECT s.store_code, s.store_name, p.product_sku, p.product_stock,
                   s.store_min_inventory
            FROM inventory.product p
            JOIN inventory.store s ON s.id_store = p.product_store_id
            WHERE s.store_code = $1 AND p.product_sku = $2
            ",
        )
        .bind(store_code.as_str())
        .bind(sku.as_str())
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on(TABLE))?;

        row.map(StockEntry::try_from).transpose()
    }

    /// Stock of `sku` in every store that carries it, ordered by store code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a row is corrupt.
    pub async fn across_stores(&self, sku: &Sku) -> Result<Vec<StockEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockRow>(
            r"
            SELECT s.store_code, s.store_name, p.product_sku, p.product_stock,
                   s.store_min_inventory
            FROM inventory.product p
            JOIN inventory.store s ON s.id_store = p.product_store_id
            WHERE p.product_sku = $1
            ORDER BY s.store_code
            ",
        )
        .bind(sku.as_str())
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on(TABLE))?;

        rows.into_iter().map(StockEntry::try_from).collect()
    }

    /// Overwrite the stock of `sku` in the store with `store_code`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound("store")` if the store does not
    /// exist, `RepositoryError::NotFound("product")` if the store does not
    /// carry the SKU. The transaction is rolled back on every error.
    pub async fn set_stock(
        &self,
        store_code: &StoreCode,
        sku: &Sku,
        quantity: i32,
    ) -> Result<StockUpdate, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = set_stock_in(&mut tx, store_code, sku, quantity).await;
        finish(tx, TABLE, result).await
    }
}

async fn set_stock_in(
    conn: &mut PgConnection,
    store_code: &StoreCode,
    sku: &Sku,
    quantity: i32,
) -> Result<StockUpdate, RepositoryError> {
    let updated_at = sqlx::query_scalar::<_, DateTime<Utc>>(
        r"
        UPDATE inventory.product
        SET product_stock = $1, last_update_date = NOW()
        WHERE product_store_id = (
            SELECT id_store FROM inventory.store WHERE store_code = $2
        )
        AND product_sku = $3
        RETURNING last_update_date
        ",
    )
    .bind(quantity)
    .bind(store_code.as_str())
    .bind(sku.as_str())
    .fetch_optional(&mut *conn)
    .await
    .map_err(RepositoryError::on(TABLE))?;

    if !exists(&mut *conn, ExistenceKey::StoreCode(store_code)).await? {
        return Err(RepositoryError::NotFound("store"));
    }

    let updated_at = updated_at.ok_or(RepositoryError::NotFound(TABLE))?;

    tracing::info!(%store_code, %sku, stock = quantity, "Product stock updated");

    Ok(StockUpdate {
        store_code: store_code.clone(),
        sku: sku.clone(),
        stock: quantity,
        updated_at,
    })
}
