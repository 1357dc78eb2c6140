//! Product repository.
//!
//! Products are addressed by `(product_sku, product_store_id)`; callers pass
//! a store code and the repository resolves the store inside the same
//! transaction as the write.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use store_inventory_core::{CurrencyCode, Dimensions, Price, ProductId, Sku, StoreCode, StoreId};

use super::existence::{ExistenceKey, exists, verify_written};
use super::{RepositoryError, finish};
use crate::models::{Product, ProductDraft, WriteOutcome, Written};

const TABLE: &str = "product";

const PRODUCT_COLUMNS: &str = "p.product_id, p.product_sku, p.product_unspc, p.product_brand, \
     p.category_id, p.parent_category_id, p.unit_of_measure, p.product_stock, \
     p.product_store_id, p.product_name, p.product_title, p.product_long_description, \
     p.product_photo, p.product_price, p.product_tax, p.product_currency, p.product_status, \
     p.product_published, p.product_manage_stock, p.product_length, p.product_width, \
     p.product_height, p.product_weight, p.creation_date, p.last_update_date";

/// Database row for `inventory.product`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: i32,
    product_sku: String,
    product_unspc: Option<String>,
    product_brand: Option<String>,
    category_id: Option<i32>,
    parent_category_id: Option<i32>,
    unit_of_measure: Option<String>,
    product_stock: i32,
    product_store_id: i32,
    product_name: String,
    product_title: Option<String>,
    product_long_description: Option<String>,
    product_photo: Option<String>,
    product_price: Decimal,
    product_tax: Decimal,
    product_currency: String,
    product_status: String,
    product_published: bool,
    product_manage_stock: bool,
    product_length: Option<Decimal>,
    product_width: Option<Decimal>,
    product_height: Option<Decimal>,
    product_weight: Option<Decimal>,
    creation_date: DateTime<Utc>,
    last_update_date: DateTime<Utc>,
}

/// Product row joined with its store.
#[derive(Debug, sqlx::FromRow)]
struct StoredProductRow {
    #[sqlx(flatten)]
    product: ProductRow,
    store_code: String,
    store_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct UpsertedProductRow {
    #[sqlx(flatten)]
    stored: StoredProductRow,
    inserted: bool,
}

impl TryFrom<StoredProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: StoredProductRow) -> Result<Self, Self::Error> {
        let StoredProductRow {
            product: p,
            store_code,
            store_name,
        } = row;

        let sku = Sku::parse(&p.product_sku).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid SKU in database: {e}"))
        })?;
        let store_code = StoreCode::parse(&store_code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid store code in database: {e}"))
        })?;
        let currency = CurrencyCode::parse(&p.product_currency).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(p.product_id),
            sku,
            store_id: StoreId::new(p.product_store_id),
            store_code,
            store_name,
            unspc: p.product_unspc,
            brand: p.product_brand,
            category_id: p.category_id,
            parent_category_id: p.parent_category_id,
            unit_of_measure: p.unit_of_measure,
            stock: p.product_stock,
            name: p.product_name,
            title: p.product_title,
            long_description: p.product_long_description,
            photo: p.product_photo,
            price: Price::new(p.product_price, p.product_tax, currency),
            status: p.product_status,
            published: p.product_published,
            manage_stock: p.product_manage_stock,
            dimensions: Dimensions {
                length: p.product_length,
                width: p.product_width,
                height: p.product_height,
                weight: p.product_weight,
            },
            created_at: p.creation_date,
            updated_at: p.last_update_date,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product with `sku`, one per store, ordered by store code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a row is corrupt.
    pub async fn list_by_sku(&self, sku: &Sku) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoredProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}, s.store_code, s.store_name
            FROM inventory.product p
            JOIN inventory.store s ON s.id_store = p.product_store_id
            WHERE p.product_sku = $1
            ORDER BY s.store_code
            "
        ))
        .bind(sku.as_str())
        .fetch_all(self.pool)
        .await
        .map_err(RepositoryError::on(TABLE))?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert a product, or rewrite every mutable column of the product with
    /// the same SKU in the same store, then verify the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound("store")` if the store code does not
    /// resolve, `RepositoryError::VerificationFailed` if the written row is not
    /// visible afterwards. The transaction is rolled back on every error.
    pub async fn upsert(&self, draft: &ProductDraft) -> Result<Written<Product>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = upsert_in(&mut tx, draft).await;
        finish(tx, TABLE, result).await
    }

    /// Rewrite an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` naming the store or product table
    /// when either does not exist.
    pub async fn update(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = update_in(&mut tx, draft).await;
        finish(tx, TABLE, result).await
    }

    /// Delete the product with `sku` in the store with `store_code`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` naming the store or product table
    /// when either does not exist, `RepositoryError::VerificationFailed` if the
    /// row is still visible after the delete.
    pub async fn delete(
        &self,
        sku: &Sku,
        store_code: &StoreCode,
    ) -> Result<ProductId, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = delete_in(&mut tx, sku, store_code).await;
        finish(tx, TABLE, result).await
    }
}

/// Resolve `(id_store, store_name)` for a code, failing with `NotFound("store")`.
async fn resolve_store(
    conn: &mut PgConnection,
    code: &StoreCode,
) -> Result<(StoreId, String), RepositoryError> {
    let row = sqlx::query_as::<_, (i32, String)>(
        "SELECT id_store, store_name FROM inventory.store WHERE store_code = $1",
    )
    .bind(code.as_str())
    .fetch_optional(&mut *conn)
    .await
    .map_err(RepositoryError::on("store"))?;

    row.map(|(id, name)| (StoreId::new(id), name))
        .ok_or(RepositoryError::NotFound("store"))
}

/// Wrap a `RETURNING` product row with the store it was resolved against.
fn with_store(product: ProductRow, code: &StoreCode, name: &str) -> StoredProductRow {
    StoredProductRow {
        product,
        store_code: code.as_str().to_owned(),
        store_name: name.to_owned(),
    }
}

async fn upsert_in(
    conn: &mut PgConnection,
    draft: &ProductDraft,
) -> Result<Written<Product>, RepositoryError> {
    let (store_id, _) = resolve_store(conn, &draft.store_code).await?;

    let row = sqlx::query_as::<_, UpsertedProductRow>(
        r"
        WITH written AS (
            INSERT INTO inventory.product AS p (
                product_sku, product_store_id, product_unspc, product_brand, category_id,
                parent_category_id, unit_of_measure, product_stock, product_name,
                product_title, product_long_description, product_photo, product_price,
                product_tax, product_currency, product_status, product_published,
                product_manage_stock, product_length, product_width, product_height,
                product_weight
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22)
            ON CONFLICT (product_sku, product_store_id) DO UPDATE SET
                product_unspc = EXCLUDED.product_unspc,
                product_brand = EXCLUDED.product_brand,
                category_id = EXCLUDED.category_id,
                parent_category_id = EXCLUDED.parent_category_id,
                unit_of_measure = EXCLUDED.unit_of_measure,
                product_stock = EXCLUDED.product_stock,
                product_name = EXCLUDED.product_name,
                product_title = EXCLUDED.product_title,
                product_long_description = EXCLUDED.product_long_description,
                product_photo = EXCLUDED.product_photo,
                product_price = EXCLUDED.product_price,
                product_tax = EXCLUDED.product_tax,
                product_currency = EXCLUDED.product_currency,
                product_status = EXCLUDED.product_status,
                product_published = EXCLUDED.product_published,
                product_manage_stock = EXCLUDED.product_manage_stock,
                product_length = EXCLUDED.product_length,
                product_width = EXCLUDED.product_width,
                product_height = EXCLUDED.product_height,
                product_weight = EXCLUDED.product_weight,
                last_update_date = NOW()
            RETURNING p.*, (p.xmax = 0) AS inserted
        )
        SELECT written.*, s.store_code, s.store_name
        FROM written
        JOIN inventory.store s ON s.id_store = written.product_store_id
        ",
    )
    .bind(draft.sku.as_str())
    .bind(store_id.as_i32())
    .bind(&draft.unspc)
    .bind(&draft.brand)
    .bind(draft.category_id)
    .bind(draft.parent_category_id)
    .bind(&draft.unit_of_measure)
    .bind(draft.stock)
    .bind(&draft.name)
    .bind(&draft.title)
    .bind(&draft.long_description)
    .bind(&draft.photo)
    .bind(draft.price.amount)
    .bind(draft.price.tax)
    .bind(draft.price.currency)
    .bind(&draft.status)
    .bind(draft.published)
    .bind(draft.manage_stock)
    .bind(draft.dimensions.length)
    .bind(draft.dimensions.width)
    .bind(draft.dimensions.height)
    .bind(draft.dimensions.weight)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepositoryError::on(TABLE))?;

    let outcome = WriteOutcome::from_inserted(row.inserted);
    let product = Product::try_from(row.stored)?;

    verify_written(
        &mut *conn,
        ExistenceKey::Product {
            id: product.id,
            store_id,
        },
    )
    .await?;

    tracing::info!(
        product_id = %product.id,
        sku = %product.sku,
        store_code = %product.store_code,
        ?outcome,
        "Product written"
    );

    Ok(Written {
        record: product,
        outcome,
    })
}

async fn update_in(
    conn: &mut PgConnection,
    draft: &ProductDraft,
) -> Result<Product, RepositoryError> {
    let (store_id, store_name) = resolve_store(conn, &draft.store_code).await?;

    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r"
        UPDATE inventory.product AS p SET
            product_unspc = $3,
            product_brand = $4,
            category_id = $5,
            parent_category_id = $6,
            unit_of_measure = $7,
            product_stock = $8,
            product_name = $9,
            product_title = $10,
            product_long_description = $11,
            product_photo = $12,
            product_price = $13,
            product_tax = $14,
            product_currency = $15,
            product_status = $16,
            product_published = $17,
            product_manage_stock = $18,
            product_length = $19,
            product_width = $20,
            product_height = $21,
            product_weight = $22,
            last_update_date = NOW()
        WHERE p.product_sku = $1 AND p.product_store_id = $2
        RETURNING {PRODUCT_COLUMNS}
        "
    ))
    .bind(draft.sku.as_str())
    .bind(store_id.as_i32())
    .bind(&draft.unspc)
    .bind(&draft.brand)
    .bind(draft.category_id)
    .bind(draft.parent_category_id)
    .bind(&draft.unit_of_measure)
    .bind(draft.stock)
    .bind(&draft.name)
    .bind(&draft.title)
    .bind(&draft.long_description)
    .bind(&draft.photo)
    .bind(draft.price.amount)
    .bind(draft.price.tax)
    .bind(draft.price.currency)
    .bind(&draft.status)
    .bind(draft.published)
    .bind(draft.manage_stock)
    .bind(draft.dimensions.length)
    .bind(draft.dimensions.width)
    .bind(draft.dimensions.height)
    .bind(draft.dimensions.weight)
    .fetch_optional(&mut *conn)
    .await
    .map_err(RepositoryError::on(TABLE))?
    .ok_or(RepositoryError::NotFound(TABLE))?;

    let product = Product::try_from(with_store(row, &draft.store_code, &store_name))?;

    verify_written(
        &mut *conn,
        ExistenceKey::Product {
            id: product.id,
            store_id,
        },
    )
    .await?;

    Ok(product)
}

async fn delete_in(
    conn: &mut PgConnection,
    sku: &Sku,
    store_code: &StoreCode,
) -> Result<ProductId, RepositoryError> {
    let (store_id, _) = resolve_store(conn, store_code).await?;

    let id = sqlx::query_scalar::<_, i32>(
        r"
        DELETE FROM inventory.product
        WHERE product_sku = $1 AND product_store_id = $2
        RETURNING product_id
        ",
    )
    .bind(sku.as_str())
    .bind(store_id.as_i32())
    .fetch_optional(&mut *conn)
    .await
    .map_err(RepositoryError::on(TABLE))?
    .map(ProductId::new)
    .ok_or(RepositoryError::NotFound(TABLE))?;

    let key = ExistenceKey::Product { id, store_id };
    if exists(&mut *conn, key).await? {
        return Err(RepositoryError::VerificationFailed {
            table: TABLE,
            key: key.to_string(),
        });
    }

    tracing::info!(product_id = %id, %sku, %store_code, "Product deleted");
    Ok(id)
}
