//! Store repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use store_inventory_core::{StoreAddress, StoreCode, StoreId};

use super::existence::{ExistenceKey, exists, find_row_id, verify_written};
use super::{RepositoryError, finish};
use crate::models::{Store, StoreDraft, WriteOutcome, Written};

const TABLE: &str = "store";

const STORE_COLUMNS: &str = "id_store, store_code, store_name, store_street_address, \
     store_external_number, store_suburb_address, store_city_address, store_country_address, \
     store_zippostal_code, store_min_inventory, creation_date, last_update_date";

/// Database row for `inventory.store`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StoreRow {
    id_store: i32,
    store_code: String,
    store_name: String,
    store_street_address: String,
    store_external_number: String,
    store_suburb_address: String,
    store_city_address: String,
    store_country_address: String,
    store_zippostal_code: String,
    store_min_inventory: i32,
    creation_date: DateTime<Utc>,
    last_update_date: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UpsertedStoreRow {
    #[sqlx(flatten)]
    store: StoreRow,
    inserted: bool,
}

impl TryFrom<StoreRow> for Store {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let code = StoreCode::parse(&row.store_code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid store code in database: {e}"))
        })?;

        Ok(Self {
            id: StoreId::new(row.id_store),
            code,
            name: row.store_name,
            address: StoreAddress {
                street: row.store_street_address,
                exterior_number: row.store_external_number,
                suburb: row.store_suburb_address,
                city: row.store_city_address,
                country: row.store_country_address,
                postal_code: row.store_zippostal_code,
            },
            min_inventory: row.store_min_inventory,
            created_at: row.creation_date,
            updated_at: row.last_update_date,
        })
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by its code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or the row is corrupt.
    pub async fn get_by_code(&self, code: &StoreCode) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "SELECT {STORE_COLUMNS} FROM inventory.store WHERE store_code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::on(TABLE))?;

        row.map(Store::try_from).transpose()
    }

    /// Insert a store, or rewrite every mutable column of the store with the
    /// same code, then verify the row inside the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VerificationFailed` if the written row is not
    /// visible afterwards, or another `RepositoryError` if a statement fails.
    /// The transaction is rolled back on every error.
    pub async fn upsert(&self, draft: &StoreDraft) -> Result<Written<Store>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = upsert_in(&mut tx, draft).await;
        finish(tx, TABLE, result).await
    }

    /// Rewrite an existing store. Returns `None` if no store has the code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a statement fails or the write cannot be
    /// verified. The transaction is rolled back on every error.
    pub async fn update(&self, draft: &StoreDraft) -> Result<Option<Store>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = update_in(&mut tx, draft).await;
        finish(tx, TABLE, result).await
    }

    /// Delete the store with `code`. Returns the deleted ID, or `None` if no
    /// store has the code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if products still reference the
    /// store, `RepositoryError::VerificationFailed` if the row is still
    /// visible after the delete.
    pub async fn delete(&self, code: &StoreCode) -> Result<Option<StoreId>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::on(TABLE))?;
        let result = delete_in(&mut tx, code).await;
        finish(tx, TABLE, result).await
    }
}

async fn upsert_in(
    conn: &mut PgConnection,
    draft: &StoreDraft,
) -> Result<Written<Store>, RepositoryError> {
    let row = sqlx::query_as::<_, UpsertedStoreRow>(&format!(
        r"
        INSERT INTO inventory.store (
            store_code, store_name, store_street_address, store_external_number,
            store_suburb_address, store_city_address, store_country_address,
            store_zippostal_code, store_min_inventory
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (store_code) DO UPDATE SET
            store_name = EXCLUDED.store_name,
            store_street_address = EXCLUDED.store_street_address,
            store_external_number = EXCLUDED.store_external_number,
            store_suburb_address = EXCLUDED.store_suburb_address,
            store_city_address = EXCLUDED.store_city_address,
            store_country_address = EXCLUDED.store_country_address,
            store_zippostal_code = EXCLUDED.store_zippostal_code,
            store_min_inventory = EXCLUDED.store_min_inventory,
            last_update_date = NOW()
        RETURNING {STORE_COLUMNS}, (xmax = 0) AS inserted
        "
    ))
    .bind(draft.code.as_str())
    .bind(&draft.name)
    .bind(&draft.address.street)
    .bind(&draft.address.exterior_number)
    .bind(&draft.address.suburb)
    .bind(&draft.address.city)
    .bind(&draft.address.country)
    .bind(&draft.address.postal_code)
    .bind(draft.min_inventory)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepositoryError::on(TABLE))?;

    let outcome = WriteOutcome::from_inserted(row.inserted);
    let store = Store::try_from(row.store)?;

    verify_written(
        &mut *conn,
        ExistenceKey::Store {
            id: store.id,
            code: &store.code,
        },
    )
    .await?;

    tracing::info!(
        store_id = %store.id,
        store_code = %store.code,
        ?outcome,
        "Store written"
    );

    Ok(Written {
        record: store,
        outcome,
    })
}

async fn update_in(
    conn: &mut PgConnection,
    draft: &StoreDraft,
) -> Result<Option<Store>, RepositoryError> {
    let row = sqlx::query_as::<_, StoreRow>(&format!(
        r"
        UPDATE inventory.store SET
            store_name = $2,
            store_street_address = $3,
            store_external_number = $4,
            store_suburb_address = $5,
            store_city_address = $6,
            store_country_address = $7,
            store_zippostal_code = $8,
            store_min_inventory = $9,
            last_update_date = NOW()
        WHERE store_code = $1
        RETURNING {STORE_COLUMNS}
        "
    ))
    .bind(draft.code.as_str())
    .bind(&draft.name)
    .bind(&draft.address.street)
    .bind(&draft.address.exterior_number)
    .bind(&draft.address.suburb)
    .bind(&draft.address.city)
    .bind(&draft.address.country)
    .bind(&draft.address.postal_code)
    .bind(draft.min_inventory)
    .fetch_optional(&mut *conn)
    .await
    .map_err(RepositoryError::on(TABLE))?;

    let Some(row) = row else {
        return Ok(None);
    };
    let store = Store::try_from(row)?;

    verify_written(
        &mut *conn,
        ExistenceKey::Store {
            id: store.id,
            code: &store.code,
        },
    )
    .await?;

    Ok(Some(store))
}

async fn delete_in(
    conn: &mut PgConnection,
    code: &StoreCode,
) -> Result<Option<StoreId>, RepositoryError> {
    let Some(id) = find_row_id(&mut *conn, ExistenceKey::StoreCode(code))
        .await?
        .map(StoreId::new)
    else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM inventory.store WHERE id_store = $1 AND store_code = $2")
        .bind(id.as_i32())
        .bind(code.as_str())
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::on(TABLE))?;

    let key = ExistenceKey::Store { id, code };
    if exists(&mut *conn, key).await? {
        return Err(RepositoryError::VerificationFailed {
            table: TABLE,
            key: key.to_string(),
        });
    }

    tracing::info!(store_id = %id, store_code = %code, "Store deleted");
    Ok(Some(id))
}
