//! Existence lookups by natural key.
//!
//! Each [`ExistenceKey`] variant maps to one fixed statement returning the
//! row's identifier. Lookups accept any executor, so a write can verify
//! itself inside its own transaction.

use core::fmt;

use sqlx::PgExecutor;

use store_inventory_core::{ProductId, StoreCode, StoreId};

use super::RepositoryError;

/// The key of a row whose existence is checked.
#[derive(Debug, Clone, Copy)]
pub enum ExistenceKey<'k> {
    /// A store by identifier and code.
    Store { id: StoreId, code: &'k StoreCode },
    /// A store by code alone.
    StoreCode(&'k StoreCode),
    /// A product by identifier and owning store.
    Product { id: ProductId, store_id: StoreId },
    /// An API user by user name.
    UserName(&'k str),
}

impl ExistenceKey<'_> {
    /// Table the key belongs to.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Store { .. } | Self::StoreCode(_) => "store",
            Self::Product { .. } => "product",
            Self::UserName(_) => "user_auth",
        }
    }

    const fn statement(&self) -> &'static str {
        match self {
            Self::Store { .. } => {
                "SELECT id_store FROM inventory.store WHERE id_store = $1 AND store_code = $2"
            }
            Self::StoreCode(_) => "SELECT id_store FROM inventory.store WHERE store_code = $1",
            Self::Product { .. } => {
                "SELECT product_id FROM inventory.product WHERE product_id = $1 AND product_store_id = $2"
            }
            Self::UserName(_) => "SELECT user_id FROM inventory.user_auth WHERE username = $1",
        }
    }
}

impl fmt::Display for ExistenceKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store { id, code } => write!(f, "id_store={id}, store_code={code}"),
            Self::StoreCode(code) => write!(f, "store_code={code}"),
            Self::Product { id, store_id } => {
                write!(f, "product_id={id}, product_store_id={store_id}")
            }
            Self::UserName(name) => write!(f, "username={name}"),
        }
    }
}

/// Returns the identifier of the row matching `key`, if any.
///
/// # Errors
///
/// Returns `RepositoryError` if the query fails.
pub async fn find_row_id<'e, E>(
    executor: E,
    key: ExistenceKey<'_>,
) -> Result<Option<i32>, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let query = sqlx::query_scalar::<_, i32>(key.statement());
    let query = match key {
        ExistenceKey::Store { id, code } => query.bind(id.as_i32()).bind(code.as_str()),
        ExistenceKey::StoreCode(code) => query.bind(code.as_str()),
        ExistenceKey::Product { id, store_id } => query.bind(id.as_i32()).bind(store_id.as_i32()),
        ExistenceKey::UserName(name) => query.bind(name),
    };

    query
        .fetch_optional(executor)
        .await
        .map_err(RepositoryError::on(key.table()))
}

/// Returns `true` if a row matching `key` exists.
///
/// # Errors
///
/// Returns `RepositoryError` if the query fails.
pub async fn exists<'e, E>(executor: E, key: ExistenceKey<'_>) -> Result<bool, RepositoryError>
where
    E: PgExecutor<'e>,
{
    Ok(find_row_id(executor, key).await?.is_some())
}

/// Fails with `VerificationFailed` unless a row matching `key` exists.
pub(crate) async fn verify_written<'e, E>(
    executor: E,
    key: ExistenceKey<'_>,
) -> Result<(), RepositoryError>
where
    E: PgExecutor<'e>,
{
    if exists(executor, key).await? {
        Ok(())
    } else {
        Err(RepositoryError::VerificationFailed {
            table: key.table(),
            key: key.to_string(),
        })
    }
}
