//! Inventory service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during store, product and stock operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Input failed validation; nothing was written.
    #[error("{item} not stored: {reason}")]
    NotStored { item: &'static str, reason: String },

    /// A lookup key failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No store has the given code.
    #[error("store {0} not exists")]
    StoreNotFound(String),

    /// The store does not carry the given SKU.
    #[error("product {sku} not exists in store {store_code}")]
    ProductNotFound { sku: String, store_code: String },

    /// The write conflicts with existing rows.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl InventoryError {
    pub(crate) fn not_stored(item: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::NotStored {
            item,
            reason: reason.to_string(),
        }
    }

    /// Map a repository error for an operation on `sku` in `store_code`,
    /// naming the missing entity when the repository reports one.
    pub(crate) fn from_repository(error: RepositoryError, store_code: &str, sku: &str) -> Self {
        match error {
            RepositoryError::NotFound("store") => Self::StoreNotFound(store_code.to_owned()),
            RepositoryError::NotFound(_) => Self::ProductNotFound {
                sku: sku.to_owned(),
                store_code: store_code.to_owned(),
            },
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_from_repository() {
        let error =
            InventoryError::from_repository(RepositoryError::NotFound("store"), "A-01", "SKU1");
        assert!(matches!(error, InventoryError::StoreNotFound(code) if code == "A-01"));
    }

    #[test]
    fn test_product_not_found_from_repository() {
        let error =
            InventoryError::from_repository(RepositoryError::NotFound("product"), "A-01", "SKU1");
        assert!(matches!(
            error,
            InventoryError::ProductNotFound { sku, store_code }
                if sku == "SKU1" && store_code == "A-01"
        ));
    }

    #[test]
    fn test_not_stored_display() {
        let error = InventoryError::not_stored("store", "bad code");
        assert_eq!(error.to_string(), "store not stored: bad code");
    }
}
