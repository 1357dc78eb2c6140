//! Store service.
//!
//! Every write validates the store code before the repository is called, so
//! an invalid code never reaches the database.

use sqlx::PgPool;

use store_inventory_core::{StoreAddress, StoreCode, StoreId};

use super::InventoryError;
use crate::db::{RepositoryError, StoreRepository};
use crate::models::{Store, StoreDraft, StoreInput, Written};

const ITEM: &str = "store";

/// Store service.
pub struct StoreService<'a> {
    stores: StoreRepository<'a>,
}

impl<'a> StoreService<'a> {
    /// Create a new store service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            stores: StoreRepository::new(pool),
        }
    }

    /// Insert the store, or rewrite the store with the same code.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotStored` if the input is invalid (no
    /// statement is issued), `InventoryError::Repository` if the write or its
    /// verification fails.
    pub async fn manage_store(&self, input: StoreInput) -> Result<Written<Store>, InventoryError> {
        let draft = validate_store(input)?;
        self.stores
            .upsert(&draft)
            .await
            .map_err(|e| map_error(e, &draft.code))
    }

    /// Rewrite an existing store.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotStored` if the input is invalid,
    /// `InventoryError::StoreNotFound` if no store has the code.
    pub async fn update_store(&self, input: StoreInput) -> Result<Store, InventoryError> {
        let draft = validate_store(input)?;
        self.stores
            .update(&draft)
            .await
            .map_err(|e| map_error(e, &draft.code))?
            .ok_or_else(|| InventoryError::StoreNotFound(draft.code.to_string()))
    }

    /// Get a store by code.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidInput` for a malformed code,
    /// `InventoryError::StoreNotFound` if no store has the code.
    pub async fn get_store(&self, code: &str) -> Result<Store, InventoryError> {
        let code = StoreCode::parse(code).map_err(|e| InventoryError::InvalidInput(e.to_string()))?;
        self.stores
            .get_by_code(&code)
            .await?
            .ok_or_else(|| InventoryError::StoreNotFound(code.to_string()))
    }

    /// Delete a store by code.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotStored` for a malformed code,
    /// `InventoryError::StoreNotFound` if no store has the code,
    /// `InventoryError::Conflict` if products still belong to the store.
    pub async fn delete_store(&self, code: &str) -> Result<(StoreId, StoreCode), InventoryError> {
        let code = StoreCode::parse(code).map_err(|e| InventoryError::not_stored(ITEM, e))?;
        let id = self
            .stores
            .delete(&code)
            .await
            .map_err(|e| map_error(e, &code))?
            .ok_or_else(|| InventoryError::StoreNotFound(code.to_string()))?;
        Ok((id, code))
    }
}

/// Validate raw store fields into a draft.
///
/// # Errors
///
/// Returns `InventoryError::NotStored` naming the first invalid field.
pub fn validate_store(input: StoreInput) -> Result<StoreDraft, InventoryError> {
    let code =
        StoreCode::parse(&input.store_code).map_err(|e| InventoryError::not_stored(ITEM, e))?;

    if input.store_name.trim().is_empty() {
        return Err(InventoryError::not_stored(ITEM, "store name cannot be empty"));
    }

    if input.minimum_inventory < 0 {
        return Err(InventoryError::not_stored(
            ITEM,
            format!("minimum inventory cannot be negative (got {})", input.minimum_inventory),
        ));
    }

    Ok(StoreDraft {
        code,
        name: input.store_name,
        address: StoreAddress {
            street: input.street_address,
            exterior_number: input.external_number_address,
            suburb: input.suburb_address,
            city: input.city_address,
            country: input.country_address,
            postal_code: input.zip_postal_code_address,
        },
        min_inventory: input.minimum_inventory,
    })
}

fn map_error(error: RepositoryError, code: &StoreCode) -> InventoryError {
    match error {
        RepositoryError::NotFound(_) => InventoryError::StoreNotFound(code.to_string()),
        RepositoryError::Conflict(message) => InventoryError::Conflict(message),
        other => InventoryError::Repository(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(code: &str) -> StoreInput {
        StoreInput {
            store_code: code.to_owned(),
            store_name: "Centro".to_owned(),
            street_address: "Reforma".to_owned(),
            external_number_address: "100".to_owned(),
            suburb_address: "Centro".to_owned(),
            city_address: "CDMX".to_owned(),
            country_address: "MX".to_owned(),
            zip_postal_code_address: "06000".to_owned(),
            minimum_inventory: 5,
        }
    }

    #[test]
    fn test_validate_store_builds_draft() {
        let draft = validate_store(input("A-01")).unwrap();
        assert_eq!(draft.code.as_str(), "A-01");
        assert_eq!(
            draft.address.formatted(),
            "Reforma no. 100, col. Centro, Cp. 06000, CDMX, MX"
        );
        assert_eq!(draft.min_inventory, 5);
    }

    #[test]
    fn test_validate_store_rejects_bad_code() {
        let error = validate_store(input("AA-1")).unwrap_err();
        assert!(matches!(error, InventoryError::NotStored { item: "store", .. }));
    }

    #[test]
    fn test_validate_store_rejects_blank_name() {
        let mut raw = input("A-01");
        raw.store_name = "  ".to_owned();
        assert!(validate_store(raw).is_err());
    }

    #[test]
    fn test_validate_store_rejects_negative_minimum() {
        let mut raw = input("A-01");
        raw.minimum_inventory = -1;
        assert!(validate_store(raw).is_err());
    }
}
