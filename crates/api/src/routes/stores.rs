//! Store management route handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use store_inventory_core::{StoreCode, StoreId};

use crate::error::Result;
use crate::middleware::RequireBearer;
use crate::models::{Store, StoreInput, WriteOutcome, Written};
use crate::services::StoreService;
use crate::state::AppState;

const INSERTED: &str = "Store Inserted Successful";
const UPDATED: &str = "Store Updated Successful";
const DELETED: &str = "Store Deleted Successful";

/// Query string naming one store.
#[derive(Debug, Deserialize)]
pub struct StoreCodeQuery {
    #[serde(default)]
    pub store_code: String,
}

/// Store as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreResponse {
    pub id_store: StoreId,
    pub code_store: StoreCode,
    pub name_store: String,
    pub address_store: String,
    pub minimum_stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl StoreResponse {
    fn new(store: Store) -> Self {
        Self {
            id_store: store.id,
            address_store: store.address.formatted(),
            code_store: store.code,
            name_store: store.name,
            minimum_stock: store.min_inventory,
            creation_date: Some(store.created_at),
            last_update_date: Some(store.updated_at),
            message: None,
        }
    }

    /// Insert reports the creation date, update the last update date.
    fn written(written: Written<Store>) -> Self {
        let mut response = Self::new(written.record);
        match written.outcome {
            WriteOutcome::Inserted => {
                response.last_update_date = None;
                response.message = Some(INSERTED);
            }
            WriteOutcome::Updated => {
                response.creation_date = None;
                response.message = Some(UPDATED);
            }
        }
        response
    }
}

/// A store lookup result.
#[derive(Debug, Serialize)]
pub struct StoreEnvelope {
    #[serde(rename = "Store")]
    pub store: StoreResponse,
}

/// Result of deleting a store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoreDeleted {
    pub id_store: StoreId,
    pub code_store: StoreCode,
    pub message: &'static str,
}

/// Insert or rewrite a store.
///
/// POST /api/ecommerce/manage/store/
#[instrument(skip(state, claims, payload), fields(user = %claims.sub))]
pub async fn manage(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    payload: std::result::Result<Json<StoreInput>, JsonRejection>,
) -> Result<Json<StoreResponse>> {
    let Json(input) = payload?;
    let written = StoreService::new(state.pool()).manage_store(input).await?;
    Ok(Json(StoreResponse::written(written)))
}

/// Get a store by code.
///
/// GET /api/ecommerce/manage/store/?store_code=
#[instrument(skip(state, claims), fields(user = %claims.sub))]
pub async fn show(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    Query(query): Query<StoreCodeQuery>,
) -> Result<Json<StoreEnvelope>> {
    let store = StoreService::new(state.pool())
        .get_store(&query.store_code)
        .await?;
    Ok(Json(StoreEnvelope {
        store: StoreResponse::new(store),
    }))
}

/// Rewrite an existing store.
///
/// PUT /api/ecommerce/manage/store/
#[instrument(skip(state, claims, payload), fields(user = %claims.sub))]
pub async fn update(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    payload: std::result::Result<Json<StoreInput>, JsonRejection>,
) -> Result<Json<StoreResponse>> {
    let Json(input) = payload?;
    let store = StoreService::new(state.pool()).update_store(input).await?;
    Ok(Json(StoreResponse::written(Written {
        record: store,
        outcome: WriteOutcome::Updated,
    })))
}

/// Delete a store by code.
///
/// DELETE /api/ecommerce/manage/store/?store_code=
#[instrument(skip(state, claims), fields(user = %claims.sub))]
pub async fn delete(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    Query(query): Query<StoreCodeQuery>,
) -> Result<Json<StoreDeleted>> {
    let (id, code) = StoreService::new(state.pool())
        .delete_store(&query.store_code)
        .await?;
    Ok(Json(StoreDeleted {
        id_store: id,
        code_store: code,
        message: DELETED,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use store_inventory_core::StoreAddress;

    use super::*;

    fn store() -> Store {
        Store {
            id: StoreId::new(3),
            code: StoreCode::parse("A-01").unwrap(),
            name: "Centro".to_owned(),
            address: StoreAddress {
                street: "Reforma".to_owned(),
                exterior_number: "100".to_owned(),
                suburb: "Centro".to_owned(),
                city: "CDMX".to_owned(),
                country: "MX".to_owned(),
                postal_code: "06000".to_owned(),
            },
            min_inventory: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_inserted_store_response() {
        let response = StoreResponse::written(Written {
            record: store(),
            outcome: WriteOutcome::Inserted,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["IdStore"], 3);
        assert_eq!(json["CodeStore"], "A-01");
        assert_eq!(
            json["AddressStore"],
            "Reforma no. 100, col. Centro, Cp. 06000, CDMX, MX"
        );
        assert_eq!(json["MinimumStock"], 5);
        assert_eq!(json["Message"], "Store Inserted Successful");
        assert!(json.get("CreationDate").is_some());
        assert!(json.get("LastUpdateDate").is_none());
    }

    #[test]
    fn test_updated_store_response() {
        let response = StoreResponse::written(Written {
            record: store(),
            outcome: WriteOutcome::Updated,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["Message"], "Store Updated Successful");
        assert!(json.get("CreationDate").is_none());
        assert!(json.get("LastUpdateDate").is_some());
    }

    #[test]
    fn test_store_lookup_has_both_dates_and_no_message() {
        let json = serde_json::to_value(StoreEnvelope {
            store: StoreResponse::new(store()),
        })
        .unwrap();

        assert!(json["Store"].get("CreationDate").is_some());
        assert!(json["Store"].get("LastUpdateDate").is_some());
        assert!(json["Store"].get("Message").is_none());
    }
}
