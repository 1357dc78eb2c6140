//! Stock route handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use store_inventory_core::{Sku, StoreCode};

use crate::error::Result;
use crate::middleware::RequireBearer;
use crate::models::{StockEntry, StockUpdate};
use crate::services::StockService;
use crate::state::AppState;

const UPDATED: &str = "Product Stock Updated Successful";

/// Stock overwrite request.
#[derive(Debug, Deserialize)]
pub struct AddStockRequest {
    pub stock: i32,
    pub product_sku: String,
    pub store_code: String,
}

/// Query string naming a SKU in one store.
#[derive(Debug, Deserialize)]
pub struct StockDetailQuery {
    #[serde(default)]
    pub product_sku: String,
    #[serde(default)]
    pub store_code: String,
}

/// Query string naming a SKU.
#[derive(Debug, Deserialize)]
pub struct StockTotalQuery {
    #[serde(default)]
    pub product_sku: String,
}

/// Result of a stock overwrite. The stock is reported as a string.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StockUpdated {
    pub store_code: StoreCode,
    pub product_sku: Sku,
    pub product_stock: String,
    pub last_update_date: DateTime<Utc>,
    pub message: &'static str,
}

impl From<StockUpdate> for StockUpdated {
    fn from(update: StockUpdate) -> Self {
        Self {
            store_code: update.store_code,
            product_sku: update.sku,
            product_stock: update.stock.to_string(),
            last_update_date: update.updated_at,
            message: UPDATED,
        }
    }
}

/// Stock of a SKU in one store.
#[derive(Debug, Serialize)]
pub struct StoreStock {
    #[serde(rename = "CodeStore")]
    pub store_code: StoreCode,
    #[serde(rename = "NameStore")]
    pub store_name: String,
    #[serde(rename = "SKU", skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(rename = "Stock")]
    pub stock: i32,
    #[serde(rename = "MinimumStock")]
    pub minimum: i32,
    #[serde(rename = "BelowMinimum")]
    pub below_minimum: bool,
    /// Units needed to reach the minimum.
    #[serde(rename = "Shortfall")]
    pub shortfall: i32,
}

impl StoreStock {
    fn new(entry: StockEntry, with_sku: bool) -> Self {
        Self {
            below_minimum: entry.level.is_below_minimum(),
            shortfall: entry.level.shortfall(),
            store_code: entry.store_code,
            store_name: entry.store_name,
            sku: with_sku.then_some(entry.sku),
            stock: entry.level.stock,
            minimum: entry.level.minimum,
        }
    }
}

/// `GET stock/detail/` body.
#[derive(Debug, Serialize)]
pub struct StockDetail {
    #[serde(rename = "ProductStock")]
    pub product_stock: StoreStock,
}

/// One entry of the `GET stock/total/` body.
#[derive(Debug, Serialize)]
pub struct StockTotalEntry {
    #[serde(rename = "SKU")]
    pub sku: Sku,
    #[serde(rename = "ProductStock")]
    pub product_stock: StoreStock,
}

impl From<StockEntry> for StockTotalEntry {
    fn from(entry: StockEntry) -> Self {
        Self {
            sku: entry.sku.clone(),
            product_stock: StoreStock::new(entry, false),
        }
    }
}

/// Overwrite the stock of a SKU in one store.
///
/// POST /api/ecommerce/stock/add/
#[instrument(skip(state, claims, payload), fields(user = %claims.sub))]
pub async fn add(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    payload: std::result::Result<Json<AddStockRequest>, JsonRejection>,
) -> Result<Json<StockUpdated>> {
    let Json(request) = payload?;
    let update = StockService::new(state.pool())
        .update_stock(&request.store_code, &request.product_sku, request.stock)
        .await?;
    Ok(Json(update.into()))
}

/// Stock of a SKU in one store.
///
/// GET /api/ecommerce/stock/detail/?product_sku=&store_code=
#[instrument(skip(state, claims), fields(user = %claims.sub))]
pub async fn detail(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    Query(query): Query<StockDetailQuery>,
) -> Result<Json<StockDetail>> {
    let entry = StockService::new(state.pool())
        .stock_in_store(&query.store_code, &query.product_sku)
        .await?;
    Ok(Json(StockDetail {
        product_stock: StoreStock::new(entry, true),
    }))
}

/// Stock of a SKU in every store carrying it.
///
/// GET /api/ecommerce/stock/total/?product_sku=
#[instrument(skip(state, claims), fields(user = %claims.sub))]
pub async fn total(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    Query(query): Query<StockTotalQuery>,
) -> Result<Json<Vec<StockTotalEntry>>> {
    let entries = StockService::new(state.pool())
        .stock_across_stores(&query.product_sku)
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use store_inventory_core::StockLevel;

    use super::*;

    fn entry(stock: i32) -> StockEntry {
        StockEntry {
            store_code: StoreCode::parse("A-01").unwrap(),
            store_name: "Centro".to_owned(),
            sku: Sku::parse("SKU-0001").unwrap(),
            level: StockLevel::new(stock, 5),
        }
    }

    #[test]
    fn test_stock_updated_reports_stock_as_string() {
        let json = serde_json::to_value(StockUpdated::from(StockUpdate {
            store_code: StoreCode::parse("A-01").unwrap(),
            sku: Sku::parse("SKU-0001").unwrap(),
            stock: 40,
            updated_at: Utc::now(),
        }))
        .unwrap();

        assert_eq!(json["StoreCode"], "A-01");
        assert_eq!(json["ProductSku"], "SKU-0001");
        assert_eq!(json["ProductStock"], "40");
        assert_eq!(json["Message"], "Product Stock Updated Successful");
    }

    #[test]
    fn test_stock_detail_shape() {
        let json = serde_json::to_value(StockDetail {
            product_stock: StoreStock::new(entry(3), true),
        })
        .unwrap();

        assert_eq!(json["ProductStock"]["SKU"], "SKU-0001");
        assert_eq!(json["ProductStock"]["Stock"], 3);
        assert_eq!(json["ProductStock"]["BelowMinimum"], true);
        assert_eq!(json["ProductStock"]["Shortfall"], 2);
    }

    #[test]
    fn test_stock_total_entry_puts_sku_outside() {
        let json = serde_json::to_value(StockTotalEntry::from(entry(5))).unwrap();

        assert_eq!(json["SKU"], "SKU-0001");
        assert!(json["ProductStock"].get("SKU").is_none());
        assert_eq!(json["ProductStock"]["NameStore"], "Centro");
        assert_eq!(json["ProductStock"]["BelowMinimum"], false);
        assert_eq!(json["ProductStock"]["Shortfall"], 0);
    }
}
