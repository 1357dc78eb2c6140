//! Product management route handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use store_inventory_core::{CurrencyCode, ProductId, Sku, StoreCode};

use crate::error::Result;
use crate::middleware::RequireBearer;
use crate::models::{Product, ProductInput, WriteOutcome, Written};
use crate::services::ProductService;
use crate::state::AppState;

const INSERTED: &str = "Product data Inserted Successful";
const UPDATED: &str = "Product data Updated Successful";
const DELETED: &str = "Product Deleted Successful";

/// Query string naming a SKU.
#[derive(Debug, Deserialize)]
pub struct SkuQuery {
    #[serde(default)]
    pub product_sku: String,
}

/// Query string naming a SKU in one store.
#[derive(Debug, Deserialize)]
pub struct ProductKeyQuery {
    #[serde(default)]
    pub product_sku: String,
    #[serde(default)]
    pub store_code: String,
}

#[derive(Debug, Serialize)]
pub struct PricesResponse {
    #[serde(rename = "PriceProduct")]
    pub price: Decimal,
    #[serde(rename = "TaxPriceProduct")]
    pub tax: Decimal,
    #[serde(rename = "CurrencyPriceProduct")]
    pub currency: CurrencyCode,
}

#[derive(Debug, Serialize)]
pub struct VolumetryResponse {
    #[serde(rename = "LengthProduct")]
    pub length: Option<Decimal>,
    #[serde(rename = "WidthProduct")]
    pub width: Option<Decimal>,
    #[serde(rename = "HeightProduct")]
    pub height: Option<Decimal>,
    #[serde(rename = "WeightProduct")]
    pub weight: Option<Decimal>,
}

/// Product as returned to clients.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(rename = "IdProduct")]
    pub id: ProductId,
    #[serde(rename = "SKUProduct")]
    pub sku: Sku,
    #[serde(rename = "UNSPC")]
    pub unspc: Option<String>,
    #[serde(rename = "NameProduct")]
    pub name: String,
    #[serde(rename = "TitleProduct")]
    pub title: Option<String>,
    #[serde(rename = "BrandProduct")]
    pub brand: Option<String>,
    #[serde(rename = "UOMProduct")]
    pub unit_of_measure: Option<String>,
    #[serde(rename = "CategoryIdProduct")]
    pub category_id: Option<i32>,
    #[serde(rename = "ParentCategoryIdProduct")]
    pub parent_category_id: Option<i32>,
    #[serde(rename = "StockProduct")]
    pub stock: i32,
    #[serde(rename = "CodeStore")]
    pub store_code: StoreCode,
    #[serde(rename = "NameStore")]
    pub store_name: String,
    #[serde(rename = "LongDescriptionProduct")]
    pub long_description: Option<String>,
    #[serde(rename = "PhotoProduct")]
    pub photo: Option<String>,
    #[serde(rename = "Prices")]
    pub prices: PricesResponse,
    #[serde(rename = "StatusProduct")]
    pub status: String,
    #[serde(rename = "PublishedProduct")]
    pub published: bool,
    #[serde(rename = "ManageStockProduct")]
    pub manage_stock: bool,
    #[serde(rename = "Volumetry")]
    pub volumetry: VolumetryResponse,
    #[serde(rename = "CreationDate")]
    pub creation_date: DateTime<Utc>,
    #[serde(rename = "LastUpdateDate")]
    pub last_update_date: DateTime<Utc>,
    #[serde(rename = "Message", skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            sku: product.sku,
            unspc: product.unspc,
            name: product.name,
            title: product.title,
            brand: product.brand,
            unit_of_measure: product.unit_of_measure,
            category_id: product.category_id,
            parent_category_id: product.parent_category_id,
            stock: product.stock,
            store_code: product.store_code,
            store_name: product.store_name,
            long_description: product.long_description,
            photo: product.photo,
            prices: PricesResponse {
                price: product.price.amount,
                tax: product.price.tax,
                currency: product.price.currency,
            },
            status: product.status,
            published: product.published,
            manage_stock: product.manage_stock,
            volumetry: VolumetryResponse {
                length: product.dimensions.length,
                width: product.dimensions.width,
                height: product.dimensions.height,
                weight: product.dimensions.weight,
            },
            creation_date: product.created_at,
            last_update_date: product.updated_at,
            message: None,
        }
    }
}

/// A product wrapped the way every product endpoint returns it.
#[derive(Debug, Serialize)]
pub struct ProductEnvelope {
    #[serde(rename = "Product")]
    pub product: ProductResponse,
}

impl ProductEnvelope {
    fn written(written: Written<Product>) -> Self {
        let mut product = ProductResponse::from(written.record);
        product.message = Some(match written.outcome {
            WriteOutcome::Inserted => INSERTED,
            WriteOutcome::Updated => UPDATED,
        });
        Self { product }
    }
}

/// Result of deleting a product.
#[derive(Debug, Serialize)]
pub struct ProductDeleted {
    #[serde(rename = "IdProduct")]
    pub id: ProductId,
    #[serde(rename = "SKUProduct")]
    pub sku: Sku,
    #[serde(rename = "StoreCode")]
    pub store_code: StoreCode,
    #[serde(rename = "Message")]
    pub message: &'static str,
}

/// Insert or rewrite a product.
///
/// POST /api/ecommerce/manage/product/
#[instrument(skip(state, claims, payload), fields(user = %claims.sub))]
pub async fn manage(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ProductEnvelope>> {
    let Json(input) = payload?;
    let written = ProductService::new(state.pool())
        .manage_product(input)
        .await?;
    Ok(Json(ProductEnvelope::written(written)))
}

/// Every store's product for a SKU.
///
/// GET /api/ecommerce/manage/product/?product_sku=
#[instrument(skip(state, claims), fields(user = %claims.sub))]
pub async fn list(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    Query(query): Query<SkuQuery>,
) -> Result<Json<Vec<ProductEnvelope>>> {
    let products = ProductService::new(state.pool())
        .products_by_sku(&query.product_sku)
        .await?;
    Ok(Json(
        products
            .into_iter()
            .map(|product| ProductEnvelope {
                product: product.into(),
            })
            .collect(),
    ))
}

/// Rewrite an existing product.
///
/// PUT /api/ecommerce/manage/product/
#[instrument(skip(state, claims, payload), fields(user = %claims.sub))]
pub async fn update(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    payload: std::result::Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ProductEnvelope>> {
    let Json(input) = payload?;
    let product = ProductService::new(state.pool())
        .update_product(input)
        .await?;
    Ok(Json(ProductEnvelope::written(Written {
        record: product,
        outcome: WriteOutcome::Updated,
    })))
}

/// Delete a product from one store.
///
/// DELETE /api/ecommerce/manage/product/?product_sku=&store_code=
#[instrument(skip(state, claims), fields(user = %claims.sub))]
pub async fn delete(
    State(state): State<AppState>,
    RequireBearer(claims): RequireBearer,
    Query(query): Query<ProductKeyQuery>,
) -> Result<Json<ProductDeleted>> {
    let (id, sku, store_code) = ProductService::new(state.pool())
        .delete_product(&query.product_sku, &query.store_code)
        .await?;
    Ok(Json(ProductDeleted {
        id,
        sku,
        store_code,
        message: DELETED,
    }))
}
