//! Product service.

use rust_decimal::Decimal;
use sqlx::PgPool;

use store_inventory_core::{CurrencyCode, Dimensions, Price, ProductId, Sku, StoreCode};

use super::InventoryError;
use crate::db::ProductRepository;
use crate::models::{Product, ProductDraft, ProductInput, Written};

const ITEM: &str = "product";

/// Exclusive bound of `NUMERIC(14, 2)` price and tax columns.
const MONEY_LIMIT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);
/// Exclusive bound of `NUMERIC(12, 3)` volumetry columns.
const MEASURE_LIMIT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Product service.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Insert the product, or rewrite the product with the same SKU in the
    /// same store.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotStored` if the input is invalid,
    /// `InventoryError::StoreNotFound` if the store code does not resolve,
    /// `InventoryError::Repository` if the write or its verification fails.
    pub async fn manage_product(
        &self,
        input: ProductInput,
    ) -> Result<Written<Product>, InventoryError> {
        let draft = validate_product(input)?;
        self.products
            .upsert(&draft)
            .await
            .map_err(|e| {
                InventoryError::from_repository(e, draft.store_code.as_str(), draft.sku.as_str())
            })
    }

    /// Rewrite an existing product.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotStored` if the input is invalid,
    /// `InventoryError::StoreNotFound` or `InventoryError::ProductNotFound`
    /// if the target does not exist.
    pub async fn update_product(&self, input: ProductInput) -> Result<Product, InventoryError> {
        let draft = validate_product(input)?;
        self.products
            .update(&draft)
            .await
            .map_err(|e| {
                InventoryError::from_repository(e, draft.store_code.as_str(), draft.sku.as_str())
            })
    }

    /// Every product carrying `sku`, one per store.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::InvalidInput` for a malformed SKU.
    pub async fn products_by_sku(&self, sku: &str) -> Result<Vec<Product>, InventoryError> {
        let sku = Sku::parse(sku).map_err(|e| InventoryError::InvalidInput(e.to_string()))?;
        Ok(self.products.list_by_sku(&sku).await?)
    }

    /// Delete the product with `sku` from the store with `store_code`.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NotStored` for a malformed SKU or code,
    /// `InventoryError::StoreNotFound` or `InventoryError::ProductNotFound`
    /// if the target does not exist.
    pub async fn delete_product(
        &self,
        sku: &str,
        store_code: &str,
    ) -> Result<(ProductId, Sku, StoreCode), InventoryError> {
        let sku = Sku::parse(sku).map_err(|e| InventoryError::not_stored(ITEM, e))?;
        let store_code =
            StoreCode::parse(store_code).map_err(|e| InventoryError::not_stored(ITEM, e))?;

        let id = self
            .products
            .delete(&sku, &store_code)
            .await
            .map_err(|e| InventoryError::from_repository(e, store_code.as_str(), sku.as_str()))?;

        Ok((id, sku, store_code))
    }
}

/// Validate raw product fields into a draft.
///
/// # Errors
///
/// Returns `InventoryError::NotStored` naming the first invalid field.
pub fn validate_product(input: ProductInput) -> Result<ProductDraft, InventoryError> {
    let sku = Sku::parse(&input.product_sku).map_err(|e| InventoryError::not_stored(ITEM, e))?;
    let store_code = StoreCode::parse(&input.product_store_code)
        .map_err(|e| InventoryError::not_stored(ITEM, e))?;
    let currency = CurrencyCode::parse(&input.product_currency)
        .map_err(|e| InventoryError::not_stored(ITEM, e))?;

    if input.product_name.trim().is_empty() {
        return Err(InventoryError::not_stored(ITEM, "product name cannot be empty"));
    }

    if input.product_price.is_sign_negative() || input.product_tax.is_sign_negative() {
        return Err(InventoryError::not_stored(ITEM, "price and tax cannot be negative"));
    }
    check_range("product_price", Some(input.product_price), 2, MONEY_LIMIT)?;
    check_range("product_tax", Some(input.product_tax), 2, MONEY_LIMIT)?;
    check_range("product_length", input.product_length, 3, MEASURE_LIMIT)?;
    check_range("product_width", input.product_width, 3, MEASURE_LIMIT)?;
    check_range("product_height", input.product_height, 3, MEASURE_LIMIT)?;
    check_range("product_weight", input.product_weight, 3, MEASURE_LIMIT)?;

    Ok(ProductDraft {
        sku,
        store_code,
        unspc: input.product_unspc,
        brand: input.product_brand,
        category_id: input.category_id,
        parent_category_id: input.parent_category_id,
        unit_of_measure: input.unit_of_measure,
        stock: input.product_stock,
        name: input.product_name,
        title: input.product_title,
        long_description: input.product_long_description,
        photo: input.product_photo,
        price: Price::new(input.product_price, input.product_tax, currency),
        status: input.product_status,
        published: input.product_published,
        manage_stock: input.product_manage_stock,
        dimensions: Dimensions {
            length: input.product_length,
            width: input.product_width,
            height: input.product_height,
            weight: input.product_weight,
        },
    })
}

/// Reject a value that would overflow its column once rounded to `scale`.
fn check_range(
    field: &'static str,
    value: Option<Decimal>,
    scale: u32,
    limit: Decimal,
) -> Result<(), InventoryError> {
    match value {
        Some(value) if value.round_dp(scale).abs() >= limit => Err(InventoryError::not_stored(
            ITEM,
            format!("{field} must be below {limit}"),
        )),
        _ => Ok(()),
    }
}
