//! Seed stores and products from a YAML catalog.
//!
//! Every entry goes through the same validation and upsert as the API, so
//! seeding a catalog twice rewrites the rows instead of duplicating them.
//! Stores are written before products so products can reference them.
//!
//! # Catalog format
//!
//! ```yaml
//! stores:
//!   - store_code: A-01
//!     store_name: Centro
//!     street_address: Reforma
//!     external_number_address: "100"
//!     suburb_address: Centro
//!     city_address: CDMX
//!     country_address: MX
//!     zip_postal_code_address: "06000"
//!     minimum_inventory: 5
//! products:
//!   - product_sku: SKU-0001
//!     product_store_code: A-01
//!     product_name: Tornillo
//!     product_price: "19.99"
//!     product_currency: MXN
//!     product_status: active
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use store_inventory_api::config::DatabaseConfig;
use store_inventory_api::db;
use store_inventory_api::models::{ProductInput, StoreInput, WriteOutcome};
use store_inventory_api::services::{ProductService, StoreService};

/// Stores and products to seed.
#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub stores: Vec<StoreInput>,
    #[serde(default)]
    pub products: Vec<ProductInput>,
}

/// Counts reported after seeding.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub inserted: usize,
    pub updated: usize,
    /// Entry key and error, for entries that were not written.
    pub errors: Vec<(String, String)>,
}

impl SeedResult {
    const fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Inserted => self.inserted += 1,
            WriteOutcome::Updated => self.updated += 1,
        }
    }
}

/// Parse a catalog from YAML.
///
/// # Errors
///
/// Returns an error if the YAML does not describe a catalog.
pub fn parse_catalog(content: &str) -> Result<Catalog, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Seed the catalog at `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the database
/// cannot be reached. Individual entries that fail are logged and counted.
pub async fn catalog(file_path: &str) -> Result<SeedResult, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and parse before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let catalog = parse_catalog(&content)?;

    info!(
        stores = catalog.stores.len(),
        products = catalog.products.len(),
        "Parsed catalog"
    );

    let config = DatabaseConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    info!("Connected to database");

    let mut result = SeedResult::default();

    let stores = StoreService::new(&pool);
    for input in catalog.stores {
        let key = input.store_code.clone();
        match stores.manage_store(input).await {
            Ok(written) => result.record(written.outcome),
            Err(err) => result.errors.push((key, err.to_string())),
        }
    }

    let products = ProductService::new(&pool);
    for input in catalog.products {
        let key = format!("{}@{}", input.product_sku, input.product_store_code);
        match products.manage_product(input).await {
            Ok(written) => result.record(written.outcome),
            Err(err) => result.errors.push((key, err.to_string())),
        }
    }

    info!("Seeding complete!");
    info!("  Inserted: {}", result.inserted);
    info!("  Updated: {}", result.updated);

    if !result.errors.is_empty() {
        error!("  Errors: {}", result.errors.len());
        for (key, err) in &result.errors {
            error!("    - {key}: {err}");
        }
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_catalog() {
        let catalog = parse_catalog(include_str!("../../catalog.example.yaml")).unwrap();

        assert_eq!(catalog.stores.len(), 2);
        assert_eq!(catalog.stores[0].store_code, "A-01");
        assert_eq!(catalog.stores[0].zip_postal_code_address, "06000");
        assert!(!catalog.products.is_empty());
        assert!(
            catalog
                .products
                .iter()
                .all(|product| !product.product_store_code.is_empty())
        );
    }

    #[test]
    fn test_parse_catalog_sections_are_optional() {
        let catalog = parse_catalog("stores: []\n").unwrap();
        assert!(catalog.stores.is_empty());
        assert!(catalog.products.is_empty());
    }

    #[test]
    fn test_seed_result_counts_outcomes() {
        let mut result = SeedResult::default();
        result.record(WriteOutcome::Inserted);
        result.record(WriteOutcome::Inserted);
        result.record(WriteOutcome::Updated);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.updated, 1);
    }
}
