//! Services and repositories against a migrated `PostgreSQL` database.
//!
//! Each test gets a fresh database from `#[sqlx::test]`. They are ignored by
//! default; run them with `DATABASE_URL` set and `-- --ignored`.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use store_inventory_api::app;
use store_inventory_api::db::{ExistenceKey, exists, find_row_id};
use store_inventory_api::models::{ProductInput, StoreInput, WriteOutcome};
use store_inventory_api::services::auth::{AuthError, AuthService, TokenKind};
use store_inventory_api::services::{
    InventoryError, ProductService, StockService, StoreService,
};
use store_inventory_core::StoreCode;
use store_inventory_integration_tests::{
    empty_request, json_request, send, state_with_pool,
};

fn store_input(code: &str, minimum: i32) -> StoreInput {
    serde_json::from_value(json!({
        "store_code": code,
        "store_name": format!("Store {code}"),
        "street_address": "Reforma",
        "external_number_address": "100",
        "suburb_address": "Centro",
        "city_address": "CDMX",
        "country_address": "MX",
        "zip_postal_code_address": "06000",
        "minimum_inventory": minimum
    }))
    .unwrap()
}

fn product_input(sku: &str, code: &str, stock: i32) -> ProductInput {
    serde_json::from_value(json!({
        "product_sku": sku,
        "product_store_code": code,
        "product_name": "Tornillo",
        "product_stock": stock,
        "product_price": "19.99",
        "product_tax": "3.20",
        "product_currency": "MXN",
        "product_status": "active"
    }))
    .unwrap()
}

async fn product_rows(pool: &PgPool, sku: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM inventory.product WHERE product_sku = $1")
        .bind(sku)
        .fetch_one(pool)
        .await
        .unwrap()
}

// =============================================================================
// Stores
// =============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_manage_store_inserts_then_updates(pool: PgPool) {
    let stores = StoreService::new(&pool);

    let first = stores.manage_store(store_input("A-01", 5)).await.unwrap();
    assert_eq!(first.outcome, WriteOutcome::Inserted);
    assert_eq!(
        first.record.address.formatted(),
        "Reforma no. 100, col. Centro, Cp. 06000, CDMX, MX"
    );

    let second = stores.manage_store(store_input("A-01", 8)).await.unwrap();
    assert_eq!(second.outcome, WriteOutcome::Updated);
    assert_eq!(second.record.id, first.record.id);
    assert_eq!(second.record.min_inventory, 8);

    let code = StoreCode::parse("A-01").unwrap();
    let id = find_row_id(&pool, ExistenceKey::StoreCode(&code))
        .await
        .unwrap();
    assert_eq!(id, Some(first.record.id.as_i32()));
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_concurrent_manage_store_leaves_one_row(pool: PgPool) {
    let stores = StoreService::new(&pool);

    let (left, right) = tokio::join!(
        stores.manage_store(store_input("C-07", 1)),
        stores.manage_store(store_input("C-07", 2)),
    );
    let outcomes = [left.unwrap().outcome, right.unwrap().outcome];

    assert_eq!(
        outcomes
            .iter()
            .filter(|outcome| **outcome == WriteOutcome::Inserted)
            .count(),
        1
    );

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory.store WHERE store_code = 'C-07'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_update_and_get_missing_store(pool: PgPool) {
    let stores = StoreService::new(&pool);

    assert!(matches!(
        stores.update_store(store_input("Z-99", 0)).await,
        Err(InventoryError::StoreNotFound(code)) if code == "Z-99"
    ));
    assert!(matches!(
        stores.get_store("Z-99").await,
        Err(InventoryError::StoreNotFound(_))
    ));
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_update_and_get_existing_store(pool: PgPool) {
    let stores = StoreService::new(&pool);
    let created = stores.manage_store(store_input("E-05", 2)).await.unwrap();

    let mut input = store_input("E-05", 9);
    input.store_name = "Sucursal Sur".to_owned();
    input.city_address = "Puebla".to_owned();
    let updated = stores.update_store(input).await.unwrap();
    assert_eq!(updated.id, created.record.id);
    assert_eq!(updated.name, "Sucursal Sur");
    assert_eq!(updated.min_inventory, 9);
    assert!(updated.updated_at >= created.record.updated_at);

    let fetched = stores.get_store("E-05").await.unwrap();
    assert_eq!(fetched.id, created.record.id);
    assert_eq!(fetched.name, "Sucursal Sur");
    assert_eq!(fetched.created_at, created.record.created_at);
    assert_eq!(
        fetched.address.formatted(),
        "Reforma no. 100, col. Centro, Cp. 06000, Puebla, MX"
    );
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_store_with_products_cannot_be_deleted(pool: PgPool) {
    let stores = StoreService::new(&pool);
    let products = ProductService::new(&pool);

    stores.manage_store(store_input("D-04", 0)).await.unwrap();
    products
        .manage_product(product_input("SKU-DEL", "D-04", 1))
        .await
        .unwrap();

    assert!(matches!(
        stores.delete_store("D-04").await,
        Err(InventoryError::Conflict(_))
    ));

    products.delete_product("SKU-DEL", "D-04").await.unwrap();
    let (_, code) = stores.delete_store("D-04").await.unwrap();
    assert_eq!(code.as_str(), "D-04");
    assert!(
        !exists(&pool, ExistenceKey::StoreCode(&code))
            .await
            .unwrap()
    );
}

// =============================================================================
// Products
// =============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_manage_product_inserts_then_updates_in_place(pool: PgPool) {
    StoreService::new(&pool)
        .manage_store(store_input("A-01", 5))
        .await
        .unwrap();
    let products = ProductService::new(&pool);

    let inserted = products
        .manage_product(product_input("SKU-0001", "A-01", 10))
        .await
        .unwrap();
    assert_eq!(inserted.outcome, WriteOutcome::Inserted);
    assert!(
        exists(
            &pool,
            ExistenceKey::Product {
                id: inserted.record.id,
                store_id: inserted.record.store_id,
            },
        )
        .await
        .unwrap()
    );

    let updated = products
        .manage_product(product_input("SKU-0001", "A-01", 25))
        .await
        .unwrap();
    assert_eq!(updated.outcome, WriteOutcome::Updated);
    assert_eq!(updated.record.id, inserted.record.id);
    assert_eq!(updated.record.stock, 25);
    assert_eq!(updated.record.store_name, "Store A-01");
    assert_eq!(product_rows(&pool, "SKU-0001").await, 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_update_product_rewrites_existing_only(pool: PgPool) {
    StoreService::new(&pool)
        .manage_store(store_input("A-01", 5))
        .await
        .unwrap();
    let products = ProductService::new(&pool);

    assert!(matches!(
        products
            .update_product(product_input("SKU-X", "A-01", 1))
            .await,
        Err(InventoryError::ProductNotFound { sku, store_code })
            if sku == "SKU-X" && store_code == "A-01"
    ));
    assert_eq!(product_rows(&pool, "SKU-X").await, 0);

    let inserted = products
        .manage_product(product_input("SKU-0001", "A-01", 10))
        .await
        .unwrap();
    let mut input = product_input("SKU-0001", "A-01", 7);
    input.product_price = "2.50".parse().unwrap();
    let updated = products.update_product(input).await.unwrap();

    assert_eq!(updated.id, inserted.record.id);
    assert_eq!(updated.price.amount.to_string(), "2.50");
    assert_eq!(updated.stock, 7);
    assert_eq!(product_rows(&pool, "SKU-0001").await, 1);

    assert!(matches!(
        products
            .update_product(product_input("SKU-0001", "Z-99", 1))
            .await,
        Err(InventoryError::StoreNotFound(code)) if code == "Z-99"
    ));
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_delete_missing_product(pool: PgPool) {
    StoreService::new(&pool)
        .manage_store(store_input("A-01", 5))
        .await
        .unwrap();
    let products = ProductService::new(&pool);

    assert!(matches!(
        products.delete_product("SKU-NONE", "A-01").await,
        Err(InventoryError::ProductNotFound { sku, .. }) if sku == "SKU-NONE"
    ));
    assert!(matches!(
        products.delete_product("SKU-NONE", "Z-99").await,
        Err(InventoryError::StoreNotFound(_))
    ));
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_manage_product_in_missing_store(pool: PgPool) {
    let result = ProductService::new(&pool)
        .manage_product(product_input("SKU-0001", "Q-42", 1))
        .await;

    assert!(matches!(result, Err(InventoryError::StoreNotFound(code)) if code == "Q-42"));
    assert_eq!(product_rows(&pool, "SKU-0001").await, 0);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_same_sku_in_two_stores(pool: PgPool) {
    let stores = StoreService::new(&pool);
    stores.manage_store(store_input("A-01", 5)).await.unwrap();
    stores.manage_store(store_input("B-02", 5)).await.unwrap();

    let products = ProductService::new(&pool);
    products
        .manage_product(product_input("SKU-0001", "B-02", 1))
        .await
        .unwrap();
    products
        .manage_product(product_input("SKU-0001", "A-01", 2))
        .await
        .unwrap();

    let listed = products.products_by_sku("SKU-0001").await.unwrap();
    let codes: Vec<&str> = listed.iter().map(|p| p.store_code.as_str()).collect();
    assert_eq!(codes, ["A-01", "B-02"]);
}

// =============================================================================
// Stock
// =============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_update_stock_and_minimum_flag(pool: PgPool) {
    StoreService::new(&pool)
        .manage_store(store_input("A-01", 5))
        .await
        .unwrap();
    ProductService::new(&pool)
        .manage_product(product_input("SKU-0001", "A-01", 10))
        .await
        .unwrap();
    let stock = StockService::new(&pool);

    let update = stock.update_stock("A-01", "SKU-0001", 3).await.unwrap();
    assert_eq!(update.stock, 3);

    let entry = stock.stock_in_store("A-01", "SKU-0001").await.unwrap();
    assert_eq!(entry.level.stock, 3);
    assert!(entry.level.is_below_minimum());
    assert_eq!(entry.level.shortfall(), 2);

    let across = stock.stock_across_stores("SKU-0001").await.unwrap();
    assert_eq!(across.len(), 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_update_stock_missing_store_or_product(pool: PgPool) {
    let stock = StockService::new(&pool);

    assert!(matches!(
        stock.update_stock("Z-99", "SKU-0001", 1).await,
        Err(InventoryError::StoreNotFound(code)) if code == "Z-99"
    ));

    StoreService::new(&pool)
        .manage_store(store_input("A-01", 0))
        .await
        .unwrap();
    assert!(matches!(
        stock.update_stock("A-01", "SKU-NONE", 1).await,
        Err(InventoryError::ProductNotFound { .. })
    ));
}

// =============================================================================
// Authentication
// =============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_authorize_upserts_one_user(pool: PgPool) {
    let state = state_with_pool(pool.clone());
    let auth = AuthService::new(&pool, state.tokens());

    let first = auth
        .authorize("client@example.com", "Jm$_&1388", "GODE561231GR8")
        .await
        .unwrap();
    let second = auth
        .authorize("client@example.com", "Other$_&99", "GODE561231GR8")
        .await
        .unwrap();
    assert_eq!(first.user.id, second.user.id);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory.user_auth")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let access = auth.refresh(&second.tokens.refresh_token).await.unwrap();
    let claims = state.tokens().verify(&access, TokenKind::Access).unwrap();
    assert_eq!(claims.sub, "client@example.com");

    assert!(matches!(
        auth.refresh(&second.tokens.access_token).await,
        Err(AuthError::InvalidToken)
    ));
}

// =============================================================================
// HTTP flow
// =============================================================================

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
async fn test_http_store_product_stock_flow(pool: PgPool) {
    let state = state_with_pool(pool);

    let (status, body) = send(
        app(state.clone()),
        json_request(
            "POST",
            "/api/ecommerce/authorization/",
            None,
            &json!({
                "username": "client@example.com",
                "password": "Jm$_&1388",
                "rfc_client": "GODE561231GR8"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_owned();

    let (status, body) = send(
        app(state.clone()),
        json_request(
            "POST",
            "/api/ecommerce/manage/store/",
            Some(&token),
            &json!({
                "store_code": "A-01",
                "store_name": "Centro",
                "street_address": "Reforma",
                "external_number_address": "100",
                "suburb_address": "Centro",
                "city_address": "CDMX",
                "country_address": "MX",
                "zip_postal_code_address": "06000",
                "minimum_inventory": 5
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Message"], "Store Inserted Successful");

    let (status, body) = send(
        app(state.clone()),
        json_request(
            "POST",
            "/api/ecommerce/manage/product/",
            Some(&token),
            &json!({
                "product_sku": "SKU-0001",
                "product_store_code": "A-01",
                "product_name": "Tornillo",
                "product_stock": 10,
                "product_price": "19.99",
                "product_currency": "MXN",
                "product_status": "active"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Product"]["Message"], "Product data Inserted Successful");

    let (status, body) = send(
        app(state.clone()),
        json_request(
            "POST",
            "/api/ecommerce/stock/add/",
            Some(&token),
            &json!({"stock": 4, "product_sku": "SKU-0001", "store_code": "A-01"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ProductStock"], "4");

    let (status, body) = send(
        app(state.clone()),
        empty_request(
            "GET",
            "/api/ecommerce/stock/detail/?product_sku=SKU-0001&store_code=A-01",
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ProductStock"]["Stock"], 4);
    assert_eq!(body["ProductStock"]["BelowMinimum"], true);
    assert_eq!(body["ProductStock"]["Shortfall"], 1);

    let (status, body) = send(
        app(state),
        empty_request(
            "GET",
            "/api/ecommerce/manage/store/?store_code=Z-99",
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], 404);
}
