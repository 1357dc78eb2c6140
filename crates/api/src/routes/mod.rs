//! HTTP route handlers for the inventory API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                   - Liveness
//! GET  /health/ready                             - Database probe
//!
//! # Authorization (public)
//! POST /api/ecommerce/authorization/             - Issue access and refresh tokens
//! POST /api/ecommerce/authorization/refresh/     - Exchange a refresh token
//!
//! # Stores (bearer)
//! POST   /api/ecommerce/manage/store/            - Insert or rewrite
//! GET    /api/ecommerce/manage/store/?store_code=
//! PUT    /api/ecommerce/manage/store/            - Rewrite existing
//! DELETE /api/ecommerce/manage/store/?store_code=
//!
//! # Products (bearer)
//! POST   /api/ecommerce/manage/product/          - Insert or rewrite
//! GET    /api/ecommerce/manage/product/?product_sku=
//! PUT    /api/ecommerce/manage/product/          - Rewrite existing
//! DELETE /api/ecommerce/manage/product/?product_sku=&store_code=
//!
//! # Stock (bearer)
//! POST /api/ecommerce/stock/add/                 - Overwrite stock
//! GET  /api/ecommerce/stock/detail/?product_sku=&store_code=
//! GET  /api/ecommerce/stock/total/?product_sku=
//! ```

pub mod auth;
pub mod health;
pub mod products;
pub mod stock;
pub mod stores;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the authorization routes router.
///
/// Paths are absolute: nesting a `/` route would drop the trailing slash.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ecommerce/authorization/", post(auth::authorize))
        .route("/api/ecommerce/authorization/refresh/", post(auth::refresh))
}

/// Create the store and product management routes router.
pub fn manage_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/store/",
            post(stores::manage)
                .get(stores::show)
                .put(stores::update)
                .delete(stores::delete),
        )
        .route(
            "/product/",
            post(products::manage)
                .get(products::list)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the stock routes router.
pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/add/", post(stock::add))
        .route("/detail/", get(stock::detail))
        .route("/total/", get(stock::total))
}

/// Create all routes for the inventory API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth_routes())
        .nest("/api/ecommerce/manage", manage_routes())
        .nest("/api/ecommerce/stock", stock_routes())
}
