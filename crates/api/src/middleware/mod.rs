//! HTTP middleware stack for the inventory API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (preflight for `POST, GET, PUT, DELETE, OPTIONS`)
//!
//! Bearer authentication is an extractor ([`RequireBearer`]) on the
//! protected handlers rather than a layer.

pub mod auth;
pub mod cors;
pub mod request_id;

pub use auth::RequireBearer;
pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
