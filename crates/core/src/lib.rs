//! Store Inventory Core - Shared domain types.
//!
//! This crate provides the value types used across the inventory components:
//! - `api` - JSON API over stores, products and stock
//! - `cli` - Command-line tools for migrations, seeding and API users
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation - no I/O, no
//! database access, no HTTP. Database encodings are available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, store codes, SKUs, addresses, prices and the
//!   credential fields accepted by the authorization endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
