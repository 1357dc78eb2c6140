//! Domain types for the inventory service.
//!
//! Every type that is validated on the way in exposes a `parse` constructor
//! returning a dedicated error enum.

pub mod address;
pub mod dimensions;
pub mod email;
pub mod id;
pub mod password;
pub mod price;
pub mod rfc;
pub mod sku;
pub mod stock;
pub mod store_code;

pub use address::{StoreAddress, format_store_address};
pub use dimensions::Dimensions;
pub use email::{Email, EmailError};
pub use id::*;
pub use password::{Password, PasswordError};
pub use price::{CurrencyCode, CurrencyError, Price};
pub use rfc::{Rfc, RfcError};
pub use sku::{Sku, SkuError};
pub use stock::{StockLevel, is_below_minimum};
pub use store_code::{StoreCode, StoreCodeError, is_valid_store_code};
