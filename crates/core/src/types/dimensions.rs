//! Product volumetry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Package dimensions and weight of a product. Every measure is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
}
