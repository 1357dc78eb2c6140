//! Stock levels relative to a store's minimum inventory.

use serde::{Deserialize, Serialize};

/// Whether `stock` is below a store's `minimum` inventory.
///
/// A stock equal to the minimum is sufficient.
#[must_use]
pub const fn is_below_minimum(stock: i32, minimum: i32) -> bool {
    stock < minimum
}

/// Stock of one product in one store, with the store's minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub stock: i32,
    pub minimum: i32,
}

impl StockLevel {
    #[must_use]
    pub const fn new(stock: i32, minimum: i32) -> Self {
        Self { stock, minimum }
    }

    #[must_use]
    pub const fn is_below_minimum(&self) -> bool {
        is_below_minimum(self.stock, self.minimum)
    }

    /// Units needed to reach the minimum, zero when already sufficient.
    #[must_use]
    pub const fn shortfall(&self) -> i32 {
        if self.is_below_minimum() {
            self.minimum.saturating_sub(self.stock)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_minimum() {
        assert!(is_below_minimum(4, 5));
        assert!(!is_below_minimum(5, 5));
        assert!(!is_below_minimum(6, 5));
    }

    #[test]
    fn test_shortfall() {
        assert_eq!(StockLevel::new(2, 10).shortfall(), 8);
        assert_eq!(StockLevel::new(10, 10).shortfall(), 0);
        assert_eq!(StockLevel::new(-3, 0).shortfall(), 3);
    }
}
