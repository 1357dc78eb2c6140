//! Store postal address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The postal address parts of a store, as stored in separate columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreAddress {
    pub street: String,
    pub exterior_number: String,
    pub suburb: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

impl StoreAddress {
    /// The single-line representation returned by the API.
    #[must_use]
    pub fn formatted(&self) -> String {
        format_store_address(
            &self.street,
            &self.exterior_number,
            &self.suburb,
            &self.postal_code,
            &self.city,
            &self.country,
        )
    }
}

impl fmt::Display for StoreAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Joins address parts as `"{street} no. {number}, col. {suburb}, Cp. {postal}, {city}, {country}"`.
///
/// Parts are inserted verbatim; empty parts leave their labels in place.
///
/// ```
/// use store_inventory_core::format_store_address;
///
/// assert_eq!(
///     format_store_address("Reforma", "100", "Centro", "06000", "CDMX", "MX"),
///     "Reforma no. 100, col. Centro, Cp. 06000, CDMX, MX"
/// );
/// ```
#[must_use]
pub fn format_store_address(
    street: &str,
    exterior_number: &str,
    suburb: &str,
    postal_code: &str,
    city: &str,
    country: &str,
) -> String {
    format!("{street} no. {exterior_number}, col. {suburb}, Cp. {postal_code}, {city}, {country}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reforma() -> StoreAddress {
        StoreAddress {
            street: "Reforma".to_owned(),
            exterior_number: "100".to_owned(),
            suburb: "Centro".to_owned(),
            city: "CDMX".to_owned(),
            country: "MX".to_owned(),
            postal_code: "06000".to_owned(),
        }
    }

    #[test]
    fn test_formatted() {
        assert_eq!(
            reforma().formatted(),
            "Reforma no. 100, col. Centro, Cp. 06000, CDMX, MX"
        );
    }

    #[test]
    fn test_display_matches_formatted() {
        let address = reforma();
        assert_eq!(address.to_string(), address.formatted());
    }

    #[test]
    fn test_empty_parts_keep_labels() {
        assert_eq!(
            format_store_address("", "", "", "", "", ""),
            " no. , col. , Cp. , , "
        );
    }
}
