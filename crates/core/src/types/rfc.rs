//! Mexican taxpayer registry code (RFC) of an API client.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Optional 3-4 letter prefix, optional `YYMMDD` date, two-character
/// homoclave and a check character. Hyphens between groups are tolerated.
static RFC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^([A-ZÑ&]{3,4})?(?:-?)?([0-9]{2}(?:0[1-9]|1[0-2])(?:0[1-9]|[12][0-9]|3[01]))?(?:-?)?([A-Z0-9]{2})([A0-9])$",
    )
    .expect("Invalid regex")
});

/// Errors that can occur when parsing an [`Rfc`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RfcError {
    /// The input string is empty.
    #[error("RFC cannot be empty")]
    Empty,
    /// The input does not match the RFC structure.
    #[error("RFC '{0}' is not a valid taxpayer code")]
    InvalidFormat(String),
}

/// A validated RFC (Registro Federal de Contribuyentes).
///
/// ```
/// use store_inventory_core::Rfc;
///
/// assert!(Rfc::parse("GODE561231GR8").is_ok());
/// assert!(Rfc::parse("EKU9003173C9").is_ok());
/// assert!(Rfc::parse("GODE561331GR8").is_err()); // month 13
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Rfc(String);

impl Rfc {
    /// Parse an `Rfc`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not match the RFC
    /// structure.
    pub fn parse(s: &str) -> Result<Self, RfcError> {
        if s.is_empty() {
            return Err(RfcError::Empty);
        }

        if !RFC_PATTERN.is_match(s) {
            return Err(RfcError::InvalidFormat(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the RFC as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Rfc {
    type Error = RfcError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Rfc> for String {
    fn from(rfc: Rfc) -> Self {
        rfc.0
    }
}

impl fmt::Display for Rfc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
