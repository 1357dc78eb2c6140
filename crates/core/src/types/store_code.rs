//! Store code type.
//!
//! A store code is one letter, a hyphen and two digits (`A-01`, `m-07`).
//! Every store write and stock mutation validates the code before touching
//! the database.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`StoreCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreCodeError {
    /// The input string is empty.
    #[error("store code cannot be empty")]
    Empty,
    /// The input does not follow the `LETTER-DD` pattern.
    #[error("store code '{0}' must be one letter, a hyphen and two digits (e.g. A-01)")]
    InvalidFormat(String),
}

/// Returns `true` if `code` is exactly one ASCII letter (either case), a
/// hyphen and two ASCII digits.
///
/// ```
/// use store_inventory_core::is_valid_store_code;
///
/// assert!(is_valid_store_code("A-01"));
/// assert!(is_valid_store_code("z-99"));
/// assert!(!is_valid_store_code("AB-01"));
/// assert!(!is_valid_store_code("A01"));
/// ```
#[must_use]
pub fn is_valid_store_code(code: &str) -> bool {
    matches!(
        code.as_bytes(),
        [letter, b'-', d1, d2]
            if letter.is_ascii_alphabetic() && d1.is_ascii_digit() && d2.is_ascii_digit()
    )
}

/// A validated store code.
///
/// The original casing is preserved; `a-01` and `A-01` are distinct codes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct StoreCode(String);

impl StoreCode {
    /// Parse a `StoreCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not of the form `LETTER-DD`.
    pub fn parse(s: &str) -> Result<Self, StoreCodeError> {
        if s.is_empty() {
            return Err(StoreCodeError::Empty);
        }

        if !is_valid_store_code(s) {
            return Err(StoreCodeError::InvalidFormat(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for StoreCode {
    type Err = StoreCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StoreCode {
    type Error = StoreCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StoreCode> for String {
    fn from(code: StoreCode) -> Self {
        code.0
    }
}

impl AsRef<str> for StoreCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for StoreCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for StoreCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // The column carries a CHECK constraint with the same pattern
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for StoreCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
