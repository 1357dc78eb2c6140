//! Product pricing using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price: base amount, tax amount and currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pesos, not centavos).
    pub amount: Decimal,
    /// Tax charged on top of `amount`, in the same unit.
    pub tax: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, tax: Decimal, currency: CurrencyCode) -> Self {
        Self {
            amount,
            tax,
            currency,
        }
    }
}

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency '{0}'")]
pub struct CurrencyError(pub String);

/// Supported ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum CurrencyCode {
    #[default]
    MXN,
    USD,
    EUR,
    CAD,
    GBP,
}

impl CurrencyCode {
    /// The three-letter code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MXN => "MXN",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::CAD => "CAD",
            Self::GBP => "GBP",
        }
    }

    /// Parse a currency code, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error for codes outside the supported set.
    pub fn parse(s: &str) -> Result<Self, CurrencyError> {
        match s.to_ascii_uppercase().as_str() {
            "MXN" => Ok(Self::MXN),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "CAD" => Ok(Self::CAD),
            "GBP" => Ok(Self::GBP),
            _ => Err(CurrencyError(s.to_owned())),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(currency: CurrencyCode) -> Self {
        currency.code().to_owned()
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CurrencyCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CurrencyCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CurrencyCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.code(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse_is_case_insensitive() {
        assert_eq!(CurrencyCode::parse("mxn").unwrap(), CurrencyCode::MXN);
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
    }

    #[test]
    fn test_currency_parse_unsupported() {
        assert_eq!(
            CurrencyCode::parse("BTC"),
            Err(CurrencyError("BTC".to_owned()))
        );
    }

    #[test]
    fn test_currency_serde() {
        assert_eq!(serde_json::to_string(&CurrencyCode::EUR).unwrap(), "\"EUR\"");
        let parsed: CurrencyCode = serde_json::from_str("\"cad\"").unwrap();
        assert_eq!(parsed, CurrencyCode::CAD);
    }
}
