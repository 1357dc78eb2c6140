//! Password policy for API users.

use core::fmt;

/// Errors that can occur when parsing a [`Password`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Fewer than [`Password::MIN_LENGTH`] characters.
    #[error("password must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// More than [`Password::MAX_LENGTH`] characters.
    #[error("password must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// A character outside letters, digits and `_ - . $ # & *`.
    #[error("password contains a character that is not allowed")]
    InvalidCharacter,
}

const fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '$' | '#' | '&' | '*')
}

/// A password accepted by the authorization endpoint.
///
/// Not `Serialize` and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Minimum password length.
    pub const MIN_LENGTH: usize = 8;
    /// Maximum password length.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `Password`.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is outside 8-128 characters or a
    /// character is outside the allowed set.
    pub fn parse(s: &str) -> Result<Self, PasswordError> {
        let len = s.chars().count();
        if len < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if len > Self::MAX_LENGTH {
            return Err(PasswordError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s.chars().all(is_allowed) {
            return Err(PasswordError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the password as a string slice.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Password::parse("Jm$_&1388").unwrap().expose(), "Jm$_&1388");
        assert!(Password::parse("abc#def*ghi.-").is_ok());
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(
            Password::parse("short"),
            Err(PasswordError::TooShort { min: 8 })
        );
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Password::parse(&"a".repeat(129)),
            Err(PasswordError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            Password::parse("pass word!"),
            Err(PasswordError::InvalidCharacter)
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::parse("Jm$_&1388").unwrap();
        assert!(!format!("{password:?}").contains("1388"));
    }
}
