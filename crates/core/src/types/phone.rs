//! Phone number type.
//!
//! Phone numbers are the login handle for storefront accounts. Guest
//! checkouts synthesize a throwaway account whose phone column holds a
//! generated placeholder instead of a real number.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number has too few digits.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum required digit count.
        min: usize,
    },
    /// The number has too many digits.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum allowed digit count.
        max: usize,
    },
    /// The input contains characters other than digits, separators, or a
    /// leading `+`.
    #[error("phone number contains invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// A phone number.
///
/// ## Constraints
///
/// - 8-15 digits (ITU-T E.164 upper bound)
/// - Optional leading `+`
/// - Spaces and dashes are accepted as separators and stripped
///
/// ## Examples
///
/// ```
/// use mashtal_core::Phone;
///
/// assert!(Phone::parse("01001234567").is_ok());
/// assert!(Phone::parse("+20 100 123-4567").is_ok());
///
/// assert!(Phone::parse("").is_err());        // empty
/// assert!(Phone::parse("12345").is_err());   // too short
/// assert!(Phone::parse("not-a-phone").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 8;

    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string.
    ///
    /// Separators (spaces and dashes) are stripped; the stored value keeps
    /// only the digits and an optional leading `+`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits/separators/a leading `+`, or has a digit count outside
    /// 8-15.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut normalized = String::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            match c {
                '0'..='9' => normalized.push(c),
                '+' if i == 0 => normalized.push(c),
                ' ' | '-' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        let digits = normalized.chars().filter(char::is_ascii_digit).count();
        if digits < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }
        if digits > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(normalized))
    }

    /// Generate a unique placeholder phone for a synthesized account.
    ///
    /// The UUID makes collisions with real numbers and with other
    /// placeholders impossible, which keeps the unique constraint on the
    /// phone column safe.
    #[must_use]
    pub fn placeholder(prefix: &str) -> Self {
        Self(format!("{prefix}-{}", uuid::Uuid::new_v4().simple()))
    }

    /// Reconstruct a `Phone` from a value previously stored in the database.
    ///
    /// Stored values were validated (or generated) on the way in, so this
    /// does not re-validate. Placeholder values would fail [`Self::parse`].
    #[must_use]
    pub fn from_stored(s: String) -> Self {
        Self(s)
    }

    /// Whether this is a generated placeholder rather than a real number.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        !self.0.chars().all(|c| c.is_ascii_digit() || c == '+')
    }

    /// Get the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let phone = Phone::parse("+20 100 123-4567").expect("valid phone");
        assert_eq!(phone.as_str(), "+201001234567");
        assert!(!phone.is_placeholder());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(
            Phone::parse("1234567"),
            Err(PhoneError::TooShort { .. })
        ));
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::TooLong { .. })
        ));
        assert!(matches!(
            Phone::parse("call-me-maybe"),
            Err(PhoneError::InvalidCharacter(_))
        ));
        // '+' only allowed in the leading position
        assert!(Phone::parse("0100+1234567").is_err());
    }

    #[test]
    fn test_placeholders_are_unique() {
        let a = Phone::placeholder("guest");
        let b = Phone::placeholder("guest");
        assert_ne!(a, b);
        assert!(a.is_placeholder());
        assert!(a.as_str().starts_with("guest-"));
    }
}
