use serde::Serialize;
use std::fmt;

use super::errors::DomainError;

/// Phone number value object
///
/// # Invariants
/// - Stored as digits, optionally prefixed with '+'
/// - Separators (spaces, dashes, parentheses) are stripped
/// - Between 5 and 15 digits
///
/// Two phones compare equal when their normalized forms match, which is
/// what the merge-by-phone lookup relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    const MIN_DIGITS: usize = 5;
    const MAX_DIGITS: usize = 15;

    /// Creates a new Phone value object
    ///
    /// # Example
    /// ```
    /// use daycare_api::domain::Phone;
    ///
    /// let phone = Phone::new("+7 (900) 123-45-67").expect("valid phone");
    /// assert_eq!(phone.as_str(), "+79001234567");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = raw.as_ref().trim();
        let (plus, rest) = match raw.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", raw),
        };

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '(' | ')' => {}
                _ => return Err(DomainError::InvalidPhone(raw.to_string())),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(DomainError::InvalidPhone(raw.to_string()));
        }

        Ok(Phone(format!("{}{}", plus, digits)))
    }

    /// Returns the normalized phone as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Telegram user id
///
/// Telegram ids are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TelegramId(i64);

impl TelegramId {
    pub fn new(id: i64) -> Result<Self, DomainError> {
        if id > 0 {
            Ok(TelegramId(id))
        } else {
            Err(DomainError::InvalidTelegramId(id))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TelegramId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
