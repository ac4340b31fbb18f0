//! Chilean national ID (RUT) parsing and check-digit validation.

use std::fmt;

use thiserror::Error;

/// Why a RUT was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RutError {
    /// Nothing but separators.
    #[error("RUT is empty")]
    Empty,

    /// The number part contains something other than digits.
    #[error("RUT number '{0}' is not numeric")]
    NonNumeric(String),

    /// The check character is not a digit or 'K'.
    #[error("RUT check character '{0}' is not a digit or K")]
    InvalidCheckCharacter(char),

    /// The check character does not match the number.
    #[error("RUT check character '{found}' does not match expected '{expected}'")]
    ChecksumMismatch {
        /// Check character computed from the number.
        expected: char,
        /// Check character supplied.
        found: char,
    },
}

/// A validated RUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rut {
    number: u32,
    check: char,
}

/// Computes the mod-11 check character for a RUT number.
///
/// Digits are weighted 2, 3, 4, 5, 6, 7, 2, 3, ... from the least
/// significant; `11 - (sum mod 11)` maps 11 to '0' and 10 to 'K'.
///
/// # Examples
///
/// ```
/// use payroll_engine::export::check_character;
///
/// assert_eq!(check_character(12_345_678), '5');
/// assert_eq!(check_character(10_000_013), 'K');
/// assert_eq!(check_character(10_000_004), '0');
/// ```
pub fn check_character(number: u32) -> char {
    let mut remaining = number;
    let mut sum = 0u32;
    let mut weight = 2u32;
    while remaining > 0 {
        sum += (remaining % 10) * weight;
        remaining /= 10;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }
    match 11 - sum % 11 {
        11 => '0',
        10 => 'K',
        digit => char::from_digit(digit, 10).unwrap_or('0'),
    }
}

impl Rut {
    /// Parses and validates a RUT written as `12.345.678-5`, `12345678-5`
    /// or `123456785`. The check character is compared ignoring case.
    pub fn parse(text: &str) -> Result<Self, RutError> {
        let cleaned: String = text
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | ' '))
            .collect();

        let mut chars = cleaned.chars();
        let found = chars.next_back().ok_or(RutError::Empty)?;
        let digits = chars.as_str();
        if digits.is_empty() {
            return Err(RutError::Empty);
        }

        let found = found.to_ascii_uppercase();
        if !(found.is_ascii_digit() || found == 'K') {
            return Err(RutError::InvalidCheckCharacter(found));
        }

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(RutError::NonNumeric(digits.to_string()));
        }
        let number: u32 = digits
            .parse()
            .map_err(|_| RutError::NonNumeric(digits.to_string()))?;

        let expected = check_character(number);
        if expected != found {
            return Err(RutError::ChecksumMismatch { expected, found });
        }

        Ok(Self {
            number,
            check: expected,
        })
    }

    /// The number without its check character.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The check character ('0'-'9' or 'K').
    pub fn check(&self) -> char {
        self.check
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.number, self.check)
    }
}

/// Returns true when the text is a RUT with a matching check character.
pub fn is_valid_rut(text: &str) -> bool {
    Rut::parse(text).is_ok()
}
