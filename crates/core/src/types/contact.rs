//! Phone numbers and ZIP codes collected by the quote form.
//!
//! Both types accept what people actually type (spaces, dashes, parentheses)
//! and keep a canonical form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// No digits were entered.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number contains characters other than digits and punctuation.
    #[error("phone number contains invalid characters")]
    InvalidCharacters,
    /// The number is not a 10-digit US number.
    #[error("phone number must have 10 digits (got {0})")]
    WrongLength(usize),
}

/// A US phone number stored as its 10 national digits.
///
/// ```
/// use curbside_core::Phone;
///
/// let phone = Phone::parse("+1 (713) 555-0142").unwrap();
/// assert_eq!(phone.display(), "(713) 555-0142");
/// assert_eq!(phone.e164(), "+17135550142");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Parse a phone number, ignoring common punctuation.
    ///
    /// A leading country code `1` is accepted and dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains letters, or does not
    /// reduce to exactly 10 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut digits = String::with_capacity(11);
        for c in trimmed.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' | '+' => {}
                _ => return Err(PhoneError::InvalidCharacters),
            }
        }

        if digits.len() == 11 && digits.starts_with('1') {
            digits.remove(0);
        }

        match digits.len() {
            0 => Err(PhoneError::Empty),
            10 => Ok(Self(digits)),
            n => Err(PhoneError::WrongLength(n)),
        }
    }

    /// The 10 national digits.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Human-readable form, e.g. `(713) 555-0142`.
    #[must_use]
    pub fn display(&self) -> String {
        let (area, rest) = self.0.split_at(3);
        let (exchange, line) = rest.split_at(3);
        format!("({area}) {exchange}-{line}")
    }

    /// E.164 form for SMS delivery, e.g. `+17135550142`.
    #[must_use]
    pub fn e164(&self) -> String {
        format!("+1{}", self.0)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

/// Errors that can occur when parsing a [`ZipCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipCodeError {
    /// Nothing was entered.
    #[error("ZIP code cannot be empty")]
    Empty,
    /// Not `12345` or `12345-6789`.
    #[error("ZIP code must be 5 digits")]
    Invalid,
}

/// A US ZIP code, either 5 digits or ZIP+4.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ZipCode(String);

impl ZipCode {
    /// Parse a ZIP code.
    ///
    /// # Errors
    ///
    /// Returns an error unless the trimmed input is `DDDDD` or `DDDDD-DDDD`.
    pub fn parse(s: &str) -> Result<Self, ZipCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        let valid = match trimmed.split_once('-') {
            None => trimmed.len() == 5 && all_digits(trimmed),
            Some((zip, plus4)) => {
                zip.len() == 5 && plus4.len() == 4 && all_digits(zip) && all_digits(plus4)
            }
        };

        if valid {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(ZipCodeError::Invalid)
        }
    }

    /// The ZIP code as entered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 5-digit prefix, used to match service areas.
    #[must_use]
    pub fn five_digit(&self) -> &str {
        self.0.get(..5).unwrap_or(&self.0)
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ZipCode {
    type Error = ZipCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ZipCode> for String {
    fn from(zip: ZipCode) -> Self {
        zip.0
    }
}
