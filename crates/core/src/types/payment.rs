//! Reference to a payment owned by the external processor.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PaymentIntentRef`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentRefError {
    /// The reference is empty.
    #[error("payment reference cannot be empty")]
    Empty,
    /// The reference contains characters processors never issue.
    #[error("payment reference contains invalid characters")]
    InvalidCharacters,
    /// The reference is longer than any processor id.
    #[error("payment reference must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Opaque payment intent identifier (e.g. `pi_3Nc...`).
///
/// Only referenced here for the confirmation redirect and email correlation,
/// so the only check is that it is a plausible token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentIntentRef(String);

impl PaymentIntentRef {
    /// Maximum accepted length.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a payment reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is empty, too long, or contains
    /// anything other than ASCII letters, digits and `_`.
    pub fn parse(s: &str) -> Result<Self, PaymentRefError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PaymentRefError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(PaymentRefError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(PaymentRefError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentIntentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PaymentIntentRef {
    type Error = PaymentRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PaymentIntentRef> for String {
    fn from(reference: PaymentIntentRef) -> Self {
        reference.0
    }
}
