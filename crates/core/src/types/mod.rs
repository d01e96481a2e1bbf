//! Core types for Curbside.
//!
//! This module provides type-safe wrappers for the fields a quote carries.

pub mod contact;
pub mod email;
pub mod payment;
pub mod price;

pub use contact::{Phone, PhoneError, ZipCode, ZipCodeError};
pub use email::{Email, EmailError};
pub use payment::{PaymentIntentRef, PaymentRefError};
pub use price::{CurrencyCode, Price};
