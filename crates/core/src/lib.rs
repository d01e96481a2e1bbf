//! Curbside Core - domain types and rules for the quote-to-payment funnel.
//!
//! This crate is shared by:
//! - `site` - Public marketing site with the quote form and checkout
//! - `cli` - Command-line price lookups and content checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clock reads. Anything time-dependent takes `now` as an argument
//! so the rules stay deterministic under test.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes for contact fields, prices and payment references
//! - [`pricing`] - Dumpster sizes and the rental-duration pricing rules
//! - [`quote`] - Quote form drafts and their validation
//! - [`checkout`] - The two-stage checkout controller

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod pricing;
pub mod quote;
pub mod types;

pub use checkout::{Checkout, CheckoutStage, ComputedOrder};
pub use pricing::{DumpsterSize, PricingEntry, RentalDays, RentalDaysError};
pub use quote::{LeadRequest, QuoteDraft, QuoteRequest, SubmitPath, ValidationErrors, WasteType};
pub use types::*;
