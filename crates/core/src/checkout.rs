//! The two-stage checkout controller.
//!
//! A checkout is either collecting the quote form ([`CheckoutStage::Form`]) or
//! showing the hosted payment widget for a priced order
//! ([`CheckoutStage::Payment`]). The stage is derived from whether a priced
//! order exists, so a `Payment` stage without an order cannot be represented.
//!
//! ```text
//!            rehydrate(complete draft)
//!   ┌──────┐ ────────────────────────▶ ┌─────────┐
//!   │ Form │        submit(valid)      │ Payment │
//!   │      │ ────────────────────────▶ │         │
//!   └──────┘ ◀──────────────────────── └─────────┘
//!                     back()
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::{DumpsterSize, RentalDays};
use crate::quote::{QuoteDraft, QuoteRequest, ValidationErrors};
use crate::types::Price;

/// Which step of checkout is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    #[default]
    Form,
    Payment,
}

/// A validated quote with its computed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedOrder {
    pub request: QuoteRequest,
    pub amount: Price,
}

impl ComputedOrder {
    /// Price a validated request.
    #[must_use]
    pub fn price(request: QuoteRequest) -> Self {
        let amount = request.dumpster_size.price(request.rental_days);
        Self { request, amount }
    }

    #[must_use]
    pub const fn size(&self) -> DumpsterSize {
        self.request.dumpster_size
    }

    #[must_use]
    pub const fn rental_days(&self) -> RentalDays {
        self.request.rental_days
    }

    /// One-line order summary shown beside the payment widget.
    ///
    /// e.g. `20 Yard Dumpster, 7 days, delivered Fri, Mar 6, 2026 to 77002`
    #[must_use]
    pub fn summary(&self) -> String {
        let days = self.request.rental_days.get();
        let unit = if days == 1 { "day" } else { "days" };
        format!(
            "{}, {days} {unit}, delivered {} to {}",
            self.request.dumpster_size.label(),
            self.request.delivery_date.format("%a, %b %-d, %Y"),
            self.request.zip_code,
        )
    }

    /// Stable key for everything that goes into a payment intent.
    ///
    /// Two orders with the same fingerprint can share one intent; any change
    /// to price, schedule or customer yields a new one.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let r = &self.request;
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            r.dumpster_size.key(),
            r.rental_days,
            self.amount.to_cents(),
            r.email,
            r.phone.digits(),
            r.delivery_date,
            r.pickup_date.map(|d| d.to_string()).unwrap_or_default(),
        )
    }
}

/// Checkout controller state, kept in the visitor's session between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    draft: QuoteDraft,
    order: Option<ComputedOrder>,
    /// Only meaningful for the response that produced them.
    #[serde(skip)]
    errors: ValidationErrors,
}

impl Checkout {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a checkout from a hand-off payload.
    ///
    /// A payload with every required field goes straight to `Payment` when it
    /// validates. A complete payload that fails validation lands on the form
    /// with its errors. A partial payload (e.g. from the estimator) only
    /// pre-fills the form.
    #[must_use]
    pub fn rehydrate(draft: QuoteDraft, now: DateTime<Utc>) -> Self {
        let mut checkout = Self::new();
        if draft.is_complete_for_payment() {
            // Errors stay on the checkout for the form to show.
            let _ = checkout.submit(draft, now);
        } else {
            checkout.draft = draft;
        }
        checkout
    }

    /// Submit the form.
    ///
    /// On success the checkout moves to `Payment`. On failure it stays on
    /// `Form` with the draft kept as typed.
    ///
    /// # Errors
    ///
    /// Returns the validation errors from [`QuoteDraft::validate_checkout`].
    pub fn submit(
        &mut self,
        draft: QuoteDraft,
        now: DateTime<Utc>,
    ) -> Result<&ComputedOrder, ValidationErrors> {
        let validated = draft.validate_checkout(now);
        self.draft = draft;
        match validated {
            Ok(request) => {
                self.errors = ValidationErrors::default();
                Ok(&*self.order.insert(ComputedOrder::price(request)))
            }
            Err(errors) => {
                self.order = None;
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Return from `Payment` to `Form` keeping every entered value.
    pub fn back(&mut self) {
        self.order = None;
        self.errors = ValidationErrors::default();
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        if self.order.is_some() {
            CheckoutStage::Payment
        } else {
            CheckoutStage::Form
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    #[must_use]
    pub const fn order(&self) -> Option<&ComputedOrder> {
        self.order.as_ref()
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }
}
