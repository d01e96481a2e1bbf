//! Session-stored checkout state.
//!
//! Two entries carry a visit from the quote pages through payment:
//!
//! - the hand-off slot ([`keys::PENDING_QUOTE`]), written by the estimator or
//!   any page that sends the visitor to checkout, and cleared by the first read
//! - the checkout itself ([`keys::CHECKOUT`]), so reloads and "back" keep
//!   every entered value
//!
//! Once payment succeeds the priced order moves to [`keys::CONFIRMED_ORDER`]
//! so the confirmation page survives a reload.
//!
//! [`keys::ANNOUNCED_ORDER`] remembers which priced order was last announced,
//! so going back and resubmitting the same order does not send a second lead.

use curbside_core::{Checkout, ComputedOrder, QuoteDraft};
use tower_sessions::Session;
use tower_sessions::session::Error;

/// Session keys.
pub mod keys {
    /// In-flight quote payload handed to checkout. Cleared once read.
    pub const PENDING_QUOTE: &str = "pending_quote";

    /// Checkout controller state.
    pub const CHECKOUT: &str = "checkout";

    /// The order the visitor just paid for.
    pub const CONFIRMED_ORDER: &str = "confirmed_order";

    /// Fingerprint of the last order sent to the lead and SMS channels.
    pub const ANNOUNCED_ORDER: &str = "announced_order";
}

/// Typed access to the checkout entries of a session.
pub struct VisitorSession<'a> {
    session: &'a Session,
}

impl<'a> VisitorSession<'a> {
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Put a quote in the hand-off slot, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn hand_off(&self, draft: &QuoteDraft) -> Result<(), Error> {
        self.session.insert(keys::PENDING_QUOTE, draft).await
    }

    /// Read and clear the hand-off slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn take_hand_off(&self) -> Result<Option<QuoteDraft>, Error> {
        self.session.remove(keys::PENDING_QUOTE).await
    }

    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn checkout(&self) -> Result<Option<Checkout>, Error> {
        self.session.get(keys::CHECKOUT).await
    }

    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn save_checkout(&self, checkout: &Checkout) -> Result<(), Error> {
        self.session.insert(keys::CHECKOUT, checkout).await
    }

    /// The order being paid for, or the one already confirmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn current_order(&self) -> Result<Option<ComputedOrder>, Error> {
        let checkout = self.checkout().await?;
        if let Some(order) = checkout.as_ref().and_then(Checkout::order) {
            return Ok(Some(order.clone()));
        }
        self.session.get(keys::CONFIRMED_ORDER).await
    }

    /// Record `order` as announced.
    ///
    /// Returns `false` if the same order was already announced in this
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn mark_announced(&self, order: &ComputedOrder) -> Result<bool, Error> {
        let fingerprint = order.fingerprint();
        let previous: Option<String> = self.session.get(keys::ANNOUNCED_ORDER).await?;
        if previous.as_deref() == Some(fingerprint.as_str()) {
            return Ok(false);
        }
        self.session.insert(keys::ANNOUNCED_ORDER, fingerprint).await?;
        Ok(true)
    }

    /// Close out the checkout after payment, keeping the order for the
    /// confirmation page.
    ///
    /// Returns the confirmed order: the one just moved out of the checkout,
    /// or the one confirmed earlier if the page was reloaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn confirm(&self) -> Result<Option<ComputedOrder>, Error> {
        let checkout: Option<Checkout> = self.session.remove(keys::CHECKOUT).await?;
        if let Some(order) = checkout.as_ref().and_then(Checkout::order) {
            // A later booking of the same order is a new booking
            self.session.remove_value(keys::ANNOUNCED_ORDER).await?;
            self.session.insert(keys::CONFIRMED_ORDER, order).await?;
            return Ok(Some(order.clone()));
        }
        self.session.get(keys::CONFIRMED_ORDER).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use curbside_core::{CheckoutStage, DumpsterSize, RentalDays};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_hand_off_is_cleared_once_read() {
        let session = session();
        let visitor = VisitorSession::new(&session);
        let draft = QuoteDraft::from_estimate(DumpsterSize::Twenty, RentalDays::WEEK);

        visitor.hand_off(&draft).await.unwrap();
        assert_eq!(visitor.take_hand_off().await.unwrap(), Some(draft));
        assert_eq!(visitor.take_hand_off().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_confirm_moves_order_and_survives_reload() {
        let session = session();
        let visitor = VisitorSession::new(&session);
        let draft = QuoteDraft {
            first_name: "Dana".to_owned(),
            last_name: "Reyes".to_owned(),
            email: "dana@example.com".to_owned(),
            phone: "713-555-0142".to_owned(),
            zip_code: "77002".to_owned(),
            waste_type: "household".to_owned(),
            dumpster_size: "20".to_owned(),
            delivery_date: "2026-03-06".to_owned(),
            rental_days: "7".to_owned(),
            ..QuoteDraft::default()
        };
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let checkout = Checkout::rehydrate(draft, now);
        assert_eq!(checkout.stage(), CheckoutStage::Payment);
        visitor.save_checkout(&checkout).await.unwrap();

        let confirmed = visitor.confirm().await.unwrap().unwrap();
        assert_eq!(Some(&confirmed), checkout.order());
        assert!(visitor.checkout().await.unwrap().is_none());

        // Reload
        assert_eq!(visitor.confirm().await.unwrap(), Some(confirmed.clone()));
        assert_eq!(visitor.current_order().await.unwrap(), Some(confirmed));
    }

    fn priced(rental_days: &str) -> Checkout {
        let draft = QuoteDraft {
            first_name: "Dana".to_owned(),
            last_name: "Reyes".to_owned(),
            email: "dana@example.com".to_owned(),
            phone: "713-555-0142".to_owned(),
            zip_code: "77002".to_owned(),
            waste_type: "household".to_owned(),
            dumpster_size: "20".to_owned(),
            delivery_date: "2026-03-06".to_owned(),
            rental_days: rental_days.to_owned(),
            ..QuoteDraft::default()
        };
        Checkout::rehydrate(draft, Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_order_is_announced_once_until_it_changes() {
        let session = session();
        let visitor = VisitorSession::new(&session);
        let week = priced("7");
        let week_order = week.order().unwrap();

        assert!(visitor.mark_announced(week_order).await.unwrap());
        assert!(!visitor.mark_announced(week_order).await.unwrap());

        let fortnight = priced("14");
        assert!(visitor.mark_announced(fortnight.order().unwrap()).await.unwrap());
        // Switching back is a change too
        assert!(visitor.mark_announced(week_order).await.unwrap());
    }

    #[tokio::test]
    async fn test_confirm_resets_announcement() {
        let session = session();
        let visitor = VisitorSession::new(&session);
        let checkout = priced("7");
        let order = checkout.order().unwrap();

        assert!(visitor.mark_announced(order).await.unwrap());
        visitor.save_checkout(&checkout).await.unwrap();
        visitor.confirm().await.unwrap();

        assert!(visitor.mark_announced(order).await.unwrap());
    }

    #[tokio::test]
    async fn test_current_order_empty_for_form_stage() {
        let session = session();
        let visitor = VisitorSession::new(&session);
        assert_eq!(visitor.current_order().await.unwrap(), None);

        let checkout = Checkout::rehydrate(
            QuoteDraft::from_estimate(DumpsterSize::Ten, RentalDays::WEEK),
            Utc::now(),
        );
        visitor.save_checkout(&checkout).await.unwrap();
        assert_eq!(visitor.current_order().await.unwrap(), None);
    }
}
