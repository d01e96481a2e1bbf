//! Payment step route handlers.
//!
//! The browser asks for a client secret for the order already priced in the
//! session, mounts the hosted widget with it, and after confirming posts the
//! payment reference back so the confirmation email can go out. The widget
//! then redirects to `/order-confirmation?payment_intent=...`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use curbside_core::PaymentIntentRef;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::VisitorSession;
use crate::routes::Chrome;
use crate::routes::checkout::OrderView;
use crate::services::{OrderConfirmation, PaymentIntent};
use crate::state::AppState;
use crate::tasks::BestEffortTask;

/// Body of `POST /api/payment-intents`.
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    /// Amount the page showed, in cents.
    pub amount: i64,
}

/// Body of `POST /api/order-confirmation`.
#[derive(Debug, Deserialize)]
pub struct ConfirmationRequest {
    pub payment_intent: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationResponse {
    pub queued: bool,
}

/// Query of `GET /order-confirmation`.
#[derive(Debug, Deserialize)]
pub struct ConfirmationQuery {
    pub payment_intent: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "order_confirmation.html")]
pub struct ConfirmationTemplate {
    pub chrome: Chrome,
    pub payment_intent: Option<String>,
    pub order: Option<OrderView>,
    pub status: PaymentOutcome,
}

/// What the confirmation page tells the visitor about their payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Processing,
    Failed,
    /// The processor could not be asked.
    Unknown,
}

impl PaymentOutcome {
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::Succeeded => "You're booked!",
            Self::Processing => "Payment processing",
            Self::Failed => "Payment not completed",
            Self::Unknown => "Thanks for your order",
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Succeeded => {
                "Your payment went through and your dumpster is on the schedule. A confirmation email is on its way."
            }
            Self::Processing => {
                "Your bank is still processing the payment. We'll email you as soon as it clears."
            }
            Self::Failed => {
                "Your payment didn't go through and you have not been charged. Please try again or give us a call."
            }
            Self::Unknown => {
                "We're confirming your payment now. If you don't get an email within the hour, give us a call."
            }
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Processing)
    }
}

/// Create a payment intent for the priced order.
///
/// POST /api/payment-intents
///
/// The same order gets the same client secret back, so reloading the
/// payment step does not create a second intent.
///
/// # Errors
///
/// Returns 409 if there is no priced order or the amount no longer matches
/// it, and 502 if the payment processor fails.
#[instrument(skip(state, session))]
pub async fn create_intent(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<IntentRequest>,
) -> Result<Json<PaymentIntent>> {
    let order = VisitorSession::new(&session)
        .checkout()
        .await?
        .and_then(|checkout| checkout.order().cloned())
        .ok_or_else(|| AppError::Conflict("No order is waiting for payment".to_string()))?;

    if body.amount != order.amount.to_cents() {
        tracing::warn!(
            requested = body.amount,
            expected = order.amount.to_cents(),
            "Payment amount does not match the order"
        );
        return Err(AppError::Conflict(
            "Your order changed, please reload the page".to_string(),
        ));
    }

    let intent = state.payments().intent_for(&order).await?;
    add_breadcrumb("payment", "Intent ready", Some(&[("payment_intent", intent.id.as_str())]));
    Ok(Json(intent))
}

/// Queue the order confirmation email.
///
/// POST /api/order-confirmation
///
/// Best effort: the browser redirects whatever this returns. The reference is
/// checked with the processor before anything is queued.
///
/// # Errors
///
/// Returns 400 for a malformed payment reference, 409 if the session has no
/// order or the processor has not taken payment for it, and 502 if the
/// processor cannot be asked.
#[instrument(skip(state, session))]
pub async fn confirm_order(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ConfirmationRequest>,
) -> Result<impl IntoResponse> {
    let payment_intent = PaymentIntentRef::parse(&body.payment_intent)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let order = VisitorSession::new(&session)
        .current_order()
        .await?
        .ok_or_else(|| AppError::Conflict("No order to confirm".to_string()))?;

    // Only a payment the processor vouches for gets a "you're booked" email
    let intent = state.payments().retrieve(&payment_intent).await?;
    if !(intent.is_succeeded() || intent.is_processing()) {
        tracing::warn!(%payment_intent, status = %intent.status, "Confirmation for an unpaid intent");
        return Err(AppError::Conflict("Payment not completed".to_string()));
    }
    if intent.amount != order.amount.to_cents() {
        tracing::warn!(
            %payment_intent,
            paid = intent.amount,
            expected = order.amount.to_cents(),
            "Confirmation amount does not match the order"
        );
        return Err(AppError::Conflict("Payment does not match the order".to_string()));
    }

    let queued = state
        .tasks()
        .enqueue(BestEffortTask::SendConfirmationEmail(OrderConfirmation::new(
            payment_intent,
            &order,
        )));

    Ok((StatusCode::ACCEPTED, Json(ConfirmationResponse { queued })))
}

/// Confirmation page the payment widget redirects to.
///
/// GET /order-confirmation?payment_intent=pi_...
///
/// The page renders even when the processor can't be reached; the status
/// line just says so.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, nonce))]
pub async fn confirmation_page(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Query(query): Query<ConfirmationQuery>,
) -> Result<impl IntoResponse> {
    let payment_intent = query
        .payment_intent
        .as_deref()
        .and_then(|raw| PaymentIntentRef::parse(raw).ok());

    let status = match &payment_intent {
        Some(id) => match state.payments().retrieve(id).await {
            Ok(intent) if intent.is_succeeded() => PaymentOutcome::Succeeded,
            Ok(intent) if intent.is_processing() => PaymentOutcome::Processing,
            Ok(intent) => {
                tracing::info!(payment_intent = %id, status = %intent.status, "Payment not completed");
                PaymentOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(payment_intent = %id, error = %e, "Could not check payment status");
                PaymentOutcome::Unknown
            }
        },
        None => PaymentOutcome::Unknown,
    };

    // Keep the checkout for a retry unless the payment went through
    let visitor = VisitorSession::new(&session);
    let order = if status.is_success() {
        let order = visitor.confirm().await?;
        if let Some(order) = &order {
            state.payments().forget(order).await;
        }
        order
    } else {
        visitor.current_order().await?
    };

    Ok(ConfirmationTemplate {
        chrome: Chrome::new(&state, nonce, "/order-confirmation"),
        payment_intent: payment_intent.map(|id| id.to_string()),
        order: order.as_ref().map(OrderView::from),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_success_classes() {
        assert!(PaymentOutcome::Succeeded.is_success());
        assert!(PaymentOutcome::Processing.is_success());
        assert!(!PaymentOutcome::Failed.is_success());
        assert!(!PaymentOutcome::Unknown.is_success());
    }
}
