//! Checkout route handlers.
//!
//! The checkout lives in the session. `GET /checkout` first drains the
//! hand-off slot: a complete quote goes straight to the payment step, a
//! partial one (from the estimator) only pre-fills the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use curbside_core::{Checkout, CheckoutStage, ComputedOrder, QuoteDraft, SubmitPath};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::middleware::security_headers::PAYMENT_SCRIPT_ORIGIN;
use crate::models::VisitorSession;
use crate::routes::Chrome;
use crate::routes::quote::QuoteFormView;
use crate::services::SmsNotification;
use crate::state::AppState;
use crate::tasks::BestEffortTask;

/// Checkout form step.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutFormTemplate {
    pub chrome: Chrome,
    pub form: QuoteFormView,
}

/// Payment step: order summary beside the hosted payment widget.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct CheckoutPaymentTemplate {
    pub chrome: Chrome,
    pub order: OrderView,
    pub publishable_key: String,
    pub payment_script: &'static str,
    /// Where the widget sends the visitor after confirming.
    pub return_url: String,
}

/// A priced order for display.
#[derive(Clone)]
pub struct OrderView {
    pub summary: String,
    pub size_label: String,
    pub rental_days: u32,
    pub delivery_date: String,
    pub pickup_date: Option<String>,
    pub customer_name: String,
    pub email: String,
    pub zip_code: String,
    pub amount: String,
    pub amount_cents: i64,
}

impl From<&ComputedOrder> for OrderView {
    fn from(order: &ComputedOrder) -> Self {
        let request = &order.request;
        Self {
            summary: order.summary(),
            size_label: order.size().label().to_string(),
            rental_days: order.rental_days().get(),
            delivery_date: request.delivery_date.format("%A, %B %-d, %Y").to_string(),
            pickup_date: request
                .pickup_date
                .map(|d| d.format("%A, %B %-d, %Y").to_string()),
            customer_name: request.full_name(),
            email: request.email.to_string(),
            zip_code: request.zip_code.to_string(),
            amount: order.amount.display(),
            amount_cents: order.amount.to_cents(),
        }
    }
}

fn render(state: &AppState, nonce: CspNonce, checkout: &Checkout) -> Response {
    let chrome = Chrome::new(state, nonce, "/checkout");
    match checkout.order() {
        Some(order) => CheckoutPaymentTemplate {
            chrome,
            order: OrderView::from(order),
            publishable_key: state.payments().publishable_key().to_string(),
            payment_script: PAYMENT_SCRIPT_ORIGIN,
            return_url: state.config().absolute_url("/order-confirmation"),
        }
        .into_response(),
        None => CheckoutFormTemplate {
            chrome,
            form: QuoteFormView::new(
                checkout.draft().clone(),
                checkout.errors().clone(),
                SubmitPath::Checkout,
            ),
        }
        .into_response(),
    }
}

/// Queue the side channels for an order that reached the payment step.
///
/// Lead and SMS failures are logged by the worker and never hold up payment.
/// An order already announced in this checkout (resubmitted unchanged after
/// going back) is skipped.
async fn announce_order(
    state: &AppState,
    visitor: &VisitorSession<'_>,
    order: &ComputedOrder,
) -> Result<()> {
    if !visitor.mark_announced(order).await? {
        tracing::debug!(summary = %order.summary(), "Order already announced");
        return Ok(());
    }

    let request = &order.request;
    state
        .tasks()
        .enqueue(BestEffortTask::SubmitLead(request.to_lead()));

    if request.sms_consent {
        state.tasks().enqueue(BestEffortTask::SendSms(SmsNotification::booking_received(
            &request.phone,
            &order.summary(),
            &state.config().business.name,
        )));
    }
    Ok(())
}

/// Show the current checkout step.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
) -> Result<Response> {
    let visitor = VisitorSession::new(&session);

    let checkout = if let Some(draft) = visitor.take_hand_off().await? {
        let checkout = Checkout::rehydrate(draft, Utc::now());
        if let Some(order) = checkout.order() {
            tracing::info!(summary = %order.summary(), "Quote handed off straight to payment");
            announce_order(&state, &visitor, order).await?;
        }
        visitor.save_checkout(&checkout).await?;
        checkout
    } else {
        visitor.checkout().await?.unwrap_or_default()
    };

    Ok(render(&state, nonce, &checkout))
}

/// Submit the checkout form.
///
/// A valid form is priced and the visitor is redirected to the payment
/// step. An invalid one comes back with 422 and every value kept.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, nonce, draft))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Form(draft): Form<QuoteDraft>,
) -> Result<Response> {
    if draft.honeypot_tripped() {
        tracing::warn!(email = %draft.email, "Checkout form honeypot filled in");
    }

    let visitor = VisitorSession::new(&session);
    let mut checkout = visitor.checkout().await?.unwrap_or_default();

    let outcome = checkout.submit(draft, Utc::now()).cloned();
    visitor.save_checkout(&checkout).await?;

    match outcome {
        Ok(order) => {
            tracing::info!(summary = %order.summary(), amount = %order.amount, "Order priced");
            add_breadcrumb("checkout", "Order priced", Some(&[("size", order.size().key())]));
            announce_order(&state, &visitor, &order).await?;
            Ok(Redirect::to("/checkout").into_response())
        }
        Err(errors) => {
            tracing::debug!(%errors, "Checkout form rejected");
            let mut response = render(&state, nonce, &checkout);
            *response.status_mut() = StatusCode::UNPROCESSABLE_ENTITY;
            Ok(response)
        }
    }
}

/// Return from the payment step to the form.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Redirect> {
    let visitor = VisitorSession::new(&session);
    if let Some(mut checkout) = visitor.checkout().await? {
        if checkout.stage() == CheckoutStage::Payment {
            checkout.back();
            visitor.save_checkout(&checkout).await?;
        }
    }
    Ok(Redirect::to("/checkout"))
}
