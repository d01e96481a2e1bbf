//! Quote form route handlers.
//!
//! The quote form posts one of two ways. The plain path (`POST /quote`) only
//! needs contact details and sends the lead straight to the lead endpoint,
//! showing the visitor the outcome. "Book now" (`POST /quote/book`) puts the
//! whole form in the hand-off slot and lets checkout decide whether it is
//! ready for payment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use curbside_core::quote::earliest_delivery_date;
use curbside_core::{DumpsterSize, QuoteDraft, SubmitPath, ValidationErrors, WasteType};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::VisitorSession;
use crate::routes::Chrome;
use crate::services::SmsNotification;
use crate::state::AppState;
use crate::tasks::BestEffortTask;

/// Everything the quote form partial renders.
#[derive(Clone)]
pub struct QuoteFormView {
    pub draft: QuoteDraft,
    pub errors: ValidationErrors,
    pub path: SubmitPath,
    pub sizes: [DumpsterSize; 5],
    pub waste_types: [WasteType; 7],
    /// `min` for the delivery date input, `YYYY-MM-DD`.
    pub min_delivery_date: String,
    /// Banner above the form, e.g. when the lead endpoint failed.
    pub notice: Option<String>,
}

impl QuoteFormView {
    #[must_use]
    pub fn new(draft: QuoteDraft, errors: ValidationErrors, path: SubmitPath) -> Self {
        Self {
            draft,
            errors,
            path,
            sizes: DumpsterSize::ALL,
            waste_types: WasteType::ALL,
            min_delivery_date: earliest_delivery_date(Utc::now())
                .format("%Y-%m-%d")
                .to_string(),
            notice: None,
        }
    }

    #[must_use]
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.has(field)
    }

    /// Error message for a field, empty when there is none.
    #[must_use]
    pub fn error(&self, field: &str) -> &str {
        self.errors.for_field(field).unwrap_or_default()
    }

    #[must_use]
    pub fn size_selected(&self, size: &DumpsterSize) -> bool {
        self.draft.dumpster_size == size.key()
    }

    #[must_use]
    pub fn waste_selected(&self, waste: &WasteType) -> bool {
        self.draft.waste_type == waste.key()
    }

    /// Whether the form also offers "Book now".
    #[must_use]
    pub fn offers_booking(&self) -> bool {
        self.path == SubmitPath::Lead
    }
}

/// Quote page template.
#[derive(Template, WebTemplate)]
#[template(path = "quote/page.html")]
pub struct QuotePageTemplate {
    pub chrome: Chrome,
    pub form: QuoteFormView,
}

/// Lead received template.
#[derive(Template, WebTemplate)]
#[template(path = "quote/thanks.html")]
pub struct QuoteThanksTemplate {
    pub chrome: Chrome,
}

/// Display the quote form.
#[instrument(skip(state, nonce))]
pub async fn page(State(state): State<AppState>, nonce: CspNonce) -> impl IntoResponse {
    QuotePageTemplate {
        chrome: Chrome::new(&state, nonce, "/quote"),
        form: QuoteFormView::new(QuoteDraft::default(), ValidationErrors::default(), SubmitPath::Lead),
    }
}

/// Submit a plain quote request.
///
/// The lead endpoint is called inline so the visitor sees whether it worked.
/// On failure the form comes back with every value kept.
#[instrument(skip(state, nonce, draft))]
pub async fn submit(
    State(state): State<AppState>,
    nonce: CspNonce,
    Form(draft): Form<QuoteDraft>,
) -> Response {
    if draft.honeypot_tripped() {
        tracing::warn!(email = %draft.email, "Quote form honeypot filled in");
    }

    let rerender = |draft: QuoteDraft, errors: ValidationErrors, status: StatusCode, notice: Option<&str>| {
        let mut form = QuoteFormView::new(draft, errors, SubmitPath::Lead);
        form.notice = notice.map(str::to_string);
        let page = QuotePageTemplate {
            chrome: Chrome::new(&state, nonce.clone(), "/quote"),
            form,
        };
        (status, page).into_response()
    };

    let lead = match draft.validate_lead() {
        Ok(lead) => lead,
        Err(errors) => {
            return rerender(draft, errors, StatusCode::UNPROCESSABLE_ENTITY, None);
        }
    };

    let Some(leads) = state.leads() else {
        tracing::error!("Lead endpoint not configured");
        return rerender(
            draft,
            ValidationErrors::default(),
            StatusCode::SERVICE_UNAVAILABLE,
            Some("Online quotes are unavailable right now. Please call us."),
        );
    };

    if let Err(e) = leads.submit(&lead).await {
        tracing::warn!(email = %lead.email, error = %e, "Lead submission failed");
        return rerender(
            draft,
            ValidationErrors::default(),
            StatusCode::BAD_GATEWAY,
            Some("We couldn't send your request. Please try again."),
        );
    }

    tracing::info!(email = %lead.email, "Quote request received");
    add_breadcrumb("quote", "Lead submitted", Some(&[("email", lead.email.as_str())]));

    if lead.details.sms_consent {
        state.tasks().enqueue(BestEffortTask::SendSms(SmsNotification::quote_received(
            &lead,
            &state.config().business.name,
        )));
    }

    Redirect::to("/quote/thanks").into_response()
}

/// Hand the quote form to checkout.
///
/// Nothing is validated here; checkout shows the form again with errors, or
/// goes straight to payment when everything checks out.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session, draft))]
pub async fn book(session: Session, Form(draft): Form<QuoteDraft>) -> Result<Redirect> {
    if draft.honeypot_tripped() {
        tracing::warn!(email = %draft.email, "Quote form honeypot filled in");
    }

    VisitorSession::new(&session).hand_off(&draft).await?;
    Ok(Redirect::to("/checkout"))
}

/// Lead received page.
#[instrument(skip(state, nonce))]
pub async fn thanks(State(state): State<AppState>, nonce: CspNonce) -> impl IntoResponse {
    QuoteThanksTemplate {
        chrome: Chrome::new(&state, nonce, "/quote/thanks"),
    }
}
