//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Home page with the price estimator
//! GET  /health                     - Health check
//!
//! # Service areas
//! GET  /dumpster-rental            - Every dumpster rental city
//! GET  /dumpster-rental/{slug}     - City page
//! GET  /roofing/{slug}             - Roofing city page (same template)
//!
//! # Content
//! GET  /guides                     - Guide listing
//! GET  /guides/{slug}              - Guide
//! GET  /faq                        - FAQ
//!
//! # Quotes
//! GET  /quote                      - Quote form
//! POST /quote                      - Submit a quote request (lead)
//! POST /quote/book                 - Hand the quote form to checkout
//! GET  /quote/thanks               - Lead received
//! GET  /api/price                  - Estimator price (JSON)
//! POST /estimate                   - Hand the estimate to checkout
//!
//! # Checkout
//! GET  /checkout                   - Form or payment step
//! POST /checkout                   - Submit the checkout form
//! POST /checkout/back              - Payment step back to the form
//! POST /api/payment-intents        - Client secret for the priced order
//! POST /api/order-confirmation     - Queue the confirmation email
//! GET  /order-confirmation         - After the payment widget redirects
//!
//! # SEO
//! GET  /sitemap.xml
//! GET  /robots.txt
//! ```
//!
//! Form posts share one rate limiter; payment intent creation has its own.

pub mod checkout;
pub mod cities;
pub mod estimate;
pub mod guides;
pub mod home;
pub mod payments;
pub mod quote;
pub mod seo;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit::RateLimiterLayer;
use crate::middleware::{CspNonce, form_rate_limiter, payment_rate_limiter};
use crate::state::AppState;

/// Values every page layout needs.
#[derive(Clone)]
pub struct Chrome {
    pub business_name: String,
    pub business_phone: String,
    pub ga4_measurement_id: Option<String>,
    /// CSP nonce for inline scripts.
    pub nonce: String,
    pub canonical_url: String,
}

impl Chrome {
    /// Layout values for the page at `path`.
    #[must_use]
    pub fn new(state: &AppState, CspNonce(nonce): CspNonce, path: &str) -> Self {
        let config = state.config();
        Self {
            business_name: config.business.name.clone(),
            business_phone: config.business.phone.clone(),
            ga4_measurement_id: config.analytics.ga4_measurement_id.clone(),
            nonce,
            canonical_url: config.absolute_url(path),
        }
    }
}

/// Create the quote routes router.
pub fn quote_routes(limiter: RateLimiterLayer) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(quote::page).merge(post(quote::submit).layer(limiter.clone())),
        )
        .route("/book", post(quote::book).layer(limiter))
        .route("/thanks", get(quote::thanks))
}

/// Create the checkout routes router.
pub fn checkout_routes(limiter: RateLimiterLayer) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(checkout::show).merge(post(checkout::submit).layer(limiter.clone())),
        )
        .route("/back", post(checkout::back).layer(limiter))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/price", get(estimate::price))
        .route(
            "/payment-intents",
            post(payments::create_intent).layer(payment_rate_limiter()),
        )
        .route("/order-confirmation", post(payments::confirm_order))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    let forms = form_rate_limiter();
    Router::new()
        .route("/", get(home::home))
        .route("/dumpster-rental", get(cities::index))
        .route("/dumpster-rental/{slug}", get(cities::show_dumpster))
        .route("/roofing/{slug}", get(cities::show_roofing))
        .route("/guides", get(guides::index))
        .route("/guides/{slug}", get(guides::show))
        .route("/faq", get(guides::faq))
        .nest("/quote", quote_routes(forms.clone()))
        .route("/estimate", post(estimate::hand_off).layer(forms.clone()))
        .nest("/checkout", checkout_routes(forms))
        .nest("/api", api_routes())
        .route("/order-confirmation", get(payments::confirmation_page))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/robots.txt", get(seo::robots))
}
