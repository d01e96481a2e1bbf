//! Service-area route handlers.
//!
//! Every city, dumpster or roofing, renders through the one city template.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use curbside_core::pricing::pricing_table;
use curbside_core::{PricingEntry, QuoteDraft, SubmitPath, ValidationErrors};
use tracing::instrument;

use crate::content::{CityPage, Service};
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::Chrome;
use crate::routes::quote::QuoteFormView;
use crate::state::AppState;

/// City page template.
#[derive(Template, WebTemplate)]
#[template(path = "city.html")]
pub struct CityTemplate {
    pub chrome: Chrome,
    pub city: CityPage,
    pub nearby: Vec<CityPage>,
    pub pricing: Vec<PricingEntry>,
    pub form: QuoteFormView,
}

/// City listing template.
#[derive(Template, WebTemplate)]
#[template(path = "cities.html")]
pub struct CitiesTemplate {
    pub chrome: Chrome,
    pub cities: Vec<CityPage>,
}

/// List every dumpster rental city.
#[instrument(skip(state, nonce))]
pub async fn index(State(state): State<AppState>, nonce: CspNonce) -> impl IntoResponse {
    CitiesTemplate {
        chrome: Chrome::new(&state, nonce, Service::Dumpster.path_prefix()),
        cities: state
            .content()
            .cities_for(Service::Dumpster)
            .cloned()
            .collect(),
    }
}

fn render(state: &AppState, nonce: CspNonce, service: Service, slug: &str) -> Result<CityTemplate> {
    let content = state.content();
    let city = content.city_for(service, slug)?;

    Ok(CityTemplate {
        chrome: Chrome::new(state, nonce, &city.path()),
        city: city.clone(),
        nearby: content.nearby(city).into_iter().cloned().collect(),
        pricing: pricing_table().collect(),
        form: QuoteFormView::new(
            QuoteDraft::default(),
            ValidationErrors::default(),
            SubmitPath::Lead,
        ),
    })
}

/// Display a dumpster rental city page.
///
/// # Errors
///
/// Returns 404 for an unknown city.
#[instrument(skip(state, nonce))]
pub async fn show_dumpster(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    nonce: CspNonce,
) -> Result<impl IntoResponse> {
    render(&state, nonce, Service::Dumpster, &slug)
}

/// Display a roofing city page.
///
/// # Errors
///
/// Returns 404 for an unknown city or one without roofing service.
#[instrument(skip(state, nonce))]
pub async fn show_roofing(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    nonce: CspNonce,
) -> Result<impl IntoResponse> {
    render(&state, nonce, Service::Roofing, &slug)
}
