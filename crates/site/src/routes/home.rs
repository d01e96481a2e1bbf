//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use curbside_core::pricing::pricing_table;
use curbside_core::{DumpsterSize, PricingEntry, RentalDays};
use tracing::instrument;

use crate::content::{CityPage, Guide, Service};
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::Chrome;
use crate::state::AppState;

/// Number of guides featured on the home page.
const FEATURED_GUIDES: usize = 3;

/// The price estimator widget.
#[derive(Clone)]
pub struct EstimatorView {
    pub sizes: [DumpsterSize; 5],
    pub selected: DumpsterSize,
    pub days: u32,
    pub min_days: u32,
    pub max_days: u32,
    /// Price for the preselected size and days, before any script runs.
    pub price: String,
}

impl Default for EstimatorView {
    fn default() -> Self {
        let selected = DumpsterSize::Twenty;
        let days = RentalDays::WEEK;
        Self {
            sizes: DumpsterSize::ALL,
            selected,
            days: days.get(),
            min_days: RentalDays::MIN,
            max_days: RentalDays::MAX,
            price: selected.price(days).display(),
        }
    }
}

impl EstimatorView {
    #[must_use]
    pub fn is_selected(&self, size: &DumpsterSize) -> bool {
        *size == self.selected
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub estimator: EstimatorView,
    pub pricing: Vec<PricingEntry>,
    pub cities: Vec<CityPage>,
    pub guides: Vec<Guide>,
}

/// Display the home page.
#[instrument(skip(state, nonce))]
pub async fn home(State(state): State<AppState>, nonce: CspNonce) -> impl IntoResponse {
    let content = state.content();

    HomeTemplate {
        chrome: Chrome::new(&state, nonce, "/"),
        estimator: EstimatorView::default(),
        pricing: pricing_table().collect(),
        cities: content.cities_for(Service::Dumpster).cloned().collect(),
        guides: content.guides().take(FEATURED_GUIDES).cloned().collect(),
    }
}
