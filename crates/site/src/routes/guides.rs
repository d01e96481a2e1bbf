//! Guide and FAQ route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::content::{FaqEntry, Guide};
use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::Chrome;
use crate::state::AppState;

/// Number of other guides linked under a guide.
const RELATED_GUIDES: usize = 3;

#[derive(Template, WebTemplate)]
#[template(path = "guides/index.html")]
pub struct GuidesIndexTemplate {
    pub chrome: Chrome,
    pub guides: Vec<Guide>,
}

#[derive(Template, WebTemplate)]
#[template(path = "guides/show.html")]
pub struct GuideShowTemplate {
    pub chrome: Chrome,
    pub guide: Guide,
    pub related: Vec<Guide>,
}

#[derive(Template, WebTemplate)]
#[template(path = "faq.html")]
pub struct FaqTemplate {
    pub chrome: Chrome,
    pub title: String,
    pub entries: Vec<FaqEntry>,
}

/// Display every guide, newest first.
#[instrument(skip(state, nonce))]
pub async fn index(State(state): State<AppState>, nonce: CspNonce) -> impl IntoResponse {
    GuidesIndexTemplate {
        chrome: Chrome::new(&state, nonce, "/guides"),
        guides: state.content().guides().cloned().collect(),
    }
}

/// Display a guide by slug.
///
/// # Errors
///
/// Returns 404 if the guide doesn't exist.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    nonce: CspNonce,
) -> Result<impl IntoResponse> {
    let content = state.content();
    let guide = content.guide(&slug)?;
    let related = content
        .guides()
        .filter(|g| g.slug != guide.slug)
        .take(RELATED_GUIDES)
        .cloned()
        .collect();

    Ok(GuideShowTemplate {
        chrome: Chrome::new(&state, nonce, &guide.path()),
        guide: guide.clone(),
        related,
    })
}

/// Display the FAQ.
#[instrument(skip(state, nonce))]
pub async fn faq(State(state): State<AppState>, nonce: CspNonce) -> impl IntoResponse {
    let content = state.content();
    FaqTemplate {
        chrome: Chrome::new(&state, nonce, "/faq"),
        title: content.faq_title().to_string(),
        entries: content.faqs().to_vec(),
    }
}
