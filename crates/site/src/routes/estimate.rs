//! Price estimator route handlers.

use axum::{
    Form, Json,
    extract::Query,
    response::Redirect,
};
use curbside_core::pricing::FALLBACK_SIZE;
use curbside_core::{DumpsterSize, QuoteDraft, RentalDays};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::VisitorSession;

/// Estimator input, from the query string or the estimator form.
#[derive(Debug, Deserialize)]
pub struct EstimateParams {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub days: String,
}

impl EstimateParams {
    /// Unknown sizes are quoted as the smallest standard dumpster.
    fn parse(&self) -> Result<(DumpsterSize, RentalDays)> {
        let size = DumpsterSize::from_key(&self.size).unwrap_or(FALLBACK_SIZE);
        let days = RentalDays::parse(&self.days).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok((size, days))
    }
}

/// Estimator price.
#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub size: &'static str,
    pub label: &'static str,
    pub days: u32,
    /// Whole dollars.
    pub amount: String,
    pub display: String,
    pub cents: i64,
}

/// Price a size and rental length.
///
/// GET /api/price?size=20&days=14
///
/// # Errors
///
/// Returns 400 if `days` is not a bookable rental length.
#[instrument]
pub async fn price(Query(params): Query<EstimateParams>) -> Result<Json<PriceResponse>> {
    let (size, days) = params.parse()?;
    let price = size.price(days);

    Ok(Json(PriceResponse {
        size: size.key(),
        label: size.label(),
        days: days.get(),
        amount: price.amount().normalize().to_string(),
        display: price.display(),
        cents: price.to_cents(),
    }))
}

/// Hand an estimate to checkout as a partial quote.
///
/// POST /estimate
///
/// # Errors
///
/// Returns 400 for an invalid rental length, or an error if the session
/// store fails.
#[instrument(skip(session))]
pub async fn hand_off(session: Session, Form(params): Form<EstimateParams>) -> Result<Redirect> {
    let (size, days) = params.parse()?;
    VisitorSession::new(&session)
        .hand_off(&QuoteDraft::from_estimate(size, days))
        .await?;

    tracing::info!(size = size.key(), days = days.get(), "Estimate handed to checkout");
    Ok(Redirect::to("/checkout"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(size: &str, days: &str) -> EstimateParams {
        EstimateParams {
            size: size.to_string(),
            days: days.to_string(),
        }
    }

    #[tokio::test]
    async fn test_price_for_known_size() {
        let Json(body) = price(Query(params("20", "7"))).await.unwrap();
        assert_eq!(body.size, "20");
        assert_eq!(body.amount, "375");
        assert_eq!(body.cents, 37_500);
    }

    #[tokio::test]
    async fn test_unknown_size_falls_back() {
        let Json(body) = price(Query(params("40", "7"))).await.unwrap();
        assert_eq!(body.size, "10");
        assert_eq!(body.amount, "299");
    }

    #[tokio::test]
    async fn test_invalid_days_rejected() {
        for days in ["0", "abc", "400", ""] {
            let err = price(Query(params("20", days))).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "days={days}");
        }
    }
}
