//! Payment processor client.
//!
//! Creates payment intents for priced orders and looks them up again for the
//! confirmation page. Card entry happens entirely inside the processor's hosted
//! widget; this client only ever sees amounts, metadata and the client secret.
//!
//! Client secrets are cached per order fingerprint for 30 minutes so that
//! reloading the payment step reuses the intent instead of minting a new one.
//! Any change to the order yields a new fingerprint, a new intent and a new
//! secret, which makes the browser remount the widget. A paid order is
//! forgotten so that booking it again starts a fresh intent.

use std::sync::Arc;
use std::time::Duration;

use curbside_core::{ComputedOrder, PaymentIntentRef, PaymentRefError};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::PaymentsConfig;

const INTENT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
const INTENT_CACHE_CAPACITY: u64 = 10_000;

/// Errors from the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Processor rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Processor returned an id we cannot use.
    #[error("Invalid payment reference: {0}")]
    InvalidReference(#[from] PaymentRefError),
}

/// A created payment intent, as handed to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntent {
    #[serde(rename = "payment_intent")]
    pub id: PaymentIntentRef,
    pub client_secret: String,
    /// Amount in cents.
    pub amount: i64,
}

/// Current state of an intent, for the confirmation page.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentStatus {
    pub id: String,
    pub amount: i64,
    pub status: String,
}

impl PaymentIntentStatus {
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }

    /// Still being processed by the card network or bank.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.status == "processing"
    }
}

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
    amount: i64,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Payment processor API client.
#[derive(Clone)]
pub struct PaymentClient {
    inner: Arc<PaymentClientInner>,
}

struct PaymentClientInner {
    client: reqwest::Client,
    api_base: String,
    secret_key: SecretString,
    publishable_key: String,
    intents: Cache<String, PaymentIntent>,
}

impl PaymentClient {
    /// Create a new payment client.
    #[must_use]
    pub fn new(config: &PaymentsConfig) -> Self {
        let intents = Cache::builder()
            .max_capacity(INTENT_CACHE_CAPACITY)
            .time_to_live(INTENT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(PaymentClientInner {
                client: reqwest::Client::new(),
                api_base: config.api_base.clone(),
                secret_key: config.secret_key.clone(),
                publishable_key: config.publishable_key.clone(),
                intents,
            }),
        }
    }

    /// Publishable key for the browser-side widget.
    #[must_use]
    pub fn publishable_key(&self) -> &str {
        &self.inner.publishable_key
    }

    /// Get or create the payment intent for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor cannot be reached or rejects the
    /// request.
    #[instrument(skip(self, order), fields(size = %order.size(), amount = order.amount.to_cents()))]
    pub async fn intent_for(&self, order: &ComputedOrder) -> Result<PaymentIntent, PaymentError> {
        let key = order.fingerprint();
        if let Some(intent) = self.inner.intents.get(&key).await {
            debug!(payment_intent = %intent.id, "Reusing cached payment intent");
            return Ok(intent);
        }

        let intent = self.create_intent(order).await?;
        self.inner.intents.insert(key, intent.clone()).await;
        Ok(intent)
    }

    /// Drop the cached intent for a paid order.
    ///
    /// Booking the same order again must not hand out the secret of an
    /// intent that has already been paid.
    pub async fn forget(&self, order: &ComputedOrder) {
        self.inner.intents.invalidate(&order.fingerprint()).await;
    }

    async fn create_intent(&self, order: &ComputedOrder) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.inner.api_base);
        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(self.inner.secret_key.expose_secret())
            .form(&intent_params(order))
            .send()
            .await?;

        let body: IntentResponse = read_json(response).await?;
        let client_secret = body
            .client_secret
            .ok_or_else(|| PaymentError::Parse("intent has no client_secret".to_string()))?;
        let id = PaymentIntentRef::parse(&body.id)?;

        tracing::info!(payment_intent = %id, amount = body.amount, "Payment intent created");

        Ok(PaymentIntent {
            id,
            client_secret,
            amount: body.amount,
        })
    }

    /// Look up an intent's current status.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor cannot be reached or does not know
    /// the intent.
    #[instrument(skip(self), fields(payment_intent = %id))]
    pub async fn retrieve(&self, id: &PaymentIntentRef) -> Result<PaymentIntentStatus, PaymentError> {
        let url = format!("{}/v1/payment_intents/{}", self.inner.api_base, id.as_str());
        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(self.inner.secret_key.expose_secret())
            .send()
            .await?;

        read_json(response).await
    }
}

/// Form fields for intent creation.
fn intent_params(order: &ComputedOrder) -> Vec<(&'static str, String)> {
    let request = &order.request;
    let mut params = vec![
        ("amount", order.amount.to_cents().to_string()),
        ("currency", order.amount.currency_code().code().to_string()),
        ("automatic_payment_methods[enabled]", "true".to_string()),
        ("receipt_email", request.email.to_string()),
        ("description", order.summary()),
        ("metadata[dumpster_size]", request.dumpster_size.key().to_string()),
        ("metadata[rental_days]", request.rental_days.to_string()),
        ("metadata[delivery_date]", request.delivery_date.to_string()),
        ("metadata[customer_name]", request.full_name()),
        ("metadata[phone]", request.phone.e164()),
        ("metadata[zip_code]", request.zip_code.to_string()),
        ("metadata[waste_type]", request.waste_type.key().to_string()),
    ];
    if let Some(pickup) = request.pickup_date {
        params.push(("metadata[pickup_date]", pickup.to_string()));
    }
    params
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PaymentError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| text.chars().take(200).collect());
        tracing::warn!(status = %status, message = %message, "Payment processor returned an error");
        return Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| PaymentError::Parse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Form, Json, Router};
    use chrono::{TimeZone, Utc};
    use curbside_core::{Checkout, QuoteDraft};

    use super::*;

    fn order(rental_days: &str) -> ComputedOrder {
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
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        Checkout::rehydrate(draft, now).order().unwrap().clone()
    }

    async fn create(
        State(calls): State<Arc<AtomicUsize>>,
        Form(params): Form<Vec<(String, String)>>,
    ) -> Json<serde_json::Value> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        let amount: i64 = params
            .iter()
            .find(|(k, _)| k == "amount")
            .map(|(_, v)| v.parse().unwrap())
            .unwrap();
        Json(serde_json::json!({
            "id": format!("pi_test{n}"),
            "client_secret": format!("pi_test{n}_secret_abc"),
            "amount": amount,
        }))
    }

    async fn missing() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": {"message": "No such payment_intent"}})),
        )
    }

    async fn spawn_processor() -> (PaymentClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/v1/payment_intents", post(create))
            .route("/v1/payment_intents/{id}", get(missing))
            .with_state(Arc::clone(&calls));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let client = PaymentClient::new(&PaymentsConfig {
            api_base: format!("http://{addr}"),
            secret_key: SecretString::from("sk_test_51Nc8XyZ2eZvKYlo2C0aBcDeF"),
            publishable_key: "pk_test_51Nc8".to_string(),
        });
        (client, calls)
    }

    #[test]
    fn test_intent_params_carry_amount_in_cents() {
        let params = intent_params(&order("7"));
        assert!(params.contains(&("amount", "37500".to_string())));
        assert!(params.contains(&("currency", "usd".to_string())));
        assert!(params.contains(&("metadata[phone]", "+17135550142".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "metadata[pickup_date]"));
    }

    #[tokio::test]
    async fn test_same_order_reuses_intent() {
        let (client, calls) = spawn_processor().await;
        let first = client.intent_for(&order("7")).await.unwrap();
        let second = client.intent_for(&order("7")).await.unwrap();
        assert_eq!(first.client_secret, second.client_secret);
        assert_eq!(first.amount, 37_500);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_order_gets_new_secret() {
        let (client, calls) = spawn_processor().await;
        let week = client.intent_for(&order("7")).await.unwrap();
        let day = client.intent_for(&order("1")).await.unwrap();
        assert_ne!(week.client_secret, day.client_secret);
        assert_eq!(day.amount, 26_300);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forgotten_order_gets_new_intent() {
        let (client, calls) = spawn_processor().await;
        let paid = client.intent_for(&order("7")).await.unwrap();
        client.forget(&order("7")).await;

        let again = client.intent_for(&order("7")).await.unwrap();
        assert_ne!(paid.client_secret, again.client_secret);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_api_error_message_is_extracted() {
        let (client, _) = spawn_processor().await;
        let id = PaymentIntentRef::parse("pi_unknown").unwrap();
        let err = client.retrieve(&id).await.unwrap_err();
        match err {
            PaymentError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "No such payment_intent");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
