//! Integration tests for Curbside.
//!
//! Each test builds the full site router in-process and drives it with
//! `tower::ServiceExt::oneshot`, carrying the session cookie between calls
//! the way a browser would. The lead endpoint and the payment processor are
//! replaced by a small axum server on a random local port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p curbside-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `site_pages` - Marketing pages, SEO files, static assets and the price API
//! - `quote_flow` - Plain quote requests and the hand-off to checkout
//! - `checkout_flow` - Checkout form, payment intents and order confirmation

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use curbside_site::config::{AnalyticsConfig, BusinessConfig, PaymentsConfig, SiteConfig};
use curbside_site::content::ContentRepository;
use curbside_site::state::AppState;
use curbside_site::tasks::{BestEffortTask, TaskQueue};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;
use url::Url;

/// Form fields as the lead endpoint received them.
pub type LeadFields = Vec<(String, String)>;

/// What the fake upstream services have seen.
#[derive(Clone, Default)]
pub struct Upstream {
    pub leads: Arc<Mutex<Vec<LeadFields>>>,
    intents_created: Arc<AtomicUsize>,
}

impl Upstream {
    /// Leads received so far.
    #[must_use]
    pub fn leads(&self) -> Vec<LeadFields> {
        self.leads.lock().unwrap().clone()
    }

    /// Number of payment intents the processor minted.
    #[must_use]
    pub fn intents_created(&self) -> usize {
        self.intents_created.load(Ordering::SeqCst)
    }
}

async fn accept_lead(State(upstream): State<Upstream>, Form(fields): Form<LeadFields>) -> StatusCode {
    upstream.leads.lock().unwrap().push(fields);
    StatusCode::OK
}

async fn reject_lead() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "lead store unavailable")
}

async fn create_intent(
    State(upstream): State<Upstream>,
    Form(params): Form<Vec<(String, String)>>,
) -> Json<Value> {
    let n = upstream.intents_created.fetch_add(1, Ordering::SeqCst);
    let amount: i64 = params
        .iter()
        .find(|(key, _)| key == "amount")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or_default();
    Json(json!({
        "id": format!("pi_test{n}"),
        "client_secret": format!("pi_test{n}_secret_abc"),
        "amount": amount,
    }))
}

/// Intents whose id starts with `pi_declined` come back unpaid.
async fn retrieve_intent(Path(id): Path<String>) -> Json<Value> {
    let status = if id.starts_with("pi_declined") {
        "requires_payment_method"
    } else {
        "succeeded"
    };
    Json(json!({ "id": id, "amount": 37_500, "status": status }))
}

/// How the lead endpoint behaves in a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadEndpoint {
    Ok,
    Failing,
    Missing,
}

/// The site under test plus handles on everything around it.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    pub upstream: Upstream,
    pub tasks: mpsc::Receiver<BestEffortTask>,
}

impl TestApp {
    /// Site with a working lead endpoint.
    pub async fn spawn() -> Self {
        Self::with_leads(LeadEndpoint::Ok).await
    }

    pub async fn with_leads(leads: LeadEndpoint) -> Self {
        let upstream = Upstream::default();
        let fake = Router::new()
            .route("/leads", post(accept_lead))
            .route("/leads-down", post(reject_lead))
            .route("/v1/payment_intents", post(create_intent))
            .route("/v1/payment_intents/{id}", get(retrieve_intent))
            .with_state(upstream.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, fake).await.unwrap() });

        let leads_webhook_url = match leads {
            LeadEndpoint::Ok => Some(Url::parse(&format!("{base}/leads")).unwrap()),
            LeadEndpoint::Failing => Some(Url::parse(&format!("{base}/leads-down")).unwrap()),
            LeadEndpoint::Missing => None,
        };

        let config = test_config(base, leads_webhook_url);
        let content = ContentRepository::embedded().unwrap();
        let (queue, tasks) = TaskQueue::new(config.task_queue_capacity);
        let router = curbside_site::app(AppState::new(config, content, queue));

        Self {
            router,
            cookie: None,
            upstream,
            tasks,
        }
    }

    /// Send a request, keeping whatever session cookie the site sets.
    pub async fn send(&mut self, mut request: Request<Body>) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&mut self, uri: &str, body: &Value) -> Response {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Everything queued for the background worker so far.
    pub fn queued(&mut self) -> Vec<BestEffortTask> {
        let mut tasks = Vec::new();
        while let Ok(task) = self.tasks.try_recv() {
            tasks.push(task);
        }
        tasks
    }
}

fn test_config(processor_base: String, leads_webhook_url: Option<Url>) -> SiteConfig {
    SiteConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "https://curbside.test".to_string(),
        business: BusinessConfig {
            name: "Curbside Dumpsters".to_string(),
            phone: "(713) 555-0100".to_string(),
        },
        payments: PaymentsConfig {
            api_base: processor_base,
            secret_key: SecretString::from("sk_test_51Nc8XyZ2eZvKYlo2C0aBcDeF"),
            publishable_key: "pk_test_51Nc8".to_string(),
        },
        leads_webhook_url,
        sms_webhook_url: None,
        email: None,
        analytics: AnalyticsConfig {
            ga4_measurement_id: None,
        },
        sentry_dsn: None,
        sentry_environment: None,
        task_queue_capacity: 16,
        json_logs: false,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../site/static")),
    }
}

/// Read a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` of a redirect.
#[must_use]
pub fn location(response: &Response) -> &str {
    header_str(response.headers(), header::LOCATION.as_str())
}

#[must_use]
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// A delivery date comfortably past the 48 hour cutoff.
#[must_use]
pub fn delivery_in(days: i64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// A complete checkout form for a 20 yard week.
#[must_use]
pub fn complete_quote(delivery_date: &str) -> Vec<(&'static str, String)> {
    vec![
        ("first_name", "Pat".to_string()),
        ("last_name", "Rivera".to_string()),
        ("email", "pat@example.com".to_string()),
        ("phone", "(281) 555-0199".to_string()),
        ("zip_code", "77002".to_string()),
        ("waste_type", "construction".to_string()),
        ("dumpster_size", "20".to_string()),
        ("delivery_date", delivery_date.to_string()),
        ("pickup_date", String::new()),
        ("rental_days", "7".to_string()),
        ("additional_info", "Driveway on the left".to_string()),
    ]
}

/// Borrow owned form fields for [`TestApp::post_form`].
#[must_use]
pub fn as_pairs<'a>(fields: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
}
