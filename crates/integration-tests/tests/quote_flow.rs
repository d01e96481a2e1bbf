//! Plain quote requests and the hand-off to checkout.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use curbside_integration_tests::{
    LeadEndpoint, TestApp, as_pairs, body_text, complete_quote, delivery_in, location,
};
use curbside_site::tasks::BestEffortTask;

fn lead_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("first_name", "Pat"),
        ("email", "pat@example.com"),
        ("phone", "(281) 555-0199"),
        ("dumpster_size", "15"),
        ("additional_info", "Gate code 4411"),
    ]
}

#[tokio::test]
async fn test_quote_page_renders_form() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/quote").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(r#"name="email""#));
    assert!(html.contains(r#"formaction="/quote/book""#));
    // Honeypot fields are rendered but hidden
    assert!(html.contains(r#"name="company_website""#));
}

#[tokio::test]
async fn test_invalid_quote_keeps_values() {
    let mut app = TestApp::spawn().await;
    let response = app
        .post_form(
            "/quote",
            &[("first_name", "Pat"), ("email", "pat.example.com"), ("phone", "")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(response).await;
    assert!(html.contains("Please fix the highlighted fields."));
    assert!(html.contains(r#"value="Pat""#));
    assert!(html.contains(r#"value="pat.example.com""#));
    assert!(html.contains("This field is required"));
    assert!(app.upstream.leads().is_empty());
}

#[tokio::test]
async fn test_valid_quote_reaches_lead_endpoint() {
    let mut app = TestApp::spawn().await;
    let response = app.post_form("/quote", &lead_form()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/quote/thanks");

    let leads = app.upstream.leads();
    assert_eq!(leads.len(), 1);
    let fields = &leads[0];
    assert!(fields.contains(&("email".to_string(), "pat@example.com".to_string())));
    assert!(fields.contains(&("phone".to_string(), "2815550199".to_string())));
    assert!(fields.contains(&("additional_info".to_string(), "Gate code 4411".to_string())));

    // No consent, no text message
    assert!(app.queued().is_empty());

    let thanks = app.get("/quote/thanks").await;
    assert_eq!(thanks.status(), StatusCode::OK);
    assert!(body_text(thanks).await.contains("we got your request"));
}

#[tokio::test]
async fn test_sms_consent_queues_text() {
    let mut app = TestApp::spawn().await;
    let mut form = lead_form();
    form.push(("sms_consent", "on"));

    let response = app.post_form("/quote", &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let queued = app.queued();
    assert_eq!(queued.len(), 1);
    match &queued[0] {
        BestEffortTask::SendSms(sms) => {
            assert_eq!(sms.phone, "+12815550199");
            assert!(sms.transcript.contains("email: pat@example.com"));
        }
        other => panic!("unexpected task {}", other.kind()),
    }
}

#[tokio::test]
async fn test_failing_lead_endpoint_keeps_form() {
    let mut app = TestApp::with_leads(LeadEndpoint::Failing).await;
    let response = app.post_form("/quote", &lead_form()).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let html = body_text(response).await;
    assert!(html.contains("Please try again."));
    assert!(html.contains(r#"value="pat@example.com""#));
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn test_missing_lead_endpoint_is_unavailable() {
    let mut app = TestApp::with_leads(LeadEndpoint::Missing).await;
    let response = app.post_form("/quote", &lead_form()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_text(response).await.contains("Online quotes are unavailable right now."));
}

#[tokio::test]
async fn test_booking_complete_quote_goes_to_payment() {
    let mut app = TestApp::spawn().await;
    let form = complete_quote(&delivery_in(5));

    let response = app.post_form("/quote/book", &as_pairs(&form)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/checkout");

    let response = app.get("/checkout").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Pay $375.00"));
    assert!(html.contains(r#"data-publishable-key="pk_test_51Nc8""#));

    // The order is announced once, on the way in
    let queued = app.queued();
    assert_eq!(queued.len(), 1);
    assert!(matches!(queued[0], BestEffortTask::SubmitLead(_)));

    // Reloading shows the same step without announcing again
    let html = body_text(app.get("/checkout").await).await;
    assert!(html.contains("Pay $375.00"));
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn test_booking_partial_quote_prefills_checkout() {
    let mut app = TestApp::spawn().await;
    let response = app
        .post_form(
            "/quote/book",
            &[("email", "pat@example.com"), ("dumpster_size", "30")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.get("/checkout").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"value="pat@example.com""#));
    assert!(html.contains(r#"<option value="30" selected>"#));
    assert!(!html.contains("Pay $"));
    assert!(app.queued().is_empty());
}
