//! Marketing pages, SEO files, static assets and the price API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use curbside_integration_tests::{TestApp, body_json, body_text, header_str};

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_home_page_has_estimator_and_security_headers() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let csp = header_str(response.headers(), "content-security-policy").to_string();
    assert!(csp.contains("nonce-"), "missing nonce in CSP: {csp}");
    assert_eq!(header_str(response.headers(), "cache-control"), "no-store, max-age=0");

    let html = body_text(response).await;
    assert!(html.contains("Instant price"));
    assert!(html.contains("$375.00"));
    assert!(html.contains("Curbside Dumpsters"));
}

#[tokio::test]
async fn test_city_pages() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/dumpster-rental/houston").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Dumpster Rental in Houston, TX"));
    assert!(html.contains(r#"rel="canonical" href="https://curbside.test/dumpster-rental/houston""#));

    assert_eq!(app.get("/roofing/houston").await.status(), StatusCode::OK);
    assert_eq!(app.get("/dumpster-rental").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_pages_are_not_found() {
    let mut app = TestApp::spawn().await;
    // Pearland only has a dumpster page
    assert_eq!(app.get("/roofing/pearland").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/dumpster-rental/atlantis").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/guides/no-such-guide").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/wp-login.php").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_guides_and_faq() {
    let mut app = TestApp::spawn().await;

    let index = body_text(app.get("/guides").await).await;
    assert!(index.contains("What Size Dumpster Do I Need?"));

    let response = app.get("/guides/what-size-dumpster").await;
    assert_eq!(response.status(), StatusCode::OK);
    let guide = body_text(response).await;
    assert!(guide.contains("What Size Dumpster Do I Need?"));
    assert!(!guide.contains("{{price"), "price placeholder left in guide");

    let response = app.get("/faq").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("How long can I keep the dumpster?"));
}

#[tokio::test]
async fn test_sitemap_lists_pages_cities_and_guides() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_str(response.headers(), "content-type").starts_with("application/xml"));

    let xml = body_text(response).await;
    assert!(xml.contains("<loc>https://curbside.test/</loc>"));
    assert!(xml.contains("<loc>https://curbside.test/dumpster-rental/houston</loc>"));
    assert!(xml.contains("<loc>https://curbside.test/roofing/katy</loc>"));
    assert!(xml.contains("<loc>https://curbside.test/guides/what-size-dumpster</loc>"));
    assert!(xml.contains("<lastmod>2025-09-02</lastmod>"));
    assert!(!xml.contains("/checkout"));
}

#[tokio::test]
async fn test_robots_blocks_checkout() {
    let mut app = TestApp::spawn().await;
    let body = body_text(app.get("/robots.txt").await).await;
    assert!(body.contains("Disallow: /checkout"));
    assert!(body.contains("Disallow: /api/"));
    assert!(body.contains("Sitemap: https://curbside.test/sitemap.xml"));
}

#[tokio::test]
async fn test_static_assets_are_cached() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/static/css/main.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_str(response.headers(), "cache-control").contains("immutable"));
}

#[tokio::test]
async fn test_price_api() {
    let mut app = TestApp::spawn().await;

    let cases = [
        ("/api/price?size=20&days=7", "375", "$375.00", 37_500),
        ("/api/price?size=15&days=1", "244", "$244.00", 24_400),
        ("/api/price?size=30&days=30", "600", "$600.00", 60_000),
        ("/api/price?size=10-dirt&days=14", "600", "$600.00", 60_000),
    ];
    for (uri, amount, display, cents) in cases {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["amount"], amount, "{uri}");
        assert_eq!(body["display"], display, "{uri}");
        assert_eq!(body["cents"], cents, "{uri}");
    }
}

#[tokio::test]
async fn test_price_api_fallback_and_bad_days() {
    let mut app = TestApp::spawn().await;

    let body = body_json(app.get("/api/price?size=40&days=7").await).await;
    assert_eq!(body["size"], "10");

    assert_eq!(
        app.get("/api/price?size=20&days=0").await.status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        app.get("/api/price?size=20&days=soon").await.status(),
        StatusCode::BAD_REQUEST
    );
}
