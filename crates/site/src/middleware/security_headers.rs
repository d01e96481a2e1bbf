//! Security headers middleware.
//!
//! Locked down by default. The only third parties allowed are the hosted
//! payment widget (script, frames and API) and Google Analytics.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Origin serving the hosted payment widget script.
pub const PAYMENT_SCRIPT_ORIGIN: &str = "https://js.stripe.com";
/// Origins the widget frames load from.
const PAYMENT_FRAME_ORIGINS: &str = "https://js.stripe.com https://hooks.stripe.com";
/// Origin the widget talks to from the browser.
const PAYMENT_API_ORIGIN: &str = "https://api.stripe.com";

const ANALYTICS_SCRIPT_ORIGIN: &str = "https://www.googletagmanager.com";
const ANALYTICS_CONNECT_ORIGINS: &str =
    "https://*.google-analytics.com https://*.analytics.google.com";

/// Build the CSP for a response.
///
/// Inline scripts must carry the request's nonce.
#[must_use]
pub fn content_security_policy(nonce: &str) -> String {
    format!(
        "default-src 'none'; \
         script-src 'self' 'nonce-{nonce}' {PAYMENT_SCRIPT_ORIGIN} {ANALYTICS_SCRIPT_ORIGIN}; \
         style-src 'self'; \
         font-src 'self'; \
         img-src 'self' data:; \
         connect-src 'self' {PAYMENT_API_ORIGIN} {ANALYTICS_CONNECT_ORIGINS}; \
         frame-src {PAYMENT_FRAME_ORIGINS}; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'; \
         upgrade-insecure-requests"
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy` - see [`content_security_policy`]
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: strict-origin-when-cross-origin` - the payment widget
///   needs the origin
/// - `Permissions-Policy` - deny sensors and media, allow payment for the widget
/// - `Cache-Control: no-store` on everything outside `/static`
/// - `Cross-Origin-Opener-Policy: same-origin`
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request
        .extensions()
        .get::<CspNonce>()
        .map(|n| n.value().to_string())
        .unwrap_or_default();
    let is_static = request.uri().path().starts_with("/static/");

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    if let Ok(csp) = HeaderValue::from_str(&content_security_policy(&nonce)) {
        headers.insert(CONTENT_SECURITY_POLICY, csp);
    }
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             camera=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             usb=(), \
             payment=(self \"https://js.stripe.com\")",
        ),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    if is_static {
        // Stylesheet URLs carry a content hash
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=31536000, immutable"),
        );
    } else {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_includes_nonce_and_payment_hosts() {
        let csp = content_security_policy("abc123==");
        assert!(csp.contains("'nonce-abc123=='"));
        assert!(csp.contains("script-src 'self' 'nonce-abc123==' https://js.stripe.com"));
        assert!(csp.contains("frame-src https://js.stripe.com https://hooks.stripe.com"));
        assert!(csp.contains("frame-ancestors 'none'"));
    }
}
