//! Sitemap and robots.txt.

use std::fmt::Write;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;

use crate::state::AppState;

/// Pages outside the content repository.
const STATIC_PAGES: &[&str] = &["/", "/dumpster-rental", "/guides", "/faq", "/quote"];

/// Paths crawlers should skip.
const DISALLOWED: &[&str] = &["/checkout", "/api/", "/order-confirmation", "/estimate"];

fn push_url(xml: &mut String, loc: &str, lastmod: Option<NaiveDate>) {
    xml.push_str("  <url>\n");
    let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(loc));
    if let Some(date) = lastmod {
        let _ = writeln!(xml, "    <lastmod>{}</lastmod>", date.format("%Y-%m-%d"));
    }
    xml.push_str("  </url>\n");
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Build the sitemap XML.
#[must_use]
pub fn build_sitemap(state: &AppState) -> String {
    let config = state.config();
    let content = state.content();

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for path in STATIC_PAGES {
        push_url(&mut xml, &config.absolute_url(path), None);
    }
    for city in content.cities() {
        push_url(&mut xml, &config.absolute_url(&city.path()), None);
    }
    for guide in content.guides() {
        push_url(
            &mut xml,
            &config.absolute_url(&guide.path()),
            Some(guide.last_modified()),
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        build_sitemap(&state),
    )
        .into_response()
}

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> Response {
    let mut body = String::from("User-agent: *\n");
    for path in DISALLOWED {
        let _ = writeln!(body, "Disallow: {path}");
    }
    let _ = writeln!(
        body,
        "\nSitemap: {}",
        state.config().absolute_url("/sitemap.xml")
    );

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("/a?b=1&c=<2>"), "/a?b=1&amp;c=&lt;2&gt;");
    }

    #[test]
    fn test_push_url_with_lastmod() {
        let mut xml = String::new();
        let date = NaiveDate::from_ymd_opt(2026, 2, 14);
        push_url(&mut xml, "https://example.com/guides/x", date);
        assert!(xml.contains("<loc>https://example.com/guides/x</loc>"));
        assert!(xml.contains("<lastmod>2026-02-14</lastmod>"));
    }
}
