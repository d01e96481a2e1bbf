//! Embedded markdown content: city pages, guides and the FAQ.
//!
//! Content lives in `content/` next to this crate and is compiled into the
//! binary. Every file starts with YAML frontmatter followed by markdown:
//!
//! - `content/cities/*.md` - one file per service area, rendered through the
//!   shared city template. The file stem is the slug.
//! - `content/guides/*.md` - long-form articles.
//! - `content/faq.md` - one `## Question` heading per entry.
//!
//! # Price Shortcodes
//!
//! Prices in copy come from the pricing table so they never drift:
//!
//! ```markdown
//! A 20 yard roll-off starts at {{price "20"}} for a week.
//! Two weeks in a 15 yard is {{price "15" days="14"}}.
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use curbside_core::ZipCode;
use curbside_core::pricing::{RentalDays, price_for_key};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};

/// Which business line a city page advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Dumpster,
    Roofing,
}

impl Service {
    /// URL prefix for this service's city pages.
    #[must_use]
    pub const fn path_prefix(&self) -> &'static str {
        match self {
            Self::Dumpster => "/dumpster-rental",
            Self::Roofing => "/roofing",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Dumpster => "Dumpster Rental",
            Self::Roofing => "Roofing",
        }
    }
}

/// City page frontmatter.
#[derive(Debug, Clone, Deserialize)]
pub struct CityMeta {
    pub name: String,
    /// Two-letter state code.
    pub state: String,
    pub service: Service,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub zip_codes: Vec<String>,
    /// Slugs of nearby cities offering the same service.
    #[serde(default)]
    pub nearby: Vec<String>,
}

/// A rendered city page.
#[derive(Debug, Clone)]
pub struct CityPage {
    pub slug: String,
    pub meta: CityMeta,
    pub content_html: String,
}

impl CityPage {
    /// Site path, e.g. `/dumpster-rental/katy`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.meta.service.path_prefix(), self.slug)
    }
}

/// Guide frontmatter.
#[derive(Debug, Clone, Deserialize)]
pub struct GuideMeta {
    pub title: String,
    pub description: String,
    pub published_at: NaiveDate,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered guide.
#[derive(Debug, Clone)]
pub struct Guide {
    pub slug: String,
    pub meta: GuideMeta,
    pub content_html: String,
    pub reading_time_minutes: u32,
}

impl Guide {
    #[must_use]
    pub fn path(&self) -> String {
        format!("/guides/{}", self.slug)
    }

    /// Most recent of the published and updated dates.
    #[must_use]
    pub fn last_modified(&self) -> NaiveDate {
        self.meta.updated_at.unwrap_or(self.meta.published_at)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FaqMeta {
    #[serde(default)]
    title: Option<String>,
}

/// One question and its rendered answer.
#[derive(Debug, Clone)]
pub struct FaqEntry {
    /// Anchor id on the FAQ page.
    pub id: String,
    pub question: String,
    pub answer_html: String,
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Parse error in {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// A named markdown source.
pub type Source = (&'static str, &'static str);

const CITY_SOURCES: &[Source] = &[
    ("houston", include_str!("../content/cities/houston.md")),
    ("katy", include_str!("../content/cities/katy.md")),
    ("sugar-land", include_str!("../content/cities/sugar-land.md")),
    ("pearland", include_str!("../content/cities/pearland.md")),
    ("the-woodlands", include_str!("../content/cities/the-woodlands.md")),
    ("houston-roofing", include_str!("../content/cities/houston-roofing.md")),
    ("katy-roofing", include_str!("../content/cities/katy-roofing.md")),
];

const GUIDE_SOURCES: &[Source] = &[
    (
        "what-size-dumpster",
        include_str!("../content/guides/what-size-dumpster.md"),
    ),
    (
        "what-can-go-in-a-dumpster",
        include_str!("../content/guides/what-can-go-in-a-dumpster.md"),
    ),
    (
        "roof-tear-off-dumpster",
        include_str!("../content/guides/roof-tear-off-dumpster.md"),
    ),
];

const FAQ_SOURCE: &str = include_str!("../content/faq.md");

/// All site content, parsed and rendered once at startup.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    cities: Arc<Vec<CityPage>>,
    guides: Arc<Vec<Guide>>,
    faq_title: Arc<str>,
    faqs: Arc<Vec<FaqEntry>>,
}

impl ContentRepository {
    /// Load the content compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if any file has missing or malformed frontmatter, or
    /// if two city pages for the same service share a slug.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_sources(CITY_SOURCES, GUIDE_SOURCES, FAQ_SOURCE)
    }

    /// Load content from in-memory sources. City and guide slugs are the
    /// first element of each pair.
    ///
    /// # Errors
    ///
    /// Same as [`Self::embedded`].
    pub fn from_sources(
        cities: &[Source],
        guides: &[Source],
        faq: &str,
    ) -> Result<Self, ContentError> {
        let mut city_pages = Vec::with_capacity(cities.len());
        let mut seen = HashSet::new();
        for (name, raw) in cities {
            let page = parse_city(name, raw)?;
            if !seen.insert(page.path()) {
                return Err(ContentError::DuplicateSlug(page.path()));
            }
            city_pages.push(page);
        }
        city_pages.sort_by(|a, b| a.meta.name.cmp(&b.meta.name));

        let mut guide_pages = guides
            .iter()
            .map(|(name, raw)| parse_guide(name, raw))
            .collect::<Result<Vec<_>, _>>()?;
        // Newest first
        guide_pages.sort_by(|a, b| b.meta.published_at.cmp(&a.meta.published_at));

        let (faq_title, faqs) = parse_faq(faq)?;

        tracing::info!(
            cities = city_pages.len(),
            guides = guide_pages.len(),
            faqs = faqs.len(),
            "Content loaded"
        );

        Ok(Self {
            cities: Arc::new(city_pages),
            guides: Arc::new(guide_pages),
            faq_title: faq_title.into(),
            faqs: Arc::new(faqs),
        })
    }

    /// A dumpster-rental city page.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] for an unknown slug.
    pub fn city(&self, slug: &str) -> Result<&CityPage, ContentError> {
        self.city_for(Service::Dumpster, slug)
    }

    /// A city page for a given service.
    ///
    /// The slug is the URL segment after the service prefix, so
    /// `/roofing/houston` finds the roofing page for Houston.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] for an unknown slug.
    pub fn city_for(&self, service: Service, slug: &str) -> Result<&CityPage, ContentError> {
        self.cities
            .iter()
            .find(|c| c.meta.service == service && c.slug == slug)
            .ok_or_else(|| ContentError::NotFound(format!("{}/{slug}", service.path_prefix())))
    }

    /// Every city page, by city name.
    pub fn cities(&self) -> impl Iterator<Item = &CityPage> {
        self.cities.iter()
    }

    /// City pages for one service.
    pub fn cities_for(&self, service: Service) -> impl Iterator<Item = &CityPage> {
        self.cities.iter().filter(move |c| c.meta.service == service)
    }

    /// City pages in a state (two-letter code, case-insensitive).
    pub fn cities_in_state<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a CityPage> {
        self.cities
            .iter()
            .filter(move |c| c.meta.state.eq_ignore_ascii_case(state))
    }

    /// Nearby pages for a city, skipping slugs that have no page.
    #[must_use]
    pub fn nearby(&self, city: &CityPage) -> Vec<&CityPage> {
        city.meta
            .nearby
            .iter()
            .filter_map(|slug| self.city_for(city.meta.service, slug).ok())
            .collect()
    }

    /// A guide by slug.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] for an unknown slug.
    pub fn guide(&self, slug: &str) -> Result<&Guide, ContentError> {
        self.guides
            .iter()
            .find(|g| g.slug == slug)
            .ok_or_else(|| ContentError::NotFound(format!("/guides/{slug}")))
    }

    /// Every guide, newest first.
    pub fn guides(&self) -> impl Iterator<Item = &Guide> {
        self.guides.iter()
    }

    #[must_use]
    pub fn faq_title(&self) -> &str {
        &self.faq_title
    }

    #[must_use]
    pub fn faqs(&self) -> &[FaqEntry] {
        &self.faqs
    }

    /// Problems a content editor should fix. Empty when everything is
    /// consistent.
    #[must_use]
    pub fn check(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for city in self.cities.iter() {
            let path = city.path();
            if city.meta.state.len() != 2 || !city.meta.state.chars().all(|c| c.is_ascii_uppercase()) {
                problems.push(format!("{path}: state '{}' is not a two-letter code", city.meta.state));
            }
            for zip in &city.meta.zip_codes {
                if ZipCode::parse(zip).is_err() {
                    problems.push(format!("{path}: invalid ZIP code '{zip}'"));
                }
            }
            for slug in &city.meta.nearby {
                if slug == &city.slug {
                    problems.push(format!("{path}: lists itself as nearby"));
                } else if self.city_for(city.meta.service, slug).is_err() {
                    problems.push(format!("{path}: nearby city '{slug}' has no page"));
                }
            }
            if city.meta.description.len() > 160 {
                problems.push(format!("{path}: description is longer than 160 characters"));
            }
        }

        for guide in self.guides.iter() {
            if guide
                .meta
                .updated_at
                .is_some_and(|updated| updated < guide.meta.published_at)
            {
                problems.push(format!("{}: updated before it was published", guide.path()));
            }
        }

        problems
    }
}

/// Split `name` into the service-specific slug: `katy-roofing` is the
/// roofing page served at `/roofing/katy`.
fn city_slug(name: &str, service: Service) -> String {
    match service {
        Service::Roofing => name.strip_suffix("-roofing").unwrap_or(name).to_string(),
        Service::Dumpster => name.to_string(),
    }
}

fn parse_city(name: &str, raw: &str) -> Result<CityPage, ContentError> {
    let (meta, body): (CityMeta, String) = parse_frontmatter(name, raw)?;
    Ok(CityPage {
        slug: city_slug(name, meta.service),
        meta,
        content_html: render_markdown(&body),
    })
}

fn parse_guide(name: &str, raw: &str) -> Result<Guide, ContentError> {
    let (meta, body): (GuideMeta, String) = parse_frontmatter(name, raw)?;

    // Average 200 words per minute
    let word_count = body.split_whitespace().count();
    let reading_time_minutes = u32::try_from(word_count.div_ceil(200)).unwrap_or(u32::MAX);

    Ok(Guide {
        slug: name.to_string(),
        meta,
        content_html: render_markdown(&body),
        reading_time_minutes: reading_time_minutes.max(1),
    })
}

/// Matches one FAQ question heading.
static FAQ_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s+(.+?)\s*$").expect("Invalid regex"));

fn parse_faq(raw: &str) -> Result<(String, Vec<FaqEntry>), ContentError> {
    let (meta, body): (FaqMeta, String) = parse_frontmatter("faq", raw)?;

    let headings: Vec<_> = FAQ_HEADING_RE.captures_iter(&body).collect();
    let mut entries = Vec::with_capacity(headings.len());
    for (i, caps) in headings.iter().enumerate() {
        let (Some(whole), Some(question)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let answer_end = headings
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(body.len(), |m| m.start());
        let answer = body.get(whole.end()..answer_end).unwrap_or_default();
        entries.push(FaqEntry {
            id: anchor_id(question.as_str()),
            question: question.as_str().to_string(),
            answer_html: render_markdown(answer.trim()),
        });
    }

    if entries.is_empty() {
        return Err(ContentError::Parse {
            source_name: "faq".to_string(),
            message: "no '## Question' headings".to_string(),
        });
    }

    Ok((
        meta.title
            .unwrap_or_else(|| "Frequently Asked Questions".to_string()),
        entries,
    ))
}

/// `How long can I keep it?` -> `how-long-can-i-keep-it`
fn anchor_id(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn parse_frontmatter<T: DeserializeOwned>(
    name: &str,
    raw: &str,
) -> Result<(T, String), ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<T> = matter.parse(raw).map_err(|e| ContentError::Parse {
        source_name: name.to_string(),
        message: format!("Failed to parse frontmatter: {e}"),
    })?;
    let meta = parsed.data.ok_or_else(|| ContentError::Parse {
        source_name: name.to_string(),
        message: "Missing frontmatter".to_string(),
    })?;
    Ok((meta, parsed.content))
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Price shortcodes are expanded first.
fn render_markdown(content: &str) -> String {
    let processed = process_shortcodes(content);

    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());

    // Content is ours and compiled in
    options.render.r#unsafe = true;

    markdown_to_html(&processed, &options)
}

// =============================================================================
// Shortcode Processing
// =============================================================================

/// Matches `{{price "20"}}` and `{{price "15" days="14"}}`.
static PRICE_SHORTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{price\s+"([^"]+)"(?:\s+days="(\d+)")?\s*\}\}"#).expect("Invalid regex")
});

fn process_shortcodes(content: &str) -> String {
    PRICE_SHORTCODE_RE
        .replace_all(content, |caps: &regex::Captures| {
            let size = &caps[1];
            let days = caps
                .get(2)
                .and_then(|m| RentalDays::parse(m.as_str()).ok())
                .unwrap_or(RentalDays::WEEK);
            let price = price_for_key(size, days);
            // Whole-dollar prices read better in copy
            price.display().trim_end_matches(".00").to_string()
        })
        .into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CITY: &str = "---
name: Katy
state: TX
service: dumpster
title: Dumpster Rental in Katy, TX
description: Roll-off dumpsters delivered in Katy.
zip_codes: [\"77449\", \"77494\"]
nearby: [houston, nowhere]
---
Weekly rate from {{price \"20\"}}.
";

    const HOUSTON: &str = "---
name: Houston
state: TX
service: dumpster
title: Dumpster Rental in Houston, TX
description: Roll-off dumpsters delivered across Houston.
---
Body.
";

    const ROOFING: &str = "---
name: Katy
state: TX
service: roofing
title: Roofing in Katy, TX
description: Roof replacement in Katy.
---
Body.
";

    const GUIDE: &str = "---
title: What Size Dumpster?
description: Pick the right size.
published_at: 2025-04-01
---
Two weeks in a 15 yard is {{price \"15\" days=\"14\"}}.
";

    const FAQ: &str = "---
title: Dumpster FAQ
---
## How long can I keep it?

Seven days are included.

## Can I put paint in it?

No wet paint.
";

    fn repo() -> ContentRepository {
        ContentRepository::from_sources(
            &[("katy", CITY), ("houston", HOUSTON), ("katy-roofing", ROOFING)],
            &[("what-size-dumpster", GUIDE)],
            FAQ,
        )
        .unwrap()
    }

    #[test]
    fn test_embedded_content_loads_cleanly() {
        let repo = ContentRepository::embedded().unwrap();
        assert!(repo.city("houston").is_ok());
        assert!(repo.city_for(Service::Roofing, "houston").is_ok());
        assert!(repo.guides().count() >= 3);
        assert!(!repo.faqs().is_empty());
        assert_eq!(repo.check(), Vec::<String>::new());
    }

    #[test]
    fn test_unknown_slug_is_not_found() {
        let repo = repo();
        assert!(matches!(
            repo.city("atlantis"),
            Err(ContentError::NotFound(path)) if path == "/dumpster-rental/atlantis"
        ));
        assert!(matches!(repo.guide("nope"), Err(ContentError::NotFound(_))));
    }

    #[test]
    fn test_roofing_pages_are_separate() {
        let repo = repo();
        let roofing = repo.city_for(Service::Roofing, "katy").unwrap();
        assert_eq!(roofing.path(), "/roofing/katy");
        assert_eq!(repo.city("katy").unwrap().path(), "/dumpster-rental/katy");
        assert_eq!(repo.cities_for(Service::Roofing).count(), 1);
        assert_eq!(repo.cities_in_state("tx").count(), 3);
    }

    #[test]
    fn test_price_shortcodes_use_pricing_table() {
        let repo = repo();
        assert!(repo.city("katy").unwrap().content_html.contains("$375"));
        let guide = repo.guide("what-size-dumpster").unwrap();
        assert!(guide.content_html.contains("$699"));
        assert_eq!(guide.reading_time_minutes, 1);
    }

    #[test]
    fn test_nearby_skips_missing_pages() {
        let repo = repo();
        let katy = repo.city("katy").unwrap();
        let nearby: Vec<_> = repo.nearby(katy).into_iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(nearby, vec!["houston"]);
        let problems = repo.check();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("nowhere"));
    }

    #[test]
    fn test_faq_entries() {
        let repo = repo();
        assert_eq!(repo.faq_title(), "Dumpster FAQ");
        let faqs = repo.faqs();
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].id, "how-long-can-i-keep-it");
        assert!(faqs[0].answer_html.contains("Seven days"));
        assert!(!faqs[0].answer_html.contains("paint"));
        assert_eq!(faqs[1].question, "Can I put paint in it?");
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let result = ContentRepository::from_sources(
            &[("houston", HOUSTON), ("houston", HOUSTON)],
            &[],
            FAQ,
        );
        assert!(matches!(result, Err(ContentError::DuplicateSlug(_))));
    }

    #[test]
    fn test_missing_frontmatter_is_parse_error() {
        let result = ContentRepository::from_sources(&[("bare", "# No frontmatter")], &[], FAQ);
        assert!(matches!(result, Err(ContentError::Parse { .. })));
    }
}
