//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_BASE_URL` - Public URL for the site (used in sitemaps and canonical links)
//! - `PAYMENTS_SECRET_KEY` - Payment processor secret API key (high entropy)
//! - `PAYMENTS_PUBLISHABLE_KEY` - Payment processor publishable key (sent to browsers)
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_BUSINESS_NAME` - Business name shown in page titles (default: Curbside Dumpsters)
//! - `SITE_PHONE` - Phone number shown in the header (default: (713) 555-0100)
//! - `PAYMENTS_API_BASE` - Payment API base URL (default: <https://api.stripe.com>)
//! - `LEADS_WEBHOOK_URL` - Lead-submission endpoint (plain quotes fail without it)
//! - `SMS_WEBHOOK_URL` - SMS-notification endpoint
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `EMAIL_FROM` -
//!   order confirmation email; all but the port are needed to enable email
//! - `GA4_MEASUREMENT_ID` - Google Analytics 4 measurement ID
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `TASK_QUEUE_CAPACITY` - Best-effort task queue size (default: 256)
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for plain text
//! - `SITE_STATIC_DIR` - Directory served at `/static` (default: crates/site/static)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_TASK_QUEUE_CAPACITY: usize = 256;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site application configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, without a trailing slash
    pub base_url: String,
    /// Business details rendered into every page
    pub business: BusinessConfig,
    /// Payment processor configuration
    pub payments: PaymentsConfig,
    /// Lead-submission webhook
    pub leads_webhook_url: Option<Url>,
    /// SMS-notification webhook
    pub sms_webhook_url: Option<Url>,
    /// SMTP settings for order confirmations
    pub email: Option<EmailConfig>,
    /// Analytics tracking configuration
    pub analytics: AnalyticsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Capacity of the best-effort task queue
    pub task_queue_capacity: usize,
    /// Emit JSON log lines
    pub json_logs: bool,
    /// Directory served at `/static`
    pub static_dir: PathBuf,
}

/// Business details shown in page chrome.
#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub name: String,
    pub phone: String,
}

/// Payment processor configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct PaymentsConfig {
    /// API base URL, e.g. `https://api.stripe.com`
    pub api_base: String,
    /// Secret API key (server-side only)
    pub secret_key: SecretString,
    /// Publishable key (safe to expose in browser)
    pub publishable_key: String,
}

impl std::fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("api_base", &self.api_base)
            .field("secret_key", &"[REDACTED]")
            .field("publishable_key", &self.publishable_key)
            .finish()
    }
}

/// SMTP configuration for transactional email.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    /// `From` address, e.g. `Curbside Dumpsters <orders@curbsidedumpsters.com>`
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Analytics configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    /// Google Analytics 4 measurement ID
    pub ga4_measurement_id: Option<String>,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SITE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_HOST".to_string(), e.to_string()))?;
        let port = parse_env_or_default("SITE_PORT", 3000_u16)?;
        let base_url = get_required_url("SITE_BASE_URL")?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let business = BusinessConfig {
            name: get_env_or_default("SITE_BUSINESS_NAME", "Curbside Dumpsters"),
            phone: get_env_or_default("SITE_PHONE", "(713) 555-0100"),
        };

        let payments = PaymentsConfig::from_env()?;
        let email = EmailConfig::from_env()?;

        let task_queue_capacity =
            parse_env_or_default("TASK_QUEUE_CAPACITY", DEFAULT_TASK_QUEUE_CAPACITY)?;
        if task_queue_capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TASK_QUEUE_CAPACITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            business,
            payments,
            leads_webhook_url: get_optional_url("LEADS_WEBHOOK_URL")?,
            sms_webhook_url: get_optional_url("SMS_WEBHOOK_URL")?,
            email,
            analytics: AnalyticsConfig {
                ga4_measurement_id: get_optional_env("GA4_MEASUREMENT_ID"),
            },
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            task_queue_capacity,
            json_logs: get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            static_dir: PathBuf::from(get_env_or_default("SITE_STATIC_DIR", "crates/site/static")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (controls the `Secure` cookie flag).
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Absolute URL for a site path.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl PaymentsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_base = get_env_or_default("PAYMENTS_API_BASE", "https://api.stripe.com");
        Url::parse(&api_base)
            .map_err(|e| ConfigError::InvalidEnvVar("PAYMENTS_API_BASE".to_string(), e.to_string()))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: get_validated_secret("PAYMENTS_SECRET_KEY")?,
            publishable_key: get_required_env("PAYMENTS_PUBLISHABLE_KEY")?,
        })
    }
}

impl EmailConfig {
    /// Email is enabled only when the SMTP host is set.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_env_or_default("SMTP_PORT", 587_u16)?,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_validated_secret("SMTP_PASSWORD")?,
            from_address: get_required_env("EMAIL_FROM")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating an empty value as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let raw = get_required_env(key)?;
    parse_url(key, &raw)
}

fn get_optional_url(key: &str) -> Result<Option<Url>, ConfigError> {
    get_optional_env(key).map(|raw| parse_url(key, &raw)).transpose()
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "PAYMENTS_SECRET_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("sk_aaaaaaaaaaaaaaaaaaaaaaaa", "PAYMENTS_SECRET_KEY");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_processor_key() {
        let result = validate_secret_strength(
            "sk_test_51Nc8XyZ2eZvKYlo2C0aBcDeFgHiJkLmNoPqRsTuVw",
            "PAYMENTS_SECRET_KEY",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("LEADS_WEBHOOK_URL", "ftp://leads.example.net").is_err());
        assert!(parse_url("LEADS_WEBHOOK_URL", "not a url").is_err());
        let url = parse_url("LEADS_WEBHOOK_URL", " https://hooks.example.net/leads ").unwrap();
        assert_eq!(url.host_str(), Some("hooks.example.net"));
    }

    #[test]
    fn test_payments_config_debug_redacts_secret() {
        let config = PaymentsConfig {
            api_base: "https://api.stripe.com".to_string(),
            secret_key: SecretString::from("sk_test_51Nc8XyZ2eZvKYlo2C0aBcDeF"),
            publishable_key: "pk_test_51Nc8".to_string(),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk_test"));
    }
}
