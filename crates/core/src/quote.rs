//! Quote form drafts and their validation.
//!
//! A [`QuoteDraft`] is exactly what the visitor typed: every field is a raw
//! string so a rejected submission can be re-rendered untouched. It is
//! validated one of two ways:
//!
//! - [`QuoteDraft::validate_lead`] for a plain quote request, which only needs
//!   a way to reach the customer (email and phone).
//! - [`QuoteDraft::validate_checkout`] for the payment path, which needs every
//!   field the order is priced and scheduled from, plus the delivery lead time.

use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::pricing::{DumpsterSize, RentalDays};
use crate::types::{Email, Phone, ZipCode};

/// Minimum time between checkout and a paid delivery.
pub const MIN_DELIVERY_LEAD_HOURS: i64 = 48;

/// Longest free-text note we keep.
const MAX_ADDITIONAL_INFO_LEN: usize = 2000;

/// What's going in the dumpster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteType {
    Household,
    Construction,
    Yard,
    Roofing,
    Dirt,
    Concrete,
    Mixed,
}

impl WasteType {
    /// Every waste type, in form order.
    pub const ALL: [Self; 7] = [
        Self::Household,
        Self::Construction,
        Self::Yard,
        Self::Roofing,
        Self::Dirt,
        Self::Concrete,
        Self::Mixed,
    ];

    /// Form value.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Household => "household",
            Self::Construction => "construction",
            Self::Yard => "yard",
            Self::Roofing => "roofing",
            Self::Dirt => "dirt",
            Self::Concrete => "concrete",
            Self::Mixed => "mixed",
        }
    }

    /// Customer-facing name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Household => "Household junk",
            Self::Construction => "Construction debris",
            Self::Yard => "Yard waste",
            Self::Roofing => "Roofing shingles",
            Self::Dirt => "Clean dirt",
            Self::Concrete => "Concrete & brick",
            Self::Mixed => "Mixed load",
        }
    }

    /// Look up a waste type by form value.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|waste| waste.key().eq_ignore_ascii_case(key))
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name.
    pub field: &'static str,
    /// Message shown next to the field.
    pub message: String,
}

/// Every problem found in a submission, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Record a failure for a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All failures in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The first message recorded for a field, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Whether a field has a failure.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.for_field(field).is_some()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Where a quote form posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPath {
    /// Plain quote request; only contact details are checked.
    #[default]
    Lead,
    /// Hands off to checkout; the whole order is checked.
    Checkout,
}

impl SubmitPath {
    /// Form `action` for this path.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Lead => "/quote",
            Self::Checkout => "/checkout",
        }
    }

    /// Whether the 48 hour delivery lead time applies.
    #[must_use]
    pub const fn enforces_lead_time(&self) -> bool {
        matches!(self, Self::Checkout)
    }
}

/// Raw quote form input.
///
/// Also the payload of the checkout hand-off slot, which may be partial when it
/// comes from the price estimator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub zip_code: String,
    pub waste_type: String,
    pub dumpster_size: String,
    pub delivery_date: String,
    pub pickup_date: String,
    pub rental_days: String,
    pub additional_info: String,
    #[serde(deserialize_with = "deserialize_checkbox")]
    pub sms_consent: bool,
    /// Honeypot: hidden from people, filled in by form bots.
    #[serde(skip_serializing)]
    pub company_website: String,
    /// Honeypot: hidden from people, filled in by form bots.
    #[serde(skip_serializing)]
    pub fax_number: String,
}

/// Fields the payment path cannot proceed without.
pub const REQUIRED_FOR_PAYMENT: [&str; 9] = [
    "first_name",
    "last_name",
    "email",
    "phone",
    "zip_code",
    "waste_type",
    "dumpster_size",
    "delivery_date",
    "rental_days",
];

impl QuoteDraft {
    /// A partial draft from the price estimator: size and days only.
    #[must_use]
    pub fn from_estimate(size: DumpsterSize, days: RentalDays) -> Self {
        Self {
            dumpster_size: size.key().to_owned(),
            rental_days: days.to_string(),
            ..Self::default()
        }
    }

    fn field(&self, name: &str) -> &str {
        match name {
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "zip_code" => &self.zip_code,
            "waste_type" => &self.waste_type,
            "dumpster_size" => &self.dumpster_size,
            "delivery_date" => &self.delivery_date,
            "pickup_date" => &self.pickup_date,
            "rental_days" => &self.rental_days,
            "additional_info" => &self.additional_info,
            _ => "",
        }
    }

    /// Whether every field the payment path needs has been filled in.
    ///
    /// Presence only; the values are still validated on submit.
    #[must_use]
    pub fn is_complete_for_payment(&self) -> bool {
        REQUIRED_FOR_PAYMENT
            .iter()
            .all(|name| !self.field(name).trim().is_empty())
    }

    /// Both honeypot fields were filled in.
    ///
    /// Only reported; submissions are not rejected on this signal.
    #[must_use]
    pub fn honeypot_tripped(&self) -> bool {
        !self.company_website.trim().is_empty() && !self.fax_number.trim().is_empty()
    }

    /// Validate for a plain quote request.
    ///
    /// # Errors
    ///
    /// Returns every problem with the email and phone fields.
    pub fn validate_lead(&self) -> Result<LeadRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = parse_field(&mut errors, "email", &self.email, Email::parse);
        let phone = parse_field(&mut errors, "phone", &self.phone, Phone::parse);

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(LeadRequest {
                email,
                phone,
                details: self.clone(),
            }),
            _ => Err(errors),
        }
    }

    /// Validate for the payment path.
    ///
    /// # Errors
    ///
    /// Returns every missing or malformed required field, a delivery date
    /// less than 48 hours after `now`, and a pickup date before delivery.
    pub fn validate_checkout(&self, now: DateTime<Utc>) -> Result<QuoteRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let first_name = required_text(&mut errors, "first_name", &self.first_name);
        let last_name = required_text(&mut errors, "last_name", &self.last_name);
        let email = parse_field(&mut errors, "email", &self.email, Email::parse);
        let phone = parse_field(&mut errors, "phone", &self.phone, Phone::parse);
        let zip_code = parse_field(&mut errors, "zip_code", &self.zip_code, ZipCode::parse);
        let waste_type = parse_field(&mut errors, "waste_type", &self.waste_type, |s| {
            WasteType::from_key(s).ok_or("Choose what you're throwing away")
        });
        let dumpster_size = parse_field(&mut errors, "dumpster_size", &self.dumpster_size, |s| {
            DumpsterSize::from_key(s).ok_or("Choose a dumpster size")
        });
        let rental_days = parse_field(
            &mut errors,
            "rental_days",
            &self.rental_days,
            RentalDays::parse,
        );
        let delivery_date = parse_field(&mut errors, "delivery_date", &self.delivery_date, parse_date);

        if let Some(delivery) = delivery_date {
            if !meets_lead_time(delivery, now) {
                errors.push(
                    "delivery_date",
                    format!(
                        "Paid deliveries must be scheduled at least {MIN_DELIVERY_LEAD_HOURS} hours in advance"
                    ),
                );
            }
        }

        let pickup_date = if self.pickup_date.trim().is_empty() {
            None
        } else {
            parse_field(&mut errors, "pickup_date", &self.pickup_date, parse_date)
        };

        if let (Some(delivery), Some(pickup)) = (delivery_date, pickup_date) {
            if pickup < delivery {
                errors.push("pickup_date", "Pickup must be on or after delivery");
            }
        }

        let additional_info = self.additional_info.trim();
        if additional_info.len() > MAX_ADDITIONAL_INFO_LEN {
            errors.push(
                "additional_info",
                format!("Keep notes under {MAX_ADDITIONAL_INFO_LEN} characters"),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            first_name,
            last_name,
            email,
            phone,
            zip_code,
            waste_type,
            dumpster_size,
            delivery_date,
            rental_days,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(email),
                Some(phone),
                Some(zip_code),
                Some(waste_type),
                Some(dumpster_size),
                Some(delivery_date),
                Some(rental_days),
            ) => Ok(QuoteRequest {
                first_name,
                last_name,
                email,
                phone,
                zip_code,
                waste_type,
                dumpster_size,
                delivery_date,
                pickup_date,
                rental_days,
                additional_info: (!additional_info.is_empty()).then(|| additional_info.to_owned()),
                sms_consent: self.sms_consent,
            }),
            _ => Err(errors),
        }
    }
}

/// A plain quote request: reachable customer plus whatever else they filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRequest {
    pub email: Email,
    pub phone: Phone,
    /// The rest of the form as entered.
    pub details: QuoteDraft,
}

impl LeadRequest {
    /// Customer name as entered, possibly empty.
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "{} {}",
            self.details.first_name.trim(),
            self.details.last_name.trim()
        )
        .trim()
        .to_owned()
    }

    /// Field set posted to the lead endpoint.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let d = &self.details;
        vec![
            ("first_name", d.first_name.trim().to_owned()),
            ("last_name", d.last_name.trim().to_owned()),
            ("email", self.email.to_string()),
            ("phone", self.phone.digits().to_owned()),
            ("zip_code", d.zip_code.trim().to_owned()),
            ("waste_type", d.waste_type.trim().to_owned()),
            ("dumpster_size", d.dumpster_size.trim().to_owned()),
            ("delivery_date", d.delivery_date.trim().to_owned()),
            ("pickup_date", d.pickup_date.trim().to_owned()),
            ("rental_days", d.rental_days.trim().to_owned()),
            ("additional_info", d.additional_info.trim().to_owned()),
            ("sms_consent", d.sms_consent.to_string()),
        ]
    }

    /// Multi-line transcript of the request, attached to SMS notifications.
    #[must_use]
    pub fn transcript(&self) -> String {
        self.form_fields()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A fully validated quote, ready to be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Phone,
    pub zip_code: ZipCode,
    pub waste_type: WasteType,
    pub dumpster_size: DumpsterSize,
    pub delivery_date: NaiveDate,
    pub pickup_date: Option<NaiveDate>,
    pub rental_days: RentalDays,
    pub additional_info: Option<String>,
    pub sms_consent: bool,
}

impl QuoteRequest {
    /// Customer's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The lead view of this request, for the lead endpoint and SMS alerts.
    #[must_use]
    pub fn to_lead(&self) -> LeadRequest {
        LeadRequest {
            email: self.email.clone(),
            phone: self.phone.clone(),
            details: self.to_draft(),
        }
    }

    /// Back to raw form values, e.g. to pre-fill the form after "back".
    #[must_use]
    pub fn to_draft(&self) -> QuoteDraft {
        QuoteDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.to_string(),
            phone: self.phone.display(),
            zip_code: self.zip_code.to_string(),
            waste_type: self.waste_type.key().to_owned(),
            dumpster_size: self.dumpster_size.key().to_owned(),
            delivery_date: self.delivery_date.to_string(),
            pickup_date: self
                .pickup_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            rental_days: self.rental_days.to_string(),
            additional_info: self.additional_info.clone().unwrap_or_default(),
            sms_consent: self.sms_consent,
            company_website: String::new(),
            fax_number: String::new(),
        }
    }
}

/// Whether a delivery date is far enough out for a paid booking.
///
/// A date-only delivery counts from midnight UTC of that day.
#[must_use]
pub fn meets_lead_time(delivery: NaiveDate, now: DateTime<Utc>) -> bool {
    let delivery_start = delivery.and_time(NaiveTime::MIN).and_utc();
    delivery_start >= now + TimeDelta::hours(MIN_DELIVERY_LEAD_HOURS)
}

/// The first delivery date [`meets_lead_time`] accepts, for the date picker's
/// `min`.
#[must_use]
pub fn earliest_delivery_date(now: DateTime<Utc>) -> NaiveDate {
    let earliest = now + TimeDelta::hours(MIN_DELIVERY_LEAD_HOURS);
    let day = earliest.date_naive();
    if earliest.time() == NaiveTime::MIN {
        day
    } else {
        day.succ_opt().unwrap_or(day)
    }
}

/// Accept `YYYY-MM-DD` as sent by `<input type="date">`.
fn parse_date(s: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| "Enter a date as YYYY-MM-DD")
}

fn required_text(errors: &mut ValidationErrors, field: &'static str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(field, "This field is required");
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn parse_field<T, E: fmt::Display>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Option<T> {
    if value.trim().is_empty() {
        errors.push(field, "This field is required");
        return None;
    }
    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.push(field, e.to_string());
            None
        }
    }
}

/// HTML checkboxes post `on` when checked and nothing otherwise; the session
/// copy stores a real bool.
fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Bool(bool),
        Text(String),
    }

    Ok(match Checkbox::deserialize(deserializer)? {
        Checkbox::Bool(b) => b,
        Checkbox::Text(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        ),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap()
    }

    fn complete_draft() -> QuoteDraft {
        QuoteDraft {
            first_name: "Dana".to_owned(),
            last_name: "Reyes".to_owned(),
            email: "dana@example.com".to_owned(),
            phone: "713-555-0142".to_owned(),
            zip_code: "77002".to_owned(),
            waste_type: "construction".to_owned(),
            dumpster_size: "20".to_owned(),
            delivery_date: "2026-03-06".to_owned(),
            pickup_date: "2026-03-13".to_owned(),
            rental_days: "7".to_owned(),
            additional_info: "Gate code 4411".to_owned(),
            sms_consent: true,
            ..QuoteDraft::default()
        }
    }

    #[test]
    fn test_checkout_accepts_complete_draft() {
        let request = complete_draft().validate_checkout(now()).unwrap();
        assert_eq!(request.first_name, "Dana");
        assert_eq!(request.last_name, "Reyes");
        assert_eq!(request.email.as_str(), "dana@example.com");
        assert_eq!(request.phone.digits(), "7135550142");
        assert_eq!(request.zip_code.as_str(), "77002");
        assert_eq!(request.waste_type, WasteType::Construction);
        assert_eq!(request.dumpster_size, DumpsterSize::Twenty);
        assert_eq!(request.delivery_date.to_string(), "2026-03-06");
        assert_eq!(request.pickup_date.unwrap().to_string(), "2026-03-13");
        assert_eq!(request.rental_days.get(), 7);
        assert_eq!(request.additional_info.as_deref(), Some("Gate code 4411"));
        assert!(request.sms_consent);
    }

    #[test]
    fn test_checkout_rejects_short_lead_time() {
        let draft = QuoteDraft {
            delivery_date: "2026-03-03".to_owned(),
            pickup_date: String::new(),
            ..complete_draft()
        };
        let errors = draft.validate_checkout(now()).unwrap_err();
        assert!(errors.has("delivery_date"));
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn test_lead_time_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let on_boundary = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let day_before = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        assert!(meets_lead_time(on_boundary, now));
        assert!(!meets_lead_time(day_before, now));
        assert!(!meets_lead_time(
            on_boundary,
            now + TimeDelta::seconds(1)
        ));
    }

    #[test]
    fn test_checkout_reports_every_missing_field() {
        let errors = QuoteDraft::default().validate_checkout(now()).unwrap_err();
        for field in REQUIRED_FOR_PAYMENT {
            assert!(errors.has(field), "missing error for {field}");
        }
        assert!(!errors.has("pickup_date"));
        assert!(!errors.has("additional_info"));
    }

    #[test]
    fn test_checkout_rejects_bad_values() {
        let draft = QuoteDraft {
            dumpster_size: "25".to_owned(),
            rental_days: "0".to_owned(),
            waste_type: "radioactive".to_owned(),
            pickup_date: "2026-03-05".to_owned(),
            ..complete_draft()
        };
        let errors = draft.validate_checkout(now()).unwrap_err();
        assert!(errors.has("dumpster_size"));
        assert!(errors.has("rental_days"));
        assert!(errors.has("waste_type"));
        assert!(errors.has("pickup_date"));
        assert!(!errors.has("delivery_date"));
    }

    #[test]
    fn test_lead_only_needs_contact_fields() {
        let draft = QuoteDraft {
            email: "Pat@Example.com".to_owned(),
            phone: "(281) 555-0199".to_owned(),
            delivery_date: "tomorrow-ish".to_owned(),
            ..QuoteDraft::default()
        };
        let lead = draft.validate_lead().unwrap();
        assert_eq!(lead.email.as_str(), "pat@example.com");
        assert_eq!(lead.phone.digits(), "2815550199");
        assert_eq!(lead.details.delivery_date, "tomorrow-ish");
    }

    #[test]
    fn test_lead_rejects_missing_contact() {
        let errors = QuoteDraft::default().validate_lead().unwrap_err();
        assert!(errors.has("email"));
        assert!(errors.has("phone"));

        let draft = QuoteDraft {
            email: "pat@example.com".to_owned(),
            phone: "555".to_owned(),
            ..QuoteDraft::default()
        };
        let errors = draft.validate_lead().unwrap_err();
        assert!(!errors.has("email"));
        assert!(errors.has("phone"));
    }

    #[test]
    fn test_completeness_is_presence_only() {
        assert!(complete_draft().is_complete_for_payment());

        let estimate = QuoteDraft::from_estimate(DumpsterSize::Fifteen, RentalDays::WEEK);
        assert!(!estimate.is_complete_for_payment());
        assert_eq!(estimate.dumpster_size, "15");
        assert_eq!(estimate.rental_days, "7");

        for field in REQUIRED_FOR_PAYMENT {
            let mut draft = complete_draft();
            match field {
                "first_name" => draft.first_name.clear(),
                "last_name" => draft.last_name.clear(),
                "email" => draft.email.clear(),
                "phone" => draft.phone.clear(),
                "zip_code" => draft.zip_code.clear(),
                "waste_type" => draft.waste_type.clear(),
                "dumpster_size" => draft.dumpster_size.clear(),
                "delivery_date" => draft.delivery_date.clear(),
                "rental_days" => draft.rental_days = "  ".to_owned(),
                _ => unreachable!(),
            }
            assert!(!draft.is_complete_for_payment(), "{field} cleared");
        }
    }

    #[test]
    fn test_request_round_trips_to_draft() {
        let request = complete_draft().validate_checkout(now()).unwrap();
        let again = request.to_draft().validate_checkout(now()).unwrap();
        assert_eq!(request, again);
    }

    #[test]
    fn test_honeypot_needs_both_fields() {
        let mut draft = complete_draft();
        assert!(!draft.honeypot_tripped());
        draft.company_website = "http://spam.example".to_owned();
        assert!(!draft.honeypot_tripped());
        draft.fax_number = "555".to_owned();
        assert!(draft.honeypot_tripped());
    }

    #[test]
    fn test_checkbox_values() {
        let draft: QuoteDraft = serde_json::from_str(r#"{"sms_consent":"on"}"#).unwrap();
        assert!(draft.sms_consent);
        let draft: QuoteDraft = serde_json::from_str(r#"{"sms_consent":true}"#).unwrap();
        assert!(draft.sms_consent);
        let draft: QuoteDraft = serde_json::from_str("{}").unwrap();
        assert!(!draft.sms_consent);
    }

    #[test]
    fn test_lead_transcript_skips_blank_fields() {
        let lead = QuoteDraft {
            first_name: "Pat".to_owned(),
            email: "pat@example.com".to_owned(),
            phone: "2815550199".to_owned(),
            ..QuoteDraft::default()
        }
        .validate_lead()
        .unwrap();
        let transcript = lead.transcript();
        assert!(transcript.contains("first_name: Pat"));
        assert!(transcript.contains("phone: 2815550199"));
        assert!(!transcript.contains("last_name"));
        assert_eq!(lead.name(), "Pat");
    }

    #[test]
    fn test_submit_paths() {
        assert_eq!(SubmitPath::Lead.action(), "/quote");
        assert_eq!(SubmitPath::Checkout.action(), "/checkout");
        assert!(SubmitPath::Checkout.enforces_lead_time());
        assert!(!SubmitPath::Lead.enforces_lead_time());
    }

    #[test]
    fn test_earliest_delivery_date() {
        // 2026-03-02 15:30 + 48h = 2026-03-04 15:30, so the 5th is first
        let earliest = earliest_delivery_date(now());
        assert_eq!(earliest, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
        assert!(meets_lead_time(earliest, now()));
        assert!(!meets_lead_time(earliest.pred_opt().unwrap(), now()));

        let midnight = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(
            earliest_delivery_date(midnight),
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
    }
}
