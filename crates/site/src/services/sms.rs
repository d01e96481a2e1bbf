//! SMS notification webhook client.

use curbside_core::{LeadRequest, Phone};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Errors from the SMS endpoint.
#[derive(Debug, Error)]
pub enum SmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint rejected the message.
    #[error("API error: {status}")]
    Api { status: u16 },
}

/// A text message to a customer who opted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsNotification {
    /// E.164 number.
    pub phone: String,
    pub message: String,
    /// The full request, for whoever follows up.
    pub transcript: String,
}

impl SmsNotification {
    /// Acknowledgement for a new quote request.
    #[must_use]
    pub fn quote_received(lead: &LeadRequest, business_name: &str) -> Self {
        let name = lead.name();
        let greeting = if name.is_empty() {
            "Hi!".to_string()
        } else {
            format!("Hi {}!", lead.details.first_name.trim())
        };
        Self {
            phone: lead.phone.e164(),
            message: format!(
                "{greeting} Thanks for requesting a dumpster quote from {business_name}. \
                 We'll text you shortly. Reply STOP to opt out."
            ),
            transcript: lead.transcript(),
        }
    }

    /// Acknowledgement for a paid booking.
    #[must_use]
    pub fn booking_received(phone: &Phone, summary: &str, business_name: &str) -> Self {
        Self {
            phone: phone.e164(),
            message: format!(
                "{business_name}: we received your booking for {summary}. \
                 Reply STOP to opt out."
            ),
            transcript: summary.to_string(),
        }
    }
}

/// SMS webhook client.
#[derive(Clone)]
pub struct SmsClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl SmsClient {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Send a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be reached or answers with a
    /// non-success status.
    #[instrument(skip(self, notification))]
    pub async fn send(&self, notification: &SmsNotification) -> Result<(), SmsError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SmsError::Api {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
