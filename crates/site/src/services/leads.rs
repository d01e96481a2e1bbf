//! Lead-submission webhook client.
//!
//! Posts quote requests as a form-encoded body, the shape most CRM and form
//! backends accept without configuration.

use curbside_core::LeadRequest;
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Errors from the lead endpoint.
#[derive(Debug, Error)]
pub enum LeadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint rejected the submission.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Lead webhook client.
#[derive(Clone)]
pub struct LeadClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl LeadClient {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Submit a lead.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be reached or answers with a
    /// non-success status.
    #[instrument(skip(self, lead), fields(email = %lead.email))]
    pub async fn submit(&self, lead: &LeadRequest) -> Result<(), LeadError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&lead.form_fields())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            return Err(LeadError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!("Lead submitted");
        Ok(())
    }
}
