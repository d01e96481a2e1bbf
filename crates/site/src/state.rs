//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::content::ContentRepository;
use crate::services::{EmailService, LeadClient, PaymentClient, SmsClient};
use crate::tasks::{SideChannels, TaskQueue};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, content and service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    content: ContentRepository,
    payments: PaymentClient,
    leads: Option<LeadClient>,
    tasks: TaskQueue,
}

impl AppState {
    /// Create a new application state.
    ///
    /// `tasks` is the sending half of the best-effort queue; the worker is
    /// started separately with [`Self::side_channels`].
    #[must_use]
    pub fn new(config: SiteConfig, content: ContentRepository, tasks: TaskQueue) -> Self {
        let payments = PaymentClient::new(&config.payments);
        let leads = config.leads_webhook_url.clone().map(LeadClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                payments,
                leads,
                tasks,
            }),
        }
    }

    /// Build the handler for best-effort tasks from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if email is configured but the SMTP relay is invalid.
    pub fn side_channels(
        config: &SiteConfig,
    ) -> Result<SideChannels, lettre::transport::smtp::Error> {
        let email = config
            .email
            .as_ref()
            .map(|email| {
                EmailService::new(email, &config.business.name, &config.business.phone)
            })
            .transpose()?;

        Ok(SideChannels {
            leads: config.leads_webhook_url.clone().map(LeadClient::new),
            sms: config.sms_webhook_url.clone().map(SmsClient::new),
            email,
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the content repository.
    #[must_use]
    pub fn content(&self) -> &ContentRepository {
        &self.inner.content
    }

    /// Get a reference to the payment processor client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// The lead client, if a lead endpoint is configured.
    #[must_use]
    pub fn leads(&self) -> Option<&LeadClient> {
        self.inner.leads.as_ref()
    }

    /// Get a reference to the best-effort task queue.
    #[must_use]
    pub fn tasks(&self) -> &TaskQueue {
        &self.inner.tasks
    }
}
