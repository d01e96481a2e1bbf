//! Order confirmation email.
//!
//! Uses SMTP via lettre for delivery with Askama HTML and plain text templates.

use askama::Template;
use curbside_core::{ComputedOrder, Email, PaymentIntentRef};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::EmailConfig;

/// Everything the confirmation email says about an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub payment_intent: PaymentIntentRef,
    pub to: Email,
    pub customer_name: String,
    pub summary: String,
    pub size_label: &'static str,
    pub rental_days: u32,
    pub delivery_date: String,
    pub pickup_date: Option<String>,
    pub zip_code: String,
    /// Formatted amount, e.g. `$375.00`.
    pub amount: String,
}

impl OrderConfirmation {
    /// Build a confirmation for a paid order.
    #[must_use]
    pub fn new(payment_intent: PaymentIntentRef, order: &ComputedOrder) -> Self {
        let request = &order.request;
        Self {
            payment_intent,
            to: request.email.clone(),
            customer_name: request.full_name(),
            summary: order.summary(),
            size_label: request.dumpster_size.label(),
            rental_days: request.rental_days.get(),
            delivery_date: request.delivery_date.format("%A, %B %-d, %Y").to_string(),
            pickup_date: request
                .pickup_date
                .map(|d| d.format("%A, %B %-d, %Y").to_string()),
            zip_code: request.zip_code.to_string(),
            amount: order.amount.display(),
        }
    }
}

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order: &'a OrderConfirmation,
    business_name: &'a str,
    business_phone: &'a str,
}

#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order: &'a OrderConfirmation,
    business_name: &'a str,
    business_phone: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for transactional email.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    business_name: String,
    business_phone: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(
        config: &EmailConfig,
        business_name: &str,
        business_phone: &str,
    ) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            business_name: business_name.to_string(),
            business_phone: business_phone.to_string(),
        })
    }

    /// Send the order confirmation.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    #[instrument(skip(self, order), fields(payment_intent = %order.payment_intent))]
    pub async fn send_order_confirmation(&self, order: &OrderConfirmation) -> Result<(), EmailError> {
        let (text, html) = render_order_confirmation(order, &self.business_name, &self.business_phone)?;
        let subject = format!("{} order confirmed: {}", self.business_name, order.size_label);

        self.send_multipart_email(order.to.as_str(), &subject, &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Render the text and HTML bodies.
fn render_order_confirmation(
    order: &OrderConfirmation,
    business_name: &str,
    business_phone: &str,
) -> Result<(String, String), askama::Error> {
    let text = OrderConfirmationText {
        order,
        business_name,
        business_phone,
    }
    .render()?;
    let html = OrderConfirmationHtml {
        order,
        business_name,
        business_phone,
    }
    .render()?;
    Ok((text, html))
}
