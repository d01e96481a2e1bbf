//! Clients for the services the site talks to.
//!
//! # Services
//!
//! - `payments` - Payment intents for the hosted payment widget
//! - `leads` - Lead-submission webhook
//! - `sms` - SMS notification webhook
//! - `email` - Order confirmation email over SMTP

pub mod email;
pub mod leads;
pub mod payments;
pub mod sms;

pub use email::{EmailError, EmailService, OrderConfirmation};
pub use leads::{LeadClient, LeadError};
pub use payments::{PaymentClient, PaymentError, PaymentIntent, PaymentIntentStatus};
pub use sms::{SmsClient, SmsError, SmsNotification};
