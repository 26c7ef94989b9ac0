//! Notification email: message templates and the email API client.

mod client;
mod templates;

pub use client::Mailer;
pub use templates::{contact_email, pilot_email};
