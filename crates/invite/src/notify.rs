//! New-RSVP notifications.
//!
//! The endpoint hands every stored RSVP to a [`Notifier`]. The bundled
//! [`LogNotifier`] prepares the email a host would want and logs it; actual
//! delivery belongs to an external mail service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::info;

use crate::config::NotifyConfig;
use crate::error::Result;
use crate::model::Rsvp;

/// Something that wants to hear about new RSVPs.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Called once for each successfully stored RSVP.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be prepared or handed
    /// off. Callers log it; the RSVP itself is already stored.
    async fn notify(&self, rsvp: &Rsvp) -> Result<()>;
}

/// A prepared notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl EmailMessage {
    /// Compose the host notification for `rsvp`.
    #[must_use]
    pub fn for_rsvp(rsvp: &Rsvp, recipient: &str, event_name: &str) -> Self {
        let submitted = rsvp
            .submitted_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %Z");

        let body = format!(
            "New RSVP submission:\n\
             \n\
             Name: {name}\n\
             Attending: {attending}\n\
             Submitted: {submitted}\n\
             \n\
             ---\n\
             This RSVP was submitted via the {event_name} invitation website.\n",
            name = rsvp.name,
            attending = rsvp.attending.label(),
        );

        Self {
            to: recipient.to_string(),
            subject: format!("RSVP Response: {}", rsvp.name),
            body,
        }
    }
}

/// Logs the notification email instead of sending it.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    recipient: String,
    event_name: String,
}

impl LogNotifier {
    /// Create a notifier addressed to `recipient`.
    #[must_use]
    pub fn new(recipient: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            event_name: event_name.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, rsvp: &Rsvp) -> Result<()> {
        let email = EmailMessage::for_rsvp(rsvp, &self.recipient, &self.event_name);
        info!(
            to = %email.to,
            subject = %email.subject,
            "Email would be sent:\n{}",
            email.body
        );
        Ok(())
    }
}

/// Discards notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _rsvp: &Rsvp) -> Result<()> {
        Ok(())
    }
}

/// Build the notifier described by `config`.
#[must_use]
pub fn from_config(config: &NotifyConfig) -> Arc<dyn Notifier> {
    if config.enabled {
        Arc::new(LogNotifier::new(&config.recipient, &config.event_name))
    } else {
        Arc::new(NoopNotifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attending, NewRsvp};

    fn rsvp(attending: Attending) -> Rsvp {
        Rsvp::new(NewRsvp {
            name: "Ada Lovelace".to_string(),
            attending,
        })
    }

    #[test]
    fn test_email_subject_and_recipient() {
        let email = EmailMessage::for_rsvp(&rsvp(Attending::Yes), "host@example.com", "Gala");
        assert_eq!(email.to, "host@example.com");
        assert_eq!(email.subject, "RSVP Response: Ada Lovelace");
    }

    #[test]
    fn test_email_body() {
        let email = EmailMessage::for_rsvp(&rsvp(Attending::No), "host@example.com", "Gala");
        assert!(email.body.starts_with("New RSVP submission:"));
        assert!(email.body.contains("Name: Ada Lovelace"));
        assert!(email.body.contains("Attending: No"));
        assert!(email.body.contains("Submitted: "));
        assert!(email
            .body
            .contains("This RSVP was submitted via the Gala invitation website."));
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        let notifier = LogNotifier::new("host@example.com", "Gala");
        assert!(notifier.notify(&rsvp(Attending::Yes)).await.is_ok());
    }

    #[tokio::test]
    async fn test_noop_notifier_succeeds() {
        assert!(NoopNotifier.notify(&rsvp(Attending::Yes)).await.is_ok());
    }

    #[test]
    fn test_from_config() {
        let mut config = NotifyConfig::default();
        let notifier = from_config(&config);
        assert!(format!("{notifier:?}").contains("LogNotifier"));

        config.enabled = false;
        let notifier = from_config(&config);
        assert!(format!("{notifier:?}").contains("NoopNotifier"));
    }
}
