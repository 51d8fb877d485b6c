//! Email sending
//!
//! Outgoing mail for contact notifications. The SMTP transport sits
//! behind the `Mailer` trait so the dispatcher can be exercised with a
//! recording transport in tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use crate::config::SmtpConfig;
use crate::models::ContactInput;

/// An email ready to hand to a transport
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Mail transport trait
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Type alias for a shared mailer
pub type DynMailer = Arc<dyn Mailer>;

/// SMTP mailer backed by lettre
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Create a shared mailer for use with dependency injection
    pub fn shared(config: SmtpConfig) -> DynMailer {
        Arc::new(Self::new(config))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let host = self
            .config
            .host
            .as_deref()
            .ok_or_else(|| anyhow!("SMTP host not configured"))?;
        let from = self
            .config
            .from_address
            .as_deref()
            .ok_or_else(|| anyhow!("SMTP from address not configured"))?;

        let message = Message::builder()
            .from(from
                .parse()
                .map_err(|e| anyhow!("Invalid from address: {}", e))?)
            .to(email
                .to
                .parse()
                .map_err(|e| anyhow!("Invalid to address: {}", e))?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| anyhow!("Failed to build email: {}", e))?;

        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
            .port(self.config.port);

        if let (Some(username), Some(password)) =
            (self.config.username.clone(), self.config.password.clone())
        {
            transport = transport.credentials(Credentials::new(username, password));
        }

        transport
            .build()
            .send(message)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;

        Ok(())
    }
}

/// Build the notification email for a contact-form submission
pub fn contact_notification(input: &ContactInput, to: &str) -> OutgoingEmail {
    let subject = format!("Portfolio Contact: {}", input.user_subject);
    let html_body = format!(
        r#"<h2>New Contact Form Submission</h2>
<p><strong>Name:</strong> {name}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Phone:</strong> {phone}</p>
<p><strong>Subject:</strong> {subject}</p>
<p><strong>Message:</strong></p>
<p>{message}</p>"#,
        name = escape_html(&input.user_name),
        email = escape_html(&input.user_email),
        phone = escape_html(&input.user_phone),
        subject = escape_html(&input.user_subject),
        message = escape_html(&input.message),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject,
        html_body,
    }
}

/// Minimal HTML escaping for values interpolated into the template
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input() -> ContactInput {
        ContactInput {
            user_name: "Jane".to_string(),
            user_email: "jane@x.com".to_string(),
            user_phone: "".to_string(),
            user_subject: "Hi".to_string(),
            message: "Hello".to_string(),
        }
    }

    #[test]
    fn test_contact_notification_subject() {
        let email = contact_notification(&test_input(), "me@example.com");
        assert_eq!(email.to, "me@example.com");
        assert!(email.subject.contains("Hi"));
        assert_eq!(email.subject, "Portfolio Contact: Hi");
    }

    #[test]
    fn test_contact_notification_body_carries_fields() {
        let email = contact_notification(&test_input(), "me@example.com");
        assert!(email.html_body.contains("Jane"));
        assert!(email.html_body.contains("jane@x.com"));
        assert!(email.html_body.contains("Hello"));
        assert!(email.html_body.contains("New Contact Form Submission"));
    }

    #[test]
    fn test_contact_notification_escapes_html() {
        let mut input = test_input();
        input.message = "<script>alert(1)</script>".to_string();

        let email = contact_notification(&input, "me@example.com");
        assert!(!email.html_body.contains("<script>"));
        assert!(email.html_body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_smtp_mailer_requires_host() {
        let mailer = SmtpMailer::new(SmtpConfig::default());
        let email = contact_notification(&test_input(), "me@example.com");

        let result = mailer.send(&email).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not configured"));
    }
}
