//! Run summary emails over SMTP.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::BaseNotifier;
use crate::config::NotificationConfig;

/// Sends one plain-text email per run to the configured recipient.
pub struct SmtpNotifier {
    config: NotificationConfig,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: NotificationConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("Invalid SMTP host {}", config.smtp_host))?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            config,
        })
    }
}

#[async_trait]
impl BaseNotifier for SmtpNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.config.from.parse().context("Invalid notification sender")?)
            .to(self.config.to.parse().context("Invalid notification recipient")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build notification email")?;

        self.mailer
            .send(email)
            .await
            .context("Failed to send notification email")?;

        tracing::info!(to = %self.config.to, subject, "Notification email sent");
        Ok(())
    }
}

/// Used when no recipient is configured.
pub struct NoopNotifier;

#[async_trait]
impl BaseNotifier for NoopNotifier {
    async fn notify(&self, subject: &str, _body: &str) -> Result<()> {
        tracing::debug!(subject, "Email notifications disabled, skipping");
        Ok(())
    }
}
