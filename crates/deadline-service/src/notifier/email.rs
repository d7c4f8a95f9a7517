//! Email delivery.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use deadline_core::config::{EmailConfig, SmtpTlsMode};
use deadline_core::error::{AppError, ErrorKind};

use super::template::{self, EmailTemplate};

/// Result of one send attempt. Delivery failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl EmailOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Outbound email channel.
#[async_trait]
pub trait EmailSender: Send + Sync + fmt::Debug {
    /// Whether sends can succeed at all.
    fn is_enabled(&self) -> bool;

    async fn send(&self, to: &str, template: EmailTemplate, data: &Value) -> EmailOutcome;
}

/// Sender used when email is switched off. Every send fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEmailSender;

#[async_trait]
impl EmailSender for DisabledEmailSender {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send(&self, _to: &str, _template: EmailTemplate, _data: &Value) -> EmailOutcome {
        EmailOutcome::failed("email delivery is disabled")
    }
}

/// SMTP delivery through lettre's tokio transport.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    base_url: String,
}

impl fmt::Debug for SmtpEmailSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpEmailSender")
            .field("from", &self.from.to_string())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SmtpEmailSender {
    /// Build an SMTP transport from config.
    pub fn new(config: &EmailConfig) -> Result<Self, AppError> {
        let from: Mailbox = config.from_address.parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid email.from_address '{}'", config.from_address),
                e,
            )
        })?;

        let builder = match config.tls {
            SmtpTlsMode::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
            SmtpTlsMode::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Configuration,
                            "Failed to configure STARTTLS relay",
                            e,
                        )
                    })?
            }
            SmtpTlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Configuration, "Failed to configure TLS relay", e)
                })?,
        };

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            base_url: config.app_base_url.clone(),
        })
    }

    fn build_message(&self, to: &str, template: EmailTemplate, data: &Value) -> Result<Message, AppError> {
        let recipient: Mailbox = to.parse().map_err(|e| {
            AppError::with_source(ErrorKind::Validation, format!("Invalid recipient '{to}'"), e)
        })?;
        let rendered = template::render(template, data, &self.base_url)?;
        Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(rendered.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(rendered.body)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build email", e))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, to: &str, template: EmailTemplate, data: &Value) -> EmailOutcome {
        let message = match self.build_message(to, template, data) {
            Ok(m) => m,
            Err(e) => {
                warn!(template = template.as_str(), error = %e, "Email not built");
                return EmailOutcome::failed(e.message);
            }
        };

        match self.transport.send(message).await {
            Ok(_) => {
                debug!(template = template.as_str(), "Email sent");
                EmailOutcome::sent()
            }
            Err(e) => {
                warn!(template = template.as_str(), error = %e, "SMTP send failed");
                EmailOutcome::failed(e.to_string())
            }
        }
    }
}

/// Captures sends in memory. Addresses listed in `fail_for` fail.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: std::sync::Mutex<Vec<(String, EmailTemplate, Value)>>,
    fail_for: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "testing"))]
impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, address: &str) {
        if let Ok(mut guard) = self.fail_for.lock() {
            guard.push(address.to_string());
        }
    }

    /// Every successful send as `(to, template, data)`.
    pub fn sent(&self) -> Vec<(String, EmailTemplate, Value)> {
        self.sent.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent().into_iter().map(|(to, _, _)| to).collect()
    }
}

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl EmailSender for RecordingEmailSender {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, to: &str, template: EmailTemplate, data: &Value) -> EmailOutcome {
        let failing = self
            .fail_for
            .lock()
            .map(|g| g.iter().any(|a| a == to))
            .unwrap_or(false);
        if failing {
            return EmailOutcome::failed("simulated SMTP failure");
        }
        if let Ok(mut guard) = self.sent.lock() {
            guard.push((to.to_string(), template, data.clone()));
        }
        EmailOutcome::sent()
    }
}
