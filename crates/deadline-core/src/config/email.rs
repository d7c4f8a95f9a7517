//! Outbound email configuration.

use serde::{Deserialize, Serialize};

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTlsMode {
    /// Plain connection (local relays and test servers only).
    None,
    /// Upgrade with STARTTLS (port 587).
    #[default]
    Starttls,
    /// Implicit TLS (port 465).
    Tls,
}

/// SMTP delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Whether email delivery is enabled. When off, every send reports failure.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_port")]
    pub smtp_port: u16,
    /// SMTP username (empty for unauthenticated relays).
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Transport security.
    #[serde(default)]
    pub tls: SmtpTlsMode,
    /// `From` mailbox, e.g. `Deadline Tracker <noreply@example.com>`.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// Public URL used to build links in messages.
    #[serde(default = "default_base_url")]
    pub app_base_url: String,
    /// SMTP command timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            tls: SmtpTlsMode::default(),
            from_address: default_from(),
            app_base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_port() -> u16 {
    587
}

fn default_from() -> String {
    "Deadline Tracker <noreply@localhost>".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    20
}
