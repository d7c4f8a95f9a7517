//! Database configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// PostgreSQL pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; may carry credentials, log it through [`Self::redacted_url`].
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a free connection before failing a query.
    #[serde(default = "default_acquire_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Apply pending migrations on startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.url.trim().is_empty() {
            return Err(AppError::configuration("database.url must be set"));
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(AppError::configuration(
                "database.min_connections must not exceed a non-zero max_connections",
            ));
        }
        Ok(())
    }

    /// The URL with any password replaced by `****`.
    pub fn redacted_url(&self) -> String {
        let url = self.url.as_str();
        let Some(scheme_end) = url.find("://").map(|p| p + 3) else {
            return url.to_string();
        };
        let Some(at) = url.rfind('@').filter(|at| *at > scheme_end) else {
            return url.to_string();
        };
        match url[scheme_end..at].find(':') {
            Some(colon) => format!("{}:****{}", &url[..scheme_end + colon], &url[at..]),
            None => url.to_string(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}
