//! Per-run pass counters.

use std::fmt;

use serde::Serialize;
use tracing::{error, info, warn};

use deadline_core::error::AppError;

/// The scheduled passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Reminder,
    Overdue,
    DailySummary,
    Cleanup,
}

impl PassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Overdue => "overdue",
            Self::DailySummary => "daily_summary",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one pass did. Failures are counted here instead of aborting the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub pass: PassKind,
    /// Deadlines (or users, for summaries) looked at.
    pub examined: u64,
    /// Items that reached at least one recipient and were marked.
    pub notified: u64,
    /// Items with no successful delivery or not due for one.
    pub skipped: u64,
    pub emails_sent: u64,
    pub emails_failed: u64,
    pub in_app_sent: u64,
    pub in_app_failed: u64,
    /// Deadlines moved to `overdue`.
    pub status_updates: u64,
    /// Notifications purged.
    pub removed: u64,
    /// Store errors.
    pub errors: u64,
}

impl PassReport {
    /// An empty report for `pass`.
    pub fn new(pass: PassKind) -> Self {
        Self {
            pass,
            examined: 0,
            notified: 0,
            skipped: 0,
            emails_sent: 0,
            emails_failed: 0,
            in_app_sent: 0,
            in_app_failed: 0,
            status_updates: 0,
            removed: 0,
            errors: 0,
        }
    }

    /// Count a store error. Transient failures are retried by the next tick
    /// and log at `warn`; anything else logs at `error`.
    pub fn store_error(&mut self, context: &str, err: &AppError) {
        self.errors += 1;
        if err.kind.is_transient() {
            warn!(pass = %self.pass, kind = %err.kind, error = %err, "{context}");
        } else {
            error!(pass = %self.pass, kind = %err.kind, error = %err, "{context}");
        }
    }

    /// Failed sends across both channels.
    pub fn delivery_failures(&self) -> u64 {
        self.emails_failed + self.in_app_failed
    }

    /// Emit the counters as one `info` event.
    pub fn log(&self) {
        info!(
            pass = %self.pass,
            examined = self.examined,
            notified = self.notified,
            skipped = self.skipped,
            emails_sent = self.emails_sent,
            emails_failed = self.emails_failed,
            in_app_sent = self.in_app_sent,
            in_app_failed = self.in_app_failed,
            status_updates = self.status_updates,
            removed = self.removed,
            errors = self.errors,
            "Notification pass finished"
        );
    }
}
