//! Plain-text email templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use deadline_core::error::AppError;

/// Which message to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTemplate {
    /// Data: `title`, `due_at`, `lead` (e.g. "in 12 hours"), `deadline_id`.
    DeadlineReminder,
    /// Data: `title`, `due_at`, `deadline_id`.
    DeadlineOverdue,
    /// Data: `total_active`, `due_today`, `due_this_week`, `overdue`, `completed_today`.
    DailySummary,
}

impl EmailTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeadlineReminder => "deadline_reminder",
            Self::DeadlineOverdue => "deadline_overdue",
            Self::DailySummary => "daily_summary",
        }
    }
}

/// A rendered message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Render `template` with `data`. Links point under `base_url`.
pub fn render(template: EmailTemplate, data: &Value, base_url: &str) -> Result<RenderedEmail, AppError> {
    let base_url = base_url.trim_end_matches('/');
    match template {
        EmailTemplate::DeadlineReminder => {
            let title = required_str(data, "title")?;
            let due = format_due(data)?;
            let lead = data.get("lead").and_then(Value::as_str).unwrap_or("soon");
            Ok(RenderedEmail {
                subject: format!("Reminder: \"{title}\" is due {lead}"),
                body: format!(
                    "Your deadline \"{title}\" is due {lead} ({due}).\n\n\
                     Open it: {}\n",
                    deadline_link(data, base_url)
                ),
            })
        }
        EmailTemplate::DeadlineOverdue => {
            let title = required_str(data, "title")?;
            let due = format_due(data)?;
            Ok(RenderedEmail {
                subject: format!("Overdue: \"{title}\""),
                body: format!(
                    "Your deadline \"{title}\" was due {due} and is not completed yet.\n\n\
                     Open it: {}\n",
                    deadline_link(data, base_url)
                ),
            })
        }
        EmailTemplate::DailySummary => {
            let count = |key: &str| data.get(key).and_then(Value::as_u64).unwrap_or(0);
            Ok(RenderedEmail {
                subject: format!(
                    "Your deadlines today: {} due, {} overdue",
                    count("due_today"),
                    count("overdue")
                ),
                body: format!(
                    "Active deadlines: {}\n\
                     Due today: {}\n\
                     Due in the next 7 days: {}\n\
                     Overdue: {}\n\
                     Completed today: {}\n\n\
                     {base_url}/deadlines\n",
                    count("total_active"),
                    count("due_today"),
                    count("due_this_week"),
                    count("overdue"),
                    count("completed_today"),
                ),
            })
        }
    }
}

fn required_str<'a>(data: &'a Value, key: &str) -> Result<&'a str, AppError> {
    data.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::validation(format!("Email data is missing '{key}'")))
}

fn format_due(data: &Value) -> Result<String, AppError> {
    let raw = required_str(data, "due_at")?;
    let due: DateTime<Utc> = raw
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid due_at in email data: {raw}")))?;
    Ok(due.format("%a %d %b %Y %H:%M UTC").to_string())
}

fn deadline_link(data: &Value, base_url: &str) -> String {
    match data.get("deadline_id").and_then(Value::as_str) {
        Some(id) => format!("{base_url}/deadlines/{id}"),
        None => format!("{base_url}/deadlines"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reminder_renders_title_and_lead() {
        let email = render(
            EmailTemplate::DeadlineReminder,
            &json!({
                "title": "Tax return",
                "due_at": "2025-04-15T17:00:00Z",
                "lead": "in 1 hour",
                "deadline_id": "abc",
            }),
            "https://deadlines.example.com/",
        )
        .unwrap();
        assert_eq!(email.subject, "Reminder: \"Tax return\" is due in 1 hour");
        assert!(email.body.contains("Tue 15 Apr 2025 17:00 UTC"));
        assert!(email.body.contains("https://deadlines.example.com/deadlines/abc"));
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let err = render(
            EmailTemplate::DeadlineOverdue,
            &json!({ "due_at": "2025-04-15T17:00:00Z" }),
            "http://localhost",
        )
        .unwrap_err();
        assert!(err.message.contains("title"));
    }

    #[test]
    fn test_summary_counts() {
        let email = render(
            EmailTemplate::DailySummary,
            &json!({ "total_active": 5, "due_today": 2, "due_this_week": 3, "overdue": 1, "completed_today": 0 }),
            "http://localhost",
        )
        .unwrap();
        assert_eq!(email.subject, "Your deadlines today: 2 due, 1 overdue");
        assert!(email.body.contains("Due in the next 7 days: 3"));
    }
}
