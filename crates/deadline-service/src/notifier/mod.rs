//! Delivery channels.
//!
//! The scheduler and the collaboration engine talk to these traits only,
//! so channels can be swapped (SMTP, disabled, recording) at wiring time.

pub mod email;
pub mod in_app;
pub mod template;

pub use email::{DisabledEmailSender, EmailOutcome, EmailSender, SmtpEmailSender};
pub use in_app::{InAppMessage, InAppNotifier, StoredInAppNotifier};
pub use template::{EmailTemplate, RenderedEmail};

#[cfg(any(test, feature = "testing"))]
pub use email::RecordingEmailSender;
#[cfg(any(test, feature = "testing"))]
pub use in_app::FailingInAppNotifier;
