//! Human-readable console rendering

use std::borrow::Cow;
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use super::sink::{Notification, NotificationSink};

/// Phrase describing a status, e.g. `"has submitted"`
///
/// Takes the status as a string so that statuses this build does not know
/// about still render, as `has status "<status>" for`.
pub fn describe_status(status: &str) -> Cow<'static, str> {
    match status {
        "released" => Cow::Borrowed("has been released"),
        "working" => Cow::Borrowed("is working on"),
        "submitted" => Cow::Borrowed("has submitted"),
        "final_reminder" | "final reminder" => Cow::Borrowed("has received a final reminder for"),
        "pass" => Cow::Borrowed("has passed"),
        "fail" => Cow::Borrowed("has failed"),
        other => Cow::Owned(format!("has status \"{other}\" for")),
    }
}

/// Leads every rendered line
pub const LINE_PREFIX: &str = "Observer → ";

/// Render a notification as a single line (without trailing newline)
pub fn render(notification: &Notification) -> String {
    format!(
        "{LINE_PREFIX}{}, {} {}.",
        notification.student_name,
        notification.assignment,
        describe_status(notification.status.as_str())
    )
}

/// Default sink: writes one rendered line per notification
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Console sink writing to any writer
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn notify(&self, notification: &Notification) {
        let line = render(notification);
        tracing::trace!(%line, "console notification");

        // A poisoned or failing writer must not abort the caller
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!(error = %e, "Failed to write notification");
        }
    }
}
