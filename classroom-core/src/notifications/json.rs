//! JSON Lines sink

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use super::sink::{Notification, NotificationSink};

/// Writes each notification as one line of JSON
pub struct JsonLinesSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[async_trait]
impl NotificationSink for JsonLinesSink {
    async fn notify(&self, notification: &Notification) {
        let line = match serde_json::to_string(notification) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize notification");
                return;
            }
        };

        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!(error = %e, "Failed to write notification");
        }
    }
}
