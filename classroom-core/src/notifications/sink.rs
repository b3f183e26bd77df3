//! NotificationSink trait definition

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::{Grade, Status};

/// One assignment status change for one student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub assignment: String,
    pub status: Status,
    /// Present once the assignment is graded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    /// Wall-clock time of delivery, not timeline time. Under paused or
    /// virtual tokio time this does not follow tick order; use the sink's
    /// sequence numbers for ordering.
    pub at: DateTime<Utc>,
}

/// Receiver of status-change notifications
///
/// Delivery is fire-and-forget: implementations must not fail or panic, and
/// must not call back into the student that is notifying them (the student's
/// state is locked for the duration of the call).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification);
}
