//! In-memory NotificationSink implementation
//!
//! MemorySink stores notifications in a Vec for replay and uses a broadcast
//! channel for live subscribers.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use super::sink::{Notification, NotificationSink};
use crate::assignment::Status;

/// Sequence number for notifications (monotonically increasing)
pub type NotificationSeq = u64;

/// Sink that records every notification
///
/// Thread-safe via RwLock and atomics.
pub struct MemorySink {
    /// Stored notifications with sequence numbers
    notifications: RwLock<Vec<(NotificationSeq, Notification)>>,
    /// Next sequence number to assign
    next_seq: AtomicU64,
    /// Broadcast channel for live subscribers
    tx: broadcast::Sender<(NotificationSeq, Notification)>,
}

impl MemorySink {
    /// Create a new MemorySink with the given broadcast channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            notifications: RwLock::new(Vec::new()),
            next_seq: AtomicU64::new(0),
            tx,
        }
    }

    /// Subscribe to all notifications from now on
    pub fn subscribe(&self) -> broadcast::Receiver<(NotificationSeq, Notification)> {
        self.tx.subscribe()
    }

    /// All notifications starting from a sequence number
    pub async fn notifications_from(&self, seq: NotificationSeq) -> Vec<(NotificationSeq, Notification)> {
        self.notifications
            .read()
            .await
            .iter()
            .filter(|(s, _)| *s >= seq)
            .cloned()
            .collect()
    }

    /// All notifications for one student
    pub async fn for_student(&self, student_id: Uuid) -> Vec<Notification> {
        self.notifications
            .read()
            .await
            .iter()
            .filter(|(_, n)| n.student_id == student_id)
            .map(|(_, n)| n.clone())
            .collect()
    }

    /// Status sequence reported for one student's assignment
    pub async fn statuses(&self, student_id: Uuid, assignment: &str) -> Vec<Status> {
        self.notifications
            .read()
            .await
            .iter()
            .filter(|(_, n)| n.student_id == student_id && n.assignment == assignment)
            .map(|(_, n)| n.status)
            .collect()
    }

    /// Number of notifications received so far
    pub fn current_seq(&self) -> NotificationSeq {
        self.next_seq.load(Ordering::SeqCst)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn notify(&self, notification: &Notification) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        self.notifications
            .write()
            .await
            .push((seq, notification.clone()));

        // Ignore if no receivers
        let _ = self.tx.send((seq, notification.clone()));
    }
}
