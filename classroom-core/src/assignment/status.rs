//! Assignment status values

use serde::{Deserialize, Serialize};

/// Lifecycle stage of an assignment
///
/// ```text
/// released ──► working ──► submitted ──► pass | fail
///     │           │            ▲
///     └───────────┴──► final_reminder
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Handed out, nothing done yet
    Released,
    /// Student is working on it
    Working,
    /// Handed in, waiting for a grade
    Submitted,
    /// Reminder received; submission follows immediately
    FinalReminder,
    /// Graded above the pass threshold
    Pass,
    /// Graded at or below the pass threshold
    Fail,
}

impl Status {
    /// Stable lowercase name, also used as the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Released => "released",
            Status::Working => "working",
            Status::Submitted => "submitted",
            Status::FinalReminder => "final_reminder",
            Status::Pass => "pass",
            Status::Fail => "fail",
        }
    }

    /// Pass or fail
    pub fn is_graded(&self) -> bool {
        matches!(self, Status::Pass | Status::Fail)
    }

    /// Submitted or graded; no further submission can happen
    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Submitted | Status::Pass | Status::Fail)
    }

    /// Still waiting on the student
    pub fn is_outstanding(&self) -> bool {
        matches!(
            self,
            Status::Released | Status::Working | Status::FinalReminder
        )
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
