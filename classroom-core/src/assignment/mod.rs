//! Assignment state
//!
//! An [`Assignment`] only stores state. Which transitions are allowed is
//! decided by the owning [`Student`](crate::student::Student).

mod grade;
mod status;

pub use grade::{Grade, MAX_GRADE, PASS_THRESHOLD};
pub use status::Status;

use serde::{Deserialize, Serialize};

/// Grading state of one named assignment for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    name: String,
    status: Status,
    grade: Option<Grade>,
}

impl Assignment {
    /// A freshly released assignment
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::Released,
            grade: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    /// True once a grade has been assigned
    pub fn has_grade(&self) -> bool {
        self.grade.is_some()
    }

    /// Record a grade and move to pass or fail
    pub fn set_grade(&mut self, grade: Grade) {
        self.grade = Some(grade);
        self.status = if grade.is_passing() {
            Status::Pass
        } else {
            Status::Fail
        };
    }

    /// Overwrite the status of an ungraded assignment
    ///
    /// Graded statuses are only reachable through [`Assignment::set_grade`],
    /// which keeps `grade` and `status` consistent.
    pub(crate) fn set_status(&mut self, status: Status) {
        debug_assert!(!status.is_graded(), "use set_grade for {status}");
        self.status = status;
    }
}
