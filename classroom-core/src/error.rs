//! Error types for classroom-core
//!
//! Domain operations never fail: unknown assignments and terminal statuses are
//! absorbed as no-ops. These errors only cover the boundaries around them.

use thiserror::Error;

/// Top-level error type for classroom-core
#[derive(Error, Debug)]
pub enum ClassroomError {
    #[error("Grade out of range: {0} (expected 0..=100)")]
    GradeOutOfRange(i64),

    #[error("Timeline stopped before scheduled work completed")]
    TimelineStopped,
}

pub type Result<T> = std::result::Result<T, ClassroomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_out_of_range_displays_value() {
        let error = ClassroomError::GradeOutOfRange(101);
        assert!(error.to_string().contains("Grade out of range"));
        assert!(error.to_string().contains("101"));
    }

    #[test]
    fn timeline_stopped_displays_correctly() {
        let error = ClassroomError::TimelineStopped;
        assert!(error.to_string().contains("Timeline stopped"));
    }
}
