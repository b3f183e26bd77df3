//! Validated numeric grades

use serde::{Deserialize, Serialize};

use crate::error::ClassroomError;

/// Grades strictly above this value pass
pub const PASS_THRESHOLD: u8 = 50;

/// Highest grade a submission can receive
pub const MAX_GRADE: u8 = 100;

/// A grade in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Grade(u8);

impl Grade {
    /// Create a grade, rejecting anything outside `0..=100`
    pub fn new(value: i64) -> Result<Self, ClassroomError> {
        match u8::try_from(value) {
            Ok(v) if v <= MAX_GRADE => Ok(Self(v)),
            _ => Err(ClassroomError::GradeOutOfRange(value)),
        }
    }

    /// Caller guarantees `value <= MAX_GRADE`
    pub(crate) fn from_valid(value: u8) -> Self {
        debug_assert!(value <= MAX_GRADE);
        Self(value)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 50 fails; the threshold is not symmetric
    pub fn is_passing(&self) -> bool {
        self.0 > PASS_THRESHOLD
    }
}

impl TryFrom<i64> for Grade {
    type Error = ClassroomError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
