//! Mutable per-student state

use std::collections::HashMap;

use crate::assignment::Assignment;
use crate::timeline::TimerId;

/// Everything a student owns, guarded by the student's lock
pub(super) struct Ledger {
    pub(super) full_name: String,
    pub(super) email: String,
    /// First-touch order
    pub(super) assignments: Vec<Assignment>,
    pub(super) overall_grade: Option<f64>,
    /// Pending "advance to submitted" timer per assignment name
    pub(super) work_timers: HashMap<String, TimerId>,
    /// Pending "advance to graded" timer per assignment name
    pub(super) grade_timers: HashMap<String, TimerId>,
}

impl Ledger {
    pub(super) fn new(full_name: String, email: String) -> Self {
        Self {
            full_name,
            email,
            assignments: Vec::new(),
            overall_grade: None,
            work_timers: HashMap::new(),
            grade_timers: HashMap::new(),
        }
    }

    pub(super) fn position(&self, name: &str) -> Option<usize> {
        self.assignments.iter().position(|a| a.name() == name)
    }

    pub(super) fn find(&self, name: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.name() == name)
    }

    /// Index of the named assignment, creating a released one if missing.
    /// The flag is true when it was created.
    pub(super) fn ensure(&mut self, name: &str) -> (usize, bool) {
        match self.position(name) {
            Some(idx) => (idx, false),
            None => {
                self.assignments.push(Assignment::new(name));
                (self.assignments.len() - 1, true)
            }
        }
    }

    /// Mean grade over graded assignments
    pub(super) fn recompute_overall(&mut self) -> Option<f64> {
        let grades: Vec<f64> = self
            .assignments
            .iter()
            .filter(|a| a.status().is_graded())
            .filter_map(|a| a.grade())
            .map(|g| f64::from(g.value()))
            .collect();

        self.overall_grade = if grades.is_empty() {
            None
        } else {
            Some(grades.iter().sum::<f64>() / grades.len() as f64)
        };
        self.overall_grade
    }

    pub(super) fn pending_timers(&self) -> usize {
        self.work_timers.len() + self.grade_timers.len()
    }
}
