//! Grade sources used by the grading timer

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assignment::{Grade, MAX_GRADE};

/// Supplies the grade assigned when a submission is graded
pub trait GradeSource: Send + Sync {
    fn next_grade(&self) -> Grade;
}

/// Uniformly random grades in `0..=100`
pub struct RandomGrades {
    rng: Mutex<StdRng>,
}

impl RandomGrades {
    /// Seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomGrades {
    fn default() -> Self {
        Self::new()
    }
}

impl GradeSource for RandomGrades {
    fn next_grade(&self) -> Grade {
        let mut rng = match self.rng.lock() {
            Ok(rng) => rng,
            Err(poisoned) => poisoned.into_inner(),
        };
        Grade::from_valid(rng.gen_range(0..=MAX_GRADE))
    }
}

/// Always returns the same grade
#[derive(Debug, Clone, Copy)]
pub struct FixedGrades(pub Grade);

impl GradeSource for FixedGrades {
    fn next_grade(&self) -> Grade {
        self.0
    }
}

/// Returns grades from a script, repeating the last one once exhausted
pub struct ScriptedGrades {
    script: Mutex<(VecDeque<Grade>, Grade)>,
}

impl ScriptedGrades {
    /// An empty script always yields 0
    pub fn new(grades: impl IntoIterator<Item = Grade>) -> Self {
        let queue: VecDeque<Grade> = grades.into_iter().collect();
        let last = queue.front().copied().unwrap_or(Grade::from_valid(0));
        Self {
            script: Mutex::new((queue, last)),
        }
    }
}

impl GradeSource for ScriptedGrades {
    fn next_grade(&self) -> Grade {
        let mut script = match self.script.lock() {
            Ok(script) => script,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (queue, last) = &mut *script;
        if let Some(grade) = queue.pop_front() {
            *last = grade;
        }
        *last
    }
}
