//! Shared collaborators handed to every student

use std::sync::Arc;

use crate::config::TimingConfig;
use crate::grades::{GradeSource, RandomGrades};
use crate::notifications::{ConsoleSink, NotificationSink};
use crate::timeline::Timeline;

/// Everything a [`Student`](crate::student::Student) needs besides its own state
///
/// Cheap to clone; clones share the same sink, grade source and timeline.
#[derive(Clone)]
pub struct Context {
    pub sink: Arc<dyn NotificationSink>,
    pub grades: Arc<dyn GradeSource>,
    pub timeline: Timeline,
    pub timing: TimingConfig,
}

impl Context {
    /// Console output, random grades, default delays, fresh timeline
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime (the timeline driver is spawned).
    pub fn new() -> Self {
        Self::with_timeline(Timeline::start())
    }

    /// Defaults around an existing timeline
    pub fn with_timeline(timeline: Timeline) -> Self {
        Self {
            sink: Arc::new(ConsoleSink::stdout()),
            grades: Arc::new(RandomGrades::new()),
            timeline,
            timing: TimingConfig::default(),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_grades(mut self, grades: Arc<dyn GradeSource>) -> Self {
        self.grades = grades;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("timeline", &self.timeline)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
