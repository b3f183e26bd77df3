//! Roster of students and roster-wide operations
//!
//! The roster owns an ordered list of [`Student`] handles and fans assignment
//! operations out across all of them. Fan-out always visits students in
//! roster (insertion) order.

mod release;

pub use release::ReleaseHandle;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::RosterConfig;
use crate::context::Context;
use crate::student::Student;

/// Which students [`Roster::remove`] should drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Exactly the student with this identity
    Id(Uuid),
    /// Every student with this full name
    Name(String),
}

impl RemoveTarget {
    async fn matches(&self, student: &Student) -> bool {
        match self {
            RemoveTarget::Id(id) => student.id() == *id,
            RemoveTarget::Name(name) => student.full_name().await == *name,
        }
    }
}

impl From<&Student> for RemoveTarget {
    fn from(student: &Student) -> Self {
        RemoveTarget::Id(student.id())
    }
}

impl From<Uuid> for RemoveTarget {
    fn from(id: Uuid) -> Self {
        RemoveTarget::Id(id)
    }
}

impl From<&str> for RemoveTarget {
    fn from(name: &str) -> Self {
        RemoveTarget::Name(name.to_string())
    }
}

impl From<String> for RemoveTarget {
    fn from(name: String) -> Self {
        RemoveTarget::Name(name)
    }
}

/// An ordered class list
///
/// Duplicate names are allowed; lookups by name return the first match.
pub struct Roster {
    students: Arc<RwLock<Vec<Student>>>,
    ctx: Context,
    config: RosterConfig,
}

impl Roster {
    /// Create an empty roster whose enrolled students share `ctx`
    pub fn new(ctx: Context) -> Self {
        Self::with_config(ctx, RosterConfig::default())
    }

    pub fn with_config(ctx: Context, config: RosterConfig) -> Self {
        Self {
            students: Arc::new(RwLock::new(Vec::new())),
            ctx,
            config,
        }
    }

    /// The context handed to students created by [`Roster::enroll`]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Append a student
    pub async fn add(&self, student: Student) {
        let name = student.full_name().await;
        self.students.write().await.push(student);
        info!(student = %name, "{} has been added to the classlist", name);
    }

    /// Create a student wired to this roster's context and add it
    pub async fn enroll(&self, full_name: impl Into<String>, email: impl Into<String>) -> Student {
        let student = Student::new(full_name, email, self.ctx.clone());
        self.add(student.clone()).await;
        student
    }

    /// Remove students by identity or by name, returning the removed ones
    ///
    /// Removed students keep their pending timers unless the roster was
    /// configured with `cancel_timers_on_remove`.
    pub async fn remove(&self, target: impl Into<RemoveTarget>) -> Vec<Student> {
        let target = target.into();

        let removed = {
            let mut students = self.students.write().await;
            let mut kept = Vec::with_capacity(students.len());
            let mut removed = Vec::new();
            for student in students.drain(..) {
                if target.matches(&student).await {
                    removed.push(student);
                } else {
                    kept.push(student);
                }
            }
            *students = kept;
            removed
        };

        if self.config.cancel_timers_on_remove {
            for student in &removed {
                student.cancel_timers().await;
            }
        }

        info!(?target, removed = removed.len(), "Removed from the classlist");
        removed
    }

    /// First student with this full name
    pub async fn find_by_name(&self, name: &str) -> Option<Student> {
        for student in self.students().await {
            if student.full_name().await == name {
                return Some(student);
            }
        }
        None
    }

    /// Snapshot of the roster, in order
    pub async fn students(&self) -> Vec<Student> {
        self.students.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.students.read().await.is_empty()
    }

    /// Students still owing work
    ///
    /// With a name: students missing that assignment or holding it as
    /// released, working or final reminder. Without: students holding any
    /// assignment in one of those states.
    pub async fn outstanding(&self, name: Option<&str>) -> Vec<Student> {
        let mut result = Vec::new();
        for student in self.students().await {
            let assignments = student.assignments().await;
            let owes = match name {
                Some(name) => assignments
                    .iter()
                    .find(|a| a.name() == name)
                    .is_none_or(|a| a.status().is_outstanding()),
                None => assignments.iter().any(|a| a.status().is_outstanding()),
            };
            if owes {
                result.push(student);
            }
        }
        result
    }

    /// Names of the students returned by [`Roster::outstanding`]
    pub async fn outstanding_names(&self, name: Option<&str>) -> Vec<String> {
        let mut names = Vec::new();
        for student in self.outstanding(name).await {
            names.push(student.full_name().await);
        }
        names
    }

    /// Release every named assignment to every student
    ///
    /// Each name gets its own zero-delay timeline task that releases it to
    /// all students (in roster order, as the roster stands when the task
    /// runs). The returned handle resolves once all of them have finished.
    pub fn release_all<I, S>(&self, names: I) -> ReleaseHandle
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pending = Vec::new();

        for name in names {
            let name = name.into();
            let (done, signal) = oneshot::channel();
            let students = Arc::clone(&self.students);
            let task_name = name.clone();

            self.ctx.timeline.schedule(Duration::ZERO, async move {
                let snapshot = students.read().await.clone();
                for student in &snapshot {
                    student.update_status(&task_name, None).await;
                }
                debug!(assignment = %task_name, students = snapshot.len(), "Released");
                let _ = done.send(());
            });

            pending.push((name, signal));
        }

        ReleaseHandle::new(pending)
    }

    /// Send a final reminder for `name` to every student, in roster order
    pub async fn send_reminder(&self, name: &str) {
        let students = self.students().await;
        for student in &students {
            student.handle_reminder(name).await;
        }
        debug!(assignment = %name, students = students.len(), "Reminder sent");
    }
}
