//! Student and its timer-driven assignment transitions
//!
//! A [`Student`] owns its assignments and the timers that move them along:
//!
//! - a **work timer** per assignment (`start_working` → submission check),
//!   replaced whenever work is restarted
//! - a **grading timer** per assignment (`submit` → grade), never cancelled
//!   by another transition
//!
//! Timer callbacks re-check the current status before acting, so a timer that
//! was overtaken by another path (e.g. a reminder) does nothing.

mod ledger;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::assignment::{Assignment, Grade, Status};
use crate::context::Context;
use crate::notifications::Notification;
use ledger::Ledger;

/// Handle to a student
///
/// Cloning yields another handle to the same student. Pending timers hold a
/// handle too, so a student keeps progressing after it leaves a roster.
#[derive(Clone)]
pub struct Student {
    inner: Arc<Inner>,
}

struct Inner {
    id: Uuid,
    ledger: Mutex<Ledger>,
    ctx: Context,
}

impl Student {
    /// Create a student wired to the given context
    pub fn new(full_name: impl Into<String>, email: impl Into<String>, ctx: Context) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                ledger: Mutex::new(Ledger::new(full_name.into(), email.into())),
                ctx,
            }),
        }
    }

    /// Stable identity, independent of the (mutable) name
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub async fn full_name(&self) -> String {
        self.inner.ledger.lock().await.full_name.clone()
    }

    pub async fn email(&self) -> String {
        self.inner.ledger.lock().await.email.clone()
    }

    pub async fn set_full_name(&self, full_name: impl Into<String>) {
        self.inner.ledger.lock().await.full_name = full_name.into();
    }

    pub async fn set_email(&self, email: impl Into<String>) {
        self.inner.ledger.lock().await.email = email.into();
    }

    /// Snapshot of one assignment
    pub async fn assignment(&self, name: &str) -> Option<Assignment> {
        self.inner.ledger.lock().await.find(name).cloned()
    }

    /// Snapshot of all assignments, in first-touch order
    pub async fn assignments(&self) -> Vec<Assignment> {
        self.inner.ledger.lock().await.assignments.clone()
    }

    pub async fn status_of(&self, name: &str) -> Option<Status> {
        self.inner.ledger.lock().await.find(name).map(|a| a.status())
    }

    /// Number of work and grading timers not yet fired
    pub async fn pending_timers(&self) -> usize {
        self.inner.ledger.lock().await.pending_timers()
    }

    /// Average over graded assignments, `None` if nothing is graded yet
    pub async fn grade(&self) -> Option<f64> {
        self.inner.ledger.lock().await.recompute_overall()
    }

    /// Create the assignment if needed, and optionally grade it
    ///
    /// Creation and grading each produce a notification. This is the primitive
    /// behind roster-wide release (no grade) and direct grading.
    pub async fn update_status(&self, name: &str, grade: Option<Grade>) {
        let mut ledger = self.inner.ledger.lock().await;

        let (idx, created) = ledger.ensure(name);
        if created {
            self.notify(&ledger, idx).await;
        }

        if let Some(grade) = grade {
            ledger.assignments[idx].set_grade(grade);
            ledger.recompute_overall();
            self.notify(&ledger, idx).await;
        }
    }

    /// Move the assignment to working and (re)arm its work timer
    ///
    /// When the timer fires the assignment is submitted, unless it already
    /// advanced by another path. Restarting work replaces the pending timer.
    /// Submitted or graded assignments are left untouched.
    pub async fn start_working(&self, name: &str) {
        let mut ledger = self.inner.ledger.lock().await;

        let (idx, _) = ledger.ensure(name);
        let status = ledger.assignments[idx].status();
        if status.is_closed() {
            debug!(assignment = %name, %status, "Ignoring start_working on closed assignment");
            return;
        }

        ledger.assignments[idx].set_status(Status::Working);
        self.notify(&ledger, idx).await;

        let timeline = &self.inner.ctx.timeline;
        if let Some(previous) = ledger.work_timers.remove(name)
            && timeline.cancel(previous)
        {
            debug!(assignment = %name, "Replaced pending work timer");
        }

        let student = self.clone();
        let task_name = name.to_string();
        let timer = timeline.schedule(self.inner.ctx.timing.work_delay(), async move {
            student.on_work_timer(&task_name).await;
        });
        ledger.work_timers.insert(name.to_string(), timer);
    }

    /// Hand the assignment in and arm its grading timer
    ///
    /// Does nothing if it was already submitted or graded.
    pub async fn submit(&self, name: &str) {
        let mut ledger = self.inner.ledger.lock().await;
        let (idx, _) = ledger.ensure(name);
        self.submit_locked(&mut ledger, idx).await;
    }

    /// React to a final reminder: mark it and submit right away
    ///
    /// Reminders never create assignments, and do nothing once the
    /// assignment is submitted or graded.
    pub async fn handle_reminder(&self, name: &str) {
        let mut ledger = self.inner.ledger.lock().await;

        let Some(idx) = ledger.position(name) else {
            debug!(assignment = %name, "Reminder for unknown assignment ignored");
            return;
        };
        if ledger.assignments[idx].status().is_closed() {
            return;
        }

        ledger.assignments[idx].set_status(Status::FinalReminder);
        self.notify(&ledger, idx).await;
        self.submit_locked(&mut ledger, idx).await;
    }

    /// Cancel every pending timer, grading timers included
    ///
    /// Returns how many were cancelled.
    pub async fn cancel_timers(&self) -> usize {
        let mut guard = self.inner.ledger.lock().await;
        let ledger = &mut *guard;
        let timeline = &self.inner.ctx.timeline;

        let timers: Vec<_> = ledger
            .work_timers
            .drain()
            .chain(ledger.grade_timers.drain())
            .map(|(_, timer)| timer)
            .collect();
        let cancelled = timers.into_iter().filter(|t| timeline.cancel(*t)).count();

        debug!(student = %ledger.full_name, cancelled, "Cancelled pending timers");
        cancelled
    }

    async fn submit_locked(&self, ledger: &mut Ledger, idx: usize) {
        let status = ledger.assignments[idx].status();
        if status.is_closed() {
            debug!(assignment = %ledger.assignments[idx].name(), %status, "Already submitted");
            return;
        }

        ledger.assignments[idx].set_status(Status::Submitted);
        self.notify(ledger, idx).await;

        let name = ledger.assignments[idx].name().to_string();
        let student = self.clone();
        let task_name = name.clone();
        let timer = self
            .inner
            .ctx
            .timeline
            .schedule(self.inner.ctx.timing.grade_delay(), async move {
                student.on_grade_timer(&task_name).await;
            });
        ledger.grade_timers.insert(name, timer);
    }

    async fn on_work_timer(&self, name: &str) {
        let mut ledger = self.inner.ledger.lock().await;
        ledger.work_timers.remove(name);

        let Some(idx) = ledger.position(name) else {
            return;
        };
        let status = ledger.assignments[idx].status();
        if status.is_outstanding() {
            debug!(assignment = %name, "Work timer fired, submitting");
            self.submit_locked(&mut ledger, idx).await;
        } else {
            debug!(assignment = %name, %status, "Work timer fired after assignment advanced");
        }
    }

    // Fires unconditionally: a grade given directly in the meantime is overwritten
    async fn on_grade_timer(&self, name: &str) {
        let mut ledger = self.inner.ledger.lock().await;
        ledger.grade_timers.remove(name);

        let Some(idx) = ledger.position(name) else {
            return;
        };
        let grade = self.inner.ctx.grades.next_grade();
        ledger.assignments[idx].set_grade(grade);
        ledger.recompute_overall();
        self.notify(&ledger, idx).await;
    }

    async fn notify(&self, ledger: &Ledger, idx: usize) {
        let assignment = &ledger.assignments[idx];
        debug!(
            student = %ledger.full_name,
            assignment = %assignment.name(),
            status = %assignment.status(),
            "Status changed"
        );

        let notification = Notification {
            student_id: self.inner.id,
            student_name: ledger.full_name.clone(),
            student_email: ledger.email.clone(),
            assignment: assignment.name().to_string(),
            status: assignment.status(),
            grade: assignment.grade(),
            at: Utc::now(),
        };
        self.inner.ctx.sink.notify(&notification).await;
    }
}

impl std::fmt::Debug for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Student").field("id", &self.inner.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::grades::{FixedGrades, ScriptedGrades};
    use crate::notifications::MemorySink;
    use crate::timeline::Timeline;

    fn grade(value: i64) -> Grade {
        Grade::new(value).unwrap()
    }

    fn create_test_student(grades: Arc<dyn crate::grades::GradeSource>) -> (Student, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());
        let ctx = Context::with_timeline(Timeline::start())
            .with_sink(sink.clone())
            .with_grades(grades);
        (Student::new("John Lastname", "John@uwo.ca", ctx), sink)
    }

    fn fixed_student(value: i64) -> (Student, Arc<MemorySink>) {
        create_test_student(Arc::new(FixedGrades(grade(value))))
    }

    async fn settle(student: &Student) {
        student.inner.ctx.timeline.idle().await;
    }

    // ==================== Direct Grading Tests ====================

    #[tokio::test(start_paused = true)]
    async fn new_student_has_no_grade() {
        let (student, _) = fixed_student(75);
        assert_eq!(student.grade().await, None);
        assert!(student.assignments().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn update_status_with_grades_tracks_average() {
        let (student, sink) = fixed_student(75);

        student.update_status("A1", Some(grade(80))).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Pass));
        assert_eq!(student.grade().await, Some(80.0));

        student.update_status("A2", Some(grade(30))).await;
        assert_eq!(student.status_of("A2").await, Some(Status::Fail));
        assert_eq!(student.grade().await, Some(55.0));

        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![Status::Released, Status::Pass]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn update_status_without_grade_only_notifies_on_creation() {
        let (student, sink) = fixed_student(75);

        student.update_status("A1", None).await;
        student.update_status("A1", None).await;

        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![Status::Released]
        );
        assert_eq!(student.pending_timers().await, 0);
    }

    // ==================== Submission Tests ====================

    #[tokio::test(start_paused = true)]
    async fn double_submit_notifies_submitted_once() {
        let (student, sink) = fixed_student(75);

        student.submit("A1").await;
        student.submit("A1").await;
        assert_eq!(student.pending_timers().await, 1);

        settle(&student).await;

        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![Status::Submitted, Status::Pass]
        );
        assert_eq!(student.grade().await, Some(75.0));
    }

    #[tokio::test(start_paused = true)]
    async fn grading_happens_after_grade_delay() {
        let (student, _) = fixed_student(40);

        student.submit("A1").await;

        sleep(Duration::from_millis(499)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Submitted));

        sleep(Duration::from_millis(2)).await;
        let assignment = student.assignment("A1").await.unwrap();
        assert_eq!(assignment.status(), Status::Fail);
        assert_eq!(assignment.grade(), Some(grade(40)));
        assert_eq!(student.pending_timers().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn grading_timer_overwrites_direct_grade() {
        let (student, _) = fixed_student(75);

        student.submit("A1").await;
        student.update_status("A1", Some(grade(10))).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Fail));

        settle(&student).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Pass));
        assert_eq!(student.grade().await, Some(75.0));
    }

    // ==================== Work Timer Tests ====================

    #[tokio::test(start_paused = true)]
    async fn work_timer_submits_then_grades() {
        let (student, sink) = fixed_student(90);

        student.start_working("A1").await;

        sleep(Duration::from_millis(499)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Working));

        sleep(Duration::from_millis(2)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Submitted));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Pass));

        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![Status::Working, Status::Submitted, Status::Pass]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_work_replaces_pending_timer() {
        let (student, sink) = fixed_student(90);

        student.start_working("A1").await;
        sleep(Duration::from_millis(300)).await;
        student.start_working("A1").await;
        assert_eq!(student.pending_timers().await, 1);

        // First timer would have fired at 500
        sleep(Duration::from_millis(250)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Working));

        // Second fires at 800
        sleep(Duration::from_millis(300)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Submitted));

        settle(&student).await;
        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![
                Status::Working,
                Status::Working,
                Status::Submitted,
                Status::Pass
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn start_working_on_submitted_assignment_is_ignored() {
        let (student, sink) = fixed_student(90);

        student.submit("A1").await;
        student.start_working("A1").await;

        assert_eq!(student.status_of("A1").await, Some(Status::Submitted));
        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![Status::Submitted]
        );
    }

    // ==================== Reminder Tests ====================

    #[tokio::test(start_paused = true)]
    async fn reminder_on_released_fast_forwards_to_submission() {
        let (student, sink) = fixed_student(20);

        student.update_status("A1", None).await;
        student.handle_reminder("A1").await;
        assert_eq!(student.status_of("A1").await, Some(Status::Submitted));

        settle(&student).await;
        let statuses = sink.statuses(student.id(), "A1").await;
        assert_eq!(
            statuses,
            vec![
                Status::Released,
                Status::FinalReminder,
                Status::Submitted,
                Status::Fail
            ]
        );
        assert!(!statuses.contains(&Status::Working));
    }

    #[tokio::test(start_paused = true)]
    async fn reminder_never_creates_assignment() {
        let (student, sink) = fixed_student(75);

        student.handle_reminder("A1").await;

        assert!(student.assignment("A1").await.is_none());
        assert_eq!(sink.current_seq(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reminder_after_submission_is_ignored() {
        let (student, sink) = fixed_student(75);

        student.submit("A1").await;
        student.handle_reminder("A1").await;

        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![Status::Submitted]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_work_timer_after_reminder_does_nothing() {
        let (student, sink) = fixed_student(75);

        student.start_working("A1").await;
        sleep(Duration::from_millis(200)).await;
        student.handle_reminder("A1").await;

        // Grading lands at 700, the stale work timer fires at 500
        sleep(Duration::from_millis(350)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Submitted));

        settle(&student).await;
        assert_eq!(
            sink.statuses(student.id(), "A1").await,
            vec![
                Status::Working,
                Status::FinalReminder,
                Status::Submitted,
                Status::Pass
            ]
        );
    }

    // ==================== Misc Tests ====================

    #[tokio::test(start_paused = true)]
    async fn cancel_timers_stops_pending_transitions() {
        let (student, sink) = fixed_student(75);

        student.start_working("A1").await;
        student.submit("A2").await;
        assert_eq!(student.cancel_timers().await, 2);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(student.status_of("A1").await, Some(Status::Working));
        assert_eq!(student.status_of("A2").await, Some(Status::Submitted));
        assert_eq!(sink.current_seq(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn random_path_grades_average_over_assignments() {
        let (student, _) = create_test_student(Arc::new(ScriptedGrades::new([
            grade(100),
            grade(51),
            grade(0),
        ])));

        for name in ["A1", "A2", "A3"] {
            student.submit(name).await;
        }
        settle(&student).await;

        assert_eq!(student.status_of("A1").await, Some(Status::Pass));
        assert_eq!(student.status_of("A2").await, Some(Status::Pass));
        assert_eq!(student.status_of("A3").await, Some(Status::Fail));
        assert_eq!(student.grade().await, Some(151.0 / 3.0));
    }

    #[tokio::test(start_paused = true)]
    async fn renamed_student_reports_new_name() {
        let (student, sink) = fixed_student(75);

        student.set_full_name("Jane Lastname").await;
        student.set_email("jane@uwo.ca").await;
        student.update_status("A1", None).await;

        let notifications = sink.for_student(student.id()).await;
        assert_eq!(notifications[0].student_name, "Jane Lastname");
        assert_eq!(notifications[0].student_email, "jane@uwo.ca");
        assert_eq!(student.email().await, "jane@uwo.ca");
    }
}
