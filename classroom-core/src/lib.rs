//! classroom-core: timer-driven assignment lifecycle simulation
//!
//! This crate models a class of students working through assignments:
//!
//! - **Assignments** - [`Assignment`] and its [`Status`] state machine
//! - **Students** - [`Student`] owns assignments and the timers that advance them
//! - **Roster** - [`Roster`] fans operations out across every student
//! - **Notifications** - [`NotificationSink`] receives every status change
//! - **Timeline** - [`Timeline`] runs all deferred work on one logical timeline
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use classroom_core::{ConsoleSink, Context, Roster};
//!
//! # async fn example() -> Result<(), classroom_core::ClassroomError> {
//! let ctx = Context::new().with_sink(Arc::new(ConsoleSink::stdout()));
//! let roster = Roster::new(ctx);
//!
//! let john = roster.enroll("John Lastname", "John@uwo.ca").await;
//! roster.release_all(["A1", "A2"]).await?;
//!
//! john.start_working("A1").await;
//! roster.send_reminder("A1").await;
//!
//! roster.context().timeline.idle().await;
//! println!("overall: {:?}", john.grade().await);
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! ```text
//!   release_all ──► released ──start_working──► working
//!                      │                           │ work timer (500)
//!                      │ send_reminder             ▼
//!                      └──► final_reminder ──► submitted
//!                                                  │ grading timer (500)
//!                                                  ▼
//!                                             pass | fail
//! ```

pub mod assignment;
pub mod config;
pub mod context;
pub mod error;
pub mod grades;
pub mod notifications;
pub mod roster;
pub mod student;
pub mod timeline;

// Re-export key types for convenience
pub use assignment::{Assignment, Grade, MAX_GRADE, PASS_THRESHOLD, Status};
pub use config::{ClassroomConfig, RosterConfig, TimingConfig};
pub use context::Context;
pub use error::{ClassroomError, Result};
pub use grades::{FixedGrades, GradeSource, RandomGrades, ScriptedGrades};
pub use notifications::{
    ConsoleSink, JsonLinesSink, MemorySink, Notification, NotificationSeq, NotificationSink,
    describe_status, render,
};
pub use roster::{ReleaseHandle, RemoveTarget, Roster};
pub use student::Student;
pub use timeline::{TimerId, TimerTask, Timeline};
