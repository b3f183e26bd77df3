//! Single logical timeline for deferred work
//!
//! Every deferred callback in the simulation (work timers, grading timers,
//! release ticks) is queued on a [`Timeline`]. One driver task owns the queue
//! and runs due callbacks one at a time, so all timer-driven mutation happens
//! on a single logical timeline.
//!
//! Ordering: callbacks fire in deadline order; callbacks with the same
//! deadline fire in the order they were scheduled.
//!
//! # Architecture
//!
//! ```text
//!  schedule(delay, task) ──► BTreeMap<(deadline, seq), task>
//!                                       │
//!                          driver: sleep_until(first deadline)
//!                                       │
//!                               run due tasks in order
//! ```

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::time::{self, Instant};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, trace};

/// A deferred unit of work
pub type TimerTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Handle to a scheduled task, usable for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    deadline: Instant,
    seq: u64,
}

impl TimerId {
    /// When the task is due
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[derive(Default)]
struct Queue {
    entries: BTreeMap<TimerId, TimerTask>,
    next_seq: u64,
}

struct Shared {
    queue: Mutex<Queue>,
    /// Wakes the driver when the earliest deadline may have changed
    wake: Notify,
    /// Queued plus currently running tasks
    outstanding: watch::Sender<usize>,
    shutdown: CancellationToken,
}

impl Shared {
    fn queue(&self) -> MutexGuard<'_, Queue> {
        match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.queue().entries.keys().next().map(|id| id.deadline)
    }

    fn pop_due(&self, now: Instant) -> Option<(TimerId, TimerTask)> {
        let mut queue = self.queue();
        let first = *queue.entries.keys().next()?;
        if first.deadline > now {
            return None;
        }
        queue.entries.remove_entry(&first)
    }

    /// Uncount a task that was counted by `schedule`
    ///
    /// Only a shutdown (which zeroes the count) can leave nothing to uncount.
    fn task_done(&self) {
        self.outstanding.send_modify(|n| match n.checked_sub(1) {
            Some(left) => *n = left,
            None => debug_assert!(
                self.shutdown.is_cancelled(),
                "timeline task finished without being counted"
            ),
        });
    }
}

/// Cloneable handle to the timeline
///
/// The driver stops once every handle is dropped and no queued task keeps
/// one alive, or when [`Timeline::shutdown`] is called.
#[derive(Clone)]
pub struct Timeline {
    shared: Arc<Shared>,
    _guard: Arc<DropGuard>,
}

impl Timeline {
    /// Start a timeline driver on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start() -> Self {
        let shutdown = CancellationToken::new();
        let (outstanding, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue::default()),
            wake: Notify::new(),
            outstanding,
            shutdown: shutdown.clone(),
        });

        tokio::spawn(drive(Arc::clone(&shared)));

        Self {
            shared,
            _guard: Arc::new(shutdown.drop_guard()),
        }
    }

    /// Queue `task` to run after `delay`
    pub fn schedule<F>(&self, delay: Duration, task: F) -> TimerId
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        let id = {
            let mut queue = self.shared.queue();
            let id = TimerId {
                deadline,
                seq: queue.next_seq,
            };
            queue.next_seq += 1;

            if self.shared.shutdown.is_cancelled() {
                debug!(?delay, "Timeline stopped, dropping task");
                return id;
            }
            // Count before the task is visible to the driver
            self.shared.outstanding.send_modify(|n| *n += 1);
            queue.entries.insert(id, Box::pin(task));
            id
        };

        self.shared.wake.notify_one();
        trace!(seq = id.seq, ?delay, "Task scheduled");
        id
    }

    /// Remove a task that has not fired yet
    ///
    /// Returns false if the task already fired or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        let removed = self.shared.queue().entries.remove(&id).is_some();
        if removed {
            self.shared.task_done();
            self.shared.wake.notify_one();
            trace!(seq = id.seq, "Task cancelled");
        }
        removed
    }

    /// Number of queued tasks
    pub fn pending(&self) -> usize {
        self.shared.queue().entries.len()
    }

    /// Resolve once nothing is queued or running
    ///
    /// Must not be awaited from inside a timeline task.
    pub async fn idle(&self) {
        let mut rx = self.shared.outstanding.subscribe();
        // The sender lives in `shared`, which we hold, so this cannot fail
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Stop the driver and drop every queued task
    pub fn shutdown(&self) {
        self.shared.shutdown.cancel();
        let dropped = std::mem::take(&mut self.shared.queue().entries);
        self.shared.outstanding.send_replace(0);
        debug!(dropped = dropped.len(), "Timeline shut down");
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.shutdown.is_cancelled()
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("pending", &self.pending())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

async fn drive(shared: Arc<Shared>) {
    trace!("Timeline driver started");

    loop {
        let next = shared.next_deadline();
        let sleep = async {
            match next {
                Some(deadline) => time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = shared.shutdown.cancelled() => break,
            _ = shared.wake.notified() => continue,
            _ = sleep => {}
        }

        while let Some((id, task)) = shared.pop_due(Instant::now()) {
            if shared.shutdown.is_cancelled() {
                break;
            }
            trace!(seq = id.seq, "Task firing");
            task.await;
            shared.task_done();
        }
    }

    trace!("Timeline driver stopped");
}
