//! Join handle for roster-wide releases

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::{ClassroomError, Result};

/// Completion signal for [`Roster::release_all`](super::Roster::release_all)
///
/// The release runs whether or not this handle is awaited. Awaiting it (or
/// calling [`ReleaseHandle::wait`]) resolves once every released name has been
/// applied to every student.
#[derive(Debug)]
pub struct ReleaseHandle {
    pending: Vec<(String, oneshot::Receiver<()>)>,
}

impl ReleaseHandle {
    pub(super) fn new(pending: Vec<(String, oneshot::Receiver<()>)>) -> Self {
        Self { pending }
    }

    /// Assignment names covered by this release
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(|(name, _)| name.as_str())
    }

    /// Wait for every per-name fan-out to finish
    ///
    /// Fails with [`ClassroomError::TimelineStopped`] if the timeline shut
    /// down before a fan-out ran.
    pub async fn wait(self) -> Result<()> {
        for (name, done) in self.pending {
            if done.await.is_err() {
                warn!(assignment = %name, "Release dropped before it ran");
                return Err(ClassroomError::TimelineStopped);
            }
            debug!(assignment = %name, "Release joined");
        }
        Ok(())
    }
}

impl IntoFuture for ReleaseHandle {
    type Output = Result<()>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_once_all_signals_fire() {
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let handle = ReleaseHandle::new(vec![("A1".to_string(), rx1), ("A2".to_string(), rx2)]);
        assert_eq!(handle.names().collect::<Vec<_>>(), vec!["A1", "A2"]);

        let join = tokio::spawn(handle.wait());
        tx2.send(()).unwrap();
        tx1.send(()).unwrap();

        assert!(join.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn dropped_signal_reports_timeline_stopped() {
        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);

        let result = ReleaseHandle::new(vec![("A1".to_string(), rx)]).await;
        assert!(matches!(result, Err(ClassroomError::TimelineStopped)));
    }

    #[tokio::test]
    async fn empty_release_resolves_immediately() {
        assert!(ReleaseHandle::new(Vec::new()).await.is_ok());
    }
}
