//! Running jobs off the caller's thread.
//!
//! Each submitted job runs on its own blocking worker, parallel to other
//! jobs and to whatever drives the live world. The job owns its snapshot,
//! node store, and diagnostics, so no synchronization is needed beyond the
//! interrupt flag and the result channel.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio::sync::oneshot;

use crate::job::{InterruptFlag, PathJob};
use crate::path::Path;

/// Handle to an in-flight search.
pub struct PathHandle {
    interrupt: InterruptFlag,
    receiver: oneshot::Receiver<Option<Path>>,
}

impl PathHandle {
    /// Ask the job to stop at its next node expansion. An interrupted job
    /// resolves to `None`.
    pub fn interrupt(&self) {
        self.interrupt.raise();
    }

    /// Wait for the search to finish.
    pub async fn path(self) -> Option<Path> {
        self.receiver.await.unwrap_or(None)
    }
}

/// Submit a job to a blocking worker. Must be called within a tokio
/// runtime.
///
/// A job that panics is logged and resolves to `None`; its completion hook
/// still fires with whatever diagnostic data the search produced first.
pub fn submit(mut job: PathJob) -> PathHandle {
    let interrupt = job.interrupt_flag();
    let (tx, rx) = oneshot::channel();

    tokio::task::spawn_blocking(move || {
        let path = match catch_unwind(AssertUnwindSafe(|| job.search())) {
            Ok(path) => path,
            Err(_) => {
                tracing::warn!("path search panicked; returning no path");
                None
            }
        };
        if let Some(hook) = job.take_completion_hook() {
            hook(job.calculation_data(), path.as_ref());
        }
        // A dropped receiver just means the caller lost interest.
        let _ = tx.send(path);
    });

    PathHandle {
        interrupt,
        receiver: rx,
    }
}
