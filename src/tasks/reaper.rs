//! Scheduled Reaper
//!
//! Generic repeating task that invokes a callback on a fixed interval until
//! stopped. The cache engine uses it to sweep expired entries.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};

/// Name given to the reaper's OS thread.
const REAPER_THREAD_NAME: &str = "mini-cache-reaper";

/// A running reaper thread and the signal that stops it.
struct Worker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

// == Reaper ==
/// Runs a zero-argument task repeatedly on its own thread.
///
/// The thread drives a current-thread tokio runtime so that the wait between
/// two runs can be interrupted by [`Reaper::stop`] instead of sleeping out the
/// full interval.
#[derive(Default)]
pub struct Reaper {
    worker: Option<Worker>,
}

impl Reaper {
    /// Creates a reaper that is not running yet.
    pub fn new() -> Self {
        Self { worker: None }
    }

    // == Start ==
    /// Starts invoking `task` every `interval`.
    ///
    /// The first invocation happens one interval after start. If the reaper is
    /// already running it is stopped first and restarted with the new
    /// parameters. Panics raised by `task` are caught and logged; the next tick
    /// proceeds normally.
    ///
    /// # Errors
    /// Returns `CacheError::Failure` if the interval is zero or the thread or
    /// timer runtime cannot be created.
    pub fn start<F>(&mut self, interval: Duration, mut task: F) -> Result<()>
    where
        F: FnMut() + Send + 'static,
    {
        if interval.is_zero() {
            return Err(CacheError::Failure(
                "Reaper interval must be greater than zero".to_string(),
            ));
        }

        self.stop();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| CacheError::Failure(format!("Failed to build reaper runtime: {}", e)))?;

        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = thread::Builder::new()
            .name(REAPER_THREAD_NAME.to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    info!("Starting reaper with interval of {:?}", interval);

                    let mut ticker = tokio::time::interval(interval);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    // The first tick completes immediately
                    ticker.tick().await;

                    loop {
                        tokio::select! {
                            _ = &mut shutdown_rx => break,
                            _ = ticker.tick() => {
                                if panic::catch_unwind(AssertUnwindSafe(&mut task)).is_err() {
                                    warn!("Reaper task panicked; continuing with next tick");
                                }
                            }
                        }
                    }

                    debug!("Reaper loop exited");
                });
            })
            .map_err(|e| CacheError::Failure(format!("Failed to spawn reaper thread: {}", e)))?;

        self.worker = Some(Worker { shutdown, handle });
        Ok(())
    }

    // == Stop ==
    /// Stops the reaper and blocks until an in-flight run has completed.
    ///
    /// Calling `stop` on a reaper that is not running does nothing.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        // The receiver is gone if the loop already exited
        let _ = worker.shutdown.send(());

        if worker.handle.join().is_err() {
            warn!("Reaper thread terminated abnormally");
        } else {
            info!("Reaper stopped");
        }
    }

    // == Is Running ==
    /// Reports whether the reaper thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Reaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reaper")
            .field("running", &self.is_running())
            .finish()
    }
}
