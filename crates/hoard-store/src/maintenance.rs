//! Periodic engine maintenance
//!
//! A single named thread wakes every `interval`, runs
//! [`KvEngine::collect_garbage`], and goes back to sleep. The thread takes
//! the engine lock only for the duration of one collection, so request
//! traffic is never blocked across ticks.

use crate::errors::{io_error, Result};
use crate::kv::KvEngine;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

struct Signal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

/// Handle to the running maintenance thread
///
/// Stopping is explicit via [`shutdown`](MaintenanceTask::shutdown) and also
/// happens on drop. Either way the thread is joined before returning.
pub struct MaintenanceTask {
    signal: Arc<Signal>,
    handle: Option<JoinHandle<()>>,
}

impl MaintenanceTask {
    /// Start collecting garbage on `engine` every `interval`
    ///
    /// # Errors
    ///
    /// `Io` if the thread cannot be spawned.
    pub fn spawn(engine: Arc<KvEngine>, interval: Duration) -> Result<Self> {
        let signal = Arc::new(Signal {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
        });

        let thread_signal = Arc::clone(&signal);
        let handle = std::thread::Builder::new()
            .name("hoard-maintenance".to_string())
            .spawn(move || run_loop(&engine, &thread_signal, interval))
            .map_err(|e| io_error("spawn_maintenance", e))?;

        tracing::debug!(interval_secs = interval.as_secs(), "maintenance task started");
        Ok(Self {
            signal,
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and wait for it to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        {
            let mut stopped = self.signal.stopped.lock();
            *stopped = true;
            self.signal.wake.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("maintenance thread panicked");
            }
            tracing::debug!("maintenance task stopped");
        }
    }
}

impl Drop for MaintenanceTask {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(engine: &KvEngine, signal: &Signal, interval: Duration) {
    loop {
        {
            let mut stopped = signal.stopped.lock();
            let deadline = Instant::now() + interval;
            // Spurious wakeups re-enter the wait until the deadline passes
            while !*stopped {
                if signal.wake.wait_until(&mut stopped, deadline).timed_out() {
                    break;
                }
            }
            if *stopped {
                return;
            }
        }

        match engine.collect_garbage() {
            Ok(pages) => tracing::debug!(pages_reclaimed = pages, "garbage collection tick"),
            Err(e) => tracing::warn!(
                err.code = e.code(),
                error = %e,
                "garbage collection failed"
            ),
        }
    }
}
