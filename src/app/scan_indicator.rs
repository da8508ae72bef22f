// SPDX-License-Identifier: GPL-3.0-only

//! Scan indicator animation driver
//!
//! Drives the line that sweeps across the scanner area. The position is a
//! progress value in `[0, 1)` that grows linearly over one period and then
//! jumps back to 0, forever. It is purely cosmetic: nothing in the scan
//! session reads it, and session transitions never touch it.
//!
//! The loop runs as its own tokio task and publishes progress on a `watch`
//! channel. It stops when its cancellation token fires or the driver is
//! dropped; the channel closes with it.

use crate::app::cancellation::CancellationToken;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Animation progress after `elapsed`, for a cycle of length `period`
pub fn phase_at(elapsed: Duration, period: Duration) -> f32 {
    let period_ns = period.as_nanos();
    if period_ns == 0 {
        return 0.0;
    }
    let into_cycle = elapsed.as_nanos() % period_ns;
    let phase = (into_cycle as f64 / period_ns as f64) as f32;
    // f64 -> f32 rounding can land on exactly 1.0 at the very end of a cycle
    phase.min(1.0 - f32::EPSILON)
}

/// Handle to a running indicator loop
pub struct ScanIndicator {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
    progress: watch::Receiver<f32>,
}

impl ScanIndicator {
    /// Spawn the animation loop on `runtime`
    ///
    /// `frame_interval` is how often a new progress value is published.
    pub fn start(runtime: &Handle, period: Duration, frame_interval: Duration) -> Self {
        let frame_interval = frame_interval.max(Duration::from_millis(1));
        let (tx, rx) = watch::channel(0.0_f32);
        let token = CancellationToken::new();
        let loop_token = token.clone();

        debug!(?period, ?frame_interval, "Scan indicator starting");

        let task = runtime.spawn(async move {
            let epoch = Instant::now();
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = ticker.tick() => {
                        tx.send_replace(phase_at(epoch.elapsed(), period));
                    }
                }
            }
            trace!("Scan indicator loop ended");
        });

        Self {
            token,
            task: Some(task),
            progress: rx,
        }
    }

    /// Latest published progress
    pub fn progress(&self) -> f32 {
        *self.progress.borrow()
    }

    /// Receiver for progress updates, closed when the loop ends
    pub fn subscribe(&self) -> watch::Receiver<f32> {
        self.progress.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the loop without waiting for it
    pub fn stop(&mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Scan indicator stopped");
        }
    }

    /// Cancel the loop and wait until it has exited
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ScanIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}
