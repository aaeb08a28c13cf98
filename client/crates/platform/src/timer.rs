//! Cancellable Timers
//!
//! Thin wrappers around tokio tasks. Each timer owns at most one task handle:
//! starting a timer that is already running aborts the previous task first,
//! so two tick streams can never run for the same timer.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Fixed-interval timer
///
/// The first tick fires one full period after [`RepeatingTimer::start`].
#[derive(Debug)]
pub struct RepeatingTimer {
    name: &'static str,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTimer {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period: period.max(MIN_PERIOD),
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking, replacing any previous tick stream
    ///
    /// `on_tick` returns `false` to end the stream from the inside (for
    /// example when the receiving side of a channel has gone away).
    pub fn start<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        if self.stop() {
            tracing::debug!(timer = self.name, "Restarting running timer");
        }

        let period = self.period;
        let name = self.name;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    tracing::debug!(timer = name, "Timer tick receiver closed");
                    break;
                }
            }
        }));
    }

    /// Cancel future ticks
    ///
    /// Safe to call in any state. Returns `true` if a task was cancelled.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Single delayed callback
#[derive(Debug)]
pub struct OneShotTimer {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl OneShotTimer {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Run `f` after `delay`, replacing any pending callback
    pub fn schedule<F>(&mut self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            tracing::debug!(timer = self.name, "Replacing pending one-shot timer");
        }
        self.handle = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            f();
        }));
    }

    /// Drop the pending callback, if any. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for OneShotTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
