//! Per-challenge countdown
//!
//! Pure state; the one-second recurrence is driven by the controller.

/// Seconds granted for each challenge attempt
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Stopped,
    Running { remaining: u32 },
}

/// Outcome of one decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still running with this many seconds left
    Running(u32),
    /// Reached zero; the recurrence must stop
    Expired,
    /// Tick from a stream that is no longer current
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    initial: u32,
    state: CountdownState,
    displayed: Option<u32>,
    run: u64,
}

impl Countdown {
    pub fn new(initial: u32) -> Self {
        Self {
            initial,
            state: CountdownState::Stopped,
            displayed: None,
            run: 0,
        }
    }

    /// Reset to the initial value and begin a new run
    ///
    /// Returns the id of the new run; ticks carrying any other id are
    /// ignored, so a restart can never leave two decrement streams live.
    pub fn start(&mut self) -> u64 {
        self.run += 1;
        self.state = CountdownState::Running {
            remaining: self.initial,
        };
        self.displayed = Some(self.initial);
        self.run
    }

    pub fn tick(&mut self, run: u64) -> CountdownTick {
        if run != self.run {
            return CountdownTick::Ignored;
        }
        match self.state {
            CountdownState::Stopped => CountdownTick::Ignored,
            CountdownState::Running { remaining } => {
                let remaining = remaining.saturating_sub(1);
                self.displayed = Some(remaining);
                if remaining == 0 {
                    self.state = CountdownState::Stopped;
                    CountdownTick::Expired
                } else {
                    self.state = CountdownState::Running { remaining };
                    CountdownTick::Running(remaining)
                }
            }
        }
    }

    /// Cancel the current run; the last displayed value is kept
    pub fn stop(&mut self) {
        self.state = CountdownState::Stopped;
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    /// Last rendered value, `None` before the first start
    pub fn displayed(&self) -> Option<u32> {
        self.displayed
    }

    pub fn run(&self) -> u64 {
        self.run
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECONDS)
    }
}
