//! Observable session state
//!
//! What the operator sees, as structured data. Text rendering lives in
//! `presentation::render`.

use crate::domain::value_objects::ChallengeLabel;
use derive_more::Display;

/// Lifecycle phase of the session controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Phase {
    /// No session
    #[default]
    Idle,
    /// Session-start request in flight
    Starting,
    /// Cadence firing, countdown running
    Sampling,
    /// Between a passed challenge and the next one
    Paused,
    /// Terminal success
    Done,
    /// Terminal failure, includes spoof detection
    Failed,
}

impl Phase {
    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Sampling | Phase::Paused)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

/// Status text shown under the challenge label
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusLine {
    #[default]
    Blank,
    /// Verifier acknowledged a new session
    Started,
    /// Verifier message for the current attempt
    Verifier(String),
    /// Challenge just passed; the next one follows after the pause
    Passed {
        challenge: ChallengeLabel,
        next: Option<ChallengeLabel>,
        message: String,
    },
    /// Pause over, subject should perform the next challenge
    Resumed,
    /// Submission failed in transport; the next tick retries
    ConnectionIssue,
    Succeeded(String),
    Failed(String),
    /// Operator stopped the session
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub phase: Phase,
    pub challenge: Option<ChallengeLabel>,
    pub status: StatusLine,
    /// Seconds left for the current challenge, `None` before the first start
    pub countdown: Option<u32>,
    /// Number of start commands processed so far
    pub attempt: u64,
}
