//! Challenge Session State Machine
//!
//! Pure transition logic. Each transition returns the [`Effect`]s the
//! controller must perform (timer changes, network calls); the machine
//! itself never sleeps, spawns or performs I/O.
//!
//! ```text
//! Idle --start--> Starting --ack--> Sampling <--pause elapsed-- Paused
//!                    |                 |  \--passed=true--------^
//!                    +--start failed--> Idle
//!                                      |--done--> Done
//!                                      \--failed--> Failed
//! ```
//!
//! Async results carry the epoch they were issued in. Every start and stop
//! bumps the epoch, so results belonging to an older session are dropped.

use crate::domain::countdown::{Countdown, CountdownTick};
use crate::domain::entities::Session;
use crate::domain::value_objects::{ChallengeLabel, VerifierResponse};
use crate::domain::view::{Phase, SessionView, StatusLine};
use crate::error::{LivenessError, LivenessResult};

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call `start_session` on the verifier
    RequestSessionStart { epoch: u64 },
    /// (Re)start the cadence timer; ticks carry `epoch`
    StartCadence { epoch: u64 },
    StopCadence,
    /// (Re)start the one-second countdown recurrence; ticks carry `run`
    StartCountdown { run: u64 },
    StopCountdown,
    /// Schedule the end of the post-pass pause
    SchedulePauseEnd { epoch: u64 },
    CancelPauseEnd,
    /// Sample one frame and submit it
    CaptureAndSubmit { epoch: u64 },
}

/// Effects that bring every timer to rest
fn halt_effects() -> Vec<Effect> {
    vec![
        Effect::StopCadence,
        Effect::StopCountdown,
        Effect::CancelPauseEnd,
    ]
}

#[derive(Debug, Clone)]
pub struct SessionMachine {
    epoch: u64,
    session: Option<Session>,
    /// A submission is in flight; further cadence ticks are skipped
    submitting: bool,
    countdown: Countdown,
    /// Challenge announced with the last pass, shown when the pause ends
    upcoming: Option<ChallengeLabel>,
    view: SessionView,
}

impl SessionMachine {
    pub fn new(countdown_seconds: u32) -> Self {
        Self {
            epoch: 0,
            session: None,
            submitting: false,
            countdown: Countdown::new(countdown_seconds),
            upcoming: None,
            view: SessionView::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> Phase {
        self.view.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.active)
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.paused)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn view(&self) -> &SessionView {
        &self.view
    }

    // ========================================================================
    // Operator commands
    // ========================================================================

    /// Start (or restart) a session from any state
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = self.halt();
        self.epoch += 1;
        self.session = None;
        self.upcoming = None;
        self.view.phase = Phase::Starting;
        self.view.attempt += 1;

        tracing::info!(epoch = self.epoch, "Requesting new liveness session");
        effects.push(Effect::RequestSessionStart { epoch: self.epoch });
        effects
    }

    /// Operator cancel; the verifier is not notified
    pub fn stop(&mut self) -> Vec<Effect> {
        let effects = self.halt();
        let previous = self.view.phase;
        self.epoch += 1;
        self.upcoming = None;
        self.view.phase = Phase::Idle;

        if previous.is_active() || previous == Phase::Starting {
            self.view.status = StatusLine::Cancelled;
            tracing::info!(
                session_id = ?self.session.as_ref().map(|s| s.id),
                "Liveness session cancelled by operator"
            );
        }
        effects
    }

    // ========================================================================
    // Async results and timer ticks
    // ========================================================================

    pub fn session_started(&mut self, epoch: u64) -> Vec<Effect> {
        if epoch != self.epoch || self.view.phase != Phase::Starting {
            tracing::debug!(epoch, current = self.epoch, "Ignoring stale session start");
            return Vec::new();
        }

        let session = Session::begin(epoch);
        tracing::info!(session_id = %session.id, epoch, "Liveness session started");
        self.session = Some(session);

        self.view = SessionView {
            phase: Phase::Sampling,
            challenge: None,
            status: StatusLine::Started,
            countdown: None,
            attempt: self.view.attempt,
        };

        // Clear anything a racing path may have left behind
        let mut effects = halt_effects();
        effects.push(Effect::StartCadence { epoch });
        effects.push(self.restart_countdown());
        effects
    }

    pub fn session_start_failed(&mut self, epoch: u64, error: &LivenessError) -> Vec<Effect> {
        if epoch != self.epoch || self.view.phase != Phase::Starting {
            tracing::debug!(epoch, "Ignoring stale session start failure");
            return Vec::new();
        }

        tracing::error!(epoch, error = %error, kind = %error.kind(), "Failed to start liveness session");
        self.view.phase = Phase::Idle;
        Vec::new()
    }

    pub fn cadence_tick(&mut self, epoch: u64) -> Vec<Effect> {
        if epoch != self.epoch {
            return Vec::new();
        }
        if self.view.phase != Phase::Sampling || !self.accepts_frames() {
            tracing::trace!(phase = %self.view.phase, "Cadence tick while not sampling");
            return Vec::new();
        }
        if self.submitting {
            tracing::debug!(epoch, "Previous submission still in flight, skipping tick");
            return Vec::new();
        }

        self.submitting = true;
        vec![Effect::CaptureAndSubmit { epoch }]
    }

    /// The sampler had no sized frame; the tick is skipped silently
    pub fn frame_unavailable(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.submitting = false;
        }
    }

    pub fn countdown_tick(&mut self, run: u64) -> Vec<Effect> {
        match self.countdown.tick(run) {
            CountdownTick::Running(remaining) => {
                self.view.countdown = Some(remaining);
                Vec::new()
            }
            CountdownTick::Expired => {
                self.view.countdown = Some(0);
                tracing::debug!(epoch = self.epoch, "Challenge countdown reached zero");
                vec![Effect::StopCountdown]
            }
            CountdownTick::Ignored => Vec::new(),
        }
    }

    pub fn pause_elapsed(&mut self, epoch: u64) -> Vec<Effect> {
        if epoch != self.epoch || self.view.phase != Phase::Paused {
            return Vec::new();
        }

        if let Some(session) = self.session.as_mut() {
            session.paused = false;
        }
        self.view.phase = Phase::Sampling;
        if let Some(next) = self.upcoming.take() {
            self.view.challenge = Some(next);
        }
        self.view.status = StatusLine::Resumed;

        vec![self.restart_countdown()]
    }

    pub fn submission_completed(
        &mut self,
        epoch: u64,
        outcome: LivenessResult<VerifierResponse>,
    ) -> Vec<Effect> {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "Discarding response from previous session");
            return Vec::new();
        }
        self.submitting = false;

        if self.view.phase != Phase::Sampling {
            tracing::debug!(phase = %self.view.phase, "Discarding response outside sampling");
            return Vec::new();
        }

        match outcome {
            Err(error) => {
                error.log();
                self.view.status = StatusLine::ConnectionIssue;
                Vec::new()
            }
            Ok(VerifierResponse::Done { message }) => {
                self.finish(Phase::Done, StatusLine::Succeeded(message))
            }
            Ok(VerifierResponse::Failed { message }) => {
                self.finish(Phase::Failed, StatusLine::Failed(message))
            }
            Ok(VerifierResponse::InProgress {
                challenge,
                message,
                passed: false,
                ..
            }) => {
                tracing::debug!(challenge = %challenge, "Challenge not yet satisfied");
                self.view.challenge = Some(challenge);
                self.view.status = StatusLine::Verifier(message);
                Vec::new()
            }
            Ok(VerifierResponse::InProgress {
                challenge,
                message,
                passed: true,
                next_challenge,
            }) => {
                tracing::info!(
                    challenge = %challenge,
                    next = ?next_challenge.as_ref().map(ChallengeLabel::as_str),
                    "Challenge passed"
                );
                self.countdown.stop();
                if let Some(session) = self.session.as_mut() {
                    session.paused = true;
                }
                self.view.phase = Phase::Paused;
                self.view.challenge = Some(challenge.clone());
                self.view.status = StatusLine::Passed {
                    challenge,
                    next: next_challenge.clone(),
                    message,
                };
                self.upcoming = next_challenge;

                vec![Effect::StopCountdown, Effect::SchedulePauseEnd { epoch }]
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn accepts_frames(&self) -> bool {
        self.session.as_ref().is_some_and(Session::accepts_frames)
    }

    fn restart_countdown(&mut self) -> Effect {
        let run = self.countdown.start();
        self.view.countdown = self.countdown.displayed();
        Effect::StartCountdown { run }
    }

    /// Stop every timer and deactivate the session, if any
    fn halt(&mut self) -> Vec<Effect> {
        self.countdown.stop();
        self.submitting = false;
        if let Some(session) = self.session.as_mut() {
            session.deactivate();
        }
        halt_effects()
    }

    fn finish(&mut self, phase: Phase, status: StatusLine) -> Vec<Effect> {
        let effects = self.halt();
        if let Some(session) = self.session.as_ref() {
            tracing::info!(
                session_id = %session.id,
                outcome = %phase,
                elapsed_secs = session.elapsed_secs(),
                "Liveness session finished"
            );
        }
        self.upcoming = None;
        self.view.phase = phase;
        self.view.status = status;
        effects
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new(crate::domain::countdown::DEFAULT_COUNTDOWN_SECONDS)
    }
}
