//! Session Controller
//!
//! Runs the [`SessionMachine`] inside a single tokio task. Operator commands,
//! timer ticks and verifier results all arrive as [`Event`]s on one channel,
//! so session state is only ever touched by that task. Observers follow the
//! session through a `watch` channel carrying [`SessionView`] snapshots.

use crate::application::config::LivenessConfig;
use crate::application::sampler::{SharedSampler, lock_sampler};
use crate::domain::ports::Verifier;
use crate::domain::state_machine::{Effect, SessionMachine};
use crate::domain::value_objects::VerifierResponse;
use crate::domain::view::{Phase, SessionView};
use crate::error::{LivenessError, LivenessResult};
use platform::timer::{OneShotTimer, RepeatingTimer};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug)]
enum Event {
    Start,
    Stop,
    Shutdown,
    StartCompleted {
        epoch: u64,
        result: LivenessResult<()>,
    },
    CadenceTick {
        epoch: u64,
    },
    CountdownTick {
        run: u64,
    },
    PauseElapsed {
        epoch: u64,
    },
    SubmitCompleted {
        epoch: u64,
        result: LivenessResult<VerifierResponse>,
    },
}

/// Handle to a running session controller
///
/// Dropping the handle aborts the controller task and every timer it owns.
/// Verifier calls already in flight run to completion; their results are
/// discarded.
pub struct SessionController {
    events: mpsc::UnboundedSender<Event>,
    view: watch::Receiver<SessionView>,
    requested: AtomicU64,
    task: Option<JoinHandle<()>>,
}

impl SessionController {
    /// Spawn the controller task on the current tokio runtime
    pub fn spawn<V>(verifier: Arc<V>, sampler: SharedSampler, config: &LivenessConfig) -> Self
    where
        V: Verifier + Sync + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(SessionView::default());

        let actor = SessionActor {
            machine: SessionMachine::new(config.countdown_seconds),
            verifier,
            sampler,
            events: events_tx.clone(),
            view: view_tx,
            cadence: RepeatingTimer::new("cadence", config.cadence_interval),
            countdown: RepeatingTimer::new("countdown", config.countdown_tick),
            pause: OneShotTimer::new("pause"),
            pause_after_pass: config.pause_after_pass,
        };
        let task = tokio::spawn(actor.run(events_rx));

        tracing::debug!(
            cadence_ms = config.cadence_interval_ms(),
            countdown_seconds = config.countdown_seconds,
            "Session controller spawned"
        );

        Self {
            events: events_tx,
            view: view_rx,
            requested: AtomicU64::new(0),
            task: Some(task),
        }
    }

    /// Start a new session, cancelling the current one if any
    pub fn start(&self) -> LivenessResult<()> {
        self.send(Event::Start)?;
        self.requested.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Cancel the current session
    pub fn stop(&self) -> LivenessResult<()> {
        self.send(Event::Stop)
    }

    /// Latest published view
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    /// Wait until the most recently requested session settles
    ///
    /// Settled means `Done`, `Failed`, or back in `Idle` after a failed start
    /// or an operator stop.
    pub async fn wait_for_outcome(&self) -> LivenessResult<SessionView> {
        let requested = self.requested.load(Ordering::SeqCst);
        let mut view = self.view.clone();
        let settled = view
            .wait_for(|v| {
                v.attempt >= requested && (v.phase.is_terminal() || v.phase == Phase::Idle)
            })
            .await
            .map_err(|_| LivenessError::ControllerClosed)?;
        Ok(settled.clone())
    }

    /// Stop every timer and wait for the controller task to exit
    pub async fn dispose(mut self) {
        let _ = self.events.send(Event::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Session controller task ended abnormally");
            }
        }
    }

    fn send(&self, event: Event) -> LivenessResult<()> {
        self.events
            .send(event)
            .map_err(|_| LivenessError::ControllerClosed)
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct SessionActor<V> {
    machine: SessionMachine,
    verifier: Arc<V>,
    sampler: SharedSampler,
    events: mpsc::UnboundedSender<Event>,
    view: watch::Sender<SessionView>,
    cadence: RepeatingTimer,
    countdown: RepeatingTimer,
    pause: OneShotTimer,
    pause_after_pass: Duration,
}

impl<V> SessionActor<V>
where
    V: Verifier + Sync + 'static,
{
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            let effects = match event {
                Event::Shutdown => {
                    let effects = self.machine.stop();
                    self.apply(effects);
                    self.publish();
                    tracing::debug!("Session controller shut down");
                    break;
                }
                Event::Start => self.machine.start(),
                Event::Stop => self.machine.stop(),
                Event::StartCompleted { epoch, result } => match result {
                    Ok(()) => self.machine.session_started(epoch),
                    Err(e) => self.machine.session_start_failed(epoch, &e),
                },
                Event::CadenceTick { epoch } => self.machine.cadence_tick(epoch),
                Event::CountdownTick { run } => self.machine.countdown_tick(run),
                Event::PauseElapsed { epoch } => self.machine.pause_elapsed(epoch),
                Event::SubmitCompleted { epoch, result } => {
                    self.machine.submission_completed(epoch, result)
                }
            };
            self.apply(effects);
            self.publish();
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RequestSessionStart { epoch } => self.request_session_start(epoch),
                Effect::StartCadence { epoch } => {
                    let tx = self.events.clone();
                    self.cadence
                        .start(move || tx.send(Event::CadenceTick { epoch }).is_ok());
                }
                Effect::StopCadence => {
                    self.cadence.stop();
                }
                Effect::StartCountdown { run } => {
                    let tx = self.events.clone();
                    self.countdown
                        .start(move || tx.send(Event::CountdownTick { run }).is_ok());
                }
                Effect::StopCountdown => {
                    self.countdown.stop();
                }
                Effect::SchedulePauseEnd { epoch } => {
                    let tx = self.events.clone();
                    self.pause.schedule(self.pause_after_pass, move || {
                        let _ = tx.send(Event::PauseElapsed { epoch });
                    });
                }
                Effect::CancelPauseEnd => {
                    self.pause.cancel();
                }
                Effect::CaptureAndSubmit { epoch } => self.capture_and_submit(epoch),
            }
        }
    }

    fn request_session_start(&self, epoch: u64) {
        let verifier = Arc::clone(&self.verifier);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = verifier.start_session().await;
            let _ = tx.send(Event::StartCompleted { epoch, result });
        });
    }

    fn capture_and_submit(&mut self, epoch: u64) {
        let frame = lock_sampler(&self.sampler).capture();
        let Some(frame) = frame else {
            tracing::debug!(epoch, "No frame available, skipping tick");
            self.machine.frame_unavailable(epoch);
            return;
        };

        tracing::debug!(epoch, frame_id = %frame.id, "Submitting frame");
        let verifier = Arc::clone(&self.verifier);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = verifier.submit_frame(&frame).await;
            let _ = tx.send(Event::SubmitCompleted { epoch, result });
        });
    }

    fn publish(&self) {
        let current = self.machine.view();
        self.view.send_if_modified(|published| {
            if *published == *current {
                return false;
            }
            *published = current.clone();
            true
        });
    }
}
