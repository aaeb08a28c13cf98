//! Shared fixtures for unit tests

use crate::domain::entities::Frame;
use crate::domain::ports::Verifier;
use crate::domain::value_objects::{AgePrediction, ChallengeLabel, VerifierResponse};
use crate::error::{LivenessError, LivenessResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Smallest byte sequence the JPEG header reader accepts: SOI, SOF0, EOI
pub fn sample_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x0B, 0x08];
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&[0x01, 0x01, 0x11, 0x00, 0xFF, 0xD9]);
    bytes
}

pub fn in_progress(challenge: &str, passed: bool, next: Option<&str>) -> VerifierResponse {
    VerifierResponse::InProgress {
        challenge: ChallengeLabel::from(challenge),
        message: format!("Please {challenge}"),
        passed,
        next_challenge: next.map(ChallengeLabel::from),
    }
}

pub fn done() -> VerifierResponse {
    VerifierResponse::Done {
        message: "Liveness verified".to_string(),
    }
}

pub fn failed() -> VerifierResponse {
    VerifierResponse::Failed {
        message: "Spoof detected".to_string(),
    }
}

/// In-memory verifier replaying scripted answers
///
/// Once the frame script runs out every submission answers "blink, not
/// passed".
#[derive(Default)]
pub struct ScriptedVerifier {
    start_failures: Mutex<VecDeque<LivenessError>>,
    frames: Mutex<VecDeque<LivenessResult<VerifierResponse>>>,
    predictions: Mutex<VecDeque<LivenessResult<AgePrediction>>>,
    submit_delay: Option<Duration>,
    starts: AtomicUsize,
    submissions: AtomicUsize,
    predicts: AtomicUsize,
}

impl ScriptedVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frames<I>(self, frames: I) -> Self
    where
        I: IntoIterator<Item = LivenessResult<VerifierResponse>>,
    {
        *self.frames.lock().unwrap() = frames.into_iter().collect();
        self
    }

    pub fn with_start_failure(self, error: LivenessError) -> Self {
        self.start_failures.lock().unwrap().push_back(error);
        self
    }

    pub fn with_prediction(self, prediction: LivenessResult<AgePrediction>) -> Self {
        self.predictions.lock().unwrap().push_back(prediction);
        self
    }

    /// Every submission takes this long to answer
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn predicts(&self) -> usize {
        self.predicts.load(Ordering::SeqCst)
    }
}

impl Verifier for ScriptedVerifier {
    async fn start_session(&self) -> LivenessResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        match self.start_failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn submit_frame(&self, frame: &Frame) -> LivenessResult<VerifierResponse> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        assert!(!frame.dimensions.is_empty());
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.frames.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(in_progress("blink", false, None)))
    }

    async fn predict_age(&self, _frame: &Frame) -> LivenessResult<AgePrediction> {
        self.predicts.fetch_add(1, Ordering::SeqCst);
        let next = self.predictions.lock().unwrap().pop_front();
        next.unwrap_or(Ok(AgePrediction::Estimated(30.0)))
    }
}
