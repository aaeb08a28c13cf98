//! Port Traits
//!
//! Interfaces for the remote verifier and the capture device.
//! Implementations are in the infrastructure layer.

use crate::domain::entities::Frame;
use crate::domain::value_objects::{AgePrediction, FacingMode, VerifierResponse};
use crate::error::LivenessResult;
use platform::jpeg::Dimensions;

/// Remote verifier
///
/// Every call is a fallible network round-trip. There is no session-end
/// call: termination is implied by a terminal response or operator cancel.
#[trait_variant::make(Verifier: Send)]
pub trait LocalVerifier {
    /// Announce a new session; must precede any frame submission
    async fn start_session(&self) -> LivenessResult<()>;

    /// Evaluate one frame against the current challenge
    async fn submit_frame(&self, frame: &Frame) -> LivenessResult<VerifierResponse>;

    /// Single-shot age estimation
    async fn predict_age(&self, frame: &Frame) -> LivenessResult<AgePrediction>;
}

/// A physical or emulated camera
pub trait CaptureDevice: Send {
    /// Human-readable device name (for logs)
    fn name(&self) -> &str;

    /// Acquire a stream for the requested camera
    fn open(&mut self, facing: FacingMode) -> LivenessResult<Box<dyn VideoStream>>;
}

/// A live capture stream bound to one device
pub trait VideoStream: Send {
    /// Current frame size; zero until the device has produced a sized frame
    fn dimensions(&mut self) -> Dimensions;

    /// Current still, JPEG encoded
    fn snapshot_jpeg(&mut self) -> Option<Vec<u8>>;

    /// Release the underlying device
    fn stop(&mut self);
}
