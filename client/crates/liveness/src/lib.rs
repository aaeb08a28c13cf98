//! Liveness Challenge Session Client
//!
//! Clean Architecture structure:
//! - `domain/` - Session state machine, countdown, entities, port traits
//! - `application/` - Session controller, frame sampler, age estimation
//! - `infra/` - HTTP verifier and capture devices
//! - `presentation/` - Operator text
//!
//! ## Session Model
//! - The verifier is the sole authority on challenges, pass/fail and timeouts
//! - Frames are sampled on a fixed cadence and submitted one at a time
//! - Every start or stop opens a new epoch; results from older epochs are dropped
//! - Transport failures are retried by the next cadence tick, never by the client itself

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::age_estimation::{AgeEstimate, AgeEstimationUseCase};
pub use application::config::LivenessConfig;
pub use application::controller::SessionController;
pub use application::sampler::{FrameSampler, SharedSampler};
pub use domain::ports::{CaptureDevice, Verifier, VideoStream};
pub use domain::value_objects::{AgePrediction, ChallengeLabel, FacingMode, VerifierResponse};
pub use domain::view::{Phase, SessionView, StatusLine};
pub use error::{LivenessError, LivenessResult};
pub use infra::directory_device::DirectoryDevice;
pub use infra::http_verifier::HttpVerifier;
pub use infra::static_device::StaticDevice;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};

#[cfg(test)]
mod test_support;
