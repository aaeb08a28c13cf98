//! Liveness Error Types
//!
//! This module provides liveness-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Liveness-specific result type alias
pub type LivenessResult<T> = Result<T, LivenessError>;

/// Operator-facing text for a camera that cannot be opened
pub const CAMERA_UNAVAILABLE_TEXT: &str = "Could not access webcam. Please check permissions.";

/// Liveness-specific error variants
///
/// Every variant maps to an [`ErrorKind`] so callers can decide between
/// "retry on the next tick", "report to the operator" and "log only".
#[derive(Debug, Error)]
pub enum LivenessError {
    /// Capture device could not be opened or read
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A capture was requested before any stream was started
    #[error("Camera not started")]
    CameraNotStarted,

    /// Device has not produced a sized frame yet
    #[error("Frame not ready")]
    FrameNotReady,

    /// Network-level failure talking to the verifier
    #[error("Verifier transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Verifier answered with a non-2xx status
    #[error("Verifier returned status {0}")]
    UnexpectedStatus(u16),

    /// Verifier body was not one of the expected shapes
    #[error("Malformed verifier response: {0}")]
    MalformedResponse(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A request was rejected because one is already in flight
    #[error("Operation already in progress")]
    Busy,

    /// Controller task has shut down
    #[error("Session controller is closed")]
    ControllerClosed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LivenessError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LivenessError::DeviceUnavailable(_) | LivenessError::CameraNotStarted => {
                ErrorKind::Device
            }
            LivenessError::FrameNotReady | LivenessError::Busy => ErrorKind::NotReady,
            LivenessError::Transport(e) if e.is_decode() => ErrorKind::MalformedResponse,
            LivenessError::Transport(_) => ErrorKind::Transport,
            LivenessError::UnexpectedStatus(_) => ErrorKind::UnexpectedStatus,
            LivenessError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            LivenessError::InvalidConfig(_) => ErrorKind::Configuration,
            LivenessError::ControllerClosed => ErrorKind::Cancelled,
            LivenessError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the next cadence tick may simply try again
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            LivenessError::DeviceUnavailable(reason) => {
                tracing::error!(reason = %reason, "Capture device unavailable");
            }
            LivenessError::InvalidConfig(msg) | LivenessError::Internal(msg) => {
                tracing::error!(message = %msg, "Liveness client error");
            }
            LivenessError::Transport(e) => {
                tracing::warn!(error = %e, "Verifier transport error");
            }
            LivenessError::UnexpectedStatus(status) => {
                tracing::warn!(status = *status, "Verifier returned non-success status");
            }
            LivenessError::MalformedResponse(detail) => {
                tracing::warn!(detail = %detail, "Malformed verifier response");
            }
            _ => {
                tracing::debug!(error = %self, "Liveness error");
            }
        }
    }
}

impl From<LivenessError> for AppError {
    fn from(err: LivenessError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let app_err = AppError::new(kind, message);
        match err {
            LivenessError::DeviceUnavailable(_) | LivenessError::CameraNotStarted => {
                app_err.with_action(CAMERA_UNAVAILABLE_TEXT)
            }
            LivenessError::Transport(source) => app_err.with_source(source),
            _ => app_err,
        }
    }
}

impl From<serde_json::Error> for LivenessError {
    fn from(err: serde_json::Error) -> Self {
        LivenessError::MalformedResponse(err.to_string())
    }
}

impl From<platform::http::HttpSetupError> for LivenessError {
    fn from(err: platform::http::HttpSetupError) -> Self {
        LivenessError::InvalidConfig(err.to_string())
    }
}
