//! Frame Sampler
//!
//! Owns the capture device and the single live stream acquired from it.

use crate::domain::entities::Frame;
use crate::domain::ports::{CaptureDevice, VideoStream};
use crate::domain::value_objects::FacingMode;
use crate::error::{LivenessError, LivenessResult};
use std::sync::{Arc, Mutex, MutexGuard};

/// Sampler shared between the controller and the age estimation use case
pub type SharedSampler = Arc<Mutex<FrameSampler>>;

pub struct FrameSampler {
    device: Box<dyn CaptureDevice>,
    facing: FacingMode,
    stream: Option<Box<dyn VideoStream>>,
}

impl FrameSampler {
    pub fn new(device: Box<dyn CaptureDevice>, facing: FacingMode) -> Self {
        Self {
            device,
            facing,
            stream: None,
        }
    }

    pub fn into_shared(self) -> SharedSampler {
        Arc::new(Mutex::new(self))
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_started(&self) -> bool {
        self.stream.is_some()
    }

    /// Acquire a stream for `facing`, releasing any stream held before
    pub fn start_camera(&mut self, facing: FacingMode) -> LivenessResult<()> {
        self.stop();
        self.facing = facing;

        match self.device.open(facing) {
            Ok(stream) => {
                tracing::info!(device = self.device.name(), facing = %facing, "Camera started");
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                e.log();
                Err(e)
            }
        }
    }

    /// Toggle between front and rear camera
    ///
    /// Re-acquires immediately when a stream is live; otherwise only the
    /// preference changes.
    pub fn switch_camera(&mut self) -> LivenessResult<FacingMode> {
        let next = self.facing.toggled();
        if self.stream.is_none() {
            tracing::warn!(facing = %next, "Camera not started, switch applies on next start");
            self.facing = next;
            return Ok(next);
        }
        self.start_camera(next)?;
        Ok(next)
    }

    /// Release the stream; no-op when none is held
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!(device = self.device.name(), "Camera stopped");
        }
    }

    /// Current frame, or `None` while the device has no sized frame
    pub fn capture(&mut self) -> Option<Frame> {
        let stream = self.stream.as_mut()?;
        let dimensions = stream.dimensions();
        if dimensions.is_empty() {
            tracing::trace!("Capture skipped, device has no sized frame yet");
            return None;
        }
        let jpeg = stream.snapshot_jpeg()?;
        Frame::from_still(dimensions, jpeg)
    }

    /// Like [`capture`](Self::capture), but distinguishes the two reasons
    /// for having no frame
    pub fn try_capture(&mut self) -> LivenessResult<Frame> {
        if self.stream.is_none() {
            return Err(LivenessError::CameraNotStarted);
        }
        self.capture().ok_or(LivenessError::FrameNotReady)
    }
}

impl Drop for FrameSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Lock a shared sampler, recovering from a poisoned lock
///
/// The sampler holds no invariant a panicking holder could break halfway.
pub fn lock_sampler(sampler: &SharedSampler) -> MutexGuard<'_, FrameSampler> {
    sampler.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
