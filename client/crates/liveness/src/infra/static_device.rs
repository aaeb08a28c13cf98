//! In-memory capture device
//!
//! Serves one fixed still for either facing mode. Used by tests and demos.

use crate::domain::ports::{CaptureDevice, VideoStream};
use crate::domain::value_objects::FacingMode;
use crate::error::{LivenessError, LivenessResult};
use platform::jpeg::{self, Dimensions};
use std::sync::{Arc, Mutex};

pub struct StaticDevice {
    name: String,
    still: Option<Arc<Vec<u8>>>,
    opened: Arc<Mutex<Vec<FacingMode>>>,
}

impl StaticDevice {
    pub fn new(name: impl Into<String>, jpeg: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            still: Some(Arc::new(jpeg)),
            opened: Arc::default(),
        }
    }

    /// Device whose `open` always fails, like a camera with denied permission
    pub fn unavailable() -> Self {
        Self {
            name: "unavailable".to_string(),
            still: None,
            opened: Arc::default(),
        }
    }

    /// Facing modes requested so far, in order
    pub fn open_log(&self) -> Arc<Mutex<Vec<FacingMode>>> {
        Arc::clone(&self.opened)
    }
}

impl CaptureDevice for StaticDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self, facing: FacingMode) -> LivenessResult<Box<dyn VideoStream>> {
        let still = self
            .still
            .clone()
            .ok_or_else(|| LivenessError::DeviceUnavailable(format!("{} has no image", self.name)))?;

        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(facing);

        let dimensions = jpeg::dimensions(&still).unwrap_or(Dimensions::ZERO);
        Ok(Box::new(StaticStream {
            still,
            dimensions,
            stopped: false,
        }))
    }
}

struct StaticStream {
    still: Arc<Vec<u8>>,
    dimensions: Dimensions,
    stopped: bool,
}

impl VideoStream for StaticStream {
    fn dimensions(&mut self) -> Dimensions {
        if self.stopped {
            return Dimensions::ZERO;
        }
        self.dimensions
    }

    fn snapshot_jpeg(&mut self) -> Option<Vec<u8>> {
        (!self.stopped).then(|| self.still.as_ref().clone())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
