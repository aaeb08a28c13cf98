//! Domain Entities
//!
//! Core business entities for the liveness domain.

use chrono::{DateTime, Utc};
use kernel::id::{FrameId, Id, SessionId};
use platform::jpeg::Dimensions;

/// Session entity - one liveness interaction, from verifier acknowledgement
/// to terminal outcome or operator cancel
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    /// Controller epoch this session was started in
    pub epoch: u64,
    pub started_at: DateTime<Utc>,
    pub active: bool,
    pub paused: bool,
}

impl Session {
    /// Create an active session once the verifier has acknowledged the start
    pub fn begin(epoch: u64) -> Self {
        Self {
            id: Id::new(),
            epoch,
            started_at: Utc::now(),
            active: true,
            paused: false,
        }
    }

    /// Frames are sampled and sent only while this holds
    pub fn accepts_frames(&self) -> bool {
        self.active && !self.paused
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.paused = false;
    }

    /// Seconds since the verifier acknowledged the session
    pub fn elapsed_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// Frame entity - a single JPEG still taken at the moment of sampling
///
/// Never zero-area: [`Frame::from_still`] refuses empty dimensions.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    pub dimensions: Dimensions,
    pub captured_at: DateTime<Utc>,
    jpeg: Vec<u8>,
}

impl Frame {
    pub fn from_still(dimensions: Dimensions, jpeg: Vec<u8>) -> Option<Self> {
        if dimensions.is_empty() || jpeg.is_empty() {
            return None;
        }
        Some(Self {
            id: Id::new(),
            dimensions,
            captured_at: Utc::now(),
            jpeg,
        })
    }

    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    /// `data:image/jpeg;base64,...` form expected by the frame endpoint
    pub fn to_data_url(&self) -> String {
        platform::encoding::jpeg_data_url(&self.jpeg)
    }
}
