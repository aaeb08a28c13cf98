//! Directory-backed capture device
//!
//! Replays JPEG stills from disk as if they came from a camera. The front
//! camera reads `<root>/front`, the rear camera `<root>/rear`; either falls
//! back to `<root>` itself when the subdirectory does not exist. Files are
//! served in lexical order and the sequence wraps around.

use crate::domain::ports::{CaptureDevice, VideoStream};
use crate::domain::value_objects::FacingMode;
use crate::error::{LivenessError, LivenessResult};
use platform::jpeg::{self, Dimensions};
use std::path::{Path, PathBuf};

pub struct DirectoryDevice {
    root: PathBuf,
    name: String,
}

impl DirectoryDevice {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = format!("directory:{}", root.display());
        Self { root, name }
    }

    fn source_dir(&self, facing: FacingMode) -> PathBuf {
        let sub = match facing {
            FacingMode::User => "front",
            FacingMode::Environment => "rear",
        };
        let candidate = self.root.join(sub);
        if candidate.is_dir() {
            candidate
        } else {
            self.root.clone()
        }
    }
}

impl CaptureDevice for DirectoryDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self, facing: FacingMode) -> LivenessResult<Box<dyn VideoStream>> {
        let dir = self.source_dir(facing);
        let files = list_stills(&dir).map_err(|e| {
            LivenessError::DeviceUnavailable(format!("{}: {}", dir.display(), e))
        })?;
        if files.is_empty() {
            return Err(LivenessError::DeviceUnavailable(format!(
                "{}: no JPEG stills found",
                dir.display()
            )));
        }

        tracing::debug!(dir = %dir.display(), stills = files.len(), facing = %facing, "Directory stream opened");
        Ok(Box::new(DirectoryStream {
            files,
            next: 0,
            current: None,
            stopped: false,
        }))
    }
}

fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

fn list_stills(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_jpeg_path(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

struct Still {
    dimensions: Dimensions,
    jpeg: Vec<u8>,
}

struct DirectoryStream {
    files: Vec<PathBuf>,
    next: usize,
    /// Still loaded by `dimensions()` and handed out by `snapshot_jpeg()`
    current: Option<Still>,
    stopped: bool,
}

impl DirectoryStream {
    fn load_next(&mut self) -> Option<&Still> {
        if self.current.is_none() {
            let path = &self.files[self.next % self.files.len()];
            self.next = (self.next + 1) % self.files.len();

            match std::fs::read(path) {
                Ok(jpeg) => {
                    let dimensions = jpeg::dimensions(&jpeg).unwrap_or(Dimensions::ZERO);
                    self.current = Some(Still { dimensions, jpeg });
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read still");
                    return None;
                }
            }
        }
        self.current.as_ref()
    }
}

impl VideoStream for DirectoryStream {
    fn dimensions(&mut self) -> Dimensions {
        if self.stopped {
            return Dimensions::ZERO;
        }
        let dimensions = self
            .load_next()
            .map(|still| still.dimensions)
            .unwrap_or(Dimensions::ZERO);
        if dimensions.is_empty() {
            // Skip unreadable or headerless files on the next call
            self.current = None;
        }
        dimensions
    }

    fn snapshot_jpeg(&mut self) -> Option<Vec<u8>> {
        if self.stopped {
            return None;
        }
        self.load_next()?;
        self.current.take().map(|still| still.jpeg)
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.current = None;
    }
}
