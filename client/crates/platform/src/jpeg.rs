//! JPEG Header Inspection
//!
//! Reads frame dimensions from the start-of-frame segment without decoding
//! the image.

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;

/// Dimensions of a still, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const ZERO: Dimensions = Dimensions {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area frame is a device that has not produced a sized image yet
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn is_sof(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

fn is_standalone(marker: u8) -> bool {
    matches!(marker, 0x01 | 0xD0..=0xD7 | SOI | EOI)
}

/// Read width and height from a baseline or progressive JPEG
///
/// Returns `None` for anything that is not a JPEG or that ends before a
/// start-of-frame segment (e.g. a file still being written).
pub fn dimensions(bytes: &[u8]) -> Option<Dimensions> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != SOI {
        return None;
    }

    let mut pos = 2;
    loop {
        // Skip fill bytes before the marker code
        while *bytes.get(pos)? != 0xFF {
            pos += 1;
        }
        while *bytes.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *bytes.get(pos)?;
        pos += 1;

        if is_standalone(marker) {
            if marker == EOI {
                return None;
            }
            continue;
        }
        if marker == SOS {
            return None;
        }

        let len = u16::from_be_bytes([*bytes.get(pos)?, *bytes.get(pos + 1)?]) as usize;
        if len < 2 {
            return None;
        }

        if is_sof(marker) {
            // length(2) precision(1) height(2) width(2)
            let height = u16::from_be_bytes([*bytes.get(pos + 3)?, *bytes.get(pos + 4)?]);
            let width = u16::from_be_bytes([*bytes.get(pos + 5)?, *bytes.get(pos + 6)?]);
            return Some(Dimensions::new(width.into(), height.into()));
        }

        pos += len;
    }
}
