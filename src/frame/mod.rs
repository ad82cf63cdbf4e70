//! Sensor frames and raw sample decoding
//!
//! A `Frame` is one snapshot of a stream as delivered by a frame source. The
//! payload keeps the raw samples; turning them into something displayable is
//! the job of the `image` and `body` modules.

mod error;
mod validation;

pub use error::{FrameError, Result};
pub use validation::{validate_frame, SkipReason};

use crate::body::Body;
use crate::types::{FrameDescription, StreamKind, ValidRange};
use std::time::Duration;

/// Raw samples of one frame
#[derive(Debug, Clone, PartialEq)]
pub enum FramePayload {
    /// Distance in millimetres per pixel, with the frame's reliable window
    Depth { samples: Vec<u16>, reliable: ValidRange },
    /// Infrared intensity per pixel
    Infrared { samples: Vec<u16> },
    /// Tracking slot per pixel (0-5), 255 where no body was seen
    BodyIndex { indices: Vec<u8> },
    /// Four bytes per pixel, B G R A
    Color { bgra: Vec<u8> },
    /// Up to six tracking slots
    Body { bodies: Vec<Body> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub description: FrameDescription,
    /// Time relative to the start of the stream
    pub timestamp: Duration,
    pub payload: FramePayload,
}

impl Frame {
    #[must_use]
    pub fn new(description: FrameDescription, timestamp: Duration, payload: FramePayload) -> Self {
        Self {
            description,
            timestamp,
            payload,
        }
    }

    #[must_use]
    pub fn kind(&self) -> StreamKind {
        match self.payload {
            FramePayload::Depth { .. } => StreamKind::Depth,
            FramePayload::Infrared { .. } => StreamKind::Infrared,
            FramePayload::BodyIndex { .. } => StreamKind::BodyIndex,
            FramePayload::Color { .. } => StreamKind::Color,
            FramePayload::Body { .. } => StreamKind::Body,
        }
    }

    /// Number of pixels actually carried by the payload
    ///
    /// Body frames carry no pixels and report the described pixel count.
    #[must_use]
    pub fn payload_pixels(&self) -> usize {
        match &self.payload {
            FramePayload::Depth { samples, .. } | FramePayload::Infrared { samples } => samples.len(),
            FramePayload::BodyIndex { indices } => indices.len(),
            FramePayload::Color { bgra } => bgra.len() / 4,
            FramePayload::Body { .. } => self.description.dimensions.pixel_count(),
        }
    }
}

/// Decode little-endian 16-bit samples
///
/// # Errors
///
/// Returns an error if the byte count is odd
pub fn decode_u16_samples(bytes: &[u8]) -> Result<Vec<u16>> {
    if !bytes.len().is_multiple_of(2) {
        return Err(FrameError::OddByteCount(bytes.len()));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect())
}

/// Build a frame of the given kind from raw recorded bytes
///
/// # Errors
///
/// Returns an error for body streams (they are not raw) and for 16-bit
/// streams with an odd byte count
pub fn frame_from_bytes(
    kind: StreamKind,
    description: FrameDescription,
    timestamp: Duration,
    bytes: Vec<u8>,
    reliable: ValidRange,
) -> Result<Frame> {
    let payload = match kind {
        StreamKind::Depth => FramePayload::Depth {
            samples: decode_u16_samples(&bytes)?,
            reliable,
        },
        StreamKind::Infrared => FramePayload::Infrared {
            samples: decode_u16_samples(&bytes)?,
        },
        StreamKind::BodyIndex => FramePayload::BodyIndex { indices: bytes },
        StreamKind::Color => FramePayload::Color { bgra: bytes },
        StreamKind::Body => {
            return Err(FrameError::KindMismatch {
                expected: StreamKind::Depth,
                actual: StreamKind::Body,
            });
        }
    };

    Ok(Frame::new(description, timestamp, payload))
}
