use super::{Frame, FramePayload};
use crate::types::{Dimensions, FrameDescription, StreamKind};
use std::fmt;

/// Why a delivered frame did not update the output buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The sensor signalled a frame but none could be acquired
    NullFrame,
    /// Reported size or sample count does not match the allocated buffer
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
        pixels: usize,
    },
    /// The frame belongs to another stream
    KindMismatch {
        expected: StreamKind,
        actual: StreamKind,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullFrame => write!(f, "null frame"),
            Self::DimensionMismatch {
                expected,
                actual,
                pixels,
            } => write!(
                f,
                "dimension mismatch: expected {expected}, got {actual} with {pixels} pixels"
            ),
            Self::KindMismatch { expected, actual } => {
                write!(f, "stream mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

/// Check a frame against the stream it is about to be written into
///
/// Both the reported dimensions and the payload size must match the
/// allocated output, otherwise the frame is skipped.
#[inline]
pub fn validate_frame(
    frame: &Frame,
    kind: StreamKind,
    description: &FrameDescription,
) -> Option<SkipReason> {
    if frame.kind() != kind {
        return Some(SkipReason::KindMismatch {
            expected: kind,
            actual: frame.kind(),
        });
    }

    let expected = description.dimensions;
    let actual = frame.description.dimensions;
    let pixels = frame.payload_pixels();

    if actual != expected || pixels != expected.pixel_count() || !whole_pixels(frame) {
        return Some(SkipReason::DimensionMismatch {
            expected,
            actual,
            pixels,
        });
    }

    None
}

/// Color payloads must not carry a partial trailing pixel
#[inline]
fn whole_pixels(frame: &Frame) -> bool {
    match &frame.payload {
        FramePayload::Color { bgra } => bgra.len().is_multiple_of(4),
        _ => true,
    }
}
