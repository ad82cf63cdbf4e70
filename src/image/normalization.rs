use crate::frame::{FrameError, Result};

/// Output buffers are overwritten in place and never resized
#[inline]
pub fn check_lengths(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(FrameError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Map a normalized intensity in [0, 1] to a gray byte
#[inline]
#[must_use]
pub fn unit_to_byte(value: f32) -> u8 {
    // Saturating cast after rounding; NaN becomes 0
    (value.clamp(0.0, 1.0) * 255.0_f32).round() as u8
}
