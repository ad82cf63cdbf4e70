//! Depth to 8-bit grayscale
//!
//! Depth samples are distances in millimetres. Values inside the valid range
//! window are divided by a fixed divisor so the sensor's representable depth
//! fits a byte; everything else is rendered black ("no data").

use super::normalization::check_lengths;
use crate::frame::Result;
use crate::types::ValidRange;
use std::num::NonZeroU16;

/// Largest depth (mm) spread over the byte range
pub const MAX_REPRESENTABLE_DEPTH: u16 = 8000;

/// Divisor mapping depth to the byte range: `8000 / 256`, integer division
pub const MAP_DEPTH_TO_BYTE: NonZeroU16 = match NonZeroU16::new(MAX_REPRESENTABLE_DEPTH / 256) {
    Some(divisor) => divisor,
    None => panic!("depth divisor must be non-zero"),
};

/// Map one depth sample to a gray byte
///
/// Samples above `255 * divisor` saturate at 255 instead of wrapping, which
/// only happens when the window is opened past the representable depth.
#[inline(always)]
#[must_use]
pub fn depth_to_byte(depth: u16, range: ValidRange, divisor: NonZeroU16) -> u8 {
    if range.contains(depth) {
        u8::try_from(depth / divisor.get()).unwrap_or(u8::MAX)
    } else {
        0
    }
}

/// Map a depth frame into a same-length byte buffer
///
/// # Errors
///
/// Returns an error if `out` and `samples` differ in length
pub fn map_depth(
    samples: &[u16],
    range: ValidRange,
    divisor: NonZeroU16,
    out: &mut [u8],
) -> Result<()> {
    check_lengths(out.len(), samples.len())?;

    for (dst, &depth) in out.iter_mut().zip(samples) {
        *dst = depth_to_byte(depth, range, divisor);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: ValidRange = ValidRange::KINECT_DEPTH;

    #[test]
    fn test_divisor_is_integer_division() {
        assert_eq!(MAP_DEPTH_TO_BYTE.get(), 31);
    }

    #[test]
    fn test_reference_sample() {
        assert_eq!(depth_to_byte(4000, RANGE, MAP_DEPTH_TO_BYTE), 129);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        assert_eq!(depth_to_byte(500, RANGE, MAP_DEPTH_TO_BYTE), 16);
        assert_eq!(depth_to_byte(4500, RANGE, MAP_DEPTH_TO_BYTE), 145);
        assert_eq!(depth_to_byte(499, RANGE, MAP_DEPTH_TO_BYTE), 0);
        assert_eq!(depth_to_byte(4501, RANGE, MAP_DEPTH_TO_BYTE), 0);
        assert_eq!(depth_to_byte(0, RANGE, MAP_DEPTH_TO_BYTE), 0);
    }

    #[test]
    fn test_monotonic_inside_window() {
        let mut previous = 0u8;
        for depth in RANGE.min..=RANGE.max {
            let value = depth_to_byte(depth, RANGE, MAP_DEPTH_TO_BYTE);
            assert!(value >= previous, "depth {depth} went from {previous} to {value}");
            previous = value;
        }
    }

    #[test]
    fn test_far_field_saturates_instead_of_wrapping() {
        let range = ValidRange::new(0, u16::MAX);
        assert_eq!(depth_to_byte(u16::MAX, range, MAP_DEPTH_TO_BYTE), 255);
        assert_eq!(depth_to_byte(255 * 31, range, MAP_DEPTH_TO_BYTE), 255);
        assert_eq!(depth_to_byte(256 * 31 - 1, range, MAP_DEPTH_TO_BYTE), 255);

        let mut previous = 0u8;
        for depth in 0..=u16::MAX {
            let value = depth_to_byte(depth, range, MAP_DEPTH_TO_BYTE);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_map_depth_preserves_order_and_length() {
        let samples = [4000, 0, 500, 9000, 4500];
        let mut out = [0xAAu8; 5];

        map_depth(&samples, RANGE, MAP_DEPTH_TO_BYTE, &mut out).unwrap();
        assert_eq!(out, [129, 0, 16, 0, 145]);

        // Identical input overwrites with identical output
        map_depth(&samples, RANGE, MAP_DEPTH_TO_BYTE, &mut out).unwrap();
        assert_eq!(out, [129, 0, 16, 0, 145]);
    }

    #[test]
    fn test_map_depth_rejects_short_output() {
        let mut out = [0u8; 2];
        assert!(map_depth(&[1, 2, 3], RANGE, MAP_DEPTH_TO_BYTE, &mut out).is_err());
    }
}
