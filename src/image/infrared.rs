//! Infrared intensity normalization
//!
//! Raw infrared samples are scaled down and biased upwards so that dark
//! regions keep a faint outline instead of going fully black.

use super::normalization::check_lengths;
use crate::frame::Result;

/// Largest value an infrared sample can take
pub const INFRARED_SOURCE_VALUE_MAXIMUM: f32 = u16::MAX as f32;
/// Scale applied to the source before biasing
pub const INFRARED_SOURCE_SCALE: f32 = 0.75;
/// Smallest displayed value
pub const INFRARED_OUTPUT_VALUE_MINIMUM: f32 = 0.01;
/// Largest displayed value
pub const INFRARED_OUTPUT_VALUE_MAXIMUM: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfraredParams {
    pub source_max: f32,
    pub scale: f32,
    pub output_min: f32,
    pub output_max: f32,
}

impl InfraredParams {
    pub const KINECT: Self = Self {
        source_max: INFRARED_SOURCE_VALUE_MAXIMUM,
        scale: INFRARED_SOURCE_SCALE,
        output_min: INFRARED_OUTPUT_VALUE_MINIMUM,
        output_max: INFRARED_OUTPUT_VALUE_MAXIMUM,
    };

    #[inline(always)]
    #[must_use]
    pub fn normalize(&self, value: u16) -> f32 {
        let scaled = f32::from(value) / self.source_max * self.scale;
        scaled
            .mul_add(1.0 - self.output_min, self.output_min)
            .min(self.output_max)
    }
}

impl Default for InfraredParams {
    fn default() -> Self {
        Self::KINECT
    }
}

/// Normalize one sample with the Kinect constants
#[inline]
#[must_use]
pub fn normalize_infrared(value: u16) -> f32 {
    InfraredParams::KINECT.normalize(value)
}

/// Normalize an infrared frame into a same-length float buffer
///
/// # Errors
///
/// Returns an error if `out` and `samples` differ in length
pub fn map_infrared(samples: &[u16], params: &InfraredParams, out: &mut [f32]) -> Result<()> {
    check_lengths(out.len(), samples.len())?;

    for (dst, &value) in out.iter_mut().zip(samples) {
        *dst = params.normalize(value);
    }

    Ok(())
}
