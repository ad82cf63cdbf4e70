mod body_index;
mod color;
mod depth;
mod infrared;
mod normalization;

pub use body_index::{body_index_color, map_body_index, BODY_INDEX_COLORS, NO_BODY};
pub use color::bgra_to_rgba;
pub use depth::{depth_to_byte, map_depth, MAP_DEPTH_TO_BYTE, MAX_REPRESENTABLE_DEPTH};
pub use infrared::{
    map_infrared, normalize_infrared, InfraredParams, INFRARED_OUTPUT_VALUE_MAXIMUM,
    INFRARED_OUTPUT_VALUE_MINIMUM, INFRARED_SOURCE_SCALE, INFRARED_SOURCE_VALUE_MAXIMUM,
};
pub use normalization::unit_to_byte;

use crate::body::{build_overlay, rasterize, CoordinateMapper, PinholeMapper};
use crate::frame::{Frame, FrameError, FramePayload};
use crate::types::{Dimensions, StreamKind};
use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage, RgbaImage};
use std::num::NonZeroU16;

/// Knobs applied while turning frames into pixels
pub struct RenderOptions {
    pub depth_divisor: NonZeroU16,
    /// Show depth beyond the frame's reliable maximum
    pub far_field: bool,
    pub infrared: InfraredParams,
    pub mapper: Box<dyn CoordinateMapper>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            depth_divisor: MAP_DEPTH_TO_BYTE,
            far_field: false,
            infrared: InfraredParams::default(),
            mapper: Box::new(PinholeMapper::default()),
        }
    }
}

/// Display pixels of one stream, allocated once and overwritten per frame
#[derive(Debug, Clone, PartialEq)]
pub enum OutputBuffer {
    /// One gray byte per pixel
    Depth(Vec<u8>),
    /// One normalized intensity per pixel
    Infrared(Vec<f32>),
    /// Interleaved RGB
    BodyIndex(Vec<u8>),
    /// Interleaved RGBA
    Color(Vec<u8>),
    /// Interleaved RGBA skeleton overlay
    Body(Vec<u8>),
}

impl OutputBuffer {
    #[must_use]
    pub fn for_stream(kind: StreamKind, dimensions: Dimensions) -> Self {
        let pixels = dimensions.pixel_count();
        match kind {
            StreamKind::Depth => Self::Depth(vec![0; pixels]),
            StreamKind::Infrared => Self::Infrared(vec![0.0; pixels]),
            StreamKind::BodyIndex => Self::BodyIndex(vec![0; pixels * 3]),
            StreamKind::Color => Self::Color(vec![0; pixels * 4]),
            StreamKind::Body => Self::Body(vec![0; pixels * 4]),
        }
    }

    #[must_use]
    pub fn kind(&self) -> StreamKind {
        match self {
            Self::Depth(_) => StreamKind::Depth,
            Self::Infrared(_) => StreamKind::Infrared,
            Self::BodyIndex(_) => StreamKind::BodyIndex,
            Self::Color(_) => StreamKind::Color,
            Self::Body(_) => StreamKind::Body,
        }
    }

    /// Number of pixels the buffer holds
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        match self {
            Self::Depth(gray) => gray.len(),
            Self::Infrared(values) => values.len(),
            Self::BodyIndex(rgb) => rgb.len() / 3,
            Self::Color(rgba) | Self::Body(rgba) => rgba.len() / 4,
        }
    }

    /// Overwrite the buffer with the contents of `frame`
    ///
    /// # Errors
    ///
    /// Returns an error if the frame belongs to another stream or its
    /// sample count does not fit the buffer
    pub fn render(
        &mut self,
        frame: &Frame,
        dimensions: Dimensions,
        options: &RenderOptions,
    ) -> crate::frame::Result<()> {
        match (&frame.payload, self) {
            (FramePayload::Depth { samples, reliable }, Self::Depth(out)) => {
                let range = if options.far_field {
                    reliable.far_field()
                } else {
                    *reliable
                };
                map_depth(samples, range, options.depth_divisor, out)
            }
            (FramePayload::Infrared { samples }, Self::Infrared(out)) => {
                map_infrared(samples, &options.infrared, out)
            }
            (FramePayload::BodyIndex { indices }, Self::BodyIndex(out)) => map_body_index(indices, out),
            (FramePayload::Color { bgra }, Self::Color(out)) => bgra_to_rgba(bgra, out),
            (FramePayload::Body { bodies }, Self::Body(out)) => {
                let commands = build_overlay(bodies, options.mapper.as_ref(), dimensions);
                rasterize(&commands, dimensions, out)
            }
            (_, out) => Err(FrameError::KindMismatch {
                expected: out.kind(),
                actual: frame.kind(),
            }),
        }
    }

    /// Copy the buffer into a `DynamicImage` of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer does not hold `dimensions` pixels
    pub fn to_image(&self, dimensions: Dimensions) -> Result<DynamicImage> {
        let width = u32::from(dimensions.width);
        let height = u32::from(dimensions.height);

        let image = match self {
            Self::Depth(gray) => {
                let gray: GrayImage = ImageBuffer::from_raw(width, height, gray.clone())
                    .context("Failed to create depth image buffer")?;
                DynamicImage::ImageLuma8(gray)
            }
            Self::Infrared(values) => {
                let gray: GrayImage = ImageBuffer::from_raw(
                    width,
                    height,
                    values.iter().map(|&v| unit_to_byte(v)).collect(),
                )
                .context("Failed to create infrared image buffer")?;
                DynamicImage::ImageLuma8(gray)
            }
            Self::BodyIndex(rgb) => {
                let rgb: RgbImage = ImageBuffer::from_raw(width, height, rgb.clone())
                    .context("Failed to create body index image buffer")?;
                DynamicImage::ImageRgb8(rgb)
            }
            Self::Color(rgba) | Self::Body(rgba) => {
                let rgba: RgbaImage = ImageBuffer::from_raw(width, height, rgba.clone())
                    .context("Failed to create RGBA image buffer")?;
                DynamicImage::ImageRgba8(rgba)
            }
        };

        Ok(image)
    }
}
