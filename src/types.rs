//! Domain types shared by every stream

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensor stream a frame belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum StreamKind {
    Body,
    BodyIndex,
    Color,
    Depth,
    Infrared,
}

impl StreamKind {
    /// Name used in screenshot file names and status lines
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Body => "Body",
            Self::BodyIndex => "BodyIndex",
            Self::Color => "Color",
            Self::Depth => "Depth",
            Self::Infrared => "Infrared",
        }
    }

    /// Frame layout the sensor reports for this stream
    #[must_use]
    pub fn default_description(self) -> FrameDescription {
        match self {
            Self::Color => FrameDescription::new(Dimensions::new(1920, 1080), 4),
            Self::Depth | Self::Infrared => FrameDescription::new(Dimensions::new(512, 424), 2),
            Self::BodyIndex => FrameDescription::new(Dimensions::new(512, 424), 1),
            // Skeletons are drawn in depth space
            Self::Body => FrameDescription::new(Dimensions::new(512, 424), 0),
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{width}x{height}", width = self.width, height = self.height)
    }
}

/// Size and sample width of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDescription {
    pub dimensions: Dimensions,
    pub bytes_per_pixel: u8,
}

impl FrameDescription {
    #[must_use]
    pub fn new(dimensions: Dimensions, bytes_per_pixel: u8) -> Self {
        Self {
            dimensions,
            bytes_per_pixel,
        }
    }

    /// Bytes of one raw frame; 0 for streams without a pixel buffer
    #[inline]
    #[must_use]
    pub fn frame_bytes(&self) -> usize {
        self.dimensions.pixel_count() * usize::from(self.bytes_per_pixel)
    }
}

impl fmt::Display for FrameDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{dims} @ {bpp} B/px",
            dims = self.dimensions,
            bpp = self.bytes_per_pixel
        )
    }
}

/// Inclusive window of sample values considered reliable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidRange {
    pub min: u16,
    pub max: u16,
}

impl ValidRange {
    /// Reliable depth of the Kinect V2 in millimetres
    pub const KINECT_DEPTH: Self = Self {
        min: 500,
        max: 4500,
    };

    #[must_use]
    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    #[must_use]
    // Hot path: called for every pixel during conversion
    pub fn contains(&self, value: u16) -> bool {
        value >= self.min && value <= self.max
    }

    /// Same lower bound, upper bound opened to the largest representable sample
    #[must_use]
    pub fn far_field(self) -> Self {
        Self {
            min: self.min,
            max: u16::MAX,
        }
    }
}

impl fmt::Display for ValidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{min}, {max}]", min = self.min, max = self.max)
    }
}
