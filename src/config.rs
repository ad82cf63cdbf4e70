//! Validated viewer settings derived from the command line

use crate::cli::Args;
use crate::screenshot::default_screenshot_dir;
use crate::sensor::{BackpressurePolicy, ChannelCapacity, ChannelCapacityError};
use crate::types::{Dimensions, FrameDescription, StreamKind, ValidRange};
use std::num::NonZeroU64;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid depth range: min {min} is above max {max}")]
    InvalidDepthRange { min: u16, max: u16 },

    #[error("Invalid frame size {0}")]
    InvalidDimensions(Dimensions),

    #[error("Invalid queue size: {0}")]
    Capacity(#[from] ChannelCapacityError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotConfig {
    pub dir: PathBuf,
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub kind: StreamKind,
    pub description: FrameDescription,
    pub depth_range: ValidRange,
    pub far_field: bool,
    pub frame_limit: Option<NonZeroU64>,
    pub capacity: ChannelCapacity,
    pub policy: BackpressurePolicy,
    pub screenshot: Option<ScreenshotConfig>,
    /// Terminal columns and rows
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub verbose: bool,
}

impl ViewerConfig {
    /// Log level used when `RUST_LOG` is not set
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

impl TryFrom<&Args> for ViewerConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        if args.min_depth > args.max_depth {
            return Err(ConfigError::InvalidDepthRange {
                min: args.min_depth,
                max: args.max_depth,
            });
        }

        let default = args.stream.default_description();
        let dimensions = Dimensions::new(
            args.frame_width.unwrap_or(default.dimensions.width),
            args.frame_height.unwrap_or(default.dimensions.height),
        );
        if !dimensions.is_valid() {
            return Err(ConfigError::InvalidDimensions(dimensions));
        }

        let screenshot = args.screenshot.then(|| ScreenshotConfig {
            dir: args
                .screenshot_dir
                .clone()
                .unwrap_or_else(default_screenshot_dir),
            prefix: args.prefix.clone(),
        });

        Ok(Self {
            kind: args.stream,
            description: FrameDescription::new(dimensions, default.bytes_per_pixel),
            depth_range: ValidRange::new(args.min_depth, args.max_depth),
            far_field: args.far_field,
            frame_limit: NonZeroU64::new(args.frames),
            capacity: ChannelCapacity::try_from(args.queue)?,
            policy: if args.drop_late {
                BackpressurePolicy::DropOldest
            } else {
                BackpressurePolicy::Block
            },
            screenshot,
            columns: args.width,
            rows: args.height,
            verbose: args.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("kview").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_follow_stream() {
        let config = ViewerConfig::try_from(&parse(&["--stream", "color", "a.raw"])).unwrap();
        assert_eq!(config.kind, StreamKind::Color);
        assert_eq!(config.description, StreamKind::Color.default_description());
        assert_eq!(config.depth_range, ValidRange::KINECT_DEPTH);
        assert_eq!(config.frame_limit, None);
        assert_eq!(config.policy, BackpressurePolicy::Block);
        assert!(config.screenshot.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--stream",
            "body-index",
            "--frame-width",
            "64",
            "--frame-height",
            "48",
            "-n",
            "5",
            "--drop-late",
            "--screenshot",
            "--screenshot-dir",
            "/tmp/shots",
            "--prefix",
            "Shot",
        ]);
        let config = ViewerConfig::try_from(&args).unwrap();

        assert_eq!(config.description, FrameDescription::new(Dimensions::new(64, 48), 1));
        assert_eq!(config.frame_limit.map(NonZeroU64::get), Some(5));
        assert_eq!(config.policy, BackpressurePolicy::DropOldest);
        assert_eq!(
            config.screenshot,
            Some(ScreenshotConfig {
                dir: PathBuf::from("/tmp/shots"),
                prefix: "Shot".to_string(),
            })
        );
    }

    #[test]
    fn test_rejects_inverted_depth_range() {
        let args = parse(&["--min-depth", "5000", "--max-depth", "400"]);
        assert_matches!(
            ViewerConfig::try_from(&args),
            Err(ConfigError::InvalidDepthRange { min: 5000, max: 400 })
        );
    }

    #[test]
    fn test_rejects_zero_queue_and_empty_frames() {
        assert_matches!(
            ViewerConfig::try_from(&parse(&["--queue", "0"])),
            Err(ConfigError::Capacity(ChannelCapacityError::Zero))
        );
        assert_matches!(
            ViewerConfig::try_from(&parse(&["--frame-width", "0"])),
            Err(ConfigError::InvalidDimensions(_))
        );
    }
}
