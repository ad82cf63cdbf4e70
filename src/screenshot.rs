//! PNG snapshots of the current stream picture

use crate::status::Status;
use crate::types::StreamKind;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PREFIX: &str = "KinectScreenshot";

/// `<prefix>-<stream>-<hh-mm-ss>.png`, 12-hour clock
#[must_use]
pub fn screenshot_file_name<Tz: TimeZone>(prefix: &str, kind: StreamKind, time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}-{kind}-{}.png", time.format("%I-%M-%S"))
}

/// User's pictures directory, falling back to home, then the working directory
#[must_use]
pub fn default_screenshot_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
}

/// Write `image` as PNG into `path`
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoded
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Save a screenshot now and report the outcome as a status
///
/// Failures never propagate; they only change the status line.
pub fn save_screenshot(image: &DynamicImage, dir: &Path, prefix: &str, kind: StreamKind) -> Status {
    let path = dir.join(screenshot_file_name(prefix, kind, &Local::now()));

    match write_png(image, &path) {
        Ok(()) => {
            info!(path = %path.display(), "screenshot saved");
            Status::SavedScreenshot(path)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "screenshot failed");
            Status::FailedScreenshot(path)
        }
    }
}
