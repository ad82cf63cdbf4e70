//! Frame source backed by a recording on disk
//!
//! Pixel streams are stored as raw frames back to back: little-endian `u16`
//! for depth and infrared, one byte per pixel for body index, BGRA for
//! color. Body streams are JSON lines, one [`BodyFrame`] per line; an empty
//! line stands for a frame the sensor signalled but could not deliver.

use super::{Acquisition, FrameSource};
use crate::body::BodyFrame;
use crate::frame::{frame_from_bytes, Frame, FrameError, FramePayload, Result};
use crate::types::{FrameDescription, StreamKind, ValidRange};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Nominal frame period of the sensor (30 fps)
pub const FRAME_INTERVAL: Duration = Duration::from_micros(33_333);

#[derive(Debug)]
pub struct RecordingSource {
    path: PathBuf,
    kind: StreamKind,
    description: FrameDescription,
    reliable: ValidRange,
    reader: BufReader<File>,
    frames_read: u32,
    line: usize,
}

impl RecordingSource {
    /// Open a recording of `kind` frames
    ///
    /// `reliable` is attached to every depth frame; other streams ignore it.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are empty or the file cannot be opened
    pub fn open(
        path: &Path,
        kind: StreamKind,
        description: FrameDescription,
        reliable: ValidRange,
    ) -> Result<Self> {
        if !description.dimensions.is_valid() {
            return Err(FrameError::InvalidDimensions(description.dimensions));
        }

        let file = File::open(path).map_err(|source| FrameError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), %kind, %description, "recording opened");

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            description,
            reliable,
            reader: BufReader::new(file),
            frames_read: 0,
            line: 0,
        })
    }

    fn io_error(&self, source: std::io::Error) -> FrameError {
        FrameError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn next_raw(&mut self) -> Result<Acquisition> {
        let mut bytes = Vec::with_capacity(self.description.frame_bytes());
        (&mut self.reader)
            .take(self.description.frame_bytes() as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| self.io_error(e))?;

        if bytes.is_empty() {
            return Ok(Acquisition::Finished);
        }
        if matches!(self.kind, StreamKind::Depth | StreamKind::Infrared) {
            // Half a sample at the end of a 16-bit recording is dropped
            bytes.truncate(bytes.len() - bytes.len() % 2);
        }

        let timestamp = FRAME_INTERVAL * self.frames_read;
        self.frames_read += 1;

        // A truncated last frame is passed on as is; the viewer skips it
        let frame = frame_from_bytes(self.kind, self.description, timestamp, bytes, self.reliable)?;
        Ok(Acquisition::Frame(frame))
    }

    fn next_body(&mut self) -> Result<Acquisition> {
        let mut text = String::new();
        let read = self
            .reader
            .read_line(&mut text)
            .map_err(|e| self.io_error(e))?;
        if read == 0 {
            return Ok(Acquisition::Finished);
        }
        self.line += 1;

        if text.trim().is_empty() {
            return Ok(Acquisition::Null);
        }

        let body_frame: BodyFrame = serde_json::from_str(&text).map_err(|source| FrameError::BodyJson {
            line: self.line,
            source,
        })?;
        self.frames_read += 1;

        Ok(Acquisition::Frame(Frame::new(
            self.description,
            Duration::from_millis(body_frame.relative_time_ms),
            FramePayload::Body {
                bodies: body_frame.bodies,
            },
        )))
    }
}

impl FrameSource for RecordingSource {
    fn description(&self, _kind: StreamKind) -> FrameDescription {
        self.description
    }

    fn is_available(&self) -> bool {
        true
    }

    fn acquire(&mut self, kind: StreamKind) -> Result<Acquisition> {
        if kind != self.kind {
            return Err(FrameError::KindMismatch {
                expected: self.kind,
                actual: kind,
            });
        }

        match self.kind {
            StreamKind::Body => self.next_body(),
            _ => self.next_raw(),
        }
    }
}
