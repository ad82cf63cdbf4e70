//! Per-stream frame processing
//!
//! A [`StreamView`] owns the display buffer of one stream. Every delivered
//! frame is checked against the layout the buffer was allocated for; frames
//! that do not fit are skipped and the previous picture stays visible.

use crate::frame::{validate_frame, Frame, FrameError, SkipReason};
use crate::image::{OutputBuffer, RenderOptions};
use crate::types::{FrameDescription, StreamKind};
use anyhow::Result;
use image::DynamicImage;
use tracing::{debug, trace};

/// What happened to one delivered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The buffer was overwritten; redraw the view
    Rendered,
    Skipped(SkipReason),
}

pub struct StreamView {
    kind: StreamKind,
    description: FrameDescription,
    options: RenderOptions,
    buffer: OutputBuffer,
    rendered: u64,
    skipped: u64,
}

impl StreamView {
    #[must_use]
    pub fn new(kind: StreamKind, description: FrameDescription, options: RenderOptions) -> Self {
        Self {
            kind,
            description,
            options,
            buffer: OutputBuffer::for_stream(kind, description.dimensions),
            rendered: 0,
            skipped: 0,
        }
    }

    #[must_use]
    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    #[must_use]
    pub fn buffer(&self) -> &OutputBuffer {
        &self.buffer
    }

    /// Process one delivery; `None` is a frame that could not be acquired
    ///
    /// # Errors
    ///
    /// Returns an error only if a frame that passed validation still fails
    /// to convert, which leaves the buffer partly written
    pub fn process(&mut self, frame: Option<&Frame>) -> Result<FrameOutcome, FrameError> {
        let Some(frame) = frame else {
            trace!(kind = %self.kind, "null frame skipped");
            return Ok(self.skip(SkipReason::NullFrame));
        };

        if let Some(reason) = validate_frame(frame, self.kind, &self.description) {
            debug!(kind = %self.kind, %reason, "frame skipped");
            return Ok(self.skip(reason));
        }

        self.buffer
            .render(frame, self.description.dimensions, &self.options)?;
        self.rendered += 1;
        trace!(kind = %self.kind, timestamp = ?frame.timestamp, "frame rendered");

        Ok(FrameOutcome::Rendered)
    }

    fn skip(&mut self, reason: SkipReason) -> FrameOutcome {
        self.skipped += 1;
        FrameOutcome::Skipped(reason)
    }

    /// Current picture of the stream
    ///
    /// # Errors
    ///
    /// Returns an error if the image buffer cannot be created
    pub fn image(&self) -> Result<DynamicImage> {
        self.buffer.to_image(self.description.dimensions)
    }
}
