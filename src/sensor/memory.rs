use super::{Acquisition, FrameSource};
use crate::frame::{Frame, FrameError};
use crate::types::{FrameDescription, StreamKind};
use std::collections::VecDeque;
use std::path::PathBuf;

enum Step {
    Acquire(Acquisition),
    Fail(String),
}

/// Scripted frame source
///
/// Replays a fixed sequence of acquisitions, then reports `Finished`. With
/// [`MemorySource::repeating`] it delivers the same frame forever instead.
pub struct MemorySource {
    steps: VecDeque<Step>,
    repeat: Option<Frame>,
    available: bool,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            repeat: None,
            available: true,
        }
    }

    #[must_use]
    pub fn repeating(frame: Frame) -> Self {
        Self {
            repeat: Some(frame),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.steps.push_back(Step::Acquire(Acquisition::Frame(frame)));
        self
    }

    #[must_use]
    pub fn with_null(mut self) -> Self {
        self.steps.push_back(Step::Acquire(Acquisition::Null));
        self
    }

    #[must_use]
    pub fn with_unavailable(mut self) -> Self {
        self.steps.push_back(Step::Acquire(Acquisition::Unavailable));
        self
    }

    #[must_use]
    pub fn with_error(mut self, message: &str) -> Self {
        self.steps.push_back(Step::Fail(message.to_string()));
        self
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for MemorySource {
    fn description(&self, kind: StreamKind) -> FrameDescription {
        self.steps
            .iter()
            .find_map(|step| match step {
                Step::Acquire(Acquisition::Frame(frame)) if frame.kind() == kind => {
                    Some(frame.description)
                }
                _ => None,
            })
            .or_else(|| self.repeat.as_ref().map(|frame| frame.description))
            .unwrap_or_else(|| kind.default_description())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn acquire(&mut self, _kind: StreamKind) -> Result<Acquisition, FrameError> {
        if let Some(frame) = &self.repeat {
            return Ok(Acquisition::Frame(frame.clone()));
        }

        match self.steps.pop_front() {
            Some(Step::Acquire(acquisition)) => {
                self.available = !matches!(acquisition, Acquisition::Unavailable);
                Ok(acquisition)
            }
            Some(Step::Fail(message)) => Err(FrameError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other(message),
            }),
            None => Ok(Acquisition::Finished),
        }
    }
}
