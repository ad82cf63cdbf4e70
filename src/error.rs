use std::fmt;

/// Failure of one recording, by the stage it happened in
#[derive(Debug)]
pub enum ProcessError {
    /// Recording could not be opened - nothing was shown
    OpenFailed(String),

    /// The frame reader stopped with an error
    StreamFailed(String),

    /// The recording ended before any frame could be shown
    NoFrameRendered { skipped: u64 },

    /// A frame passed validation but could not be converted
    ConversionFailed(String),

    /// Image ready but display failed
    DisplayFailed(String),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::OpenFailed(msg) => write!(f, "{msg}"),
            ProcessError::StreamFailed(msg) => write!(f, "{msg}"),
            ProcessError::NoFrameRendered { skipped: 0 } => write!(f, "Recording contains no frames"),
            ProcessError::NoFrameRendered { skipped } => {
                write!(f, "No frame could be shown ({skipped} skipped)")
            }
            ProcessError::ConversionFailed(msg) => write!(f, "{msg}"),
            ProcessError::DisplayFailed(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ProcessError {}
