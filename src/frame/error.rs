use crate::types::{Dimensions, StreamKind};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Buffer length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid 16-bit sample data length: {0} bytes")]
    OddByteCount(usize),

    #[error("Invalid frame dimensions: {0}")]
    InvalidDimensions(Dimensions),

    #[error("Stream kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: StreamKind,
        actual: StreamKind,
    },

    #[error("Failed to read recording {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed body frame on line {line}: {source}")]
    BodyJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;
