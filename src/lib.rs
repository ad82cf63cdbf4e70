pub mod body;
pub mod cli;
pub mod config;
pub mod display;
pub mod display_metadata;
pub mod error;
pub mod frame;
pub mod image;
pub mod logger;
pub mod screenshot;
pub mod sensor;
pub mod status;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use display_metadata::{print_stream_info, print_summary};
pub use error::ProcessError;
pub use view::{FrameOutcome, StreamView};
