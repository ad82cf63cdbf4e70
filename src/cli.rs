use crate::types::StreamKind;
use clap::Parser;
use std::path::PathBuf;

/// A terminal viewer for Kinect V2 stream recordings
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Recording file(s) to play
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Stream stored in the recording
    #[arg(short, long, value_enum, default_value_t = StreamKind::Depth)]
    pub stream: StreamKind,

    /// Frame width in pixels (default depends on the stream)
    #[arg(long)]
    pub frame_width: Option<u16>,

    /// Frame height in pixels (default depends on the stream)
    #[arg(long)]
    pub frame_height: Option<u16>,

    /// Output width in terminal columns
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in terminal rows
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Closest reliable depth in millimetres
    #[arg(long, default_value_t = 500)]
    pub min_depth: u16,

    /// Farthest reliable depth in millimetres
    #[arg(long, default_value_t = 4500)]
    pub max_depth: u16,

    /// Also show depth beyond the reliable maximum
    #[arg(long)]
    pub far_field: bool,

    /// Stop after this many frames (0 plays the whole recording)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub frames: u64,

    /// Save the last picture as a PNG screenshot
    #[arg(long)]
    pub screenshot: bool,

    /// Directory for screenshots (default: the pictures directory)
    #[arg(long, value_name = "DIR")]
    pub screenshot_dir: Option<PathBuf>,

    /// Screenshot file name prefix
    #[arg(long, default_value = crate::screenshot::DEFAULT_PREFIX)]
    pub prefix: String,

    /// Frames buffered between reader and display
    #[arg(long, default_value_t = 2)]
    pub queue: usize,

    /// Keep only the newest frames when the display falls behind
    #[arg(long)]
    pub drop_late: bool,

    /// Show stream info and debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
