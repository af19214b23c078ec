//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "recode",
    about = "Decode an Annex B H.264 elementary stream and re-encode it back out",
    version
)]
pub struct Args {
    /// Input Annex B elementary stream.
    pub input: PathBuf,

    /// Output Annex B elementary stream.
    pub output: PathBuf,

    /// Encode width in pixels.
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Encode height in pixels.
    #[arg(long, default_value_t = 1080)]
    pub height: u32,

    /// Maximum input frame rate.
    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Target bitrate in bits per second.
    #[arg(long, default_value_t = 16 * 1024 * 1024)]
    pub bitrate: u32,

    /// Scan window size in bytes; access units larger than this are
    /// truncated.
    #[arg(long, default_value_t = annexb::DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Force a keyframe before every Nth encoded frame.
    #[arg(long)]
    pub keyframe_every: Option<u64>,

    /// Access units per frame for the software decoder.
    #[arg(long, default_value_t = 2)]
    pub units_per_frame: u32,

    /// Slice payload length for the software encoder.
    #[arg(long, default_value_t = h264_codec::MAX_SLICE_SIZE)]
    pub payload_len: usize,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}
