//! CLI error type.

use thiserror::Error;

/// Errors that abort a transcode run.
///
/// Per-unit engine failures are handled inside the pipeline loop and never
/// surface here; these are startup and stream-level failures only.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Scan(#[from] annexb::AnnexbError),

    #[error(transparent)]
    Codec(#[from] h264_codec::CodecError),
}

pub type Result<T> = std::result::Result<T, CliError>;
