//! Error types for Annex B scanning.

use thiserror::Error;

/// Errors that can occur while scanning an Annex B stream.
#[derive(Error, Debug)]
pub enum AnnexbError {
    /// An I/O error occurred while reading the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Annex B scanning operations.
pub type Result<T> = std::result::Result<T, AnnexbError>;
