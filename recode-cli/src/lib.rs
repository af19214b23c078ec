//! Recode: the thin orchestrator around the framing and codec crates.
//!
//! Reads access units from an Annex B elementary stream, feeds them to the
//! decode path, and drains the encode path back into a flat Annex B output
//! file. Per-unit engine failures are counted and skipped; the stream keeps
//! going.

pub mod cli;
pub mod error;
pub mod pipeline;

pub use error::{CliError, Result};
pub use pipeline::{TranscodeOptions, TranscodeStats, transcode};
