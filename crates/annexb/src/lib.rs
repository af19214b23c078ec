//! A crate for splitting raw Annex B elementary video streams into access units.
//!
//! An Annex B stream is a flat byte sequence with no container framing:
//! access units are delimited only by the 4-byte start code `00 00 00 01`.
//! This crate locates those boundaries without consuming the source stream,
//! using absolute-offset window reads, and yields each unit as a zero-copy
//! [`bytes::Bytes`] payload.
//!
//! Codec semantics (NAL unit types, slice structure) are out of scope here;
//! the scanner only understands the start-code framing.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod scanner;

pub use error::{AnnexbError, Result};
pub use scanner::{AccessUnitScanner, DEFAULT_WINDOW_SIZE, START_CODE};
