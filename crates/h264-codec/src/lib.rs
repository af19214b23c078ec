//! Engine-backed H.264 codec plumbing.
//!
//! The actual entropy coding, motion estimation, and transforms live in an
//! external codec engine, reached through the [`engine`] traits. This crate
//! owns everything around that engine:
//!
//! - [`CodecHandle`]: lifecycle of an optional decoder and an optional
//!   encoder instance, with symmetric uninitialize-then-drop teardown.
//! - The tri-state decode adapter ([`CodecHandle::decode`]): frame ready /
//!   need more data / error, yielding a plane-based picture descriptor that
//!   borrows engine buffers until the next call.
//! - The encode drain cursor ([`CodecHandle::pull_encoded`]): linearizes the
//!   engine's layers → NAL units → bytes output structure into bounded-size
//!   writes, resuming correctly across repeated calls.
//! - [`mock`]: a deterministic software engine pair for tests and dry runs.
//!
//! Everything here is single-threaded and synchronous; a handle is used by
//! one logical thread of control at a time.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(unsafe_code)]

pub mod decode;
mod encode;
pub mod engine;
pub mod error;
pub mod frame;
pub mod handle;
pub mod layers;
pub mod mock;
pub mod params;

pub use decode::DecodeOutcome;
pub use engine::{DecodePass, DecodedPicture, DecoderEngine, EncoderEngine, EngineError};
pub use error::{CodecError, Result};
pub use frame::{FrameBuffer, MAX_PLANES, PictureView};
pub use handle::{CodecCommand, CodecHandle, CodecSettings};
pub use layers::{EncodedLayer, EncodedLayerSet, LayerSizeMismatch};
pub use params::{
    DecoderConfig, EncoderConfig, MAX_SLICE_SIZE, NAL_HEADER_OVERHEAD, SpatialLayerConfig,
};
