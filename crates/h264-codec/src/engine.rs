//! The seam between this crate and the external video codec engine.
//!
//! The engine owns the bit-level decode and encode primitives. These traits
//! express only its documented conventions: explicit initialize/uninitialize
//! lifecycle, non-zero return codes on failure, and the decoder's
//! buffer-status signal ("picture complete" vs "feed more data").
//!
//! Decoded plane data stays inside the engine; [`DecodePass::Picture`]
//! borrows it with a lifetime tied to the engine borrow, so it cannot be
//! retained across the next engine call.

use thiserror::Error;

use crate::frame::PictureView;
use crate::layers::EncodedLayerSet;
use crate::params::{DecoderConfig, EncoderConfig};

/// A failure reported by an engine primitive, carrying the engine's native
/// return code.
#[derive(Debug, Error)]
#[error("engine returned rc={code}: {message}")]
pub struct EngineError {
    /// The engine's non-zero return code.
    pub code: i32,
    /// Human-readable context for the failure.
    pub message: String,
}

impl EngineError {
    /// Creates an engine error from a return code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Plane data for one decoded picture, borrowed from engine-owned buffers.
///
/// Valid only until the next call on the engine; the borrow on the engine
/// enforces this.
#[derive(Debug, Clone, Copy)]
pub struct DecodedPicture<'a> {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Luma and the two chroma planes.
    pub planes: [&'a [u8]; 3],
    /// Row stride for each plane, in bytes.
    pub strides: [usize; 3],
}

/// Outcome of a single decode call at the engine boundary.
#[derive(Debug)]
pub enum DecodePass<'a> {
    /// The output buffer is not complete yet; more access units are needed
    /// before a frame materializes. Normal for multi-slice pictures.
    Pending,
    /// A full picture materialized.
    Picture(DecodedPicture<'a>),
}

/// The external decoding engine.
pub trait DecoderEngine {
    /// Initializes the engine with the given configuration.
    fn initialize(&mut self, config: &DecoderConfig) -> Result<(), EngineError>;

    /// No-delay decode of one access unit.
    fn decode(&mut self, access_unit: &[u8]) -> Result<DecodePass<'_>, EngineError>;

    /// Releases engine-internal decode state. Safe to call more than once.
    fn uninitialize(&mut self);
}

/// The external encoding engine.
pub trait EncoderEngine {
    /// Initializes the engine with the given parameter set.
    fn initialize(&mut self, config: &EncoderConfig) -> Result<(), EngineError>;

    /// Encodes one picture, producing the complete per-picture layer set.
    fn encode(&mut self, picture: &PictureView<'_>) -> Result<EncodedLayerSet, EngineError>;

    /// Requests that the next encoded frame be intra-only.
    fn force_intra_frame(&mut self) -> Result<(), EngineError>;

    /// Releases engine-internal encode state. Safe to call more than once.
    fn uninitialize(&mut self);
}
