//! Error types for codec handle operations.
//!
//! The variants fall into three classes with different handling policies:
//!
//! - **Precondition failures** (caller misuse): [`DecoderNotReady`],
//!   [`EncoderNotReady`], [`EmptyPullBuffer`], [`MissingPlane`],
//!   [`ShortPlane`]. Always fatal to the call, never retried.
//! - **Init failures** (fatal at handle creation): [`DecoderInit`],
//!   [`EncoderInit`]. Any partially-initialized engine is torn down before
//!   these are returned.
//! - **Engine failures** (one unit or frame): [`Decode`], [`Encode`],
//!   [`Control`]. Recoverable at access-unit granularity; callers skip the
//!   failing unit, count it, and continue.
//!
//! `NeedMoreData` is deliberately *not* an error; it is a normal decode
//! outcome (see [`crate::DecodeOutcome`]).
//!
//! [`DecoderNotReady`]: CodecError::DecoderNotReady
//! [`EncoderNotReady`]: CodecError::EncoderNotReady
//! [`EmptyPullBuffer`]: CodecError::EmptyPullBuffer
//! [`MissingPlane`]: CodecError::MissingPlane
//! [`ShortPlane`]: CodecError::ShortPlane
//! [`DecoderInit`]: CodecError::DecoderInit
//! [`EncoderInit`]: CodecError::EncoderInit
//! [`Decode`]: CodecError::Decode
//! [`Encode`]: CodecError::Encode
//! [`Control`]: CodecError::Control

use thiserror::Error;

use crate::engine::EngineError;

/// Errors returned by [`crate::CodecHandle`] operations.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The handle has no initialized decoder.
    #[error("decoder is absent or not initialized")]
    DecoderNotReady,

    /// The handle has no initialized encoder.
    #[error("encoder is absent or not initialized")]
    EncoderNotReady,

    /// The pull buffer has zero capacity; no progress is possible.
    #[error("output buffer has zero capacity")]
    EmptyPullBuffer,

    /// A required picture plane is absent.
    #[error("picture is missing plane {0}")]
    MissingPlane(usize),

    /// A picture plane holds fewer bytes than its dimensions require.
    #[error("plane {plane} holds {actual} bytes, need {needed}")]
    ShortPlane {
        /// Plane index.
        plane: usize,
        /// Bytes required by width, height, and stride.
        needed: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Decoder engine initialization failed at handle creation.
    #[error("decoder initialization failed: {0}")]
    DecoderInit(#[source] EngineError),

    /// Encoder engine initialization failed at handle creation.
    #[error("encoder initialization failed: {0}")]
    EncoderInit(#[source] EngineError),

    /// The decoder engine rejected one access unit.
    #[error("decode failed: {0}")]
    Decode(#[source] EngineError),

    /// The encoder engine rejected one picture.
    #[error("encode failed: {0}")]
    Encode(#[source] EngineError),

    /// The encoder engine rejected a control request.
    #[error("control request failed: {0}")]
    Control(#[source] EngineError),
}

impl CodecError {
    /// Whether this error signals caller misuse rather than engine trouble.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CodecError::DecoderNotReady
                | CodecError::EncoderNotReady
                | CodecError::EmptyPullBuffer
                | CodecError::MissingPlane(_)
                | CodecError::ShortPlane { .. }
        )
    }

    /// Whether this error is a per-unit engine failure, recoverable by
    /// skipping the unit and continuing with the stream.
    pub fn is_engine_failure(&self) -> bool {
        matches!(
            self,
            CodecError::Decode(_) | CodecError::Encode(_) | CodecError::Control(_)
        )
    }
}

/// Result type alias for codec handle operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
#[cfg_attr(all(coverage_nightly, test), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes_are_disjoint() {
        let precondition = CodecError::DecoderNotReady;
        assert!(precondition.is_precondition());
        assert!(!precondition.is_engine_failure());

        let engine = CodecError::Decode(EngineError::new(-1, "bad unit"));
        assert!(engine.is_engine_failure());
        assert!(!engine.is_precondition());

        let init = CodecError::EncoderInit(EngineError::new(-2, "no resources"));
        assert!(!init.is_precondition());
        assert!(!init.is_engine_failure());
    }
}
