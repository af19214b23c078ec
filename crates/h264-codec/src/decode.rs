//! The tri-state decode adapter.

use tracing::debug;

use crate::engine::DecodePass;
use crate::error::{CodecError, Result};
use crate::frame::PictureView;
use crate::handle::CodecHandle;

/// Outcome of feeding one access unit to the decoder.
#[derive(Debug)]
pub enum DecodeOutcome<'a> {
    /// More access units are required before a frame materializes.
    ///
    /// Not an error: common for parameter-set units and multi-slice
    /// pictures.
    NeedMoreData,
    /// A decoded frame is ready.
    ///
    /// The planes borrow engine-managed buffers and are valid only until
    /// the next call on this handle; copy them (for example into a
    /// [`crate::FrameBuffer`]) to keep them longer.
    FrameReady(PictureView<'a>),
}

impl CodecHandle {
    /// Feeds one access unit to the decoding engine.
    ///
    /// Returns [`CodecError::DecoderNotReady`] when the handle has no
    /// initialized decoder — caller misuse, distinguishable from a
    /// [`CodecError::Decode`] engine failure on bad bitstream data.
    pub fn decode(&mut self, access_unit: &[u8]) -> Result<DecodeOutcome<'_>> {
        if !self.decoder_initialized {
            return Err(CodecError::DecoderNotReady);
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return Err(CodecError::DecoderNotReady);
        };

        let pass = match decoder.decode(access_unit) {
            Ok(pass) => pass,
            Err(e) => {
                debug!(code = e.code, len = access_unit.len(), "decoder rejected access unit");
                return Err(CodecError::Decode(e));
            }
        };

        match pass {
            DecodePass::Pending => Ok(DecodeOutcome::NeedMoreData),
            DecodePass::Picture(picture) => Ok(DecodeOutcome::FrameReady(PictureView {
                width: picture.width,
                height: picture.height,
                planes: [
                    Some(picture.planes[0]),
                    Some(picture.planes[1]),
                    Some(picture.planes[2]),
                    None,
                ],
                strides: [
                    picture.strides[0],
                    picture.strides[1],
                    picture.strides[2],
                    0,
                ],
            })),
        }
    }
}
