//! The encode drain cursor.
//!
//! One engine encode call produces a complete [`EncodedLayerSet`]; the
//! cursor then linearizes it into bounded-size writes across repeated
//! [`CodecHandle::pull_encoded`] calls, walking layers → NAL units → bytes
//! in order, with no skipping and no reordering. A copy may stop mid-unit
//! but never crosses a unit boundary.

use tracing::debug;

use crate::error::{CodecError, Result};
use crate::frame::PictureView;
use crate::handle::CodecHandle;
use crate::layers::EncodedLayerSet;

/// Resumable position inside one picture's encoded output.
///
/// All four indices are monotonically non-decreasing for the lifetime of
/// one picture and are reset only when the next picture is submitted.
pub(crate) struct DrainState {
    layers: EncodedLayerSet,
    layer: usize,
    nal: usize,
    nal_pos: usize,
    layer_pos: usize,
}

impl DrainState {
    fn new(layers: EncodedLayerSet) -> Self {
        Self {
            layers,
            layer: 0,
            nal: 0,
            nal_pos: 0,
            layer_pos: 0,
        }
    }

    /// Copies the next chunk into `buf`, or returns `None` when every layer
    /// is exhausted.
    ///
    /// Exhausted units and layers (including zero-length units) are skipped
    /// here rather than consuming a call each, so `None` always means fully
    /// drained.
    fn next_chunk(&mut self, buf: &mut [u8]) -> Option<usize> {
        loop {
            let layer = self.layers.layers.get(self.layer)?;
            if self.nal >= layer.nal_count() {
                self.layer += 1;
                self.nal = 0;
                self.nal_pos = 0;
                self.layer_pos = 0;
                continue;
            }
            let nal_len = layer.nal_len(self.nal);
            if self.nal_pos >= nal_len {
                self.nal += 1;
                self.nal_pos = 0;
                continue;
            }

            let n = (nal_len - self.nal_pos).min(buf.len());
            buf[..n].copy_from_slice(&layer.buffer()[self.layer_pos..self.layer_pos + n]);
            self.nal_pos += n;
            self.layer_pos += n;
            return Some(n);
        }
    }
}

impl CodecHandle {
    /// Pulls encoded output for one picture through a bounded buffer.
    ///
    /// When no drain is in progress and `picture` is supplied, the picture
    /// is submitted to the encoding engine once and its output becomes the
    /// current drain; with no picture and nothing draining, returns `Ok(0)`
    /// immediately. While a drain is in progress the `picture` argument is
    /// ignored.
    ///
    /// Returns the number of bytes copied (`> 0`), or `Ok(0)` once the
    /// picture's output is exhausted — the signal to stop looping and
    /// submit the next picture. Callers loop, re-invoking with the same
    /// buffer, until `Ok(0)`. On an engine encode failure the cursor stays
    /// idle and the picture's output is lost.
    pub fn pull_encoded(
        &mut self,
        picture: Option<&PictureView<'_>>,
        buf: &mut [u8],
    ) -> Result<usize> {
        if !self.encoder_initialized {
            return Err(CodecError::EncoderNotReady);
        }
        if buf.is_empty() {
            return Err(CodecError::EmptyPullBuffer);
        }

        if self.drain.is_none() {
            let Some(picture) = picture else {
                return Ok(0);
            };
            let Some(encoder) = self.encoder.as_mut() else {
                return Err(CodecError::EncoderNotReady);
            };
            let layers = match encoder.encode(picture) {
                Ok(layers) => layers,
                Err(e) => {
                    debug!(code = e.code, "encoder rejected picture");
                    return Err(CodecError::Encode(e));
                }
            };
            self.drain = Some(DrainState::new(layers));
        }

        if let Some(state) = self.drain.as_mut()
            && let Some(n) = state.next_chunk(buf)
        {
            return Ok(n);
        }

        self.drain = None;
        Ok(0)
    }
}
