//! The encoder's per-picture output structure.
//!
//! One encode call produces an ordered sequence of spatial layers, each an
//! ordered sequence of NAL units packed back-to-back in a single backing
//! buffer. Units are addressed by index and length into that buffer — an
//! arena-plus-index layout, so resumable drains never do pointer
//! arithmetic across calls.

use bytes::Bytes;
use thiserror::Error;

/// The per-layer NAL lengths do not add up to the backing buffer.
#[derive(Debug, Error)]
#[error("layer declares {declared} NAL bytes but backing buffer holds {actual}")]
pub struct LayerSizeMismatch {
    /// Sum of the declared NAL unit lengths.
    pub declared: usize,
    /// Backing buffer length.
    pub actual: usize,
}

/// One spatial layer of encoded output: a backing buffer plus the length of
/// each NAL unit packed inside it, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLayer {
    buffer: Bytes,
    nal_lengths: Vec<usize>,
}

impl EncodedLayer {
    /// Builds a layer, validating that the declared unit lengths cover the
    /// backing buffer exactly.
    pub fn new(buffer: Bytes, nal_lengths: Vec<usize>) -> Result<Self, LayerSizeMismatch> {
        let declared: usize = nal_lengths.iter().sum();
        if declared != buffer.len() {
            return Err(LayerSizeMismatch {
                declared,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            buffer,
            nal_lengths,
        })
    }

    /// The packed backing buffer.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of NAL units in this layer.
    pub fn nal_count(&self) -> usize {
        self.nal_lengths.len()
    }

    /// Length in bytes of the NAL unit at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn nal_len(&self, index: usize) -> usize {
        self.nal_lengths[index]
    }

    /// The declared NAL unit lengths, in order.
    pub fn nal_lengths(&self) -> &[usize] {
        &self.nal_lengths
    }

    /// Total bytes in this layer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the layer carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// The encoder's complete output for one picture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedLayerSet {
    /// Spatial layers, lowest first.
    pub layers: Vec<EncodedLayer>,
}

impl EncodedLayerSet {
    /// Number of spatial layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total bytes across all units in all layers.
    pub fn total_len(&self) -> usize {
        self.layers.iter().map(EncodedLayer::len).sum()
    }
}

#[cfg(test)]
#[cfg_attr(all(coverage_nightly, test), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_layer_accepts_matching_lengths() {
        let layer = EncodedLayer::new(Bytes::from_static(b"abcdefgh"), vec![3, 5]).unwrap();
        assert_eq!(layer.nal_count(), 2);
        assert_eq!(layer.nal_len(0), 3);
        assert_eq!(layer.nal_len(1), 5);
        assert_eq!(layer.len(), 8);
    }

    #[test]
    fn test_layer_rejects_mismatched_lengths() {
        let err = EncodedLayer::new(Bytes::from_static(b"abc"), vec![2, 2]).unwrap_err();
        assert_eq!(err.declared, 4);
        assert_eq!(err.actual, 3);
    }

    #[test]
    fn test_empty_layer() {
        let layer = EncodedLayer::new(Bytes::new(), Vec::new()).unwrap();
        assert!(layer.is_empty());
        assert_eq!(layer.nal_count(), 0);
    }

    #[test]
    fn test_set_total_len() {
        let set = EncodedLayerSet {
            layers: vec![
                EncodedLayer::new(Bytes::from_static(b"abc"), vec![3]).unwrap(),
                EncodedLayer::new(Bytes::from_static(b"defgh"), vec![2, 3]).unwrap(),
            ],
        };
        assert_eq!(set.layer_count(), 2);
        assert_eq!(set.total_len(), 8);
    }
}
