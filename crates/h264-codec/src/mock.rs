//! Deterministic software engines.
//!
//! These implement the [`engine`](crate::engine) traits without any real
//! compression: the decoder synthesizes an I420 picture from a rolling
//! checksum of the bytes it was fed, and the encoder emits
//! start-code-prefixed units sampled from the submitted picture. They back
//! the CLI's dry-run path and every integration-style test; output is a
//! pure function of the input stream, so assertions can be exact.

use bytes::Bytes;

use crate::engine::{DecodePass, DecodedPicture, DecoderEngine, EncoderEngine, EngineError};
use crate::frame::PictureView;
use crate::layers::{EncodedLayer, EncodedLayerSet};
use crate::params::{DecoderConfig, EncoderConfig};

const RC_NOT_INITIALIZED: i32 = -1;
const RC_EMPTY_UNIT: i32 = -2;
const RC_BAD_PICTURE: i32 = -3;

/// A software decoder that completes one picture every `units_per_frame`
/// access units and reports `Pending` in between.
pub struct MockDecoder {
    width: u32,
    height: u32,
    units_per_frame: u32,
    pending_units: u32,
    seed: u8,
    initialized: bool,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
}

impl MockDecoder {
    /// Creates a decoder producing pictures of the given dimensions.
    ///
    /// `units_per_frame` below 1 is clamped to 1.
    pub fn new(width: u32, height: u32, units_per_frame: u32) -> Self {
        Self {
            width,
            height,
            units_per_frame: units_per_frame.max(1),
            pending_units: 0,
            seed: 0,
            initialized: false,
            y: Vec::new(),
            u: Vec::new(),
            v: Vec::new(),
        }
    }
}

impl DecoderEngine for MockDecoder {
    fn initialize(&mut self, _config: &DecoderConfig) -> Result<(), EngineError> {
        let width = self.width as usize;
        let height = self.height as usize;
        let chroma = width.div_ceil(2) * height.div_ceil(2);
        self.y = vec![0u8; width * height];
        self.u = vec![0u8; chroma];
        self.v = vec![0u8; chroma];
        self.pending_units = 0;
        self.seed = 0;
        self.initialized = true;
        Ok(())
    }

    fn decode(&mut self, access_unit: &[u8]) -> Result<DecodePass<'_>, EngineError> {
        if !self.initialized {
            return Err(EngineError::new(RC_NOT_INITIALIZED, "decoder not initialized"));
        }
        if access_unit.is_empty() {
            return Err(EngineError::new(RC_EMPTY_UNIT, "empty access unit"));
        }

        self.seed = access_unit
            .iter()
            .fold(self.seed, |acc, b| acc.wrapping_mul(31).wrapping_add(*b));
        self.pending_units += 1;
        if self.pending_units < self.units_per_frame {
            return Ok(DecodePass::Pending);
        }
        self.pending_units = 0;

        let seed = self.seed;
        for (i, px) in self.y.iter_mut().enumerate() {
            *px = seed.wrapping_add(i as u8);
        }
        self.u.fill(seed ^ 0x55);
        self.v.fill(seed ^ 0xAA);

        let width = self.width as usize;
        let chroma_width = width.div_ceil(2);
        Ok(DecodePass::Picture(DecodedPicture {
            width: self.width,
            height: self.height,
            planes: [&self.y, &self.u, &self.v],
            strides: [width, chroma_width, chroma_width],
        }))
    }

    fn uninitialize(&mut self) {
        self.initialized = false;
    }
}

/// A software encoder producing one layer per configured spatial layer.
///
/// Each layer holds one slice unit sampled from the picture's luma plane;
/// the first frame and any frame after [`force_intra_frame`] additionally
/// carries a parameter-set unit ahead of an IDR-marked slice.
///
/// [`force_intra_frame`]: EncoderEngine::force_intra_frame
pub struct MockEncoder {
    payload_len: usize,
    layer_count: usize,
    initialized: bool,
    force_idr: bool,
    frame_index: u64,
}

impl MockEncoder {
    /// Creates an encoder emitting `payload_len`-byte slice payloads.
    pub fn new(payload_len: usize) -> Self {
        Self {
            payload_len: payload_len.max(1),
            layer_count: 1,
            initialized: false,
            force_idr: false,
            frame_index: 0,
        }
    }

    /// Number of frames encoded so far.
    pub fn frames_encoded(&self) -> u64 {
        self.frame_index
    }
}

const START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];
const NAL_SPS: u8 = 0x67;
const NAL_IDR_SLICE: u8 = 0x65;
const NAL_NON_IDR_SLICE: u8 = 0x41;

impl EncoderEngine for MockEncoder {
    fn initialize(&mut self, config: &EncoderConfig) -> Result<(), EngineError> {
        if config.spatial_layers.is_empty() {
            return Err(EngineError::new(RC_BAD_PICTURE, "no spatial layers configured"));
        }
        self.layer_count = config.spatial_layers.len();
        // Slice payloads respect the configured NAL bound.
        self.payload_len = self
            .payload_len
            .min(config.max_nal_size.saturating_sub(START_CODE.len() + 1))
            .max(1);
        self.frame_index = 0;
        self.force_idr = false;
        self.initialized = true;
        Ok(())
    }

    fn encode(&mut self, picture: &PictureView<'_>) -> Result<EncodedLayerSet, EngineError> {
        if !self.initialized {
            return Err(EngineError::new(RC_NOT_INITIALIZED, "encoder not initialized"));
        }
        let Some(luma) = picture.plane(0) else {
            return Err(EngineError::new(RC_BAD_PICTURE, "missing luma plane"));
        };

        let idr = self.force_idr || self.frame_index == 0;
        self.force_idr = false;

        let mut layers = Vec::with_capacity(self.layer_count);
        for layer_index in 0..self.layer_count {
            let mut buffer = Vec::new();
            let mut nal_lengths = Vec::new();

            if idr {
                let before = buffer.len();
                buffer.extend_from_slice(&START_CODE);
                buffer.extend_from_slice(&[NAL_SPS, 0x42, 0xC0, 0x1F, layer_index as u8]);
                nal_lengths.push(buffer.len() - before);
            }

            let before = buffer.len();
            buffer.extend_from_slice(&START_CODE);
            buffer.push(if idr { NAL_IDR_SLICE } else { NAL_NON_IDR_SLICE });
            let step = (luma.len() / self.payload_len).max(1);
            for i in 0..self.payload_len {
                let byte = luma.get(i * step % luma.len().max(1)).copied().unwrap_or(0);
                buffer.push(byte);
            }
            nal_lengths.push(buffer.len() - before);

            let layer = EncodedLayer::new(Bytes::from(buffer), nal_lengths)
                .map_err(|e| EngineError::new(RC_BAD_PICTURE, e.to_string()))?;
            layers.push(layer);
        }

        self.frame_index += 1;
        Ok(EncodedLayerSet { layers })
    }

    fn force_intra_frame(&mut self) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::new(RC_NOT_INITIALIZED, "encoder not initialized"));
        }
        self.force_idr = true;
        Ok(())
    }

    fn uninitialize(&mut self) {
        self.initialized = false;
    }
}

#[cfg(test)]
#[cfg_attr(all(coverage_nightly, test), coverage(off))]
mod tests {
    use super::*;

    fn init_decoder(units_per_frame: u32) -> MockDecoder {
        let mut decoder = MockDecoder::new(8, 8, units_per_frame);
        decoder.initialize(&DecoderConfig::default()).unwrap();
        decoder
    }

    fn init_encoder(payload_len: usize) -> MockEncoder {
        let mut encoder = MockEncoder::new(payload_len);
        encoder
            .initialize(&EncoderConfig::build(8, 8, 30.0, 100_000))
            .unwrap();
        encoder
    }

    #[test]
    fn test_decoder_cadence() {
        let mut decoder = init_decoder(3);
        assert!(matches!(decoder.decode(b"a").unwrap(), DecodePass::Pending));
        assert!(matches!(decoder.decode(b"b").unwrap(), DecodePass::Pending));
        assert!(matches!(
            decoder.decode(b"c").unwrap(),
            DecodePass::Picture(_)
        ));
        // Cadence restarts after a completed picture.
        assert!(matches!(decoder.decode(b"d").unwrap(), DecodePass::Pending));
    }

    #[test]
    fn test_decoder_is_deterministic() {
        let mut first = init_decoder(1);
        let mut second = init_decoder(1);
        let luma_a = match first.decode(b"same input").unwrap() {
            DecodePass::Picture(p) => p.planes[0].to_vec(),
            DecodePass::Pending => panic!("expected picture"),
        };
        let luma_b = match second.decode(b"same input").unwrap() {
            DecodePass::Picture(p) => p.planes[0].to_vec(),
            DecodePass::Pending => panic!("expected picture"),
        };
        assert_eq!(luma_a, luma_b);
    }

    #[test]
    fn test_decoder_requires_initialize() {
        let mut decoder = MockDecoder::new(8, 8, 1);
        let err = decoder.decode(b"unit").unwrap_err();
        assert_eq!(err.code, RC_NOT_INITIALIZED);
    }

    #[test]
    fn test_decoder_rejects_empty_unit() {
        let mut decoder = init_decoder(1);
        let err = decoder.decode(b"").unwrap_err();
        assert_eq!(err.code, RC_EMPTY_UNIT);
    }

    #[test]
    fn test_encoder_first_frame_is_idr_with_parameter_set() {
        let mut encoder = init_encoder(16);
        let y = [1u8; 64];
        let c = [2u8; 16];
        let picture = PictureView::i420(8, 8, &y, &c, &c, [8, 4, 4]);

        let first = encoder.encode(&picture).unwrap();
        assert_eq!(first.layer_count(), 1);
        assert_eq!(first.layers[0].nal_count(), 2);
        assert_eq!(first.layers[0].buffer()[4], NAL_SPS);

        let second = encoder.encode(&picture).unwrap();
        assert_eq!(second.layers[0].nal_count(), 1);
        assert_eq!(second.layers[0].buffer()[4], NAL_NON_IDR_SLICE);
        assert_eq!(encoder.frames_encoded(), 2);
    }

    #[test]
    fn test_force_intra_marks_next_frame() {
        let mut encoder = init_encoder(16);
        let y = [1u8; 64];
        let c = [2u8; 16];
        let picture = PictureView::i420(8, 8, &y, &c, &c, [8, 4, 4]);

        encoder.encode(&picture).unwrap();
        encoder.force_intra_frame().unwrap();
        let forced = encoder.encode(&picture).unwrap();
        assert_eq!(forced.layers[0].nal_count(), 2);

        // The request is one-shot.
        let after = encoder.encode(&picture).unwrap();
        assert_eq!(after.layers[0].nal_count(), 1);
    }

    #[test]
    fn test_encoder_units_start_with_start_code() {
        let mut encoder = init_encoder(16);
        let y = [1u8; 64];
        let c = [2u8; 16];
        let picture = PictureView::i420(8, 8, &y, &c, &c, [8, 4, 4]);

        let set = encoder.encode(&picture).unwrap();
        let layer = &set.layers[0];
        let mut offset = 0;
        for index in 0..layer.nal_count() {
            assert_eq!(&layer.buffer()[offset..offset + 4], &START_CODE);
            offset += layer.nal_len(index);
        }
        assert_eq!(offset, layer.len());
    }

    #[test]
    fn test_encoder_payload_respects_max_nal_size() {
        let mut encoder = MockEncoder::new(usize::MAX);
        let config = EncoderConfig::build(8, 8, 30.0, 100_000);
        encoder.initialize(&config).unwrap();
        let y = [1u8; 64];
        let c = [2u8; 16];
        let picture = PictureView::i420(8, 8, &y, &c, &c, [8, 4, 4]);

        let set = encoder.encode(&picture).unwrap();
        for layer in &set.layers {
            for index in 0..layer.nal_count() {
                assert!(layer.nal_len(index) <= config.max_nal_size);
            }
        }
    }
}
