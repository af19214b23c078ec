//! Engine configuration: decoder policy and the computed encoder parameter
//! set.
//!
//! The decode path uses fixed policy (slice-copy concealment, AVC Annex B
//! input, decode every layer). The encode path derives a full parameter set
//! from four inputs — width, height, maximum frame rate, target bitrate —
//! plus fixed defaults tuned for real-time camera content with size-limited
//! slices.

/// Slice size limit in bytes applied to every produced NAL unit.
pub const MAX_SLICE_SIZE: usize = 1200;

/// Extra headroom for NAL headers on top of the slice size limit.
pub const NAL_HEADER_OVERHEAD: usize = 50;

/// Error-concealment strategy for the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorConcealment {
    /// No concealment; corrupt pictures are surfaced as-is.
    Disabled,
    /// Conceal by copying the co-located frame region.
    FrameCopy,
    /// Conceal by copying neighboring slice data.
    #[default]
    SliceCopy,
}

/// Input bitstream framing expected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitstreamFormat {
    /// AVC access units in Annex B framing.
    #[default]
    Avc,
    /// Scalable (SVC) bitstream.
    Svc,
}

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Error-concealment strategy.
    pub error_concealment: ErrorConcealment,
    /// Expected bitstream framing.
    pub bitstream_format: BitstreamFormat,
    /// Decode every spatial layer; no target-layer filtering.
    pub decode_all_layers: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            error_concealment: ErrorConcealment::SliceCopy,
            bitstream_format: BitstreamFormat::Avc,
            decode_all_layers: true,
        }
    }
}

/// Rate-control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateControlMode {
    /// Quality-targeted rate control.
    #[default]
    Quality,
    /// Bitrate-targeted rate control.
    Bitrate,
    /// Rate control disabled (fixed QP).
    Off,
}

/// Encoder usage profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageType {
    /// Real-time camera content.
    #[default]
    RealTimeCamera,
    /// Screen content.
    ScreenContent,
}

/// Parameter-set ID strategy across IDR boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpsPpsIdStrategy {
    /// Reuse a constant ID.
    Constant,
    /// Monotonically increasing IDs.
    #[default]
    Increasing,
}

/// Encoder complexity / speed trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComplexityMode {
    /// Fastest.
    Low,
    /// Balanced.
    #[default]
    Medium,
    /// Best compression.
    High,
}

/// Reference-frame-count selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefFrameCount {
    /// Let the engine pick.
    #[default]
    Auto,
    /// Fixed count.
    Fixed(u32),
}

/// One spatial layer of the encoded bitstream.
///
/// This core always configures exactly one layer, mirroring the top-level
/// dimensions; the representation and the frame-rate fold generalize to
/// more.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialLayerConfig {
    /// Layer width in pixels.
    pub width: u32,
    /// Layer height in pixels.
    pub height: u32,
    /// Layer frame rate in frames per second.
    pub frame_rate: f32,
    /// Layer target bitrate in bits per second.
    pub bitrate: u32,
    /// Size limit applied to each slice of this layer, in bytes.
    pub max_slice_size: usize,
}

/// The full encoder parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Maximum input frame rate across all spatial layers.
    pub max_frame_rate: f32,
    /// Target bitrate in bits per second.
    pub target_bitrate: u32,
    /// Rate-control mode.
    pub rate_control: RateControlMode,
    /// Number of temporal layers.
    pub temporal_layers: u32,
    /// Denoising.
    pub denoise: bool,
    /// Background detection.
    pub background_detection: bool,
    /// Scene-change detection.
    pub scene_change_detection: bool,
    /// Adaptive quantization.
    pub adaptive_quantization: bool,
    /// Frame skipping under rate pressure.
    pub frame_skip: bool,
    /// Multi-threaded slice encoding inside the engine.
    pub multithread_slicing: bool,
    /// Long-term reference frames.
    pub long_term_reference: bool,
    /// LTR mark period in frames.
    pub ltr_mark_period: u32,
    /// Loop-filter alpha/C0 offset.
    pub loop_filter_alpha_c0_offset: i32,
    /// Loop-filter beta offset.
    pub loop_filter_beta_offset: i32,
    /// Complexity mode.
    pub complexity: ComplexityMode,
    /// Intra-refresh period in frames.
    pub intra_period: u32,
    /// Reference-frame-count selection.
    pub ref_frame_count: RefFrameCount,
    /// Parameter-set ID strategy.
    pub sps_pps_id_strategy: SpsPpsIdStrategy,
    /// Prefix-NAL adding control.
    pub prefix_nal_adding: bool,
    /// Usage profile.
    pub usage_type: UsageType,
    /// Frame cropping.
    pub frame_cropping: bool,
    /// Configured maximum NAL size in bytes (slice limit + header headroom).
    pub max_nal_size: usize,
    /// Spatial layers, lowest first.
    pub spatial_layers: Vec<SpatialLayerConfig>,
}

impl EncoderConfig {
    /// Builds the full parameter set from the four caller inputs.
    ///
    /// A single spatial layer mirrors the top-level width, height, frame
    /// rate, and bitrate; the intra period is three seconds' worth of
    /// frames; every slice is size-limited to [`MAX_SLICE_SIZE`].
    pub fn build(width: u32, height: u32, max_frame_rate: f32, target_bitrate: u32) -> Self {
        let layer = SpatialLayerConfig {
            width,
            height,
            frame_rate: max_frame_rate,
            bitrate: target_bitrate,
            max_slice_size: MAX_SLICE_SIZE,
        };

        let mut config = Self {
            width,
            height,
            max_frame_rate,
            target_bitrate,
            rate_control: RateControlMode::Quality,
            temporal_layers: 1,
            denoise: false,
            background_detection: true,
            scene_change_detection: true,
            adaptive_quantization: true,
            frame_skip: false,
            multithread_slicing: true,
            long_term_reference: false,
            ltr_mark_period: 30,
            loop_filter_alpha_c0_offset: 0,
            loop_filter_beta_offset: 0,
            complexity: ComplexityMode::Medium,
            intra_period: (max_frame_rate * 3.0) as u32,
            ref_frame_count: RefFrameCount::Auto,
            sps_pps_id_strategy: SpsPpsIdStrategy::Increasing,
            prefix_nal_adding: false,
            usage_type: UsageType::RealTimeCamera,
            frame_cropping: true,
            max_nal_size: MAX_SLICE_SIZE + NAL_HEADER_OVERHEAD,
            spatial_layers: vec![layer],
        };
        config.max_frame_rate = config.effective_max_frame_rate();
        config
    }

    /// Maximum frame rate across all configured spatial layers.
    ///
    /// Trivial with one layer, but must hold for any layer count.
    pub fn effective_max_frame_rate(&self) -> f32 {
        if self.spatial_layers.is_empty() {
            return self.max_frame_rate;
        }
        self.spatial_layers
            .iter()
            .map(|layer| layer.frame_rate)
            .fold(0.0f32, f32::max)
    }
}

#[cfg(test)]
#[cfg_attr(all(coverage_nightly, test), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config_default_policy() {
        let config = DecoderConfig::default();
        assert_eq!(config.error_concealment, ErrorConcealment::SliceCopy);
        assert_eq!(config.bitstream_format, BitstreamFormat::Avc);
        assert!(config.decode_all_layers);
    }

    #[test]
    fn test_encoder_config_build() {
        let config = EncoderConfig::build(1920, 1080, 60.0, 16 * 1024 * 1024);
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
        assert_eq!(config.max_frame_rate, 60.0);
        assert_eq!(config.rate_control, RateControlMode::Quality);
        assert_eq!(config.temporal_layers, 1);
        assert_eq!(config.intra_period, 180);
        assert_eq!(config.max_nal_size, MAX_SLICE_SIZE + NAL_HEADER_OVERHEAD);
        assert!(!config.denoise);
        assert!(config.scene_change_detection);
        assert!(config.background_detection);
        assert!(config.adaptive_quantization);
        assert!(!config.frame_skip);
        assert!(config.frame_cropping);

        assert_eq!(config.spatial_layers.len(), 1);
        let layer = &config.spatial_layers[0];
        assert_eq!(layer.width, 1920);
        assert_eq!(layer.height, 1080);
        assert_eq!(layer.frame_rate, 60.0);
        assert_eq!(layer.bitrate, 16 * 1024 * 1024);
        assert_eq!(layer.max_slice_size, MAX_SLICE_SIZE);
    }

    #[test]
    fn test_effective_max_frame_rate_folds_over_layers() {
        let mut config = EncoderConfig::build(1280, 720, 30.0, 2_000_000);
        config.spatial_layers.push(SpatialLayerConfig {
            width: 640,
            height: 360,
            frame_rate: 48.0,
            bitrate: 500_000,
            max_slice_size: MAX_SLICE_SIZE,
        });
        assert_eq!(config.effective_max_frame_rate(), 48.0);
    }

    #[test]
    fn test_effective_max_frame_rate_without_layers() {
        let mut config = EncoderConfig::build(1280, 720, 30.0, 2_000_000);
        config.spatial_layers.clear();
        assert_eq!(config.effective_max_frame_rate(), 30.0);
    }
}
