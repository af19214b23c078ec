//! Codec handle lifecycle: engine construction, configuration, and
//! symmetric teardown.

use tracing::debug;

use crate::encode::DrainState;
use crate::engine::{DecoderEngine, EncoderEngine};
use crate::error::{CodecError, Result};
use crate::params::{DecoderConfig, EncoderConfig};

/// The four caller inputs the encoder parameter set is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecSettings {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Maximum input frame rate in frames per second.
    pub max_frame_rate: f32,
    /// Target bitrate in bits per second.
    pub target_bitrate: u32,
}

/// Control operations on an open handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecCommand {
    /// Request that the next encoded frame be intra-only.
    ForceKeyframe,
}

/// Owns zero or one decoder engine and zero or one encoder engine.
///
/// Each engine is independently initialized at construction and
/// independently torn down. An engine is only ever invoked while its
/// initialized flag is set. Exactly one handle is active per stream; it is
/// used by one logical thread of control at a time.
pub struct CodecHandle {
    pub(crate) decoder: Option<Box<dyn DecoderEngine>>,
    pub(crate) decoder_initialized: bool,
    pub(crate) encoder: Option<Box<dyn EncoderEngine>>,
    pub(crate) encoder_initialized: bool,
    encoder_config: Option<EncoderConfig>,
    pub(crate) drain: Option<DrainState>,
}

impl std::fmt::Debug for CodecHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecHandle")
            .field("decoder", &self.decoder.is_some())
            .field("decoder_initialized", &self.decoder_initialized)
            .field("encoder", &self.encoder.is_some())
            .field("encoder_initialized", &self.encoder_initialized)
            .field("encoder_config", &self.encoder_config)
            .finish()
    }
}

impl CodecHandle {
    /// Creates a handle over the supplied engines, initializing each one
    /// that is present.
    ///
    /// The decode path uses the fixed [`DecoderConfig`] policy; the encode
    /// path computes a full [`EncoderConfig`] from `settings`. If either
    /// initialization fails, everything already initialized is torn down
    /// before the error is returned — no engine state leaks on the error
    /// path.
    pub fn new(
        decoder: Option<Box<dyn DecoderEngine>>,
        encoder: Option<Box<dyn EncoderEngine>>,
        settings: &CodecSettings,
    ) -> Result<Self> {
        let mut handle = Self {
            decoder,
            decoder_initialized: false,
            encoder,
            encoder_initialized: false,
            encoder_config: None,
            drain: None,
        };

        if let Some(decoder) = handle.decoder.as_mut() {
            let config = DecoderConfig::default();
            if let Err(e) = decoder.initialize(&config) {
                handle.close();
                return Err(CodecError::DecoderInit(e));
            }
            handle.decoder_initialized = true;
            debug!(?config, "decoder initialized");
        }

        if let Some(encoder) = handle.encoder.as_mut() {
            let config = EncoderConfig::build(
                settings.width,
                settings.height,
                settings.max_frame_rate,
                settings.target_bitrate,
            );
            if let Err(e) = encoder.initialize(&config) {
                handle.close();
                return Err(CodecError::EncoderInit(e));
            }
            handle.encoder_initialized = true;
            debug!(
                width = config.width,
                height = config.height,
                fps = config.max_frame_rate,
                bitrate = config.target_bitrate,
                "encoder initialized"
            );
            handle.encoder_config = Some(config);
        }

        Ok(handle)
    }

    /// Whether the decode path is available.
    pub fn decoder_ready(&self) -> bool {
        self.decoder.is_some() && self.decoder_initialized
    }

    /// Whether the encode path is available.
    pub fn encoder_ready(&self) -> bool {
        self.encoder.is_some() && self.encoder_initialized
    }

    /// The computed encoder parameter set, if the encode path is open.
    pub fn encoder_config(&self) -> Option<&EncoderConfig> {
        self.encoder_config.as_ref()
    }

    /// Issues a control request against the encoding engine.
    pub fn control(&mut self, cmd: CodecCommand) -> Result<()> {
        match cmd {
            CodecCommand::ForceKeyframe => {
                if !self.encoder_initialized {
                    return Err(CodecError::EncoderNotReady);
                }
                let Some(encoder) = self.encoder.as_mut() else {
                    return Err(CodecError::EncoderNotReady);
                };
                encoder.force_intra_frame().map_err(CodecError::Control)
            }
        }
    }

    /// Tears down both engines: uninitialize each initialized engine, then
    /// drop the instance and clear its flag. Idempotent and tolerant of
    /// either engine being absent or only partially set up.
    pub fn close(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            if self.decoder_initialized {
                decoder.uninitialize();
                self.decoder_initialized = false;
            }
        }
        if let Some(mut encoder) = self.encoder.take() {
            if self.encoder_initialized {
                encoder.uninitialize();
                self.encoder_initialized = false;
            }
        }
        self.encoder_config = None;
        self.drain = None;
    }
}

impl Drop for CodecHandle {
    fn drop(&mut self) {
        self.close();
    }
}
