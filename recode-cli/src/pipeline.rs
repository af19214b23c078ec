//! The transcode driver loop.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use annexb::AccessUnitScanner;
use h264_codec::mock::{MockDecoder, MockEncoder};
use h264_codec::{CodecCommand, CodecHandle, CodecSettings, DecodeOutcome, FrameBuffer};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Size of the bounded buffer each encode pull copies into.
const PULL_CHUNK_SIZE: usize = 64 * 1024;

/// Knobs for one transcode run.
#[derive(Debug, Clone)]
pub struct TranscodeOptions {
    pub width: u32,
    pub height: u32,
    pub max_frame_rate: f32,
    pub target_bitrate: u32,
    pub window_size: usize,
    /// Force a keyframe before every Nth encoded frame.
    pub keyframe_every: Option<u64>,
    /// Access units per frame for the software decoder.
    pub units_per_frame: u32,
    /// Slice payload length for the software encoder.
    pub payload_len: usize,
}

/// Per-stream tally reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    /// Access units scanned from the input.
    pub units: u64,
    /// Frames decoded and re-encoded.
    pub frames: u64,
    /// Units or frames dropped after an engine failure.
    pub unit_errors: u64,
}

/// Runs one input file through decode and re-encode into the output file.
///
/// Engine failures on individual units or frames are logged, counted in
/// [`TranscodeStats::unit_errors`], and skipped; only startup and I/O
/// failures abort the run.
pub fn transcode(input: &Path, output: &Path, opts: &TranscodeOptions) -> Result<TranscodeStats> {
    let reader = File::open(input)?;
    let mut writer = BufWriter::new(File::create(output)?);
    let mut scanner = AccessUnitScanner::with_window_size(reader, opts.window_size);

    let settings = CodecSettings {
        width: opts.width,
        height: opts.height,
        max_frame_rate: opts.max_frame_rate,
        target_bitrate: opts.target_bitrate,
    };
    let mut handle = CodecHandle::new(
        Some(Box::new(MockDecoder::new(
            opts.width,
            opts.height,
            opts.units_per_frame,
        ))),
        Some(Box::new(MockEncoder::new(opts.payload_len))),
        &settings,
    )?;

    let mut scratch = FrameBuffer::new();
    let mut chunk = vec![0u8; PULL_CHUNK_SIZE];
    let mut stats = TranscodeStats::default();

    while let Some(unit) = scanner.next_unit()? {
        stats.units += 1;
        debug!(
            unit = stats.units,
            offset = scanner.last_offset(),
            len = unit.len(),
            "access unit"
        );

        let frame_ready = match handle.decode(&unit) {
            Ok(DecodeOutcome::NeedMoreData) => false,
            Ok(DecodeOutcome::FrameReady(picture)) => {
                // Plane borrows end here; the scratch copy outlives the
                // next decode call.
                scratch.copy_from(&picture)?;
                true
            }
            Err(e) if e.is_engine_failure() => {
                stats.unit_errors += 1;
                warn!(unit = stats.units, error = %e, "skipping access unit");
                false
            }
            Err(e) => return Err(e.into()),
        };
        if !frame_ready {
            continue;
        }

        stats.frames += 1;
        if let Some(every) = opts.keyframe_every
            && every > 0
            && stats.frames % every == 0
        {
            handle.control(CodecCommand::ForceKeyframe)?;
        }

        let view = scratch.as_view();
        let mut submitted = Some(&view);
        loop {
            match handle.pull_encoded(submitted.take(), &mut chunk) {
                Ok(0) => break,
                Ok(n) => writer.write_all(&chunk[..n])?,
                Err(e) if e.is_engine_failure() => {
                    stats.unit_errors += 1;
                    warn!(frame = stats.frames, error = %e, "dropping frame after encode failure");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    writer.flush()?;
    info!(
        units = stats.units,
        frames = stats.frames,
        errors = stats.unit_errors,
        "transcode complete"
    );
    Ok(stats)
}
