use std::process;

use clap::Parser;
use recode::cli::Args;
use recode::pipeline::{TranscodeOptions, transcode};
use tracing::{Level, error, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let opts = TranscodeOptions {
        width: args.width,
        height: args.height,
        max_frame_rate: args.fps,
        target_bitrate: args.bitrate,
        window_size: args.window_size,
        keyframe_every: args.keyframe_every,
        units_per_frame: args.units_per_frame,
        payload_len: args.payload_len,
    };

    match transcode(&args.input, &args.output, &opts) {
        Ok(stats) => {
            info!(
                input = %args.input.display(),
                output = %args.output.display(),
                units = stats.units,
                frames = stats.frames,
                errors = stats.unit_errors,
                "done"
            );
        }
        Err(e) => {
            error!("Transcode failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(verbose))
        .init();
}
