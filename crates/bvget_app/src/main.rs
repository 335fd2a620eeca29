mod cli;
mod config;
mod progress;

use anyhow::Context;
use bvget_engine::{BatchRunner, FfmpegMuxer};
use clap::Parser;
use engine_logging::LogDestination;
use log::LevelFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let (destination, level) = if args.verbose {
        (LogDestination::Both, LevelFilter::Debug)
    } else {
        (LogDestination::File, LevelFilter::Info)
    };
    engine_logging::initialize(destination, level, &args.log_file);

    let run = config::resolve(&args)?;
    println!("Starting batch download of {} video(s)", run.items.len());

    let muxer = FfmpegMuxer::new(run.ffmpeg).with_audio_codec(run.audio_codec);
    let runner = BatchRunner::new(run.engine).with_muxer(muxer);
    let report = runner
        .run(&run.items, &progress::ConsoleProgress::default())
        .await
        .context("preparing output directory")?;

    progress::print_summary(&report.summary);
    Ok(())
}
