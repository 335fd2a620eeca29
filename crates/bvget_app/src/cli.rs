use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bvget")]
#[command(about = "Batch-download dash videos and mux their streams with ffmpeg")]
pub struct Args {
    /// Identifiers to fetch instead of the worklist items
    pub ids: Vec<String>,

    /// RON worklist file
    #[arg(short, long)]
    pub worklist: Option<PathBuf>,

    /// Directory for merged files (default: ./video)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Media tool used for merging
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Audio codec ffmpeg transcodes to; video is always copied
    #[arg(long, default_value = "aac")]
    pub audio_codec: String,

    /// Page address template; `{id}` is replaced by the identifier
    #[arg(long)]
    pub page_url_template: Option<String>,

    /// Connect timeout in seconds (none by default)
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Per-request timeout in seconds, covering whole downloads (none by default)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also log to the terminal, at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log file
    #[arg(long, default_value = "bvget.log")]
    pub log_file: PathBuf,
}
