//! Console rendering of engine events.

use std::sync::{Mutex, PoisonError};

use bvget_core::{BatchSummary, ItemOutcome, Stage};
use bvget_engine::{DownloadProgress, EngineEvent, ItemReport, ProgressSink, StreamKind};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const RULE: &str = "============================================================";
const SIZED_TEMPLATE: &str =
    "==> {msg} [{bar:40.cyan/blue}] {percent}% {bytes}/{total_bytes} ({bytes_per_sec})";
const UNSIZED_TEMPLATE: &str = "==> {msg} {spinner} {bytes} ({bytes_per_sec})";

/// Prints banners and stage lines to stdout, with one progress bar per stream download.
pub struct ConsoleProgress {
    active: Mutex<Option<StreamBar>>,
    hidden: bool,
}

struct StreamBar {
    bar: ProgressBar,
    sized: bool,
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self {
            active: Mutex::new(None),
            hidden: false,
        }
    }
}

impl ConsoleProgress {
    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            active: Mutex::new(None),
            hidden: true,
        }
    }

    fn start_bar(&self, stream: StreamKind) -> StreamBar {
        let target = if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(style(UNSIZED_TEMPLATE));
        bar.set_message(format!("{stream} download"));
        StreamBar { bar, sized: false }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

impl StreamBar {
    /// Switches from spinner to bar once the server declares a length.
    fn update(&mut self, progress: &DownloadProgress) {
        if !self.sized {
            if let Some(total) = progress.total.filter(|total| *total > 0) {
                self.bar.set_length(total);
                self.bar.set_style(style(SIZED_TEMPLATE));
                self.sized = true;
            }
        }
        self.bar.set_position(progress.bytes);
    }
}

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: EngineEvent) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let EngineEvent::Progress(progress) = &event {
            if let Some(stream_bar) = active.as_mut() {
                stream_bar.update(progress);
            }
            return;
        }
        if let Some(stream_bar) = active.take() {
            stream_bar.bar.finish();
        }

        match event {
            EngineEvent::ItemStarted {
                position,
                total,
                item,
            } => {
                println!("\n{RULE}\n[{position}/{total}] {}", item.label());
                if item.display_title().is_some() {
                    println!("id: {}", item.id);
                }
                println!("{RULE}");
            }
            EngineEvent::StageChanged { stage, .. } => {
                if let Some(text) = stage_text(stage) {
                    println!("==> {text}");
                }
                let stream = match stage {
                    Stage::FetchingVideo => Some(StreamKind::Video),
                    Stage::FetchingAudio => Some(StreamKind::Audio),
                    _ => None,
                };
                *active = stream.map(|stream| self.start_bar(stream));
            }
            EngineEvent::Progress(_) => {}
            EngineEvent::ItemFinished(report) => println!("==> {}", finish_line(&report)),
        }
    }
}

fn stage_text(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::FetchingPage => Some("fetching page"),
        Stage::Extracting => Some("parsing page"),
        Stage::Selecting => Some("resolving stream addresses"),
        Stage::FetchingVideo => Some("downloading video"),
        Stage::FetchingAudio => Some("downloading audio"),
        Stage::Merging => Some("merging video and audio"),
        Stage::CleaningUp => Some("removing temporary files"),
        Stage::Pending | Stage::Done | Stage::Failed => None,
    }
}

fn finish_line(report: &ItemReport) -> String {
    let id = &report.item.id;
    if !report.outcome.is_success() {
        let reason = report
            .failure
            .as_ref()
            .map_or("unknown error", |failure| failure.message.as_str());
        return format!("failed {id}: {reason}");
    }
    match report.outcome {
        ItemOutcome::AlreadyPresent => format!("{id} already present, skipped"),
        _ => format!("{id} done"),
    }
}

pub fn print_summary(summary: &BatchSummary) {
    println!("\n{RULE}");
    println!("Batch download finished: {} item(s)", summary.total());
    println!("Succeeded: {}", summary.succeeded);
    if summary.skipped > 0 {
        println!("  (already present: {})", summary.skipped);
    }
    println!("Failed: {}", summary.failed);
    println!("{RULE}\n");
}
