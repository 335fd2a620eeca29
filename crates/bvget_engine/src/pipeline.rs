use std::path::{Path, PathBuf};

use bvget_core::{
    ArtifactLayout, ArtifactPaths, BatchSummary, ItemOutcome, ItemState, Stage, WorkItem,
};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};

use crate::extract::PayloadExtractor;
use crate::fetch::{FetchSettings, Fetcher, ProgressObserver, ProgressSink, ReqwestFetcher};
use crate::mux::{FfmpegMuxer, Muxer};
use crate::persist::{self, ensure_output_dir, PersistError};
use crate::select::select_streams;
use crate::{
    DownloadProgress, EngineEvent, FetchTarget, ItemError, ItemFailure, ItemReport, StreamKind,
};

pub const DEFAULT_PAGE_URL_TEMPLATE: &str = "https://www.bilibili.com/video/{id}";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Page address; `{id}` is replaced by the item identifier.
    pub page_url_template: String,
    pub layout: ArtifactLayout,
    pub fetch: FetchSettings,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            page_url_template: DEFAULT_PAGE_URL_TEMPLATE.to_string(),
            layout: ArtifactLayout::new(output_dir),
            fetch: FetchSettings::default(),
        }
    }

    pub fn page_url(&self, id: &str) -> String {
        self.page_url_template.replace("{id}", id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub items: Vec<ItemReport>,
}

/// Processes a worklist one item at a time. A failing item never stops the batch.
pub struct BatchRunner {
    config: EngineConfig,
    fetcher: Box<dyn Fetcher>,
    extractor: PayloadExtractor,
    muxer: Box<dyn Muxer>,
}

impl BatchRunner {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher = ReqwestFetcher::new(config.fetch.clone());
        Self {
            config,
            fetcher: Box::new(fetcher),
            extractor: PayloadExtractor::default(),
            muxer: Box::new(FfmpegMuxer::default()),
        }
    }

    pub fn with_muxer(mut self, muxer: impl Muxer + 'static) -> Self {
        self.muxer = Box::new(muxer);
        self
    }

    /// Fails only when the output directory cannot be prepared, before any item runs.
    pub async fn run(
        &self,
        items: &[WorkItem],
        sink: &dyn ProgressSink,
    ) -> Result<BatchReport, PersistError> {
        let output_dir = &self.config.layout.output_dir;
        ensure_output_dir(output_dir)?;
        engine_info!(
            "Starting batch of {} item(s) into {:?}",
            items.len(),
            output_dir
        );

        let mut report = BatchReport {
            summary: BatchSummary::default(),
            items: Vec::with_capacity(items.len()),
        };
        for (index, item) in items.iter().enumerate() {
            sink.emit(EngineEvent::ItemStarted {
                position: index + 1,
                total: items.len(),
                item: item.clone(),
            });
            engine_info!(
                "[{}/{}] {} ({})",
                index + 1,
                items.len(),
                item.id,
                item.label()
            );

            let item_report = self.run_item(item, sink).await;
            report.summary.record(item_report.outcome);
            sink.emit(EngineEvent::ItemFinished(item_report.clone()));
            report.items.push(item_report);
        }

        let summary = report.summary;
        engine_info!(
            "Batch finished: {} succeeded ({} already present), {} failed",
            summary.succeeded,
            summary.skipped,
            summary.failed
        );
        Ok(report)
    }

    async fn run_item(&self, item: &WorkItem, sink: &dyn ProgressSink) -> ItemReport {
        let paths = self.config.layout.paths_for(item);
        let mut tracker = StageTracker::new(&item.id, sink);

        match self.process(item, &paths, &mut tracker).await {
            Ok(outcome) => ItemReport {
                item: item.clone(),
                outcome,
                failure: None,
            },
            Err(err) => {
                engine_error!("{} ({}) failed: {}", item.id, item.label(), err);
                discard(&item.id, &paths.temporaries());
                tracker.fail();
                ItemReport {
                    item: item.clone(),
                    outcome: ItemOutcome::Failed,
                    failure: Some(ItemFailure::from(&err)),
                }
            }
        }
    }

    async fn process(
        &self,
        item: &WorkItem,
        paths: &ArtifactPaths,
        tracker: &mut StageTracker<'_>,
    ) -> Result<ItemOutcome, ItemError> {
        if paths.output.exists() {
            engine_info!("{}: {:?} already present, skipping", item.id, paths.output);
            tracker.enter(Stage::Done);
            return Ok(ItemOutcome::AlreadyPresent);
        }

        let page_url = self.config.page_url(&item.id);
        tracker.enter(Stage::FetchingPage);
        let markup = self.fetcher.fetch_page(&page_url).await?;

        tracker.enter(Stage::Extracting);
        let info = self.extractor.extract(&item.id, &markup)?;

        tracker.enter(Stage::Selecting);
        let streams = select_streams(&item.id, &info)?;
        engine_debug!(
            "{}: video {} audio {}",
            item.id,
            streams.video_url,
            streams.audio_url
        );

        let downloads = [
            (StreamKind::Video, streams.video_url, &paths.temp_video),
            (StreamKind::Audio, streams.audio_url, &paths.temp_audio),
        ];
        for (stream, url, destination) in downloads {
            tracker.enter(match stream {
                StreamKind::Video => Stage::FetchingVideo,
                StreamKind::Audio => Stage::FetchingAudio,
            });
            let target = FetchTarget {
                url,
                destination: destination.clone(),
            };
            let observer = StreamProgress {
                sink: tracker.sink,
                item_id: &item.id,
                stream,
            };
            let bytes = self.fetcher.download(&target, &page_url, &observer).await?;
            engine_debug!("{}: {} stream saved, {} bytes", item.id, stream, bytes);
        }

        tracker.enter(Stage::Merging);
        let merged = self
            .muxer
            .mux(&paths.temp_video, &paths.temp_audio, &paths.staging)
            .await;

        tracker.enter(Stage::CleaningUp);
        discard(
            &item.id,
            &[paths.temp_video.as_path(), paths.temp_audio.as_path()],
        );
        merged.map_err(|err| ItemError::MergeFailure {
            id: item.id.clone(),
            reason: err.to_string(),
        })?;
        persist::promote(&paths.staging, &paths.output)?;

        tracker.enter(Stage::Done);
        engine_info!("{}: saved {:?}", item.id, paths.output);
        Ok(ItemOutcome::Merged)
    }
}

/// Best-effort removal; failures are logged, never propagated.
fn discard(item_id: &str, paths: &[&Path]) {
    for path in paths {
        match persist::remove_if_present(path) {
            Ok(true) => engine_debug!("{}: removed {:?}", item_id, path),
            Ok(false) => {}
            Err(err) => engine_warn!("{}: could not remove {:?}: {}", item_id, path, err),
        }
    }
}

struct StageTracker<'a> {
    item_id: &'a str,
    state: ItemState,
    sink: &'a dyn ProgressSink,
}

impl<'a> StageTracker<'a> {
    fn new(item_id: &'a str, sink: &'a dyn ProgressSink) -> Self {
        Self {
            item_id,
            state: ItemState::new(),
            sink,
        }
    }

    fn enter(&mut self, stage: Stage) {
        if let Err(err) = self.state.advance(stage) {
            engine_warn!("{}: {}", self.item_id, err);
            return;
        }
        engine_debug!("{}: entering {:?}", self.item_id, stage);
        self.emit_stage();
    }

    fn fail(&mut self) {
        self.state.fail();
        self.emit_stage();
    }

    fn emit_stage(&self) {
        self.sink.emit(EngineEvent::StageChanged {
            item_id: self.item_id.to_string(),
            stage: self.state.stage(),
        });
    }
}

struct StreamProgress<'a> {
    sink: &'a dyn ProgressSink,
    item_id: &'a str,
    stream: StreamKind,
}

impl ProgressObserver for StreamProgress<'_> {
    fn on_progress(&self, bytes: u64, total: Option<u64>) {
        self.sink.emit(EngineEvent::Progress(DownloadProgress {
            item_id: self.item_id.to_string(),
            stream: self.stream,
            bytes,
            total,
        }));
    }
}
