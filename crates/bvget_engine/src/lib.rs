//! bvget engine: page fetch, payload extraction, stream download and muxing.
mod extract;
mod fetch;
mod mux;
mod persist;
mod pipeline;
mod select;
mod types;

pub use extract::{
    ExtractionStrategy, MarkerSearch, PayloadExtractor, PlayInfo, PositionalScript,
    PLAYINFO_MARKER,
};
pub use fetch::{
    FetchSettings, Fetcher, ProgressObserver, ProgressSink, ReqwestFetcher, DEFAULT_USER_AGENT,
};
pub use mux::{FfmpegMuxer, MuxError, Muxer};
pub use persist::{ensure_output_dir, promote, remove_if_present, PersistError};
pub use pipeline::{BatchReport, BatchRunner, EngineConfig, DEFAULT_PAGE_URL_TEMPLATE};
pub use select::{select_streams, BackupUrls, SelectedStreams, StreamDescriptor};
pub use types::{
    DownloadProgress, EngineEvent, ErrorKind, FailureKind, FetchError, FetchTarget, ItemError,
    ItemFailure, ItemReport, StreamKind,
};
