//! bvget core: pure work-item model, stage machine and artifact naming.
mod naming;
mod state;
mod summary;
mod work_item;

pub use naming::{sanitize_title, ArtifactLayout, ArtifactPaths, MAX_TITLE_CHARS};
pub use state::{ItemState, Stage, TransitionError};
pub use summary::{BatchSummary, ItemOutcome};
pub use work_item::{InvalidId, WorkItem};
