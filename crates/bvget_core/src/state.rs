use thiserror::Error;

/// Lifecycle of a single work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Pending,
    FetchingPage,
    Extracting,
    Selecting,
    FetchingVideo,
    FetchingAudio,
    Merging,
    CleaningUp,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal stage transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: Stage,
    pub to: Stage,
}

/// Tracks an item through its stages and rejects transitions the pipeline
/// never makes.
///
/// Video and audio may be fetched in either order, but merging requires both.
/// `Failed` is reachable from every non-terminal stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemState {
    stage: Stage,
    video_fetched: bool,
    audio_fetched: bool,
}

impl ItemState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn advance(&mut self, next: Stage) -> Result<(), TransitionError> {
        if !self.allows(next) {
            return Err(TransitionError {
                from: self.stage,
                to: next,
            });
        }
        if next != Stage::Failed {
            match self.stage {
                Stage::FetchingVideo => self.video_fetched = true,
                Stage::FetchingAudio => self.audio_fetched = true,
                _ => {}
            }
        }
        self.stage = next;
        Ok(())
    }

    /// Moves to `Failed`; a no-op once the item is terminal.
    pub fn fail(&mut self) {
        if !self.stage.is_terminal() {
            self.stage = Stage::Failed;
        }
    }

    fn allows(&self, next: Stage) -> bool {
        use Stage::*;
        match (self.stage, next) {
            (from, _) if from.is_terminal() => false,
            (_, Failed) => true,
            (Pending, FetchingPage | Done) => true,
            (FetchingPage, Extracting) => true,
            (Extracting, Selecting) => true,
            (Selecting, FetchingVideo | FetchingAudio) => true,
            (FetchingVideo, FetchingAudio) => !self.audio_fetched,
            (FetchingAudio, FetchingVideo) => !self.video_fetched,
            (FetchingVideo, Merging) => self.audio_fetched,
            (FetchingAudio, Merging) => self.video_fetched,
            (Merging, CleaningUp) => true,
            (CleaningUp, Done) => true,
            _ => false,
        }
    }
}
