/// How an item left the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Streams were fetched and merged into a new output file.
    Merged,
    /// The output file already existed; nothing was fetched.
    AlreadyPresent,
    Failed,
}

impl ItemOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, ItemOutcome::Failed)
    }
}

/// Aggregate counts for one batch run. `succeeded` includes `skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Merged => self.succeeded += 1,
            ItemOutcome::AlreadyPresent => {
                self.succeeded += 1;
                self.skipped += 1;
            }
            ItemOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}
