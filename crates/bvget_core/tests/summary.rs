use bvget_core::{BatchSummary, ItemOutcome};
use pretty_assertions::assert_eq;

#[test]
fn skipped_items_count_as_successes() {
    let mut summary = BatchSummary::default();
    summary.record(ItemOutcome::Merged);
    summary.record(ItemOutcome::AlreadyPresent);
    summary.record(ItemOutcome::Failed);

    assert_eq!(
        summary,
        BatchSummary {
            succeeded: 2,
            failed: 1,
            skipped: 1,
        }
    );
    assert_eq!(summary.total(), 3);
}

#[test]
fn outcome_success_flags() {
    assert!(ItemOutcome::Merged.is_success());
    assert!(ItemOutcome::AlreadyPresent.is_success());
    assert!(!ItemOutcome::Failed.is_success());
}
