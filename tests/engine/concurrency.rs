//! Compare-and-set commits under concurrent upstream merges.

use std::sync::{Arc, Barrier};
use std::thread;

use crate::common::*;
use draftrun_core::{PayloadCommitter, RunStore};
use draftrun_engine::{merge, ReconcileOutcome};

#[test]
fn stale_commit_is_a_conflict() {
    let store = store_with(vec![sash_draft("30", &["L1", "L2"])]);
    let id = RunId::new("30");
    let base = store.get_latest_payload(&id).unwrap();
    let policy = MergePolicy::sash();

    // Two upstream completions read the same base payload
    let with_dragen = merge(&base, &dragen_facts(), &policy);
    let with_onco = merge(&base, &facts(&[("oncoanalyserDnaDir", "s3://onco/")]), &policy);

    store.commit_payload(&id, &base, with_dragen).unwrap();
    let err = store.commit_payload(&id, &base, with_onco).unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert!(err.is_retryable());

    // Re-fetch and re-merge wins
    let fresh = store.get_latest_payload(&id).unwrap();
    let remerged = merge(&fresh, &facts(&[("oncoanalyserDnaDir", "s3://onco/")]), &policy);
    store.commit_payload(&id, &fresh, remerged).unwrap();

    let stored = store.get_latest_payload(&id).unwrap();
    assert!(stored.has_input("dragenGermlineDir"));
    assert!(stored.has_input("dragenSomaticDir"));
    assert!(stored.has_input("oncoanalyserDnaDir"));
}

#[test]
fn concurrent_reconciles_never_lose_facts() {
    let store = Arc::new(store_with(vec![sash_draft("30", &["L1", "L2"])]));
    let sink = Arc::new(RecordingSink::new());
    let barrier = Arc::new(Barrier::new(2));
    let fact_sets = vec![
        dragen_facts(),
        facts(&[("oncoanalyserDnaDir", "s3://bucket/onco/")]),
    ];

    let handles: Vec<_> = fact_sets
        .into_iter()
        .map(|f| {
            let store = Arc::clone(&store);
            let sink = Arc::clone(&sink);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let policy = MergePolicy::sash();
                let projector = EventProjector::default();
                let reconciler = Reconciler::new(
                    store.as_ref(),
                    sink.as_ref(),
                    &policy,
                    &projector,
                    SOURCE,
                )
                .with_committer(store.as_ref());
                let criteria =
                    SelectionCriteria::for_workflow("sash").with_libraries(["L1", "L2"]);
                barrier.wait();
                // Retry on conflict, as a caller would
                loop {
                    match reconciler.reconcile_upstream(&criteria, &f) {
                        Ok(outcome) => return outcome,
                        Err(Error::Conflict(_)) => continue,
                        Err(e) => panic!("unexpected error {}", e),
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Updated { .. }));
    }

    let stored = store.get_latest_payload(&RunId::new("30")).unwrap();
    for key in ["dragenGermlineDir", "dragenSomaticDir", "oncoanalyserDnaDir"] {
        assert!(stored.has_input(key), "{} lost", key);
    }
    assert_eq!(sink.events().len(), 2);
}
