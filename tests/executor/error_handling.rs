//! Error mapping through the command interface.

use std::sync::Arc;

use draftrun::{
    Command, DraftrunConfig, Error, Executor, LibraryRef, Output, Payload, PortalRunId,
    Reconciliation, RunId, SelectionCriteria, Services, UpstreamOutput,
};
use draftrun_engine::{InMemoryDirectory, InMemoryFileCatalog, InMemoryRunStore, RecordingSink};

use crate::common::{facts, sash_fixture};
use crate::executor;

#[test]
fn criteria_without_candidate_source_is_invalid() {
    let (executor, _) = executor();
    let err = executor
        .execute(Command::ResolveRun {
            criteria: SelectionCriteria::for_workflow("sash"),
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCriteria { .. }));
    assert!(!err.is_retryable());
}

#[test]
fn omitted_workflow_name_reconciles_configured_workflow() {
    let (executor, sink) = executor();
    let command: Command = serde_json::from_value(serde_json::json!({
        "ReconcileUpstream": {
            "criteria": {"libraryIds": ["L2300950", "L2300943"], "status": "DRAFT"},
            "facts": {"oncoanalyserDnaDir": "s3://o/"}
        }
    }))
    .unwrap();
    let output = executor.execute(command).unwrap();
    assert!(matches!(
        output,
        Output::Reconciled(Reconciliation::Updated { .. })
    ));
    assert_eq!(sink.take().len(), 1);
}

#[test]
fn bus_outage_after_commit_is_reported_then_republished() {
    let (executor, sink) = executor();
    let reconcile = || Command::ReconcileUpstream {
        criteria: SelectionCriteria::for_workflow("sash").with_libraries(["L2300950", "L2300943"]),
        facts: facts(&[("oncoanalyserDnaDir", "s3://o/")]),
        libraries: None,
    };

    sink.set_unavailable(true);
    let event = match executor.execute(reconcile()).unwrap() {
        Output::Reconciled(Reconciliation::Unpublished { event, reason, .. }) => {
            assert!(reason.contains("unavailable"));
            *event
        }
        other => panic!("unexpected output {:?}", other),
    };
    let err = executor
        .execute(Command::PublishUpdate {
            event: event.clone(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Unavailable { .. }));

    sink.set_unavailable(false);
    assert!(matches!(
        executor.execute(reconcile()).unwrap(),
        Output::Reconciled(Reconciliation::Unchanged { .. })
    ));
    assert_eq!(
        executor
            .execute(Command::PublishUpdate {
                event: event.clone()
            })
            .unwrap(),
        Output::Unit
    );

    let published = sink.take();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].detail, event);
}

#[test]
fn unknown_portal_run_is_not_found() {
    let (executor, sink) = executor();
    let err = executor
        .execute(Command::ProjectEngineEvent {
            portal_run_id: PortalRunId::new("19990101none0000"),
            status: draftrun::RunStatus::Running,
        })
        .unwrap_err();
    match &err {
        Error::NotFound { entity } => assert!(entity.contains("19990101none0000")),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(sink.events().is_empty());
}

#[test]
fn missing_upstream_output_is_not_found() {
    let (executor, _) = executor();
    let err = executor
        .execute(Command::UpstreamOutputDir {
            portal_run_id: PortalRunId::new("20250805dragen01"),
            kind: UpstreamOutput::Oncoanalyser,
        })
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn stale_commit_is_a_retryable_conflict() {
    let (executor, _) = executor();
    let err = executor
        .execute(Command::CommitPayload {
            run_id: RunId::new("wfr.30"),
            expected: Payload::new("2025.08.05"),
            new: Payload::new("2025.08.05").with_input("groupId", "SBJ00001"),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert!(err.is_retryable());
}

#[test]
fn commit_without_committer_is_unsupported() {
    let (store, files, directory) = sash_fixture().load();
    let services = Services::new(
        DraftrunConfig::default(),
        Arc::new(store),
        Arc::new(RecordingSink::new()),
        Arc::new(files),
        Arc::new(directory),
    )
    .unwrap();
    let executor = Executor::new(services);
    let err = executor
        .execute(Command::CommitPayload {
            run_id: RunId::new("wfr.30"),
            expected: Payload::new("2025.08.05"),
            new: Payload::new("2025.08.05"),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}

#[test]
fn unavailable_store_is_retryable() {
    let store = Arc::new(InMemoryRunStore::new());
    store.set_unavailable(true);
    let services = Services::new(
        DraftrunConfig::default(),
        store,
        Arc::new(RecordingSink::new()),
        Arc::new(InMemoryFileCatalog::new()),
        Arc::new(InMemoryDirectory::new()),
    )
    .unwrap();
    let executor = Executor::new(services);
    let err = executor
        .execute(Command::GetWorkflowRun {
            portal_run_id: PortalRunId::new("20250805sash0030"),
        })
        .unwrap_err();
    assert!(matches!(err, Error::Unavailable { .. }));
    assert!(err.is_retryable());
}

#[test]
fn projection_without_group_id_is_invalid_payload() {
    let (executor, _) = executor();
    let run = crate::common::sash_draft("30", &["L1"]);
    let err = executor
        .execute(Command::ProjectEvent {
            run,
            status: draftrun::RunStatus::Succeeded,
            payload: Payload::new("2025.08.05"),
            at: None,
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPayload { .. }));
}

#[test]
fn incomplete_ready_inputs_are_invalid_payload() {
    let (executor, _) = executor();
    let err = executor
        .execute(Command::ReadyToEngineInputs {
            inputs: facts(&[("groupId", "SBJ05828")]),
        })
        .unwrap_err();
    match err {
        Error::InvalidPayload { reason } => assert!(reason.contains("subjectId")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn pairing_without_tumor_is_invalid_input() {
    let (executor, _) = executor();
    let err = executor
        .execute(Command::PairLibraries {
            libraries: vec![
                LibraryRef::new("L2300943", "lib.N"),
                LibraryRef::new("L2300943", "lib.N"),
            ],
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn invalid_config_is_rejected_at_startup() {
    let mut config = DraftrunConfig::default();
    config.workflow_name = String::new();
    let err = Services::in_memory(config, sash_fixture()).err().unwrap();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn errors_serialize_with_reason_fields() {
    let err = Error::Conflict {
        reason: "payload changed".to_string(),
    };
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json, serde_json::json!({"Conflict": {"reason": "payload changed"}}));
    assert_eq!(err.to_string(), "conflict: payload changed");
}
