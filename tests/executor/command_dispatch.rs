//! Every command dispatched against the in-memory fixture.

use chrono::{TimeZone, Utc};
use draftrun::{
    Command, LibraryRef, Output, Payload, PortalRunId, Reconciliation, RunId, RunStatus,
    SelectionCriteria, UpstreamOutput, Value, ValueMap,
};
use serde_json::json;

use crate::common::facts;
use crate::executor;

fn sash_criteria() -> SelectionCriteria {
    SelectionCriteria::for_workflow("sash").with_libraries(["L2300950", "L2300943"])
}

fn stored_payload() -> Payload {
    let mut payload = Payload::new("2025.08.05")
        .with_input("groupId", "SBJ05828")
        .with_input("subjectId", "SBJ05828");
    payload.orcabus_id = Some("pld.1".to_string());
    payload.payload_ref_id = Some("ref.1".to_string());
    payload
}

#[test]
fn ping_reports_version() {
    let (executor, _) = executor();
    match executor.execute(Command::Ping).unwrap() {
        Output::Pong { version } => assert!(!version.is_empty()),
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn resolve_run_finds_draft_by_library_set() {
    let (executor, _) = executor();
    let output = executor
        .execute(Command::ResolveRun {
            criteria: sash_criteria().with_status(RunStatus::Draft),
        })
        .unwrap();
    match output {
        Output::MaybeRun(Some(run)) => assert_eq!(run.orcabus_id, RunId::new("wfr.30")),
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn resolve_run_without_match_is_none() {
    let (executor, _) = executor();
    let output = executor
        .execute(Command::ResolveRun {
            criteria: sash_criteria().with_status(RunStatus::Running),
        })
        .unwrap();
    assert_eq!(output, Output::MaybeRun(None));
}

#[test]
fn get_workflow_run_by_portal_run_id() {
    let (executor, _) = executor();
    let output = executor
        .execute(Command::GetWorkflowRun {
            portal_run_id: PortalRunId::new("20250805dragen01"),
        })
        .unwrap();
    match output {
        Output::Run(run) => {
            assert_eq!(run.workflow.name, "dragen-wgts-dna");
            assert_eq!(run.status(), RunStatus::Succeeded);
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn draft_payload_is_stripped_of_store_fields() {
    let (executor, _) = executor();
    let output = executor
        .execute(Command::GetDraftPayload {
            portal_run_id: PortalRunId::new("20250805sash0030"),
        })
        .unwrap();
    match output {
        Output::MaybePayload(Some(payload)) => {
            assert!(payload.orcabus_id.is_none());
            assert!(payload.payload_ref_id.is_none());
            assert_eq!(payload.input("groupId"), Some(&Value::from("SBJ05828")));
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn draft_payload_of_run_without_payload_is_none() {
    let (executor, _) = executor();
    let output = executor
        .execute(Command::GetDraftPayload {
            portal_run_id: PortalRunId::new("20250805dragen01"),
        })
        .unwrap();
    assert_eq!(output, Output::MaybePayload(None));
}

#[test]
fn commit_payload_replaces_matching_payload() {
    let (executor, _) = executor();
    let new = stored_payload().with_input("refDataPath", "s3://ref/");
    executor
        .execute(Command::CommitPayload {
            run_id: RunId::new("wfr.30"),
            expected: stored_payload(),
            new,
        })
        .unwrap();

    let output = executor
        .execute(Command::GetDraftPayload {
            portal_run_id: PortalRunId::new("20250805sash0030"),
        })
        .unwrap();
    match output {
        Output::MaybePayload(Some(payload)) => assert!(payload.has_input("refDataPath")),
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn merge_payload_reports_groups() {
    let (executor, _) = executor();
    let target = Payload::new("2025.08.05").with_input("dragenSomaticDir", "s3://s/");
    let f = facts(&[
        ("dragenGermlineDir", "s3://g/"),
        ("dragenSomaticDir", "s3://s2/"),
        ("oncoanalyserDnaDir", "s3://o/"),
    ]);
    let output = executor
        .execute(Command::MergePayload { target, facts: f })
        .unwrap();
    match output {
        Output::Merged(result) => {
            assert_eq!(result.applied, vec!["oncoanalyser".to_string()]);
            assert_eq!(result.skipped.len(), 1);
            assert_eq!(result.skipped[0].group, "dragen");
            assert!(!result.payload.has_input("dragenGermlineDir"));
            assert_eq!(
                result.payload.input("dragenSomaticDir"),
                Some(&Value::from("s3://s/"))
            );
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn compare_payloads_lists_differences() {
    let (executor, _) = executor();
    let old: Value = serde_json::from_value(json!({"data": {"inputs": {"a": 1}}})).unwrap();
    let new: Value = serde_json::from_value(json!({"data": {"inputs": {"a": 1, "b": 2}}})).unwrap();

    match executor
        .execute(Command::ComparePayloads {
            old: old.clone(),
            new: old.clone(),
        })
        .unwrap()
    {
        Output::Comparison(c) => {
            assert!(!c.has_changed);
            assert!(c.differences.is_empty());
        }
        other => panic!("unexpected output {:?}", other),
    }

    match executor
        .execute(Command::ComparePayloads { old, new })
        .unwrap()
    {
        Output::Comparison(c) => {
            assert!(c.has_changed);
            assert_eq!(c.differences.len(), 1);
            assert_eq!(c.differences[0].path, "data.inputs.b");
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn project_event_does_not_publish() {
    let (executor, sink) = executor();
    let run = match executor
        .execute(Command::GetWorkflowRun {
            portal_run_id: PortalRunId::new("20250805sash0030"),
        })
        .unwrap()
    {
        Output::Run(run) => *run,
        other => panic!("unexpected output {:?}", other),
    };
    let output = executor
        .execute(Command::ProjectEvent {
            run,
            status: RunStatus::Succeeded,
            payload: stored_payload(),
            at: Some(Utc.with_ymd_and_hms(2025, 8, 5, 9, 30, 15).unwrap()),
        })
        .unwrap();
    match output {
        Output::Event(event) => {
            assert_eq!(event.timestamp, "2025-08-05T09:30:15Z");
            assert!(event.payload.orcabus_id.is_none());
            assert_eq!(
                event.payload.data.outputs.as_ref().and_then(|o| o.get("sashRelPath")),
                Some(&Value::from("SBJ05828/"))
            );
        }
        other => panic!("unexpected output {:?}", other),
    }
    assert!(sink.events().is_empty());
}

#[test]
fn project_engine_event_publishes_state_change() {
    let (executor, sink) = executor();
    let output = executor
        .execute(Command::ProjectEngineEvent {
            portal_run_id: PortalRunId::new("20250805sash0030"),
            status: RunStatus::Failed,
        })
        .unwrap();
    match output {
        Output::Event(event) => {
            assert_eq!(event.status, RunStatus::Failed);
            assert!(event.payload.data.outputs.is_none());
        }
        other => panic!("unexpected output {:?}", other),
    }
    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].detail_type.as_str(), "WorkflowRunStateChange");
}

#[test]
fn reconcile_without_draft_run_publishes_nothing() {
    let (executor, sink) = executor();
    let output = executor
        .execute(Command::ReconcileUpstream {
            criteria: SelectionCriteria::for_workflow("sash").with_libraries(["L9999999"]),
            facts: facts(&[("oncoanalyserDnaDir", "s3://o/")]),
            libraries: None,
        })
        .unwrap();
    assert_eq!(output, Output::Reconciled(Reconciliation::NoDraftRun));
    assert!(sink.events().is_empty());
}

#[test]
fn reconcile_with_libraries_overrides_event_libraries() {
    let (executor, sink) = executor();
    let libraries = vec![LibraryRef::new("L2300950", "lib.T")];
    let output = executor
        .execute(Command::ReconcileUpstream {
            criteria: sash_criteria(),
            facts: facts(&[("oncoanalyserDnaDir", "s3://o/")]),
            libraries: Some(libraries.clone()),
        })
        .unwrap();
    match output {
        Output::Reconciled(Reconciliation::Updated { run, event }) => {
            assert_eq!(event.libraries, libraries);
            assert_eq!(run.libraries.len(), 2);
        }
        other => panic!("unexpected output {:?}", other),
    }
    assert_eq!(sink.take()[0].detail.libraries, libraries);
}

#[test]
fn blank_workflow_name_selects_configured_workflow() {
    let (executor, _) = executor();
    let output = executor
        .execute(Command::ResolveRun {
            criteria: SelectionCriteria::for_workflow(" ")
                .with_libraries(["L2300950", "L2300943"])
                .with_status(RunStatus::Draft),
        })
        .unwrap();
    match output {
        Output::MaybeRun(Some(run)) => assert_eq!(run.workflow.name, "sash"),
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn upstream_output_dir_for_each_kind() {
    let (executor, _) = executor();
    let cases = [
        (
            "20250805dragen01",
            UpstreamOutput::DragenTumor,
            "dragenSomaticDir",
            "s3://data/analysis/dragen/20250805dragen01/",
        ),
        (
            "20250805dragen01",
            UpstreamOutput::DragenNormal,
            "dragenGermlineDir",
            "s3://data/analysis/dragen/20250805dragen01/germline/",
        ),
        (
            "20250805onco01",
            UpstreamOutput::Oncoanalyser,
            "oncoanalyserDnaDir",
            "s3://data/analysis/onco/20250805onco01/out/",
        ),
    ];
    for (portal_run_id, kind, key, uri) in cases {
        let output = executor
            .execute(Command::UpstreamOutputDir {
                portal_run_id: PortalRunId::new(portal_run_id),
                kind,
            })
            .unwrap();
        let mut expected = ValueMap::new();
        expected.insert(key.to_string(), Value::from(uri));
        assert_eq!(output, Output::Facts(expected), "{:?}", kind);
    }
}

#[test]
fn pair_libraries_uses_phenotypes() {
    let (executor, _) = executor();
    let run = match executor
        .execute(Command::GetWorkflowRun {
            portal_run_id: PortalRunId::new("20250805sash0030"),
        })
        .unwrap()
    {
        Output::Run(run) => run,
        other => panic!("unexpected output {:?}", other),
    };
    match executor
        .execute(Command::PairLibraries {
            libraries: run.libraries.clone(),
        })
        .unwrap()
    {
        Output::Libraries(pairing) => {
            assert_eq!(pairing.library_id, "L2300943");
            assert_eq!(pairing.tumor_library_id.as_deref(), Some("L2300950"));
        }
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn ready_inputs_use_configured_monochrome_default() {
    let (executor, _) = executor();
    let inputs = facts(&[
        ("groupId", "SBJ05828"),
        ("subjectId", "SBJ05828"),
        ("tumorDnaSampleId", "L2300950"),
        ("normalDnaSampleId", "L2300943"),
        ("dragenSomaticDir", "s3://s/"),
        ("dragenGermlineDir", "s3://g/"),
        ("oncoanalyserDnaDir", "s3://o/"),
        ("refDataPath", "s3://ref/"),
    ]);
    match executor
        .execute(Command::ReadyToEngineInputs { inputs })
        .unwrap()
    {
        Output::EngineInputs(engine) => {
            assert!(engine.monochrome_logs);
            assert_eq!(engine.samplesheet.len(), 3);
            assert_eq!(engine.ref_data_path, "s3://ref/");
        }
        other => panic!("unexpected output {:?}", other),
    }
}
