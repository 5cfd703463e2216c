//! A draft sash run driven from first upstream completion to engine success,
//! using commands in their JSON wire form.

use draftrun::{Command, Output, Reconciliation, RunStatus};
use serde_json::json;

use crate::executor;

fn command(value: serde_json::Value) -> Command {
    serde_json::from_value(value).unwrap()
}

fn facts_of(output: Output) -> serde_json::Value {
    match output {
        Output::Facts(facts) => serde_json::to_value(facts).unwrap(),
        other => panic!("unexpected output {:?}", other),
    }
}

#[test]
fn draft_run_from_upstream_facts_to_success() {
    let (executor, sink) = executor();

    let tumor = facts_of(
        executor
            .execute(command(json!({
                "UpstreamOutputDir": {"portal_run_id": "20250805dragen01", "kind": "dragenTumor"}
            })))
            .unwrap(),
    );
    let normal = facts_of(
        executor
            .execute(command(json!({
                "UpstreamOutputDir": {"portal_run_id": "20250805dragen01", "kind": "dragenNormal"}
            })))
            .unwrap(),
    );
    let onco = facts_of(
        executor
            .execute(command(json!({
                "UpstreamOutputDir": {"portal_run_id": "20250805onco01", "kind": "oncoanalyser"}
            })))
            .unwrap(),
    );

    let criteria = json!({
        "workflowName": "sash",
        "status": "DRAFT",
        "libraryIds": ["L2300950", "L2300943"]
    });

    // Only the somatic half of the DRAGEN pair: nothing is written
    let out = executor
        .execute(command(json!({
            "ReconcileUpstream": {"criteria": criteria, "facts": tumor}
        })))
        .unwrap();
    assert!(matches!(out, Output::Reconciled(Reconciliation::Unchanged { .. })));

    let mut dragen = tumor.as_object().unwrap().clone();
    dragen.extend(normal.as_object().unwrap().clone());
    let out = executor
        .execute(command(json!({
            "ReconcileUpstream": {"criteria": criteria, "facts": dragen}
        })))
        .unwrap();
    assert!(matches!(out, Output::Reconciled(Reconciliation::Updated { .. })));

    let out = executor
        .execute(command(json!({
            "ReconcileUpstream": {"criteria": criteria, "facts": onco}
        })))
        .unwrap();
    match out {
        Output::Reconciled(Reconciliation::Updated { event, .. }) => {
            assert_eq!(event.status, RunStatus::Draft);
            let inputs = serde_json::to_value(&event.payload.data.inputs).unwrap();
            assert_eq!(
                inputs,
                json!({
                    "groupId": "SBJ05828",
                    "subjectId": "SBJ05828",
                    "dragenSomaticDir": "s3://data/analysis/dragen/20250805dragen01/",
                    "dragenGermlineDir": "s3://data/analysis/dragen/20250805dragen01/germline/",
                    "oncoanalyserDnaDir": "s3://data/analysis/onco/20250805onco01/out/"
                })
            );
        }
        other => panic!("unexpected output {:?}", other),
    }

    let out = executor
        .execute(command(json!({
            "ProjectEngineEvent": {"portal_run_id": "20250805sash0030", "status": "SUCCEEDED"}
        })))
        .unwrap();
    let event = match out {
        Output::Event(event) => serde_json::to_value(*event).unwrap(),
        other => panic!("unexpected output {:?}", other),
    };
    assert_eq!(event["status"], "SUCCEEDED");
    assert_eq!(event["portalRunId"], "20250805sash0030");
    assert_eq!(event["payload"]["data"]["outputs"], json!({"sashRelPath": "SBJ05828/"}));
    assert!(event["payload"].get("orcabusId").is_none());

    let published: Vec<String> = sink
        .take()
        .iter()
        .map(|e| e.detail_type.to_string())
        .collect();
    assert_eq!(
        published,
        ["WorkflowRunUpdate", "WorkflowRunUpdate", "WorkflowRunStateChange"]
    );
}
