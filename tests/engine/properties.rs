//! Property-based tests for engine invariants.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::common::*;
use draftrun_engine::{diff, has_changed, merge, RunResolver};

const KEYS: [&str; 5] = [
    "dragenGermlineDir",
    "dragenSomaticDir",
    "oncoanalyserDnaDir",
    "refDataPath",
    "groupId",
];

fn arb_status() -> impl Strategy<Value = RunStatus> {
    prop::sample::select(vec![
        RunStatus::Draft,
        RunStatus::Ready,
        RunStatus::Running,
        RunStatus::Succeeded,
        RunStatus::Failed,
    ])
}

/// Absent, explicit null, or a string value for one key.
fn arb_slot() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        "s3://[a-z]{1,6}/".prop_map(|s| Some(Value::String(s))),
    ]
}

fn arb_map() -> impl Strategy<Value = ValueMap> {
    prop::collection::vec(arb_slot(), KEYS.len()).prop_map(|slots| {
        KEYS.iter()
            .zip(slots)
            .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
            .collect()
    })
}

fn arb_payload() -> impl Strategy<Value = Payload> {
    arb_map().prop_map(|inputs| {
        let mut payload = Payload::new(PAYLOAD_VERSION);
        payload.data.inputs = inputs;
        payload
    })
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        Just(Value::Float(f64::NAN)),
        "[a-z0-9/:]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(Value::Object),
        ]
    })
}

/// Candidate runs with distinct numeric ids and random workflow/status.
fn arb_runs() -> impl Strategy<Value = Vec<WorkflowRun>> {
    prop::collection::hash_set(1u32..100_000, 0..12).prop_flat_map(|ids| {
        let ids: Vec<u32> = ids.into_iter().collect();
        let n = ids.len();
        (
            Just(ids),
            prop::collection::vec(prop::sample::select(vec!["sash", "dragen-wgts-dna"]), n),
            prop::collection::vec(prop::sample::select(vec!["0.6.2", "0.6.3"]), n),
            prop::collection::vec(arb_status(), n),
        )
            .prop_map(|(ids, names, versions, statuses)| {
                ids.into_iter()
                    .zip(names)
                    .zip(versions)
                    .zip(statuses)
                    .map(|(((id, name), version), status)| {
                        let mut r = run(&id.to_string(), name, version, status, &["L1"]);
                        r.analysis_run_id = Some("ana.1".to_string());
                        r
                    })
                    .collect()
            })
    })
}

proptest! {
    #[test]
    fn missing_candidate_source_is_invalid_criteria(
        name in "[a-z]{1,8}",
        version in proptest::option::of("[0-9]\\.[0-9]"),
        status in proptest::option::of(arb_status()),
    ) {
        let store = InMemoryRunStore::new();
        let criteria = SelectionCriteria {
            workflow_name: name,
            workflow_version: version,
            status,
            analysis_run_id: None,
            library_ids: None,
        };
        let result = RunResolver::new(&store).resolve(&criteria);
        prop_assert!(matches!(result, Err(Error::InvalidCriteria(_))));
    }

    #[test]
    fn resolver_returns_greatest_surviving_id(
        runs in arb_runs(),
        version in proptest::option::of(prop::sample::select(vec!["0.6.2", "0.6.3"])),
        status in proptest::option::of(arb_status()),
    ) {
        let store = InMemoryRunStore::new();
        for r in &runs {
            store.insert_run(r.clone());
        }
        let mut criteria = SelectionCriteria::for_workflow("sash").with_analysis_run("ana.1");
        criteria.workflow_version = version.map(str::to_string);
        criteria.status = status;

        let expected = runs
            .iter()
            .filter(|r| r.workflow.name == "sash")
            .filter(|r| version.map_or(true, |v| r.workflow.version == v))
            .filter(|r| status.map_or(true, |s| r.status() == s))
            .map(|r| r.orcabus_id.as_str().parse::<u32>().unwrap())
            .max();

        let found = RunResolver::new(&store).resolve(&criteria).unwrap();
        prop_assert_eq!(
            found.map(|r| r.orcabus_id.as_str().parse::<u32>().unwrap()),
            expected
        );
    }

    #[test]
    fn merge_is_idempotent(target in arb_payload(), facts in arb_map()) {
        let policy = MergePolicy::sash();
        let once = merge(&target, &facts, &policy);
        let twice = merge(&once, &facts, &policy);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_never_overwrites_present_inputs(target in arb_payload(), facts in arb_map()) {
        let merged = merge(&target, &facts, &MergePolicy::sash());
        for key in KEYS {
            if let Some(value) = target.input(key) {
                prop_assert_eq!(merged.input(key), Some(value));
            }
        }
        prop_assert_eq!(&merged.version, &target.version);
    }

    #[test]
    fn merge_writes_groups_whole(target in arb_payload(), facts in arb_map()) {
        let merged = merge(&target, &facts, &MergePolicy::sash());
        let pair = ["dragenGermlineDir", "dragenSomaticDir"];
        let newly: Vec<bool> = pair
            .iter()
            .map(|k| !target.has_input(k) && merged.has_input(k))
            .collect();
        prop_assert!(newly[0] == newly[1], "dragen pair written partially");
    }

    #[test]
    fn change_detector_is_reflexive(v in arb_value()) {
        prop_assert!(!has_changed(&v, &v.clone()));
        prop_assert!(diff(&v, &v).is_empty());
    }

    #[test]
    fn change_detector_ignores_map_insertion_order(
        pairs in prop::collection::vec(("[a-z]{1,4}", arb_value()), 0..6)
    ) {
        let mut seen = HashSet::new();
        let unique: Vec<(String, Value)> = pairs
            .into_iter()
            .filter(|(k, _)| seen.insert(k.clone()))
            .collect();
        let forward: ValueMap = unique.iter().cloned().collect();
        let backward: ValueMap = unique.iter().rev().cloned().collect();
        prop_assert!(!has_changed(&Value::Object(forward), &Value::Object(backward)));
    }

    #[test]
    fn change_detector_respects_sequence_order(a in arb_value(), b in arb_value()) {
        prop_assume!(has_changed(&a, &b));
        let ab = Value::Array(vec![a.clone(), b.clone()]);
        let ba = Value::Array(vec![b, a]);
        prop_assert!(has_changed(&ab, &ba));
    }

    #[test]
    fn diff_is_empty_exactly_when_unchanged(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(diff(&a, &b).is_empty(), !has_changed(&a, &b));
    }
}
