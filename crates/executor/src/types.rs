//! Serializable result records returned inside [`Output`](crate::Output).

use draftrun_core::{Payload, StateChangeEvent, WorkflowRun};
use draftrun_engine::{Difference, MergeReport, ReconcileOutcome, SkippedGroup};
use serde::{Deserialize, Serialize};

/// Outcome of a merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    /// Merged payload
    pub payload: Payload,
    /// Groups written
    pub applied: Vec<String>,
    /// Groups left alone and why
    pub skipped: Vec<SkippedGroup>,
}

impl From<MergeReport> for MergeResult {
    fn from(report: MergeReport) -> Self {
        MergeResult {
            payload: report.payload,
            applied: report.applied,
            skipped: report.skipped,
        }
    }
}

/// Outcome of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Whether anything differs
    pub has_changed: bool,
    /// Every difference found
    pub differences: Vec<Difference>,
}

/// Outcome of an upstream reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Reconciliation {
    /// No matching draft run
    NoDraftRun,
    /// Merge added nothing
    Unchanged {
        /// The resolved run
        run: Box<WorkflowRun>,
    },
    /// Payload changed; `event` was published
    Updated {
        /// The resolved run
        run: Box<WorkflowRun>,
        /// The published update
        event: Box<StateChangeEvent>,
    },
    /// Payload committed but `event` could not be published; send it with
    /// `PublishUpdate`
    Unpublished {
        /// The resolved run
        run: Box<WorkflowRun>,
        /// The pending update
        event: Box<StateChangeEvent>,
        /// Why publishing failed
        reason: String,
    },
}

impl From<ReconcileOutcome> for Reconciliation {
    fn from(outcome: ReconcileOutcome) -> Self {
        match outcome {
            ReconcileOutcome::NoDraftRun => Reconciliation::NoDraftRun,
            ReconcileOutcome::Unchanged { run } => Reconciliation::Unchanged { run: Box::new(run) },
            ReconcileOutcome::Updated { run, event } => Reconciliation::Updated {
                run: Box::new(run),
                event: Box::new(event),
            },
            ReconcileOutcome::Unpublished { run, event, error } => Reconciliation::Unpublished {
                run: Box::new(run),
                event: Box::new(event),
                reason: error.to_string(),
            },
        }
    }
}
