//! Command enum defining all draftrun operations.
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON
//! - **Pure data**: No closures or executable code

use chrono::{DateTime, Utc};
use draftrun_core::{
    LibraryRef, Payload, PortalRunId, RunId, RunStatus, SelectionCriteria, StateChangeEvent,
    Value, ValueMap, WorkflowRun,
};
use draftrun_engine::UpstreamOutput;
use serde::{Deserialize, Serialize};

/// A command is a self-contained, serializable operation.
///
/// # Command Categories
///
/// | Category | Commands |
/// |----------|----------|
/// | Runs | `ResolveRun`, `GetWorkflowRun`, `GetDraftPayload`, `CommitPayload` |
/// | Payloads | `MergePayload`, `ComparePayloads` |
/// | Events | `ProjectEvent`, `ProjectEngineEvent` |
/// | Reconcile | `ReconcileUpstream`, `PublishUpdate` |
/// | Derivations | `UpstreamOutputDir`, `PairLibraries`, `ReadyToEngineInputs` |
///
/// # Example
///
/// ```json
/// {"ResolveRun": {"criteria": {"workflowName": "sash", "libraryIds": ["L2300950"]}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Service ====================
    /// Liveness check.
    /// Returns: `Output::Pong`
    Ping,

    // ==================== Runs ====================
    /// Find the most recent run matching the criteria.
    /// Returns: `Output::MaybeRun`
    ResolveRun { criteria: SelectionCriteria },

    /// Fetch a run by portal run id.
    /// Returns: `Output::Run`
    GetWorkflowRun { portal_run_id: PortalRunId },

    /// Latest payload of a run, store fields stripped.
    /// Returns: `Output::MaybePayload`
    GetDraftPayload { portal_run_id: PortalRunId },

    /// Replace a run's payload if it still equals `expected`.
    /// Returns: `Output::Unit`
    CommitPayload {
        run_id: RunId,
        expected: Payload,
        new: Payload,
    },

    // ==================== Payloads ====================
    /// Merge facts into a payload using the configured groups.
    /// Returns: `Output::Merged`
    MergePayload { target: Payload, facts: ValueMap },

    /// Structural comparison of two values.
    /// Returns: `Output::Comparison`
    ComparePayloads { old: Value, new: Value },

    // ==================== Events ====================
    /// Build a state-change event without publishing it.
    /// Returns: `Output::Event`
    ProjectEvent {
        run: WorkflowRun,
        status: RunStatus,
        payload: Payload,
        /// Projection time; now when omitted
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<Utc>>,
    },

    /// Project an engine-reported status and publish it.
    /// Returns: `Output::Event`
    ProjectEngineEvent {
        portal_run_id: PortalRunId,
        status: RunStatus,
    },

    // ==================== Reconcile ====================
    /// Merge upstream facts into the matching draft run and publish an
    /// update if the payload changed.
    /// Returns: `Output::Reconciled`
    ReconcileUpstream {
        criteria: SelectionCriteria,
        facts: ValueMap,
        /// Libraries carried by the update event instead of the run's own
        #[serde(default, skip_serializing_if = "Option::is_none")]
        libraries: Option<Vec<LibraryRef>>,
    },

    /// Publish an update left pending by an `Unpublished` reconciliation.
    /// Returns: `Output::Unit`
    PublishUpdate { event: StateChangeEvent },

    // ==================== Derivations ====================
    /// Locate an upstream run's output directory as a fact.
    /// Returns: `Output::Facts`
    UpstreamOutputDir {
        portal_run_id: PortalRunId,
        kind: UpstreamOutput,
    },

    /// Split a run's libraries into tumor and normal.
    /// Returns: `Output::Libraries`
    PairLibraries { libraries: Vec<LibraryRef> },

    /// Build execution-engine inputs from ready payload inputs.
    /// Returns: `Output::EngineInputs`
    ReadyToEngineInputs { inputs: ValueMap },
}

impl Command {
    /// Returns the variant name as a static string.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "Ping",
            Command::ResolveRun { .. } => "ResolveRun",
            Command::GetWorkflowRun { .. } => "GetWorkflowRun",
            Command::GetDraftPayload { .. } => "GetDraftPayload",
            Command::CommitPayload { .. } => "CommitPayload",
            Command::MergePayload { .. } => "MergePayload",
            Command::ComparePayloads { .. } => "ComparePayloads",
            Command::ProjectEvent { .. } => "ProjectEvent",
            Command::ProjectEngineEvent { .. } => "ProjectEngineEvent",
            Command::ReconcileUpstream { .. } => "ReconcileUpstream",
            Command::PublishUpdate { .. } => "PublishUpdate",
            Command::UpstreamOutputDir { .. } => "UpstreamOutputDir",
            Command::PairLibraries { .. } => "PairLibraries",
            Command::ReadyToEngineInputs { .. } => "ReadyToEngineInputs",
        }
    }

    /// Whether the command may publish events or write to the store.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::CommitPayload { .. }
                | Command::ProjectEngineEvent { .. }
                | Command::ReconcileUpstream { .. }
                | Command::PublishUpdate { .. }
        )
    }
}
