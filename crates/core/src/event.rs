//! Outward-facing state-change events
//!
//! Events are created per emission and never persisted by the core.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::Payload;
use crate::types::{LibraryRef, PortalRunId, RunStatus, Workflow};

/// Format an instant as `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_event_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// New status and payload of a workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangeEvent {
    /// New status
    pub status: RunStatus,
    /// Projection time, UTC, second precision, `Z` suffix
    pub timestamp: String,
    /// Run identifier
    pub portal_run_id: PortalRunId,
    /// Workflow identity, copied from the run record
    pub workflow: Workflow,
    /// Run name, copied from the run record
    pub workflow_run_name: String,
    /// Linked libraries, copied from the run record
    pub libraries: Vec<LibraryRef>,
    /// Payload (store bookkeeping fields stripped)
    pub payload: Payload,
}

/// Event detail type on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailType {
    /// Projection of an engine state change
    WorkflowRunStateChange,
    /// Draft payload updated by a merge
    WorkflowRunUpdate,
}

impl DetailType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailType::WorkflowRunStateChange => "WorkflowRunStateChange",
            DetailType::WorkflowRunUpdate => "WorkflowRunUpdate",
        }
    }
}

impl fmt::Display for DetailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event ready for publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Publishing service, e.g. `orcabus.sash`
    pub source: String,
    /// Detail type
    pub detail_type: DetailType,
    /// Event body
    pub detail: StateChangeEvent,
}
