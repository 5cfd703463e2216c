//! Workflow run types
//!
//! Run records as owned by the external run/payload store. The core only
//! reads these; it never persists them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned run identifier (`orcabusId`)
///
/// Identifiers are globally unique and ordered by creation: a greater id is
/// a more recent run. All-decimal identifiers compare numerically and sort
/// before any non-numeric identifier; non-numeric identifiers (ULID-style,
/// e.g. `wfr.01J9T6AV2XJWBDJ42VAK6RB1XK`) compare lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Wrap an identifier string
    pub fn new(id: impl Into<String>) -> Self {
        RunId(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Significant digits of an all-decimal identifier
    fn digits(&self) -> Option<&str> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(self.0.trim_start_matches('0'))
    }
}

impl Ord for RunId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.digits(), other.digits()) {
            // Numeric order without a width limit: fewer significant digits is smaller
            (Some(a), Some(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for RunId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        RunId(s.to_string())
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        RunId(s)
    }
}

/// Human-facing run identifier carried in events
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortalRunId(String);

impl PortalRunId {
    /// Wrap an identifier string
    pub fn new(id: impl Into<String>) -> Self {
        PortalRunId(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortalRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortalRunId {
    fn from(s: &str) -> Self {
        PortalRunId(s.to_string())
    }
}

/// Workflow identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow name, e.g. `sash`
    pub name: String,
    /// Workflow version, e.g. `0.6.2`
    pub version: String,
}

impl Workflow {
    /// Create a workflow identity
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Workflow {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Workflow run lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Created before all inputs are known
    Draft,
    /// Inputs complete, waiting to launch
    Ready,
    /// Executing
    Running,
    /// Finished successfully
    Succeeded,
    /// Finished with an error
    Failed,
    /// Cancelled
    Aborted,
    /// Manually resolved by an operator
    Resolved,
    /// Superseded
    Deprecated,
}

impl RunStatus {
    /// The success terminal state
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Succeeded)
    }

    /// Whether the run can no longer progress
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Aborted
        )
    }

    /// Get wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Draft => "DRAFT",
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::Aborted => "ABORTED",
            RunStatus::Resolved => "RESOLVED",
            RunStatus::Deprecated => "DEPRECATED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of a run as recorded by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Current status
    pub status: RunStatus,
    /// When the state was recorded, as reported by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Read-set reference attached to a library
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSetRef {
    /// Store identifier of the read set
    pub orcabus_id: String,
    /// Read-group id: `<index>+<index2>.<lane>.<instrument_run_id>`
    pub rgid: String,
}

/// Library linked to a workflow run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRef {
    /// Stable library id, e.g. `L2300950`
    pub library_id: String,
    /// Run-scoped internal id, e.g. `lib.01J9T6AV2XJWBDJ42VAK6RB1XK`
    pub orcabus_id: String,
    /// Associated read sets
    #[serde(default)]
    pub readsets: Vec<ReadSetRef>,
}

impl LibraryRef {
    /// Library reference without read sets
    pub fn new(library_id: impl Into<String>, orcabus_id: impl Into<String>) -> Self {
        LibraryRef {
            library_id: library_id.into(),
            orcabus_id: orcabus_id.into(),
            readsets: Vec::new(),
        }
    }
}

/// A workflow run record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    /// Store identifier, ordered by creation
    pub orcabus_id: RunId,
    /// Identifier carried in events
    pub portal_run_id: PortalRunId,
    /// Human-readable run name
    pub workflow_run_name: String,
    /// Workflow identity
    pub workflow: Workflow,
    /// Current state
    pub current_state: RunState,
    /// Linked libraries
    #[serde(default)]
    pub libraries: Vec<LibraryRef>,
    /// Analysis run this run belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_run_id: Option<String>,
}

impl WorkflowRun {
    /// Current status shortcut
    pub fn status(&self) -> RunStatus {
        self.current_state.status
    }

    /// Whether every linked library id appears in `library_ids`.
    ///
    /// Runs without libraries never qualify.
    pub fn libraries_within(&self, library_ids: &[String]) -> bool {
        !self.libraries.is_empty()
            && self
                .libraries
                .iter()
                .all(|lib| library_ids.iter().any(|id| id == &lib.library_id))
    }
}

/// Library phenotype as recorded by the metadata directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phenotype {
    /// Tumor sample
    Tumor,
    /// Normal (germline) sample
    Normal,
    /// Negative control
    #[serde(rename = "negative-control")]
    NegativeControl,
}

/// Library metadata record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Internal id
    pub orcabus_id: String,
    /// Stable library id
    pub library_id: String,
    /// Phenotype, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phenotype: Option<Phenotype>,
}

/// Object listed by the file catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileObject {
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
}

impl FileObject {
    /// Create a file object reference
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        FileObject {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}
