//! Collaborator traits
//!
//! The core reaches every external service through these traits so the
//! store, catalog, directory and transport can be swapped without touching
//! the resolution and merge logic.
//!
//! Thread safety: all collaborators must be safe to call concurrently from
//! independent invocations (requires Send + Sync). The core itself holds no
//! state between calls.

use crate::error::Result;
use crate::event::EventEnvelope;
use crate::payload::Payload;
use crate::types::{FileObject, Library, PortalRunId, RunId, WorkflowRun};

/// Read access to the workflow-run/payload store
///
/// # Errors
///
/// Every method may fail with `NotFound` (entity absent) or `Unavailable`
/// (store failure).
pub trait RunStore: Send + Sync {
    /// Get a run by store id
    fn get_run(&self, id: &RunId) -> Result<WorkflowRun>;

    /// Get a run by the identifier carried in events
    fn get_run_by_portal_run_id(&self, portal_run_id: &PortalRunId) -> Result<WorkflowRun>;

    /// All runs linked to an analysis run
    fn get_runs_by_analysis_id(&self, analysis_run_id: &str) -> Result<Vec<WorkflowRun>>;

    /// All runs whose libraries all lie within `library_ids`
    fn get_runs_by_library_ids(&self, library_ids: &[String]) -> Result<Vec<WorkflowRun>>;

    /// Latest payload attached to a run
    fn get_latest_payload(&self, run_id: &RunId) -> Result<Payload>;
}

/// Compare-and-set payload persistence
///
/// Stores that can apply a merge atomically implement this so concurrent
/// upstream completions cannot drop each other's facts.
pub trait PayloadCommitter: Send + Sync {
    /// Replace the run's latest payload with `new` if it still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// `Conflict` when the stored payload no longer equals `expected`;
    /// `NotFound` when the run has no payload.
    fn commit_payload(&self, run_id: &RunId, expected: &Payload, new: Payload) -> Result<()>;
}

/// Downstream event publication
///
/// Delivery semantics (at-least-once) belong to the sink.
pub trait EventSink: Send + Sync {
    /// Publish one event
    fn publish(&self, event: EventEnvelope) -> Result<()>;
}

/// File/object catalog
pub trait FileCatalog: Send + Sync {
    /// Objects written by the given run
    fn list_files(&self, portal_run_id: &PortalRunId) -> Result<Vec<FileObject>>;
}

/// Metadata/library directory
pub trait MetadataDirectory: Send + Sync {
    /// Library record by internal id
    fn get_library(&self, orcabus_id: &str) -> Result<Library>;
}
