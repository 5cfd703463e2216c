//! In-memory collaborators
//!
//! Store, sink, file catalog and library directory backed by process memory.
//! They back the CLI's fixture mode and the test suites. All state sits
//! behind `parking_lot` locks so the types are `Send + Sync`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use draftrun_core::{
    Error, EventEnvelope, EventSink, FileCatalog, FileObject, Library, MetadataDirectory, Payload,
    PayloadCommitter, PortalRunId, Result, RunId, RunStore, WorkflowRun,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compare::payload_has_changed;

/// Run and payload store
///
/// Implements the library-set contract of [`RunStore`]: a run qualifies
/// for a library set only when every one of its libraries lies within it.
#[derive(Default)]
pub struct InMemoryRunStore {
    runs: RwLock<BTreeMap<RunId, WorkflowRun>>,
    payloads: RwLock<HashMap<RunId, Payload>>,
    unavailable: AtomicBool,
}

impl InMemoryRunStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a run
    pub fn insert_run(&self, run: WorkflowRun) {
        self.runs.write().insert(run.orcabus_id.clone(), run);
    }

    /// Set the latest payload of a run
    pub fn set_payload(&self, run_id: RunId, payload: Payload) {
        self.payloads.write().insert(run_id, payload);
    }

    /// Make every call fail with `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("run store is unavailable".to_string()));
        }
        Ok(())
    }

    fn collect<F>(&self, keep: F) -> Vec<WorkflowRun>
    where
        F: Fn(&WorkflowRun) -> bool,
    {
        self.runs.read().values().filter(|r| keep(r)).cloned().collect()
    }
}

impl RunStore for InMemoryRunStore {
    fn get_run(&self, id: &RunId) -> Result<WorkflowRun> {
        self.check()?;
        self.runs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("workflow run {}", id)))
    }

    fn get_run_by_portal_run_id(&self, portal_run_id: &PortalRunId) -> Result<WorkflowRun> {
        self.check()?;
        self.collect(|r| &r.portal_run_id == portal_run_id)
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("workflow run with portal run id {}", portal_run_id)))
    }

    fn get_runs_by_analysis_id(&self, analysis_run_id: &str) -> Result<Vec<WorkflowRun>> {
        self.check()?;
        Ok(self.collect(|r| r.analysis_run_id.as_deref() == Some(analysis_run_id)))
    }

    fn get_runs_by_library_ids(&self, library_ids: &[String]) -> Result<Vec<WorkflowRun>> {
        self.check()?;
        Ok(self.collect(|r| r.libraries_within(library_ids)))
    }

    fn get_latest_payload(&self, run_id: &RunId) -> Result<Payload> {
        self.check()?;
        self.payloads
            .read()
            .get(run_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("payload for workflow run {}", run_id)))
    }
}

impl PayloadCommitter for InMemoryRunStore {
    fn commit_payload(&self, run_id: &RunId, expected: &Payload, new: Payload) -> Result<()> {
        self.check()?;
        let mut payloads = self.payloads.write();
        let current = payloads
            .get(run_id)
            .ok_or_else(|| Error::NotFound(format!("payload for workflow run {}", run_id)))?;
        if payload_has_changed(current, expected) {
            return Err(Error::Conflict(format!(
                "payload for workflow run {} changed since it was read",
                run_id
            )));
        }
        debug!(target: "draftrun::reconcile", %run_id, "Payload committed");
        payloads.insert(run_id.clone(), new);
        Ok(())
    }
}

/// Sink recording every published event
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EventEnvelope>>,
    unavailable: AtomicBool,
}

impl RecordingSink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of published events
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.lock().clone()
    }

    /// Drain published events
    pub fn take(&self) -> Vec<EventEnvelope> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Reject every publish with `Unavailable` while set
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: EventEnvelope) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("event bus is unavailable".to_string()));
        }
        self.events.lock().push(event);
        Ok(())
    }
}

/// File catalog keyed by portal run id
#[derive(Default)]
pub struct InMemoryFileCatalog {
    files: RwLock<HashMap<PortalRunId, Vec<FileObject>>>,
}

impl InMemoryFileCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the objects written by a run
    pub fn insert(&self, portal_run_id: PortalRunId, files: Vec<FileObject>) {
        self.files.write().entry(portal_run_id).or_default().extend(files);
    }
}

impl FileCatalog for InMemoryFileCatalog {
    fn list_files(&self, portal_run_id: &PortalRunId) -> Result<Vec<FileObject>> {
        Ok(self
            .files
            .read()
            .get(portal_run_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Library directory keyed by library orcabus id
#[derive(Default)]
pub struct InMemoryDirectory {
    libraries: RwLock<HashMap<String, Library>>,
}

impl InMemoryDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a library record
    pub fn insert(&self, library: Library) {
        self.libraries
            .write()
            .insert(library.orcabus_id.clone(), library);
    }
}

impl MetadataDirectory for InMemoryDirectory {
    fn get_library(&self, orcabus_id: &str) -> Result<Library> {
        self.libraries
            .read()
            .get(orcabus_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("library {}", orcabus_id)))
    }
}

/// Serialized contents for the in-memory collaborators
///
/// ```json
/// {
///   "runs": [ { "orcabusId": "...", ... } ],
///   "payloads": { "<orcabusId>": { "version": "...", "data": { ... } } },
///   "files": { "<portalRunId>": [ { "bucket": "...", "key": "..." } ] },
///   "libraries": [ { "orcabusId": "...", "libraryId": "...", "phenotype": "tumor" } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    /// Workflow runs
    pub runs: Vec<WorkflowRun>,
    /// Latest payload per run id
    pub payloads: BTreeMap<String, Payload>,
    /// Files per portal run id
    pub files: BTreeMap<String, Vec<FileObject>>,
    /// Library records
    pub libraries: Vec<Library>,
}

impl Fixture {
    /// Parse a fixture from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Populate fresh in-memory collaborators
    pub fn load(self) -> (InMemoryRunStore, InMemoryFileCatalog, InMemoryDirectory) {
        let store = InMemoryRunStore::new();
        for run in self.runs {
            store.insert_run(run);
        }
        for (id, payload) in self.payloads {
            store.set_payload(RunId::new(id), payload);
        }
        let files = InMemoryFileCatalog::new();
        for (id, objects) in self.files {
            files.insert(PortalRunId::new(id), objects);
        }
        let directory = InMemoryDirectory::new();
        for library in self.libraries {
            directory.insert(library);
        }
        (store, files, directory)
    }
}
