//! Bridge between the executor and the engine.
//!
//! [`Services`] bundles the collaborators and the configuration-derived
//! engine settings every handler needs.

use std::sync::Arc;

use draftrun_core::{EventSink, FileCatalog, MetadataDirectory, PayloadCommitter, RunStore};
use draftrun_engine::{
    DraftrunConfig, EventProjector, Fixture, MergePolicy, Reconciler, RecordingSink,
};

use crate::convert::convert_result;
use crate::Result;

/// Collaborators and settings shared by all handlers
pub struct Services {
    /// Run/payload store
    pub store: Arc<dyn RunStore>,
    /// Compare-and-set persistence, when the store supports it
    pub committer: Option<Arc<dyn PayloadCommitter>>,
    /// Event destination
    pub sink: Arc<dyn EventSink>,
    /// File catalog
    pub files: Arc<dyn FileCatalog>,
    /// Library directory
    pub directory: Arc<dyn MetadataDirectory>,
    /// Loaded configuration
    pub config: DraftrunConfig,
    /// Merge groups from `config`
    pub policy: MergePolicy,
    /// Output rules from `config`
    pub projector: EventProjector,
}

impl Services {
    /// Assemble services, validating `config`.
    pub fn new(
        config: DraftrunConfig,
        store: Arc<dyn RunStore>,
        sink: Arc<dyn EventSink>,
        files: Arc<dyn FileCatalog>,
        directory: Arc<dyn MetadataDirectory>,
    ) -> Result<Self> {
        convert_result(config.validate())?;
        let policy = convert_result(config.merge_policy())?;
        let projector = config.projector();
        Ok(Self {
            store,
            committer: None,
            sink,
            files,
            directory,
            config,
            policy,
            projector,
        })
    }

    /// Attach compare-and-set persistence
    pub fn with_committer(mut self, committer: Arc<dyn PayloadCommitter>) -> Self {
        self.committer = Some(committer);
        self
    }

    /// Services over in-memory collaborators populated from `fixture`.
    ///
    /// The store doubles as the committer. The returned sink records every
    /// published event.
    pub fn in_memory(config: DraftrunConfig, fixture: Fixture) -> Result<(Self, Arc<RecordingSink>)> {
        let (store, files, directory) = fixture.load();
        let store = Arc::new(store);
        let sink = Arc::new(RecordingSink::new());
        let services = Services::new(
            config,
            store.clone(),
            sink.clone(),
            Arc::new(files),
            Arc::new(directory),
        )?
        .with_committer(store);
        Ok((services, sink))
    }

    /// Reconciler borrowing these services
    pub fn reconciler(&self) -> Reconciler<'_> {
        let reconciler = Reconciler::new(
            self.store.as_ref(),
            self.sink.as_ref(),
            &self.policy,
            &self.projector,
            &self.config.event_source,
        );
        match &self.committer {
            Some(committer) => reconciler.with_committer(committer.as_ref()),
            None => reconciler,
        }
    }
}
