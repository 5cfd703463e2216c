//! Core types and traits for draftrun
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: open recursive value type for payload contents
//! - RunId / PortalRunId / WorkflowRun: run records owned by the external store
//! - Payload: versioned input/output data attached to a run
//! - SelectionCriteria: how to find a single run
//! - StateChangeEvent / EventEnvelope: outward notifications
//! - Error: error taxonomy
//! - Traits: collaborator contracts (RunStore, PayloadCommitter, EventSink,
//!   FileCatalog, MetadataDirectory)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod criteria;
pub mod error;
pub mod event;
pub mod payload;
pub mod traits;
pub mod types;
pub mod value;

pub use criteria::{CandidateSource, SelectionCriteria};
pub use error::{Error, Result};
pub use event::{format_event_timestamp, DetailType, EventEnvelope, StateChangeEvent};
pub use payload::{Payload, PayloadData};
pub use traits::{EventSink, FileCatalog, MetadataDirectory, PayloadCommitter, RunStore};
pub use types::{
    FileObject, Library, LibraryRef, Phenotype, PortalRunId, ReadSetRef, RunId, RunState,
    RunStatus, Workflow, WorkflowRun,
};
pub use value::{Value, ValueMap};
