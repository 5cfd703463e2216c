//! Draft payload engine
//!
//! This crate holds the logic that keeps a draft workflow run's payload in
//! step with its upstream runs:
//! - Resolver: find the latest run matching selection criteria
//! - Merge: fold upstream facts into a payload, group by group
//! - Compare: structural change detection
//! - Projector: build outward state-change events
//! - Reconcile: the upstream and engine-event flows end to end
//! - Upstream / libraries / engine_inputs: fact derivations around the flows
//! - Config: `draftrun.toml`
//! - Memory: in-memory collaborators for fixtures and tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod config;
pub mod engine_inputs;
pub mod libraries;
pub mod memory;
pub mod merge;
pub mod projector;
pub mod reconcile;
pub mod resolver;
pub mod upstream;

pub use compare::{diff, has_changed, payload_has_changed, Difference, DifferenceKind};
pub use config::{DraftrunConfig, CONFIG_FILE_NAME};
pub use engine_inputs::{engine_inputs_from_ready, EngineInputs, SamplesheetRow};
pub use libraries::{pair_libraries, LibraryPairing};
pub use memory::{Fixture, InMemoryDirectory, InMemoryFileCatalog, InMemoryRunStore, RecordingSink};
pub use merge::{merge, merge_with_report, FactGroup, MergePolicy, MergeReport, SkipReason, SkippedGroup};
pub use projector::{EventProjector, OutputRule};
pub use reconcile::{fetch_draft_payload, ReconcileOutcome, Reconciler};
pub use resolver::{select_latest, RunResolver};
pub use upstream::{object_dir_uri, output_dir, output_dir_fact, UpstreamOutput};
