//! Command handlers organized by area.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `run` | ResolveRun, GetWorkflowRun, GetDraftPayload, CommitPayload |
//! | `payload` | MergePayload, ComparePayloads |
//! | `event` | ProjectEvent, ProjectEngineEvent |
//! | `reconcile` | ReconcileUpstream, PublishUpdate |
//! | `derive` | UpstreamOutputDir, PairLibraries, ReadyToEngineInputs |

pub mod derive;
pub mod event;
pub mod payload;
pub mod reconcile;
pub mod run;
