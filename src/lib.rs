//! draftrun - draft workflow-run resolution and payload merging
//!
//! Keeps the payload of a draft workflow run in step with the upstream runs
//! that feed it, and projects execution-engine state changes into outward
//! events.
//!
//! # Quick Start
//!
//! ```ignore
//! use draftrun::{Command, DraftrunConfig, Executor, Fixture, Services};
//!
//! let (services, sink) = Services::in_memory(DraftrunConfig::default(), Fixture::default())?;
//! let executor = Executor::new(services);
//! let output = executor.execute(Command::Ping)?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which dispatches serializable
//! [`Command`]s to the engine. Resolution, merge, comparison and projection
//! live in `draftrun-engine`; shared types and collaborator traits live in
//! `draftrun-core`.

// Re-export the public API from draftrun-executor
pub use draftrun_executor::*;
