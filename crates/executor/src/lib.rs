//! # draftrun executor
//!
//! The public API for draftrun: keeps a draft workflow run's payload in step
//! with its upstream runs and projects engine state changes into events.
//!
//! It provides:
//! - [`Command`]/[`Output`] - serializable command interface
//! - [`Executor`] - stateless dispatcher over shared [`Services`]
//! - [`Error`] - serializable error type
//!
//! ## Quick Start
//!
//! ```text
//! use draftrun_executor::{Command, Executor, Services};
//!
//! let (services, sink) = Services::in_memory(DraftrunConfig::default(), fixture)?;
//! let executor = Executor::new(services);
//! let output = executor.execute(Command::ReconcileUpstream {
//!     criteria,
//!     facts,
//!     libraries: None,
//! })?;
//! for event in sink.take() {
//!     println!("{}", serde_json::to_string(&event)?);
//! }
//! ```

#![warn(missing_docs)]

pub(crate) mod bridge;
mod command;
mod convert;
mod error;
mod executor;
mod handlers;
mod output;
mod types;


pub use bridge::Services;
pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;
pub use types::{Comparison, MergeResult, Reconciliation};

pub use draftrun_core::{
    EventEnvelope, LibraryRef, Payload, PortalRunId, RunId, RunStatus, SelectionCriteria,
    StateChangeEvent, Value, ValueMap, WorkflowRun,
};
pub use draftrun_engine::{DraftrunConfig, Fixture, RecordingSink, UpstreamOutput};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
