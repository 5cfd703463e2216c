//! Output enum for command execution results.
//!
//! Every command produces exactly one output type. The mapping is documented
//! on each [`Command`](crate::Command) variant.

use draftrun_core::{Payload, StateChangeEvent, ValueMap, WorkflowRun};
use draftrun_engine::{EngineInputs, LibraryPairing};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Successful command execution results.
///
/// # Example
///
/// ```text
/// match executor.execute(Command::GetDraftPayload { portal_run_id })? {
///     Output::MaybePayload(Some(p)) => println!("draft at version {}", p.version),
///     Output::MaybePayload(None) => println!("no draft payload"),
///     _ => unreachable!("GetDraftPayload always returns MaybePayload"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value
    Unit,

    /// Ping response
    Pong {
        /// Crate version
        version: String,
    },

    /// A run
    Run(Box<WorkflowRun>),

    /// A run, if one matched
    MaybeRun(Option<Box<WorkflowRun>>),

    /// A payload, if one exists
    MaybePayload(Option<Payload>),

    /// Merge result
    Merged(MergeResult),

    /// Comparison result
    Comparison(Comparison),

    /// A state-change event
    Event(Box<StateChangeEvent>),

    /// Reconciliation result
    Reconciled(Reconciliation),

    /// Facts keyed by payload input key
    Facts(ValueMap),

    /// Library pairing
    Libraries(LibraryPairing),

    /// Execution-engine inputs
    EngineInputs(EngineInputs),
}
