//! The Executor - single entry point to draftrun.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! handler for their area and returns the handler's output.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bridge::Services;
use crate::handlers;
use crate::{Command, Output, Result};

/// The command executor.
///
/// The Executor is **stateless**: it holds the shared [`Services`] but keeps
/// nothing between calls. All state lives in the collaborators.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use draftrun_executor::{Command, Executor, Services};
///
/// let (services, sink) = Services::in_memory(config, fixture)?;
/// let executor = Executor::new(services);
/// let output = executor.execute(Command::Ping)?;
/// ```
#[derive(Clone)]
pub struct Executor {
    services: Arc<Services>,
}

impl Executor {
    /// Create a new executor over `services`.
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        debug!(target: "draftrun::executor", command = name, "Executing command");
        let result = self.dispatch(cmd);
        if let Err(e) = &result {
            warn!(target: "draftrun::executor", command = name, error = %e, "Command failed");
        }
        result
    }

    fn dispatch(&self, cmd: Command) -> Result<Output> {
        let s = &self.services;
        match cmd {
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),

            // Runs
            Command::ResolveRun { criteria } => handlers::run::resolve_run(s, criteria),
            Command::GetWorkflowRun { portal_run_id } => {
                handlers::run::get_workflow_run(s, portal_run_id)
            }
            Command::GetDraftPayload { portal_run_id } => {
                handlers::run::get_draft_payload(s, portal_run_id)
            }
            Command::CommitPayload {
                run_id,
                expected,
                new,
            } => handlers::run::commit_payload(s, run_id, expected, new),

            // Payloads
            Command::MergePayload { target, facts } => {
                handlers::payload::merge_payload(s, target, facts)
            }
            Command::ComparePayloads { old, new } => handlers::payload::compare_payloads(old, new),

            // Events
            Command::ProjectEvent {
                run,
                status,
                payload,
                at,
            } => handlers::event::project_event(s, run, status, payload, at),
            Command::ProjectEngineEvent {
                portal_run_id,
                status,
            } => handlers::event::project_engine_event(s, portal_run_id, status),

            // Reconcile
            Command::ReconcileUpstream {
                criteria,
                facts,
                libraries,
            } => handlers::reconcile::reconcile_upstream(s, criteria, facts, libraries),
            Command::PublishUpdate { event } => handlers::reconcile::publish_update(s, event),

            // Derivations
            Command::UpstreamOutputDir {
                portal_run_id,
                kind,
            } => handlers::derive::upstream_output_dir(s, portal_run_id, kind),
            Command::PairLibraries { libraries } => handlers::derive::pair(s, libraries),
            Command::ReadyToEngineInputs { inputs } => {
                handlers::derive::ready_to_engine_inputs(s, inputs)
            }
        }
    }

    /// Execute multiple commands sequentially.
    ///
    /// Returns all results in the same order as the input commands.
    /// Execution continues even if some commands fail.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    /// Shared services.
    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }
}
