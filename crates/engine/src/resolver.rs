//! Run resolution
//!
//! Finds the single most recent workflow run matching selection criteria.
//! Candidates come from the store, either by analysis run or by library
//! set; filters then narrow by workflow name, version and status, and the
//! greatest run id wins.

use draftrun_core::{CandidateSource, Result, RunStore, SelectionCriteria, WorkflowRun};
use tracing::{debug, info};

/// Resolves criteria against a [`RunStore`]
pub struct RunResolver<'a> {
    store: &'a dyn RunStore,
}

impl<'a> RunResolver<'a> {
    /// Resolver over `store`
    pub fn new(store: &'a dyn RunStore) -> Self {
        RunResolver { store }
    }

    /// Resolve the most recent matching run.
    ///
    /// # Errors
    ///
    /// `InvalidCriteria` when the criteria cannot identify a candidate set;
    /// store errors are passed through. No match is `Ok(None)`.
    pub fn resolve(&self, criteria: &SelectionCriteria) -> Result<Option<WorkflowRun>> {
        let candidates = match criteria.candidate_source()? {
            CandidateSource::AnalysisRun(id) => self.store.get_runs_by_analysis_id(id)?,
            CandidateSource::Libraries(ids) => self.store.get_runs_by_library_ids(ids)?,
        };
        debug!(
            target: "draftrun::resolve",
            workflow = %criteria.workflow_name,
            candidates = candidates.len(),
            "Candidate runs fetched"
        );

        let selected = select_latest(candidates, criteria);
        match &selected {
            Some(run) => info!(
                target: "draftrun::resolve",
                run_id = %run.orcabus_id,
                portal_run_id = %run.portal_run_id,
                "Run resolved"
            ),
            None => info!(
                target: "draftrun::resolve",
                workflow = %criteria.workflow_name,
                "No matching run"
            ),
        }
        Ok(selected)
    }
}

/// Apply the filters of `criteria` and keep the run with the greatest id.
///
/// The candidate source fields of `criteria` are ignored here.
pub fn select_latest(
    candidates: Vec<WorkflowRun>,
    criteria: &SelectionCriteria,
) -> Option<WorkflowRun> {
    candidates
        .into_iter()
        .filter(|run| run.workflow.name == criteria.workflow_name)
        .filter(|run| {
            criteria
                .workflow_version
                .as_ref()
                .map_or(true, |v| &run.workflow.version == v)
        })
        .filter(|run| criteria.status.map_or(true, |s| run.status() == s))
        .max_by(|a, b| a.orcabus_id.cmp(&b.orcabus_id))
}
