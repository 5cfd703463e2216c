//! Run command handlers.

use std::sync::Arc;

use draftrun_core::{Payload, PortalRunId, RunId, SelectionCriteria};
use draftrun_engine::{fetch_draft_payload, RunResolver};

use crate::bridge::Services;
use crate::convert::convert_result;
use crate::{Error, Output, Result};

/// Handle ResolveRun command.
pub fn resolve_run(s: &Arc<Services>, criteria: SelectionCriteria) -> Result<Output> {
    let criteria = s.config.complete_criteria(criteria);
    let run = convert_result(RunResolver::new(s.store.as_ref()).resolve(&criteria))?;
    Ok(Output::MaybeRun(run.map(Box::new)))
}

/// Handle GetWorkflowRun command.
pub fn get_workflow_run(s: &Arc<Services>, portal_run_id: PortalRunId) -> Result<Output> {
    let run = convert_result(s.store.get_run_by_portal_run_id(&portal_run_id))?;
    Ok(Output::Run(Box::new(run)))
}

/// Handle GetDraftPayload command.
pub fn get_draft_payload(s: &Arc<Services>, portal_run_id: PortalRunId) -> Result<Output> {
    let payload = convert_result(fetch_draft_payload(s.store.as_ref(), &portal_run_id))?;
    Ok(Output::MaybePayload(payload))
}

/// Handle CommitPayload command.
pub fn commit_payload(
    s: &Arc<Services>,
    run_id: RunId,
    expected: Payload,
    new: Payload,
) -> Result<Output> {
    let committer = s.committer.as_ref().ok_or_else(|| Error::Unsupported {
        reason: "the configured store does not support compare-and-set".to_string(),
    })?;
    convert_result(committer.commit_payload(&run_id, &expected, new))?;
    Ok(Output::Unit)
}
