//! Event command handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use draftrun_core::{Payload, PortalRunId, RunStatus, WorkflowRun};

use crate::bridge::Services;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle ProjectEvent command.
pub fn project_event(
    s: &Arc<Services>,
    run: WorkflowRun,
    status: RunStatus,
    payload: Payload,
    at: Option<DateTime<Utc>>,
) -> Result<Output> {
    let at = at.unwrap_or_else(Utc::now);
    let event = convert_result(s.projector.project_at(&run, status, &payload, at))?;
    Ok(Output::Event(Box::new(event)))
}

/// Handle ProjectEngineEvent command.
pub fn project_engine_event(
    s: &Arc<Services>,
    portal_run_id: PortalRunId,
    status: RunStatus,
) -> Result<Output> {
    let event = convert_result(s.reconciler().project_engine_event(&portal_run_id, status))?;
    Ok(Output::Event(Box::new(event)))
}
