//! Reconcile command handlers.

use std::sync::Arc;

use draftrun_core::{LibraryRef, SelectionCriteria, StateChangeEvent, ValueMap};

use crate::bridge::Services;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle ReconcileUpstream command.
pub fn reconcile_upstream(
    s: &Arc<Services>,
    criteria: SelectionCriteria,
    facts: ValueMap,
    libraries: Option<Vec<LibraryRef>>,
) -> Result<Output> {
    let criteria = s.config.complete_criteria(criteria);
    let outcome = convert_result(s.reconciler().reconcile_upstream_with(
        &criteria,
        &facts,
        libraries.as_deref(),
    ))?;
    Ok(Output::Reconciled(outcome.into()))
}

/// Handle PublishUpdate command.
pub fn publish_update(s: &Arc<Services>, event: StateChangeEvent) -> Result<Output> {
    convert_result(s.reconciler().publish_update(&event))?;
    Ok(Output::Unit)
}
