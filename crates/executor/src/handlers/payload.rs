//! Payload command handlers.

use std::sync::Arc;

use draftrun_core::{Payload, Value, ValueMap};
use draftrun_engine::{diff, has_changed, merge_with_report};

use crate::bridge::Services;
use crate::types::Comparison;
use crate::{Output, Result};

/// Handle MergePayload command.
pub fn merge_payload(s: &Arc<Services>, target: Payload, facts: ValueMap) -> Result<Output> {
    let report = merge_with_report(&target, &facts, &s.policy);
    Ok(Output::Merged(report.into()))
}

/// Handle ComparePayloads command.
///
/// Never fails.
pub fn compare_payloads(old: Value, new: Value) -> Result<Output> {
    Ok(Output::Comparison(Comparison {
        has_changed: has_changed(&old, &new),
        differences: diff(&old, &new),
    }))
}
