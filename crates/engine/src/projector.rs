//! Event projection
//!
//! Turns a run, a new status and a payload into the outward state-change
//! event. Outputs are derived here, and only for the success terminal state.

use chrono::{DateTime, Utc};
use draftrun_core::{
    format_event_timestamp, Error, Payload, Result, RunStatus, StateChangeEvent, Value, ValueMap,
    WorkflowRun,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Derives one output value from an input value
///
/// The output is the string form of `inputs[from_input]` wrapped in
/// `prefix` and `suffix`, e.g. `sashRelPath = "<groupId>/"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRule {
    /// Output key
    pub key: String,
    /// Input key the value is derived from
    pub from_input: String,
    /// Text placed before the input value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    /// Text placed after the input value
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
}

impl OutputRule {
    /// Rule with a suffix and no prefix
    pub fn new(
        key: impl Into<String>,
        from_input: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        OutputRule {
            key: key.into(),
            from_input: from_input.into(),
            prefix: String::new(),
            suffix: suffix.into(),
        }
    }

    fn derive(&self, inputs: &ValueMap) -> Result<Value> {
        let source = inputs
            .get(&self.from_input)
            .and_then(Value::to_plain_string)
            .ok_or_else(|| {
                Error::InvalidPayload(format!(
                    "input '{}' required to derive output '{}' is missing",
                    self.from_input, self.key
                ))
            })?;
        Ok(Value::String(format!("{}{}{}", self.prefix, source, self.suffix)))
    }
}

pub(crate) fn default_output_rules() -> Vec<OutputRule> {
    vec![OutputRule::new("sashRelPath", "groupId", "/")]
}

/// Builds state-change events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventProjector {
    rules: Vec<OutputRule>,
}

impl Default for EventProjector {
    fn default() -> Self {
        EventProjector::new(default_output_rules())
    }
}

impl EventProjector {
    /// Projector deriving outputs with `rules`
    pub fn new(rules: Vec<OutputRule>) -> Self {
        EventProjector { rules }
    }

    /// Configured output rules
    pub fn rules(&self) -> &[OutputRule] {
        &self.rules
    }

    /// Derive all outputs from `inputs`.
    ///
    /// # Errors
    ///
    /// `InvalidPayload` when a rule's source input is missing or not a
    /// scalar.
    pub fn derive_outputs(&self, inputs: &ValueMap) -> Result<ValueMap> {
        self.rules
            .iter()
            .map(|rule| Ok((rule.key.clone(), rule.derive(inputs)?)))
            .collect()
    }

    /// Project using the current time
    pub fn project(
        &self,
        run: &WorkflowRun,
        status: RunStatus,
        payload: &Payload,
    ) -> Result<StateChangeEvent> {
        self.project_at(run, status, payload, Utc::now())
    }

    /// Project with an explicit timestamp.
    ///
    /// For [`RunStatus::Succeeded`] the derived outputs replace `outputs` as
    /// a whole; for every other status the `outputs` section is removed.
    pub fn project_at(
        &self,
        run: &WorkflowRun,
        status: RunStatus,
        payload: &Payload,
        now: DateTime<Utc>,
    ) -> Result<StateChangeEvent> {
        let mut payload = payload.without_store_fields();
        if status.is_success() {
            let outputs = self.derive_outputs(&payload.data.inputs)?;
            if !outputs.is_empty() {
                debug!(target: "draftrun::project", keys = outputs.len(), "Outputs derived");
                payload.data.outputs = Some(outputs);
            }
        } else {
            payload.data.outputs = None;
        }

        info!(
            target: "draftrun::project",
            portal_run_id = %run.portal_run_id,
            %status,
            "State change projected"
        );

        Ok(StateChangeEvent {
            status,
            timestamp: format_event_timestamp(now),
            portal_run_id: run.portal_run_id.clone(),
            workflow: run.workflow.clone(),
            workflow_run_name: run.workflow_run_name.clone(),
            libraries: run.libraries.clone(),
            payload,
        })
    }
}
