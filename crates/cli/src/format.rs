//! Output → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default): short summaries, e.g. `(nil)`, `updated: run wfr.30 (DRAFT)`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): single-line JSON, for piping

use draftrun_executor::{EventEnvelope, Error, Output, Reconciliation, Value, WorkflowRun};
use serde::Serialize;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(output),
        OutputMode::Raw => compact(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&serde_json::json!({ "error": err })),
        OutputMode::Raw => format!("{}", err),
        OutputMode::Human => format!("(error) {}", err),
    }
}

/// Format a published event as one JSON line.
pub fn format_event_line(event: &EventEnvelope) -> String {
    compact(event)
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("(error) {}", e))
}

fn compact<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("(error) {}", e))
}

fn format_run(run: &WorkflowRun) -> String {
    format!(
        "run {} ({}) {} {} {}",
        run.orcabus_id,
        run.portal_run_id,
        run.workflow.name,
        run.workflow.version,
        run.status()
    )
}

fn format_value_human(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => compact(other),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Pong { version } => format!("PONG {}", version),
        Output::Run(run) | Output::MaybeRun(Some(run)) => format_run(run),
        Output::MaybeRun(None) | Output::MaybePayload(None) => "(nil)".to_string(),
        Output::MaybePayload(Some(payload)) => pretty(payload),
        Output::Merged(result) => {
            let mut lines = vec![format!(
                "applied: {}",
                if result.applied.is_empty() {
                    "(none)".to_string()
                } else {
                    result.applied.join(", ")
                }
            )];
            for skipped in &result.skipped {
                lines.push(format!("skipped: {} ({:?})", skipped.group, skipped.reason));
            }
            lines.push(pretty(&result.payload));
            lines.join("\n")
        }
        Output::Comparison(cmp) => {
            if !cmp.has_changed {
                return "(unchanged)".to_string();
            }
            let mut lines = vec![format!("(changed) {} difference(s)", cmp.differences.len())];
            for d in &cmp.differences {
                lines.push(format!("  {:?} {}", d.kind, d.path));
            }
            lines.join("\n")
        }
        Output::Event(event) => format!(
            "{} {} at {}",
            event.status, event.portal_run_id, event.timestamp
        ),
        Output::Reconciled(Reconciliation::NoDraftRun) => "no draft run".to_string(),
        Output::Reconciled(Reconciliation::Unchanged { run }) => {
            format!("unchanged: run {}", run.orcabus_id)
        }
        Output::Reconciled(Reconciliation::Updated { run, event }) => {
            format!("updated: run {} ({})", run.orcabus_id, event.status)
        }
        Output::Reconciled(Reconciliation::Unpublished { run, reason, .. }) => {
            format!("committed, not published: run {} ({})", run.orcabus_id, reason)
        }
        Output::Facts(facts) => facts
            .iter()
            .map(|(k, v)| format!("{} = {}", k, format_value_human(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Libraries(pairing) => match &pairing.tumor_library_id {
            Some(tumor) => format!("normal: {}\ntumor: {}", pairing.library_id, tumor),
            None => format!("library: {}", pairing.library_id),
        },
        Output::EngineInputs(inputs) => pretty(inputs),
    }
}
