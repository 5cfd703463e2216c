//! Ready payload to execution-engine inputs
//!
//! A READY sash payload carries camelCase inputs; the execution engine
//! takes a three-row sample sheet plus a reference data path.

use draftrun_core::{Error, Result, Value, ValueMap};
use serde::{Deserialize, Serialize};

/// One sample sheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplesheetRow {
    /// Group id
    pub id: String,
    /// Subject id
    pub subject_name: String,
    /// Sample (library) id
    pub sample_name: String,
    /// Input kind
    pub filetype: String,
    /// Directory URI
    pub filepath: String,
}

/// Engine inputs for a sash run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInputs {
    /// Disable coloured engine logs
    pub monochrome_logs: bool,
    /// Somatic, germline and oncoanalyser rows, in that order
    pub samplesheet: Vec<SamplesheetRow>,
    /// Reference data location
    pub ref_data_path: String,
}

fn required(inputs: &ValueMap, key: &str) -> Result<String> {
    inputs
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidPayload(format!("ready inputs lack '{}'", key)))
}

/// Build engine inputs from the inputs of a ready payload.
///
/// `monochromeLogs` falls back to `default_monochrome_logs`.
///
/// # Errors
///
/// `InvalidPayload` when a required input is missing or not a string.
pub fn engine_inputs_from_ready(
    inputs: &ValueMap,
    default_monochrome_logs: bool,
) -> Result<EngineInputs> {
    let group_id = required(inputs, "groupId")?;
    let subject_id = required(inputs, "subjectId")?;
    let tumor = required(inputs, "tumorDnaSampleId")?;
    let normal = required(inputs, "normalDnaSampleId")?;

    let row = |sample: &str, filetype: &str, key: &str| -> Result<SamplesheetRow> {
        Ok(SamplesheetRow {
            id: group_id.clone(),
            subject_name: subject_id.clone(),
            sample_name: sample.to_string(),
            filetype: filetype.to_string(),
            filepath: required(inputs, key)?,
        })
    };

    let samplesheet = vec![
        row(&tumor, "dragen_somatic_dir", "dragenSomaticDir")?,
        row(&normal, "dragen_germline_dir", "dragenGermlineDir")?,
        row(&tumor, "oncoanalyser_dir", "oncoanalyserDnaDir")?,
    ];

    Ok(EngineInputs {
        monochrome_logs: inputs
            .get("monochromeLogs")
            .and_then(Value::as_bool)
            .unwrap_or(default_monochrome_logs),
        samplesheet,
        ref_data_path: required(inputs, "refDataPath")?,
    })
}
