//! Fact derivation handlers.

use std::sync::Arc;

use draftrun_core::{LibraryRef, PortalRunId, ValueMap};
use draftrun_engine::{engine_inputs_from_ready, output_dir_fact, pair_libraries, UpstreamOutput};

use crate::bridge::Services;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle UpstreamOutputDir command.
pub fn upstream_output_dir(
    s: &Arc<Services>,
    portal_run_id: PortalRunId,
    kind: UpstreamOutput,
) -> Result<Output> {
    let facts = convert_result(output_dir_fact(s.files.as_ref(), &portal_run_id, kind))?;
    Ok(Output::Facts(facts))
}

/// Handle PairLibraries command.
pub fn pair(s: &Arc<Services>, libraries: Vec<LibraryRef>) -> Result<Output> {
    let pairing = convert_result(pair_libraries(s.directory.as_ref(), &libraries))?;
    Ok(Output::Libraries(pairing))
}

/// Handle ReadyToEngineInputs command.
pub fn ready_to_engine_inputs(s: &Arc<Services>, inputs: ValueMap) -> Result<Output> {
    let engine_inputs = convert_result(engine_inputs_from_ready(
        &inputs,
        s.config.default_monochrome_logs,
    ))?;
    Ok(Output::EngineInputs(engine_inputs))
}
