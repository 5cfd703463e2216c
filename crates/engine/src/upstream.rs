//! Upstream output directories
//!
//! Locates the directories written by upstream runs from the file catalog
//! and turns them into merge facts.

use std::fmt;

use draftrun_core::{Error, FileCatalog, FileObject, PortalRunId, Result, Value, ValueMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Kind of upstream output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpstreamOutput {
    /// DRAGEN somatic output, found via the `_tumor.bam` alignment
    DragenTumor,
    /// DRAGEN germline output, found via the normal alignment
    DragenNormal,
    /// Oncoanalyser DNA output, found via the `redux.bam` alignment
    Oncoanalyser,
}

impl UpstreamOutput {
    /// Fact key the directory is reported under
    pub fn fact_key(&self) -> &'static str {
        match self {
            UpstreamOutput::DragenTumor => "dragenSomaticDir",
            UpstreamOutput::DragenNormal => "dragenGermlineDir",
            UpstreamOutput::Oncoanalyser => "oncoanalyserDnaDir",
        }
    }

    fn matches(&self, key: &str) -> bool {
        match self {
            UpstreamOutput::DragenTumor => key.ends_with("_tumor.bam"),
            UpstreamOutput::DragenNormal => {
                key.ends_with(".bam") && !key.ends_with("_tumor.bam") && !key.ends_with("_normal.bam")
            }
            UpstreamOutput::Oncoanalyser => key.ends_with("redux.bam"),
        }
    }

    // Oncoanalyser writes <output>/alignments/dna/<sample>.redux.bam
    fn levels_up(&self) -> usize {
        match self {
            UpstreamOutput::DragenTumor | UpstreamOutput::DragenNormal => 1,
            UpstreamOutput::Oncoanalyser => 3,
        }
    }
}

impl fmt::Display for UpstreamOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpstreamOutput::DragenTumor => "dragen tumor",
            UpstreamOutput::DragenNormal => "dragen normal",
            UpstreamOutput::Oncoanalyser => "oncoanalyser",
        })
    }
}

fn ancestor(key: &str, levels: usize) -> &str {
    let mut dir = key.trim_end_matches('/');
    for _ in 0..levels {
        dir = match dir.rfind('/') {
            Some(i) => &dir[..i],
            None => "",
        };
    }
    dir
}

/// Render the directory `levels` up from an object as `s3://bucket/dir/`
pub fn object_dir_uri(object: &FileObject, levels: usize) -> String {
    let dir = ancestor(&object.key, levels);
    if dir.is_empty() {
        format!("s3://{}/", object.bucket)
    } else {
        format!("s3://{}/{}/", object.bucket, dir)
    }
}

/// Find the output directory of `kind` for a run.
///
/// # Errors
///
/// `NotFound` when no listed object identifies the output.
pub fn output_dir(
    files: &dyn FileCatalog,
    portal_run_id: &PortalRunId,
    kind: UpstreamOutput,
) -> Result<String> {
    let objects = files.list_files(portal_run_id)?;
    let object = objects
        .iter()
        .find(|o| kind.matches(&o.key))
        .ok_or_else(|| {
            Error::NotFound(format!(
                "{} output for portal run id {}",
                kind, portal_run_id
            ))
        })?;
    let uri = object_dir_uri(object, kind.levels_up());
    debug!(target: "draftrun::merge", %portal_run_id, %kind, %uri, "Upstream output located");
    Ok(uri)
}

/// Find the output directory of `kind` and return it as a one-key fact map
pub fn output_dir_fact(
    files: &dyn FileCatalog,
    portal_run_id: &PortalRunId,
    kind: UpstreamOutput,
) -> Result<ValueMap> {
    let uri = output_dir(files, portal_run_id, kind)?;
    let mut facts = ValueMap::new();
    facts.insert(kind.fact_key().to_string(), Value::String(uri));
    Ok(facts)
}
