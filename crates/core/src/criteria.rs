//! Run selection criteria

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::RunStatus;

/// How to acquire the candidate run set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSource<'a> {
    /// All runs linked to an analysis run
    AnalysisRun(&'a str),
    /// All runs whose libraries lie within the given set
    Libraries(&'a [String]),
}

/// Criteria identifying a single workflow run
///
/// Either `analysis_run_id` or a non-empty `library_ids` must be supplied;
/// the analysis run id takes precedence when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCriteria {
    /// Required workflow name; may be omitted on the wire when the caller
    /// fills it from configuration
    #[serde(default)]
    pub workflow_name: String,
    /// Optional exact workflow version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_version: Option<String>,
    /// Optional exact current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    /// Analysis run to select within
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_run_id: Option<String>,
    /// Library ids the run's libraries must lie within
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_ids: Option<Vec<String>>,
}

impl SelectionCriteria {
    /// Criteria for the given workflow name, no candidate source yet
    pub fn for_workflow(name: impl Into<String>) -> Self {
        SelectionCriteria {
            workflow_name: name.into(),
            ..Default::default()
        }
    }

    /// Select within an analysis run
    pub fn with_analysis_run(mut self, id: impl Into<String>) -> Self {
        self.analysis_run_id = Some(id.into());
        self
    }

    /// Select by library set
    pub fn with_libraries<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.library_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Require an exact workflow version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.workflow_version = Some(version.into());
        self
    }

    /// Require an exact current status
    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Validate and pick the candidate source.
    ///
    /// # Errors
    ///
    /// `InvalidCriteria` when the workflow name is empty or when neither an
    /// analysis run id nor a non-empty library set is given.
    pub fn candidate_source(&self) -> Result<CandidateSource<'_>> {
        if self.workflow_name.trim().is_empty() {
            return Err(Error::InvalidCriteria(
                "workflow name is required".to_string(),
            ));
        }
        if let Some(id) = &self.analysis_run_id {
            return Ok(CandidateSource::AnalysisRun(id));
        }
        match &self.library_ids {
            Some(ids) if !ids.is_empty() => Ok(CandidateSource::Libraries(ids)),
            _ => Err(Error::InvalidCriteria(
                "either an analysis run id or a non-empty library set must be provided"
                    .to_string(),
            )),
        }
    }
}
