//! Configuration via `draftrun.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! sash draft behaviour. To change settings, edit the file and restart.

use std::path::Path;

use draftrun_core::{Error, Result, SelectionCriteria};
use serde::{Deserialize, Serialize};

use crate::merge::{default_groups, FactGroup, MergePolicy};
use crate::projector::{default_output_rules, EventProjector, OutputRule};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "draftrun.toml";

/// Configuration loaded from `draftrun.toml`.
///
/// # Example
///
/// ```toml
/// workflow_name = "sash"
///
/// [[merge_groups]]
/// name = "dragen"
/// keys = ["dragenGermlineDir", "dragenSomaticDir"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftrunConfig {
    /// Workflow whose draft runs are maintained; selection criteria
    /// without a workflow name select this one
    #[serde(default = "default_workflow_name")]
    pub workflow_name: String,
    /// `source` field of published events
    #[serde(default = "default_event_source")]
    pub event_source: String,
    /// `monochrome_logs` when a ready payload does not set it
    #[serde(default = "default_true")]
    pub default_monochrome_logs: bool,
    /// Fact groups written atomically by a merge
    #[serde(default = "default_groups")]
    pub merge_groups: Vec<FactGroup>,
    /// Output derivations applied on success
    #[serde(default = "default_output_rules")]
    pub output_rules: Vec<OutputRule>,
}

fn default_workflow_name() -> String {
    "sash".to_string()
}

fn default_event_source() -> String {
    "orcabus.sash".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DraftrunConfig {
    fn default() -> Self {
        Self {
            workflow_name: default_workflow_name(),
            event_source: default_event_source(),
            default_monochrome_logs: true,
            merge_groups: default_groups(),
            output_rules: default_output_rules(),
        }
    }
}

impl DraftrunConfig {
    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty workflow name, an empty fact group, or a
    /// key appearing in more than one group.
    pub fn validate(&self) -> Result<()> {
        if self.workflow_name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "workflow_name in draftrun.toml must not be empty".to_string(),
            ));
        }
        self.merge_policy().map(|_| ())
    }

    /// `criteria` with a blank workflow name replaced by `workflow_name`
    pub fn complete_criteria(&self, mut criteria: SelectionCriteria) -> SelectionCriteria {
        if criteria.workflow_name.trim().is_empty() {
            criteria.workflow_name = self.workflow_name.clone();
        }
        criteria
    }

    /// Merge policy built from `merge_groups`
    pub fn merge_policy(&self) -> Result<MergePolicy> {
        MergePolicy::new(self.merge_groups.clone())
    }

    /// Projector built from `output_rules`
    pub fn projector(&self) -> EventProjector {
        EventProjector::new(self.output_rules.clone())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# draftrun configuration
#
# Workflow whose draft runs are maintained. Commands whose selection
# criteria omit the workflow name select this one.
workflow_name = "sash"

# Source field of published events.
event_source = "orcabus.sash"

# monochrome_logs used when a ready payload does not set it.
default_monochrome_logs = true

# Fact groups. All keys of a group are written together or not at all.
# Fact keys not listed here are merged one by one.
[[merge_groups]]
name = "dragen"
keys = ["dragenGermlineDir", "dragenSomaticDir"]

[[merge_groups]]
name = "oncoanalyser"
keys = ["oncoanalyserDnaDir"]

# Outputs derived when a run succeeds: key = prefix + inputs[from_input] + suffix
[[output_rules]]
key = "sashRelPath"
from_input = "groupId"
suffix = "/"
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DraftrunConfig = toml::from_str(content)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Unavailable(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidInput(msg) => {
                Error::InvalidInput(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Unavailable(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Unavailable(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
