//! Payload merging
//!
//! Integrates newly available upstream facts into a draft run's payload
//! without clobbering anything another upstream producer already recorded.
//!
//! ## Rules
//!
//! - A fact is written into `inputs` only when the key is absent (missing
//!   or null) in the target payload.
//! - Facts belong to groups. A group is written only when every member is
//!   available as a fact and none of its keys is already set; otherwise the
//!   whole group is left alone. A group with exactly one member already set
//!   is skipped as well; the missing member is never filled in.
//! - Fact keys outside every configured group form singleton groups.
//! - When every configured group is already fully populated the merge is a
//!   no-op and the target is returned unchanged.
//!
//! Merge history is inferred purely from key presence, so re-applying the
//! same facts is always a no-op.

use std::collections::HashSet;

use draftrun_core::{Error, Payload, Result, Value, ValueMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fact keys that are only ever written together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactGroup {
    /// Group name used in logs and reports
    pub name: String,
    /// Member keys
    pub keys: Vec<String>,
}

impl FactGroup {
    /// Create a group
    pub fn new<I, S>(name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FactGroup {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    fn singleton(key: &str) -> Self {
        FactGroup::new(key, [key])
    }

    /// Every member holds a non-null input
    pub fn is_populated(&self, payload: &Payload) -> bool {
        self.keys.iter().all(|k| payload.has_input(k))
    }
}

/// Why a group was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Every configured group was already populated
    PayloadComplete,
    /// All members already set
    AlreadyPresent,
    /// Some, but not all, members already set
    PartiallyPresent,
    /// Only some members offered as facts
    IncompleteFacts,
}

/// A group left untouched by a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedGroup {
    /// Group name
    pub group: String,
    /// Reason
    pub reason: SkipReason,
}

/// Result of a merge with the decisions taken per group
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    /// Merged payload
    pub payload: Payload,
    /// Groups written
    pub applied: Vec<String>,
    /// Groups skipped
    pub skipped: Vec<SkippedGroup>,
}

/// Group configuration for a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicy {
    groups: Vec<FactGroup>,
}

impl MergePolicy {
    /// Build a policy, validating the groups.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a group has no keys or a key appears in more
    /// than one group.
    pub fn new(groups: Vec<FactGroup>) -> Result<Self> {
        let mut seen = HashSet::new();
        for group in &groups {
            if group.keys.is_empty() {
                return Err(Error::InvalidInput(format!(
                    "fact group '{}' has no keys",
                    group.name
                )));
            }
            for key in &group.keys {
                if !seen.insert(key.as_str()) {
                    return Err(Error::InvalidInput(format!(
                        "fact key '{}' appears in more than one group",
                        key
                    )));
                }
            }
        }
        Ok(MergePolicy { groups })
    }

    /// Groups for the sash draft: the DRAGEN germline/somatic pair and the
    /// oncoanalyser DNA directory.
    pub fn sash() -> Self {
        MergePolicy {
            groups: default_groups(),
        }
    }

    /// Configured groups
    pub fn groups(&self) -> &[FactGroup] {
        &self.groups
    }

    fn group_of(&self, key: &str) -> Option<&FactGroup> {
        self.groups.iter().find(|g| g.keys.iter().any(|k| k == key))
    }

    /// Every configured group is fully populated in `payload`.
    ///
    /// A policy without groups is never complete.
    pub fn is_complete(&self, payload: &Payload) -> bool {
        !self.groups.is_empty() && self.groups.iter().all(|g| g.is_populated(payload))
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::sash()
    }
}

pub(crate) fn default_groups() -> Vec<FactGroup> {
    vec![
        FactGroup::new("dragen", ["dragenGermlineDir", "dragenSomaticDir"]),
        FactGroup::new("oncoanalyser", ["oncoanalyserDnaDir"]),
    ]
}

fn fact<'a>(facts: &'a ValueMap, key: &str) -> Option<&'a Value> {
    facts.get(key).filter(|v| !v.is_null())
}

enum Decision {
    Apply,
    Skip(SkipReason),
    NotOffered,
}

fn decide(group: &FactGroup, target: &Payload, facts: &ValueMap) -> Decision {
    let offered = group.keys.iter().filter(|k| fact(facts, k).is_some()).count();
    if offered == 0 {
        return Decision::NotOffered;
    }
    let present = group.keys.iter().filter(|k| target.has_input(k)).count();
    if present == group.keys.len() {
        return Decision::Skip(SkipReason::AlreadyPresent);
    }
    if present > 0 {
        return Decision::Skip(SkipReason::PartiallyPresent);
    }
    if offered < group.keys.len() {
        return Decision::Skip(SkipReason::IncompleteFacts);
    }
    Decision::Apply
}

/// Merge `facts` into `target`, returning the new payload.
///
/// The version tag, `outputs` and any extra data sections are carried over
/// untouched.
pub fn merge(target: &Payload, facts: &ValueMap, policy: &MergePolicy) -> Payload {
    merge_with_report(target, facts, policy).payload
}

/// Merge `facts` into `target`, reporting the decision for every group.
pub fn merge_with_report(target: &Payload, facts: &ValueMap, policy: &MergePolicy) -> MergeReport {
    if policy.is_complete(target) {
        debug!(target: "draftrun::merge", version = %target.version, "Draft inputs complete, merge is a no-op");
        return MergeReport {
            payload: target.clone(),
            applied: Vec::new(),
            skipped: policy
                .groups()
                .iter()
                .map(|g| SkippedGroup {
                    group: g.name.clone(),
                    reason: SkipReason::PayloadComplete,
                })
                .collect(),
        };
    }

    let singletons: Vec<FactGroup> = facts
        .keys()
        .filter(|k| policy.group_of(k).is_none())
        .map(|k| FactGroup::singleton(k))
        .collect();

    let mut payload = target.clone();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    for group in policy.groups().iter().chain(singletons.iter()) {
        match decide(group, target, facts) {
            Decision::Apply => {
                for key in &group.keys {
                    if let Some(value) = fact(facts, key) {
                        payload.data.inputs.insert(key.clone(), value.clone());
                    }
                }
                debug!(target: "draftrun::merge", group = %group.name, "Fact group merged");
                applied.push(group.name.clone());
            }
            Decision::Skip(reason) => {
                debug!(target: "draftrun::merge", group = %group.name, ?reason, "Fact group skipped");
                skipped.push(SkippedGroup {
                    group: group.name.clone(),
                    reason,
                });
            }
            Decision::NotOffered => {}
        }
    }

    MergeReport {
        payload,
        applied,
        skipped,
    }
}
