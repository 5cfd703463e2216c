//! Payload types
//!
//! A payload is the versioned input/output data object attached to a
//! workflow run. Its `data` section has a typed shell (`inputs`, `outputs`)
//! over the open [`Value`] type; any other top-level data sections (engine
//! parameters, tags, ...) are preserved verbatim in `extra`.
//!
//! ## Invariants
//!
//! - A key present in `inputs` with a non-null value is never overwritten
//!   by a merge.
//! - `outputs` is set as a whole, never partially merged, and only for the
//!   success terminal state.

use serde::{Deserialize, Deserializer, Serialize};

use crate::value::{Value, ValueMap};

fn nullable_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ValueMap, D::Error> {
    Ok(Option::<ValueMap>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `data` section of a payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadData {
    /// Upstream-supplied parameters
    #[serde(default, deserialize_with = "nullable_map")]
    pub inputs: ValueMap,
    /// Results, only present for a succeeded run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<ValueMap>,
    /// Other top-level sections, kept as-is
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// Versioned payload attached to a workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Opaque payload schema version, e.g. `2025.08.05`
    pub version: String,
    /// Payload contents
    #[serde(default)]
    pub data: PayloadData,
    /// Store record id, present on payloads read from the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcabus_id: Option<String>,
    /// Store reference id, present on payloads read from the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_ref_id: Option<String>,
}

impl Payload {
    /// Empty payload with the given version tag
    pub fn new(version: impl Into<String>) -> Self {
        Payload {
            version: version.into(),
            data: PayloadData::default(),
            orcabus_id: None,
            payload_ref_id: None,
        }
    }

    /// Builder-style helper setting a single input
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.inputs.insert(key.into(), value.into());
        self
    }

    /// Input value for `key`, treating an explicit null as absent
    pub fn input(&self, key: &str) -> Option<&Value> {
        self.data.inputs.get(key).filter(|v| !v.is_null())
    }

    /// Whether `key` holds a non-null input
    pub fn has_input(&self, key: &str) -> bool {
        self.input(key).is_some()
    }

    /// Copy without the store's bookkeeping fields
    pub fn without_store_fields(&self) -> Payload {
        Payload {
            version: self.version.clone(),
            data: self.data.clone(),
            orcabus_id: None,
            payload_ref_id: None,
        }
    }

    /// Full structural view, as it would be serialized
    pub fn to_value(&self) -> Value {
        let mut data = self.data.extra.clone();
        data.insert("inputs".to_string(), Value::Object(self.data.inputs.clone()));
        if let Some(outputs) = &self.data.outputs {
            data.insert("outputs".to_string(), Value::Object(outputs.clone()));
        }

        let mut root = ValueMap::new();
        root.insert("version".to_string(), Value::String(self.version.clone()));
        root.insert("data".to_string(), Value::Object(data));
        if let Some(id) = &self.orcabus_id {
            root.insert("orcabusId".to_string(), Value::String(id.clone()));
        }
        if let Some(id) = &self.payload_ref_id {
            root.insert("payloadRefId".to_string(), Value::String(id.clone()));
        }
        Value::Object(root)
    }
}
