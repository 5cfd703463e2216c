//! Change detection
//!
//! Deep structural comparison of payload values. Used to suppress
//! redundant update events when a merge added nothing.
//!
//! Maps compare by key regardless of order, sequences compare element by
//! element in order, and values of different types are never equal. Unlike
//! `Value`'s `PartialEq`, NaN compares equal to NaN here so every value is
//! unchanged with respect to itself.

use draftrun_core::{Payload, Value};
use serde::{Deserialize, Serialize};

/// Kind of a structural difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DifferenceKind {
    /// Present only in the new value
    Added,
    /// Present only in the old value
    Removed,
    /// Same type, different value
    Changed,
    /// Different types
    TypeChanged,
}

/// One difference between two values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    /// Location, e.g. `data.inputs.dragenGermlineDir` or `libraries[1]`
    pub path: String,
    /// What changed
    pub kind: DifferenceKind,
}

fn scalar_eq(old: &Value, new: &Value) -> Option<bool> {
    Some(match (old, new) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
        (Value::String(a), Value::String(b)) => a == b,
        _ => return None,
    })
}

/// Whether `old` and `new` differ structurally
pub fn has_changed(old: &Value, new: &Value) -> bool {
    !same(old, new)
}

fn same(old: &Value, new: &Value) -> bool {
    match (old, new) {
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, x)| b.get(k).map(|y| same(x, y)).unwrap_or(false))
        }
        _ => scalar_eq(old, new).unwrap_or(false),
    }
}

/// Whether two payloads differ, including bookkeeping fields
pub fn payload_has_changed(old: &Payload, new: &Payload) -> bool {
    has_changed(&old.to_value(), &new.to_value())
}

/// List every difference between `old` and `new`
pub fn diff(old: &Value, new: &Value) -> Vec<Difference> {
    let mut out = Vec::new();
    walk("", old, new, &mut out);
    out
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn walk(path: &str, old: &Value, new: &Value, out: &mut Vec<Difference>) {
    let here = |kind| Difference {
        path: path.to_string(),
        kind,
    };
    match (old, new) {
        (Value::Object(a), Value::Object(b)) => {
            for (k, x) in a {
                match b.get(k) {
                    Some(y) => walk(&child(path, k), x, y, out),
                    None => out.push(Difference {
                        path: child(path, k),
                        kind: DifferenceKind::Removed,
                    }),
                }
            }
            for k in b.keys().filter(|k| !a.contains_key(*k)) {
                out.push(Difference {
                    path: child(path, k),
                    kind: DifferenceKind::Added,
                });
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for (i, pair) in a.iter().zip(b).enumerate() {
                walk(&format!("{}[{}]", path, i), pair.0, pair.1, out);
            }
            for i in b.len()..a.len() {
                out.push(Difference {
                    path: format!("{}[{}]", path, i),
                    kind: DifferenceKind::Removed,
                });
            }
            for i in a.len()..b.len() {
                out.push(Difference {
                    path: format!("{}[{}]", path, i),
                    kind: DifferenceKind::Added,
                });
            }
        }
        _ => match scalar_eq(old, new) {
            Some(true) => {}
            Some(false) => out.push(here(DifferenceKind::Changed)),
            None => out.push(here(DifferenceKind::TypeChanged)),
        },
    }
}
