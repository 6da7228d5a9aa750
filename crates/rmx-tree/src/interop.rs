//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Conversions between tree values and serde_json values."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
//! Bridging between [`TreeValue`] and [`serde_json::Value`].
//!
//! The message registry renders typed schema structs through
//! `serde_json::Value` on their way into and out of trees, so the two value
//! models need faithful conversions. JSON has no byte leaves; `Bytes`
//! converts to an integer array, matching the serialized form.

use serde_json::Value as JsonValue;

use crate::value::{Tree, TreeValue};
use crate::{Result, TreeError};

impl TreeValue {
    /// Convert a JSON value into a tree value.
    ///
    /// Nulls are rejected: the tree model has no null leaf and a persisted
    /// document containing one cannot round-trip through a typed message.
    pub fn from_json(value: JsonValue) -> Result<TreeValue> {
        match value {
            JsonValue::Null => Err(TreeError::Null),
            JsonValue::Bool(flag) => Ok(TreeValue::Bool(flag)),
            JsonValue::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Ok(TreeValue::Int(int))
                } else if let Some(float) = number.as_f64() {
                    Ok(TreeValue::Float(float))
                } else {
                    // Only u64 values above i64::MAX reach this arm.
                    Err(TreeError::IntRange(number.as_u64().unwrap_or(u64::MAX)))
                }
            }
            JsonValue::String(text) => Ok(TreeValue::Text(text)),
            JsonValue::Array(values) => Ok(TreeValue::Seq(
                values
                    .into_iter()
                    .map(TreeValue::from_json)
                    .collect::<Result<Vec<_>>>()?,
            )),
            JsonValue::Object(entries) => {
                let mut tree = Tree::new();
                for (key, value) in entries {
                    tree.insert(key, TreeValue::from_json(value)?);
                }
                Ok(TreeValue::Map(tree))
            }
        }
    }

    /// Convert this tree value into a JSON value.
    ///
    /// Fails on non-finite floats, which JSON cannot express.
    pub fn to_json(&self) -> Result<JsonValue> {
        match self {
            TreeValue::Bool(flag) => Ok(JsonValue::Bool(*flag)),
            TreeValue::Int(value) => Ok(JsonValue::from(*value)),
            TreeValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(JsonValue::Number)
                .ok_or(TreeError::NonFiniteFloat(*value)),
            TreeValue::Text(text) => Ok(JsonValue::String(text.clone())),
            TreeValue::Bytes(bytes) => Ok(JsonValue::Array(
                bytes.iter().map(|byte| JsonValue::from(*byte)).collect(),
            )),
            TreeValue::Seq(values) => Ok(JsonValue::Array(
                values
                    .iter()
                    .map(TreeValue::to_json)
                    .collect::<Result<Vec<_>>>()?,
            )),
            TreeValue::Map(tree) => {
                let mut entries = serde_json::Map::with_capacity(tree.len());
                for (key, value) in tree {
                    entries.insert(key.clone(), value.to_json()?);
                }
                Ok(JsonValue::Object(entries))
            }
        }
    }
}
