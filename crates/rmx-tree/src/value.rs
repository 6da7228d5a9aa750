//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Generic string-keyed tree values exchanged with persistence backends."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A nested mapping from string keys to [`TreeValue`]s.
///
/// `BTreeMap` keeps iteration sorted by key, which makes serialized output
/// deterministic and diff-stable across backends.
pub type Tree = BTreeMap<String, TreeValue>;

/// A single value inside a [`Tree`].
///
/// Leaves are primitives; `Seq` and `Map` nest arbitrarily. `Bytes` is the
/// non-canonical text carrier: payload normalization rewrites UTF-8 byte
/// leaves to `Text` so that persisted documents use one string encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeValue {
    /// Boolean leaf.
    Bool(bool),
    /// Signed integer leaf.
    Int(i64),
    /// Floating point leaf.
    Float(f64),
    /// Canonical string leaf.
    Text(String),
    /// Raw byte leaf; serialized as a sequence of integers.
    Bytes(Vec<u8>),
    /// Ordered sequence of values.
    Seq(Vec<TreeValue>),
    /// Nested mapping.
    Map(Tree),
}

impl TreeValue {
    /// True when the value is a nested mapping.
    pub fn is_map(&self) -> bool {
        matches!(self, TreeValue::Map(_))
    }

    /// Borrow the nested mapping, if this value is one.
    pub fn as_map(&self) -> Option<&Tree> {
        match self {
            TreeValue::Map(tree) => Some(tree),
            _ => None,
        }
    }

    /// Borrow the string content, if this value is a text leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TreeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Return the boolean content, if this value is a boolean leaf.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TreeValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Return the integer content, if this value is an integer leaf.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TreeValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Return the float content, widening integer leaves as well.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TreeValue::Float(value) => Some(*value),
            TreeValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TreeValue::Bool(_) => "bool",
            TreeValue::Int(_) => "int",
            TreeValue::Float(_) => "float",
            TreeValue::Text(_) => "text",
            TreeValue::Bytes(_) => "bytes",
            TreeValue::Seq(_) => "seq",
            TreeValue::Map(_) => "map",
        }
    }
}

impl From<bool> for TreeValue {
    fn from(value: bool) -> Self {
        TreeValue::Bool(value)
    }
}

impl From<i64> for TreeValue {
    fn from(value: i64) -> Self {
        TreeValue::Int(value)
    }
}

impl From<f64> for TreeValue {
    fn from(value: f64) -> Self {
        TreeValue::Float(value)
    }
}

impl From<&str> for TreeValue {
    fn from(value: &str) -> Self {
        TreeValue::Text(value.to_owned())
    }
}

impl From<String> for TreeValue {
    fn from(value: String) -> Self {
        TreeValue::Text(value)
    }
}

impl From<Vec<u8>> for TreeValue {
    fn from(value: Vec<u8>) -> Self {
        TreeValue::Bytes(value)
    }
}

impl From<Tree> for TreeValue {
    fn from(value: Tree) -> Self {
        TreeValue::Map(value)
    }
}

impl Serialize for TreeValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TreeValue::Bool(flag) => serializer.serialize_bool(*flag),
            TreeValue::Int(value) => serializer.serialize_i64(*value),
            TreeValue::Float(value) => serializer.serialize_f64(*value),
            TreeValue::Text(text) => serializer.serialize_str(text),
            // Byte leaves are written as plain integer sequences so every
            // self-describing backend can re-read them without native
            // binary support.
            TreeValue::Bytes(bytes) => {
                let mut seq = serializer.serialize_seq(Some(bytes.len()))?;
                for byte in bytes {
                    seq.serialize_element(byte)?;
                }
                seq.end()
            }
            TreeValue::Seq(values) => values.serialize(serializer),
            TreeValue::Map(tree) => tree.serialize(serializer),
        }
    }
}

struct TreeValueVisitor;

impl<'de> Visitor<'de> for TreeValueVisitor {
    type Value = TreeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a boolean, number, string, sequence, or mapping")
    }

    fn visit_bool<E>(self, value: bool) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        Ok(TreeValue::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        Ok(TreeValue::Int(value))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        i64::try_from(value)
            .map(TreeValue::Int)
            .map_err(|_| E::custom(crate::TreeError::IntRange(value)))
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        Ok(TreeValue::Float(value))
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        Ok(TreeValue::Text(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        Ok(TreeValue::Text(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        Ok(TreeValue::Bytes(value.to_vec()))
    }

    fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<TreeValue, E>
    where
        E: de::Error,
    {
        Ok(TreeValue::Bytes(value))
    }

    fn visit_seq<A>(self, mut access: A) -> std::result::Result<TreeValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(value) = access.next_element()? {
            values.push(value);
        }
        Ok(TreeValue::Seq(values))
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<TreeValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tree = Tree::new();
        while let Some((key, value)) = access.next_entry::<String, TreeValue>()? {
            tree.insert(key, value);
        }
        Ok(TreeValue::Map(tree))
    }
}

impl<'de> Deserialize<'de> for TreeValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TreeValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tree {
        let mut stamp = Tree::new();
        stamp.insert("secs".to_owned(), TreeValue::Int(12));
        stamp.insert("nsecs".to_owned(), TreeValue::Int(500));

        let mut tree = Tree::new();
        tree.insert("frame_id".to_owned(), TreeValue::from("map"));
        tree.insert("stamp".to_owned(), TreeValue::Map(stamp));
        tree.insert(
            "readings".to_owned(),
            TreeValue::Seq(vec![TreeValue::Float(1.5), TreeValue::Float(-0.25)]),
        );
        tree.insert("valid".to_owned(), TreeValue::Bool(true));
        tree
    }

    #[test]
    fn yaml_roundtrip_preserves_structure() {
        let tree = sample_tree();
        let yaml = serde_yaml::to_string(&tree).expect("serialize yaml");
        let reloaded: TreeValue = serde_yaml::from_str(&yaml).expect("deserialize yaml");
        assert_eq!(reloaded, TreeValue::Map(tree));
    }

    #[test]
    fn json_roundtrip_preserves_structure() {
        let tree = sample_tree();
        let json = serde_json::to_string(&tree).expect("serialize json");
        let reloaded: TreeValue = serde_json::from_str(&json).expect("deserialize json");
        assert_eq!(reloaded, TreeValue::Map(tree));
    }

    #[test]
    fn bytes_serialize_as_integer_sequence() {
        let value = TreeValue::Bytes(vec![104, 105]);
        let json = serde_json::to_string(&value).expect("serialize json");
        assert_eq!(json, "[104,105]");
        let reloaded: TreeValue = serde_json::from_str(&json).expect("deserialize json");
        assert_eq!(
            reloaded,
            TreeValue::Seq(vec![TreeValue::Int(104), TreeValue::Int(105)])
        );
    }

    #[test]
    fn oversized_unsigned_integers_are_rejected() {
        let json = format!("{}", u64::MAX);
        let err = serde_json::from_str::<TreeValue>(&json).expect_err("must not parse");
        assert!(err.to_string().contains("exceeds the representable range"));
    }

    #[test]
    fn null_leaves_are_rejected() {
        let err = serde_yaml::from_str::<TreeValue>("key: null\n").expect_err("must not parse");
        let rendered = err.to_string();
        assert!(
            rendered.contains("expected"),
            "unexpected error text: {rendered}"
        );
    }

    #[test]
    fn accessors_discriminate_variants() {
        let tree = sample_tree();
        let value = TreeValue::Map(tree);
        assert!(value.is_map());
        let map = value.as_map().expect("is a map");
        assert_eq!(map.get("frame_id").and_then(TreeValue::as_str), Some("map"));
        assert_eq!(map.get("valid").and_then(TreeValue::as_bool), Some(true));
        assert_eq!(
            map.get("stamp")
                .and_then(TreeValue::as_map)
                .and_then(|s| s.get("secs"))
                .and_then(TreeValue::as_int),
            Some(12)
        );
        assert_eq!(TreeValue::Int(3).as_float(), Some(3.0));
        assert_eq!(TreeValue::Text("x".into()).kind_name(), "text");
    }
}
