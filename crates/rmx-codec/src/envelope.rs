//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Single-entry conversion between typed messages and tagged envelopes."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use rmx_msg::{DynMessage, MessageKind, MessageRegistry, RegistryError};
use rmx_tree::{Tree, TreeValue};
use serde::{Deserialize, Serialize};

use crate::ShapeRule;

/// Serialized field name of the envelope type tag.
pub const FIELD_TYPE: &str = "type";
/// Serialized field name of the envelope payload.
pub const FIELD_PAYLOAD: &str = "payload";

/// A type-tagged payload tree — the unit exchanged with persistence.
///
/// The payload is always a mapping; bare scalars or sequences under the tag
/// would not be decodable and are rejected by shape validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Full stored type name, kind suffix included.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Message payload rendered as a generic tree.
    pub payload: Tree,
}

impl Envelope {
    /// Construct an envelope from its parts.
    pub fn new(type_name: impl Into<String>, payload: Tree) -> Self {
        Self {
            type_name: type_name.into(),
            payload,
        }
    }

    /// Render the envelope as a generic tree value.
    pub fn to_tree_value(&self) -> TreeValue {
        let mut tree = Tree::new();
        tree.insert(
            FIELD_TYPE.to_owned(),
            TreeValue::Text(self.type_name.clone()),
        );
        tree.insert(FIELD_PAYLOAD.to_owned(), TreeValue::Map(self.payload.clone()));
        TreeValue::Map(tree)
    }

    /// Read an envelope out of a generic tree value, enforcing the shape
    /// contract: a mapping with exactly the keys `{type, payload}`, a text
    /// `type`, and a mapping `payload`.
    pub fn from_tree_value(value: &TreeValue) -> std::result::Result<Self, ShapeRule> {
        let entry = value.as_map().ok_or(ShapeRule::EntryNotMapping)?;
        if entry.len() != 2 || !entry.contains_key(FIELD_TYPE) || !entry.contains_key(FIELD_PAYLOAD)
        {
            return Err(ShapeRule::WrongKeySet);
        }
        let type_name = entry
            .get(FIELD_TYPE)
            .and_then(TreeValue::as_str)
            .ok_or(ShapeRule::TypeNotText)?;
        let payload = match entry.get(FIELD_PAYLOAD) {
            Some(TreeValue::Map(tree)) => tree.clone(),
            _ => return Err(ShapeRule::PayloadNotMapping),
        };
        Ok(Self {
            type_name: type_name.to_owned(),
            payload,
        })
    }
}

/// Error type for single-entry envelope operations.
///
/// Carries no collection key; the collection transcoder tags failures with
/// the key of the entry being processed.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The registry bridge failed to render the message.
    #[error("registry encode failed for {type_name:?}: {source}")]
    Encode {
        /// Full type name of the message.
        type_name: String,
        /// Underlying registry failure.
        #[source]
        source: RegistryError,
    },
    /// The registry failed to reconstruct a message from the payload.
    #[error("registry decode failed for {type_name:?}: {source}")]
    Decode {
        /// Raw type string from the envelope.
        type_name: String,
        /// Underlying registry failure.
        #[source]
        source: RegistryError,
    },
    /// The envelope violated a structural rule.
    #[error("{0}")]
    Malformed(ShapeRule),
}

/// Resolve a stored type name into its base schema name and kind.
///
/// Pure suffix inspection, checked in a fixed order: `Response` first, then
/// `Request`, then plain message. The order is load-bearing for
/// reproducibility even though the two suffixes cannot both terminate the
/// same string.
pub fn resolve_type_name(type_name: &str) -> (&str, MessageKind) {
    if let Some(base) = type_name.strip_suffix(MessageKind::Response.suffix()) {
        (base, MessageKind::Response)
    } else if let Some(base) = type_name.strip_suffix(MessageKind::Request.suffix()) {
        (base, MessageKind::Request)
    } else {
        (type_name, MessageKind::Message)
    }
}

/// Wrap a typed message into its envelope.
///
/// The type tag is the message's own stored name, unmodified: any kind
/// suffix is already embedded by the message value itself.
pub fn encode(message: &DynMessage) -> std::result::Result<Envelope, EnvelopeError> {
    let payload = message.to_tree().map_err(|source| EnvelopeError::Encode {
        type_name: message.type_name(),
        source,
    })?;
    Ok(Envelope {
        type_name: message.type_name(),
        payload,
    })
}

/// Unwrap an envelope back into a typed message.
///
/// Rejects empty type tags, resolves the base name and kind from the tag's
/// suffix, and delegates reconstruction to the registry. No partial message
/// is ever returned.
pub fn decode(
    registry: &MessageRegistry,
    envelope: &Envelope,
) -> std::result::Result<DynMessage, EnvelopeError> {
    if envelope.type_name.is_empty() {
        return Err(EnvelopeError::Malformed(ShapeRule::TypeEmpty));
    }
    let (base, kind) = resolve_type_name(&envelope.type_name);
    registry
        .decode(base, kind, &envelope.payload)
        .map_err(|source| EnvelopeError::Decode {
            type_name: envelope.type_name.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmx_msg::catalog::{Float32, GetPlanRequest};

    #[test]
    fn resolution_is_a_pure_suffix_function() {
        assert_eq!(
            resolve_type_name("pkg/Foo"),
            ("pkg/Foo", MessageKind::Message)
        );
        assert_eq!(
            resolve_type_name("pkg/FooRequest"),
            ("pkg/Foo", MessageKind::Request)
        );
        assert_eq!(
            resolve_type_name("pkg/FooResponse"),
            ("pkg/Foo", MessageKind::Response)
        );
    }

    #[test]
    fn resolution_checks_response_before_request() {
        // A name ending in "Response" must never be read as "...Request" +
        // junk, regardless of what the middle of the string contains.
        assert_eq!(
            resolve_type_name("pkg/RequestLogResponse"),
            ("pkg/RequestLog", MessageKind::Response)
        );
    }

    #[test]
    fn encode_tags_with_the_full_type_name() {
        let message = DynMessage::new(GetPlanRequest::default());
        let envelope = encode(&message).expect("encodes");
        assert_eq!(envelope.type_name, "nav_msgs/GetPlanRequest");
        assert!(envelope.payload.contains_key("start"));
    }

    #[test]
    fn decode_rejects_empty_type_tags() {
        let registry = MessageRegistry::with_builtins();
        let envelope = Envelope::new("", Tree::new());
        let err = decode(&registry, &envelope).expect_err("empty tag");
        assert!(matches!(
            err,
            EnvelopeError::Malformed(ShapeRule::TypeEmpty)
        ));
    }

    #[test]
    fn decode_surfaces_unknown_types_with_the_raw_tag() {
        let registry = MessageRegistry::with_builtins();
        let envelope = Envelope::new("acme_msgs/MysteryRequest", Tree::new());
        let err = decode(&registry, &envelope).expect_err("unknown type");
        match err {
            EnvelopeError::Decode { type_name, .. } => {
                assert_eq!(type_name, "acme_msgs/MysteryRequest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn encode_then_decode_roundtrips() {
        let registry = MessageRegistry::with_builtins();
        let message = DynMessage::new(Float32 { data: 1.5 });
        let envelope = encode(&message).expect("encodes");
        let decoded = decode(&registry, &envelope).expect("decodes");
        assert_eq!(decoded, message);
    }

    #[test]
    fn from_tree_value_enforces_each_rule() {
        let good = Envelope::new("std_msgs/Float32", Tree::new()).to_tree_value();
        assert!(Envelope::from_tree_value(&good).is_ok());

        assert_eq!(
            Envelope::from_tree_value(&TreeValue::Int(42)),
            Err(ShapeRule::EntryNotMapping)
        );

        let mut extra = Tree::new();
        extra.insert(FIELD_TYPE.to_owned(), TreeValue::from("pkg/Foo"));
        extra.insert(FIELD_PAYLOAD.to_owned(), TreeValue::Map(Tree::new()));
        extra.insert("extra".to_owned(), TreeValue::Bool(true));
        assert_eq!(
            Envelope::from_tree_value(&TreeValue::Map(extra)),
            Err(ShapeRule::WrongKeySet)
        );

        let mut missing = Tree::new();
        missing.insert(FIELD_TYPE.to_owned(), TreeValue::from("pkg/Foo"));
        assert_eq!(
            Envelope::from_tree_value(&TreeValue::Map(missing)),
            Err(ShapeRule::WrongKeySet)
        );

        let mut bad_type = Tree::new();
        bad_type.insert(FIELD_TYPE.to_owned(), TreeValue::Int(42));
        bad_type.insert(FIELD_PAYLOAD.to_owned(), TreeValue::Map(Tree::new()));
        assert_eq!(
            Envelope::from_tree_value(&TreeValue::Map(bad_type)),
            Err(ShapeRule::TypeNotText)
        );

        let mut bad_payload = Tree::new();
        bad_payload.insert(FIELD_TYPE.to_owned(), TreeValue::from("pkg/Foo"));
        bad_payload.insert(FIELD_PAYLOAD.to_owned(), TreeValue::from("oops"));
        assert_eq!(
            Envelope::from_tree_value(&TreeValue::Map(bad_payload)),
            Err(ShapeRule::PayloadNotMapping)
        );
    }

    #[test]
    fn envelope_serde_uses_the_wire_field_names() {
        let envelope = Envelope::new("std_msgs/Float32", Tree::new());
        let json = serde_json::to_value(&envelope).expect("serializes");
        assert_eq!(json["type"], "std_msgs/Float32");
        assert!(json["payload"].is_object());
    }
}
