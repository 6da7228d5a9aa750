//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Collection-level transcoding with shape validation and normalization."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::collections::BTreeMap;

use rmx_msg::{DynMessage, MessageRegistry};
use rmx_tree::{canonicalize_tree, Tree};

use crate::envelope::{self, Envelope};
use crate::{CodecError, Result};

/// A named collection of typed messages, keyed by arbitrary strings.
pub type MessageCollection = BTreeMap<String, DynMessage>;

/// A named collection of envelopes — the exact shape persisted to a file or
/// parameter namespace.
pub type EnvelopeCollection = BTreeMap<String, Envelope>;

/// Render an envelope collection as the generic tree handed to persistence.
pub fn collection_to_tree(envelopes: &EnvelopeCollection) -> Tree {
    envelopes
        .iter()
        .map(|(key, envelope)| (key.clone(), envelope.to_tree_value()))
        .collect()
}

/// Verify that every collection value is a message the registry recognizes.
///
/// The type system already guarantees the values are messages rather than
/// bare trees or envelopes; the remaining dynamic hazard is a message whose
/// schema the registry cannot resolve, which would persist fine and then be
/// undecodable. The first offender aborts with [`CodecError::TypeMismatch`].
fn check_message_collection(
    registry: &MessageRegistry,
    messages: &MessageCollection,
) -> Result<()> {
    for (key, message) in messages {
        if !registry.contains(message.base_name(), message.kind()) {
            return Err(CodecError::TypeMismatch { key: key.clone() });
        }
    }
    Ok(())
}

/// Validate that a generic document has the envelope-collection shape.
///
/// Every entry must be a mapping with exactly the keys `{type, payload}`, a
/// text `type`, and a mapping `payload`. The first violation aborts with
/// [`CodecError::MalformedEnvelope`] naming the entry and the rule broken.
/// On success the parsed envelopes are returned for the decode phase.
pub fn check_envelope_shape(document: &Tree) -> Result<EnvelopeCollection> {
    let mut envelopes = EnvelopeCollection::new();
    for (key, value) in document {
        let envelope =
            Envelope::from_tree_value(value).map_err(|rule| CodecError::MalformedEnvelope {
                key: key.clone(),
                rule,
            })?;
        envelopes.insert(key.clone(), envelope);
    }
    Ok(envelopes)
}

/// Encode a message collection into its envelope collection.
///
/// Two-phase: the whole collection is checked against the registry before
/// any envelope is built, so a failure never leaves partial output. Each
/// payload is canonicalized after encoding, keeping the persisted form
/// diff-stable across backends. Entries are processed in sorted key order.
pub fn encode_collection(
    registry: &MessageRegistry,
    messages: &MessageCollection,
) -> Result<EnvelopeCollection> {
    check_message_collection(registry, messages)?;

    let mut envelopes = EnvelopeCollection::new();
    for (key, message) in messages {
        let envelope =
            envelope::encode(message).map_err(|err| CodecError::from_entry(key, err))?;
        envelopes.insert(
            key.clone(),
            Envelope {
                type_name: envelope.type_name,
                payload: canonicalize_tree(envelope.payload),
            },
        );
    }
    Ok(envelopes)
}

/// Decode a generic envelope-collection document into typed messages.
///
/// Two-phase: shape validation fully precedes decoding, so no message is
/// constructed from a document that is malformed anywhere. Decode failures
/// carry the entry key and the raw type string; the first failure aborts
/// the whole call.
pub fn decode_collection(
    registry: &MessageRegistry,
    document: &Tree,
) -> Result<MessageCollection> {
    let envelopes = check_envelope_shape(document)?;

    let mut messages = MessageCollection::new();
    for (key, envelope) in &envelopes {
        let message = envelope::decode(registry, envelope)
            .map_err(|err| CodecError::from_entry(key, err))?;
        messages.insert(key.clone(), message);
    }
    Ok(messages)
}
