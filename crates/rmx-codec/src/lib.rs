//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Envelope codec and collection transcoder between typed messages and generic trees."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
//! The RMX conversion core.
//!
//! [`envelope`] wraps single typed messages into `{type, payload}` envelopes
//! and back; [`collection`] applies the envelope codec across a whole named
//! collection with up-front shape validation and canonical leaf
//! normalization. Both directions are all-or-nothing: one bad entry aborts
//! the call and no partial result is ever observable.
//!
//! This crate performs no I/O and never logs; every failure surfaces as a
//! typed [`CodecError`] carrying the offending collection key.

#![warn(missing_docs)]

use std::fmt;

pub mod collection;
pub mod envelope;

/// Shared result type for collection-level codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// The specific structural rule an envelope violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRule {
    /// The entry value is not a mapping at all.
    EntryNotMapping,
    /// The entry mapping's key set is not exactly `{type, payload}`.
    WrongKeySet,
    /// The `type` field is not a text leaf.
    TypeNotText,
    /// The `type` field is an empty string.
    TypeEmpty,
    /// The `payload` field is not a mapping.
    PayloadNotMapping,
}

impl fmt::Display for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShapeRule::EntryNotMapping => "entry is not a mapping",
            ShapeRule::WrongKeySet => "entry keys must be exactly {type, payload}",
            ShapeRule::TypeNotText => "type field must be a string",
            ShapeRule::TypeEmpty => "type field must not be empty",
            ShapeRule::PayloadNotMapping => "payload field must be a mapping",
        };
        f.write_str(text)
    }
}

/// Error type for collection-level operations.
///
/// Single-entry failures from the envelope codec are tagged with their
/// collection key on the way out; see [`envelope::EnvelopeError`] for the
/// untagged form.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A message failed to render into its payload tree.
    #[error("failed to encode entry {key:?} ({type_name}): {source}")]
    Encode {
        /// Collection key of the failing entry.
        key: String,
        /// Full type name of the message that failed.
        type_name: String,
        /// Underlying registry failure.
        #[source]
        source: rmx_msg::RegistryError,
    },
    /// An envelope failed to decode back into a typed message.
    #[error("failed to decode entry {key:?} with type {type_name:?}: {source}")]
    Decode {
        /// Collection key of the failing entry.
        key: String,
        /// Raw type string from the envelope.
        type_name: String,
        /// Underlying registry failure.
        #[source]
        source: rmx_msg::RegistryError,
    },
    /// An entry violated the envelope shape contract.
    #[error("malformed envelope at entry {key:?}: {rule}")]
    MalformedEnvelope {
        /// Collection key of the failing entry.
        key: String,
        /// The specific rule broken.
        rule: ShapeRule,
    },
    /// A collection value is not a message the registry recognizes.
    #[error("entry {key:?} is not a registered message")]
    TypeMismatch {
        /// Collection key of the failing entry.
        key: String,
    },
}

impl CodecError {
    /// Tag a single-entry failure with its collection key.
    fn from_entry(key: &str, err: envelope::EnvelopeError) -> Self {
        match err {
            envelope::EnvelopeError::Encode { type_name, source } => CodecError::Encode {
                key: key.to_owned(),
                type_name,
                source,
            },
            envelope::EnvelopeError::Decode { type_name, source } => CodecError::Decode {
                key: key.to_owned(),
                type_name,
                source,
            },
            envelope::EnvelopeError::Malformed(rule) => CodecError::MalformedEnvelope {
                key: key.to_owned(),
                rule,
            },
        }
    }

    /// The collection key the error is tagged with.
    pub fn key(&self) -> &str {
        match self {
            CodecError::Encode { key, .. }
            | CodecError::Decode { key, .. }
            | CodecError::MalformedEnvelope { key, .. }
            | CodecError::TypeMismatch { key } => key,
        }
    }
}

pub use collection::{
    check_envelope_shape, collection_to_tree, decode_collection, encode_collection,
    EnvelopeCollection, MessageCollection,
};
pub use envelope::{decode, encode, resolve_type_name, Envelope, EnvelopeError};
