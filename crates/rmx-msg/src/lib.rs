//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Typed message schemas, dynamic message values, and the type registry."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
//! Message data model for RMX.
//!
//! Concrete schema structs implement [`Schema`]; [`DynMessage`] erases them
//! into uniform values a collection can hold; [`MessageRegistry`] resolves
//! `(base name, kind)` pairs back to concrete types when trees are decoded.

#![warn(missing_docs)]

pub mod catalog;
pub mod dynamic;
pub mod kind;
pub mod registry;
pub mod schema;

/// Shared result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Error type for the message registry and the message<->tree bridge.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Raised when no schema is registered for a base name and kind.
    #[error("unknown schema {base:?} ({kind})")]
    UnknownSchema {
        /// Base schema name that failed to resolve.
        base: String,
        /// Kind requested for the base name.
        kind: kind::MessageKind,
    },
    /// Raised when the same base name and kind is registered twice.
    #[error("schema {base:?} ({kind}) is already registered")]
    DuplicateSchema {
        /// Base schema name of the rejected registration.
        base: &'static str,
        /// Kind of the rejected registration.
        kind: kind::MessageKind,
    },
    /// Raised when a message value cannot be rendered into a tree.
    #[error("failed to encode {type_name:?}: {source}")]
    Encode {
        /// Full type name of the message being encoded.
        type_name: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
    /// Raised when a tree cannot be read back into the schema struct.
    #[error("failed to decode {type_name:?}: {source}")]
    Decode {
        /// Full type name of the message being decoded.
        type_name: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
    /// Raised when a message renders to something other than a mapping.
    #[error("message {type_name:?} did not encode to a mapping")]
    NotAMapping {
        /// Full type name of the offending message.
        type_name: String,
    },
    /// Raised when a tree leaf cannot cross the serde bridge.
    #[error("tree conversion failed for {type_name:?}: {source}")]
    Tree {
        /// Full type name of the message involved.
        type_name: String,
        /// Underlying tree conversion failure.
        #[source]
        source: rmx_tree::TreeError,
    },
}

pub use dynamic::DynMessage;
pub use kind::MessageKind;
pub use registry::MessageRegistry;
pub use schema::Schema;
