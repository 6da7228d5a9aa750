//! ---
//! rmx_section: "03-persistence-logging"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Persistence bindings for collection files and parameter namespaces."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
//! Persistence collaborators for RMX.
//!
//! Everything here moves already-shaped generic trees between the process
//! and the outside world — collection files on disk and parameter
//! namespaces behind a store backend. Structural validation and typed
//! conversion stay in `rmx-codec`; this crate only handles serialization
//! syntax and transport.

#![warn(missing_docs)]

/// Result alias used throughout the persistence crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for the persistence subsystem.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Wrapper for IO errors encountered while reading/writing files or sockets.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Wrapper for YAML serialization issues.
    #[error("yaml serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Wrapper for JSON serialization issues.
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Reported when a loaded document's top level is not a mapping.
    #[error("document root is not a mapping")]
    RootNotMapping,
    /// Reported when a parameter store backend cannot be reached.
    #[error("parameter store unreachable: {0}")]
    NotConnected(String),
    /// Reported when the coordinating process breaks the wire protocol.
    #[error("parameter store protocol violation: {0}")]
    Protocol(String),
    /// Reported when the coordinating process rejects a request.
    #[error("parameter store rejected the request: {0}")]
    Remote(String),
    /// Reported when a namespace holds no parameters.
    #[error("namespace {0:?} holds no parameters")]
    MissingNamespace(String),
    /// Reported when a namespace path is syntactically unusable.
    #[error("invalid namespace {0:?}")]
    InvalidNamespace(String),
}

pub mod file;
pub mod param;

pub use file::{load_tree, save_tree};
pub use param::{InMemoryParamStore, ParamStore, TcpParamStore};
