//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Generic string-keyed tree values exchanged with persistence backends."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
//! Generic tree values for RMX.
//!
//! A [`Tree`] is the untyped, string-keyed nested representation understood
//! by every persistence backend (collection files, parameter namespaces).
//! Typed messages are rendered into trees before they leave the process and
//! reconstructed from trees when they come back.

#![warn(missing_docs)]

pub mod interop;
pub mod normalize;
pub mod value;

/// Shared result type for tree conversions.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Error type for tree construction and interop.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Raised when an unsigned integer does not fit the signed leaf range.
    #[error("integer value {0} exceeds the representable range")]
    IntRange(u64),
    /// Raised when a document contains a null where a leaf value is required.
    #[error("null values cannot be represented in a tree")]
    Null,
    /// Raised when a float leaf cannot be expressed in the target format.
    #[error("non-finite float value {0} cannot be represented")]
    NonFiniteFloat(f64),
}

pub use normalize::{canonicalize, canonicalize_tree};
pub use value::{Tree, TreeValue};
