//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Schema trait implemented by concrete message structs."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kind::MessageKind;

/// A concrete message schema.
///
/// Implementors are plain serde structs whose field layout IS the payload
/// tree layout. `BASE_NAME` is the `package/Name` identifier resolved by the
/// registry; request and response types of a service pair share one base
/// name and differ only in `KIND`.
///
/// Base names must not themselves end in `"Request"` or `"Response"`: the
/// stored type string is `BASE_NAME` plus the kind suffix, and decoding
/// strips suffixes blindly from the tail. A base name with a trailing kind
/// word would be stripped too far and must be registered under its stripped
/// form instead.
pub trait Schema:
    Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + 'static
{
    /// Base schema name, e.g. `"std_msgs/Float32"`.
    const BASE_NAME: &'static str;

    /// Kind of the schema; plain messages by default.
    const KIND: MessageKind = MessageKind::Message;

    /// Full stored type name, kind suffix included.
    fn type_name() -> String {
        Self::KIND.full_name(Self::BASE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Probe {
        value: i32,
    }

    impl Schema for Probe {
        const BASE_NAME: &'static str = "test_msgs/Probe";
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct ProbeRequest {
        id: u32,
    }

    impl Schema for ProbeRequest {
        const BASE_NAME: &'static str = "test_msgs/Probe";
        const KIND: MessageKind = MessageKind::Request;
    }

    #[test]
    fn type_names_carry_the_kind_suffix() {
        assert_eq!(Probe::type_name(), "test_msgs/Probe");
        assert_eq!(ProbeRequest::type_name(), "test_msgs/ProbeRequest");
    }
}
