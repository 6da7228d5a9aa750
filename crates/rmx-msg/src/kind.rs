//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Message kind classification and type-name suffix handling."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a typed message.
///
/// `Request` and `Response` carry a fixed suffix appended to the base schema
/// name in the stored type string; plain messages store the base name
/// unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A plain topic message.
    #[default]
    Message,
    /// The request half of a service exchange.
    Request,
    /// The response half of a service exchange.
    Response,
}

impl MessageKind {
    /// The type-name suffix carried by this kind.
    pub const fn suffix(self) -> &'static str {
        match self {
            MessageKind::Message => "",
            MessageKind::Request => "Request",
            MessageKind::Response => "Response",
        }
    }

    /// Build the full stored type name from a base schema name.
    pub fn full_name(self, base: &str) -> String {
        let mut name = String::with_capacity(base.len() + self.suffix().len());
        name.push_str(base);
        name.push_str(self.suffix());
        name
    }

    /// Lowercase label used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::Request => "request",
            MessageKind::Response => "response",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_match_the_stored_form() {
        assert_eq!(MessageKind::Message.suffix(), "");
        assert_eq!(MessageKind::Request.suffix(), "Request");
        assert_eq!(MessageKind::Response.suffix(), "Response");
    }

    #[test]
    fn full_name_appends_the_suffix() {
        assert_eq!(MessageKind::Message.full_name("pkg/Foo"), "pkg/Foo");
        assert_eq!(MessageKind::Request.full_name("pkg/Foo"), "pkg/FooRequest");
        assert_eq!(MessageKind::Response.full_name("pkg/Foo"), "pkg/FooResponse");
    }

    #[test]
    fn display_uses_lowercase_labels() {
        assert_eq!(MessageKind::Request.to_string(), "request");
    }
}
