//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Type-erased message values and the message-to-tree bridge."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::any::Any;
use std::fmt;

use rmx_tree::{Tree, TreeValue};

use crate::kind::MessageKind;
use crate::schema::Schema;
use crate::RegistryError;

/// Object-safe view of a schema value held behind a [`DynMessage`].
trait ErasedMessage: fmt::Debug + Send {
    fn base_name(&self) -> &'static str;
    fn kind(&self) -> MessageKind;
    fn to_tree(&self) -> crate::Result<Tree>;
    fn clone_erased(&self) -> Box<dyn ErasedMessage>;
    fn as_any(&self) -> &dyn Any;
}

impl<M: Schema> ErasedMessage for M {
    fn base_name(&self) -> &'static str {
        M::BASE_NAME
    }

    fn kind(&self) -> MessageKind {
        M::KIND
    }

    fn to_tree(&self) -> crate::Result<Tree> {
        encode_to_tree(self)
    }

    fn clone_erased(&self) -> Box<dyn ErasedMessage> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Render a schema value into its payload tree via serde.
fn encode_to_tree<M: Schema>(message: &M) -> crate::Result<Tree> {
    let json = serde_json::to_value(message).map_err(|source| RegistryError::Encode {
        type_name: M::type_name(),
        source,
    })?;
    match TreeValue::from_json(json) {
        Ok(TreeValue::Map(tree)) => Ok(tree),
        Ok(_) => Err(RegistryError::NotAMapping {
            type_name: M::type_name(),
        }),
        Err(source) => Err(RegistryError::Tree {
            type_name: M::type_name(),
            source,
        }),
    }
}

/// An opaque typed message.
///
/// Wraps any [`Schema`] value behind a uniform handle that knows its type
/// name and can render itself into a payload tree. Collections hold these;
/// the codec never inspects the concrete type.
#[derive(Debug)]
pub struct DynMessage(Box<dyn ErasedMessage>);

impl DynMessage {
    /// Erase a concrete schema value.
    pub fn new<M: Schema>(message: M) -> Self {
        Self(Box::new(message))
    }

    /// Base schema name, without any kind suffix.
    pub fn base_name(&self) -> &'static str {
        self.0.base_name()
    }

    /// Kind of the wrapped message.
    pub fn kind(&self) -> MessageKind {
        self.0.kind()
    }

    /// Full stored type name, kind suffix included.
    pub fn type_name(&self) -> String {
        self.kind().full_name(self.base_name())
    }

    /// Render the message into its payload tree.
    pub fn to_tree(&self) -> crate::Result<Tree> {
        self.0.to_tree()
    }

    /// Borrow the concrete schema value, if it has type `M`.
    pub fn downcast_ref<M: Schema>(&self) -> Option<&M> {
        self.0.as_any().downcast_ref::<M>()
    }

    /// True when the wrapped value has type `M`.
    pub fn is<M: Schema>(&self) -> bool {
        self.downcast_ref::<M>().is_some()
    }
}

impl Clone for DynMessage {
    fn clone(&self) -> Self {
        Self(self.0.clone_erased())
    }
}

/// Structural equality: same type name and identical payload trees.
///
/// Messages that fail to render compare unequal rather than panicking; an
/// unencodable message is never equal to anything, itself included.
impl PartialEq for DynMessage {
    fn eq(&self, other: &Self) -> bool {
        if self.base_name() != other.base_name() || self.kind() != other.kind() {
            return false;
        }
        match (self.to_tree(), other.to_tree()) {
            (Ok(left), Ok(right)) => left == right,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Pulse {
        rate: f64,
        label: String,
    }

    impl Schema for Pulse {
        const BASE_NAME: &'static str = "test_msgs/Pulse";
    }

    #[test]
    fn dyn_message_reports_identity() {
        let message = DynMessage::new(Pulse {
            rate: 2.5,
            label: "heartbeat".to_owned(),
        });
        assert_eq!(message.base_name(), "test_msgs/Pulse");
        assert_eq!(message.kind(), MessageKind::Message);
        assert_eq!(message.type_name(), "test_msgs/Pulse");
    }

    #[test]
    fn to_tree_renders_fields() {
        let message = DynMessage::new(Pulse {
            rate: 2.5,
            label: "heartbeat".to_owned(),
        });
        let tree = message.to_tree().expect("renders");
        assert_eq!(tree.get("rate"), Some(&TreeValue::Float(2.5)));
        assert_eq!(
            tree.get("label"),
            Some(&TreeValue::Text("heartbeat".to_owned()))
        );
    }

    #[test]
    fn downcast_recovers_the_concrete_value() {
        let original = Pulse {
            rate: 1.0,
            label: "x".to_owned(),
        };
        let message = DynMessage::new(original.clone());
        assert!(message.is::<Pulse>());
        assert_eq!(message.downcast_ref::<Pulse>(), Some(&original));
    }

    #[test]
    fn equality_is_structural() {
        let a = DynMessage::new(Pulse {
            rate: 1.0,
            label: "x".to_owned(),
        });
        let b = a.clone();
        let c = DynMessage::new(Pulse {
            rate: 2.0,
            label: "x".to_owned(),
        });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
