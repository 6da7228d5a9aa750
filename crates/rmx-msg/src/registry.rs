//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Registry resolving base names and kinds to schema decoders."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::collections::BTreeMap;

use rmx_tree::{Tree, TreeValue};

use crate::catalog;
use crate::dynamic::DynMessage;
use crate::kind::MessageKind;
use crate::schema::Schema;
use crate::RegistryError;

type DecodeFn = fn(&Tree) -> crate::Result<DynMessage>;

fn decode_entry<M: Schema>(tree: &Tree) -> crate::Result<DynMessage> {
    let json = TreeValue::Map(tree.clone())
        .to_json()
        .map_err(|source| RegistryError::Tree {
            type_name: M::type_name(),
            source,
        })?;
    let message: M = serde_json::from_value(json).map_err(|source| RegistryError::Decode {
        type_name: M::type_name(),
        source,
    })?;
    Ok(DynMessage::new(message))
}

/// Resolves `(base name, kind)` pairs to concrete schema decoders.
///
/// Registration is explicit; decoding an unregistered pair fails with
/// [`RegistryError::UnknownSchema`]. The registry holds no message state —
/// only function pointers — so shared references are cheap and reentrant.
#[derive(Default)]
pub struct MessageRegistry {
    decoders: BTreeMap<(String, MessageKind), DecodeFn>,
}

impl MessageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with the builtin schema catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        catalog::register_builtins(&mut registry)
            .expect("builtin catalog registers without collisions");
        registry
    }

    /// Register schema `M` under its base name and kind.
    pub fn register<M: Schema>(&mut self) -> crate::Result<()> {
        let key = (M::BASE_NAME.to_owned(), M::KIND);
        if self.decoders.contains_key(&key) {
            return Err(RegistryError::DuplicateSchema {
                base: M::BASE_NAME,
                kind: M::KIND,
            });
        }
        self.decoders.insert(key, decode_entry::<M>);
        Ok(())
    }

    /// True when a decoder exists for the pair.
    pub fn contains(&self, base: &str, kind: MessageKind) -> bool {
        self.decoders.contains_key(&(base.to_owned(), kind))
    }

    /// Decode a payload tree into the schema registered for the pair.
    pub fn decode(&self, base: &str, kind: MessageKind, tree: &Tree) -> crate::Result<DynMessage> {
        let decode = self
            .decoders
            .get(&(base.to_owned(), kind))
            .ok_or_else(|| RegistryError::UnknownSchema {
                base: base.to_owned(),
                kind,
            })?;
        decode(tree)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Full type names of every registered schema, in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = String> + '_ {
        self.decoders
            .keys()
            .map(|(base, kind)| kind.full_name(base))
    }
}
