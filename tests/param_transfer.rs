//! ---
//! rmx_section: "15-testing-qa-runbook"
//! rmx_subsection: "integration-tests"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "End-to-end pipeline tests: typed collections through a parameter store."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use rmx_codec::{collection_to_tree, decode_collection, encode_collection, MessageCollection};
use rmx_msg::catalog::{Bool, Int32};
use rmx_msg::{DynMessage, MessageRegistry};
use rmx_store::{InMemoryParamStore, ParamStore};

fn sample_collection() -> MessageCollection {
    let mut messages = MessageCollection::new();
    messages.insert("armed".to_owned(), DynMessage::new(Bool { data: true }));
    messages.insert(
        "retry_budget".to_owned(),
        DynMessage::new(Int32 { data: 3 }),
    );
    messages
}

#[test]
fn collections_survive_the_parameter_store_boundary() {
    let registry = MessageRegistry::with_builtins();
    let store = InMemoryParamStore::new();
    let messages = sample_collection();

    let envelopes = encode_collection(&registry, &messages).expect("encode");
    store
        .set_tree("fleet/alpha/params", &collection_to_tree(&envelopes))
        .expect("push");

    let document = store
        .get_tree("fleet/alpha/params")
        .expect("pull")
        .expect("namespace present");
    let decoded = decode_collection(&registry, &document).expect("decode");

    assert_eq!(decoded, messages);
}

#[test]
fn namespaces_are_independent() {
    let registry = MessageRegistry::with_builtins();
    let store = InMemoryParamStore::new();

    let envelopes = encode_collection(&registry, &sample_collection()).expect("encode");
    let document = collection_to_tree(&envelopes);
    store.set_tree("fleet/alpha/params", &document).expect("push alpha");
    store.set_tree("fleet/beta/params", &document).expect("push beta");

    assert!(store.delete("fleet/alpha/params").expect("delete alpha"));
    assert_eq!(store.get_tree("fleet/alpha/params").expect("get"), None);
    assert!(store
        .get_tree("fleet/beta/params")
        .expect("get")
        .is_some());
}
