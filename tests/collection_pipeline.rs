//! ---
//! rmx_section: "15-testing-qa-runbook"
//! rmx_subsection: "integration-tests"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "End-to-end pipeline tests: typed collections through files and back."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use rmx_codec::{collection_to_tree, decode_collection, encode_collection, MessageCollection};
use rmx_msg::catalog::{Float32, GetPlanRequest, Point, Pose, PoseStamped};
use rmx_msg::{DynMessage, MessageKind, MessageRegistry};
use rmx_store::{load_tree, save_tree};
use rmx_tree::TreeValue;
use tempfile::tempdir;

fn sample_collection() -> MessageCollection {
    let mut messages = MessageCollection::new();
    messages.insert(
        "cruise_speed".to_owned(),
        DynMessage::new(Float32 { data: 1.5 }),
    );
    messages.insert(
        "home_pose".to_owned(),
        DynMessage::new(PoseStamped::in_frame(
            "map",
            Pose {
                position: Point::new(2.5, -1.0, 0.0),
                ..Pose::default()
            },
        )),
    );
    messages.insert(
        "plan_query".to_owned(),
        DynMessage::new(GetPlanRequest {
            tolerance: 0.5,
            ..GetPlanRequest::default()
        }),
    );
    messages
}

#[test]
fn collections_survive_the_yaml_file_boundary() {
    let registry = MessageRegistry::with_builtins();
    let messages = sample_collection();

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("params.yaml");

    let envelopes = encode_collection(&registry, &messages).expect("encode");
    save_tree(&collection_to_tree(&envelopes), &path).expect("save");

    let document = load_tree(&path).expect("load");
    let decoded = decode_collection(&registry, &document).expect("decode");

    assert_eq!(decoded.len(), messages.len());
    assert_eq!(decoded, messages);
}

#[test]
fn collections_survive_the_json_file_boundary() {
    let registry = MessageRegistry::with_builtins();
    let messages = sample_collection();

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("params.json");

    let envelopes = encode_collection(&registry, &messages).expect("encode");
    save_tree(&collection_to_tree(&envelopes), &path).expect("save");

    let decoded = decode_collection(&registry, &load_tree(&path).expect("load")).expect("decode");
    assert_eq!(decoded, messages);
}

#[test]
fn request_kinds_survive_the_file_boundary() {
    let registry = MessageRegistry::with_builtins();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("params.yaml");

    let envelopes = encode_collection(&registry, &sample_collection()).expect("encode");
    save_tree(&collection_to_tree(&envelopes), &path).expect("save");

    let decoded =
        decode_collection(&registry, &load_tree(&path).expect("load")).expect("decode");
    let query = &decoded["plan_query"];
    assert_eq!(query.kind(), MessageKind::Request);
    assert_eq!(query.base_name(), "nav_msgs/GetPlan");
    assert_eq!(query.type_name(), "nav_msgs/GetPlanRequest");
}

#[test]
fn hand_written_documents_decode() {
    let registry = MessageRegistry::with_builtins();
    let yaml = concat!(
        "cruise_speed:\n",
        "  type: std_msgs/Float32\n",
        "  payload:\n",
        "    data: 1.5\n",
    );
    let document = match serde_yaml::from_str::<TreeValue>(yaml).expect("parse") {
        TreeValue::Map(tree) => tree,
        other => panic!("unexpected root {}", other.kind_name()),
    };

    let decoded = decode_collection(&registry, &document).expect("decode");
    assert_eq!(
        decoded["cruise_speed"].downcast_ref::<Float32>(),
        Some(&Float32 { data: 1.5 })
    );
}

#[test]
fn malformed_files_are_rejected_wholesale() {
    let registry = MessageRegistry::with_builtins();
    let yaml = concat!(
        "good:\n",
        "  type: std_msgs/Float32\n",
        "  payload:\n",
        "    data: 1.0\n",
        "bad:\n",
        "  type: 42\n",
        "  payload: {}\n",
    );
    let document = match serde_yaml::from_str::<TreeValue>(yaml).expect("parse") {
        TreeValue::Map(tree) => tree,
        other => panic!("unexpected root {}", other.kind_name()),
    };

    let err = decode_collection(&registry, &document).expect_err("rejects");
    assert_eq!(err.key(), "bad");
}
