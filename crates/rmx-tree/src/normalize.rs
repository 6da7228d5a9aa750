//! ---
//! rmx_section: "02-messaging-ipc-data-model"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Canonical leaf normalization for persisted payload trees."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use crate::value::{Tree, TreeValue};

/// Rewrite a value into its canonical persisted form.
///
/// Nested mappings are walked recursively; a byte leaf holding valid UTF-8
/// becomes a text leaf. Everything else — booleans, numbers, text, and
/// sequences (including their contents) — passes through unchanged. The
/// transform is pure: it consumes its input and returns a new value, never
/// mutating shared state. Applying it twice yields the same result as once.
pub fn canonicalize(value: TreeValue) -> TreeValue {
    match value {
        TreeValue::Map(tree) => TreeValue::Map(canonicalize_tree(tree)),
        TreeValue::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => TreeValue::Text(text),
            Err(err) => TreeValue::Bytes(err.into_bytes()),
        },
        other => other,
    }
}

/// Canonicalize every entry of a mapping, preserving keys.
pub fn canonicalize_tree(tree: Tree) -> Tree {
    tree.into_iter()
        .map(|(key, value)| (key, canonicalize(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_byte_leaves_become_text() {
        let mut tree = Tree::new();
        tree.insert("frame_id".to_owned(), TreeValue::Bytes(b"base_link".to_vec()));
        tree.insert("count".to_owned(), TreeValue::Int(3));

        let canonical = canonicalize_tree(tree);
        assert_eq!(
            canonical.get("frame_id"),
            Some(&TreeValue::Text("base_link".to_owned()))
        );
        assert_eq!(canonical.get("count"), Some(&TreeValue::Int(3)));
    }

    #[test]
    fn nested_mappings_are_walked() {
        let mut inner = Tree::new();
        inner.insert("label".to_owned(), TreeValue::Bytes(b"left_arm".to_vec()));
        let mut tree = Tree::new();
        tree.insert("meta".to_owned(), TreeValue::Map(inner));

        let canonical = canonicalize_tree(tree);
        let meta = canonical
            .get("meta")
            .and_then(TreeValue::as_map)
            .expect("meta survives");
        assert_eq!(
            meta.get("label"),
            Some(&TreeValue::Text("left_arm".to_owned()))
        );
    }

    #[test]
    fn sequences_pass_through_unchanged() {
        let mut tree = Tree::new();
        tree.insert(
            "blobs".to_owned(),
            TreeValue::Seq(vec![TreeValue::Bytes(b"raw".to_vec())]),
        );

        let canonical = canonicalize_tree(tree.clone());
        assert_eq!(canonical, tree);
    }

    #[test]
    fn invalid_utf8_bytes_pass_through() {
        let mut tree = Tree::new();
        tree.insert("blob".to_owned(), TreeValue::Bytes(vec![0xff, 0xfe]));

        let canonical = canonicalize_tree(tree.clone());
        assert_eq!(canonical, tree);
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let mut inner = Tree::new();
        inner.insert("name".to_owned(), TreeValue::Bytes(b"lidar".to_vec()));
        inner.insert("blob".to_owned(), TreeValue::Bytes(vec![0x80]));
        let mut tree = Tree::new();
        tree.insert("sensor".to_owned(), TreeValue::Map(inner));
        tree.insert("rate".to_owned(), TreeValue::Float(12.5));

        let once = canonicalize_tree(tree);
        let twice = canonicalize_tree(once.clone());
        assert_eq!(once, twice);
    }
}
