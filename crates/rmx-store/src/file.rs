//! ---
//! rmx_section: "03-persistence-logging"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Collection file reading and writing."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use rmx_tree::{Tree, TreeValue};
use tracing::debug;

use crate::{Result, StoreError};

/// Persist a generic document to the provided filesystem path.
///
/// The serializer is selected by file extension: `.json` writes pretty
/// JSON, all other extensions default to YAML. Missing parent directories
/// are created.
pub fn save_tree(document: &Tree, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.write_all(b"\n")?;
        }
        _ => {
            serde_yaml::to_writer(&mut writer, document)?;
        }
    }
    writer.flush()?;
    debug!(path = %path.display(), entries = document.len(), "document saved");
    Ok(())
}

/// Load a generic document from disk.
///
/// The parser is selected by file extension, mirroring [`save_tree`]. The
/// top level must be a mapping; anything else cannot be a persisted
/// collection and is rejected before any shape validation runs.
pub fn load_tree(path: &Path) -> Result<Tree> {
    let raw = fs::read_to_string(path)?;
    let value: TreeValue = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw)?,
        _ => serde_yaml::from_str(&raw)?,
    };
    debug!(path = %path.display(), "document loaded");
    match value {
        TreeValue::Map(tree) => Ok(tree),
        _ => Err(StoreError::RootNotMapping),
    }
}
