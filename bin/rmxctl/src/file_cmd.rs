//! ---
//! rmx_section: "05-networking-external-interfaces"
//! rmx_subsection: "binary"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Collection file subcommands for the RMX control CLI."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rmx_codec::{check_envelope_shape, collection_to_tree, decode_collection, encode_collection};
use rmx_common::config::AppConfig;
use rmx_msg::MessageRegistry;
use rmx_store::{load_tree, save_tree};
use tracing::info;

/// Dispatch entry point for file-related subcommands.
pub fn run(command: FileCommand, config: &AppConfig) -> Result<()> {
    match command {
        FileCommand::Check(cmd) => cmd.execute(config),
        FileCommand::Convert(cmd) => cmd.execute(),
        FileCommand::Roundtrip(cmd) => cmd.execute(config),
    }
}

#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Validate the envelope shape of a collection file.
    #[command(name = "check")]
    Check(CheckCommand),
    /// Rewrite a collection file in the format implied by the output extension.
    #[command(name = "convert")]
    Convert(ConvertCommand),
    /// Decode and re-encode a collection with the builtin registry.
    #[command(name = "roundtrip")]
    Roundtrip(RoundtripCommand),
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Collection file to validate (defaults to the configured path).
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,
}

impl CheckCommand {
    fn execute(self, config: &AppConfig) -> Result<()> {
        let path = effective_path(self.path, config);
        let document = load_tree(&path)
            .with_context(|| format!("unable to load collection {}", path.display()))?;
        let envelopes = check_envelope_shape(&document)?;
        info!(path = %path.display(), entries = envelopes.len(), "collection shape verified");
        println!("{}: {} entries, shape OK", path.display(), envelopes.len());
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ConvertCommand {
    /// Source collection file.
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Destination file; its extension selects the output format.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

impl ConvertCommand {
    fn execute(self) -> Result<()> {
        let document = load_tree(&self.input)
            .with_context(|| format!("unable to load collection {}", self.input.display()))?;
        check_envelope_shape(&document)?;
        save_tree(&document, &self.output)
            .with_context(|| format!("unable to write {}", self.output.display()))?;
        println!(
            "{} -> {} ({} entries)",
            self.input.display(),
            self.output.display(),
            document.len()
        );
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct RoundtripCommand {
    /// Collection file to exercise (defaults to the configured path).
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,
}

impl RoundtripCommand {
    fn execute(self, config: &AppConfig) -> Result<()> {
        let path = effective_path(self.path, config);
        let document = load_tree(&path)
            .with_context(|| format!("unable to load collection {}", path.display()))?;

        let registry = MessageRegistry::with_builtins();
        let messages = decode_collection(&registry, &document)?;
        let reencoded = collection_to_tree(&encode_collection(&registry, &messages)?);

        if reencoded == document {
            println!(
                "{}: {} entries round-trip cleanly",
                path.display(),
                messages.len()
            );
        } else {
            println!(
                "{}: {} entries decode, but the stored form is not canonical",
                path.display(),
                messages.len()
            );
        }
        Ok(())
    }
}

fn effective_path(path: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    path.unwrap_or_else(|| config.store.collection_path.clone())
}
