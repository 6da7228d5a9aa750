//! ---
//! rmx_section: "05-networking-external-interfaces"
//! rmx_subsection: "binary"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Parameter store subcommands for the RMX control CLI."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rmx_codec::check_envelope_shape;
use rmx_common::config::AppConfig;
use rmx_store::{load_tree, save_tree, ParamStore, StoreError, TcpParamStore};
use tracing::info;

/// Dispatch entry point for parameter-store subcommands.
pub fn run(command: ParamCommand, config: &AppConfig) -> Result<()> {
    match command {
        ParamCommand::Push(cmd) => cmd.execute(config),
        ParamCommand::Pull(cmd) => cmd.execute(config),
    }
}

#[derive(Debug, Subcommand)]
pub enum ParamCommand {
    /// Upload a collection file into a parameter namespace.
    #[command(name = "push")]
    Push(PushCommand),
    /// Download a parameter namespace into a collection file.
    #[command(name = "pull")]
    Pull(PullCommand),
}

#[derive(Debug, Args)]
struct Target {
    /// Address of the coordinating parameter-store process.
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
    /// Namespace the collection is rooted under.
    #[arg(long, value_name = "PATH")]
    namespace: Option<String>,
}

impl Target {
    fn connect(&self, config: &AppConfig) -> Result<(TcpParamStore, String)> {
        let addr = self
            .addr
            .clone()
            .unwrap_or_else(|| config.store.param_addr.clone());
        let namespace = self
            .namespace
            .clone()
            .unwrap_or_else(|| config.store.namespace.clone());
        let store = TcpParamStore::connect(addr.as_str())
            .with_context(|| format!("unable to reach parameter store at {addr}"))?;
        Ok((store, namespace))
    }
}

#[derive(Debug, Args)]
pub struct PushCommand {
    /// Collection file to upload.
    #[arg(value_name = "FILE")]
    file: PathBuf,
    #[command(flatten)]
    target: Target,
}

impl PushCommand {
    fn execute(self, config: &AppConfig) -> Result<()> {
        let document = load_tree(&self.file)
            .with_context(|| format!("unable to load collection {}", self.file.display()))?;
        check_envelope_shape(&document)?;

        let (store, namespace) = self.target.connect(config)?;
        store.set_tree(&namespace, &document)?;
        info!(peer = store.peer(), namespace = %namespace, entries = document.len(), "collection pushed");
        println!(
            "pushed {} entries to {} under {namespace:?}",
            document.len(),
            store.peer()
        );
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct PullCommand {
    /// File the downloaded collection is written to.
    #[arg(value_name = "FILE")]
    file: PathBuf,
    #[command(flatten)]
    target: Target,
}

impl PullCommand {
    fn execute(self, config: &AppConfig) -> Result<()> {
        let (store, namespace) = self.target.connect(config)?;
        let document = store
            .get_tree(&namespace)?
            .ok_or_else(|| StoreError::MissingNamespace(namespace.clone()))?;
        check_envelope_shape(&document)?;

        save_tree(&document, &self.file)
            .with_context(|| format!("unable to write {}", self.file.display()))?;
        info!(peer = store.peer(), namespace = %namespace, entries = document.len(), "collection pulled");
        println!(
            "pulled {} entries from {} under {namespace:?}",
            document.len(),
            store.peer()
        );
        Ok(())
    }
}
