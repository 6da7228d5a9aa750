//! ---
//! rmx_section: "05-networking-external-interfaces"
//! rmx_subsection: "binary"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Control CLI for administrators interacting with RMX collections."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rmx_common::config::AppConfig;
use rmx_common::logging::init_tracing;

mod file_cmd;
mod param_cmd;

const CONFIG_CANDIDATES: &[&str] = &["configs/rmx.toml", "/etc/rmx/rmx.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "RMX administrative control utility",
    long_about = None
)]
struct Cli {
    /// Path to the rmxctl configuration file.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand, about = "Operations on persisted collection files")]
    File(file_cmd::FileCommand),
    #[command(subcommand, about = "Operations against a live parameter store")]
    Param(param_cmd::ParamCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(&[path])?,
        None => AppConfig::load_or_default(CONFIG_CANDIDATES)?.config,
    };
    init_tracing("rmxctl", &config.logging)?;

    match cli.command {
        Commands::File(cmd) => file_cmd::run(cmd, &config)?,
        Commands::Param(cmd) => param_cmd::run(cmd, &config)?,
    }
    Ok(())
}
