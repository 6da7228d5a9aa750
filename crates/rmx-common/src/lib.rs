//! ---
//! rmx_section: "01-core-functionality"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Shared primitives and utilities for RMX tooling."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
//! Shared runtime support for RMX binaries: configuration loading and
//! tracing initialisation. The conversion crates stay free of both — only
//! tooling entry points pull this in.

pub mod config;
pub mod logging;

pub use config::{AppConfig, LoggingConfig, StoreConfig};
pub use logging::{init_tracing, LogFormat};
