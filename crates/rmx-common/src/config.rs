//! ---
//! rmx_section: "01-core-functionality"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Configuration loading for RMX tooling."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_collection_path() -> PathBuf {
    PathBuf::from("res/params.yaml")
}

fn default_param_addr() -> String {
    "127.0.0.1:11411".to_owned()
}

fn default_namespace() -> String {
    "rmx/params".to_owned()
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for RMX tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persistence defaults.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging sink configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for persistence targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Collection file used when no path is given on the command line.
    #[serde(default = "default_collection_path")]
    pub collection_path: PathBuf,
    /// Address of the coordinating parameter-store process.
    #[serde(default = "default_param_addr")]
    pub param_addr: String,
    /// Namespace parameters are rooted under.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection_path: default_collection_path(),
            param_addr: default_param_addr(),
            namespace: default_namespace(),
        }
    }
}

/// Logging sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory rolling log files are written into.
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    /// Optional file name prefix; the service name is used when unset.
    #[serde(default)]
    pub file_prefix: Option<String>,
    /// Stdout log format.
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            file_prefix: None,
            format: default_log_format(),
        }
    }
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    /// The parsed configuration.
    pub config: AppConfig,
    /// Path the configuration was read from, if any file was found.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    /// Environment variable overriding the configuration path.
    pub const ENV_CONFIG_PATH: &'static str = "RMX_CONFIG";

    /// Load configuration from disk, respecting the `RMX_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Load configuration like [`AppConfig::load`], falling back to builtin
    /// defaults when no candidate file exists. A file that exists but fails
    /// to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        match Self::load_with_source(candidates) {
            Ok(loaded) => Ok(loaded),
            Err(_) if !Self::any_candidate_present(candidates) => Ok(LoadedAppConfig {
                config: Self::default(),
                source: None,
            }),
            Err(err) => Err(err),
        }
    }

    fn any_candidate_present<P: AsRef<Path>>(candidates: &[P]) -> bool {
        std::env::var(Self::ENV_CONFIG_PATH)
            .map(|path| !path.trim().is_empty())
            .unwrap_or(false)
            || candidates.iter().any(|p| p.as_ref().exists())
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.store
            .param_addr
            .parse::<SocketAddr>()
            .map_err(|err| anyhow!("invalid store.param_addr {:?}: {err}", self.store.param_addr))?;
        if self.store.namespace.trim_matches('/').is_empty() {
            return Err(anyhow!("store.namespace must not be empty"));
        }
        Ok(())
    }
}
