//! ---
//! rmx_section: "03-persistence-logging"
//! rmx_subsection: "module"
//! rmx_type: "source"
//! rmx_scope: "code"
//! rmx_description: "Parameter store backends for namespace-addressed trees."
//! rmx_version: "v0.0.0-prealpha"
//! rmx_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rmx_tree::{Tree, TreeValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, StoreError};

/// Parameter store abstraction used by all namespace backends.
///
/// Backends move whole trees under slash-separated namespace paths; they
/// never look inside the tree. Set/get/delete semantics and any waiting
/// live entirely behind this trait.
pub trait ParamStore: Send + Sync {
    /// Store a tree under the namespace, replacing any previous value.
    fn set_tree(&self, namespace: &str, tree: &Tree) -> Result<()>;
    /// Fetch the tree stored under the namespace, if any.
    fn get_tree(&self, namespace: &str) -> Result<Option<Tree>>;
    /// Remove the namespace; reports whether anything was removed.
    fn delete(&self, namespace: &str) -> Result<bool>;
    /// Human-readable backend name for logging.
    fn name(&self) -> &'static str;
}

/// Canonicalize a namespace path: strip surrounding slashes, reject empty
/// paths and empty segments.
pub fn normalize_namespace(namespace: &str) -> Result<String> {
    let trimmed = namespace.trim_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(|segment| segment.is_empty()) {
        return Err(StoreError::InvalidNamespace(namespace.to_owned()));
    }
    Ok(trimmed.to_owned())
}

/// In-memory parameter store backed by a mutex protected map.
///
/// Primarily for tests and single-process integration; clones share the
/// same underlying namespace table.
#[derive(Clone, Default)]
pub struct InMemoryParamStore {
    params: Arc<Mutex<BTreeMap<String, Tree>>>,
}

impl InMemoryParamStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of namespaces currently held.
    pub fn len(&self) -> usize {
        self.params.lock().expect("params poisoned").len()
    }

    /// True when no namespace is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ParamStore for InMemoryParamStore {
    fn set_tree(&self, namespace: &str, tree: &Tree) -> Result<()> {
        let namespace = normalize_namespace(namespace)?;
        let mut params = self.params.lock().expect("params poisoned");
        params.insert(namespace, tree.clone());
        Ok(())
    }

    fn get_tree(&self, namespace: &str) -> Result<Option<Tree>> {
        let namespace = normalize_namespace(namespace)?;
        let params = self.params.lock().expect("params poisoned");
        Ok(params.get(&namespace).cloned())
    }

    fn delete(&self, namespace: &str) -> Result<bool> {
        let namespace = normalize_namespace(namespace)?;
        let mut params = self.params.lock().expect("params poisoned");
        Ok(params.remove(&namespace).is_some())
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

/// One request line sent to the coordinating process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ParamRequest {
    /// Replace the tree stored under `path`.
    Set {
        /// Normalized namespace path.
        path: String,
        /// The tree to store.
        value: TreeValue,
    },
    /// Fetch the tree stored under `path`.
    Get {
        /// Normalized namespace path.
        path: String,
    },
    /// Remove the tree stored under `path`.
    Delete {
        /// Normalized namespace path.
        path: String,
    },
}

/// One response line received from the coordinating process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParamResponse {
    /// The request succeeded; `value` carries the result, if any.
    Ok {
        /// Result payload: the fetched tree for `get`, a boolean for
        /// `delete`, absent for `set`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<TreeValue>,
    },
    /// The coordinating process rejected the request.
    Error {
        /// Human-readable rejection reason.
        message: String,
    },
}

/// Parameter store client speaking line-delimited JSON to a coordinating
/// process over TCP.
///
/// Connecting requires the coordinator to be live; every operation is one
/// request/response exchange on the shared connection. The client owns the
/// socket behind a mutex, so a shared reference is usable from several
/// threads with operations serialized per connection.
#[derive(Debug)]
pub struct TcpParamStore {
    peer: String,
    channel: Mutex<BufReader<TcpStream>>,
}

impl TcpParamStore {
    /// Connect to the coordinating process.
    ///
    /// Fails eagerly with [`StoreError::NotConnected`] when no coordinator
    /// is listening; the file-based path has no such requirement.
    pub fn connect(addr: impl ToSocketAddrs + std::fmt::Display) -> Result<Self> {
        let stream = TcpStream::connect(&addr)
            .map_err(|err| StoreError::NotConnected(format!("{addr}: {err}")))?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(Duration::from_secs(10)))?;
        debug!(peer = %addr, "parameter store connected");
        Ok(Self {
            peer: addr.to_string(),
            channel: Mutex::new(BufReader::new(stream)),
        })
    }

    /// Address of the coordinating process this client talks to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    fn exchange(&self, request: &ParamRequest) -> Result<ParamResponse> {
        let mut channel = self.channel.lock().expect("channel poisoned");

        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        channel.get_mut().write_all(line.as_bytes())?;
        channel.get_mut().flush()?;

        let mut reply = String::new();
        let read = channel.read_line(&mut reply)?;
        if read == 0 {
            return Err(StoreError::Protocol(
                "connection closed by coordinator".to_owned(),
            ));
        }
        serde_json::from_str(reply.trim_end())
            .map_err(|err| StoreError::Protocol(format!("unparseable response: {err}")))
    }
}

impl ParamStore for TcpParamStore {
    fn set_tree(&self, namespace: &str, tree: &Tree) -> Result<()> {
        let path = normalize_namespace(namespace)?;
        let request = ParamRequest::Set {
            path,
            value: TreeValue::Map(tree.clone()),
        };
        match self.exchange(&request)? {
            ParamResponse::Ok { .. } => {
                debug!(peer = %self.peer, namespace, "namespace updated");
                Ok(())
            }
            ParamResponse::Error { message } => Err(StoreError::Remote(message)),
        }
    }

    fn get_tree(&self, namespace: &str) -> Result<Option<Tree>> {
        let path = normalize_namespace(namespace)?;
        match self.exchange(&ParamRequest::Get { path })? {
            ParamResponse::Ok { value: None } => Ok(None),
            ParamResponse::Ok {
                value: Some(TreeValue::Map(tree)),
            } => Ok(Some(tree)),
            ParamResponse::Ok { value: Some(other) } => Err(StoreError::Protocol(format!(
                "namespace value must be a mapping, got {}",
                other.kind_name()
            ))),
            ParamResponse::Error { message } => Err(StoreError::Remote(message)),
        }
    }

    fn delete(&self, namespace: &str) -> Result<bool> {
        let path = normalize_namespace(namespace)?;
        match self.exchange(&ParamRequest::Delete { path })? {
            ParamResponse::Ok {
                value: Some(TreeValue::Bool(existed)),
            } => Ok(existed),
            ParamResponse::Ok { value: None } => Ok(false),
            ParamResponse::Ok { value: Some(other) } => Err(StoreError::Protocol(format!(
                "delete result must be a boolean, got {}",
                other.kind_name()
            ))),
            ParamResponse::Error { message } => Err(StoreError::Remote(message)),
        }
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}
