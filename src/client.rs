//! HTTP client for the knowledge-agent service.
//!
//! `AgentClient` wraps a `ureq::Agent` and the three endpoints the client
//! consumes: `POST /chat`, `GET /health`, and `GET /memory`. All calls are
//! synchronous; the TUI issues them from worker threads so the event loop
//! never blocks on the network.

use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{BackendConfig, ModuleToggles};
use crate::snapshot::MemorySnapshot;

// ---------------------------------------------------------------------------
// Client error
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ClientError {
    #[error("request to {path} failed: {message}")]
    #[diagnostic(
        code(weft::client::request),
        help("Is the agent service running? Check the backend URL in your config.")
    )]
    Request { path: String, message: String },

    #[error("server returned {status} for {path}")]
    #[diagnostic(
        code(weft::client::status),
        help("The service rejected the request. Its logs should say why.")
    )]
    Status { path: String, status: u16 },

    #[error("unexpected response from server: {message}")]
    #[diagnostic(code(weft::client::response), help("Server version mismatch?"))]
    Response { message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

// ---------------------------------------------------------------------------
// Wire contracts
// ---------------------------------------------------------------------------

/// `POST /chat` request body. The module set travels with every turn; the
/// backend decides whether to honor it.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    modules: Vec<&'a str>,
}

/// `POST /chat` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// `GET /health` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    #[serde(default)]
    pub modules_active: Vec<String>,
}

// ---------------------------------------------------------------------------
// AgentClient
// ---------------------------------------------------------------------------

/// HTTP connection to a running agent service.
pub struct AgentClient {
    base_url: String,
    http: ureq::Agent,
}

impl AgentClient {
    /// Build a client from backend settings.
    pub fn new(config: &BackendConfig) -> Self {
        let http = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// The configured base URL (for status displays).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.http.get(&url).call().map_err(|e| map_err(path, e))?;
        resp.into_json().map_err(|e| ClientError::Response {
            message: format!("failed to parse JSON from {path}: {e}"),
        })
    }

    fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .http
            .post(&url)
            .send_json(body)
            .map_err(|e| map_err(path, e))?;
        resp.into_json().map_err(|e| ClientError::Response {
            message: format!("failed to parse JSON from {path}: {e}"),
        })
    }

    /// Probe the service's health endpoint.
    pub fn health(&self) -> ClientResult<HealthCheck> {
        self.get_json("/health")
    }

    /// Post one chat turn, forwarding the enabled-module set.
    pub fn chat(
        &self,
        message: &str,
        session_id: Option<&str>,
        modules: &ModuleToggles,
    ) -> ClientResult<ChatReply> {
        self.post_json(
            "/chat",
            &ChatRequest {
                message,
                session_id,
                modules: modules.enabled_names(),
            },
        )
    }

    /// Fetch the current memory snapshot.
    pub fn memory_snapshot(&self) -> ClientResult<MemorySnapshot> {
        self.get_json("/memory")
    }
}

fn map_err(path: &str, err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::Status(status, _) => ClientError::Status {
            path: path.to_string(),
            status,
        },
        ureq::Error::Transport(t) => ClientError::Request {
            path: path.to_string(),
            message: t.to_string(),
        },
    }
}
