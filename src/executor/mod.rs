//! Remote statement execution: target context, handles and the executor seam.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod data_api;

pub use data_api::DataApiClient;

/// Destination of every statement in a batch. Supplied once per batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetContext {
    pub workgroup_name: String,
    pub database_name: String,
    /// Reference to the stored credential, never the credential itself.
    pub secret_arn: String,
}

/// Opaque identifier of a submitted, possibly still running, statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionHandle(String);

impl ExecutionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while submitting a single statement.
///
/// The rendered message is what batch classification inspects, so variants
/// carrying service output must include it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service rejected the statement.
    #[error("execution API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service accepted the request but answered with something unexpected.
    #[error("malformed execution API response: {0}")]
    Decode(String),

    /// Failure reported by a non-HTTP executor.
    #[error("{0}")]
    Service(String),
}

/// Submits one SQL statement and returns immediately with a handle.
///
/// Completion happens on the service side and is not awaited.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn submit(
        &self,
        sql: &str,
        target: &TargetContext,
    ) -> Result<ExecutionHandle, SubmitError>;
}
