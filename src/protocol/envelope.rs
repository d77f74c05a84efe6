use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a process-unique, monotonically incrementing correlation id.
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Request envelope transmitted to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

/// Response envelope: a correlation id (when the server echoes one) plus
/// either a `result` or an `error` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub outcome: RpcOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RpcOutcome {
    Result(Value),
    Error(RpcError),
}

/// Server-side failure payload carried inside a response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Error)]
#[error("{message} (code {code})")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcResponse {
    pub fn result(value: Value) -> Self {
        RpcResponse {
            id: None,
            outcome: RpcOutcome::Result(value),
        }
    }

    pub fn error(error: RpcError) -> Self {
        RpcResponse {
            id: None,
            outcome: RpcOutcome::Error(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RpcOutcome::Result(_))
    }

    /// Unwraps the success value, surfacing a server error payload as
    /// `Err`.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.outcome {
            RpcOutcome::Result(value) => Ok(value),
            RpcOutcome::Error(error) => Err(error),
        }
    }
}
