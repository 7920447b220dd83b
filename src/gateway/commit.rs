//! Commit step seam.
//!
//! A gateway never talks to its processor directly. Every side-effecting
//! finalization goes through the [`CommitExecutor`] injected at construction,
//! which lets the verifier hand a disposable instance an executor that performs
//! no external effect.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::{GatewayError, Response};

/// A single side-effecting request a gateway wants to finalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Gateway-level action, e.g. "sale" or "auth".
    pub action: String,
    /// Request parameters as they would be posted to the processor.
    pub parameters: Value,
}

impl CommitRequest {
    pub fn new(action: impl Into<String>, parameters: Value) -> Self {
        Self {
            action: action.into(),
            parameters,
        }
    }
}

pub trait CommitExecutor: Send + Sync + std::fmt::Debug {
    fn commit(&self, request: &CommitRequest) -> Result<Response, GatewayError>;
}

/// Shared handle a gateway keeps for its commit step.
pub type CommitHandle = Arc<dyn CommitExecutor>;

/// Executor that acknowledges every request without doing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCommit;

impl CommitExecutor for NoopCommit {
    fn commit(&self, request: &CommitRequest) -> Result<Response, GatewayError> {
        Ok(Response::new(true, format!("{} not committed", request.action)).with_test(true))
    }
}
