//! Decision service abstraction
//!
//! The [`Backend`] trait is the seam between the client state machine and
//! the remote decision service. [`HttpBackend`] is the reqwest
//! implementation used by the binary; tests substitute in-process fakes.

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{
    DocumentInfo, HealthStatus, QueryRequest, QueryResponse, ReferencedClause,
    ServerHistoryRecord, StatsSnapshot,
};

use crate::error::BackendError;
use async_trait::async_trait;

/// Operations the client needs from the decision service
///
/// Every method is a single request with no retries. Implementations must
/// report failures as [`BackendError`] rather than panic.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch aggregate counters
    async fn stats(&self) -> Result<StatsSnapshot, BackendError>;

    /// Fetch the catalog of ingested documents
    async fn documents(&self) -> Result<Vec<DocumentInfo>, BackendError>;

    /// Submit one query for adjudication
    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError>;

    /// Probe service health
    ///
    /// The default implementation reports that health checks are unsupported.
    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Err(BackendError::Transport(
            "Health check is not supported by this backend".to_string(),
        ))
    }

    /// Fetch the history the service stored for a session
    ///
    /// The default implementation returns an empty history.
    async fn session_history(
        &self,
        _session_id: &str,
    ) -> Result<Vec<ServerHistoryRecord>, BackendError> {
        Ok(Vec::new())
    }
}
