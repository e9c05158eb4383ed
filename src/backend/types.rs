//! Wire types exchanged with the decision service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate counters reported by `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Number of ingested documents
    pub total_documents: u64,
    /// Number of queries processed across all sessions
    pub total_queries: u64,
    /// Number of distinct sessions that have queried
    pub total_sessions: u64,
    /// Free-form operational status, e.g. "operational"
    pub system_status: String,
}

/// One entry of `GET /api/documents`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Backend document identifier
    pub id: String,
    /// File name
    pub name: String,
    /// Whether ingestion finished
    pub processed: bool,
    /// Document kind, e.g. "pdf"
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Upload time as reported by the backend (naive UTC string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
}

/// Body of `POST /api/query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Trimmed query text
    pub query: String,
    /// Session identity of this client run
    pub session_id: String,
}

/// A source passage the backend used to reach its decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencedClause {
    /// Document the passage came from
    pub document: String,
    /// Relevance in [0, 1]
    pub relevance_score: f64,
    /// Excerpt of the passage, already shortened by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Response of `POST /api/query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Decision tag, normally "approved", "rejected" or "error"
    pub decision: String,
    /// Explanation of the decision
    pub justification: String,
    /// Confidence in [0, 1]
    pub confidence_score: f64,
    /// Payable amount, absent when not applicable
    #[serde(default)]
    pub amount: Option<f64>,
    /// Passages backing the decision
    #[serde(default)]
    pub referenced_clauses: Vec<ReferencedClause>,
    /// Server-side processing time in seconds
    #[serde(default)]
    pub processing_time: Option<f64>,
    /// Session the server recorded the query under
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy" when the service is up
    pub status: String,
    /// Server clock at the time of the check
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    /// Whether the service reported itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// One record of `GET /api/session/{id}/history`
///
/// `result` is kept as raw JSON because the backend stores its internal
/// decision structure there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerHistoryRecord {
    /// Backend record identifier
    pub id: String,
    /// Query text as stored
    pub query: String,
    /// Stored decision payload
    #[serde(default)]
    pub result: serde_json::Value,
    /// Server timestamp
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Processing time in seconds
    #[serde(default)]
    pub processing_time: Option<f64>,
}

impl ServerHistoryRecord {
    /// Decision string inside the stored payload, if any
    pub fn decision(&self) -> Option<&str> {
        self.result.get("decision").and_then(|v| v.as_str())
    }
}

/// Parse a backend timestamp which may or may not carry an offset
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
