//! Test utilities for Claimdesk
//!
//! Provides [`FakeBackend`], an in-process [`Backend`] with scripted
//! responses, plus sample payload builders.

use crate::backend::{
    Backend, DocumentInfo, QueryRequest, QueryResponse, ReferencedClause, StatsSnapshot,
};
use crate::error::BackendError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Stats snapshot with the given counters and an operational status
pub fn sample_stats(documents: u64, queries: u64, sessions: u64) -> StatsSnapshot {
    StatsSnapshot {
        total_documents: documents,
        total_queries: queries,
        total_sessions: sessions,
        system_status: "operational".to_string(),
    }
}

/// Approval for 50,000 citing policy.pdf
pub fn approved_response() -> QueryResponse {
    QueryResponse {
        decision: "approved".to_string(),
        justification: "Knee surgery is covered under orthopedic benefits".to_string(),
        confidence_score: 0.92,
        amount: Some(50000.0),
        referenced_clauses: vec![ReferencedClause {
            document: "policy.pdf".to_string(),
            relevance_score: 0.88,
            content: Some("Orthopedic procedures including knee surgery are covered".to_string()),
        }],
        processing_time: Some(1.25),
        session_id: None,
    }
}

/// Scripted in-process backend
///
/// Query responses are served from a queue, falling back to
/// [`approved_response`] when it is empty. Each successful query bumps
/// `total_queries` in the scripted stats, like the real service does.
pub struct FakeBackend {
    stats: Mutex<Result<StatsSnapshot, BackendError>>,
    documents: Mutex<Result<Vec<DocumentInfo>, BackendError>>,
    query_responses: Mutex<VecDeque<Result<QueryResponse, BackendError>>>,
    query_requests: Mutex<Vec<QueryRequest>>,
    stats_calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(Ok(sample_stats(1, 0, 0))),
            documents: Mutex::new(Ok(vec![DocumentInfo {
                id: "doc-1".to_string(),
                name: "policy.pdf".to_string(),
                processed: true,
                kind: Some("pdf".to_string()),
                upload_date: None,
            }])),
            query_responses: Mutex::new(VecDeque::new()),
            query_requests: Mutex::new(Vec::new()),
            stats_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// A backend whose queries block until [`FakeBackend::release_queries`]
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new()
        }
    }

    pub fn set_stats(&self, stats: Result<StatsSnapshot, BackendError>) {
        *self.stats.lock().unwrap() = stats;
    }

    pub fn set_documents(&self, documents: Result<Vec<DocumentInfo>, BackendError>) {
        *self.documents.lock().unwrap() = documents;
    }

    pub fn push_query_response(&self, response: Result<QueryResponse, BackendError>) {
        self.query_responses.lock().unwrap().push_back(response);
    }

    /// Let `n` held queries complete
    pub fn release_queries(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Every query request received so far
    pub fn query_requests(&self) -> Vec<QueryRequest> {
        self.query_requests.lock().unwrap().clone()
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn stats(&self) -> Result<StatsSnapshot, BackendError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.stats.lock().unwrap().clone()
    }

    async fn documents(&self) -> Result<Vec<DocumentInfo>, BackendError> {
        self.documents.lock().unwrap().clone()
    }

    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        self.query_requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| BackendError::Transport(e.to_string()))?;
            permit.forget();
        }

        let response = self
            .query_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(approved_response()));

        if response.is_ok() {
            if let Ok(stats) = self.stats.lock().unwrap().as_mut() {
                stats.total_queries += 1;
            }
        }
        response
    }
}
