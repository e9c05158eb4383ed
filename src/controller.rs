//! Query request/response lifecycle
//!
//! A submission moves through two explicit phases. [`QueryController::begin`]
//! validates the text and marks the controller busy; the request then runs
//! as a spawned task ([`QueryController::dispatch`]); and
//! [`QueryController::settle`] turns the outcome into a [`ResultEntry`],
//! records it, and clears the busy flag. Only one query may be outstanding
//! at a time. Every settlement produces an entry, so a failed request is
//! always visible in the history.

use crate::backend::{Backend, QueryRequest, QueryResponse};
use crate::error::BackendError;
use crate::history::{EntryId, ResultEntry};
use crate::session::SessionIdentity;
use crate::state::ClientState;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

/// Why a submission was not started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    /// The text was empty or whitespace only
    #[error("Query is empty")]
    Empty,

    /// Another query has not settled yet
    #[error("A query is already in flight")]
    Busy,
}

/// A validated submission that has not been sent yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    request: QueryRequest,
}

impl PendingQuery {
    /// Trimmed query text
    pub fn query(&self) -> &str {
        &self.request.query
    }

    /// Wire request, tagged with the session identity
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }
}

/// Outcome of one query request
#[derive(Debug, Clone)]
pub struct Settlement {
    query: String,
    outcome: Result<QueryResponse, BackendError>,
}

impl Settlement {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Owns the busy flag and the input draft for query submission
#[derive(Debug, Default)]
pub struct QueryController {
    in_flight: Option<String>,
    draft: String,
}

impl QueryController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a query is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Text of the outstanding query, if any
    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    /// Text kept from the last submission until it succeeds
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Start a submission
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::Empty`] for blank text (the draft is left
    /// alone) and [`SubmitRejected::Busy`] while another query is pending.
    pub fn begin(
        &mut self,
        raw: &str,
        identity: &SessionIdentity,
    ) -> Result<PendingQuery, SubmitRejected> {
        let query = raw.trim();
        if query.is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if let Some(pending) = &self.in_flight {
            tracing::debug!(pending = %pending, "Rejecting submission while busy");
            return Err(SubmitRejected::Busy);
        }

        self.in_flight = Some(query.to_string());
        self.draft = query.to_string();
        tracing::info!(session_id = %identity, "Submitting query");

        Ok(PendingQuery {
            request: QueryRequest {
                query: query.to_string(),
                session_id: identity.as_str().to_string(),
            },
        })
    }

    /// Send the request on its own task
    pub fn dispatch(backend: Arc<dyn Backend>, pending: PendingQuery) -> JoinHandle<Settlement> {
        tokio::spawn(async move {
            let outcome = backend.submit_query(&pending.request).await;
            Settlement {
                query: pending.request.query,
                outcome,
            }
        })
    }

    /// Record a settled query
    ///
    /// The entry is prepended and selected before the busy flag clears; a
    /// stats refresh is started afterwards, and only on success.
    pub fn settle(&mut self, state: &mut ClientState, settlement: Settlement) -> EntryId {
        let Settlement { query, outcome } = settlement;
        let history = state.history_mut();

        let (id, succeeded) = match outcome {
            Ok(response) => {
                let id =
                    history.record(|id, ts| ResultEntry::from_response(id, query, response, ts));
                (id, true)
            }
            Err(err) => {
                let id = history.record(|id, ts| ResultEntry::failed(id, query, ts));
                tracing::warn!(id = %id, "Query failed: {}", err);
                (id, false)
            }
        };
        history.select(id);

        self.in_flight = None;
        if succeeded {
            self.draft.clear();
            state.spawn_stats_refresh();
        }

        id
    }

    /// Record a query whose request task died before reporting
    pub fn settle_aborted(&mut self, state: &mut ClientState, err: JoinError) -> Option<EntryId> {
        let query = self.in_flight.clone()?;
        let settlement = Settlement {
            query,
            outcome: Err(BackendError::Transport(format!("Request task failed: {}", err))),
        };
        Some(self.settle(state, settlement))
    }

    /// Submit a query and wait for it to settle
    ///
    /// Returns `None` when the submission was rejected.
    pub async fn submit(&mut self, state: &mut ClientState, raw: &str) -> Option<EntryId> {
        let pending = match self.begin(raw, state.identity()) {
            Ok(pending) => pending,
            Err(rejected) => {
                tracing::debug!("Submission not started: {}", rejected);
                return None;
            }
        };

        match Self::dispatch(state.backend(), pending).await {
            Ok(settlement) => Some(self.settle(state, settlement)),
            Err(err) => self.settle_aborted(state, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{Decision, FAILED_QUERY_JUSTIFICATION};
    use crate::test_utils::{approved_response, sample_stats, FakeBackend};

    fn setup() -> (Arc<FakeBackend>, ClientState, QueryController) {
        let backend = Arc::new(FakeBackend::new());
        let state = ClientState::new(backend.clone());
        (backend, state, QueryController::new())
    }

    #[tokio::test]
    async fn test_submit_creates_selected_entry() {
        let (backend, mut state, mut controller) = setup();
        backend.push_query_response(Ok(approved_response()));

        let id = controller.submit(&mut state, "  knee surgery  ").await.unwrap();

        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history().selected_id(), Some(id));
        let entry = state.history().selected().unwrap();
        assert_eq!(entry.query(), "knee surgery");
        assert_eq!(entry.decision(), &Decision::Approved);
        assert!(!controller.is_busy());
        assert_eq!(controller.draft(), "");
    }

    #[tokio::test]
    async fn test_blank_submit_is_noop() {
        let (backend, mut state, mut controller) = setup();

        for raw in ["", "   ", "\t\n"] {
            assert!(controller.submit(&mut state, raw).await.is_none());
        }

        assert!(state.history().is_empty());
        assert!(backend.query_requests().is_empty());
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_blank_submit_keeps_draft() {
        let (backend, mut state, mut controller) = setup();
        backend.push_query_response(Err(BackendError::Transport("down".to_string())));
        controller.submit(&mut state, "cardiac").await;
        assert_eq!(controller.draft(), "cardiac");

        controller.submit(&mut state, "   ").await;
        assert_eq!(controller.draft(), "cardiac");
    }

    #[tokio::test]
    async fn test_failure_yields_error_entry() {
        let (backend, mut state, mut controller) = setup();
        backend.push_query_response(Err(BackendError::Status {
            status: 500,
            body: "internal".to_string(),
        }));

        let id = controller
            .submit(&mut state, "35F, cardiac, Delhi")
            .await
            .unwrap();

        let entry = state.history().get(id).unwrap();
        assert_eq!(entry.decision(), &Decision::Error);
        assert_eq!(entry.confidence_score(), 0.0);
        assert!(entry.referenced_clauses().is_empty());
        assert_eq!(entry.query(), "35F, cardiac, Delhi");
        assert_eq!(entry.justification(), FAILED_QUERY_JUSTIFICATION);
        assert_eq!(state.history().selected_id(), Some(id));
        assert!(!controller.is_busy());
        assert_eq!(controller.draft(), "35F, cardiac, Delhi");
    }

    #[tokio::test]
    async fn test_failure_does_not_refresh_stats() {
        let (backend, mut state, mut controller) = setup();
        backend.push_query_response(Err(BackendError::Decode("bad json".to_string())));

        controller.submit(&mut state, "dental").await;
        tokio::task::yield_now().await;

        assert_eq!(backend.stats_calls(), 0);
    }

    #[tokio::test]
    async fn test_busy_guard_allows_single_request() {
        let backend = Arc::new(FakeBackend::gated());
        let mut state = ClientState::new(backend.clone());
        let mut controller = QueryController::new();

        let pending = controller.begin("first", state.identity()).unwrap();
        let handle = QueryController::dispatch(state.backend(), pending);

        assert!(controller.is_busy());
        assert_eq!(
            controller.begin("second", state.identity()),
            Err(SubmitRejected::Busy)
        );

        backend.release_queries(1);
        let settlement = handle.await.unwrap();
        controller.settle(&mut state, settlement);

        assert_eq!(backend.query_requests().len(), 1);
        assert_eq!(state.history().len(), 1);
        assert!(controller.begin("third", state.identity()).is_ok());
    }

    #[tokio::test]
    async fn test_entry_recorded_before_busy_clears() {
        let (backend, mut state, mut controller) = setup();
        backend.push_query_response(Ok(approved_response()));
        let pending = controller.begin("knee", state.identity()).unwrap();
        let settlement = QueryController::dispatch(state.backend(), pending)
            .await
            .unwrap();

        assert!(controller.is_busy());
        assert!(state.history().is_empty());

        controller.settle(&mut state, settlement);
        assert!(!controller.is_busy());
        assert_eq!(state.history().len(), 1);
    }

    #[tokio::test]
    async fn test_success_triggers_stats_refresh() {
        let (backend, mut state, mut controller) = setup();
        backend.set_stats(Ok(sample_stats(1, 0, 0)));
        state.startup().await;
        let before = state.stats().snapshot().unwrap().total_queries;

        backend.push_query_response(Ok(approved_response()));
        controller.submit(&mut state, "knee surgery").await.unwrap();
        let update = state.next_update().await;
        state.apply_update(update);

        assert!(state.stats().snapshot().unwrap().total_queries > before);
    }

    #[tokio::test]
    async fn test_session_identity_stable_across_submissions() {
        let (backend, mut state, mut controller) = setup();
        for i in 0..5 {
            backend.push_query_response(Ok(approved_response()));
            controller.submit(&mut state, &format!("query {}", i)).await;
        }

        let requests = backend.query_requests();
        assert_eq!(requests.len(), 5);
        assert!(requests
            .iter()
            .all(|r| r.session_id == state.identity().as_str()));
    }

    #[tokio::test]
    async fn test_history_newest_first_across_mixed_outcomes() {
        let (backend, mut state, mut controller) = setup();
        backend.push_query_response(Ok(approved_response()));
        backend.push_query_response(Err(BackendError::Transport("reset".to_string())));
        backend.push_query_response(Ok(approved_response()));

        for q in ["a", "b", "c"] {
            controller.submit(&mut state, q).await;
        }

        let queries: Vec<&str> = state.history().iter().map(|e| e.query()).collect();
        assert_eq!(queries, vec!["c", "b", "a"]);
        let stamps: Vec<_> = state.history().iter().map(|e| e.timestamp()).collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(state.history().selected().unwrap().query(), "c");
    }

    #[tokio::test]
    async fn test_settle_aborted_records_error_entry() {
        let (_backend, mut state, mut controller) = setup();
        controller.begin("panicking task", state.identity()).unwrap();

        let handle = tokio::spawn(async { panic!("boom") });
        let err = handle.await.unwrap_err();
        let id = controller.settle_aborted(&mut state, err).unwrap();

        let entry = state.history().get(id).unwrap();
        assert_eq!(entry.decision(), &Decision::Error);
        assert_eq!(entry.query(), "panicking task");
        assert!(!controller.is_busy());
    }
}
