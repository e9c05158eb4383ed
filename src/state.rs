//! Client state container
//!
//! [`ClientState`] is built once by the entry point and owns everything the
//! session mutates: the session identity, the result history, and the two
//! read-through mirrors. Background refreshes never touch it directly; they
//! report back as [`MirrorUpdate`]s which the owner applies in arrival order.

use crate::backend::{Backend, DocumentInfo, StatsSnapshot};
use crate::error::BackendError;
use crate::history::ResultHistory;
use crate::mirror::{DocumentCatalog, StatsMirror};
use crate::session::SessionIdentity;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of a refresh that ran in the background
#[derive(Debug)]
pub enum MirrorUpdate {
    /// Outcome of `GET /api/stats`
    Stats(Result<StatsSnapshot, BackendError>),
    /// Outcome of `GET /api/documents`
    Documents(Result<Vec<DocumentInfo>, BackendError>),
}

/// All session-scoped client state
pub struct ClientState {
    identity: SessionIdentity,
    history: ResultHistory,
    stats: StatsMirror,
    documents: DocumentCatalog,
    backend: Arc<dyn Backend>,
    updates_tx: mpsc::UnboundedSender<MirrorUpdate>,
    updates_rx: mpsc::UnboundedReceiver<MirrorUpdate>,
}

impl ClientState {
    /// Create the state for a new run, generating its session identity
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let identity = SessionIdentity::create();
        tracing::info!(session_id = %identity, "Starting client session");

        Self {
            identity,
            history: ResultHistory::new(),
            stats: StatsMirror::new(),
            documents: DocumentCatalog::new(),
            backend,
            updates_tx,
            updates_rx,
        }
    }

    /// Populate both mirrors
    ///
    /// Failures are recorded on the mirrors and handed back so the caller
    /// can report them; the session starts regardless.
    pub async fn startup(&mut self) -> Vec<BackendError> {
        let backend = Arc::clone(&self.backend);
        let (stats, documents) = tokio::join!(backend.stats(), backend.documents());
        [
            self.stats.apply(stats).err(),
            self.documents.apply(documents).err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn history(&self) -> &ResultHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ResultHistory {
        &mut self.history
    }

    pub fn stats(&self) -> &StatsMirror {
        &self.stats
    }

    pub fn documents(&self) -> &DocumentCatalog {
        &self.documents
    }

    /// Backend shared with spawned request tasks
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Refresh the stats mirror in the background
    pub fn spawn_stats_refresh(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let result = backend.stats().await;
            if tx.send(MirrorUpdate::Stats(result)).is_err() {
                tracing::debug!("Client state dropped before stats refresh completed");
            }
        });
    }

    /// Refresh the document catalog in the background
    pub fn spawn_documents_refresh(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let result = backend.documents().await;
            if tx.send(MirrorUpdate::Documents(result)).is_err() {
                tracing::debug!("Client state dropped before document refresh completed");
            }
        });
    }

    /// Wait for the next background refresh to report back
    pub async fn next_update(&mut self) -> MirrorUpdate {
        match self.updates_rx.recv().await {
            Some(update) => update,
            // The state holds a sender, so the channel cannot close while we wait
            None => std::future::pending().await,
        }
    }

    /// Apply a background refresh result, returning its failure if it failed
    pub fn apply_update(&mut self, update: MirrorUpdate) -> Option<BackendError> {
        match update {
            MirrorUpdate::Stats(result) => self.stats.apply(result).err(),
            MirrorUpdate::Documents(result) => self.documents.apply(result).err(),
        }
    }
}
