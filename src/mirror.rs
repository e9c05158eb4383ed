//! Read-through copies of backend-reported state
//!
//! [`StatsMirror`] and [`DocumentCatalog`] hold the last snapshot the
//! backend returned. A successful refresh replaces the snapshot wholesale; a
//! failed one keeps whatever was there and records the failure.

use crate::backend::{Backend, DocumentInfo, StatsSnapshot};
use crate::error::BackendError;
use chrono::{DateTime, Utc};

/// Last successfully fetched value of some backend resource
#[derive(Debug, Clone)]
pub struct ReadThrough<T> {
    label: &'static str,
    snapshot: Option<T>,
    refreshed_at: Option<DateTime<Utc>>,
    last_error: Option<BackendError>,
}

impl<T> ReadThrough<T> {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            snapshot: None,
            refreshed_at: None,
            last_error: None,
        }
    }

    /// Last successful snapshot, if any fetch has succeeded
    pub fn snapshot(&self) -> Option<&T> {
        self.snapshot.as_ref()
    }

    /// When the current snapshot was fetched
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Failure of the most recent refresh, cleared by the next success
    pub fn last_error(&self) -> Option<&BackendError> {
        self.last_error.as_ref()
    }

    /// Record the outcome of a fetch
    ///
    /// On failure the previous snapshot is kept and the error is handed back.
    pub fn apply(&mut self, result: Result<T, BackendError>) -> Result<&T, BackendError> {
        match result {
            Ok(value) => {
                self.refreshed_at = Some(Utc::now());
                self.last_error = None;
                tracing::debug!(resource = self.label, "Refreshed snapshot");
                Ok(self.snapshot.insert(value))
            }
            Err(err) => {
                tracing::warn!(
                    resource = self.label,
                    stale = self.snapshot.is_some(),
                    "Refresh failed, keeping previous snapshot: {}",
                    err
                );
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

/// Mirror of `GET /api/stats`
#[derive(Debug, Clone)]
pub struct StatsMirror(ReadThrough<StatsSnapshot>);

impl StatsMirror {
    pub fn new() -> Self {
        Self(ReadThrough::new("stats"))
    }

    /// Fetch and store the latest counters
    pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<&StatsSnapshot, BackendError> {
        let result = backend.stats().await;
        self.0.apply(result)
    }

    pub fn apply(
        &mut self,
        result: Result<StatsSnapshot, BackendError>,
    ) -> Result<&StatsSnapshot, BackendError> {
        self.0.apply(result)
    }

    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.0.snapshot()
    }

    pub fn state(&self) -> &ReadThrough<StatsSnapshot> {
        &self.0
    }
}

impl Default for StatsMirror {
    fn default() -> Self {
        Self::new()
    }
}

/// Mirror of `GET /api/documents`
#[derive(Debug, Clone)]
pub struct DocumentCatalog(ReadThrough<Vec<DocumentInfo>>);

impl DocumentCatalog {
    pub fn new() -> Self {
        Self(ReadThrough::new("documents"))
    }

    /// Fetch and store the latest catalog
    pub async fn refresh(
        &mut self,
        backend: &dyn Backend,
    ) -> Result<&Vec<DocumentInfo>, BackendError> {
        let result = backend.documents().await;
        self.0.apply(result)
    }

    pub fn apply(
        &mut self,
        result: Result<Vec<DocumentInfo>, BackendError>,
    ) -> Result<&Vec<DocumentInfo>, BackendError> {
        self.0.apply(result)
    }

    /// Known documents; empty until the first successful refresh
    pub fn documents(&self) -> &[DocumentInfo] {
        self.0.snapshot().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn state(&self) -> &ReadThrough<Vec<DocumentInfo>> {
        &self.0
    }
}

impl Default for DocumentCatalog {
    fn default() -> Self {
        Self::new()
    }
}
