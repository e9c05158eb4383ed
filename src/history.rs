//! Result entries and the session-scoped result history
//!
//! Every settled query produces exactly one [`ResultEntry`], success or
//! synthesized failure. [`ResultHistory`] keeps them newest first and tracks
//! which one is open for detail viewing.

use crate::backend::{QueryResponse, ReferencedClause};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::VecDeque;
use std::fmt;

/// Justification attached to entries synthesized from a failed submission
pub const FAILED_QUERY_JUSTIFICATION: &str =
    "Failed to process query. Please check that the decision service is reachable and try again.";

/// Outcome tag of a query
///
/// The backend vocabulary is open-ended; anything other than the three known
/// values is kept verbatim as [`Decision::Unrecognized`] so it can still be
/// shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Claim is covered
    Approved,
    /// Claim is not covered
    Rejected,
    /// The query could not be adjudicated
    Error,
    /// Any other value the backend reported
    Unrecognized(String),
}

impl Decision {
    /// Classify a backend decision string
    ///
    /// # Examples
    ///
    /// ```
    /// use claimdesk::history::Decision;
    ///
    /// assert_eq!(Decision::parse(" Approved "), Decision::Approved);
    /// assert_eq!(
    ///     Decision::parse("needs_review"),
    ///     Decision::Unrecognized("needs_review".to_string())
    /// );
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "error" => Self::Error,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Wire form of the decision
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Error => "error",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Client-assigned identifier of a result entry
///
/// Allocated from a per-history counter, so ids are strictly increasing in
/// creation order and never repeat within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One completed query attempt
///
/// Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    id: EntryId,
    query: String,
    decision: Decision,
    justification: String,
    confidence_score: f64,
    amount: Option<f64>,
    referenced_clauses: Vec<ReferencedClause>,
    processing_time: Option<f64>,
    timestamp: DateTime<Utc>,
    synthetic: bool,
}

impl ResultEntry {
    /// Build an entry from a successful backend response
    pub(crate) fn from_response(
        id: EntryId,
        query: String,
        response: QueryResponse,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            query,
            decision: Decision::parse(&response.decision),
            justification: response.justification,
            confidence_score: clamp_unit(response.confidence_score),
            amount: response.amount,
            referenced_clauses: response.referenced_clauses,
            processing_time: response.processing_time,
            timestamp,
            synthetic: false,
        }
    }

    /// Build the synthetic entry recorded when a submission fails
    pub(crate) fn failed(id: EntryId, query: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            query,
            decision: Decision::Error,
            justification: FAILED_QUERY_JUSTIFICATION.to_string(),
            confidence_score: 0.0,
            amount: None,
            referenced_clauses: Vec::new(),
            processing_time: None,
            timestamp,
            synthetic: true,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn decision(&self) -> &Decision {
        &self.decision
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn referenced_clauses(&self) -> &[ReferencedClause] {
        &self.referenced_clauses
    }

    pub fn processing_time(&self) -> Option<f64> {
        self.processing_time
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether the client made this entry up because the request failed
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Completed query outcomes for this run, newest first
///
/// Entries are only ever inserted at the front. Nothing is removed, so the
/// selection can never point at a missing entry.
#[derive(Debug, Default)]
pub struct ResultHistory {
    entries: VecDeque<ResultEntry>,
    selected: Option<EntryId>,
    next_id: u64,
}

impl ResultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }

    /// Completion time to stamp on the next entry
    ///
    /// Never earlier than the newest entry, so a backwards clock step cannot
    /// break newest-first ordering.
    pub fn completion_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.entries.front() {
            Some(latest) if latest.timestamp > now => latest.timestamp,
            _ => now,
        }
    }

    /// Record a new entry at the front, stamped now
    ///
    /// `build` receives the allocated id and completion time. The history
    /// owns both, so whatever `build` puts in those fields is overwritten.
    pub(crate) fn record(
        &mut self,
        build: impl FnOnce(EntryId, DateTime<Utc>) -> ResultEntry,
    ) -> EntryId {
        self.record_at(Utc::now(), build)
    }

    pub(crate) fn record_at(
        &mut self,
        now: DateTime<Utc>,
        build: impl FnOnce(EntryId, DateTime<Utc>) -> ResultEntry,
    ) -> EntryId {
        let id = self.allocate_id();
        let timestamp = self.completion_time(now);
        let mut entry = build(id, timestamp);
        entry.id = id;
        entry.timestamp = timestamp;

        tracing::debug!(id = %id, decision = %entry.decision, "Recorded result entry");
        self.entries.push_front(entry);
        id
    }

    /// Open an entry for detail viewing
    ///
    /// Returns false, leaving the selection unchanged, if no entry has `id`.
    pub fn select(&mut self, id: EntryId) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id);
            true
        } else {
            tracing::warn!(id = %id, "Ignoring selection of unknown result entry");
            false
        }
    }

    /// Select by 1-based position, where 1 is the newest entry
    pub fn select_position(&mut self, position: usize) -> Option<EntryId> {
        let id = position
            .checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
            .map(|entry| entry.id)?;
        self.selected = Some(id);
        Some(id)
    }

    /// Currently selected entry
    pub fn selected(&self) -> Option<&ResultEntry> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<EntryId> {
        self.selected
    }

    pub fn get(&self, id: EntryId) -> Option<&ResultEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&ResultEntry> {
        self.entries.front()
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
