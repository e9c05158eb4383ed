//! Claimdesk - insurance query client library
//!
//! This library provides the client side of a natural-language insurance
//! decision service: session identity, read-through mirrors of the service's
//! counters and document catalog, the query submission lifecycle, and the
//! session-scoped result history.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `backend`: Decision service abstraction and its HTTP implementation
//! - `session`: Per-run session identity
//! - `mirror`: Read-through snapshots of stats and documents
//! - `history`: Result entries and the newest-first history
//! - `controller`: Query submission and settlement
//! - `state`: The single container for session state
//! - `render`: Terminal formatting
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use claimdesk::{ClientState, Config, HttpBackend, QueryController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::load("config/claimdesk.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let mut state = ClientState::new(Arc::new(HttpBackend::new(&config.backend)?));
//!     state.startup().await;
//!
//!     let mut controller = QueryController::new();
//!     controller
//!         .submit(&mut state, "46-year-old male, knee surgery in Pune")
//!         .await;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod mirror;
pub mod render;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use backend::{Backend, HttpBackend};
pub use config::Config;
pub use controller::QueryController;
pub use error::{BackendError, ClaimdeskError, Result};
pub use history::{Decision, EntryId, ResultEntry, ResultHistory};
pub use mirror::{DocumentCatalog, StatsMirror};
pub use session::SessionIdentity;
pub use state::ClientState;

#[cfg(test)]
pub mod test_utils;
