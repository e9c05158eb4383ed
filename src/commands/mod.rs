/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `shell`: interactive query session
- `query`: submit one query and print the result
- `stats`: print aggregate counters
- `documents`: print the document catalog
- `health`: probe the decision service
- `server_history`: print the history the service stored for a session
*/

use crate::backend::{Backend, HttpBackend};
use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;

// Interactive shell
pub mod shell;

// Shell command parser
pub mod special_commands;

/// Build the HTTP backend for the configured base URL
pub fn connect(config: &Config) -> Result<Arc<dyn Backend>> {
    Ok(Arc::new(HttpBackend::new(&config.backend)?))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// One-shot query handler
pub mod query {
    //! Submit a single query, print its entry, and report the refreshed
    //! counters.

    use super::*;
    use crate::controller::QueryController;
    use crate::render;
    use crate::state::ClientState;
    use colored::Colorize;

    /// Submit `text` and print the resulting entry
    ///
    /// A failed submission still prints its error entry; the process exits
    /// successfully because the failure is part of the result.
    pub async fn run_query(config: Config, text: String, json: bool) -> Result<()> {
        run_query_with_backend(&config, connect(&config)?, &text, json).await
    }

    /// Same as [`run_query`] against an explicit backend
    pub async fn run_query_with_backend(
        config: &Config,
        backend: Arc<dyn Backend>,
        text: &str,
        json: bool,
    ) -> Result<()> {
        let mut state = ClientState::new(backend);
        let failures = state.startup().await;
        if !json {
            for err in &failures {
                println!("{}", format!("Startup refresh failed: {}", err).dimmed());
            }
            if let Some(stats) = state.stats().snapshot() {
                println!("{}", format!("Before: {}", render::stats_line(stats)).dimmed());
            }
        }
        let mut controller = QueryController::new();

        let Some(id) = controller.submit(&mut state, text).await else {
            eprintln!("{}", "Nothing to submit: the query is empty".yellow());
            return Ok(());
        };

        let entry = state
            .history()
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("result entry {} missing from history", id))?;

        if json {
            return print_json(entry);
        }

        println!("{}", render::entry_detail(entry, &config.display));

        // Only successful submissions start a stats refresh
        if !entry.is_synthetic() {
            let update = state.next_update().await;
            if let Some(err) = state.apply_update(update) {
                println!("{}", format!("Could not refresh counters: {}", err).dimmed());
            } else if let Some(stats) = state.stats().snapshot() {
                println!("After:  {}", render::stats_line(stats));
            }
        }
        Ok(())
    }
}

// Stats handler
pub mod stats {
    use super::*;
    use crate::mirror::StatsMirror;
    use crate::render;

    /// Fetch and print aggregate counters
    pub async fn show_stats(config: Config, json: bool) -> Result<()> {
        let backend = connect(&config)?;
        let mut mirror = StatsMirror::new();
        let stats = mirror.refresh(backend.as_ref()).await?;

        if json {
            print_json(stats)
        } else {
            println!("{}", render::stats_line(stats));
            Ok(())
        }
    }
}

// Documents handler
pub mod documents {
    use super::*;
    use crate::mirror::DocumentCatalog;
    use crate::render;
    use colored::Colorize;

    /// Fetch and print the document catalog
    pub async fn list_documents(config: Config, json: bool) -> Result<()> {
        let backend = connect(&config)?;
        let mut catalog = DocumentCatalog::new();
        let documents = catalog.refresh(backend.as_ref()).await?;

        if json {
            return print_json(documents);
        }

        if documents.is_empty() {
            println!("{}", "No documents have been ingested.".yellow());
        } else {
            println!("\nDocuments:");
            render::documents_table(documents).printstd();
            println!();
        }
        Ok(())
    }
}

// Health handler
pub mod health {
    use super::*;
    use crate::error::ClaimdeskError;
    use colored::Colorize;

    /// Probe the service and fail unless it reports healthy
    pub async fn check_health(config: Config) -> Result<()> {
        let backend = connect(&config)?;
        let status = backend.health().await?;

        if status.is_healthy() {
            println!(
                "{} {} ({})",
                "healthy".green(),
                config.backend.base_url,
                status.timestamp.as_deref().unwrap_or("no timestamp")
            );
            Ok(())
        } else {
            Err(ClaimdeskError::Unhealthy(format!(
                "{} reported status '{}'",
                config.backend.base_url, status.status
            ))
            .into())
        }
    }
}

// Server-side history handler
pub mod server_history {
    use super::*;
    use crate::render;
    use colored::Colorize;

    /// Print the history the service stored for `session_id`
    pub async fn show_server_history(config: Config, session_id: String, json: bool) -> Result<()> {
        let backend = connect(&config)?;
        let records = backend.session_history(&session_id).await?;

        if json {
            return print_json(&records);
        }

        if records.is_empty() {
            println!(
                "{}",
                format!("No stored queries for session {}", session_id).yellow()
            );
        } else {
            println!("\nStored queries for session {}:", session_id.cyan());
            render::server_history_table(&records, &config.display).printstd();
            println!();
        }
        Ok(())
    }
}
