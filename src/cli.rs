//! Command-line interface definition for Claimdesk
//!
//! This module defines the CLI structure using clap's derive API.
//! Running without a subcommand starts the interactive shell.

use clap::{Parser, Subcommand};

/// Claimdesk - insurance query client
///
/// Submit natural-language insurance queries to a decision service and
/// review the adjudications it returns.
#[derive(Parser, Debug, Clone)]
#[command(name = "claimdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: Option<String>,

    /// Decision service base URL (overrides config and CLAIMDESK_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Command to execute (defaults to `shell`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for Claimdesk
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive query session
    Shell,

    /// Submit a single query and print the adjudication
    Query {
        /// Natural-language query text
        text: String,

        /// Print the result entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate counters reported by the decision service
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List documents known to the decision service
    Documents {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the decision service is up
    Health,

    /// Show the query history the service stored for a session
    ServerHistory {
        /// Session identifier to look up
        session_id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run, with `shell` filled in when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Shell)
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some(crate::config::DEFAULT_CONFIG_PATH.to_string()),
            base_url: None,
            verbose: false,
            no_color: false,
            command: None,
        }
    }
}
