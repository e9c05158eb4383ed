//! Claimdesk - insurance query client
//!
#![doc = "Claimdesk - insurance query client"]
#![doc = "Main entry point for the Claimdesk application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimdesk::cli::{Cli, Commands};
use claimdesk::commands;
use claimdesk::config::{Config, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration before tracing so the log format can come from it
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut config = Config::load(config_path, &cli)?;

    // Initialize tracing
    init_tracing(cli.verbose, config.logging.json);

    // Validate configuration
    config.validate()?;

    if !config.display.color {
        colored::control::set_override(false);
    }

    // Execute command
    match cli.command_or_default() {
        Commands::Shell => {
            commands::shell::run_shell(config).await?;
            Ok(())
        }
        Commands::Query { text, json } => {
            tracing::debug!(json, "Running one-shot query");
            commands::query::run_query(config, text, json).await?;
            Ok(())
        }
        Commands::Stats { json } => {
            commands::stats::show_stats(config, json).await?;
            Ok(())
        }
        Commands::Documents { json } => {
            commands::documents::list_documents(config, json).await?;
            Ok(())
        }
        Commands::Health => {
            commands::health::check_health(config).await?;
            Ok(())
        }
        Commands::ServerHistory { session_id, json } => {
            commands::server_history::show_server_history(config, session_id, json).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never mix with JSON printed on stdout.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "claimdesk=debug"
    } else {
        "claimdesk=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
