//! Special commands parser for the interactive shell
//!
//! Lines starting with `/` are shell commands; `exit` and `quit` are
//! accepted bare. Everything else is submitted as a query. Commands are
//! case-insensitive.

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands understood by the interactive shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// List all results of this session
    History,

    /// Open the result at a 1-based history position (1 = newest)
    Open(usize),

    /// Show the currently selected result
    Show,

    /// Show mirrored aggregate counters
    Stats,

    /// Show the mirrored document catalog
    Documents,

    /// Refresh stats and documents in the background
    Refresh,

    /// Print the session identity
    Session,

    /// Show busy state, draft, and connection details
    Status,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; submit the line as a query
    None,
}

/// Parse a user input line into a special command
///
/// # Errors
///
/// Returns [`CommandError`] for `/`-prefixed input that is not a valid
/// command.
///
/// # Examples
///
/// ```
/// use claimdesk::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/open 2").unwrap(), SpecialCommand::Open(2));
/// assert_eq!(
///     parse_special_command("knee surgery in Pune").unwrap(),
///     SpecialCommand::None
/// );
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = lower.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let arg = parts.next();
    let extra = parts.next();

    if let Some(extra) = extra {
        return Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: extra.to_string(),
        });
    }

    match (command, arg) {
        ("/history" | "/h", None) => Ok(SpecialCommand::History),
        ("/show", None) => Ok(SpecialCommand::Show),
        ("/stats", None) => Ok(SpecialCommand::Stats),
        ("/docs" | "/documents", None) => Ok(SpecialCommand::Documents),
        ("/refresh", None) => Ok(SpecialCommand::Refresh),
        ("/session", None) => Ok(SpecialCommand::Session),
        ("/status", None) => Ok(SpecialCommand::Status),
        ("/help" | "/?", None) => Ok(SpecialCommand::Help),
        ("/exit" | "/quit" | "exit" | "quit", None) => Ok(SpecialCommand::Exit),

        ("/open" | "/select", None) => Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: format!("{} <position>", command),
        }),
        ("/open" | "/select", Some(position)) => match position.trim_start_matches('#').parse() {
            Ok(n) if n > 0 => Ok(SpecialCommand::Open(n)),
            _ => Err(CommandError::UnsupportedArgument {
                command: command.to_string(),
                arg: position.to_string(),
            }),
        },

        (
            "/history" | "/h" | "/show" | "/stats" | "/docs" | "/documents" | "/refresh"
            | "/session" | "/status" | "/help" | "/?" | "/exit" | "/quit" | "exit" | "quit",
            Some(arg),
        ) => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the interactive shell
pub fn print_help() {
    println!("\n{}", "Claimdesk shell".bold());
    println!("Type a query in plain language, for example:");
    println!(
        "  {}",
        "46-year-old male, knee surgery in Pune, 3-month-old insurance policy".cyan()
    );
    println!();
    println!("{}", "Commands:".bold());
    println!("  /history, /h        List results from this session (newest first)");
    println!("  /open <n>           Open result at position n (1 = newest)");
    println!("  /show               Show the selected result");
    println!("  /stats              Show service counters");
    println!("  /docs               List documents known to the service");
    println!("  /refresh            Refresh counters and documents");
    println!("  /session            Print this session's identity");
    println!("  /status             Show whether a query is in flight");
    println!("  /help, /?           Show this help");
    println!("  /exit, exit, quit   Leave the shell");
    println!();
}
