//! Interactive query shell
//!
//! Line editing runs on a dedicated thread driven one prompt at a time, so
//! the async loop can keep reacting to settled queries and background
//! refreshes while the user types.

use super::connect;
use super::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::controller::{QueryController, Settlement, SubmitRejected};
use crate::error::{ClaimdeskError, Result};
use crate::history::EntryId;
use crate::render;
use crate::state::ClientState;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// Ask the reader thread for one line
struct PromptRequest {
    prompt: String,
    initial: String,
}

/// What the reader thread got back from the terminal
enum InputEvent {
    Line(String),
    Interrupted,
    Eof,
    Failed(ReadlineError),
}

enum Flow {
    Continue,
    Exit,
}

/// Start the line editor thread
///
/// The thread exits after reporting end of input or a terminal failure, or
/// once either channel is closed.
fn spawn_reader() -> (
    mpsc::UnboundedSender<PromptRequest>,
    mpsc::UnboundedReceiver<InputEvent>,
) {
    let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel::<PromptRequest>();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                let _ = event_tx.send(InputEvent::Failed(err));
                return;
            }
        };

        while let Some(request) = prompt_rx.blocking_recv() {
            let event = match rl.readline_with_initial(&request.prompt, (&request.initial, "")) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        if let Err(err) = rl.add_history_entry(line.trim()) {
                            tracing::debug!("Failed to record input history: {}", err);
                        }
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(err) => InputEvent::Failed(err),
            };

            let done = matches!(event, InputEvent::Eof | InputEvent::Failed(_));
            if event_tx.send(event).is_err() || done {
                break;
            }
        }
    });

    (prompt_tx, event_rx)
}

async fn wait_in_flight<T>(handle: &mut Option<JoinHandle<T>>) -> std::result::Result<T, JoinError> {
    match handle {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Chooses the prompt text and the prefill for each line request
///
/// After a failed query the kept draft is offered once, on the first prompt
/// opened while no query is in flight.
#[derive(Debug, Default)]
struct PromptPlanner {
    restore_draft: bool,
}

impl PromptPlanner {
    fn next(&mut self, controller: &QueryController) -> PromptRequest {
        let busy = controller.is_busy();
        let prompt = if busy {
            format!("{} ", "claimdesk (busy)>".yellow())
        } else {
            format!("{} ", "claimdesk>".cyan())
        };
        let initial = if self.restore_draft && !busy {
            self.restore_draft = false;
            controller.draft().to_string()
        } else {
            String::new()
        };
        PromptRequest { prompt, initial }
    }

    /// Note a settled entry; returns true if its query will be offered again
    fn settled(&mut self, state: &ClientState, id: EntryId) -> bool {
        let failed = state
            .history()
            .get(id)
            .map_or(false, |entry| entry.is_synthetic());
        if failed {
            self.restore_draft = true;
        }
        failed
    }
}

struct Shell {
    config: Config,
    state: ClientState,
    controller: QueryController,
    in_flight: Option<JoinHandle<Settlement>>,
    prompts: PromptPlanner,
}

/// Start the interactive shell
///
/// # Examples
///
/// ```
/// use claimdesk::commands::shell;
/// use claimdesk::config::Config;
///
/// // In application code:
/// // shell::run_shell(Config::default()).await?;
/// ```
pub async fn run_shell(config: Config) -> Result<()> {
    tracing::info!(base_url = %config.backend.base_url, "Starting interactive shell");

    let mut state = ClientState::new(connect(&config)?);
    let failures = state.startup().await;

    let mut shell = Shell {
        config,
        state,
        controller: QueryController::new(),
        in_flight: None,
        prompts: PromptPlanner::default(),
    };
    shell.print_welcome();
    for err in &failures {
        println!("{}", format!("Startup refresh failed: {}", err).dimmed());
    }
    shell.run().await
}

impl Shell {
    async fn run(&mut self) -> Result<()> {
        let (prompt_tx, mut events) = spawn_reader();
        let mut awaiting_input = false;

        loop {
            if !awaiting_input {
                let request = self.prompts.next(&self.controller);
                if prompt_tx.send(request).is_err() {
                    break;
                }
                awaiting_input = true;
            }

            tokio::select! {
                event = events.recv() => {
                    awaiting_input = false;
                    match event {
                        Some(InputEvent::Line(line)) => {
                            if let Flow::Exit = self.handle_line(&line) {
                                break;
                            }
                        }
                        Some(InputEvent::Interrupted) => {
                            println!("{}", "Use /exit to leave the shell".dimmed());
                        }
                        Some(InputEvent::Eof) | None => break,
                        Some(InputEvent::Failed(err)) => {
                            return Err(ClaimdeskError::Readline(err).into());
                        }
                    }
                }
                joined = wait_in_flight(&mut self.in_flight), if self.in_flight.is_some() => {
                    self.in_flight = None;
                    self.handle_settled(joined);
                }
                update = self.state.next_update() => {
                    if let Some(err) = self.state.apply_update(update) {
                        println!("{}", format!("Background refresh failed: {}", err).dimmed());
                    }
                }
            }
        }

        if self.controller.is_busy() {
            tracing::info!("Leaving shell with a query in flight");
        }
        println!("Goodbye!");
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_special_command(line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{}", err.to_string().red());
                return Flow::Continue;
            }
        };

        match command {
            SpecialCommand::History => self.show_history(),
            SpecialCommand::Open(position) => match self.state.history_mut().select_position(position) {
                Some(id) => self.show_entry(id),
                None => println!(
                    "{}",
                    format!("No result at position {}", position).yellow()
                ),
            },
            SpecialCommand::Show => match self.state.history().selected_id() {
                Some(id) => self.show_entry(id),
                None => println!("{}", "No result selected yet".yellow()),
            },
            SpecialCommand::Stats => self.show_stats(),
            SpecialCommand::Documents => self.show_documents(),
            SpecialCommand::Refresh => {
                self.state.spawn_stats_refresh();
                self.state.spawn_documents_refresh();
                println!("{}", "Refreshing counters and documents...".dimmed());
            }
            SpecialCommand::Session => println!("Session: {}", self.state.identity().as_str().cyan()),
            SpecialCommand::Status => self.show_status(),
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit => {
                if self.controller.is_busy() {
                    println!(
                        "{}",
                        "A query is still in flight; its result will be discarded".yellow()
                    );
                }
                return Flow::Exit;
            }
            SpecialCommand::None => self.submit(line),
        }
        Flow::Continue
    }

    fn submit(&mut self, line: &str) {
        match self.controller.begin(line, self.state.identity()) {
            Ok(pending) => {
                println!("{}", "Submitting query...".dimmed());
                self.in_flight = Some(QueryController::dispatch(self.state.backend(), pending));
            }
            Err(SubmitRejected::Busy) => {
                println!(
                    "{}",
                    "A query is already in flight; wait for its result before submitting another"
                        .yellow()
                );
            }
            Err(SubmitRejected::Empty) => {}
        }
    }

    fn handle_settled(&mut self, joined: std::result::Result<Settlement, JoinError>) {
        let id = match joined {
            Ok(settlement) => Some(self.controller.settle(&mut self.state, settlement)),
            Err(err) => {
                tracing::error!("Query task failed: {}", err);
                self.controller.settle_aborted(&mut self.state, err)
            }
        };

        let Some(id) = id else {
            return;
        };
        println!();
        self.show_entry(id);

        if self.prompts.settled(&self.state, id) {
            println!(
                "{}",
                "Your query was kept and will be restored on the next prompt".dimmed()
            );
        }
    }

    fn show_entry(&self, id: EntryId) {
        if let Some(entry) = self.state.history().get(id) {
            println!("{}", render::entry_detail(entry, &self.config.display));
        }
    }

    fn show_history(&self) {
        let history = self.state.history();
        if history.is_empty() {
            println!("{}", "No results yet in this session".yellow());
            return;
        }
        println!("\nResults ({}):", history.len());
        render::history_table(history, &self.config.display).printstd();
        println!("Use /open <position> to view a result\n");
    }

    fn show_stats(&self) {
        let stats = self.state.stats();
        match stats.snapshot() {
            Some(snapshot) => println!("{}", render::stats_line(snapshot)),
            None => println!("{}", "Counters unavailable".yellow()),
        }
        println!("{}", render::freshness(stats.state()));
    }

    fn show_documents(&self) {
        let catalog = self.state.documents();
        if catalog.documents().is_empty() {
            println!("{}", "No documents known".yellow());
        } else {
            println!("\nDocuments:");
            render::documents_table(catalog.documents()).printstd();
        }
        println!("{}", render::freshness(catalog.state()));
    }

    fn show_status(&self) {
        println!("\n{}", "Status".bold());
        println!("  Service:  {}", self.config.backend.base_url);
        println!("  Session:  {}", self.state.identity());
        match self.controller.in_flight() {
            Some(query) => println!("  Query:    {} {}", "in flight".yellow(), query),
            None => println!("  Query:    {}", "idle".green()),
        }
        if !self.controller.draft().is_empty() {
            println!("  Draft:    {}", self.controller.draft());
        }
        println!("  Results:  {}", self.state.history().len());
        println!("  Counters: {}", render::freshness(self.state.stats().state()));
        println!();
    }

    fn print_welcome(&self) {
        println!("{}", "Claimdesk".bold());
        println!("Connected to {}", self.config.backend.base_url);
        println!("Session {}", self.state.identity().as_str().cyan());
        self.show_stats();
        println!("Type /help for commands, /exit to leave.\n");
    }
}
