//! Terminal presentation of client state
//!
//! Formatting helpers return strings or tables so the command handlers only
//! decide *where* output goes.

use crate::backend::{DocumentInfo, ServerHistoryRecord, StatsSnapshot};
use crate::config::DisplayConfig;
use crate::history::{Decision, ResultEntry, ResultHistory};
use crate::mirror::ReadThrough;
use colored::Colorize;
use prettytable::{format, row, Table};

/// Colored tag for a decision
///
/// Unrecognized values get their own neutral style so they are never
/// mistaken for an error.
pub fn decision_tag(decision: &Decision) -> String {
    match decision {
        Decision::Approved => "APPROVED".green().bold().to_string(),
        Decision::Rejected => "REJECTED".red().bold().to_string(),
        Decision::Error => "ERROR".yellow().bold().to_string(),
        Decision::Unrecognized(raw) => format!("{} ({})", "INDETERMINATE".blue(), raw),
    }
}

/// Amount with thousands separators, or "not applicable"
pub fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(value) if value.is_finite() => {
            let fixed = format!("{:.2}", value.abs());
            let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
            let grouped = group_thousands(whole);
            if value < 0.0 {
                format!("-{}.{}", grouped, frac)
            } else {
                format!("{}.{}", grouped, frac)
            }
        }
        Some(_) | None => "not applicable".to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_confidence(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

pub fn format_processing_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{:.2}s", s),
        None => "not available".to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let head: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full detail view of one entry
pub fn entry_detail(entry: &ResultEntry, display: &DisplayConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}  {}\n",
        entry.id().to_string().cyan(),
        decision_tag(entry.decision()),
        entry.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Query:           {}\n", entry.query()));
    out.push_str(&format!(
        "Confidence:      {}\n",
        format_confidence(entry.confidence_score())
    ));
    out.push_str(&format!("Amount:          {}\n", format_amount(entry.amount())));
    out.push_str(&format!(
        "Processing time: {}\n",
        format_processing_time(entry.processing_time())
    ));
    out.push_str(&format!("Justification:   {}\n", entry.justification()));

    let clauses = entry.referenced_clauses();
    if clauses.is_empty() {
        out.push_str("Referenced clauses: none\n");
    } else {
        out.push_str("Referenced clauses:\n");
        for clause in clauses.iter().take(display.max_clauses) {
            out.push_str(&format!(
                "  - {} (relevance {:.2})\n",
                clause.document, clause.relevance_score
            ));
            if let Some(excerpt) = clause.content.as_deref().map(collapse_whitespace) {
                if !excerpt.is_empty() {
                    out.push_str(&format!(
                        "    \"{}\"\n",
                        truncate(&excerpt, display.preview_width)
                    ));
                }
            }
        }
        if clauses.len() > display.max_clauses {
            out.push_str(&format!(
                "  ... {} more\n",
                clauses.len() - display.max_clauses
            ));
        }
    }
    out
}

/// Table of all entries, newest first, marking the selection
pub fn history_table(history: &ResultHistory, display: &DisplayConfig) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row![
        "".bold(),
        "Pos".bold(),
        "ID".bold(),
        "Decision".bold(),
        "Confidence".bold(),
        "Query".bold(),
        "Completed".bold()
    ]);

    let selected = history.selected_id();
    for (idx, entry) in history.iter().enumerate() {
        let marker = if Some(entry.id()) == selected { ">" } else { "" };
        table.add_row(row![
            marker,
            idx + 1,
            entry.id().to_string().cyan(),
            decision_tag(entry.decision()),
            format_confidence(entry.confidence_score()),
            truncate(entry.query(), display.preview_width),
            entry.timestamp().format("%H:%M:%S")
        ]);
    }
    table
}

/// Table of the document catalog
pub fn documents_table(documents: &[DocumentInfo]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row![
        "ID".bold(),
        "Name".bold(),
        "Type".bold(),
        "Processed".bold(),
        "Uploaded".bold()
    ]);
    for doc in documents {
        let processed = if doc.processed {
            "yes".green()
        } else {
            "no".yellow()
        };
        let uploaded = doc
            .upload_date
            .as_deref()
            .and_then(crate::backend::types::parse_backend_timestamp)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![
            doc.id,
            doc.name,
            doc.kind.as_deref().unwrap_or("-"),
            processed,
            uploaded
        ]);
    }
    table
}

/// One-line summary of aggregate counters
pub fn stats_line(stats: &StatsSnapshot) -> String {
    let status = if stats.system_status.eq_ignore_ascii_case("operational") {
        stats.system_status.green()
    } else {
        stats.system_status.yellow()
    };
    format!(
        "Documents: {}  Queries: {}  Sessions: {}  Status: {}",
        stats.total_documents, stats.total_queries, stats.total_sessions, status
    )
}

/// Describe how fresh a mirrored snapshot is
pub fn freshness<T>(mirror: &ReadThrough<T>) -> String {
    let refreshed = match mirror.refreshed_at() {
        Some(ts) => format!("refreshed {}", ts.format("%H:%M:%S UTC")),
        None => "never refreshed".to_string(),
    };
    match mirror.last_error() {
        Some(err) => format!("{} (last refresh failed: {})", refreshed, err)
            .dimmed()
            .to_string(),
        None => refreshed.dimmed().to_string(),
    }
}

/// Table of a session's server-side history
pub fn server_history_table(records: &[ServerHistoryRecord], display: &DisplayConfig) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row![
        "ID".bold(),
        "Decision".bold(),
        "Query".bold(),
        "Time".bold(),
        "Timestamp".bold()
    ]);
    for record in records {
        let decision = record
            .decision()
            .map(|d| decision_tag(&Decision::parse(d)))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![
            record.id,
            decision,
            truncate(&record.query, display.preview_width),
            format_processing_time(record.processing_time),
            record.timestamp.as_deref().unwrap_or("-")
        ]);
    }
    table
}
