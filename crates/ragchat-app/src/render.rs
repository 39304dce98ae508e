//! Terminal rendering for sessions, messages and analytics
//!
//! Every function returns the text to print so callers decide where it goes.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use std::fmt::Write as _;

use ragchat_chat::Dashboard;
use ragchat_types::{ChatMessage, ChatSession, DocumentSummary, Role, SessionId, Source};

const SNIPPET_CHARS: usize = 240;

pub const EMPTY_CHAT_HINT: &str = "Start a conversation to see responses and rich source citations.";
pub const EMPTY_USAGE_HINT: &str = "Run some queries to populate the usage timeline.";

fn clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

fn short_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %-d, %H:%M").to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}

/// One message. Assistant messages carry latency, time and their sources.
pub fn message(msg: &ChatMessage) -> String {
    let mut out = String::new();
    match msg.role {
        Role::User => {
            let _ = writeln!(out, "{} {}", "You:".bright_blue().bold(), msg.content);
        }
        Role::Assistant => {
            let _ = writeln!(out, "{} {}", "Assistant:".bright_green().bold(), msg.content);

            let mut meta = Vec::new();
            if let Some(latency) = msg.latency_ms.filter(|ms| *ms > 0.0) {
                meta.push(format!("{:.0} ms", latency));
            }
            if let Some(ts) = msg.created_at {
                meta.push(clock(ts));
            }
            if !meta.is_empty() {
                let _ = writeln!(out, "  {}", meta.join(" · ").bright_black());
            }
            out.push_str(&sources(&msg.sources));
        }
    }
    out
}

pub fn sources(sources: &[Source]) -> String {
    if sources.is_empty() {
        return String::new();
    }
    let mut out = format!("  {}\n", "Sources".bright_black().bold());
    for (i, source) in sources.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{}] {} {}",
            i + 1,
            source.source.bold(),
            format!("{:.0}%", source.confidence * 100.0).cyan()
        );
        let _ = writeln!(out, "      {}", truncate(&source.snippet, SNIPPET_CHARS).bright_black());
    }
    out
}

/// Full transcript of one session, or the empty-state hint
pub fn transcript(session: Option<&ChatSession>) -> String {
    match session {
        Some(session) if !session.messages.is_empty() => {
            session.messages.iter().map(message).collect::<Vec<_>>().join("\n")
        }
        _ => format!("{}\n", EMPTY_CHAT_HINT.bright_black()),
    }
}

/// Session list in store order with the active entry marked
pub fn session_list(sessions: &[ChatSession], active: Option<SessionId>) -> String {
    if sessions.is_empty() {
        return format!("{}\n", "No sessions yet.".bright_black());
    }
    let mut out = format!("{}\n", "Sessions".bold());
    for session in sessions {
        let marker = if Some(session.session_id) == active { "▸" } else { " " };
        let when = session.created_at.map(short_date).unwrap_or_default();
        let line = format!(
            "{} #{:<5} {}  {}",
            marker,
            session.session_id,
            session.title,
            when.bright_black()
        );
        if Some(session.session_id) == active {
            let _ = writeln!(out, "{}", line.bright_cyan());
        } else {
            let _ = writeln!(out, "{}", line);
        }
    }
    out
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    if let Some(error) = dashboard.error() {
        return format!("{}\n", error.red());
    }
    let Some(summary) = dashboard.summary() else {
        return format!("{}\n", "Loading analytics...".bright_black());
    };

    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {}", "Total Queries".bright_black(), summary.usage.total_calls.to_string().bold());
    let _ = writeln!(
        out,
        "{:<20} {}",
        "Average Latency".bright_black(),
        format!("{:.0} ms", summary.usage.average_latency_ms).bold()
    );
    let _ = writeln!(out, "{:<20} {}", "Documents Ingested".bright_black(), summary.totals.documents.to_string().bold());

    let _ = writeln!(out, "\n{}", "RECENT SESSIONS".bold());
    for recent in dashboard.recent_sessions() {
        let title = if recent.title.is_empty() { "Untitled session" } else { recent.title.as_str() };
        let when = recent.created_at.map(short_date).unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}  {}  Messages: {}",
            title,
            when.bright_black(),
            recent.message_count
        );
    }

    let _ = writeln!(out, "\n{}", "USAGE (7 DAYS)".bold());
    if summary.last_7_days.is_empty() {
        let _ = writeln!(out, "  {}", EMPTY_USAGE_HINT.bright_black());
    }
    for (day, count) in &summary.last_7_days {
        let _ = writeln!(out, "  {}  {}", day.bright_black(), count);
    }
    out
}

pub fn documents(docs: &[DocumentSummary]) -> String {
    if docs.is_empty() {
        return format!("{}\n", "No documents ingested yet.".bright_black());
    }
    let mut out = String::new();
    for doc in docs {
        let when = doc.created_at.map(short_date).unwrap_or_default();
        let _ = writeln!(
            out,
            "#{:<4} {}  {} chunks  {}",
            doc.id,
            doc.filename.bold(),
            doc.chunk_count,
            when.bright_black()
        );
    }
    out
}
