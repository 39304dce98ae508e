//! Core types for ragchat
//!
//! This crate provides the domain model shared by the API client, the state
//! managers and the terminal front end. It performs no I/O.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod wire;

pub use wire::*;

// ============================================================================
// Constants
// ============================================================================

/// Number of characters of the first user message used as a provisional title
pub const TITLE_PREVIEW_CHARS: usize = 36;

/// Title used when the provisional title would be empty
pub const FALLBACK_SESSION_TITLE: &str = "New session";

/// Number of sessions shown in the dashboard's recent list
pub const RECENT_SESSIONS_LIMIT: usize = 5;

/// Largest document the ingestion endpoint accepts (16 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Minimum password length accepted by the sign-in form
pub const MIN_PASSWORD_CHARS: usize = 6;

// ============================================================================
// Deserialization helpers
// ============================================================================

/// Deserialize a value that may be `null`, falling back to `Default`
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional timestamp.
///
/// Accepts RFC 3339 strings as well as naive ISO-8601 strings without an
/// offset, which are taken to be UTC. Anything unparseable becomes `None`.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Parse a backend timestamp string
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Identity
// ============================================================================

/// The authenticated user as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
}

// ============================================================================
// Chat Types
// ============================================================================

/// Server-assigned session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for SessionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(SessionId)
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Citation evidence attached to an assistant answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// One message in a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub sources: Vec<Source>,
    #[serde(default, alias = "response_time_ms")]
    pub latency_ms: Option<f64>,
}

impl ChatMessage {
    /// A user message stamped with the local clock
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: None,
            role: Role::User,
            content: content.into(),
            created_at: Some(Utc::now()),
            sources: Vec::new(),
            latency_ms: None,
        }
    }

    /// An assistant message built from a query response
    pub fn assistant(content: impl Into<String>, sources: Vec<Source>, latency_ms: Option<f64>) -> Self {
        Self {
            id: None,
            role: Role::Assistant,
            content: content.into(),
            created_at: Some(Utc::now()),
            sources,
            latency_ms,
        }
    }
}

/// A titled conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: SessionId,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Build a session record for a session the server has just created
    pub fn provisional(session_id: SessionId, first_message: &str, messages: Vec<ChatMessage>) -> Self {
        Self {
            session_id,
            title: provisional_title(first_message),
            created_at: Some(Utc::now()),
            messages,
        }
    }
}

/// First [`TITLE_PREVIEW_CHARS`] characters of `content`, or the fallback title
pub fn provisional_title(content: &str) -> String {
    let title: String = content.chars().take(TITLE_PREVIEW_CHARS).collect();
    if title.is_empty() {
        FALLBACK_SESSION_TITLE.to_string()
    } else {
        title
    }
}
