//! Request and response bodies of the workspace REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{deserialize_null_default, deserialize_timestamp, ChatSession, Identity, SessionId, Source};

// ============================================================================
// Auth
// ============================================================================

/// Body of `POST /api/auth/login` and `POST /api/auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: Identity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: Identity,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub sessions: Vec<ChatSession>,
}

/// Body of `POST /api/chat/query`. `session_id: null` asks the server to
/// open a new session.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub message: String,
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub session_id: SessionId,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub answer: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub latency_ms: Option<f64>,
    #[serde(default)]
    pub query_rewritten: Option<String>,
}

// ============================================================================
// Documents
// ============================================================================

/// Response of `POST /api/documents/upload`.
///
/// A document whose content was already ingested comes back as
/// `{message, document_id}` with no chunk count.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub document_id: Option<i64>,
    #[serde(default)]
    pub chunks_ingested: Option<u64>,
    #[serde(default)]
    pub latency_ms: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub stored_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub chunk_count: u64,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub documents: Vec<DocumentSummary>,
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UsageStats {
    #[serde(default)]
    pub total_calls: u64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub average_latency_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Totals {
    #[serde(default)]
    pub sessions: u64,
    #[serde(default)]
    pub assistant_messages: u64,
    #[serde(default)]
    pub documents: u64,
}

/// Response of `GET /api/analytics/summary`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub usage: UsageStats,
    #[serde(default)]
    pub totals: Totals,
    /// Day label (`YYYY-MM-DD`) to call count
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub last_7_days: BTreeMap<String, u64>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error payload returned by the backend on non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
