//! Scripted in-process backend for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ragchat_api::{AnalyticsBackend, ApiError, AuthBackend, ChatBackend, DocumentBackend};
use ragchat_types::{
    AnalyticsSummary, AuthResponse, ChatMessage, ChatSession, DocumentSummary, Identity,
    QueryRequest, QueryResponse, SessionId, Source, UploadResponse,
};

type Script<T> = Mutex<VecDeque<Result<T, ApiError>>>;

#[derive(Default)]
pub struct FakeBackend {
    pub me: Script<Identity>,
    pub auth: Script<AuthResponse>,
    pub history: Script<Vec<ChatSession>>,
    pub queries: Script<QueryResponse>,
    pub uploads: Script<UploadResponse>,
    pub analytics: Script<AnalyticsSummary>,
    pub calls: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<QueryRequest>>,
    pub uploaded: Mutex<Vec<PathBuf>>,
}

fn next<T>(script: &Script<T>, what: &str) -> Result<T, ApiError> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("no scripted response for {}", what))
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_me(&self, result: Result<Identity, ApiError>) {
        self.me.lock().unwrap().push_back(result);
    }

    pub fn push_auth(&self, result: Result<AuthResponse, ApiError>) {
        self.auth.lock().unwrap().push_back(result);
    }

    pub fn push_history(&self, result: Result<Vec<ChatSession>, ApiError>) {
        self.history.lock().unwrap().push_back(result);
    }

    pub fn push_query(&self, result: Result<QueryResponse, ApiError>) {
        self.queries.lock().unwrap().push_back(result);
    }

    pub fn push_upload(&self, result: Result<UploadResponse, ApiError>) {
        self.uploads.lock().unwrap().push_back(result);
    }

    pub fn push_analytics(&self, result: Result<AnalyticsSummary, ApiError>) {
        self.analytics.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn me(&self) -> Result<Identity, ApiError> {
        self.record("me");
        next(&self.me, "me")
    }

    async fn login(&self, email: &str, _password: &str) -> Result<AuthResponse, ApiError> {
        self.record(&format!("login:{}", email));
        next(&self.auth, "login")
    }

    async fn register(&self, email: &str, _password: &str) -> Result<AuthResponse, ApiError> {
        self.record(&format!("register:{}", email));
        next(&self.auth, "register")
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn history(&self) -> Result<Vec<ChatSession>, ApiError> {
        self.record("history");
        next(&self.history, "history")
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        self.record("query");
        self.sent.lock().unwrap().push(request.clone());
        next(&self.queries, "query")
    }
}

#[async_trait]
impl DocumentBackend for FakeBackend {
    async fn upload_document(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        self.record("upload");
        self.uploaded.lock().unwrap().push(path.to_path_buf());
        next(&self.uploads, "upload")
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        self.record("documents");
        Ok(Vec::new())
    }
}

#[async_trait]
impl AnalyticsBackend for FakeBackend {
    async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        self.record("analytics");
        next(&self.analytics, "analytics")
    }
}

pub fn identity(email: &str) -> Identity {
    Identity {
        id: 1,
        email: email.to_string(),
    }
}

pub fn auth_response(token: &str, email: &str) -> AuthResponse {
    AuthResponse {
        access_token: token.to_string(),
        user: identity(email),
    }
}

pub fn server_error(status: u16, message: Option<&str>) -> ApiError {
    ApiError::Status {
        status,
        message: message.map(str::to_string),
    }
}

pub fn answer(session_id: i64, text: &str) -> QueryResponse {
    QueryResponse {
        session_id: SessionId(session_id),
        answer: text.to_string(),
        sources: vec![Source {
            source: "handbook.md".to_string(),
            confidence: 0.75,
            score: 0.4,
            snippet: "...".to_string(),
            metadata: None,
        }],
        latency_ms: Some(120.0),
        query_rewritten: None,
    }
}

pub fn session(id: i64, title: &str, exchanges: usize) -> ChatSession {
    let mut messages = Vec::new();
    for i in 0..exchanges {
        messages.push(ChatMessage::user(format!("question {}", i)));
        messages.push(ChatMessage::assistant(format!("answer {}", i), Vec::new(), Some(10.0)));
    }
    ChatSession {
        session_id: SessionId(id),
        title: title.to_string(),
        created_at: None,
        messages,
    }
}
