//! Chat session store.
//!
//! Holds the session collection (most recent first), the active selection and
//! the status of the outstanding query. Every backend call is split into a
//! `begin_*` step that records intent and a `complete_*` step that applies the
//! result as one state transition. [`ChatStore::send_message`] and
//! [`ChatStore::reload_history`] run both steps around the backend call; the
//! split form lets a caller keep the request elsewhere (a spawned task, a
//! spinner loop) and hand the result back when it resolves.
//!
//! Completions are applied in the order they are handed back, not the order
//! they were issued: with two overlapping operations on the same state, the
//! later-resolving one wins. A full history reload replaces the collection
//! outright and can drop a send that was applied before it. Callers avoid both
//! by not issuing a send while [`ChatStore::is_loading`] is true.

use ragchat_api::{ApiError, ChatBackend};
use ragchat_types::{ChatMessage, ChatSession, QueryRequest, QueryResponse, SessionId};

const HISTORY_ERROR: &str = "Failed to load history.";
const SEND_ERROR: &str = "Failed to send message.";

/// A query that has been issued but not yet applied
#[derive(Debug, Clone)]
pub struct PendingQuery {
    ticket: u64,
    content: String,
    request: QueryRequest,
}

impl PendingQuery {
    /// Body to post to `/api/chat/query`
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A history reload that has been issued but not yet applied
#[derive(Debug, Clone)]
pub struct PendingReload {
    ticket: u64,
}

/// What happened to a completion handed back to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// The store was closed before the result arrived
    Discarded,
}

/// Result of [`ChatStore::send_message`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing was sent
    Skipped,
    /// Answer appended to the given session
    Sent(SessionId),
    /// The store's error field holds the message
    Failed,
    Discarded,
}

pub struct ChatStore<B> {
    backend: B,
    sessions: Vec<ChatSession>,
    active_session_id: Option<SessionId>,
    loading: bool,
    error: Option<String>,
    closed: bool,
    issued: u64,
    last_applied: u64,
}

impl<B: ChatBackend> ChatStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sessions: Vec::new(),
            active_session_id: None,
            loading: false,
            error: None,
            closed: false,
            issued: 0,
            last_applied: 0,
        }
    }

    /// Construct a store and hydrate it from the backend's history
    pub async fn mount(backend: B) -> Self {
        let mut store = Self::new(backend);
        store.reload_history().await;
        store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.active_session_id
    }

    pub fn session(&self, id: SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.session_id == id)
    }

    /// The session matching the active id, if it exists in the collection
    pub fn active_session(&self) -> Option<&ChatSession> {
        self.session(self.active_session_id?)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Select a session. The id is not checked against the collection.
    pub fn set_active_session_id(&mut self, id: SessionId) {
        self.active_session_id = Some(id);
    }

    /// Start a fresh session: the next message sent opens it server-side.
    /// Nothing is created locally until then.
    pub fn create_session(&mut self) {
        self.active_session_id = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Mark the consuming view as torn down. Results arriving afterwards are
    /// dropped instead of applied.
    pub fn close(&mut self) {
        self.closed = true;
        self.loading = false;
    }

    fn next_ticket(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn note_applied(&mut self, ticket: u64, what: &str) {
        if ticket < self.last_applied {
            tracing::debug!(ticket, last_applied = self.last_applied, what, "completion resolved out of issue order");
        }
        self.last_applied = self.last_applied.max(ticket);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn begin_reload(&mut self) -> PendingReload {
        PendingReload {
            ticket: self.next_ticket(),
        }
    }

    /// Replace the whole collection with the server's snapshot. On failure the
    /// previous collection is kept and the error is set.
    pub fn complete_reload(
        &mut self,
        pending: PendingReload,
        result: Result<Vec<ChatSession>, ApiError>,
    ) -> Completion {
        if self.closed {
            tracing::debug!(ticket = pending.ticket, "dropping history for closed store");
            return Completion::Discarded;
        }
        self.note_applied(pending.ticket, "reload");

        match result {
            Ok(sessions) => {
                tracing::debug!(count = sessions.len(), "history loaded");
                self.sessions = sessions;
                if self.active_session_id.is_none() {
                    self.active_session_id = self.sessions.first().map(|s| s.session_id);
                }
                Completion::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "history load failed");
                self.error = Some(e.user_message(HISTORY_ERROR));
                Completion::Failed
            }
        }
    }

    pub async fn reload_history(&mut self) -> Completion {
        let pending = self.begin_reload();
        let result = self.backend.history().await;
        self.complete_reload(pending, result)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Record a query against the active session. Returns `None` for blank
    /// input, in which case no state changes.
    pub fn begin_send(&mut self, content: &str) -> Option<PendingQuery> {
        if content.trim().is_empty() {
            return None;
        }
        self.loading = true;
        self.error = None;

        Some(PendingQuery {
            ticket: self.next_ticket(),
            content: content.to_string(),
            request: QueryRequest {
                message: content.to_string(),
                session_id: self.active_session_id,
                title: None,
            },
        })
    }

    /// Apply a query result. `loading` is cleared whatever the outcome.
    pub fn complete_send(
        &mut self,
        pending: PendingQuery,
        result: Result<QueryResponse, ApiError>,
    ) -> Completion {
        if self.closed {
            tracing::debug!(ticket = pending.ticket, "dropping answer for closed store");
            return Completion::Discarded;
        }
        self.loading = false;
        self.note_applied(pending.ticket, "send");

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                self.error = Some(e.user_message(SEND_ERROR));
                return Completion::Failed;
            }
        };

        let session_id = resp.session_id;
        let user = ChatMessage::user(pending.content.as_str());
        let assistant = ChatMessage::assistant(resp.answer, resp.sources, resp.latency_ms);

        match self.sessions.iter_mut().find(|s| s.session_id == session_id) {
            Some(session) => {
                session.messages.push(user);
                session.messages.push(assistant);
            }
            None => {
                tracing::debug!(%session_id, "server opened a new session");
                let session = ChatSession::provisional(session_id, &pending.content, vec![user, assistant]);
                self.sessions.insert(0, session);
            }
        }

        if self.active_session_id.is_none() {
            self.active_session_id = Some(session_id);
        }
        Completion::Applied
    }

    /// Send `content` to the active session (or a new one when none is
    /// selected) and apply the answer.
    pub async fn send_message(&mut self, content: &str) -> SendOutcome {
        let Some(pending) = self.begin_send(content) else {
            return SendOutcome::Skipped;
        };
        let result = self.backend.query(pending.request()).await;
        let session_id = result.as_ref().ok().map(|r| r.session_id);

        match (self.complete_send(pending, result), session_id) {
            (Completion::Applied, Some(id)) => SendOutcome::Sent(id),
            (Completion::Discarded, _) => SendOutcome::Discarded,
            _ => SendOutcome::Failed,
        }
    }
}
