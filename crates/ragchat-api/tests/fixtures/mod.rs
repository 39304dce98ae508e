#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-access-token";

/// Mock workspace backend for exercising the HTTP client
pub struct WorkspaceMockServer {
    server: MockServer,
}

impl WorkspaceMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Mock successful login for the given email
    pub async fn mock_login_success(&self, email: &str, password: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": email, "password": password })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_TOKEN,
                "user": { "id": 1, "email": email }
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock a rejected login
    pub async fn mock_login_invalid(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid credentials" })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock successful registration
    pub async fn mock_register_success(&self, email: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_TOKEN,
                "user": { "id": 2, "email": email }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock `/api/auth/me` accepting only the test token
    pub async fn mock_me(&self, email: &str) {
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "id": 1, "email": email }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock an expired token on `/api/auth/me`
    pub async fn mock_me_expired(&self) {
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "msg": "Token has expired" })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock the history endpoint with the given sessions payload
    pub async fn mock_history(&self, sessions: Value) {
        Mock::given(method("GET"))
            .and(path("/api/chat/history"))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessions": sessions })))
            .mount(&self.server)
            .await;
    }

    /// Mock a server failure on the history endpoint
    pub async fn mock_history_error(&self) {
        Mock::given(method("GET"))
            .and(path("/api/chat/history"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful query answered in `session_id`
    pub async fn mock_query(&self, session_id: i64, answer: &str, latency_ms: f64) {
        Mock::given(method("POST"))
            .and(path("/api/chat/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": session_id,
                "answer": answer,
                "sources": [{
                    "source": "notion://page/handbook",
                    "confidence": 0.82,
                    "score": 0.31,
                    "snippet": "The handbook says..."
                }],
                "query_rewritten": null,
                "latency_ms": latency_ms
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a query rejected with a server error message
    pub async fn mock_query_error(&self, status: u16, error: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat/query"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": error })))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful document upload
    pub async fn mock_upload(&self, chunks: u64, latency_ms: f64) {
        Mock::given(method("POST"))
            .and(path("/api/documents/upload"))
            .and(body_string_contains("name=\"file\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "document_id": 11,
                "chunks_ingested": chunks,
                "latency_ms": latency_ms
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the analytics summary
    pub async fn mock_analytics(&self) {
        Mock::given(method("GET"))
            .and(path("/api/analytics/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "usage": { "total_calls": 12, "average_latency_ms": 431.7 },
                "totals": { "sessions": 3, "assistant_messages": 9, "documents": 2 },
                "last_7_days": { "2024-03-01": 4, "2024-03-02": 8 }
            })))
            .mount(&self.server)
            .await;
    }
}

/// Two sessions, most recent first, each with one exchange
pub fn two_sessions() -> Value {
    json!([
        {
            "session_id": 7,
            "title": "Onboarding questions",
            "created_at": "2024-03-02T09:00:00.000001",
            "messages": [
                { "id": 13, "role": "user", "content": "Where is the handbook?",
                  "created_at": "2024-03-02T09:00:01", "sources": null, "response_time_ms": null },
                { "id": 14, "role": "assistant", "content": "In the wiki.",
                  "created_at": "2024-03-02T09:00:02",
                  "sources": [{ "source": "wiki", "confidence": 0.9, "score": 0.1, "snippet": "..." }],
                  "response_time_ms": 512.25 }
            ]
        },
        {
            "session_id": 3,
            "title": "Release process",
            "created_at": "2024-03-01T15:30:00",
            "messages": [
                { "id": 5, "role": "user", "content": "How do we release?",
                  "created_at": "2024-03-01T15:30:01", "sources": null, "response_time_ms": null },
                { "id": 6, "role": "assistant", "content": "Tag and push.",
                  "created_at": "2024-03-01T15:30:03", "sources": [], "response_time_ms": 1200.0 }
            ]
        }
    ])
}
