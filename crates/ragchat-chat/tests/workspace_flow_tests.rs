//! End-to-end flows through the real HTTP client against a mock backend

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ragchat_api::{ApiClient, FileTokenStore, MemoryTokenStore, TokenStore};
use ragchat_chat::{AuthSession, ChatStore, Dashboard, SendOutcome};
use ragchat_types::{Role, SessionId};

const TOKEN: &str = "jwt-for-a-b-com";

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "user": { "id": 1, "email": "a@b.com" }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_history(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/chat/history"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [
                {
                    "session_id": 7,
                    "title": "Onboarding",
                    "created_at": "2024-03-02T09:00:00",
                    "messages": [
                        { "id": 1, "role": "user", "content": "hi", "created_at": "2024-03-02T09:00:01",
                          "sources": null, "response_time_ms": null },
                        { "id": 2, "role": "assistant", "content": "hello", "created_at": "2024-03-02T09:00:02",
                          "sources": [], "response_time_ms": 95.5 }
                    ]
                },
                {
                    "session_id": 3,
                    "title": "Release",
                    "created_at": "2024-03-01T09:00:00",
                    "messages": [
                        { "id": 3, "role": "user", "content": "how?", "created_at": "2024-03-01T09:00:01",
                          "sources": null, "response_time_ms": null },
                        { "id": 4, "role": "assistant", "content": "tag it", "created_at": "2024-03-01T09:00:02",
                          "sources": [], "response_time_ms": 310.0 }
                    ]
                }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_then_hydrate_history() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_history(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(dir.path().join("token")));
    let client = Arc::new(ApiClient::new(server.uri(), tokens.clone()));

    let mut auth = AuthSession::new(client.clone(), tokens.clone());
    auth.restore().await;
    assert!(auth.must_authenticate());

    auth.login("a@b.com", "secret1").await.unwrap();
    assert_eq!(tokens.load().unwrap().as_deref(), Some(TOKEN));

    let store = ChatStore::mount(client.clone()).await;
    assert_eq!(store.error(), None);
    assert_eq!(store.sessions().len(), 2);
    assert!(store.sessions().iter().all(|s| !s.messages.is_empty()));
    assert_eq!(store.active_session_id(), Some(SessionId(7)));
    assert_eq!(store.active_session().unwrap().messages[1].latency_ms, Some(95.5));
}

#[tokio::test]
async fn test_restore_from_persisted_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 1, "email": "a@b.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token(TOKEN));
    let client = ApiClient::new(server.uri(), tokens.clone());
    let mut auth = AuthSession::new(client, tokens);

    let who = auth.restore().await.cloned();
    assert_eq!(who.map(|i| i.email), Some("a@b.com".to_string()));
    assert!(!auth.is_loading());
}

#[tokio::test]
async fn test_first_question_opens_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .and(body_json(json!({ "message": "What is X?", "session_id": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": 42,
            "answer": "X is...",
            "sources": [],
            "query_rewritten": null,
            "latency_ms": 120
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token(TOKEN));
    let mut store = ChatStore::new(ApiClient::new(server.uri(), tokens));

    assert_eq!(store.active_session_id(), None);
    let outcome = store.send_message("What is X?").await;

    assert_eq!(outcome, SendOutcome::Sent(SessionId(42)));
    assert_eq!(store.sessions().len(), 1);
    let session = &store.sessions()[0];
    assert_eq!(session.session_id, SessionId(42));
    assert!(session.title.starts_with("What is X?"));
    assert_eq!(
        session.messages.iter().map(|m| m.role).collect::<Vec<_>>(),
        vec![Role::User, Role::Assistant]
    );
    assert_eq!(session.messages[1].latency_ms, Some(120.0));
    assert_eq!(store.active_session_id(), Some(SessionId(42)));
}

#[tokio::test]
async fn test_query_rejected_by_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "Missing Authorization Header" })))
        .mount(&server)
        .await;

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let mut store = ChatStore::new(ApiClient::new(server.uri(), tokens));

    assert_eq!(store.send_message("hello").await, SendOutcome::Failed);
    assert_eq!(store.error(), Some("Failed to send message."));
    assert!(store.sessions().is_empty());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_dashboard_over_http() {
    let server = MockServer::start().await;
    mount_history(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usage": { "total_calls": 3, "average_latency_ms": 210.0 },
            "totals": { "sessions": 2, "assistant_messages": 2, "documents": 0 },
            "last_7_days": { "2024-03-02": 3 }
        })))
        .mount(&server)
        .await;

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token(TOKEN));
    let client = ApiClient::new(server.uri(), tokens);

    let mut dashboard = Dashboard::new();
    dashboard.load(&client).await;

    assert_eq!(dashboard.error(), None);
    assert_eq!(dashboard.summary().unwrap().usage.total_calls, 3);
    assert_eq!(dashboard.recent_sessions().len(), 2);
    assert_eq!(dashboard.recent_sessions()[1].title, "Release");
}
