use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

use ragchat_types::{
    AnalyticsSummary, AuthResponse, ChatSession, Credentials, DocumentSummary, DocumentsResponse,
    ErrorBody, HistoryResponse, Identity, MeResponse, QueryRequest, QueryResponse, UploadResponse,
};

use crate::error::ApiError;
use crate::token::TokenStore;

/// Default backend address (the development server)
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Map a document path to one of the MIME types the ingestion endpoint accepts
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "md" | "markdown" => Some("text/markdown"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Client for the workspace REST API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_http_client(base_url, tokens, reqwest::Client::new())
    }

    pub fn with_http_client(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
        http: reqwest::Client,
    ) -> Self {
        // Ensure base_url doesn't end with a slash
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http, tokens }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token slot read by every authenticated request
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "sending request");
        self.http.request(method, url)
    }

    /// Build a request carrying the persisted bearer token, if any
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.request(method, path);
        match self.tokens.load()? {
            Some(token) => {
                tracing::trace!(token = %redact(&token), "attaching bearer token");
                Ok(builder.bearer_auth(token))
            }
            None => Ok(builder),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            tracing::debug!(status = status.as_u16(), ?message, "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// `GET /api/auth/me`
    pub async fn me(&self) -> Result<Identity, ApiError> {
        let builder = self.authorized(Method::GET, "/api/auth/me")?;
        let resp: MeResponse = self.send_json(builder).await?;
        Ok(resp.user)
    }

    /// `POST /api/auth/login`. The returned token is not persisted here.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post_credentials("/api/auth/login", email, password).await
    }

    /// `POST /api/auth/register`. The returned token is not persisted here.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post_credentials("/api/auth/register", email, password).await
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let builder = self.request(Method::POST, path).json(&body);
        self.send_json(builder).await
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    /// `GET /api/chat/history`, most recent session first
    pub async fn history(&self) -> Result<Vec<ChatSession>, ApiError> {
        let builder = self.authorized(Method::GET, "/api/chat/history")?;
        let resp: HistoryResponse = self.send_json(builder).await?;
        Ok(resp.sessions)
    }

    /// `POST /api/chat/query`
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        let builder = self.authorized(Method::POST, "/api/chat/query")?.json(request);
        self.send_json(builder).await
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// `POST /api/documents/upload` with the file in the multipart `file` field
    pub async fn upload_document(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_for_path(path).unwrap_or("application/octet-stream");

        tracing::debug!(file = %file_name, mime, size = bytes.len(), "uploading document");

        let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
        let form = Form::new().part("file", part);
        let builder = self
            .authorized(Method::POST, "/api/documents/upload")?
            .multipart(form);
        self.send_json(builder).await
    }

    /// `GET /api/documents`
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        let builder = self.authorized(Method::GET, "/api/documents")?;
        let resp: DocumentsResponse = self.send_json(builder).await?;
        Ok(resp.documents)
    }

    // ------------------------------------------------------------------
    // Analytics
    // ------------------------------------------------------------------

    /// `GET /api/analytics/summary`
    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        let builder = self.authorized(Method::GET, "/api/analytics/summary")?;
        self.send_json(builder).await
    }
}

fn redact(token: &str) -> String {
    format!("{}***", token.chars().take(6).collect::<String>())
}
