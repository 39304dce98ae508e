//! Backend traits the state managers are written against.
//!
//! [`ApiClient`] implements all of them over HTTP.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use ragchat_types::{
    AnalyticsSummary, AuthResponse, ChatSession, DocumentSummary, Identity, QueryRequest,
    QueryResponse, UploadResponse,
};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Identity endpoints
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Look up the identity proven by the persisted token
    async fn me(&self) -> Result<Identity, ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;
}

/// Conversation endpoints
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn history(&self) -> Result<Vec<ChatSession>, ApiError>;

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError>;
}

/// Document ingestion endpoints
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn upload_document(&self, path: &Path) -> Result<UploadResponse, ApiError>;

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError>;
}

/// Usage analytics endpoint
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApiError>;
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn me(&self) -> Result<Identity, ApiError> {
        ApiClient::me(self).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        ApiClient::login(self, email, password).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        ApiClient::register(self, email, password).await
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn history(&self) -> Result<Vec<ChatSession>, ApiError> {
        ApiClient::history(self).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        ApiClient::query(self, request).await
    }
}

#[async_trait]
impl DocumentBackend for ApiClient {
    async fn upload_document(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        ApiClient::upload_document(self, path).await
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        ApiClient::list_documents(self).await
    }
}

#[async_trait]
impl AnalyticsBackend for ApiClient {
    async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        ApiClient::analytics_summary(self).await
    }
}

// Shared handles forward to the inner backend so one client can serve
// several managers.

#[async_trait]
impl<T: AuthBackend + ?Sized> AuthBackend for Arc<T> {
    async fn me(&self) -> Result<Identity, ApiError> {
        (**self).me().await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        (**self).login(email, password).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        (**self).register(email, password).await
    }
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn history(&self) -> Result<Vec<ChatSession>, ApiError> {
        (**self).history().await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        (**self).query(request).await
    }
}

#[async_trait]
impl<T: DocumentBackend + ?Sized> DocumentBackend for Arc<T> {
    async fn upload_document(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        (**self).upload_document(path).await
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        (**self).list_documents().await
    }
}

#[async_trait]
impl<T: AnalyticsBackend + ?Sized> AnalyticsBackend for Arc<T> {
    async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        (**self).analytics_summary().await
    }
}
