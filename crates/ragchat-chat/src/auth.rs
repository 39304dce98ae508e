//! Signed-in identity and bearer-token lifecycle

use std::sync::Arc;

use ragchat_api::{ApiError, AuthBackend, TokenStore};
use ragchat_types::{AuthResponse, Identity};

use crate::error::ChatError;

/// Owns `{identity, loading}` for one client.
///
/// `loading` starts out `true` and drops to `false` once [`restore`](Self::restore)
/// has resolved. Consumers treat `identity == None && !loading` as "must
/// authenticate".
pub struct AuthSession<B> {
    backend: B,
    tokens: Arc<dyn TokenStore>,
    identity: Option<Identity>,
    loading: bool,
}

impl<B: AuthBackend> AuthSession<B> {
    pub fn new(backend: B, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            identity: None,
            loading: true,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Restore has finished and nobody is signed in
    pub fn must_authenticate(&self) -> bool {
        self.identity.is_none() && !self.loading
    }

    /// Route guard: the signed-in identity, or `NotAuthenticated`
    pub fn require_identity(&self) -> Result<&Identity, ChatError> {
        self.identity.as_ref().ok_or(ChatError::NotAuthenticated)
    }

    /// Silent sign-in from the persisted token.
    ///
    /// Without a token this resolves immediately and makes no network call.
    /// Any failure (unreadable token slot, network error, rejected token)
    /// leaves the session signed out; the stored token is left as is.
    pub async fn restore(&mut self) -> Option<&Identity> {
        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read persisted token");
                None
            }
        };

        if token.is_none() {
            self.identity = None;
            self.loading = false;
            return None;
        }

        self.identity = match self.backend.me().await {
            Ok(identity) => {
                tracing::debug!(email = %identity.email, "restored session");
                Some(identity)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed");
                None
            }
        };
        self.loading = false;
        self.identity.as_ref()
    }

    /// Sign in with credentials. On failure the error is returned and no
    /// state changes.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let resp = self.backend.login(email, password).await?;
        self.accept(resp)
    }

    /// Create an account; success signs the new account in.
    pub async fn register(&mut self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let resp = self.backend.register(email, password).await?;
        self.accept(resp)
    }

    fn accept(&mut self, resp: AuthResponse) -> Result<Identity, ApiError> {
        self.tokens.save(&resp.access_token)?;
        tracing::debug!(email = %resp.user.email, "signed in");
        self.identity = Some(resp.user.clone());
        Ok(resp.user)
    }

    /// Local sign-out: delete the persisted token and forget the identity.
    /// Calling it again is harmless.
    pub fn logout(&mut self) {
        if let Err(e) = self.tokens.clear() {
            tracing::warn!(error = %e, "cannot delete persisted token");
        }
        self.identity = None;
    }
}
