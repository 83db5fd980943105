//! Authentication service

use std::sync::Arc;

use validator::Validate;

use crate::{
    api::ApiClient,
    error::AppResult,
    models::{
        user::{LoginRequest, LoginResponse},
        AuthUser,
    },
    session::Session,
};

#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Exchange credentials for a session; the token is attached to the client on success
    pub async fn login(&self, credentials: &LoginRequest) -> AppResult<Session> {
        credentials.validate()?;
        let response: LoginResponse = self.api.post("auth/login", credentials).await?;
        self.api.set_token(response.token.clone());
        tracing::info!("Signed in as {}", response.user.name);
        Ok(Session {
            user: response.user,
            token: response.token,
        })
    }

    /// Invalidate the token server-side. Failures are logged and ignored: the local
    /// session is dropped either way.
    pub async fn logout(&self) {
        if let Err(e) = self.api.post_unit("auth/logout", &serde_json::json!({})).await {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.api.clear_token();
    }

    /// Fetch the profile attached to the current token
    pub async fn me(&self) -> AppResult<AuthUser> {
        self.api.get("auth/me", &[]).await
    }
}
