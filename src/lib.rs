//! Library Admin
//!
//! Headless client for a school library REST backend: session handling, paginated entity
//! lists, bulk CSV imports and borrow/return transactions, modelled as testable state
//! machines that any front end (the bundled CLI included) can drive.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod import;
pub mod models;
pub mod pages;
pub mod services;
pub mod session;
pub mod widgets;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use api::ApiClient;
use models::{user::LoginRequest, AuthUser};
use services::Services;
use session::{Session, SessionStore};

/// Application context threaded explicitly through pages and commands
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub services: Services,
    session: Option<Session>,
    store: Arc<dyn SessionStore>,
}

impl AppContext {
    /// Build the services and restore any persisted session
    pub fn new(config: AppConfig, store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let api = Arc::new(ApiClient::new(&config.api)?);
        let services = Services::new(api);

        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Could not restore session: {}", e);
                None
            }
        };
        if let Some(session) = &session {
            services.api.set_token(session.token.clone());
            tracing::debug!("Restored session of {}", session.user.name);
        }

        Ok(Self {
            config: Arc::new(config),
            services,
            session,
            store,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Log in and persist the session. When the session cannot be saved the client is left
    /// signed out, token included.
    pub async fn sign_in(&mut self, credentials: &LoginRequest) -> AppResult<&AuthUser> {
        let session = self.services.auth.login(credentials).await?;
        if let Err(e) = self.store.save(&session) {
            tracing::error!("Could not persist session of {}: {}", session.user.name, e);
            self.session = None;
            self.services.api.clear_token();
            return Err(e);
        }
        Ok(&self.session.insert(session).user)
    }

    /// Log out; the local session is dropped even when the server call fails
    pub async fn sign_out(&mut self) -> AppResult<()> {
        if self.session.is_some() || self.services.api.has_token() {
            self.services.auth.logout().await;
        }
        self.session = None;
        self.services.api.clear_token();
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session::MockSessionStore;

    fn session() -> Session {
        Session {
            user: AuthUser {
                id: 7,
                name: "Librarian".to_string(),
                email: None,
                username: Some("lib".to_string()),
                role: None,
            },
            token: "abc".to_string(),
        }
    }

    #[test]
    fn test_restores_persisted_session() {
        let mut store = MockSessionStore::new();
        store.expect_load().times(1).returning(|| Ok(Some(session())));

        let ctx = AppContext::new(AppConfig::default(), Arc::new(store)).unwrap();
        assert!(ctx.is_signed_in());
        assert_eq!(ctx.current_user().map(|u| u.id), Some(7));
        assert!(ctx.services.api.has_token());
    }

    #[test]
    fn test_unreadable_store_starts_signed_out() {
        let mut store = MockSessionStore::new();
        store
            .expect_load()
            .returning(|| Err(AppError::Session("corrupt".to_string())));

        let ctx = AppContext::new(AppConfig::default(), Arc::new(store)).unwrap();
        assert!(!ctx.is_signed_in());
        assert!(!ctx.services.api.has_token());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_client_signed_out() {
        use wiremock::{
            matchers::{method, path},
            Mock, MockServer, ResponseTemplate,
        };

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "data": {"token": "tok-1", "user": {"id": 7, "name": "Librarian"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut store = MockSessionStore::new();
        store.expect_load().returning(|| Ok(None));
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(AppError::Session("disk full".to_string())));

        let mut config = AppConfig::default();
        config.api.base_url = format!("{}/api", server.uri());
        let mut ctx = AppContext::new(config, Arc::new(store)).unwrap();

        let result = ctx
            .sign_in(&LoginRequest {
                username: "lib".to_string(),
                password: "secret".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Session(_))));
        assert!(!ctx.is_signed_in());
        assert!(!ctx.services.api.has_token());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_only_clears_store() {
        let mut store = MockSessionStore::new();
        store.expect_load().returning(|| Ok(None));
        store.expect_clear().times(1).returning(|| Ok(()));

        let mut ctx = AppContext::new(AppConfig::default(), Arc::new(store)).unwrap();
        ctx.sign_out().await.unwrap();
        assert!(ctx.session().is_none());
    }
}
