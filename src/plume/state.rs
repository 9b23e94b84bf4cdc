//! Application configuration and the shared request state.

use std::sync::Arc;

use super::audit::AuditSink;
use super::auth::{AuthGuard, SessionIssuer};
use super::locale::Locale;
use super::storage::{GalleryRepo, MenuRepo};

const DEFAULT_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    locale: Locale,
    session_ttl_seconds: i64,
    session_cookie_secure: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            session_cookie_secure: false,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }
}

/// Everything a request handler needs, behind trait seams so tests wire the
/// in-memory implementations.
pub struct AppState {
    config: AppConfig,
    guard: AuthGuard,
    sessions: SessionIssuer,
    audit: Arc<dyn AuditSink>,
    galleries: Arc<dyn GalleryRepo>,
    menus: Arc<dyn MenuRepo>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: AppConfig,
        guard: AuthGuard,
        sessions: SessionIssuer,
        audit: Arc<dyn AuditSink>,
        galleries: Arc<dyn GalleryRepo>,
        menus: Arc<dyn MenuRepo>,
    ) -> Self {
        Self {
            config,
            guard,
            sessions,
            audit,
            galleries,
            menus,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    #[must_use]
    pub fn audit(&self) -> &dyn AuditSink {
        self.audit.as_ref()
    }

    #[must_use]
    pub fn galleries(&self) -> &dyn GalleryRepo {
        self.galleries.as_ref()
    }

    #[must_use]
    pub fn menus(&self) -> &dyn MenuRepo {
        self.menus.as_ref()
    }
}
