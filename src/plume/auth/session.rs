//! Session issuance and the session store contract.
//!
//! The raw session token only ever travels in the cookie; the store is keyed
//! by its SHA-256 hash, so a raw token never touches storage.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::account::AccountIdentity;

pub const SESSION_COOKIE_NAME: &str = "plume_session";

/// Server-side state bound to one hashed session token.
#[derive(Clone, Debug)]
pub struct SessionData {
    pub identity: AccountIdentity,
    pub created_at: DateTime<Utc>,
}

/// Keyed session storage. Keys are token hashes, never raw tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set(&self, key: Vec<u8>, data: SessionData) -> Result<()>;
    async fn get(&self, key: &[u8]) -> Result<Option<SessionData>>;
    /// Removing an absent key is not an error.
    async fn delete(&self, key: &[u8]) -> Result<()>;
}

/// In-process session store with lazy expiry at lookup.
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<Vec<u8>, SessionData>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set(&self, key: Vec<u8>, data: SessionData) -> Result<()> {
        self.sessions.lock().await.insert(key, data);
        Ok(())
    }

    async fn get(&self, key: &[u8]) -> Result<Option<SessionData>> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(key) {
            Some(data) if Utc::now().signed_duration_since(data.created_at) < self.ttl => {
                Ok(Some(data.clone()))
            }
            Some(_) => {
                sessions.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &[u8]) -> Result<()> {
        self.sessions.lock().await.remove(key);
        Ok(())
    }
}

/// Issues and destroys sessions for authenticated admins.
pub struct SessionIssuer {
    store: Arc<dyn SessionStore>,
}

impl SessionIssuer {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Bind a fresh random token to the identity. The raw token is returned
    /// once, for the cookie.
    ///
    /// # Errors
    /// Returns an error when randomness or the store is unavailable.
    pub async fn establish(&self, identity: AccountIdentity) -> Result<String> {
        let token = generate_session_token()?;
        let key = hash_session_token(&token);
        self.store
            .set(
                key,
                SessionData {
                    identity,
                    created_at: Utc::now(),
                },
            )
            .await?;
        Ok(token)
    }

    /// Resolve a raw token into the bound identity, if the session is live.
    pub async fn resolve(&self, token: &str) -> Result<Option<SessionData>> {
        self.store.get(&hash_session_token(token)).await
    }

    /// Remove the binding. Destroying an absent session is not an error.
    pub async fn destroy(&self, token: &str) -> Result<()> {
        self.store.delete(&hash_session_token(token)).await
    }
}

/// Create a new session token for the auth cookie.
fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Hash a session token so raw values never touch storage.
fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

/// Build a secure `HttpOnly` cookie for the session token.
pub fn session_cookie(
    token: &str,
    ttl_seconds: i64,
    secure: bool,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_session_cookie(
    secure: bool,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the session token from a bearer header or the session cookie.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
