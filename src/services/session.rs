// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Cookie-backed sessions for Axum.
//!
//! - `SessionStore`: in-memory session records keyed by the SHA-256 of the token
//! - `Session`: request extractor giving handlers read/write access to the session user
//! - `SESSION_COOKIE_NAME`: the cookie carrying the raw session token

use crate::models::sign::SessionUser;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{request::Parts, StatusCode};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_cookies::{Cookie, Cookies};
use tracing::debug;

/// Cookie name for the session.
pub const SESSION_COOKIE_NAME: &str = "sign_session";

/// Session lifetime and cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in days, refreshed on every write
    pub max_age_days: u64,
    /// Mark the cookie `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_days: 7,
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// Session lifetime, saturating at the largest duration chrono can hold.
    fn max_age(&self) -> chrono::TimeDelta {
        i64::try_from(self.max_age_days)
            .ok()
            .and_then(chrono::TimeDelta::try_days)
            .unwrap_or(chrono::TimeDelta::MAX)
    }
}

#[derive(Debug, Clone)]
struct SessionRecord {
    user: Option<SessionUser>,
    expires_at: i64,
}

impl SessionRecord {
    fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

// ============================================================================
// Token helpers
// ============================================================================

/// Generate a random 32-byte hex session token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a token for use as a store key.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Session store
// ============================================================================

/// Process-local session storage shared by all requests.
///
/// Writes are last-write-wins; concurrent requests for the same session are
/// not serialized.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create a session holding `user` and return its raw token.
    pub async fn create(&self, user: Option<SessionUser>) -> String {
        let token = generate_token();
        self.save(&token, user).await;
        token
    }

    /// Look up a live session. `None` when the token is unknown or expired;
    /// `Some(None)` when the session exists but nobody is signed in.
    pub async fn load(&self, token: &str) -> Option<Option<SessionUser>> {
        let now = now_millis();
        self.sessions
            .read()
            .await
            .get(&hash_token(token))
            .filter(|record| !record.is_expired(now))
            .map(|record| record.user.clone())
    }

    /// Store `user` for the session and push its expiry forward.
    pub async fn save(&self, token: &str, user: Option<SessionUser>) {
        let record = SessionRecord {
            user,
            expires_at: now_millis().saturating_add(self.config.max_age().num_milliseconds()),
        };
        self.sessions.write().await.insert(hash_token(token), record);
    }

    /// Drop every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = now_millis();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Periodically purge expired sessions in the background.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = store.purge_expired().await;
                if removed > 0 {
                    debug!(removed, "purged expired sessions");
                }
            }
        })
    }
}

// ============================================================================
// Cookies
// ============================================================================

/// Extract the session token from cookies.
pub fn extract_session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Create a session cookie with the given token.
pub fn create_session_cookie(token: &str, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(tower_cookies::cookie::SameSite::Lax)
        .max_age(tower_cookies::cookie::time::Duration::seconds(
            config.max_age().num_seconds(),
        ))
        .build()
}

// ============================================================================
// Session extractor
// ============================================================================

/// The current client's session.
///
/// A session record is only created once a user is stored in it; clearing the
/// user of a client without a session does nothing.
pub struct Session {
    store: SessionStore,
    cookies: Cookies,
    token: Option<String>,
    user: Option<SessionUser>,
}

impl Session {
    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Replace the session user and persist it immediately.
    pub async fn set_user(&mut self, user: Option<SessionUser>) {
        if let Some(token) = &self.token {
            self.store.save(token, user.clone()).await;
            // The store pushed the expiry forward; keep the cookie in step
            if user.is_some() {
                self.cookies
                    .add(create_session_cookie(token, self.store.config()));
            }
        } else if user.is_some() {
            let token = self.store.create(user.clone()).await;
            self.cookies
                .add(create_session_cookie(&token, self.store.config()));
            self.token = Some(token);
        }
        self.user = user;
    }
}

impl<S> FromRequestParts<S> for Session
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;
        let store = SessionStore::from_ref(state);

        let mut token = None;
        let mut user = None;
        if let Some(raw) = extract_session_token(&cookies) {
            if let Some(stored) = store.load(&raw).await {
                token = Some(raw);
                user = stored;
            }
        }

        Ok(Self {
            store,
            cookies,
            token,
            user,
        })
    }
}
