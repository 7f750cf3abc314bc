//! Token-keyed session store.
//!
//! Sessions live in a shared key-value store so every service can validate
//! the same bearer token independently. A session is written once at sign-in
//! with a TTL and is never updated in place; logout and expiry both appear to
//! readers as an absent key.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Role;

/// Session store failure. Callers map this to `ServiceError::Internal`.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store backend error: {0}")]
    Backend(String),
}

/// The serialized identity record written at sign-in time.
///
/// Field names are part of the cross-service contract; the auth gate in every
/// service deserializes this exact shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub logged_in: bool,
    pub created_at: String,
    pub token: String,
    pub role_name: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Shared key-value store mapping an opaque token to a serialized
/// [`SessionRecord`] with a TTL.
///
/// Values are immutable once written; TTL expiry is the only mutation, so
/// concurrent readers need no coordination.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up the raw serialized session payload for a token.
    async fn get(&self, token: &str) -> Result<Option<String>, SessionStoreError>;

    /// Write a session payload with a time-to-live.
    async fn put(&self, token: &str, payload: &str, ttl: Duration)
    -> Result<(), SessionStoreError>;

    /// Remove a session (logout).
    async fn delete(&self, token: &str) -> Result<(), SessionStoreError>;
}

/// Redis-backed session store used in every deployed service.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to redis and build a connection manager.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Backend` if the URL is invalid or the
    /// initial connection fails.
    pub async fn connect(url: &str) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| SessionStoreError::Backend(format!("invalid redis url: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| SessionStoreError::Backend(format!("redis connect failed: {e}")))?;
        Ok(Self { conn })
    }

    /// Verify the connection is alive.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Backend` if the PING fails.
    pub async fn ping(&self) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| SessionStoreError::Backend(format!("redis ping failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, token: &str) -> Result<Option<String>, SessionStoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("GET")
            .arg(token)
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(|e| SessionStoreError::Backend(e.to_string()))
    }

    async fn put(
        &self,
        token: &str,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(token)
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| SessionStoreError::Backend(e.to_string()))
    }

    async fn delete(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(token)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| SessionStoreError::Backend(e.to_string()))
    }
}

/// In-memory session store for tests and local development.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<String>, SessionStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;
        if let Some((_, Some(expires_at))) = entries.get(token)
            && *expires_at <= Instant::now()
        {
            entries.remove(token);
            return Ok(None);
        }
        Ok(entries.get(token).map(|(payload, _)| payload.clone()))
    }

    async fn put(
        &self,
        token: &str,
        payload: &str,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;
        entries.insert(
            token.to_owned(),
            (payload.to_owned(), Instant::now().checked_add(ttl)),
        );
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreError::Backend(e.to_string()))?;
        entries.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: i64, name: &str, role: &str) -> SessionRecord {
        SessionRecord {
            user_id,
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            logged_in: true,
            created_at: "2026-01-01 00:00:00".to_owned(),
            token: "tok".to_owned(),
            role_name: Role::from(role),
            phone: None,
            address: None,
            lat: None,
            lng: None,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let store = InMemorySessionStore::new();
        let payload = serde_json::to_string(&record(7, "Ann", "Customer")).expect("serialize");

        store
            .put("token-1", &payload, Duration::from_secs(60))
            .await
            .expect("put");

        let stored = store.get("token-1").await.expect("get").expect("present");
        let parsed: SessionRecord = serde_json::from_str(&stored).expect("deserialize");
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.name, "Ann");
        assert_eq!(parsed.role_name, Role::Customer);
    }

    #[tokio::test]
    async fn test_absent_token_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get("missing").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = InMemorySessionStore::new();
        store
            .put("token-2", "{}", Duration::from_secs(0))
            .await
            .expect("put");
        assert!(store.get("token-2").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_session() {
        let store = InMemorySessionStore::new();
        store
            .put("token-3", "{}", Duration::from_secs(60))
            .await
            .expect("put");
        store.delete("token-3").await.expect("delete");
        assert!(store.get("token-3").await.expect("get").is_none());
    }

    #[test]
    fn test_record_optional_fields_are_omitted() {
        let json = serde_json::to_value(record(1, "Bo", "Admin")).expect("serialize");
        assert!(json.get("phone").is_none());
        assert_eq!(json["role_name"], "Admin");
    }
}
