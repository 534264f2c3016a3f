use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[cfg(not(test))]
use std::time::Instant;
#[cfg(test)]
use mock_instant::Instant;

use crate::models::{ChatError, ChatSession};

const KEY_PREFIX: &str = "chat_session:";

/// Strip the transport prefix so `whatsapp:+15550100` and `+15550100` share a session.
pub fn normalize_phone(sender: &str) -> String {
    let trimmed = sender.trim();
    trimmed
        .strip_prefix("whatsapp:")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Keyed conversation state with expiry. Passed explicitly to the chat flow.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ChatSession>, ChatError>;

    async fn put(&self, key: &str, session: &ChatSession, ttl: Duration) -> Result<(), ChatError>;

    async fn remove(&self, key: &str) -> Result<(), ChatError>;
}

// ==============================================================================
// IN-MEMORY
// ==============================================================================

/// Single-process store; entries expire lazily when read after their TTL.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, (ChatSession, Instant)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<ChatSession>, ChatError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((_, expires_at)) if Instant::now() >= *expires_at => {
                debug!("Chat session {} expired", key);
                entries.remove(key);
                Ok(None)
            }
            Some((session, _)) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, session: &ChatSession, ttl: Duration) -> Result<(), ChatError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), (session.clone(), Instant::now() + ttl));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ChatError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

// ==============================================================================
// REDIS
// ==============================================================================

/// Sessions shared across instances. Expiry is Redis' own `EX`.
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub async fn new(redis_url: &str) -> Result<Self, ChatError> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| ChatError::SessionStore(format!("Failed to create Redis pool: {}", e)))?;

        let mut conn = pool.get().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("Redis session store initialized");

        Ok(Self { pool })
    }

    fn key(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, key: &str) -> Result<Option<ChatSession>, ChatError> {
        let mut conn = self.pool.get().await?;
        let raw: Option<String> = redis::cmd("GET").arg(Self::key(key)).query_async(&mut conn).await?;

        match raw {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, session: &ChatSession, ttl: Duration) -> Result<(), ChatError> {
        let mut conn = self.pool.get().await?;
        let data = serde_json::to_string(session)?;

        let _: () = redis::cmd("SET")
            .arg(Self::key(key))
            .arg(data)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ChatError> {
        let mut conn = self.pool.get().await?;
        let _: () = redis::cmd("DEL").arg(Self::key(key)).query_async(&mut conn).await?;
        Ok(())
    }
}
