//! Persistence port: a flat key-value store of JSON values.
//!
//! `MemoryStore` backs tests and single-instance runs; `RedisStore` keeps the
//! same data in Redis under a key prefix. History and settings helpers are
//! written against the trait only.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::AppError;

pub mod handlers;
pub mod history;
pub mod settings;

/// Key prefix for everything this service writes to Redis.
pub const REDIS_KEY_PREFIX: &str = "resume-tailor:";
/// Keys per DEL when clearing.
const CLEAR_BATCH_SIZE: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Values for the requested keys. Absent keys are omitted from the map.
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, AppError>;

    async fn set(&self, entries: Map<String, Value>) -> Result<(), AppError>;

    async fn remove(&self, keys: &[&str]) -> Result<(), AppError>;

    async fn clear(&self) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Map<String, Value>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, AppError> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, entries: Map<String, Value>) -> Result<(), AppError> {
        self.entries.write().await.extend(entries);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RedisStore
// ────────────────────────────────────────────────────────────────────────────

/// Stores each value as a JSON string at `<prefix><key>`.
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
}

impl RedisStore {
    /// Validates the URL only; connections are opened per call.
    pub fn new(redis_url: &str, prefix: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
            prefix: prefix.into(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    fn scan_pattern(&self) -> String {
        format!("{}*", self.prefix)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

fn storage_error(err: serde_json::Error) -> AppError {
    AppError::Storage(format!("invalid stored JSON: {err}"))
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, AppError> {
        if keys.is_empty() {
            return Ok(Map::new());
        }
        let mut conn = self.connection().await?;
        let full_keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let raw: Vec<Option<String>> = conn.mget(&full_keys).await?;

        let mut found = Map::new();
        for (key, value) in keys.iter().zip(raw) {
            if let Some(json) = value {
                found.insert(key.to_string(), serde_json::from_str(&json).map_err(storage_error)?);
            }
        }
        debug!("Redis get: {} of {} keys present", found.len(), keys.len());
        Ok(found)
    }

    async fn set(&self, entries: Map<String, Value>) -> Result<(), AppError> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        for (key, value) in &entries {
            pipe.set(self.key(key), serde_json::to_string(value).map_err(storage_error)?)
                .ignore();
        }
        let mut conn = self.connection().await?;
        pipe.query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), AppError> {
        if keys.is_empty() {
            return Ok(());
        }
        let full_keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(full_keys).await?;
        Ok(())
    }

    /// Walks the prefix with SCAN so a large keyspace never blocks the server.
    async fn clear(&self) -> Result<(), AppError> {
        let mut conn = self.connection().await?;
        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter: redis::AsyncIter<String> = conn.scan_match(self.scan_pattern()).await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }
        for batch in keys.chunks(CLEAR_BATCH_SIZE) {
            conn.del::<_, ()>(batch.to_vec()).await?;
        }
        debug!("Redis clear: removed {} keys", keys.len());
        Ok(())
    }
}
