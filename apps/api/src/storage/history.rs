//! Tailoring history: newest first, capped, skipped when `saveHistory` is off.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::storage::settings::get_settings;
use crate::storage::KeyValueStore;
use crate::tailoring::orchestrator::{TailoredResume, TailoringStats};

pub const HISTORY_KEY: &str = "tailoringHistory";
/// Job descriptions are stored as a short preview.
const JOB_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub job_description: String,
    pub tailored_resume: String,
    pub stats: TailoringStats,
}

impl HistoryEntry {
    pub fn new(job_description: &str, tailored: &TailoredResume) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            job_description: preview(job_description),
            tailored_resume: tailored.text.clone(),
            stats: tailored.stats,
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= JOB_PREVIEW_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(JOB_PREVIEW_CHARS).collect();
    format!("{truncated}...")
}

/// History list stored under `HISTORY_KEY`. Writers are serialized so
/// concurrent saves never drop each other's entries.
pub struct HistoryLog {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    write_lock: Mutex<()>,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            write_lock: Mutex::new(()),
        }
    }

    /// Prepends `entry` and trims to the limit. Returns `false` without
    /// writing when history is disabled in settings.
    pub async fn save(&self, entry: HistoryEntry) -> Result<bool, AppError> {
        if !get_settings(self.store.as_ref()).await?.save_history {
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;
        let mut history = self.entries().await?;
        history.insert(0, entry);
        history.truncate(self.limit);

        let value = serde_json::to_value(&history)
            .map_err(|e| AppError::Storage(format!("failed to encode history: {e}")))?;
        let mut entries = Map::new();
        entries.insert(HISTORY_KEY.to_string(), value);
        self.store.set(entries).await?;
        Ok(true)
    }

    /// Newest first.
    pub async fn entries(&self) -> Result<Vec<HistoryEntry>, AppError> {
        match self.store.get(&[HISTORY_KEY]).await?.remove(HISTORY_KEY) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| AppError::Storage(format!("invalid stored history: {e}"))),
        }
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(&[HISTORY_KEY]).await
    }
}
