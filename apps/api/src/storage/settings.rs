//! User settings, stored as individual keys so partial updates merge cleanly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::storage::KeyValueStore;

const AUTO_EXTRACT_KEY: &str = "autoExtract";
const SAVE_HISTORY_KEY: &str = "saveHistory";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether clients should pull the job description from the page automatically.
    pub auto_extract: bool,
    pub save_history: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_extract: true,
            save_history: true,
        }
    }
}

/// Body of `PUT /api/v1/settings`; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub auto_extract: Option<bool>,
    pub save_history: Option<bool>,
}

/// Defaults overlaid with whatever is stored.
pub async fn get_settings(store: &dyn KeyValueStore) -> Result<Settings, AppError> {
    let stored = store.get(&[AUTO_EXTRACT_KEY, SAVE_HISTORY_KEY]).await?;

    let mut settings = Settings::default();
    if let Some(value) = stored.get(AUTO_EXTRACT_KEY) {
        settings.auto_extract = as_bool(AUTO_EXTRACT_KEY, value)?;
    }
    if let Some(value) = stored.get(SAVE_HISTORY_KEY) {
        settings.save_history = as_bool(SAVE_HISTORY_KEY, value)?;
    }
    Ok(settings)
}

pub async fn update_settings(
    store: &dyn KeyValueStore,
    update: SettingsUpdate,
) -> Result<Settings, AppError> {
    let mut entries = Map::new();
    if let Some(auto_extract) = update.auto_extract {
        entries.insert(AUTO_EXTRACT_KEY.to_string(), Value::Bool(auto_extract));
    }
    if let Some(save_history) = update.save_history {
        entries.insert(SAVE_HISTORY_KEY.to_string(), Value::Bool(save_history));
    }
    store.set(entries).await?;
    get_settings(store).await
}

fn as_bool(key: &str, value: &Value) -> Result<bool, AppError> {
    value
        .as_bool()
        .ok_or_else(|| AppError::Storage(format!("setting '{key}' is not a boolean: {value}")))
}
