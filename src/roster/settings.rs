//! Persisted user preferences.
//!
//! Each preference lives under its own key so the UI can update one toggle
//! without rewriting the rest. Reads degrade to defaults on missing or
//! corrupt values; writes persist immediately.

use std::sync::Arc;

use log::warn;
use serde::de::DeserializeOwned;

use crate::logutil::escape_log;
use crate::roster::errors::RosterError;
use crate::roster::types::{Settings, SortOrder};
use crate::storage::{keys, KvStore};

/// Most-recent-first cap on the remembered activity names.
pub const ACTIVITY_HISTORY_CAP: usize = 20;

/// Accessor over the preference keys in the KV store.
pub struct SettingsStore {
    kv: Arc<KvStore>,
}

impl SettingsStore {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    async fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.kv.get_json(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("settings read failed for '{}': {}", key, e);
                None
            }
        }
    }

    /// Assemble the full settings snapshot, defaulting each absent field.
    pub async fn load(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            sort_order: self
                .read_key(keys::CHARACTER_SORT_ORDER)
                .await
                .unwrap_or(defaults.sort_order),
            is_info_visible: self
                .read_key(keys::IS_INFO_VISIBLE)
                .await
                .unwrap_or(defaults.is_info_visible),
            activity_name_history: self
                .read_key(keys::ACTIVITY_HISTORY)
                .await
                .unwrap_or(defaults.activity_name_history),
            theme: self.read_key(keys::THEME).await.unwrap_or(defaults.theme),
        }
    }

    pub async fn set_sort_order(&self, order: SortOrder) -> Result<(), RosterError> {
        self.kv.put_json(keys::CHARACTER_SORT_ORDER, &order).await
    }

    pub async fn set_info_visible(&self, visible: bool) -> Result<(), RosterError> {
        self.kv.put_json(keys::IS_INFO_VISIBLE, &visible).await
    }

    pub async fn set_theme(&self, theme: &str) -> Result<(), RosterError> {
        self.kv.put_json(keys::THEME, &theme).await
    }

    /// Remember an activity name: dedupe, front-insert, cap, persist.
    /// Returns the updated history.
    pub async fn record_activity_name(&self, name: &str) -> Result<Vec<String>, RosterError> {
        let trimmed = name.trim();
        let mut history: Vec<String> = self.read_key(keys::ACTIVITY_HISTORY).await.unwrap_or_default();
        if trimmed.is_empty() {
            return Ok(history);
        }
        history.retain(|entry| entry != trimmed);
        history.insert(0, trimmed.to_string());
        history.truncate(ACTIVITY_HISTORY_CAP);
        self.kv.put_json(keys::ACTIVITY_HISTORY, &history).await?;
        log::debug!("recorded activity name '{}'", escape_log(trimmed));
        Ok(history)
    }
}
