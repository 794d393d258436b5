//! # Storage Module - Persistent Key-Value Layer
//!
//! Durable process-wide storage for the roster tracker: string keys, string
//! values, with every value serialized as JSON text. Backed by a single sled
//! tree so one directory holds the whole app state.
//!
//! ```text
//! data/
//! └── kv/            ← sled tree (characters, settings, reset stamps, raid data)
//! ```
//!
//! Typed access goes through [`KvStore::get_json`] / [`KvStore::put_json`];
//! a malformed persisted value surfaces as [`RosterError::Corrupt`] and is
//! left untouched on disk so it can be inspected.

use std::path::Path;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::roster::errors::RosterError;

const TREE_PRIMARY: &str = "raidledger";

/// Well-known keys used by the stores in this crate.
pub mod keys {
    pub const CHARACTERS: &str = "characters";
    pub const THEME: &str = "theme";
    pub const ACTIVITY_HISTORY: &str = "activityHistory";
    pub const IS_INFO_VISIBLE: &str = "isInfoVisible";
    pub const CHARACTER_SORT_ORDER: &str = "characterSortOrder";
    pub const LAST_DAILY_RESET: &str = "lastDailyReset";
    pub const LAST_WEEKLY_RESET: &str = "lastWeeklyReset";
    pub const RAID_DATA: &str = "raidData";

    /// Per-character portrait filename key.
    pub fn portrait_filename(character_id: &str) -> String {
        format!("portrait_filename_{}", character_id)
    }
}

/// Sled-backed key-value store with JSON text values.
pub struct KvStore {
    _db: sled::Db,
    tree: sled::Tree,
}

impl KvStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RosterError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let tree = db.open_tree(TREE_PRIMARY)?;
        Ok(Self { _db: db, tree })
    }

    /// Fetch the raw string value under `key`, if present.
    pub async fn get(&self, key: &str) -> Result<Option<String>, RosterError> {
        let Some(bytes) = self.tree.get(key.as_bytes())? else {
            return Ok(None);
        };
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| RosterError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?
            .to_string();
        Ok(Some(text))
    }

    /// Insert or replace the string value under `key` and flush to disk.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), RosterError> {
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush_async().await?;
        Ok(())
    }

    /// Remove `key`. Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) -> Result<(), RosterError> {
        self.tree.remove(key.as_bytes())?;
        self.tree.flush_async().await?;
        Ok(())
    }

    /// Fetch and decode the JSON value under `key`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RosterError> {
        let Some(text) = self.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("corrupt value under key '{}': {}", key, e);
                Err(RosterError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Encode `value` as JSON text and store it under `key`.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), RosterError> {
        let text = serde_json::to_string(value)?;
        self.put(key, &text).await
    }
}
