//! The character store: authoritative roster state plus persistence.
//!
//! One store instance owns the in-memory character list, the KV handle, the
//! portrait collaborator, and the raid catalog. Every mutation runs
//! read-modify-persist-publish under a single async mutex, so an operation
//! that suspends on storage or the cropper never works from a stale snapshot.
//! Readers subscribe through a watch channel and always observe the latest
//! committed list; there are no ambient singletons.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::logutil::escape_log;
use crate::roster::errors::RosterError;
use crate::roster::portrait::{NoPortraits, PortraitCropper};
use crate::roster::raids::RaidCatalog;
use crate::roster::reset::{apply_reset, ResetKind, ResetSchedule};
use crate::roster::types::{
    seed_account_missions, seed_mission_checklist, Character, CharacterPatch, NewCharacter,
    RefreshProfile, SortOrder,
};
use crate::storage::{keys, KvStore};

/// Helper builder so tests can pin the clock and swap collaborators.
pub struct CharacterStoreBuilder {
    kv: Arc<KvStore>,
    cropper: Arc<dyn PortraitCropper>,
    schedule: ResetSchedule,
    now: Option<DateTime<Utc>>,
}

impl CharacterStoreBuilder {
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self {
            kv,
            cropper: Arc::new(NoPortraits),
            schedule: ResetSchedule::default(),
            now: None,
        }
    }

    pub fn with_cropper(mut self, cropper: Arc<dyn PortraitCropper>) -> Self {
        self.cropper = cropper;
        self
    }

    pub fn with_schedule(mut self, schedule: ResetSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Pin the reconciliation clock (tests only use this).
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub async fn open(self) -> Result<CharacterStore, RosterError> {
        let now = self.now.unwrap_or_else(Utc::now);
        CharacterStore::open_with(self.kv, self.cropper, self.schedule, now).await
    }
}

/// Authoritative roster store. Construct once per process via
/// [`CharacterStoreBuilder`] and pass by reference to consumers.
pub struct CharacterStore {
    kv: Arc<KvStore>,
    cropper: Arc<dyn PortraitCropper>,
    catalog: RaidCatalog,
    state: Mutex<Vec<Character>>,
    tx: watch::Sender<Arc<Vec<Character>>>,
}

impl CharacterStore {
    /// Open the store and run the startup reconciliation: load the persisted
    /// list, apply whichever rollover has elapsed (weekly takes priority:
    /// a weekly rollover implies a daily one, so only the weekly task runs),
    /// resync stage payouts against the raid catalog, persist, publish.
    async fn open_with(
        kv: Arc<KvStore>,
        cropper: Arc<dyn PortraitCropper>,
        schedule: ResetSchedule,
        now: DateTime<Utc>,
    ) -> Result<Self, RosterError> {
        let catalog = RaidCatalog::load_or_seed(&kv).await?;

        let mut list: Vec<Character> = match kv.get_json(keys::CHARACTERS).await {
            Ok(Some(list)) => list,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("character list unreadable, starting empty: {}", e);
                Vec::new()
            }
        };

        let weekly_boundary = schedule.weekly_boundary(now);
        let daily_boundary = schedule.daily_boundary(now);
        let last_weekly = read_stamp(&kv, keys::LAST_WEEKLY_RESET).await;
        let last_daily = read_stamp(&kv, keys::LAST_DAILY_RESET).await;

        if last_weekly.map_or(true, |stamp| stamp < weekly_boundary) {
            info!(
                "weekly rollover elapsed (boundary {}), resetting raids and missions",
                weekly_boundary
            );
            list = apply_reset(list, ResetKind::Weekly);
            kv.put_json(keys::LAST_WEEKLY_RESET, &now).await?;
        } else if last_daily.map_or(true, |stamp| stamp < daily_boundary) {
            info!(
                "daily rollover elapsed (boundary {}), resetting daily missions",
                daily_boundary
            );
            list = apply_reset(list, ResetKind::Daily);
            kv.put_json(keys::LAST_DAILY_RESET, &now).await?;
        }

        let mut resynced = 0usize;
        for character in &mut list {
            if catalog.resync_character(character) {
                resynced += 1;
            }
        }
        if resynced > 0 {
            info!("resynced stage payouts for {} character(s)", resynced);
        }

        kv.put_json(keys::CHARACTERS, &list).await?;

        let (tx, _rx) = watch::channel(Arc::new(list.clone()));
        Ok(Self {
            kv,
            cropper,
            catalog,
            state: Mutex::new(list),
            tx,
        })
    }

    /// Receive every committed roster snapshot, latest-wins.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Character>>> {
        self.tx.subscribe()
    }

    /// Snapshot of the current list in canonical order.
    pub async fn characters(&self) -> Vec<Character> {
        self.state.lock().await.clone()
    }

    /// Bookmarked characters only, preserving canonical order.
    pub async fn bookmarked(&self) -> Vec<Character> {
        self.state
            .lock()
            .await
            .iter()
            .filter(|c| c.is_bookmarked)
            .cloned()
            .collect()
    }

    pub fn catalog(&self) -> &RaidCatalog {
        &self.catalog
    }

    async fn persist_and_publish(&self, list: &[Character]) -> Result<(), RosterError> {
        let list = list.to_vec();
        self.kv.put_json(keys::CHARACTERS, &list).await?;
        self.tx.send_replace(Arc::new(list));
        Ok(())
    }

    /// Add a character: fresh id, portrait crop, timestamps, default mission
    /// seeds, then re-sort the whole list by `sort_order` and persist.
    /// Portrait failures degrade to a missing portrait.
    pub async fn add(
        &self,
        new: NewCharacter,
        sort_order: SortOrder,
    ) -> Result<Character, RosterError> {
        let id = Uuid::new_v4().to_string();

        let portrait_image_path = match &new.portrait_source {
            Some(source) => match self.cropper.crop(source, &id, &new.class_name).await {
                Ok(path) => Some(path.to_string_lossy().into_owned()),
                Err(e) => {
                    warn!(
                        "portrait crop failed for '{}': {} (continuing without portrait)",
                        escape_log(&new.name),
                        e
                    );
                    None
                }
            },
            None => None,
        };

        let now = Utc::now();
        let character = Character {
            id: id.clone(),
            name: new.name,
            class_name: new.class_name,
            server_name: new.server_name,
            item_level: new.item_level,
            portrait_image_path: portrait_image_path.clone(),
            selected_raids: Vec::new(),
            mission_check_list: if new.mission_check_list.is_empty() {
                seed_mission_checklist()
            } else {
                new.mission_check_list
            },
            account_mission_check_list: if new.account_mission_check_list.is_empty() {
                seed_account_missions()
            } else {
                new.account_mission_check_list
            },
            other_activity: Vec::new(),
            other_activity_gold: 0,
            is_bookmarked: false,
            added_at: Some(now),
            last_updated: Some(now),
            last_week_raids: Vec::new(),
            last_week_other_activity: Vec::new(),
        };

        if let Some(path) = &portrait_image_path {
            self.kv.put_json(&keys::portrait_filename(&id), path).await?;
        }

        let mut state = self.state.lock().await;
        state.push(character.clone());
        let sorted = sort_characters(std::mem::take(&mut *state), sort_order);
        *state = sorted;
        self.persist_and_publish(&state).await?;
        info!("added character '{}' ({})", escape_log(&character.name), id);
        Ok(character)
    }

    /// Remove a character and its portrait asset. Removing an unknown id is
    /// a no-op.
    pub async fn remove(&self, id: &str) -> Result<(), RosterError> {
        let mut state = self.state.lock().await;
        let Some(index) = state.iter().position(|c| c.id == id) else {
            debug!("remove: no character with id {}", id);
            return Ok(());
        };
        let removed = state.remove(index);

        if let Some(path) = &removed.portrait_image_path {
            if let Err(e) = self.cropper.delete(Path::new(path)).await {
                warn!("failed to delete portrait for {}: {}", id, e);
            }
        }
        self.kv.remove(&keys::portrait_filename(id)).await?;

        self.persist_and_publish(&state).await?;
        info!("removed character '{}' ({})", escape_log(&removed.name), id);
        Ok(())
    }

    /// Shallow-merge a patch into the matching character. Unknown ids are a
    /// no-op; derived fields are recomputed after the merge.
    pub async fn update(&self, id: &str, patch: CharacterPatch) -> Result<(), RosterError> {
        let mut state = self.state.lock().await;
        let Some(character) = state.iter_mut().find(|c| c.id == id) else {
            debug!("update: no character with id {}", id);
            return Ok(());
        };
        patch.apply(character);
        self.persist_and_publish(&state).await
    }

    /// Overwrite class/level/server from a fresh lookup profile, re-cropping
    /// the portrait when the profile carries a new source image.
    pub async fn refresh(&self, id: &str, profile: RefreshProfile) -> Result<(), RosterError> {
        let portrait_image_path = match &profile.image {
            Some(source) => match self.cropper.crop(source, id, &profile.class_name).await {
                Ok(path) => Some(path.to_string_lossy().into_owned()),
                Err(e) => {
                    warn!("portrait re-crop failed for {}: {} (keeping old portrait)", id, e);
                    None
                }
            },
            None => None,
        };

        let mut state = self.state.lock().await;
        let Some(character) = state.iter_mut().find(|c| c.id == id) else {
            return Err(RosterError::NotFound(format!("character: {}", id)));
        };
        character.class_name = profile.class_name;
        character.item_level = profile.item_level;
        character.server_name = profile.server_name;
        character.last_updated = Some(Utc::now());
        if let Some(path) = portrait_image_path {
            self.kv.put_json(&keys::portrait_filename(id), &path).await?;
            character.portrait_image_path = Some(path);
        }
        self.persist_and_publish(&state).await
    }

    /// Re-sort the given list (or the current state) and persist the result
    /// as the new canonical order.
    pub async fn sort(
        &self,
        order: SortOrder,
        list: Option<Vec<Character>>,
    ) -> Result<Vec<Character>, RosterError> {
        let mut state = self.state.lock().await;
        let input = list.unwrap_or_else(|| state.clone());
        let sorted = sort_characters(input, order);
        *state = sorted.clone();
        self.persist_and_publish(&state).await?;
        Ok(sorted)
    }

    /// Apply a periodic reset to the given list, persist it as the new
    /// state, and return it.
    pub async fn reset_period_task(
        &self,
        list: Vec<Character>,
        kind: ResetKind,
    ) -> Result<Vec<Character>, RosterError> {
        let updated = apply_reset(list, kind);
        let mut state = self.state.lock().await;
        *state = updated.clone();
        self.persist_and_publish(&state).await?;
        info!("{} reset task applied to {} character(s)", kind.as_str(), state.len());
        Ok(updated)
    }
}

async fn read_stamp(kv: &KvStore, key: &str) -> Option<DateTime<Utc>> {
    match kv.get_json(key).await {
        Ok(stamp) => stamp,
        Err(e) => {
            warn!("unreadable reset stamp '{}': {}", key, e);
            None
        }
    }
}

/// Deterministic total ordering over a character list.
///
/// - `addedAt`: ascending by timestamp, missing stamps sort as the epoch.
/// - `level`: descending by parsed item level.
/// - `server`: groups by server name (empty → "unknown"), groups ordered by
///   their maximum item level descending, characters within a group by item
///   level descending. Name comparisons break remaining ties so repeated
///   sorts are stable.
pub fn sort_characters(mut list: Vec<Character>, order: SortOrder) -> Vec<Character> {
    match order {
        SortOrder::AddedAt => {
            list.sort_by_key(|c| c.added_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH));
        }
        SortOrder::Level => {
            list.sort_by(|a, b| {
                b.item_level_value()
                    .total_cmp(&a.item_level_value())
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
        SortOrder::Server => {
            let mut group_max: std::collections::HashMap<String, f64> =
                std::collections::HashMap::new();
            for character in &list {
                let level = character.item_level_value();
                group_max
                    .entry(character.server_group().to_string())
                    .and_modify(|max| {
                        if level > *max {
                            *max = level;
                        }
                    })
                    .or_insert(level);
            }
            list.sort_by(|a, b| {
                let group_a = a.server_group();
                let group_b = b.server_group();
                let max_a = group_max.get(group_a).copied().unwrap_or(0.0);
                let max_b = group_max.get(group_b).copied().unwrap_or(0.0);
                max_b
                    .total_cmp(&max_a)
                    .then_with(|| group_a.cmp(group_b))
                    .then_with(|| b.item_level_value().total_cmp(&a.item_level_value()))
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
    }
    list
}
