use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::parse_separated_number;

/// Number of weekly raid selection slots per character.
pub const RAID_SLOTS: usize = 3;

/// Server-group label used when a character has no server name.
pub const UNKNOWN_SERVER: &str = "unknown";

/// Canonical roster sort orders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending by the moment the character was added (earliest first).
    #[serde(rename = "addedAt")]
    AddedAt,
    /// Descending by parsed item level.
    #[serde(rename = "level")]
    Level,
    /// Grouped by server, groups ordered by their strongest character.
    #[serde(rename = "server")]
    Server,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::AddedAt => "addedAt",
            SortOrder::Level => "level",
            SortOrder::Server => "server",
        }
    }

    /// Parse from a string (case-insensitive). Unknown input returns `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "addedat" | "added" | "oldest" => Some(SortOrder::AddedAt),
            "level" | "itemlevel" => Some(SortOrder::Level),
            "server" => Some(SortOrder::Server),
            _ => None,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::AddedAt
    }
}

/// Cadence at which a mission's `checked` flag is cleared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResetPeriod {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    /// Never reset automatically.
    #[serde(rename = "")]
    None,
}

impl Default for ResetPeriod {
    fn default() -> Self {
        ResetPeriod::None
    }
}

/// One checklist entry, optionally carrying a gold reward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissionItem {
    pub name: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold_checked: Option<bool>,
    #[serde(default)]
    pub reset_period: ResetPeriod,
}

impl MissionItem {
    pub fn new(name: &str, period: ResetPeriod) -> Self {
        Self {
            name: name.to_string(),
            checked: false,
            gold: None,
            gold_checked: None,
            reset_period: period,
        }
    }

    pub fn with_gold(mut self, gold: i64) -> Self {
        self.gold = Some(gold);
        self.gold_checked = Some(false);
        self
    }
}

/// Ad-hoc income entry outside the raid slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OtherActivity {
    pub name: String,
    pub gold: i64,
}

/// A single clearable checkpoint within a raid difficulty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaidStage {
    pub difficulty: String,
    pub stage_number: u8,
    pub gold: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest_cost: Option<i64>,
    #[serde(default)]
    pub selected_chest_cost: bool,
    #[serde(default)]
    pub cleared: bool,
}

/// One selected weekly raid occupying a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Raid {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<RaidStage>,
    /// Derived: true iff every stage is cleared. Re-derived on mutation.
    #[serde(default)]
    pub cleared: bool,
    #[serde(default)]
    pub gold_checked: bool,
    #[serde(default)]
    pub additional_gold_checked: bool,
    /// Comma-formatted display string; strip separators before summing.
    #[serde(default)]
    pub additional_gold: String,
    #[serde(default)]
    pub chest_cost_checked: bool,
}

impl Raid {
    /// Recompute the raid-level `cleared` flag from the stage flags.
    pub fn derive_cleared(&mut self) {
        self.cleared = !self.stages.is_empty() && self.stages.iter().all(|s| s.cleared);
    }

    /// Difficulty of the current selection (stages share one difficulty).
    pub fn difficulty(&self) -> Option<&str> {
        self.stages.first().map(|s| s.difficulty.as_str())
    }
}

/// One tracked in-game avatar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub server_name: String,
    /// Gear score kept as display text with optional thousand separators.
    #[serde(default)]
    pub item_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait_image_path: Option<String>,
    #[serde(default)]
    pub selected_raids: Vec<Raid>,
    #[serde(default)]
    pub mission_check_list: Vec<MissionItem>,
    #[serde(default)]
    pub account_mission_check_list: Vec<MissionItem>,
    #[serde(default)]
    pub other_activity: Vec<OtherActivity>,
    /// Cached sum of `other_activity` gold; cleared by the weekly reset.
    #[serde(default)]
    pub other_activity_gold: i64,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Snapshot taken by the weekly reset, read by last-week aggregates.
    #[serde(default)]
    pub last_week_raids: Vec<Raid>,
    #[serde(default)]
    pub last_week_other_activity: Vec<OtherActivity>,
}

impl Character {
    /// Parsed item level for arithmetic comparison; unparsable text sorts as 0.
    pub fn item_level_value(&self) -> f64 {
        parse_separated_number(&self.item_level).unwrap_or(0.0)
    }

    /// Server-group key for the server sort order.
    pub fn server_group(&self) -> &str {
        if self.server_name.trim().is_empty() {
            UNKNOWN_SERVER
        } else {
            &self.server_name
        }
    }

    /// Recompute every derived field: raid-level cleared flags and the
    /// cached other-activity total.
    pub fn rederive(&mut self) {
        for raid in &mut self.selected_raids {
            raid.derive_cleared();
        }
        self.other_activity_gold = self.other_activity.iter().map(|a| a.gold).sum();
    }
}

/// Payload for adding a character; the store assigns the id and timestamps.
#[derive(Debug, Clone, Default)]
pub struct NewCharacter {
    pub name: String,
    pub class_name: String,
    pub server_name: String,
    pub item_level: String,
    /// Source image handed to the portrait cropper; `None` skips cropping.
    pub portrait_source: Option<String>,
    /// Caller-supplied checklists; empty lists get the default seeds.
    pub mission_check_list: Vec<MissionItem>,
    pub account_mission_check_list: Vec<MissionItem>,
}

/// Profile returned by the lookup collaborator, applied by `refresh`.
#[derive(Debug, Clone)]
pub struct RefreshProfile {
    pub class_name: String,
    pub item_level: String,
    pub server_name: String,
    /// New source image for the portrait re-crop.
    pub image: Option<String>,
}

/// Closed patch over the mutable character fields. Unknown JSON fields are
/// rejected rather than silently merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CharacterPatch {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub server_name: Option<String>,
    pub item_level: Option<String>,
    pub selected_raids: Option<Vec<Raid>>,
    pub mission_check_list: Option<Vec<MissionItem>>,
    pub account_mission_check_list: Option<Vec<MissionItem>>,
    pub other_activity: Option<Vec<OtherActivity>>,
    pub is_bookmarked: Option<bool>,
}

impl CharacterPatch {
    /// Shallow-merge the present fields into `target`, then re-derive.
    pub fn apply(self, target: &mut Character) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(class_name) = self.class_name {
            target.class_name = class_name;
        }
        if let Some(server_name) = self.server_name {
            target.server_name = server_name;
        }
        if let Some(item_level) = self.item_level {
            target.item_level = item_level;
        }
        if let Some(mut selected_raids) = self.selected_raids {
            // The UI addresses exactly RAID_SLOTS weekly slots per character.
            selected_raids.truncate(RAID_SLOTS);
            target.selected_raids = selected_raids;
        }
        if let Some(missions) = self.mission_check_list {
            target.mission_check_list = missions;
        }
        if let Some(missions) = self.account_mission_check_list {
            target.account_mission_check_list = missions;
        }
        if let Some(other_activity) = self.other_activity {
            target.other_activity = other_activity;
        }
        if let Some(is_bookmarked) = self.is_bookmarked {
            target.is_bookmarked = is_bookmarked;
        }
        target.rederive();
    }
}

/// Persisted user preferences that parametrize roster queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_info_visible")]
    pub is_info_visible: bool,
    #[serde(default)]
    pub activity_name_history: Vec<String>,
    /// Opaque display preference; persisted, never interpreted here.
    #[serde(default)]
    pub theme: String,
}

fn default_info_visible() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::default(),
            is_info_visible: true,
            activity_name_history: Vec::new(),
            theme: String::new(),
        }
    }
}

/// Default per-character checklist seeded for newly added characters.
pub fn seed_mission_checklist() -> Vec<MissionItem> {
    vec![
        MissionItem::new("Chaos Dungeon", ResetPeriod::Daily),
        MissionItem::new("Guardian Raid", ResetPeriod::Daily),
        MissionItem::new("Daily Quests", ResetPeriod::Daily),
        MissionItem::new("Weekly Quests", ResetPeriod::Weekly).with_gold(1500),
        MissionItem::new("Abyss Dungeon", ResetPeriod::Weekly).with_gold(2000),
    ]
}

/// Default account-wide checklist (shared progress, weekly cadence).
pub fn seed_account_missions() -> Vec<MissionItem> {
    vec![
        MissionItem::new("Challenge Guardian", ResetPeriod::Weekly),
        MissionItem::new("Challenge Abyss", ResetPeriod::Weekly),
        MissionItem::new("Weekly Exchange", ResetPeriod::Weekly),
    ]
}
