//! Roster data model and persistence.
//!
//! Owns the character list, the raid catalog, the scheduled-reset logic, and
//! the derived account-wide aggregates, so the surrounding app only ever
//! talks to typed store operations.

pub mod errors;
pub mod lookup;
pub mod overview;
pub mod portrait;
pub mod raids;
pub mod reset;
pub mod settings;
pub mod store;
pub mod types;

pub use errors::RosterError;
pub use lookup::{CharacterLookup, LookupError, LookupProfile};
pub use overview::{compute_overview, MissionCounts, Overview};
pub use portrait::{LocalPortraitStore, NoPortraits, PortraitCropper, PortraitError};
pub use raids::{
    DifficultyDefinition, RaidCatalog, RaidDefinition, SelectableRaid, StageDefinition,
    SINGLE_DIFFICULTY,
};
pub use reset::{
    apply_daily_reset, apply_reset, apply_weekly_reset, ResetKind, ResetSchedule,
};
pub use settings::{SettingsStore, ACTIVITY_HISTORY_CAP};
pub use store::{sort_characters, CharacterStore, CharacterStoreBuilder};
pub use types::{
    seed_account_missions, seed_mission_checklist, Character, CharacterPatch, MissionItem,
    NewCharacter, OtherActivity, Raid, RaidStage, RefreshProfile, ResetPeriod, Settings,
    SortOrder, RAID_SLOTS, UNKNOWN_SERVER,
};
