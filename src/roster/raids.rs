//! Raid definition catalog.
//!
//! The catalog is the authoritative table mapping raid name → difficulty →
//! stage → payout values. It populates selectable raids for a given item
//! level, builds stage selections under the contiguity invariant, and
//! resyncs stored payouts when the table changes between app versions.

use serde::{Deserialize, Serialize};

use crate::roster::errors::RosterError;
use crate::roster::types::{Character, Raid, RaidStage};
use crate::storage::{keys, KvStore};

/// Difficulty label that always forces a fresh stage rebuild on selection.
pub const SINGLE_DIFFICULTY: &str = "single";

/// Payouts for one stage of a raid difficulty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageDefinition {
    pub stage_number: u8,
    pub gold: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest_cost: Option<i64>,
}

/// One difficulty tier of a raid, gated by item level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyDefinition {
    pub difficulty: String,
    pub min_item_level: f64,
    pub stages: Vec<StageDefinition>,
}

/// A raid with its selectable difficulty tiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaidDefinition {
    pub name: String,
    pub difficulties: Vec<DifficultyDefinition>,
}

/// The full definition table, persisted under the `raidData` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaidCatalog {
    pub raids: Vec<RaidDefinition>,
}

/// A `(raid, difficulty)` pair a character's item level qualifies for.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableRaid<'a> {
    pub raid_name: &'a str,
    pub difficulty: &'a DifficultyDefinition,
}

impl RaidCatalog {
    /// Load the persisted catalog, seeding the built-in table on first open.
    pub async fn load_or_seed(kv: &KvStore) -> Result<Self, RosterError> {
        if let Some(catalog) = kv.get_json::<RaidCatalog>(keys::RAID_DATA).await? {
            return Ok(catalog);
        }
        let catalog = Self::builtin();
        kv.put_json(keys::RAID_DATA, &catalog).await?;
        Ok(catalog)
    }

    /// Find a difficulty tier by raid name and difficulty label.
    pub fn find(&self, raid_name: &str, difficulty: &str) -> Option<&DifficultyDefinition> {
        self.raids
            .iter()
            .find(|r| r.name == raid_name)?
            .difficulties
            .iter()
            .find(|d| d.difficulty == difficulty)
    }

    /// Every `(raid, difficulty)` the given item level qualifies for.
    pub fn selectable(&self, item_level: f64) -> Vec<SelectableRaid<'_>> {
        let mut out = Vec::new();
        for raid in &self.raids {
            for difficulty in &raid.difficulties {
                if item_level >= difficulty.min_item_level {
                    out.push(SelectableRaid {
                        raid_name: &raid.name,
                        difficulty,
                    });
                }
            }
        }
        out
    }

    /// Build the stage selection for `stage_number` of `raid_name` at
    /// `difficulty`, honoring the contiguity invariant: stages 1..N are
    /// always selected together.
    ///
    /// When `previous` targets the same raid and difficulty, per-stage state
    /// (cleared, chest selection) and the raid-level toggles carry over for
    /// the stages that survive. Changing raid or difficulty (or selecting a
    /// `single` difficulty) rebuilds the selection fresh.
    pub fn build_selection(
        &self,
        previous: Option<&Raid>,
        raid_name: &str,
        difficulty: &str,
        stage_number: u8,
    ) -> Result<Raid, RosterError> {
        let tier = self.find(raid_name, difficulty).ok_or_else(|| {
            RosterError::UnknownRaid(format!("{} ({})", raid_name, difficulty))
        })?;
        if !tier.stages.iter().any(|s| s.stage_number == stage_number) {
            return Err(RosterError::UnknownRaid(format!(
                "{} ({}) stage {}",
                raid_name, difficulty, stage_number
            )));
        }

        let carry_over = difficulty != SINGLE_DIFFICULTY
            && previous.is_some_and(|p| {
                p.name == raid_name && p.difficulty() == Some(difficulty)
            });

        let mut raid = match previous {
            Some(p) if carry_over => {
                let mut kept = p.clone();
                kept.stages.clear();
                kept
            }
            _ => Raid {
                name: raid_name.to_string(),
                stages: Vec::new(),
                cleared: false,
                gold_checked: false,
                additional_gold_checked: false,
                additional_gold: String::new(),
                chest_cost_checked: false,
            },
        };

        let mut definitions: Vec<&StageDefinition> = tier
            .stages
            .iter()
            .filter(|s| s.stage_number <= stage_number)
            .collect();
        definitions.sort_by_key(|s| s.stage_number);

        for def in definitions {
            let prior = if carry_over {
                previous.and_then(|p| {
                    p.stages.iter().find(|s| s.stage_number == def.stage_number)
                })
            } else {
                None
            };
            raid.stages.push(RaidStage {
                difficulty: difficulty.to_string(),
                stage_number: def.stage_number,
                gold: def.gold,
                chest_cost: def.chest_cost,
                selected_chest_cost: prior.map(|s| s.selected_chest_cost).unwrap_or(false),
                cleared: prior.map(|s| s.cleared).unwrap_or(false),
            });
        }

        raid.derive_cleared();
        Ok(raid)
    }

    /// Rewrite a stored raid's payout values from the catalog, keyed by
    /// (raid name, difficulty, stage number). Clear state and chest
    /// selections are left untouched. Returns true when anything changed.
    pub fn resync_raid(&self, raid: &mut Raid) -> bool {
        let mut changed = false;
        for stage in &mut raid.stages {
            let Some(def) = self
                .find(&raid.name, &stage.difficulty)
                .and_then(|tier| tier.stages.iter().find(|s| s.stage_number == stage.stage_number))
            else {
                // Selection predates the current table; leave it as stored.
                continue;
            };
            if stage.gold != def.gold {
                stage.gold = def.gold;
                changed = true;
            }
            if stage.chest_cost != def.chest_cost {
                stage.chest_cost = def.chest_cost;
                changed = true;
            }
        }
        changed
    }

    /// Resync every selected raid of a character. Returns true on change.
    pub fn resync_character(&self, character: &mut Character) -> bool {
        let mut changed = false;
        for raid in &mut character.selected_raids {
            changed |= self.resync_raid(raid);
        }
        changed
    }

    /// Built-in definition table shipped with the app. Stage payouts get
    /// corrected against the persisted table during startup reconciliation,
    /// so these values only need to be right for a fresh install.
    pub fn builtin() -> Self {
        RaidCatalog {
            raids: vec![
                raid(
                    "Valtan",
                    vec![
                        tier("normal", 1415.0, &[(1, 500, Some(300)), (2, 700, Some(400))]),
                        tier("hard", 1445.0, &[(1, 700, Some(450)), (2, 1100, Some(600))]),
                    ],
                ),
                raid(
                    "Vykas",
                    vec![
                        tier("normal", 1430.0, &[(1, 600, Some(400)), (2, 1000, Some(500))]),
                        tier("hard", 1460.0, &[(1, 900, Some(600)), (2, 1500, Some(700))]),
                    ],
                ),
                raid(
                    "Kakul-Saydon",
                    vec![tier(
                        "normal",
                        1475.0,
                        &[(1, 600, Some(300)), (2, 900, Some(500)), (3, 1500, Some(700))],
                    )],
                ),
                raid(
                    "Brelshaza",
                    vec![
                        tier(
                            "normal",
                            1490.0,
                            &[
                                (1, 1000, Some(500)),
                                (2, 1200, Some(600)),
                                (3, 1400, Some(700)),
                                (4, 2000, Some(1000)),
                            ],
                        ),
                        tier(
                            "hard",
                            1540.0,
                            &[
                                (1, 1200, Some(600)),
                                (2, 1400, Some(700)),
                                (3, 2000, Some(900)),
                                (4, 2800, Some(1200)),
                            ],
                        ),
                    ],
                ),
                raid(
                    "Kayangel",
                    vec![
                        tier(
                            "normal",
                            1540.0,
                            &[(1, 800, Some(450)), (2, 1200, Some(600)), (3, 1600, Some(800))],
                        ),
                        tier(
                            SINGLE_DIFFICULTY,
                            1540.0,
                            &[(1, 400, None), (2, 600, None), (3, 800, None)],
                        ),
                    ],
                ),
            ],
        }
    }
}

fn raid(name: &str, difficulties: Vec<DifficultyDefinition>) -> RaidDefinition {
    RaidDefinition {
        name: name.to_string(),
        difficulties,
    }
}

fn tier(difficulty: &str, min_item_level: f64, stages: &[(u8, i64, Option<i64>)]) -> DifficultyDefinition {
    DifficultyDefinition {
        difficulty: difficulty.to_string(),
        min_item_level,
        stages: stages
            .iter()
            .map(|(stage_number, gold, chest_cost)| StageDefinition {
                stage_number: *stage_number,
                gold: *gold,
                chest_cost: *chest_cost,
            })
            .collect(),
    }
}
