//! Account-wide aggregates derived from the character list.
//!
//! [`compute_overview`] is a pure function of the roster snapshot: no caches,
//! no incremental state, recomputed from scratch on every call.

use serde::Serialize;

use crate::roster::types::{Character, MissionItem, Raid, ResetPeriod};
use crate::validation::parse_gold;

/// Total vs. cleared counts for one mission bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MissionCounts {
    pub total: u32,
    pub cleared: u32,
}

/// Account-wide totals shown on the overview screen.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Gold earned this week: cleared raid stages plus ad-hoc activity income.
    pub total_gold: i64,
    /// Potential gold across every selected stage, earned or not.
    pub selected_raid_total_gold: i64,
    /// Last week's earned gold, from the weekly-reset snapshots.
    pub last_week_total_gold: i64,
    pub daily_missions: MissionCounts,
    pub weekly_missions: MissionCounts,
    pub account_missions: MissionCounts,
}

/// Per-stage payout: gold counts only when the raid's gold toggle is on, and
/// a selected bonus chest deducts its cost either way.
fn stage_gold(raid: &Raid, stage_index: usize) -> i64 {
    let stage = &raid.stages[stage_index];
    let earned = if raid.gold_checked { stage.gold } else { 0 };
    let chest = if stage.selected_chest_cost {
        stage.chest_cost.unwrap_or(0)
    } else {
        0
    };
    earned - chest
}

/// Gold actually earned from a raid this week: cleared stages only, plus the
/// additional-gold entry once the raid is fully cleared.
fn cleared_raid_gold(raid: &Raid) -> i64 {
    let mut gold: i64 = (0..raid.stages.len())
        .filter(|&i| raid.stages[i].cleared)
        .map(|i| stage_gold(raid, i))
        .sum();
    if raid.cleared {
        gold += parse_gold(&raid.additional_gold);
    }
    gold
}

/// Potential gold from a raid: every selected stage regardless of clear
/// state, plus the additional-gold entry whenever its toggle is on.
fn potential_raid_gold(raid: &Raid) -> i64 {
    let mut gold: i64 = (0..raid.stages.len()).map(|i| stage_gold(raid, i)).sum();
    if raid.additional_gold_checked {
        gold += parse_gold(&raid.additional_gold);
    }
    gold
}

fn count_bucket(missions: &[MissionItem], period: ResetPeriod) -> MissionCounts {
    let mut counts = MissionCounts::default();
    for mission in missions.iter().filter(|m| m.reset_period == period) {
        counts.total += 1;
        if mission.checked {
            counts.cleared += 1;
        }
    }
    counts
}

fn count_all(missions: &[MissionItem]) -> MissionCounts {
    MissionCounts {
        total: missions.len() as u32,
        cleared: missions.iter().filter(|m| m.checked).count() as u32,
    }
}

/// Compute the account-wide overview from the current character list.
pub fn compute_overview(characters: &[Character]) -> Overview {
    let mut overview = Overview::default();

    for character in characters {
        for raid in &character.selected_raids {
            overview.total_gold += cleared_raid_gold(raid);
            overview.selected_raid_total_gold += potential_raid_gold(raid);
        }
        overview.total_gold += character.other_activity.iter().map(|a| a.gold).sum::<i64>();

        for raid in &character.last_week_raids {
            overview.last_week_total_gold += cleared_raid_gold(raid);
        }
        overview.last_week_total_gold += character
            .last_week_other_activity
            .iter()
            .map(|a| a.gold)
            .sum::<i64>();

        let daily = count_bucket(&character.mission_check_list, ResetPeriod::Daily);
        overview.daily_missions.total += daily.total;
        overview.daily_missions.cleared += daily.cleared;

        let weekly = count_bucket(&character.mission_check_list, ResetPeriod::Weekly);
        overview.weekly_missions.total += weekly.total;
        overview.weekly_missions.cleared += weekly.cleared;

        // Account missions keep only the last character's counts instead of a
        // roster-wide aggregate. Observed behavior, kept until the intended
        // semantics are confirmed.
        overview.account_missions = count_all(&character.account_mission_check_list);
    }

    overview
}
