//! Aggregate calculator contract: gold formulas, mission buckets, purity,
//! and the documented account-mission behavior.

mod common;

use raidledger::roster::{compute_overview, OtherActivity, ResetPeriod};

use common::{character, mission, two_stage_raid};

#[test]
fn cleared_gold_counts_cleared_stages_and_chest_deductions() {
    let mut ch = character("Arkanis", "Luterra", "1,540");
    let mut raid = two_stage_raid("Valtan", (500, 700), false);
    raid.stages[0].cleared = true;
    raid.stages[0].selected_chest_cost = true; // chest_cost = 250
    raid.derive_cleared();
    ch.selected_raids = vec![raid];

    let overview = compute_overview(&[ch]);
    // Stage 1 only: 500 gold minus the 250 chest.
    assert_eq!(overview.total_gold, 250);
    // Potential spans both stages: (500 - 250) + 700.
    assert_eq!(overview.selected_raid_total_gold, 950);
}

#[test]
fn gold_toggle_off_still_deducts_selected_chests() {
    let mut ch = character("Arkanis", "Luterra", "1,540");
    let mut raid = two_stage_raid("Valtan", (500, 700), true);
    raid.gold_checked = false;
    raid.stages[1].selected_chest_cost = true; // chest_cost = 350
    ch.selected_raids = vec![raid];

    let overview = compute_overview(&[ch]);
    assert_eq!(overview.total_gold, -350);
}

#[test]
fn additional_gold_needs_full_clear_for_earnings() {
    let mut ch = character("Arkanis", "Luterra", "1,540");
    let mut raid = two_stage_raid("Valtan", (500, 700), false);
    raid.additional_gold = "1,200".to_string();
    raid.additional_gold_checked = true;
    raid.stages[0].cleared = true;
    raid.derive_cleared();
    ch.selected_raids = vec![raid.clone()];

    let partial = compute_overview(std::slice::from_ref(&ch));
    // Earned: stage 1 only, no additional gold while stage 2 is open.
    assert_eq!(partial.total_gold, 500);
    // Potential: both stages plus the toggled additional gold.
    assert_eq!(partial.selected_raid_total_gold, 500 + 700 + 1200);

    raid.stages[1].cleared = true;
    raid.derive_cleared();
    ch.selected_raids = vec![raid];
    let full = compute_overview(&[ch]);
    assert_eq!(full.total_gold, 500 + 700 + 1200);
}

#[test]
fn other_activity_income_joins_weekly_total() {
    let mut ch = character("Arkanis", "Luterra", "1,540");
    ch.other_activity = vec![
        OtherActivity {
            name: "Adventure Island".to_string(),
            gold: 900,
        },
        OtherActivity {
            name: "Chaos Gate".to_string(),
            gold: 300,
        },
    ];
    let overview = compute_overview(&[ch]);
    assert_eq!(overview.total_gold, 1200);
}

#[test]
fn last_week_totals_read_the_snapshots() {
    let mut ch = character("Arkanis", "Luterra", "1,540");
    ch.last_week_raids = vec![two_stage_raid("Valtan", (500, 700), true)];
    ch.last_week_other_activity = vec![OtherActivity {
        name: "Adventure Island".to_string(),
        gold: 100,
    }];
    let overview = compute_overview(&[ch]);
    assert_eq!(overview.last_week_total_gold, 500 + 700 + 100);
    assert_eq!(overview.total_gold, 0, "current week unaffected");
}

#[test]
fn mission_buckets_sum_across_characters() {
    let mut a = character("A", "Luterra", "1,500");
    a.mission_check_list = vec![
        mission("Chaos Dungeon", ResetPeriod::Daily, true),
        mission("Guardian Raid", ResetPeriod::Daily, false),
        mission("Abyss Dungeon", ResetPeriod::Weekly, true),
    ];
    let mut b = character("B", "Luterra", "1,500");
    b.mission_check_list = vec![
        mission("Chaos Dungeon", ResetPeriod::Daily, true),
        mission("Weekly Quests", ResetPeriod::Weekly, false),
    ];

    let overview = compute_overview(&[a, b]);
    assert_eq!(overview.daily_missions.total, 3);
    assert_eq!(overview.daily_missions.cleared, 2);
    assert_eq!(overview.weekly_missions.total, 2);
    assert_eq!(overview.weekly_missions.cleared, 1);
}

#[test]
fn account_missions_keep_only_the_last_character() {
    let mut a = character("A", "Luterra", "1,500");
    a.account_mission_check_list = vec![
        mission("Challenge Guardian", ResetPeriod::Weekly, true),
        mission("Challenge Abyss", ResetPeriod::Weekly, true),
    ];
    let mut b = character("B", "Luterra", "1,500");
    b.account_mission_check_list = vec![mission("Challenge Guardian", ResetPeriod::Weekly, false)];

    let overview = compute_overview(&[a.clone(), b.clone()]);
    // Not a sum: the last character in iteration order wins.
    assert_eq!(overview.account_missions.total, 1);
    assert_eq!(overview.account_missions.cleared, 0);

    let reversed = compute_overview(&[b, a]);
    assert_eq!(reversed.account_missions.total, 2);
    assert_eq!(reversed.account_missions.cleared, 2);
}

#[test]
fn overview_is_a_pure_function() {
    let mut ch = character("Arkanis", "Luterra", "1,540");
    ch.selected_raids = vec![two_stage_raid("Valtan", (500, 700), true)];
    ch.mission_check_list = vec![mission("Chaos Dungeon", ResetPeriod::Daily, true)];
    let roster = vec![ch];

    let first = compute_overview(&roster);
    let second = compute_overview(&roster);
    assert_eq!(first, second);
}

#[test]
fn empty_roster_yields_zeroes() {
    let overview = compute_overview(&[]);
    assert_eq!(overview.total_gold, 0);
    assert_eq!(overview.selected_raid_total_gold, 0);
    assert_eq!(overview.account_missions.total, 0);
}
