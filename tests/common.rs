//! Test utilities & fixtures.
//! Builders for characters and raids so each test file stays focused on the
//! behavior under test. Tests mutate state in their own TempDir-backed store.

use chrono::{DateTime, TimeZone, Utc};
use raidledger::roster::{Character, MissionItem, Raid, RaidStage, ResetPeriod};

/// A UTC timestamp without the ceremony.
#[allow(dead_code)] // Not every test binary pins the clock.
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single().expect("valid datetime")
}

/// A bare character with no raids or missions.
pub fn character(name: &str, server: &str, item_level: &str) -> Character {
    Character {
        id: format!("test-{}", name.to_lowercase()),
        name: name.to_string(),
        class_name: "Bard".to_string(),
        server_name: server.to_string(),
        item_level: item_level.to_string(),
        portrait_image_path: None,
        selected_raids: Vec::new(),
        mission_check_list: Vec::new(),
        account_mission_check_list: Vec::new(),
        other_activity: Vec::new(),
        other_activity_gold: 0,
        is_bookmarked: false,
        added_at: None,
        last_updated: None,
        last_week_raids: Vec::new(),
        last_week_other_activity: Vec::new(),
    }
}

/// A two-stage raid; `cleared` applies to both stages and the raid flag.
#[allow(dead_code)]
pub fn two_stage_raid(name: &str, gold: (i64, i64), cleared: bool) -> Raid {
    let stage = |number: u8, gold: i64| RaidStage {
        difficulty: "normal".to_string(),
        stage_number: number,
        gold,
        chest_cost: Some(gold / 2),
        selected_chest_cost: false,
        cleared,
    };
    Raid {
        name: name.to_string(),
        stages: vec![stage(1, gold.0), stage(2, gold.1)],
        cleared,
        gold_checked: true,
        additional_gold_checked: false,
        additional_gold: String::new(),
        chest_cost_checked: false,
    }
}

/// A mission with the given period and checked state.
#[allow(dead_code)]
pub fn mission(name: &str, period: ResetPeriod, checked: bool) -> MissionItem {
    let mut item = MissionItem::new(name, period);
    item.checked = checked;
    item
}
