//! Rollover boundaries and periodic reset tasks.
//!
//! The game rolls daily progress at 06:00 and weekly progress on Wednesday
//! 06:00. There is no timer: the store checks the clock once at startup and
//! applies whichever reset is due, so every function here takes an explicit
//! `now` and tests can pin the clock.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};

use crate::roster::types::{Character, ResetPeriod};

/// Which reset cadence to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    Daily,
    Weekly,
}

impl ResetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetKind::Daily => "daily",
            ResetKind::Weekly => "weekly",
        }
    }
}

/// The in-game rollover schedule. Defaults to the live servers' fixed
/// schedule (06:00 daily, Wednesday 06:00 weekly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSchedule {
    pub rollover_hour: u32,
    pub weekly_weekday: Weekday,
}

impl Default for ResetSchedule {
    fn default() -> Self {
        Self {
            rollover_hour: 6,
            weekly_weekday: Weekday::Wed,
        }
    }
}

impl ResetSchedule {
    /// The most recent daily rollover at or before `now`: today's rollover
    /// hour when `now` has passed it, otherwise yesterday's.
    pub fn daily_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let hour = self.rollover_hour.min(23);
        let candidate = now
            .date_naive()
            .and_hms_opt(hour, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(now);
        if now < candidate {
            candidate - Duration::days(1)
        } else {
            candidate
        }
    }

    /// The most recent weekly rollover (weekly weekday at the rollover hour)
    /// at or before `now`.
    pub fn weekly_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days_back = (now.weekday().num_days_from_monday() + 7
            - self.weekly_weekday.num_days_from_monday())
            % 7;
        let hour = self.rollover_hour.min(23);
        let candidate = (now - Duration::days(days_back as i64))
            .date_naive()
            .and_hms_opt(hour, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(now);
        if now < candidate {
            candidate - Duration::weeks(1)
        } else {
            candidate
        }
    }
}

/// Reset every mission whose period matches the elapsed cadence. The weekly
/// rollover implies a daily one, so a weekly pass resets both periods.
fn reset_missions(character: &mut Character, kind: ResetKind) {
    let applies = |period: ResetPeriod| match kind {
        ResetKind::Daily => period == ResetPeriod::Daily,
        ResetKind::Weekly => matches!(period, ResetPeriod::Daily | ResetPeriod::Weekly),
    };
    for mission in character
        .mission_check_list
        .iter_mut()
        .chain(character.account_mission_check_list.iter_mut())
    {
        if applies(mission.reset_period) {
            mission.checked = false;
        }
    }
}

/// Apply the daily rollover: daily-period mission checks clear, raids and
/// gold entries stay untouched.
pub fn apply_daily_reset(characters: &mut [Character]) {
    for character in characters.iter_mut() {
        reset_missions(character, ResetKind::Daily);
    }
}

/// Apply the weekly rollover: snapshot last-week earnings, clear every raid
/// and stage clear flag, reset daily- and weekly-period missions, and drop
/// the ad-hoc income entries along with their cached total.
pub fn apply_weekly_reset(characters: &mut [Character]) {
    for character in characters.iter_mut() {
        character.last_week_raids = character.selected_raids.clone();
        character.last_week_other_activity = character.other_activity.clone();

        for raid in &mut character.selected_raids {
            raid.cleared = false;
            for stage in &mut raid.stages {
                stage.cleared = false;
            }
        }
        reset_missions(character, ResetKind::Weekly);
        character.other_activity.clear();
        character.other_activity_gold = 0;
    }
}

/// Dispatch on the reset kind; returns the mutated list for callers that
/// work on owned snapshots.
pub fn apply_reset(mut characters: Vec<Character>, kind: ResetKind) -> Vec<Character> {
    match kind {
        ResetKind::Daily => apply_daily_reset(&mut characters),
        ResetKind::Weekly => apply_weekly_reset(&mut characters),
    }
    characters
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(y, m, d)
                .expect("date")
                .and_hms_opt(h, min, 0)
                .expect("time"),
        )
    }

    #[test]
    fn daily_boundary_before_and_after_rollover() {
        let schedule = ResetSchedule::default();
        // 2026-08-07 is a Friday.
        assert_eq!(
            schedule.daily_boundary(at(2026, 8, 7, 5, 59)),
            at(2026, 8, 6, 6, 0)
        );
        assert_eq!(
            schedule.daily_boundary(at(2026, 8, 7, 6, 0)),
            at(2026, 8, 7, 6, 0)
        );
        assert_eq!(
            schedule.daily_boundary(at(2026, 8, 7, 23, 30)),
            at(2026, 8, 7, 6, 0)
        );
    }

    #[test]
    fn weekly_boundary_snaps_to_wednesday() {
        let schedule = ResetSchedule::default();
        // Friday after the rollover: this week's Wednesday.
        assert_eq!(
            schedule.weekly_boundary(at(2026, 8, 7, 12, 0)),
            at(2026, 8, 5, 6, 0)
        );
        // Wednesday before 06:00: previous week's Wednesday.
        assert_eq!(
            schedule.weekly_boundary(at(2026, 8, 5, 5, 0)),
            at(2026, 7, 29, 6, 0)
        );
        // Wednesday exactly at 06:00 is its own boundary.
        assert_eq!(
            schedule.weekly_boundary(at(2026, 8, 5, 6, 0)),
            at(2026, 8, 5, 6, 0)
        );
    }
}
