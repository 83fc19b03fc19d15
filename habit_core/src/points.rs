//! Daily points, levels and badges.

use crate::DailyStats;
use serde::{Deserialize, Serialize};

/// Cumulative points needed to reach each level
pub const LEVEL_THRESHOLDS: [u32; 11] = [0, 100, 300, 600, 1000, 1500, 2100, 2800, 3600, 4500, 5500];

/// Achievements a single day can unlock
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstStep,
    HydrationHero,
    ZenMaster,
    IronBody,
    Bookworm,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::FirstStep,
        Badge::HydrationHero,
        Badge::ZenMaster,
        Badge::IronBody,
        Badge::Bookworm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Badge::FirstStep => "First Step",
            Badge::HydrationHero => "Hydration Hero",
            Badge::ZenMaster => "Zen Master",
            Badge::IronBody => "Iron Body",
            Badge::Bookworm => "Bookworm",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::FirstStep => "Complete your first daily check-in",
            Badge::HydrationHero => "Drink more than 2.5L of water in a day",
            Badge::ZenMaster => "Report a stress level below 3",
            Badge::IronBody => "Exercise and Sleep > 7 hours",
            Badge::Bookworm => "Read a book",
        }
    }

    /// Whether a day's stats earn this badge
    pub fn is_earned_by(&self, stats: &DailyStats) -> bool {
        match self {
            // Any check-in counts
            Badge::FirstStep => true,
            Badge::HydrationHero => stats.water_intake >= 2.5,
            Badge::ZenMaster => stats.stress_level < 3.0,
            Badge::IronBody => stats.did_exercise && stats.sleep_hours >= 7.0,
            Badge::Bookworm => stats.did_read,
        }
    }
}

/// Points summary for one day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoints {
    pub points: u32,
    pub badges: Vec<Badge>,
}

/// Points earned by a single day's habits
pub fn calculate_daily_points(stats: &DailyStats) -> u32 {
    let mut points = 0;

    if (7.0..=9.0).contains(&stats.sleep_hours) {
        points += 20;
    }
    if stats.water_intake >= 2.0 {
        points += 15;
    }
    // Healthy boundaries
    if stats.coding_hours <= 8.0 {
        points += 10;
    }
    if stats.did_exercise {
        points += 30;
    }
    if stats.did_read {
        points += 20;
    }
    if stats.mood >= 7.0 {
        points += 10;
    }
    if stats.stress_level <= 4.0 {
        points += 10;
    }

    points
}

/// Badges unlocked by a day's stats, in catalog order
pub fn earned_badges(stats: &DailyStats) -> Vec<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| badge.is_earned_by(stats))
        .collect()
}

/// Level reached with a running total of points
pub fn level_for_points(total: u32) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .take_while(|threshold| total >= **threshold)
        .count() as u32
}

/// Progress within the current level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: u32,
    pub current_level_xp: u32,
    pub next_level_xp: u32,
}

/// Level plus points earned toward the next one
///
/// Past the last threshold each level spans another 1000 points.
pub fn level_info(total: u32) -> LevelInfo {
    let level = level_for_points(total);
    let base = LEVEL_THRESHOLDS[level as usize - 1];
    let next = LEVEL_THRESHOLDS
        .get(level as usize)
        .copied()
        .unwrap_or(base + 1000);

    LevelInfo {
        level,
        current_level_xp: total - base,
        next_level_xp: next - base,
    }
}

/// Score a day for points and badges
pub fn score_day(stats: &DailyStats) -> DailyPoints {
    DailyPoints {
        points: calculate_daily_points(stats),
        badges: earned_badges(stats),
    }
}
