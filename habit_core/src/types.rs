//! Core domain types for HabitFlow.
//!
//! This module defines the fundamental types used throughout the system:
//! - Habit entries and the fields used to create them
//! - Daily stats fed to the scoring engine
//! - Prediction results and risk levels
//! - Dated daily check-ins used for insights
//!
//! JSON field names are part of the external interface and must not change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Habit Log Types
// ============================================================================

/// Fields supplied when logging a habit
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub date: NaiveDate,
    /// Open vocabulary, e.g. "completed" or "skipped"
    pub status: String,
    pub category: String,
}

impl NewHabit {
    /// Attach a store-assigned id
    pub fn into_entry(self, id: u64) -> HabitEntry {
        HabitEntry {
            id,
            name: self.name,
            date: self.date,
            status: self.status,
            category: self.category,
        }
    }
}

/// A stored habit occurrence. Never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitEntry {
    pub id: u64,
    pub name: String,
    pub date: NaiveDate,
    pub status: String,
    pub category: String,
}

// ============================================================================
// Scoring Types
// ============================================================================

/// Self-reported metrics for one day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub sleep_hours: f64,
    pub coding_hours: f64,
    pub water_intake: f64,
    pub mood: f64,
    pub stress_level: f64,
    pub did_read: bool,
    pub did_exercise: bool,
    /// Accepted and echoed, never used for scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DailyStats {
    /// Named numeric fields, in wire order
    pub fn metrics(&self) -> [(&'static str, f64); 5] {
        [
            ("sleepHours", self.sleep_hours),
            ("codingHours", self.coding_hours),
            ("waterIntake", self.water_intake),
            ("mood", self.mood),
            ("stressLevel", self.stress_level),
        ]
    }
}

/// Four-tier burnout risk label, ordered from least to most severe
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a 0-10 score; lower bounds are inclusive
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            RiskLevel::Critical
        } else if score >= 6.0 {
            RiskLevel::High
        } else if score >= 4.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the scoring engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub burnout_score: f64,
    pub risk_level: RiskLevel,
    pub contributors: Vec<String>,
}

// ============================================================================
// Check-in Types
// ============================================================================

/// A dated set of daily stats
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub stats: DailyStats,
}
