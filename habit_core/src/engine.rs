//! Burnout scoring engine.
//!
//! A fixed linear formula over a day's stats:
//! - Weighted sum of the metrics plus an intercept
//! - Clamp to the 0-10 range and round to one decimal
//! - Four-tier risk classification
//! - Independent threshold checks that name the contributing factors
//!
//! The engine holds no mutable state; one instance is shared process-wide.

use crate::{DailyStats, PredictionResult, RiskLevel};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

static SHARED: Lazy<Arc<BurnoutPredictor>> =
    Lazy::new(|| Arc::new(BurnoutPredictor::new(Weights::default())));

/// A term of the scoring formula
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Factor {
    Bias,
    Sleep,
    Coding,
    Water,
    Mood,
    Stress,
    Exercise,
    Read,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Factor::Bias => "bias",
            Factor::Sleep => "sleepHours",
            Factor::Coding => "codingHours",
            Factor::Water => "waterIntake",
            Factor::Mood => "mood",
            Factor::Stress => "stressLevel",
            Factor::Exercise => "didExercise",
            Factor::Read => "didRead",
        };
        f.write_str(name)
    }
}

/// Weight table for the linear formula
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    pub bias: f64,
    pub sleep: f64,
    pub coding: f64,
    pub water: f64,
    pub mood: f64,
    pub stress: f64,
    pub exercise: f64,
    pub read: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            bias: 6.0,
            sleep: -0.8,
            coding: 0.5,
            water: -0.3,
            mood: -0.4,
            stress: 0.7,
            exercise: -1.5,
            read: -0.5,
        }
    }
}

impl Weights {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Bias => self.bias,
            Factor::Sleep => self.sleep,
            Factor::Coding => self.coding,
            Factor::Water => self.water,
            Factor::Mood => self.mood,
            Factor::Stress => self.stress,
            Factor::Exercise => self.exercise,
            Factor::Read => self.read,
        }
    }

    /// All factors with their weights, intercept first
    pub fn entries(&self) -> [(Factor, f64); 8] {
        [
            Factor::Bias,
            Factor::Sleep,
            Factor::Coding,
            Factor::Water,
            Factor::Mood,
            Factor::Stress,
            Factor::Exercise,
            Factor::Read,
        ]
        .map(|factor| (factor, self.get(factor)))
    }
}

/// Contributor thresholds, checked in this order against raw inputs
const CONTRIBUTORS: [(&str, fn(&DailyStats) -> bool); 5] = [
    ("Lack of Sleep", |s: &DailyStats| s.sleep_hours < 6.0),
    ("Excessive Coding", |s: &DailyStats| s.coding_hours > 8.0),
    ("High Stress", |s: &DailyStats| s.stress_level > 7.0),
    ("No Exercise", |s: &DailyStats| !s.did_exercise),
    ("Low Mood", |s: &DailyStats| s.mood < 4.0),
];

/// Deterministic burnout risk scorer
#[derive(Clone, Debug)]
pub struct BurnoutPredictor {
    weights: Weights,
}

impl Default for BurnoutPredictor {
    fn default() -> Self {
        Self::new(Weights::default())
    }
}

impl BurnoutPredictor {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    /// The process-wide predictor built from the default weight table
    pub fn shared() -> Arc<BurnoutPredictor> {
        Arc::clone(&*SHARED)
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Unclamped weighted sum
    pub fn raw_score(&self, stats: &DailyStats) -> f64 {
        let w = &self.weights;
        let mut score = w.bias;

        score += stats.sleep_hours * w.sleep;
        score += stats.coding_hours * w.coding;
        score += stats.water_intake * w.water;
        score += stats.mood * w.mood;
        score += stats.stress_level * w.stress;

        if stats.did_exercise {
            score += w.exercise;
        }
        if stats.did_read {
            score += w.read;
        }

        score
    }

    /// Score a day's stats. Never fails.
    pub fn predict(&self, stats: &DailyStats) -> PredictionResult {
        let raw = self.raw_score(stats);
        let score = clamp_score(raw);
        // Tiers read the clamped score, before rounding
        let risk_level = RiskLevel::from_score(score);
        let burnout_score = round_to_tenth(score);

        let contributors: Vec<String> = CONTRIBUTORS
            .iter()
            .filter(|(_, applies)| applies(stats))
            .map(|(reason, _)| (*reason).to_string())
            .collect();

        tracing::debug!(
            raw,
            burnout_score,
            risk = %risk_level,
            contributors = contributors.len(),
            "Scored daily stats"
        );

        PredictionResult {
            burnout_score,
            risk_level,
            contributors,
        }
    }
}

/// Clamp into range; NaN scores as the minimum
fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

/// Round half away from zero at one decimal place
fn round_to_tenth(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
