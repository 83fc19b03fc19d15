//! Correlation insights across daily check-ins.
//!
//! Computes the Pearson correlation coefficient between fixed pairs of
//! daily metrics and reports the pairs that move together noticeably.

use crate::{DailyLog, DailyStats, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fewer logs than this yield no insights
pub const MIN_LOGS: usize = 3;

/// Coefficients with magnitude at or below this are not reported
pub const SIGNIFICANCE: f64 = 0.3;

/// Whether a correlation is good or bad news for the user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Negative,
    Neutral,
}

/// A reported relationship between two metrics
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationInsight {
    pub feature_a: String,
    pub feature_b: String,
    /// Pearson r rounded to two decimals
    pub coefficient: f64,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
}

/// Outcome metric on the B side of a pair
#[derive(Clone, Copy, PartialEq)]
enum Outcome {
    Mood,
    Stress,
}

impl Outcome {
    fn name(self) -> &'static str {
        match self {
            Outcome::Mood => "Mood",
            Outcome::Stress => "Stress",
        }
    }

    fn extract(self, stats: &DailyStats) -> f64 {
        match self {
            Outcome::Mood => stats.mood,
            Outcome::Stress => stats.stress_level,
        }
    }

    /// Rising mood is good, rising stress is bad
    fn kind(self, r: f64) -> InsightKind {
        match (self, r > 0.0) {
            (Outcome::Mood, true) | (Outcome::Stress, false) => InsightKind::Positive,
            (Outcome::Mood, false) | (Outcome::Stress, true) => InsightKind::Negative,
        }
    }
}

type Extractor = fn(&DailyStats) -> f64;

const PAIRS: [(&str, Extractor, Outcome); 4] = [
    ("Sleep", |s: &DailyStats| s.sleep_hours, Outcome::Mood),
    ("Coding", |s: &DailyStats| s.coding_hours, Outcome::Stress),
    ("Water", |s: &DailyStats| s.water_intake, Outcome::Mood),
    (
        "Exercise",
        |s: &DailyStats| if s.did_exercise { 1.0 } else { 0.0 },
        Outcome::Mood,
    ),
];

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient; 0 for empty, mismatched or flat series
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let mu_x = mean(x);
    let mu_y = mean(y);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mu_x;
        let dy = yi - mu_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    numerator / denominator
}

/// Find noteworthy correlations, strongest first
pub fn analyze_correlations(history: &[DailyLog]) -> Vec<CorrelationInsight> {
    if history.len() < MIN_LOGS {
        tracing::debug!("Only {} daily logs, skipping correlation analysis", history.len());
        return Vec::new();
    }

    let mut insights: Vec<CorrelationInsight> = PAIRS
        .iter()
        .filter_map(|(feature, extract_a, outcome)| {
            let a: Vec<f64> = history.iter().map(|log| extract_a(&log.stats)).collect();
            let b: Vec<f64> = history.iter().map(|log| outcome.extract(&log.stats)).collect();
            let r = pearson(&a, &b);

            if r.abs() <= SIGNIFICANCE {
                return None;
            }

            let verb = if r > 0.0 { "increases" } else { "decreases" };
            Some(CorrelationInsight {
                feature_a: (*feature).to_string(),
                feature_b: outcome.name().to_string(),
                coefficient: (r * 100.0).round() / 100.0,
                description: format!("{} {} {}", feature, verb, outcome.name()),
                kind: outcome.kind(r),
            })
        })
        .collect();

    insights.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));

    tracing::info!(
        "Found {} correlations across {} daily logs",
        insights.len(),
        history.len()
    );
    insights
}

/// Read daily check-ins from a JSONL file, skipping unreadable lines
pub fn read_daily_logs(path: &Path) -> Result<Vec<DailyLog>> {
    crate::store::read_jsonl(path)
}
