//! Service facade composing the habit store and the scoring engine.
//!
//! Validation happens here; store and engine errors pass through unchanged.

use crate::config::{Config, DataConfig, HistoryConfig};
use crate::points::{level_info, score_day, DailyPoints, LevelInfo};
use crate::{
    analyze_correlations, BurnoutPredictor, CorrelationInsight, DailyLog, DailyStats, Error,
    HabitEntry, HabitStore, JsonlHabitStore, NewHabit, PredictionResult, Result,
};
use std::sync::Arc;

/// Entry point for logging habits and scoring days
pub struct HabitService<S: HabitStore> {
    store: S,
    predictor: Arc<BurnoutPredictor>,
    history_window_days: i64,
}

impl HabitService<JsonlHabitStore> {
    /// Build a service over the JSONL store in `config`'s data directory
    pub fn from_config(config: &Config) -> Self {
        let store = JsonlHabitStore::new(DataConfig::habits_path(&config.data.data_dir));
        Self::new(store, BurnoutPredictor::shared()).with_history_window(config.history.window_days)
    }
}

impl<S: HabitStore> HabitService<S> {
    pub fn new(store: S, predictor: Arc<BurnoutPredictor>) -> Self {
        Self {
            store,
            predictor,
            history_window_days: HistoryConfig::default().window_days,
        }
    }

    pub fn with_history_window(mut self, days: i64) -> Self {
        self.history_window_days = days;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a habit entry and return it with its id
    pub fn log_habit(&self, habit: NewHabit) -> Result<HabitEntry> {
        let entry = self.store.append(habit)?;
        tracing::info!(
            "Logged habit {} '{}' on {} ({})",
            entry.id,
            entry.name,
            entry.date,
            entry.status
        );
        Ok(entry)
    }

    /// Entries from the configured history window, insertion order
    pub fn get_history(&self) -> Result<Vec<HabitEntry>> {
        self.store.recent(self.history_window_days)
    }

    /// Score a day's stats. Nothing is persisted.
    pub fn predict_burnout(&self, stats: &DailyStats) -> Result<PredictionResult> {
        validate_stats(stats)?;
        let result = self.predictor.predict(stats);
        tracing::info!(
            "Predicted burnout {:.1} ({})",
            result.burnout_score,
            result.risk_level
        );
        Ok(result)
    }

    /// Points and badges for a day, plus the level they reach on their own
    pub fn daily_points(&self, stats: &DailyStats) -> Result<(DailyPoints, LevelInfo)> {
        validate_stats(stats)?;
        let day = score_day(stats);
        let level = level_info(day.points);
        Ok((day, level))
    }

    /// Correlations across a series of check-ins
    pub fn insights(&self, history: &[DailyLog]) -> Result<Vec<CorrelationInsight>> {
        for log in history {
            validate_stats(&log.stats).map_err(|e| match e {
                Error::Validation(msg) => Error::Validation(format!("check-in {}: {}", log.date, msg)),
                other => other,
            })?;
        }
        Ok(analyze_correlations(history))
    }
}

/// Reject non-finite metrics before they reach the engine
pub fn validate_stats(stats: &DailyStats) -> Result<()> {
    for (field, value) in stats.metrics() {
        if !value.is_finite() {
            return Err(Error::Validation(format!(
                "{} must be a finite number, got {}",
                field, value
            )));
        }
    }
    Ok(())
}

/// Parse a Log request body
pub fn parse_new_habit(body: &str) -> Result<NewHabit> {
    serde_json::from_str(body).map_err(|e| Error::Validation(format!("invalid habit: {}", e)))
}

/// Parse a Predict request body
pub fn parse_daily_stats(body: &str) -> Result<DailyStats> {
    let stats: DailyStats = serde_json::from_str(body)
        .map_err(|e| Error::Validation(format!("invalid daily stats: {}", e)))?;
    validate_stats(&stats)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RiskLevel;
    use chrono::{Duration, Local, NaiveDate};

    fn service(dir: &std::path::Path) -> HabitService<JsonlHabitStore> {
        let store = JsonlHabitStore::new(dir.join("habits.jsonl"));
        HabitService::new(store, BurnoutPredictor::shared())
    }

    fn habit(name: &str, date: NaiveDate) -> NewHabit {
        NewHabit {
            name: name.into(),
            date,
            status: "completed".into(),
            category: "work".into(),
        }
    }

    #[test]
    fn test_log_then_history_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let svc = service(temp_dir.path());
        let today = Local::now().date_naive();

        let created = svc.log_habit(habit("Code Python", today)).unwrap();
        assert!(created.id > 0);

        let history = svc.get_history().unwrap();
        assert_eq!(history, vec![created]);
        assert_eq!(history[0].name, "Code Python");
        assert_eq!(history[0].status, "completed");
        assert_eq!(history[0].category, "work");
        assert_eq!(history[0].date, today);
    }

    #[test]
    fn test_history_excludes_old_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let svc = service(temp_dir.path());
        let today = Local::now().date_naive();

        svc.log_habit(habit("old", today - Duration::days(31))).unwrap();
        svc.log_habit(habit("edge", today - Duration::days(30))).unwrap();
        svc.log_habit(habit("future", today + Duration::days(3))).unwrap();

        let names: Vec<_> = svc.get_history().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["edge", "future"]);
    }

    #[test]
    fn test_custom_history_window() {
        let temp_dir = tempfile::tempdir().unwrap();
        let svc = service(temp_dir.path()).with_history_window(7);
        let today = Local::now().date_naive();

        svc.log_habit(habit("ten_days", today - Duration::days(10))).unwrap();
        svc.log_habit(habit("two_days", today - Duration::days(2))).unwrap();

        let history = svc.get_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "two_days");
    }

    #[test]
    fn test_predict_via_json_body() {
        let temp_dir = tempfile::tempdir().unwrap();
        let svc = service(temp_dir.path());

        let stats = parse_daily_stats(
            r#"{"sleepHours":8.0,"codingHours":4.0,"waterIntake":0.0,"mood":0.0,
                "stressLevel":0.0,"didRead":false,"didExercise":false}"#,
        )
        .unwrap();
        let result = svc.predict_burnout(&stats).unwrap();

        assert_eq!(result.burnout_score, 1.6);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let err = parse_daily_stats(r#"{"sleepHours":8.0}"#).unwrap_err();
        assert!(err.is_validation());

        let err = parse_new_habit(r#"{"name":"Run","date":"2024-13-40","status":"x","category":"y"}"#)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_non_finite_stats_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let svc = service(temp_dir.path());

        let stats = DailyStats {
            mood: f64::NAN,
            ..Default::default()
        };
        let err = svc.predict_burnout(&stats).unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("mood")));
    }

    #[test]
    fn test_storage_failure_surfaces() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A directory where the log file should be
        let blocked = temp_dir.path().join("habits.jsonl");
        std::fs::create_dir_all(&blocked).unwrap();

        let svc = service(temp_dir.path());
        let err = svc
            .log_habit(habit("Run", Local::now().date_naive()))
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_daily_points_and_level() {
        let temp_dir = tempfile::tempdir().unwrap();
        let svc = service(temp_dir.path());

        let stats = DailyStats {
            sleep_hours: 8.0,
            did_exercise: true,
            ..Default::default()
        };
        let (day, level) = svc.daily_points(&stats).unwrap();
        // sleep 20 + coding<=8 10 + exercise 30 + stress<=4 10
        assert_eq!(day.points, 70);
        assert_eq!(level.level, 1);
        assert_eq!(level.current_level_xp, 70);
    }

    #[test]
    fn test_from_config_uses_data_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data.data_dir = temp_dir.path().to_path_buf();

        let svc = HabitService::from_config(&config);
        svc.log_habit(habit("Run", Local::now().date_naive())).unwrap();

        assert!(temp_dir.path().join("habits.jsonl").exists());
        assert_eq!(svc.store().path(), temp_dir.path().join("habits.jsonl"));
    }
}
