#![forbid(unsafe_code)]

//! Core domain model and business logic for HabitFlow.
//!
//! This crate provides:
//! - Domain types (habit entries, daily stats, predictions)
//! - Habit log persistence (JSONL store with file locking)
//! - Burnout scoring engine
//! - Service facade composing store and engine
//! - Daily points, badges and correlation insights
//! - CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod engine;
pub mod points;
pub mod correlation;
pub mod export;
pub mod service;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{HabitStore, JsonlHabitStore};
pub use engine::{BurnoutPredictor, Factor, Weights};
pub use points::{calculate_daily_points, level_info, score_day, Badge, DailyPoints, LevelInfo};
pub use correlation::{analyze_correlations, read_daily_logs, CorrelationInsight, InsightKind};
pub use export::export_csv;
pub use service::{parse_daily_stats, parse_new_habit, HabitService};
