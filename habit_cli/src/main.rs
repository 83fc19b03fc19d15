use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use habit_core::*;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "habitflow")]
#[command(about = "Habit log and burnout risk scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a habit occurrence
    Log {
        #[arg(long)]
        name: String,

        /// Date the habit applies to (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// e.g. completed, skipped
        #[arg(long)]
        status: String,

        #[arg(long)]
        category: String,
    },

    /// Show recently logged habits
    History {
        /// Window in days (defaults to the configured window)
        #[arg(long)]
        days: Option<i64>,

        /// Also export the history to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Score a day's stats for burnout risk
    Predict(StatsArgs),

    /// Points and badges earned by a day's stats
    Points(StatsArgs),

    /// Correlations across daily check-ins
    Insights {
        /// JSONL file of {date, stats} check-ins
        #[arg(long)]
        logs: PathBuf,
    },

    /// Print the scoring weight table
    Weights,
}

#[derive(Args)]
struct StatsArgs {
    /// Full stats as a JSON body instead of individual flags
    #[arg(long)]
    json: Option<String>,

    #[arg(long, required_unless_present = "json", conflicts_with = "json", allow_negative_numbers = true)]
    sleep: Option<f64>,

    #[arg(long, required_unless_present = "json", conflicts_with = "json", allow_negative_numbers = true)]
    coding: Option<f64>,

    #[arg(long, required_unless_present = "json", conflicts_with = "json", allow_negative_numbers = true)]
    water: Option<f64>,

    #[arg(long, required_unless_present = "json", conflicts_with = "json", allow_negative_numbers = true)]
    mood: Option<f64>,

    #[arg(long, required_unless_present = "json", conflicts_with = "json", allow_negative_numbers = true)]
    stress: Option<f64>,

    #[arg(long, conflicts_with = "json")]
    read: bool,

    #[arg(long, conflicts_with = "json")]
    exercise: bool,

    #[arg(long, conflicts_with = "json")]
    note: Option<String>,
}

impl StatsArgs {
    fn into_stats(self) -> Result<DailyStats> {
        if let Some(body) = self.json {
            return parse_daily_stats(&body);
        }

        let required = |value: Option<f64>, flag: &str| {
            value.ok_or_else(|| Error::Validation(format!("--{} is required", flag)))
        };

        Ok(DailyStats {
            sleep_hours: required(self.sleep, "sleep")?,
            coding_hours: required(self.coding, "coding")?,
            water_intake: required(self.water, "water")?,
            mood: required(self.mood, "mood")?,
            stress_level: required(self.stress, "stress")?,
            did_read: self.read,
            did_exercise: self.exercise,
            note: self.note,
        })
    }
}

fn main() -> Result<()> {
    habit_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    tracing::debug!("Using data directory {:?}", config.data.data_dir);
    let service = HabitService::from_config(&config);

    match cli.command {
        Commands::Log {
            name,
            date,
            status,
            category,
        } => cmd_log(&service, name, date, status, category),
        Commands::History { days, csv } => cmd_history(service, days, csv),
        Commands::Predict(args) => cmd_predict(&service, args),
        Commands::Points(args) => cmd_points(&service, args),
        Commands::Insights { logs } => cmd_insights(&service, logs),
        Commands::Weights => cmd_weights(),
    }
}

fn cmd_log(
    service: &HabitService<JsonlHabitStore>,
    name: String,
    date: Option<NaiveDate>,
    status: String,
    category: String,
) -> Result<()> {
    let habit = NewHabit {
        name,
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        status,
        category,
    };

    let entry = service.log_habit(habit)?;
    print_json(&entry)
}

fn cmd_history(
    service: HabitService<JsonlHabitStore>,
    days: Option<i64>,
    csv: Option<PathBuf>,
) -> Result<()> {
    let service = match days {
        Some(days) if days < 0 => {
            return Err(Error::Validation(format!(
                "--days must be non-negative, got {}",
                days
            )))
        }
        Some(days) => service.with_history_window(days),
        None => service,
    };

    let entries = service.get_history()?;

    if let Some(csv_path) = csv {
        let count = export_csv(&entries, &csv_path)?;
        eprintln!("✓ Exported {} entries to {}", count, csv_path.display());
    }

    print_json(&entries)
}

fn cmd_predict(service: &HabitService<JsonlHabitStore>, args: StatsArgs) -> Result<()> {
    let stats = args.into_stats()?;
    let result = service.predict_burnout(&stats)?;
    print_json(&result)
}

fn cmd_points(service: &HabitService<JsonlHabitStore>, args: StatsArgs) -> Result<()> {
    let stats = args.into_stats()?;
    let (day, level) = service.daily_points(&stats)?;

    let badges: Vec<_> = day
        .badges
        .iter()
        .map(|badge| {
            json!({
                "id": badge,
                "name": badge.name(),
                "description": badge.description(),
            })
        })
        .collect();

    print_json(&json!({
        "points": day.points,
        "level": level,
        "badges": badges,
    }))
}

fn cmd_insights(service: &HabitService<JsonlHabitStore>, logs: PathBuf) -> Result<()> {
    if !logs.exists() {
        return Err(Error::Validation(format!(
            "check-in file {} does not exist",
            logs.display()
        )));
    }

    let history = read_daily_logs(&logs)?;
    let insights = service.insights(&history)?;
    print_json(&insights)
}

fn cmd_weights() -> Result<()> {
    let predictor = BurnoutPredictor::shared();
    for (factor, weight) in predictor.weights().entries() {
        println!("{:<12} {:+.1}", factor.to_string(), weight);
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
