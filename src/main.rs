use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::{debug, info};

use fitrs::config::AppConfig;
use fitrs::logging::{init_logging, LogConfig};
use fitrs::models::{EventStatus, NutritionEntry, ScheduleEvent, SleepEntry, WeightEntry};
use fitrs::schedule::{events_for_date, parse_local_date, parse_local_time};
use fitrs::stats::{pr_report, sleep_summary, stats_summary, weight_progress};
use fitrs::store::Store;
use fitrs::streaks::StreakCalculator;
use fitrs::strength::RecordTracker;
use fitrs::trends::TrendAnalyzer;
use fitrs::LayoutEngine;

/// fitrs - Fitness Tracking CLI
///
/// Schedule resolution, day-grid layout, and derived statistics (PRs,
/// streaks, trends, goal projections) over locally logged workout data.
#[derive(Parser)]
#[command(name = "fitrs")]
#[command(version = "0.1.0")]
#[command(about = "Fitness tracking and statistics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the events resolved onto a date, with day-grid placement
    Schedule {
        /// Date to resolve (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show personal records and recent PRs across exercises
    Prs,

    /// Show body-weight history, trend, and goal projection
    Weight,

    /// Show the workout summary for a period
    Summary {
        /// Period start (YYYY-MM-DD)
        #[arg(short, long)]
        from: Option<String>,

        /// Period end (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,
    },

    /// Show current and longest workout streaks
    Streak,

    /// Show today's nutrition totals against targets
    Nutrition {
        /// Date to summarize (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show recent sleep history with average and trend
    Sleep {
        /// Number of trailing days to summarize
        #[arg(short, long, default_value = "14")]
        days: i64,
    },

    /// Add a schedule event
    AddEvent {
        /// Event title
        #[arg(short, long)]
        title: String,

        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,

        /// End time (HH:MM)
        #[arg(short, long)]
        end: String,

        /// One-time event date (YYYY-MM-DD); omit for recurring events
        #[arg(short, long)]
        date: Option<String>,

        /// Recurrence weekdays, 0=Sunday..6=Saturday (e.g. "1,3,5")
        #[arg(short = 'r', long)]
        repeat: Option<String>,
    },

    /// Log a body-weight measurement
    LogWeight {
        /// Weight value
        weight: Decimal,

        /// Measurement date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Log a meal's macros
    LogMeal {
        #[arg(long)]
        calories: Decimal,

        #[arg(long, default_value = "0")]
        protein: Decimal,

        #[arg(long, default_value = "0")]
        carbs: Decimal,

        #[arg(long, default_value = "0")]
        fat: Decimal,

        /// Meal date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Log a night's sleep
    LogSleep {
        /// Hours slept
        hours: Decimal,

        /// Night date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose))?;

    let config = AppConfig::load_or_create(cli.config.clone())?;
    debug!("Using data directory {:?}", config.settings.data_dir);

    let store = Store::open(config.database_path())
        .with_context(|| format!("Failed to open store at {:?}", config.database_path()))?;

    match cli.command {
        Commands::Schedule { date } => {
            let target = resolve_date(date.as_deref())?;
            show_schedule(&store, &config, target)?;
        }
        Commands::Prs => show_prs(&store, &config)?,
        Commands::Weight => show_weight(&store, &config)?,
        Commands::Summary { from, to } => {
            let today = Local::now().date_naive();
            let to = match to {
                Some(raw) => parse_local_date(&raw)?,
                None => today,
            };
            let from = match from {
                Some(raw) => parse_local_date(&raw)?,
                None => to - chrono::Duration::days(29),
            };
            show_summary(&store, &config, from, to, today)?;
        }
        Commands::Streak => show_streak(&store, &config)?,
        Commands::Sleep { days } => {
            let today = Local::now().date_naive();
            show_sleep(&store, &config, today - chrono::Duration::days(days - 1), today)?;
        }
        Commands::Nutrition { date } => {
            let target = resolve_date(date.as_deref())?;
            show_nutrition(&store, &config, target)?;
        }
        Commands::AddEvent {
            title,
            start,
            end,
            date,
            repeat,
        } => add_event(&store, title, &start, &end, date.as_deref(), repeat.as_deref())?,
        Commands::LogWeight { weight, date } => {
            let date = resolve_date(date.as_deref())?;
            store.insert_weight(&WeightEntry { date, weight })?;
            info!("Logged weight {} on {}", weight, date);
            println!("{} {} on {}", "Logged".green(), weight, date);
        }
        Commands::LogMeal {
            calories,
            protein,
            carbs,
            fat,
            date,
        } => {
            let date = resolve_date(date.as_deref())?;
            store.insert_nutrition(&NutritionEntry {
                date,
                calories,
                protein,
                carbs,
                fat,
            })?;
            println!("{} {} kcal on {}", "Logged".green(), calories, date);
        }
        Commands::LogSleep { hours, date } => {
            let date = resolve_date(date.as_deref())?;
            store.insert_sleep(&SleepEntry { date, hours })?;
            println!("{} {} hours on {}", "Logged".green(), hours, date);
        }
    }

    Ok(())
}

fn resolve_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(value) => Ok(parse_local_date(value)?),
        None => Ok(Local::now().date_naive()),
    }
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn show_schedule(store: &Store, config: &AppConfig, target: NaiveDate) -> Result<()> {
    let events = store.all_events()?;
    let todays = events_for_date(&events, target);

    println!("{}", format!("Schedule for {}", target).bold());

    if todays.is_empty() {
        println!("{}", "No events scheduled.".dimmed());
        return Ok(());
    }

    let engine = LayoutEngine::with_config(config.layout.clone());
    let positions = engine.assign_columns(&todays);

    let rows: Vec<ScheduleRow> = todays
        .iter()
        .map(|event| {
            let position = positions
                .iter()
                .find(|p| p.event_id == event.id)
                .map(|p| format!("{}/{}", p.column + 1, p.total_columns))
                .unwrap_or_else(|| "-".to_string());
            ScheduleRow {
                time: format!(
                    "{}-{}",
                    event.start_time.format("%H:%M"),
                    event.end_time.format("%H:%M")
                ),
                title: event.title.clone(),
                column: position,
                status: format_status(event.status),
            }
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}

#[derive(Tabled)]
struct PrRow {
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Est. 1RM")]
    one_rm: String,
    #[tabled(rename = "Max Weight")]
    max_weight: String,
    #[tabled(rename = "Max Reps")]
    max_reps: String,
}

fn show_prs(store: &Store, config: &AppConfig) -> Result<()> {
    let histories = store.exercise_histories()?;
    let tracker = RecordTracker::with_config(config.records.clone());
    let report = pr_report(&histories, &tracker, &config.report);

    println!("{}", "Personal Records".bold());

    if report.prs.is_empty() {
        println!("{}", "No working sets logged yet.".dimmed());
        return Ok(());
    }

    let unit = config.settings.weight_unit.label();
    let rows: Vec<PrRow> = report
        .prs
        .iter()
        .map(|entry| PrRow {
            exercise: entry.exercise.clone(),
            one_rm: entry
                .records
                .estimated_one_rm
                .as_ref()
                .map(|r| format!("{} {} ({})", r.value, unit, r.based_on))
                .unwrap_or_else(|| "-".to_string()),
            max_weight: entry
                .records
                .max_weight
                .as_ref()
                .map(|r| format!("{} {} x {}", r.weight, unit, r.reps))
                .unwrap_or_else(|| "-".to_string()),
            max_reps: entry
                .records
                .max_reps
                .as_ref()
                .map(|r| format!("{} @ {} {}", r.reps, r.weight, unit))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));

    if !report.recent_prs.is_empty() {
        println!("\n{}", "Recent PRs".bold());
        for pr in &report.recent_prs {
            println!(
                "  {} {} {} on {} ({})",
                "★".yellow(),
                pr.exercise,
                pr.kind,
                pr.date,
                pr.improvement.green()
            );
        }
    }

    Ok(())
}

fn show_weight(store: &Store, config: &AppConfig) -> Result<()> {
    let history = store.weight_history(None, None)?;
    let analyzer = TrendAnalyzer::with_config(config.trends.clone());
    let today = Local::now().date_naive();
    let progress = weight_progress(&history, config.settings.weight_target, &analyzer, today);

    println!("{}", "Body Weight".bold());

    let unit = config.settings.weight_unit.label();
    match progress.current {
        Some(current) => println!("Current: {} {}", current, unit),
        None => {
            println!("{}", "No weight entries logged yet.".dimmed());
            return Ok(());
        }
    }

    if let Some(stats) = &progress.stats {
        println!(
            "Change since {}: {} {} ({}%), trend {:?}, {} {}/week",
            stats.start_date, stats.change, unit, stats.change_percent, stats.trend,
            stats.avg_weekly_change, unit
        );
    }

    if let Some(goal) = &progress.goal {
        println!("Target: {} {} ({} {} to go)", goal.target, unit, goal.remaining, unit);
        match goal.estimated_date {
            Some(date) => println!("Estimated to reach target around {}", date),
            None => println!("{}", "No reliable estimate at the current rate.".dimmed()),
        }
    }

    Ok(())
}

fn show_summary(
    store: &Store,
    config: &AppConfig,
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    let workouts = store.workouts_between(from, to)?;
    let streaks = StreakCalculator::with_config(config.streak.clone());
    let summary = stats_summary(&workouts, &streaks, today);

    println!("{}", format!("Summary {} to {}", from, to).bold());
    println!(
        "Workouts: {}/{} completed ({}% consistency)",
        summary.workouts.completed, summary.workouts.scheduled, summary.workouts.consistency
    );
    println!(
        "Volume: {} total, {} per workout",
        summary.volume.total, summary.volume.avg_per_workout
    );
    println!(
        "Streak: {} current, {} longest",
        summary.streak.current, summary.streak.longest
    );
    Ok(())
}

fn show_streak(store: &Store, config: &AppConfig) -> Result<()> {
    let stamps = store.completed_timestamps()?;
    let streaks = StreakCalculator::with_config(config.streak.clone());
    let summary = streaks.compute(&stamps, Local::now().date_naive());

    if summary.current > 0 {
        println!(
            "{} {} day streak (longest: {})",
            "🔥".yellow(),
            summary.current,
            summary.longest
        );
    } else {
        println!(
            "No active streak. Longest so far: {} days.",
            summary.longest
        );
    }
    Ok(())
}

fn show_sleep(store: &Store, config: &AppConfig, from: NaiveDate, to: NaiveDate) -> Result<()> {
    let entries = store.sleep_between(from, to)?;
    let analyzer = TrendAnalyzer::with_config(config.trends.clone());

    println!("{}", format!("Sleep {} to {}", from, to).bold());

    match sleep_summary(&entries, &analyzer) {
        Some(summary) => {
            println!(
                "{} nights, {} hours/night average, trend {:?}",
                summary.nights, summary.avg_hours, summary.trend
            );
            for entry in &entries {
                println!("  {}  {} h", entry.date, entry.hours);
            }
        }
        None => println!("{}", "No sleep logged in this period.".dimmed()),
    }
    Ok(())
}

fn show_nutrition(store: &Store, config: &AppConfig, target: NaiveDate) -> Result<()> {
    let entries = store.nutrition_for_date(target)?;
    let summary = fitrs::nutrition::daily_summary(&entries, &config.targets);

    println!("{}", format!("Nutrition for {}", target).bold());
    println!(
        "Calories: {}/{} ({} remaining)",
        summary.consumed.calories, summary.targets.calories, summary.remaining.calories
    );
    println!(
        "Protein: {}g  Carbs: {}g  Fat: {}g",
        summary.consumed.protein, summary.consumed.carbs, summary.consumed.fat
    );
    Ok(())
}

fn add_event(
    store: &Store,
    title: String,
    start: &str,
    end: &str,
    date: Option<&str>,
    repeat: Option<&str>,
) -> Result<()> {
    let recurrence_days = repeat
        .map(|raw| {
            raw.split(',')
                .map(|part| {
                    part.trim()
                        .parse::<u8>()
                        .ok()
                        .filter(|d| *d <= 6)
                        .with_context(|| format!("Invalid weekday '{}'", part))
                })
                .collect::<Result<Vec<u8>>>()
        })
        .transpose()?;

    let event = ScheduleEvent {
        id: String::new(),
        title,
        category_id: None,
        start_time: parse_local_time(start)?,
        end_time: parse_local_time(end)?,
        date: date.map(parse_local_date).transpose()?,
        is_recurring: repeat.is_some() || date.is_none(),
        recurrence_days,
        status: EventStatus::Pending,
    };
    event.validate()?;

    let id = store.insert_event(&event)?;
    println!("{} event {}", "Added".green(), id);
    Ok(())
}

fn format_status(status: EventStatus) -> String {
    match status {
        EventStatus::Pending => "pending".to_string(),
        EventStatus::InProgress => "in progress".yellow().to_string(),
        EventStatus::Completed => "completed".green().to_string(),
        EventStatus::Cancelled => "cancelled".dimmed().to_string(),
    }
}
