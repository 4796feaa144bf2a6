use anyhow::{Context, Result};
use aquatrack::config::AppConfig;
use aquatrack::error::HydrationError;
use aquatrack::gamification::{level_progress, Rank, XP_PER_LEVEL};
use aquatrack::logging::{init_logging, LogLevel};
use aquatrack::notifications::schedule_snooze;
use aquatrack::stats::day_record;
use aquatrack::{
    ActivityLevel, AppSettings, Clock, GoalCalculator, HydrationTracker, RecordingScheduler,
    SqliteStore, SystemClock, TimeOfDay, YearMonth,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tabled::{settings::Style, Table, Tabled};
use tracing::{error, warn, Level};

/// AquaTrack - Hydration Tracking CLI
///
/// Log water intake, compute a daily goal from body weight and activity,
/// and plan drink reminders across the day.
#[derive(Parser)]
#[command(name = "aquatrack")]
#[command(version)]
#[command(about = "Hydration tracking CLI", long_about = None)]
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
    /// Create your profile and initial goal
    Onboard {
        #[arg(short, long)]
        name: String,

        /// Body weight in kilograms
        #[arg(short, long)]
        weight: f64,

        /// Activity level (sedentary, lightly-active, moderately-active, very-active, extra-active)
        #[arg(short, long)]
        activity: String,
    },

    /// Update weight and activity level
    Profile {
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long)]
        activity: String,

        /// Also set the daily goal to the new recommendation
        #[arg(long)]
        use_recommended: bool,
    },

    /// Show the recommended daily intake without saving anything
    Goal {
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long)]
        activity: String,
    },

    /// Record a drink
    Drink {
        /// Amount in milliliters (defaults to the reminder confirmation amount)
        #[arg(short, long, conflicts_with = "quick")]
        amount: Option<u32>,

        /// Pick one of the configured quick-add amounts (1-based)
        #[arg(short, long)]
        quick: Option<usize>,
    },

    /// Show today's progress and the next reminder
    Status,

    /// Show when the next reminder fires
    Next,

    /// Show today's reminder slots
    Plan,

    /// Register reminders with the notification backend (preview)
    Schedule,

    /// Remind me again later
    Snooze {
        #[arg(short, long)]
        minutes: Option<u32>,
    },

    /// Monthly history and statistics
    Stats {
        /// Month as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Show a single day (YYYY-MM-DD)
        #[arg(short, long)]
        day: Option<NaiveDate>,
    },

    /// View or change reminder settings
    Settings {
        /// Daily goal in milliliters
        #[arg(long)]
        goal: Option<u32>,

        /// Minutes between reminders
        #[arg(long)]
        frequency: Option<u32>,

        /// Start of the active window (H:MM)
        #[arg(long)]
        start: Option<TimeOfDay>,

        /// End of the active window (H:MM)
        #[arg(long)]
        end: Option<TimeOfDay>,

        /// Enable or disable reminders
        #[arg(long)]
        notifications: Option<bool>,
    },
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Time")]
    time: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Intake (ml)")]
    intake: u32,
    #[tabled(rename = "Goal (ml)")]
    goal: u32,
    #[tabled(rename = "Met")]
    met: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Log at the error's severity and print the user-facing message
fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<HydrationError>() {
        Some(hydration_err) => {
            if hydration_err.severity().to_tracing_level() == Level::ERROR {
                error!(error = %hydration_err, "Command failed");
            } else {
                warn!(error = %hydration_err, "Command rejected");
            }
            eprintln!("{} {}", "Error:".red().bold(), hydration_err.user_message());
        }
        None => {
            error!(error = %err, "Command failed");
            eprintln!("{} {:#}", "Error:".red().bold(), err);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref());
    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    init_logging(&log_config)?;

    // Pure calculation, no store needed
    if let Commands::Goal { weight, activity } = &cli.command {
        let level: ActivityLevel = activity.parse().map_err(anyhow::Error::msg)?;
        let goal = GoalCalculator::try_recommended_intake(*weight, level)?;
        println!("{} {} ml", "Recommended daily intake:".blue().bold(), goal);
        return Ok(());
    }

    let db_path = &config.storage.database_path;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }
    let store = SqliteStore::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    let mut tracker = HydrationTracker::new(store, SystemClock);

    match cli.command {
        Commands::Goal { .. } => {}

        Commands::Onboard {
            name,
            weight,
            activity,
        } => {
            let profile = tracker.onboard(&name, weight, &activity)?;
            println!("{}", format!("Welcome, {}!", profile.name).green().bold());
            println!("  Activity: {}", profile.activity_level);
            println!("  Daily goal: {} ml", profile.recommended_intake);
        }

        Commands::Profile {
            weight,
            activity,
            use_recommended,
        } => {
            let profile = tracker.update_profile(weight, &activity, use_recommended)?;
            println!("{}", "✓ Profile updated".green());
            println!("  Recommended intake: {} ml", profile.recommended_intake);
            if !use_recommended {
                println!(
                    "  {}",
                    "Run with --use-recommended to adopt it as your daily goal".dimmed()
                );
            }
        }

        Commands::Drink { amount, quick } => {
            let amount = config.reminders.drink_amount(amount, quick)?;
            let outcome = tracker.add_water(amount)?;
            println!(
                "{} {} / {} ml",
                "💧 Logged.".cyan().bold(),
                outcome.record.intake_ml,
                outcome.record.goal_ml
            );
            if let Some(progress) = outcome.progress {
                println!("  +{} XP", progress.xp_gained);
                if progress.goal_reached_today {
                    println!("  {}", "🎉 Daily goal reached!".green().bold());
                }
                if progress.leveled_up {
                    println!("  {}", "⬆ Level up!".yellow().bold());
                }
            }
        }

        Commands::Status => {
            let record = tracker.today()?;
            println!("{}", "Today's Progress".blue().bold());
            println!(
                "  {} / {} ml ({:.0}%)",
                record.intake_ml,
                record.goal_ml,
                record.progress() * 100.0
            );

            if let Some(profile) = tracker.profile()? {
                println!("{}", "Your Journey".magenta().bold());
                println!("  Rank: {}", Rank::for_level(profile.level));
                println!("  Level: {}", profile.level);
                println!(
                    "  XP: {} / {} ({:.0}% to next level)",
                    profile.xp,
                    profile.level * XP_PER_LEVEL,
                    level_progress(profile.xp) * 100.0
                );
                println!("  Current streak: {} days", profile.current_streak);
                println!("  Highest streak: {} days", profile.highest_streak);
            }

            println!("{}", "Next Reminder".cyan().bold());
            match tracker.next_reminder()? {
                Some(next) => println!("  {}", next.summary(tracker.clock().now())),
                None => println!("  {}", "Enable notifications in settings".dimmed()),
            }
        }

        Commands::Next => {
            let now = tracker.clock().now();
            match tracker.next_reminder()? {
                Some(next) => {
                    println!("{} {}", "Next reminder:".cyan().bold(), next.summary(now));
                    if next.is_tomorrow {
                        println!("  {}", next.countdown_label(now).dimmed());
                    }
                }
                None => println!("{}", "Reminders are off or not configured".dimmed()),
            }
        }

        Commands::Plan => {
            let plan = tracker.reminder_plan()?;
            if plan.is_empty() {
                println!("{}", "No reminders configured".yellow());
            } else {
                let rows: Vec<SlotRow> = plan
                    .slots()
                    .iter()
                    .enumerate()
                    .map(|(i, slot)| SlotRow {
                        index: i + 1,
                        time: slot.to_string(),
                    })
                    .collect();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }

        Commands::Schedule => {
            let mut scheduler = RecordingScheduler::default();
            let count = tracker.schedule_reminders(&mut scheduler, &mut rand::rng())?;
            println!("{}", format!("✓ Scheduled {} reminders", count).green());
            for (trigger, content) in scheduler.scheduled() {
                println!("  {:02}:{:02}  {}", trigger.hour, trigger.minute, content.body);
            }
        }

        Commands::Snooze { minutes } => {
            let minutes = minutes.unwrap_or(config.reminders.snooze_minutes);
            let mut scheduler = RecordingScheduler::default();
            let at = schedule_snooze(tracker.clock().now(), minutes, &mut scheduler)?;
            println!("{}", format!("⏰ Reminding you again at {}", at).yellow());
        }

        Commands::Stats { month, day } => {
            let month = match month {
                Some(value) => parse_year_month(&value)?,
                None => YearMonth::of(tracker.clock().today()),
            };
            let (records, stats) = tracker.month_stats(month)?;

            if let Some(date) = day {
                match day_record(&records, date) {
                    Some(record) => println!(
                        "{}: {} / {} ml",
                        date, record.intake_ml, record.goal_ml
                    ),
                    None => println!("{}", format!("No data for {}", date).dimmed()),
                }
                return Ok(());
            }

            println!("{}", format!("Water intake for {}", month).blue().bold());
            if records.is_empty() {
                println!("  {}", "No days tracked".dimmed());
                return Ok(());
            }

            let rows: Vec<DayRow> = records
                .iter()
                .map(|r| DayRow {
                    date: r.date.to_string(),
                    intake: r.intake_ml,
                    goal: r.goal_ml,
                    met: if r.goal_reached() { "✓" } else { "" }.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            println!("  Total: {} ml", stats.total_intake_ml);
            println!("  Daily average: {} ml", stats.average_daily_intake_ml);
            println!("  Days tracked: {}", stats.days_tracked);
            if let Some(best) = stats.best_day {
                println!("  Best day: {} ({} ml)", best.date, best.intake_ml);
            }
            println!("  Goal achievement: {}%", stats.goal_achievement_pct);
        }

        Commands::Settings {
            goal,
            frequency,
            start,
            end,
            notifications,
        } => {
            let current = tracker.settings()?;
            let updated = AppSettings {
                daily_goal: goal.unwrap_or(current.daily_goal),
                notifications_enabled: notifications.unwrap_or(current.notifications_enabled),
                reminder_frequency: frequency
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| current.reminder_frequency.clone()),
                start_time: start
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| current.start_time.clone()),
                end_time: end
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| current.end_time.clone()),
            };

            if updated != current {
                tracker.save_settings(&updated)?;
                println!("{}", "✓ Settings saved".green());
            }

            println!("  Daily goal: {} ml", updated.daily_goal);
            println!(
                "  Reminders: {}",
                if updated.notifications_enabled { "on" } else { "off" }
            );
            println!("  Every {} minutes", updated.reminder_frequency);
            println!("  Active window: {} - {}", updated.start_time, updated.end_time);
        }
    }

    Ok(())
}

fn parse_year_month(value: &str) -> Result<YearMonth> {
    let (year, month) = value
        .split_once('-')
        .with_context(|| format!("Expected YYYY-MM, got '{}'", value))?;
    let year: i32 = year.parse().with_context(|| format!("Invalid year '{}'", year))?;
    let month: u32 = month.parse().with_context(|| format!("Invalid month '{}'", month))?;
    YearMonth::new(year, month).with_context(|| format!("Invalid month '{}'", value))
}
