// Library interface for AquaTrack modules
// The CLI binary and the integration tests both build on these

pub mod clock;
pub mod config;
pub mod error;
pub mod gamification;
pub mod goal;
pub mod intake;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod reminder;
pub mod stats;
pub mod storage;
pub mod tracker;

// Re-export commonly used types for convenience
pub use models::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use goal::GoalCalculator;
pub use reminder::{NextReminder, ReminderPlan, ReminderScheduler};
pub use notifications::{NotificationScheduler, RecordingScheduler};
pub use stats::{MonthStats, YearMonth};
pub use storage::{HydrationStore, KeyValueStore, MemoryStore, SqliteStore};
pub use tracker::HydrationTracker;
pub use error::{HydrationError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
