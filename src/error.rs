//! Unified error hierarchy for AquaTrack
//!
//! The pure calculators never fail loudly; these types cover the code that
//! talks to storage and notification backends, plus the `try_*` calculator
//! variants that surface invalid input explicitly.

use thiserror::Error;

/// Top-level error type for all AquaTrack operations
#[derive(Debug, Error)]
pub enum HydrationError {
    /// Input rejected before any computation took place
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Key-value persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Notification backend errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// JSON (de)serialization of stored records
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite backend failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored value could not be decoded into the expected record
    #[error("Corrupted record {key}: {reason}")]
    Corrupted { key: String, reason: String },

    /// Record required by the operation is missing
    #[error("Record not found: {key}")]
    NotFound { key: String },
}

/// Result type alias for AquaTrack operations
pub type Result<T> = std::result::Result<T, HydrationError>;

impl HydrationError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HydrationError::InvalidInput(_) => ErrorSeverity::Warning,
            HydrationError::Storage(StorageError::NotFound { .. }) => ErrorSeverity::Warning,
            HydrationError::Storage(StorageError::Corrupted { .. }) => ErrorSeverity::Critical,
            HydrationError::Notification(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            HydrationError::InvalidInput(reason) => format!("Please check your input: {}", reason),
            HydrationError::Storage(StorageError::NotFound { key }) => {
                format!("No saved data for '{}'. Have you completed onboarding?", key)
            }
            HydrationError::Storage(StorageError::Corrupted { key, .. }) => {
                format!("Saved data for '{}' is unreadable and was not loaded.", key)
            }
            HydrationError::Notification(_) => {
                "Reminders could not be scheduled. Check notification permissions.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Data loss or corruption
    Critical,
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
