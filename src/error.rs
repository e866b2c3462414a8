use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum CoachError {
  /// Expected and recoverable: turned into an "insufficient" marker, never a failure
  #[error("Insufficient data: need {required} samples, found {found}")]
  InsufficientData { required: usize, found: usize },

  /// The record is skipped and logged; the rest of the computation continues
  #[error("Invalid workout record {id}: {reason}")]
  InvalidRecord { id: String, reason: String },

  /// Raised only while building the engine
  #[error("Configuration error: {0}")]
  Configuration(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type CoachResult<T> = Result<T, CoachError>;
