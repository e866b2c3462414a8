//! Engine configuration
//!
//! Everything is read from environment variables (a `.env` file is honoured)
//! and validated once, when the engine is built. A malformed value fails
//! startup; nothing here is re-read per request.

use std::env;
use std::str::FromStr;

use crate::error::{CoachError, CoachResult};
use crate::models::WorkoutType;

/// ---------------------------------------------------------------------------
/// Defaults
/// ---------------------------------------------------------------------------

pub const DEFAULT_DATABASE_URL: &str = "sqlite://coach.db?mode=rwc";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_BASELINE_WINDOW_DAYS: i64 = 14;
pub const DEFAULT_RECOVERY_LOOKBACK_DAYS: i64 = 7;
pub const DEFAULT_CHRONIC_WINDOW_DAYS: i64 = 30;
/// Deviation beyond which a metric is framed as unusual
pub const DEFAULT_UNUSUAL_THRESHOLD_PCT: f64 = 10.0;
/// Deviation beyond which load is reported as moving up or down
pub const DEFAULT_DIRECTION_THRESHOLD_PCT: f64 = 5.0;
pub const DEFAULT_HIDDEN_INSIGHT_PROBABILITY: f64 = 0.6;
pub const DEFAULT_EXPECTED_SESSIONS_PER_WEEK: u32 = 5;
/// Composed payloads kept in memory before the least recently used is evicted
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;

/// ---------------------------------------------------------------------------
/// Analysis Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
  pub baseline_window_days: i64,
  pub recovery_lookback_days: i64,
  pub chronic_window_days: i64,
  pub unusual_threshold_pct: f64,
  pub direction_threshold_pct: f64,
  pub hidden_insight_probability: f64,
  pub expected_sessions_per_week: u32,
  pub workout_types: Vec<WorkoutType>,
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      baseline_window_days: DEFAULT_BASELINE_WINDOW_DAYS,
      recovery_lookback_days: DEFAULT_RECOVERY_LOOKBACK_DAYS,
      chronic_window_days: DEFAULT_CHRONIC_WINDOW_DAYS,
      unusual_threshold_pct: DEFAULT_UNUSUAL_THRESHOLD_PCT,
      direction_threshold_pct: DEFAULT_DIRECTION_THRESHOLD_PCT,
      hidden_insight_probability: DEFAULT_HIDDEN_INSIGHT_PROBABILITY,
      expected_sessions_per_week: DEFAULT_EXPECTED_SESSIONS_PER_WEEK,
      workout_types: WorkoutType::ALL.to_vec(),
    }
  }
}

impl AnalysisConfig {
  pub fn validate(&self) -> CoachResult<()> {
    let fail = |msg: String| Err(CoachError::Configuration(msg));

    if self.baseline_window_days <= 0 {
      return fail(format!("baseline window must be positive, got {}", self.baseline_window_days));
    }
    if self.recovery_lookback_days <= 0 {
      return fail(format!("recovery lookback must be positive, got {}", self.recovery_lookback_days));
    }
    if self.chronic_window_days < self.recovery_lookback_days {
      return fail(format!(
        "chronic window ({}) must cover the recovery lookback ({})",
        self.chronic_window_days, self.recovery_lookback_days
      ));
    }
    if !(self.unusual_threshold_pct.is_finite() && self.unusual_threshold_pct > 0.0) {
      return fail(format!("unusual threshold must be positive, got {}", self.unusual_threshold_pct));
    }
    if !(self.direction_threshold_pct.is_finite() && self.direction_threshold_pct > 0.0) {
      return fail(format!("direction threshold must be positive, got {}", self.direction_threshold_pct));
    }
    if self.direction_threshold_pct >= self.unusual_threshold_pct {
      return fail(format!(
        "direction threshold ({}) must be tighter than the unusual threshold ({})",
        self.direction_threshold_pct, self.unusual_threshold_pct
      ));
    }
    if !(0.0..=1.0).contains(&self.hidden_insight_probability) {
      return fail(format!(
        "hidden insight probability must be within [0, 1], got {}",
        self.hidden_insight_probability
      ));
    }
    if self.expected_sessions_per_week == 0 {
      return fail("expected sessions per week must be at least 1".to_string());
    }
    if self.workout_types.is_empty() {
      return fail("at least one workout type must be enabled".to_string());
    }

    Ok(())
  }

  pub fn tracks(&self, workout_type: WorkoutType) -> bool {
    self.workout_types.contains(&workout_type)
  }
}

/// ---------------------------------------------------------------------------
/// Process Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CoachConfig {
  pub database_url: String,
  pub log_level: String,
  pub cache_max_entries: usize,
  pub analysis: AnalysisConfig,
}

impl CoachConfig {
  pub fn from_env() -> CoachResult<Self> {
    dotenvy::dotenv().ok();

    let defaults = AnalysisConfig::default();
    let workout_types = match env::var("COACH_WORKOUT_TYPES") {
      Ok(raw) => parse_workout_types(&raw)?,
      Err(_) => defaults.workout_types.clone(),
    };

    let analysis = AnalysisConfig {
      baseline_window_days: env_or("COACH_BASELINE_WINDOW_DAYS", defaults.baseline_window_days)?,
      recovery_lookback_days: env_or("COACH_RECOVERY_LOOKBACK_DAYS", defaults.recovery_lookback_days)?,
      chronic_window_days: env_or("COACH_CHRONIC_WINDOW_DAYS", defaults.chronic_window_days)?,
      unusual_threshold_pct: env_or("COACH_UNUSUAL_THRESHOLD_PCT", defaults.unusual_threshold_pct)?,
      direction_threshold_pct: env_or("COACH_DIRECTION_THRESHOLD_PCT", defaults.direction_threshold_pct)?,
      hidden_insight_probability: env_or(
        "COACH_HIDDEN_INSIGHT_PROBABILITY",
        defaults.hidden_insight_probability,
      )?,
      expected_sessions_per_week: env_or(
        "COACH_EXPECTED_SESSIONS_PER_WEEK",
        defaults.expected_sessions_per_week,
      )?,
      workout_types,
    };
    analysis.validate()?;

    let cache_max_entries = env_or("COACH_CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?;
    if cache_max_entries == 0 {
      return Err(CoachError::Configuration(
        "COACH_CACHE_MAX_ENTRIES must be at least 1".to_string(),
      ));
    }

    Ok(Self {
      database_url: env::var("COACH_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
      log_level: env::var("COACH_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
      cache_max_entries,
      analysis,
    })
  }
}

fn env_or<T: FromStr>(key: &str, default: T) -> CoachResult<T> {
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|_| CoachError::Configuration(format!("{} has an invalid value: {}", key, raw))),
    Err(_) => Ok(default),
  }
}

fn parse_workout_types(raw: &str) -> CoachResult<Vec<WorkoutType>> {
  raw
    .split(',')
    .filter(|s| !s.trim().is_empty())
    .map(|s| s.parse::<WorkoutType>().map_err(CoachError::Configuration))
    .collect()
}
