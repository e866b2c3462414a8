use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::workout::{WorkoutType, ZoneDistribution};

/// ---------------------------------------------------------------------------
/// Baseline
/// ---------------------------------------------------------------------------

/// Rolling reference built from a user's own recent same-type workouts.
/// Derived on demand; never stored as primary truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
  pub user_id: String,
  pub workout_type: WorkoutType,
  /// Inclusive
  pub window_start: NaiveDate,
  /// Exclusive: the as-of day itself never feeds its own baseline
  pub window_end: NaiveDate,
  pub source_workout_ids: Vec<String>,
  pub mean_pace_min_per_km: Option<f64>,
  pub mean_speed_kmh: Option<f64>,
  pub mean_heart_rate: Option<f64>,
  pub mean_distance_km: f64,
  pub mean_duration_min: f64,
  pub mean_zone_distribution: Option<ZoneDistribution>,
}

impl Baseline {
  pub fn sample_count(&self) -> usize {
    self.source_workout_ids.len()
  }

  /// Mean speed per heartbeat, comparable with `WorkoutRecord::efficiency`
  pub fn mean_efficiency(&self) -> Option<f64> {
    let speed = match self.workout_type {
      WorkoutType::Run => self.mean_pace_min_per_km.filter(|p| *p > 0.0).map(|p| 60.0 / p),
      _ => self.mean_speed_kmh,
    }?;
    match self.mean_heart_rate {
      Some(hr) if hr > 0.0 => Some(speed / hr),
      _ => None,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Comparison
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
  Distance,
  Duration,
  /// Run pace; deltas are expressed as improvement (baseline - workout)
  Pace,
  /// Non-run speed
  Speed,
  HeartRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsualLabel {
  AboveUsual,
  BelowUsual,
  Normal,
}

impl UsualLabel {
  /// Closed interval around zero is `Normal`: exactly +/- threshold is not unusual
  pub fn classify(delta_percent: f64, threshold_pct: f64) -> Self {
    if delta_percent > threshold_pct {
      UsualLabel::AboveUsual
    } else if delta_percent < -threshold_pct {
      UsualLabel::BelowUsual
    } else {
      UsualLabel::Normal
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      UsualLabel::AboveUsual => "above_usual",
      UsualLabel::BelowUsual => "below_usual",
      UsualLabel::Normal => "normal",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadDirection {
  Up,
  Down,
  Stable,
}

impl LoadDirection {
  pub fn classify(delta_percent: f64, threshold_pct: f64) -> Self {
    if delta_percent > threshold_pct {
      LoadDirection::Up
    } else if delta_percent < -threshold_pct {
      LoadDirection::Down
    } else {
      LoadDirection::Stable
    }
  }

  /// Direction of `current` relative to `reference`; no reference means stable
  pub fn from_ratio(current: f64, reference: f64, threshold_pct: f64) -> Self {
    if reference > 0.0 {
      Self::classify((current - reference) / reference * 100.0, threshold_pct)
    } else {
      LoadDirection::Stable
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      LoadDirection::Up => "up",
      LoadDirection::Down => "down",
      LoadDirection::Stable => "stable",
    }
  }
}

/// One metric of one workout against its baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
  pub metric: Metric,
  pub workout_value: f64,
  pub baseline_value: f64,
  pub delta_absolute: f64,
  pub delta_percent: f64,
  pub label: UsualLabel,
}

/// ---------------------------------------------------------------------------
/// Recovery
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStatus {
  Ready,
  Moderate,
  Low,
}

impl RecoveryStatus {
  pub fn from_score(score: u8, ready_threshold: u8, moderate_threshold: u8) -> Self {
    if score >= ready_threshold {
      RecoveryStatus::Ready
    } else if score >= moderate_threshold {
      RecoveryStatus::Moderate
    } else {
      RecoveryStatus::Low
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      RecoveryStatus::Ready => "ready",
      RecoveryStatus::Moderate => "moderate",
      RecoveryStatus::Low => "low",
    }
  }
}

/// Aggregated lookback inputs to the recovery score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSignals {
  pub sessions: usize,
  pub volume_km: f64,
  /// Chronic volume scaled to the lookback length
  pub chronic_volume_km: f64,
  pub hard_sessions: usize,
  pub days_since_hard: Option<i64>,
}

impl LoadSignals {
  /// Lookback volume relative to the user's own normal; 1.0 when there is no history
  pub fn volume_ratio(&self) -> f64 {
    if self.chronic_volume_km > 0.0 {
      self.volume_km / self.chronic_volume_km
    } else {
      1.0
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryScore {
  pub user_id: String,
  pub as_of: NaiveDate,
  /// 0-100
  pub score: u8,
  pub status: RecoveryStatus,
  pub load_direction: LoadDirection,
  pub phrase: String,
  /// Fewer sessions than needed for a confident score
  pub insufficient_data: bool,
  pub signals: LoadSignals,
}
