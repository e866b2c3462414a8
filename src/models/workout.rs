use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoachError, CoachResult};

/// Allowed drift of a zone distribution total away from 100%
pub const ZONE_SUM_TOLERANCE_PCT: f64 = 1.0;

/// ---------------------------------------------------------------------------
/// Workout Type
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
  Run,
  Cycle,
  Swim,
  Other,
}

impl WorkoutType {
  pub const ALL: [WorkoutType; 4] = [
    WorkoutType::Run,
    WorkoutType::Cycle,
    WorkoutType::Swim,
    WorkoutType::Other,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutType::Run => "run",
      WorkoutType::Cycle => "cycle",
      WorkoutType::Swim => "swim",
      WorkoutType::Other => "other",
    }
  }
}

impl std::fmt::Display for WorkoutType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for WorkoutType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "run" => Ok(Self::Run),
      "cycle" => Ok(Self::Cycle),
      "swim" => Ok(Self::Swim),
      "other" => Ok(Self::Other),
      _ => Err(format!("Unknown workout type: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Effort Zone Distribution
/// ---------------------------------------------------------------------------

/// Percentage of session time spent in each heart-rate zone (z1 easiest, z5 hardest)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneDistribution {
  pub z1: f64,
  pub z2: f64,
  pub z3: f64,
  pub z4: f64,
  pub z5: f64,
}

impl ZoneDistribution {
  pub fn from_array(pcts: [f64; 5]) -> Self {
    Self {
      z1: pcts[0],
      z2: pcts[1],
      z3: pcts[2],
      z4: pcts[3],
      z5: pcts[4],
    }
  }

  pub fn as_array(&self) -> [f64; 5] {
    [self.z1, self.z2, self.z3, self.z4, self.z5]
  }

  pub fn total(&self) -> f64 {
    self.as_array().iter().sum()
  }

  /// Time share in z1 + z2
  pub fn aerobic_pct(&self) -> f64 {
    self.z1 + self.z2
  }

  /// Time share in z3 and above
  pub fn tempo_plus_pct(&self) -> f64 {
    self.z3 + self.z4 + self.z5
  }

  /// Time share in z4 + z5
  pub fn high_intensity_pct(&self) -> f64 {
    self.z4 + self.z5
  }

  pub fn is_valid(&self) -> bool {
    self.as_array().iter().all(|p| p.is_finite() && *p >= 0.0)
      && (self.total() - 100.0).abs() <= ZONE_SUM_TOLERANCE_PCT
  }
}

/// One segment of a session (usually a kilometre or a lap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
  pub index: u32,
  #[serde(default)]
  pub pace_min_per_km: Option<f64>,
  #[serde(default)]
  pub avg_heart_rate: Option<i64>,
}

/// ---------------------------------------------------------------------------
/// Workout Record
/// ---------------------------------------------------------------------------

/// One completed training session. Owned by the workout store; everything
/// downstream only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
  pub id: String,
  pub user_id: String,
  #[serde(rename = "type")]
  pub workout_type: WorkoutType,
  /// Calendar date in the user's timezone
  pub date: NaiveDate,
  pub distance_km: f64,
  pub duration_minutes: f64,
  #[serde(default)]
  pub avg_heart_rate: Option<i64>,
  #[serde(default)]
  pub max_heart_rate: Option<i64>,
  /// Runs only
  #[serde(default)]
  pub avg_pace_min_per_km: Option<f64>,
  /// Non-run sessions only
  #[serde(default)]
  pub avg_speed_kmh: Option<f64>,
  #[serde(default)]
  pub elevation_gain_m: Option<f64>,
  #[serde(default)]
  pub calories: Option<i64>,
  #[serde(default)]
  pub effort_zone_distribution: Option<ZoneDistribution>,
  #[serde(default)]
  pub splits: Option<Vec<Split>>,
  #[serde(default)]
  pub notes: Option<String>,
}

impl WorkoutRecord {
  /// Reject records with physically impossible values
  pub fn validate(&self) -> CoachResult<()> {
    let invalid = |reason: &str| CoachError::InvalidRecord {
      id: self.id.clone(),
      reason: reason.to_string(),
    };

    if !self.distance_km.is_finite() || self.distance_km < 0.0 {
      return Err(invalid("negative or non-finite distance"));
    }
    if !self.duration_minutes.is_finite() || self.duration_minutes <= 0.0 {
      return Err(invalid("duration must be positive"));
    }
    if self.avg_heart_rate.map_or(false, |hr| hr <= 0) || self.max_heart_rate.map_or(false, |hr| hr <= 0) {
      return Err(invalid("heart rate must be positive"));
    }
    if self.avg_pace_min_per_km.map_or(false, |p| !p.is_finite() || p <= 0.0) {
      return Err(invalid("pace must be positive"));
    }
    if self.avg_speed_kmh.map_or(false, |s| !s.is_finite() || s <= 0.0) {
      return Err(invalid("speed must be positive"));
    }
    if let Some(zones) = &self.effort_zone_distribution {
      if !zones.is_valid() {
        return Err(invalid("zone distribution must be non-negative and sum to 100"));
      }
    }

    Ok(())
  }

  pub fn is_run(&self) -> bool {
    self.workout_type == WorkoutType::Run
  }

  /// Pace in min/km for runs, derived from duration and distance if not reported
  pub fn effective_pace(&self) -> Option<f64> {
    if !self.is_run() {
      return None;
    }
    self.avg_pace_min_per_km.or_else(|| {
      if self.distance_km > 0.0 {
        Some(self.duration_minutes / self.distance_km)
      } else {
        None
      }
    })
  }

  /// Speed in km/h for non-run sessions, derived if not reported
  pub fn effective_speed(&self) -> Option<f64> {
    if self.is_run() {
      return None;
    }
    self.avg_speed_kmh.or_else(|| {
      if self.distance_km > 0.0 && self.duration_minutes > 0.0 {
        Some(self.distance_km / (self.duration_minutes / 60.0))
      } else {
        None
      }
    })
  }

  /// Speed per heartbeat (km/h per bpm); higher is better for every modality
  pub fn efficiency(&self) -> Option<f64> {
    let speed = match self.workout_type {
      WorkoutType::Run => self.effective_pace().map(|pace| 60.0 / pace),
      _ => self.effective_speed(),
    }?;
    match self.avg_heart_rate {
      Some(hr) if hr > 0 => Some(speed / hr as f64),
      _ => None,
    }
  }
}
