//! Externally visible payload shapes
//!
//! These structs hold full-precision numbers. Rounding to presentation
//! precision happens only in the `serialize_with` helpers below, so every
//! internal comparison keeps working on the exact values.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::analysis::{LoadDirection, RecoveryScore, RecoveryStatus, UsualLabel};
use super::workout::ZoneDistribution;
use crate::error::CoachResult;

/// ---------------------------------------------------------------------------
/// Presentation helpers
/// ---------------------------------------------------------------------------

fn round_to_tenth(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

pub fn serialize_tenth<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
  s.serialize_f64(round_to_tenth(*value))
}

pub fn serialize_tenth_opt<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
  match value {
    Some(v) => s.serialize_f64(round_to_tenth(*v)),
    None => s.serialize_none(),
  }
}

pub fn serialize_whole<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
  s.serialize_i64(value.round() as i64)
}

/// "4:30/km"
pub fn format_pace(min_per_km: f64) -> String {
  let total_secs = (min_per_km * 60.0).round() as i64;
  format!("{}:{:02}/km", total_secs / 60, total_secs % 60)
}

/// "27.5 km/h"
pub fn format_speed(kmh: f64) -> String {
  format!("{:.1} km/h", kmh)
}

/// ---------------------------------------------------------------------------
/// Shared sections
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryBlock {
  pub score: u8,
  pub status: RecoveryStatus,
  pub phrase: String,
  pub insufficient_data: bool,
}

impl From<&RecoveryScore> for RecoveryBlock {
  fn from(r: &RecoveryScore) -> Self {
    Self {
      score: r.score,
      status: r.status,
      phrase: r.phrase.clone(),
      insufficient_data: r.insufficient_data,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
  pub dominant_zone: String,
  #[serde(serialize_with = "serialize_tenth")]
  pub aerobic_pct: f64,
  #[serde(serialize_with = "serialize_tenth")]
  pub tempo_plus_pct: f64,
  #[serde(serialize_with = "serialize_tenth")]
  pub high_intensity_pct: f64,
}

impl From<&ZoneDistribution> for ZoneSummary {
  fn from(zones: &ZoneDistribution) -> Self {
    let pcts = zones.as_array();
    // First zone wins ties so the summary is stable
    let dominant = pcts
      .iter()
      .enumerate()
      .fold(0, |best, (idx, pct)| if *pct > pcts[best] { idx } else { best });

    Self {
      dominant_zone: format!("z{}", dominant + 1),
      aerobic_pct: zones.aerobic_pct(),
      tempo_plus_pct: zones.tempo_plus_pct(),
      high_intensity_pct: zones.high_intensity_pct(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Dashboard
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSignal {
  Low,
  Balanced,
  High,
}

impl LoadSignal {
  pub fn as_str(&self) -> &'static str {
    match self {
      LoadSignal::Low => "low",
      LoadSignal::Balanced => "balanced",
      LoadSignal::High => "high",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekBlock {
  pub sessions: usize,
  #[serde(serialize_with = "serialize_tenth")]
  pub volume_km: f64,
  pub load_signal: LoadSignal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBlock {
  #[serde(serialize_with = "serialize_tenth")]
  pub volume_km: f64,
  pub active_weeks: u8,
  pub trend: LoadDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardInsight {
  pub coach_insight: String,
  pub week: WeekBlock,
  pub month: MonthBlock,
  /// Null when the user has no workouts at all
  pub recovery_score: Option<RecoveryBlock>,
}

/// ---------------------------------------------------------------------------
/// Workout Analysis
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
  Easy,
  Sustained,
  Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensitySection {
  pub pace: Option<String>,
  pub speed: Option<String>,
  pub avg_hr: Option<i64>,
  pub label: UsualLabel,
  /// False when no usable baseline existed; `label` is then `normal` by default
  pub baseline_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSection {
  #[serde(serialize_with = "serialize_tenth")]
  pub distance_km: f64,
  #[serde(serialize_with = "serialize_whole")]
  pub duration_min: f64,
  pub direction: LoadDirection,
  #[serde(serialize_with = "serialize_tenth_opt")]
  pub vs_baseline_pct: Option<f64>,
  pub baseline_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionTypeSection {
  pub label: SessionType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutAnalysis {
  pub workout_id: String,
  pub coach_summary: String,
  pub intensity: IntensitySection,
  pub load: LoadSection,
  pub session_type: SessionTypeSection,
  pub insight: Option<String>,
  pub guidance: Option<String>,
  pub recovery_score: Option<RecoveryBlock>,
  pub zone_summary: Option<ZoneSummary>,
}

/// ---------------------------------------------------------------------------
/// Weekly Digest
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKey {
  Load,
  Intensity,
  Consistency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestSignal {
  pub key: SignalKey,
  pub status: String,
  #[serde(serialize_with = "serialize_tenth_opt")]
  pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestMetrics {
  pub total_sessions: usize,
  #[serde(serialize_with = "serialize_tenth")]
  pub total_distance_km: f64,
  #[serde(serialize_with = "serialize_whole")]
  pub total_duration_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyDigest {
  pub digest_id: String,
  pub period_start: NaiveDate,
  pub period_end: NaiveDate,
  pub coach_summary: String,
  pub signals: Vec<DigestSignal>,
  pub metrics: DigestMetrics,
  pub recommendations: Vec<String>,
  pub insight: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Payload
/// ---------------------------------------------------------------------------

/// Three shapes of the same composition; serialized without a tag so each
/// matches its own JSON contract
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InsightPayload {
  Dashboard(DashboardInsight),
  WorkoutAnalysis(WorkoutAnalysis),
  WeeklyDigest(WeeklyDigest),
}

impl InsightPayload {
  pub fn to_json(&self) -> CoachResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}
