//! Comparator
//!
//! Relative deltas of one workout against its baseline.
//!
//! Sign convention: for run pace the deltas are expressed as improvement,
//! `baseline - workout`, so a faster pace is a positive delta and classifies
//! as `above_usual`. Every other metric uses `workout - baseline`. Load
//! direction is a separate axis and is taken from distance (duration when
//! distance has no usable baseline).

use crate::models::{Baseline, ComparisonResult, LoadDirection, Metric, UsualLabel, WorkoutRecord};

/// Compare every available metric. An absent baseline yields an empty set;
/// metrics whose baseline value is zero or missing are omitted.
pub fn compare(
  workout: &WorkoutRecord,
  baseline: Option<&Baseline>,
  unusual_threshold_pct: f64,
) -> Vec<ComparisonResult> {
  let baseline = match baseline {
    Some(b) if b.workout_type == workout.workout_type => b,
    _ => return Vec::new(),
  };
  if let Err(e) = workout.validate() {
    tracing::warn!(workout_id = %workout.id, error = %e, "not comparing invalid workout record");
    return Vec::new();
  }

  let candidates = [
    (Metric::Distance, Some(workout.distance_km), Some(baseline.mean_distance_km)),
    (Metric::Duration, Some(workout.duration_minutes), Some(baseline.mean_duration_min)),
    (Metric::Pace, workout.effective_pace(), baseline.mean_pace_min_per_km),
    (Metric::Speed, workout.effective_speed(), baseline.mean_speed_kmh),
    (
      Metric::HeartRate,
      workout.avg_heart_rate.map(|hr| hr as f64),
      baseline.mean_heart_rate,
    ),
  ];

  candidates
    .into_iter()
    .filter_map(|(metric, workout_value, baseline_value)| {
      compare_metric(metric, workout_value?, baseline_value?, unusual_threshold_pct)
    })
    .collect()
}

fn compare_metric(
  metric: Metric,
  workout_value: f64,
  baseline_value: f64,
  unusual_threshold_pct: f64,
) -> Option<ComparisonResult> {
  if !baseline_value.is_finite() || baseline_value == 0.0 || !workout_value.is_finite() {
    return None;
  }

  let delta_absolute = match metric {
    Metric::Pace => baseline_value - workout_value,
    _ => workout_value - baseline_value,
  };
  let delta_percent = delta_absolute / baseline_value * 100.0;

  Some(ComparisonResult {
    metric,
    workout_value,
    baseline_value,
    delta_absolute,
    delta_percent,
    label: UsualLabel::classify(delta_percent, unusual_threshold_pct),
  })
}

pub fn find(results: &[ComparisonResult], metric: Metric) -> Option<&ComparisonResult> {
  results.iter().find(|r| r.metric == metric)
}

/// Intensity relative to baseline: pace or speed first, heart rate as fallback
pub fn intensity_label(results: &[ComparisonResult]) -> Option<UsualLabel> {
  find(results, Metric::Pace)
    .or_else(|| find(results, Metric::Speed))
    .or_else(|| find(results, Metric::HeartRate))
    .map(|r| r.label)
}

/// Load delta against baseline in percent: distance first, duration as fallback
pub fn load_delta_percent(results: &[ComparisonResult]) -> Option<f64> {
  find(results, Metric::Distance)
    .or_else(|| find(results, Metric::Duration))
    .map(|r| r.delta_percent)
}

/// Load direction uses a tighter band than the unusual threshold
pub fn load_direction(results: &[ComparisonResult], direction_threshold_pct: f64) -> Option<LoadDirection> {
  load_delta_percent(results).map(|delta| LoadDirection::classify(delta, direction_threshold_pct))
}
