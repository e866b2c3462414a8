//! Baseline Calculator
//!
//! Rolling means over a trailing window of same-type workouts. The window is
//! `[as_of - window_days, as_of)`: a day's own workouts never feed the
//! baseline they are compared against.

use chrono::{Duration, NaiveDate};

use crate::error::{CoachError, CoachResult};
use crate::models::{Baseline, WorkoutRecord, WorkoutType, ZoneDistribution};
use crate::store::WorkoutSnapshot;

/// Fewer qualifying records than this and no comparison is made
pub const MIN_BASELINE_SAMPLES: usize = 2;

/// Compute the baseline for one workout type as of a date.
///
/// Returns `CoachError::InsufficientData` when fewer than
/// [`MIN_BASELINE_SAMPLES`] valid records fall inside the window; callers
/// treat that as "no comparison available", never as a zero baseline.
pub fn compute_baseline(
  snapshot: &WorkoutSnapshot,
  workout_type: WorkoutType,
  as_of: NaiveDate,
  window_days: i64,
) -> CoachResult<Baseline> {
  let window_start = as_of - Duration::days(window_days.max(0));
  let last_day = as_of - Duration::days(1);

  let records: Vec<&WorkoutRecord> = if window_days > 0 {
    snapshot
      .valid_between(window_start, last_day)
      .into_iter()
      .filter(|r| r.workout_type == workout_type)
      .collect()
  } else {
    Vec::new()
  };

  if records.len() < MIN_BASELINE_SAMPLES {
    tracing::debug!(
      user_id = %snapshot.user_id,
      workout_type = %workout_type,
      %as_of,
      found = records.len(),
      "baseline insufficient"
    );
    return Err(CoachError::InsufficientData {
      required: MIN_BASELINE_SAMPLES,
      found: records.len(),
    });
  }

  let mean_distance_km = mean(records.iter().map(|r| r.distance_km)).unwrap_or(0.0);
  let mean_duration_min = mean(records.iter().map(|r| r.duration_minutes)).unwrap_or(0.0);

  Ok(Baseline {
    user_id: snapshot.user_id.clone(),
    workout_type,
    window_start,
    window_end: as_of,
    source_workout_ids: records.iter().map(|r| r.id.clone()).collect(),
    mean_pace_min_per_km: mean(records.iter().filter_map(|r| r.effective_pace())),
    mean_speed_kmh: mean(records.iter().filter_map(|r| r.effective_speed())),
    mean_heart_rate: mean(records.iter().filter_map(|r| r.avg_heart_rate.map(|hr| hr as f64))),
    mean_distance_km,
    mean_duration_min,
    mean_zone_distribution: mean_zones(&records),
  })
}

/// Per-zone mean over the records that report zones; records without zone
/// data only drop out of this sub-average
fn mean_zones(records: &[&WorkoutRecord]) -> Option<ZoneDistribution> {
  let with_zones: Vec<[f64; 5]> = records
    .iter()
    .filter_map(|r| r.effort_zone_distribution.map(|z| z.as_array()))
    .collect();

  if with_zones.is_empty() {
    return None;
  }

  let mut sums = [0.0; 5];
  for zones in &with_zones {
    for (sum, pct) in sums.iter_mut().zip(zones.iter()) {
      *sum += pct;
    }
  }
  let n = with_zones.len() as f64;
  Some(ZoneDistribution::from_array(sums.map(|s| s / n)))
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
  let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
  if count > 0 {
    Some(sum / count as f64)
  } else {
    None
  }
}
