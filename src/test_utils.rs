//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Date helpers

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{Split, WorkoutRecord, WorkoutType};
use crate::store::WorkoutSnapshot;

pub const TEST_USER: &str = "user-1";

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A run for TEST_USER with pace derived from distance and duration
pub fn mock_run(id: &str, date: NaiveDate, distance_km: f64, duration_minutes: f64) -> WorkoutRecord {
  let pace = if distance_km > 0.0 && duration_minutes > 0.0 {
    Some(duration_minutes / distance_km)
  } else {
    None
  };

  WorkoutRecord {
    id: id.to_string(),
    user_id: TEST_USER.to_string(),
    workout_type: WorkoutType::Run,
    date,
    distance_km,
    duration_minutes,
    avg_heart_rate: Some(145),
    max_heart_rate: Some(170),
    avg_pace_min_per_km: pace,
    avg_speed_kmh: None,
    elevation_gain_m: None,
    calories: None,
    effort_zone_distribution: None,
    splits: None,
    notes: None,
  }
}

/// A ride for TEST_USER with speed derived from distance and duration
pub fn mock_ride(id: &str, date: NaiveDate, distance_km: f64, duration_minutes: f64) -> WorkoutRecord {
  let speed = if duration_minutes > 0.0 {
    Some(distance_km / (duration_minutes / 60.0))
  } else {
    None
  };

  WorkoutRecord {
    workout_type: WorkoutType::Cycle,
    avg_heart_rate: Some(135),
    avg_pace_min_per_km: None,
    avg_speed_kmh: speed,
    ..mock_run(id, date, distance_km, duration_minutes)
  }
}

/// Splits numbered from 1; `heart_rates` may be shorter than `paces`
pub fn mock_splits(paces: &[f64], heart_rates: &[i64]) -> Vec<Split> {
  paces
    .iter()
    .enumerate()
    .map(|(i, pace)| Split {
      index: i as u32 + 1,
      pace_min_per_km: Some(*pace),
      avg_heart_rate: heart_rates.get(i).copied(),
    })
    .collect()
}

/// Snapshot of TEST_USER's records at revision 0
pub fn mock_snapshot(records: Vec<WorkoutRecord>) -> WorkoutSnapshot {
  WorkoutSnapshot::new(TEST_USER, 0, records)
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workouts', 'user_revisions')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_derive_intensity() {
    let d = date(2024, 6, 1);

    let run = mock_run("r", d, 10.0, 50.0);
    assert_eq!(run.avg_pace_min_per_km, Some(5.0));
    assert!(run.validate().is_ok());

    let ride = mock_ride("c", d, 30.0, 60.0);
    assert_eq!(ride.workout_type, WorkoutType::Cycle);
    assert_eq!(ride.avg_speed_kmh, Some(30.0));
    assert!(ride.avg_pace_min_per_km.is_none());
  }
}
