//! Workout Store
//!
//! The only component allowed to mutate workout records. Every mutation
//! bumps the owning user's revision in the same transaction, and every
//! snapshot carries the revision it was read at, so derived caches can tell
//! when they are stale.

use chrono::NaiveDate;
use sqlx::{Sqlite, Transaction};

use crate::db::DbPool;
use crate::error::{CoachError, CoachResult};
use crate::models::{Split, WorkoutRecord, WorkoutType, ZoneDistribution};

/// ---------------------------------------------------------------------------
/// Snapshot
/// ---------------------------------------------------------------------------

/// Immutable view of one user's records at a given revision
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSnapshot {
  pub user_id: String,
  pub revision: i64,
  records: Vec<WorkoutRecord>,
}

impl WorkoutSnapshot {
  /// Build a snapshot from already-loaded records; other users' records are dropped
  pub fn new(user_id: &str, revision: i64, records: Vec<WorkoutRecord>) -> Self {
    let mut records: Vec<_> = records.into_iter().filter(|r| r.user_id == user_id).collect();
    records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    Self {
      user_id: user_id.to_string(),
      revision,
      records,
    }
  }

  /// All records, ordered by (date, id)
  pub fn records(&self) -> &[WorkoutRecord] {
    &self.records
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn get(&self, workout_id: &str) -> Option<&WorkoutRecord> {
    self.records.iter().find(|r| r.id == workout_id)
  }

  /// Valid records dated within `[start, end]`. Invalid ones are logged and skipped.
  pub fn valid_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&WorkoutRecord> {
    self
      .records
      .iter()
      .filter(|r| r.date >= start && r.date <= end)
      .filter(|r| match r.validate() {
        Ok(()) => true,
        Err(e) => {
          tracing::warn!(user_id = %self.user_id, workout_id = %r.id, error = %e, "excluding invalid workout record");
          false
        }
      })
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Row Mapping
/// ---------------------------------------------------------------------------

#[derive(Debug, sqlx::FromRow)]
struct WorkoutRow {
  id: String,
  user_id: String,
  workout_type: String,
  date: NaiveDate,
  distance_km: f64,
  duration_minutes: f64,
  avg_heart_rate: Option<i64>,
  max_heart_rate: Option<i64>,
  avg_pace_min_per_km: Option<f64>,
  avg_speed_kmh: Option<f64>,
  elevation_gain_m: Option<f64>,
  calories: Option<i64>,
  zone_distribution_json: Option<String>,
  splits_json: Option<String>,
  notes: Option<String>,
}

impl TryFrom<WorkoutRow> for WorkoutRecord {
  type Error = CoachError;

  fn try_from(row: WorkoutRow) -> Result<Self, Self::Error> {
    let invalid = |reason: String| CoachError::InvalidRecord {
      id: row.id.clone(),
      reason,
    };

    let workout_type: WorkoutType = row.workout_type.parse().map_err(invalid)?;
    let effort_zone_distribution = row
      .zone_distribution_json
      .as_deref()
      .map(serde_json::from_str::<ZoneDistribution>)
      .transpose()
      .map_err(|e| invalid(format!("bad zone distribution: {}", e)))?;
    let splits = row
      .splits_json
      .as_deref()
      .map(serde_json::from_str::<Vec<Split>>)
      .transpose()
      .map_err(|e| invalid(format!("bad splits: {}", e)))?;

    Ok(WorkoutRecord {
      id: row.id,
      user_id: row.user_id,
      workout_type,
      date: row.date,
      distance_km: row.distance_km,
      duration_minutes: row.duration_minutes,
      avg_heart_rate: row.avg_heart_rate,
      max_heart_rate: row.max_heart_rate,
      avg_pace_min_per_km: row.avg_pace_min_per_km,
      avg_speed_kmh: row.avg_speed_kmh,
      elevation_gain_m: row.elevation_gain_m,
      calories: row.calories,
      effort_zone_distribution,
      splits,
      notes: row.notes,
    })
  }
}

const SELECT_WORKOUTS: &str = r#"
  SELECT id, user_id, workout_type, date, distance_km, duration_minutes,
         avg_heart_rate, max_heart_rate, avg_pace_min_per_km, avg_speed_kmh,
         elevation_gain_m, calories, zone_distribution_json, splits_json, notes
  FROM workouts
"#;

/// ---------------------------------------------------------------------------
/// Store
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WorkoutStore {
  pool: DbPool,
}

impl WorkoutStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Add a new record; returns the user's new revision
  pub async fn insert(&self, record: &WorkoutRecord) -> CoachResult<i64> {
    let zones_json = record.effort_zone_distribution.as_ref().map(serde_json::to_string).transpose()?;
    let splits_json = record.splits.as_ref().map(serde_json::to_string).transpose()?;

    let mut tx = self.pool.begin().await?;
    sqlx::query(
      r#"
      INSERT INTO workouts (
        id, user_id, workout_type, date, distance_km, duration_minutes,
        avg_heart_rate, max_heart_rate, avg_pace_min_per_km, avg_speed_kmh,
        elevation_gain_m, calories, zone_distribution_json, splits_json, notes
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
      "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(record.workout_type.as_str())
    .bind(record.date)
    .bind(record.distance_km)
    .bind(record.duration_minutes)
    .bind(record.avg_heart_rate)
    .bind(record.max_heart_rate)
    .bind(record.avg_pace_min_per_km)
    .bind(record.avg_speed_kmh)
    .bind(record.elevation_gain_m)
    .bind(record.calories)
    .bind(zones_json)
    .bind(splits_json)
    .bind(&record.notes)
    .execute(&mut *tx)
    .await?;

    let revision = bump_revision(&mut tx, &record.user_id).await?;
    tx.commit().await?;

    tracing::info!(user_id = %record.user_id, workout_id = %record.id, revision, "workout inserted");
    Ok(revision)
  }

  /// Replace an existing record. Any cached derivation for the user goes stale.
  pub async fn update(&self, record: &WorkoutRecord) -> CoachResult<i64> {
    let zones_json = record.effort_zone_distribution.as_ref().map(serde_json::to_string).transpose()?;
    let splits_json = record.splits.as_ref().map(serde_json::to_string).transpose()?;

    let mut tx = self.pool.begin().await?;
    let result = sqlx::query(
      r#"
      UPDATE workouts SET
        workout_type = ?3,
        date = ?4,
        distance_km = ?5,
        duration_minutes = ?6,
        avg_heart_rate = ?7,
        max_heart_rate = ?8,
        avg_pace_min_per_km = ?9,
        avg_speed_kmh = ?10,
        elevation_gain_m = ?11,
        calories = ?12,
        zone_distribution_json = ?13,
        splits_json = ?14,
        notes = ?15,
        updated_at = CURRENT_TIMESTAMP
      WHERE id = ?1 AND user_id = ?2
      "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(record.workout_type.as_str())
    .bind(record.date)
    .bind(record.distance_km)
    .bind(record.duration_minutes)
    .bind(record.avg_heart_rate)
    .bind(record.max_heart_rate)
    .bind(record.avg_pace_min_per_km)
    .bind(record.avg_speed_kmh)
    .bind(record.elevation_gain_m)
    .bind(record.calories)
    .bind(zones_json)
    .bind(splits_json)
    .bind(&record.notes)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
      return Err(CoachError::NotFound(format!("workout {} for user {}", record.id, record.user_id)));
    }

    let revision = bump_revision(&mut tx, &record.user_id).await?;
    tx.commit().await?;

    tracing::info!(user_id = %record.user_id, workout_id = %record.id, revision, "workout updated");
    Ok(revision)
  }

  pub async fn delete(&self, user_id: &str, workout_id: &str) -> CoachResult<i64> {
    let mut tx = self.pool.begin().await?;
    let result = sqlx::query("DELETE FROM workouts WHERE id = ?1 AND user_id = ?2")
      .bind(workout_id)
      .bind(user_id)
      .execute(&mut *tx)
      .await?;

    if result.rows_affected() == 0 {
      return Err(CoachError::NotFound(format!("workout {} for user {}", workout_id, user_id)));
    }

    let revision = bump_revision(&mut tx, user_id).await?;
    tx.commit().await?;

    tracing::info!(user_id, workout_id, revision, "workout deleted");
    Ok(revision)
  }

  pub async fn get(&self, workout_id: &str) -> CoachResult<WorkoutRecord> {
    let row: Option<WorkoutRow> = sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_WORKOUTS))
      .bind(workout_id)
      .fetch_optional(&self.pool)
      .await?;

    match row {
      Some(row) => row.try_into(),
      None => Err(CoachError::NotFound(format!("workout {}", workout_id))),
    }
  }

  /// All of a user's records, oldest first. Rows that cannot be decoded are skipped.
  pub async fn list_for_user(&self, user_id: &str) -> CoachResult<Vec<WorkoutRecord>> {
    Ok(self.snapshot(user_id).await?.records)
  }

  pub async fn revision(&self, user_id: &str) -> CoachResult<i64> {
    let revision: Option<i64> = sqlx::query_scalar("SELECT revision FROM user_revisions WHERE user_id = ?1")
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(revision.unwrap_or(0))
  }

  /// Consistent read of a user's records and revision
  pub async fn snapshot(&self, user_id: &str) -> CoachResult<WorkoutSnapshot> {
    let mut tx = self.pool.begin().await?;

    let revision: Option<i64> = sqlx::query_scalar("SELECT revision FROM user_revisions WHERE user_id = ?1")
      .bind(user_id)
      .fetch_optional(&mut *tx)
      .await?;

    let rows: Vec<WorkoutRow> = sqlx::query_as(&format!(
      "{} WHERE user_id = ?1 ORDER BY date ASC, id ASC",
      SELECT_WORKOUTS
    ))
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let records = rows
      .into_iter()
      .filter_map(|row| match WorkoutRecord::try_from(row) {
        Ok(record) => Some(record),
        Err(e) => {
          tracing::warn!(user_id, error = %e, "skipping undecodable workout row");
          None
        }
      })
      .collect();

    Ok(WorkoutSnapshot::new(user_id, revision.unwrap_or(0), records))
  }
}

async fn bump_revision(tx: &mut Transaction<'_, Sqlite>, user_id: &str) -> CoachResult<i64> {
  let revision: i64 = sqlx::query_scalar(
    r#"
    INSERT INTO user_revisions (user_id, revision) VALUES (?1, 1)
    ON CONFLICT(user_id) DO UPDATE SET revision = revision + 1
    RETURNING revision
    "#,
  )
  .bind(user_id)
  .fetch_one(&mut **tx)
  .await?;

  Ok(revision)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;

  #[test]
  fn test_snapshot_filters_other_users_and_orders_records() {
    let d = date(2024, 6, 1);
    let mut other = mock_run("b", d, 5.0, 30.0);
    other.user_id = "someone-else".to_string();

    let snapshot = WorkoutSnapshot::new(
      TEST_USER,
      3,
      vec![
        mock_run("z", d, 10.0, 50.0),
        other,
        mock_run("a", d, 8.0, 40.0),
        mock_run("m", d.pred_opt().unwrap(), 6.0, 30.0),
      ],
    );

    let ids: Vec<_> = snapshot.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["m", "a", "z"]);
    assert_eq!(snapshot.revision, 3);
  }

  #[test]
  fn test_valid_between_skips_invalid_records() {
    let d = date(2024, 6, 1);
    let mut broken = mock_run("broken", d, 10.0, 50.0);
    broken.distance_km = -3.0;

    let snapshot = WorkoutSnapshot::new(TEST_USER, 0, vec![broken, mock_run("ok", d, 10.0, 50.0)]);
    let valid = snapshot.valid_between(d, d);

    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].id, "ok");
  }

  #[tokio::test]
  async fn test_insert_and_snapshot_roundtrip() {
    let pool = setup_test_db().await;
    let store = WorkoutStore::new(pool.clone());

    let mut run = mock_run("w1", date(2024, 6, 1), 10.0, 50.0);
    run.effort_zone_distribution = Some(ZoneDistribution::from_array([10.0, 50.0, 30.0, 5.0, 5.0]));
    run.splits = Some(mock_splits(&[5.0, 5.0, 5.1, 5.2], &[140, 145, 150, 155]));

    let revision = store.insert(&run).await.expect("insert");
    assert_eq!(revision, 1);

    let snapshot = store.snapshot(TEST_USER).await.expect("snapshot");
    assert_eq!(snapshot.revision, 1);
    assert_eq!(snapshot.records(), &[run.clone()]);

    let fetched = store.get("w1").await.expect("get");
    assert_eq!(fetched, run);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_every_mutation_bumps_revision() {
    let pool = setup_test_db().await;
    let store = WorkoutStore::new(pool.clone());

    let mut run = mock_run("w1", date(2024, 6, 1), 10.0, 50.0);
    assert_eq!(store.insert(&run).await.unwrap(), 1);

    run.distance_km = 12.0;
    assert_eq!(store.update(&run).await.unwrap(), 2);
    assert_eq!(store.get("w1").await.unwrap().distance_km, 12.0);

    assert_eq!(store.delete(TEST_USER, "w1").await.unwrap(), 3);
    assert_eq!(store.revision(TEST_USER).await.unwrap(), 3);
    assert!(store.list_for_user(TEST_USER).await.unwrap().is_empty());

    // Revisions are per user
    assert_eq!(store.revision("someone-else").await.unwrap(), 0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_and_delete_unknown_workout() {
    let pool = setup_test_db().await;
    let store = WorkoutStore::new(pool.clone());

    let run = mock_run("missing", date(2024, 6, 1), 10.0, 50.0);
    assert!(matches!(store.update(&run).await, Err(CoachError::NotFound(_))));
    assert!(matches!(store.delete(TEST_USER, "missing").await, Err(CoachError::NotFound(_))));
    assert!(matches!(store.get("missing").await, Err(CoachError::NotFound(_))));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_duplicate_id_is_rejected() {
    let pool = setup_test_db().await;
    let store = WorkoutStore::new(pool.clone());

    let run = mock_run("w1", date(2024, 6, 1), 10.0, 50.0);
    store.insert(&run).await.unwrap();
    assert!(matches!(store.insert(&run).await, Err(CoachError::Database(_))));
    // Failed insert leaves the revision untouched
    assert_eq!(store.revision(TEST_USER).await.unwrap(), 1);

    teardown_test_db(pool).await;
  }
}
