//! Coach service
//!
//! Async entry point over the store: mutations go through here so the
//! insight cache is dropped for the affected user, and reads compose from a
//! fresh snapshot whenever the cached entry's revision is behind.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::cache::InsightCache;
use crate::engine::CoachEngine;
use crate::error::CoachResult;
use crate::insight::InsightRequest;
use crate::models::{Baseline, InsightPayload, RecoveryScore, WorkoutRecord, WorkoutType};
use crate::phrases::Language;
use crate::store::WorkoutStore;

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
  pub imported: usize,
  /// Rejected by validation
  pub invalid: usize,
  /// Valid but the store refused them (duplicate id, database error)
  pub failed: usize,
}

pub struct CoachService {
  store: WorkoutStore,
  engine: Arc<CoachEngine>,
  cache: InsightCache,
}

impl CoachService {
  pub fn new(store: WorkoutStore, engine: Arc<CoachEngine>, cache_max_entries: usize) -> Self {
    let cache = InsightCache::new(engine.config().baseline_window_days, cache_max_entries);
    Self { store, engine, cache }
  }

  pub fn store(&self) -> &WorkoutStore {
    &self.store
  }

  pub fn engine(&self) -> &CoachEngine {
    &self.engine
  }

  // ---------------------------------------------------------------------------
  // Mutations
  // ---------------------------------------------------------------------------

  /// Reject invalid records up front; stored ones are always analyzable
  pub async fn record_workout(&self, record: &WorkoutRecord) -> CoachResult<i64> {
    record.validate()?;
    let revision = self.store.insert(record).await?;
    self.cache.invalidate_user(&record.user_id, revision).await;
    Ok(revision)
  }

  pub async fn edit_workout(&self, record: &WorkoutRecord) -> CoachResult<i64> {
    record.validate()?;
    let revision = self.store.update(record).await?;
    self.cache.invalidate_user(&record.user_id, revision).await;
    Ok(revision)
  }

  pub async fn remove_workout(&self, user_id: &str, workout_id: &str) -> CoachResult<i64> {
    let revision = self.store.delete(user_id, workout_id).await?;
    self.cache.invalidate_user(user_id, revision).await;
    Ok(revision)
  }

  /// Manual bulk entry. A bad record never aborts the batch: invalid ones
  /// are skipped, store failures are logged and counted.
  pub async fn import(&self, records: &[WorkoutRecord]) -> ImportReport {
    let mut report = ImportReport::default();
    for record in records {
      if let Err(e) = record.validate() {
        tracing::warn!(workout_id = %record.id, error = %e, "skipping invalid record on import");
        report.invalid += 1;
        continue;
      }
      match self.record_workout(record).await {
        Ok(_) => report.imported += 1,
        Err(e) => {
          tracing::warn!(workout_id = %record.id, error = %e, "failed to store record on import");
          report.failed += 1;
        }
      }
    }

    tracing::info!(
      imported = report.imported,
      invalid = report.invalid,
      failed = report.failed,
      "import finished"
    );
    report
  }

  // ---------------------------------------------------------------------------
  // Reads
  // ---------------------------------------------------------------------------

  pub async fn insight(&self, user_id: &str, request: &InsightRequest) -> CoachResult<InsightPayload> {
    let revision = self.store.revision(user_id).await?;
    if let Some(payload) = self.cache.get(user_id, request, revision).await {
      return Ok(payload);
    }

    let snapshot = self.store.snapshot(user_id).await?;
    let payload = self.engine.compose(&snapshot, request)?;
    self
      .cache
      .put(user_id, request, snapshot.revision, payload.clone())
      .await;
    Ok(payload)
  }

  pub async fn recovery(&self, user_id: &str, as_of: NaiveDate, language: Language) -> CoachResult<RecoveryScore> {
    let snapshot = self.store.snapshot(user_id).await?;
    Ok(self.engine.recovery(&snapshot, as_of, language))
  }

  pub async fn baseline(&self, user_id: &str, workout_type: WorkoutType, as_of: NaiveDate) -> CoachResult<Baseline> {
    let snapshot = self.store.snapshot(user_id).await?;
    self.engine.baseline(&snapshot, workout_type, as_of)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AnalysisConfig;
  use crate::error::CoachError;
  use crate::insight::InsightContext;
  use crate::test_utils::*;
  use chrono::Duration;

  async fn service() -> CoachService {
    let pool = setup_test_db().await;
    let engine = CoachEngine::new(AnalysisConfig::default()).expect("default engine");
    CoachService::new(WorkoutStore::new(pool), Arc::new(engine), 100)
  }

  fn dashboard(as_of: NaiveDate) -> InsightRequest {
    InsightRequest {
      context: InsightContext::Dashboard,
      as_of,
      language: Language::En,
    }
  }

  #[tokio::test]
  async fn test_mutation_invalidates_cached_insight() {
    // Arrange
    let service = service().await;
    let today = date(2024, 6, 30);
    service.record_workout(&mock_run("a", today - Duration::days(2), 10.0, 50.0)).await.unwrap();

    let before = service.insight(TEST_USER, &dashboard(today)).await.unwrap();
    let InsightPayload::Dashboard(before) = before else {
      panic!("expected dashboard");
    };
    assert_eq!(before.week.sessions, 1);

    // Act
    service.record_workout(&mock_run("b", today, 12.0, 60.0)).await.unwrap();
    let after = service.insight(TEST_USER, &dashboard(today)).await.unwrap();

    // Assert
    let InsightPayload::Dashboard(after) = after else {
      panic!("expected dashboard");
    };
    assert_eq!(after.week.sessions, 2);
    assert!(!after.recovery_score.as_ref().unwrap().insufficient_data);
  }

  #[tokio::test]
  async fn test_repeated_reads_are_identical() {
    let service = service().await;
    let today = date(2024, 6, 30);
    for d in 0..6 {
      service
        .record_workout(&mock_run(&format!("r{}", d), today - Duration::days(d * 2), 10.0, 50.0))
        .await
        .unwrap();
    }

    let first = service.insight(TEST_USER, &dashboard(today)).await.unwrap();
    let second = service.insight(TEST_USER, &dashboard(today)).await.unwrap();
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_delete_changes_workout_detail_to_not_found() {
    let service = service().await;
    let today = date(2024, 6, 30);
    service.record_workout(&mock_run("gone", today, 10.0, 50.0)).await.unwrap();

    let request = InsightRequest {
      context: InsightContext::WorkoutDetail {
        workout_id: "gone".to_string(),
      },
      as_of: today,
      language: Language::En,
    };
    assert!(service.insight(TEST_USER, &request).await.is_ok());

    service.remove_workout(TEST_USER, "gone").await.unwrap();
    assert!(matches!(
      service.insight(TEST_USER, &request).await,
      Err(CoachError::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_import_skips_invalid_records() {
    let service = service().await;
    let today = date(2024, 6, 30);
    let mut broken = mock_run("broken", today, 10.0, 50.0);
    broken.duration_minutes = 0.0;

    let report = service.import(&[mock_run("ok", today, 10.0, 50.0), broken]).await;

    assert_eq!(report.imported, 1);
    assert_eq!(report.invalid, 1);
    assert_eq!(service.store().list_for_user(TEST_USER).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_import_continues_past_store_failure() {
    // Arrange
    let service = service().await;
    let today = date(2024, 6, 30);
    let records = [
      mock_run("dup", today - Duration::days(2), 10.0, 50.0),
      mock_run("dup", today - Duration::days(1), 8.0, 40.0),
      mock_run("after", today, 12.0, 60.0),
    ];

    // Act
    let report = service.import(&records).await;

    // Assert
    assert_eq!(
      report,
      ImportReport {
        imported: 2,
        invalid: 0,
        failed: 1
      }
    );
    let stored = service.store().list_for_user(TEST_USER).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|w| w.id == "after"));
  }

  #[tokio::test]
  async fn test_baseline_reports_insufficient_data() {
    let service = service().await;
    let today = date(2024, 6, 30);
    service.record_workout(&mock_run("a", today - Duration::days(1), 10.0, 50.0)).await.unwrap();

    let result = service.baseline(TEST_USER, WorkoutType::Run, today).await;
    assert!(matches!(result, Err(CoachError::InsufficientData { required: 2, found: 1 })));
  }
}
