//! Analysis engine
//!
//! Bundles the validated analysis parameters with the phrase registry so
//! callers make pure calls over a snapshot without threading both around.

use chrono::NaiveDate;

use crate::baseline::compute_baseline;
use crate::comparator::compare;
use crate::config::AnalysisConfig;
use crate::error::CoachResult;
use crate::insight::{compose_insight, InsightRequest};
use crate::models::{Baseline, ComparisonResult, InsightPayload, RecoveryScore, WorkoutRecord, WorkoutType};
use crate::phrases::{Language, PhraseRegistry};
use crate::recovery::compute_recovery_score;
use crate::store::WorkoutSnapshot;

#[derive(Debug, Clone)]
pub struct CoachEngine {
  config: AnalysisConfig,
  phrases: PhraseRegistry,
}

impl CoachEngine {
  /// Engine with the built-in phrase set
  pub fn new(config: AnalysisConfig) -> CoachResult<Self> {
    Self::with_phrases(config, PhraseRegistry::builtin())
  }

  /// Fails when the parameters are out of range or a phrase key has no
  /// English template, so a bad setup never reaches a request
  pub fn with_phrases(config: AnalysisConfig, phrases: PhraseRegistry) -> CoachResult<Self> {
    config.validate()?;
    phrases.verify_complete()?;

    tracing::info!(
      baseline_window_days = config.baseline_window_days,
      recovery_lookback_days = config.recovery_lookback_days,
      hidden_insight_probability = config.hidden_insight_probability,
      "coach engine ready"
    );

    Ok(Self { config, phrases })
  }

  pub fn config(&self) -> &AnalysisConfig {
    &self.config
  }

  pub fn phrases(&self) -> &PhraseRegistry {
    &self.phrases
  }

  pub fn baseline(
    &self,
    snapshot: &WorkoutSnapshot,
    workout_type: WorkoutType,
    as_of: NaiveDate,
  ) -> CoachResult<Baseline> {
    compute_baseline(snapshot, workout_type, as_of, self.config.baseline_window_days)
  }

  /// Compare a workout against the baseline as of its own date
  pub fn compare(&self, snapshot: &WorkoutSnapshot, workout: &WorkoutRecord) -> Vec<ComparisonResult> {
    let baseline = self.baseline(snapshot, workout.workout_type, workout.date).ok();
    compare(workout, baseline.as_ref(), self.config.unusual_threshold_pct)
  }

  pub fn recovery(&self, snapshot: &WorkoutSnapshot, as_of: NaiveDate, language: Language) -> RecoveryScore {
    compute_recovery_score(snapshot, as_of, &self.config, &self.phrases, language)
  }

  pub fn compose(&self, snapshot: &WorkoutSnapshot, request: &InsightRequest) -> CoachResult<InsightPayload> {
    compose_insight(snapshot, request, &self.config, &self.phrases)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::CoachError;
  use crate::insight::InsightContext;
  use crate::models::Metric;
  use crate::phrases::{PhraseKey, Tone};
  use crate::test_utils::*;
  use chrono::Duration;

  #[test]
  fn test_rejects_invalid_config() {
    let config = AnalysisConfig {
      hidden_insight_probability: 1.5,
      ..AnalysisConfig::default()
    };
    assert!(matches!(CoachEngine::new(config), Err(CoachError::Configuration(_))));
  }

  #[test]
  fn test_rejects_incomplete_phrases() {
    let mut phrases = PhraseRegistry::new();
    phrases.register(PhraseKey::DigestEmpty, Language::En, &[Tone::Calm], "Quiet week.");

    let result = CoachEngine::with_phrases(AnalysisConfig::default(), phrases);
    assert!(matches!(result, Err(CoachError::Configuration(_))));
  }

  #[test]
  fn test_compare_uses_configured_window() {
    let today = date(2024, 6, 30);
    let snapshot = mock_snapshot(vec![
      mock_run("a", today - Duration::days(20), 10.0, 50.0),
      mock_run("b", today - Duration::days(18), 10.0, 50.0),
      mock_run("today", today, 10.0, 50.0),
    ]);
    let workout = snapshot.get("today").unwrap().clone();

    // Default 14-day window sees neither earlier run
    let narrow = CoachEngine::new(AnalysisConfig::default()).unwrap();
    assert!(narrow.compare(&snapshot, &workout).is_empty());

    let wide = CoachEngine::new(AnalysisConfig {
      baseline_window_days: 28,
      ..AnalysisConfig::default()
    })
    .unwrap();
    let results = wide.compare(&snapshot, &workout);
    assert_eq!(
      results.iter().find(|r| r.metric == Metric::Distance).map(|r| r.delta_percent),
      Some(0.0)
    );
  }

  #[test]
  fn test_compose_is_deterministic() {
    let today = date(2024, 6, 30);
    let snapshot = mock_snapshot(
      (0..10)
        .map(|d| mock_run(&format!("r{}", d), today - Duration::days(d * 2), 8.0 + d as f64, 45.0 + d as f64 * 5.0))
        .collect(),
    );
    let engine = CoachEngine::new(AnalysisConfig::default()).unwrap();

    for context in [
      InsightContext::Dashboard,
      InsightContext::WorkoutDetail {
        workout_id: "r0".to_string(),
      },
      InsightContext::WeeklyDigest,
    ] {
      let request = InsightRequest {
        context,
        as_of: today,
        language: Language::En,
      };
      let first = engine.compose(&snapshot, &request).unwrap().to_json().unwrap();
      let second = engine.compose(&snapshot, &request).unwrap().to_json().unwrap();
      assert_eq!(first, second);
    }
  }
}
