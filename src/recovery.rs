//! Recovery Scorer
//!
//! Readiness from recent load: start at 100, subtract a load penalty when the
//! lookback volume runs above the user's own chronic normal, subtract a
//! fatigue penalty that fades over the days after the last hard session, and
//! clamp. The score never rises with more high-intensity volume and never
//! falls as the last hard session recedes.

use chrono::{Duration, NaiveDate};

use crate::baseline::compute_baseline;
use crate::comparator::{compare, intensity_label};
use crate::config::AnalysisConfig;
use crate::models::{LoadDirection, LoadSignals, RecoveryScore, RecoveryStatus, UsualLabel, WorkoutRecord};
use crate::phrases::{Language, PhraseKey, PhraseRegistry};
use crate::store::WorkoutSnapshot;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

pub const READY_THRESHOLD: u8 = 70;
pub const MODERATE_THRESHOLD: u8 = 40;
/// Reported when the lookback holds too few sessions to say anything
pub const NEUTRAL_SCORE: u8 = 75;
pub const MIN_RECOVERY_SESSIONS: usize = 2;
/// z4 + z5 share that makes a session hard regardless of baseline
pub const HARD_ZONE_SHARE_PCT: f64 = 40.0;

const LOAD_PENALTY_PER_RATIO: f64 = 60.0;
const LOAD_PENALTY_MAX: f64 = 50.0;
const FATIGUE_PENALTY_MAX: f64 = 40.0;
const FATIGUE_DECAY_DAYS: f64 = 4.0;
const EXTRA_HARD_SESSION_PENALTY: f64 = 5.0;
const EXTRA_HARD_SESSION_PENALTY_MAX: f64 = 15.0;

/// ---------------------------------------------------------------------------
/// Hard Sessions
/// ---------------------------------------------------------------------------

/// A session is hard when its intensity is above usual against its own
/// baseline, or when z4 + z5 make up at least 40% of it
pub fn is_hard_session(snapshot: &WorkoutSnapshot, workout: &WorkoutRecord, config: &AnalysisConfig) -> bool {
  let zone_hard = workout
    .effort_zone_distribution
    .map_or(false, |z| z.high_intensity_pct() >= HARD_ZONE_SHARE_PCT);
  if zone_hard {
    return true;
  }

  let baseline = compute_baseline(snapshot, workout.workout_type, workout.date, config.baseline_window_days).ok();
  let results = compare(workout, baseline.as_ref(), config.unusual_threshold_pct);
  intensity_label(&results) == Some(UsualLabel::AboveUsual)
}

/// ---------------------------------------------------------------------------
/// Scoring
/// ---------------------------------------------------------------------------

/// Aggregate the lookback `(as_of - lookback, as_of]` and the chronic window.
///
/// Chronic volume is the chronic total spread over the days of history it
/// actually covers (never fewer than the lookback), then scaled to the
/// lookback length. A user with a week of history is compared against that
/// week, not against a month that is mostly empty.
pub fn collect_signals(snapshot: &WorkoutSnapshot, as_of: NaiveDate, config: &AnalysisConfig) -> LoadSignals {
  let lookback_start = as_of - Duration::days(config.recovery_lookback_days - 1);
  let chronic_start = as_of - Duration::days(config.chronic_window_days - 1);

  let tracked = |w: &&WorkoutRecord| config.tracks(w.workout_type);
  let recent: Vec<&WorkoutRecord> = snapshot.valid_between(lookback_start, as_of).into_iter().filter(tracked).collect();
  let chronic_total: f64 = snapshot
    .valid_between(chronic_start, as_of)
    .into_iter()
    .filter(tracked)
    .map(|w| w.distance_km)
    .sum();

  let first_tracked = snapshot
    .valid_between(NaiveDate::MIN, as_of)
    .into_iter()
    .filter(tracked)
    .map(|w| w.date)
    .min();
  let covered_days = first_tracked.map_or(config.chronic_window_days, |first| {
    ((as_of - first).num_days() + 1).clamp(config.recovery_lookback_days, config.chronic_window_days)
  });

  let hard: Vec<&&WorkoutRecord> = recent.iter().filter(|w| is_hard_session(snapshot, w, config)).collect();
  let days_since_hard = hard.iter().map(|w| (as_of - w.date).num_days()).min();

  LoadSignals {
    sessions: recent.len(),
    volume_km: recent.iter().map(|w| w.distance_km).sum(),
    chronic_volume_km: chronic_total * config.recovery_lookback_days as f64 / covered_days as f64,
    hard_sessions: hard.len(),
    days_since_hard,
  }
}

/// Pure scoring function over aggregated signals
pub fn score_from_signals(signals: &LoadSignals) -> u8 {
  let ratio = signals.volume_ratio();
  let load_penalty = if ratio > 1.0 {
    ((ratio - 1.0) * LOAD_PENALTY_PER_RATIO).min(LOAD_PENALTY_MAX)
  } else {
    0.0
  };

  let fatigue_penalty = match signals.days_since_hard {
    Some(days) => FATIGUE_PENALTY_MAX * (1.0 - days.max(0) as f64 / FATIGUE_DECAY_DAYS).max(0.0),
    None => 0.0,
  };

  let extra_hard_penalty =
    (signals.hard_sessions.saturating_sub(1) as f64 * EXTRA_HARD_SESSION_PENALTY).min(EXTRA_HARD_SESSION_PENALTY_MAX);

  (100.0 - load_penalty - fatigue_penalty - extra_hard_penalty)
    .clamp(0.0, 100.0)
    .round() as u8
}

pub fn compute_recovery_score(
  snapshot: &WorkoutSnapshot,
  as_of: NaiveDate,
  config: &AnalysisConfig,
  phrases: &PhraseRegistry,
  language: Language,
) -> RecoveryScore {
  let signals = collect_signals(snapshot, as_of, config);
  let load_direction =
    LoadDirection::from_ratio(signals.volume_km, signals.chronic_volume_km, config.direction_threshold_pct);

  if signals.sessions < MIN_RECOVERY_SESSIONS {
    tracing::debug!(user_id = %snapshot.user_id, %as_of, sessions = signals.sessions, "recovery score on neutral default");
    return RecoveryScore {
      user_id: snapshot.user_id.clone(),
      as_of,
      score: NEUTRAL_SCORE,
      status: RecoveryStatus::Ready,
      load_direction,
      phrase: phrases.render(PhraseKey::RecoveryInsufficient, language, &[]),
      insufficient_data: true,
      signals,
    };
  }

  let score = score_from_signals(&signals);
  let status = RecoveryStatus::from_score(score, READY_THRESHOLD, MODERATE_THRESHOLD);

  RecoveryScore {
    user_id: snapshot.user_id.clone(),
    as_of,
    score,
    status,
    load_direction,
    phrase: phrases.render(PhraseKey::Recovery(status, load_direction), language, &[]),
    insufficient_data: false,
    signals,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{WorkoutType, ZoneDistribution};
  use crate::test_utils::*;

  fn signals(volume_km: f64, chronic_volume_km: f64, hard_sessions: usize, days_since_hard: Option<i64>) -> LoadSignals {
    LoadSignals {
      sessions: 5,
      volume_km,
      chronic_volume_km,
      hard_sessions,
      days_since_hard,
    }
  }

  #[test]
  fn test_fresh_and_balanced_scores_full() {
    assert_eq!(score_from_signals(&signals(40.0, 40.0, 0, None)), 100);
    assert_eq!(score_from_signals(&signals(30.0, 40.0, 0, None)), 100);
  }

  #[test]
  fn test_score_non_increasing_in_volume() {
    let mut previous = u8::MAX;
    for step in 0..60 {
      let volume = 20.0 + step as f64 * 2.5;
      let score = score_from_signals(&signals(volume, 40.0, 1, Some(2)));
      assert!(score <= previous, "score rose at volume {}", volume);
      previous = score;
    }
  }

  #[test]
  fn test_score_non_decreasing_in_days_since_hard() {
    for volume in [30.0, 40.0, 60.0, 90.0] {
      let mut previous = 0;
      for days in 0..=4 {
        let score = score_from_signals(&signals(volume, 40.0, 1, Some(days)));
        assert!(score >= previous, "score fell at day {} (volume {})", days, volume);
        previous = score;
      }
      // Fatigue penalty is gone by day 4
      assert_eq!(
        score_from_signals(&signals(volume, 40.0, 1, Some(4))),
        score_from_signals(&signals(volume, 40.0, 0, None))
      );
    }
  }

  #[test]
  fn test_score_non_increasing_in_hard_sessions() {
    let mut previous = u8::MAX;
    for hard in 1..6 {
      let score = score_from_signals(&signals(40.0, 40.0, hard, Some(1)));
      assert!(score <= previous);
      previous = score;
    }
  }

  #[test]
  fn test_score_is_clamped() {
    let score = score_from_signals(&signals(500.0, 10.0, 10, Some(0)));
    assert_eq!(score, 0);
  }

  #[test]
  fn test_high_volume_and_same_day_hard_session_is_low() {
    // Arrange: 7-day volume is 150% of the 30-day average, hard session today.
    // History reaches back 29 days so the full chronic window is covered.
    let today = date(2024, 6, 30);
    let mut hard_today = mock_run("today", today, 7.0, 35.0);
    hard_today.effort_zone_distribution = Some(ZoneDistribution::from_array([5.0, 15.0, 30.0, 30.0, 20.0]));
    let snapshot = mock_snapshot(vec![
      hard_today,
      mock_run("d2", today - Duration::days(2), 7.0, 35.0),
      mock_run("d4", today - Duration::days(4), 7.0, 35.0),
      mock_run("d10", today - Duration::days(10), 13.0, 65.0),
      mock_run("d15", today - Duration::days(15), 13.0, 65.0),
      mock_run("d29", today - Duration::days(29), 13.0, 65.0),
    ]);
    let config = AnalysisConfig::default();

    // Act
    let recovery = compute_recovery_score(&snapshot, today, &config, &PhraseRegistry::builtin(), Language::En);

    // Assert
    assert_eq!(recovery.signals.volume_ratio(), 1.5);
    assert_eq!(recovery.signals.days_since_hard, Some(0));
    assert_eq!(recovery.status, RecoveryStatus::Low);
    assert_eq!(recovery.load_direction, LoadDirection::Up);
    assert!(!recovery.insufficient_data);
    assert!(!recovery.phrase.is_empty());
  }

  #[test]
  fn test_fewer_than_two_sessions_is_neutral() {
    let today = date(2024, 6, 30);
    let snapshot = mock_snapshot(vec![
      mock_run("today", today, 10.0, 50.0),
      mock_run("old", today - Duration::days(12), 10.0, 50.0),
    ]);

    let recovery = compute_recovery_score(
      &snapshot,
      today,
      &AnalysisConfig::default(),
      &PhraseRegistry::builtin(),
      Language::En,
    );

    assert_eq!(recovery.score, NEUTRAL_SCORE);
    assert_eq!(recovery.status, RecoveryStatus::Ready);
    assert!(recovery.insufficient_data);
    assert_eq!(
      recovery.phrase,
      PhraseRegistry::builtin().render(PhraseKey::RecoveryInsufficient, Language::En, &[])
    );
  }

  #[test]
  fn test_above_usual_pace_counts_as_hard() {
    let today = date(2024, 6, 30);
    let mut fast = mock_run("fast", today, 10.0, 42.0);
    fast.avg_pace_min_per_km = Some(4.2);
    let snapshot = mock_snapshot(vec![
      fast.clone(),
      mock_run("a", today - Duration::days(3), 10.0, 50.0),
      mock_run("b", today - Duration::days(5), 10.0, 50.0),
    ]);
    let config = AnalysisConfig::default();

    assert!(is_hard_session(&snapshot, &fast, &config));
    assert!(!is_hard_session(&snapshot, snapshot.get("a").unwrap(), &config));
  }

  #[test]
  fn test_new_user_first_week_is_balanced() {
    // Arrange: two easy runs and no earlier history
    let today = date(2024, 6, 30);
    let snapshot = mock_snapshot(vec![
      mock_run("first", today - Duration::days(2), 5.0, 30.0),
      mock_run("second", today, 5.0, 30.0),
    ]);

    // Act
    let recovery = compute_recovery_score(
      &snapshot,
      today,
      &AnalysisConfig::default(),
      &PhraseRegistry::builtin(),
      Language::En,
    );

    // Assert
    assert_eq!(recovery.signals.chronic_volume_km, 10.0);
    assert_eq!(recovery.signals.volume_ratio(), 1.0);
    assert_eq!(recovery.load_direction, LoadDirection::Stable);
    assert_eq!(recovery.score, 100);
    assert_eq!(recovery.status, RecoveryStatus::Ready);
  }

  #[test]
  fn test_steady_training_is_balanced_at_any_history_length() {
    let today = date(2024, 6, 30);
    let config = AnalysisConfig::default();

    for history_days in [8, 20, 30, 45] {
      let runs = (0..history_days)
        .map(|d| mock_run(&format!("r{}", d), today - Duration::days(d), 10.0, 50.0))
        .collect();
      let signals = collect_signals(&mock_snapshot(runs), today, &config);

      assert_eq!(signals.volume_km, 70.0);
      assert!(
        (signals.volume_ratio() - 1.0).abs() < 1e-9,
        "ratio {} with {} days of history",
        signals.volume_ratio(),
        history_days
      );
    }
  }

  #[test]
  fn test_untracked_history_does_not_stretch_coverage() {
    // Arrange: an old ride is outside the tracked types
    let today = date(2024, 6, 30);
    let snapshot = mock_snapshot(vec![
      mock_ride("ride", today - Duration::days(25), 40.0, 90.0),
      mock_run("a", today - Duration::days(3), 8.0, 40.0),
      mock_run("b", today, 8.0, 40.0),
    ]);
    let config = AnalysisConfig {
      workout_types: vec![WorkoutType::Run],
      ..AnalysisConfig::default()
    };

    // Act
    let signals = collect_signals(&snapshot, today, &config);

    // Assert
    assert_eq!(signals.chronic_volume_km, 16.0);
    assert_eq!(signals.volume_ratio(), 1.0);
  }
}
