//! Insight Composer
//!
//! Maps baselines, comparisons and recovery onto the three payload shapes.
//! Missing upstream data never fails a request: each section is still
//! present and flagged as insufficient so the client can keep a stable
//! layout. The only error is asking for a workout that does not exist.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::baseline::compute_baseline;
use crate::comparator::{compare, intensity_label, load_delta_percent, load_direction};
use crate::config::AnalysisConfig;
use crate::error::{CoachError, CoachResult};
use crate::models::payload::{
  format_pace, format_speed, DashboardInsight, DigestMetrics, DigestSignal, IntensitySection, LoadSection, LoadSignal,
  MonthBlock, RecoveryBlock, SessionType, SessionTypeSection, SignalKey, WeekBlock, WeeklyDigest, WorkoutAnalysis,
  ZoneSummary,
};
use crate::models::{
  Baseline, InsightPayload, LoadDirection, LoadSignals, Split, UsualLabel, WorkoutRecord, ZoneDistribution,
};
use crate::phrases::{Language, PhraseKey, PhraseRegistry, Recommendation};
use crate::recovery::{collect_signals, compute_recovery_score, is_hard_session};
use crate::store::WorkoutSnapshot;

/// ---------------------------------------------------------------------------
/// Requests
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightContext {
  Dashboard,
  WorkoutDetail { workout_id: String },
  WeeklyDigest,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InsightRequest {
  pub context: InsightContext,
  /// Reference day; a digest covers the seven days ending here
  pub as_of: NaiveDate,
  pub language: Language,
}

/// ---------------------------------------------------------------------------
/// Thresholds
/// ---------------------------------------------------------------------------

/// Weekly volume above this multiple of the chronic normal reads as high
pub const LOAD_HIGH_RATIO: f64 = 1.2;
/// ...and below this multiple as low
pub const LOAD_LOW_RATIO: f64 = 0.7;
/// Sessions at least this long are sustained even at easy intensity
pub const SUSTAINED_MIN_DURATION_MIN: f64 = 60.0;
/// z3+ share that makes a session sustained, and a week intensity-heavy
pub const TEMPO_HEAVY_PCT: f64 = 40.0;
/// z1 + z2 share of a polarized week or an aerobic session
pub const AEROBIC_SHARE_PCT: f64 = 80.0;
pub const PACING_DRIFT_MIN_PCT: f64 = 3.0;
pub const EFFICIENCY_DELTA_MIN_PCT: f64 = 3.0;
pub const CARDIAC_DRIFT_MIN_PCT: f64 = 5.0;
const MIN_SPLITS: usize = 4;

fn load_signal(signals: &LoadSignals) -> LoadSignal {
  let ratio = signals.volume_ratio();
  if signals.volume_km <= 0.0 || ratio < LOAD_LOW_RATIO {
    LoadSignal::Low
  } else if ratio > LOAD_HIGH_RATIO {
    LoadSignal::High
  } else {
    LoadSignal::Balanced
  }
}

/// ---------------------------------------------------------------------------
/// Hidden Insight
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenPattern {
  PacingDrift,
  EfficiencySignal,
  LateSessionFatigue,
  AerobicSignature,
}

pub const HIDDEN_PATTERNS: [HiddenPattern; 4] = [
  HiddenPattern::PacingDrift,
  HiddenPattern::EfficiencySignal,
  HiddenPattern::LateSessionFatigue,
  HiddenPattern::AerobicSignature,
];

#[derive(Debug, Clone, PartialEq)]
pub struct HiddenInsight {
  pub pattern: HiddenPattern,
  pub phrase: PhraseKey,
  /// Magnitude shown in the phrase, in percent
  pub value_pct: f64,
}

/// Gate fraction in [0, 1) and a pattern selector, both from SHA-256 of the entity key
fn entity_draws(entity_key: &str) -> (f64, u64) {
  let digest = Sha256::digest(entity_key.as_bytes());
  let mut gate = [0u8; 8];
  let mut pick = [0u8; 8];
  gate.copy_from_slice(&digest[..8]);
  pick.copy_from_slice(&digest[8..16]);

  // fraction = (big-endian u64 of bytes 0..8 >> 11) / 2^53, so 1.0 is never reached
  let fraction = (u64::from_be_bytes(gate) >> 11) as f64 / (1u64 << 53) as f64;
  (fraction, u64::from_be_bytes(pick))
}

/// Stable presence decision for an entity; the same key always answers the same
pub fn hidden_insight_included(entity_key: &str, probability: f64) -> bool {
  entity_draws(entity_key).0 < probability
}

/// Gate, then pick one pattern whose preconditions the workout meets.
/// Nothing qualifies means nothing is returned.
pub fn select_hidden_insight(
  entity_key: &str,
  workout: &WorkoutRecord,
  baseline: Option<&Baseline>,
  probability: f64,
) -> Option<HiddenInsight> {
  let (fraction, pick) = entity_draws(entity_key);
  if fraction >= probability {
    return None;
  }

  let qualifying: Vec<HiddenInsight> = HIDDEN_PATTERNS
    .iter()
    .filter_map(|pattern| evaluate_pattern(*pattern, workout, baseline))
    .collect();
  if qualifying.is_empty() {
    return None;
  }

  let idx = (pick % qualifying.len() as u64) as usize;
  qualifying.into_iter().nth(idx)
}

fn evaluate_pattern(pattern: HiddenPattern, workout: &WorkoutRecord, baseline: Option<&Baseline>) -> Option<HiddenInsight> {
  let found = |phrase: PhraseKey, value_pct: f64| Some(HiddenInsight { pattern, phrase, value_pct });

  match pattern {
    HiddenPattern::PacingDrift => {
      let (first, second) = split_halves(workout, |s| s.pace_min_per_km)?;
      let drift = (second - first) / first * 100.0;
      if drift > PACING_DRIFT_MIN_PCT {
        found(PhraseKey::PacingDriftSlower, drift)
      } else if drift < -PACING_DRIFT_MIN_PCT {
        found(PhraseKey::PacingDriftFaster, -drift)
      } else {
        None
      }
    }
    HiddenPattern::EfficiencySignal => {
      let current = workout.efficiency()?;
      let usual = baseline?.mean_efficiency()?;
      let delta = (current - usual) / usual * 100.0;
      if delta > EFFICIENCY_DELTA_MIN_PCT {
        found(PhraseKey::EfficiencyImproved, delta)
      } else if delta < -EFFICIENCY_DELTA_MIN_PCT {
        found(PhraseKey::EfficiencyDeclined, -delta)
      } else {
        None
      }
    }
    HiddenPattern::LateSessionFatigue => {
      let (hr_first, hr_second) = split_halves(workout, |s| s.avg_heart_rate.map(|hr| hr as f64))?;
      let (pace_first, pace_second) = split_halves(workout, |s| s.pace_min_per_km)?;
      let hr_drift = (hr_second - hr_first) / hr_first * 100.0;
      let pace_change = ((pace_second - pace_first) / pace_first * 100.0).abs();
      if hr_drift >= CARDIAC_DRIFT_MIN_PCT && pace_change <= PACING_DRIFT_MIN_PCT {
        found(PhraseKey::LateSessionFatigue, hr_drift)
      } else {
        None
      }
    }
    HiddenPattern::AerobicSignature => {
      let aerobic = workout.effort_zone_distribution?.aerobic_pct();
      if aerobic >= AEROBIC_SHARE_PCT {
        found(PhraseKey::AerobicSignature, aerobic)
      } else {
        None
      }
    }
  }
}

/// Mean of a split value over the first and second half of the session
fn split_halves(workout: &WorkoutRecord, value: impl Fn(&Split) -> Option<f64>) -> Option<(f64, f64)> {
  let mut splits: Vec<&Split> = workout.splits.as_ref()?.iter().collect();
  splits.sort_by_key(|s| s.index);
  let values: Vec<f64> = splits.iter().filter_map(|s| value(*s)).filter(|v| *v > 0.0).collect();
  if values.len() < MIN_SPLITS || values.len() != splits.len() {
    return None;
  }

  let mid = values.len() / 2;
  let first = values[..mid].iter().sum::<f64>() / mid as f64;
  let second = values[values.len() - mid..].iter().sum::<f64>() / mid as f64;
  Some((first, second))
}

fn render_hidden(insight: &HiddenInsight, phrases: &PhraseRegistry, language: Language) -> String {
  phrases.render(insight.phrase, language, &[("pct", format!("{:.0}", insight.value_pct))])
}

/// ---------------------------------------------------------------------------
/// Composition
/// ---------------------------------------------------------------------------

pub fn compose_insight(
  snapshot: &WorkoutSnapshot,
  request: &InsightRequest,
  config: &AnalysisConfig,
  phrases: &PhraseRegistry,
) -> CoachResult<InsightPayload> {
  let payload = match &request.context {
    InsightContext::Dashboard => {
      InsightPayload::Dashboard(compose_dashboard(snapshot, request.as_of, config, phrases, request.language))
    }
    InsightContext::WorkoutDetail { workout_id } => InsightPayload::WorkoutAnalysis(compose_workout_analysis(
      snapshot,
      workout_id,
      config,
      phrases,
      request.language,
    )?),
    InsightContext::WeeklyDigest => {
      InsightPayload::WeeklyDigest(compose_weekly_digest(snapshot, request.as_of, config, phrases, request.language))
    }
  };
  Ok(payload)
}

/// Valid, tracked records within `[start, end]`
fn tracked_between<'a>(
  snapshot: &'a WorkoutSnapshot,
  start: NaiveDate,
  end: NaiveDate,
  config: &AnalysisConfig,
) -> Vec<&'a WorkoutRecord> {
  snapshot
    .valid_between(start, end)
    .into_iter()
    .filter(|w| config.tracks(w.workout_type))
    .collect()
}

fn distance_sum(workouts: &[&WorkoutRecord]) -> f64 {
  workouts.iter().map(|w| w.distance_km).sum()
}

pub fn compose_dashboard(
  snapshot: &WorkoutSnapshot,
  as_of: NaiveDate,
  config: &AnalysisConfig,
  phrases: &PhraseRegistry,
  language: Language,
) -> DashboardInsight {
  let week_workouts = tracked_between(snapshot, as_of - Duration::days(6), as_of, config);
  let signals = collect_signals(snapshot, as_of, config);
  let week = WeekBlock {
    sessions: week_workouts.len(),
    volume_km: distance_sum(&week_workouts),
    load_signal: load_signal(&signals),
  };

  // Four 7-day buckets, most recent first
  let buckets: Vec<Vec<&WorkoutRecord>> = (0..4)
    .map(|i| {
      let end = as_of - Duration::days(7 * i);
      tracked_between(snapshot, end - Duration::days(6), end, config)
    })
    .collect();
  let recent_half: f64 = buckets[..2].iter().map(|b| distance_sum(b)).sum();
  let earlier_half: f64 = buckets[2..].iter().map(|b| distance_sum(b)).sum();
  let month = MonthBlock {
    volume_km: recent_half + earlier_half,
    active_weeks: buckets.iter().filter(|b| !b.is_empty()).count() as u8,
    trend: LoadDirection::from_ratio(recent_half, earlier_half, config.direction_threshold_pct),
  };

  let has_history = !tracked_between(snapshot, NaiveDate::MIN, as_of, config).is_empty();
  if !has_history {
    return DashboardInsight {
      coach_insight: phrases.render(PhraseKey::DashboardNoData, language, &[]),
      week,
      month,
      recovery_score: None,
    };
  }

  let recovery = compute_recovery_score(snapshot, as_of, config, phrases, language);
  let coach_insight = if recovery.insufficient_data {
    phrases.render(PhraseKey::DashboardFewSessions, language, &[])
  } else {
    phrases.render(PhraseKey::Dashboard(recovery.status, month.trend), language, &[])
  };

  DashboardInsight {
    coach_insight,
    week,
    month,
    recovery_score: Some(RecoveryBlock::from(&recovery)),
  }
}

pub fn classify_session(snapshot: &WorkoutSnapshot, workout: &WorkoutRecord, config: &AnalysisConfig) -> SessionType {
  if is_hard_session(snapshot, workout, config) {
    SessionType::Hard
  } else if workout.duration_minutes >= SUSTAINED_MIN_DURATION_MIN
    || workout
      .effort_zone_distribution
      .map_or(false, |z| z.tempo_plus_pct() >= TEMPO_HEAVY_PCT)
  {
    SessionType::Sustained
  } else {
    SessionType::Easy
  }
}

pub fn compose_workout_analysis(
  snapshot: &WorkoutSnapshot,
  workout_id: &str,
  config: &AnalysisConfig,
  phrases: &PhraseRegistry,
  language: Language,
) -> CoachResult<WorkoutAnalysis> {
  let workout = snapshot
    .get(workout_id)
    .ok_or_else(|| CoachError::NotFound(format!("workout {} for user {}", workout_id, snapshot.user_id)))?;

  let baseline = compute_baseline(snapshot, workout.workout_type, workout.date, config.baseline_window_days).ok();
  let results = compare(workout, baseline.as_ref(), config.unusual_threshold_pct);
  let baseline_available = !results.is_empty();

  let label = intensity_label(&results).unwrap_or(UsualLabel::Normal);
  let direction = load_direction(&results, config.direction_threshold_pct).unwrap_or(LoadDirection::Stable);

  let vars = [
    ("distance", format!("{:.1}", workout.distance_km)),
    ("duration", format!("{:.0}", workout.duration_minutes)),
  ];
  let coach_summary = if baseline_available {
    phrases.render(PhraseKey::WorkoutSummary(label, direction), language, &vars)
  } else {
    phrases.render(PhraseKey::WorkoutSummaryNoBaseline, language, &vars)
  };

  let session_type = classify_session(snapshot, workout, config);
  let recovery = compute_recovery_score(snapshot, workout.date, config, phrases, language);
  let guidance = if recovery.insufficient_data {
    None
  } else {
    Some(phrases.render(PhraseKey::Guidance(session_type, recovery.status), language, &[]))
  };

  let insight = select_hidden_insight(
    &format!("workout:{}", workout.id),
    workout,
    baseline.as_ref(),
    config.hidden_insight_probability,
  )
  .map(|h| render_hidden(&h, phrases, language));

  Ok(WorkoutAnalysis {
    workout_id: workout.id.clone(),
    coach_summary,
    intensity: IntensitySection {
      pace: workout.effective_pace().map(format_pace),
      speed: workout.effective_speed().map(format_speed),
      avg_hr: workout.avg_heart_rate,
      label,
      baseline_available,
    },
    load: LoadSection {
      distance_km: workout.distance_km,
      duration_min: workout.duration_minutes,
      direction,
      vs_baseline_pct: load_delta_percent(&results),
      baseline_available,
    },
    session_type: SessionTypeSection { label: session_type },
    insight,
    guidance,
    recovery_score: Some(RecoveryBlock::from(&recovery)),
    zone_summary: workout.effort_zone_distribution.as_ref().map(ZoneSummary::from),
  })
}

/// Duration-weighted zone mix of a set of sessions
fn weighted_zones(workouts: &[&WorkoutRecord]) -> Option<ZoneDistribution> {
  let mut sums = [0.0; 5];
  let mut total = 0.0;
  for w in workouts {
    if let Some(zones) = w.effort_zone_distribution {
      for (sum, pct) in sums.iter_mut().zip(zones.as_array()) {
        *sum += pct * w.duration_minutes;
      }
      total += w.duration_minutes;
    }
  }
  if total > 0.0 {
    Some(ZoneDistribution::from_array(sums.map(|s| s / total)))
  } else {
    None
  }
}

pub fn compose_weekly_digest(
  snapshot: &WorkoutSnapshot,
  as_of: NaiveDate,
  config: &AnalysisConfig,
  phrases: &PhraseRegistry,
  language: Language,
) -> WeeklyDigest {
  let period_start = as_of - Duration::days(6);
  let digest_id = format!("{}:{}", snapshot.user_id, period_start);
  let workouts = tracked_between(snapshot, period_start, as_of, config);

  let metrics = DigestMetrics {
    total_sessions: workouts.len(),
    total_distance_km: distance_sum(&workouts),
    total_duration_min: workouts.iter().map(|w| w.duration_minutes).sum(),
  };

  if workouts.is_empty() {
    let insufficient = |key| DigestSignal {
      key,
      status: "insufficient_data".to_string(),
      value: None,
    };
    return WeeklyDigest {
      digest_id,
      period_start,
      period_end: as_of,
      coach_summary: phrases.render(PhraseKey::DigestEmpty, language, &[]),
      signals: vec![
        insufficient(SignalKey::Load),
        insufficient(SignalKey::Intensity),
        insufficient(SignalKey::Consistency),
      ],
      metrics,
      recommendations: vec![phrases.render(PhraseKey::Recommendation(Recommendation::AddSession), language, &[])],
      insight: None,
    };
  }

  let mut recommendations = Vec::new();

  // Load
  let signals = collect_signals(snapshot, as_of, config);
  let load = load_signal(&signals);
  let load_value = if signals.chronic_volume_km > 0.0 {
    Some(signals.volume_ratio() * 100.0)
  } else {
    None
  };
  match load {
    LoadSignal::High => recommendations.push(Recommendation::EaseLoad),
    LoadSignal::Low => recommendations.push(Recommendation::BuildVolume),
    LoadSignal::Balanced => {}
  }

  // Intensity
  let (intensity_status, intensity_value) = match weighted_zones(&workouts) {
    Some(zones) if zones.aerobic_pct() >= AEROBIC_SHARE_PCT => ("polarized", Some(zones.tempo_plus_pct())),
    Some(zones) if zones.tempo_plus_pct() > TEMPO_HEAVY_PCT => {
      recommendations.push(Recommendation::MoreEasyTime);
      ("intensity_heavy", Some(zones.tempo_plus_pct()))
    }
    Some(zones) => ("balanced", Some(zones.tempo_plus_pct())),
    None => ("insufficient_data", None),
  };

  // Consistency
  let expected = config.expected_sessions_per_week as f64;
  let consistency_pct = workouts.len() as f64 / expected * 100.0;
  let consistency_status = if consistency_pct >= 100.0 {
    "consistent"
  } else if consistency_pct >= 50.0 {
    "partial"
  } else {
    "sparse"
  };
  if consistency_pct < 100.0 {
    recommendations.push(Recommendation::AddSession);
  }

  if recommendations.is_empty() {
    recommendations.push(Recommendation::KeepRhythm);
  }

  // Focal session for the hidden insight: the longest one, earliest on ties
  let focal = workouts.iter().copied().fold(None::<&WorkoutRecord>, |best, w| match best {
    Some(b) if b.duration_minutes >= w.duration_minutes => Some(b),
    _ => Some(w),
  });
  let insight = focal.and_then(|w| {
    let baseline = compute_baseline(snapshot, w.workout_type, w.date, config.baseline_window_days).ok();
    select_hidden_insight(
      &format!("digest:{}", digest_id),
      w,
      baseline.as_ref(),
      config.hidden_insight_probability,
    )
    .map(|h| render_hidden(&h, phrases, language))
  });

  WeeklyDigest {
    coach_summary: phrases.render(
      PhraseKey::DigestSummary(load),
      language,
      &[
        ("sessions", workouts.len().to_string()),
        ("distance", format!("{:.1}", metrics.total_distance_km)),
      ],
    ),
    digest_id,
    period_start,
    period_end: as_of,
    signals: vec![
      DigestSignal {
        key: SignalKey::Load,
        status: load.as_str().to_string(),
        value: load_value,
      },
      DigestSignal {
        key: SignalKey::Intensity,
        status: intensity_status.to_string(),
        value: intensity_value,
      },
      DigestSignal {
        key: SignalKey::Consistency,
        status: consistency_status.to_string(),
        value: Some(consistency_pct),
      },
    ],
    metrics,
    recommendations: recommendations
      .into_iter()
      .map(|r| phrases.render(PhraseKey::Recommendation(r), language, &[]))
      .collect(),
    insight,
  }
}
