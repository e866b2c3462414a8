//! Phrase registry
//!
//! The only place that owns coaching prose. The analysis code emits enums;
//! this table turns (key, language) into text. Templates carry tone tags and
//! anything tagged medical, alarming or motivational hype is refused at
//! registration, so no lookup can ever return one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, CoachResult};
use crate::models::payload::{LoadSignal, SessionType};
use crate::models::{LoadDirection, RecoveryStatus, UsualLabel};

/// ---------------------------------------------------------------------------
/// Language
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  #[default]
  En,
  De,
}

impl Language {
  pub fn as_str(&self) -> &'static str {
    match self {
      Language::En => "en",
      Language::De => "de",
    }
  }
}

impl std::str::FromStr for Language {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "en" => Ok(Self::En),
      "de" => Ok(Self::De),
      _ => Err(format!("Unsupported language: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Keys and Tones
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
  Calm,
  Neutral,
  Supportive,
  Medical,
  Alarming,
  MotivationalHype,
}

impl Tone {
  pub fn is_forbidden(&self) -> bool {
    matches!(self, Tone::Medical | Tone::Alarming | Tone::MotivationalHype)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
  EaseLoad,
  BuildVolume,
  MoreEasyTime,
  AddSession,
  KeepRhythm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhraseKey {
  /// Recovery status x 7-day load direction
  Recovery(RecoveryStatus, LoadDirection),
  RecoveryInsufficient,
  /// Recovery status x monthly trend
  Dashboard(RecoveryStatus, LoadDirection),
  DashboardNoData,
  DashboardFewSessions,
  /// Intensity vs usual x load direction; `{distance}` and `{duration}`
  WorkoutSummary(UsualLabel, LoadDirection),
  /// Absolute-only framing when no baseline exists; `{distance}` and `{duration}`
  WorkoutSummaryNoBaseline,
  Guidance(SessionType, RecoveryStatus),
  /// `{pct}`
  PacingDriftSlower,
  /// `{pct}`
  PacingDriftFaster,
  /// `{pct}`
  EfficiencyImproved,
  /// `{pct}`
  EfficiencyDeclined,
  /// `{pct}`
  LateSessionFatigue,
  /// `{pct}`
  AerobicSignature,
  /// `{sessions}` and `{distance}`
  DigestSummary(LoadSignal),
  DigestEmpty,
  Recommendation(Recommendation),
}

impl PhraseKey {
  /// Every key the composers may ask for
  pub fn all() -> Vec<PhraseKey> {
    let statuses = [RecoveryStatus::Ready, RecoveryStatus::Moderate, RecoveryStatus::Low];
    let directions = [LoadDirection::Up, LoadDirection::Stable, LoadDirection::Down];
    let labels = [UsualLabel::AboveUsual, UsualLabel::Normal, UsualLabel::BelowUsual];
    let sessions = [SessionType::Easy, SessionType::Sustained, SessionType::Hard];
    let signals = [LoadSignal::Low, LoadSignal::Balanced, LoadSignal::High];
    let recommendations = [
      Recommendation::EaseLoad,
      Recommendation::BuildVolume,
      Recommendation::MoreEasyTime,
      Recommendation::AddSession,
      Recommendation::KeepRhythm,
    ];

    let mut keys = vec![
      PhraseKey::RecoveryInsufficient,
      PhraseKey::DashboardNoData,
      PhraseKey::DashboardFewSessions,
      PhraseKey::WorkoutSummaryNoBaseline,
      PhraseKey::PacingDriftSlower,
      PhraseKey::PacingDriftFaster,
      PhraseKey::EfficiencyImproved,
      PhraseKey::EfficiencyDeclined,
      PhraseKey::LateSessionFatigue,
      PhraseKey::AerobicSignature,
      PhraseKey::DigestEmpty,
    ];
    for s in statuses {
      for d in directions {
        keys.push(PhraseKey::Recovery(s, d));
        keys.push(PhraseKey::Dashboard(s, d));
      }
      for t in sessions {
        keys.push(PhraseKey::Guidance(t, s));
      }
    }
    for l in labels {
      for d in directions {
        keys.push(PhraseKey::WorkoutSummary(l, d));
      }
    }
    keys.extend(signals.into_iter().map(PhraseKey::DigestSummary));
    keys.extend(recommendations.into_iter().map(PhraseKey::Recommendation));
    keys
  }
}

/// ---------------------------------------------------------------------------
/// Registry
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PhraseRegistry {
  templates: HashMap<(PhraseKey, Language), String>,
}

impl PhraseRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a template. Returns false, and stores nothing, when any tone is forbidden.
  pub fn register(&mut self, key: PhraseKey, language: Language, tones: &[Tone], text: &str) -> bool {
    if let Some(tone) = tones.iter().find(|t| t.is_forbidden()) {
      tracing::debug!(?key, ?tone, language = language.as_str(), "rejecting phrase template");
      return false;
    }
    self.templates.insert((key, language), text.to_string());
    true
  }

  /// Fail if English, or any other language with at least one template,
  /// lacks a template for some key
  pub fn verify_complete(&self) -> CoachResult<()> {
    let mut languages: Vec<Language> = self.templates.keys().map(|(_, language)| *language).collect();
    languages.push(Language::En);
    languages.sort_by_key(|l| l.as_str());
    languages.dedup();

    let keys = PhraseKey::all();
    let gaps: Vec<String> = languages
      .into_iter()
      .filter_map(|language| {
        let missing: Vec<String> = keys
          .iter()
          .filter(|key| !self.templates.contains_key(&(**key, language)))
          .map(|key| format!("{:?}", key))
          .collect();
        (!missing.is_empty()).then(|| format!("{}: {}", language.as_str(), missing.join(", ")))
      })
      .collect();

    if gaps.is_empty() {
      Ok(())
    } else {
      Err(CoachError::Configuration(format!(
        "phrase registry is missing templates ({})",
        gaps.join("; ")
      )))
    }
  }

  pub fn contains(&self, key: PhraseKey, language: Language) -> bool {
    self.templates.contains_key(&(key, language))
  }

  /// Look up a template (falling back to English) and fill `{name}` placeholders
  pub fn render(&self, key: PhraseKey, language: Language, vars: &[(&str, String)]) -> String {
    let template = self
      .templates
      .get(&(key, language))
      .or_else(|| self.templates.get(&(key, Language::En)));

    match template {
      Some(t) => vars
        .iter()
        .fold(t.clone(), |text, (name, value)| text.replace(&format!("{{{}}}", name), value)),
      None => {
        tracing::warn!(?key, language = language.as_str(), "no phrase template registered");
        String::new()
      }
    }
  }

  /// The built-in English and German phrase set
  pub fn builtin() -> Self {
    use LoadDirection::{Down, Stable, Up};
    use RecoveryStatus::{Low, Moderate, Ready};
    use Tone::{Calm, Neutral, Supportive};

    let mut r = Self::new();
    let en = Language::En;
    let de = Language::De;

    // Recovery
    r.register(PhraseKey::Recovery(Ready, Up), en, &[Calm], "You're well recovered while load builds. A good window for quality work.");
    r.register(PhraseKey::Recovery(Ready, Stable), en, &[Calm], "Recovery looks solid and your load is steady.");
    r.register(PhraseKey::Recovery(Ready, Down), en, &[Calm], "You're fresh after a lighter stretch. Ease back into structure.");
    r.register(PhraseKey::Recovery(Moderate, Up), en, &[Calm], "Load has been climbing. Keep the next session comfortable.");
    r.register(PhraseKey::Recovery(Moderate, Stable), en, &[Calm], "Recovery is partway there. A steady, easy day fits well.");
    r.register(PhraseKey::Recovery(Moderate, Down), en, &[Calm], "You're recovering as load eases. Keep it relaxed for now.");
    r.register(PhraseKey::Recovery(Low, Up), en, &[Calm, Supportive], "Recent load is above your normal. An easy day or rest will help you absorb it.");
    r.register(PhraseKey::Recovery(Low, Stable), en, &[Calm, Supportive], "Your body is still absorbing recent hard work. An easy day suits you now.");
    r.register(PhraseKey::Recovery(Low, Down), en, &[Calm, Supportive], "Recovery is still catching up. Keep things light while load settles.");
    r.register(PhraseKey::RecoveryInsufficient, en, &[Neutral], "Not enough recent sessions for a confident readiness read yet.");

    r.register(PhraseKey::Recovery(Ready, Up), de, &[Calm], "Du bist gut erholt, während die Belastung steigt. Ein gutes Fenster für Qualitätseinheiten.");
    r.register(PhraseKey::Recovery(Ready, Stable), de, &[Calm], "Die Erholung sieht gut aus und deine Belastung ist stabil.");
    r.register(PhraseKey::Recovery(Ready, Down), de, &[Calm], "Nach einer leichteren Phase bist du frisch. Steig ruhig wieder in die Struktur ein.");
    r.register(PhraseKey::Recovery(Moderate, Up), de, &[Calm], "Die Belastung ist gestiegen. Halte die nächste Einheit locker.");
    r.register(PhraseKey::Recovery(Moderate, Stable), de, &[Calm], "Die Erholung ist auf gutem Weg. Ein ruhiger, lockerer Tag passt gut.");
    r.register(PhraseKey::Recovery(Moderate, Down), de, &[Calm], "Du erholst dich, während die Belastung sinkt. Bleib vorerst entspannt.");
    r.register(PhraseKey::Recovery(Low, Up), de, &[Calm, Supportive], "Die letzte Belastung liegt über deinem Normalwert. Ein lockerer Tag oder Pause hilft beim Verarbeiten.");
    r.register(PhraseKey::Recovery(Low, Stable), de, &[Calm, Supportive], "Dein Körper verarbeitet noch die harte Arbeit. Ein lockerer Tag passt jetzt.");
    r.register(PhraseKey::Recovery(Low, Down), de, &[Calm, Supportive], "Die Erholung holt noch auf. Halte es leicht, bis sich die Belastung setzt.");
    r.register(PhraseKey::RecoveryInsufficient, de, &[Neutral], "Noch zu wenige Einheiten für eine verlässliche Einschätzung.");

    // Dashboard
    r.register(PhraseKey::Dashboard(Ready, Up), en, &[Supportive], "Your training is trending up and you're absorbing it well.");
    r.register(PhraseKey::Dashboard(Ready, Stable), en, &[Calm], "Consistent month, and you're recovered. Keep the rhythm.");
    r.register(PhraseKey::Dashboard(Ready, Down), en, &[Calm], "A lighter month has left you fresh. There's room to build again.");
    r.register(PhraseKey::Dashboard(Moderate, Up), en, &[Calm], "Training is trending up. Balance the build with easy days.");
    r.register(PhraseKey::Dashboard(Moderate, Stable), en, &[Calm], "Steady month overall. Recovery is moderate, so keep easy days easy.");
    r.register(PhraseKey::Dashboard(Moderate, Down), en, &[Calm], "Volume has eased this month and recovery is coming along.");
    r.register(PhraseKey::Dashboard(Low, Up), en, &[Calm, Supportive], "Your load has risen faster than your recovery. A lighter few days will help it land.");
    r.register(PhraseKey::Dashboard(Low, Stable), en, &[Calm, Supportive], "Recovery is lagging behind steady training. Plan an easier stretch.");
    r.register(PhraseKey::Dashboard(Low, Down), en, &[Calm], "Load is already easing. Give recovery a few more quiet days.");
    r.register(PhraseKey::Dashboard(Ready, Up), de, &[Supportive], "Dein Training steigt an und du verarbeitest es gut.");
    r.register(PhraseKey::Dashboard(Ready, Stable), de, &[Calm], "Ein gleichmäßiger Monat und du bist erholt. Behalte den Rhythmus bei.");
    r.register(PhraseKey::Dashboard(Ready, Down), de, &[Calm], "Ein leichterer Monat hat dich frisch gemacht. Es ist Raum, wieder aufzubauen.");
    r.register(PhraseKey::Dashboard(Moderate, Up), de, &[Calm], "Dein Training steigt an. Gleiche den Aufbau mit lockeren Tagen aus.");
    r.register(PhraseKey::Dashboard(Moderate, Stable), de, &[Calm], "Insgesamt ein stabiler Monat. Die Erholung ist mittel, halte lockere Tage locker.");
    r.register(PhraseKey::Dashboard(Moderate, Down), de, &[Calm], "Der Umfang ist diesen Monat gesunken und die Erholung kommt voran.");
    r.register(PhraseKey::Dashboard(Low, Up), de, &[Calm, Supportive], "Deine Belastung ist schneller gestiegen als deine Erholung. Ein paar leichtere Tage helfen.");
    r.register(PhraseKey::Dashboard(Low, Stable), de, &[Calm, Supportive], "Die Erholung hinkt dem stabilen Training hinterher. Plane eine leichtere Phase ein.");
    r.register(PhraseKey::Dashboard(Low, Down), de, &[Calm], "Die Belastung sinkt bereits. Gönn der Erholung noch ein paar ruhige Tage.");
    r.register(PhraseKey::DashboardNoData, en, &[Neutral], "No workouts yet. Log your first session to start building your baseline.");
    r.register(PhraseKey::DashboardFewSessions, en, &[Neutral], "A few more sessions and your coaching insights will sharpen.");
    r.register(PhraseKey::DashboardNoData, de, &[Neutral], "Noch keine Einheiten. Erfasse deine erste Einheit, um deine Basis aufzubauen.");
    r.register(PhraseKey::DashboardFewSessions, de, &[Neutral], "Noch ein paar Einheiten, dann werden deine Hinweise genauer.");

    // Workout summaries
    use UsualLabel::{AboveUsual, BelowUsual, Normal};
    r.register(PhraseKey::WorkoutSummary(AboveUsual, Up), en, &[Neutral], "{distance} km in {duration} min, faster and longer than usual.");
    r.register(PhraseKey::WorkoutSummary(AboveUsual, Stable), en, &[Neutral], "{distance} km in {duration} min at a quicker effort than usual.");
    r.register(PhraseKey::WorkoutSummary(AboveUsual, Down), en, &[Neutral], "{distance} km in {duration} min, shorter but quicker than usual.");
    r.register(PhraseKey::WorkoutSummary(Normal, Up), en, &[Neutral], "{distance} km in {duration} min at your usual effort, a bit more volume.");
    r.register(PhraseKey::WorkoutSummary(Normal, Stable), en, &[Calm], "{distance} km in {duration} min, right in line with your usual.");
    r.register(PhraseKey::WorkoutSummary(Normal, Down), en, &[Neutral], "{distance} km in {duration} min at your usual effort, a bit less volume.");
    r.register(PhraseKey::WorkoutSummary(BelowUsual, Up), en, &[Calm], "{distance} km in {duration} min, longer and more relaxed than usual.");
    r.register(PhraseKey::WorkoutSummary(BelowUsual, Stable), en, &[Calm], "{distance} km in {duration} min at an easier effort than usual.");
    r.register(PhraseKey::WorkoutSummary(BelowUsual, Down), en, &[Calm], "{distance} km in {duration} min, a shorter and easier session than usual.");
    r.register(PhraseKey::WorkoutSummary(AboveUsual, Up), de, &[Neutral], "{distance} km in {duration} min, schneller und länger als sonst.");
    r.register(PhraseKey::WorkoutSummary(AboveUsual, Stable), de, &[Neutral], "{distance} km in {duration} min mit einer zügigeren Intensität als sonst.");
    r.register(PhraseKey::WorkoutSummary(AboveUsual, Down), de, &[Neutral], "{distance} km in {duration} min, kürzer, aber zügiger als sonst.");
    r.register(PhraseKey::WorkoutSummary(Normal, Up), de, &[Neutral], "{distance} km in {duration} min bei gewohnter Intensität, etwas mehr Umfang.");
    r.register(PhraseKey::WorkoutSummary(Normal, Stable), de, &[Calm], "{distance} km in {duration} min, ganz im Rahmen deines Üblichen.");
    r.register(PhraseKey::WorkoutSummary(Normal, Down), de, &[Neutral], "{distance} km in {duration} min bei gewohnter Intensität, etwas weniger Umfang.");
    r.register(PhraseKey::WorkoutSummary(BelowUsual, Up), de, &[Calm], "{distance} km in {duration} min, länger und entspannter als sonst.");
    r.register(PhraseKey::WorkoutSummary(BelowUsual, Stable), de, &[Calm], "{distance} km in {duration} min mit leichterer Intensität als sonst.");
    r.register(PhraseKey::WorkoutSummary(BelowUsual, Down), de, &[Calm], "{distance} km in {duration} min, eine kürzere und leichtere Einheit als sonst.");
    r.register(PhraseKey::WorkoutSummaryNoBaseline, en, &[Neutral], "{distance} km in {duration} min. A few more similar sessions will unlock comparisons with your usual.");
    r.register(PhraseKey::WorkoutSummaryNoBaseline, de, &[Neutral], "{distance} km in {duration} min. Mit ein paar weiteren ähnlichen Einheiten werden Vergleiche möglich.");

    // Guidance
    r.register(PhraseKey::Guidance(SessionType::Easy, Ready), en, &[Calm], "Easy sessions like this build your base. You're ready for something harder next.");
    r.register(PhraseKey::Guidance(SessionType::Easy, Moderate), en, &[Calm], "A good easy day. Another relaxed session would round out your recovery.");
    r.register(PhraseKey::Guidance(SessionType::Easy, Low), en, &[Calm], "Exactly what recovery calls for. Keep tomorrow light too.");
    r.register(PhraseKey::Guidance(SessionType::Sustained, Ready), en, &[Calm], "Solid sustained work. Follow it with an easy day to lock it in.");
    r.register(PhraseKey::Guidance(SessionType::Sustained, Moderate), en, &[Calm], "Sustained effort on moderate recovery. Make the next session easy.");
    r.register(PhraseKey::Guidance(SessionType::Sustained, Low), en, &[Calm, Supportive], "That was a long effort on limited recovery. Rest or very easy movement next.");
    r.register(PhraseKey::Guidance(SessionType::Hard, Ready), en, &[Calm], "A quality session. Give it a day or two of easy training to absorb.");
    r.register(PhraseKey::Guidance(SessionType::Hard, Moderate), en, &[Calm], "Hard work on partial recovery. Keep the next two days easy.");
    r.register(PhraseKey::Guidance(SessionType::Hard, Low), en, &[Calm, Supportive], "A hard session while recovery is low. Prioritise rest before the next effort.");
    r.register(PhraseKey::Guidance(SessionType::Easy, Ready), de, &[Calm], "Lockere Einheiten wie diese bauen deine Basis auf. Als Nächstes ist etwas Härteres drin.");
    r.register(PhraseKey::Guidance(SessionType::Easy, Moderate), de, &[Calm], "Ein guter lockerer Tag. Eine weitere entspannte Einheit rundet die Erholung ab.");
    r.register(PhraseKey::Guidance(SessionType::Easy, Low), de, &[Calm], "Genau das, was die Erholung braucht. Halte auch morgen alles leicht.");
    r.register(PhraseKey::Guidance(SessionType::Sustained, Ready), de, &[Calm], "Solide Dauerarbeit. Ein lockerer Tag danach festigt sie.");
    r.register(PhraseKey::Guidance(SessionType::Sustained, Moderate), de, &[Calm], "Eine lange Belastung bei mittlerer Erholung. Die nächste Einheit locker halten.");
    r.register(PhraseKey::Guidance(SessionType::Sustained, Low), de, &[Calm, Supportive], "Das war eine lange Belastung bei knapper Erholung. Als Nächstes Ruhe oder sehr lockere Bewegung.");
    r.register(PhraseKey::Guidance(SessionType::Hard, Ready), de, &[Calm], "Eine Qualitätseinheit. Gib ihr ein bis zwei lockere Tage zum Verarbeiten.");
    r.register(PhraseKey::Guidance(SessionType::Hard, Moderate), de, &[Calm], "Harte Arbeit bei teilweiser Erholung. Die nächsten zwei Tage locker halten.");
    r.register(PhraseKey::Guidance(SessionType::Hard, Low), de, &[Calm, Supportive], "Eine harte Einheit bei niedriger Erholung. Ruhe hat vor der nächsten Belastung Vorrang.");

    // Hidden insights
    r.register(PhraseKey::PacingDriftSlower, en, &[Neutral], "Your second half ran {pct}% slower than the first. An evener start often pays off late.");
    r.register(PhraseKey::PacingDriftFaster, en, &[Neutral], "You finished {pct}% faster than you started, a controlled negative split.");
    r.register(PhraseKey::EfficiencyImproved, en, &[Neutral], "You covered ground {pct}% more efficiently per heartbeat than your recent average.");
    r.register(PhraseKey::EfficiencyDeclined, en, &[Calm], "Speed per heartbeat was {pct}% lower than your recent average. Heat, terrain or fatigue can all do that.");
    r.register(PhraseKey::LateSessionFatigue, en, &[Calm], "Heart rate crept up {pct}% late in the session at a similar pace, a sign of accumulated fatigue.");
    r.register(PhraseKey::AerobicSignature, en, &[Calm], "{pct}% of this session was in zones 1-2, a clean aerobic signature.");
    r.register(PhraseKey::PacingDriftSlower, de, &[Neutral], "Deine zweite Hälfte war {pct}% langsamer als die erste. Ein gleichmäßigerer Start zahlt sich oft am Ende aus.");
    r.register(PhraseKey::PacingDriftFaster, de, &[Neutral], "Du bist am Ende {pct}% schneller gelaufen als zu Beginn, ein kontrollierter Negativ-Split.");
    r.register(PhraseKey::EfficiencyImproved, de, &[Neutral], "Pro Herzschlag hast du {pct}% mehr Strecke gemacht als in deinem jüngsten Schnitt.");
    r.register(PhraseKey::EfficiencyDeclined, de, &[Calm], "Das Tempo pro Herzschlag lag {pct}% unter deinem jüngsten Schnitt. Hitze, Gelände oder Müdigkeit können das bewirken.");
    r.register(PhraseKey::LateSessionFatigue, de, &[Calm], "Die Herzfrequenz stieg gegen Ende bei ähnlichem Tempo um {pct}%, ein Zeichen angesammelter Müdigkeit.");
    r.register(PhraseKey::AerobicSignature, de, &[Calm], "{pct}% dieser Einheit lagen in den Zonen 1-2, eine saubere aerobe Signatur.");

    // Digest
    r.register(PhraseKey::DigestSummary(LoadSignal::Low), en, &[Calm], "{sessions} sessions and {distance} km this week, lighter than your usual.");
    r.register(PhraseKey::DigestSummary(LoadSignal::Balanced), en, &[Calm], "{sessions} sessions and {distance} km this week, in line with your usual load.");
    r.register(PhraseKey::DigestSummary(LoadSignal::High), en, &[Calm], "{sessions} sessions and {distance} km this week, above your usual load.");
    r.register(PhraseKey::DigestSummary(LoadSignal::Low), de, &[Calm], "{sessions} Einheiten und {distance} km diese Woche, leichter als sonst.");
    r.register(PhraseKey::DigestSummary(LoadSignal::Balanced), de, &[Calm], "{sessions} Einheiten und {distance} km diese Woche, im Rahmen deiner üblichen Belastung.");
    r.register(PhraseKey::DigestSummary(LoadSignal::High), de, &[Calm], "{sessions} Einheiten und {distance} km diese Woche, über deiner üblichen Belastung.");
    r.register(PhraseKey::DigestEmpty, en, &[Neutral], "No sessions logged this week.");
    r.register(PhraseKey::DigestEmpty, de, &[Neutral], "Diese Woche wurden keine Einheiten erfasst.");

    r.register(PhraseKey::Recommendation(Recommendation::EaseLoad), en, &[Calm], "Keep next week's volume close to your usual to absorb this one.");
    r.register(PhraseKey::Recommendation(Recommendation::BuildVolume), en, &[Calm], "There's room to add a little volume next week.");
    r.register(PhraseKey::Recommendation(Recommendation::MoreEasyTime), en, &[Calm], "Shift some time into easy zones 1-2.");
    r.register(PhraseKey::Recommendation(Recommendation::AddSession), en, &[Calm], "One more short session would help consistency.");
    r.register(PhraseKey::Recommendation(Recommendation::KeepRhythm), en, &[Calm], "Keep the same rhythm next week.");

    r.register(PhraseKey::Recommendation(Recommendation::EaseLoad), de, &[Calm], "Halte den Umfang nächste Woche nahe an deinem Üblichen, um diese Woche zu verarbeiten.");
    r.register(PhraseKey::Recommendation(Recommendation::BuildVolume), de, &[Calm], "Nächste Woche ist Raum für etwas mehr Umfang.");
    r.register(PhraseKey::Recommendation(Recommendation::MoreEasyTime), de, &[Calm], "Verlagere etwas Zeit in die lockeren Zonen 1-2.");
    r.register(PhraseKey::Recommendation(Recommendation::AddSession), de, &[Calm], "Eine weitere kurze Einheit würde die Regelmäßigkeit stärken.");
    r.register(PhraseKey::Recommendation(Recommendation::KeepRhythm), de, &[Calm], "Behalte nächste Woche denselben Rhythmus bei.");

    r
  }
}
