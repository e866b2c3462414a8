use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use coach_engine::db::initialize_db;
use coach_engine::telemetry::init_subscriber;
use coach_engine::{
  CoachConfig, CoachEngine, CoachResult, CoachService, InsightContext, InsightRequest, Language,
  WorkoutRecord, WorkoutStore,
};

#[derive(Parser, Debug)]
#[command(
  name = "coach-report",
  about = "Baseline-relative training feedback from the local workout store",
  long_about = "Imports workouts and prints dashboard, workout and weekly digest payloads as JSON."
)]
struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Database URL override (otherwise COACH_DATABASE_URL)
  #[arg(long, global = true)]
  database_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Import a JSON array of workout records
  Import {
    /// Path to the JSON file
    file: PathBuf,
  },

  /// Dashboard summary for a user
  Dashboard {
    user: String,

    /// Reference date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    #[arg(long, default_value = "en", value_parser = parse_language)]
    lang: Language,
  },

  /// Analysis of a single workout, evaluated at the workout's own date
  Workout {
    user: String,
    workout_id: String,

    #[arg(long, default_value = "en", value_parser = parse_language)]
    lang: Language,
  },

  /// Weekly digest ending on the reference date
  Digest {
    user: String,

    /// Reference date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    #[arg(long, default_value = "en", value_parser = parse_language)]
    lang: Language,
  },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", raw, e))
}

fn parse_language(raw: &str) -> Result<Language, String> {
  raw.parse()
}

impl Command {
  /// Insight request for the read commands, `None` for import
  fn insight_request(&self, today: NaiveDate) -> Option<(&str, InsightRequest)> {
    let (user, context, as_of, language) = match self {
      Command::Import { .. } => return None,
      Command::Dashboard { user, date, lang } => (user, InsightContext::Dashboard, date.unwrap_or(today), *lang),
      Command::Digest { user, date, lang } => (user, InsightContext::WeeklyDigest, date.unwrap_or(today), *lang),
      Command::Workout { user, workout_id, lang } => (
        user,
        InsightContext::WorkoutDetail {
          workout_id: workout_id.clone(),
        },
        today,
        *lang,
      ),
    };

    Some((
      user.as_str(),
      InsightRequest {
        context,
        as_of,
        language,
      },
    ))
  }
}

async fn run(cli: Cli) -> CoachResult<()> {
  let mut config = CoachConfig::from_env()?;
  init_subscriber(&config.log_level);
  if let Some(url) = cli.database_url {
    config.database_url = url;
  }

  let pool = initialize_db(&config.database_url).await?;
  let engine = Arc::new(CoachEngine::new(config.analysis)?);
  let service = CoachService::new(WorkoutStore::new(pool), engine, config.cache_max_entries);

  if let Command::Import { file } = &cli.command {
    let raw = fs::read_to_string(file)?;
    let records: Vec<WorkoutRecord> = serde_json::from_str(&raw)?;
    let report = service.import(&records).await;
    println!("{}", serde_json::to_string(&report)?);
    return Ok(());
  }

  if let Some((user_id, request)) = cli.command.insight_request(Local::now().date_naive()) {
    let payload = service.insight(user_id, &request).await?;
    println!("{}", payload.to_json()?);
  }

  Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "coach-report failed");
      eprintln!("Error: {}", e);
      ExitCode::FAILURE
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
  }

  #[test]
  fn test_dashboard_flags_are_optional() {
    // Arrange
    let cli = Cli::try_parse_from(["coach-report", "dashboard", "user-1", "--lang", "de"]).expect("parse");

    // Act
    let (user, request) = cli.command.insight_request(today()).expect("insight command");

    // Assert
    assert_eq!(user, "user-1");
    assert_eq!(request.context, InsightContext::Dashboard);
    assert_eq!(request.as_of, today());
    assert_eq!(request.language, Language::De);
  }

  #[test]
  fn test_digest_date_flag() {
    let cli = Cli::try_parse_from(["coach-report", "digest", "user-1", "--date", "2024-05-12"]).expect("parse");
    let (_, request) = cli.command.insight_request(today()).expect("insight command");

    assert_eq!(request.context, InsightContext::WeeklyDigest);
    assert_eq!(request.as_of, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
    assert_eq!(request.language, Language::En);
  }

  #[test]
  fn test_workout_takes_id_and_language() {
    let cli = Cli::try_parse_from(["coach-report", "workout", "user-1", "w-42", "--lang", "de"]).expect("parse");
    let (_, request) = cli.command.insight_request(today()).expect("insight command");

    assert_eq!(
      request.context,
      InsightContext::WorkoutDetail {
        workout_id: "w-42".to_string()
      }
    );
    assert_eq!(request.language, Language::De);
  }

  #[test]
  fn test_rejects_bad_input() {
    assert!(Cli::try_parse_from(["coach-report", "dashboard", "user-1", "--date", "30/06/2024"]).is_err());
    assert!(Cli::try_parse_from(["coach-report", "dashboard", "user-1", "--lang", "fr"]).is_err());
    assert!(Cli::try_parse_from(["coach-report", "workout", "user-1"]).is_err());
    assert!(Cli::try_parse_from(["coach-report", "import"]).is_err());
  }

  #[test]
  fn test_import_has_no_insight_request() {
    let cli = Cli::try_parse_from(["coach-report", "import", "week.json", "--database-url", "sqlite::memory:"])
      .expect("parse");

    assert!(cli.command.insight_request(today()).is_none());
    assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
  }
}
