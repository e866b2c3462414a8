//! Baseline-relative training-load analysis.
//!
//! Workouts are compared against the athlete's own recent history, recent
//! load is folded into a readiness score, and the results are composed into
//! calm, data-first payloads for a dashboard, a single workout and a weekly
//! digest.

pub mod baseline;
pub mod cache;
pub mod comparator;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod insight;
pub mod models;
pub mod phrases;
pub mod recovery;
pub mod service;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub mod test_utils;

pub use config::{AnalysisConfig, CoachConfig};
pub use engine::CoachEngine;
pub use error::{CoachError, CoachResult};
pub use insight::{InsightContext, InsightRequest};
pub use models::{InsightPayload, WorkoutRecord, WorkoutType};
pub use phrases::Language;
pub use service::{CoachService, ImportReport};
pub use store::{WorkoutSnapshot, WorkoutStore};
