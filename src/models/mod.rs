pub mod analysis;
pub mod payload;
pub mod workout;

pub use analysis::{
  Baseline, ComparisonResult, LoadDirection, LoadSignals, Metric, RecoveryScore, RecoveryStatus,
  UsualLabel,
};
pub use payload::InsightPayload;
pub use workout::{Split, WorkoutRecord, WorkoutType, ZoneDistribution};
