//! Scoring engine for resident shift rosters.
//!
//! A [`domain::ScheduleSnapshot`] holds residents, shifts, availability and
//! rotation requirements. [`scoring::ScoringEngine`] turns an assignment into a
//! hard/medium/soft score with a per-rule breakdown, and
//! [`scoring::IncrementalScorer`] keeps that score current while a search
//! procedure moves shifts between residents.

pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod report;
pub mod scoring;
pub mod telemetry;

pub use domain::{ScheduleError, ScheduleSnapshot};
pub use scoring::{HardMediumSoftScore, IncrementalScorer, ScoreExplanation, ScoringEngine};
