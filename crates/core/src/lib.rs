// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tf-core: Core library for the TalentFlow hiring pipeline
//!
//! This crate provides:
//! - The entity model (jobs, candidates, assessments, candidate responses)
//! - An immutable state snapshot with entity-level change sets
//! - The dense-order reconciler used when jobs are reordered
//! - Validation, clock and id abstractions, and configuration

pub mod clock;
pub mod config;
pub mod id;
pub mod validation;

// Entities (order matters for dependencies)
pub mod job;
pub mod candidate;
pub mod assessment;
pub mod order;
pub mod snapshot;

// Re-exports
pub use assessment::{Answer, Assessment, CandidateResponse, Question, QuestionKind, Section};
pub use candidate::{Candidate, Note, Stage, TimelineEntry};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ConfigError, NetworkConfig, PersistPolicy, PersistenceConfig, SeedConfig, TalentFlowConfig,
};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use job::{slugify, Job, JobDraft, JobStatus};
pub use order::OrderError;
pub use snapshot::{invert, Change, JobFilter, Snapshot};
pub use validation::{UnknownVariant, ValidationError, MAX_ID_BYTES};
