//! # Stagegate
//!
//! Stage advancement gates for records moving through an ordered pipeline.
//!
//! Given a record, its current stage and a requested target stage, stagegate
//! answers one question: can this transition happen right now, and if not,
//! why not. It provides:
//!
//! - **Rule evaluation**: a typed AND/OR condition tree evaluated against a
//!   flattened record context, failing closed on missing data and malformed
//!   configuration
//! - **Gates**: checklist completion, WIP capacity and appointment binding
//! - **Movement orchestration**: every gate runs on every request and the
//!   results are aggregated into one [`TransitionVerdict`](core::TransitionVerdict)
//! - **Movement service**: an async boundary that fetches the input snapshots
//!   and keeps operational failures apart from business-rule blocks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stagegate::prelude::*;
//!
//! let proposal = Stage::new("proposal", "Proposal", 3).with_wip_limit(5);
//! let request = MovementRequest::new(entry, qualified, proposal)
//!     .with_checklist(items, completion)
//!     .with_occupancy(4);
//!
//! let verdict = validate_movement(&request);
//! if !verdict.can_move {
//!     for blocker in &verdict.blockers {
//!         println!("blocked: {blocker}");
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod dedup;
pub mod errors;
pub mod events;
pub mod gates;
pub mod logging;
pub mod movement;
pub mod rules;
pub mod service;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ServiceConfig;
    pub use crate::core::{
        Appointment, AppointmentStatus, ChecklistItem, CompletionMap, CriteriaResult,
        CriteriaStatus, Criterion, CriterionKind, PipelineEntry, Stage, TransitionVerdict,
    };
    pub use crate::dedup::NotificationCache;
    pub use crate::errors::{DataInput, DataSourceError, RuleConfigError, StagegateError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::gates::{
        can_advance, completion_percentage, missing_required_count,
        validate_appointment_requirement, validate_stage_advancement, validate_wip_limit,
        AppointmentBinding, AppointmentCheck, ChecklistCheck, WipCheck,
    };
    pub use crate::movement::{validate_movement, MovementRequest};
    pub use crate::rules::{
        classify, classify_all, evaluate, Logic, Operator, RecordContext, RuleConfig, RuleNode,
    };
    pub use crate::service::{MovementOutcome, MovementService, TransitionDataSource};
}
