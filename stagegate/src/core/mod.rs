//! Core domain model types for stagegate.
//!
//! All entities here are immutable snapshots handed in per evaluation call.
//! Their lifecycle belongs to the external persistence layer.

mod appointment;
mod checklist;
mod criterion;
mod entry;
mod stage;
mod verdict;

pub use appointment::{Appointment, AppointmentStatus};
pub use checklist::{ChecklistItem, CompletionMap};
pub use criterion::{CriteriaResult, CriteriaStatus, Criterion, CriterionKind};
pub use entry::PipelineEntry;
pub use stage::Stage;
pub use verdict::{TransitionVerdict, BACKWARD_MOVE_WARNING};
