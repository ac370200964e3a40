//! The snapshot describing one requested transition.

use crate::core::{Appointment, ChecklistItem, CompletionMap, Criterion, PipelineEntry, Stage};
use serde::{Deserialize, Serialize};

/// All inputs needed to decide one transition, passed by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRequest {
    /// The record being moved.
    pub entry: PipelineEntry,
    /// The stage the record is leaving.
    pub from_stage: Stage,
    /// The stage the record wants to enter.
    pub to_stage: Stage,
    /// Checklist items gating the departure.
    #[serde(default)]
    pub checklist_items: Vec<ChecklistItem>,
    /// Completion state of those items.
    #[serde(default)]
    pub completion: CompletionMap,
    /// Records currently in the target stage.
    #[serde(default)]
    pub current_occupancy: u32,
    /// Criteria attached to the target stage.
    #[serde(default)]
    pub active_criteria: Vec<Criterion>,
    /// Appointments of the record, any status.
    #[serde(default)]
    pub appointment_candidates: Vec<Appointment>,
}

impl MovementRequest {
    /// Creates a request with an empty checklist, no occupancy, no criteria
    /// and no appointments.
    #[must_use]
    pub fn new(entry: PipelineEntry, from_stage: Stage, to_stage: Stage) -> Self {
        Self {
            entry,
            from_stage,
            to_stage,
            checklist_items: Vec::new(),
            completion: CompletionMap::new(),
            current_occupancy: 0,
            active_criteria: Vec::new(),
            appointment_candidates: Vec::new(),
        }
    }

    /// Sets the checklist and its completion state.
    #[must_use]
    pub fn with_checklist(mut self, items: Vec<ChecklistItem>, completion: CompletionMap) -> Self {
        self.checklist_items = items;
        self.completion = completion;
        self
    }

    /// Sets the target stage occupancy.
    #[must_use]
    pub fn with_occupancy(mut self, occupancy: u32) -> Self {
        self.current_occupancy = occupancy;
        self
    }

    /// Sets the target stage criteria.
    #[must_use]
    pub fn with_criteria(mut self, criteria: Vec<Criterion>) -> Self {
        self.active_criteria = criteria;
        self
    }

    /// Sets the appointment candidates.
    #[must_use]
    pub fn with_appointments(mut self, appointments: Vec<Appointment>) -> Self {
        self.appointment_candidates = appointments;
        self
    }

    /// Returns true if the target stage comes before the current one.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        self.to_stage.is_before(&self.from_stage)
    }
}
