//! Test fixtures for movement validation.

use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::core::{Appointment, ChecklistItem, CompletionMap, Criterion, PipelineEntry, Stage};
use crate::movement::MovementRequest;
use crate::rules::RecordContext;

/// Creates a stage whose name is its id.
#[must_use]
pub fn stage(id: &str, order: i32) -> Stage {
    Stage::new(id, id, order)
}

/// Creates a checklist item owned by `stage_id`, titled after its id.
#[must_use]
pub fn checklist_item(id: &str, stage_id: &str, required: bool) -> ChecklistItem {
    ChecklistItem::new(id, stage_id, format!("Item {id}"), required)
}

/// Creates an appointment `days` days after 2024-01-01 10:00 UTC.
#[must_use]
pub fn appointment(id: &str, record_id: &str, days: i64) -> Appointment {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 10, 0, 0)
        .single()
        .unwrap_or_default();
    Appointment::new(id, record_id, base + Duration::days(days), format!("Meeting {id}"))
}

/// Creates an entry sitting in `stage_id` with fields from a JSON object.
#[must_use]
pub fn entry(id: &str, stage_id: &str, fields: Value) -> PipelineEntry {
    PipelineEntry::new(id, stage_id)
        .with_context(RecordContext::from_value(fields).unwrap_or_default())
}

/// Builder for a movement between two stages with sensible empty defaults.
#[derive(Debug, Clone)]
pub struct MovementFixture {
    /// The record being moved.
    pub entry: PipelineEntry,
    /// Current stage.
    pub from: Stage,
    /// Target stage.
    pub to: Stage,
    /// Checklist of the current stage.
    pub items: Vec<ChecklistItem>,
    /// Checklist completion.
    pub completion: CompletionMap,
    /// Records already in the target stage.
    pub occupancy: u32,
    /// Criteria of the target stage.
    pub criteria: Vec<Criterion>,
    /// Appointments of the record.
    pub appointments: Vec<Appointment>,
}

impl MovementFixture {
    /// Creates a forward move of `rec-1` from `lead` (1) to `proposal` (2).
    #[must_use]
    pub fn new() -> Self {
        Self {
            entry: PipelineEntry::new("rec-1", "lead"),
            from: stage("lead", 1),
            to: stage("proposal", 2),
            items: Vec::new(),
            completion: CompletionMap::new(),
            occupancy: 0,
            criteria: Vec::new(),
            appointments: Vec::new(),
        }
    }

    /// Replaces the stages.
    #[must_use]
    pub fn between(mut self, from: Stage, to: Stage) -> Self {
        self.entry.stage_id.clone_from(&from.id);
        self.from = from;
        self.to = to;
        self
    }

    /// Sets the record's fields.
    #[must_use]
    pub fn with_fields(mut self, fields: Value) -> Self {
        self.entry = entry(&self.entry.id, &self.entry.stage_id, fields);
        self
    }

    /// Adds a checklist item and its completion state.
    #[must_use]
    pub fn with_item(mut self, item: ChecklistItem, completed: Option<bool>) -> Self {
        if let Some(done) = completed {
            self.completion.set(item.id.clone(), done);
        }
        self.items.push(item);
        self
    }

    /// Sets the target occupancy.
    #[must_use]
    pub fn with_occupancy(mut self, occupancy: u32) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// Adds a criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Adds an appointment.
    #[must_use]
    pub fn with_appointment(mut self, appointment: Appointment) -> Self {
        self.appointments.push(appointment);
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn request(&self) -> MovementRequest {
        MovementRequest::new(self.entry.clone(), self.from.clone(), self.to.clone())
            .with_checklist(self.items.clone(), self.completion.clone())
            .with_occupancy(self.occupancy)
            .with_criteria(self.criteria.clone())
            .with_appointments(self.appointments.clone())
    }
}

impl Default for MovementFixture {
    fn default() -> Self {
        Self::new()
    }
}
