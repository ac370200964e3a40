//! Runs every gate over a movement request and aggregates the verdict.

use super::MovementRequest;
use crate::core::{TransitionVerdict, BACKWARD_MOVE_WARNING};
use crate::gates::{can_advance, validate_appointment_requirement, validate_wip_limit};
use crate::rules::classify_all;
use tracing::debug;

/// Validates one transition.
///
/// Gates run in a fixed order and none short-circuits the others:
/// checklist, WIP, appointments, then target stage criteria. Each failing
/// gate contributes its blockers in that order. Moving to an earlier stage
/// adds a single warning regardless of the outcome.
#[must_use]
pub fn validate_movement(request: &MovementRequest) -> TransitionVerdict {
    let mut blockers = Vec::new();
    let mut warnings = Vec::new();

    let checklist = can_advance(&request.checklist_items, &request.completion);
    blockers.extend(checklist.blocker_message());

    let wip = validate_wip_limit(&request.to_stage, request.current_occupancy);
    blockers.extend(wip.blocker_message());

    let appointments = validate_appointment_requirement(
        &request.entry.id,
        &request.to_stage,
        &request.appointment_candidates,
    );
    blockers.extend(appointments.blocker_message());

    let criteria = classify_all(
        &request.active_criteria,
        &request.to_stage.id,
        &request.entry.context,
    );
    blockers.extend(
        criteria
            .iter()
            .filter(|result| result.is_blocking())
            .map(|result| result.message.clone()),
    );

    if request.is_backward() {
        warnings.push(BACKWARD_MOVE_WARNING.to_string());
    }

    let verdict = TransitionVerdict::new(blockers, warnings)
        .with_criteria(criteria)
        .with_appointment_selection(appointments.requires_selection);

    debug!(
        record_id = %request.entry.id,
        from_stage = %request.from_stage.id,
        to_stage = %request.to_stage.id,
        can_move = verdict.can_move,
        blockers = verdict.blockers.len(),
        warnings = verdict.warnings.len(),
        "Movement validated"
    );

    verdict
}
