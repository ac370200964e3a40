//! The aggregated answer for one transition request.

use super::CriteriaResult;
use serde::{Deserialize, Serialize};

/// Advisory added whenever a move goes to an earlier stage.
pub const BACKWARD_MOVE_WARNING: &str = "This move moves the record backward in the pipeline";

/// Result of validating one movement.
///
/// `blockers` and `warnings` are ordered: checklist, WIP, appointments, then
/// criteria in criterion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionVerdict {
    /// True iff there are no blockers.
    pub can_move: bool,
    /// Reasons the move is not allowed.
    pub blockers: Vec<String>,
    /// Advisories that do not prevent the move.
    pub warnings: Vec<String>,
    /// Per-criterion classification for the target stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<CriteriaResult>,
    /// The caller must choose which appointment to bind before committing.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub appointment_selection_required: bool,
}

impl TransitionVerdict {
    /// Creates a verdict from blockers and warnings.
    #[must_use]
    pub fn new(blockers: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            can_move: blockers.is_empty(),
            blockers,
            warnings,
            criteria: Vec::new(),
            appointment_selection_required: false,
        }
    }

    /// Attaches criteria results.
    #[must_use]
    pub fn with_criteria(mut self, criteria: Vec<CriteriaResult>) -> Self {
        self.criteria = criteria;
        self
    }

    /// Marks that an appointment must be selected.
    #[must_use]
    pub fn with_appointment_selection(mut self, required: bool) -> Self {
        self.appointment_selection_required = required;
        self
    }

    /// Returns true if at least one blocker is present.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.can_move
    }

    /// Returns true if the move goes backward.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        self.warnings.iter().any(|w| w == BACKWARD_MOVE_WARNING)
    }
}
