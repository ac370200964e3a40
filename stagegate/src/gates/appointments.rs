//! Appointment binding precondition.

use crate::core::{Appointment, Stage};
use crate::errors::StagegateError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Message when a stage needs an appointment and the record has none.
pub const APPOINTMENT_REQUIRED_MESSAGE: &str =
    "An appointment must be scheduled to move into this stage";

/// Message when several appointments could be bound.
pub const APPOINTMENT_SELECTION_MESSAGE: &str = "Select which appointment to use";

/// Result of resolving a stage's appointment requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentCheck {
    /// Record the check was made for.
    pub record_id: String,
    /// Target stage.
    pub stage_id: String,
    /// False only when an appointment is required and none exists.
    pub valid: bool,
    /// Candidate appointments, earliest first.
    pub appointments: Vec<Appointment>,
    /// True when more than one candidate could be bound.
    pub requires_selection: bool,
    /// Explanation for the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An appointment chosen to satisfy a stage's requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentBinding {
    /// Record being moved.
    pub record_id: String,
    /// Target stage.
    pub stage_id: String,
    /// The bound appointment.
    pub appointment: Appointment,
}

impl AppointmentCheck {
    /// Returns the appointment bound without asking, if exactly one exists.
    #[must_use]
    pub fn bound_appointment(&self) -> Option<&Appointment> {
        match self.appointments.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Returns the blocker for this check, if it fails.
    #[must_use]
    pub fn blocker_message(&self) -> Option<String> {
        if self.valid {
            None
        } else {
            self.message.clone()
        }
    }

    /// Resolves a selection to a binding.
    ///
    /// `appointment_id` must be one of the candidates.
    pub fn select(&self, appointment_id: &str) -> Result<AppointmentBinding, StagegateError> {
        self.appointments
            .iter()
            .find(|a| a.id == appointment_id)
            .map(|appointment| AppointmentBinding {
                record_id: self.record_id.clone(),
                stage_id: self.stage_id.clone(),
                appointment: appointment.clone(),
            })
            .ok_or_else(|| StagegateError::UnknownAppointment {
                record_id: self.record_id.clone(),
                appointment_id: appointment_id.to_string(),
            })
    }
}

/// Decides whether `target`'s appointment precondition is satisfiable.
///
/// | requires | candidates | valid | requires_selection |
/// |---|---|---|---|
/// | no  | any | true  | false |
/// | yes | 0   | false | false |
/// | yes | 1   | true  | false |
/// | yes | 2+  | true  | true  |
///
/// Candidates are supplied by the caller. Appointments of other records are
/// ignored.
#[must_use]
pub fn validate_appointment_requirement(
    record_id: &str,
    target: &Stage,
    candidates: &[Appointment],
) -> AppointmentCheck {
    let mut check = AppointmentCheck {
        record_id: record_id.to_string(),
        stage_id: target.id.clone(),
        valid: true,
        appointments: Vec::new(),
        requires_selection: false,
        message: None,
    };

    if !target.requires_appointment {
        return check;
    }

    let mut own: Vec<Appointment> = candidates
        .iter()
        .filter(|a| a.record_id == record_id)
        .cloned()
        .collect();
    if own.len() != candidates.len() {
        debug!(
            record_id,
            ignored = candidates.len() - own.len(),
            "Ignoring appointments of other records"
        );
    }
    own.sort_by_key(|a| a.scheduled_at);

    match own.len() {
        0 => {
            check.valid = false;
            check.message = Some(APPOINTMENT_REQUIRED_MESSAGE.to_string());
        }
        1 => {}
        _ => {
            check.requires_selection = true;
            check.message = Some(APPOINTMENT_SELECTION_MESSAGE.to_string());
        }
    }
    check.appointments = own;
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AppointmentStatus;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn demo_stage() -> Stage {
        Stage::new("demo", "Demo", 2).with_appointment_required()
    }

    fn appt(id: &str, record_id: &str, day: u32) -> Appointment {
        let at = Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap();
        Appointment::new(id, record_id, at, format!("Meeting {id}"))
    }

    #[test]
    fn test_not_required_is_valid() {
        let stage = Stage::new("lead", "Lead", 1);
        let check = validate_appointment_requirement("rec-1", &stage, &[]);
        assert!(check.valid);
        assert!(!check.requires_selection);
        assert_eq!(check.message, None);
    }

    #[test]
    fn test_required_without_candidates_is_invalid() {
        let check = validate_appointment_requirement("rec-1", &demo_stage(), &[]);
        assert!(!check.valid);
        assert!(!check.requires_selection);
        assert_eq!(check.blocker_message().as_deref(), Some(APPOINTMENT_REQUIRED_MESSAGE));
    }

    #[test]
    fn test_single_candidate_auto_binds() {
        let only = appt("a1", "rec-1", 3).with_status(AppointmentStatus::Cancelled);
        let check = validate_appointment_requirement("rec-1", &demo_stage(), &[only.clone()]);
        assert!(check.valid);
        assert!(!check.requires_selection);
        assert_eq!(check.message, None);
        assert_eq!(check.bound_appointment(), Some(&only));
    }

    #[test]
    fn test_multiple_candidates_require_selection() {
        let later = appt("a2", "rec-1", 9);
        let earlier = appt("a1", "rec-1", 2);
        let check =
            validate_appointment_requirement("rec-1", &demo_stage(), &[later, earlier]);

        assert!(check.valid);
        assert!(check.requires_selection);
        assert_eq!(check.message.as_deref(), Some(APPOINTMENT_SELECTION_MESSAGE));
        assert_eq!(check.bound_appointment(), None);

        let ids: Vec<&str> = check.appointments.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn test_other_records_are_ignored() {
        let check = validate_appointment_requirement(
            "rec-1",
            &demo_stage(),
            &[appt("a1", "rec-2", 1), appt("a2", "rec-1", 2)],
        );
        assert!(check.valid);
        assert!(!check.requires_selection);
        assert_eq!(check.bound_appointment().map(|a| a.id.as_str()), Some("a2"));
    }

    #[test]
    fn test_select_candidate() {
        let check = validate_appointment_requirement(
            "rec-1",
            &demo_stage(),
            &[appt("a1", "rec-1", 1), appt("a2", "rec-1", 2)],
        );

        let binding = check.select("a2").unwrap();
        assert_eq!(binding.record_id, "rec-1");
        assert_eq!(binding.stage_id, "demo");
        assert_eq!(binding.appointment.id, "a2");

        let err = check.select("a9").unwrap_err();
        assert!(matches!(err, StagegateError::UnknownAppointment { .. }));
    }
}
