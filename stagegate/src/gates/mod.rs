//! Gates that each decide one precondition of a stage transition.
//!
//! Every gate is a pure function over caller-supplied snapshots. A failing
//! gate is a normal result, never an error.

mod appointments;
mod checklist;
mod wip;

pub use appointments::{
    validate_appointment_requirement, AppointmentBinding, AppointmentCheck,
    APPOINTMENT_REQUIRED_MESSAGE, APPOINTMENT_SELECTION_MESSAGE,
};
pub use checklist::{
    can_advance, completion_percentage, missing_required_count, validate_stage_advancement,
    ChecklistCheck,
};
pub use wip::{validate_wip_limit, WipCheck};
