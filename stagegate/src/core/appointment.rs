//! Appointments that can satisfy a stage's scheduling precondition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, not yet confirmed.
    #[default]
    Scheduled,
    /// Confirmed by the attendee.
    Confirmed,
    /// Took place.
    Completed,
    /// Called off.
    Cancelled,
    /// The attendee did not show up.
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::NoShow => write!(f, "no_show"),
        }
    }
}

/// An appointment belonging to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Appointment identity.
    pub id: String,
    /// Owning record.
    pub record_id: String,
    /// When the appointment takes place.
    pub scheduled_at: DateTime<Utc>,
    /// Lifecycle state.
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Display title.
    pub title: String,
}

impl Appointment {
    /// Creates a new scheduled appointment.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        record_id: impl Into<String>,
        scheduled_at: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            record_id: record_id.into(),
            scheduled_at,
            status: AppointmentStatus::Scheduled,
            title: title.into(),
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_appointment_roundtrip_json() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let appt = Appointment::new("a1", "rec-1", at, "Demo call")
            .with_status(AppointmentStatus::NoShow);

        let json = serde_json::to_value(&appt).unwrap();
        assert_eq!(json["status"], "no_show");

        let back: Appointment = serde_json::from_value(json).unwrap();
        assert_eq!(back, appt);
    }

    #[test]
    fn test_status_defaults_to_scheduled() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":"a1","record_id":"r","scheduled_at":"2024-03-01T09:30:00Z","title":"Call"}"#,
        )
        .unwrap();
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
    }
}
