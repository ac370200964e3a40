//! Utility functions for timestamps and identifiers.

pub mod timestamps;

pub use timestamps::{iso_timestamp, parse_timestamp, Timestamp, TimestampError};

use uuid::Uuid;

/// Generates a time-ordered identifier for one validation run.
#[must_use]
pub fn generate_validation_id() -> Uuid {
    Uuid::now_v7()
}
