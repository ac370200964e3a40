//! Event sinks for movement observability.
//!
//! Sinks are injected into the [`MovementService`](crate::service::MovementService);
//! there is no process-wide sink.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// A movement was validated and allowed.
pub const MOVEMENT_VALIDATED: &str = "movement.validated";

/// A movement was validated and blocked.
pub const MOVEMENT_BLOCKED: &str = "movement.blocked";

/// A movement could not be validated because an input was unavailable.
pub const MOVEMENT_UNAVAILABLE: &str = "movement.unavailable";
