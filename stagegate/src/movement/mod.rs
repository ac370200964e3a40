//! Movement orchestration: every gate over one transition request.

mod orchestrator;
mod request;

pub use orchestrator::validate_movement;
pub use request::MovementRequest;
