//! Testing utilities for code that builds on stagegate.
//!
//! This module provides:
//! - Fixture builders for stages, checklist items, appointments and entries
//! - Assertions over transition verdicts

mod assertions;
mod fixtures;

pub use assertions::{assert_blocked_by, assert_can_move, assert_warned};
pub use fixtures::{appointment, checklist_item, entry, stage, MovementFixture};
