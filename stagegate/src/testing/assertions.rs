//! Test assertions for transition verdicts.

use crate::core::TransitionVerdict;

/// Asserts that the move is allowed.
pub fn assert_can_move(verdict: &TransitionVerdict) {
    assert!(
        verdict.can_move,
        "Expected move to be allowed, got blockers: {:?}",
        verdict.blockers
    );
}

/// Asserts that the move is blocked and some blocker contains `needle`.
pub fn assert_blocked_by(verdict: &TransitionVerdict, needle: &str) {
    assert!(
        !verdict.can_move,
        "Expected move to be blocked by '{}', but it is allowed",
        needle
    );
    assert!(
        verdict.blockers.iter().any(|b| b.contains(needle)),
        "Expected a blocker containing '{}', got: {:?}",
        needle,
        verdict.blockers
    );
}

/// Asserts that some warning contains `needle`.
pub fn assert_warned(verdict: &TransitionVerdict, needle: &str) {
    assert!(
        verdict.warnings.iter().any(|w| w.contains(needle)),
        "Expected a warning containing '{}', got: {:?}",
        needle,
        verdict.warnings
    );
}
