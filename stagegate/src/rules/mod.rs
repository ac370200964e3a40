//! Rule evaluation over typed condition trees.
//!
//! Rules travel in their stored form, [`RuleNode`], and are validated into
//! [`RuleConfig`] before evaluation:
//!
//! - [`evaluate`] decides a validated rule against a [`RecordContext`]
//! - [`classify`] turns a whole [`Criterion`](crate::core::Criterion) into a
//!   [`CriteriaResult`](crate::core::CriteriaResult), failing closed on
//!   malformed configuration

mod config;
mod context;
mod evaluator;

pub use config::{Logic, Operator, RuleConfig, RuleNode};
pub use context::RecordContext;
pub use evaluator::{classify, classify_all, evaluate};
