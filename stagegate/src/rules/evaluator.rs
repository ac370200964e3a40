//! Recursive evaluation of rule trees and classification of criteria.

use super::{Logic, Operator, RecordContext, RuleConfig};
use crate::core::{CriteriaResult, CriteriaStatus, Criterion};
use crate::utils::timestamps::parse_timestamp;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Evaluates a validated rule against a record.
///
/// Missing data never passes: a comparison against an absent field is
/// `false`, and a composite without children is `false` for both AND and OR.
#[must_use]
pub fn evaluate(rule: &RuleConfig, context: &RecordContext) -> bool {
    match rule {
        RuleConfig::Leaf {
            field,
            operator,
            value,
        } => evaluate_leaf(context.lookup(field), *operator, value.as_ref()),
        RuleConfig::Composite { children, .. } if children.is_empty() => false,
        RuleConfig::Composite {
            logic: Logic::And,
            children,
        } => children.iter().all(|child| evaluate(child, context)),
        RuleConfig::Composite {
            logic: Logic::Or,
            children,
        } => children.iter().any(|child| evaluate(child, context)),
    }
}

fn evaluate_leaf(actual: Option<&Value>, operator: Operator, expected: Option<&Value>) -> bool {
    match (operator, actual, expected) {
        (Operator::Exists, actual, _) => actual.is_some(),
        (Operator::NotExists, actual, _) => actual.is_none(),
        (_, None, _) | (_, _, None) => false,
        (Operator::Gt, Some(a), Some(e)) => ordering(a, e).is_some_and(Ordering::is_gt),
        (Operator::Lt, Some(a), Some(e)) => ordering(a, e).is_some_and(Ordering::is_lt),
        (Operator::Gte, Some(a), Some(e)) => ordering(a, e).is_some_and(Ordering::is_ge),
        (Operator::Lte, Some(a), Some(e)) => ordering(a, e).is_some_and(Ordering::is_le),
        (Operator::Eq, Some(a), Some(e)) => values_equal(a, e),
        (Operator::Ne, Some(a), Some(e)) => !values_equal(a, e),
        (Operator::Contains, Some(a), Some(e)) => contains(a, e),
    }
}

// Numeric strings are coerced; integers keep their exact value.
fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => s.trim().parse::<Number>().ok(),
        _ => None,
    }
}

// Integers compare exactly; only a float on either side goes through f64.
fn compare_numbers(a: &Number, e: &Number) -> Option<Ordering> {
    if let (Some(a), Some(e)) = (a.as_i64(), e.as_i64()) {
        return Some(a.cmp(&e));
    }
    if let (Some(a), Some(e)) = (a.as_u64(), e.as_u64()) {
        return Some(a.cmp(&e));
    }
    a.as_f64()?.partial_cmp(&e.as_f64()?)
}

// Numbers compare numerically; otherwise both sides must read as timestamps.
fn ordering(actual: &Value, expected: &Value) -> Option<Ordering> {
    if let (Some(a), Some(e)) = (as_number(actual), as_number(expected)) {
        return compare_numbers(&a, &e);
    }
    let a = parse_timestamp(actual.as_str()?).ok()?;
    let e = parse_timestamp(expected.as_str()?).ok()?;
    Some(a.cmp(&e))
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(e)) => compare_numbers(a, e) == Some(Ordering::Equal),
        _ => actual == expected,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::String(haystack) => expected
            .as_str()
            .is_some_and(|needle| haystack.contains(needle)),
        Value::Array(items) => items.iter().any(|item| values_equal(item, expected)),
        _ => false,
    }
}

/// Classifies a criterion against a record.
///
/// Order of precedence:
/// 1. malformed configuration is `blocked`, whatever `required` says
/// 2. a kind that does not apply to the record is `not_applicable`
/// 3. a rule reading a not-yet-computed field is `pending`
/// 4. a holding rule is `satisfied`
/// 5. a failing required rule is `blocked`, a failing optional one `pending`
#[must_use]
pub fn classify(criterion: &Criterion, context: &RecordContext) -> CriteriaResult {
    let rule = match criterion.rule() {
        Ok(rule) => rule,
        Err(err) => {
            warn!(
                criterion_id = %criterion.id,
                stage_id = %criterion.stage_id,
                error = %err,
                "Criterion has a malformed rule"
            );
            return CriteriaResult::new(
                criterion,
                CriteriaStatus::Blocked,
                format!("Criterion '{}' is misconfigured: {err}", criterion.name),
            );
        }
    };

    if !criterion.kind.applies_to(context) {
        return CriteriaResult::new(
            criterion,
            CriteriaStatus::NotApplicable,
            format!(
                "Criterion '{}' does not apply to this record ({})",
                criterion.name, criterion.kind
            ),
        );
    }

    if let Some(field) = rule.fields().into_iter().find(|f| context.is_pending(f)) {
        return CriteriaResult::new(
            criterion,
            CriteriaStatus::Pending,
            format!(
                "Criterion '{}' is waiting for '{field}' to be computed",
                criterion.name
            ),
        );
    }

    let result = if evaluate(&rule, context) {
        CriteriaResult::new(
            criterion,
            CriteriaStatus::Satisfied,
            format!("Criterion '{}' is met", criterion.name),
        )
    } else if criterion.required {
        CriteriaResult::new(
            criterion,
            CriteriaStatus::Blocked,
            format!("Criterion '{}' is not met", criterion.name),
        )
    } else {
        CriteriaResult::new(
            criterion,
            CriteriaStatus::Pending,
            format!("Optional criterion '{}' is not met yet", criterion.name),
        )
    };

    debug!(
        criterion_id = %criterion.id,
        status = %result.status,
        "Criterion classified"
    );
    result
}

/// Classifies the active criteria of `stage_id`, in criterion order.
#[must_use]
pub fn classify_all(
    criteria: &[Criterion],
    stage_id: &str,
    context: &RecordContext,
) -> Vec<CriteriaResult> {
    let mut active: Vec<&Criterion> = criteria
        .iter()
        .filter(|c| c.active && c.stage_id == stage_id)
        .collect();
    active.sort_by_key(|c| c.order);
    active.into_iter().map(|c| classify(c, context)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CriterionKind;
    use crate::rules::RuleNode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ctx(value: Value) -> RecordContext {
        RecordContext::from_value(value).unwrap()
    }

    fn score_rule() -> RuleConfig {
        RuleConfig::leaf("score", Operator::Gte, json!(60))
    }

    #[test]
    fn test_leaf_score_scenario() {
        assert!(evaluate(&score_rule(), &ctx(json!({"score": 72}))));
        assert!(!evaluate(&score_rule(), &ctx(json!({}))));
        assert!(!evaluate(&score_rule(), &ctx(json!({"score": null}))));
    }

    #[test]
    fn test_ordering_operators() {
        let c = ctx(json!({"n": 10, "s": "10"}));
        assert!(evaluate(&RuleConfig::leaf("n", Operator::Gt, json!(9)), &c));
        assert!(!evaluate(&RuleConfig::leaf("n", Operator::Gt, json!(10)), &c));
        assert!(evaluate(&RuleConfig::leaf("n", Operator::Lt, json!(10.5)), &c));
        assert!(evaluate(&RuleConfig::leaf("n", Operator::Lte, json!(10)), &c));
        assert!(evaluate(&RuleConfig::leaf("s", Operator::Gte, json!(10)), &c));
    }

    #[test]
    fn test_date_comparison() {
        let c = ctx(json!({"closed_at": "2024-03-15T12:00:00Z", "label": "soon"}));
        assert!(evaluate(
            &RuleConfig::leaf("closed_at", Operator::Gt, json!("2024-03-01")),
            &c
        ));
        assert!(evaluate(
            &RuleConfig::leaf("closed_at", Operator::Lt, json!("2024-04-01T00:00:00Z")),
            &c
        ));
        // Neither numbers nor dates: fails closed.
        assert!(!evaluate(&RuleConfig::leaf("label", Operator::Gt, json!("a")), &c));
        assert!(!evaluate(&RuleConfig::leaf("label", Operator::Lt, json!("z")), &c));
    }

    #[test]
    fn test_equality_operators() {
        let c = ctx(json!({"score": 60, "status": "won", "flags": {"a": true}}));
        assert!(evaluate(&RuleConfig::leaf("score", Operator::Eq, json!(60.0)), &c));
        assert!(evaluate(&RuleConfig::leaf("status", Operator::Eq, json!("won")), &c));
        assert!(evaluate(&RuleConfig::leaf("status", Operator::Ne, json!("lost")), &c));
        assert!(!evaluate(&RuleConfig::leaf("status", Operator::Eq, json!("Won")), &c));
        assert!(evaluate(&RuleConfig::leaf("flags", Operator::Eq, json!({"a": true})), &c));
        // Absent field fails closed for != as well.
        assert!(!evaluate(&RuleConfig::leaf("missing", Operator::Ne, json!("x")), &c));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        // Both values round to the same f64.
        let c = ctx(json!({"external_id": 9_007_199_254_740_992_u64, "big": u64::MAX}));
        let id = |op, v| RuleConfig::leaf("external_id", op, v);

        assert!(!evaluate(&id(Operator::Eq, json!(9_007_199_254_740_993_u64)), &c));
        assert!(evaluate(&id(Operator::Ne, json!(9_007_199_254_740_993_u64)), &c));
        assert!(evaluate(&id(Operator::Lt, json!(9_007_199_254_740_993_u64)), &c));
        assert!(!evaluate(&id(Operator::Gte, json!(9_007_199_254_740_993_u64)), &c));
        assert!(evaluate(&id(Operator::Eq, json!(9_007_199_254_740_992_u64)), &c));
        assert!(evaluate(&id(Operator::Gt, json!("9007199254740991")), &c));
        assert!(evaluate(&id(Operator::Gt, json!(-1)), &c));

        let big = RuleConfig::leaf("big", Operator::Gt, json!(u64::MAX - 1));
        assert!(evaluate(&big, &c));
        assert!(evaluate(&RuleConfig::leaf("big", Operator::Eq, json!(u64::MAX)), &c));
    }

    #[test]
    fn test_contains() {
        let c = ctx(json!({"notes": "budget approved by CFO", "tags": ["vip", 3], "n": 5}));
        assert!(evaluate(&RuleConfig::leaf("notes", Operator::Contains, json!("approved")), &c));
        assert!(!evaluate(&RuleConfig::leaf("notes", Operator::Contains, json!("denied")), &c));
        assert!(evaluate(&RuleConfig::leaf("tags", Operator::Contains, json!("vip")), &c));
        assert!(evaluate(&RuleConfig::leaf("tags", Operator::Contains, json!(3.0)), &c));
        assert!(!evaluate(&RuleConfig::leaf("tags", Operator::Contains, json!("new")), &c));
        assert!(!evaluate(&RuleConfig::leaf("n", Operator::Contains, json!(5)), &c));
    }

    #[test]
    fn test_existence_operators() {
        let c = ctx(json!({"budget": 1000, "owner": null}));
        assert!(evaluate(&RuleConfig::exists("budget"), &c));
        assert!(!evaluate(&RuleConfig::exists("owner"), &c));
        assert!(evaluate(&RuleConfig::not_exists("owner"), &c));
        assert!(evaluate(&RuleConfig::not_exists("missing"), &c));
    }

    #[test]
    fn test_composite_logic() {
        let c = RecordContext::new();
        let t = RuleConfig::not_exists("x");
        let f = RuleConfig::exists("x");

        assert!(!evaluate(&RuleConfig::all(vec![t.clone(), f.clone()]), &c));
        assert!(evaluate(&RuleConfig::any(vec![t.clone(), f.clone()]), &c));
        assert!(evaluate(&RuleConfig::all(vec![t.clone(), t.clone()]), &c));
        assert!(!evaluate(&RuleConfig::any(vec![f.clone(), f]), &c));
        assert!(!evaluate(&RuleConfig::all(vec![]), &c));
        assert!(!evaluate(&RuleConfig::any(vec![]), &c));
        assert!(evaluate(&RuleConfig::all(vec![RuleConfig::any(vec![t])]), &c));
    }

    fn criterion(config: impl Into<RuleNode>) -> Criterion {
        Criterion::new("cr-1", "proposal", "Lead score", CriterionKind::RecordField, config)
    }

    #[test]
    fn test_classify_statuses() {
        let met = ctx(json!({"score": 72}));
        let unmet = ctx(json!({"score": 12}));

        let required = criterion(score_rule());
        assert_eq!(classify(&required, &met).status, CriteriaStatus::Satisfied);

        let blocked = classify(&required, &unmet);
        assert_eq!(blocked.status, CriteriaStatus::Blocked);
        assert_eq!(blocked.message, "Criterion 'Lead score' is not met");

        let optional = criterion(score_rule()).optional();
        let result = classify(&optional, &unmet);
        assert_eq!(result.status, CriteriaStatus::Pending);
        assert!(!result.is_blocking());
    }

    #[test]
    fn test_classify_prevalidated_criterion() {
        let c = Criterion::try_new(
            "cr-1",
            "proposal",
            "Lead score",
            CriterionKind::RecordField,
            score_rule(),
        )
        .unwrap();
        assert_eq!(classify(&c, &ctx(json!({"score": 72}))).status, CriteriaStatus::Satisfied);
        assert_eq!(classify(&c, &ctx(json!({"score": 7}))).status, CriteriaStatus::Blocked);
    }

    #[test]
    fn test_classify_malformed_is_blocked_not_raised() {
        let bad: RuleNode = serde_json::from_value(json!({
            "logic": "AND",
            "children": [{"field": "score", "operator": "~=", "value": 1}]
        }))
        .unwrap();
        let result = classify(&criterion(bad).optional(), &ctx(json!({"score": 1})));

        assert_eq!(result.status, CriteriaStatus::Blocked);
        assert!(result.is_blocking());
        assert_eq!(
            result.message,
            "Criterion 'Lead score' is misconfigured: unknown operator '~=' at $.children[0]"
        );
    }

    #[test]
    fn test_classify_not_applicable() {
        let c = Criterion::new(
            "cr-2",
            "proposal",
            "Open deals",
            CriterionKind::RelationshipAggregate,
            RuleConfig::leaf("open_deals", Operator::Gt, json!(0)),
        );
        let result = classify(&c, &RecordContext::new().without_relationships());
        assert_eq!(result.status, CriteriaStatus::NotApplicable);
        assert!(!result.is_blocking());
    }

    #[test]
    fn test_classify_pending_metric() {
        let c = Criterion::new(
            "cr-3",
            "proposal",
            "Calls logged",
            CriterionKind::ActivityMetric,
            RuleConfig::leaf("calls_logged", Operator::Gte, json!(3)),
        );
        let context = RecordContext::new().with_pending_field("calls_logged");

        let result = classify(&c, &context);
        assert_eq!(result.status, CriteriaStatus::Pending);
        assert!(result.is_blocking());
        assert!(!classify(&c.optional(), &context).is_blocking());
    }

    #[test]
    fn test_classify_all_filters_and_orders() {
        let criteria = vec![
            criterion(score_rule()).with_order(2),
            Criterion::new("cr-0", "proposal", "Budget", CriterionKind::RecordField,
                RuleConfig::exists("budget")).with_order(1),
            Criterion::new("cr-9", "proposal", "Old", CriterionKind::RecordField,
                RuleConfig::exists("x")).inactive(),
            Criterion::new("cr-8", "negotiation", "Other", CriterionKind::RecordField,
                RuleConfig::exists("x")),
        ];

        let results = classify_all(&criteria, "proposal", &ctx(json!({"score": 90})));
        let ids: Vec<&str> = results.iter().map(|r| r.criterion_id.as_str()).collect();
        assert_eq!(ids, vec!["cr-0", "cr-1"]);
        assert_eq!(results[0].status, CriteriaStatus::Blocked);
        assert_eq!(results[1].status, CriteriaStatus::Satisfied);
    }
}
