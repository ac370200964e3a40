//! Rule configuration: the stored node shape and its validated form.

use crate::errors::{RuleConfigError, RuleFault};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Comparison operator of a leaf rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// Substring or list membership.
    Contains,
    /// Field holds a non-null value.
    Exists,
    /// Field is absent or null.
    NotExists,
}

impl Operator {
    /// Parses a stored operator name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Gte),
            "<=" => Some(Self::Lte),
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "contains" => Some(Self::Contains),
            "exists" => Some(Self::Exists),
            "not_exists" => Some(Self::NotExists),
            _ => None,
        }
    }

    /// Returns the stored name of the operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Contains => "contains",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
        }
    }

    /// Returns true for `exists` and `not_exists`, which ignore `value`.
    #[must_use]
    pub fn is_existence(&self) -> bool {
        matches!(self, Self::Exists | Self::NotExists)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a composite combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    /// Every child must hold.
    And,
    /// At least one child must hold.
    Or,
}

impl Logic {
    /// Parses a stored logic name. Case-insensitive.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if name.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    /// Returns the stored name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule node as stored by the external layer.
///
/// Either a leaf `{field, operator, value}` or a composite `{children, logic}`.
/// Every key is optional so that any stored shape deserializes; structural
/// problems are reported by converting into [`RuleConfig`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleNode {
    /// Context field looked up by a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Leaf operator name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Leaf comparison value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Composite children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RuleNode>>,
    /// Composite logic name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
}

impl RuleNode {
    fn is_leaf_shaped(&self) -> bool {
        self.field.is_some() || self.operator.is_some() || self.value.is_some()
    }

    fn is_composite_shaped(&self) -> bool {
        self.children.is_some() || self.logic.is_some()
    }
}

/// A validated rule tree.
///
/// Serializes through [`RuleNode`], so stored JSON round-trips exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleNode", into = "RuleNode")]
pub enum RuleConfig {
    /// A single comparison against one context field.
    Leaf {
        /// Context field to look up.
        field: String,
        /// Comparison operator.
        operator: Operator,
        /// Value compared against. `None` only for existence operators.
        value: Option<Value>,
    },
    /// AND/OR over child rules.
    Composite {
        /// How the children combine.
        logic: Logic,
        /// Child rules. An empty list never holds.
        children: Vec<RuleConfig>,
    },
}

impl RuleConfig {
    /// Creates a comparison leaf.
    #[must_use]
    pub fn leaf(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        let value = if operator.is_existence() { None } else { Some(value) };
        Self::Leaf {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Creates an `exists` leaf.
    #[must_use]
    pub fn exists(field: impl Into<String>) -> Self {
        Self::Leaf {
            field: field.into(),
            operator: Operator::Exists,
            value: None,
        }
    }

    /// Creates a `not_exists` leaf.
    #[must_use]
    pub fn not_exists(field: impl Into<String>) -> Self {
        Self::Leaf {
            field: field.into(),
            operator: Operator::NotExists,
            value: None,
        }
    }

    /// Creates an AND composite.
    #[must_use]
    pub fn all(children: Vec<Self>) -> Self {
        Self::Composite {
            logic: Logic::And,
            children,
        }
    }

    /// Creates an OR composite.
    #[must_use]
    pub fn any(children: Vec<Self>) -> Self {
        Self::Composite {
            logic: Logic::Or,
            children,
        }
    }

    /// Returns every field referenced by a leaf in the tree, in tree order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Leaf { field, .. } => out.push(field),
            Self::Composite { children, .. } => {
                for child in children {
                    child.collect_fields(out);
                }
            }
        }
    }

    fn from_node(node: RuleNode, path: &str) -> Result<Self, RuleConfigError> {
        match (node.is_leaf_shaped(), node.is_composite_shaped()) {
            (true, true) => Err(RuleConfigError::new(path, RuleFault::AmbiguousNode)),
            (false, false) => Err(RuleConfigError::new(path, RuleFault::EmptyNode)),
            (false, true) => {
                let Some(logic_name) = node.logic else {
                    return Err(RuleConfigError::new(path, RuleFault::MissingLogic));
                };
                let logic = Logic::parse(&logic_name).ok_or_else(|| {
                    RuleConfigError::new(path, RuleFault::UnknownLogic(logic_name.clone()))
                })?;
                let children = node
                    .children
                    .unwrap_or_default()
                    .into_iter()
                    .enumerate()
                    .map(|(i, child)| Self::from_node(child, &format!("{path}.children[{i}]")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Composite { logic, children })
            }
            (true, false) => {
                let Some(operator_name) = node.operator else {
                    return Err(RuleConfigError::new(path, RuleFault::MissingOperator));
                };
                let operator = Operator::parse(&operator_name).ok_or_else(|| {
                    RuleConfigError::new(path, RuleFault::UnknownOperator(operator_name.clone()))
                })?;
                let field = match node.field {
                    Some(field) if !field.trim().is_empty() => field,
                    _ => return Err(RuleConfigError::new(path, RuleFault::MissingField)),
                };
                if operator.is_existence() {
                    return Ok(Self::Leaf {
                        field,
                        operator,
                        value: None,
                    });
                }
                match node.value {
                    Some(value) => Ok(Self::Leaf {
                        field,
                        operator,
                        value: Some(value),
                    }),
                    None => Err(RuleConfigError::new(
                        path,
                        RuleFault::MissingValue(operator_name),
                    )),
                }
            }
        }
    }
}

impl TryFrom<RuleNode> for RuleConfig {
    type Error = RuleConfigError;

    fn try_from(node: RuleNode) -> Result<Self, Self::Error> {
        Self::from_node(node, "$")
    }
}

impl From<RuleConfig> for RuleNode {
    fn from(config: RuleConfig) -> Self {
        match config {
            RuleConfig::Leaf {
                field,
                operator,
                value,
            } => Self {
                field: Some(field),
                operator: Some(operator.as_str().to_string()),
                value,
                children: None,
                logic: None,
            },
            RuleConfig::Composite { logic, children } => Self {
                field: None,
                operator: None,
                value: None,
                children: Some(children.into_iter().map(Self::from).collect()),
                logic: Some(logic.as_str().to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(value: Value) -> RuleNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_operator_names() {
        for name in [">", "<", ">=", "<=", "==", "!=", "contains", "exists", "not_exists"] {
            let op = Operator::parse(name).unwrap();
            assert_eq!(op.as_str(), name);
        }
        assert_eq!(Operator::parse("between"), None);
        assert_eq!(Operator::parse("EXISTS"), None);
    }

    #[test]
    fn test_logic_parse_is_case_insensitive() {
        assert_eq!(Logic::parse("AND"), Some(Logic::And));
        assert_eq!(Logic::parse("or"), Some(Logic::Or));
        assert_eq!(Logic::parse("XOR"), None);
    }

    #[test]
    fn test_nested_rule_json_roundtrip() {
        let stored = json!({
            "children": [
                {"field": "score", "operator": ">=", "value": 60},
                {
                    "children": [
                        {"field": "tags", "operator": "contains", "value": "vip"},
                        {"field": "budget", "operator": "exists"}
                    ],
                    "logic": "OR"
                }
            ],
            "logic": "AND"
        });

        let rule: RuleConfig = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(
            rule,
            RuleConfig::all(vec![
                RuleConfig::leaf("score", Operator::Gte, json!(60)),
                RuleConfig::any(vec![
                    RuleConfig::leaf("tags", Operator::Contains, json!("vip")),
                    RuleConfig::exists("budget"),
                ]),
            ])
        );
        assert_eq!(serde_json::to_value(&rule).unwrap(), stored);
    }

    #[test]
    fn test_existence_leaf_drops_value() {
        let rule = RuleConfig::try_from(node(json!({
            "field": "budget", "operator": "not_exists", "value": 3
        })))
        .unwrap();
        assert_eq!(rule, RuleConfig::not_exists("budget"));
    }

    #[test]
    fn test_malformed_nodes_are_rejected() {
        let cases = [
            (json!({"field": "x", "operator": "between", "value": 1}), "$",
             RuleFault::UnknownOperator("between".into())),
            (json!({"operator": ">", "value": 1}), "$", RuleFault::MissingField),
            (json!({"operator": "exists"}), "$", RuleFault::MissingField),
            (json!({"field": "x", "value": 1}), "$", RuleFault::MissingOperator),
            (json!({"field": "x", "operator": ">"}), "$", RuleFault::MissingValue(">".into())),
            (json!({"children": []}), "$", RuleFault::MissingLogic),
            (json!({"children": [], "logic": "XOR"}), "$", RuleFault::UnknownLogic("XOR".into())),
            (json!({"field": "x", "operator": "exists", "logic": "AND"}), "$", RuleFault::AmbiguousNode),
            (json!({}), "$", RuleFault::EmptyNode),
            (json!({"logic": "AND", "children": [{"field": "a", "operator": "exists"}, {"field": "b"}]}),
             "$.children[1]", RuleFault::MissingOperator),
        ];

        for (value, path, fault) in cases {
            let err = RuleConfig::try_from(node(value.clone())).unwrap_err();
            assert_eq!(err, RuleConfigError::new(path, fault), "case {value}");
        }
    }

    #[test]
    fn test_deserialize_rule_config_reports_fault() {
        let err = serde_json::from_value::<RuleConfig>(json!({"field": "x", "operator": "~"}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown operator '~'"));
    }

    #[test]
    fn test_empty_composite_is_structurally_valid() {
        let rule = RuleConfig::try_from(node(json!({"logic": "OR"}))).unwrap();
        assert_eq!(rule, RuleConfig::any(vec![]));
    }

    #[test]
    fn test_fields_in_tree_order() {
        let rule = RuleConfig::all(vec![
            RuleConfig::exists("a"),
            RuleConfig::any(vec![RuleConfig::exists("b"), RuleConfig::exists("c")]),
        ]);
        assert_eq!(rule.fields(), vec!["a", "b", "c"]);
    }
}
