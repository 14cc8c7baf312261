//! Constraints narrowing a profile permission
//!
//! A constraint is either a value (identified by `name`) or a condition
//! (identified by `title`, with a description and an expression). The
//! constraint type decides which: `condition` in any case selects the
//! condition form.

use serde::{Deserialize, Serialize};

/// Constraint type that selects the condition variant
pub const CONDITION_CONSTRAINT_TYPE: &str = "condition";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueConstraint {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionConstraint {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    Condition(ConditionConstraint),
    Value(ValueConstraint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Value,
    Condition,
}

impl ConstraintKind {
    pub fn for_type(constraint_type: &str) -> Self {
        if constraint_type.eq_ignore_ascii_case(CONDITION_CONSTRAINT_TYPE) {
            Self::Condition
        } else {
            Self::Value
        }
    }
}

impl Constraint {
    /// Build the variant dictated by `constraint_type`. `key` is the name for
    /// value constraints and the title for condition constraints.
    pub fn for_type(constraint_type: &str, key: &str, description: &str, expression: &str) -> Self {
        match ConstraintKind::for_type(constraint_type) {
            ConstraintKind::Condition => Constraint::Condition(ConditionConstraint {
                title: key.to_string(),
                description: description.to_string(),
                expression: expression.to_string(),
            }),
            ConstraintKind::Value => Constraint::Value(ValueConstraint { name: key.to_string() }),
        }
    }

    /// Name or title
    pub fn key(&self) -> &str {
        match self {
            Constraint::Condition(c) => &c.title,
            Constraint::Value(v) => &v.name,
        }
    }
}

/// `GET .../constraints/{constraintType}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintResult {
    #[serde(default)]
    pub result: Vec<Constraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOperation {
    Add,
    Remove,
}

impl ConstraintOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_condition_type_is_case_insensitive() {
        for t in ["condition", "Condition", "CONDITION"] {
            let c = Constraint::for_type(t, "office hours", "weekdays only", "request.time < 17");
            let body = serde_json::to_value(&c).unwrap();
            assert_eq!(body["title"], "office hours");
            assert!(body.get("name").is_none());
        }
    }

    #[test]
    fn test_other_types_serialize_name() {
        let c = Constraint::for_type("bigquery.datasets", "ds1", "", "");
        assert_eq!(serde_json::to_value(&c).unwrap(), json!({"name": "ds1"}));
    }

    #[test]
    fn test_result_decodes_both_variants() {
        let result: ConstraintResult = serde_json::from_value(json!({
            "result": [
                {"name": "ds1"},
                {"title": "t", "description": "d", "expression": "e"}
            ]
        }))
        .unwrap();
        assert_eq!(result.result[0].key(), "ds1");
        assert!(matches!(result.result[1], Constraint::Condition(_)));
    }
}
