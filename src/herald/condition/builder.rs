//! Builds a condition tree from a condition document
//!
//! Accepts documents like:
//! - `{"eq": [1, 1]}`
//! - `{"and": {"gt": [5, 3], "lt": [2, 10]}}`
//!
//! All shape checks happen here, so a tree that builds can always be walked.

use super::ast::{Condition, Operator};
use super::document::ConditionValue;
use crate::base::error::{ConditionError, ShapeViolation};

/// Build a single node (and its children) for `operator` applied to `value`
pub fn build(operator: &str, value: &ConditionValue) -> Result<Condition, ConditionError> {
    let op = Operator::lookup(operator).ok_or_else(|| ConditionError::unsupported(operator))?;

    match op {
        Operator::Compare(op) => {
            let items = value
                .as_list()
                .ok_or_else(|| ConditionError::shape(operator, ShapeViolation::NotList))?;

            match items {
                [left, right] => Ok(Condition::Compare {
                    op,
                    left: left.to_json(),
                    right: right.to_json(),
                }),
                _ => Err(ConditionError::shape(
                    operator,
                    ShapeViolation::WrongArity(items.len()),
                )),
            }
        }
        Operator::Combine(op) => {
            let entries = value
                .as_map()
                .ok_or_else(|| ConditionError::shape(operator, ShapeViolation::NotDictionary))?;

            let children = entries
                .iter()
                .map(|(sub_operator, sub_value)| build(sub_operator, sub_value))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Condition::Combine { op, children })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::herald::condition::ast::{CompareOp, LogicOp};
    use serde_json::{json, Value};

    fn value(v: Value) -> ConditionValue {
        ConditionValue::from(v)
    }

    fn parsed(raw: &str) -> ConditionValue {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_build_comparison_keeps_operand_order() {
        let node = build("lt", &value(json!([2, 10]))).unwrap();
        assert_eq!(
            node,
            Condition::Compare {
                op: CompareOp::Lt,
                left: json!(2),
                right: json!(10),
            }
        );
    }

    #[test]
    fn test_build_every_comparison_operator() {
        let cases = [
            ("eq", CompareOp::Eq),
            ("ne", CompareOp::Ne),
            ("gt", CompareOp::Gt),
            ("ge", CompareOp::Ge),
            ("lt", CompareOp::Lt),
            ("le", CompareOp::Le),
        ];
        for (name, expected) in cases {
            match build(name, &value(json!(["a", "b"]))).unwrap() {
                Condition::Compare { op, .. } => assert_eq!(op, expected),
                other => panic!("Expected comparison for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_build_arity() {
        assert!(build("eq", &value(json!([1, 2]))).is_ok());

        let err = build("eq", &value(json!([1]))).unwrap_err();
        assert_eq!(err, ConditionError::shape("eq", ShapeViolation::WrongArity(1)));
        assert_eq!(err.kind(), "ShapeError");

        let err = build("eq", &value(json!([1, 2, 3]))).unwrap_err();
        assert_eq!(err, ConditionError::shape("eq", ShapeViolation::WrongArity(3)));

        let err = build("ge", &value(json!([]))).unwrap_err();
        assert_eq!(err, ConditionError::shape("ge", ShapeViolation::WrongArity(0)));
    }

    #[test]
    fn test_build_wrong_container() {
        let err = build("and", &value(json!([1, 2]))).unwrap_err();
        assert_eq!(err, ConditionError::shape("and", ShapeViolation::NotDictionary));

        let err = build("eq", &value(json!({"a": 1}))).unwrap_err();
        assert_eq!(err, ConditionError::shape("eq", ShapeViolation::NotList));

        let err = build("or", &value(json!("x"))).unwrap_err();
        assert_eq!(err, ConditionError::shape("or", ShapeViolation::NotDictionary));

        let err = build("ne", &value(json!(5))).unwrap_err();
        assert_eq!(err, ConditionError::shape("ne", ShapeViolation::NotList));
    }

    #[test]
    fn test_build_unknown_operator() {
        let err = build("xor", &value(json!([1, 2]))).unwrap_err();
        assert_eq!(err, ConditionError::unsupported("xor"));
    }

    #[test]
    fn test_unknown_operator_checked_before_shape() {
        // Shape would be wrong for any operator; the name is rejected first.
        let err = build("between", &value(json!(null))).unwrap_err();
        assert_eq!(err.kind(), "UnsupportedOperatorError");
    }

    #[test]
    fn test_unknown_operator_deep_in_tree() {
        let doc = parsed(r#"{"or": {"eq": [1, 1], "and": {"ne": [1, 2], "like": ["a", "b"]}}}"#);
        let err = build("and", &doc).unwrap_err();
        assert_eq!(err, ConditionError::unsupported("like"));
    }

    #[test]
    fn test_shape_error_deep_in_tree() {
        let doc = parsed(r#"{"or": {"gt": [1]}}"#);
        let err = build("and", &doc).unwrap_err();
        assert_eq!(err, ConditionError::shape("gt", ShapeViolation::WrongArity(1)));
    }

    #[test]
    fn test_build_combinator_children_in_document_order() {
        let doc = parsed(r#"{"gt": [5, 3], "lt": [2, 10], "gt": [0, 1]}"#);
        match build("and", &doc).unwrap() {
            Condition::Combine { op, children } => {
                assert_eq!(op, LogicOp::And);
                let ops: Vec<String> = children.iter().map(|c| c.operator().to_string()).collect();
                assert_eq!(ops, vec!["gt", "lt", "gt"]);
                assert_eq!(
                    children[2],
                    Condition::Compare {
                        op: CompareOp::Gt,
                        left: json!(0),
                        right: json!(1),
                    }
                );
            }
            other => panic!("Expected combinator, got {:?}", other),
        }
    }

    #[test]
    fn test_build_empty_combinators() {
        assert_eq!(
            build("and", &value(json!({}))).unwrap(),
            Condition::Combine {
                op: LogicOp::And,
                children: vec![],
            }
        );
        assert_eq!(
            build("or", &value(json!({}))).unwrap(),
            Condition::Combine {
                op: LogicOp::Or,
                children: vec![],
            }
        );
    }

    #[test]
    fn test_operands_are_taken_verbatim() {
        let node = build("eq", &value(json!([[1, 2], {"k": "v"}]))).unwrap();
        assert_eq!(
            node,
            Condition::Compare {
                op: CompareOp::Eq,
                left: json!([1, 2]),
                right: json!({"k": "v"}),
            }
        );
    }
}
