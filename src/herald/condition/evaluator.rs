//! Condition tree evaluator

use super::ast::{CompareOp, Condition, LogicOp};
use crate::base::error::ConditionError;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Reduce a condition tree to a boolean.
///
/// `and` stops at the first false child and `or` at the first true one, so
/// children after that point are never evaluated (and cannot fail).
pub fn evaluate(condition: &Condition) -> Result<bool, ConditionError> {
    match condition {
        Condition::Compare { op, left, right } => evaluate_compare(*op, left, right),
        Condition::Combine {
            op: LogicOp::And,
            children,
        } => {
            for child in children {
                if !evaluate(child)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Condition::Combine {
            op: LogicOp::Or,
            children,
        } => {
            for child in children {
                if evaluate(child)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

fn evaluate_compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, ConditionError> {
    let result = match op {
        CompareOp::Eq => values_equal(left, right),
        CompareOp::Ne => !values_equal(left, right),
        CompareOp::Gt => order(op, left, right)?.is_gt(),
        CompareOp::Ge => order(op, left, right)?.is_ge(),
        CompareOp::Lt => order(op, left, right)?.is_lt(),
        CompareOp::Le => order(op, left, right)?.is_le(),
    };
    Ok(result)
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| values_equal(x, y)))
        }
        // Different kinds are never equal
        _ => left == right,
    }
}

fn order(op: CompareOp, left: &Value, right: &Value) -> Result<Ordering, ConditionError> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    };

    ordering.ok_or_else(|| ConditionError::ComparisonType {
        operator: op.to_string(),
        left: kind_of(left),
        right: kind_of(right),
    })
}

/// Exact ordering of two JSON numbers, integers against floats included
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (integer(a), integer(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => compare_integer_float(x, b.as_f64()?),
        (None, Some(y)) => compare_integer_float(y, a.as_f64()?).map(Ordering::reverse),
        (None, None) => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

// Casting `i` to f64 rounds above 2^53, so compare against the float's
// integral part in i128 and break ties on its fraction.
fn compare_integer_float(i: i128, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    let limit = 2f64.powi(127);
    if f >= limit {
        return Some(Ordering::Less);
    }
    if f < -limit {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i128)) {
        Ordering::Equal => 0f64.partial_cmp(&(f - whole)),
        ordering => Some(ordering),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cmp(op: CompareOp, left: Value, right: Value) -> Condition {
        Condition::Compare { op, left, right }
    }

    fn all(children: Vec<Condition>) -> Condition {
        Condition::Combine {
            op: LogicOp::And,
            children,
        }
    }

    fn any(children: Vec<Condition>) -> Condition {
        Condition::Combine {
            op: LogicOp::Or,
            children,
        }
    }

    /// A comparison that fails if it is ever evaluated
    fn poisoned() -> Condition {
        cmp(CompareOp::Lt, json!(1), json!("a"))
    }

    #[test]
    fn test_number_comparison() {
        assert!(evaluate(&cmp(CompareOp::Gt, json!(5), json!(3))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Gt, json!(3), json!(5))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Gt, json!(3), json!(3))).unwrap());

        assert!(evaluate(&cmp(CompareOp::Ge, json!(3), json!(3))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Ge, json!(2), json!(3))).unwrap());

        assert!(evaluate(&cmp(CompareOp::Lt, json!(2), json!(10))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Lt, json!(10), json!(2))).unwrap());

        assert!(evaluate(&cmp(CompareOp::Le, json!(7.5), json!(7.5))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Le, json!(7.6), json!(7.5))).unwrap());
    }

    #[test]
    fn test_mixed_integer_and_float() {
        assert!(evaluate(&cmp(CompareOp::Eq, json!(1), json!(1.0))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Lt, json!(1), json!(1.5))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Gt, json!(-1), json!(-1.5))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Gt, json!(u64::MAX), json!(-1))).unwrap());
    }

    #[test]
    fn test_large_integers_against_floats_are_exact() {
        let big = json!(9007199254740993_i64);
        let float = json!(9007199254740992.0_f64);
        assert!(evaluate(&cmp(CompareOp::Gt, big.clone(), float.clone())).unwrap());
        assert!(evaluate(&cmp(CompareOp::Lt, float.clone(), big.clone())).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Eq, big, float)).unwrap());

        assert!(evaluate(&cmp(CompareOp::Lt, json!(u64::MAX), json!(1e20))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Gt, json!(i64::MIN), json!(-1e19))).unwrap());
    }

    #[test]
    fn test_string_comparison() {
        assert!(evaluate(&cmp(CompareOp::Ne, json!("a"), json!("b"))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Eq, json!("kyiv"), json!("kyiv"))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Lt, json!("apple"), json!("banana"))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Gt, json!("b"), json!("abc"))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Lt, json!("Z"), json!("a"))).unwrap());
    }

    #[test]
    fn test_boolean_comparison() {
        assert!(evaluate(&cmp(CompareOp::Eq, json!(true), json!(true))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Lt, json!(false), json!(true))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Ge, json!(false), json!(true))).unwrap());
    }

    #[test]
    fn test_equality_across_types_is_false() {
        assert!(!evaluate(&cmp(CompareOp::Eq, json!(1), json!("1"))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Ne, json!(1), json!("1"))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Eq, json!(true), json!(1))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Eq, json!(null), json!(null))).unwrap());
    }

    #[test]
    fn test_structural_equality() {
        assert!(evaluate(&cmp(CompareOp::Eq, json!([1, 2.0]), json!([1.0, 2]))).unwrap());
        assert!(!evaluate(&cmp(CompareOp::Eq, json!([1, 2]), json!([2, 1]))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Eq, json!({"a": 1}), json!({"a": 1.0}))).unwrap());
        assert!(evaluate(&cmp(CompareOp::Ne, json!({"a": 1}), json!({"b": 1}))).unwrap());
    }

    #[test]
    fn test_ordering_across_types_fails() {
        let err = evaluate(&cmp(CompareOp::Lt, json!(1), json!("a"))).unwrap_err();
        assert_eq!(
            err,
            ConditionError::ComparisonType {
                operator: "lt".into(),
                left: "number",
                right: "string",
            }
        );
        assert_eq!(err.kind(), "ComparisonTypeError");

        for (left, right) in [
            (json!(true), json!(1)),
            (json!(null), json!(0)),
            (json!([1]), json!([2])),
            (json!({}), json!({})),
        ] {
            let err = evaluate(&cmp(CompareOp::Ge, left, right)).unwrap_err();
            assert_eq!(err.kind(), "ComparisonTypeError");
        }
    }

    #[test]
    fn test_and_short_circuits() {
        let tree = all(vec![cmp(CompareOp::Eq, json!(1), json!(2)), poisoned()]);
        assert!(!evaluate(&tree).unwrap());

        // Reached when the first child is true
        let tree = all(vec![cmp(CompareOp::Eq, json!(1), json!(1)), poisoned()]);
        assert!(evaluate(&tree).is_err());
    }

    #[test]
    fn test_or_short_circuits() {
        let tree = any(vec![cmp(CompareOp::Eq, json!(1), json!(1)), poisoned()]);
        assert!(evaluate(&tree).unwrap());

        let tree = any(vec![cmp(CompareOp::Eq, json!(1), json!(2)), poisoned()]);
        assert!(evaluate(&tree).is_err());
    }

    #[test]
    fn test_empty_combinators() {
        assert!(evaluate(&all(vec![])).unwrap());
        assert!(!evaluate(&any(vec![])).unwrap());
    }

    #[test]
    fn test_nested_combinators() {
        let tree = all(vec![
            any(vec![
                cmp(CompareOp::Eq, json!(1), json!(1)),
                cmp(CompareOp::Eq, json!(2), json!(3)),
            ]),
            cmp(CompareOp::Ne, json!("a"), json!("b")),
        ]);
        assert!(evaluate(&tree).unwrap());

        let tree = any(vec![
            all(vec![
                cmp(CompareOp::Gt, json!(1), json!(0)),
                cmp(CompareOp::Gt, json!(0), json!(1)),
            ]),
            cmp(CompareOp::Eq, json!(false), json!(true)),
        ]);
        assert!(!evaluate(&tree).unwrap());
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let tree = all(vec![cmp(CompareOp::Gt, json!(5), json!(3))]);
        let first = evaluate(&tree).unwrap();
        let second = evaluate(&tree).unwrap();
        assert_eq!(first, second);
    }
}
