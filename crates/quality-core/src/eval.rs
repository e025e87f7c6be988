//! Fixed-dispatch evaluation of compiled expressions.
//!
//! No text is ever executed: evaluation walks the typed [`Node`] tree the
//! compiler produced, dispatching over the ten operators. The sandbox
//! screen runs to completion over the executable rendering before the
//! first operator is applied.
//!
//! Semantics follow the quality-rule conventions:
//! - `and`/`or` short-circuit left to right and yield a boolean (the
//!   `bool(...)` cast in the rendered form);
//! - booleans coerce to 1/0 in arithmetic and numeric comparisons;
//! - comparisons chain pairwise across the n-ary operand list, so
//!   `(a > b > c)` holds iff `a > b` and `b > c`;
//! - equality across number and text is simply false; ordering across
//!   them is an [`QualityError::UnsupportedOperands`] error.

use std::cmp::Ordering;

use crate::compiler::{CompiledExpression, Node};
use crate::error::QualityError;
use crate::operator::Operator;
use crate::sandbox;
use crate::value::Value;

/// Screen the executable form, then evaluate the typed tree.
pub fn evaluate(compiled: &CompiledExpression) -> Result<Value, QualityError> {
    sandbox::screen(&compiled.executable)?;
    eval_node(&compiled.root)
}

fn eval_node(node: &Node) -> Result<Value, QualityError> {
    match node {
        Node::Value(value) => Ok(value.clone()),
        Node::Op { operator, operands } => apply(*operator, operands),
    }
}

fn apply(operator: Operator, operands: &[Node]) -> Result<Value, QualityError> {
    let Some((first, rest)) = operands.split_first() else {
        // The compiler never emits empty operand lists; hand-built trees
        // get the same error the compiler would have raised.
        return Err(QualityError::MissingOperands {
            expression: format!("({})", operator.sign()),
        });
    };
    match operator {
        Operator::And => {
            for operand in operands {
                if !eval_node(operand)?.truthy() {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        Operator::Or => {
            for operand in operands {
                if eval_node(operand)?.truthy() {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Operator::Add => {
            let mut acc = eval_node(first)?;
            for operand in rest {
                acc = add_pair(acc, eval_node(operand)?)?;
            }
            Ok(acc)
        }
        Operator::Mul => {
            let mut acc = eval_node(first)?;
            for operand in rest {
                acc = mul_pair(acc, eval_node(operand)?)?;
            }
            Ok(acc)
        }
        Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte | Operator::Eq
        | Operator::Neq => chain_compare(operator, first, rest),
    }
}

fn add_pair(lhs: Value, rhs: Value) -> Result<Value, QualityError> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(Value::Number(a + b));
    }
    match (lhs, rhs) {
        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{a}{b}"))),
        (l, r) => Err(unsupported("+", &l, &r)),
    }
}

fn mul_pair(lhs: Value, rhs: Value) -> Result<Value, QualityError> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Ok(Value::Number(a * b)),
        _ => Err(unsupported("*", &lhs, &rhs)),
    }
}

fn chain_compare(
    operator: Operator,
    first: &Node,
    rest: &[Node],
) -> Result<Value, QualityError> {
    let mut prev = eval_node(first)?;
    if rest.is_empty() {
        // `bool((x))`: a lone operand reduces to its truthiness.
        return Ok(Value::Bool(prev.truthy()));
    }
    for operand in rest {
        let next = eval_node(operand)?;
        if !compare_pair(operator, &prev, &next)? {
            return Ok(Value::Bool(false));
        }
        prev = next;
    }
    Ok(Value::Bool(true))
}

fn compare_pair(operator: Operator, lhs: &Value, rhs: &Value) -> Result<bool, QualityError> {
    match operator {
        Operator::Eq => Ok(values_equal(lhs, rhs)),
        Operator::Neq => Ok(!values_equal(lhs, rhs)),
        Operator::Gt => Ok(ordering(operator, lhs, rhs)? == Ordering::Greater),
        Operator::Lt => Ok(ordering(operator, lhs, rhs)? == Ordering::Less),
        Operator::Gte => Ok(ordering(operator, lhs, rhs)? != Ordering::Less),
        Operator::Lte => Ok(ordering(operator, lhs, rhs)? != Ordering::Greater),
        other => Err(unsupported(other.sign(), lhs, rhs)),
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return a == b;
    }
    match (lhs, rhs) {
        (Value::Text(a), Value::Text(b)) => a == b,
        _ => false,
    }
}

fn ordering(
    operator: Operator,
    lhs: &Value,
    rhs: &Value,
) -> Result<Ordering, QualityError> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(a.cmp(&b));
    }
    if let (Value::Text(a), Value::Text(b)) = (lhs, rhs) {
        return Ok(a.as_str().cmp(b.as_str()));
    }
    Err(unsupported(operator.sign(), lhs, rhs))
}

fn unsupported(sign: &'static str, lhs: &Value, rhs: &Value) -> QualityError {
    QualityError::UnsupportedOperands {
        sign,
        lhs: lhs.kind(),
        rhs: rhs.kind(),
    }
}
