//! Expression compilation.
//!
//! A stored rule tree (JSON) compiles into three parallel artifacts:
//!
//! - a typed [`Node`] tree with every operand already resolved, which is
//!   what the evaluator walks;
//! - an `executable` string rendering of that tree, screened by the
//!   sandbox before evaluation and kept for audit logging;
//! - a `readable` string that keeps the original tokens unresolved, for
//!   display (`(4 and (8 * 8 * 8) and ATTR_POLYESTER)`).
//!
//! Operands are joined left to right by the operator's sign inside a single
//! parenthesis group (an n-ary chain, not binary nesting). Boolean-flagged
//! nodes render wrapped in `bool(...)`, matching the evaluator's cast.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::debug;

use crate::error::QualityError;
use crate::operator::Operator;
use crate::resolver::{self, MaterialView};
use crate::value::Value;

/// A compiled, evaluable expression node: a resolved leaf value or an
/// operator applied to an ordered operand list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Value(Value),
    Op {
        operator: Operator,
        operands: Vec<Node>,
    },
}

/// Output of [`compile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledExpression {
    pub root: Node,
    pub executable: String,
    pub readable: String,
}

/// Compile one stored expression tree against a material view.
///
/// The root operator must be boolean-flagged: a quality's outermost check
/// has to reduce to a boolean.
pub fn compile(
    expression: &Json,
    view: &dyn MaterialView,
) -> Result<CompiledExpression, QualityError> {
    let (root, executable, readable) = compile_node(expression, true, view)?;
    debug!(%executable, "compiled quality expression");
    Ok(CompiledExpression {
        root,
        executable,
        readable,
    })
}

fn compile_node(
    expression: &Json,
    is_root: bool,
    view: &dyn MaterialView,
) -> Result<(Node, String, String), QualityError> {
    let raw = expression
        .get("operator")
        .and_then(Json::as_str)
        .ok_or_else(|| missing_operator(expression))?;
    let operator = Operator::parse(raw).ok_or_else(|| missing_operator(expression))?;
    if is_root && !operator.is_boolean() {
        return Err(QualityError::InvalidRootOperator {
            operator: raw.to_string(),
        });
    }
    let operands = expression
        .get("operands")
        .and_then(Json::as_array)
        .filter(|list| !list.is_empty())
        .ok_or_else(|| QualityError::MissingOperands {
            expression: expression.to_string(),
        })?;

    let mut nodes = Vec::with_capacity(operands.len());
    let mut code = Vec::with_capacity(operands.len());
    let mut readable = Vec::with_capacity(operands.len());
    for operand in operands {
        if operand.is_object() {
            let (node, operand_code, operand_readable) = compile_node(operand, false, view)?;
            nodes.push(node);
            code.push(operand_code);
            readable.push(operand_readable);
        } else {
            let value = resolver::resolve(operand, view)?;
            code.push(value.to_string());
            readable.push(readable_token(operand));
            nodes.push(Node::Value(value));
        }
    }

    let join = format!(" {} ", operator.sign());
    let mut executable = format!("({})", code.join(&join));
    if operator.is_boolean() {
        executable = format!("bool({})", executable);
    }
    let readable = format!("({})", readable.join(&join));
    Ok((Node::Op { operator, operands: nodes }, executable, readable))
}

/// The readable form keeps the author's token verbatim: strings unquoted,
/// numbers as written.
fn readable_token(operand: &Json) -> String {
    match operand {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn missing_operator(expression: &Json) -> QualityError {
    QualityError::MissingOperator {
        expression: expression.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::FakeView;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn polyester_view() -> FakeView {
        FakeView::default().with_attribute(
            "POLYESTER",
            Value::Number(Decimal::from_str("0.7").unwrap()),
        )
    }

    #[test]
    fn compiles_nested_tree_with_both_forms() {
        let tree = json!({
            "operator": "and",
            "operands": [4, {"operator": "*", "operands": [8, 8, 8]}, "ATTR_POLYESTER"]
        });
        let compiled = compile(&tree, &polyester_view()).unwrap();
        assert_eq!(compiled.executable, "bool((4 and (8 * 8 * 8) and 0.7))");
        assert_eq!(compiled.readable, "(4 and (8 * 8 * 8) and ATTR_POLYESTER)");
    }

    #[test]
    fn operator_text_and_sign_spellings_agree() {
        let by_text = json!({"operator": "eq", "operands": [1, 1]});
        let by_sign = json!({"operator": "==", "operands": [1, 1]});
        let view = FakeView::default();
        assert_eq!(
            compile(&by_text, &view).unwrap().executable,
            compile(&by_sign, &view).unwrap().executable
        );
    }

    #[test]
    fn missing_operator_is_rejected() {
        let view = FakeView::default();
        let err = compile(&json!({"operands": [1]}), &view).unwrap_err();
        assert!(matches!(err, QualityError::MissingOperator { .. }));
        // Unknown operator spellings count as missing.
        let err = compile(&json!({"operator": "pow", "operands": [1]}), &view).unwrap_err();
        assert!(matches!(err, QualityError::MissingOperator { .. }));
    }

    #[test]
    fn arithmetic_root_is_rejected() {
        let view = FakeView::default();
        let err = compile(&json!({"operator": "mul", "operands": [8, 8]}), &view).unwrap_err();
        assert_eq!(
            err,
            QualityError::InvalidRootOperator {
                operator: "mul".into()
            }
        );
        // The same operator is fine below the root.
        let tree = json!({
            "operator": "gt",
            "operands": [{"operator": "mul", "operands": [8, 8]}, 1]
        });
        assert!(compile(&tree, &view).is_ok());
    }

    #[test]
    fn missing_or_empty_operands_are_rejected() {
        let view = FakeView::default();
        for tree in [
            json!({"operator": "and"}),
            json!({"operator": "and", "operands": []}),
            json!({"operator": "and", "operands": "ATTR_POLYESTER"}),
        ] {
            let err = compile(&tree, &view).unwrap_err();
            assert!(matches!(err, QualityError::MissingOperands { .. }), "{tree}");
        }
    }

    #[test]
    fn resolver_failures_propagate() {
        let view = FakeView::default();
        let tree = json!({"operator": "and", "operands": ["ATTR_POLYESTER", 1]});
        let err = compile(&tree, &view).unwrap_err();
        assert_eq!(
            err,
            QualityError::InvalidOperand {
                operand: "POLYESTER".into()
            }
        );
    }

    #[test]
    fn text_values_are_quoted_in_executable_only() {
        let view =
            FakeView::default().with_option("TOP_DYED", Value::Text("Top Dyed".into()));
        let tree = json!({"operator": "eq", "operands": ["OPT_TOP_DYED", "OPT_TOP_DYED"]});
        let compiled = compile(&tree, &view).unwrap();
        assert_eq!(compiled.executable, "bool((\"Top Dyed\" == \"Top Dyed\"))");
        assert_eq!(compiled.readable, "(OPT_TOP_DYED == OPT_TOP_DYED)");
    }

    #[test]
    fn nested_boolean_nodes_keep_their_cast() {
        let view = FakeView::default();
        let tree = json!({
            "operator": "and",
            "operands": [{"operator": "gt", "operands": [2, 1]}, 1]
        });
        let compiled = compile(&tree, &view).unwrap();
        assert_eq!(compiled.executable, "bool((bool((2 > 1)) and 1))");
    }
}
