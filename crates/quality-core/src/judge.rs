//! The quality judge: per-expression results collapsed by a quorum rule.

use serde_json::Value as Json;
use tracing::debug;

use crate::compiler;
use crate::error::QualityError;
use crate::eval;
use crate::resolver::MaterialView;

/// Evaluate every expression tree in `operations` against the material
/// view, in stored order, and collapse the results:
///
/// - `min_count == -1`: every expression must hold;
/// - otherwise: at least `min_count` of them must hold (a plain threshold,
///   no specific-expression requirement).
///
/// Fails with [`QualityError::NoOperationToPerform`] when `operations` is
/// empty or not a list. Any compile or evaluation error aborts the whole
/// judgement; no partial verdict is produced.
pub fn judge(
    operations: &Json,
    min_count: i64,
    view: &dyn MaterialView,
) -> Result<bool, QualityError> {
    let list = operations_list(operations)?;
    if list.is_empty() {
        return Err(no_operation(operations));
    }
    let results = evaluate_all(operations, view)?;
    let passed = results.iter().filter(|r| **r).count();
    let verdict = if min_count == -1 {
        passed == results.len()
    } else {
        passed as i64 >= min_count
    };
    debug!(min_count, passed, total = results.len(), verdict, "judged quality");
    Ok(verdict)
}

/// Audit variant: the per-expression booleans, original order preserved.
pub fn evaluate_all(
    operations: &Json,
    view: &dyn MaterialView,
) -> Result<Vec<bool>, QualityError> {
    let list = operations_list(operations)?;
    let mut results = Vec::with_capacity(list.len());
    for operation in list {
        let compiled = compiler::compile(operation, view)?;
        results.push(eval::evaluate(&compiled)?.truthy());
    }
    Ok(results)
}

/// Audit variant: the readable (unresolved) forms, original order
/// preserved. Tokens are still resolved while compiling, so an invalid
/// operand fails here too.
pub fn render_readable(
    operations: &Json,
    view: &dyn MaterialView,
) -> Result<Vec<String>, QualityError> {
    let list = operations_list(operations)?;
    list.iter()
        .map(|operation| compiler::compile(operation, view).map(|c| c.readable))
        .collect()
}

fn operations_list(operations: &Json) -> Result<&Vec<Json>, QualityError> {
    match operations {
        Json::Array(list) => Ok(list),
        other => Err(no_operation(other)),
    }
}

fn no_operation(operations: &Json) -> QualityError {
    QualityError::NoOperationToPerform {
        operations: operations.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::FakeView;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    fn seventy_thirty() -> FakeView {
        FakeView::default()
            .with_attribute(
                "POLYESTER",
                Value::Number(Decimal::from_str("0.7").unwrap()),
            )
            .with_attribute("COTTON", Value::Number(Decimal::from_str("0.3").unwrap()))
    }

    #[test]
    fn threshold_quorum() {
        let view = seventy_thirty();
        let operations = json!([
            {"operator": "eq", "operands": ["ATTR_POLYESTER", 0.7]},
            {"operator": "eq", "operands": ["ATTR_COTTON", 0.5]}
        ]);
        assert_eq!(
            evaluate_all(&operations, &view).unwrap(),
            vec![true, false]
        );
        assert!(judge(&operations, 1, &view).unwrap());
        assert!(!judge(&operations, 2, &view).unwrap());
        assert!(judge(&operations, 0, &view).unwrap());
    }

    #[test]
    fn minus_one_requires_all() {
        let view = seventy_thirty();
        let both_hold = json!([
            {"operator": "eq", "operands": ["ATTR_POLYESTER", 0.7]},
            {"operator": "eq", "operands": ["ATTR_COTTON", 0.3]}
        ]);
        assert!(judge(&both_hold, -1, &view).unwrap());

        let one_fails = json!([
            {"operator": "eq", "operands": ["ATTR_POLYESTER", 0.7]},
            {"operator": "eq", "operands": ["ATTR_COTTON", 0.5]}
        ]);
        assert!(!judge(&one_fails, -1, &view).unwrap());
    }

    #[test]
    fn empty_or_non_list_operations_fail() {
        let view = FakeView::default();
        for operations in [json!([]), json!({"operator": "and", "operands": [1]})] {
            let err = judge(&operations, 1, &view).unwrap_err();
            assert!(
                matches!(err, QualityError::NoOperationToPerform { .. }),
                "{operations}"
            );
        }
        // The audit variants reject non-lists too, but tolerate empties.
        assert_eq!(evaluate_all(&json!([]), &view).unwrap(), Vec::<bool>::new());
        assert!(render_readable(&json!(null), &view).is_err());
    }

    #[test]
    fn errors_abort_the_whole_list() {
        let view = seventy_thirty();
        let operations = json!([
            {"operator": "eq", "operands": ["ATTR_POLYESTER", 0.7]},
            {"operator": "eq", "operands": ["ATTR_LINEN", 1]}
        ]);
        let err = judge(&operations, 1, &view).unwrap_err();
        assert_eq!(
            err,
            QualityError::InvalidOperand {
                operand: "LINEN".into()
            }
        );
    }

    #[test]
    fn readable_forms_keep_original_order_and_tokens() {
        let view = seventy_thirty();
        let operations = json!([
            {"operator": "and", "operands": [4, {"operator": "*", "operands": [8, 8, 8]}, "ATTR_POLYESTER"]},
            {"operator": "eq", "operands": ["ATTR_COTTON", 0.3]}
        ]);
        assert_eq!(
            render_readable(&operations, &view).unwrap(),
            vec![
                "(4 and (8 * 8 * 8) and ATTR_POLYESTER)".to_string(),
                "(ATTR_COTTON == 0.3)".to_string(),
            ]
        );
    }
}
