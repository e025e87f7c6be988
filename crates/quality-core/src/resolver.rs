//! Operand resolution: symbolic tokens to concrete values.
//!
//! Rule authors reference attribute data through stable human-derived
//! placeholder tokens (`ATTR_POLYESTER`, `OPT_TOP_DYED`) instead of
//! internal identifiers. Resolution is read-only and scoped to a single
//! material through the [`MaterialView`] seam.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::error::QualityError;
use crate::value::{decimal_from_json, Value};

const ATTR_PREFIX: &str = "ATTR_";
const CUM_PREFIX: &str = "CUM_";
const OPT_PREFIX: &str = "OPT_";

/// What the resolver needs to know about a catalog attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeInfo {
    /// True when the attribute has no parent category, i.e. it is itself a
    /// top-level category. Referencing one is a cumulative reference.
    pub top_level: bool,
}

/// Point-in-time, single-material read surface over the catalog and the
/// material attribute store. Implemented by the storage layer; the engine
/// never sees storage types directly.
pub trait MaterialView {
    /// Catalog lookup by attribute placeholder, with parent-category info.
    fn attribute_by_placeholder(&self, placeholder: &str) -> Option<AttributeInfo>;

    /// Value of this material's entry for the attribute with the given
    /// placeholder. `None` when there is no entry or it has no value yet.
    fn entry_value(&self, attribute_placeholder: &str) -> Option<Value>;

    /// Value of this material's entry whose chosen option has the given
    /// placeholder.
    fn entry_value_by_option(&self, option_placeholder: &str) -> Option<Value>;

    /// Sum of the fraction values of every percentage-kind entry of this
    /// material.
    fn percentage_sum(&self) -> Decimal;
}

/// Resolve a scalar operand to a concrete [`Value`].
///
/// Numbers and booleans pass through; strings are either numeric literals,
/// `ATTR_`/`CUM_`/`OPT_` placeholder references, or invalid.
pub fn resolve(operand: &Json, view: &dyn MaterialView) -> Result<Value, QualityError> {
    match operand {
        Json::Number(n) => decimal_from_json(n)
            .map(Value::Number)
            .ok_or_else(|| invalid(&operand.to_string())),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::String(s) => resolve_token(s, view),
        // Arrays, objects and nulls never reach here as values.
        other => Err(invalid(&other.to_string())),
    }
}

fn resolve_token(token: &str, view: &dyn MaterialView) -> Result<Value, QualityError> {
    if let Ok(n) = Decimal::from_str(token) {
        return Ok(Value::Number(n));
    }
    if let Some(placeholder) = token
        .strip_prefix(ATTR_PREFIX)
        .or_else(|| token.strip_prefix(CUM_PREFIX))
    {
        let attribute = view
            .attribute_by_placeholder(placeholder)
            .ok_or_else(|| invalid(placeholder))?;
        if attribute.top_level {
            // A bare top-level attribute denotes the cumulative sum over
            // every percentage entry of the material.
            return Ok(Value::Number(view.percentage_sum()));
        }
        return view
            .entry_value(placeholder)
            .ok_or_else(|| invalid(placeholder));
    }
    if let Some(placeholder) = token.strip_prefix(OPT_PREFIX) {
        return view
            .entry_value_by_option(placeholder)
            .ok_or_else(|| invalid(placeholder));
    }
    Err(invalid(token))
}

fn invalid(operand: &str) -> QualityError {
    QualityError::InvalidOperand {
        operand: operand.to_string(),
    }
}
