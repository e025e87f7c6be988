//! Resolved operand values.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A concrete value an operand resolves to: a number, a text (an option
/// name, usually), or a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(Decimal),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Truthiness: non-zero number, non-empty text, the boolean itself.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Number(n) => !n.is_zero(),
            Value::Text(s) => !s.is_empty(),
            Value::Bool(b) => *b,
        }
    }

    /// Numeric view: numbers as-is, booleans as 1/0, text has none.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(true) => Some(Decimal::ONE),
            Value::Bool(false) => Some(Decimal::ZERO),
            Value::Text(_) => None,
        }
    }

    /// Short kind label for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Bool(_) => "boolean",
        }
    }
}

/// Rendering used for the executable form: numbers inlined (normalized, so
/// a 70.00/100 fraction prints as 0.7), text quoted verbatim, booleans as
/// bare words. Text is deliberately NOT escaped; the sandbox screen rejects
/// anything that would break out of the quotes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n.normalize()),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
        }
    }
}

/// Convert a JSON number to a `Decimal`, keeping decimal literals exact.
pub(crate) fn decimal_from_json(n: &serde_json::Number) -> Option<Decimal> {
    let repr = n.to_string();
    Decimal::from_str(&repr)
        .ok()
        .or_else(|| Decimal::from_scientific(&repr).ok())
        .or_else(|| n.as_f64().and_then(Decimal::from_f64))
}
