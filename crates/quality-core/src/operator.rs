//! The fixed operator set for quality expressions.
//!
//! Each operator has a text name (how rule authors usually spell it), a
//! display sign (used when rendering the executable and readable forms),
//! and a boolean flag. Stored trees may use either spelling; both parse to
//! the same variant.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One of the ten supported expression operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Mul,
    And,
    Or,
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
}

impl Operator {
    /// Every operator, in display order.
    pub const ALL: [Operator; 10] = [
        Operator::Add,
        Operator::Mul,
        Operator::And,
        Operator::Or,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Eq,
        Operator::Neq,
    ];

    /// Parse an operator from its text name ("mul") or its sign ("*").
    pub fn parse(token: &str) -> Option<Operator> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.text() == token || op.sign() == token)
    }

    /// Text name: "add", "mul", "and", ...
    pub fn text(&self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Mul => "mul",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Eq => "eq",
            Operator::Neq => "neq",
        }
    }

    /// Display sign, used to join operands in rendered forms.
    pub fn sign(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Mul => "*",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Eq => "==",
            Operator::Neq => "!=",
        }
    }

    /// True when the operator reduces to a boolean. A quality's root
    /// operator must be boolean-flagged.
    pub fn is_boolean(&self) -> bool {
        !matches!(self, Operator::Add | Operator::Mul)
    }
}

static ALLOWED_SIGNS: Lazy<String> = Lazy::new(|| {
    Operator::ALL
        .iter()
        .map(|op| op.sign())
        .collect::<Vec<_>>()
        .join(", ")
});

static BOOLEAN_SIGNS: Lazy<String> = Lazy::new(|| {
    Operator::ALL
        .iter()
        .filter(|op| op.is_boolean())
        .map(|op| op.sign())
        .collect::<Vec<_>>()
        .join(", ")
});

/// Comma-joined signs of every operator, for error messages.
pub fn allowed_signs() -> &'static str {
    ALLOWED_SIGNS.as_str()
}

/// Comma-joined signs of the boolean-flagged operators, for error messages.
pub fn boolean_signs() -> &'static str {
    BOOLEAN_SIGNS.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_text_and_sign() {
        assert_eq!(Operator::parse("mul"), Some(Operator::Mul));
        assert_eq!(Operator::parse("*"), Some(Operator::Mul));
        assert_eq!(Operator::parse("and"), Some(Operator::And));
        assert_eq!(Operator::parse("=="), Some(Operator::Eq));
        assert_eq!(Operator::parse("eq"), Some(Operator::Eq));
        assert_eq!(Operator::parse("power"), None);
    }

    #[test]
    fn boolean_flags() {
        assert!(!Operator::Add.is_boolean());
        assert!(!Operator::Mul.is_boolean());
        for op in [
            Operator::And,
            Operator::Or,
            Operator::Gt,
            Operator::Lt,
            Operator::Gte,
            Operator::Lte,
            Operator::Eq,
            Operator::Neq,
        ] {
            assert!(op.is_boolean(), "{} should be boolean", op.sign());
        }
    }

    #[test]
    fn sign_lists() {
        assert_eq!(
            allowed_signs(),
            "+, *, and, or, >, <, >=, <=, ==, !="
        );
        assert_eq!(boolean_signs(), "and, or, >, <, >=, <=, ==, !=");
    }
}
