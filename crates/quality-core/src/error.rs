//! Engine error taxonomy.
//!
//! Every variant is fatal to the evaluation and non-retryable: it means the
//! stored rule data is malformed (or hostile), not that something transient
//! failed. Errors surface unchanged through `judge`, `evaluate_all`, and
//! `render_readable`; no partial verdicts are produced.

use thiserror::Error;

use crate::operator::{allowed_signs, boolean_signs};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QualityError {
    /// A tree node has no recognizable operator.
    #[error("operator not present in expression {expression}; allowed operators are [{}]", allowed_signs())]
    MissingOperator { expression: String },

    /// A node's operand list is missing or empty.
    #[error("operands not present in expression {expression}")]
    MissingOperands { expression: String },

    /// A token does not resolve to an attribute, option, cumulative
    /// reference, or number.
    #[error("invalid operand {operand}")]
    InvalidOperand { operand: String },

    /// The outermost operator of a tree is not boolean-capable.
    #[error("invalid root operator \"{operator}\"; the root must reduce to a boolean, supported boolean operators are [{}]", boolean_signs())]
    InvalidRootOperator { operator: String },

    /// `operations` is empty or not a list.
    #[error("no operation to perform or invalid expressions: {operations}")]
    NoOperationToPerform { operations: String },

    /// The executable form references identifiers outside the allow-list.
    #[error("untrusted operation; found [{}]", .names.join(", "))]
    UntrustedOperation { names: Vec<String> },

    /// Operand types the operator cannot combine (string ordered against a
    /// number, string added to a number, ...).
    #[error("unsupported operand types for {sign}: {lhs} and {rhs}")]
    UnsupportedOperands {
        sign: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
}
