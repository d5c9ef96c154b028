//! Operator conventions: token → operation tag, token → operator function.

use crate::compiler::tokens::OperatorToken;
use serde::Serialize;
use strum_macros::{Display, EnumIter};
use tessel_core::Name;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OperatorError {
    #[error("operator '{0}' has no operation tag")]
    NoOperation(OperatorToken),
    #[error("'{0}' is not an assignment and cannot tag a member set")]
    NotAnAssignment(Operation),
}

/// Operation tag carried by operator calls and member sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum Operation {
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "!=")]
    NotEq,
    #[strum(to_string = "===")]
    Identity,
    #[strum(to_string = "!==")]
    NotIdentity,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = "<=")]
    LtEq,
    #[strum(to_string = ">=")]
    GtEq,
    #[strum(to_string = "&&")]
    And,
    #[strum(to_string = "||")]
    Or,
    #[strum(to_string = "in")]
    In,
    #[strum(to_string = "!in")]
    NotIn,
    #[strum(to_string = "..")]
    Range,
    #[strum(to_string = "=")]
    Assign,
    #[strum(to_string = "+=")]
    PlusAssign,
    #[strum(to_string = "-=")]
    MinusAssign,
    #[strum(to_string = "*=")]
    TimesAssign,
    #[strum(to_string = "/=")]
    DivAssign,
    #[strum(to_string = "%=")]
    RemAssign,
}

impl Operation {
    /// Assignment family: the only tags a member set may carry.
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Operation::Assign
                | Operation::PlusAssign
                | Operation::MinusAssign
                | Operation::TimesAssign
                | Operation::DivAssign
                | Operation::RemAssign
        )
    }
}

/// Map an operator token to its operation tag. Arithmetic tokens have no
/// tag (they become operator function calls) and are rejected.
pub fn operation_of(token: OperatorToken) -> Result<Operation, OperatorError> {
    let op = match token {
        OperatorToken::Lt => Operation::Lt,
        OperatorToken::Gt => Operation::Gt,
        OperatorToken::LtEq => Operation::LtEq,
        OperatorToken::GtEq => Operation::GtEq,
        OperatorToken::EqEq => Operation::Eq,
        OperatorToken::ExclEq => Operation::NotEq,
        OperatorToken::EqEqEq => Operation::Identity,
        OperatorToken::ExclEqEqEq => Operation::NotIdentity,
        OperatorToken::AndAnd => Operation::And,
        OperatorToken::OrOr => Operation::Or,
        OperatorToken::In => Operation::In,
        OperatorToken::NotIn => Operation::NotIn,
        OperatorToken::Range => Operation::Range,

        OperatorToken::Eq => Operation::Assign,
        OperatorToken::PlusEq => Operation::PlusAssign,
        OperatorToken::MinusEq => Operation::MinusAssign,
        OperatorToken::MultEq => Operation::TimesAssign,
        OperatorToken::DivEq => Operation::DivAssign,
        OperatorToken::PercEq => Operation::RemAssign,

        other => return Err(OperatorError::NoOperation(other)),
    };
    Ok(op)
}

/// Operator function called for a binary token (`a + b` → `plus`).
pub fn binary_name(token: OperatorToken) -> Option<Name> {
    let name = match token {
        OperatorToken::Plus => "plus",
        OperatorToken::Minus => "minus",
        OperatorToken::Mul => "times",
        OperatorToken::Div => "div",
        OperatorToken::Perc => "rem",
        OperatorToken::Range => "rangeTo",
        _ => return None,
    };
    Name::identifier(name).ok()
}

/// Operator function called for a unary token (`-a` → `unaryMinus`).
pub fn unary_name(token: OperatorToken) -> Option<Name> {
    let name = match token {
        OperatorToken::PlusPlus => "inc",
        OperatorToken::MinusMinus => "dec",
        OperatorToken::Plus => "unaryPlus",
        OperatorToken::Minus => "unaryMinus",
        OperatorToken::Excl => "not",
        _ => return None,
    };
    Name::identifier(name).ok()
}
