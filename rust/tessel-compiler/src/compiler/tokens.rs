//! Token shapes handed over by the syntax layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Source location of a syntax element. Kept by value on IR nodes for
/// diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the start in the source
    pub start: usize,
    /// Byte offset of the end (exclusive) in the source
    pub end: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub col: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self { start, end, line, col }
    }

    /// Location of synthesized nodes that have no source text.
    pub fn dummy() -> Self {
        Self { start: 0, end: 0, line: 0, col: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        *self == Self::dummy()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Element type of a syntax node as reported by the syntax layer.
///
/// Only the first five are literal kinds; the rest show up when a caller
/// routes a non-literal node into literal conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SyntaxKind {
    #[strum(to_string = "integer_constant", serialize = "int")]
    IntegerConstant,
    #[strum(to_string = "float_constant", serialize = "float")]
    FloatConstant,
    #[strum(to_string = "character_constant", serialize = "char")]
    CharacterConstant,
    #[strum(to_string = "boolean_constant", serialize = "bool")]
    BooleanConstant,
    Null,
    StringTemplate,
    Identifier,
    CallExpression,
}

impl SyntaxKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntegerConstant
                | SyntaxKind::FloatConstant
                | SyntaxKind::CharacterConstant
                | SyntaxKind::BooleanConstant
                | SyntaxKind::Null
        )
    }
}

/// A literal token: element type, exact source text, and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralToken {
    pub kind: SyntaxKind,
    pub text: String,
    pub span: Span,
}

impl LiteralToken {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, span: Span) -> Self {
        Self { kind, text: text.into(), span }
    }
}

/// Operator tokens of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorToken {
    Plus,      // +
    Minus,     // -
    Mul,       // *
    Div,       // /
    Perc,      // %
    Range,     // ..
    PlusPlus,  // ++
    MinusMinus, // --
    Excl,      // !
    Lt,        // <
    Gt,        // >
    LtEq,      // <=
    GtEq,      // >=
    EqEq,      // ==
    ExclEq,    // !=
    EqEqEq,    // ===
    ExclEqEqEq, // !==
    AndAnd,    // &&
    OrOr,      // ||
    In,        // in
    NotIn,     // !in
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    MultEq,    // *=
    DivEq,     // /=
    PercEq,    // %=
    Elvis,     // ?:
    As,        // as
    Is,        // is
}

impl fmt::Display for OperatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperatorToken::Plus => "+",
            OperatorToken::Minus => "-",
            OperatorToken::Mul => "*",
            OperatorToken::Div => "/",
            OperatorToken::Perc => "%",
            OperatorToken::Range => "..",
            OperatorToken::PlusPlus => "++",
            OperatorToken::MinusMinus => "--",
            OperatorToken::Excl => "!",
            OperatorToken::Lt => "<",
            OperatorToken::Gt => ">",
            OperatorToken::LtEq => "<=",
            OperatorToken::GtEq => ">=",
            OperatorToken::EqEq => "==",
            OperatorToken::ExclEq => "!=",
            OperatorToken::EqEqEq => "===",
            OperatorToken::ExclEqEqEq => "!==",
            OperatorToken::AndAnd => "&&",
            OperatorToken::OrOr => "||",
            OperatorToken::In => "in",
            OperatorToken::NotIn => "!in",
            OperatorToken::Eq => "=",
            OperatorToken::PlusEq => "+=",
            OperatorToken::MinusEq => "-=",
            OperatorToken::MultEq => "*=",
            OperatorToken::DivEq => "/=",
            OperatorToken::PercEq => "%=",
            OperatorToken::Elvis => "?:",
            OperatorToken::As => "as",
            OperatorToken::Is => "is",
        };
        f.write_str(s)
    }
}
