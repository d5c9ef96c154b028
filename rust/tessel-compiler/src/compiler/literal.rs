//! Literal text → typed constants.
//!
//! Malformed literals are not errors here: they become a constant without a
//! payload that carries its diagnostic, so later passes can still walk the
//! tree. Only a non-literal syntax kind is rejected.

use crate::compiler::tokens::{LiteralToken, SyntaxKind};
use serde::Serialize;
use tessel_core::{ConstKind, ConstValue};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("unknown literal type: {kind}, {text}")]
    NotALiteral { kind: SyntaxKind, text: String },
}

/// Result of converting one literal. The kind tag and the payload always
/// agree: the only constructors derive the tag from the value or leave the
/// payload absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstExpression {
    kind: ConstKind,
    value: Option<ConstValue>,
    error: Option<String>,
}

impl ConstExpression {
    pub fn of(value: ConstValue) -> Self {
        Self { kind: value.kind(), value: Some(value), error: None }
    }

    pub fn null() -> Self {
        Self { kind: ConstKind::Null, value: None, error: None }
    }

    /// A literal of `kind` whose text could not be converted.
    pub fn malformed(kind: ConstKind, message: impl Into<String>) -> Self {
        Self { kind, value: None, error: Some(message.into()) }
    }

    fn parsed(kind: ConstKind, value: Option<ConstValue>, text: &str) -> Self {
        match value {
            Some(v) => Self::of(v),
            None => {
                let message = format!("Incorrect {}: {}", kind.diagnostic_name(), text);
                tracing::debug!(%message, "malformed literal");
                Self::malformed(kind, message)
            }
        }
    }

    pub fn kind(&self) -> ConstKind {
        self.kind
    }

    pub fn value(&self) -> Option<ConstValue> {
        self.value
    }

    /// Diagnostic retained for a malformed literal.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_malformed(&self) -> bool {
        self.error.is_some()
    }
}

/// Convert a literal of syntax kind `kind` with exact source `text`.
pub fn parse_literal(kind: SyntaxKind, text: &str) -> Result<ConstExpression, LiteralError> {
    let constant = match kind {
        SyntaxKind::IntegerConstant => match strip_suffix(text, 'l') {
            Some(digits) => ConstExpression::parsed(
                ConstKind::Long,
                digits.parse::<i64>().ok().map(ConstValue::Long),
                text,
            ),
            None => ConstExpression::parsed(
                ConstKind::Int,
                text.parse::<i32>().ok().map(ConstValue::Int),
                text,
            ),
        },
        SyntaxKind::FloatConstant => match strip_suffix(text, 'f') {
            Some(digits) => ConstExpression::parsed(
                ConstKind::Float,
                digits.parse::<f32>().ok().map(ConstValue::Float),
                text,
            ),
            None => ConstExpression::parsed(
                ConstKind::Double,
                text.parse::<f64>().ok().map(ConstValue::Double),
                text,
            ),
        },
        SyntaxKind::CharacterConstant => ConstExpression::parsed(
            ConstKind::Char,
            parse_character(text).map(ConstValue::Char),
            text,
        ),
        // Anything but "true" reads as false.
        SyntaxKind::BooleanConstant => {
            ConstExpression::of(ConstValue::Boolean(text.eq_ignore_ascii_case("true")))
        }
        SyntaxKind::Null => ConstExpression::null(),
        other => {
            return Err(LiteralError::NotALiteral { kind: other, text: text.to_string() });
        }
    };
    Ok(constant)
}

/// Convenience wrapper for a token handed over by the syntax layer.
pub fn parse_token(token: &LiteralToken) -> Result<ConstExpression, LiteralError> {
    parse_literal(token.kind, &token.text)
}

/// `text` without a trailing `suffix` in either case, if present.
fn strip_suffix(text: &str, suffix: char) -> Option<&str> {
    let last = text.chars().last()?;
    if last.eq_ignore_ascii_case(&suffix) {
        Some(&text[..text.len() - last.len_utf8()])
    } else {
        None
    }
}

/// Parse a character literal including its surrounding single quotes.
pub fn parse_character(text: &str) -> Option<char> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    match chars.next()? {
        '\\' => translate_escape(chars.as_str()),
        c if chars.next().is_none() => Some(c),
        _ => None,
    }
}

/// Translate the body of an escape sequence (the text after the backslash).
pub fn translate_escape(body: &str) -> Option<char> {
    let mut chars = body.chars();
    match body.chars().count() {
        1 => match chars.next()? {
            't' => Some('\t'),
            'b' => Some('\u{8}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            '\'' => Some('\''),
            '"' => Some('"'),
            '\\' => Some('\\'),
            '$' => Some('$'),
            _ => None,
        },
        5 => {
            if chars.next() != Some('u') || !chars.as_str().chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let code = u32::from_str_radix(chars.as_str(), 16).ok()?;
            char::from_u32(code)
        }
        _ => None,
    }
}
