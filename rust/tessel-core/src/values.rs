//! Typed constant payloads produced by literal conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Value-kind tag of a constant expression.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ConstKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    Boolean,
    Null,
}

impl ConstKind {
    /// Lower-case spelling used in diagnostics ("Incorrect long: ...").
    pub fn diagnostic_name(self) -> &'static str {
        match self {
            ConstKind::Int => "int",
            ConstKind::Long => "long",
            ConstKind::Float => "float",
            ConstKind::Double => "double",
            ConstKind::Char => "character",
            ConstKind::Boolean => "boolean",
            ConstKind::Null => "null",
        }
    }
}

/// A successfully parsed constant. `null` has no payload, so it has no variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Boolean(bool),
}

impl ConstValue {
    pub fn kind(&self) -> ConstKind {
        match self {
            ConstValue::Int(_) => ConstKind::Int,
            ConstValue::Long(_) => ConstKind::Long,
            ConstValue::Float(_) => ConstKind::Float,
            ConstValue::Double(_) => ConstKind::Double,
            ConstValue::Char(_) => ConstKind::Char,
            ConstValue::Boolean(_) => ConstKind::Boolean,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(n) => write!(f, "{}", n),
            ConstValue::Long(n) => write!(f, "{}L", n),
            ConstValue::Float(x) => write!(f, "{}f", x),
            ConstValue::Double(x) => write!(f, "{}", x),
            ConstValue::Char(c) => write!(f, "'{}'", c.escape_default()),
            ConstValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}
