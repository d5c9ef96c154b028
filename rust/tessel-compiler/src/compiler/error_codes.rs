//! Stable error codes for tree diagnostics and all `CompileError` variants.
//!
//! Code ranges:
//!   E0001–E0009  Malformed literals and error expressions (recoverable)
//!   E0100–E0109  Literal conversion errors
//!   E0110–E0119  Operator convention errors
//!   E0120–E0129  IR consistency errors

use crate::compiler::ir::IrError;
use crate::compiler::literal::LiteralError;
use crate::compiler::operators::OperatorError;
use crate::CompileError;
use tessel_core::ConstKind;

// ── Tree diagnostics (E0001–E0009) ─────────────────────────────────

/// Code of a constant of `kind` whose text could not be converted.
pub fn malformed_literal_code(kind: ConstKind) -> &'static str {
    match kind {
        ConstKind::Int => "E0001",
        ConstKind::Long => "E0002",
        ConstKind::Float => "E0003",
        ConstKind::Double => "E0004",
        ConstKind::Char => "E0005",
        // Never malformed; kept distinct so a code always exists.
        ConstKind::Boolean => "E0006",
        ConstKind::Null => "E0007",
    }
}

pub const ERROR_EXPRESSION_CODE: &str = "E0009";

// ── Fatal errors (E0100+) ──────────────────────────────────────────

pub fn literal_code(e: &LiteralError) -> &'static str {
    match e {
        LiteralError::NotALiteral { .. } => "E0100",
    }
}

pub fn operator_code(e: &OperatorError) -> &'static str {
    match e {
        OperatorError::NoOperation(_) => "E0110",
        OperatorError::NotAnAssignment(_) => "E0111",
    }
}

pub fn ir_code(e: &IrError) -> &'static str {
    match e {
        IrError::UnboundJumpTarget { .. } => "E0120",
        IrError::JumpTargetRebound { .. } => "E0121",
        IrError::InvalidJumpTarget { .. } => "E0122",
        IrError::NotAJump(_) => "E0123",
        IrError::IncompatibleReplacement { .. } => "E0124",
        IrError::CyclicReplacement { .. } => "E0125",
    }
}

/// Return the stable error code of a `CompileError`. `Multiple` reports the
/// code of its first element.
pub fn error_code(error: &CompileError) -> &'static str {
    match error {
        CompileError::Literal(e) => literal_code(e),
        CompileError::Operator(e) => operator_code(e),
        CompileError::Ir(e) => ir_code(e),
        CompileError::Multiple(errors) => errors.first().map_or("E0120", error_code),
    }
}

/// Short documentation for an error code.
pub fn error_doc(code: &str) -> &'static str {
    match code {
        "E0001" => "An integer literal does not fit a 32-bit signed int. Add an `L` suffix or use a smaller value.",
        "E0002" => "A long literal does not fit a 64-bit signed long.",
        "E0003" => "A float literal (with `f` suffix) could not be parsed as a 32-bit float.",
        "E0004" => "A floating point literal could not be parsed as a 64-bit double.",
        "E0005" => "A character literal is empty, holds more than one character, or uses an unknown escape.",
        "E0006" => "A boolean literal could not be converted.",
        "E0007" => "A null literal could not be converted.",
        "E0009" => "An expression could not be desugared, for example `++` applied to something other than a plain name.",

        "E0100" => "A syntax element that is not a literal was handed to literal conversion.",
        "E0110" => "An operator token has no operation tag. Arithmetic operators become operator function calls instead.",
        "E0111" => "A member set was tagged with an operation outside `=`, `+=`, `-=`, `*=`, `/=` and `%=`.",
        "E0120" => "A break, continue or return was read before name resolution bound its target.",
        "E0121" => "A jump target was bound twice.",
        "E0122" => "A jump target has the wrong kind: break and continue need a loop, return needs a function.",
        "E0123" => "A jump target operation was applied to a node that is not a jump.",
        "E0124" => "A transformer replaced a child with a node the slot does not accept.",
        "E0125" => "A transformer replaced a child with the parent node or one of its ancestors.",

        _ => "Unknown error code.",
    }
}

/// Every registered code with its documentation.
pub fn all_error_codes() -> Vec<(&'static str, &'static str)> {
    let codes = [
        "E0001", "E0002", "E0003", "E0004", "E0005", "E0006", "E0007", "E0009", "E0100", "E0110",
        "E0111", "E0120", "E0121", "E0122", "E0123", "E0124", "E0125",
    ];
    codes.iter().map(|&c| (c, error_doc(c))).collect()
}
