//! Tessel Compiler
//!
//! Typed IR for the compiler front-end: literal conversion, the arena-backed
//! node tree with its visitor and transformer protocol, and the desugarings
//! of `?:`, `++` and `--`.

pub mod compiler;
pub mod diagnostics;

use compiler::ir::{ElementKind, Ir, IrError, NodeId};
use compiler::literal::LiteralError;
use compiler::operators::OperatorError;
use diagnostics::Diagnostic;

use thiserror::Error;

/// Fatal errors. Any of these aborts the current unit; recoverable problems
/// live in the tree as diagnostics instead.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("literal error: {0}")]
    Literal(#[from] LiteralError),
    #[error("operator error: {0}")]
    Operator(#[from] OperatorError),
    #[error("ir error: {0}")]
    Ir(#[from] IrError),
    #[error("multiple errors: {0:?}")]
    Multiple(Vec<CompileError>),
}

impl CompileError {
    /// Construct a `CompileError` from a list of errors.
    /// Returns `None` if the list is empty, unwraps single-element lists,
    /// and flattens nested `Multiple` variants.
    pub fn from_multiple(errors: Vec<CompileError>) -> Option<CompileError> {
        let mut flattened: Vec<CompileError> = errors
            .into_iter()
            .flat_map(|e| match e {
                CompileError::Multiple(inner) => inner,
                other => vec![other],
            })
            .collect();
        match flattened.len() {
            0 => None,
            1 => flattened.pop(),
            _ => Some(CompileError::Multiple(flattened)),
        }
    }
}

/// Check a finished unit before it is handed on: every jump below `root`
/// must have a bound target, and the recoverable diagnostics are returned.
/// All unbound jumps are reported together.
pub fn check_unit(ir: &Ir, root: NodeId) -> Result<Vec<Diagnostic>, CompileError> {
    let errors: Vec<CompileError> = ir
        .descendants(root)
        .into_iter()
        .filter(|&id| ir.element_kind(id).is_subtype_of(ElementKind::Jump))
        .filter_map(|id| ir.jump_target(id).err())
        .map(CompileError::from)
        .collect();
    if let Some(error) = CompileError::from_multiple(errors) {
        return Err(error);
    }
    let diagnostics = diagnostics::collect_diagnostics(ir, root);
    tracing::debug!(count = diagnostics.len(), "unit checked");
    Ok(diagnostics)
}

/// Render a compile error as plain text, one diagnostic per underlying error.
pub fn format_error(error: &CompileError, filename: &str) -> String {
    diagnostics::format_compile_error(error, filename)
        .iter()
        .map(|d| d.render_plain())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use compiler::ir::{JumpTarget, NodeKind};
    use compiler::tokens::Span;

    fn loop_with_break(ir: &mut Ir) -> (NodeId, NodeId) {
        let brk = ir.alloc(Span::dummy(), NodeKind::Break { target: JumpTarget::unbound() });
        let cond = ir.alloc(Span::dummy(), NodeKind::ElseIfTrue);
        let body = ir.alloc(Span::dummy(), NodeKind::Block { statements: vec![brk] });
        let lp = ir.alloc(Span::dummy(), NodeKind::WhileLoop { condition: cond, block: body });
        (lp, brk)
    }

    #[test]
    fn test_check_unit_requires_bound_jumps() {
        let mut ir = Ir::new();
        let (lp, brk) = loop_with_break(&mut ir);
        let err = check_unit(&ir, lp).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Ir(IrError::UnboundJumpTarget { jump }) if jump == brk
        ));

        ir.bind_jump_target(brk, lp).unwrap();
        assert_eq!(check_unit(&ir, lp).unwrap(), Vec::new());
    }

    #[test]
    fn test_from_multiple_flattens() {
        assert!(CompileError::from_multiple(vec![]).is_none());
        let node = Ir::new().alloc(Span::dummy(), NodeKind::ElseIfTrue);
        let single = CompileError::from_multiple(vec![CompileError::Multiple(vec![
            CompileError::Ir(IrError::NotAJump(node)),
        ])]);
        assert!(matches!(single, Some(CompileError::Ir(IrError::NotAJump(_)))));
    }
}
