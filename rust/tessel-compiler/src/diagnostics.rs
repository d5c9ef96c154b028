//! Diagnostics collected from a tree and rendered as plain text.

use crate::compiler::error_codes::{error_code, malformed_literal_code, ERROR_EXPRESSION_CODE};
use crate::compiler::ir::{Ir, NodeId, NodeKind};
use crate::compiler::operators::OperatorError;
use crate::compiler::tokens::Span;
use crate::compiler::visitor::IrVisitor;
use crate::CompileError;
use serde::Serialize;

/// Severity level for diagnostics. Every check here is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
}

/// A rendered diagnostic with its location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub col: Option<usize>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: Some(code.to_string()),
            message: message.into(),
            file: None,
            line: None,
            col: None,
            suggestions: Vec::new(),
        }
    }

    /// Attach a source location. Synthesized spans carry none.
    pub fn at(mut self, span: Span) -> Self {
        if !span.is_dummy() {
            self.line = Some(span.line);
            self.col = Some(span.col);
        }
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Render without colors (for logs, tests)
    pub fn render_plain(&self) -> String {
        let mut out = String::new();

        let severity_label = match self.severity {
            Severity::Error => "error",
        };

        if let Some(ref code) = self.code {
            out.push_str(&format!("{}[{}]: ", severity_label, code));
        } else {
            out.push_str(&format!("{}: ", severity_label));
        }
        out.push_str(&self.message);
        out.push('\n');

        match (&self.file, self.line, self.col) {
            (Some(file), Some(line), Some(col)) => {
                out.push_str(&format!("  --> {}:{}:{}\n", file, line, col))
            }
            (Some(file), Some(line), None) => out.push_str(&format!("  --> {}:{}\n", file, line)),
            (None, Some(line), Some(col)) => out.push_str(&format!("  --> {}:{}\n", line, col)),
            _ => {}
        }

        for suggestion in &self.suggestions {
            out.push_str(&format!("   = help: {}\n", suggestion));
        }

        out
    }
}

/// Visitor that records every malformed constant and error expression below
/// the node it starts from, in preorder.
#[derive(Debug, Default)]
pub struct DiagnosticCollector;

impl IrVisitor for DiagnosticCollector {
    type Data = Vec<Diagnostic>;
    type Output = ();

    fn visit_element(&mut self, ir: &Ir, id: NodeId, out: &mut Vec<Diagnostic>) {
        ir.accept_children(id, self, out);
    }

    fn visit_const_expression(&mut self, ir: &Ir, id: NodeId, out: &mut Vec<Diagnostic>) {
        if let NodeKind::Const(constant) = ir.kind(id) {
            if let Some(message) = constant.error() {
                let code = malformed_literal_code(constant.kind());
                out.push(Diagnostic::error(code, message).at(ir.span(id)));
            }
        }
    }

    fn visit_error_expression(&mut self, ir: &Ir, id: NodeId, out: &mut Vec<Diagnostic>) {
        if let NodeKind::Error { message } = ir.kind(id) {
            out.push(Diagnostic::error(ERROR_EXPRESSION_CODE, message.as_str()).at(ir.span(id)));
        }
    }
}

/// Diagnostics of the tree rooted at `root`.
pub fn collect_diagnostics(ir: &Ir, root: NodeId) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    ir.accept(root, &mut DiagnosticCollector, &mut out);
    out
}

/// Format a fatal `CompileError` as diagnostics, one per underlying error.
pub fn format_compile_error(error: &CompileError, filename: &str) -> Vec<Diagnostic> {
    match error {
        CompileError::Multiple(errors) => {
            errors.iter().flat_map(|e| format_compile_error(e, filename)).collect()
        }
        single => {
            let mut diagnostic = Diagnostic::error(error_code(single), single.to_string());
            if matches!(single, CompileError::Operator(OperatorError::NoOperation(_))) {
                diagnostic.suggestions.push(
                    "arithmetic operators are lowered to operator function calls".to_string(),
                );
            }
            vec![diagnostic.in_file(filename)]
        }
    }
}
