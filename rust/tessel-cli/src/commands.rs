//! Command implementations behind the `tessel` binary. Each returns the
//! text to print so the binary stays a thin argument parser.

use crate::config::{ConfigError, TesselConfig};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tessel_compiler::compiler::builder::{self, constant_from_token, property_get};
use tessel_compiler::compiler::desugar::{desugar_unary_update, generate_not_null_or_other};
use tessel_compiler::compiler::ir::{Ir, NodeId};
use tessel_compiler::compiler::literal::{parse_literal, ConstExpression};
use tessel_compiler::compiler::render::{render_json, render_tree};
use tessel_compiler::compiler::tokens::{LiteralToken, OperatorToken, Span, SyntaxKind};
use tessel_compiler::diagnostics::Diagnostic;
use tessel_compiler::{check_unit, CompileError};
use tessel_core::{Name, NameError};
use tessel_incremental::{
    incremental_package_part_provider, CacheError, InMemoryComponents,
    IncrementalCompilationComponents, PackagePartProvider,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown syntax kind '{0}'")]
    UnknownSyntaxKind(String),
    #[error("invalid name '{text}': {source}")]
    Name { text: String, source: NameError },
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Printed text plus whether the command found problems in its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub output: String,
    pub failed: bool,
}

impl Report {
    fn new(output: String, diagnostics: &[Diagnostic]) -> Self {
        Self { output, failed: !diagnostics.is_empty() }
    }
}

#[derive(Serialize)]
struct LiteralView<'a> {
    constant: &'a ConstExpression,
    diagnostics: &'a [Diagnostic],
}

/// Parse one literal of syntax kind `kind` (`int`, `float`, `char`, `bool`,
/// `null` or a full kind name such as `integer_constant`).
pub fn literal(kind: &str, text: &str, json: bool) -> Result<Report, CliError> {
    let kind =
        SyntaxKind::from_str(kind).map_err(|_| CliError::UnknownSyntaxKind(kind.to_string()))?;
    let constant = parse_literal(kind, text).map_err(CompileError::from)?;
    let mut ir = Ir::new();
    let id = builder::constant(&mut ir, Span::new(0, text.len(), 1, 1), constant.clone());
    let diagnostics = check_unit(&ir, id)?;

    let output = if json {
        let view = LiteralView { constant: &constant, diagnostics: &diagnostics };
        serde_json::to_string_pretty(&view)?
    } else if diagnostics.is_empty() {
        match constant.value() {
            Some(value) => format!("{} {}", constant.kind(), value),
            None => constant.kind().to_string(),
        }
    } else {
        diagnostics.iter().map(Diagnostic::render_plain).collect::<String>()
    };
    Ok(Report::new(output, &diagnostics))
}

/// Desugarings the `desugar` command can print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesugarRequest {
    /// `lhs ?: rhs`
    Elvis { lhs: String, rhs: String },
    /// `x++`/`++x` (`increment`) or `x--`/`--x`; no operand gives the error
    /// expression.
    Update { operand: Option<String>, increment: bool, prefix: bool },
}

pub fn desugar(request: &DesugarRequest, json: bool) -> Result<Report, CliError> {
    let mut ir = Ir::new();
    let root = match request {
        DesugarRequest::Elvis { lhs, rhs } => {
            let lhs = operand(&mut ir, lhs, 1)?;
            let rhs = operand(&mut ir, rhs, 2)?;
            generate_not_null_or_other(&mut ir, Span::dummy(), lhs, rhs, "elvis")
        }
        DesugarRequest::Update { operand: text, increment, prefix } => {
            let target = match text {
                Some(text) => Some(operand(&mut ir, text, 1)?),
                None => None,
            };
            let token =
                if *increment { OperatorToken::PlusPlus } else { OperatorToken::MinusMinus };
            desugar_unary_update(&mut ir, Span::new(0, 0, 1, 1), target, token, *prefix)
                .map_err(CompileError::from)?
        }
    };

    let diagnostics = check_unit(&ir, root)?;
    let mut output = if json { render_json(&ir, root)? } else { render_tree(&ir, root) };
    for diagnostic in &diagnostics {
        if !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&diagnostic.render_plain());
    }
    Ok(Report::new(output, &diagnostics))
}

/// A name reads as a property get; text starting with a digit is an integer
/// literal. `col` only places diagnostics.
fn operand(ir: &mut Ir, text: &str, col: usize) -> Result<NodeId, CliError> {
    let span = Span::new(0, text.len(), 1, col);
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        let token = LiteralToken::new(SyntaxKind::IntegerConstant, text, span);
        let id = constant_from_token(ir, &token).map_err(CompileError::from)?;
        return Ok(id);
    }
    let name = Name::identifier(text)
        .map_err(|source| CliError::Name { text: text.to_string(), source })?;
    Ok(property_get(ir, span, name))
}

/// Parts of `package` as seen through the incremental caches `config`
/// names, layered over its `[delegate]` table.
pub fn package_parts(
    config_path: &Path,
    config: &TesselConfig,
    package: &str,
) -> Result<Vec<String>, CliError> {
    let parent: Arc<dyn PackagePartProvider> = Arc::new(config.delegate_provider());
    let sources = config.source_units();

    let (module_ids, components) = match (&config.incremental, config.cache_dir(config_path)) {
        (Some(section), Some(dir)) => {
            let components = InMemoryComponents::load_dir(&dir, &section.module_ids)?;
            (Some(section.module_ids.as_slice()), Some(components))
        }
        _ => (None, None),
    };
    let components = components.as_ref().map(|c| c as &dyn IncrementalCompilationComponents);

    let provider = incremental_package_part_provider(parent, sources, module_ids, components);
    Ok(provider.find_package_parts(package))
}
