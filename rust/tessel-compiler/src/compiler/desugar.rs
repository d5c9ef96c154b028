//! Desugaring of `?:` and of `++`/`--` into plain IR.

use crate::compiler::builder::{
    assignment, block, error_expression, function_call, null_constant, operator_call,
    property_get, single_expression_block, variable,
};
use crate::compiler::ir::{Ir, NodeId, NodeKind};
use crate::compiler::operators::{unary_name, Operation, OperatorError};
use crate::compiler::tokens::{OperatorToken, Span};
use tessel_core::Name;

/// `lhs ?: other` as a when expression over a subject variable `<case_id>`:
///
/// ```text
/// when (val <case_id> = lhs) {
///     <subject> != null -> { <case_id> }
///     else -> { other }
/// }
/// ```
///
/// `lhs` is moved into the variable initializer; the when has no separate
/// subject expression, so no node ends up with two parents.
pub fn generate_not_null_or_other(
    ir: &mut Ir,
    span: Span,
    lhs: NodeId,
    other: NodeId,
    case_id: &str,
) -> NodeId {
    let subject_name = Name::special(case_id);
    let subject_variable = variable(ir, span, subject_name.clone(), false, Some(lhs));

    let subject = ir.alloc(span, NodeKind::WhenSubject);
    let null = null_constant(ir, span);
    let not_null = operator_call(ir, span, Operation::NotEq, vec![subject, null]);
    let read = property_get(ir, span, subject_name);
    let read_block = single_expression_block(ir, read);
    let first = ir.alloc(span, NodeKind::WhenBranch { condition: not_null, result: read_block });

    let other_span = ir.span(other);
    let always = ir.alloc(span, NodeKind::ElseIfTrue);
    let other_block = single_expression_block(ir, other);
    let second =
        ir.alloc(other_span, NodeKind::WhenBranch { condition: always, result: other_block });

    ir.alloc(
        span,
        NodeKind::When {
            subject: None,
            subject_variable: Some(subject_variable),
            branches: vec![first, second],
        },
    )
}

/// `x++`, `++x`, `x--` or `--x` as a block:
///
/// ```text
/// { val <unary> = x; x = inc(<unary>); x }   // prefix
/// { val <unary> = x; x = inc(<unary>); <unary> }   // postfix
/// ```
///
/// An absent operand, or one that is not a plain name, yields an error
/// expression instead.
pub fn generate_increment_or_decrement_block(
    ir: &mut Ir,
    span: Span,
    operand: Option<NodeId>,
    call_name: Name,
    prefix: bool,
) -> NodeId {
    let Some(operand) = operand else {
        return error_expression(ir, span, "Inc/dec without operand");
    };
    let Some(operand_name) = simple_name(ir, operand) else {
        return error_expression(ir, span, "Inc/dec operand is not a simple name");
    };
    let operand_span = ir.span(operand);
    let temp = Name::special("unary");

    let read_operand = property_get(ir, operand_span, operand_name.clone());
    let temp_variable = variable(ir, span, temp.clone(), false, Some(read_operand));

    let read_temp = property_get(ir, span, temp.clone());
    let call = function_call(ir, span, call_name, vec![read_temp]);
    let assign = assignment(ir, operand_span, operand_name.clone(), call);

    let result_name = if prefix { operand_name } else { temp };
    let result = property_get(ir, span, result_name);
    block(ir, span, vec![temp_variable, assign, result])
}

/// Same as [`generate_increment_or_decrement_block`] with the operator
/// function picked from a `++`/`--` token.
pub fn desugar_unary_update(
    ir: &mut Ir,
    span: Span,
    operand: Option<NodeId>,
    token: OperatorToken,
    prefix: bool,
) -> Result<NodeId, OperatorError> {
    match (token, unary_name(token)) {
        (OperatorToken::PlusPlus | OperatorToken::MinusMinus, Some(name)) => {
            Ok(generate_increment_or_decrement_block(ir, span, operand, name, prefix))
        }
        _ => Err(OperatorError::NoOperation(token)),
    }
}

/// The referenced name when `id` is a read of a plain name.
fn simple_name(ir: &Ir, id: NodeId) -> Option<Name> {
    let NodeKind::PropertyGet { callee } = ir.kind(id) else {
        return None;
    };
    match ir.kind(*callee) {
        NodeKind::MemberReference { name } => Some(name.clone()),
        _ => None,
    }
}
