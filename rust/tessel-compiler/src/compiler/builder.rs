//! Small constructors for the node shapes desugaring produces.

use crate::compiler::ir::{Ir, NodeId, NodeKind};
use crate::compiler::literal::{parse_token, ConstExpression, LiteralError};
use crate::compiler::operators::{binary_name, operation_of, Operation, OperatorError};
use crate::compiler::tokens::{LiteralToken, OperatorToken, Span};
use tessel_core::Name;

pub fn member_reference(ir: &mut Ir, span: Span, name: Name) -> NodeId {
    ir.alloc(span, NodeKind::MemberReference { name })
}

/// Read of the property `name`.
pub fn property_get(ir: &mut Ir, span: Span, name: Name) -> NodeId {
    let callee = member_reference(ir, span, name);
    ir.alloc(span, NodeKind::PropertyGet { callee })
}

/// Write of `value` into the property `name`. `operation` must be `=` or a
/// compound assignment.
pub fn property_set(
    ir: &mut Ir,
    span: Span,
    name: Name,
    value: NodeId,
    operation: Operation,
) -> Result<NodeId, OperatorError> {
    if !operation.is_assignment() {
        return Err(OperatorError::NotAnAssignment(operation));
    }
    let callee = member_reference(ir, span, name);
    Ok(ir.alloc(span, NodeKind::PropertySet { callee, value, operation }))
}

/// `name = value`.
pub fn assignment(ir: &mut Ir, span: Span, name: Name, value: NodeId) -> NodeId {
    let callee = member_reference(ir, span, name);
    ir.alloc(span, NodeKind::PropertySet { callee, value, operation: Operation::Assign })
}

/// Call of the function `name` with `arguments` in order.
pub fn function_call(ir: &mut Ir, span: Span, name: Name, arguments: Vec<NodeId>) -> NodeId {
    let callee = member_reference(ir, span, name);
    ir.alloc(span, NodeKind::FunctionCall { callee, arguments })
}

pub fn operator_call(
    ir: &mut Ir,
    span: Span,
    operation: Operation,
    arguments: Vec<NodeId>,
) -> NodeId {
    ir.alloc(span, NodeKind::OperatorCall { operation, arguments })
}

/// `lhs <op> rhs`. Arithmetic tokens become calls of their operator
/// function (`plus`, `times`, ...), everything else an operator call tagged
/// with the token's operation.
pub fn binary_operator_call(
    ir: &mut Ir,
    span: Span,
    token: OperatorToken,
    lhs: NodeId,
    rhs: NodeId,
) -> Result<NodeId, OperatorError> {
    if let Some(name) = binary_name(token) {
        return Ok(function_call(ir, span, name, vec![lhs, rhs]));
    }
    let operation = operation_of(token)?;
    Ok(operator_call(ir, span, operation, vec![lhs, rhs]))
}

pub fn block(ir: &mut Ir, span: Span, statements: Vec<NodeId>) -> NodeId {
    ir.alloc(span, NodeKind::Block { statements })
}

/// Block whose only statement is `expression`. Used for when-branch results.
pub fn single_expression_block(ir: &mut Ir, expression: NodeId) -> NodeId {
    let span = ir.span(expression);
    block(ir, span, vec![expression])
}

pub fn constant(ir: &mut Ir, span: Span, value: ConstExpression) -> NodeId {
    ir.alloc(span, NodeKind::Const(value))
}

pub fn null_constant(ir: &mut Ir, span: Span) -> NodeId {
    constant(ir, span, ConstExpression::null())
}

/// Constant for a literal token. Malformed text still yields a node carrying
/// its diagnostic; only a non-literal token is an error.
pub fn constant_from_token(ir: &mut Ir, token: &LiteralToken) -> Result<NodeId, LiteralError> {
    let value = parse_token(token)?;
    Ok(constant(ir, token.span, value))
}

pub fn implicit_type(ir: &mut Ir, span: Span) -> NodeId {
    ir.alloc(span, NodeKind::ImplicitType)
}

/// Local variable with an inferred type.
pub fn variable(
    ir: &mut Ir,
    span: Span,
    name: Name,
    is_var: bool,
    initializer: Option<NodeId>,
) -> NodeId {
    let return_type = implicit_type(ir, span);
    ir.alloc(span, NodeKind::Variable { name, return_type, is_var, initializer })
}

pub fn error_expression(ir: &mut Ir, span: Span, message: impl Into<String>) -> NodeId {
    ir.alloc(span, NodeKind::Error { message: message.into() })
}
