//! Read-only double-dispatch traversal of the IR.
//!
//! [`Ir::accept`] routes a node to the handler of its concrete kind. Every
//! handler except [`IrVisitor::visit_element`] defaults to the handler of the
//! node's structural supertype (see [`ElementKind::parent`]), so a visitor
//! that only overrides `visit_expression` sees every expression kind,
//! including ones added later.
//!
//! Handlers do not recurse on their own; call [`Ir::accept_children`] from a
//! handler to descend.
//!
//! [`ElementKind::parent`]: crate::compiler::ir::ElementKind::parent

use crate::compiler::ir::{Ir, NodeId, NodeKind};

pub trait IrVisitor {
    /// Caller-supplied accumulator threaded through the walk.
    type Data;
    type Output;

    /// Root of every fallback chain.
    fn visit_element(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output;

    /// Fallback for all statements.
    fn visit_statement(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_element(ir, id, data)
    }

    /// Fallback for all expressions.
    fn visit_expression(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_statement(ir, id, data)
    }

    fn visit_block(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    /// Fallback for all calls.
    fn visit_call(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    fn visit_annotation_call(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_call(ir, id, data)
    }

    fn visit_function_call(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_call(ir, id, data)
    }

    fn visit_operator_call(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_call(ir, id, data)
    }

    fn visit_const_expression(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    fn visit_error_expression(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    /// Fallback for all jumps.
    fn visit_jump(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    fn visit_break_statement(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_jump(ir, id, data)
    }

    fn visit_continue_statement(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_jump(ir, id, data)
    }

    fn visit_return_statement(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_jump(ir, id, data)
    }

    /// Fallback for all member accesses.
    fn visit_member_access(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    fn visit_property_get(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_member_access(ir, id, data)
    }

    /// Fallback for all member sets.
    fn visit_set(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_member_access(ir, id, data)
    }

    fn visit_property_set(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_set(ir, id, data)
    }

    fn visit_when_expression(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    fn visit_when_subject_expression(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    fn visit_else_if_true_condition(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_expression(ir, id, data)
    }

    /// Fallback for all loops.
    fn visit_loop(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_statement(ir, id, data)
    }

    fn visit_while_loop(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_loop(ir, id, data)
    }

    fn visit_do_while_loop(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_loop(ir, id, data)
    }

    /// Fallback for all declarations. Declarations are not statements.
    fn visit_declaration(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_element(ir, id, data)
    }

    fn visit_variable(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_declaration(ir, id, data)
    }

    /// Fallback for declarations that own a body.
    fn visit_declaration_with_body(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_declaration(ir, id, data)
    }

    /// Fallback for all functions.
    fn visit_function(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_declaration_with_body(ir, id, data)
    }

    fn visit_named_function(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_function(ir, id, data)
    }

    fn visit_when_branch(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_element(ir, id, data)
    }

    /// Fallback for all type references.
    fn visit_type(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_element(ir, id, data)
    }

    fn visit_implicit_type(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_type(ir, id, data)
    }

    fn visit_user_type(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_type(ir, id, data)
    }

    /// Fallback for all references.
    fn visit_reference(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_element(ir, id, data)
    }

    fn visit_member_reference(
        &mut self,
        ir: &Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> Self::Output {
        self.visit_reference(ir, id, data)
    }

    fn visit_file(&mut self, ir: &Ir, id: NodeId, data: &mut Self::Data) -> Self::Output {
        self.visit_element(ir, id, data)
    }
}

impl Ir {
    /// Dispatch `id` to the visitor handler of its concrete kind.
    pub fn accept<V: IrVisitor + ?Sized>(
        &self,
        id: NodeId,
        visitor: &mut V,
        data: &mut V::Data,
    ) -> V::Output {
        match self.kind(id) {
            NodeKind::File { .. } => visitor.visit_file(self, id, data),
            NodeKind::Block { .. } => visitor.visit_block(self, id, data),
            NodeKind::AnnotationCall { .. } => visitor.visit_annotation_call(self, id, data),
            NodeKind::FunctionCall { .. } => visitor.visit_function_call(self, id, data),
            NodeKind::OperatorCall { .. } => visitor.visit_operator_call(self, id, data),
            NodeKind::Const(_) => visitor.visit_const_expression(self, id, data),
            NodeKind::Error { .. } => visitor.visit_error_expression(self, id, data),
            NodeKind::Break { .. } => visitor.visit_break_statement(self, id, data),
            NodeKind::Continue { .. } => visitor.visit_continue_statement(self, id, data),
            NodeKind::Return { .. } => visitor.visit_return_statement(self, id, data),
            NodeKind::PropertyGet { .. } => visitor.visit_property_get(self, id, data),
            NodeKind::PropertySet { .. } => visitor.visit_property_set(self, id, data),
            NodeKind::When { .. } => visitor.visit_when_expression(self, id, data),
            NodeKind::WhenSubject => visitor.visit_when_subject_expression(self, id, data),
            NodeKind::ElseIfTrue => visitor.visit_else_if_true_condition(self, id, data),
            NodeKind::WhenBranch { .. } => visitor.visit_when_branch(self, id, data),
            NodeKind::WhileLoop { .. } => visitor.visit_while_loop(self, id, data),
            NodeKind::DoWhileLoop { .. } => visitor.visit_do_while_loop(self, id, data),
            NodeKind::Variable { .. } => visitor.visit_variable(self, id, data),
            NodeKind::NamedFunction { .. } => visitor.visit_named_function(self, id, data),
            NodeKind::ImplicitType => visitor.visit_implicit_type(self, id, data),
            NodeKind::UserType { .. } => visitor.visit_user_type(self, id, data),
            NodeKind::MemberReference { .. } => visitor.visit_member_reference(self, id, data),
        }
    }

    /// Visit every child of `id` (annotations first), discarding results.
    pub fn accept_children<V: IrVisitor + ?Sized>(
        &self,
        id: NodeId,
        visitor: &mut V,
        data: &mut V::Data,
    ) {
        for child in self.children(id) {
            self.accept(child, visitor, data);
        }
    }
}
