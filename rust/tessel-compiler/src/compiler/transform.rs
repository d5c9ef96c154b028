//! In-place rewriting of the IR.
//!
//! A transformer handler returns [`Transformed::Unchanged`] or
//! [`Transformed::Replaced`] with the handle of a node to put in the slot the
//! visited node came from. Handlers follow the same fallback chain as
//! [`IrVisitor`](crate::compiler::visitor::IrVisitor), ending at the required
//! [`IrTransformer::transform_element`].
//!
//! Containers keep their identity: [`Ir::transform_children`] rewrites the
//! child slots of a node and returns the node itself.

use crate::compiler::ir::{Ir, IrError, IrResult, NodeId, NodeKind};

/// Outcome of transforming one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformed {
    Unchanged,
    Replaced(NodeId),
}

impl Transformed {
    /// The handle that should occupy the slot `original` came from.
    pub fn resolve(self, original: NodeId) -> NodeId {
        match self {
            Transformed::Unchanged => original,
            Transformed::Replaced(id) => id,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Transformed::Unchanged)
    }
}

/// A replacement handle must be a node with no other parent: freshly
/// allocated, or detached from the slot it previously occupied. Reusing an
/// attached node makes it shared between two parents. Only the cycle case
/// (the container or one of its ancestors coming back as its own child) is
/// rejected, by [`Ir::transform_children`].
pub trait IrTransformer {
    type Data;

    /// Root of every fallback chain. A transformer that only needs to
    /// descend can answer with `ir.transform_children(id, self, data)` and
    /// `Transformed::Unchanged`.
    fn transform_element(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed>;

    /// Fallback for all statements.
    fn transform_statement(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_element(ir, id, data)
    }

    /// Fallback for all expressions.
    fn transform_expression(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_statement(ir, id, data)
    }

    fn transform_block(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    /// Fallback for all calls.
    fn transform_call(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    fn transform_annotation_call(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_call(ir, id, data)
    }

    fn transform_function_call(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_call(ir, id, data)
    }

    fn transform_operator_call(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_call(ir, id, data)
    }

    fn transform_const_expression(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    fn transform_error_expression(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    /// Fallback for all jumps.
    fn transform_jump(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    fn transform_break_statement(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_jump(ir, id, data)
    }

    fn transform_continue_statement(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_jump(ir, id, data)
    }

    fn transform_return_statement(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_jump(ir, id, data)
    }

    /// Fallback for all member accesses.
    fn transform_member_access(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    fn transform_property_get(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_member_access(ir, id, data)
    }

    /// Fallback for all member sets.
    fn transform_set(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_member_access(ir, id, data)
    }

    fn transform_property_set(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_set(ir, id, data)
    }

    fn transform_when_expression(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    fn transform_when_subject_expression(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    fn transform_else_if_true_condition(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_expression(ir, id, data)
    }

    /// Fallback for all loops.
    fn transform_loop(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_statement(ir, id, data)
    }

    fn transform_while_loop(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_loop(ir, id, data)
    }

    fn transform_do_while_loop(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_loop(ir, id, data)
    }

    /// Fallback for all declarations. Declarations are not statements.
    fn transform_declaration(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_element(ir, id, data)
    }

    fn transform_variable(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_declaration(ir, id, data)
    }

    /// Fallback for declarations that own a body.
    fn transform_declaration_with_body(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_declaration(ir, id, data)
    }

    /// Fallback for all functions.
    fn transform_function(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_declaration_with_body(ir, id, data)
    }

    fn transform_named_function(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_function(ir, id, data)
    }

    fn transform_when_branch(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_element(ir, id, data)
    }

    /// Fallback for all type references.
    fn transform_type(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_element(ir, id, data)
    }

    fn transform_implicit_type(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_type(ir, id, data)
    }

    fn transform_user_type(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_type(ir, id, data)
    }

    /// Fallback for all references.
    fn transform_reference(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_element(ir, id, data)
    }

    fn transform_member_reference(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_reference(ir, id, data)
    }

    fn transform_file(
        &mut self,
        ir: &mut Ir,
        id: NodeId,
        data: &mut Self::Data,
    ) -> IrResult<Transformed> {
        self.transform_element(ir, id, data)
    }
}

impl Ir {
    /// Dispatch `id` to the transformer handler of its concrete kind.
    pub fn transform<T: IrTransformer + ?Sized>(
        &mut self,
        id: NodeId,
        transformer: &mut T,
        data: &mut T::Data,
    ) -> IrResult<Transformed> {
        match self.kind(id) {
            NodeKind::File { .. } => transformer.transform_file(self, id, data),
            NodeKind::Block { .. } => transformer.transform_block(self, id, data),
            NodeKind::AnnotationCall { .. } => {
                transformer.transform_annotation_call(self, id, data)
            }
            NodeKind::FunctionCall { .. } => transformer.transform_function_call(self, id, data),
            NodeKind::OperatorCall { .. } => transformer.transform_operator_call(self, id, data),
            NodeKind::Const(_) => transformer.transform_const_expression(self, id, data),
            NodeKind::Error { .. } => transformer.transform_error_expression(self, id, data),
            NodeKind::Break { .. } => transformer.transform_break_statement(self, id, data),
            NodeKind::Continue { .. } => transformer.transform_continue_statement(self, id, data),
            NodeKind::Return { .. } => transformer.transform_return_statement(self, id, data),
            NodeKind::PropertyGet { .. } => transformer.transform_property_get(self, id, data),
            NodeKind::PropertySet { .. } => transformer.transform_property_set(self, id, data),
            NodeKind::When { .. } => transformer.transform_when_expression(self, id, data),
            NodeKind::WhenSubject => transformer.transform_when_subject_expression(self, id, data),
            NodeKind::ElseIfTrue => transformer.transform_else_if_true_condition(self, id, data),
            NodeKind::WhenBranch { .. } => transformer.transform_when_branch(self, id, data),
            NodeKind::WhileLoop { .. } => transformer.transform_while_loop(self, id, data),
            NodeKind::DoWhileLoop { .. } => transformer.transform_do_while_loop(self, id, data),
            NodeKind::Variable { .. } => transformer.transform_variable(self, id, data),
            NodeKind::NamedFunction { .. } => transformer.transform_named_function(self, id, data),
            NodeKind::ImplicitType => transformer.transform_implicit_type(self, id, data),
            NodeKind::UserType { .. } => transformer.transform_user_type(self, id, data),
            NodeKind::MemberReference { .. } => {
                transformer.transform_member_reference(self, id, data)
            }
        }
    }

    /// Transform the node held in `slot` and store the result back into it.
    pub fn transform_single<T: IrTransformer + ?Sized>(
        &mut self,
        slot: &mut NodeId,
        transformer: &mut T,
        data: &mut T::Data,
    ) -> IrResult<Transformed> {
        let result = self.transform(*slot, transformer, data)?;
        *slot = result.resolve(*slot);
        Ok(result)
    }

    /// Transform each element of `list` in order, replacing it in place.
    /// Order and length are preserved.
    pub fn transform_in_place<T: IrTransformer + ?Sized>(
        &mut self,
        list: &mut [NodeId],
        transformer: &mut T,
        data: &mut T::Data,
    ) -> IrResult<()> {
        for slot in list.iter_mut() {
            self.transform_single(slot, transformer, data)?;
        }
        Ok(())
    }

    /// Transform every child of `id`, annotations first and then the
    /// kind-specific children in evaluation order, and write the results
    /// back. Returns `id`: the container itself is never replaced here.
    ///
    /// A replacement that does not fit its slot (an expression where a type
    /// is required, say) or that contains `id` fails the whole node and
    /// leaves it untouched.
    pub fn transform_children<T: IrTransformer + ?Sized>(
        &mut self,
        id: NodeId,
        transformer: &mut T,
        data: &mut T::Data,
    ) -> IrResult<NodeId> {
        let slots = self.node(id).child_slots();
        let mut children: Vec<NodeId> = slots.iter().map(|&(child, _)| child).collect();
        self.transform_in_place(&mut children, transformer, data)?;
        for (&(original, expected), &new) in slots.iter().zip(&children) {
            if new != original {
                self.expect_kind(new, expected)?;
                if self.descendants(new).contains(&id) {
                    return Err(IrError::CyclicReplacement { parent: id, replacement: new });
                }
            }
        }
        self.node_mut(id).set_children(&children);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::ElementKind;
    use crate::compiler::literal::ConstExpression;
    use crate::compiler::operators::Operation;
    use crate::compiler::tokens::Span;
    use tessel_core::{ConstValue, Name};

    /// Walks everything, replaces nothing.
    struct Descend;

    impl IrTransformer for Descend {
        type Data = usize;

        fn transform_element(
            &mut self,
            ir: &mut Ir,
            id: NodeId,
            seen: &mut usize,
        ) -> IrResult<Transformed> {
            *seen += 1;
            ir.transform_children(id, self, seen)?;
            Ok(Transformed::Unchanged)
        }
    }

    /// Multiplies every int constant by ten.
    struct ScaleInts;

    impl IrTransformer for ScaleInts {
        type Data = ();

        fn transform_element(
            &mut self,
            ir: &mut Ir,
            id: NodeId,
            data: &mut (),
        ) -> IrResult<Transformed> {
            ir.transform_children(id, self, data)?;
            Ok(Transformed::Unchanged)
        }

        fn transform_const_expression(
            &mut self,
            ir: &mut Ir,
            id: NodeId,
            _: &mut (),
        ) -> IrResult<Transformed> {
            let scaled = match ir.kind(id) {
                NodeKind::Const(c) => match c.value() {
                    Some(ConstValue::Int(n)) => n * 10,
                    _ => return Ok(Transformed::Unchanged),
                },
                _ => return Ok(Transformed::Unchanged),
            };
            let span = ir.span(id);
            let new = ir.alloc(span, NodeKind::Const(ConstExpression::of(ConstValue::Int(scaled))));
            Ok(Transformed::Replaced(new))
        }
    }

    /// Swaps every type for a constant, which no type slot accepts.
    struct TypeToConst;

    impl IrTransformer for TypeToConst {
        type Data = ();

        fn transform_element(
            &mut self,
            ir: &mut Ir,
            id: NodeId,
            data: &mut (),
        ) -> IrResult<Transformed> {
            ir.transform_children(id, self, data)?;
            Ok(Transformed::Unchanged)
        }

        fn transform_type(&mut self, ir: &mut Ir, id: NodeId, _: &mut ()) -> IrResult<Transformed> {
            let span = ir.span(id);
            Ok(Transformed::Replaced(ir.alloc(span, NodeKind::Const(ConstExpression::null()))))
        }
    }

    /// Replaces each operator call with a fresh block around it, or with the
    /// node passed as data.
    struct WrapCalls {
        reuse_parent: bool,
    }

    impl IrTransformer for WrapCalls {
        type Data = NodeId;

        fn transform_element(
            &mut self,
            ir: &mut Ir,
            id: NodeId,
            data: &mut NodeId,
        ) -> IrResult<Transformed> {
            ir.transform_children(id, self, data)?;
            Ok(Transformed::Unchanged)
        }

        fn transform_operator_call(
            &mut self,
            ir: &mut Ir,
            id: NodeId,
            parent: &mut NodeId,
        ) -> IrResult<Transformed> {
            if self.reuse_parent {
                return Ok(Transformed::Replaced(*parent));
            }
            let span = ir.span(id);
            Ok(Transformed::Replaced(ir.alloc(span, NodeKind::Block { statements: vec![id] })))
        }
    }

    fn int(ir: &mut Ir, n: i32) -> NodeId {
        ir.alloc(Span::dummy(), NodeKind::Const(ConstExpression::of(ConstValue::Int(n))))
    }

    fn sample(ir: &mut Ir) -> NodeId {
        let a = int(ir, 1);
        let b = int(ir, 2);
        let lt = ir.alloc(
            Span::dummy(),
            NodeKind::OperatorCall { operation: Operation::Lt, arguments: vec![a, b] },
        );
        let annotation_type = ir.alloc(
            Span::dummy(),
            NodeKind::UserType { name: Name::identifier("Deprecated").unwrap(), nullable: false },
        );
        let annotation = ir.alloc(
            Span::dummy(),
            NodeKind::AnnotationCall { annotation_type, arguments: vec![] },
        );
        ir.annotate(lt, annotation).unwrap();
        ir.alloc(Span::dummy(), NodeKind::Block { statements: vec![lt] })
    }

    #[test]
    fn test_identity_transform_round_trips() {
        let mut ir = Ir::new();
        let mut root = sample(&mut ir);
        let before = ir.clone();

        let mut seen = 0;
        let result = ir.transform_single(&mut root, &mut Descend, &mut seen).unwrap();
        assert!(result.is_unchanged());
        assert_eq!(ir, before);
        assert_eq!(seen, ir.descendants(root).len());
    }

    #[test]
    fn test_replacement_is_written_back_in_order() {
        let mut ir = Ir::new();
        let root = sample(&mut ir);
        let lt = ir.children(root)[0];
        let before = ir.children(lt);

        let returned = ir.transform_children(root, &mut ScaleInts, &mut ()).unwrap();
        assert_eq!(returned, root);
        assert_eq!(ir.children(root), vec![lt]);

        let after = ir.children(lt);
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], before[0], "annotation slot untouched");
        let values: Vec<_> = after[1..]
            .iter()
            .map(|&id| match ir.kind(id) {
                NodeKind::Const(c) => c.value(),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![Some(ConstValue::Int(10)), Some(ConstValue::Int(20))]);
    }

    #[test]
    fn test_transform_in_place_keeps_length() {
        let mut ir = Ir::new();
        let mut list = vec![int(&mut ir, 3), int(&mut ir, 4), int(&mut ir, 5)];
        ir.transform_in_place(&mut list, &mut ScaleInts, &mut ()).unwrap();
        assert_eq!(list.len(), 3);
        let first = match ir.kind(list[0]) {
            NodeKind::Const(c) => c.value(),
            _ => None,
        };
        assert_eq!(first, Some(ConstValue::Int(30)));
    }

    #[test]
    fn test_incompatible_replacement_is_rejected() {
        let mut ir = Ir::new();
        let root = sample(&mut ir);
        let lt = ir.children(root)[0];
        let annotation = ir.children(lt)[0];
        let before = ir.children(annotation);

        let err = ir.transform_children(root, &mut TypeToConst, &mut ()).unwrap_err();
        match err {
            IrError::IncompatibleReplacement { expected, found, .. } => {
                assert_eq!(expected, ElementKind::Type);
                assert_eq!(found, ElementKind::ConstExpression);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ir.children(annotation), before);
    }

    #[test]
    fn test_detached_node_can_move_under_a_fresh_wrapper() {
        let mut ir = Ir::new();
        let mut root = sample(&mut ir);
        let lt = ir.children(root)[0];

        ir.transform_children(root, &mut WrapCalls { reuse_parent: false }, &mut root).unwrap();
        let wrapper = ir.children(root)[0];
        assert_ne!(wrapper, lt);
        assert_eq!(ir.children(wrapper), vec![lt]);
    }

    #[test]
    fn test_parent_as_its_own_child_is_rejected() {
        let mut ir = Ir::new();
        let mut root = sample(&mut ir);
        let lt = ir.children(root)[0];

        let err = ir
            .transform_children(root, &mut WrapCalls { reuse_parent: true }, &mut root)
            .unwrap_err();
        assert_eq!(err, IrError::CyclicReplacement { parent: root, replacement: root });
        assert_eq!(ir.children(root), vec![lt]);
        assert_eq!(ir.descendants(root).len(), 6);
    }
}
