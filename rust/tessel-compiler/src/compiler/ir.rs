//! Arena-backed IR tree.
//!
//! Nodes are stored in an [`Ir`] arena and addressed by [`NodeId`]. Every
//! node owns its children exclusively; a child handle appears in exactly one
//! parent slot. Replacing a child (see `transform`) leaves the old node in
//! the arena detached, and detached nodes are never visited.
//!
//! Each concrete node kind sits on exactly one chain of structural
//! supertypes, encoded by [`ElementKind::parent`]:
//!
//! ```text
//! Element
//! ├─ Statement
//! │  ├─ Expression
//! │  │  ├─ Block
//! │  │  ├─ Call ─ AnnotationCall | FunctionCall | OperatorCall
//! │  │  ├─ ConstExpression
//! │  │  ├─ ErrorExpression
//! │  │  ├─ Jump ─ BreakStatement | ContinueStatement | ReturnStatement
//! │  │  ├─ MemberAccess ─ PropertyGet | Set ─ PropertySet
//! │  │  ├─ WhenExpression
//! │  │  ├─ WhenSubjectExpression
//! │  │  └─ ElseIfTrueCondition
//! │  └─ Loop ─ WhileLoop | DoWhileLoop
//! ├─ Declaration
//! │  ├─ Variable
//! │  └─ DeclarationWithBody ─ Function ─ NamedFunction
//! ├─ WhenBranch
//! ├─ Type ─ ImplicitType | UserType
//! ├─ Reference ─ MemberReference
//! └─ File
//! ```
//!
//! Declarations are not statements for dispatch, but a block's statement
//! slots accept them (see [`ElementKind::fits_slot`]).

use crate::compiler::literal::ConstExpression;
use crate::compiler::operators::Operation;
use crate::compiler::tokens::Span;
use serde::Serialize;
use std::fmt;
use strum_macros::{Display, EnumIter};
use tessel_core::{FqName, Name};
use thiserror::Error;

/// Fatal inconsistencies in a tree. These abort the current unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("jump {jump} was read before its target was bound")]
    UnboundJumpTarget { jump: NodeId },
    #[error("jump {jump} is already bound to {existing}")]
    JumpTargetRebound { jump: NodeId, existing: NodeId },
    #[error("{target} ({found}) cannot be the target of {jump}, expected a {expected}")]
    InvalidJumpTarget { jump: NodeId, target: NodeId, expected: ElementKind, found: ElementKind },
    #[error("{0} is not a jump")]
    NotAJump(NodeId),
    #[error("replacement {replacement} is a {found}, the slot requires a {expected}")]
    IncompatibleReplacement { replacement: NodeId, expected: ElementKind, found: ElementKind },
    #[error("replacement {replacement} contains its own parent {parent}")]
    CyclicReplacement { parent: NodeId, replacement: NodeId },
}

pub type IrResult<T> = Result<T, IrError>;

/// Handle of a node inside an [`Ir`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag of every concrete node kind and every structural supertype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum ElementKind {
    Element,
    Statement,
    Expression,
    Block,
    Call,
    AnnotationCall,
    FunctionCall,
    OperatorCall,
    ConstExpression,
    ErrorExpression,
    Jump,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    MemberAccess,
    PropertyGet,
    Set,
    PropertySet,
    WhenExpression,
    WhenSubjectExpression,
    ElseIfTrueCondition,
    Loop,
    WhileLoop,
    DoWhileLoop,
    Declaration,
    Variable,
    DeclarationWithBody,
    Function,
    NamedFunction,
    WhenBranch,
    Type,
    ImplicitType,
    UserType,
    Reference,
    MemberReference,
    File,
}

impl ElementKind {
    /// The structural supertype. `Element` is the only root.
    pub fn parent(self) -> Option<ElementKind> {
        use ElementKind as K;
        let parent = match self {
            K::Element => return None,
            K::Statement | K::Declaration | K::WhenBranch | K::Type | K::Reference | K::File => {
                K::Element
            }
            K::Expression | K::Loop => K::Statement,
            K::Block
            | K::Call
            | K::ConstExpression
            | K::ErrorExpression
            | K::Jump
            | K::MemberAccess
            | K::WhenExpression
            | K::WhenSubjectExpression
            | K::ElseIfTrueCondition => K::Expression,
            K::AnnotationCall | K::FunctionCall | K::OperatorCall => K::Call,
            K::BreakStatement | K::ContinueStatement | K::ReturnStatement => K::Jump,
            K::PropertyGet | K::Set => K::MemberAccess,
            K::PropertySet => K::Set,
            K::WhileLoop | K::DoWhileLoop => K::Loop,
            K::Variable | K::DeclarationWithBody => K::Declaration,
            K::Function => K::DeclarationWithBody,
            K::NamedFunction => K::Function,
            K::ImplicitType | K::UserType => K::Type,
            K::MemberReference => K::Reference,
        };
        Some(parent)
    }

    /// Whether `self` is `other` or lies below it in the hierarchy.
    pub fn is_subtype_of(self, other: ElementKind) -> bool {
        self.supertypes().any(|k| k == other)
    }

    /// Whether a node of kind `self` may occupy a slot requiring `slot`.
    /// Statement slots also take declarations.
    pub fn fits_slot(self, slot: ElementKind) -> bool {
        self.is_subtype_of(slot)
            || (slot == ElementKind::Statement && self.is_subtype_of(ElementKind::Declaration))
    }

    /// `self` followed by each supertype up to `Element`.
    pub fn supertypes(self) -> impl Iterator<Item = ElementKind> {
        std::iter::successors(Some(self), |k| k.parent())
    }

    /// Whether nodes of this exact kind can exist.
    pub fn is_concrete(self) -> bool {
        use ElementKind as K;
        !matches!(
            self,
            K::Element
                | K::Statement
                | K::Expression
                | K::Call
                | K::Jump
                | K::MemberAccess
                | K::Set
                | K::Loop
                | K::Declaration
                | K::DeclarationWithBody
                | K::Function
                | K::Type
                | K::Reference
        )
    }
}

/// Target slot of a break/continue/return. Starts unbound, is bound once by
/// name resolution, and must be bound before anything reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct JumpTarget(Option<NodeId>);

impl JumpTarget {
    pub fn unbound() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<NodeId> {
        self.0
    }

    pub fn is_bound(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    File { package: FqName, declarations: Vec<NodeId> },
    Block { statements: Vec<NodeId> },
    AnnotationCall { annotation_type: NodeId, arguments: Vec<NodeId> },
    FunctionCall { callee: NodeId, arguments: Vec<NodeId> },
    OperatorCall { operation: Operation, arguments: Vec<NodeId> },
    Const(ConstExpression),
    Error { message: String },
    Break { target: JumpTarget },
    Continue { target: JumpTarget },
    Return { result: NodeId, target: JumpTarget },
    PropertyGet { callee: NodeId },
    PropertySet { callee: NodeId, value: NodeId, operation: Operation },
    When { subject: Option<NodeId>, subject_variable: Option<NodeId>, branches: Vec<NodeId> },
    WhenSubject,
    ElseIfTrue,
    WhenBranch { condition: NodeId, result: NodeId },
    WhileLoop { condition: NodeId, block: NodeId },
    DoWhileLoop { block: NodeId, condition: NodeId },
    Variable { name: Name, return_type: NodeId, is_var: bool, initializer: Option<NodeId> },
    NamedFunction {
        name: Name,
        value_parameters: Vec<NodeId>,
        return_type: NodeId,
        body: Option<NodeId>,
    },
    ImplicitType,
    UserType { name: Name, nullable: bool },
    MemberReference { name: Name },
}

impl NodeKind {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            NodeKind::File { .. } => ElementKind::File,
            NodeKind::Block { .. } => ElementKind::Block,
            NodeKind::AnnotationCall { .. } => ElementKind::AnnotationCall,
            NodeKind::FunctionCall { .. } => ElementKind::FunctionCall,
            NodeKind::OperatorCall { .. } => ElementKind::OperatorCall,
            NodeKind::Const(_) => ElementKind::ConstExpression,
            NodeKind::Error { .. } => ElementKind::ErrorExpression,
            NodeKind::Break { .. } => ElementKind::BreakStatement,
            NodeKind::Continue { .. } => ElementKind::ContinueStatement,
            NodeKind::Return { .. } => ElementKind::ReturnStatement,
            NodeKind::PropertyGet { .. } => ElementKind::PropertyGet,
            NodeKind::PropertySet { .. } => ElementKind::PropertySet,
            NodeKind::When { .. } => ElementKind::WhenExpression,
            NodeKind::WhenSubject => ElementKind::WhenSubjectExpression,
            NodeKind::ElseIfTrue => ElementKind::ElseIfTrueCondition,
            NodeKind::WhenBranch { .. } => ElementKind::WhenBranch,
            NodeKind::WhileLoop { .. } => ElementKind::WhileLoop,
            NodeKind::DoWhileLoop { .. } => ElementKind::DoWhileLoop,
            NodeKind::Variable { .. } => ElementKind::Variable,
            NodeKind::NamedFunction { .. } => ElementKind::NamedFunction,
            NodeKind::ImplicitType => ElementKind::ImplicitType,
            NodeKind::UserType { .. } => ElementKind::UserType,
            NodeKind::MemberReference { .. } => ElementKind::MemberReference,
        }
    }

    /// Kind-specific children in evaluation order, each paired with the
    /// supertype its slot requires. Annotations are not included.
    pub fn slots(&self) -> Vec<(NodeId, ElementKind)> {
        use ElementKind as K;
        fn list(ids: &[NodeId], kind: ElementKind, out: &mut Vec<(NodeId, ElementKind)>) {
            out.extend(ids.iter().map(|&id| (id, kind)));
        }

        let mut out = Vec::new();
        match self {
            NodeKind::File { declarations, .. } => list(declarations, K::Declaration, &mut out),
            NodeKind::Block { statements } => list(statements, K::Statement, &mut out),
            NodeKind::AnnotationCall { annotation_type, arguments } => {
                out.push((*annotation_type, K::Type));
                list(arguments, K::Expression, &mut out);
            }
            NodeKind::FunctionCall { callee, arguments } => {
                out.push((*callee, K::Reference));
                list(arguments, K::Expression, &mut out);
            }
            NodeKind::OperatorCall { arguments, .. } => list(arguments, K::Expression, &mut out),
            NodeKind::Return { result, .. } => out.push((*result, K::Expression)),
            NodeKind::PropertyGet { callee } => out.push((*callee, K::Reference)),
            NodeKind::PropertySet { callee, value, .. } => {
                out.push((*callee, K::Reference));
                out.push((*value, K::Expression));
            }
            NodeKind::When { subject, subject_variable, branches } => {
                out.extend(subject.map(|id| (id, K::Expression)));
                out.extend(subject_variable.map(|id| (id, K::Variable)));
                list(branches, K::WhenBranch, &mut out);
            }
            NodeKind::WhenBranch { condition, result } => {
                out.push((*condition, K::Expression));
                out.push((*result, K::Block));
            }
            NodeKind::WhileLoop { condition, block } => {
                out.push((*condition, K::Expression));
                out.push((*block, K::Block));
            }
            NodeKind::DoWhileLoop { block, condition } => {
                out.push((*block, K::Block));
                out.push((*condition, K::Expression));
            }
            NodeKind::Variable { return_type, initializer, .. } => {
                out.push((*return_type, K::Type));
                out.extend(initializer.map(|id| (id, K::Expression)));
            }
            NodeKind::NamedFunction { value_parameters, return_type, body, .. } => {
                list(value_parameters, K::Variable, &mut out);
                out.push((*return_type, K::Type));
                out.extend(body.map(|id| (id, K::Block)));
            }
            NodeKind::Const(_)
            | NodeKind::Error { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::WhenSubject
            | NodeKind::ElseIfTrue
            | NodeKind::ImplicitType
            | NodeKind::UserType { .. }
            | NodeKind::MemberReference { .. } => {}
        }
        out
    }

    /// Mutable references to the same slots, in the same order as [`slots`].
    ///
    /// [`slots`]: NodeKind::slots
    pub fn slots_mut(&mut self) -> Vec<&mut NodeId> {
        let mut out: Vec<&mut NodeId> = Vec::new();
        match self {
            NodeKind::File { declarations, .. } => out.extend(declarations.iter_mut()),
            NodeKind::Block { statements } => out.extend(statements.iter_mut()),
            NodeKind::AnnotationCall { annotation_type, arguments } => {
                out.push(annotation_type);
                out.extend(arguments.iter_mut());
            }
            NodeKind::FunctionCall { callee, arguments } => {
                out.push(callee);
                out.extend(arguments.iter_mut());
            }
            NodeKind::OperatorCall { arguments, .. } => out.extend(arguments.iter_mut()),
            NodeKind::Return { result, .. } => out.push(result),
            NodeKind::PropertyGet { callee } => out.push(callee),
            NodeKind::PropertySet { callee, value, .. } => {
                out.push(callee);
                out.push(value);
            }
            NodeKind::When { subject, subject_variable, branches } => {
                out.extend(subject.as_mut());
                out.extend(subject_variable.as_mut());
                out.extend(branches.iter_mut());
            }
            NodeKind::WhenBranch { condition, result } => {
                out.push(condition);
                out.push(result);
            }
            NodeKind::WhileLoop { condition, block } => {
                out.push(condition);
                out.push(block);
            }
            NodeKind::DoWhileLoop { block, condition } => {
                out.push(block);
                out.push(condition);
            }
            NodeKind::Variable { return_type, initializer, .. } => {
                out.push(return_type);
                out.extend(initializer.as_mut());
            }
            NodeKind::NamedFunction { value_parameters, return_type, body, .. } => {
                out.extend(value_parameters.iter_mut());
                out.push(return_type);
                out.extend(body.as_mut());
            }
            NodeKind::Const(_)
            | NodeKind::Error { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::WhenSubject
            | NodeKind::ElseIfTrue
            | NodeKind::ImplicitType
            | NodeKind::UserType { .. }
            | NodeKind::MemberReference { .. } => {}
        }
        out
    }

    fn jump_target_mut(&mut self) -> Option<&mut JumpTarget> {
        match self {
            NodeKind::Break { target } | NodeKind::Continue { target } => Some(target),
            NodeKind::Return { target, .. } => Some(target),
            _ => None,
        }
    }

    fn jump_target(&self) -> Option<&JumpTarget> {
        match self {
            NodeKind::Break { target } | NodeKind::Continue { target } => Some(target),
            NodeKind::Return { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// One IR element: location, annotations, and kind-specific data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub span: Span,
    pub annotations: Vec<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    /// Annotations first, then kind-specific children, each paired with the
    /// supertype its slot requires.
    pub fn child_slots(&self) -> Vec<(NodeId, ElementKind)> {
        let mut out: Vec<(NodeId, ElementKind)> =
            self.annotations.iter().map(|&id| (id, ElementKind::AnnotationCall)).collect();
        out.extend(self.kind.slots());
        out
    }

    pub fn children(&self) -> Vec<NodeId> {
        self.child_slots().into_iter().map(|(id, _)| id).collect()
    }

    /// Overwrite every child slot, in [`children`](Node::children) order.
    /// `new` must have exactly one entry per slot.
    pub(crate) fn set_children(&mut self, new: &[NodeId]) {
        let slots = self.annotations.iter_mut().chain(self.kind.slots_mut());
        for (slot, &id) in slots.zip(new) {
            *slot = id;
        }
    }
}

/// Arena owning every node of one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ir {
    nodes: Vec<Node>,
}

impl Ir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, span: Span, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { span, annotations: Vec::new(), kind });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn element_kind(&self, id: NodeId) -> ElementKind {
        self.kind(id).element_kind()
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children()
    }

    /// `root` and every node reachable from it, parents before children.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    /// Attach an annotation call to `owner`.
    pub fn annotate(&mut self, owner: NodeId, annotation: NodeId) -> IrResult<()> {
        self.expect_kind(annotation, ElementKind::AnnotationCall)?;
        self.node_mut(owner).annotations.push(annotation);
        Ok(())
    }

    /// Bind a jump to its enclosing loop (break/continue) or function
    /// (return). Binding happens exactly once.
    pub fn bind_jump_target(&mut self, jump: NodeId, target: NodeId) -> IrResult<()> {
        let expected = match self.element_kind(jump) {
            ElementKind::BreakStatement | ElementKind::ContinueStatement => ElementKind::Loop,
            ElementKind::ReturnStatement => ElementKind::Function,
            _ => return Err(IrError::NotAJump(jump)),
        };
        let found = self.element_kind(target);
        if !found.is_subtype_of(expected) {
            return Err(IrError::InvalidJumpTarget { jump, target, expected, found });
        }
        let slot = self
            .node_mut(jump)
            .kind
            .jump_target_mut()
            .ok_or(IrError::NotAJump(jump))?;
        if let Some(existing) = slot.0 {
            return Err(IrError::JumpTargetRebound { jump, existing });
        }
        slot.0 = Some(target);
        Ok(())
    }

    /// The bound target of `jump`. Reading an unbound target is an error.
    pub fn jump_target(&self, jump: NodeId) -> IrResult<NodeId> {
        let slot = self.kind(jump).jump_target().ok_or(IrError::NotAJump(jump))?;
        slot.get().ok_or(IrError::UnboundJumpTarget { jump })
    }

    /// Check that `id` may occupy a slot requiring `expected`.
    pub fn expect_kind(&self, id: NodeId, expected: ElementKind) -> IrResult<()> {
        let found = self.element_kind(id);
        if found.fits_slot(expected) {
            Ok(())
        } else {
            Err(IrError::IncompatibleReplacement { replacement: id, expected, found })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use tessel_core::ConstValue;

    fn int(ir: &mut Ir, n: i32) -> NodeId {
        ir.alloc(Span::dummy(), NodeKind::Const(ConstExpression::of(ConstValue::Int(n))))
    }

    #[test]
    fn test_every_kind_reaches_element() {
        for kind in ElementKind::iter() {
            assert_eq!(kind.supertypes().last(), Some(ElementKind::Element), "{}", kind);
        }
        let chain: Vec<_> = ElementKind::ReturnStatement.supertypes().collect();
        assert_eq!(
            chain,
            vec![
                ElementKind::ReturnStatement,
                ElementKind::Jump,
                ElementKind::Expression,
                ElementKind::Statement,
                ElementKind::Element,
            ]
        );
    }

    #[test]
    fn test_subtyping() {
        assert!(ElementKind::PropertySet.is_subtype_of(ElementKind::MemberAccess));
        assert!(!ElementKind::Variable.is_subtype_of(ElementKind::Statement));
        assert!(ElementKind::NamedFunction.is_subtype_of(ElementKind::DeclarationWithBody));
        assert!(!ElementKind::WhenBranch.is_subtype_of(ElementKind::Statement));
        assert!(!ElementKind::Block.is_subtype_of(ElementKind::Call));
    }

    #[test]
    fn test_declaration_chains() {
        let variable: Vec<_> = ElementKind::Variable.supertypes().collect();
        assert_eq!(
            variable,
            vec![ElementKind::Variable, ElementKind::Declaration, ElementKind::Element]
        );
        let function: Vec<_> = ElementKind::NamedFunction.supertypes().collect();
        assert_eq!(
            function,
            vec![
                ElementKind::NamedFunction,
                ElementKind::Function,
                ElementKind::DeclarationWithBody,
                ElementKind::Declaration,
                ElementKind::Element,
            ]
        );
    }

    #[test]
    fn test_statement_slots_take_declarations() {
        assert!(ElementKind::Variable.fits_slot(ElementKind::Statement));
        assert!(ElementKind::NamedFunction.fits_slot(ElementKind::Statement));
        assert!(ElementKind::Block.fits_slot(ElementKind::Statement));
        assert!(!ElementKind::Variable.fits_slot(ElementKind::Expression));
        assert!(!ElementKind::WhenBranch.fits_slot(ElementKind::Statement));
        assert!(!ElementKind::Block.fits_slot(ElementKind::Declaration));
    }

    #[test]
    fn test_children_order_annotations_first() {
        let mut ir = Ir::new();
        let a = int(&mut ir, 1);
        let b = int(&mut ir, 2);
        let call = ir.alloc(
            Span::dummy(),
            NodeKind::OperatorCall { operation: Operation::Eq, arguments: vec![a, b] },
        );
        let ty = ir.alloc(Span::dummy(), NodeKind::ImplicitType);
        let ann = ir.alloc(
            Span::dummy(),
            NodeKind::AnnotationCall { annotation_type: ty, arguments: vec![] },
        );
        ir.annotate(call, ann).unwrap();
        assert_eq!(ir.children(call), vec![ann, a, b]);
        assert_eq!(ir.descendants(call), vec![call, ann, ty, a, b]);
    }

    #[test]
    fn test_slots_and_slots_mut_agree() {
        let mut ir = Ir::new();
        let init = int(&mut ir, 0);
        let ty = ir.alloc(Span::dummy(), NodeKind::ImplicitType);
        let var = ir.alloc(
            Span::dummy(),
            NodeKind::Variable {
                name: Name::special("tmp"),
                return_type: ty,
                is_var: false,
                initializer: Some(init),
            },
        );
        let mut kind = ir.kind(var).clone();
        let from_slots: Vec<NodeId> = kind.slots().into_iter().map(|(id, _)| id).collect();
        let from_mut: Vec<NodeId> = kind.slots_mut().into_iter().map(|id| *id).collect();
        assert_eq!(from_slots, from_mut);
        assert_eq!(from_slots, vec![ty, init]);
    }

    #[test]
    fn test_annotate_rejects_non_annotation() {
        let mut ir = Ir::new();
        let a = int(&mut ir, 1);
        let b = int(&mut ir, 2);
        let err = ir.annotate(a, b).unwrap_err();
        assert!(matches!(
            err,
            IrError::IncompatibleReplacement { expected: ElementKind::AnnotationCall, .. }
        ));
    }

    #[test]
    fn test_jump_target_binds_once() {
        let mut ir = Ir::new();
        let cond = ir.alloc(
            Span::dummy(),
            NodeKind::Const(ConstExpression::of(ConstValue::Boolean(true))),
        );
        let brk = ir.alloc(Span::dummy(), NodeKind::Break { target: JumpTarget::unbound() });
        let body = ir.alloc(Span::dummy(), NodeKind::Block { statements: vec![brk] });
        let lp = ir.alloc(Span::dummy(), NodeKind::WhileLoop { condition: cond, block: body });

        assert_eq!(ir.jump_target(brk), Err(IrError::UnboundJumpTarget { jump: brk }));
        ir.bind_jump_target(brk, lp).unwrap();
        assert_eq!(ir.jump_target(brk), Ok(lp));
        assert_eq!(
            ir.bind_jump_target(brk, lp),
            Err(IrError::JumpTargetRebound { jump: brk, existing: lp })
        );
    }

    #[test]
    fn test_jump_target_kind_is_checked() {
        let mut ir = Ir::new();
        let value = int(&mut ir, 1);
        let ret = ir.alloc(
            Span::dummy(),
            NodeKind::Return { result: value, target: JumpTarget::unbound() },
        );
        let err = ir.bind_jump_target(ret, value).unwrap_err();
        assert!(matches!(err, IrError::InvalidJumpTarget { expected: ElementKind::Function, .. }));
        assert_eq!(ir.bind_jump_target(value, value), Err(IrError::NotAJump(value)));
    }
}
