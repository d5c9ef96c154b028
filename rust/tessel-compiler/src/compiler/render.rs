//! Human-readable and JSON dumps of an IR tree.

use crate::compiler::ir::{ElementKind, Ir, NodeId, NodeKind};
use crate::compiler::visitor::IrVisitor;
use serde::Serialize;

/// Indented outline printer. Each node prints as its kind followed by its
/// scalar fields, children below it two spaces deeper.
#[derive(Debug, Default)]
pub struct TreePrinter {
    depth: usize,
}

impl IrVisitor for TreePrinter {
    type Data = String;
    type Output = ();

    fn visit_element(&mut self, ir: &Ir, id: NodeId, out: &mut String) {
        out.push_str(&"  ".repeat(self.depth));
        out.push_str(&label(ir, id));
        out.push('\n');
        self.depth += 1;
        ir.accept_children(id, self, out);
        self.depth -= 1;
    }
}

/// Outline of the tree rooted at `root`.
pub fn render_tree(ir: &Ir, root: NodeId) -> String {
    let mut out = String::new();
    ir.accept(root, &mut TreePrinter::default(), &mut out);
    out
}

/// Kind name plus the node's own (non-child) data.
pub fn label(ir: &Ir, id: NodeId) -> String {
    let kind = ir.element_kind(id);
    match detail(ir, id) {
        Some(detail) => format!("{} {}", kind, detail),
        None => kind.to_string(),
    }
}

fn detail(ir: &Ir, id: NodeId) -> Option<String> {
    let text = match ir.kind(id) {
        NodeKind::File { package, .. } if !package.is_root() => package.to_string(),
        NodeKind::OperatorCall { operation, .. } => operation.to_string(),
        NodeKind::PropertySet { operation, .. } => operation.to_string(),
        NodeKind::Const(constant) => match (constant.value(), constant.error()) {
            (Some(value), _) => format!("{} {}", constant.kind(), value),
            (None, Some(error)) => format!("{} !{}", constant.kind(), error),
            (None, None) => constant.kind().to_string(),
        },
        NodeKind::Error { message } => format!("{:?}", message),
        NodeKind::Break { target } | NodeKind::Continue { target } => match target.get() {
            Some(t) => format!("-> {}", t),
            None => "-> ?".to_string(),
        },
        NodeKind::Return { target, .. } => match target.get() {
            Some(t) => format!("-> {}", t),
            None => "-> ?".to_string(),
        },
        NodeKind::Variable { name, is_var, .. } => {
            format!("{} {}", if *is_var { "var" } else { "val" }, name)
        }
        NodeKind::NamedFunction { name, .. } => name.to_string(),
        NodeKind::UserType { name, nullable } => {
            format!("{}{}", name, if *nullable { "?" } else { "" })
        }
        NodeKind::MemberReference { name } => name.to_string(),
        _ => return None,
    };
    Some(text)
}

/// Nested view of a subtree for machine consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeView {
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeView>,
}

impl TreeView {
    pub fn build(ir: &Ir, id: NodeId) -> Self {
        Self {
            kind: ir.element_kind(id),
            detail: detail(ir, id),
            children: ir.children(id).into_iter().map(|c| TreeView::build(ir, c)).collect(),
        }
    }
}

pub fn render_json(ir: &Ir, root: NodeId) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&TreeView::build(ir, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::builder::property_get;
    use crate::compiler::desugar::desugar_unary_update;
    use crate::compiler::tokens::{OperatorToken, Span};
    use tessel_core::Name;

    fn postfix_increment(ir: &mut Ir) -> NodeId {
        let x = property_get(ir, Span::dummy(), Name::identifier("x").unwrap());
        desugar_unary_update(ir, Span::dummy(), Some(x), OperatorToken::PlusPlus, false).unwrap()
    }

    #[test]
    fn test_render_postfix_increment() {
        let mut ir = Ir::new();
        let root = postfix_increment(&mut ir);
        let expected = "\
Block
  Variable val <unary>
    ImplicitType
    PropertyGet
      MemberReference x
  PropertySet =
    MemberReference x
    FunctionCall
      MemberReference inc
      PropertyGet
        MemberReference <unary>
  PropertyGet
    MemberReference <unary>
";
        assert_eq!(render_tree(&ir, root), expected);
    }

    #[test]
    fn test_render_json_nests_children() {
        let mut ir = Ir::new();
        let root = postfix_increment(&mut ir);
        let text = render_json(&ir, root).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["kind"], "Block");
        assert_eq!(json["children"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["children"][0]["detail"], "val <unary>");
        assert!(json["children"][0]["children"][0].get("children").is_none());
    }
}
