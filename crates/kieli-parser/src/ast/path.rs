//! Typed AST wrappers for paths, shared between expressions, types, and
//! patterns.

use super::{ast_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

ast_node!(Path, PATH);

impl Path {
    pub fn is_global(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::GLOBAL_KW).is_some()
    }

    pub fn segments(&self) -> impl Iterator<Item = PathSegment> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(PathSegment, PATH_SEGMENT);

impl PathSegment {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME).or_else(|| child_token(&self.syntax, SyntaxKind::UPPER_NAME))
    }

    pub fn template_args(&self) -> Option<TemplateArgList> {
        super::child_node(&self.syntax)
    }
}

ast_node!(TemplateArgList, TEMPLATE_ARG_LIST);

impl TemplateArgList {
    /// Each argument is a `Type` or an `Expr` node (a value or mutability
    /// argument); callers downcast via [`AstNode::cast`] as needed.
    pub fn arg_nodes(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children()
    }
}
