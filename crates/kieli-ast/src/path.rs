//! Owned path representation, shared by expressions, types, and patterns.

use kieli_common::span::Span;

#[derive(Debug, Clone)]
pub struct Path {
    pub span: Span,
    pub is_global: bool,
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone)]
pub struct PathSegment {
    pub span: Span,
    pub name: String,
    pub template_args: Vec<TemplateArg>,
}

/// A template argument is either a type, a value expression, or a
/// mutability argument; which one only matters once the resolver has a
/// concept/definition to check it against, so the AST keeps all three as
/// plain alternatives of the same list.
#[derive(Debug, Clone)]
pub enum TemplateArg {
    Type(super::ty::Type),
    Value(Box<super::expr::Expr>),
}
