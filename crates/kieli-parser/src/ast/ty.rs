//! Typed AST wrappers for the type grammar.

use super::path::Path;
use super::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

/// Any Kieli type.
#[derive(Debug, Clone)]
pub enum Type {
    Primitive(PrimitiveType),
    Path(PathType),
    Tuple(TupleType),
    Array(ArrayType),
    Slice(SliceType),
    Function(FunctionType),
    Typeof(TypeofType),
    Reference(ReferenceType),
    Pointer(PointerType),
    Impl(ImplType),
    SelfType(SelfType),
    Wildcard(WildcardType),
}

impl AstNode for Type {
    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PRIMITIVE_TYPE => PrimitiveType::cast(node).map(Type::Primitive),
            SyntaxKind::PATH_TYPE => PathType::cast(node).map(Type::Path),
            SyntaxKind::TUPLE_TYPE => TupleType::cast(node).map(Type::Tuple),
            SyntaxKind::ARRAY_TYPE => ArrayType::cast(node).map(Type::Array),
            SyntaxKind::SLICE_TYPE => SliceType::cast(node).map(Type::Slice),
            SyntaxKind::FUNCTION_TYPE => FunctionType::cast(node).map(Type::Function),
            SyntaxKind::TYPEOF_TYPE => TypeofType::cast(node).map(Type::Typeof),
            SyntaxKind::REFERENCE_TYPE => ReferenceType::cast(node).map(Type::Reference),
            SyntaxKind::POINTER_TYPE => PointerType::cast(node).map(Type::Pointer),
            SyntaxKind::IMPL_TYPE => ImplType::cast(node).map(Type::Impl),
            SyntaxKind::SELF_TYPE => SelfType::cast(node).map(Type::SelfType),
            SyntaxKind::WILDCARD_TYPE => WildcardType::cast(node).map(Type::Wildcard),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Type::Primitive(it) => it.syntax(),
            Type::Path(it) => it.syntax(),
            Type::Tuple(it) => it.syntax(),
            Type::Array(it) => it.syntax(),
            Type::Slice(it) => it.syntax(),
            Type::Function(it) => it.syntax(),
            Type::Typeof(it) => it.syntax(),
            Type::Reference(it) => it.syntax(),
            Type::Pointer(it) => it.syntax(),
            Type::Impl(it) => it.syntax(),
            Type::SelfType(it) => it.syntax(),
            Type::Wildcard(it) => it.syntax(),
        }
    }
}

ast_node!(PrimitiveType, PRIMITIVE_TYPE);
ast_node!(SelfType, SELF_TYPE);
ast_node!(WildcardType, WILDCARD_TYPE);

ast_node!(PathType, PATH_TYPE);

impl PathType {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }
}

ast_node!(TupleType, TUPLE_TYPE);

impl TupleType {
    pub fn fields(&self) -> impl Iterator<Item = Type> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ArrayType, ARRAY_TYPE);

impl ArrayType {
    pub fn element_type(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn length(&self) -> Option<super::expr::Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(SliceType, SLICE_TYPE);

impl SliceType {
    pub fn element_type(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(FunctionType, FUNCTION_TYPE);

impl FunctionType {
    /// All `Type` children except the trailing return type.
    pub fn param_types(&self) -> impl Iterator<Item = Type> {
        let mut all: Vec<Type> = child_nodes(&self.syntax).collect();
        all.pop();
        all.into_iter()
    }

    pub fn return_type(&self) -> Option<Type> {
        child_nodes(&self.syntax).last()
    }
}

ast_node!(TypeofType, TYPEOF_TYPE);

impl TypeofType {
    pub fn inspected_expr(&self) -> Option<super::expr::Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(ReferenceType, REFERENCE_TYPE);

impl ReferenceType {
    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }

    pub fn referenced_type(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(PointerType, POINTER_TYPE);

impl PointerType {
    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }

    pub fn pointed_to_type(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(ImplType, IMPL_TYPE);

impl ImplType {
    pub fn concepts(&self) -> impl Iterator<Item = Path> + '_ {
        child_nodes(&self.syntax)
    }
}
