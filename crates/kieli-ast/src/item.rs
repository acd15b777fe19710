//! Owned, trivia-free definitions produced by the desugarer.

use kieli_common::span::Span;

use super::expr::Expr;
use super::path::Path;
use super::ty::Type;

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Item {
    Import(ImportItem),
    Fn(FnDef),
    Struct(StructDef),
    Enum(EnumDef),
    Alias(AliasDef),
    Concept(ConceptDef),
    Impl(ImplDef),
    Submodule(SubmoduleDef),
}

#[derive(Debug, Clone)]
pub struct ImportItem {
    pub span: Span,
    pub path: Path,
}

#[derive(Debug, Clone)]
pub struct TemplateParam {
    pub span: Span,
    pub kind: TemplateParamKind,
}

#[derive(Debug, Clone)]
pub enum TemplateParamKind {
    /// `T` or `T: Concept + Concept`
    Type { name: String, bounds: Vec<Path> },
    /// A const-generic value parameter: `n` or `n: I32`.
    Value { name: String, ty: Option<Type> },
    /// A mutability parameter, parameterizing a reference's mutability.
    Mut { name: String },
}

#[derive(Debug, Clone)]
pub struct Param {
    pub span: Span,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct SelfParam {
    pub span: Span,
    pub is_reference: bool,
    pub is_mut: bool,
}

/// A function body is always a block after desugaring: `fn f() = e` has its
/// expression wrapped into a single-statement block.
#[derive(Debug, Clone)]
pub struct FnDef {
    pub span: Span,
    pub name: String,
    pub template_params: Vec<TemplateParam>,
    pub self_param: Option<SelfParam>,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct StructDef {
    pub span: Span,
    pub name: String,
    pub template_params: Vec<TemplateParam>,
    pub fields: StructFields,
}

#[derive(Debug, Clone)]
pub enum StructFields {
    Unit,
    Tuple(Vec<Type>),
    Record(Vec<FieldDef>),
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub span: Span,
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub span: Span,
    pub name: String,
    pub template_params: Vec<TemplateParam>,
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone)]
pub struct VariantDef {
    pub span: Span,
    pub name: String,
    pub fields: StructFields,
}

#[derive(Debug, Clone)]
pub struct AliasDef {
    pub span: Span,
    pub name: String,
    pub template_params: Vec<TemplateParam>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct ConceptDef {
    pub span: Span,
    pub name: String,
    pub template_params: Vec<TemplateParam>,
    pub method_sigs: Vec<ConceptMethodSig>,
}

#[derive(Debug, Clone)]
pub struct ConceptMethodSig {
    pub span: Span,
    pub name: String,
    pub self_param: Option<SelfParam>,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct ImplDef {
    pub span: Span,
    pub template_params: Vec<TemplateParam>,
    pub ty: Type,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct SubmoduleDef {
    pub span: Span,
    pub name: String,
    pub template_params: Vec<TemplateParam>,
    pub items: Vec<Item>,
}
