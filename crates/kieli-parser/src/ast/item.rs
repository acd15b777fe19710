//! Typed AST wrappers for top-level and nested definitions.

use super::path::Path;
use super::ty::Type;
use super::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.syntax.children().filter_map(Item::cast)
    }
}

/// Any top-level or nested definition, or an import.
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

impl AstNode for Item {
    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::IMPORT_ITEM => ImportItem::cast(node).map(Item::Import),
            SyntaxKind::FN_DEF => FnDef::cast(node).map(Item::Fn),
            SyntaxKind::STRUCT_DEF => StructDef::cast(node).map(Item::Struct),
            SyntaxKind::ENUM_DEF => EnumDef::cast(node).map(Item::Enum),
            SyntaxKind::ALIAS_DEF => AliasDef::cast(node).map(Item::Alias),
            SyntaxKind::CONCEPT_DEF => ConceptDef::cast(node).map(Item::Concept),
            SyntaxKind::IMPL_DEF => ImplDef::cast(node).map(Item::Impl),
            SyntaxKind::SUBMODULE_DEF => SubmoduleDef::cast(node).map(Item::Submodule),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Item::Import(it) => it.syntax(),
            Item::Fn(it) => it.syntax(),
            Item::Struct(it) => it.syntax(),
            Item::Enum(it) => it.syntax(),
            Item::Alias(it) => it.syntax(),
            Item::Concept(it) => it.syntax(),
            Item::Impl(it) => it.syntax(),
            Item::Submodule(it) => it.syntax(),
        }
    }
}

ast_node!(ImportItem, IMPORT_ITEM);

impl ImportItem {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }
}

ast_node!(FnDef, FN_DEF);

impl FnDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn template_params(&self) -> Option<TemplateParamList> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn return_type(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<super::expr::Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn self_param(&self) -> Option<SelfParam> {
        child_node(&self.syntax)
    }

    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(SelfParam, SELF_PARAM);

impl SelfParam {
    pub fn is_reference(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::AMP).is_some()
    }

    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(TemplateParamList, TEMPLATE_PARAM_LIST);

impl TemplateParamList {
    pub fn params(&self) -> impl Iterator<Item = TemplateParam> + '_ {
        self.syntax.children().filter_map(TemplateParam::cast)
    }
}

#[derive(Debug, Clone)]
pub enum TemplateParam {
    Type(TemplateTypeParam),
    Value(TemplateValueParam),
    Mut(TemplateMutParam),
}

impl AstNode for TemplateParam {
    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TEMPLATE_TYPE_PARAM => TemplateTypeParam::cast(node).map(TemplateParam::Type),
            SyntaxKind::TEMPLATE_VALUE_PARAM => TemplateValueParam::cast(node).map(TemplateParam::Value),
            SyntaxKind::TEMPLATE_MUT_PARAM => TemplateMutParam::cast(node).map(TemplateParam::Mut),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            TemplateParam::Type(it) => it.syntax(),
            TemplateParam::Value(it) => it.syntax(),
            TemplateParam::Mut(it) => it.syntax(),
        }
    }
}

ast_node!(TemplateTypeParam, TEMPLATE_TYPE_PARAM);
ast_node!(TemplateValueParam, TEMPLATE_VALUE_PARAM);
ast_node!(TemplateMutParam, TEMPLATE_MUT_PARAM);

ast_node!(StructDef, STRUCT_DEF);

impl StructDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::UPPER_NAME)
    }

    pub fn template_params(&self) -> Option<TemplateParamList> {
        child_node(&self.syntax)
    }

    pub fn tuple_fields(&self) -> Option<TupleStructFieldList> {
        child_node(&self.syntax)
    }

    pub fn fields(&self) -> impl Iterator<Item = StructFieldDef> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TupleStructFieldList, TUPLE_STRUCT_FIELD_LIST);

impl TupleStructFieldList {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(StructFieldDef, STRUCT_FIELD_DEF);

impl StructFieldDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(EnumDef, ENUM_DEF);

impl EnumDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::UPPER_NAME)
    }

    pub fn template_params(&self) -> Option<TemplateParamList> {
        child_node(&self.syntax)
    }

    pub fn variants(&self) -> impl Iterator<Item = VariantDef> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(VariantDef, VARIANT_DEF);

impl VariantDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::UPPER_NAME)
    }

    pub fn tuple_fields(&self) -> Option<TupleStructFieldList> {
        child_node(&self.syntax)
    }

    pub fn struct_fields(&self) -> Option<VariantFieldList> {
        child_node(&self.syntax)
    }
}

ast_node!(VariantFieldList, VARIANT_FIELD_LIST);

impl VariantFieldList {
    pub fn fields(&self) -> impl Iterator<Item = VariantStructField> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(VariantStructField, VARIANT_STRUCT_FIELD);

impl VariantStructField {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(AliasDef, ALIAS_DEF);

impl AliasDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::UPPER_NAME)
    }

    pub fn template_params(&self) -> Option<TemplateParamList> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(ConceptDef, CONCEPT_DEF);

impl ConceptDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::UPPER_NAME)
    }

    pub fn template_params(&self) -> Option<TemplateParamList> {
        child_node(&self.syntax)
    }

    pub fn method_sigs(&self) -> impl Iterator<Item = ConceptMethodSig> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ConceptMethodSig, CONCEPT_METHOD_SIG);

impl ConceptMethodSig {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn return_type(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(ImplDef, IMPL_DEF);

impl ImplDef {
    pub fn template_params(&self) -> Option<TemplateParamList> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.syntax.children().filter_map(Item::cast)
    }
}

ast_node!(SubmoduleDef, SUBMODULE_DEF);

impl SubmoduleDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn template_params(&self) -> Option<TemplateParamList> {
        child_node(&self.syntax)
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.syntax.children().filter_map(Item::cast)
    }
}
