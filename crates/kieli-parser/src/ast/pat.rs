//! Typed AST wrappers for patterns.

use super::path::Path;
use super::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Any Kieli pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    Wildcard(WildcardPat),
    Literal(LiteralPat),
    Name(NamePat),
    UnitCtor(UnitCtorPat),
    TupleCtor(TupleCtorPat),
    StructCtor(StructCtorPat),
    AbbreviatedCtor(AbbreviatedCtorPat),
    Tuple(TuplePat),
    Slice(SlicePat),
    Alias(AliasPat),
    Guarded(GuardedPat),
}

impl AstNode for Pattern {
    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::WILDCARD_PAT => WildcardPat::cast(node).map(Pattern::Wildcard),
            SyntaxKind::LITERAL_PAT => LiteralPat::cast(node).map(Pattern::Literal),
            SyntaxKind::NAME_PAT => NamePat::cast(node).map(Pattern::Name),
            SyntaxKind::UNIT_CTOR_PAT => UnitCtorPat::cast(node).map(Pattern::UnitCtor),
            SyntaxKind::TUPLE_CTOR_PAT => TupleCtorPat::cast(node).map(Pattern::TupleCtor),
            SyntaxKind::STRUCT_CTOR_PAT => StructCtorPat::cast(node).map(Pattern::StructCtor),
            SyntaxKind::ABBREVIATED_CTOR_PAT => AbbreviatedCtorPat::cast(node).map(Pattern::AbbreviatedCtor),
            SyntaxKind::TUPLE_PAT => TuplePat::cast(node).map(Pattern::Tuple),
            SyntaxKind::SLICE_PAT => SlicePat::cast(node).map(Pattern::Slice),
            SyntaxKind::ALIAS_PAT => AliasPat::cast(node).map(Pattern::Alias),
            SyntaxKind::GUARDED_PAT => GuardedPat::cast(node).map(Pattern::Guarded),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Pattern::Wildcard(it) => it.syntax(),
            Pattern::Literal(it) => it.syntax(),
            Pattern::Name(it) => it.syntax(),
            Pattern::UnitCtor(it) => it.syntax(),
            Pattern::TupleCtor(it) => it.syntax(),
            Pattern::StructCtor(it) => it.syntax(),
            Pattern::AbbreviatedCtor(it) => it.syntax(),
            Pattern::Tuple(it) => it.syntax(),
            Pattern::Slice(it) => it.syntax(),
            Pattern::Alias(it) => it.syntax(),
            Pattern::Guarded(it) => it.syntax(),
        }
    }
}

ast_node!(WildcardPat, WILDCARD_PAT);

ast_node!(LiteralPat, LITERAL_PAT);

impl LiteralPat {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax.children_with_tokens().filter_map(|it| it.into_token()).find(|t| !t.kind().is_trivia())
    }
}

ast_node!(NamePat, NAME_PAT);

impl NamePat {
    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }
}

ast_node!(UnitCtorPat, UNIT_CTOR_PAT);

impl UnitCtorPat {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }
}

ast_node!(TupleCtorPat, TUPLE_CTOR_PAT);

impl TupleCtorPat {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }

    pub fn payload(&self) -> impl Iterator<Item = Pattern> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(StructCtorPat, STRUCT_CTOR_PAT);

impl StructCtorPat {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }

    pub fn fields(&self) -> impl Iterator<Item = StructCtorFieldPat> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(StructCtorFieldPat, STRUCT_CTOR_FIELD_PAT);

impl StructCtorFieldPat {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn pattern(&self) -> Option<Pattern> {
        child_node(&self.syntax)
    }
}

ast_node!(AbbreviatedCtorPat, ABBREVIATED_CTOR_PAT);

impl AbbreviatedCtorPat {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn payload(&self) -> Option<Pattern> {
        child_node(&self.syntax)
    }
}

ast_node!(TuplePat, TUPLE_PAT);

impl TuplePat {
    pub fn fields(&self) -> impl Iterator<Item = Pattern> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(SlicePat, SLICE_PAT);

impl SlicePat {
    pub fn elements(&self) -> impl Iterator<Item = Pattern> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(AliasPat, ALIAS_PAT);

impl AliasPat {
    pub fn inner(&self) -> Option<Pattern> {
        child_node(&self.syntax)
    }

    pub fn alias_name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }
}

ast_node!(GuardedPat, GUARDED_PAT);

impl GuardedPat {
    pub fn inner(&self) -> Option<Pattern> {
        child_node(&self.syntax)
    }

    pub fn guard(&self) -> Option<super::expr::Expr> {
        child_node(&self.syntax)
    }
}
