//! Typed AST wrappers for expressions.

pub use super::path::Path;
pub use super::ty::Type;

use super::pat::Pattern;
use super::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Any Kieli expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Path(PathExpr),
    Block(BlockExpr),
    Call(CallExpr),
    MethodCall(MethodCallExpr),
    OperatorChain(OperatorChainExpr),
    If(IfExpr),
    Match(MatchExpr),
    Loop(LoopExpr),
    While(WhileExpr),
    For(ForExpr),
    Let(LetExpr),
    LocalAlias(LocalAliasExpr),
    AddressOf(AddressOfExpr),
    Deref(DerefExpr),
    Sizeof(SizeofExpr),
    Mov(MovExpr),
    Defer(DeferExpr),
    Unsafe(UnsafeExpr),
    Meta(MetaExpr),
    Break(BreakExpr),
    Continue(ContinueExpr),
    Ret(RetExpr),
    Discard(DiscardExpr),
    FieldAccess(FieldAccessExpr),
    TupleIndex(TupleIndexExpr),
    ArrayIndex(ArrayIndexExpr),
    Tuple(TupleExpr),
    Array(ArrayExpr),
    StructInit(StructInitExpr),
    TypeCast(TypeCastExpr),
    TypeAscription(TypeAscriptionExpr),
    Hole(HoleExpr),
}

macro_rules! expr_dispatch {
    ($($variant:ident => $kind:ident),* $(,)?) => {
        impl AstNode for Expr {
            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$kind => $variant::cast(node).map(Expr::$variant),)*
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Expr::$variant(it) => it.syntax(),)*
                }
            }
        }
    };
}

expr_dispatch! {
    Literal => LITERAL_EXPR,
    Path => PATH_EXPR,
    Block => BLOCK_EXPR,
    Call => CALL_EXPR,
    MethodCall => METHOD_CALL_EXPR,
    OperatorChain => OPERATOR_CHAIN_EXPR,
    If => IF_EXPR,
    Match => MATCH_EXPR,
    Loop => LOOP_EXPR,
    While => WHILE_EXPR,
    For => FOR_EXPR,
    Let => LET_EXPR,
    LocalAlias => LOCAL_ALIAS_EXPR,
    AddressOf => ADDRESS_OF_EXPR,
    Deref => DEREF_EXPR,
    Sizeof => SIZEOF_EXPR,
    Mov => MOV_EXPR,
    Defer => DEFER_EXPR,
    Unsafe => UNSAFE_EXPR,
    Meta => META_EXPR,
    Break => BREAK_EXPR,
    Continue => CONTINUE_EXPR,
    Ret => RET_EXPR,
    Discard => DISCARD_EXPR,
    FieldAccess => FIELD_ACCESS_EXPR,
    TupleIndex => TUPLE_INDEX_EXPR,
    ArrayIndex => ARRAY_INDEX_EXPR,
    Tuple => TUPLE_EXPR,
    Array => ARRAY_EXPR,
    StructInit => STRUCT_INIT_EXPR,
    TypeCast => TYPE_CAST_EXPR,
    TypeAscription => TYPE_ASCRIPTION_EXPR,
    Hole => HOLE_EXPR,
}

ast_node!(LiteralExpr, LITERAL_EXPR);

impl LiteralExpr {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax.children_with_tokens().filter_map(|it| it.into_token()).find(|t| !t.kind().is_trivia())
    }
}

ast_node!(PathExpr, PATH_EXPR);

impl PathExpr {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }
}

ast_node!(BlockExpr, BLOCK_EXPR);

impl BlockExpr {
    pub fn expressions(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn args(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(MethodCallExpr, METHOD_CALL_EXPR);

impl MethodCallExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    pub fn template_args(&self) -> Option<super::path::TemplateArgList> {
        child_node(&self.syntax)
    }

    pub fn args(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME).or_else(|| child_token(&self.syntax, SyntaxKind::UPPER_NAME))
    }
}

ast_node!(OperatorChainExpr, OPERATOR_CHAIN_EXPR);

impl OperatorChainExpr {
    pub fn operands(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn operators(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax.children_with_tokens().filter_map(|it| it.into_token()).filter(|t| {
            matches!(t.kind(), SyntaxKind::OPERATOR_NAME | SyntaxKind::STAR | SyntaxKind::PLUS)
        })
    }
}

ast_node!(IfExpr, IF_EXPR);

impl IfExpr {
    pub fn condition(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn then_branch(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }

    pub fn elifs(&self) -> impl Iterator<Item = ElifClause> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn else_branch(&self) -> Option<ElseClause> {
        child_node(&self.syntax)
    }
}

ast_node!(ElifClause, ELIF_CLAUSE);

impl ElifClause {
    pub fn condition(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn block(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    pub fn block(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(MatchExpr, MATCH_EXPR);

impl MatchExpr {
    pub fn scrutinee(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn arms(&self) -> impl Iterator<Item = MatchArm> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(MatchArm, MATCH_ARM);

impl MatchArm {
    pub fn pattern(&self) -> Option<Pattern> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(LoopExpr, LOOP_EXPR);

impl LoopExpr {
    pub fn body(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(WhileExpr, WHILE_EXPR);

impl WhileExpr {
    pub fn condition(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(ForExpr, FOR_EXPR);

impl ForExpr {
    pub fn pattern(&self) -> Option<Pattern> {
        child_node(&self.syntax)
    }

    pub fn iterable(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(LetExpr, LET_EXPR);

impl LetExpr {
    pub fn pattern(&self) -> Option<Pattern> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(LocalAliasExpr, LOCAL_ALIAS_EXPR);

impl LocalAliasExpr {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::UPPER_NAME)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(AddressOfExpr, ADDRESS_OF_EXPR);

impl AddressOfExpr {
    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }

    pub fn referenced(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(DerefExpr, DEREF_EXPR);

impl DerefExpr {
    pub fn pointee(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(SizeofExpr, SIZEOF_EXPR);

impl SizeofExpr {
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(MovExpr, MOV_EXPR);

impl MovExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(DeferExpr, DEFER_EXPR);

impl DeferExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(UnsafeExpr, UNSAFE_EXPR);

impl UnsafeExpr {
    pub fn expressions(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(MetaExpr, META_EXPR);

impl MetaExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(BreakExpr, BREAK_EXPR);

impl BreakExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(ContinueExpr, CONTINUE_EXPR);
ast_node!(HoleExpr, HOLE_EXPR);

ast_node!(RetExpr, RET_EXPR);

impl RetExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(DiscardExpr, DISCARD_EXPR);

impl DiscardExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(FieldAccessExpr, FIELD_ACCESS_EXPR);

impl FieldAccessExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }
}

ast_node!(TupleIndexExpr, TUPLE_INDEX_EXPR);

impl TupleIndexExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn index(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::INT_LITERAL)
    }
}

ast_node!(ArrayIndexExpr, ARRAY_INDEX_EXPR);

impl ArrayIndexExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn index(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(1)
    }
}

ast_node!(TupleExpr, TUPLE_EXPR);

impl TupleExpr {
    pub fn fields(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ArrayExpr, ARRAY_EXPR);

impl ArrayExpr {
    pub fn elements(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(StructInitExpr, STRUCT_INIT_EXPR);

impl StructInitExpr {
    pub fn target(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn fields(&self) -> impl Iterator<Item = StructInitField> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(StructInitField, STRUCT_INIT_FIELD);

impl StructInitField {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::LOWER_NAME)
    }

    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(TypeCastExpr, TYPE_CAST_EXPR);

impl TypeCastExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(TypeAscriptionExpr, TYPE_ASCRIPTION_EXPR);

impl TypeAscriptionExpr {
    pub fn value(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}
