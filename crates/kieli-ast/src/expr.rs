//! Owned, trivia-free expression representation produced by the desugarer.
//!
//! Shapes that are pure surface sugar in the grammar (`elif`, `while`,
//! `for`, an `if` with no `else`, a function body written as `= expr`) are
//! collapsed here into their more primitive forms, each tagged with a
//! `Source` so diagnostics can still say "this `if` came from a `while`".

use kieli_common::span::Span;

use super::pat::Pattern;
use super::path::Path;
use super::ty::Type;

#[derive(Debug, Clone)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalSource {
    /// An explicit `if` written by the user.
    Normal,
    /// One link of an `elif` chain, collapsed into a nested `if`/`else`.
    Elif,
    /// The body-guard produced by lowering a `while` loop.
    WhileLoopBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSource {
    Plain,
    While,
    For,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Path(Path),
    Block { effects: Vec<Expr>, result: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    MethodCall { receiver: Box<Expr>, method: String, template_args: Vec<super::path::TemplateArg>, args: Vec<Expr> },
    /// A flattened `a op1 b op2 c ...` chain, left-associated into nested
    /// binary applications by the desugarer (operator precedence is
    /// resolved later, during resolution, per the parser's deferred-fixity
    /// design).
    BinaryOp { op: String, left: Box<Expr>, right: Box<Expr> },
    Conditional {
        condition: Box<Expr>,
        true_branch: Box<Expr>,
        false_branch: Box<Expr>,
        source: ConditionalSource,
        has_explicit_false_branch: bool,
    },
    Match { scrutinee: Box<Expr>, arms: Vec<MatchArm> },
    Loop { body: Box<Expr>, source: LoopSource },
    Break(Option<Box<Expr>>),
    Continue,
    Ret(Option<Box<Expr>>),
    Discard(Box<Expr>),
    Let { pattern: Option<Pattern>, ty: Option<Type>, initializer: Box<Expr> },
    LocalTypeAlias { name: String, aliased: Type },
    AddressOf { is_mut: bool, referent: Box<Expr> },
    Deref(Box<Expr>),
    Sizeof(Type),
    Mov(Box<Expr>),
    Defer(Box<Expr>),
    Unsafe(Box<Expr>),
    Meta(Box<Expr>),
    FieldAccess { base: Box<Expr>, field: String },
    TupleIndex { base: Box<Expr>, index: u32 },
    ArrayIndex { base: Box<Expr>, index: Box<Expr> },
    Tuple(Vec<Expr>),
    Array(Vec<Expr>),
    /// The initializer target is a type (the struct's path), matching how
    /// the grammar's `e.[e]`-style expression-shaped target is re-read as a
    /// type once the struct initializer is recognized.
    StructInit { ty: Type, fields: Vec<(String, Expr)> },
    TypeCast { value: Box<Expr>, target: Type },
    TypeAscription { value: Box<Expr>, ascribed: Type },
    Hole,
    Error,
}

#[derive(Debug, Clone)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub handler: Expr,
}

impl Expr {
    pub fn unit(span: Span) -> Self {
        Expr { span, kind: ExprKind::Tuple(Vec::new()) }
    }
}
