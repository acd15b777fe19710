//! Owned, trivia-free pattern representation produced by the desugarer.

use kieli_common::span::Span;

use super::path::Path;

#[derive(Debug, Clone)]
pub struct Pattern {
    pub span: Span,
    pub kind: PatternKind,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    Wildcard,
    Literal(super::expr::Literal),
    Name { name: String, is_mut: bool },
    /// A constructor pattern with no payload, e.g. `None` or a unit struct.
    UnitCtor(Path),
    /// `Ctor(p, p, ...)`
    TupleCtor { path: Path, payload: Vec<Pattern> },
    /// `Ctor { field, field: p, ... }`
    StructCtor { path: Path, fields: Vec<StructCtorField> },
    /// `::name(p)` or `::name`, resolved against the scrutinee's enum type
    /// rather than an explicit path.
    AbbreviatedCtor { name: String, payload: Option<Box<Pattern>> },
    Tuple(Vec<Pattern>),
    Slice(Vec<Pattern>),
    /// `pattern as name`
    Alias { inner: Box<Pattern>, alias: String },
    /// `pattern if guard`
    Guarded { inner: Box<Pattern>, guard: Box<super::expr::Expr> },
    Error,
}

#[derive(Debug, Clone)]
pub struct StructCtorField {
    pub span: Span,
    pub name: String,
    /// `None` for field-punning (`Point { x }` binds `x` directly).
    pub pattern: Option<Pattern>,
}
