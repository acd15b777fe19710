//! Shared types for the Kieli compiler: interning, arenas, source positions,
//! tokens, the diagnostic shape, and document identity. Every later crate in
//! the pipeline (lexer, parser, ast, hir, resolver, ide) depends on this one
//! and nothing here depends on them.

pub mod arena;
pub mod diagnostic;
pub mod document;
pub mod interner;
pub mod span;
pub mod token;

pub use arena::{Arena, Id};
pub use diagnostic::{Diagnostic, DiagnosticSink, DiagnosticTag, RelatedInfo, Severity};
pub use document::{DocumentId, DocumentMeta};
pub use interner::{StringId, StringInterner};
pub use span::{LineIndex, Position, Range, Span};
pub use token::{Token, TokenKind};
