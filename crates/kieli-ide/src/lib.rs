//! IDE query layer for Kieli.
//!
//! This crate holds no transport of its own: [`database::Database`]
//! compiles documents and keeps their resolved HIR around, and
//! [`queries`] answers positional questions against it with plain
//! synchronous functions. An LSP server (or any other editor
//! integration) is a separate collaborator that drives this API over
//! whatever transport it likes.

pub mod database;
pub mod queries;

pub use database::{CompiledDocument, Database, DocumentId};
pub use queries::{
    completions, definition_of, document_symbols, format, hover, inlay_hints, references_to, semantic_tokens,
    CompletionItem, DocumentSymbol, DocumentSymbolKind, HoverInfo, InlayHint,
};
