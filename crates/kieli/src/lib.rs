//! The Kieli compiler front end, gathered into one crate: lexer, parser,
//! desugarer, HIR/type model, resolver, diagnostics, and the IDE query
//! layer that sits on top of a compiled [`Database`].
//!
//! ```text
//! text ─▶ tokens ─▶ CST ─▶ AST ─▶ HIR (types, symbols, environments)
//! ```
//!
//! Everything downstream of resolution (a command-line driver, a
//! formatter, an LSP transport) is a separate collaborator built on this
//! crate's public API, not part of it.

pub use kieli_ast as ast;
pub use kieli_common as common;
pub use kieli_diagnostics as diagnostics;
pub use kieli_hir as hir;
pub use kieli_ide as ide;
pub use kieli_lexer as lexer;
pub use kieli_parser as parser;
pub use kieli_resolver as resolver;

pub use kieli_common::diagnostic::DiagnosticSink;
pub use kieli_diagnostics::{CompileOptions, Diagnostic, Severity};
pub use kieli_ide::{CompiledDocument, Database, DocumentId};

use std::path::PathBuf;

/// Open a single in-memory document, compile it with default options, and
/// hand back the database (so query functions in [`kieli_ide::queries`]
/// can be run against it), the document id, and every diagnostic produced.
/// A convenience for the common one-shot case; a long-lived editor
/// integration drives `Database` directly instead.
pub fn compile_source(path: impl Into<PathBuf>, text: impl Into<String>) -> (Database, DocumentId, Vec<Diagnostic>) {
    let mut db = Database::new();
    let doc = db.open_document(path.into(), text.into(), "kieli".to_owned(), 1);
    let mut diagnostics = Vec::new();
    db.compile(doc, &CompileOptions::default(), &mut diagnostics);
    (db, doc, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_source_runs_the_whole_pipeline() {
        let (db, doc, diagnostics) = compile_source("main.ki", "fn f(): I32 = 1");
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        assert!(db.compiled(doc).is_some());
    }

    #[test]
    fn compile_source_reports_an_undefined_name() {
        let (_db, _doc, diagnostics) = compile_source("main.ki", "fn f() = y");
        assert!(diagnostics.iter().any(|d| d.code == kieli_diagnostics::codes::name::UNDEFINED_NAME));
    }
}
