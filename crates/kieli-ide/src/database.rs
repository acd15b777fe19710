//! The compilation database: every open document's source text, and the
//! most recent compile's HIR arenas, kept around so the query layer never
//! has to re-run the pipeline to answer a single positional question.
//!
//! A `Database` owns no async state and synchronizes nothing; per §5 of the
//! design, two compilations of two different documents may run on separate
//! `Database`s but never concurrently on the same one.

use std::path::PathBuf;

use kieli_ast::item::SourceFile;
use kieli_common::arena::Arena;
use kieli_common::diagnostic::{Diagnostic, DiagnosticSink};
pub use kieli_common::document::DocumentId;
use kieli_common::document::DocumentMeta;
use kieli_common::interner::{StringId, StringInterner};
use kieli_common::span::LineIndex;
use kieli_diagnostics::CompileOptions;
use kieli_hir::{EnvArena, Symbol, SymbolId, TypeArena};
use kieli_resolver::Occurrence;
use rustc_hash::FxHashMap;

/// Everything left over from the most recent successful run of the
/// pipeline on one document: the desugared tree plus every owned arena
/// `kieli_resolver::resolve` produced. `kieli_resolver::Context` itself
/// borrows its interner and source text, so it cannot be stored directly;
/// this is its data outliving that borrow.
pub struct CompiledDocument {
    pub strings: StringInterner,
    pub line_index: LineIndex,
    pub file: SourceFile,
    pub diagnostics: Vec<Diagnostic>,
    pub types: TypeArena,
    pub symbols: Arena<Symbol>,
    pub envs: EnvArena,
    pub definitions: FxHashMap<StringId, SymbolId>,
    pub enum_variants: FxHashMap<SymbolId, Vec<StringId>>,
    pub methods: FxHashMap<SymbolId, FxHashMap<StringId, SymbolId>>,
    pub occurrences: Vec<Occurrence>,
}

struct DocumentEntry {
    meta: DocumentMeta,
    compiled: Option<CompiledDocument>,
}

/// The facade's per-project compilation state: every open document plus a
/// path index. `open_document`/`change_document`/`close_document` manage
/// lifecycle; `compile` runs lex → parse → desugar → resolve and stores the
/// result for the query functions in `crate::queries` to read back.
#[derive(Default)]
pub struct Database {
    documents: Vec<Option<DocumentEntry>>,
    paths: FxHashMap<PathBuf, DocumentId>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_document(&mut self, path: PathBuf, text: String, language_id: String, version: i32) -> DocumentId {
        if let Some(&existing) = self.paths.get(&path) {
            self.change_document(existing, text, version);
            return existing;
        }
        let id = DocumentId::new(self.documents.len() as u32);
        self.paths.insert(path.clone(), id);
        self.documents.push(Some(DocumentEntry { meta: DocumentMeta::new(path, text, language_id, version), compiled: None }));
        id
    }

    pub fn change_document(&mut self, doc: DocumentId, new_text: String, new_version: i32) {
        if let Some(entry) = self.entry_mut(doc) {
            entry.meta.replace_text(new_text, new_version);
            entry.compiled = None;
        }
    }

    pub fn close_document(&mut self, doc: DocumentId) {
        if let Some(slot) = self.documents.get_mut(doc.index() as usize) {
            if let Some(entry) = slot.take() {
                self.paths.remove(&entry.meta.path);
            }
        }
    }

    fn entry(&self, doc: DocumentId) -> Option<&DocumentEntry> {
        self.documents.get(doc.index() as usize)?.as_ref()
    }

    fn entry_mut(&mut self, doc: DocumentId) -> Option<&mut DocumentEntry> {
        self.documents.get_mut(doc.index() as usize)?.as_mut()
    }

    pub fn meta(&self, doc: DocumentId) -> Option<&DocumentMeta> {
        self.entry(doc).map(|entry| &entry.meta)
    }

    pub fn compiled(&self, doc: DocumentId) -> Option<&CompiledDocument> {
        self.entry(doc).and_then(|entry| entry.compiled.as_ref())
    }

    /// Run lex → parse → desugar → resolve over `doc`'s current text,
    /// storing the compiled result and forwarding every diagnostic to
    /// `sink`. A prior compile's arenas are discarded regardless of
    /// whether this one succeeds, per the single-compilation-at-a-time
    /// model: there is no incremental reuse across revisions. `options`
    /// shapes the reported diagnostic list (severity promotion, a cap with
    /// a synthetic overflow note) but never changes what compiles.
    pub fn compile(&mut self, doc: DocumentId, options: &CompileOptions, sink: &mut dyn DiagnosticSink) {
        let span = tracing::info_span!("compile", doc = doc.index());
        let _enter = span.enter();

        let Some(entry) = self.entry_mut(doc) else { return };
        let source = entry.meta.text.clone();

        let (file, parse_errors) = {
            let span = tracing::info_span!("parse");
            let _enter = span.enter();
            kieli_ast::lower(&source)
        };

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let line_index = LineIndex::new(&source);
        for error in &parse_errors {
            let range = line_index.range(&source, error.span);
            diagnostics.push(Diagnostic::error(range, kieli_diagnostics::codes::syntactic::UNEXPECTED_TOKEN, error.message.clone()));
        }

        let mut strings = StringInterner::new();
        let resolved = {
            let span = tracing::info_span!("resolve");
            let _enter = span.enter();
            kieli_resolver::resolve(&file, &mut strings, &source, &mut diagnostics)
        };

        let kieli_resolver::Context { types, symbols, envs, definitions, enum_variants, methods, occurrences, .. } = resolved;

        kieli_diagnostics::options::apply(options, &mut diagnostics);

        tracing::info!(
            errors = diagnostics.iter().filter(|d| d.severity == kieli_common::diagnostic::Severity::Error).count(),
            warnings = diagnostics.iter().filter(|d| d.severity == kieli_common::diagnostic::Severity::Warning).count(),
            "compiled document"
        );

        for diagnostic in &diagnostics {
            sink.push(diagnostic.clone());
        }

        let Some(entry) = self.entry_mut(doc) else { return };
        entry.compiled = Some(CompiledDocument {
            strings,
            line_index,
            file,
            diagnostics,
            types,
            symbols,
            envs,
            definitions,
            enum_variants,
            methods,
            occurrences,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_populates_diagnostics_and_symbols() {
        let mut db = Database::new();
        let doc = db.open_document(PathBuf::from("a.ki"), "fn f() = y".to_owned(), "kieli".to_owned(), 1);
        let mut sink: Vec<Diagnostic> = Vec::new();
        db.compile(doc, &CompileOptions::default(), &mut sink);
        assert!(!sink.is_empty());
        assert!(db.compiled(doc).is_some());
    }

    #[test]
    fn change_document_invalidates_the_previous_compile() {
        let mut db = Database::new();
        let doc = db.open_document(PathBuf::from("a.ki"), "fn f() = 1".to_owned(), "kieli".to_owned(), 1);
        let mut sink: Vec<Diagnostic> = Vec::new();
        db.compile(doc, &CompileOptions::default(), &mut sink);
        assert!(db.compiled(doc).is_some());

        db.change_document(doc, "fn f() = 2".to_owned(), 2);
        assert!(db.compiled(doc).is_none());
    }

    #[test]
    fn close_document_frees_its_path() {
        let mut db = Database::new();
        let doc = db.open_document(PathBuf::from("a.ki"), "fn f() = 1".to_owned(), "kieli".to_owned(), 1);
        db.close_document(doc);
        assert!(db.meta(doc).is_none());
    }
}
