//! Plain synchronous query functions over a compiled [`Database`]. No
//! JSON-RPC, no async: the LSP transport that calls these lives outside
//! this crate and is responsible for turning their results into wire
//! messages.

use kieli_ast::expr::{Expr, ExprKind};
use kieli_ast::item::Item;
use kieli_ast::pat::{Pattern, PatternKind};
use kieli_common::span::{Position, Range};
use kieli_common::token::TokenKind;
use kieli_diagnostics::semantic_tokens::{encode_delta, ClassifiedToken, SemanticTokenClass};
use kieli_hir::{Symbol, SymbolId, SymbolVariant, Type};

use crate::database::{CompiledDocument, Database, DocumentId};

fn range_contains(range: Range, pos: Position) -> bool {
    range.start <= pos && pos < range.stop
}

/// The symbol whose declaration or use covers `pos`: first a recorded
/// reference, falling back to a declaration range, since a hover over a
/// binding's own name should work even before it is ever referenced.
fn symbol_at(compiled: &CompiledDocument, pos: Position) -> Option<SymbolId> {
    for occurrence in &compiled.occurrences {
        if range_contains(occurrence.range, pos) {
            return Some(occurrence.symbol);
        }
    }
    for (id, symbol) in compiled.symbols.iter() {
        if range_contains(symbol.range, pos) {
            return Some(id);
        }
    }
    None
}

fn symbol_type(symbol: &Symbol) -> Option<Type> {
    match &symbol.variant {
        SymbolVariant::Function { ty }
        | SymbolVariant::Structure { ty }
        | SymbolVariant::Enumeration { ty }
        | SymbolVariant::Constructor { ty, .. }
        | SymbolVariant::Field { ty, .. }
        | SymbolVariant::LocalVariable { ty }
        | SymbolVariant::LocalMutability { ty, .. } => Some(*ty),
        SymbolVariant::Alias { aliased } | SymbolVariant::LocalType { aliased } => Some(*aliased),
        SymbolVariant::Concept | SymbolVariant::Module | SymbolVariant::Error => None,
    }
}

/// Hover contents: the symbol's own name and its resolved type, rendered
/// as Kieli syntax.
pub struct HoverInfo {
    pub range: Range,
    pub contents: String,
}

pub fn hover(db: &Database, doc: DocumentId, pos: Position) -> Option<HoverInfo> {
    let compiled = db.compiled(doc)?;
    let id = symbol_at(compiled, pos)?;
    let symbol = compiled.symbols.get(id);
    let ty = symbol_type(symbol)?;
    let rendered = kieli_hir::render_type(&compiled.types, &compiled.symbols, &compiled.strings, ty);
    let name = compiled.strings.resolve(symbol.name);
    Some(HoverInfo { range: symbol.range, contents: format!("{name}: {rendered}") })
}

pub fn definition_of(db: &Database, doc: DocumentId, pos: Position) -> Option<Range> {
    let compiled = db.compiled(doc)?;
    let id = symbol_at(compiled, pos)?;
    Some(compiled.symbols.get(id).range)
}

/// Every occurrence of the symbol at `pos`, including the range at which
/// it was declared.
pub fn references_to(db: &Database, doc: DocumentId, pos: Position) -> Vec<Range> {
    let Some(compiled) = db.compiled(doc) else { return Vec::new() };
    let Some(id) = symbol_at(compiled, pos) else { return Vec::new() };

    let mut ranges = vec![compiled.symbols.get(id).range];
    ranges.extend(compiled.occurrences.iter().filter(|o| o.symbol == id).map(|o| o.range));
    ranges
}

#[derive(Debug, Clone)]
pub struct CompletionItem {
    pub label: String,
    pub detail: String,
}

/// Bindings visible at `pos`, approximated as every top-level definition
/// plus every local binding declared before `pos` in the same document.
/// A true scope-chain walk would need the active `EnvId` at an arbitrary
/// source position, which resolution does not record (environments are
/// addressed by arena id, not by the range of source they cover); this
/// textual-precedence approximation over-includes bindings from sibling
/// scopes the cursor has already exited.
pub fn completions(db: &Database, doc: DocumentId, pos: Position) -> Vec<CompletionItem> {
    let Some(compiled) = db.compiled(doc) else { return Vec::new() };

    let mut items = Vec::new();
    for &id in compiled.definitions.values() {
        let symbol = compiled.symbols.get(id);
        items.push(CompletionItem { label: compiled.strings.resolve(symbol.name).to_owned(), detail: detail_of(compiled, symbol) });
    }
    for (_, symbol) in compiled.symbols.iter() {
        let is_local = matches!(symbol.variant, SymbolVariant::LocalVariable { .. } | SymbolVariant::LocalMutability { .. });
        if is_local && symbol.range.stop <= pos {
            items.push(CompletionItem { label: compiled.strings.resolve(symbol.name).to_owned(), detail: detail_of(compiled, symbol) });
        }
    }
    items
}

fn detail_of(compiled: &CompiledDocument, symbol: &Symbol) -> String {
    match symbol_type(symbol) {
        Some(ty) => kieli_hir::render_type(&compiled.types, &compiled.symbols, &compiled.strings, ty),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct InlayHint {
    pub position: Position,
    pub label: String,
}

/// `: Type` hints for every `let` binding in `range` whose type was not
/// written explicitly. Only plain name bindings are annotated; a
/// destructuring pattern has no single position to attach one label to.
pub fn inlay_hints(db: &Database, doc: DocumentId, range: Range) -> Vec<InlayHint> {
    let Some(compiled) = db.compiled(doc) else { return Vec::new() };
    let Some(text) = db.meta(doc).map(|meta| meta.text.as_str()) else { return Vec::new() };

    let mut unannotated = Vec::new();
    for item in &compiled.file.items {
        collect_unannotated_lets(item, &mut unannotated);
    }

    let mut hints = Vec::new();
    for span in unannotated {
        let pattern_range = compiled.line_index.range(text, span);
        if !(range.start <= pattern_range.start && pattern_range.stop <= range.stop) {
            continue;
        }
        let Some(symbol) = compiled.symbols.iter().find(|&(_, s)| s.range == pattern_range).map(|&(_, s)| s) else { continue };
        let Some(ty) = symbol_type(symbol) else { continue };
        let rendered = kieli_hir::render_type(&compiled.types, &compiled.symbols, &compiled.strings, ty);
        hints.push(InlayHint { position: pattern_range.stop, label: format!(": {rendered}") });
    }
    hints
}

fn collect_unannotated_lets(item: &Item, out: &mut Vec<kieli_common::span::Span>) {
    match item {
        Item::Fn(def) => {
            if let Some(body) = &def.body {
                collect_unannotated_lets_expr(body, out);
            }
        }
        Item::Impl(def) => {
            for item in &def.items {
                collect_unannotated_lets(item, out);
            }
        }
        Item::Submodule(def) => {
            for item in &def.items {
                collect_unannotated_lets(item, out);
            }
        }
        Item::Import(_) | Item::Struct(_) | Item::Enum(_) | Item::Alias(_) | Item::Concept(_) => {}
    }
}

fn collect_unannotated_lets_expr(expr: &Expr, out: &mut Vec<kieli_common::span::Span>) {
    match &expr.kind {
        ExprKind::Let { pattern: Some(Pattern { kind: PatternKind::Name { .. }, span }), ty: None, initializer } => {
            out.push(*span);
            collect_unannotated_lets_expr(initializer, out);
        }
        ExprKind::Let { initializer, .. } => collect_unannotated_lets_expr(initializer, out),
        ExprKind::Block { effects, result } => {
            for effect in effects {
                collect_unannotated_lets_expr(effect, out);
            }
            collect_unannotated_lets_expr(result, out);
        }
        ExprKind::Call { callee, args } => {
            collect_unannotated_lets_expr(callee, out);
            for arg in args {
                collect_unannotated_lets_expr(arg, out);
            }
        }
        ExprKind::MethodCall { receiver, args, .. } => {
            collect_unannotated_lets_expr(receiver, out);
            for arg in args {
                collect_unannotated_lets_expr(arg, out);
            }
        }
        ExprKind::BinaryOp { left, right, .. } => {
            collect_unannotated_lets_expr(left, out);
            collect_unannotated_lets_expr(right, out);
        }
        ExprKind::Conditional { condition, true_branch, false_branch, .. } => {
            collect_unannotated_lets_expr(condition, out);
            collect_unannotated_lets_expr(true_branch, out);
            collect_unannotated_lets_expr(false_branch, out);
        }
        ExprKind::Match { scrutinee, arms } => {
            collect_unannotated_lets_expr(scrutinee, out);
            for arm in arms {
                collect_unannotated_lets_expr(&arm.handler, out);
            }
        }
        ExprKind::Loop { body, .. } => collect_unannotated_lets_expr(body, out),
        ExprKind::Break(Some(inner)) | ExprKind::Ret(Some(inner)) | ExprKind::Discard(inner) | ExprKind::Mov(inner) => {
            collect_unannotated_lets_expr(inner, out)
        }
        ExprKind::AddressOf { referent, .. } => collect_unannotated_lets_expr(referent, out),
        ExprKind::Deref(inner) | ExprKind::Defer(inner) | ExprKind::Unsafe(inner) | ExprKind::Meta(inner) => {
            collect_unannotated_lets_expr(inner, out)
        }
        ExprKind::FieldAccess { base, .. } | ExprKind::TupleIndex { base, .. } => collect_unannotated_lets_expr(base, out),
        ExprKind::ArrayIndex { base, index } => {
            collect_unannotated_lets_expr(base, out);
            collect_unannotated_lets_expr(index, out);
        }
        ExprKind::Tuple(elements) | ExprKind::Array(elements) => {
            for element in elements {
                collect_unannotated_lets_expr(element, out);
            }
        }
        ExprKind::StructInit { fields, .. } => {
            for (_, value) in fields {
                collect_unannotated_lets_expr(value, out);
            }
        }
        ExprKind::TypeCast { value, .. } | ExprKind::TypeAscription { value, .. } => collect_unannotated_lets_expr(value, out),
        ExprKind::Literal(_)
        | ExprKind::Path(_)
        | ExprKind::Break(None)
        | ExprKind::Continue
        | ExprKind::Ret(None)
        | ExprKind::LocalTypeAlias { .. }
        | ExprKind::Sizeof(_)
        | ExprKind::Hole
        | ExprKind::Error => {}
    }
}

fn classify(kind: TokenKind) -> Option<SemanticTokenClass> {
    use SemanticTokenClass as C;
    use TokenKind::*;
    Some(match kind {
        Let | Mut | Immut | If | Else | Elif | While | Loop | For | In | Match | Ret | Fn | Struct | Enum | Alias
        | Impl | Concept | Module | Import | Sizeof | Typeof | Unsafe | Mov | Meta | Defer | Where | Global | Dyn
        | SelfType | SelfValue | Discard | Break | Continue | As | True | False => C::Keyword,
        I8 | I16 | I32 | I64 | U8 | U16 | U32 | U64 | FloatKw | Char | Bool | StringKw => C::Type,
        Comment => C::Comment,
        IntLiteral | FloatLiteral => C::Number,
        CharLiteral | StringLiteral => C::String,
        Dot | Colon | ColonColon | Pipe | Eq | Amp | Star | Plus | Question | Hole | Backslash | LeftArrow
        | RightArrow | OperatorName => C::Operator,
        UpperName => C::Type,
        LowerName => C::Variable,
        Wildcard | Whitespace | Newline | LParen | RParen | LBracket | RBracket | LBrace | RBrace | Comma
        | Semicolon | Error | EndOfInput => return None,
    })
}

/// Delta-encoded semantic tokens (five `u32`s per token, per the LSP wire
/// format) for every non-trivia token of `doc` whose range falls in `range`.
pub fn semantic_tokens(db: &Database, doc: DocumentId, range: Range) -> Vec<u32> {
    let Some(meta) = db.meta(doc) else { return Vec::new() };
    let (tokens, _) = kieli_lexer::Lexer::tokenize_raw(&meta.text);
    let line_index = kieli_common::span::LineIndex::new(&meta.text);

    let classified: Vec<ClassifiedToken> = tokens
        .iter()
        .filter_map(|token| {
            let class = classify(token.kind)?;
            let start = line_index.position(&meta.text, token.span.start);
            if start < range.start || start >= range.stop {
                return None;
            }
            Some(ClassifiedToken { start, length: token.span.len(), class })
        })
        .collect();

    encode_delta(&classified)
}

#[derive(Debug, Clone)]
pub enum DocumentSymbolKind {
    Function,
    Struct,
    Enum,
    Alias,
    Concept,
    Impl,
    Module,
    Import,
}

#[derive(Debug, Clone)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: DocumentSymbolKind,
    pub range: Range,
    pub children: Vec<DocumentSymbol>,
}

pub fn document_symbols(db: &Database, doc: DocumentId) -> Vec<DocumentSymbol> {
    let Some(compiled) = db.compiled(doc) else { return Vec::new() };
    let text = db.meta(doc).map(|meta| meta.text.as_str()).unwrap_or_default();
    compiled.file.items.iter().map(|item| document_symbol_of(item, &compiled.line_index, text)).collect()
}

fn document_symbol_of(item: &Item, line_index: &kieli_common::span::LineIndex, text: &str) -> DocumentSymbol {
    let (name, kind, span, children) = match item {
        Item::Import(def) => ("import".to_owned(), DocumentSymbolKind::Import, def.span, Vec::new()),
        Item::Fn(def) => (def.name.clone(), DocumentSymbolKind::Function, def.span, Vec::new()),
        Item::Struct(def) => (def.name.clone(), DocumentSymbolKind::Struct, def.span, Vec::new()),
        Item::Enum(def) => (def.name.clone(), DocumentSymbolKind::Enum, def.span, Vec::new()),
        Item::Alias(def) => (def.name.clone(), DocumentSymbolKind::Alias, def.span, Vec::new()),
        Item::Concept(def) => (def.name.clone(), DocumentSymbolKind::Concept, def.span, Vec::new()),
        Item::Impl(def) => {
            let children = def.items.iter().map(|child| document_symbol_of(child, line_index, text)).collect();
            ("impl".to_owned(), DocumentSymbolKind::Impl, def.span, children)
        }
        Item::Submodule(def) => {
            let children = def.items.iter().map(|child| document_symbol_of(child, line_index, text)).collect();
            (def.name.clone(), DocumentSymbolKind::Module, def.span, children)
        }
    };
    DocumentSymbol { name, kind, range: line_index.range(text, span), children }
}

/// Formatting is an external collaborator's job; this always returns
/// `None`. See the design notes for why no pretty-printer lives here.
pub fn format(_db: &Database, _doc: DocumentId) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn compiled_db(source: &str) -> (Database, DocumentId) {
        let mut db = Database::new();
        let doc = db.open_document(PathBuf::from("a.ki"), source.to_owned(), "kieli".to_owned(), 1);
        let mut sink: Vec<kieli_common::diagnostic::Diagnostic> = Vec::new();
        db.compile(doc, &kieli_diagnostics::CompileOptions::default(), &mut sink);
        (db, doc)
    }

    #[test]
    fn hover_on_a_parameter_shows_its_type() {
        let (db, doc) = compiled_db("fn f(x: I32) = x");
        let pos = Position { line: 0, column: 15 };
        let hover = hover(&db, doc, pos).expect("hover over `x` use");
        assert_eq!(hover.contents, "x: I32");
    }

    #[test]
    fn definition_of_a_use_points_back_to_the_parameter() {
        let (db, doc) = compiled_db("fn f(x: I32) = x");
        let use_pos = Position { line: 0, column: 15 };
        let def_range = definition_of(&db, doc, use_pos).expect("definition");
        assert_eq!(def_range.start, Position { line: 0, column: 5 });
    }

    #[test]
    fn references_to_a_parameter_includes_its_declaration_and_use() {
        let (db, doc) = compiled_db("fn f(x: I32) = x");
        let pos = Position { line: 0, column: 15 };
        let refs = references_to(&db, doc, pos);
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn document_symbols_lists_top_level_definitions() {
        let (db, doc) = compiled_db("fn f() = 1\nstruct Point { x: I32 }");
        let symbols = document_symbols(&db, doc);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].name, "f");
        assert_eq!(symbols[1].name, "Point");
    }

    #[test]
    fn format_is_not_implemented() {
        let (db, doc) = compiled_db("fn f() = 1");
        assert!(format(&db, doc).is_none());
    }

    #[test]
    fn semantic_tokens_classifies_the_fn_keyword() {
        let (db, doc) = compiled_db("fn f() = 1");
        let whole_document = Range::new(Position { line: 0, column: 0 }, Position { line: 10, column: 0 });
        let encoded = semantic_tokens(&db, doc, whole_document);
        assert!(!encoded.is_empty());
        assert_eq!(encoded[3], SemanticTokenClass::Keyword.legend_index());
    }
}
