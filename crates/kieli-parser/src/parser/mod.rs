//! Event-based parser for Kieli.
//!
//! The parser consumes a token stream and produces events (Open/Close/Advance)
//! that are later converted into a rowan green tree. This decouples parsing
//! logic from tree construction.
//!
//! # Architecture
//!
//! The parser uses matklad's event-based approach (as in rust-analyzer):
//!
//! 1. Parse functions call `open()` to start a node, `advance()` to consume
//!    tokens, and `close()` to finish a node with its actual kind.
//! 2. Events are collected into a flat `Vec<Event>`.
//! 3. `build_tree()` converts events into a rowan `GreenNode`.
//!
//! The `open_before()` method enables wrapping a previously completed node
//! (e.g., turning `name` into `call_expr(name, arg_list)`) using the
//! "forward parent" technique.
//!
//! Whitespace, comments, and newlines are always trivia in Kieli -- blocks
//! use `;` as the statement separator, not layout -- so lookahead always
//! skips them; `advance()` still emits Advance events for skipped trivia so
//! every token lands in the CST.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod patterns;
pub(crate) mod types;

use kieli_common::span::Span;
use kieli_common::token::{Token, TokenKind};

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

#[derive(Debug)]
enum Event {
    /// Start a new CST node. The `kind` is initially TOMBSTONE and gets
    /// patched by `close()` with the real node kind.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    /// Finish the current CST node.
    Close,
    /// Consume the current token, advancing the token position.
    Advance,
}

/// An opaque marker for a started but not-yet-closed CST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// An opaque marker for a completed (opened and closed) CST node. Used by
/// `open_before()` to wrap a previously completed node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

/// Event-based parser for Kieli source code.
pub(crate) struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    source: &'src str,
    errors: Vec<ParseError>,
    /// Suppresses struct-initializer parsing (`Path { ... }`) while parsing
    /// the scrutinee of `if`/`while`/`for`/`match`, where a `{` must instead
    /// start the construct's body block. Mirrors the same restriction in
    /// other brace-delimited expression-oriented languages.
    no_struct_init: bool,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
            no_struct_init: false,
        }
    }

    /// Runs `f` with struct-initializer parsing suppressed, restoring the
    /// previous setting afterward.
    pub(crate) fn without_struct_init<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.no_struct_init;
        self.no_struct_init = true;
        let result = f(self);
        self.no_struct_init = previous;
        result
    }

    pub(crate) fn struct_init_allowed(&self) -> bool {
        !self.no_struct_init
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// The SyntaxKind of the current significant token (trivia skipped).
    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// The SyntaxKind of the Nth significant token ahead. `nth(0) == current()`.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let mut pos = self.pos;
        let mut remaining = n;
        while pos < self.tokens.len() {
            let token_kind = self.tokens[pos].kind;
            if token_kind.is_trivia() {
                pos += 1;
                continue;
            }
            if remaining == 0 {
                return SyntaxKind::from(token_kind);
            }
            remaining -= 1;
            pos += 1;
        }
        SyntaxKind::EOF
    }

    /// The span of the current significant token.
    pub(crate) fn current_span(&self) -> Span {
        let pos = self.skip_to_significant(self.pos);
        if pos < self.tokens.len() {
            self.tokens[pos].span
        } else {
            let end = self.source.len() as u32;
            Span::new(end, end)
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    // ── Mutation: node management ────────────────────────────────────

    pub(crate) fn open(&mut self) -> MarkOpened {
        let mark = MarkOpened { index: self.events.len() };
        self.events.push(Event::Open { kind: SyntaxKind::TOMBSTONE, forward_parent: None });
        mark
    }

    /// Start a new CST node BEFORE a previously completed node, using the
    /// "forward parent" technique: the completed node's Open event gets a
    /// `forward_parent` link to the new wrapping Open event, avoiding any
    /// need to physically shift the events vector.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened { index: self.events.len() };
        self.events.push(Event::Open { kind: SyntaxKind::TOMBSTONE, forward_parent: None });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open { kind: slot_kind, .. } = &mut self.events[m.index] {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Mutation: token consumption ────────────────────────────────────

    /// Consume the current significant token, emitting Advance events for
    /// any skipped trivia first.
    pub(crate) fn advance(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// Consume the current token wrapped in an ERROR_NODE.
    pub(crate) fn advance_with_error(&mut self, message: &str) {
        let m = self.open();
        self.error(message);
        self.advance();
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise emit an error and return false.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            self.error(&format!("expected {kind:?}, found {:?}", self.current()));
            false
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    /// No error is emitted on mismatch.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Error reporting ────────────────────────────────────────────────

    pub(crate) fn error(&mut self, message: &str) {
        let span = self.current_span();
        self.errors.push(ParseError::new(message, span));
    }

    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related_msg: &str) {
        let span = self.current_span();
        self.errors.push(ParseError::with_related(message, span, related_msg, related_span));
    }

    /// Skip tokens until one of `recovery` is found (or EOF), wrapping the
    /// skipped tokens in an ERROR_NODE. Used to resynchronize after an
    /// unrecoverable parse error inside a list or block.
    pub(crate) fn recover_until(&mut self, recovery: &[SyntaxKind]) {
        if self.at(SyntaxKind::EOF) || self.at_any(recovery) {
            return;
        }
        let m = self.open();
        while !self.at(SyntaxKind::EOF) && !self.at_any(recovery) {
            self.advance();
        }
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    fn skip_to_significant(&self, mut pos: usize) -> usize {
        while pos < self.tokens.len() && self.tokens[pos].kind.is_trivia() {
            pos += 1;
        }
        pos
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Convert collected events into a rowan `GreenNode` and the recorded
    /// parse errors. Forward parents are resolved by following the chain
    /// from each linked Open event and opening nodes outermost-first.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<(usize, SyntaxKind)> = Vec::new();

        let mut i = 0;
        while i < self.events.len() {
            match self.events[i] {
                Event::Open { kind, forward_parent } => {
                    if forward_parent.is_some() {
                        forward_parents.clear();
                        let mut current = i;
                        loop {
                            let (fk, fp) = match self.events[current] {
                                Event::Open { kind, forward_parent } => (kind, forward_parent),
                                _ => unreachable!(),
                            };
                            forward_parents.push((current, fk));
                            match fp {
                                Some(next) => current = next,
                                None => break,
                            }
                        }

                        for &(fp_idx, _) in forward_parents.iter().skip(1) {
                            if let Event::Open { ref mut kind, ref mut forward_parent } = self.events[fp_idx] {
                                *kind = SyntaxKind::TOMBSTONE;
                                *forward_parent = None;
                            }
                        }
                        if let Event::Open { ref mut forward_parent, .. } = self.events[i] {
                            *forward_parent = None;
                        }

                        for &(_, fk) in forward_parents.iter().rev() {
                            if fk != SyntaxKind::TOMBSTONE {
                                builder.start_node(rowan::SyntaxKind(fk as u16));
                            }
                        }
                    } else if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => {
                    builder.finish_node();
                }
                Event::Advance => {
                    if token_pos < self.tokens.len() {
                        let token = &self.tokens[token_pos];
                        let syntax_kind = SyntaxKind::from(token.kind);
                        let text = &self.source[token.span.start as usize..token.span.end as usize];
                        builder.token(rowan::SyntaxKind(syntax_kind as u16), text);
                        token_pos += 1;
                    }
                }
            }
            i += 1;
        }

        (builder.finish(), self.errors)
    }
}

// ── Top-level parsing ──────────────────────────────────────────────────

const ITEM_START: &[SyntaxKind] = &[
    SyntaxKind::FN_KW,
    SyntaxKind::STRUCT_KW,
    SyntaxKind::ENUM_KW,
    SyntaxKind::ALIAS_KW,
    SyntaxKind::CONCEPT_KW,
    SyntaxKind::IMPL_KW,
    SyntaxKind::MODULE_KW,
    SyntaxKind::IMPORT_KW,
];

/// Parse a complete source file: `module := {import} {definition}`.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    while !p.at(SyntaxKind::EOF) {
        parse_item(p);
    }

    p.advance(); // EOF
    p.close(root, SyntaxKind::SOURCE_FILE);
}

/// Parse a single top-level or nested definition/import.
pub(crate) fn parse_item(p: &mut Parser) {
    match p.current() {
        SyntaxKind::IMPORT_KW => items::parse_import(p),
        SyntaxKind::FN_KW => items::parse_fn_def(p),
        SyntaxKind::STRUCT_KW => items::parse_struct_def(p),
        SyntaxKind::ENUM_KW => items::parse_enum_def(p),
        SyntaxKind::ALIAS_KW => items::parse_alias_def(p),
        SyntaxKind::CONCEPT_KW => items::parse_concept_def(p),
        SyntaxKind::IMPL_KW => items::parse_impl_def(p),
        SyntaxKind::MODULE_KW => items::parse_submodule_def(p),
        _ => {
            p.error("expected a definition (`fn`, `struct`, `enum`, `alias`, `concept`, `impl`, `module`) or `import`");
            p.recover_until(ITEM_START);
        }
    }
}
