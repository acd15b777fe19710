//! The shared state every resolver sub-engine threads through: arenas,
//! the union-find tables, the declare/resolve state machine, loop and
//! safety-frame stacks, and the diagnostic sink.

use kieli_common::diagnostic::DiagnosticSink;
use kieli_common::interner::{StringId, StringInterner};
use kieli_common::span::{LineIndex, Span};
use kieli_hir::{EnvArena, EnvId, Symbol, SymbolId, Type, TypeArena};
use rustc_hash::FxHashMap;

use crate::diagnostics::DiagnosticBuilder;
use crate::unify::InferCtx;
use kieli_common::arena::Arena;

/// Where a top-level definition currently sits in the declare-then-resolve
/// pipeline. `OnStack` re-entry is how circular alias/const dependencies are
/// caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefState {
    Unresolved,
    OnStack,
    Resolved,
}

/// One resolved reference to a symbol, recorded at the range of the path
/// segment that named it. Backs the IDE query layer's go-to-definition and
/// find-references without re-walking the AST against the environment
/// tree after the fact.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence {
    pub range: kieli_common::span::Range,
    pub symbol: SymbolId,
}

/// One active loop's recorded result type, used to unify every `break`
/// inside it and to reject `break`/`continue` outside any loop.
pub struct LoopScope {
    /// Set by the first `break <expr>` seen; later breaks unify against it.
    pub result_ty: Option<Type>,
    /// `while` loops require a unit-typed body; a value-carrying `break`
    /// inside one is its own diagnostic.
    pub is_while: bool,
}

pub struct Context<'a> {
    pub strings: &'a mut StringInterner,
    pub types: TypeArena,
    pub symbols: Arena<Symbol>,
    pub envs: EnvArena,
    pub infer: InferCtx,
    pub sink: &'a mut dyn DiagnosticSink,
    line_index: LineIndex,
    source: &'a str,

    /// Top-level names visible from the module root, keyed by interned name.
    pub definitions: FxHashMap<StringId, SymbolId>,
    pub states: FxHashMap<SymbolId, DefState>,
    /// Method tables keyed by the implementing type's definition symbol
    /// (the associated namespace SPEC_FULL's method lookup resolves
    /// against), mapping method name to its function symbol.
    pub methods: FxHashMap<SymbolId, FxHashMap<StringId, SymbolId>>,

    pub loops: Vec<LoopScope>,
    /// `true` at the top of the stack once a `unsafe { ... }` block has been
    /// entered; `*p` on a raw pointer is only legal while this holds.
    pub safety: Vec<bool>,

    /// Every enum's full variant-name list, keyed by the enum's own
    /// symbol; the completeness test a `match` exhaustiveness check needs.
    pub enum_variants: FxHashMap<SymbolId, Vec<StringId>>,
    /// Named-field layout for a record struct or a record enum variant,
    /// keyed by the struct's (or the variant constructor's) own symbol.
    pub record_fields: FxHashMap<SymbolId, Vec<(StringId, Type)>>,
    /// An enum's variant constructors by name, keyed by the enum's own
    /// symbol; backs `::variant` abbreviated constructor patterns, which
    /// resolve against the scrutinee's pinned enum type rather than a path.
    pub enum_variant_ctors: FxHashMap<SymbolId, FxHashMap<StringId, SymbolId>>,
    /// A generic definition's own declared template parameters, keyed by its
    /// symbol, so a use site with explicit template arguments (`Foo::<I32>`)
    /// can instantiate against the definition it names.
    pub template_scopes: FxHashMap<SymbolId, crate::templates::TemplateScope>,
    /// Every path resolved to a symbol over the course of this compilation,
    /// in resolution order.
    pub occurrences: Vec<Occurrence>,
}

impl<'a> Context<'a> {
    pub fn new(strings: &'a mut StringInterner, source: &'a str, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            strings,
            types: TypeArena::new(),
            symbols: Arena::new(),
            envs: EnvArena::new(),
            infer: InferCtx::new(),
            sink,
            line_index: LineIndex::new(source),
            source,
            definitions: FxHashMap::default(),
            states: FxHashMap::default(),
            methods: FxHashMap::default(),
            loops: Vec::new(),
            safety: vec![false],
            enum_variants: FxHashMap::default(),
            record_fields: FxHashMap::default(),
            enum_variant_ctors: FxHashMap::default(),
            template_scopes: FxHashMap::default(),
            occurrences: Vec::new(),
        }
    }

    pub fn range_of(&self, span: Span) -> kieli_common::span::Range {
        self.line_index.range(self.source, span)
    }

    pub fn root_env(&self) -> EnvId {
        self.envs.root()
    }

    fn diag(&self) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder::new(&self.line_index, self.source)
    }

    pub fn error(&mut self, span: Span, code: &'static str, message: impl Into<String>) {
        let diag = self.diag().error(span, code, message);
        self.sink.push(diag);
    }

    pub fn warning(&mut self, span: Span, code: &'static str, message: impl Into<String>) {
        let diag = self.diag().warning(span, code, message);
        self.sink.push(diag);
    }

    pub fn error_with_related(
        &mut self,
        span: Span,
        code: &'static str,
        message: impl Into<String>,
        related_span: Span,
        related_message: impl Into<String>,
    ) {
        let diag = self.diag().error(span, code, message);
        let diag = self.diag().with_related(diag, related_span, related_message);
        self.sink.push(diag);
    }

    pub fn warning_with_tag(
        &mut self,
        span: Span,
        code: &'static str,
        message: impl Into<String>,
        tag: kieli_common::diagnostic::DiagnosticTag,
    ) {
        let diag = self.diag().warning(span, code, message);
        let diag = self.diag().with_tag(diag, tag);
        self.sink.push(diag);
    }

    /// Emit a warning at an already-resolved [`Range`](kieli_common::span::Range)
    /// rather than a [`Span`] -- used where the caller only has a `Symbol`'s
    /// stored range (e.g. the unused-variable sweep) and has no AST span to
    /// convert.
    pub fn warning_at(&mut self, range: kieli_common::span::Range, code: &'static str, message: impl Into<String>) {
        self.sink.push(kieli_common::diagnostic::Diagnostic::warning(range, code, message));
    }

    pub fn in_unsafe(&self) -> bool {
        *self.safety.last().unwrap_or(&false)
    }

    pub fn error_type(&mut self) -> Type {
        self.types.alloc(kieli_hir::TypeVariant::Error)
    }
}
