//! Name resolution, type inference, and exhaustiveness checking for Kieli.
//!
//! Resolution runs in three passes over a desugared [`SourceFile`]: a
//! declare pass that makes every top-level name visible regardless of
//! declaration order, a signature pass that resolves every definition's own
//! type (struct fields, enum variants, function headers, alias targets,
//! concept method signatures), and a body pass that type-checks function
//! and method bodies against those signatures. [`resolve`] drives all
//! three and hands back the resulting [`Context`], which owns every arena
//! (`types`, `symbols`, `envs`) the rest of a tool chain (the IDE query
//! layer, a future backend) would want to keep alive.

pub mod context;
pub mod exhaustiveness;
pub mod exprs;
pub mod generalize;
pub mod methods;
pub mod namespace;
pub mod patterns;
pub mod templates;

mod diagnostics;
mod unify;

pub use context::{Context, DefState, LoopScope, Occurrence};
pub use unify::{InferCtx, UnifyError};

use kieli_ast::item::SourceFile;
use kieli_common::diagnostic::DiagnosticSink;
use kieli_common::interner::StringInterner;

/// Resolve a complete source file: three passes over `file.items`, pushing
/// every diagnostic encountered into `sink`. `source` and `strings` must be
/// the same source text and interner the file was lexed/parsed/desugared
/// from, since spans and interned names are only meaningful relative to
/// them.
pub fn resolve<'a>(
    file: &SourceFile,
    strings: &'a mut StringInterner,
    source: &'a str,
    sink: &'a mut dyn DiagnosticSink,
) -> Context<'a> {
    let mut ctx = Context::new(strings, source, sink);
    let root = ctx.root_env();

    namespace::declare_items(&mut ctx, &file.items, root);
    namespace::resolve_signatures(&mut ctx, &file.items, root);
    namespace::resolve_bodies(&mut ctx, &file.items, root);

    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use kieli_common::diagnostic::Diagnostic;

    fn resolve_source(source: &str) -> (Vec<Diagnostic>, kieli_common::interner::StringInterner) {
        let (file, parse_errors) = kieli_ast::lower(source);
        assert!(parse_errors.is_empty(), "unexpected parse errors: {parse_errors:?}");
        let mut strings = kieli_common::interner::StringInterner::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        {
            let _ctx = resolve(&file, &mut strings, source, &mut sink);
        }
        (sink, strings)
    }

    fn codes_of(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn undefined_name_is_an_error() {
        let (diagnostics, _) = resolve_source("fn f() = y");
        assert!(codes_of(&diagnostics).contains(&kieli_diagnostics::codes::name::UNDEFINED_NAME));
    }

    #[test]
    fn unused_local_variable_is_a_warning() {
        let (diagnostics, _) = resolve_source("fn f() { let x = 1; 0 }");
        assert!(codes_of(&diagnostics).contains(&kieli_diagnostics::codes::style::UNUSED_VARIABLE));
    }

    #[test]
    fn break_outside_loop_is_an_error() {
        let (diagnostics, _) = resolve_source("fn f() { break }");
        assert!(codes_of(&diagnostics).contains(&kieli_diagnostics::codes::semantic::BREAK_OUTSIDE_LOOP));
    }

    #[test]
    fn exhaustive_enum_match_has_no_diagnostics() {
        let source = "\
enum Option = None | Some(I32)
fn unwrap_or(opt: Option, fallback: I32): I32 {
    match opt {
        Option::None -> fallback
        Option::Some(value) -> value
    }
}";
        let (diagnostics, _) = resolve_source(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    }

    #[test]
    fn inexhaustive_enum_match_is_an_error() {
        let source = "\
enum Option = None | Some(I32)
fn f(opt: Option): I32 {
    match opt {
        Option::Some(value) -> value
    }
}";
        let (diagnostics, _) = resolve_source(source);
        assert!(codes_of(&diagnostics).contains(&kieli_diagnostics::codes::semantic::INEXHAUSTIVE_PATTERN));
    }

    #[test]
    fn mismatched_return_type_is_an_error() {
        let (diagnostics, _) = resolve_source("fn f(): Bool { 1 }");
        assert!(codes_of(&diagnostics).contains(&kieli_diagnostics::codes::ty::UNIFICATION_FAILURE));
    }

    #[test]
    fn mutable_reference_coerces_to_shared_parameter() {
        let source = "\
fn takes_shared(x: &I32) = ()
fn f(y: &mut I32) { takes_shared(y) }";
        let (diagnostics, _) = resolve_source(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    }

    #[test]
    fn uninitialized_struct_field_is_an_error() {
        let source = "\
struct Point { x: I32, y: I32 }
fn f() { Point { x: 1 } }";
        let (diagnostics, _) = resolve_source(source);
        assert!(codes_of(&diagnostics).contains(&kieli_diagnostics::codes::ty::STRUCT_FIELD_UNINIT));
    }

    #[test]
    fn mutual_recursion_between_functions_resolves() {
        let source = "\
fn is_even(n: I32): Bool { if n == 0 { true } else { is_odd(n) } }
fn is_odd(n: I32): Bool { if n == 0 { false } else { is_even(n) } }";
        let (diagnostics, _) = resolve_source(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    }
}
