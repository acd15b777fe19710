//! Owned abstract syntax tree for Kieli.
//!
//! The CST produced by `kieli-parser` is lossless and keeps the grammar's
//! surface sugar (`elif`, `while`, `for`, trivia, an `if` with no `else`)
//! intact. This crate lowers that tree into a trivia-free, owned AST with
//! the sugar collapsed into a smaller set of primitive shapes, ready for
//! `kieli-hir` to build typed symbols and scopes from.

pub mod desugar;
pub mod expr;
pub mod item;
pub mod pat;
pub mod path;
pub mod ty;

pub use desugar::{desugar_expr, desugar_source_file};
pub use item::SourceFile;

/// Lex, parse, and desugar a complete source file in one step.
pub fn lower(source: &str) -> (SourceFile, Vec<kieli_parser::ParseError>) {
    let parse = kieli_parser::parse(source);
    let file = desugar_source_file(&parse.syntax());
    (file, parse.errors().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprKind;
    use crate::item::Item;

    fn lower_ok(source: &str) -> SourceFile {
        let (file, errors) = lower(source);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        file
    }

    fn single_fn_body(source: &str) -> expr::Expr {
        let file = lower_ok(source);
        let Item::Fn(f) = &file.items[0] else { panic!("expected a function item") };
        f.body.clone().expect("function has a body")
    }

    #[test]
    fn expression_bodied_function_gets_wrapped_in_a_block() {
        let body = single_fn_body("fn f() = 1");
        match body.kind {
            ExprKind::Block { effects, result } => {
                assert!(effects.is_empty());
                assert!(matches!(result.kind, ExprKind::Literal(expr::Literal::Int(1))));
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn if_without_else_synthesizes_a_unit_false_branch() {
        let body = single_fn_body("fn f() { if true { 1 }; }");
        let ExprKind::Block { result, .. } = body.kind else { panic!("expected block") };
        match result.kind {
            ExprKind::Conditional { false_branch, has_explicit_false_branch, source, .. } => {
                assert!(!has_explicit_false_branch);
                assert_eq!(source, expr::ConditionalSource::Normal);
                assert!(matches!(false_branch.kind, ExprKind::Tuple(ref v) if v.is_empty()));
            }
            other => panic!("expected a conditional, got {other:?}"),
        }
    }

    #[test]
    fn elif_chain_collapses_into_nested_conditionals() {
        let body = single_fn_body("fn f() { if a { 1 } elif b { 2 } else { 3 }; }");
        let ExprKind::Block { result, .. } = body.kind else { panic!("expected block") };
        let ExprKind::Conditional { false_branch, source, has_explicit_false_branch, .. } = result.kind else {
            panic!("expected outer conditional")
        };
        assert_eq!(source, expr::ConditionalSource::Normal);
        assert!(has_explicit_false_branch);
        match false_branch.kind {
            ExprKind::Conditional { source, has_explicit_false_branch, .. } => {
                assert_eq!(source, expr::ConditionalSource::Elif);
                assert!(has_explicit_false_branch);
            }
            other => panic!("expected the elif link, got {other:?}"),
        }
    }

    #[test]
    fn while_loop_lowers_to_a_guarded_loop() {
        let body = single_fn_body("fn f() { while c { 1 }; }");
        let ExprKind::Block { result, .. } = body.kind else { panic!("expected block") };
        match result.kind {
            ExprKind::Loop { source, body } => {
                assert_eq!(source, expr::LoopSource::While);
                let ExprKind::Block { result: guard, .. } = body.kind else { panic!("expected loop body block") };
                match guard.kind {
                    ExprKind::Conditional { source, false_branch, .. } => {
                        assert_eq!(source, expr::ConditionalSource::WhileLoopBody);
                        assert!(matches!(false_branch.kind, ExprKind::Break(Some(_))));
                    }
                    other => panic!("expected a conditional guard, got {other:?}"),
                }
            }
            other => panic!("expected a loop, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_lowers_to_bound_iterator_and_match_dispatch() {
        let body = single_fn_body("fn f() { for x in xs { 1 }; }");
        let ExprKind::Block { result, .. } = body.kind else { panic!("expected block") };
        let ExprKind::Block { effects, result: loop_expr } = result.kind else { panic!("expected bind+loop block") };
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0].kind, ExprKind::Let { .. }));
        match loop_expr.kind {
            ExprKind::Loop { source, .. } => assert_eq!(source, expr::LoopSource::For),
            other => panic!("expected a loop, got {other:?}"),
        }
    }

    #[test]
    fn operator_chain_left_associates() {
        let body = single_fn_body("fn f() = 1 + 2 + 3");
        let ExprKind::Block { result, .. } = body.kind else { panic!("expected block") };
        match result.kind {
            ExprKind::BinaryOp { op, left, .. } => {
                assert_eq!(op, "+");
                assert!(matches!(left.kind, ExprKind::BinaryOp { .. }));
            }
            other => panic!("expected a binary op, got {other:?}"),
        }
    }

    #[test]
    fn int_literal_parses_base_prefix_and_separators() {
        let body = single_fn_body("fn f() = 0x1'000");
        let ExprKind::Block { result, .. } = body.kind else { panic!("expected block") };
        assert!(matches!(result.kind, ExprKind::Literal(expr::Literal::Int(0x1000))));
    }
}
