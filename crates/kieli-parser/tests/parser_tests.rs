//! Integration tests for the Kieli parser.
//!
//! Each test parses a small source fragment and checks the resulting CST
//! shape by walking for the syntax kinds the grammar should have produced.
//! We assert on kind presence and relationships rather than full tree
//! snapshots, since the interesting thing under test is "did the parser
//! recover the right structure", not the exact token layout.

use kieli_parser::{parse, Parse, SyntaxKind, SyntaxNode};

fn parse_ok(source: &str) -> SyntaxNode {
    let result: Parse = parse(source);
    assert!(result.ok(), "expected no parse errors for {source:?}, got: {:?}", result.errors());
    result.syntax()
}

fn first_of_kind(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
    root.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("expected a {kind:?} node in:\n{}", kieli_parser::debug_tree(root)))
}

fn count_of_kind(root: &SyntaxNode, kind: SyntaxKind) -> usize {
    root.descendants().filter(|n| n.kind() == kind).count()
}

// ── Items ────────────────────────────────────────────────────────────────

#[test]
fn import_item() {
    let root = parse_ok("import std::io");
    let item = first_of_kind(&root, SyntaxKind::IMPORT_ITEM);
    assert_eq!(count_of_kind(&item, SyntaxKind::PATH_SEGMENT), 2);
}

#[test]
fn fn_with_expression_body() {
    let root = parse_ok("fn add(a: I32, b: I32): I32 = a + b");
    let fn_def = first_of_kind(&root, SyntaxKind::FN_DEF);
    assert_eq!(count_of_kind(&fn_def, SyntaxKind::PARAM), 2);
    assert!(fn_def.descendants().any(|n| n.kind() == SyntaxKind::OPERATOR_CHAIN_EXPR));
}

#[test]
fn fn_with_block_body() {
    let root = parse_ok("fn main() { let x = 1; x }");
    let fn_def = first_of_kind(&root, SyntaxKind::FN_DEF);
    first_of_kind(&fn_def, SyntaxKind::BLOCK_EXPR);
    first_of_kind(&fn_def, SyntaxKind::LET_EXPR);
}

#[test]
fn fn_with_self_param() {
    let root = parse_ok("fn describe(&self): String = self.name");
    let fn_def = first_of_kind(&root, SyntaxKind::FN_DEF);
    first_of_kind(&fn_def, SyntaxKind::SELF_PARAM);
}

#[test]
fn fn_with_template_params() {
    let root = parse_ok("fn identity[T](x: T): T = x");
    let fn_def = first_of_kind(&root, SyntaxKind::FN_DEF);
    let tparam = first_of_kind(&fn_def, SyntaxKind::TEMPLATE_TYPE_PARAM);
    assert!(tparam
        .children_with_tokens()
        .any(|it| it.as_token().map(|t| t.kind() == SyntaxKind::UPPER_NAME).unwrap_or(false)));
}

#[test]
fn tuple_struct_def() {
    let root = parse_ok("struct Point(I32, I32)");
    let def = first_of_kind(&root, SyntaxKind::STRUCT_DEF);
    first_of_kind(&def, SyntaxKind::TUPLE_STRUCT_FIELD_LIST);
    assert_eq!(count_of_kind(&def, SyntaxKind::PRIMITIVE_TYPE), 2);
}

#[test]
fn record_struct_def() {
    let root = parse_ok("struct User { name: String, age: I32 }");
    let def = first_of_kind(&root, SyntaxKind::STRUCT_DEF);
    assert_eq!(count_of_kind(&def, SyntaxKind::STRUCT_FIELD_DEF), 2);
}

#[test]
fn enum_def_with_mixed_variants() {
    let root = parse_ok("enum Shape = Circle(Float) | Square { side: Float } | Point");
    let def = first_of_kind(&root, SyntaxKind::ENUM_DEF);
    assert_eq!(count_of_kind(&def, SyntaxKind::VARIANT_DEF), 3);
    first_of_kind(&def, SyntaxKind::TUPLE_STRUCT_FIELD_LIST);
    first_of_kind(&def, SyntaxKind::VARIANT_FIELD_LIST);
}

#[test]
fn alias_def() {
    let root = parse_ok("alias Id = I64");
    first_of_kind(&root, SyntaxKind::ALIAS_DEF);
}

#[test]
fn concept_def() {
    let root = parse_ok("concept Show { fn show(&self): String }");
    let def = first_of_kind(&root, SyntaxKind::CONCEPT_DEF);
    first_of_kind(&def, SyntaxKind::CONCEPT_METHOD_SIG);
}

#[test]
fn impl_def_nests_items() {
    let root = parse_ok("impl Point { fn origin(): Point = Point { x: 0, y: 0 } }");
    let def = first_of_kind(&root, SyntaxKind::IMPL_DEF);
    first_of_kind(&def, SyntaxKind::FN_DEF);
    first_of_kind(&def, SyntaxKind::STRUCT_INIT_EXPR);
}

#[test]
fn submodule_nests_items() {
    let root = parse_ok("module geometry { struct Point(I32, I32) }");
    let def = first_of_kind(&root, SyntaxKind::SUBMODULE_DEF);
    first_of_kind(&def, SyntaxKind::STRUCT_DEF);
}

// ── Expressions ──────────────────────────────────────────────────────────

#[test]
fn operator_chain_is_flat() {
    let root = parse_ok("fn f(): I32 = 1 + 2 * 3 - 4");
    let chain = first_of_kind(&root, SyntaxKind::OPERATOR_CHAIN_EXPR);
    assert_eq!(count_of_kind(&chain, SyntaxKind::LITERAL_EXPR), 4);
    let operator_count = chain
        .children_with_tokens()
        .filter(|it| matches!(it.kind(), SyntaxKind::OPERATOR_NAME | SyntaxKind::STAR | SyntaxKind::PLUS))
        .count();
    assert_eq!(operator_count, 3);
}

#[test]
fn call_and_method_call() {
    let root = parse_ok("fn f(): I32 = foo(1, 2).bar[I32](3)");
    first_of_kind(&root, SyntaxKind::CALL_EXPR);
    let method = first_of_kind(&root, SyntaxKind::METHOD_CALL_EXPR);
    first_of_kind(&method, SyntaxKind::TEMPLATE_ARG_LIST);
}

#[test]
fn field_access_vs_method_call() {
    let root = parse_ok("fn f(): I32 = point.x");
    first_of_kind(&root, SyntaxKind::FIELD_ACCESS_EXPR);
}

#[test]
fn tuple_index() {
    let root = parse_ok("fn f(): I32 = pair.0");
    first_of_kind(&root, SyntaxKind::TUPLE_INDEX_EXPR);
}

#[test]
fn array_index_requires_dot() {
    let root = parse_ok("fn f(): I32 = xs.[0]");
    first_of_kind(&root, SyntaxKind::ARRAY_INDEX_EXPR);
}

#[test]
fn struct_init_suppressed_in_if_condition() {
    let root = parse_ok("fn f(): I32 = if flag { 1 } else { 2 }");
    let if_expr = first_of_kind(&root, SyntaxKind::IF_EXPR);
    assert_eq!(count_of_kind(&if_expr, SyntaxKind::STRUCT_INIT_EXPR), 0);
    assert_eq!(count_of_kind(&if_expr, SyntaxKind::BLOCK_EXPR), 2);
}

#[test]
fn struct_init_allowed_outside_condition() {
    let root = parse_ok("fn f(): Point = Point { x: 1, y: 2 }");
    let init = first_of_kind(&root, SyntaxKind::STRUCT_INIT_EXPR);
    assert_eq!(count_of_kind(&init, SyntaxKind::STRUCT_INIT_FIELD), 2);
}

#[test]
fn if_elif_else_chain() {
    let root = parse_ok("fn f(): I32 = if a { 1 } elif b { 2 } else { 3 }");
    let if_expr = first_of_kind(&root, SyntaxKind::IF_EXPR);
    first_of_kind(&if_expr, SyntaxKind::ELIF_CLAUSE);
    first_of_kind(&if_expr, SyntaxKind::ELSE_CLAUSE);
}

#[test]
fn match_arms_need_no_separator() {
    let root = parse_ok("fn f(): I32 = match n { 0 -> 1 1 -> 2 _ -> 3 }");
    let match_expr = first_of_kind(&root, SyntaxKind::MATCH_EXPR);
    assert_eq!(count_of_kind(&match_expr, SyntaxKind::MATCH_ARM), 3);
}

#[test]
fn loop_while_for() {
    let root = parse_ok("fn f() { loop { break }; while true { discard 1 }; for x in xs { discard x } }");
    first_of_kind(&root, SyntaxKind::LOOP_EXPR);
    first_of_kind(&root, SyntaxKind::WHILE_EXPR);
    first_of_kind(&root, SyntaxKind::FOR_EXPR);
}

#[test]
fn let_with_pattern_and_type() {
    let root = parse_ok("fn f() { let x: I32 = 1 }");
    let let_expr = first_of_kind(&root, SyntaxKind::LET_EXPR);
    first_of_kind(&let_expr, SyntaxKind::NAME_PAT);
    first_of_kind(&let_expr, SyntaxKind::PRIMITIVE_TYPE);
}

#[test]
fn let_without_pattern_is_side_effect_only() {
    let root = parse_ok("fn f() { let = discard 1 }");
    let let_expr = first_of_kind(&root, SyntaxKind::LET_EXPR);
    assert_eq!(count_of_kind(&let_expr, SyntaxKind::NAME_PAT), 0);
}

#[test]
fn address_of_and_deref() {
    let root = parse_ok("fn f() { *&mut x }");
    first_of_kind(&root, SyntaxKind::ADDRESS_OF_EXPR);
    first_of_kind(&root, SyntaxKind::DEREF_EXPR);
}

#[test]
fn sizeof_takes_a_type() {
    let root = parse_ok("fn f(): I32 = sizeof(I32)");
    let sizeof_expr = first_of_kind(&root, SyntaxKind::SIZEOF_EXPR);
    first_of_kind(&sizeof_expr, SyntaxKind::PRIMITIVE_TYPE);
}

#[test]
fn meta_requires_parens() {
    let root = parse_ok("fn f(): I32 = meta(1 + 1)");
    let meta_expr = first_of_kind(&root, SyntaxKind::META_EXPR);
    first_of_kind(&meta_expr, SyntaxKind::OPERATOR_CHAIN_EXPR);
}

#[test]
fn mov_defer_unsafe() {
    let root = parse_ok("fn f() { mov x; defer cleanup(); unsafe { danger() } }");
    first_of_kind(&root, SyntaxKind::MOV_EXPR);
    first_of_kind(&root, SyntaxKind::DEFER_EXPR);
    first_of_kind(&root, SyntaxKind::UNSAFE_EXPR);
}

#[test]
fn break_ret_continue_can_carry_a_value_or_not() {
    let root = parse_ok("fn f() { loop { if true { break 1 } else { continue } } }");
    let break_expr = first_of_kind(&root, SyntaxKind::BREAK_EXPR);
    assert_eq!(count_of_kind(&break_expr, SyntaxKind::LITERAL_EXPR), 1);
    first_of_kind(&root, SyntaxKind::CONTINUE_EXPR);

    let bare_ret = parse_ok("fn f() { ret }");
    let ret_expr = first_of_kind(&bare_ret, SyntaxKind::RET_EXPR);
    assert_eq!(count_of_kind(&ret_expr, SyntaxKind::LITERAL_EXPR), 0);
}

#[test]
fn tuple_and_array_literals() {
    let root = parse_ok("fn f() { (1, 2, 3); [1, 2, 3]; () }");
    assert_eq!(count_of_kind(&root, SyntaxKind::TUPLE_EXPR), 2);
    first_of_kind(&root, SyntaxKind::ARRAY_EXPR);
}

#[test]
fn grouping_parens_do_not_become_a_tuple() {
    let root = parse_ok("fn f(): I32 = (1 + 2) * 3");
    assert_eq!(count_of_kind(&root, SyntaxKind::TUPLE_EXPR), 0);
}

#[test]
fn cast_and_ascription() {
    let root = parse_ok("fn f() { x as I32; y : I32 }");
    first_of_kind(&root, SyntaxKind::TYPE_CAST_EXPR);
    first_of_kind(&root, SyntaxKind::TYPE_ASCRIPTION_EXPR);
}

#[test]
fn local_alias_expr() {
    let root = parse_ok("fn f() { alias Pair = (I32, I32) }");
    first_of_kind(&root, SyntaxKind::LOCAL_ALIAS_EXPR);
}

#[test]
fn hole_expression() {
    let root = parse_ok("fn f(): I32 = ???");
    first_of_kind(&root, SyntaxKind::HOLE_EXPR);
}

// ── Patterns ─────────────────────────────────────────────────────────────

#[test]
fn wildcard_and_literal_patterns() {
    let root = parse_ok("fn f(): I32 = match n { _ -> 0 1 -> 1 }");
    first_of_kind(&root, SyntaxKind::WILDCARD_PAT);
    first_of_kind(&root, SyntaxKind::LITERAL_PAT);
}

#[test]
fn mut_name_pattern() {
    let root = parse_ok("fn f() { let mut x = 1 }");
    let name_pat = first_of_kind(&root, SyntaxKind::NAME_PAT);
    assert!(name_pat.children_with_tokens().any(|it| it.kind() == SyntaxKind::MUT_KW));
}

#[test]
fn unit_tuple_and_struct_ctor_patterns() {
    let root = parse_ok("fn f(): I32 = match shape { Point -> 0 Circle(r) -> 1 Square { side } -> 2 }");
    first_of_kind(&root, SyntaxKind::UNIT_CTOR_PAT);
    first_of_kind(&root, SyntaxKind::TUPLE_CTOR_PAT);
    let struct_ctor = first_of_kind(&root, SyntaxKind::STRUCT_CTOR_PAT);
    first_of_kind(&struct_ctor, SyntaxKind::STRUCT_CTOR_FIELD_PAT);
}

#[test]
fn abbreviated_ctor_pattern() {
    let root = parse_ok("fn f(): I32 = match opt { ::some(x) -> x ::none -> 0 }");
    assert_eq!(count_of_kind(&root, SyntaxKind::ABBREVIATED_CTOR_PAT), 2);
}

#[test]
fn tuple_and_slice_patterns() {
    let root = parse_ok("fn f() { let (a, b) = pair; let [x, y] = xs }");
    first_of_kind(&root, SyntaxKind::TUPLE_PAT);
    first_of_kind(&root, SyntaxKind::SLICE_PAT);
}

#[test]
fn alias_and_guarded_patterns() {
    let root = parse_ok("fn f(): I32 = match n { x as whole if x > 0 -> whole _ -> 0 }");
    let guarded = first_of_kind(&root, SyntaxKind::GUARDED_PAT);
    first_of_kind(&guarded, SyntaxKind::ALIAS_PAT);
}

// ── Types ────────────────────────────────────────────────────────────────

#[test]
fn primitive_and_path_types() {
    let root = parse_ok("fn f(a: I32, b: Point): Bool = true");
    assert_eq!(count_of_kind(&root, SyntaxKind::PRIMITIVE_TYPE), 2);
    first_of_kind(&root, SyntaxKind::PATH_TYPE);
}

#[test]
fn tuple_array_and_slice_types() {
    let root = parse_ok("fn f(a: (I32, I32), b: [I32; 4], c: [I32]) { }");
    first_of_kind(&root, SyntaxKind::TUPLE_TYPE);
    let array_ty = first_of_kind(&root, SyntaxKind::ARRAY_TYPE);
    first_of_kind(&array_ty, SyntaxKind::LITERAL_EXPR);
    first_of_kind(&root, SyntaxKind::SLICE_TYPE);
}

#[test]
fn single_parenthesized_type_is_not_a_tuple() {
    let root = parse_ok("fn f(a: (I32)) { }");
    assert_eq!(count_of_kind(&root, SyntaxKind::TUPLE_TYPE), 0);
}

#[test]
fn function_type_separates_params_from_return() {
    let root = parse_ok("fn f(cb: fn(I32, I32): Bool) { }");
    let fn_ty = first_of_kind(&root, SyntaxKind::FUNCTION_TYPE);
    assert_eq!(count_of_kind(&fn_ty, SyntaxKind::PRIMITIVE_TYPE), 3);
}

#[test]
fn typeof_type() {
    let root = parse_ok("fn f(a: typeof(1 + 1)) { }");
    let typeof_ty = first_of_kind(&root, SyntaxKind::TYPEOF_TYPE);
    first_of_kind(&typeof_ty, SyntaxKind::OPERATOR_CHAIN_EXPR);
}

#[test]
fn reference_and_pointer_types() {
    let root = parse_ok("fn f(a: &mut I32, b: *I32) { }");
    let reference = first_of_kind(&root, SyntaxKind::REFERENCE_TYPE);
    assert!(reference.children_with_tokens().any(|it| it.kind() == SyntaxKind::MUT_KW));
    first_of_kind(&root, SyntaxKind::POINTER_TYPE);
}

#[test]
fn impl_of_concepts_type() {
    let root = parse_ok("fn f(a: impl Show + Clone) { }");
    let impl_ty = first_of_kind(&root, SyntaxKind::IMPL_TYPE);
    assert_eq!(count_of_kind(&impl_ty, SyntaxKind::PATH), 2);
}

#[test]
fn self_type() {
    let root = parse_ok("impl Point { fn clone(&self): Self = self }");
    first_of_kind(&root, SyntaxKind::SELF_TYPE);
}

// ── Recovery ─────────────────────────────────────────────────────────────

#[test]
fn unknown_item_keyword_recovers() {
    let result = parse("actor Foo {} fn f() { 0 }");
    assert!(!result.ok());
    let root = result.syntax();
    first_of_kind(&root, SyntaxKind::FN_DEF);
}
