//! End-to-end tests driving the full pipeline through the public facade,
//! without any external process or transport.

#[test]
fn a_well_typed_program_compiles_with_no_diagnostics() {
    let source = "\
struct Point { x: I32, y: I32 }
fn distance_x(a: Point, b: Point): I32 { a.x - b.x }
fn main(): I32 {
    let a = Point { x: 1, y: 2 };
    let b = Point { x: 4, y: 6 };
    distance_x(a, b)
}";
    let (db, doc, diagnostics) = kieli::compile_source("main.ki", source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    assert!(db.compiled(doc).is_some());
}

#[test]
fn an_inexhaustive_match_is_reported_with_a_stable_code() {
    let source = "\
enum Option = None | Some(I32)
fn unwrap(opt: Option): I32 {
    match opt {
        Option::Some(value) -> value
    }
}";
    let (_db, _doc, diagnostics) = kieli::compile_source("main.ki", source);
    assert!(diagnostics.iter().any(|d| d.code == kieli::diagnostics::codes::semantic::INEXHAUSTIVE_PATTERN));
}

#[test]
fn hover_and_definition_queries_round_trip_through_the_database() {
    let (db, doc, diagnostics) = kieli::compile_source("main.ki", "fn f(x: I32): I32 = x");
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");

    let use_pos = kieli::common::span::Position { line: 0, column: 20 };
    let definition = kieli::ide::definition_of(&db, doc, use_pos).expect("definition of `x`");
    assert_eq!(definition.start, kieli::common::span::Position { line: 0, column: 5 });
}
