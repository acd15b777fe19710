//! Type and path parsing.
//!
//! `parse_path` is shared with `expressions` (path expressions, struct
//! initializer names) and `patterns` (constructor names).

use super::{MarkClosed, Parser};
use crate::syntax_kind::SyntaxKind;

const PRIMITIVE_KINDS: &[SyntaxKind] = &[
    SyntaxKind::I8_KW,
    SyntaxKind::I16_KW,
    SyntaxKind::I32_KW,
    SyntaxKind::I64_KW,
    SyntaxKind::U8_KW,
    SyntaxKind::U16_KW,
    SyntaxKind::U32_KW,
    SyntaxKind::U64_KW,
    SyntaxKind::FLOAT_KW,
    SyntaxKind::CHAR_KW,
    SyntaxKind::BOOL_KW,
    SyntaxKind::STRING_KW,
];

/// `path := ['global' '::'] segment ('::' segment)*`
pub(crate) fn parse_path(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    if p.eat(SyntaxKind::GLOBAL_KW) {
        p.expect(SyntaxKind::COLON_COLON);
    }
    parse_path_segment(p);
    while p.at(SyntaxKind::COLON_COLON) {
        p.advance();
        parse_path_segment(p);
    }
    p.close(m, SyntaxKind::PATH)
}

fn parse_path_segment(p: &mut Parser) {
    let m = p.open();
    match p.current() {
        SyntaxKind::LOWER_NAME | SyntaxKind::UPPER_NAME => p.advance(),
        _ => p.error("expected a path segment"),
    }
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_arg_list(p);
    }
    p.close(m, SyntaxKind::PATH_SEGMENT);
}

/// `targs := '[' targ (',' targ)* ']'`, where a `targ` is a type unless the
/// leading token can only start an expression (an integer/boolean literal or
/// a `mut` mutability argument), in which case it is parsed as one.
pub(crate) fn parse_template_arg_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET);
    while !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) {
        parse_template_arg(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::TEMPLATE_ARG_LIST);
}

pub(crate) fn parse_template_arg(p: &mut Parser) {
    match p.current() {
        SyntaxKind::INT_LITERAL
        | SyntaxKind::FLOAT_LITERAL
        | SyntaxKind::CHAR_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::MUT_KW
        | SyntaxKind::IMMUT_KW => super::expressions::parse_expr(p),
        _ => {
            parse_type(p);
        }
    }
}

pub(crate) fn at_type_start(p: &Parser) -> bool {
    p.at_any(PRIMITIVE_KINDS)
        || p.at_any(&[
            SyntaxKind::SELF_TYPE_KW,
            SyntaxKind::WILDCARD,
            SyntaxKind::L_PAREN,
            SyntaxKind::L_BRACKET,
            SyntaxKind::FN_KW,
            SyntaxKind::TYPEOF_KW,
            SyntaxKind::AMP,
            SyntaxKind::STAR,
            SyntaxKind::IMPL_KW,
            SyntaxKind::GLOBAL_KW,
            SyntaxKind::LOWER_NAME,
            SyntaxKind::UPPER_NAME,
        ])
}

/// Parses any Kieli type form and returns the completed node marker.
pub(crate) fn parse_type(p: &mut Parser) -> MarkClosed {
    match p.current() {
        k if PRIMITIVE_KINDS.contains(&k) => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::PRIMITIVE_TYPE)
        }
        SyntaxKind::SELF_TYPE_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::SELF_TYPE)
        }
        SyntaxKind::WILDCARD => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::WILDCARD_TYPE)
        }
        SyntaxKind::L_PAREN => parse_tuple_type(p),
        SyntaxKind::L_BRACKET => parse_array_or_slice_type(p),
        SyntaxKind::FN_KW => parse_function_type(p),
        SyntaxKind::TYPEOF_KW => parse_typeof_type(p),
        SyntaxKind::AMP => parse_reference_type(p),
        SyntaxKind::STAR => parse_pointer_type(p),
        SyntaxKind::IMPL_KW => parse_impl_type(p),
        SyntaxKind::GLOBAL_KW | SyntaxKind::LOWER_NAME | SyntaxKind::UPPER_NAME => {
            let m = p.open();
            parse_path(p);
            p.close(m, SyntaxKind::PATH_TYPE)
        }
        _ => {
            p.error("expected a type");
            let m = p.open();
            p.close(m, SyntaxKind::ERROR_NODE)
        }
    }
}

/// `'(' type (',' type)* ')'`. A single type with no trailing comma is just
/// a parenthesized type, not a one-element tuple.
fn parse_tuple_type(p: &mut Parser) -> MarkClosed {
    p.expect(SyntaxKind::L_PAREN);
    if p.at(SyntaxKind::R_PAREN) {
        p.error("expected a type");
        p.advance();
        let m = p.open();
        return p.close(m, SyntaxKind::ERROR_NODE);
    }
    let first = parse_type(p);
    if p.at(SyntaxKind::COMMA) {
        let m = p.open_before(first);
        while p.eat(SyntaxKind::COMMA) {
            if p.at(SyntaxKind::R_PAREN) {
                break;
            }
            parse_type(p);
        }
        p.expect(SyntaxKind::R_PAREN);
        p.close(m, SyntaxKind::TUPLE_TYPE)
    } else {
        p.expect(SyntaxKind::R_PAREN);
        first
    }
}

/// `'[' type (';' expr)? ']'`: `[T]` is a slice, `[T; expr]` is an array.
fn parse_array_or_slice_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET);
    parse_type(p);
    if p.eat(SyntaxKind::SEMICOLON) {
        super::expressions::parse_expr(p);
        p.expect(SyntaxKind::R_BRACKET);
        p.close(m, SyntaxKind::ARRAY_TYPE)
    } else {
        p.expect(SyntaxKind::R_BRACKET);
        p.close(m, SyntaxKind::SLICE_TYPE)
    }
}

/// `'fn' '(' (type (',' type)*)? ')' ':' type`
fn parse_function_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::FN_KW);
    p.expect(SyntaxKind::L_PAREN);
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        parse_type(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.expect(SyntaxKind::COLON);
    parse_type(p);
    p.close(m, SyntaxKind::FUNCTION_TYPE)
}

/// `'typeof' '(' expr ')'`
fn parse_typeof_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::TYPEOF_KW);
    p.expect(SyntaxKind::L_PAREN);
    super::expressions::parse_expr(p);
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::TYPEOF_TYPE)
}

/// `'&' ['mut'] type`
fn parse_reference_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::AMP);
    p.eat(SyntaxKind::MUT_KW);
    parse_type(p);
    p.close(m, SyntaxKind::REFERENCE_TYPE)
}

/// `'*' ['mut'] type`
fn parse_pointer_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::STAR);
    p.eat(SyntaxKind::MUT_KW);
    parse_type(p);
    p.close(m, SyntaxKind::POINTER_TYPE)
}

/// `'impl' path ('+' path)*`: an anonymous type satisfying one or more
/// concepts, written in type position (distinct from an `impl` block item).
fn parse_impl_type(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::IMPL_KW);
    parse_path(p);
    while p.eat(SyntaxKind::PLUS) {
        parse_path(p);
    }
    p.close(m, SyntaxKind::IMPL_TYPE)
}
