//! Pattern parsing.
//!
//! Patterns are used in `match` arms, `let`/`for` bindings, and function
//! parameters. A constructor pattern starts with an upper-case or qualified
//! name and takes an optional tuple or struct payload; a bare lower-case
//! name is always a binding, never a nullary constructor.

use super::{types, MarkClosed, Parser};
use crate::syntax_kind::SyntaxKind;

const LITERAL_KINDS: &[SyntaxKind] = &[
    SyntaxKind::INT_LITERAL,
    SyntaxKind::FLOAT_LITERAL,
    SyntaxKind::CHAR_LITERAL,
    SyntaxKind::STRING_LITERAL,
    SyntaxKind::TRUE_KW,
    SyntaxKind::FALSE_KW,
];

pub(crate) fn at_pattern_start(p: &Parser) -> bool {
    p.at_any(LITERAL_KINDS)
        || p.at_any(&[
            SyntaxKind::WILDCARD,
            SyntaxKind::MUT_KW,
            SyntaxKind::LOWER_NAME,
            SyntaxKind::UPPER_NAME,
            SyntaxKind::GLOBAL_KW,
            SyntaxKind::COLON_COLON,
            SyntaxKind::L_PAREN,
            SyntaxKind::L_BRACKET,
        ])
}

pub(crate) fn parse_pattern(p: &mut Parser) -> MarkClosed {
    let mut left = parse_pattern_primary(p);
    if p.at(SyntaxKind::AS_KW) {
        let m = p.open_before(left);
        p.advance();
        if p.at(SyntaxKind::LOWER_NAME) {
            p.advance();
        } else {
            p.error("expected a binding name");
        }
        left = p.close(m, SyntaxKind::ALIAS_PAT);
    }
    if p.at(SyntaxKind::IF_KW) {
        let m = p.open_before(left);
        p.advance();
        super::expressions::parse_expr(p);
        left = p.close(m, SyntaxKind::GUARDED_PAT);
    }
    left
}

fn parse_pattern_primary(p: &mut Parser) -> MarkClosed {
    match p.current() {
        k if LITERAL_KINDS.contains(&k) => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::LITERAL_PAT)
        }
        SyntaxKind::WILDCARD => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::WILDCARD_PAT)
        }
        SyntaxKind::MUT_KW | SyntaxKind::LOWER_NAME => {
            let m = p.open();
            p.eat(SyntaxKind::MUT_KW);
            if p.at(SyntaxKind::LOWER_NAME) {
                p.advance();
            } else {
                p.error("expected a binding name");
            }
            p.close(m, SyntaxKind::NAME_PAT)
        }
        SyntaxKind::COLON_COLON => {
            let m = p.open();
            p.advance();
            if p.at(SyntaxKind::LOWER_NAME) {
                p.advance();
            } else {
                p.error("expected an abbreviated constructor name");
            }
            if p.at(SyntaxKind::L_PAREN) {
                parse_single_parenthesized_payload(p);
            }
            p.close(m, SyntaxKind::ABBREVIATED_CTOR_PAT)
        }
        SyntaxKind::UPPER_NAME | SyntaxKind::GLOBAL_KW => {
            let m = p.open();
            types::parse_path(p);
            if p.at(SyntaxKind::L_PAREN) {
                parse_tuple_ctor_payload(p);
                p.close(m, SyntaxKind::TUPLE_CTOR_PAT)
            } else if p.at(SyntaxKind::L_BRACE) {
                parse_struct_ctor_payload(p);
                p.close(m, SyntaxKind::STRUCT_CTOR_PAT)
            } else {
                p.close(m, SyntaxKind::UNIT_CTOR_PAT)
            }
        }
        SyntaxKind::L_PAREN => parse_tuple_pattern(p),
        SyntaxKind::L_BRACKET => parse_slice_pattern(p),
        _ => {
            p.error(&format!("expected a pattern, found {:?}", p.current()));
            let m = p.open();
            p.advance_with_error("unexpected token");
            p.close(m, SyntaxKind::ERROR_NODE)
        }
    }
}

/// `'(' pattern ')'`, the single payload of an abbreviated constructor.
fn parse_single_parenthesized_payload(p: &mut Parser) {
    p.expect(SyntaxKind::L_PAREN);
    parse_pattern(p);
    p.expect(SyntaxKind::R_PAREN);
}

/// `'(' (pattern (',' pattern)*)? ')'`
fn parse_tuple_ctor_payload(p: &mut Parser) {
    p.expect(SyntaxKind::L_PAREN);
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        parse_pattern(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
}

/// `'{' (name [':' pattern]) (',' name [':' pattern])* ','? '}'`
fn parse_struct_ctor_payload(p: &mut Parser) {
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let field = p.open();
        if p.at(SyntaxKind::LOWER_NAME) {
            p.advance();
        } else {
            p.error("expected a field name");
        }
        if p.eat(SyntaxKind::COLON) {
            parse_pattern(p);
        }
        p.close(field, SyntaxKind::STRUCT_CTOR_FIELD_PAT);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
}

/// `'(' (pattern (',' pattern)*)? ')'`: a single pattern with no trailing
/// comma is just a parenthesized pattern, not a one-element tuple.
fn parse_tuple_pattern(p: &mut Parser) -> MarkClosed {
    p.expect(SyntaxKind::L_PAREN);
    if p.at(SyntaxKind::R_PAREN) {
        p.advance();
        let m = p.open();
        return p.close(m, SyntaxKind::TUPLE_PAT);
    }
    let first = parse_pattern(p);
    if p.at(SyntaxKind::COMMA) {
        let m = p.open_before(first);
        while p.eat(SyntaxKind::COMMA) {
            if p.at(SyntaxKind::R_PAREN) {
                break;
            }
            parse_pattern(p);
        }
        p.expect(SyntaxKind::R_PAREN);
        p.close(m, SyntaxKind::TUPLE_PAT)
    } else {
        p.expect(SyntaxKind::R_PAREN);
        first
    }
}

/// `'[' (pattern (',' pattern)*)? ']'`
fn parse_slice_pattern(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET);
    while !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) {
        parse_pattern(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::SLICE_PAT)
}
