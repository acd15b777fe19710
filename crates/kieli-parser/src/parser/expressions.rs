//! Expression parsing.
//!
//! Binary operators are not precedence-climbed: Kieli parses every operator
//! at the same level, producing a flat left-associative `OPERATOR_CHAIN_EXPR`
//! whose actual associativity and precedence are resolved by the desugarer,
//! once fixities are known. Only postfix forms (call, field access, method
//! call, indexing) and `as`/`:` have real binding power here.

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

pub(crate) fn parse_expr(p: &mut Parser) -> MarkClosed {
    parse_operator_chain(p)
}

/// Tokens usable as a chain operator: any custom operator name, plus the two
/// reserved spellings `+` and `*` which double as built-in operator names.
const OPERATOR_TOKEN_KINDS: &[SyntaxKind] = &[SyntaxKind::OPERATOR_NAME, SyntaxKind::STAR, SyntaxKind::PLUS];

/// `expr ('as' type | ':' type)*`, used as the operand of the operator
/// chain so a cast or ascription binds tighter than any operator.
fn parse_operator_chain(p: &mut Parser) -> MarkClosed {
    let first = parse_cast_or_ascription(p);
    if !p.at_any(OPERATOR_TOKEN_KINDS) {
        return first;
    }
    let m = p.open_before(first);
    while p.at_any(OPERATOR_TOKEN_KINDS) {
        p.advance();
        parse_cast_or_ascription(p);
    }
    p.close(m, SyntaxKind::OPERATOR_CHAIN_EXPR)
}

fn parse_cast_or_ascription(p: &mut Parser) -> MarkClosed {
    let mut left = parse_postfix(p);
    loop {
        if p.at(SyntaxKind::AS_KW) {
            let m = p.open_before(left);
            p.advance();
            types::parse_type(p);
            left = p.close(m, SyntaxKind::TYPE_CAST_EXPR);
        } else if p.at(SyntaxKind::COLON) {
            let m = p.open_before(left);
            p.advance();
            types::parse_type(p);
            left = p.close(m, SyntaxKind::TYPE_ASCRIPTION_EXPR);
        } else {
            break;
        }
    }
    left
}

fn parse_postfix(p: &mut Parser) -> MarkClosed {
    let mut left = parse_prefix(p);
    loop {
        match p.current() {
            // `.N` tuple index, `.[e]` array index, `.name` field access,
            // `.name[t,...](a,...)` generic method call.
            SyntaxKind::DOT => {
                p.advance();
                if p.at(SyntaxKind::INT_LITERAL) {
                    let m = p.open_before(left);
                    p.advance();
                    left = p.close(m, SyntaxKind::TUPLE_INDEX_EXPR);
                } else if p.at(SyntaxKind::L_BRACKET) {
                    let m = p.open_before(left);
                    p.advance();
                    parse_expr(p);
                    p.expect(SyntaxKind::R_BRACKET);
                    left = p.close(m, SyntaxKind::ARRAY_INDEX_EXPR);
                } else {
                    let m = p.open_before(left);
                    parse_name_ref(p);
                    if p.at(SyntaxKind::L_BRACKET) {
                        types::parse_template_arg_list(p);
                    }
                    if p.at(SyntaxKind::L_PAREN) {
                        parse_arg_list(p);
                        left = p.close(m, SyntaxKind::METHOD_CALL_EXPR);
                    } else {
                        left = p.close(m, SyntaxKind::FIELD_ACCESS_EXPR);
                    }
                }
            }
            SyntaxKind::L_PAREN => {
                let m = p.open_before(left);
                parse_arg_list(p);
                left = p.close(m, SyntaxKind::CALL_EXPR);
            }
            SyntaxKind::L_BRACE if p.struct_init_allowed() => {
                let m = p.open_before(left);
                parse_struct_init_fields(p);
                left = p.close(m, SyntaxKind::STRUCT_INIT_EXPR);
            }
            _ => break,
        }
    }
    left
}

fn parse_name_ref(p: &mut Parser) {
    let m = p.open();
    if p.at_any(&[SyntaxKind::LOWER_NAME, SyntaxKind::UPPER_NAME]) {
        p.advance();
    } else {
        p.error("expected a name");
    }
    p.close(m, SyntaxKind::NAME_REF);
}

/// `'(' (expr (',' expr)*)? ')'`
fn parse_arg_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        parse_expr(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARG_LIST);
}

/// `'{' (name ':' expr) (',' name ':' expr)* ','? '}'`
fn parse_struct_init_fields(p: &mut Parser) {
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let field = p.open();
        if p.at(SyntaxKind::LOWER_NAME) {
            p.advance();
        } else {
            p.error("expected a field name");
        }
        p.expect(SyntaxKind::COLON);
        parse_expr(p);
        p.close(field, SyntaxKind::STRUCT_INIT_FIELD);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
}

fn parse_prefix(p: &mut Parser) -> MarkClosed {
    match p.current() {
        k if LITERAL_KINDS.contains(&k) => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::LITERAL_EXPR)
        }
        SyntaxKind::HOLE => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::HOLE_EXPR)
        }
        SyntaxKind::GLOBAL_KW | SyntaxKind::LOWER_NAME | SyntaxKind::UPPER_NAME | SyntaxKind::SELF_VALUE_KW => {
            let m = p.open();
            types::parse_path(p);
            p.close(m, SyntaxKind::PATH_EXPR)
        }
        SyntaxKind::L_PAREN => parse_paren_or_tuple(p),
        SyntaxKind::L_BRACKET => parse_array_literal(p),
        SyntaxKind::L_BRACE => parse_block(p),
        SyntaxKind::IF_KW => parse_if(p),
        SyntaxKind::MATCH_KW => parse_match(p),
        SyntaxKind::LOOP_KW => parse_loop(p),
        SyntaxKind::WHILE_KW => parse_while(p),
        SyntaxKind::FOR_KW => parse_for(p),
        SyntaxKind::LET_KW => parse_let(p),
        SyntaxKind::ALIAS_KW => parse_local_alias(p),
        SyntaxKind::SIZEOF_KW => {
            let m = p.open();
            p.advance();
            p.expect(SyntaxKind::L_PAREN);
            types::parse_type(p);
            p.expect(SyntaxKind::R_PAREN);
            p.close(m, SyntaxKind::SIZEOF_EXPR)
        }
        SyntaxKind::AMP => {
            let m = p.open();
            p.advance();
            p.eat(SyntaxKind::MUT_KW);
            parse_prefix(p);
            p.close(m, SyntaxKind::ADDRESS_OF_EXPR)
        }
        SyntaxKind::STAR => {
            let m = p.open();
            p.advance();
            parse_prefix(p);
            p.close(m, SyntaxKind::DEREF_EXPR)
        }
        SyntaxKind::MOV_KW => {
            let m = p.open();
            p.advance();
            parse_prefix(p);
            p.close(m, SyntaxKind::MOV_EXPR)
        }
        SyntaxKind::DEFER_KW => {
            let m = p.open();
            p.advance();
            parse_expr(p);
            p.close(m, SyntaxKind::DEFER_EXPR)
        }
        SyntaxKind::UNSAFE_KW => {
            let m = p.open();
            p.advance();
            parse_block_body(p);
            p.close(m, SyntaxKind::UNSAFE_EXPR)
        }
        SyntaxKind::META_KW => {
            let m = p.open();
            p.advance();
            p.expect(SyntaxKind::L_PAREN);
            parse_expr(p);
            p.expect(SyntaxKind::R_PAREN);
            p.close(m, SyntaxKind::META_EXPR)
        }
        SyntaxKind::BREAK_KW => {
            let m = p.open();
            p.advance();
            if expr_follows(p) {
                parse_expr(p);
            }
            p.close(m, SyntaxKind::BREAK_EXPR)
        }
        SyntaxKind::CONTINUE_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::CONTINUE_EXPR)
        }
        SyntaxKind::RET_KW => {
            let m = p.open();
            p.advance();
            if expr_follows(p) {
                parse_expr(p);
            }
            p.close(m, SyntaxKind::RET_EXPR)
        }
        SyntaxKind::DISCARD_KW => {
            let m = p.open();
            p.advance();
            parse_expr(p);
            p.close(m, SyntaxKind::DISCARD_EXPR)
        }
        _ => {
            p.error(&format!("expected an expression, found {:?}", p.current()));
            let m = p.open();
            p.advance_with_error("unexpected token");
            p.close(m, SyntaxKind::ERROR_NODE)
        }
    }
}

/// Tokens that cannot follow `break`/`ret` without an operand, used to
/// distinguish `break` from `break e`.
fn expr_follows(p: &Parser) -> bool {
    !p.at_any(&[
        SyntaxKind::R_BRACE,
        SyntaxKind::R_PAREN,
        SyntaxKind::R_BRACKET,
        SyntaxKind::SEMICOLON,
        SyntaxKind::COMMA,
        SyntaxKind::EOF,
    ])
}

/// `'(' (expr (',' expr)*)? ')'`: zero/one element with no comma is just a
/// parenthesized expression; a trailing comma on a single element or two or
/// more elements makes a tuple.
fn parse_paren_or_tuple(p: &mut Parser) -> MarkClosed {
    p.expect(SyntaxKind::L_PAREN);
    if p.at(SyntaxKind::R_PAREN) {
        p.advance();
        let m = p.open();
        return p.close(m, SyntaxKind::TUPLE_EXPR);
    }
    let first = parse_expr(p);
    if p.at(SyntaxKind::COMMA) {
        let m = p.open_before(first);
        while p.eat(SyntaxKind::COMMA) {
            if p.at(SyntaxKind::R_PAREN) {
                break;
            }
            parse_expr(p);
        }
        p.expect(SyntaxKind::R_PAREN);
        p.close(m, SyntaxKind::TUPLE_EXPR)
    } else {
        p.expect(SyntaxKind::R_PAREN);
        first
    }
}

/// `'[' (expr (',' expr)*)? ']'`
fn parse_array_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET);
    while !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) {
        parse_expr(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::ARRAY_EXPR)
}

/// `'{' (expr ';')* [expr] '}'`
pub(crate) fn parse_block(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    parse_block_body(p);
    p.close(m, SyntaxKind::BLOCK_EXPR)
}

fn parse_block_body(p: &mut Parser) {
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        parse_expr(p);
        if !p.eat(SyntaxKind::SEMICOLON) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
}

/// `'if' expr block ('elif' expr block)* ['else' block]`
fn parse_if(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::IF_KW);
    p.without_struct_init(|p| parse_expr(p));
    parse_block(p);
    while p.at(SyntaxKind::ELIF_KW) {
        let clause = p.open();
        p.advance();
        p.without_struct_init(|p| parse_expr(p));
        parse_block(p);
        p.close(clause, SyntaxKind::ELIF_CLAUSE);
    }
    if p.at(SyntaxKind::ELSE_KW) {
        let clause = p.open();
        p.advance();
        parse_block(p);
        p.close(clause, SyntaxKind::ELSE_CLAUSE);
    }
    p.close(m, SyntaxKind::IF_EXPR)
}

/// `'match' expr '{' (pattern '->' expr)* '}'`, arms have no separator.
fn parse_match(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::MATCH_KW);
    p.without_struct_init(|p| parse_expr(p));
    p.expect(SyntaxKind::L_BRACE);
    while super::patterns::at_pattern_start(p) {
        let arm = p.open();
        super::patterns::parse_pattern(p);
        p.expect(SyntaxKind::RIGHT_ARROW);
        parse_expr(p);
        p.close(arm, SyntaxKind::MATCH_ARM);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::MATCH_EXPR)
}

/// `'loop' block`
fn parse_loop(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::LOOP_KW);
    parse_block(p);
    p.close(m, SyntaxKind::LOOP_EXPR)
}

/// `'while' expr block`
fn parse_while(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::WHILE_KW);
    p.without_struct_init(|p| parse_expr(p));
    parse_block(p);
    p.close(m, SyntaxKind::WHILE_EXPR)
}

/// `'for' pattern 'in' expr block`
fn parse_for(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::FOR_KW);
    super::patterns::parse_pattern(p);
    p.expect(SyntaxKind::IN_KW);
    p.without_struct_init(|p| parse_expr(p));
    parse_block(p);
    p.close(m, SyntaxKind::FOR_EXPR)
}

/// `'let' [pattern [':' type]] '=' expr`: the binding pattern is optional,
/// so a bare `let = e` evaluates `e` for its side effects only.
fn parse_let(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::LET_KW);
    if super::patterns::at_pattern_start(p) {
        super::patterns::parse_pattern(p);
        if p.eat(SyntaxKind::COLON) {
            types::parse_type(p);
        }
    }
    p.expect(SyntaxKind::EQ);
    parse_expr(p);
    p.close(m, SyntaxKind::LET_EXPR)
}

/// `'alias' upper_name '=' type`, a local type alias statement.
fn parse_local_alias(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.expect(SyntaxKind::ALIAS_KW);
    if p.at(SyntaxKind::UPPER_NAME) {
        p.advance();
    } else {
        p.error("expected an uppercase type alias name");
    }
    p.expect(SyntaxKind::EQ);
    types::parse_type(p);
    p.close(m, SyntaxKind::LOCAL_ALIAS_EXPR)
}
