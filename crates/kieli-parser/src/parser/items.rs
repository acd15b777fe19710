//! Item (definition) parsing: functions, structs, enums, aliases, concepts,
//! impl blocks, submodules, and imports.

use super::{types, Parser};
use crate::syntax_kind::SyntaxKind;

fn expect_lower_name(p: &mut Parser) {
    if p.at(SyntaxKind::LOWER_NAME) {
        p.advance();
    } else {
        p.error("expected a lowercase name");
    }
}

fn expect_upper_name(p: &mut Parser) {
    if p.at(SyntaxKind::UPPER_NAME) {
        p.advance();
    } else {
        p.error("expected an uppercase name");
    }
}

/// `'import' path`
pub(crate) fn parse_import(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IMPORT_KW);
    types::parse_path(p);
    p.close(m, SyntaxKind::IMPORT_ITEM);
}

/// `'fn' lower_name [tparams] '(' [self_param [',' params]] ')' [':' type]
/// (block | '=' expr)`
pub(crate) fn parse_fn_def(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::FN_KW);
    expect_lower_name(p);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    parse_param_list(p);
    if p.eat(SyntaxKind::COLON) {
        types::parse_type(p);
    }
    if p.eat(SyntaxKind::EQ) {
        super::expressions::parse_expr(p);
    } else {
        super::expressions::parse_block(p);
    }
    p.close(m, SyntaxKind::FN_DEF);
}

fn at_self_param(p: &Parser) -> bool {
    p.at(SyntaxKind::SELF_VALUE_KW) || p.at(SyntaxKind::AMP) || (p.at(SyntaxKind::MUT_KW) && p.nth(1) == SyntaxKind::SELF_VALUE_KW)
}

/// `'(' [self_param [',' params]] ')'`
fn parse_param_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);
    if at_self_param(p) {
        parse_self_param(p);
        if p.eat(SyntaxKind::COMMA) {
            parse_params(p);
        }
    } else {
        parse_params(p);
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PARAM_LIST);
}

/// `['&'] ['mut'] 'self'`
fn parse_self_param(p: &mut Parser) {
    let m = p.open();
    if p.eat(SyntaxKind::AMP) {
        p.eat(SyntaxKind::MUT_KW);
    } else {
        p.eat(SyntaxKind::MUT_KW);
    }
    p.expect(SyntaxKind::SELF_VALUE_KW);
    p.close(m, SyntaxKind::SELF_PARAM);
}

fn parse_params(p: &mut Parser) {
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        parse_param(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
}

/// `lower_name ':' type`
fn parse_param(p: &mut Parser) {
    let m = p.open();
    expect_lower_name(p);
    p.expect(SyntaxKind::COLON);
    types::parse_type(p);
    p.close(m, SyntaxKind::PARAM);
}

/// `'[' tparam (',' tparam)* ']'`
fn parse_template_param_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACKET);
    while !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) {
        parse_template_param(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::TEMPLATE_PARAM_LIST);
}

/// A type parameter `Upper_name [':' concept ('+' concept)*]`, a value
/// parameter `lower_name [':' type]`, or a mutability parameter
/// `'mut' lower_name`; any form may carry a `'=' targ` default.
fn parse_template_param(p: &mut Parser) {
    let m = p.open();
    let kind = match p.current() {
        SyntaxKind::UPPER_NAME => {
            p.advance();
            if p.eat(SyntaxKind::COLON) {
                types::parse_path(p);
                while p.eat(SyntaxKind::PLUS) {
                    types::parse_path(p);
                }
            }
            SyntaxKind::TEMPLATE_TYPE_PARAM
        }
        SyntaxKind::MUT_KW => {
            p.advance();
            expect_lower_name(p);
            SyntaxKind::TEMPLATE_MUT_PARAM
        }
        SyntaxKind::LOWER_NAME => {
            p.advance();
            if p.eat(SyntaxKind::COLON) {
                types::parse_type(p);
            }
            SyntaxKind::TEMPLATE_VALUE_PARAM
        }
        _ => {
            p.error("expected a template parameter");
            SyntaxKind::ERROR_NODE
        }
    };
    if kind != SyntaxKind::ERROR_NODE && p.eat(SyntaxKind::EQ) {
        types::parse_template_arg(p);
    }
    p.close(m, kind);
}

/// `'struct' upper_name [tparams] ('(' types ')' | '{' fields '}')?`
pub(crate) fn parse_struct_def(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::STRUCT_KW);
    expect_upper_name(p);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        parse_tuple_struct_fields(p);
    } else if p.at(SyntaxKind::L_BRACE) {
        parse_struct_fields(p);
    }
    p.close(m, SyntaxKind::STRUCT_DEF);
}

/// `'(' type (',' type)* ')'`
fn parse_tuple_struct_fields(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        types::parse_type(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::TUPLE_STRUCT_FIELD_LIST);
}

/// `'{' (lower_name ':' type) (',' lower_name ':' type)* ','? '}'`
fn parse_struct_fields(p: &mut Parser) {
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let field = p.open();
        expect_lower_name(p);
        p.expect(SyntaxKind::COLON);
        types::parse_type(p);
        p.close(field, SyntaxKind::STRUCT_FIELD_DEF);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
}

/// `'enum' upper_name [tparams] '=' ctor ('|' ctor)*`
pub(crate) fn parse_enum_def(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::ENUM_KW);
    expect_upper_name(p);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    p.expect(SyntaxKind::EQ);
    parse_variant(p);
    while p.eat(SyntaxKind::PIPE) {
        parse_variant(p);
    }
    p.close(m, SyntaxKind::ENUM_DEF);
}

/// `upper_name ('(' type (',' type)* ')' | '{' fields '}')?`
fn parse_variant(p: &mut Parser) {
    let m = p.open();
    expect_upper_name(p);
    if p.at(SyntaxKind::L_PAREN) {
        parse_tuple_struct_fields(p);
    } else if p.at(SyntaxKind::L_BRACE) {
        parse_variant_struct_fields(p);
    }
    p.close(m, SyntaxKind::VARIANT_DEF);
}

fn parse_variant_struct_fields(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let field = p.open();
        expect_lower_name(p);
        p.expect(SyntaxKind::COLON);
        types::parse_type(p);
        p.close(field, SyntaxKind::VARIANT_STRUCT_FIELD);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::VARIANT_FIELD_LIST);
}

/// `'alias' upper_name [tparams] '=' type`
pub(crate) fn parse_alias_def(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::ALIAS_KW);
    expect_upper_name(p);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    p.expect(SyntaxKind::EQ);
    types::parse_type(p);
    p.close(m, SyntaxKind::ALIAS_DEF);
}

/// `'concept' upper_name [tparams] '{' sig* '}'`
pub(crate) fn parse_concept_def(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::CONCEPT_KW);
    expect_upper_name(p);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    p.expect(SyntaxKind::L_BRACE);
    while p.at(SyntaxKind::FN_KW) {
        parse_concept_method_sig(p);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::CONCEPT_DEF);
}

/// `'fn' lower_name [tparams] '(' [self_param [',' params]] ')' [':' type]`,
/// a method signature with no body.
fn parse_concept_method_sig(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::FN_KW);
    expect_lower_name(p);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    parse_param_list(p);
    if p.eat(SyntaxKind::COLON) {
        types::parse_type(p);
    }
    p.close(m, SyntaxKind::CONCEPT_METHOD_SIG);
}

/// `'impl' [tparams] type '{' definition* '}'`
pub(crate) fn parse_impl_def(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IMPL_KW);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    types::parse_type(p);
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        super::parse_item(p);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::IMPL_DEF);
}

/// `'module' lower_name [tparams] '{' definition* '}'`
pub(crate) fn parse_submodule_def(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::MODULE_KW);
    expect_lower_name(p);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_template_param_list(p);
    }
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        super::parse_item(p);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::SUBMODULE_DEF);
}
