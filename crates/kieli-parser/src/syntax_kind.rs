//! SyntaxKind enum for the Kieli CST.
//!
//! A superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus composite
//! node kinds produced by the parser. The first two values are sentinels
//! used by the event-based parser.

use kieli_common::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    TOMBSTONE = 0,
    ERROR_NODE = 1,

    // ── Keywords ───────────────────────────────────────────────────────
    LET_KW,
    MUT_KW,
    IMMUT_KW,
    IF_KW,
    ELSE_KW,
    ELIF_KW,
    WHILE_KW,
    LOOP_KW,
    FOR_KW,
    IN_KW,
    MATCH_KW,
    RET_KW,
    FN_KW,
    STRUCT_KW,
    ENUM_KW,
    ALIAS_KW,
    IMPL_KW,
    CONCEPT_KW,
    MODULE_KW,
    IMPORT_KW,
    SIZEOF_KW,
    TYPEOF_KW,
    UNSAFE_KW,
    MOV_KW,
    META_KW,
    DEFER_KW,
    WHERE_KW,
    GLOBAL_KW,
    DYN_KW,
    SELF_TYPE_KW,
    SELF_VALUE_KW,
    DISCARD_KW,
    BREAK_KW,
    CONTINUE_KW,
    AS_KW,

    I8_KW,
    I16_KW,
    I32_KW,
    I64_KW,
    U8_KW,
    U16_KW,
    U32_KW,
    U64_KW,
    FLOAT_KW,
    CHAR_KW,
    BOOL_KW,
    STRING_KW,

    TRUE_KW,
    FALSE_KW,

    // ── Reserved operator spellings ────────────────────────────────────
    DOT,
    COLON,
    COLON_COLON,
    PIPE,
    EQ,
    AMP,
    STAR,
    PLUS,
    QUESTION,
    HOLE,
    BACKSLASH,
    LEFT_ARROW,
    RIGHT_ARROW,

    // ── Delimiters ─────────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,
    COMMA,
    SEMICOLON,

    // ── Literals ───────────────────────────────────────────────────────
    INT_LITERAL,
    FLOAT_LITERAL,
    CHAR_LITERAL,
    STRING_LITERAL,

    // ── Names ──────────────────────────────────────────────────────────
    LOWER_NAME,
    UPPER_NAME,
    OPERATOR_NAME,
    WILDCARD,

    // ── Trivia ─────────────────────────────────────────────────────────
    WHITESPACE,
    COMMENT,
    NEWLINE,

    // ── Special ────────────────────────────────────────────────────────
    ERROR,
    EOF,

    // ── Root / items ───────────────────────────────────────────────────
    SOURCE_FILE,
    IMPORT_ITEM,
    FN_DEF,
    STRUCT_DEF,
    ENUM_DEF,
    ALIAS_DEF,
    CONCEPT_DEF,
    IMPL_DEF,
    SUBMODULE_DEF,

    PARAM_LIST,
    PARAM,
    SELF_PARAM,
    ARG_LIST,

    TEMPLATE_PARAM_LIST,
    TEMPLATE_TYPE_PARAM,
    TEMPLATE_VALUE_PARAM,
    TEMPLATE_MUT_PARAM,
    TEMPLATE_ARG_LIST,

    STRUCT_FIELD_DEF,
    TUPLE_STRUCT_FIELD_LIST,

    VARIANT_DEF,
    VARIANT_FIELD_LIST,
    VARIANT_STRUCT_FIELD,

    CONCEPT_METHOD_SIG,

    // ── Expressions ────────────────────────────────────────────────────
    LITERAL_EXPR,
    PATH_EXPR,
    BLOCK_EXPR,
    CALL_EXPR,
    METHOD_CALL_EXPR,
    OPERATOR_CHAIN_EXPR,
    IF_EXPR,
    ELIF_CLAUSE,
    ELSE_CLAUSE,
    MATCH_EXPR,
    MATCH_ARM,
    LOOP_EXPR,
    WHILE_EXPR,
    FOR_EXPR,
    LET_EXPR,
    LOCAL_ALIAS_EXPR,
    ADDRESS_OF_EXPR,
    DEREF_EXPR,
    SIZEOF_EXPR,
    MOV_EXPR,
    DEFER_EXPR,
    UNSAFE_EXPR,
    META_EXPR,
    BREAK_EXPR,
    CONTINUE_EXPR,
    RET_EXPR,
    DISCARD_EXPR,
    FIELD_ACCESS_EXPR,
    TUPLE_INDEX_EXPR,
    ARRAY_INDEX_EXPR,
    TUPLE_EXPR,
    ARRAY_EXPR,
    STRUCT_INIT_EXPR,
    STRUCT_INIT_FIELD,
    TYPE_CAST_EXPR,
    TYPE_ASCRIPTION_EXPR,
    HOLE_EXPR,

    // ── Patterns ───────────────────────────────────────────────────────
    WILDCARD_PAT,
    LITERAL_PAT,
    NAME_PAT,
    UNIT_CTOR_PAT,
    TUPLE_CTOR_PAT,
    STRUCT_CTOR_PAT,
    STRUCT_CTOR_FIELD_PAT,
    ABBREVIATED_CTOR_PAT,
    TUPLE_PAT,
    SLICE_PAT,
    ALIAS_PAT,
    GUARDED_PAT,

    // ── Types ──────────────────────────────────────────────────────────
    PRIMITIVE_TYPE,
    PATH_TYPE,
    TUPLE_TYPE,
    ARRAY_TYPE,
    SLICE_TYPE,
    FUNCTION_TYPE,
    TYPEOF_TYPE,
    REFERENCE_TYPE,
    POINTER_TYPE,
    IMPL_TYPE,
    TEMPLATE_APPLICATION_TYPE,
    SELF_TYPE,
    WILDCARD_TYPE,

    // ── Paths ──────────────────────────────────────────────────────────
    PATH,
    PATH_SEGMENT,
    NAME,
    NAME_REF,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::COMMENT)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        use SyntaxKind as S;
        match kind {
            TokenKind::Let => S::LET_KW,
            TokenKind::Mut => S::MUT_KW,
            TokenKind::Immut => S::IMMUT_KW,
            TokenKind::If => S::IF_KW,
            TokenKind::Else => S::ELSE_KW,
            TokenKind::Elif => S::ELIF_KW,
            TokenKind::While => S::WHILE_KW,
            TokenKind::Loop => S::LOOP_KW,
            TokenKind::For => S::FOR_KW,
            TokenKind::In => S::IN_KW,
            TokenKind::Match => S::MATCH_KW,
            TokenKind::Ret => S::RET_KW,
            TokenKind::Fn => S::FN_KW,
            TokenKind::Struct => S::STRUCT_KW,
            TokenKind::Enum => S::ENUM_KW,
            TokenKind::Alias => S::ALIAS_KW,
            TokenKind::Impl => S::IMPL_KW,
            TokenKind::Concept => S::CONCEPT_KW,
            TokenKind::Module => S::MODULE_KW,
            TokenKind::Import => S::IMPORT_KW,
            TokenKind::Sizeof => S::SIZEOF_KW,
            TokenKind::Typeof => S::TYPEOF_KW,
            TokenKind::Unsafe => S::UNSAFE_KW,
            TokenKind::Mov => S::MOV_KW,
            TokenKind::Meta => S::META_KW,
            TokenKind::Defer => S::DEFER_KW,
            TokenKind::Where => S::WHERE_KW,
            TokenKind::Global => S::GLOBAL_KW,
            TokenKind::Dyn => S::DYN_KW,
            TokenKind::SelfType => S::SELF_TYPE_KW,
            TokenKind::SelfValue => S::SELF_VALUE_KW,
            TokenKind::Discard => S::DISCARD_KW,
            TokenKind::Break => S::BREAK_KW,
            TokenKind::Continue => S::CONTINUE_KW,
            TokenKind::As => S::AS_KW,
            TokenKind::I8 => S::I8_KW,
            TokenKind::I16 => S::I16_KW,
            TokenKind::I32 => S::I32_KW,
            TokenKind::I64 => S::I64_KW,
            TokenKind::U8 => S::U8_KW,
            TokenKind::U16 => S::U16_KW,
            TokenKind::U32 => S::U32_KW,
            TokenKind::U64 => S::U64_KW,
            TokenKind::FloatKw => S::FLOAT_KW,
            TokenKind::Char => S::CHAR_KW,
            TokenKind::Bool => S::BOOL_KW,
            TokenKind::StringKw => S::STRING_KW,
            TokenKind::True => S::TRUE_KW,
            TokenKind::False => S::FALSE_KW,
            TokenKind::Dot => S::DOT,
            TokenKind::Colon => S::COLON,
            TokenKind::ColonColon => S::COLON_COLON,
            TokenKind::Pipe => S::PIPE,
            TokenKind::Eq => S::EQ,
            TokenKind::Amp => S::AMP,
            TokenKind::Star => S::STAR,
            TokenKind::Plus => S::PLUS,
            TokenKind::Question => S::QUESTION,
            TokenKind::Hole => S::HOLE,
            TokenKind::Backslash => S::BACKSLASH,
            TokenKind::LeftArrow => S::LEFT_ARROW,
            TokenKind::RightArrow => S::RIGHT_ARROW,
            TokenKind::LParen => S::L_PAREN,
            TokenKind::RParen => S::R_PAREN,
            TokenKind::LBracket => S::L_BRACKET,
            TokenKind::RBracket => S::R_BRACKET,
            TokenKind::LBrace => S::L_BRACE,
            TokenKind::RBrace => S::R_BRACE,
            TokenKind::Comma => S::COMMA,
            TokenKind::Semicolon => S::SEMICOLON,
            TokenKind::IntLiteral => S::INT_LITERAL,
            TokenKind::FloatLiteral => S::FLOAT_LITERAL,
            TokenKind::CharLiteral => S::CHAR_LITERAL,
            TokenKind::StringLiteral => S::STRING_LITERAL,
            TokenKind::LowerName => S::LOWER_NAME,
            TokenKind::UpperName => S::UPPER_NAME,
            TokenKind::OperatorName => S::OPERATOR_NAME,
            TokenKind::Wildcard => S::WILDCARD,
            TokenKind::Whitespace => S::WHITESPACE,
            TokenKind::Comment => S::COMMENT,
            TokenKind::Newline => S::NEWLINE,
            TokenKind::Error => S::ERROR,
            TokenKind::EndOfInput => S::EOF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_kinds_are_first_values() {
        assert_eq!(SyntaxKind::TOMBSTONE as u16, 0);
        assert_eq!(SyntaxKind::ERROR_NODE as u16, 1);
    }

    #[test]
    fn trivia_kinds_identified() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::NEWLINE.is_trivia());
        assert!(SyntaxKind::COMMENT.is_trivia());
        assert!(!SyntaxKind::LET_KW.is_trivia());
        assert!(!SyntaxKind::SOURCE_FILE.is_trivia());
    }

    #[test]
    fn token_kind_conversion_round_trips_a_sample() {
        assert_eq!(SyntaxKind::from(TokenKind::Fn), SyntaxKind::FN_KW);
        assert_eq!(SyntaxKind::from(TokenKind::RightArrow), SyntaxKind::RIGHT_ARROW);
        assert_eq!(SyntaxKind::from(TokenKind::LowerName), SyntaxKind::LOWER_NAME);
        assert_eq!(SyntaxKind::from(TokenKind::EndOfInput), SyntaxKind::EOF);
    }
}
