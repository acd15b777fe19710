//! Semantic-token classification and LSP delta-encoding.

use kieli_common::span::Position;

/// One semantic-token class. Order is significant: it is the index used
/// when registering the server's `SemanticTokensLegend`, so this list must
/// never be reordered once published, only appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticTokenClass {
    Keyword,
    Comment,
    Number,
    String,
    Operator,
    Type,
    EnumMember,
    Interface,
    Struct,
    Parameter,
    Variable,
    Property,
    Function,
    Method,
    Module,
    Macro,
    Namespace,
    Enum,
}

pub const SEMANTIC_TOKEN_CLASSES: &[SemanticTokenClass] = &[
    SemanticTokenClass::Keyword,
    SemanticTokenClass::Comment,
    SemanticTokenClass::Number,
    SemanticTokenClass::String,
    SemanticTokenClass::Operator,
    SemanticTokenClass::Type,
    SemanticTokenClass::EnumMember,
    SemanticTokenClass::Interface,
    SemanticTokenClass::Struct,
    SemanticTokenClass::Parameter,
    SemanticTokenClass::Variable,
    SemanticTokenClass::Property,
    SemanticTokenClass::Function,
    SemanticTokenClass::Method,
    SemanticTokenClass::Module,
    SemanticTokenClass::Macro,
    SemanticTokenClass::Namespace,
    SemanticTokenClass::Enum,
];

impl SemanticTokenClass {
    pub fn legend_index(self) -> u32 {
        SEMANTIC_TOKEN_CLASSES
            .iter()
            .position(|&c| c == self)
            .expect("every class appears in SEMANTIC_TOKEN_CLASSES") as u32
    }

    pub fn lsp_type(self) -> lsp_types::SemanticTokenType {
        use lsp_types::SemanticTokenType as T;
        match self {
            SemanticTokenClass::Keyword => T::KEYWORD,
            SemanticTokenClass::Comment => T::COMMENT,
            SemanticTokenClass::Number => T::NUMBER,
            SemanticTokenClass::String => T::STRING,
            SemanticTokenClass::Operator => T::OPERATOR,
            SemanticTokenClass::Type => T::TYPE,
            SemanticTokenClass::EnumMember => T::ENUM_MEMBER,
            SemanticTokenClass::Interface => T::INTERFACE,
            SemanticTokenClass::Struct => T::STRUCT,
            SemanticTokenClass::Parameter => T::PARAMETER,
            SemanticTokenClass::Variable => T::VARIABLE,
            SemanticTokenClass::Property => T::PROPERTY,
            SemanticTokenClass::Function => T::FUNCTION,
            SemanticTokenClass::Method => T::METHOD,
            SemanticTokenClass::Module => T::NAMESPACE,
            SemanticTokenClass::Macro => T::MACRO,
            SemanticTokenClass::Namespace => T::NAMESPACE,
            SemanticTokenClass::Enum => T::ENUM,
        }
    }
}

/// One classified token before delta-encoding: its start position, length
/// in UTF-16 units, and class.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedToken {
    pub start: Position,
    pub length: u32,
    pub class: SemanticTokenClass,
}

/// Delta-encode a sequence of tokens (assumed already sorted by position)
/// into the LSP wire format: five `u32`s per token (delta line, delta
/// start character relative to the previous token on the same line
/// otherwise absolute, length, token type index, token modifiers bitset).
pub fn encode_delta(tokens: &[ClassifiedToken]) -> Vec<u32> {
    let mut out = Vec::with_capacity(tokens.len() * 5);
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for token in tokens {
        let delta_line = token.start.line - prev_line;
        let delta_start = if delta_line == 0 { token.start.column - prev_start } else { token.start.column };

        out.push(delta_line);
        out.push(delta_start);
        out.push(token.length);
        out.push(token.class.legend_index());
        out.push(0); // no modifiers yet

        prev_line = token.start.line;
        prev_start = token.start.column;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_index_matches_declared_order() {
        assert_eq!(SemanticTokenClass::Keyword.legend_index(), 0);
        assert_eq!(SemanticTokenClass::Enum.legend_index(), 17);
    }

    #[test]
    fn encode_delta_single_token_is_absolute() {
        let tokens = [ClassifiedToken {
            start: Position { line: 2, column: 4 },
            length: 3,
            class: SemanticTokenClass::Keyword,
        }];
        assert_eq!(encode_delta(&tokens), vec![2, 4, 3, 0, 0]);
    }

    #[test]
    fn encode_delta_second_token_same_line_is_relative() {
        let tokens = [
            ClassifiedToken { start: Position { line: 2, column: 4 }, length: 3, class: SemanticTokenClass::Keyword },
            ClassifiedToken { start: Position { line: 2, column: 10 }, length: 2, class: SemanticTokenClass::Number },
        ];
        let encoded = encode_delta(&tokens);
        assert_eq!(&encoded[5..10], &[0, 6, 2, 2, 0]);
    }

    #[test]
    fn encode_delta_next_line_resets_column_to_absolute() {
        let tokens = [
            ClassifiedToken { start: Position { line: 2, column: 10 }, length: 3, class: SemanticTokenClass::Keyword },
            ClassifiedToken { start: Position { line: 3, column: 2 }, length: 2, class: SemanticTokenClass::Number },
        ];
        let encoded = encode_delta(&tokens);
        assert_eq!(&encoded[5..10], &[1, 2, 2, 2, 0]);
    }
}
