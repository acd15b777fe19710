//! Kieli parser: recursive descent (with a flat Pratt layer for operator
//! chains) producing a rowan-based CST.
//!
//! This crate transforms the token stream from `kieli-lexer` into a lossless
//! concrete syntax tree (CST) using the `rowan` library. The CST preserves
//! every token including whitespace and comments so a future formatter and
//! the language server can work from the same tree.

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

pub use cst::{debug_tree, SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

/// Result of parsing a Kieli source file.
///
/// Contains the green tree (the immutable, cheap-to-clone CST) and any
/// parse errors encountered during error-recovering descent.
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Parse errors encountered during parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a complete Kieli source file into a CST.
///
/// Lexes the source, parses the token stream, and returns a [`Parse`]
/// containing the syntax tree plus any diagnostics raised during recovery.
pub fn parse(source: &str) -> Parse {
    let (tokens, _lex_diagnostics) = kieli_lexer::Lexer::tokenize_raw(source);
    let mut p = parser::Parser::new(tokens, source);
    parser::parse_source_file(&mut p);
    let (green, errors) = p.build_tree();
    Parse { green, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_source_produces_source_file() {
        let result = parse("");
        assert!(result.ok());
        assert_eq!(result.syntax().kind(), SyntaxKind::SOURCE_FILE);
    }

    #[test]
    fn parse_simple_function() {
        let result = parse("fn main() { 0 }");
        assert!(result.ok(), "errors: {:?}", result.errors());
        let root = result.syntax();
        let fn_def = root.children().next().unwrap();
        assert_eq!(fn_def.kind(), SyntaxKind::FN_DEF);
    }
}
