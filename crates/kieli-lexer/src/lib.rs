//! Kieli lexer -- converts source text into a stream of tokens.

mod cursor;

use cursor::Cursor;
use kieli_common::diagnostic::Diagnostic;
use kieli_common::span::{Position, Range, Span};
use kieli_common::token::{keyword_from_str, operator_from_str, Token, TokenKind};

const OPERATOR_CHARS: &str = "+-*/.|<=>:!?#%&^~$@\\";

/// A significant token plus the raw trivia (whitespace/comments) that
/// preceded it. Used by callers that only want the token stream, not a
/// lossless reconstruction (the parser's CST builder uses [`Lexer::tokenize_raw`]
/// instead, since it needs every trivia token individually).
#[derive(Debug, Clone, PartialEq)]
pub struct LexedToken {
    pub kind: TokenKind,
    pub span: Span,
    pub preceding_trivia: Span,
}

/// The Kieli lexer. Scans a borrowed `&str` one token at a time; holds no
/// state beyond the cursor position and the diagnostics accumulated so far.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    source: &'src str,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Tokenize the entire source into raw tokens, including trivia
    /// (`Whitespace`, `Comment`, `Newline`) as their own tokens. This is the
    /// stream the CST builder consumes to reconstruct source text losslessly.
    /// The final token is always `EndOfInput`.
    pub fn tokenize_raw(source: &'src str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.raw_lex();
            let done = tok.kind == TokenKind::EndOfInput;
            tokens.push(tok);
            if done {
                break;
            }
        }
        (tokens, lexer.diagnostics)
    }

    /// Tokenize into only significant tokens, grouping preceding trivia into
    /// each token's `preceding_trivia` span.
    pub fn tokenize(source: &'src str) -> (Vec<LexedToken>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let trivia_start = lexer.cursor.pos();
            let mut tok = lexer.raw_lex();
            while tok.kind.is_trivia() {
                tok = lexer.raw_lex();
            }
            let trivia_end = tok.span.start;
            let kind = tok.kind;
            let span = tok.span;
            out.push(LexedToken {
                kind,
                span,
                preceding_trivia: Span::new(trivia_start, trivia_end),
            });
            if kind == TokenKind::EndOfInput {
                break;
            }
        }
        (out, lexer.diagnostics)
    }

    fn error(&mut self, span: Span, code: &'static str, message: impl Into<String>) {
        let range = Range::new(
            Position {
                line: 0,
                column: span.start,
            },
            Position {
                line: 0,
                column: span.end,
            },
        );
        self.diagnostics.push(Diagnostic::error(range, code, message));
    }

    /// Produce exactly one raw token (possibly trivia) from the current
    /// cursor position.
    pub fn raw_lex(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::EndOfInput, start, start);
        };

        match c {
            ' ' | '\t' | '\r' => {
                self.cursor.eat_while(|c| c == ' ' || c == '\t' || c == '\r');
                Token::new(TokenKind::Whitespace, start, self.cursor.pos())
            }
            '\n' => {
                self.cursor.advance();
                Token::new(TokenKind::Newline, start, self.cursor.pos())
            }
            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            '[' => self.single(TokenKind::LBracket, start),
            ']' => self.single(TokenKind::RBracket, start),
            '{' => self.single(TokenKind::LBrace, start),
            '}' => self.single(TokenKind::RBrace, start),
            ',' => self.single(TokenKind::Comma, start),
            ';' => self.single(TokenKind::Semicolon, start),
            '/' if self.cursor.peek_next() == Some('/') => self.lex_line_comment(start),
            '/' if self.cursor.peek_next() == Some('*') => self.lex_block_comment(start),
            '0'..='9' => self.lex_number(start),
            '\'' => self.lex_char(start),
            '"' => self.lex_string(start),
            c if is_ident_start(c) => self.lex_ident(start),
            c if OPERATOR_CHARS.contains(c) => self.lex_operator(start),
            _ => {
                self.cursor.advance();
                let span = Span::new(start, self.cursor.pos());
                self.error(span, "E_LEX_UNKNOWN_CHAR", format!("unrecognized character '{c}'"));
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    fn lex_line_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '/'
        self.cursor.eat_while(|c| c != '\n');
        Token::new(TokenKind::Comment, start, self.cursor.pos())
    }

    /// Nestable `/* ... */` block comment.
    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        let mut depth = 1u32;
        loop {
            match self.cursor.peek() {
                None => {
                    let span = Span::new(start, self.cursor.pos());
                    self.error(span, "E_LEX_UNTERMINATED_COMMENT", "unterminated block comment");
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('/') if self.cursor.peek_next() == Some('*') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    depth += 1;
                }
                Some('*') if self.cursor.peek_next() == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    depth -= 1;
                    if depth == 0 {
                        return Token::new(TokenKind::Comment, start, self.cursor.pos());
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // ── Numeric literals ───────────────────────────────────────────────

    fn lex_number(&mut self, start: u32) -> Token {
        let first = self.cursor.advance().unwrap();
        let mut is_float = false;
        let mut explicit_base = false;

        let digit_pred: fn(char) -> bool = if first == '0' {
            match self.cursor.peek() {
                Some('b' | 'B') => {
                    explicit_base = true;
                    self.cursor.advance();
                    |c: char| c == '0' || c == '1' || c == '\''
                }
                Some('q' | 'Q') => {
                    explicit_base = true;
                    self.cursor.advance();
                    |c: char| matches!(c, '0'..='3' | '\'')
                }
                Some('o' | 'O') => {
                    explicit_base = true;
                    self.cursor.advance();
                    |c: char| matches!(c, '0'..='7' | '\'')
                }
                Some('d' | 'D') => {
                    explicit_base = true;
                    self.cursor.advance();
                    |c: char| c.is_ascii_digit() || c == '\''
                }
                Some('x' | 'X') => {
                    explicit_base = true;
                    self.cursor.advance();
                    |c: char| c.is_ascii_hexdigit() || c == '\''
                }
                _ => |c: char| c.is_ascii_digit() || c == '\'',
            }
        } else {
            |c: char| c.is_ascii_digit() || c == '\''
        };

        if explicit_base {
            let digits_start = self.cursor.pos();
            self.cursor.eat_while(digit_pred);
            if self.cursor.pos() == digits_start {
                let span = Span::new(start, self.cursor.pos());
                self.error(span, "E_LEX_MISSING_DIGITS_AFTER_BASE", "missing digits after base prefix");
                return Token::new(TokenKind::Error, start, self.cursor.pos());
            }
            if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.advance(); // '.'
                self.cursor.eat_while(digit_pred);
                let span = Span::new(start, self.cursor.pos());
                self.error(
                    span,
                    "E_LEX_EXPLICIT_BASE_WITH_FLOAT",
                    "floating-point literals may not use an explicit base",
                );
                return Token::new(TokenKind::Error, start, self.cursor.pos());
            }
        } else {
            self.cursor.eat_while(digit_pred);

            if self.cursor.peek() == Some('.')
                && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                self.cursor.advance(); // '.'
                self.cursor.eat_while(|c| c.is_ascii_digit() || c == '\'');
            }

            if matches!(self.cursor.peek(), Some('e' | 'E')) {
                let save = self.cursor.pos();
                self.cursor.advance(); // e/E
                let negative = self.cursor.peek() == Some('-');
                if matches!(self.cursor.peek(), Some('+' | '-')) {
                    self.cursor.advance();
                }
                let exp_digits_start = self.cursor.pos();
                self.cursor.eat_while(|c| c.is_ascii_digit());
                if self.cursor.pos() == exp_digits_start {
                    // not actually an exponent; treat 'e' as start of a
                    // following token by not consuming it. Roll back is not
                    // supported by the cursor, so this is reported as an error.
                    let span = Span::new(save, self.cursor.pos());
                    self.error(span, "E_LEX_BAD_NUMBER", "expected digits after exponent marker");
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                if negative && !is_float {
                    let span = Span::new(start, self.cursor.pos());
                    self.error(
                        span,
                        "E_LEX_NEGATIVE_INTEGER_EXPONENT",
                        "integer literal may not have a negative exponent",
                    );
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                is_float = true;
            }
        }

        if self.cursor.peek() == Some('\'') {
            // trailing separator with no following digit
            let span = Span::new(start, self.cursor.pos());
            self.error(span, "E_LEX_SEPARATOR_MISUSE", "digit separator must be between digits");
        }

        // an alphabetic suffix immediately following a number is an error
        if self.cursor.peek().is_some_and(is_ident_start) {
            let suffix_start = self.cursor.pos();
            self.cursor.eat_while(is_ident_continue);
            let span = Span::new(suffix_start, self.cursor.pos());
            self.error(span, "E_LEX_SUFFIX_AFTER_NUMBER", "unexpected suffix after numeric literal");
            return Token::new(TokenKind::Error, start, self.cursor.pos());
        }

        Token::new(
            if is_float { TokenKind::FloatLiteral } else { TokenKind::IntLiteral },
            start,
            self.cursor.pos(),
        )
    }

    // ── Char / string literals ─────────────────────────────────────────

    fn lex_escape(&mut self) -> bool {
        // cursor is positioned at the backslash
        self.cursor.advance();
        match self.cursor.peek() {
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\'' | '"' | '\\') => {
                self.cursor.advance();
                true
            }
            _ => false,
        }
    }

    fn lex_char(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '
        match self.cursor.peek() {
            Some('\\') => {
                if !self.lex_escape() {
                    let span = Span::new(start, self.cursor.pos());
                    self.error(span, "E_LEX_BAD_ESCAPE", "invalid escape sequence");
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
            }
            Some(_) => {
                self.cursor.advance();
            }
            None => {
                let span = Span::new(start, self.cursor.pos());
                self.error(span, "E_LEX_UNTERMINATED_STRING", "unterminated character literal");
                return Token::new(TokenKind::Error, start, self.cursor.pos());
            }
        }
        if self.cursor.peek() == Some('\'') {
            self.cursor.advance();
            Token::new(TokenKind::CharLiteral, start, self.cursor.pos())
        } else {
            let span = Span::new(start, self.cursor.pos());
            self.error(span, "E_LEX_UNTERMINATED_STRING", "unterminated character literal");
            Token::new(TokenKind::Error, start, self.cursor.pos())
        }
    }

    fn lex_string(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening "
        loop {
            match self.cursor.peek() {
                None => {
                    let span = Span::new(start, self.cursor.pos());
                    self.error(span, "E_LEX_UNTERMINATED_STRING", "unterminated string literal");
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('"') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::StringLiteral, start, self.cursor.pos());
                }
                Some('\\') => {
                    if !self.lex_escape() {
                        let span = Span::new(start, self.cursor.pos());
                        self.error(span, "E_LEX_BAD_ESCAPE", "invalid escape sequence");
                        return Token::new(TokenKind::Error, start, self.cursor.pos());
                    }
                }
                Some('\n') => {
                    let span = Span::new(start, self.cursor.pos());
                    self.error(span, "E_LEX_UNTERMINATED_STRING", "unterminated string literal");
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // ── Identifiers ─────────────────────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());

        if let Some(kw) = keyword_from_str(text) {
            return Token::new(kw, start, self.cursor.pos());
        }
        let kind = if text.chars().all(|c| c == '_') {
            TokenKind::Wildcard
        } else if let Some(first_alpha) = text.chars().find(|c| *c != '_') {
            if first_alpha.is_uppercase() {
                TokenKind::UpperName
            } else {
                TokenKind::LowerName
            }
        } else {
            TokenKind::Wildcard
        };
        Token::new(kind, start, self.cursor.pos())
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn lex_operator(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(|c| OPERATOR_CHARS.contains(c));
        let text = self.cursor.slice(start, self.cursor.pos());
        Token::new(operator_from_str(text), start, self.cursor.pos())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_simple_let() {
        assert_eq!(
            kinds("let x = 42"),
            vec![
                TokenKind::Let,
                TokenKind::LowerName,
                TokenKind::Eq,
                TokenKind::IntLiteral,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn lex_upper_vs_lower_name() {
        assert_eq!(kinds("Foo"), vec![TokenKind::UpperName, TokenKind::EndOfInput]);
        assert_eq!(kinds("foo"), vec![TokenKind::LowerName, TokenKind::EndOfInput]);
        assert_eq!(kinds("_"), vec![TokenKind::Wildcard, TokenKind::EndOfInput]);
        assert_eq!(kinds("__"), vec![TokenKind::Wildcard, TokenKind::EndOfInput]);
    }

    #[test]
    fn lex_hex_and_binary_literals() {
        assert_eq!(kinds("0xFF 0b1010 0o17"), vec![
            TokenKind::IntLiteral,
            TokenKind::IntLiteral,
            TokenKind::IntLiteral,
            TokenKind::EndOfInput,
        ]);
    }

    #[test]
    fn lex_float_literal() {
        assert_eq!(kinds("3.14"), vec![TokenKind::FloatLiteral, TokenKind::EndOfInput]);
        assert_eq!(kinds("1.0e10"), vec![TokenKind::FloatLiteral, TokenKind::EndOfInput]);
    }

    #[test]
    fn lex_negative_integer_exponent_is_error() {
        let (tokens, diags) = Lexer::tokenize("1e-5i");
        // 1e-5 as integer exponent is rejected before even reaching the suffix check
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
        assert!(diags.iter().any(|d| d.code == "E_LEX_NEGATIVE_INTEGER_EXPONENT"));
    }

    #[test]
    fn lex_explicit_base_with_float_is_error() {
        let (tokens, diags) = Lexer::tokenize("0x1.5");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(diags[0].code, "E_LEX_EXPLICIT_BASE_WITH_FLOAT");
    }

    #[test]
    fn lex_reserved_operators() {
        assert_eq!(kinds("->"), vec![TokenKind::RightArrow, TokenKind::EndOfInput]);
        assert_eq!(kinds("::"), vec![TokenKind::ColonColon, TokenKind::EndOfInput]);
        assert_eq!(kinds("???"), vec![TokenKind::Hole, TokenKind::EndOfInput]);
    }

    #[test]
    fn lex_custom_operator_name() {
        assert_eq!(kinds("<=>"), vec![TokenKind::OperatorName, TokenKind::EndOfInput]);
    }

    #[test]
    fn lex_line_comment_and_block_comment() {
        assert_eq!(
            Lexer::tokenize_raw("// hi\n/* a /* b */ c */").0.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Comment, TokenKind::Newline, TokenKind::Comment, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn lex_string_and_char_literals() {
        assert_eq!(kinds(r#""hello""#), vec![TokenKind::StringLiteral, TokenKind::EndOfInput]);
        assert_eq!(kinds(r"'a'"), vec![TokenKind::CharLiteral, TokenKind::EndOfInput]);
        assert_eq!(kinds(r"'\n'"), vec![TokenKind::CharLiteral, TokenKind::EndOfInput]);
    }

    #[test]
    fn lex_unterminated_string_is_error() {
        let (tokens, diags) = Lexer::tokenize("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(diags[0].code, "E_LEX_UNTERMINATED_STRING");
    }

    #[test]
    fn preceding_trivia_spans_whitespace_and_comments() {
        let (tokens, _) = Lexer::tokenize("  // c\n  let");
        let let_tok = tokens.iter().find(|t| t.kind == TokenKind::Let).unwrap();
        assert_eq!(let_tok.preceding_trivia.start, 0);
        assert_eq!(let_tok.preceding_trivia.end, let_tok.span.start);
    }

    #[test]
    fn separator_between_digits_is_fine() {
        assert_eq!(kinds("1'000'000"), vec![TokenKind::IntLiteral, TokenKind::EndOfInput]);
    }
}
