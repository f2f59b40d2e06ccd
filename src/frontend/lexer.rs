//! Lexical scanner.
//!
//! Converts source text into an ordered token sequence in a single
//! left-to-right pass. Lexical errors are collected as diagnostics and
//! never abort the scan: an unknown character becomes an `Invalid` token
//! and scanning resumes at the next character, so the full input is
//! always classified.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::errors::{AnalyzeError, AnalyzeResult, LexicalError, LexicalErrorKind};
use crate::utils::location::{SourceLocation, Span};
use std::iter::Peekable;
use std::str::Chars;
use unicode_xid::UnicodeXID;

/// Upper bound on tokens per request, to reject pathological input.
pub const MAX_TOKENS: usize = 200_000;

/// The result of scanning one source text.
#[derive(Debug, Clone)]
pub struct LexOutput {
    /// Every token in source order, ending with an `Eof` token.
    pub tokens: Vec<Token>,
    /// Lexical diagnostics, in source order.
    pub errors: Vec<LexicalError>,
}

/// Scan the whole input. Fails only when the token bound is exceeded.
pub fn tokenize(source: &str) -> AnalyzeResult<LexOutput> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let at_end = token.is_eof();
        tokens.push(token);
        if at_end {
            break;
        }
        if tokens.len() > MAX_TOKENS {
            return Err(AnalyzeError::ResourceExceeded(format!(
                "input produced more than {} tokens",
                MAX_TOKENS
            )));
        }
    }
    Ok(LexOutput { tokens, errors: lexer.errors })
}

/// A lexer over one source text.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    offset: usize,
    line: usize,
    column: usize,
    token_start: SourceLocation,
    errors: Vec<LexicalError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().peekable(),
            offset: 0,
            line: 1,
            column: 1,
            token_start: SourceLocation::start(),
            errors: Vec::new(),
        }
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.offset)
    }

    fn mark_token_start(&mut self) {
        self.token_start = self.current_location();
    }

    fn make_span(&self) -> Span {
        Span::from_locations(self.token_start, self.current_location())
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.offset..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and comments. Both advance the line/column
    /// counters without emitting tokens.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_next() == Some('/') {
                        while self.peek().is_some() && self.peek() != Some('\n') {
                            self.advance();
                        }
                    } else if self.peek_next() == Some('*') {
                        self.mark_token_start();
                        self.advance(); // /
                        self.advance(); // *
                        let mut terminated = false;
                        while let Some(c) = self.advance() {
                            if c == '*' && self.peek() == Some('/') {
                                self.advance();
                                terminated = true;
                                break;
                            }
                        }
                        if !terminated {
                            self.push_error(
                                "unterminated block comment",
                                LexicalErrorKind::UnterminatedComment,
                            );
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let span = self.make_span();
        let lexeme = self.source[span.start_offset..span.end_offset].to_string();
        Token::new(kind, span, lexeme)
    }

    fn push_error(&mut self, message: impl Into<String>, kind: LexicalErrorKind) {
        self.errors.push(LexicalError {
            message: message.into(),
            span: self.make_span(),
            kind,
        });
    }

    fn scan_number(&mut self) -> Token {
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.advance();
        }

        // A single embedded '.' followed by digits promotes to a double.
        if self.peek() == Some('.')
            && self.peek_next().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            self.advance();
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                self.advance();
            }
            return self.make_token(TokenKind::DoubleLiteral);
        }

        self.make_token(TokenKind::IntLiteral)
    }

    /// Maximal munch: a run starting with a letter or `_` is always one
    /// identifier token, digits and underscores included.
    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .map(|c| c.is_xid_continue() || c == '_')
            .unwrap_or(false)
        {
            self.advance();
        }

        let span = self.make_span();
        let lexeme = &self.source[span.start_offset..span.end_offset];
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier);
        Token::new(kind, span, lexeme.to_string())
    }

    /// Scan a string literal; the opening quote is already consumed.
    /// An unterminated string still yields a token spanning to the end
    /// of the line.
    fn scan_string(&mut self) -> Token {
        let mut terminated = false;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
            if c == '"' {
                terminated = true;
                break;
            }
            if c == '\\' && self.peek().is_some() && self.peek() != Some('\n') {
                self.advance();
            }
        }
        if !terminated {
            self.push_error("unterminated string literal", LexicalErrorKind::UnterminatedString);
        }
        self.make_token(TokenKind::StringLiteral)
    }

    /// Scan a character literal; the opening quote is already consumed.
    fn scan_char(&mut self) -> Token {
        match self.peek() {
            Some('\\') => {
                self.advance();
                if self.peek().is_some() && self.peek() != Some('\n') {
                    self.advance();
                }
            }
            Some(c) if c != '\n' && c != '\'' => {
                self.advance();
            }
            _ => {}
        }
        if !self.match_char('\'') {
            self.push_error(
                "unterminated character literal",
                LexicalErrorKind::UnterminatedChar,
            );
        }
        self.make_token(TokenKind::CharLiteral)
    }

    /// Scan the next token. Never fails; problems degrade to `Invalid`
    /// tokens plus a recorded diagnostic.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.mark_token_start();

        let c = match self.advance() {
            Some(c) => c,
            None => return self.make_token(TokenKind::Eof),
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' => self.make_token(TokenKind::Dot),

            '+' => {
                if self.match_char('+') {
                    self.make_token(TokenKind::PlusPlus)
                } else {
                    self.make_token(TokenKind::Plus)
                }
            }
            '-' => {
                if self.match_char('-') {
                    self.make_token(TokenKind::MinusMinus)
                } else {
                    self.make_token(TokenKind::Minus)
                }
            }
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),

            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqualEqual)
                } else {
                    self.make_token(TokenKind::Equal)
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::BangEqual)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::LessEqual)
                } else {
                    self.make_token(TokenKind::Less)
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::GreaterEqual)
                } else {
                    self.make_token(TokenKind::Greater)
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.make_token(TokenKind::AmpAmp)
                } else {
                    self.push_error("invalid character '&'", LexicalErrorKind::InvalidCharacter);
                    self.make_token(TokenKind::Invalid)
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.make_token(TokenKind::PipePipe)
                } else {
                    self.push_error("invalid character '|'", LexicalErrorKind::InvalidCharacter);
                    self.make_token(TokenKind::Invalid)
                }
            }

            '"' => self.scan_string(),
            '\'' => self.scan_char(),

            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_xid_start() || c == '_' => self.scan_identifier(),

            other => {
                self.push_error(
                    format!("invalid character '{}'", other),
                    LexicalErrorKind::InvalidCharacter,
                );
                self.make_token(TokenKind::Invalid)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> LexOutput {
        tokenize(source).unwrap()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        let out = lex("");
        assert_eq!(out.tokens.len(), 1);
        assert!(out.tokens[0].is_eof());
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_keywords_vs_identifiers() {
        let out = lex("int cantidad while Persona");
        assert_eq!(out.tokens[0].kind, TokenKind::Int);
        assert_eq!(out.tokens[1].kind, TokenKind::Identifier);
        assert_eq!(out.tokens[1].lexeme, "cantidad");
        assert_eq!(out.tokens[2].kind, TokenKind::While);
        assert_eq!(out.tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_identifier_with_digits_is_one_token() {
        let out = lex("_resultadoFinal_42");
        assert_eq!(out.tokens.len(), 2); // identifier + eof
        assert_eq!(out.tokens[0].kind, TokenKind::Identifier);
        assert_eq!(out.tokens[0].lexeme, "_resultadoFinal_42");
    }

    #[test]
    fn test_numeric_promotion() {
        let out = lex("10 25.99 7.");
        assert_eq!(out.tokens[0].kind, TokenKind::IntLiteral);
        assert_eq!(out.tokens[1].kind, TokenKind::DoubleLiteral);
        assert_eq!(out.tokens[1].lexeme, "25.99");
        // '7.' with no trailing digit stays an int followed by a dot
        assert_eq!(out.tokens[2].kind, TokenKind::IntLiteral);
        assert_eq!(out.tokens[3].kind, TokenKind::Dot);
    }

    #[test]
    fn test_string_and_char_literals() {
        let out = lex(r#""Hola Mundo" 'A'"#);
        assert_eq!(out.tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(out.tokens[0].lexeme, "\"Hola Mundo\"");
        assert_eq!(out.tokens[1].kind, TokenKind::CharLiteral);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_unterminated_string_spans_to_eol() {
        let out = lex("string s = \"sin cierre\nint x;");
        let tok = out
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::StringLiteral)
            .unwrap();
        assert_eq!(tok.span.start_line, 1);
        assert_eq!(tok.span.end_line, 1);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, LexicalErrorKind::UnterminatedString);
        // scanning resumed on the next line
        assert!(out.tokens.iter().any(|t| t.kind == TokenKind::Int));
    }

    #[test]
    fn test_invalid_character_position_and_recovery() {
        let out = lex("int $error_id = 9;");
        let invalid = out.tokens.iter().find(|t| t.kind == TokenKind::Invalid).unwrap();
        assert_eq!(invalid.lexeme, "$");
        assert_eq!(invalid.line(), 1);
        assert_eq!(invalid.column(), 5);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, LexicalErrorKind::InvalidCharacter);
        assert_eq!(out.errors[0].span.start_column, 5);
        // the rest of the line still tokenizes
        assert!(out.tokens.iter().any(|t| t.lexeme == "error_id"));
        assert!(out.tokens.iter().any(|t| t.kind == TokenKind::Semicolon));
    }

    #[test]
    fn test_brackets_are_invalid_characters() {
        // array syntax is not part of the language
        let out = lex("int arr[3];");
        assert_eq!(out.errors.len(), 2);
        assert!(out.errors.iter().all(|e| e.kind == LexicalErrorKind::InvalidCharacter));
        assert!(out.errors[0].message.contains("'['"));
        assert!(out.errors[1].message.contains("']'"));
        assert_eq!(out.tokens.iter().filter(|t| t.kind == TokenKind::Invalid).count(), 2);
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds("== = != <= < ++ + --"),
            vec![
                TokenKind::EqualEqual,
                TokenKind::Equal,
                TokenKind::BangEqual,
                TokenKind::LessEqual,
                TokenKind::Less,
                TokenKind::PlusPlus,
                TokenKind::Plus,
                TokenKind::MinusMinus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_advance_lines() {
        let out = lex("// comentario\nint x; /* bloque\nlargo */ int y;");
        let x = out.tokens.iter().find(|t| t.lexeme == "x").unwrap();
        let y = out.tokens.iter().find(|t| t.lexeme == "y").unwrap();
        assert_eq!(x.line(), 2);
        assert_eq!(y.line(), 3);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let out = lex("int x; /* nunca se cierra");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, LexicalErrorKind::UnterminatedComment);
    }

    #[test]
    fn test_line_column_tracking() {
        let out = lex("int a;\n  double b;");
        let b = out.tokens.iter().find(|t| t.lexeme == "b").unwrap();
        assert_eq!(b.line(), 2);
        assert_eq!(b.column(), 10);
    }
}
