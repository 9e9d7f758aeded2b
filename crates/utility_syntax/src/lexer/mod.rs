//! Lexer for declaration source.
//!
//! Handles tokenization including:
//! - Keywords (struct, class, let, var, public, …) and identifiers, including backtick-escaped names
//! - Numeric and string literals (interpolation, multi-line `"""` and raw `#"…"#` strings)
//! - Punctuation (`?`, `@`, `->`, …) and free-form operator runs
//! - Line (`//`) and nested block (`/* */`) comments
//!
//! Layout is not tokenized. Each token records whether a line break precedes it (`newline_before`), which is all
//! the parser needs to find the end of an unbraced expression.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, StringToken)
//! - `strings` - String literal scanning and escape processing

mod strings;
pub mod tokens;

pub use tokens::{StringPart, StringToken, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use utility_core::lang::punctuation::PunctuationId;

/// Characters that form operator runs. `<`, `>`, `?`, `!` and `.` are always lexed individually so that nested
/// generic arguments and optional markers never fuse into one token.
const OPERATOR_CHARS: &str = "/=-+*%&|^~";

/// Lexer for declaration source.
///
/// Converts source text into a stream of tokens, handling:
/// - Keywords and identifiers
/// - Numeric and string literals
/// - Operators and punctuation
/// - Delimiter balance (unmatched and unclosed brackets are reported)
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// Set when a line break is skipped; consumed by the next token.
    newline_pending: bool,
    /// Open delimiters, with the span of each opener.
    delimiters: Vec<(PunctuationId, Span)>,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            newline_pending: false,
            delimiters: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        while let Some((open, span)) = self.delimiters.pop() {
            self.errors.push(
                CompileError::new(
                    format!("Unclosed '{}'", utility_core::lang::punctuation::as_str(open)),
                    span,
                )
                .with_hint("every opening bracket needs a matching closing bracket"),
            );
        }

        let eof = Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
            self.newline_pending,
        );
        self.tokens.push(eof);

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(CompileError::new(message.into(), Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            '\n' => self.newline_pending = true,
            ' ' | '\t' | '\r' => {}

            // Comments
            '/' if self.peek() == Some('/') => self.skip_line_comment(),
            '/' if self.peek() == Some('*') => self.skip_block_comment(start),

            // Punctuation
            ',' => self.add_punct(PunctuationId::Comma, start),
            ':' => self.add_punct(PunctuationId::Colon, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            '.' => self.add_punct(PunctuationId::Dot, start),
            '?' => self.add_punct(PunctuationId::Question, start),
            '!' => self.add_punct(PunctuationId::Exclamation, start),
            '@' => self.add_punct(PunctuationId::At, start),
            '<' => self.add_punct(PunctuationId::LAngle, start),
            '>' => self.add_punct(PunctuationId::RAngle, start),
            '(' => self.open_delimiter(PunctuationId::LParen, start),
            ')' => self.close_delimiter(PunctuationId::RParen, start),
            '[' => self.open_delimiter(PunctuationId::LBracket, start),
            ']' => self.close_delimiter(PunctuationId::RBracket, start),
            '{' => self.open_delimiter(PunctuationId::LBrace, start),
            '}' => self.close_delimiter(PunctuationId::RBrace, start),

            // Raw strings (`#"…"#`) or a bare `#`
            '#' => {
                let mut hashes = 1;
                while self.peek() == Some('#') {
                    self.advance();
                    hashes += 1;
                }
                if self.match_char('"') {
                    self.scan_string(start, hashes);
                } else if hashes == 1 {
                    self.add_punct(PunctuationId::Hash, start);
                } else {
                    self.error("Expected '\"' after raw string delimiter", start);
                }
            }

            // Strings
            '"' => self.scan_string(start, 0),

            // Operators (`->` and a lone `=` are punctuation)
            '-' if self.peek() == Some('>') => {
                self.advance();
                self.add_punct(PunctuationId::Arrow, start);
            }
            _ if OPERATOR_CHARS.contains(c) => self.scan_operator(start),

            // Numbers
            '0'..='9' => self.scan_number(start),

            // Identifiers and keywords
            '`' => self.scan_escaped_identifier(start),
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => self.error(format!("Unexpected character '{}'", c), start),
        }
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let newline_before = std::mem::take(&mut self.newline_pending);
        self.tokens
            .push(Token::new(kind, Span::new(start, self.current_pos), newline_before));
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    fn open_delimiter(&mut self, id: PunctuationId, start: usize) {
        self.delimiters.push((id, Span::new(start, start + 1)));
        self.add_punct(id, start);
    }

    /// Emit a closing delimiter, reporting it if it doesn't match the innermost open one.
    fn close_delimiter(&mut self, id: PunctuationId, start: usize) {
        match self.delimiters.pop() {
            Some((open, _)) if matching_close(open) == id => {}
            Some((open, span)) => {
                self.error(
                    format!(
                        "Mismatched closing bracket: expected '{}', found '{}'",
                        utility_core::lang::punctuation::as_str(matching_close(open)),
                        utility_core::lang::punctuation::as_str(id)
                    ),
                    start,
                );
                // Keep the outer opener so one stray bracket produces one error.
                self.delimiters.push((open, span));
            }
            None => self.error("Unmatched closing bracket", start),
        }
        self.add_punct(id, start);
    }

    /// Scan a run of operator characters, stopping before a comment opener.
    fn scan_operator(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if !OPERATOR_CHARS.contains(c) {
                break;
            }
            if c == '/' && matches!(self.peek_next(), Some('/') | Some('*')) {
                break;
            }
            self.advance();
        }
        let spelling = &self.source[start..self.current_pos];
        if spelling == "=" {
            self.add_punct(PunctuationId::Eq, start);
        } else {
            self.add_token(TokenKind::Operator(spelling.to_string()), start);
        }
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip a block comment; block comments nest.
    fn skip_block_comment(&mut self, start: usize) {
        self.advance(); // '*'
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some('/') if self.peek() == Some('*') => {
                    self.advance();
                    depth += 1;
                }
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    depth -= 1;
                }
                Some('\n') => self.newline_pending = true,
                Some(_) => {}
                None => {
                    self.error("Unterminated block comment", start);
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Numbers and identifiers
    // ========================================================================

    /// Scan an integer or floating-point literal, keeping its spelling.
    fn scan_number(&mut self, start: usize) {
        let mut is_float = false;
        self.consume_number_chars();

        // A fraction needs a digit after the dot; `1.description` stays member access.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            is_float = true;
            self.consume_number_chars();
        }

        let spelling = &self.source[start..self.current_pos];
        let is_hex = spelling.starts_with("0x");
        // Exponent sign: `1e-5`, `0x1p+3`.
        if spelling.ends_with(['e', 'E']) && !is_hex || spelling.ends_with(['p', 'P']) && is_hex {
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
                self.consume_number_chars();
            }
            is_float = true;
        } else if !is_hex && spelling.contains(['e', 'E']) {
            is_float = true;
        }

        let spelling = self.source[start..self.current_pos].to_string();
        let kind = if is_float {
            TokenKind::Float(spelling)
        } else {
            TokenKind::Int(spelling)
        };
        self.add_token(kind, start);
    }

    fn consume_number_chars(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        // Look up identifier spelling in the reserved-word registry (no allocation for keywords).
        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }

    /// Scan `` `name` ``. The backticks are kept so the name can be written back verbatim.
    fn scan_escaped_identifier(&mut self, start: usize) {
        let name_start = self.current_pos;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        let empty = self.current_pos == name_start;
        if !self.match_char('`') || empty {
            self.error("Expected identifier between backticks", start);
            return;
        }
        let spelling = self.source[start..self.current_pos].to_string();
        self.add_token(TokenKind::Ident(spelling), start);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn matching_close(open: PunctuationId) -> PunctuationId {
    match open {
        PunctuationId::LParen => PunctuationId::RParen,
        PunctuationId::LBracket => PunctuationId::RBracket,
        _ => PunctuationId::RBrace,
    }
}

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Check if a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================
