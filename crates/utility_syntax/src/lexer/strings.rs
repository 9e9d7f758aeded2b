//! String literal scanning.
//!
//! Literals are scanned in two steps: find the raw body between the delimiters, then "cook" it into text and
//! interpolation parts. Multi-line literals strip the indentation of the closing delimiter from every line before
//! cooking. Raw literals (`#"…"#`) only treat a backslash as an escape when it is followed by the same number of
//! `#` characters as the delimiter.

use super::Lexer;
use super::tokens::{StringPart, StringToken, TokenKind};

impl<'a> Lexer<'a> {
    /// Scan a string literal whose opening `"` (and any raw `#`s) has been consumed.
    pub(super) fn scan_string(&mut self, start: usize, hashes: usize) {
        let multiline = self.peek() == Some('"') && self.peek_next() == Some('"');
        let body = if multiline {
            self.advance();
            self.advance();
            self.scan_multiline_body(start, hashes)
        } else if self.peek() == Some('"') && hashes == 0 {
            // `""`
            self.advance();
            Some(String::new())
        } else {
            self.scan_single_line_body(start, hashes)
        };

        let Some(body) = body else {
            return;
        };

        match cook(&body, hashes, multiline) {
            Ok(parts) => self.add_token(TokenKind::String(StringToken { parts, multiline }), start),
            Err(message) => self.error(message, start),
        }
    }

    /// Consume up to and including the closing delimiter, returning the raw body.
    fn scan_single_line_body(&mut self, start: usize, hashes: usize) -> Option<String> {
        let body_start = self.current_pos;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error("Unterminated string literal", start);
                    return None;
                }
                Some('\\') => {
                    self.advance();
                    // Skip the escaped character so `\"` does not close the literal.
                    if self.consume_hashes(hashes) {
                        self.advance();
                    }
                }
                Some('"') => {
                    let body_end = self.current_pos;
                    self.advance();
                    if self.consume_hashes(hashes) {
                        return Some(self.source[body_start..body_end].to_string());
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Consume a `"""` literal body and closing delimiter, returning the body with indentation stripped.
    fn scan_multiline_body(&mut self, start: usize, hashes: usize) -> Option<String> {
        // Content starts on the line after the opening delimiter.
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.advance();
        }
        self.match_char('\r');
        if !self.match_char('\n') {
            self.error("Multi-line string literal content must begin on a new line", start);
            return None;
        }

        let body_start = self.current_pos;
        loop {
            match self.peek() {
                None => {
                    self.error("Unterminated multi-line string literal", start);
                    return None;
                }
                Some('\\') => {
                    self.advance();
                    if self.consume_hashes(hashes) && self.peek() != Some('\n') {
                        self.advance();
                    }
                }
                Some('"') if self.source[self.current_pos..].starts_with("\"\"\"") => {
                    let body_end = self.current_pos;
                    self.advance();
                    self.advance();
                    self.advance();
                    if self.consume_hashes(hashes) {
                        let raw = &self.source[body_start..body_end];
                        return match strip_indentation(raw) {
                            Ok(body) => Some(body),
                            Err(message) => {
                                self.error(message, start);
                                None
                            }
                        };
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Consume exactly `count` `#` characters if they are all present.
    fn consume_hashes(&mut self, count: usize) -> bool {
        let present = self.source[self.current_pos..]
            .chars()
            .take(count)
            .filter(|c| *c == '#')
            .count();
        if present < count {
            return false;
        }
        for _ in 0..count {
            self.advance();
        }
        true
    }
}

/// Remove the closing delimiter's indentation from every line of a multi-line body.
///
/// The last line of `raw` holds only the indentation in front of the closing `"""`; it is dropped along with the
/// line break before it.
fn strip_indentation(raw: &str) -> Result<String, String> {
    let (content, indent) = match raw.rfind('\n') {
        Some(i) => (&raw[..i], &raw[i + 1..]),
        None => ("", raw),
    };
    if !indent.chars().all(|c| c == ' ' || c == '\t') {
        return Err("Multi-line string literal closing delimiter must begin on a new line".to_string());
    }
    if raw.rfind('\n').is_none() {
        return Ok(String::new());
    }

    let mut lines = Vec::new();
    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(stripped) = line.strip_prefix(indent) {
            lines.push(stripped);
        } else if line.trim().is_empty() {
            lines.push("");
        } else {
            return Err("Insufficient indentation of line in multi-line string literal".to_string());
        }
    }
    Ok(lines.join("\n"))
}

/// Process escapes and split out `\( … )` interpolations.
fn cook(body: &str, hashes: usize, multiline: bool) -> Result<Vec<StringPart>, String> {
    let escape = format!("\\{}", "#".repeat(hashes));
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut rest = body;

    while let Some(index) = rest.find(escape.as_str()) {
        text.push_str(&rest[..index]);
        rest = &rest[index + escape.len()..];

        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            return Err("Invalid escape sequence at end of string literal".to_string());
        };
        rest = chars.as_str();
        match c {
            'n' => text.push('\n'),
            't' => text.push('\t'),
            'r' => text.push('\r'),
            '0' => text.push('\0'),
            '\\' => text.push('\\'),
            '"' => text.push('"'),
            '\'' => text.push('\''),
            '\n' if multiline => {}
            'u' => {
                let (ch, remaining) = unicode_escape(rest)?;
                text.push(ch);
                rest = remaining;
            }
            '(' => {
                let (expr, remaining) = interpolation(rest)?;
                if !text.is_empty() {
                    parts.push(StringPart::Text(std::mem::take(&mut text)));
                }
                parts.push(StringPart::Interpolation(expr.to_string()));
                rest = remaining;
            }
            other => return Err(format!("Invalid escape sequence '\\{}' in string literal", other)),
        }
    }

    text.push_str(rest);
    if !text.is_empty() || parts.is_empty() {
        parts.push(StringPart::Text(text));
    }
    Ok(parts)
}

/// Parse `{XXXX}` after `\u`.
fn unicode_escape(rest: &str) -> Result<(char, &str), String> {
    let invalid = || "Invalid unicode escape in string literal".to_string();
    let inner = rest.strip_prefix('{').ok_or_else(invalid)?;
    let close = inner.find('}').ok_or_else(invalid)?;
    let digits = &inner[..close];
    if digits.is_empty() || digits.len() > 8 {
        return Err(invalid());
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    let ch = char::from_u32(value).ok_or_else(invalid)?;
    Ok((ch, &inner[close + 1..]))
}

/// Find the end of an interpolated expression (balanced parentheses, nested strings skipped).
///
/// Returns the expression source and the text after the closing `)`.
fn interpolation(rest: &str) -> Result<(&str, &str), String> {
    let mut depth = 1;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&rest[..i], &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    Err("Unterminated interpolation in string literal".to_string())
}
