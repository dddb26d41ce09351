//! Token matching.
//!
//! [`next_token`] is a pure function of `(source, offset)`: it skips
//! whitespace and comments, then classifies the bytes that follow. Nothing
//! is cached here, which is what lets the [`Lexer`](crate::Lexer) rewind to
//! any earlier token by remembering only its span.
//!
//! # Design
//!
//! Dispatch is on the first byte. Arms that can start a multi-byte operator
//! look ahead and take the longest match (`::` before `:`, `<=` before `<`).
//! Error conditions are token kinds, not `Err` values.

use c6_ir::{Span, Token, TokenKind};

use crate::keywords;

/// Produce the token starting at or after `offset`.
///
/// At end of input the result is an [`TokenKind::Eof`] token with an empty
/// span at `source.len()`.
pub fn next_token(source: &[u8], offset: u32) -> Token {
    let mut scanner = Scanner {
        src: source,
        pos: offset as usize,
    };
    scanner.skip_trivia();
    scanner.token()
}

struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    #[inline]
    fn peek_at(&self, ahead: usize) -> u8 {
        self.src.get(self.pos + ahead).copied().unwrap_or(0)
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn make(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, Span::from_range(start..self.pos))
    }

    // ─── Whitespace & Comments ──────────────────────────────────────────

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_at(0) {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                b'/' if self.peek_at(1) == b'/' => {
                    let rest = &self.src[self.pos..];
                    self.pos += memchr::memchr(b'\n', rest).unwrap_or(rest.len());
                }
                _ => return,
            }
        }
    }

    // ─── Dispatch ───────────────────────────────────────────────────────

    fn token(&mut self) -> Token {
        let start = self.pos;
        if self.is_eof() {
            return self.make(TokenKind::Eof, start);
        }
        match self.peek_at(0) {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            b'0'..=b'9' => self.number(start),
            b'"' => self.string(start),
            b'#' => self.directive(start),
            b':' => self.pick(
                start,
                &[(b":", TokenKind::ColonColon), (b"=", TokenKind::ColonEqual)],
                TokenKind::Colon,
            ),
            b'.' => self.pick(start, &[(b"..", TokenKind::Ellipsis)], TokenKind::Dot),
            b'=' => self.pick(start, &[(b"=", TokenKind::EqualEqual)], TokenKind::Equal),
            b'!' => self.pick(start, &[(b"=", TokenKind::BangEqual)], TokenKind::Bang),
            b'<' => self.pick(
                start,
                &[(b"<", TokenKind::ShiftLeft), (b"=", TokenKind::LessEqual)],
                TokenKind::Less,
            ),
            b'>' => self.pick(
                start,
                &[(b">", TokenKind::ShiftRight), (b"=", TokenKind::GreaterEqual)],
                TokenKind::Greater,
            ),
            b'&' => self.pick(start, &[(b"&", TokenKind::AmpAmp)], TokenKind::Ampersand),
            b'|' => self.pick(start, &[(b"|", TokenKind::PipePipe)], TokenKind::Pipe),
            b';' => self.single(start, TokenKind::Semicolon),
            b',' => self.single(start, TokenKind::Comma),
            b'(' => self.single(start, TokenKind::LeftParen),
            b')' => self.single(start, TokenKind::RightParen),
            b'{' => self.single(start, TokenKind::LeftBrace),
            b'}' => self.single(start, TokenKind::RightBrace),
            b'[' => self.single(start, TokenKind::LeftBracket),
            b']' => self.single(start, TokenKind::RightBracket),
            b'+' => self.single(start, TokenKind::Plus),
            b'-' => self.single(start, TokenKind::Minus),
            b'*' => self.single(start, TokenKind::Star),
            b'/' => self.single(start, TokenKind::Slash),
            b'%' => self.single(start, TokenKind::Percent),
            b'^' => self.single(start, TokenKind::Caret),
            b'~' => self.single(start, TokenKind::Tilde),
            _ => self.unexpected(start),
        }
    }

    // ─── Operators ──────────────────────────────────────────────────────

    fn single(&mut self, start: usize, kind: TokenKind) -> Token {
        self.pos += 1;
        self.make(kind, start)
    }

    /// Consume the first byte, then the first suffix in `longer` that
    /// follows; otherwise produce `short`.
    fn pick(&mut self, start: usize, longer: &[(&[u8], TokenKind)], short: TokenKind) -> Token {
        self.pos += 1;
        for &(suffix, kind) in longer {
            if self.src[self.pos..].starts_with(suffix) {
                self.pos += suffix.len();
                return self.make(kind, start);
            }
        }
        self.make(short, start)
    }

    // ─── Identifiers & Keywords ─────────────────────────────────────────

    fn eat_ident_continue(&mut self) {
        while matches!(self.peek_at(0), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.pos += 1;
        }
    }

    fn identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        self.eat_ident_continue();
        let kind = keywords::lookup(&self.src[start..self.pos]).unwrap_or(TokenKind::Identifier);
        self.make(kind, start)
    }

    fn directive(&mut self, start: usize) -> Token {
        self.pos += 1;
        if !matches!(self.peek_at(0), b'a'..=b'z' | b'A'..=b'Z' | b'_') {
            return self.make(TokenKind::UnexpectedSequenceOfChars, start);
        }
        self.eat_ident_continue();
        let kind = keywords::lookup_directive(&self.src[start + 1..self.pos])
            .unwrap_or(TokenKind::UnknownDirective);
        self.make(kind, start)
    }

    // ─── Numbers ────────────────────────────────────────────────────────

    fn eat_digits(&mut self) {
        while self.peek_at(0).is_ascii_digit() {
            self.pos += 1;
        }
    }

    /// `digits ('.' digits)?`. A dot without a following digit is left for
    /// the next token, so `5.(f32)` is a cast of `5`.
    fn number(&mut self, start: usize) -> Token {
        self.eat_digits();
        if self.peek_at(0) == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_digits();
        }
        self.make(TokenKind::Number, start)
    }

    // ─── Strings ────────────────────────────────────────────────────────

    fn string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            let rest = &self.src[self.pos..];
            let Some(found) = memchr::memchr3(b'"', b'\\', b'\n', rest) else {
                self.pos = self.src.len();
                return self.make(TokenKind::UnterminatedString, start);
            };
            self.pos += found;
            match rest[found] {
                b'"' => {
                    self.pos += 1;
                    return self.make(TokenKind::StringLiteral, start);
                }
                b'\n' => return self.make(TokenKind::NewlineInString, start),
                _ => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    match self.peek_at(0) {
                        _ if self.is_eof() => {
                            return self.make(TokenKind::UnterminatedString, start);
                        }
                        b'\n' => return self.make(TokenKind::NewlineInString, start),
                        c if crate::escape::is_valid_escape(c) => self.pos += 1,
                        _ => {
                            self.eat_char();
                            return self.make(TokenKind::UnknownEscapeSequence, escape_start);
                        }
                    }
                }
            }
        }
    }

    // ─── Errors ─────────────────────────────────────────────────────────

    /// Advance over one UTF-8 encoded character.
    fn eat_char(&mut self) {
        self.pos += 1;
        while self.pos < self.src.len() && self.src[self.pos] & 0xC0 == 0x80 {
            self.pos += 1;
        }
    }

    fn unexpected(&mut self, start: usize) -> Token {
        self.eat_char();
        self.make(TokenKind::UnexpectedSequenceOfChars, start)
    }
}
