//! Backtracking token cursor.

use c6_ir::{Span, Token};

use crate::scan::next_token;

/// Lazy token cursor over one source buffer.
///
/// At most one token is buffered. Backtracking needs no history: a parser
/// that kept a [`Token`] can [`reset`](Lexer::reset) to it at any time.
#[derive(Clone, Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    /// Byte offset where the next scan starts.
    offset: u32,
    buffered: Option<Token>,
}

impl<'src> Lexer<'src> {
    /// # Panics
    /// Panics if the source exceeds `u32::MAX` bytes.
    pub fn new(source: &'src str) -> Self {
        assert!(
            u32::try_from(source.len()).is_ok(),
            "source of {} bytes exceeds u32::MAX",
            source.len()
        );
        Lexer {
            source,
            offset: 0,
            buffered: None,
        }
    }

    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Return the next token without consuming it.
    ///
    /// Repeated calls return the same token until [`eat`](Lexer::eat).
    pub fn peek(&mut self) -> Token {
        if let Some(token) = self.buffered {
            return token;
        }
        let token = next_token(self.source.as_bytes(), self.offset);
        self.offset = token.span.end;
        self.buffered = Some(token);
        token
    }

    /// Consume and return the next token.
    pub fn eat(&mut self) -> Token {
        let token = self.peek();
        self.buffered = None;
        token
    }

    /// Rewind so that `token` is the next token again.
    pub fn reset(&mut self, token: Token) {
        debug_assert!(token.span.end as usize <= self.source.len());
        self.offset = token.span.end;
        self.buffered = Some(token);
    }

    /// Start of the next token, or the scan position if none is buffered.
    pub fn position(&self) -> u32 {
        self.buffered.map_or(self.offset, |t| t.span.start)
    }

    /// Source text covered by `span`.
    #[inline]
    pub fn text(&self, span: Span) -> &'src str {
        span.text(self.source)
    }
}
