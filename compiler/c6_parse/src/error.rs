//! Parse error type.

use c6_diagnostic::{Diagnostic, ErrorCode};
use c6_ir::{FileIndex, Span, Token};
use c6_lexer::LexError;

/// A syntax (or lexical) error at a byte offset.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        ParseError {
            code,
            span,
            message: message.into(),
        }
    }

    /// "expected X, found Y" at `found`, or the lexical error it carries.
    #[cold]
    pub(crate) fn expected(code: ErrorCode, expected: &str, found: Token, source: &str) -> Self {
        if let Some(lex) = LexError::from_token(found, source) {
            return lex.into();
        }
        ParseError::new(
            code,
            found.span,
            format!("expected {expected}, found {}", found.kind),
        )
    }

    /// Byte offset the error points at.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.span.start
    }

    /// Keep whichever error got further into the input.
    ///
    /// On a tie a lexical error beats a syntax error, otherwise the earlier
    /// alternative's error is kept.
    #[must_use]
    pub fn furthest(self, other: ParseError) -> ParseError {
        let other_wins = other.offset() > self.offset()
            || (other.offset() == self.offset()
                && other.code.is_lexical()
                && !self.code.is_lexical());
        if other_wins {
            other
        } else {
            self
        }
    }

    pub fn to_diagnostic(&self, file: FileIndex) -> Diagnostic {
        Diagnostic::error(self.code, file, self.span, self.message.clone())
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            code: err.code,
            span: err.span,
            message: err.message,
        }
    }
}
