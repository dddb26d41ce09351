//! Lexer for the c6 language.
//!
//! Tokens are produced on demand. [`Lexer`] wraps the pure
//! [`next_token`] function with a one-token buffer and offers
//! `peek`/`eat`/`reset`, which is all the parser needs to backtrack.
//!
//! # Token set
//!
//! - Identifiers `[A-Za-z_][A-Za-z0-9_]*` and keywords `if else while struct
//!   func var defer return break continue nil`
//! - Directives `#load`, `#foreign`
//! - Numbers `digits ('.' digits)?`
//! - Strings `"..."` with escapes `\a \b \r \n \t \v \\ \" \' \0`
//! - Operators and punctuation, longest match first
//! - Line comments `// ...`, skipped with whitespace
//!
//! Lexical errors are token kinds; [`tokenize`] turns the first one into a
//! [`LexError`].

mod escape;
mod keywords;
mod lexer;
mod scan;

use c6_diagnostic::{Diagnostic, ErrorCode};
use c6_ir::{FileIndex, Span, Token, TokenKind};
use tracing::debug;

pub use escape::{unescape, EscapeError};
pub use lexer::Lexer;
pub use scan::next_token;

/// A lexical error: the first error token found in a source file.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
}

impl LexError {
    /// Describe `token` if it is an error token.
    pub fn from_token(token: Token, source: &str) -> Option<Self> {
        let text = token.text(source);
        let (code, message) = match token.kind {
            TokenKind::UnexpectedSequenceOfChars => {
                (ErrorCode::E0002, format!("unexpected character `{text}`"))
            }
            TokenKind::UnterminatedString => {
                (ErrorCode::E0001, "unterminated string literal".to_owned())
            }
            TokenKind::NewlineInString => (ErrorCode::E0004, "newline in string literal".to_owned()),
            TokenKind::UnknownEscapeSequence => {
                (ErrorCode::E0005, format!("unknown escape sequence `{text}`"))
            }
            TokenKind::UnknownDirective => (ErrorCode::E0006, format!("unknown directive `{text}`")),
            _ => return None,
        };
        Some(LexError {
            code,
            span: token.span,
            message,
        })
    }

    pub fn to_diagnostic(&self, file: FileIndex) -> Diagnostic {
        Diagnostic::error(self.code, file, self.span, self.message.clone())
    }
}

/// Lex a whole file.
///
/// The returned list ends with the [`TokenKind::Eof`] token. Stops at the
/// first lexical error.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.eat();
        if let Some(err) = LexError::from_token(token, source) {
            debug!(offset = token.span.start, %err, "lexical error");
            return Err(err);
        }
        tokens.push(token);
        if token.kind == TokenKind::Eof {
            break;
        }
    }
    debug!(count = tokens.len(), "tokenized");
    Ok(tokens)
}

#[cfg(test)]
mod tests;
