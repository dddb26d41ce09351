//! Recursive descent parser for c6.
//!
//! The parser pulls tokens lazily from a [`Lexer`] and writes nodes into an
//! [`AstPool`]. Every production is wrapped in [`Parser::attempt`], so a
//! failing production leaves no trace: the lexer is rewound to the token it
//! started on and the pool is truncated to its previous size. That makes
//! trying alternatives in sequence side-effect free.
//!
//! # Errors
//!
//! A production returns `Err(ParseError)` with a byte offset. When several
//! alternatives fail, the error that got furthest into the input wins (see
//! [`ParseError::furthest`]); a shallow mismatch on the first alternative
//! never hides a deeper, more specific one.
//!
//! # Expressions
//!
//! Binary expressions are parsed left to right into a left-leaning tree and
//! then fixed up by rotation: a new operator that binds tighter than the
//! unparenthesized operator on the left is pushed down into that node's
//! right child. See `grammar::expr`.

mod error;
mod grammar;
mod snapshot;
mod stack;

use c6_diagnostic::ErrorCode;
use c6_ir::{AstPool, DebugIds, FileIndex, NodeId, Span, Token, TokenKind};
use c6_lexer::Lexer;
use tracing::debug;

pub use error::ParseError;
use snapshot::ParserSnapshot;

pub(crate) type PResult<T> = Result<T, ParseError>;

/// A parsed file or expression together with the pool that owns it.
#[derive(Debug)]
pub struct ParseOutput {
    pub pool: AstPool,
    pub root: NodeId,
}

/// Parse a whole source file into a `File` node.
#[tracing::instrument(level = "debug", skip_all, fields(file = file.raw(), bytes = source.len()))]
pub fn parse_file(source: &str, file: FileIndex, ids: DebugIds) -> Result<ParseOutput, ParseError> {
    let mut parser = Parser::new(source, file, ids);
    let root = parser.parse_file()?;
    debug!(nodes = parser.pool.len(), "parsed file");
    Ok(parser.finish(root))
}

/// Parse a single expression that must span the whole input.
pub fn parse_expression(
    source: &str,
    file: FileIndex,
    ids: DebugIds,
) -> Result<ParseOutput, ParseError> {
    let mut parser = Parser::new(source, file, ids);
    let root = parser.parse_expr()?;
    parser.expect(TokenKind::Eof)?;
    Ok(parser.finish(root))
}

/// Parser state: a token cursor and the pool nodes are written into.
pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    pool: AstPool,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, file: FileIndex, ids: DebugIds) -> Self {
        Parser {
            lexer: Lexer::new(source),
            pool: AstPool::new(file, ids),
        }
    }

    fn finish(self, root: NodeId) -> ParseOutput {
        ParseOutput {
            pool: self.pool,
            root,
        }
    }

    // ─── Snapshots ──────────────────────────────────────────────────────

    fn snapshot(&mut self) -> ParserSnapshot {
        ParserSnapshot::new(self.lexer.peek(), self.pool.mark())
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        self.lexer.reset(snapshot.token);
        self.pool.rollback(snapshot.pool);
    }

    /// Run a production; on failure rewind the lexer and drop any nodes it
    /// allocated before returning the error.
    pub(crate) fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let snapshot = self.snapshot();
        let result = stack::ensure_sufficient_stack(|| f(self));
        if result.is_err() {
            self.restore(snapshot);
        }
        result
    }

    /// Try each alternative in order; return the first success, or the
    /// furthest-reaching error if all fail.
    pub(crate) fn first_of<T>(&mut self, alternatives: &[fn(&mut Self) -> PResult<T>]) -> PResult<T> {
        let mut best: Option<ParseError> = None;
        for alternative in alternatives {
            match alternative(self) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    best = Some(match best {
                        Some(prev) => prev.furthest(err),
                        None => err,
                    });
                }
            }
        }
        Err(best.unwrap_or_else(|| {
            let found = self.lexer.peek();
            ParseError::new(ErrorCode::E9001, found.span, "no alternatives to parse")
        }))
    }

    // ─── Token helpers ──────────────────────────────────────────────────

    #[inline]
    pub(crate) fn peek(&mut self) -> Token {
        self.lexer.peek()
    }

    #[inline]
    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.lexer.peek().kind
    }

    #[inline]
    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume the next token if it has kind `kind`.
    pub(crate) fn eat_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.lexer.eat())
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn bump(&mut self) -> Token {
        self.lexer.eat()
    }

    /// Consume a token of kind `kind` or fail with "expected ..., found ...".
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        let token = self.peek();
        if token.kind == kind {
            return Ok(self.bump());
        }
        Err(self.error_expected(ErrorCode::E1001, kind.display_name(), token))
    }

    #[cold]
    pub(crate) fn error_expected(&self, code: ErrorCode, expected: &str, found: Token) -> ParseError {
        ParseError::expected(code, expected, found, self.lexer.source())
    }

    #[inline]
    pub(crate) fn text(&self, span: Span) -> &'a str {
        self.lexer.text(span)
    }

    #[inline]
    pub(crate) fn source_len(&self) -> u32 {
        u32::try_from(self.lexer.source().len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests;
