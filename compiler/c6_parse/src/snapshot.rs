//! Parser snapshots for backtracking.
//!
//! A snapshot is the token the lexer was about to return plus the size of
//! the node pool. Restoring one undoes both the token consumption and the
//! node allocations made since, so a failed alternative is invisible to
//! the next one.

use c6_ir::{AstMark, Token};

#[derive(Clone, Copy, Debug)]
pub(crate) struct ParserSnapshot {
    /// Next token at the time of the snapshot.
    pub(crate) token: Token,
    pub(crate) pool: AstMark,
}

impl ParserSnapshot {
    #[inline]
    pub(crate) fn new(token: Token, pool: AstMark) -> Self {
        ParserSnapshot { token, pool }
    }
}
