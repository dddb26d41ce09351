//! Type expressions: `*`-prefixed pointer chains over a named type.

use c6_diagnostic::ErrorCode;
use c6_ir::{NodeId, NodeKind, Span, TokenKind};

use crate::{PResult, Parser};

impl Parser<'_> {
    pub(crate) fn parse_type(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let token = p.peek();
            match token.kind {
                TokenKind::Star => {
                    p.bump();
                    let pointee = p.parse_type()?;
                    let span = Span::new(token.span.start, p.pool.span(pointee).end);
                    Ok(p.pool.alloc(NodeKind::PointerType { pointee }, span))
                }
                TokenKind::Identifier => {
                    p.bump();
                    Ok(p.pool.alloc(NodeKind::NamedType { name: token.span }, token.span))
                }
                _ => Err(p.error_expected(ErrorCode::E1004, "type", token)),
            }
        })
    }

    /// Whether the next token can begin a type.
    pub(crate) fn at_type_start(&mut self) -> bool {
        matches!(self.peek_kind(), TokenKind::Star | TokenKind::Identifier)
    }
}
