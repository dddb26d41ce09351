//! Expressions.
//!
//! ```text
//! expr    = unary { binop unary }
//! unary   = prefix unary | postfix
//! postfix = primary { "(" args ")" | "[" expr "]" | "." ident | ".(" type ")" }
//! primary = ident | number | string | "nil" | "(" expr ")"
//! ```
//!
//! `expr` builds the tree left to right and restructures it in
//! [`Parser::attach_binary`].

use c6_diagnostic::ErrorCode;
use c6_ir::{BinaryOp, NodeFlags, NodeId, NodeKind, Number, Span, Token, TokenKind};

use crate::{PResult, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let mut left = p.parse_unary()?;
            while let Some(op) = p.match_binary_op() {
                p.bump();
                let right = p.parse_unary()?;
                left = p.attach_binary(left, op, right);
            }
            Ok(left)
        })
    }

    /// Comma-separated expressions, at least one.
    pub(crate) fn parse_expr_list(&mut self) -> PResult<Vec<NodeId>> {
        self.attempt(|p| {
            let mut exprs = vec![p.parse_expr()?];
            while p.eat_if(TokenKind::Comma).is_some() {
                exprs.push(p.parse_expr()?);
            }
            Ok(exprs)
        })
    }

    /// Combine `left op right`, honoring priorities.
    ///
    /// Walks down the right spine of `left` while the node there is an
    /// unparenthesized binary operator with strictly lower priority than
    /// `op`, and inserts the new node at that position: the displaced right
    /// child becomes the new node's left operand. Equal priorities stop the
    /// walk, which keeps equal-priority chains left-associative.
    fn attach_binary(&mut self, left: NodeId, op: BinaryOp, right: NodeId) -> NodeId {
        let mut parent: Option<NodeId> = None;
        let mut target = left;
        while let Some(child) = self.rotation_child(target, op) {
            parent = Some(target);
            target = child;
        }

        let span = self.pool.span(target).merge(self.pool.span(right));
        let node = self.pool.alloc(
            NodeKind::BinaryOp {
                op,
                left: target,
                right,
            },
            span,
        );
        let Some(parent) = parent else {
            return node;
        };

        if let NodeKind::BinaryOp { right: slot, .. } = &mut self.pool.get_mut(parent).kind {
            *slot = node;
        }
        // Every node on the spine above the insertion point now ends where
        // `right` ends.
        let end = span.end;
        let mut walk = left;
        while walk != node {
            let spine = self.pool.get_mut(walk);
            spine.span.end = spine.span.end.max(end);
            walk = match spine.kind {
                NodeKind::BinaryOp { right, .. } => right,
                _ => break,
            };
        }
        left
    }

    /// Right child of `id` if a new `op` must be inserted below it.
    fn rotation_child(&self, id: NodeId, op: BinaryOp) -> Option<NodeId> {
        let node = self.pool.get(id);
        match node.kind {
            NodeKind::BinaryOp {
                op: existing,
                right,
                ..
            } if !node.flags.contains(NodeFlags::EXPR_IN_PAREN)
                && existing.priority() < op.priority() =>
            {
                Some(right)
            }
            _ => None,
        }
    }

    /// Prefix operators bind to everything after them, suffixes included.
    pub(crate) fn parse_unary(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let Some(op) = p.match_unary_op() else {
                let primary = p.parse_primary()?;
                return p.parse_postfix(primary);
            };
            let start = p.bump().span.start;
            let operand = p.parse_unary()?;
            let span = Span::new(start, p.pool.span(operand).end);
            Ok(p.pool.alloc(NodeKind::UnaryOp { op, operand }, span))
        })
    }

    fn parse_postfix(&mut self, mut expr: NodeId) -> PResult<NodeId> {
        loop {
            let start = self.pool.span(expr).start;
            expr = match self.peek_kind() {
                TokenKind::LeftParen => self.parse_call(expr)?,
                TokenKind::LeftBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    let close = self.expect(TokenKind::RightBracket)?;
                    self.pool.alloc(
                        NodeKind::Subscript {
                            container: expr,
                            index,
                        },
                        Span::new(start, close.span.end),
                    )
                }
                TokenKind::Dot => {
                    self.bump();
                    if self.eat_if(TokenKind::LeftParen).is_some() {
                        let ty = self.parse_type()?;
                        let close = self.expect(TokenKind::RightParen)?;
                        self.pool.alloc(
                            NodeKind::Cast { operand: expr, ty },
                            Span::new(start, close.span.end),
                        )
                    } else {
                        let member = self.expect_identifier()?;
                        self.pool.alloc(
                            NodeKind::MemberAccess {
                                container: expr,
                                member: member.span,
                            },
                            Span::new(start, member.span.end),
                        )
                    }
                }
                _ => return Ok(expr),
            };
        }
    }

    fn parse_call(&mut self, callee: NodeId) -> PResult<NodeId> {
        self.attempt(|p| {
            p.expect(TokenKind::LeftParen)?;
            let args = if p.check(TokenKind::RightParen) {
                Vec::new()
            } else {
                p.parse_expr_list()?
            };
            let close = p.expect(TokenKind::RightParen)?;
            let args = p.pool.alloc_list(args);
            let span = Span::new(p.pool.span(callee).start, close.span.end);
            Ok(p.pool.alloc(NodeKind::Call { callee, args }, span))
        })
    }

    pub(crate) fn parse_primary(&mut self) -> PResult<NodeId> {
        self.attempt(|p| {
            let token = p.peek();
            match token.kind {
                TokenKind::Identifier => {
                    p.bump();
                    Ok(p.pool.alloc(NodeKind::Identifier { name: token.span }, token.span))
                }
                TokenKind::Number => {
                    p.bump();
                    let value = p.number_value(token)?;
                    Ok(p.pool.alloc(NodeKind::NumberLiteral { value }, token.span))
                }
                TokenKind::StringLiteral => {
                    p.bump();
                    let value = Span::new(token.span.start + 1, token.span.end - 1);
                    Ok(p.pool.alloc(NodeKind::StringLiteral { value }, token.span))
                }
                TokenKind::Nil => {
                    p.bump();
                    Ok(p.pool.alloc(NodeKind::Nil, token.span))
                }
                TokenKind::LeftParen => {
                    p.bump();
                    let inner = p.parse_expr()?;
                    let close = p.expect(TokenKind::RightParen)?;
                    let node = p.pool.get_mut(inner);
                    node.flags |= NodeFlags::EXPR_IN_PAREN;
                    node.span = Span::new(token.span.start, close.span.end);
                    Ok(inner)
                }
                _ => Err(p.error_expected(ErrorCode::E1002, "expression", token)),
            }
        })
    }

    fn number_value(&self, token: Token) -> PResult<Number> {
        let text = self.text(token.span);
        let value = if text.contains('.') {
            text.parse::<f64>().ok().map(Number::float)
        } else {
            text.parse::<u64>().ok().map(Number::Int)
        };
        value.ok_or_else(|| {
            ParseError::new(
                ErrorCode::E0003,
                token.span,
                format!("number literal `{text}` is out of range"),
            )
        })
    }

    pub(crate) fn expect_identifier(&mut self) -> PResult<Token> {
        let token = self.peek();
        if token.kind == TokenKind::Identifier {
            return Ok(self.bump());
        }
        Err(self.error_expected(ErrorCode::E1003, "identifier", token))
    }
}
