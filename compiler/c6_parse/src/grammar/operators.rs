//! Operator matching helpers.

use c6_ir::{BinaryOp, TokenKind, UnaryOp};

use crate::Parser;

impl Parser<'_> {
    pub(crate) fn match_binary_op(&mut self) -> Option<BinaryOp> {
        Some(match self.peek_kind() {
            TokenKind::PipePipe => BinaryOp::LogicalOr,
            TokenKind::AmpAmp => BinaryOp::LogicalAnd,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Ampersand => BinaryOp::BitAnd,
            TokenKind::EqualEqual => BinaryOp::Eq,
            TokenKind::BangEqual => BinaryOp::NotEq,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEqual => BinaryOp::LessEq,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEqual => BinaryOp::GreaterEq,
            TokenKind::ShiftLeft => BinaryOp::Shl,
            TokenKind::ShiftRight => BinaryOp::Shr,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            _ => return None,
        })
    }

    pub(crate) fn match_unary_op(&mut self) -> Option<UnaryOp> {
        Some(match self.peek_kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Ampersand => UnaryOp::AddressOf,
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Bang => UnaryOp::Not,
            _ => return None,
        })
    }
}
