//! c6 IR - source-level data structures.
//!
//! This crate holds what the lexer and parser share:
//! - [`Span`] byte ranges into an immutable source buffer
//! - [`FileIndex`] and the shared [`FileTable`]
//! - [`Token`] and [`TokenKind`] produced by the lexer
//! - The flat AST: [`Node`], [`NodeKind`], and the [`AstPool`] that owns them
//!
//! # Design
//!
//! - Nodes reference children by [`NodeId`] (a `u32` index), never by pointer.
//! - Child lists live in one side table addressed by [`NodeRange`].
//! - Discarding a failed parse is a truncate of both tables ([`AstPool::rollback`]).
//! - Names and literals are spans into the source; the AST owns no strings.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod file;
mod span;
mod token;

pub use ast::{
    dump_tree, AstMark, AstPool, BinaryOp, DebugIds, Node, NodeFlags, NodeId, NodeKind,
    NodeRange, Number, UnaryOp,
};
pub use file::{FileEntry, FileIndex, FileTable, SharedFiles};
pub use span::Span;
pub use token::{Token, TokenKind};
