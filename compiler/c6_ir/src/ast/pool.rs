//! Node storage for one parsed file.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::{Node, NodeFlags, NodeId, NodeKind, NodeRange};
use crate::{FileIndex, Span};

/// Shared counter handing out node debug ids.
///
/// Ids are unique across every pool created from clones of the same
/// counter. They exist for diagnostics only.
#[derive(Clone, Default)]
pub struct DebugIds(Arc<AtomicU32>);

impl DebugIds {
    pub fn new() -> Self {
        DebugIds::default()
    }

    #[inline]
    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl fmt::Debug for DebugIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DebugIds({})", self.0.load(Ordering::Relaxed))
    }
}

/// Position in an [`AstPool`]; see [`AstPool::rollback`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AstMark {
    nodes: u32,
    lists: u32,
}

/// Append-only node storage with truncating rollback.
pub struct AstPool {
    file: FileIndex,
    nodes: Vec<Node>,
    lists: Vec<NodeId>,
    ids: DebugIds,
}

impl AstPool {
    pub fn new(file: FileIndex, ids: DebugIds) -> Self {
        AstPool {
            file,
            nodes: Vec::new(),
            lists: Vec::new(),
            ids,
        }
    }

    #[inline]
    pub fn file(&self) -> FileIndex {
        self.file
    }

    /// Allocate a node.
    ///
    /// # Panics
    /// Panics if the pool exceeds `u32::MAX` nodes.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(
            u32::try_from(self.nodes.len())
                .unwrap_or_else(|_| panic!("AST pool exceeded u32::MAX nodes")),
        );
        self.nodes.push(Node {
            kind,
            file: self.file,
            span,
            flags: NodeFlags::empty(),
            debug_id: self.ids.next(),
        });
        id
    }

    /// Store a list of children and return its range.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = NodeId>) -> NodeRange {
        let start = self.lists.len();
        self.lists.extend(ids);
        let to_u32 = |n: usize| {
            u32::try_from(n).unwrap_or_else(|_| panic!("AST list table exceeded u32::MAX"))
        };
        NodeRange {
            start: to_u32(start),
            len: to_u32(self.lists.len() - start),
        }
    }

    #[inline]
    #[track_caller]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    #[track_caller]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    #[track_caller]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    #[track_caller]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    #[inline]
    #[track_caller]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.nodes[id.index()].flags
    }

    #[inline]
    #[track_caller]
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    /// Record the current size of both tables.
    #[inline]
    pub fn mark(&self) -> AstMark {
        AstMark {
            nodes: u32::try_from(self.nodes.len()).unwrap_or(u32::MAX),
            lists: u32::try_from(self.lists.len()).unwrap_or(u32::MAX),
        }
    }

    /// Drop every node and list allocated since `mark`.
    pub fn rollback(&mut self, mark: AstMark) {
        debug_assert!(
            mark.nodes as usize <= self.nodes.len() && mark.lists as usize <= self.lists.len(),
            "AST rollback past current end"
        );
        self.nodes.truncate(mark.nodes as usize);
        self.lists.truncate(mark.lists as usize);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Debug for AstPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstPool")
            .field("file", &self.file)
            .field("nodes", &self.nodes.len())
            .field("lists", &self.lists.len())
            .finish()
    }
}
