//! Parser tests.
//!
//! - `expr`: operator priorities, rotation, postfix chains
//! - `decl`: files, declarations, function signatures
//! - `stmt`: statements, variable definitions, backtracking

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod stmt;

use c6_ir::{dump_tree, DebugIds, FileIndex, Node, NodeId, NodeKind};

use crate::{parse_expression, parse_file, ParseError, ParseOutput};

fn parse_src(source: &str) -> ParseOutput {
    parse_file(source, FileIndex::new(0), DebugIds::new())
        .unwrap_or_else(|err| panic!("failed to parse {source:?}: {err} at {}", err.offset()))
}

fn parse_err(source: &str) -> ParseError {
    match parse_file(source, FileIndex::new(0), DebugIds::new()) {
        Ok(out) => panic!(
            "expected an error, got:\n{}",
            dump_tree(&out.pool, out.root, source)
        ),
        Err(err) => err,
    }
}

fn dump_file(source: &str) -> String {
    let out = parse_src(source);
    dump_tree(&out.pool, out.root, source)
}

fn dump_expr(source: &str) -> String {
    let out = parse_expression(source, FileIndex::new(0), DebugIds::new())
        .unwrap_or_else(|err| panic!("failed to parse {source:?}: {err}"));
    dump_tree(&out.pool, out.root, source)
}

/// The `index`th top-level declaration.
fn decl(out: &ParseOutput, index: usize) -> (NodeId, &Node) {
    let NodeKind::File { declarations } = out.pool.kind(out.root) else {
        panic!("root is not a file");
    };
    let id = out.pool.list(*declarations)[index];
    (id, out.pool.get(id))
}
