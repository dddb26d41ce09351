//! Indented text rendering of a subtree, for debugging and golden tests.

use std::fmt::Write;

use super::{AstPool, NodeFlags, NodeId, NodeKind, NodeRange};

/// Render the subtree rooted at `root` as one node per line.
///
/// Names and literals are resolved against `source`.
pub fn dump_tree(pool: &AstPool, root: NodeId, source: &str) -> String {
    let mut out = String::new();
    Dumper {
        pool,
        source,
        out: &mut out,
    }
    .node(root, 0);
    out
}

struct Dumper<'a> {
    pool: &'a AstPool,
    source: &'a str,
    out: &'a mut String,
}

impl Dumper<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn list(&mut self, range: NodeRange, depth: usize) {
        let pool = self.pool;
        for &child in pool.list(range) {
            self.node(child, depth);
        }
    }

    fn opt(&mut self, id: NodeId, depth: usize) {
        if id.is_present() {
            self.node(id, depth);
        }
    }

    fn node(&mut self, id: NodeId, depth: usize) {
        let pool = self.pool;
        let node = pool.get(id);
        let src = self.source;
        let mut head = String::new();
        let next = depth + 1;

        let kind = node.kind.clone();
        match &kind {
            NodeKind::Identifier { name } => {
                let _ = write!(head, "Identifier {}", name.text(src));
            }
            NodeKind::StringLiteral { value } => {
                let _ = write!(head, "StringLiteral \"{}\"", value.text(src));
            }
            NodeKind::NumberLiteral { value } => {
                let _ = write!(head, "NumberLiteral {value}");
            }
            NodeKind::Nil => head.push_str("Nil"),
            NodeKind::UnaryOp { op, .. } => {
                let _ = write!(head, "UnaryOp {op}");
            }
            NodeKind::BinaryOp { op, .. } => {
                let _ = write!(head, "BinaryOp {op}");
            }
            NodeKind::Call { .. } => head.push_str("Call"),
            NodeKind::Subscript { .. } => head.push_str("Subscript"),
            NodeKind::Cast { .. } => head.push_str("Cast"),
            NodeKind::MemberAccess { member, .. } => {
                let _ = write!(head, "MemberAccess .{}", member.text(src));
            }
            NodeKind::NamedType { name } => {
                let _ = write!(head, "Type {}", name.text(src));
            }
            NodeKind::PointerType { .. } => head.push_str("PointerType"),
            NodeKind::File { .. } => head.push_str("File"),
            NodeKind::LoadDirective { path } => {
                let _ = write!(head, "Load \"{}\"", path.text(src));
            }
            NodeKind::Struct { name, .. } => {
                head.push_str("Struct");
                if let Some(name) = name {
                    let _ = write!(head, " {}", name.text(src));
                }
            }
            NodeKind::Const { name, .. } => {
                let _ = write!(head, "Const {}", name.text(src));
            }
            NodeKind::Var { name, .. } => {
                let _ = write!(head, "Var {}", name.text(src));
            }
            NodeKind::Function { name, library, .. } => {
                head.push_str("Function");
                if let Some(name) = name {
                    let _ = write!(head, " {}", name.text(src));
                }
                if node.flags.contains(NodeFlags::FOREIGN) {
                    head.push_str(" #foreign");
                    if let Some(lib) = library {
                        let _ = write!(head, " \"{}\"", lib.text(src));
                    }
                }
                if node.flags.contains(NodeFlags::VARIADIC) {
                    head.push_str(" ...");
                }
            }
            NodeKind::Block { .. } => head.push_str("Block"),
            NodeKind::VariableDefinition { .. } => head.push_str("VariableDefinition"),
            NodeKind::If { .. } => head.push_str("If"),
            NodeKind::While { .. } => head.push_str("While"),
            NodeKind::Defer { .. } => head.push_str("Defer"),
            NodeKind::Return { .. } => head.push_str("Return"),
            NodeKind::Break => head.push_str("Break"),
            NodeKind::Continue => head.push_str("Continue"),
            NodeKind::Assignment { .. } => head.push_str("Assignment"),
            NodeKind::ExpressionStatement { .. } => head.push_str("ExpressionStatement"),
        }
        if node.flags.contains(NodeFlags::EXPR_IN_PAREN) {
            head.push_str(" (paren)");
        }
        self.line(depth, &head);

        match kind {
            NodeKind::Identifier { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::NumberLiteral { .. }
            | NodeKind::Nil
            | NodeKind::NamedType { .. }
            | NodeKind::LoadDirective { .. }
            | NodeKind::Break
            | NodeKind::Continue => {}
            NodeKind::UnaryOp { operand, .. } => self.node(operand, next),
            NodeKind::BinaryOp { left, right, .. } => {
                self.node(left, next);
                self.node(right, next);
            }
            NodeKind::Call { callee, args } => {
                self.node(callee, next);
                self.list(args, next);
            }
            NodeKind::Subscript { container, index } => {
                self.node(container, next);
                self.node(index, next);
            }
            NodeKind::Cast { operand, ty } => {
                self.node(operand, next);
                self.node(ty, next);
            }
            NodeKind::MemberAccess { container, .. } => self.node(container, next),
            NodeKind::PointerType { pointee } => self.node(pointee, next),
            NodeKind::File { declarations } => self.list(declarations, next),
            NodeKind::Struct { members, .. } => self.list(members, next),
            NodeKind::Const { value, .. } => self.node(value, next),
            NodeKind::Var {
                ty, initializer, ..
            } => {
                self.opt(ty, next);
                self.opt(initializer, next);
            }
            NodeKind::Function {
                params,
                returns,
                body,
                ..
            } => {
                self.list(params, next);
                if !returns.is_empty() {
                    self.line(next, "Returns");
                    self.list(returns, next + 1);
                }
                self.opt(body, next);
            }
            NodeKind::Block { statements } => self.list(statements, next),
            NodeKind::VariableDefinition { vars } => self.list(vars, next),
            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.node(condition, next);
                self.node(then_branch, next);
                if else_branch.is_present() {
                    self.line(next, "Else");
                    self.node(else_branch, next + 1);
                }
            }
            NodeKind::While { condition, body } => {
                self.node(condition, next);
                self.node(body, next);
            }
            NodeKind::Defer { statement } => self.node(statement, next),
            NodeKind::Return { values } => self.list(values, next),
            NodeKind::Assignment { targets, values } => {
                self.list(targets, next);
                self.line(next, "=");
                self.list(values, next + 1);
            }
            NodeKind::ExpressionStatement { expr } => self.node(expr, next),
        }
    }
}
