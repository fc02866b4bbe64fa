//! Loops and `finally` blocks: B007, B012.

use crate::ast::{NodeKind, NodeRef, Position, Stmt, StmtKind};
use crate::checker::names::NameFinder;
use crate::checker::visitor::Context;
use crate::diagnostics::{Code, Diagnostic};

/// B007: loop variables the loop body never reads.
pub fn unused_loop_variable(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::For(for_loop) = &stmt.kind else {
        return;
    };

    let mut targets = NameFinder::new();
    targets.visit(NodeRef::Expr(&for_loop.target));
    let mut body = NameFinder::new();
    body.visit_all(for_loop.body.iter().map(NodeRef::Stmt));

    let used = body.names();
    for (name, positions) in targets.names() {
        if name.starts_with('_') || used.contains_key(name) {
            continue;
        }
        if let Some(first) = positions.first() {
            ctx.emit(Diagnostic::new(*first, Code::B007, vec![name.clone()]));
        }
    }
}

const ANY_JUMP: &[NodeKind] = &[NodeKind::Return, NodeKind::Continue, NodeKind::Break];
const RETURN_ONLY: &[NodeKind] = &[NodeKind::Return];

/// B012: `return`, `continue` or `break` that would swallow an exception
/// raised in the `try` body.
pub fn jump_in_finally(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::Try(try_stmt) = &stmt.kind else {
        return;
    };
    let mut found = Vec::new();
    for child in &try_stmt.finalbody {
        find_jumps(NodeRef::Stmt(child), ANY_JUMP, &mut found);
    }
    for pos in found {
        ctx.emit(Diagnostic::new(pos, Code::B012, vec![]));
    }
}

/// Collect nodes of a kind in `bad`, not descending into function bodies.
/// Inside a loop only `return` still leaves the `finally` block.
fn find_jumps(node: NodeRef<'_>, bad: &[NodeKind], found: &mut Vec<Position>) {
    let kind = node.kind();
    if kind.is_function_def() {
        return;
    }

    let bad = if matches!(kind, NodeKind::While | NodeKind::For) {
        RETURN_ONLY
    } else {
        if bad.contains(&kind) {
            found.extend(node.position());
        }
        bad
    };

    for child in node.children() {
        find_jumps(child, bad, found);
    }
}
