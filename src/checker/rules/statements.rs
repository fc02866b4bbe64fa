//! Single-statement patterns: B002, B003, B011, B015, B017.

use crate::ast::{Constant, Expr, ExprKind, NodeKind, NodeRef, Stmt, StmtKind};
use crate::checker::visitor::{Context, WINDOW_SIZE};
use crate::diagnostics::{Code, Diagnostic};

const PREFIX_INCREMENT: [NodeKind; WINDOW_SIZE] = [
    NodeKind::UnaryOp,
    NodeKind::UAdd,
    NodeKind::UnaryOp,
    NodeKind::UAdd,
];

/// B002: `++n`. Runs on the inner `+` leaf and looks back through the
/// window for the outer operation.
pub fn unary_prefix_increment(ctx: &mut Context<'_>) {
    let window = ctx.window();
    if window.len() != WINDOW_SIZE {
        return;
    }
    if !window.iter().map(NodeRef::kind).eq(PREFIX_INCREMENT) {
        return;
    }
    let origin = window[0].position();
    if let Some(pos) = origin {
        ctx.emit(Diagnostic::new(pos, Code::B002, vec![]));
    }
}

fn is_os_environ(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Attribute { value, attr } => attr == "environ" && value.as_name() == Some("os"),
        _ => false,
    }
}

/// B003: `os.environ = {}`.
pub fn environ_assignment(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::Assign { targets, .. } = &stmt.kind else {
        return;
    };
    if let [target] = targets.as_slice() {
        if is_os_environ(target) {
            ctx.emit(Diagnostic::new(stmt.pos, Code::B003, vec![]));
        }
    }
}

/// B011: `assert False`.
pub fn assert_false(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::Assert { test, .. } = &stmt.kind else {
        return;
    };
    if test.kind == ExprKind::Constant(Constant::Bool(false)) {
        ctx.emit(Diagnostic::new(stmt.pos, Code::B011, vec![]));
    }
}

/// B015: a comparison used as a statement.
pub fn pointless_comparison(compare: &Expr, ctx: &mut Context<'_>) {
    if ctx.parent().map(|p| p.kind()) == Some(NodeKind::Expr) {
        ctx.emit(Diagnostic::new(compare.pos, Code::B015, vec![]));
    }
}

/// B017: `with self.assertRaises(Exception):`.
pub fn assert_raises_exception(stmt: &Stmt, ctx: &mut Context<'_>) {
    let StmtKind::With(with) = &stmt.kind else {
        return;
    };
    let [item] = with.items.as_slice() else {
        return;
    };
    if item.optional_vars.is_some() {
        return;
    }
    let ExprKind::Call { func, args, .. } = &item.context_expr.kind else {
        return;
    };
    let is_assert_raises =
        matches!(&func.kind, ExprKind::Attribute { attr, .. } if attr == "assertRaises");
    if is_assert_raises && matches!(args.as_slice(), [arg] if arg.as_name() == Some("Exception")) {
        ctx.emit(Diagnostic::new(stmt.pos, Code::B017, vec![]));
    }
}
