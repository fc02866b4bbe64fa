//! Calls to builtins and string methods: B004, B005, B009, B010.

use std::collections::HashSet;

use crate::ast::{Expr, ExprKind};
use crate::checker::visitor::Context;
use crate::diagnostics::catalog::{IDENTIFIER, PYTHON_KEYWORDS, STRIP_EXEMPT_PATHS, STRIP_METHODS};
use crate::diagnostics::{Code, Diagnostic};

/// Dotted path of a callee: `a.b.c` for `a.b.c(...)`.
///
/// Segments that are neither names nor attributes contribute nothing, so
/// `get().strip` has the path `strip`.
pub fn call_path(expr: &Expr) -> String {
    let mut segments = Vec::new();
    collect_path(expr, &mut segments);
    segments.join(".")
}

fn collect_path<'e>(expr: &'e Expr, segments: &mut Vec<&'e str>) {
    match &expr.kind {
        ExprKind::Attribute { value, attr } => {
            collect_path(value, segments);
            segments.push(attr);
        }
        ExprKind::Name { id } => segments.push(id),
        _ => {}
    }
}

/// Callee name and positional arguments of a call to a bare name.
fn named_call(call: &Expr) -> Option<(&str, &[Expr])> {
    match &call.kind {
        ExprKind::Call { func, args, .. } => Some((func.as_name()?, args.as_slice())),
        _ => None,
    }
}

/// A string literal that could be written as a plain attribute access.
fn is_plain_attribute(arg: &Expr) -> bool {
    arg.as_str_literal()
        .is_some_and(|s| IDENTIFIER.is_match(s) && !PYTHON_KEYWORDS.contains(s))
}

/// B004: `hasattr(x, "__call__")`.
pub fn unreliable_callable_check(call: &Expr, ctx: &mut Context<'_>) {
    let Some((name, args)) = named_call(call) else {
        return;
    };
    if !matches!(name, "getattr" | "hasattr") {
        return;
    }
    if args.get(1).and_then(Expr::as_str_literal) == Some("__call__") {
        ctx.emit(Diagnostic::new(call.pos, Code::B004, vec![]));
    }
}

/// B005: `s.strip("abca")`.
pub fn multi_char_strip(call: &Expr, ctx: &mut Context<'_>) {
    let ExprKind::Call { func, args, .. } = &call.kind else {
        return;
    };
    let ExprKind::Attribute { value, attr } = &func.kind else {
        return;
    };
    if !STRIP_METHODS.contains(attr.as_str()) {
        return;
    }
    let [arg] = args.as_slice() else {
        return;
    };
    let Some(chars) = arg.as_str_literal() else {
        return;
    };
    if STRIP_EXEMPT_PATHS.contains(&call_path(value).as_str()) {
        return;
    }

    let total = chars.chars().count();
    if total <= 1 {
        return;
    }
    let distinct: HashSet<char> = chars.chars().collect();
    if distinct.len() == total {
        return;
    }
    ctx.emit(Diagnostic::new(call.pos, Code::B005, vec![]));
}

/// B009: `getattr(x, "attr")`.
pub fn constant_getattr(call: &Expr, ctx: &mut Context<'_>) {
    if let Some(("getattr", [_, attr])) = named_call(call) {
        if is_plain_attribute(attr) {
            ctx.emit(Diagnostic::new(call.pos, Code::B009, vec![]));
        }
    }
}

/// B010: `setattr(x, "attr", value)`.
pub fn constant_setattr(call: &Expr, ctx: &mut Context<'_>) {
    if let Some(("setattr", [_, attr, _])) = named_call(call) {
        if is_plain_attribute(attr) {
            ctx.emit(Diagnostic::new(call.pos, Code::B010, vec![]));
        }
    }
}
