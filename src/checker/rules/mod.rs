//! Rule checks, grouped by what they look at.
//!
//! Checks never fail: a node whose shape a rule does not expect simply
//! produces nothing.

mod calls;
mod classes;
mod control_flow;
mod defaults;
mod exceptions;
mod functions;
mod statements;

use super::visitor::Context;
use crate::ast::{NodeKind, NodeRef, StmtKind};

/// Run the checks registered for `node`'s kind, in ascending code order.
pub(crate) fn dispatch<'a>(node: NodeRef<'a>, ctx: &mut Context<'a>) {
    match (node.kind(), node) {
        (NodeKind::ExceptHandler, NodeRef::ExceptHandler(handler)) => {
            exceptions::bare_except(handler, ctx);
            exceptions::single_element_tuple(handler, ctx);
            exceptions::redundant_tuple(handler, ctx);
        }
        (NodeKind::UAdd, _) => statements::unary_prefix_increment(ctx),
        (NodeKind::Assign, NodeRef::Stmt(stmt)) => statements::environ_assignment(stmt, ctx),
        (NodeKind::Call, NodeRef::Expr(call)) => {
            calls::unreliable_callable_check(call, ctx);
            calls::multi_char_strip(call, ctx);
            calls::constant_getattr(call, ctx);
            calls::constant_setattr(call, ctx);
        }
        (kind @ (NodeKind::FunctionDef | NodeKind::AsyncFunctionDef), NodeRef::Stmt(stmt)) => {
            let StmtKind::FunctionDef(def) = &stmt.kind else {
                return;
            };
            defaults::mutable_defaults(def, ctx);
            defaults::call_defaults(def, ctx);
            if kind == NodeKind::FunctionDef {
                functions::yield_with_return(def, stmt, ctx);
            }
            functions::first_argument(stmt, def, ctx);
        }
        (NodeKind::For, NodeRef::Stmt(stmt)) => control_flow::unused_loop_variable(stmt, ctx),
        (NodeKind::Assert, NodeRef::Stmt(stmt)) => statements::assert_false(stmt, ctx),
        (NodeKind::Try, NodeRef::Stmt(stmt)) => control_flow::jump_in_finally(stmt, ctx),
        (NodeKind::Compare, NodeRef::Expr(compare)) => {
            statements::pointless_comparison(compare, ctx)
        }
        (NodeKind::Raise, NodeRef::Stmt(stmt)) => {
            exceptions::raise_literal(stmt, ctx);
            exceptions::raise_without_cause(stmt, ctx);
        }
        (NodeKind::With, NodeRef::Stmt(stmt)) => statements::assert_raises_exception(stmt, ctx),
        (NodeKind::ClassDef, NodeRef::Stmt(stmt)) => classes::init_only_data_class(stmt, ctx),
        _ => {}
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::checker::visitor::walk;
    use crate::diagnostics::Diagnostic;
    use crate::parser::parse_module;

    /// Walk `source` and return `(line, column, code, message)` for every
    /// diagnostic, optional codes included.
    pub fn check(source: &str) -> Vec<(usize, usize, String, String)> {
        let module = parse_module(source).expect("test source should parse");
        let lines: Vec<String> = source.split_inclusive('\n').map(String::from).collect();
        walk(&module, &lines)
            .into_iter()
            .map(|d: Diagnostic| {
                let message = d.message();
                (d.line, d.column, d.code.as_str().to_string(), message)
            })
            .collect()
    }

    /// Codes only, in report order.
    pub fn codes(source: &str) -> Vec<String> {
        check(source).into_iter().map(|(_, _, code, _)| code).collect()
    }
}
