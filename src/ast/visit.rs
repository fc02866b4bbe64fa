//! Uniform view over tree nodes for traversal.
//!
//! `NodeRef` lets the checker keep heterogeneous nodes on one ancestor stack
//! and dispatch on a single `NodeKind`. Children come back in the order
//! Python's `ast.iter_child_nodes` would produce them, which fixes the order
//! diagnostics are reported in.

use super::nodes::*;

/// Syntactic category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    // Statements
    FunctionDef,
    AsyncFunctionDef,
    ClassDef,
    Return,
    Delete,
    Assign,
    AugAssign,
    AnnAssign,
    For,
    AsyncFor,
    While,
    If,
    With,
    AsyncWith,
    Match,
    Raise,
    Try,
    TryStar,
    Assert,
    Import,
    ImportFrom,
    Global,
    Nonlocal,
    /// Expression statement.
    Expr,
    Pass,
    Break,
    Continue,
    // Auxiliary nodes
    ExceptHandler,
    Arguments,
    Arg,
    Keyword,
    WithItem,
    Comprehension,
    MatchCase,
    // Expressions
    BoolOp,
    NamedExpr,
    BinOp,
    UnaryOp,
    Lambda,
    IfExp,
    Dict,
    Set,
    ListComp,
    SetComp,
    DictComp,
    GeneratorExp,
    Await,
    Yield,
    YieldFrom,
    Compare,
    Call,
    JoinedStr,
    Constant,
    Attribute,
    Subscript,
    Starred,
    Name,
    List,
    Tuple,
    Slice,
    Other,
    // Unary operator leaves
    Not,
    Invert,
    UAdd,
    USub,
}

impl NodeKind {
    /// Function or coroutine definition.
    pub fn is_function_def(self) -> bool {
        matches!(self, NodeKind::FunctionDef | NodeKind::AsyncFunctionDef)
    }
}

/// Borrowed handle to any node in a tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Module(&'a Module),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    ExceptHandler(&'a ExceptHandler),
    Arguments(&'a Arguments),
    Arg(&'a Arg),
    Keyword(&'a Keyword),
    WithItem(&'a WithItem),
    Comprehension(&'a Comprehension),
    MatchCase(&'a MatchCase),
    /// The operator of a unary operation, visited before its operand.
    UnaryOperator(UnaryOp),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Module(_) => NodeKind::Module,
            NodeRef::Stmt(stmt) => stmt_kind(stmt),
            NodeRef::Expr(expr) => expr_kind(expr),
            NodeRef::ExceptHandler(_) => NodeKind::ExceptHandler,
            NodeRef::Arguments(_) => NodeKind::Arguments,
            NodeRef::Arg(_) => NodeKind::Arg,
            NodeRef::Keyword(_) => NodeKind::Keyword,
            NodeRef::WithItem(_) => NodeKind::WithItem,
            NodeRef::Comprehension(_) => NodeKind::Comprehension,
            NodeRef::MatchCase(_) => NodeKind::MatchCase,
            NodeRef::UnaryOperator(op) => match op {
                UnaryOp::Not => NodeKind::Not,
                UnaryOp::Invert => NodeKind::Invert,
                UnaryOp::UAdd => NodeKind::UAdd,
                UnaryOp::USub => NodeKind::USub,
            },
        }
    }

    /// Source position, for the node types that carry one.
    pub fn position(&self) -> Option<Position> {
        match self {
            NodeRef::Stmt(stmt) => Some(stmt.pos),
            NodeRef::Expr(expr) => Some(expr.pos),
            NodeRef::ExceptHandler(handler) => Some(handler.pos),
            NodeRef::Arg(arg) => Some(arg.pos),
            NodeRef::Keyword(keyword) => Some(keyword.pos),
            _ => None,
        }
    }

    pub fn as_stmt(&self) -> Option<&'a Stmt> {
        match self {
            NodeRef::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&'a Expr> {
        match self {
            NodeRef::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Direct children in `ast` field order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match *self {
            NodeRef::Module(module) => push_stmts(&mut out, &module.body),
            NodeRef::Stmt(stmt) => stmt_children(stmt, &mut out),
            NodeRef::Expr(expr) => expr_children(expr, &mut out),
            NodeRef::ExceptHandler(handler) => {
                push_opt(&mut out, handler.type_.as_ref());
                push_stmts(&mut out, &handler.body);
            }
            NodeRef::Arguments(args) => {
                out.extend(args.posonlyargs.iter().map(NodeRef::Arg));
                out.extend(args.args.iter().map(NodeRef::Arg));
                out.extend(args.vararg.iter().map(NodeRef::Arg));
                out.extend(args.kwonlyargs.iter().map(NodeRef::Arg));
                out.extend(args.kw_defaults.iter().flatten().map(NodeRef::Expr));
                out.extend(args.kwarg.iter().map(NodeRef::Arg));
                push_exprs(&mut out, &args.defaults);
            }
            NodeRef::Arg(arg) => push_opt(&mut out, arg.annotation.as_ref()),
            NodeRef::Keyword(keyword) => out.push(NodeRef::Expr(&keyword.value)),
            NodeRef::WithItem(item) => {
                out.push(NodeRef::Expr(&item.context_expr));
                push_opt(&mut out, item.optional_vars.as_ref());
            }
            NodeRef::Comprehension(comp) => {
                out.push(NodeRef::Expr(&comp.target));
                out.push(NodeRef::Expr(&comp.iter));
                push_exprs(&mut out, &comp.ifs);
            }
            NodeRef::MatchCase(case) => {
                push_opt(&mut out, case.guard.as_ref());
                push_stmts(&mut out, &case.body);
            }
            NodeRef::UnaryOperator(_) => {}
        }
        out
    }
}

fn stmt_kind(stmt: &Stmt) -> NodeKind {
    match &stmt.kind {
        StmtKind::FunctionDef(def) if def.is_async => NodeKind::AsyncFunctionDef,
        StmtKind::FunctionDef(_) => NodeKind::FunctionDef,
        StmtKind::ClassDef(_) => NodeKind::ClassDef,
        StmtKind::Return { .. } => NodeKind::Return,
        StmtKind::Delete { .. } => NodeKind::Delete,
        StmtKind::Assign { .. } => NodeKind::Assign,
        StmtKind::AugAssign { .. } => NodeKind::AugAssign,
        StmtKind::AnnAssign { .. } => NodeKind::AnnAssign,
        StmtKind::For(f) if f.is_async => NodeKind::AsyncFor,
        StmtKind::For(_) => NodeKind::For,
        StmtKind::While { .. } => NodeKind::While,
        StmtKind::If { .. } => NodeKind::If,
        StmtKind::With(w) if w.is_async => NodeKind::AsyncWith,
        StmtKind::With(_) => NodeKind::With,
        StmtKind::Match { .. } => NodeKind::Match,
        StmtKind::Raise { .. } => NodeKind::Raise,
        StmtKind::Try(t) if t.is_star => NodeKind::TryStar,
        StmtKind::Try(_) => NodeKind::Try,
        StmtKind::Assert { .. } => NodeKind::Assert,
        StmtKind::Import { .. } => NodeKind::Import,
        StmtKind::ImportFrom { .. } => NodeKind::ImportFrom,
        StmtKind::Global { .. } => NodeKind::Global,
        StmtKind::Nonlocal { .. } => NodeKind::Nonlocal,
        StmtKind::Expr { .. } => NodeKind::Expr,
        StmtKind::Pass => NodeKind::Pass,
        StmtKind::Break => NodeKind::Break,
        StmtKind::Continue => NodeKind::Continue,
    }
}

fn expr_kind(expr: &Expr) -> NodeKind {
    match &expr.kind {
        ExprKind::BoolOp { .. } => NodeKind::BoolOp,
        ExprKind::NamedExpr { .. } => NodeKind::NamedExpr,
        ExprKind::BinOp { .. } => NodeKind::BinOp,
        ExprKind::UnaryOp { .. } => NodeKind::UnaryOp,
        ExprKind::Lambda { .. } => NodeKind::Lambda,
        ExprKind::IfExp { .. } => NodeKind::IfExp,
        ExprKind::Dict { .. } => NodeKind::Dict,
        ExprKind::Set { .. } => NodeKind::Set,
        ExprKind::ListComp { .. } => NodeKind::ListComp,
        ExprKind::SetComp { .. } => NodeKind::SetComp,
        ExprKind::DictComp { .. } => NodeKind::DictComp,
        ExprKind::GeneratorExp { .. } => NodeKind::GeneratorExp,
        ExprKind::Await { .. } => NodeKind::Await,
        ExprKind::Yield { .. } => NodeKind::Yield,
        ExprKind::YieldFrom { .. } => NodeKind::YieldFrom,
        ExprKind::Compare { .. } => NodeKind::Compare,
        ExprKind::Call { .. } => NodeKind::Call,
        ExprKind::JoinedStr { .. } => NodeKind::JoinedStr,
        ExprKind::Constant(_) => NodeKind::Constant,
        ExprKind::Attribute { .. } => NodeKind::Attribute,
        ExprKind::Subscript { .. } => NodeKind::Subscript,
        ExprKind::Starred { .. } => NodeKind::Starred,
        ExprKind::Name { .. } => NodeKind::Name,
        ExprKind::List { .. } => NodeKind::List,
        ExprKind::Tuple { .. } => NodeKind::Tuple,
        ExprKind::Slice { .. } => NodeKind::Slice,
        ExprKind::Other { .. } => NodeKind::Other,
    }
}

fn stmt_children<'a>(stmt: &'a Stmt, out: &mut Vec<NodeRef<'a>>) {
    match &stmt.kind {
        StmtKind::FunctionDef(def) => {
            out.push(NodeRef::Arguments(&def.args));
            push_stmts(out, &def.body);
            push_exprs(out, &def.decorator_list);
            push_opt(out, def.returns.as_ref());
        }
        StmtKind::ClassDef(class) => {
            push_exprs(out, &class.bases);
            out.extend(class.keywords.iter().map(NodeRef::Keyword));
            push_stmts(out, &class.body);
            push_exprs(out, &class.decorator_list);
        }
        StmtKind::Return { value } => push_opt(out, value.as_ref()),
        StmtKind::Delete { targets } => push_exprs(out, targets),
        StmtKind::Assign { targets, value } => {
            push_exprs(out, targets);
            out.push(NodeRef::Expr(value));
        }
        StmtKind::AugAssign { target, value } => {
            out.push(NodeRef::Expr(target));
            out.push(NodeRef::Expr(value));
        }
        StmtKind::AnnAssign {
            target,
            annotation,
            value,
        } => {
            out.push(NodeRef::Expr(target));
            out.push(NodeRef::Expr(annotation));
            push_opt(out, value.as_ref());
        }
        StmtKind::For(f) => {
            out.push(NodeRef::Expr(&f.target));
            out.push(NodeRef::Expr(&f.iter));
            push_stmts(out, &f.body);
            push_stmts(out, &f.orelse);
        }
        StmtKind::While { test, body, orelse } | StmtKind::If { test, body, orelse } => {
            out.push(NodeRef::Expr(test));
            push_stmts(out, body);
            push_stmts(out, orelse);
        }
        StmtKind::With(w) => {
            out.extend(w.items.iter().map(NodeRef::WithItem));
            push_stmts(out, &w.body);
        }
        StmtKind::Match { subject, cases } => {
            out.push(NodeRef::Expr(subject));
            out.extend(cases.iter().map(NodeRef::MatchCase));
        }
        StmtKind::Raise { exc, cause } => {
            push_opt(out, exc.as_ref());
            push_opt(out, cause.as_ref());
        }
        StmtKind::Try(t) => {
            push_stmts(out, &t.body);
            out.extend(t.handlers.iter().map(NodeRef::ExceptHandler));
            push_stmts(out, &t.orelse);
            push_stmts(out, &t.finalbody);
        }
        StmtKind::Assert { test, msg } => {
            out.push(NodeRef::Expr(test));
            push_opt(out, msg.as_ref());
        }
        StmtKind::Expr { value } => out.push(NodeRef::Expr(value)),
        StmtKind::Import { .. }
        | StmtKind::ImportFrom { .. }
        | StmtKind::Global { .. }
        | StmtKind::Nonlocal { .. }
        | StmtKind::Pass
        | StmtKind::Break
        | StmtKind::Continue => {}
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<NodeRef<'a>>) {
    match &expr.kind {
        ExprKind::BoolOp { values, .. } => push_exprs(out, values),
        ExprKind::NamedExpr { target, value } => {
            out.push(NodeRef::Expr(target));
            out.push(NodeRef::Expr(value));
        }
        ExprKind::BinOp { left, right, .. } => {
            out.push(NodeRef::Expr(left));
            out.push(NodeRef::Expr(right));
        }
        ExprKind::UnaryOp { op, operand } => {
            out.push(NodeRef::UnaryOperator(*op));
            out.push(NodeRef::Expr(operand));
        }
        ExprKind::Lambda { args, body } => {
            out.push(NodeRef::Arguments(args));
            out.push(NodeRef::Expr(body));
        }
        ExprKind::IfExp { test, body, orelse } => {
            out.push(NodeRef::Expr(test));
            out.push(NodeRef::Expr(body));
            out.push(NodeRef::Expr(orelse));
        }
        ExprKind::Dict { keys, values } => {
            out.extend(keys.iter().flatten().map(NodeRef::Expr));
            push_exprs(out, values);
        }
        ExprKind::Set { elts } | ExprKind::List { elts } | ExprKind::Tuple { elts } => {
            push_exprs(out, elts)
        }
        ExprKind::ListComp { elt, generators }
        | ExprKind::SetComp { elt, generators }
        | ExprKind::GeneratorExp { elt, generators } => {
            out.push(NodeRef::Expr(elt));
            out.extend(generators.iter().map(NodeRef::Comprehension));
        }
        ExprKind::DictComp {
            key,
            value,
            generators,
        } => {
            out.push(NodeRef::Expr(key));
            out.push(NodeRef::Expr(value));
            out.extend(generators.iter().map(NodeRef::Comprehension));
        }
        ExprKind::Await { value }
        | ExprKind::YieldFrom { value }
        | ExprKind::Attribute { value, .. }
        | ExprKind::Starred { value } => out.push(NodeRef::Expr(value)),
        ExprKind::Yield { value } => {
            if let Some(value) = value {
                out.push(NodeRef::Expr(value));
            }
        }
        ExprKind::Compare { left, comparators } => {
            out.push(NodeRef::Expr(left));
            push_exprs(out, comparators);
        }
        ExprKind::Call {
            func,
            args,
            keywords,
        } => {
            out.push(NodeRef::Expr(func));
            push_exprs(out, args);
            out.extend(keywords.iter().map(NodeRef::Keyword));
        }
        ExprKind::JoinedStr { values } => push_exprs(out, values),
        ExprKind::Subscript { value, slice } => {
            out.push(NodeRef::Expr(value));
            out.push(NodeRef::Expr(slice));
        }
        ExprKind::Slice { lower, upper, step } => {
            for part in [lower, upper, step].into_iter().flatten() {
                out.push(NodeRef::Expr(part));
            }
        }
        ExprKind::Other { children } => push_exprs(out, children),
        ExprKind::Constant(_) | ExprKind::Name { .. } => {}
    }
}

fn push_stmts<'a>(out: &mut Vec<NodeRef<'a>>, stmts: &'a [Stmt]) {
    out.extend(stmts.iter().map(NodeRef::Stmt));
}

fn push_exprs<'a>(out: &mut Vec<NodeRef<'a>>, exprs: &'a [Expr]) {
    out.extend(exprs.iter().map(NodeRef::Expr));
}

fn push_opt<'a>(out: &mut Vec<NodeRef<'a>>, expr: Option<&'a Expr>) {
    if let Some(expr) = expr {
        out.push(NodeRef::Expr(expr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(id: &str, line: usize, column: usize) -> Expr {
        Expr::new(
            Position::new(line, column),
            ExprKind::Name { id: id.to_string() },
        )
    }

    #[test]
    fn test_unary_operator_precedes_operand() {
        let expr = Expr::new(
            Position::new(1, 0),
            ExprKind::UnaryOp {
                op: UnaryOp::UAdd,
                operand: Box::new(name("n", 1, 1)),
            },
        );
        let kinds: Vec<_> = NodeRef::Expr(&expr)
            .children()
            .iter()
            .map(|c| c.kind())
            .collect();
        assert_eq!(kinds, vec![NodeKind::UAdd, NodeKind::Name]);
    }

    #[test]
    fn test_dict_visits_keys_before_values() {
        let expr = Expr::new(
            Position::new(1, 0),
            ExprKind::Dict {
                keys: vec![Some(name("a", 1, 1)), None],
                values: vec![name("b", 1, 4), name("c", 1, 9)],
            },
        );
        let ids: Vec<_> = NodeRef::Expr(&expr)
            .children()
            .iter()
            .filter_map(|c| c.as_expr().and_then(|e| e.as_name()))
            .map(str::to_string)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_async_constructs_have_distinct_kinds() {
        let stmt = Stmt::new(
            Position::new(1, 0),
            StmtKind::For(For {
                target: name("x", 1, 10),
                iter: name("xs", 1, 15),
                body: vec![Stmt::new(Position::new(2, 4), StmtKind::Pass)],
                orelse: vec![],
                is_async: true,
            }),
        );
        assert_eq!(NodeRef::Stmt(&stmt).kind(), NodeKind::AsyncFor);
        assert_eq!(NodeRef::Stmt(&stmt).children().len(), 3);
    }
}
