//! Python syntax tree consumed by the checker.
//!
//! Trees are produced by [`crate::parser`] and never mutated afterwards.
//! Statement and expression shapes mirror Python's `ast` module; traversal
//! goes through [`NodeRef`], which gives every node a [`NodeKind`] and its
//! children in `ast` field order.

mod nodes;
mod visit;

pub use nodes::{
    Arg, Arguments, BoolOp, ClassDef, Comprehension, Constant, ExceptHandler, Expr, ExprKind,
    For, FunctionDef, Keyword, MatchCase, Module, Position, Stmt, StmtKind, Try, UnaryOp, With,
    WithItem,
};
pub use visit::{NodeKind, NodeRef};
