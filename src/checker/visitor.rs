//! The tree walk.
//!
//! One depth-first, pre-order pass over the module. Each node is pushed on
//! the ancestor stack and appended to the recent-node window, the checks
//! registered for its kind run, then its children are visited in `ast`
//! field order.

use std::collections::VecDeque;

use tracing::debug;

use super::rules;
use crate::ast::{Module, NodeRef};
use crate::diagnostics::Diagnostic;

/// Number of most recently entered nodes kept in the window.
pub const WINDOW_SIZE: usize = 4;

/// Per-run traversal state handed to every check.
pub struct Context<'a> {
    stack: Vec<NodeRef<'a>>,
    window: VecDeque<NodeRef<'a>>,
    lines: &'a [String],
    diagnostics: Vec<Diagnostic>,
}

/// Walk `module` and return the diagnostics of every tree-based check, in
/// the order they were found.
pub fn walk<'a>(module: &'a Module, lines: &'a [String]) -> Vec<Diagnostic> {
    let mut ctx = Context::new(lines);
    ctx.visit(NodeRef::Module(module));
    ctx.diagnostics
}

impl<'a> Context<'a> {
    fn new(lines: &'a [String]) -> Self {
        Self {
            stack: Vec::new(),
            window: VecDeque::with_capacity(WINDOW_SIZE),
            lines,
            diagnostics: Vec::new(),
        }
    }

    fn visit(&mut self, node: NodeRef<'a>) {
        self.stack.push(node);
        if self.window.len() == WINDOW_SIZE {
            self.window.pop_front();
        }
        self.window.push_back(node);

        rules::dispatch(node, self);

        for child in node.children() {
            self.visit(child);
        }
        self.stack.pop();
    }

    /// Parent of the node being checked.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.stack.iter().rev().nth(1).copied()
    }

    /// Ancestors of the node being checked, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        self.stack.iter().rev().skip(1).copied()
    }

    /// The last nodes entered, oldest first; includes the current node.
    pub fn window(&self) -> &VecDeque<NodeRef<'a>> {
        &self.window
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.line > self.lines.len() {
            debug!(
                code = %diagnostic.code,
                line = diagnostic.line,
                "dropping diagnostic past the last source line"
            );
            return;
        }
        self.diagnostics.push(diagnostic);
    }
}
