//! The bugbear checker: walks a parsed module, scans its lines and reports
//! the diagnostics that pass the selection gate.
//!
//! - `visitor`: the tree walk with its ancestor stack and node window
//! - `rules`: the individual checks, dispatched by node kind
//! - `names`: name-reference collection used by several rules
//! - `lines`: physical-line checks
//! - `gate`: selection of opt-in codes

mod gate;
mod lines;
mod names;
mod rules;
mod visitor;

use std::collections::BTreeSet;

use crate::ast::Module;
use crate::diagnostics::{Diagnostic, Finding};

pub use gate::Gate;
pub use names::NameFinder;
pub use visitor::{walk, Context, WINDOW_SIZE};

/// Default for [`CheckerOptions::max_line_length`].
pub const DEFAULT_MAX_LINE_LENGTH: usize = 79;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerOptions {
    pub max_line_length: usize,
    /// Selected code prefixes. `None` means nothing was configured, in which
    /// case opt-in codes are reported too.
    pub select: Option<BTreeSet<String>>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            select: None,
        }
    }
}

pub struct BugBearChecker {
    options: CheckerOptions,
}

impl BugBearChecker {
    pub fn new(options: CheckerOptions) -> Self {
        Self { options }
    }

    /// Check one module. `lines` are its physical lines, terminators kept.
    ///
    /// Tree diagnostics come first in walk order, then line diagnostics.
    pub fn run(&self, module: &Module, lines: &[String]) -> Vec<Finding> {
        let mut diagnostics = walk(module, lines);
        diagnostics.extend(lines::scan(lines, self.options.max_line_length));

        let mut gate = Gate::new(self.options.select.as_ref());
        diagnostics
            .into_iter()
            .filter(|d| gate.admit(d.code))
            .map(Diagnostic::into_finding)
            .collect()
    }
}
