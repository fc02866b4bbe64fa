//! bugbear - finds likely bugs and design problems in Python code.
//!
//! Each file is parsed with tree-sitter, lowered into a Python-`ast`-shaped
//! tree, walked once in pre-order with every node dispatched to the checks
//! registered for its construct, and finally scanned line by line.
//! Diagnostics carry stable codes (`B001`..`B017`, optional `B9xx`).
//!
//! # Architecture
//!
//! - `ast`: syntax tree types and uniform traversal
//! - `parser`: tree-sitter-python to `ast` lowering
//! - `checker`: tree walk, rule checks, line scanner and selection gate
//! - `diagnostics`: code catalog, message templates, built-in exception table
//! - `source`: reading and decoding input files
//! - `config`: YAML configuration file
//! - `runner`: checks many files in parallel
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line interface

pub mod ast;
pub mod checker;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod parser;
pub mod report;
pub mod runner;
pub mod source;

use once_cell::sync::OnceCell;

pub use checker::{BugBearChecker, CheckerOptions, DEFAULT_MAX_LINE_LENGTH};
pub use config::{Config, ConfigError};
pub use diagnostics::{Code, Diagnostic, Finding};
pub use parser::{parse_module, ParseError, PythonParser};
pub use runner::{FileReport, Runner};
pub use source::Source;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging to stderr.
///
/// Only installs a subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=bugbear=debug`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
