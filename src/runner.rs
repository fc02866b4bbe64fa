//! Checks a set of files and collects their findings.

use std::path::PathBuf;

use anyhow::Context as _;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::checker::{BugBearChecker, CheckerOptions};
use crate::diagnostics::Finding;
use crate::parser::{ParseError, PythonParser};
use crate::source::{self, Source};

/// Findings for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub findings: Vec<Finding>,
}

/// Parses and checks files, applying the `ignore` list to the results.
pub struct Runner {
    checker: BugBearChecker,
    ignore: Vec<String>,
}

impl Runner {
    pub fn new(options: CheckerOptions) -> Self {
        Self {
            checker: BugBearChecker::new(options),
            ignore: Vec::new(),
        }
    }

    /// Code prefixes to drop from every report.
    pub fn ignore(mut self, prefixes: Vec<String>) -> Self {
        self.ignore = prefixes;
        self
    }

    fn is_ignored(&self, finding: &Finding) -> bool {
        self.ignore
            .iter()
            .any(|prefix| !prefix.is_empty() && finding.code.starts_with(prefix.as_str()))
    }

    /// Check already loaded source. A file that does not parse yields a
    /// single E999 finding.
    pub fn check_source(&self, source: &Source) -> FileReport {
        let findings = match PythonParser::new().parse(&source.text) {
            Ok(module) => self.checker.run(&module, &source.lines),
            Err(ParseError::Syntax { line, column }) => {
                warn!(file = %source.name, line, column, "syntax error");
                vec![Finding::syntax_error(line, column)]
            }
            Err(err) => {
                warn!(file = %source.name, error = %err, "could not parse");
                vec![Finding::syntax_error(1, 0)]
            }
        };

        let total = findings.len();
        let findings: Vec<Finding> = findings
            .into_iter()
            .filter(|f| !self.is_ignored(f))
            .collect();
        debug!(
            file = %source.name,
            findings = findings.len(),
            ignored = total - findings.len(),
            "checked"
        );

        FileReport {
            path: source.name.clone(),
            findings,
        }
    }

    /// Check files in parallel. Reports are sorted by path.
    pub fn run(&self, files: &[PathBuf]) -> anyhow::Result<Vec<FileReport>> {
        let mut reports = files
            .par_iter()
            .map(|path| -> anyhow::Result<FileReport> {
                let source = source::load(path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                Ok(self.check_source(&source))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        reports.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(reports)
    }
}
