//! Output formatting for check results.
//!
//! - Pretty: `path:line:col: CODE message` per finding, colored, then a summary
//! - JSON: one document for programmatic consumption

use colored::*;
use serde::Serialize;

use crate::runner::FileReport;

#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub files_checked: usize,
    pub total: usize,
    pub findings: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
pub struct JsonFinding<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: usize,
    pub code: &'a str,
    pub message: &'a str,
}

pub fn total_findings(reports: &[FileReport]) -> usize {
    reports.iter().map(|r| r.findings.len()).sum()
}

pub fn json_report(reports: &[FileReport]) -> JsonReport<'_> {
    let findings = reports
        .iter()
        .flat_map(|report| {
            report.findings.iter().map(move |f| JsonFinding {
                file: &report.path,
                line: f.line,
                column: f.column,
                code: &f.code,
                message: &f.message,
            })
        })
        .collect::<Vec<_>>();

    JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        files_checked: reports.len(),
        total: findings.len(),
        findings,
    }
}

/// Write results in JSON format.
pub fn write_json(reports: &[FileReport]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(reports))?;
    println!("{}", json);
    Ok(())
}

/// Write results in pretty (human-readable) format.
pub fn write_pretty(reports: &[FileReport]) {
    for report in reports {
        for f in &report.findings {
            let (code, text) = f
                .message
                .split_once(' ')
                .unwrap_or((f.message.as_str(), ""));
            println!(
                "{}{}{}{}{}{} {} {}",
                report.path.blue(),
                ":".dimmed(),
                f.line,
                ":".dimmed(),
                f.column + 1,
                ":".dimmed(),
                code.red().bold(),
                text
            );
        }
    }

    let total = total_findings(reports);
    let files = reports.len();
    let files_word = if files == 1 { "file" } else { "files" };
    if total == 0 {
        println!(
            "{} {}",
            "✓".green(),
            format!("{} {} checked, no findings", files, files_word).dimmed()
        );
    } else {
        let plural = if total == 1 { "" } else { "s" };
        println!(
            "{} {}",
            "✗".red(),
            format!("{} finding{} in {} {} checked", total, plural, files, files_word).bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Finding;

    fn reports() -> Vec<FileReport> {
        vec![
            FileReport {
                path: "a.py".to_string(),
                findings: vec![],
            },
            FileReport {
                path: "b.py".to_string(),
                findings: vec![Finding {
                    line: 3,
                    column: 4,
                    code: "B011".to_string(),
                    message: "B011 Do not call assert False".to_string(),
                }],
            },
        ]
    }

    #[test]
    fn test_json_report() {
        let reports = reports();
        let value = serde_json::to_value(json_report(&reports)).unwrap();
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["files_checked"], 2);
        assert_eq!(value["total"], 1);
        assert_eq!(value["findings"][0]["file"], "b.py");
        assert_eq!(value["findings"][0]["column"], 4);
        assert_eq!(value["findings"][0]["code"], "B011");
    }
}
