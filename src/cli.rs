//! Command-line interface for bugbear.

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::checker::{CheckerOptions, DEFAULT_MAX_LINE_LENGTH};
use crate::config::{self, Config};
use crate::diagnostics::{Code, DISABLED_BY_DEFAULT};
use crate::report;
use crate::runner::Runner;
use crate::source;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Path argument that reads standard input.
const STDIN_ARG: &str = "-";

/// Finds likely bugs and design problems in Python code.
#[derive(Parser)]
#[command(name = "bugbear")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check Python files
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// List every warning code
    Rules,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Files or directories to check; `-` reads standard input
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Comma-separated code prefixes to select (e.g. B,B9)
    #[arg(long, value_delimiter = ',')]
    pub select: Option<Vec<String>>,

    /// Comma-separated code prefixes to ignore
    #[arg(long, value_delimiter = ',')]
    pub ignore: Option<Vec<String>>,

    /// Maximum line length used by B950
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Path to a configuration file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: Format,
}

fn normalize(codes: Vec<String>) -> Vec<String> {
    codes
        .into_iter()
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Merge configuration and flags; flags win.
pub fn resolve_options(
    args: &CheckArgs,
    config: &Config,
) -> anyhow::Result<(CheckerOptions, Vec<String>)> {
    let max_line_length = args
        .max_line_length
        .or(config.max_line_length)
        .unwrap_or(DEFAULT_MAX_LINE_LENGTH);
    if max_line_length == 0 {
        anyhow::bail!("--max-line-length must be positive");
    }

    // With no selection anywhere the optional codes stay off.
    let select: BTreeSet<String> = args
        .select
        .clone()
        .or_else(|| config.select.clone())
        .map(normalize)
        .unwrap_or_default()
        .into_iter()
        .collect();

    let ignore = normalize(args.ignore.clone().unwrap_or_else(|| config.ignore.clone()));

    Ok((
        CheckerOptions {
            max_line_length,
            select: Some(select),
        },
        ignore,
    ))
}

fn load_config(args: &CheckArgs) -> anyhow::Result<Config> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => config::discover(Path::new(".")),
    };
    match path {
        Some(path) => Ok(Config::parse_file(&path)?),
        None => Ok(Config::default()),
    }
}

/// Collect `*.py` files under `root`, skipping hidden directories and
/// excluded paths.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            !config.is_path_excluded(e.path())
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("py") {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    let config = match load_config(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let (options, ignore) = resolve_options(args, &config)?;
    let runner = Runner::new(options).ignore(ignore);

    let mut files = Vec::new();
    let mut read_stdin = false;
    for path in &args.paths {
        if path.as_os_str() == STDIN_ARG {
            read_stdin = true;
            continue;
        }
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Error: cannot access path {:?}: {}", path, e);
                return Ok(EXIT_ERROR);
            }
        };
        if metadata.is_dir() {
            files.extend(collect_files(path, &config)?);
        } else {
            files.push(path.clone());
        }
    }

    let mut reports = runner.run(&files)?;
    if read_stdin {
        let source = source::load_stdin()?;
        reports.push(runner.check_source(&source));
    }

    match args.format {
        Format::Json => report::write_json(&reports)?,
        Format::Pretty => report::write_pretty(&reports),
    }

    if report::total_findings(&reports) == 0 {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the rules command.
pub fn run_rules() -> anyhow::Result<i32> {
    for code in Code::ALL {
        let optional = if DISABLED_BY_DEFAULT.contains(code) {
            "(optional)"
        } else {
            ""
        };
        println!("{:<6} {:<11} {}", code.as_str(), optional, code.template());
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CheckArgs {
        let mut argv = vec!["bugbear", "check", "x.py"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Check(args) => args,
            Commands::Rules => unreachable!(),
        }
    }

    #[test]
    fn test_defaults_keep_optional_codes_off() {
        let (options, ignore) = resolve_options(&args(&[]), &Config::default()).unwrap();
        assert_eq!(options.max_line_length, DEFAULT_MAX_LINE_LENGTH);
        assert_eq!(options.select, Some(BTreeSet::new()));
        assert!(ignore.is_empty());
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            max_line_length: Some(100),
            select: Some(vec!["B9".to_string()]),
            ignore: vec!["B007".to_string()],
            excluded_paths: vec![],
        };

        let (options, ignore) = resolve_options(&args(&[]), &config).unwrap();
        assert_eq!(options.max_line_length, 100);
        assert_eq!(options.select, Some(BTreeSet::from(["B9".to_string()])));
        assert_eq!(ignore, vec!["B007"]);

        let flags = args(&["--select", "b901, B950", "--ignore=B0", "--max-line-length", "88"]);
        let (options, ignore) = resolve_options(&flags, &config).unwrap();
        assert_eq!(options.max_line_length, 88);
        assert_eq!(
            options.select,
            Some(BTreeSet::from(["B901".to_string(), "B950".to_string()]))
        );
        assert_eq!(ignore, vec!["B0"]);
    }

    #[test]
    fn test_zero_line_length_is_rejected() {
        assert!(resolve_options(&args(&["--max-line-length", "0"]), &Config::default()).is_err());
    }

    #[test]
    fn test_format_flag() {
        assert_eq!(args(&[]).format, Format::Pretty);
        assert_eq!(args(&["--format", "json"]).format, Format::Json);
        assert!(Cli::try_parse_from(["bugbear", "check", "x.py", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_collect_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("pkg/migrations")).unwrap();
        std::fs::create_dir_all(root.join(".venv")).unwrap();
        std::fs::write(root.join("pkg/mod.py"), "").unwrap();
        std::fs::write(root.join("pkg/notes.txt"), "").unwrap();
        std::fs::write(root.join("pkg/migrations/0001.py"), "").unwrap();
        std::fs::write(root.join(".venv/site.py"), "").unwrap();

        let config = Config {
            excluded_paths: vec!["**/migrations".to_string()],
            ..Default::default()
        };
        let files = collect_files(root, &config).unwrap();
        assert_eq!(files, vec![root.join("pkg/mod.py")]);
    }
}
