//! Reading Python source files.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::warn;

const BOM: char = '\u{feff}';

/// Name reported for source read from standard input.
pub const STDIN_NAME: &str = "stdin";

/// One input file, decoded.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub text: String,
    /// Physical lines with their terminators.
    pub lines: Vec<String>,
}

impl Source {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(file = %name, "source is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        let text = match text.strip_prefix(BOM) {
            Some(rest) => rest.to_string(),
            None => text,
        };
        let lines = split_lines(&text);
        Self { name, text, lines }
    }
}

/// Split into physical lines, keeping `\n`, `\r\n` and lone `\r` endings.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(text[start..=i].to_string());
                start = i + 1;
            }
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => {
                lines.push(text[start..=i].to_string());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        lines.push(text[start..].to_string());
    }
    lines
}

/// Read a file from disk.
pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Source> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    Ok(Source::from_bytes(path.display().to_string(), bytes))
}

/// Read all of standard input.
pub fn load_stdin() -> io::Result<Source> {
    let mut bytes = Vec::new();
    io::stdin().lock().read_to_end(&mut bytes)?;
    Ok(Source::from_bytes(STDIN_NAME, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_keep_terminators() {
        assert_eq!(split_lines("a\nb\r\nc"), vec!["a\n", "b\r\n", "c"]);
        assert_eq!(split_lines("a\rb\n"), vec!["a\r", "b\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_bom_is_stripped() {
        let source = Source::from_bytes("x.py", "\u{feff}x = 1\n".as_bytes().to_vec());
        assert_eq!(source.text, "x = 1\n");
        assert_eq!(source.lines, vec!["x = 1\n"]);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let source = Source::from_bytes("x.py", b"s = '\xff'\n".to_vec());
        assert_eq!(source.text, "s = '\u{fffd}'\n");
    }

    #[test]
    fn test_load_from_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mod.py");
        std::fs::write(&path, "import os\nprint(os)\n").unwrap();

        let source = load(&path).unwrap();
        assert_eq!(source.name, path.display().to_string());
        assert_eq!(source.lines.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load("/definitely/not/here.py").is_err());
    }
}
