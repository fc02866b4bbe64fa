//! Line-based checks (B950).

use crate::ast::Position;
use crate::diagnostics::{Code, Diagnostic};

/// Length of a line in characters, without its terminator.
fn line_length(line: &str) -> usize {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.chars().count()
}

/// Flag lines more than 10% over `max_line_length`.
pub fn scan(lines: &[String], max_line_length: usize) -> Vec<Diagnostic> {
    let limit = max_line_length as f64 * 1.1;
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let length = line_length(line);
            if (length as f64) <= limit {
                return None;
            }
            Some(Diagnostic::new(
                Position::new(index + 1, length),
                Code::B950,
                vec![length.to_string(), max_line_length.to_string()],
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(len: usize) -> String {
        format!("{}\n", "x".repeat(len))
    }

    #[test]
    fn test_threshold() {
        // 1.1 * 79 = 86.9
        assert!(scan(&[line(79)], 79).is_empty());
        assert!(scan(&[line(86)], 79).is_empty());
        let diagnostics = scan(&[line(87)], 79);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].vars, vec!["87", "79"]);
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (1, 87));
    }

    #[test]
    fn test_crlf_and_multibyte_lengths() {
        assert_eq!(line_length("abc\r\n"), 3);
        assert_eq!(line_length("é"), 1);
        let long = format!("{}\r\n", "é".repeat(12));
        let diagnostics = scan(&[String::from("short\n"), long], 10);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].column, 12);
    }
}
