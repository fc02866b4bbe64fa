//! Diagnostics: raw positioned codes and their rendered form.

pub mod builtins;
pub mod catalog;

use serde::Serialize;

use crate::ast::Position;
pub use catalog::{Code, DISABLED_BY_DEFAULT};

/// A code at a position, with the values its template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-indexed.
    pub line: usize,
    /// 0-indexed.
    pub column: usize,
    pub code: Code,
    pub vars: Vec<String>,
}

impl Diagnostic {
    pub fn new(pos: Position, code: Code, vars: Vec<String>) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
            code,
            vars,
        }
    }

    /// The message text, prefixed with the code.
    pub fn message(&self) -> String {
        format!("{} {}", self.code, render(self.code.template(), &self.vars))
    }

    pub fn into_finding(self) -> Finding {
        Finding {
            message: self.message(),
            line: self.line,
            column: self.column,
            code: self.code.as_str().to_string(),
        }
    }
}

/// A diagnostic as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub line: usize,
    pub column: usize,
    pub code: String,
    pub message: String,
}

impl Finding {
    /// Finding for a file that could not be parsed.
    pub fn syntax_error(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            code: "E999".to_string(),
            message: "E999 SyntaxError: invalid syntax".to_string(),
        }
    }
}

/// Fill `{}`, `{N}` and `{!r}` placeholders from `vars`.
///
/// Placeholders without a value are left as written.
pub fn render(template: &str, vars: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut next_auto = 0;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let field = &rest[open + 1..open + close];
        let (index, conversion) = match field.split_once('!') {
            Some((index, conversion)) => (index, Some(conversion)),
            None => (field, None),
        };
        let index = if index.is_empty() {
            next_auto += 1;
            Some(next_auto - 1)
        } else {
            index.parse::<usize>().ok()
        };

        match index.and_then(|i| vars.get(i)) {
            Some(value) if conversion == Some("r") => out.push_str(&python_repr(value)),
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..=open + close]),
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Python's `repr()` of a `str`.
pub fn python_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_render_positional_and_indexed() {
        assert_eq!(render("{} > {}", &vars(&["90", "79"])), "90 > 79");
        assert_eq!(
            render("except {0}: not ({0},)", &vars(&["ValueError"])),
            "except ValueError: not (ValueError,)"
        );
        assert_eq!(render("({0}){1} -> {2}{1}", &vars(&["A, B", " as e", "B"])), "(A, B) as e -> B as e");
    }

    #[test]
    fn test_render_repr_conversion() {
        assert_eq!(render("variable {!r} unused", &vars(&["i"])), "variable 'i' unused");
    }

    #[test]
    fn test_render_missing_value_is_kept() {
        assert_eq!(render("x {} y", &[]), "x {} y");
    }

    #[test]
    fn test_python_repr_quoting() {
        assert_eq!(python_repr("self"), "'self'");
        assert_eq!(python_repr("it's"), "\"it's\"");
        assert_eq!(python_repr("a'b\"c"), "'a\\'b\"c'");
        assert_eq!(python_repr("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_message_is_prefixed_with_code() {
        let diagnostic = Diagnostic::new(Position::new(3, 4), Code::B950, vars(&["90", "79"]));
        assert_eq!(diagnostic.message(), "B950 line too long (90 > 79 characters)");
        let finding = diagnostic.into_finding();
        assert_eq!((finding.line, finding.column), (3, 4));
        assert_eq!(finding.code, "B950");
    }
}
