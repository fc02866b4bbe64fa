//! Decoding of Python string literal bodies.

/// Flags carried by a literal's prefix (`r`, `b`, `f`, `u`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringPrefix {
    pub raw: bool,
    pub bytes: bool,
    pub format: bool,
}

impl StringPrefix {
    /// Read the prefix from the opening token, e.g. `rb"""` or `f'`.
    pub fn from_start_token(token: &str) -> Self {
        let mut prefix = Self::default();
        for c in token.chars().take_while(|c| *c != '"' && *c != '\'') {
            match c.to_ascii_lowercase() {
                'r' => prefix.raw = true,
                'b' => prefix.bytes = true,
                'f' => prefix.format = true,
                _ => {}
            }
        }
        prefix
    }
}

/// Process backslash escapes the way Python does for a non-raw literal.
///
/// In byte mode `\x` and octal escapes produce single bytes (kept as
/// `char`s below 256) and `\u`/`\U`/`\N` are left untouched. Named escapes
/// (`\N{...}`) are always kept verbatim.
pub fn unescape(body: &str, bytes: bool) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                let value = if bytes { value & 0xff } else { value };
                out.push(char::from_u32(value).unwrap_or('\u{fffd}'));
            }
            'x' => push_hex(&mut out, &mut chars, 2, 'x'),
            'u' if !bytes => push_hex(&mut out, &mut chars, 4, 'u'),
            'U' if !bytes => push_hex(&mut out, &mut chars, 8, 'U'),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

fn push_hex(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    digits: usize,
    marker: char,
) {
    let mut taken = String::new();
    while taken.len() < digits {
        match chars.peek() {
            Some(d) if d.is_ascii_hexdigit() => {
                taken.push(*d);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = if taken.len() == digits {
        u32::from_str_radix(&taken, 16).ok().and_then(char::from_u32)
    } else {
        None
    };
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(&taken);
        }
    }
}

/// Turn a decoded byte-literal body into bytes.
pub fn to_bytes(decoded: &str) -> Vec<u8> {
    decoded
        .chars()
        .flat_map(|c| match u8::try_from(u32::from(c)) {
            Ok(b) => vec![b],
            Err(_) => c.to_string().into_bytes(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_flags() {
        assert_eq!(
            StringPrefix::from_start_token("Rb'"),
            StringPrefix {
                raw: true,
                bytes: true,
                format: false
            }
        );
        assert!(StringPrefix::from_start_token("f\"\"\"").format);
        assert_eq!(StringPrefix::from_start_token("'"), StringPrefix::default());
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r"a\tb\n", false), "a\tb\n");
        assert_eq!(unescape(r"\'\\", false), "'\\");
        assert_eq!(unescape(r"\x41\101", false), "AA");
        assert_eq!(unescape(r"\u00e9", false), "é");
    }

    #[test]
    fn test_unknown_escape_is_kept() {
        assert_eq!(unescape(r"\d+", false), "\\d+");
        assert_eq!(unescape(r"\u00e9", true), "\\u00e9");
    }

    #[test]
    fn test_line_continuation_is_removed() {
        assert_eq!(unescape("ab\\\ncd", false), "abcd");
    }

    #[test]
    fn test_to_bytes() {
        assert_eq!(to_bytes(&unescape(r"\xff\x00a", true)), vec![0xff, 0x00, b'a']);
    }
}
