//! Escaping rules of Android `strings.xml` text content.
//!
//! The text stored inside a `<string>` element is not the value the user sees:
//! Android collapses whitespace outside double quotes, strips the quotes
//! themselves and resolves a small set of backslash escapes. [`decode`] turns
//! storage text into the logical value shown to translators and [`encode`]
//! turns an edited value back into storage text.
//!
//! ```rust
//! use aresource::escape::{decode, encode};
//!
//! let decoded = decode(Some("\"Hello   %s\"\\n"), "greeting")?;
//! assert_eq!(decoded.value.as_deref(), Some("Hello   %s\n"));
//! assert!(decoded.formatted);
//!
//! assert_eq!(encode(Some("It's\n")).as_deref(), Some("It\\'s\\n"));
//! # Ok::<(), aresource::error::EscapeError>(())
//! ```

use std::str::Chars;

use serde::Serialize;

use crate::error::EscapeError;

/// Whitespace that is collapsed outside quoted spans.
pub const COLLAPSIBLE_WHITESPACE: [char; 3] = [' ', '\n', '\t'];

const ESCAPE: char = '\\';
const QUOTE: char = '"';
const FORMAT_MARKER: char = '%';
/// A leading `@` marks a resource reference (`@string/foo`).
const RESOURCE_REFERENCE: char = '@';
const UNICODE_DIGITS: usize = 4;

/// Result of [`decode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Decoded {
    /// The logical value, `None` when the resource had no text at all.
    pub value: Option<String>,
    /// Whether an unescaped `%` was directly followed by another character.
    pub formatted: bool,
}

/// Removes Android escaping from the storage text of a resource.
///
/// `context_id` is the `name` of the owning resource and only ends up in
/// error messages.
pub fn decode(text: Option<&str>, context_id: &str) -> Result<Decoded, EscapeError> {
    let Some(text) = text else {
        return Ok(Decoded::default());
    };

    // Literal angle brackets stay distinguishable from real markup once the
    // value is embedded in markup-bearing output again.
    let text = text.replace('<', "&lt;").replace('>', "&gt;");

    let mut scanner = Scanner::new(context_id, text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        scanner.step(c, &mut chars)?;
    }
    Ok(scanner.finish())
}

/// Escapes a logical value for storage in a `<string>` element.
///
/// No quotes are added, so leading or trailing whitespace that was only
/// significant because it was quoted does not survive a round trip.
pub fn encode(logical: Option<&str>) -> Option<String> {
    let logical = logical?;
    let mut escaped = logical
        .replace(ESCAPE, "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\'', "\\'")
        .replace(QUOTE, "\\\"");
    if escaped.starts_with(RESOURCE_REFERENCE) {
        escaped.insert(0, ESCAPE);
    }
    Some(escaped)
}

fn is_collapsible(c: char) -> bool {
    COLLAPSIBLE_WHITESPACE.contains(&c)
}

/// Forward-only decoder state. Reads one input character at a time and
/// appends to its own output buffer.
struct Scanner<'a> {
    context: &'a str,
    out: String,
    /// Raw whitespace seen since the last non-whitespace character.
    run: String,
    /// Byte ranges of runs kept verbatim inside the currently open quote.
    quoted_runs: Vec<(usize, usize)>,
    quote_active: bool,
    escape_active: bool,
    percent_active: bool,
    formatted: bool,
}

impl<'a> Scanner<'a> {
    fn new(context: &'a str, capacity: usize) -> Self {
        Scanner {
            context,
            out: String::with_capacity(capacity),
            run: String::new(),
            quoted_runs: Vec::new(),
            quote_active: false,
            escape_active: false,
            percent_active: false,
            formatted: false,
        }
    }

    fn step(&mut self, c: char, rest: &mut Chars<'_>) -> Result<(), EscapeError> {
        if self.escape_active {
            self.escape_active = false;
            return self.resolve_escape(c, rest);
        }

        if c == FORMAT_MARKER {
            self.percent_active = !self.percent_active;
        } else if self.percent_active {
            self.formatted = true;
            self.percent_active = false;
        }

        if is_collapsible(c) {
            self.run.push(c);
            return Ok(());
        }
        self.flush_run(false);

        match c {
            QUOTE => {
                self.quote_active = !self.quote_active;
                // Only the span that is still open can end up unterminated.
                self.quoted_runs.clear();
            }
            ESCAPE => self.escape_active = true,
            _ => self.out.push(c),
        }
        Ok(())
    }

    fn resolve_escape(&mut self, c: char, rest: &mut Chars<'_>) -> Result<(), EscapeError> {
        match c {
            'n' => self.out.push('\n'),
            't' => self.out.push('\t'),
            '"' | '\'' | '@' | ESCAPE => self.out.push(c),
            'u' => {
                let digits: String = rest.by_ref().take(UNICODE_DIGITS).collect();
                let ch = parse_unicode_escape(&digits).ok_or_else(|| {
                    EscapeError::MalformedUnicode {
                        context: self.context.to_string(),
                        digits: digits.clone(),
                    }
                })?;
                self.out.push(ch);
            }
            _ => {
                return Err(EscapeError::Unsupported {
                    context: self.context.to_string(),
                    sequence: format!("{ESCAPE}{c}"),
                });
            }
        }
        Ok(())
    }

    /// Emits the pending whitespace run. Outside quotes (and at the end of
    /// input) any run becomes one plain space.
    fn flush_run(&mut self, at_end: bool) {
        if self.run.is_empty() {
            return;
        }
        if self.quote_active && !at_end {
            self.quoted_runs.push((self.out.len(), self.run.len()));
            self.out.push_str(&self.run);
        } else {
            self.out.push(' ');
        }
        self.run.clear();
    }

    fn finish(mut self) -> Decoded {
        self.flush_run(true);

        // Android collapses whitespace behind a quote that never closes.
        if self.quote_active {
            for &(start, len) in self.quoted_runs.iter().rev() {
                self.out.replace_range(start..start + len, " ");
            }
        }

        if self.escape_active {
            self.out.push(ESCAPE);
        }

        Decoded {
            value: Some(self.out),
            formatted: self.formatted,
        }
    }
}

/// Resolves the digits of a `\u` escape. Missing digits at the end of the
/// input are filled with leading zeros.
fn parse_unicode_escape(digits: &str) -> Option<char> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let padded = format!("{digits:0>width$}", width = UNICODE_DIGITS);
    u32::from_str_radix(&padded, 16)
        .ok()
        .and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> String {
        decode(Some(text), "test").unwrap().value.unwrap()
    }

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(value("a   b"), "a b");
        assert_eq!(value("a \n\t b"), "a b");
        assert_eq!(value("  a  "), " a ");
    }

    #[test]
    fn test_single_tab_or_newline_becomes_space() {
        assert_eq!(value("a\tb"), "a b");
        assert_eq!(value("a\nb"), "a b");
        assert_eq!(value("a b"), "a b");
        assert_eq!(value("a\n"), "a ");
    }

    #[test]
    fn test_quotes_preserve_whitespace() {
        assert_eq!(value("\"a   b\""), "a   b");
        assert_eq!(value("\"a\tb\""), "a\tb");
        assert_eq!(value("x \"  \" y"), "x    y");
    }

    #[test]
    fn test_unterminated_quote_collapses() {
        assert_eq!(value("\"a   b"), "a b");
        assert_eq!(value("\"a  "), "a ");
        assert_eq!(value("\"a\tb"), "a b");
    }

    #[test]
    fn test_closed_quote_keeps_whitespace_when_later_quote_is_unterminated() {
        assert_eq!(value("\"a   b\" \"c"), "a   b c");
        assert_eq!(value("\"x\ty\" \"z"), "x\ty z");
        assert_eq!(value("\"a  b\" \"c   d"), "a  b c d");
    }

    #[test]
    fn test_run_after_closed_quote_collapses() {
        assert_eq!(value("\"a\"   b"), "a b");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(value("a\\nb"), "a\nb");
        assert_eq!(value("a\\tb"), "a\tb");
        assert_eq!(value("\\@foo"), "@foo");
        assert_eq!(value("It\\'s"), "It's");
        assert_eq!(value("say \\\"hi\\\""), "say \"hi\"");
        assert_eq!(value("back\\\\slash"), "back\\slash");
    }

    #[test]
    fn test_escaped_whitespace_is_not_collapsed() {
        assert_eq!(value("a\\n\\nb"), "a\n\nb");
        assert_eq!(value("a \\n b"), "a \n b");
    }

    #[test]
    fn test_escaped_quote_does_not_toggle_quoting() {
        assert_eq!(value("\\\"a   b"), "\"a b");
    }

    #[test]
    fn test_double_backslash_closes_escape() {
        assert_eq!(value("\\\\n"), "\\n");
        assert_eq!(value("\\\\\"a  b\""), "\\a  b");
    }

    #[test]
    fn test_trailing_backslash_is_kept() {
        assert_eq!(value("a\\"), "a\\");
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(value("\\u0041"), "A");
        assert_eq!(value("\\u00e9t\\u00e9"), "été");
        assert_eq!(value("x\\u41"), "xA");
        assert_eq!(value("\\u"), "\0");
        assert_eq!(value("\\u00201"), " 1");
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = decode(Some("\\u00zz"), "bad").unwrap_err();
        assert_eq!(
            err,
            EscapeError::MalformedUnicode {
                context: "bad".to_string(),
                digits: "00zz".to_string(),
            }
        );
        assert!(decode(Some("\\u+041"), "bad").is_err());
        assert!(decode(Some("\\u 041"), "bad").is_err());
        assert!(decode(Some("\\ud800"), "bad").is_err());
    }

    #[test]
    fn test_unsupported_escape() {
        let err = decode(Some("a\\qb"), "str1").unwrap_err();
        assert_eq!(
            err,
            EscapeError::Unsupported {
                context: "str1".to_string(),
                sequence: "\\q".to_string(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("str1"));
        assert!(message.contains("\\q"));
    }

    #[test]
    fn test_angle_brackets_become_entities() {
        assert_eq!(value("a < b > c"), "a &lt; b &gt; c");
    }

    #[test]
    fn test_format_detection() {
        assert!(decode(Some("%s items"), "f").unwrap().formatted);
        assert!(decode(Some("%1$d of %2$d"), "f").unwrap().formatted);
        assert!(decode(Some("100% sure"), "f").unwrap().formatted);
        assert!(!decode(Some("plain"), "f").unwrap().formatted);
        assert!(!decode(Some("100%"), "f").unwrap().formatted);
        assert!(!decode(Some("100%%"), "f").unwrap().formatted);
        assert!(!decode(Some("%%d"), "f").unwrap().formatted);
    }

    #[test]
    fn test_format_flag_does_not_change_text() {
        let decoded = decode(Some("%d  items"), "f").unwrap();
        assert_eq!(decoded.value.as_deref(), Some("%d items"));
        assert!(decoded.formatted);
    }

    #[test]
    fn test_absent_text() {
        assert_eq!(
            decode(None, "id").unwrap(),
            Decoded {
                value: None,
                formatted: false,
            }
        );
        assert_eq!(encode(None), None);
    }

    #[test]
    fn test_decoded_serializes() {
        let decoded = decode(Some("%s"), "j").unwrap();
        assert_eq!(
            serde_json::to_value(&decoded).unwrap(),
            serde_json::json!({ "value": "%s", "formatted": true })
        );
    }

    #[test]
    fn test_empty_text_is_not_absent() {
        assert_eq!(decode(Some(""), "id").unwrap().value.as_deref(), Some(""));
        assert_eq!(encode(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn test_encode_substitutions() {
        assert_eq!(encode(Some("Line1\nLine2")).unwrap(), "Line1\\nLine2");
        assert_eq!(encode(Some("a\tb")).unwrap(), "a\\tb");
        assert_eq!(encode(Some("It's")).unwrap(), "It\\'s");
        assert_eq!(encode(Some("\"q\"")).unwrap(), "\\\"q\\\"");
        assert_eq!(encode(Some("c:\\dir")).unwrap(), "c:\\\\dir");
    }

    #[test]
    fn test_encode_backslash_before_generated_escapes() {
        assert_eq!(encode(Some("\\\n")).unwrap(), "\\\\\\n");
    }

    #[test]
    fn test_encode_leading_at() {
        assert_eq!(encode(Some("@mipmap/icon")).unwrap(), "\\@mipmap/icon");
        assert_eq!(encode(Some("mail@example.com")).unwrap(), "mail@example.com");
    }

    #[test]
    fn test_escaped_values_decode_back() {
        for logical in ["It's \"quoted\"", "a\\b", "@ref", "tab\there", "x\ny"] {
            let escaped = encode(Some(logical));
            let decoded = decode(escaped.as_deref(), "rt").unwrap();
            assert_eq!(decoded.value.as_deref(), Some(logical));
        }
    }
}
