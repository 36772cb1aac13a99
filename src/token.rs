//! Template tokenizer.
//!
//! [`Tokens`] scans a template into a flat stream of [`Token`]s. Each token
//! carries the literal text that precedes it and, optionally, one field
//! reference split into name, conversion and spec:
//!
//! ```text
//! "Hello {name!r:>8}, bye"
//!  └─────┘└──────────┘└───┘
//!   text   field        trailing text-only token
//! ```
//!
//! The tokenizer does not know about sections. It only classifies each field's
//! marker prefix (see [`MarkerTable`]); pairing start and end markers is the
//! [`Formatter`](crate::Formatter)'s job.
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{Marker, MarkerTable, Tokens};
//!
//! let markers = MarkerTable::default();
//! let tokens: Vec<_> = Tokens::with_markers("a{#s}b{/s}c", &markers)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].marker, Some(Marker::StartSection));
//! assert_eq!(tokens[1].text, "b");
//! assert_eq!(tokens[2].text, "c");
//! assert_eq!(tokens[2].field, None);
//! ```

use crate::{Error, Marker, MarkerTable, Result};
use std::borrow::Cow;

/// One piece of a template: literal text followed by an optional field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'t> {
    /// Literal text before the field, with `{{` and `}}` unescaped.
    pub text: Cow<'t, str>,
    /// Field name without its marker prefix.
    pub field: Option<&'t str>,
    /// Field name as written, marker prefix included.
    pub raw_field: Option<&'t str>,
    pub marker: Option<Marker>,
    /// Format spec; may itself contain field references.
    pub spec: &'t str,
    pub conversion: Option<char>,
}

impl<'t> Token<'t> {
    /// Creates a token that carries only literal text.
    #[must_use]
    pub fn literal(text: impl Into<Cow<'t, str>>) -> Self {
        Token {
            text: text.into(),
            field: None,
            raw_field: None,
            marker: None,
            spec: "",
            conversion: None,
        }
    }

    /// Removes one trailing `\n` from this token's literal text.
    #[must_use]
    pub fn without_trailing_newline(mut self) -> Self {
        self.text = strip_trailing_newline(self.text);
        self
    }
}

fn strip_trailing_newline(text: Cow<'_, str>) -> Cow<'_, str> {
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_suffix('\n').unwrap_or(s)),
        Cow::Owned(mut s) => {
            if s.ends_with('\n') {
                s.pop();
            }
            Cow::Owned(s)
        }
    }
}

/// A lazy token stream over a template string.
///
/// The stream is fused after the first error. It is `Clone`, so a stream can be
/// restarted from any point by cloning it.
#[derive(Clone, Debug)]
pub struct Tokens<'t, 'm> {
    input: &'t str,
    position: usize,
    markers: Option<&'m MarkerTable>,
    failed: bool,
}

impl<'t> Tokens<'t, 'static> {
    /// Tokenizes `input` without marker classification.
    ///
    /// Every field is a plain substitution; this is how format specs are scanned.
    #[must_use]
    pub fn new(input: &'t str) -> Self {
        Tokens {
            input,
            position: 0,
            markers: None,
            failed: false,
        }
    }
}

impl<'t, 'm> Tokens<'t, 'm> {
    /// Tokenizes `input`, classifying field prefixes with `markers`.
    #[must_use]
    pub fn with_markers(input: &'t str, markers: &'m MarkerTable) -> Self {
        Tokens {
            input,
            position: 0,
            markers: Some(markers),
            failed: false,
        }
    }

    fn next_token(&mut self) -> Result<Token<'t>> {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.position;
        let mut unescaped: Option<String> = None;
        let mut run_start = start;
        let mut i = start;

        while i < bytes.len() {
            match bytes[i] {
                brace @ (b'{' | b'}') if bytes.get(i + 1) == Some(&brace) => {
                    // Doubled brace: keep one of the pair
                    unescaped
                        .get_or_insert_with(String::new)
                        .push_str(&input[run_start..=i]);
                    i += 2;
                    run_start = i;
                }
                b'{' => {
                    if i + 1 == bytes.len() {
                        return Err(Error::single_brace('{', i));
                    }
                    let text = finish_text(input, start, run_start, i, unescaped);
                    let close = find_field_end(bytes, i)?;
                    self.position = close + 1;
                    return self.field_token(text, &input[i + 1..close]);
                }
                b'}' => return Err(Error::single_brace('}', i)),
                _ => i += 1,
            }
        }

        self.position = bytes.len();
        Ok(Token::literal(finish_text(
            input,
            start,
            run_start,
            bytes.len(),
            unescaped,
        )))
    }

    fn field_token(&self, text: Cow<'t, str>, body: &'t str) -> Result<Token<'t>> {
        if let Some(markers) = self.markers {
            if let (Some(Marker::Comment), comment) = markers.classify(body) {
                return Ok(Token {
                    text,
                    field: Some(comment),
                    raw_field: Some(body),
                    marker: Some(Marker::Comment),
                    spec: "",
                    conversion: None,
                });
            }
        }

        let (raw_field, conversion, spec) = split_field(body)?;
        let (marker, field) = match self.markers {
            Some(markers) => markers.classify(raw_field),
            None => (None, raw_field),
        };

        Ok(Token {
            text,
            field: Some(field),
            raw_field: Some(raw_field),
            marker,
            spec,
            conversion,
        })
    }
}

impl<'t, 'm> Iterator for Tokens<'t, 'm> {
    type Item = Result<Token<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.input.len() {
            return None;
        }

        match self.next_token() {
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_, '_> {}

fn finish_text<'t>(
    input: &'t str,
    start: usize,
    run_start: usize,
    end: usize,
    unescaped: Option<String>,
) -> Cow<'t, str> {
    match unescaped {
        Some(mut text) => {
            text.push_str(&input[run_start..end]);
            Cow::Owned(text)
        }
        None => Cow::Borrowed(&input[start..end]),
    }
}

/// Finds the `}` matching the `{` at `open`, counting nested braces.
fn find_field_end(bytes: &[u8], open: usize) -> Result<usize> {
    let mut depth = 1usize;
    for (offset, &byte) in bytes[open + 1..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + 1 + offset);
                }
            }
            _ => {}
        }
    }
    Err(Error::UnterminatedField { offset: open })
}

/// Splits a field body into name, conversion and spec.
///
/// `:` and `!` inside `[...]` belong to the name.
fn split_field(body: &str) -> Result<(&str, Option<char>, &str)> {
    let mut in_brackets = false;

    for (idx, ch) in body.char_indices() {
        match ch {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            ':' if !in_brackets => return Ok((&body[..idx], None, &body[idx + 1..])),
            '!' if !in_brackets => {
                let mut rest = body[idx + 1..].chars();
                let conversion = rest.next().ok_or_else(|| Error::MissingConversion {
                    field: body.to_string(),
                })?;
                let after = rest.as_str();
                let spec = if after.is_empty() {
                    ""
                } else {
                    after.strip_prefix(':').ok_or_else(|| Error::ExpectedColon {
                        field: body.to_string(),
                    })?
                };
                return Ok((&body[..idx], Some(conversion), spec));
            }
            _ => {}
        }
    }

    Ok((body, None, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token<'_>> {
        static MARKERS: std::sync::OnceLock<MarkerTable> = std::sync::OnceLock::new();
        let markers = MARKERS.get_or_init(MarkerTable::default);
        Tokens::with_markers(input, markers)
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_plain_text() {
        let tokens = tokenize("just text");
        assert_eq!(tokens, vec![Token::literal("just text")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_field_parts() {
        let tokens = tokenize("a {name!r:>8} b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "a ");
        assert_eq!(tokens[0].field, Some("name"));
        assert_eq!(tokens[0].conversion, Some('r'));
        assert_eq!(tokens[0].spec, ">8");
        assert_eq!(tokens[1], Token::literal(" b"));
    }

    #[test]
    fn test_field_without_trailing_text() {
        let tokens = tokenize("{a}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "");
        assert_eq!(tokens[0].field, Some("a"));
        assert_eq!(tokens[0].spec, "");
    }

    #[test]
    fn test_escaped_braces() {
        let tokens = tokenize("{{x}} and {{{y}}}");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "{x} and {");
        assert_eq!(tokens[0].field, Some("y"));
        assert_eq!(tokens[1].text, "}");
    }

    #[test]
    fn test_nested_spec() {
        let tokens = tokenize("{value:{width}}");
        assert_eq!(tokens[0].field, Some("value"));
        assert_eq!(tokens[0].spec, "{width}");
    }

    #[test]
    fn test_markers() {
        let tokens = tokenize("{#rows!h:>4}{/rows}{%note}");
        assert_eq!(tokens[0].marker, Some(Marker::StartSection));
        assert_eq!(tokens[0].field, Some("rows"));
        assert_eq!(tokens[0].raw_field, Some("#rows"));
        assert_eq!(tokens[0].conversion, Some('h'));
        assert_eq!(tokens[1].marker, Some(Marker::EndSection));
        assert_eq!(tokens[2].marker, Some(Marker::Comment));
    }

    #[test]
    fn test_comment_body_is_not_split() {
        let tokens = tokenize("{% wow! it: works}");
        assert_eq!(tokens[0].marker, Some(Marker::Comment));
        assert_eq!(tokens[0].raw_field, Some("% wow! it: works"));
    }

    #[test]
    fn test_brackets_protect_separators() {
        let tokens = tokenize("{a[x:y]:>3}");
        assert_eq!(tokens[0].field, Some("a[x:y]"));
        assert_eq!(tokens[0].spec, ">3");
    }

    #[test]
    fn test_plain_tokens_ignore_markers() {
        let tokens: Vec<_> = Tokens::new("{#a}").collect::<Result<_>>().unwrap();
        assert_eq!(tokens[0].marker, None);
        assert_eq!(tokens[0].field, Some("#a"));
    }

    #[test]
    fn test_syntax_errors() {
        let markers = MarkerTable::default();
        let first_error = |input| {
            Tokens::with_markers(input, &markers)
                .find_map(|t| t.err())
                .unwrap()
        };

        assert!(matches!(
            first_error("abc {"),
            Error::SingleBrace { brace: '{', offset: 4 }
        ));
        assert!(matches!(
            first_error("abc }"),
            Error::SingleBrace { brace: '}', offset: 4 }
        ));
        assert!(matches!(
            first_error("x {open"),
            Error::UnterminatedField { offset: 2 }
        ));
        assert!(matches!(
            first_error("{a!}"),
            Error::MissingConversion { .. }
        ));
        assert!(matches!(
            first_error("{a!rx}"),
            Error::ExpectedColon { .. }
        ));
    }

    #[test]
    fn test_stream_is_fused_after_error() {
        let mut tokens = Tokens::new("} {a}");
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_restart_by_clone() {
        let mut tokens = Tokens::new("{a}{b}");
        let _ = tokens.next();
        let restarted = tokens.clone();
        assert_eq!(tokens.count(), 1);
        assert_eq!(restarted.count(), 1);
    }

    #[test]
    fn test_strip_trailing_newline() {
        let token = Token::literal("line\n").without_trailing_newline();
        assert_eq!(token.text, "line");
        let owned = Token::literal(String::from("a\n\n")).without_trailing_newline();
        assert_eq!(owned.text, "a\n");
    }
}
