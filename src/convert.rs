//! Value conversions selected with `{name!c}`.
//!
//! A conversion code is a single character. Codes registered in a
//! [`Converters`] table call the registered function; otherwise the standard
//! conversions apply:
//!
//! | Code | Result |
//! |------|--------|
//! | `s` | the value unchanged |
//! | `r` | a quoted, escaped representation |
//! | `a` | like `r`, with every non-ASCII character escaped |
//!
//! Any other code is an [`Error::UnknownConversion`]. Errors from registered
//! converters are returned as [`Error::Conversion`] with the original error as
//! the source.
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{data, html_escape, Formatter};
//!
//! let formatter = Formatter::new()
//!     .with_converter('h', |value: &str| Ok(html_escape(value)))
//!     .with_converter('u', |value: &str| Ok(value.to_uppercase()));
//!
//! let out = formatter
//!     .format("{tag!h} {name!u} {name!r}", &data!({ "tag": "<b>", "name": "bo" }))
//!     .unwrap();
//! assert_eq!(out, "&lt;b&gt; BO 'bo'");
//! ```

use crate::error::ConvertError;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

/// Signature of a caller-registered converter.
pub type ConverterFn = dyn Fn(&str) -> std::result::Result<String, ConvertError> + Send + Sync;

/// Conversion functions keyed by their one-character code.
#[derive(Clone, Default)]
pub struct Converters(IndexMap<char, Arc<ConverterFn>>);

impl Converters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `converter` under `code`, replacing any previous converter.
    #[must_use]
    pub fn with<F>(mut self, code: char, converter: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, ConvertError> + Send + Sync + 'static,
    {
        self.0.insert(code, Arc::new(converter));
        self
    }

    #[must_use]
    pub fn contains(&self, code: char) -> bool {
        self.0.contains_key(&code)
    }

    /// Registered codes, in registration order.
    pub fn codes(&self) -> impl Iterator<Item = char> + '_ {
        self.0.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies conversion `code` to `value`.
    ///
    /// # Errors
    ///
    /// Fails when a registered converter fails or when `code` is neither
    /// registered nor standard.
    pub fn convert<'v>(&self, value: Cow<'v, str>, code: Option<char>) -> Result<Cow<'v, str>> {
        let Some(code) = code else {
            return Ok(value);
        };

        match self.0.get(&code) {
            Some(converter) => converter(value.as_ref())
                .map(Cow::Owned)
                .map_err(|source| Error::Conversion { code, source }),
            None => standard_conversion(value, code),
        }
    }
}

impl Extend<(char, Arc<ConverterFn>)> for Converters {
    fn extend<T: IntoIterator<Item = (char, Arc<ConverterFn>)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Converters {
    type Item = (char, Arc<ConverterFn>);
    type IntoIter = indexmap::map::IntoIter<char, Arc<ConverterFn>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

fn standard_conversion(value: Cow<'_, str>, code: char) -> Result<Cow<'_, str>> {
    match code {
        's' => Ok(value),
        'r' => Ok(Cow::Owned(repr(&value, false))),
        'a' => Ok(Cow::Owned(repr(&value, true))),
        other => Err(Error::UnknownConversion(other)),
    }
}

/// Quotes and escapes `value`.
///
/// Single quotes are used unless the value contains a single quote and no
/// double quote. With `ascii_only`, every non-ASCII character is escaped too.
///
/// # Examples
///
/// ```rust
/// use sectionfmt::repr;
///
/// assert_eq!(repr("it's", false), "\"it's\"");
/// assert_eq!(repr("a\tb", false), "'a\\tb'");
/// assert_eq!(repr("é", true), "'\\xe9'");
/// ```
#[must_use]
pub fn repr(value: &str, ascii_only: bool) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() || (ascii_only && !c.is_ascii()) => {
                let code = u32::from(c);
                let _ = if code < 0x100 {
                    write!(out, "\\x{code:02x}")
                } else if code < 0x10000 {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Escapes `&`, `<`, `>` and `"` for inclusion in HTML.
///
/// # Examples
///
/// ```rust
/// use sectionfmt::html_escape;
///
/// assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
#[must_use]
pub fn html_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_code_is_identity() {
        let converters = Converters::new();
        let value = converters.convert(Cow::Borrowed("x"), None).unwrap();
        assert!(matches!(value, Cow::Borrowed("x")));
    }

    #[test]
    fn test_standard_conversions() {
        let converters = Converters::new();
        let convert = |code| converters.convert(Cow::Borrowed("a'b"), Some(code)).unwrap();
        assert_eq!(convert('s'), "a'b");
        assert_eq!(convert('r'), "\"a'b\"");
        assert_eq!(convert('a'), "\"a'b\"");
    }

    #[test]
    fn test_unknown_conversion() {
        let err = Converters::new()
            .convert(Cow::Borrowed("x"), Some('z'))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownConversion('z')));
    }

    #[test]
    fn test_registered_converter_wins() {
        let converters = Converters::new().with('r', |v: &str| Ok(v.chars().rev().collect()));
        assert!(converters.contains('r'));
        assert_eq!(
            converters.convert(Cow::Borrowed("abc"), Some('r')).unwrap(),
            "cba"
        );
    }

    #[test]
    fn test_converter_errors_propagate() {
        let converters = Converters::new().with('n', |v: &str| {
            v.parse::<i64>()
                .map(|n| (n * 2).to_string())
                .map_err(|e| Box::new(e) as ConvertError)
        });

        assert_eq!(converters.convert(Cow::Borrowed("21"), Some('n')).unwrap(), "42");
        let err = converters
            .convert(Cow::Borrowed("x"), Some('n'))
            .unwrap_err();
        match err {
            Error::Conversion { code, source } => {
                assert_eq!(code, 'n');
                assert!(source.is::<std::num::ParseIntError>());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repr_escapes() {
        assert_eq!(repr("plain", false), "'plain'");
        assert_eq!(repr("both ' and \"", false), "'both \\' and \"'");
        assert_eq!(repr("back\\slash\n", false), "'back\\\\slash\\n'");
        assert_eq!(repr("\u{1}", false), "'\\x01'");
        assert_eq!(repr("日本", false), "'日本'");
        assert_eq!(repr("日", true), "'\\u65e5'");
        assert_eq!(repr("🎉", true), "'\\U0001f389'");
    }

    #[test]
    fn test_debug_lists_codes() {
        let converters = Converters::new()
            .with('h', |v: &str| Ok(html_escape(v)))
            .with('u', |v: &str| Ok(v.to_uppercase()));
        assert_eq!(format!("{converters:?}"), "{'h', 'u'}");
        assert_eq!(converters.codes().collect::<String>(), "hu");
    }
}
