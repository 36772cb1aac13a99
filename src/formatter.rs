//! The section-expanding formatter.
//!
//! [`Formatter`] consumes the flat token stream of a template in one pass.
//! Plain fields are substituted on the spot. When a start marker appears, the
//! following tokens are collected into the open section's body (nested
//! sections are collected verbatim, only their depth is tracked) until the
//! matching end marker. The body is then rendered once per row of the
//! section's data, each time with that row pushed in front of the scope chain.
//! Nested sections are only interpreted during those per-row renders, so a
//! section with no rows is scanned once and never rendered.
//!
//! ## Whitespace Rule
//!
//! With [`FormatOptions::swallow_return_before_marker`] enabled (the default),
//! a newline that ends the literal text right before a section start or end
//! marker is dropped. Templates can then put markers on their own lines:
//!
//! ```rust
//! use sectionfmt::{data, format};
//!
//! let template = "items:\n{#items}\n- {name}\n{/items}\ndone";
//! let data = data!({ "items": [{ "name": "a" }, { "name": "b" }] });
//!
//! assert_eq!(format(template, &data).unwrap(), "items:\n- a\n- b\ndone");
//! ```
//!
//! ## Errors
//!
//! Unbalanced markers always fail; a template is never partially rendered.
//! Missing data is not an error: unknown fields render empty and unknown
//! sections render zero rows.

use crate::error::ConvertError;
use crate::{
    Converters, DataMap, Error, FormatOptions, FormatSpec, Marker, Result, ScopeChain, Token,
    Tokens, Value,
};
use std::borrow::Cow;

/// A template formatter with fixed options and converters.
///
/// Configuration is set through consuming builder methods and cannot change
/// afterwards, so one `Formatter` can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use sectionfmt::{data, Formatter};
///
/// let formatter = Formatter::new();
/// let out = formatter
///     .format("hi {#SEC}lo{/SEC} there", &data!({ "SEC": [{}] }))
///     .unwrap();
/// assert_eq!(out, "hi lo there");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Formatter {
    options: FormatOptions,
    converters: Converters,
}

/// A section whose end marker has not been reached yet.
struct Section<'t> {
    name: &'t str,
    raw_name: &'t str,
    conversion: Option<char>,
    spec: &'t str,
    body: Vec<Token<'t>>,
    /// Names of sections opened inside the body and not yet closed.
    nested: Vec<&'t str>,
}

impl<'t> Section<'t> {
    fn open(token: &Token<'t>) -> Self {
        Section {
            name: token.field.unwrap_or_default(),
            raw_name: token.raw_field.unwrap_or_default(),
            conversion: token.conversion,
            spec: token.spec,
            body: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Adds `token` to the body; returns `true` once the section is closed.
    fn capture(&mut self, token: Token<'t>, swallow: bool) -> Result<bool> {
        let field = token.field.unwrap_or_default();
        let raw_field = token.raw_field.unwrap_or_default();

        match token.marker {
            Some(Marker::EndSection) if self.nested.is_empty() => {
                if field != self.name {
                    return Err(Error::mismatched_section(self.name, raw_field));
                }
                let token = if swallow {
                    token.without_trailing_newline()
                } else {
                    token
                };
                self.body.push(Token::literal(token.text));
                return Ok(true);
            }
            Some(Marker::EndSection) => {
                let innermost = self.nested.pop().unwrap_or_default();
                if field != innermost {
                    return Err(Error::mismatched_section(innermost, raw_field));
                }
            }
            Some(Marker::StartSection) => self.nested.push(field),
            _ => {}
        }

        self.body.push(token);
        Ok(false)
    }
}

impl Formatter {
    /// Creates a formatter with default options and no converters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: FormatOptions) -> Self {
        Formatter {
            options,
            converters: Converters::new(),
        }
    }

    /// Registers a converter for `{name!code}`.
    #[must_use]
    pub fn with_converter<F>(mut self, code: char, converter: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, ConvertError> + Send + Sync + 'static,
    {
        self.converters = self.converters.with(code, converter);
        self
    }

    /// Adds every converter in `converters`, replacing converters with the same code.
    #[must_use]
    pub fn with_converters(mut self, converters: Converters) -> Self {
        self.converters.extend(converters);
        self
    }

    #[must_use]
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    #[must_use]
    pub fn converters(&self) -> &Converters {
        &self.converters
    }

    /// Tokenizes `template` with this formatter's markers.
    pub fn tokenize<'t>(&self, template: &'t str) -> Tokens<'t, '_> {
        Tokens::with_markers(template, &self.options.markers)
    }

    /// Formats `template` with `data` as the root scope.
    ///
    /// # Errors
    ///
    /// Fails on template syntax errors, unbalanced section markers, values of
    /// the wrong shape, invalid specs, and conversion failures.
    pub fn format(&self, template: &str, data: &DataMap) -> Result<String> {
        let scopes = ScopeChain::root(data);
        self.format_tokens(self.tokenize(template), &scopes)
    }

    fn format_tokens<'t, I>(&self, tokens: I, scopes: &ScopeChain<'_, '_>) -> Result<String>
    where
        I: IntoIterator<Item = Result<Token<'t>>>,
    {
        let swallow = self.options.swallow_return_before_marker;
        let mut out = String::new();
        let mut open: Option<Section<'t>> = None;

        for token in tokens {
            let token = token?;

            if let Some(section) = open.as_mut() {
                if section.capture(token, swallow)? {
                    if let Some(section) = open.take() {
                        self.render_section(section, scopes, &mut out)?;
                    }
                }
                continue;
            }

            match token.marker {
                Some(Marker::StartSection) => {
                    let token = if swallow {
                        token.without_trailing_newline()
                    } else {
                        token
                    };
                    out.push_str(&token.text);
                    open = Some(Section::open(&token));
                }
                Some(Marker::EndSection) => {
                    let raw_field = token.raw_field.unwrap_or_default();
                    tracing::debug!(field = raw_field, "section end without a start");
                    return Err(Error::unopened_section(raw_field));
                }
                Some(Marker::Comment) => out.push_str(&token.text),
                None => {
                    out.push_str(&token.text);
                    if let Some(field) = token.field {
                        let value = lookup_scalar(field, scopes)?;
                        self.render_value(
                            Cow::Borrowed(value),
                            token.conversion,
                            token.spec,
                            scopes.parent(),
                            &mut out,
                        )?;
                    }
                }
            }
        }

        if let Some(section) = open {
            tracing::debug!(section = section.raw_name, "template ended inside a section");
            return Err(Error::unterminated_section(section.raw_name));
        }

        Ok(out)
    }

    fn render_section(
        &self,
        section: Section<'_>,
        scopes: &ScopeChain<'_, '_>,
        out: &mut String,
    ) -> Result<()> {
        let rows: &[DataMap] = match scopes.resolve(section.name) {
            None => &[],
            Some(Value::Rows(rows)) => rows,
            Some(value) => return Err(Error::type_mismatch(section.name, "rows", value.kind())),
        };
        tracing::trace!(
            section = section.name,
            rows = rows.len(),
            depth = scopes.depth(),
            "expanding section"
        );

        let mut content = String::new();
        for row in rows {
            let row_scopes = scopes.push(row);
            let rendered =
                self.format_tokens(section.body.iter().cloned().map(Ok), &row_scopes)?;
            content.push_str(&rendered);
        }

        self.render_value(
            Cow::Owned(content),
            section.conversion,
            section.spec,
            scopes.parent(),
            out,
        )
    }

    /// Converts `value`, expands `spec` and writes the formatted result.
    ///
    /// `spec_scopes` is the chain enclosing the current row; fields inside a
    /// spec never see the row itself.
    fn render_value(
        &self,
        value: Cow<'_, str>,
        conversion: Option<char>,
        spec: &str,
        spec_scopes: &ScopeChain<'_, '_>,
        out: &mut String,
    ) -> Result<()> {
        let value = self.converters.convert(value, conversion)?;
        let spec = self.expand_spec(spec, spec_scopes, self.options.max_spec_depth)?;
        if spec.is_empty() {
            out.push_str(&value);
        } else {
            FormatSpec::parse(&spec)?.write(&value, out);
        }
        Ok(())
    }

    /// Substitutes the fields inside a format spec.
    ///
    /// `depth` counts the expansion levels still allowed; reaching zero fails
    /// even when the spec is empty.
    fn expand_spec<'s>(
        &self,
        spec: &'s str,
        scopes: &ScopeChain<'_, '_>,
        depth: usize,
    ) -> Result<Cow<'s, str>> {
        if depth == 0 {
            return Err(Error::RecursionLimit);
        }
        if !spec.contains(['{', '}']) {
            return Ok(Cow::Borrowed(spec));
        }

        let mut expanded = String::with_capacity(spec.len());
        for token in Tokens::new(spec) {
            let token = token?;
            expanded.push_str(&token.text);
            if let Some(field) = token.field {
                let value = self
                    .converters
                    .convert(Cow::Borrowed(lookup_scalar(field, scopes)?), token.conversion)?;
                let inner = self.expand_spec(token.spec, scopes, depth - 1)?;
                FormatSpec::parse(&inner)?.write(&value, &mut expanded);
            }
        }
        Ok(Cow::Owned(expanded))
    }
}

/// Resolves `name` as a scalar; missing or empty values are `""`.
fn lookup_scalar<'d>(name: &str, scopes: &ScopeChain<'_, 'd>) -> Result<&'d str> {
    match scopes.resolve(name) {
        None => Ok(""),
        Some(Value::Scalar(value)) => Ok(value),
        Some(value) => Err(Error::type_mismatch(name, "scalar", value.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data, MarkerTable};

    fn fmt(template: &str, data: &DataMap) -> String {
        Formatter::new().format(template, data).unwrap()
    }

    #[test]
    fn test_plain_substitution() {
        let data = data!({ "bar": 1 });
        assert_eq!(fmt("foo {bar}", &data), "foo 1");
        assert_eq!(fmt("{dne}", &DataMap::new()), "");
        assert_eq!(fmt("", &DataMap::new()), "");
    }

    #[test]
    fn test_section_without_data_is_removed() {
        assert_eq!(fmt("hi {#SEC}lo{/SEC} there", &DataMap::new()), "hi  there");
    }

    #[test]
    fn test_section_single_row() {
        let data = data!({ "SEC": [{}] });
        assert_eq!(fmt("hi {#SEC}lo{/SEC} there", &data), "hi lo there");
    }

    #[test]
    fn test_recursive_section_name() {
        let data = data!({ "A": "x", "S": [{ "S": [{}] }] });
        assert_eq!(fmt("{A}{#S}{A}{#S}{A}{/S}{/S}", &data), "xxx");
    }

    #[test]
    fn test_row_shadows_root() {
        let data = data!({ "A": "x", "S": [{ "A": "y" }] });
        assert_eq!(fmt("{A}{#S}{A}{/S}", &data), "xy");
    }

    #[test]
    fn test_rows_do_not_see_each_other() {
        let data = data!({ "S": [{ "a": "1" }, { "b": "2" }] });
        assert_eq!(fmt("{#S}[{a}{b}]{/S}", &data), "[1][2]");
    }

    #[test]
    fn test_comments_vanish() {
        assert_eq!(fmt("{%note}kept", &DataMap::new()), "kept");
        assert_eq!(fmt("a{% {#fake} }b", &DataMap::new()), "ab");
        assert_eq!(fmt("{%/notopen}x", &DataMap::new()), "x");
    }

    #[test]
    fn test_comments_inside_sections() {
        let data = data!({ "S": [{}, {}] });
        assert_eq!(fmt("{#S}a{%c}b{/S}", &data), "abab");
    }

    #[test]
    fn test_zero_row_section_is_not_rendered() {
        // The body would fail if rendered: rows used as a scalar.
        let data = data!({ "S": [], "rows": [{}] });
        assert_eq!(fmt("<{#S}{rows}{/S}>", &data), "<>");
    }

    #[test]
    fn test_newline_swallowing() {
        let data = data!({ "section": [{ "a": "b" }, {}, {}] });
        let template = [
            "before the section",
            "{#section}",
            "inside the section",
            "some more text",
            "{/section}",
            "and after the section",
        ]
        .join("\n");
        let expected = [
            "before the section",
            "inside the section",
            "some more text",
            "inside the section",
            "some more text",
            "inside the section",
            "some more text",
            "and after the section",
        ]
        .join("\n");
        assert_eq!(fmt(&template, &data), expected);
    }

    #[test]
    fn test_verbatim_keeps_newlines() {
        let formatter = Formatter::with_options(FormatOptions::verbatim());
        let data = data!({ "S": [{}, {}] });
        let out = formatter.format("a\n{#S}\nx\n{/S}\nb", &data).unwrap();
        assert_eq!(out, "a\n\nx\n\nx\n\nb");
    }

    #[test]
    fn test_only_one_newline_is_swallowed() {
        let data = data!({ "S": [{}] });
        assert_eq!(fmt("a\n\n{#S}x{/S}", &data), "a\nx");
        assert_eq!(fmt("a\r\n{#S}x{/S}", &data), "a\rx");
    }

    #[test]
    fn test_nested_sections() {
        let data = data!({ "outer": [{ "inner": [{}] }] });
        let template = [
            "beginning",
            "{#outer}",
            "outer start",
            "{#inner}",
            "inner contents",
            "{/inner}",
            "outer finish",
            "{/outer}",
            "end",
        ]
        .join("\n");
        let expected = ["beginning", "outer start", "inner contents", "outer finish", "end"]
            .join("\n");
        assert_eq!(fmt(&template, &data), expected);
    }

    #[test]
    fn test_inner_section_resolves_through_ancestors() {
        let data = data!({
            "title": "T",
            "groups": [
                { "name": "g1", "items": [{ "v": "1" }, { "v": "2" }] },
                { "name": "g2", "items": [] }
            ]
        });
        let out = fmt("{#groups}{name}:{#items}{title}{v};{/items}|{/groups}", &data);
        assert_eq!(out, "g1:T1;T2;|g2:|");
    }

    #[test]
    fn test_empty_row_value_falls_back_to_outer() {
        let data = data!({ "a": "outer", "S": [{ "a": "" }] });
        assert_eq!(fmt("{#S}{a}{/S}", &data), "outer");
    }

    #[test]
    fn test_field_spec_and_conversion() {
        let data = data!({ "name": "bob", "w": "6" });
        assert_eq!(fmt("[{name:>5}]", &data), "[  bob]");
        assert_eq!(fmt("[{name!r:^7}]", &data), "[ 'bob' ]");
        assert_eq!(fmt("[{name:>{w}}]", &data), "[   bob]");
        assert_eq!(fmt("[{name:{fill}>4}]", &data!({ "name": "a", "fill": "*" })), "[***a]");
    }

    #[test]
    fn test_spec_resolves_in_enclosing_scope() {
        let data = data!({ "w": "3", "S": [{ "v": "a", "w": "6" }] });
        assert_eq!(fmt("{#S}[{v:>{w}}]{/S}", &data), "[  a]");
    }

    #[test]
    fn test_nested_row_spec_uses_parent_row() {
        let data = data!({
            "w": "2",
            "outer": [{ "w": "4", "inner": [{ "v": "a", "w": "8" }] }]
        });
        let out = fmt("{#outer}{#inner}[{v:>{w}}]{/inner}{/outer}", &data);
        assert_eq!(out, "[   a]");
    }

    #[test]
    fn test_section_spec_uses_enclosing_scope() {
        let data = data!({ "w": "3", "S": [{ "v": "a", "w": "6" }] });
        assert_eq!(fmt("[{#S:>{w}}{v}{/S}]", &data), "[  a]");
    }

    #[test]
    fn test_empty_row_list_hides_outer_rows() {
        let data = data!({ "items": [{}], "outer": [{ "items": [] }] });
        assert_eq!(fmt("{#outer}{#items}X{/items}{/outer}", &data), "");
        assert_eq!(fmt("{#items}X{/items}", &data), "X");
    }

    #[test]
    fn test_section_conversion_applies_to_all_rows() {
        let formatter =
            Formatter::new().with_converter('h', |v: &str| Ok(crate::html_escape(v)));
        let data = data!({ "foo": [{ "bar": "<p>one!</p>" }, { "bar": "<p>two!</p>" }] });
        let out = formatter
            .format("<div class=\"foo\">{#foo!h}inside{bar}{/foo}</div>", &data)
            .unwrap();
        assert_eq!(
            out,
            "<div class=\"foo\">inside&lt;p&gt;one!&lt;/p&gt;inside&lt;p&gt;two!&lt;/p&gt;</div>"
        );
    }

    #[test]
    fn test_section_spec_pads_concatenated_rows() {
        let data = data!({ "S": [{ "v": "a" }, { "v": "b" }] });
        assert_eq!(fmt("[{#S:>4}{v}{/S}]", &data), "[  ab]");
    }

    #[test]
    fn test_spec_recursion_limit() {
        let data = data!({ "a": "x", "b": "3", "c": "" });
        assert_eq!(fmt("{a:{b}}", &data), "x  ");
        let err = Formatter::new().format("{a:{b:{c}}}", &data).unwrap_err();
        assert!(matches!(err, Error::RecursionLimit));
    }

    #[test]
    fn test_spec_depth_is_configurable() {
        let formatter = Formatter::with_options(FormatOptions::new().with_max_spec_depth(1));
        let data = data!({ "a": "x", "w": "3" });
        assert_eq!(formatter.format("{a:>3}", &data).unwrap(), "  x");
        assert!(matches!(
            formatter.format("{a:>{w}}", &data),
            Err(Error::RecursionLimit)
        ));
    }

    #[test]
    fn test_structural_errors() {
        let formatter = Formatter::new();
        let empty = DataMap::new();

        match formatter.format("{#a}never closed", &empty) {
            Err(Error::UnterminatedSection(name)) => assert_eq!(name, "#a"),
            other => panic!("unexpected result: {other:?}"),
        }
        match formatter.format("text{/a}", &empty) {
            Err(Error::UnopenedSection(name)) => assert_eq!(name, "/a"),
            other => panic!("unexpected result: {other:?}"),
        }
        match formatter.format("{#a}{/b}{/a}", &empty) {
            Err(Error::MismatchedSection { expected, found }) => {
                assert_eq!(expected, "a");
                assert_eq!(found, "/b");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            formatter.format("{#a}{#b}{/a}{/b}", &empty),
            Err(Error::MismatchedSection { .. })
        ));
        assert!(matches!(
            formatter.format("{#a}{#b}{/b}", &empty),
            Err(Error::UnterminatedSection(_))
        ));
    }

    #[test]
    fn test_type_mismatches() {
        let data = data!({ "s": "text", "r": [{}] });
        assert!(matches!(
            Formatter::new().format("{#s}x{/s}", &data),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            Formatter::new().format("{r}", &data),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_custom_markers() {
        let markers = MarkerTable::new(1)
            .with_marker("+", Marker::StartSection)
            .with_marker("-", Marker::EndSection)
            .with_marker("!", Marker::Comment);
        let formatter = Formatter::with_options(FormatOptions::new().with_markers(markers));
        let data = data!({ "S": [{ "v": "1" }, { "v": "2" }], "#x": "hash" });
        let out = formatter.format("{!c}{+S}{v}{-S} {#x}", &data).unwrap();
        assert_eq!(out, "12 hash");
    }

    #[test]
    fn test_formatter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Formatter>();

        let formatter = std::sync::Arc::new(Formatter::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let formatter = std::sync::Arc::clone(&formatter);
                std::thread::spawn(move || {
                    let data = data!({ "S": [{ "i": i }] });
                    formatter.format("{#S}{i}{/S}", &data).unwrap()
                })
            })
            .collect();
        let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(outputs, vec!["0", "1", "2", "3"]);
    }
}
