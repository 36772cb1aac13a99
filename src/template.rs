//! Stored templates.
//!
//! [`Template`] keeps a template source together with the [`Formatter`] that
//! renders it, an optional preprocessor and optional global data. Templates
//! are not validated when they are created; errors surface from
//! [`Template::render`].
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{data, Template};
//!
//! let template = Template::new("{greeting}, {#people}{name} {/people}");
//! let out = template
//!     .render(&data!({ "greeting": "hi", "people": [{ "name": "a" }, { "name": "b" }] }))
//!     .unwrap();
//! assert_eq!(out, "hi, a b ");
//! ```
//!
//! Double-brace templates use [`Template::double_brace`]:
//!
//! ```rust
//! use sectionfmt::{data, Template};
//!
//! let template = Template::double_brace("{{! greeting }}{{#SEC}}lo{{/SEC}}{{BI_SPACE}}{x}");
//! assert_eq!(template.render(&data!({ "SEC": [{}] })).unwrap(), "lo {x}");
//! ```

use crate::preprocess;
use crate::{DataMap, FormatOptions, Formatter, Result, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Signature of a template preprocessor.
pub type Preprocessor = dyn Fn(&str) -> String + Send + Sync;

/// A template source with the formatter that renders it.
#[derive(Clone, Default)]
pub struct Template {
    source: String,
    formatter: Formatter,
    preprocessor: Option<Arc<Preprocessor>>,
    globals: DataMap,
}

impl Template {
    /// Creates a template rendered with a default [`Formatter`].
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Template {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Creates a template written in double-brace syntax.
    ///
    /// The source is translated with [`preprocess::double_brace`], literal text
    /// is kept verbatim (no newline swallowing), and the globals `BI_NEWLINE`
    /// (`"\n"`) and `BI_SPACE` (`" "`) are available.
    #[must_use]
    pub fn double_brace(source: impl Into<String>) -> Self {
        let globals: DataMap = [("BI_NEWLINE", "\n"), ("BI_SPACE", " ")]
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::from(value)))
            .collect();

        Template::new(source)
            .with_formatter(Formatter::with_options(FormatOptions::verbatim()))
            .with_preprocessor(preprocess::double_brace)
            .with_globals(globals)
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Sets the function that rewrites the source before every render.
    #[must_use]
    pub fn with_preprocessor<F>(mut self, preprocessor: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.preprocessor = Some(Arc::new(preprocessor));
        self
    }

    /// Sets data that is visible to every render; render data overrides it.
    #[must_use]
    pub fn with_globals(mut self, globals: DataMap) -> Self {
        self.globals = globals;
        self
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    #[must_use]
    pub fn globals(&self) -> &DataMap {
        &self.globals
    }

    /// Returns the source after preprocessing.
    #[must_use]
    pub fn expanded(&self) -> Cow<'_, str> {
        match &self.preprocessor {
            Some(preprocessor) => Cow::Owned(preprocessor(&self.source)),
            None => Cow::Borrowed(&self.source),
        }
    }

    /// Renders the template with `data`.
    ///
    /// # Errors
    ///
    /// Returns any error raised by [`Formatter::format`].
    pub fn render(&self, data: &DataMap) -> Result<String> {
        let source = self.expanded();
        if self.globals.is_empty() {
            return self.formatter.format(&source, data);
        }

        let mut merged = self.globals.clone();
        merged.extend(data.iter().map(|(key, value)| (key.clone(), value.clone())));
        self.formatter.format(&source, &merged)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source)
            .field("formatter", &self.formatter)
            .field("preprocessor", &self.preprocessor.is_some())
            .field("globals", &self.globals)
            .finish()
    }
}
