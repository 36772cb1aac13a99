//! Marker classification for field names.
//!
//! A marker is a reserved prefix on a field name that turns the field from a
//! substitution into a control token:
//!
//! | Prefix | Marker | Example |
//! |--------|--------|---------|
//! | `#` | [`Marker::StartSection`] | `{#items}` |
//! | `/` | [`Marker::EndSection`] | `{/items}` |
//! | `%` | [`Marker::Comment`] | `{% ignored }` |
//!
//! The prefixes live in a [`MarkerTable`] so formatters can be configured with
//! their own indicators.
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{Marker, MarkerTable};
//!
//! let markers = MarkerTable::default();
//! assert_eq!(markers.classify("#items"), (Some(Marker::StartSection), "items"));
//! assert_eq!(markers.classify("name"), (None, "name"));
//! ```

use indexmap::IndexMap;
use std::fmt;

/// The control meaning of a marker-prefixed field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    Comment,
    StartSection,
    EndSection,
}

impl Marker {
    /// Returns a short name for this marker.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Marker::Comment => "comment",
            Marker::StartSection => "startsection",
            Marker::EndSection => "endsection",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered marker indicators and the number of characters they occupy.
///
/// # Examples
///
/// ```rust
/// use sectionfmt::{Marker, MarkerTable};
///
/// let markers = MarkerTable::new(2)
///     .with_marker("@@", Marker::StartSection)
///     .with_marker("@/", Marker::EndSection);
///
/// assert_eq!(markers.classify("@@rows"), (Some(Marker::StartSection), "rows"));
/// assert_eq!(markers.classify("#rows"), (None, "#rows"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerTable {
    indicator_len: usize,
    indicators: IndexMap<String, Marker>,
}

impl Default for MarkerTable {
    fn default() -> Self {
        MarkerTable::new(1)
            .with_marker("#", Marker::StartSection)
            .with_marker("/", Marker::EndSection)
            .with_marker("%", Marker::Comment)
    }
}

impl MarkerTable {
    /// Creates an empty table whose indicators are `indicator_len` characters long.
    #[must_use]
    pub fn new(indicator_len: usize) -> Self {
        MarkerTable {
            indicator_len,
            indicators: IndexMap::new(),
        }
    }

    /// Registers `indicator` for `marker`.
    ///
    /// Indicators whose length differs from the table's indicator length never match.
    #[must_use]
    pub fn with_marker(mut self, indicator: impl Into<String>, marker: Marker) -> Self {
        self.indicators.insert(indicator.into(), marker);
        self
    }

    /// Number of characters an indicator occupies.
    #[must_use]
    pub fn indicator_len(&self) -> usize {
        self.indicator_len
    }

    /// Looks up the marker registered for `indicator`.
    #[must_use]
    pub fn get(&self, indicator: &str) -> Option<Marker> {
        self.indicators.get(indicator).copied()
    }

    /// Splits `raw_field` into its marker and bare field name.
    ///
    /// Fields shorter than the indicator, or with an unregistered prefix, have no
    /// marker and are returned unchanged.
    #[must_use]
    pub fn classify<'f>(&self, raw_field: &'f str) -> (Option<Marker>, &'f str) {
        if raw_field.is_empty() {
            return (None, raw_field);
        }

        let split = raw_field
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(raw_field.len()))
            .nth(self.indicator_len);

        match split {
            Some(split) => match self.get(&raw_field[..split]) {
                Some(marker) => (Some(marker), &raw_field[split..]),
                None => (None, raw_field),
            },
            None => (None, raw_field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let markers = MarkerTable::default();
        assert_eq!(markers.classify("#a"), (Some(Marker::StartSection), "a"));
        assert_eq!(markers.classify("/a"), (Some(Marker::EndSection), "a"));
        assert_eq!(
            markers.classify("% a comment"),
            (Some(Marker::Comment), " a comment")
        );
    }

    #[test]
    fn test_unmarked_and_empty_fields() {
        let markers = MarkerTable::default();
        assert_eq!(markers.classify("plain"), (None, "plain"));
        assert_eq!(markers.classify(""), (None, ""));
        assert_eq!(markers.classify("!x"), (None, "!x"));
    }

    #[test]
    fn test_bare_indicator_yields_empty_name() {
        let markers = MarkerTable::default();
        assert_eq!(markers.classify("#"), (Some(Marker::StartSection), ""));
    }

    #[test]
    fn test_multibyte_indicators() {
        let markers = MarkerTable::new(1).with_marker("§", Marker::Comment);
        assert_eq!(markers.classify("§note"), (Some(Marker::Comment), "note"));
        assert_eq!(markers.classify("§"), (Some(Marker::Comment), ""));
        assert_eq!(markers.classify("note"), (None, "note"));
    }

    #[test]
    fn test_longer_indicator_length() {
        let markers = MarkerTable::new(2).with_marker("<<", Marker::StartSection);
        assert_eq!(markers.classify("<"), (None, "<"));
        assert_eq!(markers.classify("<<"), (Some(Marker::StartSection), ""));
        assert_eq!(markers.classify("<<x"), (Some(Marker::StartSection), "x"));
    }
}
