//! Configuration options for formatting.
//!
//! [`FormatOptions`] controls the whitespace rule at section markers, the
//! maximum nesting of format specs, and which field prefixes act as markers.
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{data, format_with_options, FormatOptions};
//!
//! let template = "before\n{#rows}\nrow{/rows}\nafter";
//! let data = data!({ "rows": [{}] });
//!
//! // Default: the newline right before a section marker is dropped
//! let swallowed = format_with_options(template, &data, FormatOptions::new()).unwrap();
//! assert_eq!(swallowed, "before\nrow\nafter");
//!
//! // Verbatim: literal text is emitted unchanged
//! let verbatim = format_with_options(template, &data, FormatOptions::verbatim()).unwrap();
//! assert_eq!(verbatim, "before\n\nrow\nafter");
//! ```

use crate::MarkerTable;

/// Configuration options for a [`Formatter`](crate::Formatter).
///
/// # Examples
///
/// ```rust
/// use sectionfmt::{FormatOptions, Marker, MarkerTable};
///
/// // Default options
/// let options = FormatOptions::new();
/// assert!(options.swallow_return_before_marker);
///
/// // Custom configuration
/// let options = FormatOptions::verbatim()
///     .with_max_spec_depth(3)
///     .with_markers(MarkerTable::default().with_marker("!", Marker::Comment));
/// assert_eq!(options.max_spec_depth, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Drop a newline that ends the literal text right before a section marker.
    pub swallow_return_before_marker: bool,
    /// Number of format-spec expansion levels allowed before failing.
    pub max_spec_depth: usize,
    pub markers: MarkerTable,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            swallow_return_before_marker: true,
            max_spec_depth: 2,
            markers: MarkerTable::default(),
        }
    }
}

impl FormatOptions {
    /// Creates default options (newline swallowing on, spec depth 2, `#`/`/`/`%` markers).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sectionfmt::FormatOptions;
    ///
    /// let options = FormatOptions::new();
    /// assert_eq!(options.max_spec_depth, 2);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that emit all literal text verbatim.
    #[must_use]
    pub fn verbatim() -> Self {
        FormatOptions {
            swallow_return_before_marker: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_swallow_return_before_marker(mut self, swallow: bool) -> Self {
        self.swallow_return_before_marker = swallow;
        self
    }

    /// Sets how many levels of nested fields a format spec may contain.
    #[must_use]
    pub fn with_max_spec_depth(mut self, depth: usize) -> Self {
        self.max_spec_depth = depth;
        self
    }

    /// Replaces the marker table.
    #[must_use]
    pub fn with_markers(mut self, markers: MarkerTable) -> Self {
        self.markers = markers;
        self
    }
}
