//! Error types for tokenizing and formatting templates.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: lone braces, unterminated fields, malformed conversions
//! - **Structural Errors**: unterminated, mismatched or unopened sections
//! - **Type Mismatches**: a scalar used as a section, or rows used as a field
//! - **Formatting Errors**: invalid format specs, unknown conversions, recursion limit
//! - **Conversion Errors**: failures raised by caller-registered converters
//!
//! Missing data is never an error: an unknown field renders as an empty string and an
//! unknown section renders zero rows.
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{format, DataMap, Error};
//!
//! let result = format("{#open}never closed", &DataMap::new());
//! assert!(matches!(result, Err(Error::UnterminatedSection(_))));
//! ```

use thiserror::Error;

/// Boxed error type returned by caller-registered converters.
pub type ConvertError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Represents all possible errors that can occur while formatting a template.
#[derive(Debug, Error)]
pub enum Error {
    /// A `{` at the very end of the input, or a `}` that is not doubled
    #[error("Single '{brace}' encountered in format string at offset {offset}")]
    SingleBrace { brace: char, offset: usize },

    /// A field was opened but the input ended before its closing brace
    #[error("expected '}}' before end of string (field opened at offset {offset})")]
    UnterminatedField { offset: usize },

    /// A `!` with no conversion character after it
    #[error("end of string while looking for conversion specifier in field '{field}'")]
    MissingConversion { field: String },

    /// Text after the conversion character that is not a `:spec`
    #[error("expected ':' after conversion specifier in field '{field}'")]
    ExpectedColon { field: String },

    /// A section was still open when the token stream ended
    #[error("unterminated section '{0}'")]
    UnterminatedSection(String),

    /// An end marker closed a different section than the innermost open one
    #[error("mismatched section end '{found}', expected the end of '{expected}'")]
    MismatchedSection { expected: String, found: String },

    /// An end marker with no open section
    #[error("section end '{0}' has no matching start")]
    UnopenedSection(String),

    /// A value of the wrong kind for the context it was used in
    #[error("type mismatch for '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Format specs nested deeper than the configured maximum
    #[error("Max string recursion exceeded")]
    RecursionLimit,

    /// Malformed format specification
    #[error("invalid format spec '{spec}': {msg}")]
    InvalidSpec { spec: String, msg: String },

    /// Conversion code that is neither registered nor standard
    #[error("Unknown conversion specifier {0}")]
    UnknownConversion(char),

    /// A registered converter failed
    #[error("converter '{code}' failed: {source}")]
    Conversion {
        code: char,
        #[source]
        source: ConvertError,
    },
}

impl Error {
    /// Creates a lone-brace syntax error.
    pub fn single_brace(brace: char, offset: usize) -> Self {
        Error::SingleBrace { brace, offset }
    }

    /// Creates an unterminated-section error carrying the raw start marker.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sectionfmt::Error;
    ///
    /// let err = Error::unterminated_section("#rows");
    /// assert!(err.to_string().contains("#rows"));
    /// ```
    pub fn unterminated_section(raw_field: &str) -> Self {
        Error::UnterminatedSection(raw_field.to_string())
    }

    /// Creates an error for an end marker that does not close the innermost open section.
    pub fn mismatched_section(expected: &str, found: &str) -> Self {
        Error::MismatchedSection {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an error for an end marker with nothing open.
    pub fn unopened_section(raw_field: &str) -> Self {
        Error::UnopenedSection(raw_field.to_string())
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sectionfmt::Error;
    ///
    /// let err = Error::type_mismatch("items", "rows", "scalar");
    /// assert!(err.to_string().contains("expected rows"));
    /// ```
    pub fn type_mismatch(field: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an invalid format spec error.
    pub fn invalid_spec(spec: &str, msg: &str) -> Self {
        Error::InvalidSpec {
            spec: spec.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Returns `true` for errors caused by unbalanced section markers or by
    /// data whose shape does not fit the field or section using it.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::UnterminatedSection(_)
                | Error::MismatchedSection { .. }
                | Error::UnopenedSection(_)
                | Error::TypeMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
