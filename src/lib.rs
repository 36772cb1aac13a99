//! # sectionfmt
//!
//! Brace-style string formatting with repeated sections.
//!
//! ## What is sectionfmt?
//!
//! sectionfmt extends ordinary `{name}` formatting with *sections*: a block of
//! template text between `{#name}` and `{/name}` is rendered once for every row
//! of data stored under `name`. Rows are mappings themselves, so sections nest,
//! and a field inside a section sees the current row first and the enclosing
//! data after it.
//!
//! ## Key Features
//!
//! - **Familiar Syntax**: Fields, `!conversion` and `:spec` work like brace formatting
//! - **Repeated Sections**: `{#rows}...{/rows}` with nesting and scope fall-through
//! - **Comments**: `{% text }` never reaches the output
//! - **Tidy Newlines**: Markers can sit on their own lines without leaving blank lines
//! - **Serde Data**: Template data deserializes from any serde format
//! - **No Unsafe Code**: Written entirely in safe Rust
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sectionfmt = "0.1"
//! ```
//!
//! ### Fields and Sections
//!
//! ```rust
//! use sectionfmt::{data, format};
//!
//! let template = "{title}\n{#items}\n- {name:<6}|{qty:>3}\n{/items}\nend";
//! let data = data!({
//!     "title": "Order",
//!     "items": [
//!         { "name": "bolt", "qty": 12 },
//!         { "name": "nut", "qty": 7 }
//!     ]
//! });
//!
//! let out = format(template, &data).unwrap();
//! assert_eq!(out, "Order\n- bolt  | 12\n- nut   |  7\nend");
//! ```
//!
//! ### Data from JSON
//!
//! ```rust
//! use sectionfmt::{format, DataMap};
//!
//! let data: DataMap = serde_json::from_str(r#"{"who": "world", "n": [{}, {}]}"#).unwrap();
//! assert_eq!(format("{#n}hello {who}! {/n}", &data).unwrap(), "hello world! hello world! ");
//! ```
//!
//! ### Custom Conversions
//!
//! ```rust
//! use sectionfmt::{data, html_escape, Formatter};
//!
//! let formatter = Formatter::new().with_converter('h', |v: &str| Ok(html_escape(v)));
//! let out = formatter.format("<p>{body!h}</p>", &data!({ "body": "a < b" })).unwrap();
//! assert_eq!(out, "<p>a &lt; b</p>");
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Tokenizing**: O(n), lazy, borrowing from the template
//! - **Formatting**: one pass over the tokens; section bodies are rendered once per row
//! - **Lookups**: O(depth) per field, where depth is the section nesting level
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Malformed templates are reported as [`Error`] values, never panics
//! - A failed format produces no partial output
//!
//! ## Template Syntax
//!
//! For the complete template language, see the [`syntax`] module.

pub mod convert;
pub mod error;
pub mod formatter;
pub mod macros;
pub mod map;
pub mod marker;
pub mod options;
pub mod preprocess;
pub mod scope;
pub mod spec;
pub mod syntax;
pub mod template;
pub mod token;
pub mod value;

pub use convert::{html_escape, repr, ConverterFn, Converters};
pub use error::{ConvertError, Error, Result};
pub use formatter::Formatter;
pub use map::DataMap;
pub use marker::{Marker, MarkerTable};
pub use options::FormatOptions;
pub use scope::ScopeChain;
pub use spec::{Align, FormatSpec};
pub use template::Template;
pub use token::{Token, Tokens};
pub use value::Value;

/// Formats `template` with `data` using default options.
///
/// # Examples
///
/// ```rust
/// use sectionfmt::{data, format};
///
/// let out = format("hi {#SEC}lo{/SEC} there", &data!({ "SEC": [{}] })).unwrap();
/// assert_eq!(out, "hi lo there");
/// ```
///
/// # Errors
///
/// Returns an error if the template is malformed, its section markers do not
/// pair up, or a value has the wrong shape for where it is used.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format(template: &str, data: &DataMap) -> Result<String> {
    format_with_options(template, data, FormatOptions::default())
}

/// Formats `template` with `data` using custom options.
///
/// # Examples
///
/// ```rust
/// use sectionfmt::{data, format_with_options, FormatOptions};
///
/// let template = "a\n{#S}\nb\n{/S}\nc";
/// let data = data!({ "S": [{}] });
///
/// assert_eq!(
///     format_with_options(template, &data, FormatOptions::verbatim()).unwrap(),
///     "a\n\nb\n\nc"
/// );
/// ```
///
/// # Errors
///
/// Returns the same errors as [`format`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_with_options(template: &str, data: &DataMap, options: FormatOptions) -> Result<String> {
    Formatter::with_options(options).format(template, data)
}
