//! Template Syntax
//!
//! This module documents the template language understood by
//! [`Formatter`](crate::Formatter). It contains no code.
//!
//! # Overview
//!
//! A template is literal text with replacement fields in braces, the same shape
//! as ordinary brace formatting. Fields whose name begins with a marker
//! indicator are structural instead: they open and close repeated sections or
//! hold comments.
//!
//! ```text
//! Dear {name},
//! {#orders}
//! order {id}: {total:>8}
//! {/orders}
//! {% signature follows }
//! {sender}
//! ```
//!
//! # Literal Text
//!
//! Everything outside braces is copied to the output. `{{` and `}}` produce a
//! literal `{` and `}`. A `}` that is not doubled, or a `{` at the very end of
//! the template, is an [`Error::SingleBrace`](crate::Error::SingleBrace).
//!
//! # Fields
//!
//! ```text
//! {name}  {name!c}  {name:spec}  {name!c:spec}
//! ```
//!
//! - `name` is looked up in the scope chain (see [Scoping](#scoping)). A
//!   missing name renders as the empty string.
//! - `!c` applies conversion `c` before formatting. `s`, `r` and `a` are
//!   built in; callers register more with
//!   [`Formatter::with_converter`](crate::Formatter::with_converter).
//! - `:spec` is a format spec, see [`FormatSpec`](crate::FormatSpec). The spec
//!   may itself contain fields, as in `{title:^{width}}`; one level of nesting
//!   is allowed by default.
//!
//! `:` and `!` inside square brackets belong to the name. Braces inside a
//! field must balance.
//!
//! # Markers
//!
//! With the default [`MarkerTable`](crate::MarkerTable), the first character
//! of a field name selects its role:
//!
//! | Indicator | Marker | Example |
//! |-----------|--------|---------|
//! | `#` | section start | `{#rows}` |
//! | `/` | section end | `{/rows}` |
//! | `%` | comment | `{% any text }` |
//!
//! The indicator is stripped from the name. Comments produce no output and
//! their body is never split, so comment text may contain `!` and `:`.
//!
//! # Sections
//!
//! ```text
//! {#name!c:spec} body {/name}
//! ```
//!
//! `name` must resolve to rows, or be missing (zero rows). The body is
//! rendered once per row and the renders are concatenated; the concatenation
//! then goes through the section's own conversion and spec. A scalar value
//! under a section name is an [`Error::TypeMismatch`](crate::Error::TypeMismatch)
//! unless it is empty.
//!
//! Sections nest. Each end marker must name the innermost open section:
//!
//! | Template | Result |
//! |----------|--------|
//! | `{#a}{#b}{/b}{/a}` | valid |
//! | `{#a}{#b}{/a}{/b}` | [`Error::MismatchedSection`](crate::Error::MismatchedSection) |
//! | `{#a}x` | [`Error::UnterminatedSection`](crate::Error::UnterminatedSection) |
//! | `x{/a}` | [`Error::UnopenedSection`](crate::Error::UnopenedSection) |
//!
//! # Scoping
//!
//! While a section body renders, the current row is searched first, then the
//! row of each enclosing section, then the root data. The first value that
//! is not an empty string wins: `""` in an inner row does not hide a value
//! further out, but an empty row list does.
//!
//! Fields nested in a spec, like `{w}` in `{v:>{w}}`, skip the current row and
//! resolve from the scope that encloses it.
//!
//! # Newlines Around Markers
//!
//! By default, one newline immediately before a section start marker, and one
//! immediately before the end marker that closes the section, is dropped.
//! Putting markers on their own lines then leaves no blank lines behind.
//! [`FormatOptions::verbatim`](crate::FormatOptions::verbatim) keeps the text
//! unchanged.
//!
//! # Double-Brace Templates
//!
//! [`Template::double_brace`](crate::Template::double_brace) accepts templates
//! written with doubled braces (`{{name}}`, `{{#rows}}...{{/rows}}`,
//! `{{! comment }}`) where single braces are literal text. Such templates see
//! two extra globals, `BI_NEWLINE` and `BI_SPACE`.
