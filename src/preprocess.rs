//! Template preprocessors.
//!
//! A preprocessor rewrites template source before it is tokenized, which lets
//! templates written in a foreign syntax run on this engine. Preprocessors are
//! plain string rewrites with no knowledge of the template structure.

/// Translates double-brace syntax into native syntax.
///
/// In double-brace templates, fields are written `{{name}}`, sections
/// `{{#name}}...{{/name}}`, comments `{{! text }}`, and single braces are
/// literal text. The rewrite runs in this order:
///
/// 1. `{` → `{{` then `{{{{` → `{`
/// 2. `}` → `}}` then `}}}}` → `}`
/// 3. `{!` → `{%`
///
/// Brace runs longer than two (such as `{{{name}}}`) are not supported and
/// may produce unexpected templates.
///
/// # Examples
///
/// ```rust
/// use sectionfmt::preprocess::double_brace;
///
/// assert_eq!(double_brace("{{name}} {literal}"), "{name} {{literal}}");
/// assert_eq!(double_brace("{{#rows}}x{{/rows}}"), "{#rows}x{/rows}");
/// assert_eq!(double_brace("{{! note }}"), "{% note }");
/// ```
#[must_use]
pub fn double_brace(input: &str) -> String {
    input
        .replace('{', "{{")
        .replace("{{{{", "{")
        .replace('}', "}}")
        .replace("}}}}", "}")
        .replace("{!", "{%")
}
