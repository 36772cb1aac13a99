//! Format specifications for rendered values.
//!
//! A field's spec controls padding, alignment and truncation of the text it
//! produces. Every value is a string, so the string subset of the familiar
//! brace-format mini-language is supported:
//!
//! ```text
//! [[fill]align][0][width][.precision][s]
//! ```
//!
//! | Part | Meaning |
//! |------|---------|
//! | `fill` | any character, used for padding (default space) |
//! | `align` | `<` left (default), `>` right, `^` center |
//! | `0` | pad with `0` unless an explicit fill is given |
//! | `width` | minimum width in characters |
//! | `.precision` | maximum number of characters kept |
//! | `s` | string presentation (the only one) |
//!
//! Numeric-only options (sign, `#`, `=`, grouping, numeric types) are rejected,
//! as are widths and precisions above [`MAX_WIDTH`].
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::FormatSpec;
//!
//! assert_eq!(FormatSpec::parse("*^7").unwrap().apply("abc"), "**abc**");
//! assert_eq!(FormatSpec::parse(">6.2").unwrap().apply("abcdef"), "    ab");
//! assert!(FormatSpec::parse("+5").is_err());
//! ```

use crate::{Error, Result};

/// Largest width or precision a spec may name.
pub const MAX_WIDTH: usize = 1_000_000;

/// Horizontal alignment inside the padded width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// A parsed string format specification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: char,
    pub align: Align,
    pub width: Option<usize>,
    pub precision: Option<usize>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        FormatSpec {
            fill: ' ',
            align: Align::Left,
            width: None,
            precision: None,
        }
    }
}

enum AlignChar {
    Text(Align),
    Numeric,
}

fn align_char(ch: char) -> Option<AlignChar> {
    match ch {
        '<' => Some(AlignChar::Text(Align::Left)),
        '>' => Some(AlignChar::Text(Align::Right)),
        '^' => Some(AlignChar::Text(Align::Center)),
        '=' => Some(AlignChar::Numeric),
        _ => None,
    }
}

impl FormatSpec {
    /// Parses `spec`; the empty spec formats values unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpec`] for malformed specs and for options that
    /// only apply to numbers.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |msg: &str| Error::invalid_spec(spec, msg);
        let chars: Vec<char> = spec.chars().collect();
        let mut parsed = FormatSpec::default();
        let mut pos = 0;
        let mut explicit_fill = false;

        let (fill, align_at) = match (chars.first(), chars.get(1)) {
            (Some(&fill), Some(&next)) if align_char(next).is_some() => (Some(fill), Some(1)),
            (Some(&first), _) if align_char(first).is_some() => (None, Some(0)),
            _ => (None, None),
        };
        if let Some(at) = align_at {
            match align_char(chars[at]) {
                Some(AlignChar::Text(align)) => parsed.align = align,
                _ => return Err(invalid("'=' alignment not allowed in string format specifier")),
            }
            if let Some(fill) = fill {
                parsed.fill = fill;
                explicit_fill = true;
            }
            pos = at + 1;
        }

        match chars.get(pos) {
            Some('+' | '-' | ' ') => {
                return Err(invalid("Sign not allowed in string format specifier"))
            }
            Some('#') => {
                return Err(invalid(
                    "Alternate form (#) not allowed in string format specifier",
                ))
            }
            Some('0') => {
                if !explicit_fill {
                    parsed.fill = '0';
                }
                pos += 1;
            }
            _ => {}
        }

        let (width, next) = read_number(&chars, pos).map_err(|msg| invalid(msg))?;
        parsed.width = width;
        pos = next;

        if let Some(',' | '_') = chars.get(pos) {
            return Err(invalid("Cannot specify grouping with 's'"));
        }

        if chars.get(pos) == Some(&'.') {
            let (precision, next) = read_number(&chars, pos + 1).map_err(|msg| invalid(msg))?;
            if precision.is_none() {
                return Err(invalid("Format specifier missing precision"));
            }
            parsed.precision = precision;
            pos = next;
        }

        match &chars[pos..] {
            [] | ['s'] => Ok(parsed),
            [kind] => Err(invalid(&format!(
                "Unknown format code '{kind}' for object of type 'str'"
            ))),
            _ => Err(invalid("Invalid format specifier")),
        }
    }

    /// Formats `value` into `out` according to this spec.
    pub fn write(&self, value: &str, out: &mut String) {
        let truncated = match self.precision {
            Some(precision) => match value.char_indices().nth(precision) {
                Some((end, _)) => &value[..end],
                None => value,
            },
            None => value,
        };

        let len = truncated.chars().count();
        let pad = self.width.unwrap_or(0).saturating_sub(len);
        let (left, right) = match self.align {
            Align::Left => (0, pad),
            Align::Right => (pad, 0),
            Align::Center => (pad / 2, pad - pad / 2),
        };

        out.extend(std::iter::repeat(self.fill).take(left));
        out.push_str(truncated);
        out.extend(std::iter::repeat(self.fill).take(right));
    }

    /// Formats `value` according to this spec.
    #[must_use]
    pub fn apply(&self, value: &str) -> String {
        let mut out = String::new();
        self.write(value, &mut out);
        out
    }
}

fn read_number(
    chars: &[char],
    start: usize,
) -> std::result::Result<(Option<usize>, usize), &'static str> {
    let digits = chars[start.min(chars.len())..]
        .iter()
        .take_while(|ch| ch.is_ascii_digit())
        .count();
    if digits == 0 {
        return Ok((None, start));
    }

    let mut number: usize = 0;
    for ch in &chars[start..start + digits] {
        let digit = ch.to_digit(10).unwrap_or(0) as usize;
        number = number
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit))
            .ok_or("Too many decimal digits in format string")?;
    }
    if number > MAX_WIDTH {
        return Err("Width or precision too large in format string");
    }
    Ok((Some(number), start + digits))
}
