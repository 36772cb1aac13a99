/// Builds a [`DataMap`](crate::DataMap) from a JSON-like literal.
///
/// Keys are string literals. Values are either a bracketed list of row
/// mappings, which becomes [`Value::Rows`](crate::Value::Rows), or any
/// expression convertible into a [`Value`](crate::Value).
///
/// # Examples
///
/// ```rust
/// use sectionfmt::{data, format};
///
/// let data = data!({
///     "title": "Totals",
///     "items": [
///         { "name": "a", "qty": 1 },
///         { "name": "b", "qty": 2 }
///     ]
/// });
///
/// let out = format("{title}:{#items} {name}={qty}{/items}", &data).unwrap();
/// assert_eq!(out, "Totals: a=1 b=2");
/// ```
#[macro_export]
macro_rules! data {
    // Handle empty mapping
    ({}) => {
        $crate::DataMap::new()
    };

    // Handle non-empty mapping
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::DataMap::new();
        $(
            map.insert($key.to_string(), $crate::__data_value!($value));
        )*
        map
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __data_value {
    // Row sequence
    ([ $($row:tt),* $(,)? ]) => {
        $crate::Value::Rows(vec![$($crate::data!($row)),*])
    };

    // Anything convertible into a value
    ($value:expr) => {
        $crate::Value::from($value)
    };
}
