//! Values stored in template data.
//!
//! A field resolves to one of two shapes:
//!
//! - [`Value::Scalar`]: text substituted by `{name}`
//! - [`Value::Rows`]: an ordered list of [`DataMap`] rows repeated by `{#name}...{/name}`
//!
//! Using one shape where the other is required is a
//! [`TypeMismatch`](crate::Error::TypeMismatch), never a silent coercion.
//!
//! ## Creating Values
//!
//! ```rust
//! use sectionfmt::{data, Value};
//!
//! let text = Value::from("hello");
//! let number = Value::from(42);
//! let rows = Value::from(vec![data!({ "n": "1" }), data!({ "n": "2" })]);
//!
//! assert_eq!(number.as_str(), Some("42"));
//! assert_eq!(rows.as_rows().map(|r| r.len()), Some(2));
//! ```
//!
//! ## Loading Values with Serde
//!
//! Any self-describing serde format can supply data. Numbers and booleans
//! become scalars, `null` becomes an empty scalar, arrays of objects become
//! rows, and a lone object becomes a single row:
//!
//! ```rust
//! use sectionfmt::{DataMap, Value};
//!
//! let data: DataMap =
//!     serde_json::from_str(r#"{"count": 3, "items": [{"id": 1}, {"id": 2}]}"#).unwrap();
//! assert_eq!(data.get("count"), Some(&Value::from("3")));
//! assert!(data.get("items").unwrap().is_rows());
//! ```

use crate::DataMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A field value: a scalar string or a sequence of rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    Rows(Vec<DataMap>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(String::new())
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_rows(&self) -> bool {
        matches!(self, Value::Rows(_))
    }

    /// Returns `true` for an empty scalar or an empty row list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sectionfmt::Value;
    ///
    /// assert!(Value::from("").is_empty());
    /// assert!(Value::Rows(vec![]).is_empty());
    /// assert!(!Value::from("x").is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_empty(),
            Value::Rows(rows) => rows.is_empty(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Rows(_) => None,
        }
    }

    #[must_use]
    pub fn as_rows(&self) -> Option<&[DataMap]> {
        match self {
            Value::Rows(rows) => Some(rows),
            Value::Scalar(_) => None,
        }
    }

    /// Name of this value's shape, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Rows(_) => "rows",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => f.write_str(s),
            Value::Rows(rows) => write!(f, "[{} rows]", rows.len()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Scalar(s) => serializer.serialize_str(s),
            Value::Rows(rows) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(rows.len()))?;
                for row in rows {
                    seq.serialize_element(row)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar, a sequence of mappings, or a mapping")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::default())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::default())
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(row) = seq.next_element::<DataMap>()? {
                    rows.push(row);
                }
                Ok(Value::Rows(rows))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut row = DataMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    row.insert(key, value);
                }
                Ok(Value::Rows(vec![row]))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Scalar(value.clone())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(value.to_string())
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<Vec<DataMap>> for Value {
    fn from(rows: Vec<DataMap>) -> Self {
        Value::Rows(rows)
    }
}

impl From<DataMap> for Value {
    fn from(row: DataMap) -> Self {
        Value::Rows(vec![row])
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
