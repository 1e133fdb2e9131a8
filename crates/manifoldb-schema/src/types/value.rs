//! Property values carried by index updates.
//!
//! This module provides the [`Value`] enum for the property values an index
//! populator receives, and [`ValueKind`], the shape-only classification used
//! to decide which populator a value is routed to.
//!
//! # Example
//!
//! ```
//! use manifoldb_schema::types::{Value, ValueKind};
//!
//! let age: Value = 30i64.into();
//! let name: Value = "Alice".into();
//!
//! assert_eq!(age.kind(), ValueKind::Int);
//! assert_eq!(name.kind(), ValueKind::String);
//! assert!(age.kind().is_number());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A property value as seen by an index populator.
///
/// | Variant | Rust Type | Kind |
/// |---------|-----------|------|
/// | `Null` | - | [`ValueKind::Null`] |
/// | `Bool` | `bool` | [`ValueKind::Bool`] |
/// | `Int` | `i64` | [`ValueKind::Int`] |
/// | `Float` | `f64` | [`ValueKind::Float`] |
/// | `String` | `String` | [`ValueKind::String`] |
/// | `Bytes` | `Vec<u8>` | [`ValueKind::Bytes`] |
/// | `Array` | `Vec<Value>` | [`ValueKind::Array`] |
/// | `Point` | `(x, y, srid)` | [`ValueKind::Point`] |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Array of values
    Array(Vec<Value>),
    /// Spatial point. `srid` 4326 is WGS84 geographic, 0 is cartesian.
    Point {
        /// X coordinate (or longitude for geographic points)
        x: f64,
        /// Y coordinate (or latitude for geographic points)
        y: f64,
        /// Spatial Reference System Identifier
        srid: u32,
    },
}

impl Value {
    /// Returns the shape of this value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Array(_) => ValueKind::Array,
            Self::Point { .. } => ValueKind::Point,
        }
    }

    /// Creates a 2D cartesian point.
    #[must_use]
    pub const fn cartesian_2d(x: f64, y: f64) -> Self {
        Self::Point { x, y, srid: 0 }
    }

    /// Creates a 2D geographic point (WGS84 - SRID 4326).
    #[must_use]
    pub const fn geographic_2d(latitude: f64, longitude: f64) -> Self {
        Self::Point { x: longitude, y: latitude, srid: 4326 }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Array(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Self::Point { x, y, srid } => write!(f, "point({x}, {y}, srid={srid})"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(values)
    }
}

/// Shape of a [`Value`], independent of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::String`]
    String,
    /// [`Value::Bytes`]
    Bytes,
    /// [`Value::Array`]
    Array,
    /// [`Value::Point`]
    Point,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Null,
        Self::Bool,
        Self::Int,
        Self::Float,
        Self::String,
        Self::Bytes,
        Self::Array,
        Self::Point,
    ];

    /// Returns `true` for integer and floating point kinds.
    #[inline]
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Get a string representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Array => "array",
            Self::Point => "point",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from(1i64).kind(), ValueKind::Int);
        assert_eq!(Value::from(1.5f64).kind(), ValueKind::Float);
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::from(vec![1u8, 2]).kind(), ValueKind::Bytes);
        assert_eq!(Value::from(vec![Value::Int(1)]).kind(), ValueKind::Array);
        assert_eq!(Value::cartesian_2d(1.0, 2.0).kind(), ValueKind::Point);
    }

    #[test]
    fn only_int_and_float_are_numbers() {
        let numbers: Vec<_> = ValueKind::ALL.into_iter().filter(|k| k.is_number()).collect();
        assert_eq!(numbers, vec![ValueKind::Int, ValueKind::Float]);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(Value::Array(vec![Value::Int(1), Value::Null]).to_string(), "[1, null]");
        assert_eq!(Value::geographic_2d(1.0, 2.0).to_string(), "point(2, 1, srid=4326)");
        assert_eq!(ValueKind::Float.to_string(), "float");
    }
}
