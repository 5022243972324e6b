//! Declared value types for generated columns.
//!
//! This module defines `DataType`, the set of column types a field generator
//! can produce. It mirrors the scalar type universe of the query engine the
//! generated datasets are loaded into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a generated column.
///
/// # YAML Format
///
/// Types are written as lowercase strings:
/// ```yaml
/// type: int64
/// type: varchar
/// type: array
/// type: json
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Boolean value
    Bool,

    /// 8-bit signed integer
    Int8,

    /// 16-bit signed integer
    Int16,

    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 32-bit IEEE 754 floating point
    Float,

    /// 64-bit IEEE 754 floating point
    Double,

    /// Variable-length UTF-8 string
    #[serde(rename = "varchar", alias = "string", alias = "text")]
    VarChar,

    /// Variable-length sequence of a scalar element type
    Array,

    /// JSON document (object or array) stored as text
    Json,
}

impl DataType {
    /// Whether this is one of the signed integer types.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Whether this is one of the floating point types.
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Inclusive value bounds for integer types.
    ///
    /// Returns `None` for non-integer types.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        match self {
            Self::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            Self::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// Check whether an integer fits into this type.
    pub fn fits_integer(&self, value: i64) -> bool {
        self.integer_bounds()
            .is_some_and(|(min, max)| (min..=max).contains(&value))
    }

    /// Lowercase name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::VarChar => "varchar",
            Self::Array => "array",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
