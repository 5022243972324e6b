//! Single cell values.
//!
//! Columns are stored as typed vectors (see [`crate::column`]), but a few
//! places need to look at individual elements without knowing the column
//! type up front: array containment rules, array element de-duplication and
//! textual export. `ScalarValue` is the uniform representation used there.

use crate::types::DataType;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single non-array cell value.
///
/// Floating point values compare and hash by their bit pattern so that
/// values can be stored in hash sets when enforcing array uniqueness.
#[derive(Debug, Clone)]
pub enum ScalarValue {
    /// Boolean value
    Bool(bool),

    /// Any integer width, widened to 64 bits
    Int(i64),

    /// Any floating point width, widened to 64 bits
    Float(f64),

    /// String value
    Text(String),
}

impl ScalarValue {
    /// Parse a configuration literal into a value of the given element type.
    ///
    /// Integer literals must fit the declared width; arrays cannot be parsed.
    pub fn parse(literal: &str, data_type: DataType) -> Result<Self, String> {
        let trimmed = literal.trim();
        match data_type {
            DataType::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Self::Bool(true)),
                "false" | "0" | "no" => Ok(Self::Bool(false)),
                _ => Err(format!("'{literal}' is not a boolean")),
            },
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
                let value: i64 = trimmed
                    .parse()
                    .map_err(|_| format!("'{literal}' is not an integer"))?;
                if !data_type.fits_integer(value) {
                    return Err(format!("{value} does not fit into {data_type}"));
                }
                Ok(Self::Int(value))
            }
            DataType::Float | DataType::Double => {
                let value: f64 = trimmed
                    .parse()
                    .map_err(|_| format!("'{literal}' is not a number"))?;
                // Float columns store f32; literals must compare equal to stored values
                if data_type == DataType::Float {
                    Ok(Self::Float(value as f32 as f64))
                } else {
                    Ok(Self::Float(value))
                }
            }
            DataType::VarChar => Ok(Self::Text(literal.to_string())),
            DataType::Json => serde_json::from_str::<serde_json::Value>(trimmed)
                .map(|_| Self::Text(trimmed.to_string()))
                .map_err(|e| format!("'{literal}' is not valid JSON: {e}")),
            DataType::Array => Err("array values cannot be written as literals".to_string()),
        }
    }

    /// Convert to a JSON value (used for array cells in text exports).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            ScalarValue::parse("42", DataType::Int32).unwrap(),
            ScalarValue::Int(42)
        );
        assert_eq!(
            ScalarValue::parse("yes", DataType::Bool).unwrap(),
            ScalarValue::Bool(true)
        );
        assert_eq!(
            ScalarValue::parse("1.5", DataType::Double).unwrap(),
            ScalarValue::Float(1.5)
        );
        assert_eq!(
            ScalarValue::parse("0.1", DataType::Float).unwrap(),
            ScalarValue::Float(0.1f32 as f64)
        );
        assert_eq!(
            ScalarValue::parse("0.1", DataType::Double).unwrap(),
            ScalarValue::Float(0.1)
        );
        assert_eq!(
            ScalarValue::parse(" red ", DataType::VarChar).unwrap(),
            ScalarValue::Text(" red ".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(ScalarValue::parse("300", DataType::Int8).is_err());
        assert!(ScalarValue::parse("abc", DataType::Int64).is_err());
        assert!(ScalarValue::parse("x", DataType::Array).is_err());
    }

    #[test]
    fn test_parse_json_documents() {
        assert_eq!(
            ScalarValue::parse(r#" {"k": [1, 2]} "#, DataType::Json).unwrap(),
            ScalarValue::Text(r#"{"k": [1, 2]}"#.to_string())
        );
        assert!(ScalarValue::parse("{not json", DataType::Json).is_err());
    }

    #[test]
    fn test_float_hashing_by_bits() {
        let mut set = HashSet::new();
        set.insert(ScalarValue::Float(0.5));
        set.insert(ScalarValue::Float(0.5));
        set.insert(ScalarValue::Int(1));
        assert_eq!(set.len(), 2);
    }
}
