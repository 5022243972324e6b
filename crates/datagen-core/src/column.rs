//! Typed column representation.
//!
//! This is the contract between the field generators and whatever consumes
//! their output (a segment loader, a CSV writer, a test). Every generator
//! returns exactly one [`Column`]: a typed vector of values plus an optional
//! validity mask.

use crate::types::DataType;
use crate::values::ScalarValue;

/// Values of one generated column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Boolean values
    Bool(Vec<bool>),

    /// 8-bit integers
    Int8(Vec<i8>),

    /// 16-bit integers
    Int16(Vec<i16>),

    /// 32-bit integers
    Int32(Vec<i32>),

    /// 64-bit integers
    Int64(Vec<i64>),

    /// 32-bit floats
    Float(Vec<f32>),

    /// 64-bit floats
    Double(Vec<f64>),

    /// Strings
    VarChar(Vec<String>),

    /// Serialized JSON documents
    Json(Vec<String>),

    /// One scalar column per row
    Array {
        /// Type of every element in every row
        element_type: DataType,
        /// Per-row element vectors
        rows: Vec<ColumnData>,
    },
}

impl ColumnData {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::VarChar(v) | Self::Json(v) => v.len(),
            Self::Array { rows, .. } => rows.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared type of this column.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::VarChar(_) => DataType::VarChar,
            Self::Json(_) => DataType::Json,
            Self::Array { .. } => DataType::Array,
        }
    }

    /// Value at `index` as a scalar, or `None` for array columns and
    /// out-of-range indices.
    pub fn scalar_at(&self, index: usize) -> Option<ScalarValue> {
        match self {
            Self::Bool(v) => v.get(index).map(|b| ScalarValue::Bool(*b)),
            Self::Int8(v) => v.get(index).map(|i| ScalarValue::Int(*i as i64)),
            Self::Int16(v) => v.get(index).map(|i| ScalarValue::Int(*i as i64)),
            Self::Int32(v) => v.get(index).map(|i| ScalarValue::Int(*i as i64)),
            Self::Int64(v) => v.get(index).map(|i| ScalarValue::Int(*i)),
            Self::Float(v) => v.get(index).map(|f| ScalarValue::Float(*f as f64)),
            Self::Double(v) => v.get(index).map(|f| ScalarValue::Float(*f)),
            Self::VarChar(v) | Self::Json(v) => v.get(index).map(|s| ScalarValue::Text(s.clone())),
            Self::Array { .. } => None,
        }
    }

    /// Consume a scalar column into its values.
    ///
    /// Returns `None` for array columns.
    pub fn into_scalars(self) -> Option<Vec<ScalarValue>> {
        let values = match self {
            Self::Bool(v) => v.into_iter().map(ScalarValue::Bool).collect(),
            Self::Int8(v) => v.into_iter().map(|i| ScalarValue::Int(i as i64)).collect(),
            Self::Int16(v) => v.into_iter().map(|i| ScalarValue::Int(i as i64)).collect(),
            Self::Int32(v) => v.into_iter().map(|i| ScalarValue::Int(i as i64)).collect(),
            Self::Int64(v) => v.into_iter().map(ScalarValue::Int).collect(),
            Self::Float(v) => v
                .into_iter()
                .map(|f| ScalarValue::Float(f as f64))
                .collect(),
            Self::Double(v) => v.into_iter().map(ScalarValue::Float).collect(),
            Self::VarChar(v) | Self::Json(v) => v.into_iter().map(ScalarValue::Text).collect(),
            Self::Array { .. } => return None,
        };
        Some(values)
    }

    /// Build a scalar column of `data_type` from values.
    ///
    /// Fails if a value has the wrong kind or does not fit the declared width.
    pub fn from_scalars(data_type: DataType, values: Vec<ScalarValue>) -> Result<Self, String> {
        fn collect<T>(
            values: Vec<ScalarValue>,
            data_type: DataType,
            convert: impl Fn(ScalarValue) -> Option<T>,
        ) -> Result<Vec<T>, String> {
            values
                .into_iter()
                .map(|value| {
                    let text = value.to_string();
                    convert(value).ok_or_else(|| format!("value '{text}' is not a valid {data_type}"))
                })
                .collect()
        }

        let data = match data_type {
            DataType::Bool => Self::Bool(collect(values, data_type, |v| match v {
                ScalarValue::Bool(b) => Some(b),
                _ => None,
            })?),
            DataType::Int8 => Self::Int8(collect(values, data_type, |v| match v {
                ScalarValue::Int(i) => i8::try_from(i).ok(),
                _ => None,
            })?),
            DataType::Int16 => Self::Int16(collect(values, data_type, |v| match v {
                ScalarValue::Int(i) => i16::try_from(i).ok(),
                _ => None,
            })?),
            DataType::Int32 => Self::Int32(collect(values, data_type, |v| match v {
                ScalarValue::Int(i) => i32::try_from(i).ok(),
                _ => None,
            })?),
            DataType::Int64 => Self::Int64(collect(values, data_type, |v| match v {
                ScalarValue::Int(i) => Some(i),
                _ => None,
            })?),
            DataType::Float => Self::Float(collect(values, data_type, |v| match v {
                ScalarValue::Float(f) => Some(f as f32),
                _ => None,
            })?),
            DataType::Double => Self::Double(collect(values, data_type, |v| match v {
                ScalarValue::Float(f) => Some(f),
                _ => None,
            })?),
            DataType::VarChar => Self::VarChar(collect(values, data_type, |v| match v {
                ScalarValue::Text(s) => Some(s),
                _ => None,
            })?),
            DataType::Json => Self::Json(collect(values, data_type, |v| match v {
                ScalarValue::Text(s) => Some(s),
                _ => None,
            })?),
            DataType::Array => return Err("nested arrays are not supported".to_string()),
        };
        Ok(data)
    }

    /// Render the value at `index` as JSON.
    pub fn json_at(&self, index: usize) -> serde_json::Value {
        match self {
            Self::Array { rows, .. } => match rows.get(index) {
                Some(row) => serde_json::Value::Array(
                    (0..row.len())
                        .filter_map(|i| row.scalar_at(i))
                        .map(|v| v.to_json())
                        .collect(),
                ),
                None => serde_json::Value::Null,
            },
            Self::Json(v) => match v.get(index) {
                Some(text) => serde_json::from_str(text)
                    .unwrap_or_else(|_| serde_json::Value::String(text.clone())),
                None => serde_json::Value::Null,
            },
            _ => self
                .scalar_at(index)
                .map(|v| v.to_json())
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

/// A generated column: name, values and validity.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Field name
    pub name: String,

    /// Column values; null rows hold a zero or empty sentinel
    pub data: ColumnData,

    /// Validity mask (`true` = value present), only for nullable fields
    /// generated with a positive null ratio
    pub validity: Option<Vec<bool>>,
}

impl Column {
    /// Create a column without a validity mask.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
            validity: None,
        }
    }

    /// Attach a validity mask.
    pub fn with_validity(mut self, validity: Option<Vec<bool>>) -> Self {
        self.validity = validity;
        self
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the row at `index` holds a value.
    pub fn is_valid(&self, index: usize) -> bool {
        self.validity
            .as_ref()
            .map_or(true, |mask| mask.get(index).copied().unwrap_or(false))
    }

    /// Number of null rows.
    pub fn null_count(&self) -> usize {
        self.validity
            .as_ref()
            .map_or(0, |mask| mask.iter().filter(|valid| !**valid).count())
    }
}

/// All columns generated for one dataset.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    /// Number of rows in every column
    pub row_count: usize,

    /// Columns in field declaration order
    pub columns: Vec<Column>,
}

impl ColumnSet {
    /// Get a column by field name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
