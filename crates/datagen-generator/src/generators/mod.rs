//! Field generators, one per generator kind.
//!
//! Each generator is built once per field by the factory (loading and
//! validating its pools) and produces a whole column per `generate` call.

pub mod array;
pub mod boolean;
pub mod categorical;
pub mod json;
pub mod numeric;
pub mod timestamp;
pub mod varchar;

use crate::error::GeneratorError;
use crate::random::RandomContext;
use datagen_core::{Column, DataType, FieldConfig};

pub use array::ArrayGenerator;
pub use boolean::BooleanGenerator;
pub use categorical::CategoricalGenerator;
pub use json::JsonGenerator;
pub use numeric::NumericGenerator;
pub use timestamp::TimestampGenerator;
pub use varchar::VarcharGenerator;

/// Trait implemented by every generator kind.
pub trait FieldGenerator: Send {
    /// Configuration this generator was built from.
    fn config(&self) -> &FieldConfig;

    /// Generate `rows` values as one column.
    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError>;
}

/// Draw the validity mask for a field and blank out null rows.
///
/// Returns `None` unless the field is nullable with a positive null ratio.
pub(crate) fn apply_nulls<T: Default>(
    field: &FieldConfig,
    values: &mut [T],
    ctx: &mut RandomContext,
) -> Option<Vec<bool>> {
    if !field.emits_validity() {
        return None;
    }

    let mask = values
        .iter_mut()
        .map(|value| {
            let valid = !ctx.bernoulli(field.null_ratio);
            if !valid {
                *value = T::default();
            }
            valid
        })
        .collect();
    Some(mask)
}

/// Truncate `value` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_utf8(value: &mut String, max_bytes: usize) {
    if value.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
}

/// Fail unless the field's declared type is one of `allowed`.
pub(crate) fn require_type(
    field: &FieldConfig,
    kind: &str,
    allowed: &[DataType],
) -> Result<(), GeneratorError> {
    if allowed.contains(&field.field_type) {
        return Ok(());
    }
    let names: Vec<&str> = allowed.iter().map(DataType::as_str).collect();
    Err(GeneratorError::config(
        &field.name,
        format!(
            "{kind} generator cannot produce {} (expected {})",
            field.field_type,
            names.join(", ")
        ),
    ))
}

/// Integer types plus varchar.
pub(crate) const CATEGORICAL_TYPES: &[DataType] = &[
    DataType::Int8,
    DataType::Int16,
    DataType::Int32,
    DataType::Int64,
    DataType::VarChar,
];

/// Integer and floating point types.
pub(crate) const NUMERIC_TYPES: &[DataType] = &[
    DataType::Int8,
    DataType::Int16,
    DataType::Int32,
    DataType::Int64,
    DataType::Float,
    DataType::Double,
];
