//! Maps a field configuration to its generator.

use crate::error::GeneratorError;
use crate::generators::{
    array, boolean, categorical, json, numeric, timestamp, varchar, ArrayGenerator,
    BooleanGenerator, CategoricalGenerator, FieldGenerator, JsonGenerator, NumericGenerator,
    TimestampGenerator, VarcharGenerator,
};
use datagen_core::{FieldConfig, GeneratorConfig};
use datagen_dictionary::DictionaryRegistry;
use tracing::debug;

/// Check a field configuration without touching any dictionary or file.
///
/// Covers the null settings shared by every kind, then the kind-specific
/// rules. Dictionary names and corpus files are only resolved by
/// [`create_generator`].
pub fn validate_config(field: &FieldConfig) -> Result<(), GeneratorError> {
    if !(0.0..=1.0).contains(&field.null_ratio) {
        return Err(GeneratorError::config(
            &field.name,
            format!("null_ratio {} must be within [0, 1]", field.null_ratio),
        ));
    }
    if field.null_ratio > 0.0 && !field.nullable {
        return Err(GeneratorError::config(
            &field.name,
            "null_ratio > 0 requires nullable: true",
        ));
    }

    match &field.generator {
        GeneratorConfig::Categorical(config) => categorical::validate(field, config),
        GeneratorConfig::Numeric(config) => numeric::validate(field, config),
        GeneratorConfig::Timestamp(config) => timestamp::validate(field, config),
        GeneratorConfig::Varchar(config) => varchar::validate(field, config),
        GeneratorConfig::Array(config) => array::validate(field, config),
        GeneratorConfig::Boolean(config) => boolean::validate(field, config),
        GeneratorConfig::Json(config) => json::validate(field, config),
    }
}

/// Validate `field` and build its generator, loading any pools it needs.
pub fn create_generator(
    field: &FieldConfig,
    registry: &DictionaryRegistry,
) -> Result<Box<dyn FieldGenerator>, GeneratorError> {
    validate_config(field)?;

    let generator: Box<dyn FieldGenerator> = match &field.generator {
        GeneratorConfig::Categorical(config) => {
            Box::new(CategoricalGenerator::new(field, config, registry)?)
        }
        GeneratorConfig::Numeric(config) => Box::new(NumericGenerator::new(field, config)?),
        GeneratorConfig::Timestamp(config) => Box::new(TimestampGenerator::new(field, config)?),
        GeneratorConfig::Varchar(config) => {
            Box::new(VarcharGenerator::new(field, config, registry)?)
        }
        GeneratorConfig::Array(config) => Box::new(ArrayGenerator::new(field, config, registry)?),
        GeneratorConfig::Boolean(config) => Box::new(BooleanGenerator::new(field, config)?),
        GeneratorConfig::Json(config) => Box::new(JsonGenerator::new(field, config, registry)?),
    };

    debug!(
        "Created {} generator for field '{}' ({})",
        field.generator.kind(),
        field.name,
        field.field_type
    );
    Ok(generator)
}
