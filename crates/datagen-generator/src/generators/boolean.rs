//! Boolean value generator.

use super::{apply_nulls, require_type, FieldGenerator};
use crate::error::GeneratorError;
use crate::random::RandomContext;
use datagen_core::{BooleanConfig, Column, ColumnData, DataType, FieldConfig};

/// Validate a boolean configuration without building a generator.
pub fn validate(field: &FieldConfig, config: &BooleanConfig) -> Result<(), GeneratorError> {
    require_type(field, "boolean", &[DataType::Bool])?;
    if let Some(ratio) = config.true_ratio {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(GeneratorError::config(
                &field.name,
                format!("true_ratio {ratio} must be within [0, 1]"),
            ));
        }
    }
    Ok(())
}

/// Generator for Bernoulli-sampled bool columns.
pub struct BooleanGenerator {
    field: FieldConfig,
    true_probability: f64,
}

impl BooleanGenerator {
    /// Validate the configuration and build the generator.
    pub fn new(field: &FieldConfig, config: &BooleanConfig) -> Result<Self, GeneratorError> {
        validate(field, config)?;
        Ok(Self {
            field: field.clone(),
            true_probability: config.true_probability(),
        })
    }
}

impl FieldGenerator for BooleanGenerator {
    fn config(&self) -> &FieldConfig {
        &self.field
    }

    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError> {
        let mut values: Vec<bool> = (0..rows)
            .map(|_| ctx.bernoulli(self.true_probability))
            .collect();
        let validity = apply_nulls(&self.field, &mut values, ctx);

        Ok(Column::new(self.field.name.clone(), ColumnData::Bool(values)).with_validity(validity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagen_core::GeneratorConfig;

    fn build(true_ratio: Option<f64>) -> Result<BooleanGenerator, GeneratorError> {
        let config = BooleanConfig { true_ratio };
        let field = FieldConfig::new("b", DataType::Bool, GeneratorConfig::Boolean(config.clone()));
        BooleanGenerator::new(&field, &config)
    }

    fn true_count(generator: &mut BooleanGenerator, rows: usize) -> usize {
        let column = generator.generate(rows, &mut RandomContext::new(9)).unwrap();
        match column.data {
            ColumnData::Bool(values) => values.into_iter().filter(|v| *v).count(),
            other => panic!("Expected bool column, got {other:?}"),
        }
    }

    #[test]
    fn test_default_ratio_is_half() {
        let mut generator = build(None).unwrap();
        let count = true_count(&mut generator, 10_000);
        assert!(count > 4_700 && count < 5_300);
    }

    #[test]
    fn test_explicit_ratio() {
        let mut always = build(Some(1.0)).unwrap();
        assert_eq!(true_count(&mut always, 100), 100);

        let mut never = build(Some(0.0)).unwrap();
        assert_eq!(true_count(&mut never, 100), 0);
    }

    #[test]
    fn test_ratio_out_of_range() {
        assert!(build(Some(1.5)).is_err());
    }

    #[test]
    fn test_nulls_are_false() {
        let config = BooleanConfig { true_ratio: Some(1.0) };
        let field = FieldConfig::new("b", DataType::Bool, GeneratorConfig::Boolean(config.clone()))
            .with_nulls(0.5);
        let mut generator = BooleanGenerator::new(&field, &config).unwrap();
        let column = generator.generate(1000, &mut RandomContext::new(1)).unwrap();

        let ColumnData::Bool(values) = &column.data else {
            panic!("Expected bool column");
        };
        for (i, value) in values.iter().enumerate() {
            assert_eq!(*value, column.is_valid(i));
        }
        assert!(column.null_count() > 400 && column.null_count() < 600);
    }
}
