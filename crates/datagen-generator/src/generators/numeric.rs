//! Numeric value generator.
//!
//! Samples are drawn in an integer domain (`i64`) for the integer types and
//! in a real domain (`f64`) for float/double, then converted to the declared
//! width with checked conversions.

use super::{apply_nulls, require_type, FieldGenerator, NUMERIC_TYPES};
use crate::error::GeneratorError;
use crate::random::RandomContext;
use datagen_core::{Column, ColumnData, DataType, Distribution, FieldConfig, NumericConfig};
use tracing::warn;

/// Most distinct Zipf ranks per field; wider domains are spaced linearly.
pub const MAX_ZIPF_RANKS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    Integer,
    Real,
}

/// Validate a numeric configuration without building a generator.
pub fn validate(field: &FieldConfig, config: &NumericConfig) -> Result<(), GeneratorError> {
    require_type(field, "numeric", NUMERIC_TYPES)?;
    let name = field.name.as_str();
    let range = config.range;

    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(GeneratorError::config(name, "range bounds must be finite"));
    }
    if range.min > range.max {
        return Err(GeneratorError::config(
            name,
            format!("range.min {} > range.max {}", range.min, range.max),
        ));
    }
    if config.step == 0 {
        return Err(GeneratorError::config(name, "step must be positive"));
    }
    if config.distribution == Distribution::Sequential && !field.field_type.is_integer() {
        return Err(GeneratorError::config(
            name,
            "sequential distribution only supports integer types",
        ));
    }
    if config.precision.is_some() && !field.field_type.is_real() {
        return Err(GeneratorError::config(
            name,
            "precision only applies to float and double",
        ));
    }
    if !(0.0..=1.0).contains(&config.outliers.ratio) {
        return Err(GeneratorError::config(
            name,
            format!("outliers.ratio {} must be within [0, 1]", config.outliers.ratio),
        ));
    }

    check_representable(field, "range.min", range.min)?;
    check_representable(field, "range.max", range.max)?;
    for (i, value) in config.outliers.values.iter().enumerate() {
        check_representable(field, &format!("outliers.values[{i}]"), *value)?;
    }

    let mut total_weight = 0.0;
    for (i, bucket) in config.buckets.iter().enumerate() {
        if !(bucket.weight >= 0.0) || !bucket.weight.is_finite() {
            return Err(GeneratorError::config(
                name,
                format!("buckets[{i}].weight must be a non-negative number"),
            ));
        }
        if bucket.min > bucket.max {
            return Err(GeneratorError::config(
                name,
                format!("buckets[{i}].min {} > max {}", bucket.min, bucket.max),
            ));
        }
        check_representable(field, &format!("buckets[{i}].min"), bucket.min)?;
        check_representable(field, &format!("buckets[{i}].max"), bucket.max)?;
        total_weight += bucket.weight;
    }
    if !config.buckets.is_empty() && total_weight <= 0.0 {
        return Err(GeneratorError::config(
            name,
            "bucket weights must not all be zero",
        ));
    }

    Ok(())
}

/// Integer types need whole numbers within the declared width; float needs
/// values within `f32` range.
fn check_representable(field: &FieldConfig, what: &str, value: f64) -> Result<(), GeneratorError> {
    if !value.is_finite() {
        return Err(GeneratorError::config(
            &field.name,
            format!("{what} must be finite"),
        ));
    }
    if let Some((min, max)) = field.field_type.integer_bounds() {
        if value.fract() != 0.0 {
            return Err(GeneratorError::config(
                &field.name,
                format!("{what} {value} is not a whole number"),
            ));
        }
        // i64::MAX is not exactly representable; compare in f64 space
        if value < min as f64 || value > max as f64 || value >= i64::MAX as f64 {
            return Err(GeneratorError::config(
                &field.name,
                format!("{what} {value} does not fit into {}", field.field_type),
            ));
        }
    } else if field.field_type == DataType::Float && value.abs() > f32::MAX as f64 {
        return Err(GeneratorError::config(
            &field.name,
            format!("{what} {value} does not fit into float"),
        ));
    }
    Ok(())
}

/// Generator for integer, float and double columns.
pub struct NumericGenerator {
    field: FieldConfig,
    config: NumericConfig,
    domain: Domain,
    cumulative_weights: Vec<f64>,
}

impl NumericGenerator {
    /// Validate the configuration and build the generator.
    pub fn new(field: &FieldConfig, config: &NumericConfig) -> Result<Self, GeneratorError> {
        validate(field, config)?;

        let domain = if field.field_type.is_integer() {
            Domain::Integer
        } else {
            Domain::Real
        };

        for bucket in &config.buckets {
            if bucket.min < config.range.min || bucket.max > config.range.max {
                warn!(
                    "Field '{}': bucket [{}, {}] lies outside range [{}, {}]",
                    field.name, bucket.min, bucket.max, config.range.min, config.range.max
                );
            }
        }

        let cumulative_weights = config
            .buckets
            .iter()
            .scan(0.0, |total, bucket| {
                *total += bucket.weight;
                Some(*total)
            })
            .collect();

        Ok(Self {
            field: field.clone(),
            config: config.clone(),
            domain,
            cumulative_weights,
        })
    }

    fn sample_integers(&self, rows: usize, ctx: &mut RandomContext) -> Vec<i64> {
        let min = self.config.range.min as i64;
        let max = self.config.range.max as i64;

        match self.config.distribution {
            Distribution::Uniform => (0..rows).map(|_| ctx.uniform_int(min, max)).collect(),
            Distribution::Normal => (0..rows)
                .map(|_| self.sample_normal(ctx).round() as i64)
                .collect(),
            Distribution::Zipf => (0..rows)
                .map(|_| self.sample_zipf(ctx).round() as i64)
                .collect(),
            Distribution::Sequential => {
                let step = i64::try_from(self.config.step).unwrap_or(i64::MAX);
                let mut current = min;
                let mut values = Vec::with_capacity(rows);
                for _ in 0..rows {
                    values.push(current);
                    current = match current.checked_add(step) {
                        Some(next) if next <= max => next,
                        _ => min,
                    };
                }
                values
            }
            Distribution::CustomHist => {
                if self.config.buckets.is_empty() {
                    return (0..rows).map(|_| ctx.uniform_int(min, max)).collect();
                }
                (0..rows)
                    .map(|_| {
                        let bucket = &self.config.buckets[self.pick_bucket(ctx)];
                        ctx.uniform_int(bucket.min as i64, bucket.max as i64)
                    })
                    .collect()
            }
        }
    }

    fn sample_reals(&self, rows: usize, ctx: &mut RandomContext) -> Vec<f64> {
        let min = self.config.range.min;
        let max = self.config.range.max;

        match self.config.distribution {
            Distribution::Normal => (0..rows).map(|_| self.sample_normal(ctx)).collect(),
            Distribution::Zipf => (0..rows).map(|_| self.sample_zipf(ctx)).collect(),
            Distribution::CustomHist if !self.config.buckets.is_empty() => (0..rows)
                .map(|_| {
                    let bucket = &self.config.buckets[self.pick_bucket(ctx)];
                    ctx.uniform_real(bucket.min, bucket.max)
                })
                .collect(),
            // Sequential is rejected for real types at validation
            _ => (0..rows).map(|_| ctx.uniform_real(min, max)).collect(),
        }
    }

    /// Gaussian around the midpoint with sd = span / 6, clamped into range.
    fn sample_normal(&self, ctx: &mut RandomContext) -> f64 {
        let min = self.config.range.min;
        let max = self.config.range.max;
        let mean = min / 2.0 + max / 2.0;
        let std_dev = (max / 6.0) - (min / 6.0);
        ctx.normal(mean, std_dev).clamp(min, max)
    }

    /// Zipf rank over the integer points of the range, rank 0 at `min`.
    fn sample_zipf(&self, ctx: &mut RandomContext) -> f64 {
        let min = self.config.range.min;
        let span = (self.config.range.max - min).floor();

        if span + 1.0 <= MAX_ZIPF_RANKS as f64 {
            let ranks = span as usize + 1;
            min + ctx.zipf(ranks, 1.0) as f64
        } else {
            let rank = ctx.zipf(MAX_ZIPF_RANKS, 1.0) as f64;
            min + rank * (span / (MAX_ZIPF_RANKS - 1) as f64)
        }
    }

    fn pick_bucket(&self, ctx: &mut RandomContext) -> usize {
        let total = self.cumulative_weights.last().copied().unwrap_or(0.0);
        let r = ctx.uniform_real(0.0, total);
        self.cumulative_weights
            .partition_point(|&c| c <= r)
            .min(self.cumulative_weights.len() - 1)
    }

    fn outlier_index(&self, ctx: &mut RandomContext) -> Option<usize> {
        let outliers = &self.config.outliers;
        if outliers.values.is_empty() || !ctx.bernoulli(outliers.ratio) {
            return None;
        }
        Some(ctx.uniform_index(outliers.values.len()))
    }

    fn apply_precision(&self, values: &mut [f64]) {
        if let Some(digits) = self.config.precision {
            let multiplier = 10f64.powi(digits as i32);
            for value in values.iter_mut() {
                let rounded = (*value * multiplier).round() / multiplier;
                if rounded.is_finite() {
                    *value = rounded;
                }
            }
        }
    }

    fn integer_column(&self, values: Vec<i64>) -> Result<ColumnData, GeneratorError> {
        fn narrow<T: TryFrom<i64>>(field: &FieldConfig, values: Vec<i64>) -> Result<Vec<T>, GeneratorError> {
            values
                .into_iter()
                .map(|v| {
                    T::try_from(v).map_err(|_| {
                        GeneratorError::logic(
                            &field.name,
                            format!("value {v} does not fit into {}", field.field_type),
                        )
                    })
                })
                .collect()
        }

        Ok(match self.field.field_type {
            DataType::Int8 => ColumnData::Int8(narrow(&self.field, values)?),
            DataType::Int16 => ColumnData::Int16(narrow(&self.field, values)?),
            DataType::Int32 => ColumnData::Int32(narrow(&self.field, values)?),
            DataType::Int64 => ColumnData::Int64(values),
            other => {
                return Err(GeneratorError::logic(
                    &self.field.name,
                    format!("integer samples cannot be stored as {other}"),
                ))
            }
        })
    }
}

impl FieldGenerator for NumericGenerator {
    fn config(&self) -> &FieldConfig {
        &self.field
    }

    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError> {
        let (data, validity) = match self.domain {
            Domain::Integer => {
                let mut values = self.sample_integers(rows, ctx);
                for value in values.iter_mut() {
                    if let Some(idx) = self.outlier_index(ctx) {
                        *value = self.config.outliers.values[idx].round() as i64;
                    }
                }
                let validity = apply_nulls(&self.field, &mut values, ctx);
                (self.integer_column(values)?, validity)
            }
            Domain::Real => {
                let mut values = self.sample_reals(rows, ctx);
                self.apply_precision(&mut values);
                for value in values.iter_mut() {
                    if let Some(idx) = self.outlier_index(ctx) {
                        *value = self.config.outliers.values[idx];
                    }
                }
                let validity = apply_nulls(&self.field, &mut values, ctx);
                let data = if self.field.field_type == DataType::Float {
                    ColumnData::Float(values.into_iter().map(|v| v as f32).collect())
                } else {
                    ColumnData::Double(values)
                };
                (data, validity)
            }
        };

        Ok(Column::new(self.field.name.clone(), data).with_validity(validity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagen_core::{BucketConfig, GeneratorConfig, OutlierConfig};

    fn field(data_type: DataType, config: NumericConfig) -> FieldConfig {
        FieldConfig::new("n", data_type, GeneratorConfig::Numeric(config))
    }

    fn build(data_type: DataType, config: NumericConfig) -> NumericGenerator {
        let field = field(data_type, config.clone());
        NumericGenerator::new(&field, &config).unwrap()
    }

    #[test]
    fn test_sequential_wraps() {
        let config = NumericConfig::new(0.0, 9.0).with_distribution(Distribution::Sequential);
        let mut generator = build(DataType::Int64, config);
        let column = generator.generate(25, &mut RandomContext::new(1)).unwrap();

        let expected: Vec<i64> = (0..10).chain(0..10).chain(0..5).collect();
        assert_eq!(column.data, ColumnData::Int64(expected));
    }

    #[test]
    fn test_sequential_step() {
        let mut config = NumericConfig::new(0.0, 9.0).with_distribution(Distribution::Sequential);
        config.step = 4;
        let mut generator = build(DataType::Int32, config);
        let column = generator.generate(5, &mut RandomContext::new(1)).unwrap();
        assert_eq!(column.data, ColumnData::Int32(vec![0, 4, 8, 0, 4]));
    }

    #[test]
    fn test_sequential_requires_integers() {
        let config = NumericConfig::new(0.0, 9.0).with_distribution(Distribution::Sequential);
        let field = field(DataType::Double, config.clone());
        assert!(NumericGenerator::new(&field, &config).is_err());
    }

    #[test]
    fn test_uniform_int8_within_range() {
        let mut generator = build(DataType::Int8, NumericConfig::new(-128.0, 127.0));
        let column = generator.generate(1000, &mut RandomContext::new(2)).unwrap();
        assert!(matches!(column.data, ColumnData::Int8(ref v) if v.len() == 1000));
    }

    #[test]
    fn test_integer_range_must_fit_type() {
        let config = NumericConfig::new(0.0, 300.0);
        let int8_field = field(DataType::Int8, config.clone());
        let err = NumericGenerator::new(&int8_field, &config).err().unwrap();
        assert!(err.to_string().contains("does not fit into int8"));

        let config = NumericConfig::new(0.5, 3.0);
        let int32_field = field(DataType::Int32, config.clone());
        assert!(NumericGenerator::new(&int32_field, &config).is_err());
    }

    #[test]
    fn test_normal_rounds_integers() {
        let mut generator = build(
            DataType::Int64,
            NumericConfig::new(0.0, 2.0).with_distribution(Distribution::Normal),
        );
        let column = generator.generate(10_000, &mut RandomContext::new(3)).unwrap();
        let ColumnData::Int64(values) = column.data else {
            panic!("Expected int64 column");
        };
        // Rounding keeps the midpoint most common; truncation would favor 0
        let ones = values.iter().filter(|v| **v == 1).count();
        let zeros = values.iter().filter(|v| **v == 0).count();
        assert!(ones > zeros);
        assert!(values.iter().all(|v| (0..=2).contains(v)));
    }

    #[test]
    fn test_zipf_favors_min() {
        let mut generator = build(
            DataType::Int64,
            NumericConfig::new(100.0, 199.0).with_distribution(Distribution::Zipf),
        );
        let column = generator.generate(10_000, &mut RandomContext::new(4)).unwrap();
        let ColumnData::Int64(values) = column.data else {
            panic!("Expected int64 column");
        };
        let at_min = values.iter().filter(|v| **v == 100).count();
        assert!(at_min > values.len() / 10);
        assert!(values.iter().all(|v| (100..=199).contains(v)));
    }

    #[test]
    fn test_zipf_wide_domain_stays_in_range() {
        let mut generator = build(
            DataType::Int64,
            NumericConfig::new(0.0, 1e12).with_distribution(Distribution::Zipf),
        );
        let column = generator.generate(1000, &mut RandomContext::new(4)).unwrap();
        let ColumnData::Int64(values) = column.data else {
            panic!("Expected int64 column");
        };
        assert!(values.iter().all(|v| (0..=1_000_000_000_000).contains(v)));
    }

    #[test]
    fn test_custom_hist_uses_buckets() {
        let mut config =
            NumericConfig::new(0.0, 100.0).with_distribution(Distribution::CustomHist);
        config.buckets = vec![
            BucketConfig { weight: 0.0, min: 0.0, max: 10.0 },
            BucketConfig { weight: 1.0, min: 50.0, max: 60.0 },
        ];
        let mut generator = build(DataType::Int32, config);
        let column = generator.generate(1000, &mut RandomContext::new(5)).unwrap();
        let ColumnData::Int32(values) = column.data else {
            panic!("Expected int32 column");
        };
        assert!(values.iter().all(|v| (50..=60).contains(v)));
    }

    #[test]
    fn test_custom_hist_without_buckets_is_uniform() {
        let config = NumericConfig::new(0.0, 1.0).with_distribution(Distribution::CustomHist);
        let mut generator = build(DataType::Double, config);
        let column = generator.generate(100, &mut RandomContext::new(5)).unwrap();
        let ColumnData::Double(values) = column.data else {
            panic!("Expected double column");
        };
        assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_precision_then_outliers() {
        let mut config = NumericConfig::new(0.0, 1.0);
        config.precision = Some(2);
        config.outliers = OutlierConfig {
            ratio: 0.5,
            values: vec![1234.5678],
        };
        let mut generator = build(DataType::Double, config);
        let column = generator.generate(1000, &mut RandomContext::new(6)).unwrap();
        let ColumnData::Double(values) = column.data else {
            panic!("Expected double column");
        };

        let outliers = values.iter().filter(|v| **v == 1234.5678).count();
        assert!(outliers > 350 && outliers < 650);
        for v in values.iter().filter(|v| **v != 1234.5678) {
            assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_integer_outliers_must_be_whole() {
        let mut config = NumericConfig::new(0.0, 10.0);
        config.outliers = OutlierConfig {
            ratio: 0.1,
            values: vec![2.5],
        };
        let field = field(DataType::Int64, config.clone());
        assert!(NumericGenerator::new(&field, &config).is_err());
    }

    #[test]
    fn test_nulls_zero_values() {
        let config = NumericConfig::new(5.0, 10.0);
        let field = field(DataType::Int16, config.clone()).with_nulls(1.0);
        let mut generator = NumericGenerator::new(&field, &config).unwrap();
        let column = generator.generate(10, &mut RandomContext::new(7)).unwrap();

        assert_eq!(column.null_count(), 10);
        assert_eq!(column.data, ColumnData::Int16(vec![0; 10]));
    }

    #[test]
    fn test_deterministic_generation() {
        let config = NumericConfig::new(-1.0, 1.0).with_distribution(Distribution::Normal);
        let mut a = build(DataType::Float, config.clone());
        let mut b = build(DataType::Float, config);

        let col_a = a.generate(100, &mut RandomContext::new(42)).unwrap();
        let col_b = b.generate(100, &mut RandomContext::new(42)).unwrap();
        assert_eq!(col_a, col_b);
    }
}
