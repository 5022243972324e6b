//! Timestamp value generator.
//!
//! Produces int64 epoch values in a fixed range, optionally concentrated in
//! hotspot windows and perturbed by a symmetric jitter.

use super::{apply_nulls, require_type, FieldGenerator};
use crate::error::GeneratorError;
use crate::random::RandomContext;
use datagen_core::{Column, ColumnData, DataType, FieldConfig, TimestampConfig};

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Validate a timestamp configuration without building a generator.
pub fn validate(field: &FieldConfig, config: &TimestampConfig) -> Result<(), GeneratorError> {
    require_type(field, "timestamp", &[DataType::Int64])?;
    let name = field.name.as_str();

    if config.range.start > config.range.end {
        return Err(GeneratorError::config(
            name,
            format!(
                "range.start {} > range.end {}",
                config.range.start, config.range.end
            ),
        ));
    }
    if config.jitter < 0 {
        return Err(GeneratorError::config(name, "jitter must not be negative"));
    }

    let mut total = 0.0;
    for (i, hotspot) in config.hotspots.iter().enumerate() {
        if !(hotspot.weight >= 0.0) {
            return Err(GeneratorError::config(
                name,
                format!("hotspots[{i}].weight must not be negative"),
            ));
        }
        if hotspot.window.start > hotspot.window.end {
            return Err(GeneratorError::config(
                name,
                format!("hotspots[{i}].window.start > window.end"),
            ));
        }
        total += hotspot.weight;
    }
    if total > 1.0 + WEIGHT_TOLERANCE {
        return Err(GeneratorError::config(
            name,
            format!("total hotspot weight {total} exceeds 1.0"),
        ));
    }

    Ok(())
}

/// Generator for epoch-like int64 columns.
pub struct TimestampGenerator {
    field: FieldConfig,
    config: TimestampConfig,
    total_weight: f64,
}

impl TimestampGenerator {
    /// Validate the configuration and build the generator.
    pub fn new(field: &FieldConfig, config: &TimestampConfig) -> Result<Self, GeneratorError> {
        validate(field, config)?;
        Ok(Self {
            field: field.clone(),
            config: config.clone(),
            total_weight: config.hotspots.iter().map(|h| h.weight).sum(),
        })
    }

    /// Move a share of rows into hotspot windows, then shuffle.
    ///
    /// Each row draws `r` in `[0, 1)`; if `r` falls under the cumulative
    /// weight of a hotspot (in declared order) it is replaced by a uniform
    /// value from that window.
    fn apply_hotspots(&self, values: &mut Vec<i64>, ctx: &mut RandomContext) {
        if self.config.hotspots.is_empty() || self.total_weight <= 0.0 {
            return;
        }

        let mut buckets: Vec<Vec<i64>> = vec![Vec::new(); self.config.hotspots.len()];
        let mut regular = Vec::with_capacity(values.len());

        for value in values.drain(..) {
            let r = ctx.unit();
            let mut placed = false;
            if r < self.total_weight {
                let mut cumulative = 0.0;
                for (h, hotspot) in self.config.hotspots.iter().enumerate() {
                    cumulative += hotspot.weight;
                    if r < cumulative {
                        buckets[h].push(ctx.uniform_int(hotspot.window.start, hotspot.window.end));
                        placed = true;
                        break;
                    }
                }
            }
            if !placed {
                regular.push(value);
            }
        }

        values.extend(buckets.into_iter().flatten());
        values.extend(regular);
        ctx.shuffle(values);
    }

    fn apply_jitter(&self, values: &mut [i64], ctx: &mut RandomContext) {
        let jitter = self.config.jitter;
        if jitter <= 0 {
            return;
        }
        let (start, end) = (self.config.range.start, self.config.range.end);
        for value in values.iter_mut() {
            let shifted = value.saturating_add(ctx.uniform_int(-jitter, jitter));
            *value = shifted.clamp(start, end);
        }
    }
}

impl FieldGenerator for TimestampGenerator {
    fn config(&self) -> &FieldConfig {
        &self.field
    }

    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError> {
        let (start, end) = (self.config.range.start, self.config.range.end);
        let mut values: Vec<i64> = (0..rows).map(|_| ctx.uniform_int(start, end)).collect();

        self.apply_hotspots(&mut values, ctx);
        self.apply_jitter(&mut values, ctx);
        let validity = apply_nulls(&self.field, &mut values, ctx);

        Ok(Column::new(self.field.name.clone(), ColumnData::Int64(values)).with_validity(validity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagen_core::{GeneratorConfig, HotspotConfig, TimeRange};

    fn build(config: TimestampConfig) -> Result<TimestampGenerator, GeneratorError> {
        let field = FieldConfig::new(
            "ts",
            DataType::Int64,
            GeneratorConfig::Timestamp(config.clone()),
        );
        TimestampGenerator::new(&field, &config)
    }

    fn values(column: Column) -> Vec<i64> {
        match column.data {
            ColumnData::Int64(values) => values,
            other => panic!("Expected int64 column, got {other:?}"),
        }
    }

    #[test]
    fn test_uniform_within_range() {
        let mut generator = build(TimestampConfig {
            range: TimeRange::new(1_000, 2_000),
            ..Default::default()
        })
        .unwrap();
        let values = values(generator.generate(1000, &mut RandomContext::new(1)).unwrap());
        assert!(values.iter().all(|v| (1_000..=2_000).contains(v)));
    }

    #[test]
    fn test_full_weight_hotspot() {
        let mut generator = build(TimestampConfig {
            range: TimeRange::new(0, 1_000_000),
            hotspots: vec![HotspotConfig {
                window: TimeRange::new(100, 200),
                weight: 1.0,
            }],
            jitter: 0,
        })
        .unwrap();
        let values = values(generator.generate(5000, &mut RandomContext::new(2)).unwrap());
        assert_eq!(values.len(), 5000);
        assert!(values.iter().all(|v| (100..=200).contains(v)));
    }

    #[test]
    fn test_partial_hotspot_share() {
        let mut generator = build(TimestampConfig {
            range: TimeRange::new(0, 1_000_000),
            hotspots: vec![HotspotConfig {
                window: TimeRange::new(0, 9),
                weight: 0.5,
            }],
            jitter: 0,
        })
        .unwrap();
        let values = values(generator.generate(10_000, &mut RandomContext::new(3)).unwrap());
        let hot = values.iter().filter(|v| **v < 10).count();
        assert!(hot > 4_500 && hot < 5_500);
    }

    #[test]
    fn test_jitter_is_clamped() {
        let mut generator = build(TimestampConfig {
            range: TimeRange::new(0, 10),
            hotspots: Vec::new(),
            jitter: 1_000,
        })
        .unwrap();
        let values = values(generator.generate(1000, &mut RandomContext::new(4)).unwrap());
        assert!(values.iter().all(|v| (0..=10).contains(v)));
    }

    #[test]
    fn test_hotspot_weight_validation() {
        let over = TimestampConfig {
            range: TimeRange::new(0, 10),
            hotspots: vec![
                HotspotConfig { window: TimeRange::new(0, 1), weight: 0.6 },
                HotspotConfig { window: TimeRange::new(2, 3), weight: 0.6 },
            ],
            jitter: 0,
        };
        assert!(build(over).is_err());

        let negative = TimestampConfig {
            range: TimeRange::new(0, 10),
            hotspots: vec![HotspotConfig { window: TimeRange::new(0, 1), weight: -0.1 }],
            jitter: 0,
        };
        assert!(build(negative).is_err());
    }

    #[test]
    fn test_requires_int64() {
        let config = TimestampConfig::default();
        let field = FieldConfig::new(
            "ts",
            DataType::Int32,
            GeneratorConfig::Timestamp(config.clone()),
        );
        assert!(TimestampGenerator::new(&field, &config).is_err());
    }
}
