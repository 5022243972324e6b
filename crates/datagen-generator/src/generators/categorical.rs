//! Categorical value generator.
//!
//! Draws values from a finite pool. The first K values can be given explicit
//! probability mass through `duplication_ratios`; the remaining values share
//! what is left uniformly.

use super::{apply_nulls, require_type, truncate_utf8, FieldGenerator, CATEGORICAL_TYPES};
use crate::error::GeneratorError;
use crate::random::RandomContext;
use datagen_core::{
    CategoricalConfig, Column, ColumnData, DataType, FieldConfig, PoolSource, ScalarValue,
};
use datagen_dictionary::DictionaryRegistry;
use std::sync::Arc;
use tracing::debug;

/// Tolerance when comparing ratio sums against 1.0.
pub const RATIO_EPSILON: f64 = 1e-6;

/// Validate a categorical configuration without resolving its pool.
pub fn validate(field: &FieldConfig, config: &CategoricalConfig) -> Result<(), GeneratorError> {
    require_type(field, "categorical", CATEGORICAL_TYPES)?;
    let name = field.name.as_str();

    if config.values.source() == PoolSource::Empty {
        return Err(GeneratorError::config(
            name,
            "values must name a dictionary or list inline values",
        ));
    }
    if config.pick.is_some() && config.random_pick.is_some() {
        return Err(GeneratorError::config(
            name,
            "pick and random_pick are mutually exclusive",
        ));
    }
    if config.pick == Some(0) || config.random_pick == Some(0) {
        return Err(GeneratorError::config(name, "pick count must be positive"));
    }
    if config.max_length == Some(0) {
        return Err(GeneratorError::config(name, "max_length must be positive"));
    }
    if let Some(i) = config.duplication_ratios.iter().position(|r| !(*r >= 0.0)) {
        return Err(GeneratorError::config(
            name,
            format!("duplication_ratios[{i}] must be non-negative"),
        ));
    }
    if let PoolSource::Inline(items) = config.values.source() {
        check_pool(field, items)?;
        cumulative_partition(field, &config.duplication_ratios, restricted_len(config, items.len()))?;
    }
    Ok(())
}

/// Pool size after applying `pick` / `random_pick`.
fn restricted_len(config: &CategoricalConfig, pool_len: usize) -> usize {
    match config.pick.or(config.random_pick) {
        Some(n) => n.min(pool_len),
        None => pool_len,
    }
}

/// Integer targets need every entry to parse and fit the declared width.
fn check_pool(field: &FieldConfig, items: &[String]) -> Result<(), GeneratorError> {
    if items.is_empty() {
        return Err(GeneratorError::config(&field.name, "value pool is empty"));
    }
    if field.field_type.is_integer() {
        for item in items {
            ScalarValue::parse(item, field.field_type).map_err(|e| {
                GeneratorError::config(&field.name, format!("pool entry rejected: {e}"))
            })?;
        }
    }
    Ok(())
}

/// Build the cumulative selection table for `len` values.
///
/// Explicit ratios cover the first values; the remainder is spread evenly
/// over the rest. The last entry is always exactly 1.0.
pub fn cumulative_partition(
    field: &FieldConfig,
    ratios: &[f64],
    len: usize,
) -> Result<Vec<f64>, GeneratorError> {
    let name = field.name.as_str();
    if len == 0 {
        return Err(GeneratorError::config(name, "value pool is empty"));
    }

    let mut cumulative = Vec::with_capacity(len);
    if ratios.is_empty() {
        let step = 1.0 / len as f64;
        cumulative.extend((1..=len).map(|i| i as f64 * step));
    } else {
        if ratios.len() > len {
            return Err(GeneratorError::config(
                name,
                format!(
                    "{} duplication ratios given for {len} values",
                    ratios.len()
                ),
            ));
        }

        let mut total = 0.0;
        for ratio in ratios {
            total += ratio;
            cumulative.push(total);
        }

        let remainder = 1.0 - total;
        if remainder < -RATIO_EPSILON {
            return Err(GeneratorError::config(
                name,
                format!("duplication ratios sum to {total}, more than 1.0"),
            ));
        }

        let uncovered = len - ratios.len();
        if uncovered > 0 {
            if remainder <= RATIO_EPSILON {
                return Err(GeneratorError::config(
                    name,
                    format!("duplication ratios use the full mass but {uncovered} values remain"),
                ));
            }
            let share = remainder / uncovered as f64;
            for _ in 0..uncovered {
                total += share;
                cumulative.push(total);
            }
        } else if remainder > RATIO_EPSILON {
            return Err(GeneratorError::config(
                name,
                format!("duplication ratios sum to {total}, less than 1.0 with no values left"),
            ));
        }
    }

    if let Some(last) = cumulative.last_mut() {
        *last = 1.0;
    }
    Ok(cumulative)
}

/// Generator for categorical columns.
pub struct CategoricalGenerator {
    field: FieldConfig,
    config: CategoricalConfig,
    /// Loaded pool, already limited by `pick`
    pool: Arc<Vec<String>>,
    /// Pool after `random_pick`, chosen on the first call
    selected: Option<Vec<String>>,
    cumulative: Vec<f64>,
}

impl CategoricalGenerator {
    /// Resolve the pool, validate it and build the selection table.
    pub fn new(
        field: &FieldConfig,
        config: &CategoricalConfig,
        registry: &DictionaryRegistry,
    ) -> Result<Self, GeneratorError> {
        validate(field, config)?;

        let mut pool = match config.values.source() {
            PoolSource::Dictionary(name) => registry.get(name, 0)?,
            PoolSource::Inline(items) => Arc::new(items.to_vec()),
            PoolSource::Empty => {
                return Err(GeneratorError::config(&field.name, "value pool is empty"))
            }
        };
        check_pool(field, &pool)?;

        if let Some(n) = config.pick {
            if n < pool.len() {
                pool = Arc::new(pool[..n].to_vec());
            }
        }

        let len = restricted_len(config, pool.len());
        let cumulative = cumulative_partition(field, &config.duplication_ratios, len)?;
        debug!(
            "Categorical field '{}' built with {} candidate values",
            field.name, len
        );

        Ok(Self {
            field: field.clone(),
            config: config.clone(),
            pool,
            selected: None,
            cumulative,
        })
    }

    /// Pool entries that can be drawn, before `random_pick`.
    pub(crate) fn candidates(&self) -> &[String] {
        &self.pool
    }

    /// Apply `random_pick` once; later calls reuse the same subset.
    fn ensure_selection(&mut self, ctx: &mut RandomContext) {
        let Some(n) = self.config.random_pick else {
            return;
        };
        if self.selected.is_some() || n >= self.pool.len() {
            return;
        }
        let mut indices: Vec<usize> = (0..self.pool.len()).collect();
        ctx.shuffle(&mut indices);
        self.selected = Some(indices[..n].iter().map(|&i| self.pool[i].clone()).collect());
    }
}

impl FieldGenerator for CategoricalGenerator {
    fn config(&self) -> &FieldConfig {
        &self.field
    }

    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError> {
        self.ensure_selection(ctx);
        let candidates: &[String] = match &self.selected {
            Some(selected) => selected.as_slice(),
            None => self.pool.as_slice(),
        };
        // Integer entries are parsed whole
        let max_length = self
            .config
            .max_length
            .filter(|_| self.field.field_type == DataType::VarChar);

        let mut values: Vec<String> = (0..rows)
            .map(|_| {
                let u = ctx.unit();
                let idx = self
                    .cumulative
                    .partition_point(|&c| c < u)
                    .min(candidates.len() - 1);
                let mut value = candidates[idx].clone();
                if let Some(max) = max_length {
                    truncate_utf8(&mut value, max);
                }
                value
            })
            .collect();

        let validity = apply_nulls(&self.field, &mut values, ctx);

        let data = if self.field.field_type.is_integer() {
            let scalars = values
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    let valid = validity.as_ref().map_or(true, |mask| mask[i]);
                    if !valid {
                        return Ok(ScalarValue::Int(0));
                    }
                    ScalarValue::parse(value, self.field.field_type)
                        .map_err(|e| GeneratorError::logic(&self.field.name, e))
                })
                .collect::<Result<Vec<_>, _>>()?;
            ColumnData::from_scalars(self.field.field_type, scalars)
                .map_err(|e| GeneratorError::logic(&self.field.name, e))?
        } else {
            ColumnData::VarChar(values)
        };

        Ok(Column::new(self.field.name.clone(), data).with_validity(validity))
    }
}
