//! Array value generator.
//!
//! Each row is a variable-length sequence produced by a nested element
//! generator, then shaped by containment rules and an optional uniqueness
//! constraint.

use super::{apply_nulls, require_type, FieldGenerator};
use crate::error::GeneratorError;
use crate::factory;
use crate::random::RandomContext;
use datagen_core::{
    ArrayConfig, Column, ColumnData, DataType, Distribution, FieldConfig, GeneratorConfig,
    LengthConfig, ScalarValue,
};
use datagen_dictionary::DictionaryRegistry;
use std::collections::HashSet;

/// Consecutive refill draws without a new value before `unique` gives up.
pub const MAX_STALE_DRAWS: usize = 256;

/// Validate an array configuration, including its element configuration.
pub fn validate(field: &FieldConfig, config: &ArrayConfig) -> Result<(), GeneratorError> {
    require_type(field, "array", &[DataType::Array])?;
    let name = field.name.as_str();
    let element = &config.element;

    if matches!(element.generator, GeneratorConfig::Array(_)) || element.field_type == DataType::Array
    {
        return Err(GeneratorError::config(name, "nested arrays are not supported"));
    }

    let length = &config.length;
    if length.min > length.max {
        return Err(GeneratorError::config(
            name,
            format!("length.min {} > length.max {}", length.min, length.max),
        ));
    }
    if !matches!(
        length.distribution,
        Distribution::Uniform | Distribution::Zipf | Distribution::Normal
    ) {
        return Err(GeneratorError::config(
            name,
            format!(
                "array length supports uniform, zipf or normal, got {}",
                length.distribution
            ),
        ));
    }
    if config.max_capacity == Some(0) {
        return Err(GeneratorError::config(name, "max_capacity must be positive"));
    }

    for (i, rule) in config.contains.iter().enumerate() {
        if !(0.0..=1.0).contains(&rule.probability) {
            return Err(GeneratorError::config(
                name,
                format!("contains[{i}].probability must be within [0, 1]"),
            ));
        }
    }
    parse_rules(field, config)?;

    factory::validate_config(&element_field(field, config))
}

/// Element config with the array's name filled in and nulls disabled.
fn element_field(field: &FieldConfig, config: &ArrayConfig) -> FieldConfig {
    let mut element = config.element.as_ref().clone();
    if element.name.is_empty() {
        element.name = field.name.clone();
    }
    element.nullable = false;
    element.null_ratio = 0.0;
    element
}

/// A containment rule with literals parsed into the element type.
#[derive(Debug, Clone)]
struct ParsedRule {
    include: Vec<ScalarValue>,
    exclude: HashSet<ScalarValue>,
    probability: f64,
}

fn parse_rules(field: &FieldConfig, config: &ArrayConfig) -> Result<Vec<ParsedRule>, GeneratorError> {
    let element_type = config.element.field_type;
    let parse = |literal: &String| {
        ScalarValue::parse(literal, element_type).map_err(|e| {
            GeneratorError::config(&field.name, format!("contains literal rejected: {e}"))
        })
    };

    config
        .contains
        .iter()
        .map(|rule| {
            Ok(ParsedRule {
                include: rule.include.iter().map(parse).collect::<Result<_, _>>()?,
                exclude: rule.exclude.iter().map(parse).collect::<Result<_, _>>()?,
                probability: rule.probability,
            })
        })
        .collect()
}

/// Generator for array columns.
pub struct ArrayGenerator {
    field: FieldConfig,
    config: ArrayConfig,
    element_type: DataType,
    element: Box<dyn FieldGenerator>,
    rules: Vec<ParsedRule>,
}

impl ArrayGenerator {
    /// Validate the configuration and build the element generator.
    pub fn new(
        field: &FieldConfig,
        config: &ArrayConfig,
        registry: &DictionaryRegistry,
    ) -> Result<Self, GeneratorError> {
        validate(field, config)?;
        let element = factory::create_generator(&element_field(field, config), registry)?;

        Ok(Self {
            field: field.clone(),
            config: config.clone(),
            element_type: config.element.field_type,
            element,
            rules: parse_rules(field, config)?,
        })
    }

    fn row_length(&self, ctx: &mut RandomContext) -> usize {
        let LengthConfig {
            min,
            max,
            avg,
            distribution,
        } = self.config.length;

        let length = if min == max {
            min
        } else {
            match distribution {
                Distribution::Zipf => min + ctx.zipf(max - min + 1, 1.0),
                Distribution::Normal => {
                    let center = avg.unwrap_or((min + max) as f64 / 2.0);
                    let std_dev = (max - min) as f64 / 6.0;
                    ctx.normal(center, std_dev)
                        .round()
                        .clamp(min as f64, max as f64) as usize
                }
                _ => ctx.uniform_int(min as i64, max as i64) as usize,
            }
        };

        match self.config.max_capacity {
            Some(capacity) => length.min(capacity),
            None => length,
        }
    }

    fn draw(&mut self, count: usize, ctx: &mut RandomContext) -> Result<Vec<ScalarValue>, GeneratorError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.element
            .generate(count, ctx)?
            .data
            .into_scalars()
            .ok_or_else(|| GeneratorError::logic(&self.field.name, "element generator produced arrays"))
    }

    fn generate_row(&mut self, ctx: &mut RandomContext) -> Result<Vec<ScalarValue>, GeneratorError> {
        let length = self.row_length(ctx);
        let mut elements = self.draw(length, ctx)?;
        let mut excluded: HashSet<ScalarValue> = HashSet::new();
        let mut enforced: HashSet<ScalarValue> = HashSet::new();

        for rule in &self.rules {
            if !rule.include.is_empty() && ctx.bernoulli(rule.probability) {
                for value in &rule.include {
                    if !enforced.insert(value.clone()) || elements.contains(value) {
                        continue;
                    }
                    // Never overwrite a value an earlier include placed
                    let free: Vec<usize> = (0..elements.len())
                        .filter(|&i| !enforced.contains(&elements[i]))
                        .collect();
                    if free.is_empty() {
                        elements.push(value.clone());
                    } else {
                        let slot = free[ctx.uniform_index(free.len())];
                        elements[slot] = value.clone();
                    }
                }
            }
            if !rule.exclude.is_empty() && ctx.bernoulli(rule.probability) {
                elements.retain(|value| !rule.exclude.contains(value));
                excluded.extend(rule.exclude.iter().cloned());
            }
        }

        if self.config.unique {
            let mut seen = HashSet::with_capacity(elements.len());
            elements.retain(|value| seen.insert(value.clone()));

            let mut stale = 0;
            while elements.len() < length && stale < MAX_STALE_DRAWS {
                for value in self.draw(length - elements.len(), ctx)? {
                    if !excluded.contains(&value) && seen.insert(value.clone()) {
                        elements.push(value);
                        stale = 0;
                    } else {
                        stale += 1;
                    }
                }
            }
        }

        if let Some(capacity) = self.config.max_capacity {
            // Drop drawn values before included ones
            while elements.len() > capacity {
                match elements.iter().rposition(|value| !enforced.contains(value)) {
                    Some(index) => {
                        elements.remove(index);
                    }
                    None => elements.truncate(capacity),
                }
            }
        }
        Ok(elements)
    }
}

impl FieldGenerator for ArrayGenerator {
    fn config(&self) -> &FieldConfig {
        &self.field
    }

    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError> {
        let mut values = Vec::with_capacity(rows);
        for _ in 0..rows {
            values.push(self.generate_row(ctx)?);
        }
        let validity = apply_nulls(&self.field, &mut values, ctx);

        let rows = values
            .into_iter()
            .map(|row| {
                ColumnData::from_scalars(self.element_type, row)
                    .map_err(|e| GeneratorError::logic(&self.field.name, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = ColumnData::Array {
            element_type: self.element_type,
            rows,
        };
        Ok(Column::new(self.field.name.clone(), data).with_validity(validity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use datagen_core::{CategoricalConfig, ContainsRule, NumericConfig, OutlierConfig, ValuePool};

    fn letters(n: usize) -> Vec<String> {
        (b'a'..).take(n).map(|b| (b as char).to_string()).collect()
    }

    fn string_element(pool: Vec<String>) -> FieldConfig {
        FieldConfig::new(
            "",
            DataType::VarChar,
            GeneratorConfig::Categorical(CategoricalConfig {
                values: ValuePool::inline(pool),
                ..Default::default()
            }),
        )
    }

    fn array_config(element: FieldConfig, min: usize, max: usize) -> ArrayConfig {
        ArrayConfig {
            element: Box::new(element),
            length: LengthConfig {
                min,
                max,
                avg: None,
                distribution: Distribution::Uniform,
            },
            max_capacity: None,
            contains: Vec::new(),
            unique: false,
        }
    }

    fn build(config: ArrayConfig) -> Result<ArrayGenerator, GeneratorError> {
        let field = FieldConfig::new("tags", DataType::Array, GeneratorConfig::Array(config.clone()));
        ArrayGenerator::new(&field, &config, &DictionaryRegistry::new())
    }

    fn rows(column: Column) -> Vec<Vec<String>> {
        match column.data {
            ColumnData::Array { rows, .. } => rows
                .into_iter()
                .map(|row| match row {
                    ColumnData::VarChar(values) => values,
                    other => panic!("Expected varchar elements, got {other:?}"),
                })
                .collect(),
            other => panic!("Expected array column, got {other:?}"),
        }
    }

    #[test]
    fn test_lengths_within_bounds() {
        let mut generator = build(array_config(string_element(letters(5)), 2, 6)).unwrap();
        let column = generator.generate(200, &mut RandomContext::new(1)).unwrap();
        for row in rows(column) {
            assert!((2..=6).contains(&row.len()));
        }
    }

    #[test]
    fn test_max_capacity() {
        let mut config = array_config(string_element(letters(5)), 5, 10);
        config.max_capacity = Some(3);
        let mut generator = build(config).unwrap();
        let column = generator.generate(50, &mut RandomContext::new(1)).unwrap();
        assert!(rows(column).iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_unique_fills_to_length() {
        let mut config = array_config(string_element(letters(8)), 5, 5);
        config.unique = true;
        let mut generator = build(config).unwrap();
        let column = generator.generate(100, &mut RandomContext::new(2)).unwrap();

        for row in rows(column) {
            let distinct: HashSet<_> = row.iter().collect();
            assert_eq!(row.len(), 5);
            assert_eq!(distinct.len(), 5);
        }
    }

    #[test]
    fn test_unique_stops_when_domain_exhausted() {
        let mut config = array_config(string_element(letters(2)), 5, 5);
        config.unique = true;
        let mut generator = build(config).unwrap();
        let column = generator.generate(10, &mut RandomContext::new(3)).unwrap();
        assert!(rows(column).iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_include_and_exclude() {
        let mut config = array_config(string_element(letters(4)), 3, 3);
        config.contains = vec![
            ContainsRule {
                include: vec!["z".to_string()],
                exclude: Vec::new(),
                probability: 1.0,
            },
            ContainsRule {
                include: Vec::new(),
                exclude: vec!["a".to_string()],
                probability: 1.0,
            },
        ];
        config.unique = true;
        let mut generator = build(config).unwrap();
        let column = generator.generate(100, &mut RandomContext::new(4)).unwrap();

        for row in rows(column) {
            assert!(row.contains(&"z".to_string()));
            assert!(!row.contains(&"a".to_string()));
        }
    }

    #[test]
    fn test_every_included_value_survives() {
        let mut config = array_config(string_element(letters(4)), 3, 3);
        config.contains = vec![ContainsRule {
            include: vec!["x".to_string(), "y".to_string()],
            exclude: Vec::new(),
            probability: 1.0,
        }];
        let mut generator = build(config).unwrap();
        let column = generator.generate(200, &mut RandomContext::new(9)).unwrap();

        for row in rows(column) {
            assert_eq!(row.len(), 3);
            assert!(row.contains(&"x".to_string()), "missing x in {row:?}");
            assert!(row.contains(&"y".to_string()), "missing y in {row:?}");
        }
    }

    #[test]
    fn test_included_values_outlast_capacity() {
        let mut config = array_config(string_element(letters(4)), 1, 1);
        config.max_capacity = Some(2);
        config.contains = vec![
            ContainsRule {
                include: vec!["x".to_string()],
                exclude: Vec::new(),
                probability: 1.0,
            },
            ContainsRule {
                include: vec!["y".to_string(), "z".to_string()],
                exclude: Vec::new(),
                probability: 1.0,
            },
        ];
        let mut generator = build(config).unwrap();
        let column = generator.generate(50, &mut RandomContext::new(10)).unwrap();

        for row in rows(column) {
            assert_eq!(row, vec!["x".to_string(), "y".to_string()]);
        }
    }

    #[test]
    fn test_include_into_empty_array() {
        let mut config = array_config(string_element(letters(3)), 0, 0);
        config.contains = vec![ContainsRule {
            include: vec!["x".to_string()],
            exclude: Vec::new(),
            probability: 1.0,
        }];
        let mut generator = build(config).unwrap();
        let column = generator.generate(3, &mut RandomContext::new(5)).unwrap();
        assert_eq!(rows(column), vec![vec!["x".to_string()]; 3]);
    }

    #[test]
    fn test_integer_elements_and_literals() {
        let element = FieldConfig::new(
            "",
            DataType::Int32,
            GeneratorConfig::Numeric(NumericConfig::new(1.0, 100.0)),
        );
        let mut config = array_config(element, 1, 4);
        config.contains = vec![ContainsRule {
            include: vec!["500".to_string()],
            exclude: Vec::new(),
            probability: 1.0,
        }];
        let mut generator = build(config.clone()).unwrap();
        let column = generator.generate(20, &mut RandomContext::new(6)).unwrap();
        let ColumnData::Array { element_type, rows } = column.data else {
            panic!("Expected array column");
        };
        assert_eq!(element_type, DataType::Int32);
        for row in rows {
            let ColumnData::Int32(values) = row else {
                panic!("Expected int32 elements");
            };
            assert!(values.contains(&500));
        }

        config.contains[0].include = vec!["not a number".to_string()];
        assert_eq!(build(config).err().unwrap().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_float_literals_match_stored_elements() {
        // Every element is 0.7 or the 0.1 outlier
        let mut numeric = NumericConfig::new(0.7, 0.7);
        numeric.outliers = OutlierConfig {
            ratio: 0.5,
            values: vec![0.1],
        };
        let element = FieldConfig::new("", DataType::Float, GeneratorConfig::Numeric(numeric));
        let mut config = array_config(element, 4, 4);
        config.contains = vec![ContainsRule {
            include: Vec::new(),
            exclude: vec!["0.1".to_string()],
            probability: 1.0,
        }];
        let mut generator = build(config.clone()).unwrap();
        let column = generator.generate(50, &mut RandomContext::new(11)).unwrap();
        let ColumnData::Array { rows, .. } = column.data else {
            panic!("Expected array column");
        };
        for row in rows {
            let ColumnData::Float(values) = row else {
                panic!("Expected float elements");
            };
            assert!(values.iter().all(|v| *v == 0.7f32), "0.1 not excluded: {values:?}");
        }

        config.contains[0] = ContainsRule {
            include: vec!["0.1".to_string()],
            exclude: Vec::new(),
            probability: 1.0,
        };
        config.unique = true;
        let mut generator = build(config).unwrap();
        let column = generator.generate(50, &mut RandomContext::new(12)).unwrap();
        let ColumnData::Array { rows, .. } = column.data else {
            panic!("Expected array column");
        };
        for row in rows {
            let ColumnData::Float(values) = row else {
                panic!("Expected float elements");
            };
            assert_eq!(values.iter().filter(|v| **v == 0.1f32).count(), 1);
        }
    }

    #[test]
    fn test_nested_arrays_rejected() {
        let inner = array_config(string_element(letters(2)), 1, 1);
        let element = FieldConfig::new("", DataType::Array, GeneratorConfig::Array(inner));
        let err = build(array_config(element, 1, 1)).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_unsupported_length_distribution() {
        let mut config = array_config(string_element(letters(2)), 1, 3);
        config.length.distribution = Distribution::Sequential;
        assert!(build(config).is_err());
    }

    #[test]
    fn test_zipf_lengths_favor_min() {
        let mut config = array_config(string_element(letters(3)), 1, 20);
        config.length.distribution = Distribution::Zipf;
        let mut generator = build(config).unwrap();
        let column = generator.generate(2000, &mut RandomContext::new(7)).unwrap();
        let lengths: Vec<usize> = rows(column).iter().map(Vec::len).collect();
        let ones = lengths.iter().filter(|l| **l == 1).count();
        let twenties = lengths.iter().filter(|l| **l == 20).count();
        assert!(ones > twenties);
    }

    #[test]
    fn test_null_rows_are_empty() {
        let config = array_config(string_element(letters(3)), 2, 2);
        let field = FieldConfig::new("tags", DataType::Array, GeneratorConfig::Array(config.clone()))
            .with_nulls(1.0);
        let mut generator = ArrayGenerator::new(&field, &config, &DictionaryRegistry::new()).unwrap();
        let column = generator.generate(4, &mut RandomContext::new(8)).unwrap();
        assert_eq!(column.null_count(), 4);
        assert!(rows(column).iter().all(Vec::is_empty));
    }
}
