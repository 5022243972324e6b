//! JSON document generator.
//!
//! Documents are picked from a candidate pool with the same rules as
//! categorical values (`duplication_ratios`, `pick`, `random_pick`). Every
//! candidate that can be drawn must parse as a JSON object or array.

use super::{categorical, require_type, CategoricalGenerator, FieldGenerator};
use crate::error::GeneratorError;
use crate::random::RandomContext;
use datagen_core::{
    CategoricalConfig, Column, ColumnData, DataType, FieldConfig, GeneratorConfig, JsonConfig,
    PoolSource, ValuePool,
};
use datagen_dictionary::DictionaryRegistry;
use tracing::debug;

/// Candidates used when neither a dictionary nor inline values are given.
pub const DEFAULT_DOCUMENTS: &[&str] = &["{}", r#"{"a":1}"#, r#"{"b":"x"}"#, r#"{"arr":[1,2,3]}"#];

/// Validate a JSON configuration without resolving a dictionary pool.
pub fn validate(field: &FieldConfig, config: &JsonConfig) -> Result<(), GeneratorError> {
    require_type(field, "json", &[DataType::Json])?;
    if let PoolSource::Inline(items) = config.values.source() {
        for item in items {
            check_document(field, item)?;
        }
    }
    let (inner_field, inner_config) = as_categorical(field, config);
    categorical::validate(&inner_field, &inner_config)
}

fn check_document(field: &FieldConfig, text: &str) -> Result<(), GeneratorError> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) if value.is_object() || value.is_array() => Ok(()),
        Ok(_) => Err(GeneratorError::config(
            &field.name,
            format!("candidate '{text}' is not a JSON object or array"),
        )),
        Err(e) => Err(GeneratorError::config(
            &field.name,
            format!("candidate '{text}' is not valid JSON: {e}"),
        )),
    }
}

/// The varchar categorical field that does the actual sampling.
fn as_categorical(field: &FieldConfig, config: &JsonConfig) -> (FieldConfig, CategoricalConfig) {
    let values = match config.values.source() {
        PoolSource::Empty => ValuePool::inline(DEFAULT_DOCUMENTS.iter().copied()),
        _ => config.values.clone(),
    };
    let categorical = CategoricalConfig {
        values,
        duplication_ratios: config.duplication_ratios.clone(),
        max_length: None,
        pick: config.pick,
        random_pick: config.random_pick,
    };

    let mut inner = field.clone();
    inner.field_type = DataType::VarChar;
    inner.generator = GeneratorConfig::Categorical(categorical.clone());
    (inner, categorical)
}

/// Generator for JSON columns.
pub struct JsonGenerator {
    field: FieldConfig,
    documents: CategoricalGenerator,
}

impl JsonGenerator {
    /// Resolve the candidate pool and check every reachable document.
    pub fn new(
        field: &FieldConfig,
        config: &JsonConfig,
        registry: &DictionaryRegistry,
    ) -> Result<Self, GeneratorError> {
        validate(field, config)?;
        let (inner_field, inner_config) = as_categorical(field, config);
        let documents = CategoricalGenerator::new(&inner_field, &inner_config, registry)?;

        for candidate in documents.candidates() {
            check_document(field, candidate)?;
        }
        debug!(
            "JSON field '{}' built with {} candidate documents",
            field.name,
            documents.candidates().len()
        );

        Ok(Self {
            field: field.clone(),
            documents,
        })
    }
}

impl FieldGenerator for JsonGenerator {
    fn config(&self) -> &FieldConfig {
        &self.field
    }

    fn generate(&mut self, rows: usize, ctx: &mut RandomContext) -> Result<Column, GeneratorError> {
        let column = self.documents.generate(rows, ctx)?;
        match column.data {
            ColumnData::VarChar(values) => Ok(Column::new(
                self.field.name.clone(),
                ColumnData::Json(values),
            )
            .with_validity(column.validity)),
            other => Err(GeneratorError::logic(
                &self.field.name,
                format!("expected text documents, got {}", other.data_type()),
            )),
        }
    }
}
